//! Hospital (tenant) management and CSV import.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use carehub_core::error::AppError;
use carehub_core::types::{FilterField, PageRequest, PageResponse};
use carehub_database::Repo;
use carehub_entity::hospital::Hospital;

use crate::audit::{AuditEvent, AuditService};
use crate::context::RequestContext;

/// Data for creating a hospital.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateHospitalRequest {
    pub code: String,
    pub name: String,
    pub city: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

/// Partial hospital update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateHospitalRequest {
    pub name: Option<String>,
    pub city: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub active: Option<bool>,
}

/// Hospital list filters.
#[derive(Debug, Clone, Default)]
pub struct HospitalQuery {
    /// Case-insensitive substring of the name.
    pub name: Option<String>,
    pub city: Option<String>,
    pub active: Option<bool>,
}

/// A CSV row that was not imported.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedRow {
    /// 1-based line number in the uploaded file, header included.
    pub line: u64,
    pub code: Option<String>,
    pub reason: String,
}

/// Outcome of a CSV import.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportSummary {
    pub created: Vec<Hospital>,
    pub skipped: Vec<SkippedRow>,
}

#[derive(Debug, Deserialize)]
struct ImportRow {
    code: String,
    name: String,
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    phone: Option<String>,
    #[serde(default)]
    email: Option<String>,
}

/// Manages hospitals.
#[derive(Debug, Clone)]
pub struct HospitalService {
    hospital_repo: Repo<Hospital>,
    audit: Arc<AuditService>,
}

impl HospitalService {
    /// Creates a new hospital service.
    pub fn new(hospital_repo: Repo<Hospital>, audit: Arc<AuditService>) -> Self {
        Self {
            hospital_repo,
            audit,
        }
    }

    /// Page through hospitals.
    pub async fn list(
        &self,
        query: &HospitalQuery,
        page: &PageRequest,
    ) -> Result<PageResponse<Hospital>, AppError> {
        let mut filters = Vec::new();
        if let Some(name) = query.name.as_deref().filter(|n| !n.trim().is_empty()) {
            filters.push(FilterField::contains("name", name.trim()));
        }
        filters.extend(FilterField::eq_opt("city", query.city.as_deref()));
        filters.extend(FilterField::eq_opt("active", query.active));
        self.hospital_repo.find_all(&filters, page).await
    }

    /// Get one hospital.
    pub async fn get(&self, id: Uuid) -> Result<Hospital, AppError> {
        self.hospital_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Hospital not found"))
    }

    /// Create a hospital. Codes are unique and stored upper-case.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        req: CreateHospitalRequest,
    ) -> Result<Hospital, AppError> {
        let hospital = self.build(req)?;
        self.ensure_code_free(&hospital.code).await?;
        let hospital = self.hospital_repo.create(&hospital).await?;

        self.audit
            .record(ctx, AuditEvent::new("hospital.create", "hospital").target(hospital.id))
            .await;
        info!(hospital_id = %hospital.id, code = %hospital.code, "Hospital created");
        Ok(hospital)
    }

    /// Update a hospital. Hospital admins may only touch hospitals they are
    /// assigned to.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        req: UpdateHospitalRequest,
    ) -> Result<Hospital, AppError> {
        if !ctx.identity.is_super_admin() && !ctx.identity.assigned_hospitals.contains(&id) {
            warn!(user_id = %ctx.caller_id(), hospital_id = %id, "Hospital update outside assignments");
            return Err(AppError::authorization("Access is denied"));
        }
        let mut hospital = self.get(id).await?;

        if let Some(name) = req.name {
            hospital.name = non_blank(name, "Hospital name")?;
        }
        if req.city.is_some() {
            hospital.city = trimmed(req.city);
        }
        if req.phone.is_some() {
            hospital.phone = trimmed(req.phone);
        }
        if req.email.is_some() {
            hospital.email = trimmed(req.email);
        }
        if let Some(active) = req.active {
            hospital.active = active;
        }
        hospital.updated_at = Utc::now();

        let hospital = self.hospital_repo.update(&hospital).await?;
        self.audit
            .record(ctx, AuditEvent::new("hospital.update", "hospital").target(id))
            .await;
        Ok(hospital)
    }

    /// Delete a hospital.
    pub async fn delete(&self, ctx: &RequestContext, id: Uuid) -> Result<(), AppError> {
        if !self.hospital_repo.delete(id).await? {
            return Err(AppError::not_found("Hospital not found"));
        }
        self.audit
            .record(ctx, AuditEvent::new("hospital.delete", "hospital").target(id))
            .await;
        info!(hospital_id = %id, "Hospital deleted");
        Ok(())
    }

    /// Import hospitals from a CSV file with a `code,name,city,phone,email`
    /// header. Invalid or duplicate rows are skipped and reported.
    pub async fn import_csv(
        &self,
        ctx: &RequestContext,
        data: &[u8],
    ) -> Result<ImportSummary, AppError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(data);

        let headers = reader
            .headers()
            .map_err(|e| AppError::validation(format!("Unreadable CSV header: {e}")))?
            .clone();
        for required in ["code", "name"] {
            if !headers.iter().any(|h| h.eq_ignore_ascii_case(required)) {
                return Err(AppError::validation(format!(
                    "CSV header must contain a '{required}' column"
                )));
            }
        }
        let lowered: csv::StringRecord = headers.iter().map(str::to_ascii_lowercase).collect();
        reader.set_headers(lowered);

        let mut summary = ImportSummary {
            created: Vec::new(),
            skipped: Vec::new(),
        };
        let mut seen = HashSet::new();

        for (index, record) in reader.deserialize::<ImportRow>().enumerate() {
            let line = index as u64 + 2;
            let row = match record {
                Ok(row) => row,
                Err(e) => {
                    summary.skipped.push(SkippedRow {
                        line,
                        code: None,
                        reason: format!("Malformed row: {e}"),
                    });
                    continue;
                }
            };
            let code = row.code.to_uppercase();
            let skip = |reason: &str| SkippedRow {
                line,
                code: Some(code.clone()),
                reason: reason.to_string(),
            };

            if !seen.insert(code.clone()) {
                summary.skipped.push(skip("Duplicate code in file"));
                continue;
            }
            let hospital = match self.build(CreateHospitalRequest {
                code: row.code,
                name: row.name,
                city: row.city,
                phone: row.phone,
                email: row.email,
            }) {
                Ok(h) => h,
                Err(e) => {
                    summary.skipped.push(skip(&e.message));
                    continue;
                }
            };
            if self.ensure_code_free(&hospital.code).await.is_err() {
                summary.skipped.push(skip("A hospital with this code already exists"));
                continue;
            }
            summary.created.push(self.hospital_repo.create(&hospital).await?);
        }

        self.audit
            .record(
                ctx,
                AuditEvent::new("hospital.import", "hospital").details(serde_json::json!({
                    "created": summary.created.len(),
                    "skipped": summary.skipped.len(),
                })),
            )
            .await;
        info!(
            created = summary.created.len(),
            skipped = summary.skipped.len(),
            "Hospital import finished"
        );
        Ok(summary)
    }

    fn build(&self, req: CreateHospitalRequest) -> Result<Hospital, AppError> {
        let mut hospital = Hospital::new(
            non_blank(req.code, "Hospital code")?.to_uppercase(),
            non_blank(req.name, "Hospital name")?,
        );
        hospital.city = trimmed(req.city);
        hospital.phone = trimmed(req.phone);
        hospital.email = trimmed(req.email);
        Ok(hospital)
    }

    async fn ensure_code_free(&self, code: &str) -> Result<(), AppError> {
        if self.hospital_repo.count(&[FilterField::eq("code", code)]).await? > 0 {
            return Err(AppError::conflict(format!(
                "A hospital with code '{code}' already exists"
            )));
        }
        Ok(())
    }
}

fn non_blank(value: String, what: &str) -> Result<String, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::validation(format!("{what} cannot be empty")));
    }
    Ok(value.to_string())
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use carehub_auth::Authority;
    use carehub_core::error::ErrorKind;
    use carehub_database::Repositories;

    use crate::testing::ctx;

    fn service() -> HospitalService {
        let repos = Repositories::in_memory();
        HospitalService::new(
            repos.hospitals.clone(),
            Arc::new(AuditService::new(repos.audit_log.clone())),
        )
    }

    #[tokio::test]
    async fn test_import_reports_skipped_rows() {
        let service = service();
        let root = ctx(&[Authority::SuperAdmin], None);
        service
            .create(
                &root,
                CreateHospitalRequest {
                    code: "nrt".into(),
                    name: "North".into(),
                    city: None,
                    phone: None,
                    email: None,
                },
            )
            .await
            .unwrap();

        let csv = "Code,Name,City\nSTH,South General,Lyon\nnrt,North again,\nSTH,Dup,\nEST,,Nice\n";
        let summary = service.import_csv(&root, csv.as_bytes()).await.unwrap();

        assert_eq!(summary.created.len(), 1);
        assert_eq!(summary.created[0].city.as_deref(), Some("Lyon"));
        let lines: Vec<u64> = summary.skipped.iter().map(|s| s.line).collect();
        assert_eq!(lines, vec![3, 4, 5]);
        assert!(summary.skipped[2].reason.contains("name"));
    }

    #[tokio::test]
    async fn test_import_requires_code_and_name_columns() {
        let err = service()
            .import_csv(&ctx(&[Authority::SuperAdmin], None), b"name,city\nX,Y\n")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_hospital_admin_updates_only_assigned() {
        let service = service();
        let root = ctx(&[Authority::SuperAdmin], None);
        let req = CreateHospitalRequest {
            code: "A".into(),
            name: "Alpha".into(),
            city: None,
            phone: None,
            email: None,
        };
        let hospital = service.create(&root, req).await.unwrap();

        let mut admin = ctx(&[Authority::HospitalAdmin], None);
        let rename = UpdateHospitalRequest {
            name: Some("Alpha Clinic".into()),
            ..Default::default()
        };
        let err = service
            .update(&admin, hospital.id, rename.clone())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authorization);

        admin.identity.assigned_hospitals.push(hospital.id);
        let updated = service.update(&admin, hospital.id, rename).await.unwrap();
        assert_eq!(updated.name, "Alpha Clinic");
    }
}
