//! Patient invoices and their delivery by mail.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use carehub_core::error::AppError;
use carehub_core::types::{FilterField, PageRequest, PageResponse};
use carehub_database::Repo;
use carehub_entity::invoice::{Invoice, InvoiceStatus};

use crate::audit::{AuditEvent, AuditService};
use crate::context::RequestContext;
use crate::mail::{MailMessage, Mailer};
use crate::scope::{find_scoped, hospital_filter};

/// Data for raising an invoice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateInvoiceRequest {
    pub patient_id: Uuid,
    /// Generated when absent. Unique per hospital.
    pub number: Option<String>,
    pub amount_cents: i64,
    pub currency: String,
    pub billing_email: Option<String>,
    /// Create directly as `ISSUED` instead of `DRAFT`.
    #[serde(default)]
    pub issue: bool,
}

/// Invoice list filters.
#[derive(Debug, Clone, Default)]
pub struct InvoiceQuery {
    pub status: Option<InvoiceStatus>,
    pub patient_id: Option<Uuid>,
}

/// Raises invoices and mails them out.
#[derive(Debug, Clone)]
pub struct InvoiceService {
    invoice_repo: Repo<Invoice>,
    mailer: Arc<dyn Mailer>,
    audit: Arc<AuditService>,
}

impl InvoiceService {
    /// Creates a new invoice service.
    pub fn new(
        invoice_repo: Repo<Invoice>,
        mailer: Arc<dyn Mailer>,
        audit: Arc<AuditService>,
    ) -> Self {
        Self {
            invoice_repo,
            mailer,
            audit,
        }
    }

    pub async fn list(
        &self,
        ctx: &RequestContext,
        query: &InvoiceQuery,
        page: &PageRequest,
    ) -> Result<PageResponse<Invoice>, AppError> {
        let mut filters = hospital_filter(ctx)?;
        filters.extend(FilterField::eq_opt("status", query.status));
        filters.extend(FilterField::eq_opt("patient_id", query.patient_id));
        self.invoice_repo.find_all(&filters, page).await
    }

    pub async fn get(&self, ctx: &RequestContext, id: Uuid) -> Result<Invoice, AppError> {
        find_scoped(&self.invoice_repo, ctx, id).await
    }

    pub async fn create(
        &self,
        ctx: &RequestContext,
        req: CreateInvoiceRequest,
    ) -> Result<Invoice, AppError> {
        let hospital_id = ctx.hospital()?;
        if req.amount_cents <= 0 {
            return Err(AppError::validation("Invoice amount must be positive"));
        }
        let currency = req.currency.trim().to_uppercase();
        if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(AppError::validation("Currency must be a three-letter ISO code"));
        }

        let id = Uuid::new_v4();
        let now = Utc::now();
        let number = match req.number.map(|n| n.trim().to_uppercase()) {
            Some(n) if !n.is_empty() => n,
            _ => format!(
                "INV-{}-{}",
                now.format("%Y%m%d"),
                &id.simple().to_string()[..8].to_uppercase()
            ),
        };
        let taken = self
            .invoice_repo
            .count(&[
                FilterField::eq("hospital_id", hospital_id),
                FilterField::eq("number", &number),
            ])
            .await?;
        if taken > 0 {
            return Err(AppError::conflict(format!("Invoice number {number} is already used")));
        }

        let invoice = Invoice {
            id,
            hospital_id,
            patient_id: req.patient_id,
            number,
            amount_cents: req.amount_cents,
            currency,
            status: if req.issue {
                InvoiceStatus::Issued
            } else {
                InvoiceStatus::Draft
            },
            billing_email: req.billing_email.map(|e| e.trim().to_string()),
            last_sent_to: None,
            last_sent_at: None,
            created_by: ctx.caller_id(),
            created_at: now,
            updated_at: now,
        };
        let invoice = self.invoice_repo.create(&invoice).await?;

        self.audit
            .record(ctx, AuditEvent::new("invoice.create", "invoice").target(invoice.id))
            .await;
        info!(invoice_id = %invoice.id, number = %invoice.number, "Invoice created");
        Ok(invoice)
    }

    /// Mail the invoice to `email`. A draft becomes issued once sent.
    /// The address is expected to be validated by the caller.
    pub async fn send_to(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        email: &str,
    ) -> Result<Invoice, AppError> {
        let mut invoice = find_scoped(&self.invoice_repo, ctx, id).await?;
        if invoice.status == InvoiceStatus::Void {
            return Err(AppError::conflict("A void invoice cannot be sent"));
        }

        self.mailer
            .send(&MailMessage {
                to: email.to_string(),
                subject: format!("Invoice {}", invoice.number),
                body: format!(
                    "Invoice {} issued on {}\nAmount due: {}\n",
                    invoice.number,
                    invoice.created_at.format("%Y-%m-%d"),
                    invoice.display_amount()
                ),
            })
            .await?;

        let now = Utc::now();
        if invoice.status == InvoiceStatus::Draft {
            invoice.status = InvoiceStatus::Issued;
        }
        invoice.last_sent_to = Some(email.to_string());
        invoice.last_sent_at = Some(now);
        invoice.updated_at = now;
        let invoice = self.invoice_repo.update(&invoice).await?;

        self.audit
            .record(
                ctx,
                AuditEvent::new("invoice.send", "invoice")
                    .target(id)
                    .details(serde_json::json!({ "to": email })),
            )
            .await;
        info!(invoice_id = %id, "Invoice sent");
        Ok(invoice)
    }
}
