//! Hospital announcements.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use carehub_core::error::AppError;
use carehub_core::types::{FilterField, PageRequest, PageResponse};
use carehub_database::Repo;
use carehub_entity::announcement::Announcement;

use crate::audit::{AuditEvent, AuditService};
use crate::context::RequestContext;
use crate::scope::{find_scoped, hospital_filter};

/// Data for writing an announcement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnouncementRequest {
    pub title: String,
    pub body: String,
}

/// Manages announcements of the caller's hospital.
#[derive(Debug, Clone)]
pub struct AnnouncementService {
    announcement_repo: Repo<Announcement>,
    audit: Arc<AuditService>,
}

impl AnnouncementService {
    /// Creates a new announcement service.
    pub fn new(announcement_repo: Repo<Announcement>, audit: Arc<AuditService>) -> Self {
        Self {
            announcement_repo,
            audit,
        }
    }

    /// Newest announcements first, optionally matching `search` in the title.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        search: Option<&str>,
        page: &PageRequest,
    ) -> Result<PageResponse<Announcement>, AppError> {
        let mut filters = hospital_filter(ctx)?;
        if let Some(term) = search.map(str::trim).filter(|t| !t.is_empty()) {
            filters.push(FilterField::contains("title", term));
        }
        self.announcement_repo.find_all(&filters, page).await
    }

    pub async fn get(&self, ctx: &RequestContext, id: Uuid) -> Result<Announcement, AppError> {
        find_scoped(&self.announcement_repo, ctx, id).await
    }

    pub async fn create(
        &self,
        ctx: &RequestContext,
        req: AnnouncementRequest,
    ) -> Result<Announcement, AppError> {
        validate(&req)?;
        let now = Utc::now();
        let announcement = Announcement {
            id: Uuid::new_v4(),
            hospital_id: ctx.hospital()?,
            title: req.title.trim().to_string(),
            body: req.body,
            author_id: ctx.caller_id(),
            created_at: now,
            updated_at: now,
        };
        let announcement = self.announcement_repo.create(&announcement).await?;

        self.audit
            .record(
                ctx,
                AuditEvent::new("announcement.create", "announcement").target(announcement.id),
            )
            .await;
        info!(
            announcement_id = %announcement.id,
            hospital_id = %announcement.hospital_id,
            "Announcement published"
        );
        Ok(announcement)
    }

    /// Only the author, or a super admin, may edit.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        req: AnnouncementRequest,
    ) -> Result<Announcement, AppError> {
        validate(&req)?;
        let mut announcement = find_scoped(&self.announcement_repo, ctx, id).await?;
        ctx.identity.require_owner(announcement.author_id)?;

        announcement.title = req.title.trim().to_string();
        announcement.body = req.body;
        announcement.updated_at = Utc::now();
        let announcement = self.announcement_repo.update(&announcement).await?;

        self.audit
            .record(ctx, AuditEvent::new("announcement.update", "announcement").target(id))
            .await;
        Ok(announcement)
    }

    pub async fn delete(&self, ctx: &RequestContext, id: Uuid) -> Result<(), AppError> {
        find_scoped(&self.announcement_repo, ctx, id).await?;
        self.announcement_repo.delete(id).await?;

        self.audit
            .record(ctx, AuditEvent::new("announcement.delete", "announcement").target(id))
            .await;
        info!(announcement_id = %id, "Announcement deleted");
        Ok(())
    }
}

fn validate(req: &AnnouncementRequest) -> Result<(), AppError> {
    if req.title.trim().is_empty() {
        return Err(AppError::validation("Title cannot be empty"));
    }
    if req.body.trim().is_empty() {
        return Err(AppError::validation("Body cannot be empty"));
    }
    Ok(())
}
