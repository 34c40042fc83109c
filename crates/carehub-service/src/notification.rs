//! In-app notifications for the calling account.

use chrono::Utc;
use tracing::{error, info};
use uuid::Uuid;

use carehub_core::error::AppError;
use carehub_core::types::{FilterField, PageRequest, PageResponse};
use carehub_database::Repo;
use carehub_entity::notification::Notification;

use crate::context::RequestContext;

/// Reads and updates the caller's own notifications.
#[derive(Debug, Clone)]
pub struct NotificationService {
    notification_repo: Repo<Notification>,
}

impl NotificationService {
    /// Creates a new notification service.
    pub fn new(notification_repo: Repo<Notification>) -> Self {
        Self { notification_repo }
    }

    /// Deliver a notification. Failures are logged, not returned.
    pub async fn notify(
        &self,
        recipient_id: Uuid,
        hospital_id: Option<Uuid>,
        title: impl Into<String>,
        message: impl Into<String>,
    ) {
        let notification = Notification {
            id: Uuid::new_v4(),
            recipient_id,
            hospital_id,
            title: title.into(),
            message: message.into(),
            read_at: None,
            created_at: Utc::now(),
        };
        if let Err(e) = self.notification_repo.create(&notification).await {
            error!(recipient_id = %recipient_id, error = %e, "Failed to store notification");
        }
    }

    /// The caller's notifications, newest first.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        unread_only: bool,
        page: &PageRequest,
    ) -> Result<PageResponse<Notification>, AppError> {
        let mut filters = vec![FilterField::eq("recipient_id", ctx.caller_id())];
        if unread_only {
            filters.push(FilterField::is_null("read_at"));
        }
        self.notification_repo.find_all(&filters, page).await
    }

    /// Number of unread notifications.
    pub async fn unread_count(&self, ctx: &RequestContext) -> Result<u64, AppError> {
        self.notification_repo
            .count(&[
                FilterField::eq("recipient_id", ctx.caller_id()),
                FilterField::is_null("read_at"),
            ])
            .await
    }

    /// Mark one notification as read.
    pub async fn mark_read(&self, ctx: &RequestContext, id: Uuid) -> Result<Notification, AppError> {
        let mut notification = self.find_own(ctx, id).await?;
        if notification.is_unread() {
            notification.read_at = Some(Utc::now());
            notification = self.notification_repo.update(&notification).await?;
        }
        Ok(notification)
    }

    /// Mark every unread notification as read. Returns how many changed.
    pub async fn mark_all_read(&self, ctx: &RequestContext) -> Result<u64, AppError> {
        let unread = self
            .notification_repo
            .list(&[
                FilterField::eq("recipient_id", ctx.caller_id()),
                FilterField::is_null("read_at"),
            ])
            .await?;

        let now = Utc::now();
        for mut notification in unread.iter().cloned() {
            notification.read_at = Some(now);
            self.notification_repo.update(&notification).await?;
        }

        info!(user_id = %ctx.caller_id(), count = unread.len(), "Notifications marked read");
        Ok(unread.len() as u64)
    }

    /// Delete one notification.
    pub async fn delete(&self, ctx: &RequestContext, id: Uuid) -> Result<(), AppError> {
        self.find_own(ctx, id).await?;
        self.notification_repo.delete(id).await?;
        Ok(())
    }

    async fn find_own(&self, ctx: &RequestContext, id: Uuid) -> Result<Notification, AppError> {
        self.notification_repo
            .find_by_id(id)
            .await?
            .filter(|n| n.recipient_id == ctx.caller_id())
            .ok_or_else(|| AppError::not_found("Notification not found"))
    }
}
