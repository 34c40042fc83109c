//! Announcement entity model.

use carehub_core::traits::Entity;
use carehub_core::types::SortField;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A notice posted to every staff member of a hospital.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Announcement {
    /// Unique announcement identifier.
    pub id: Uuid,
    /// Owning hospital.
    pub hospital_id: Uuid,
    /// Headline.
    pub title: String,
    /// Body text.
    pub body: String,
    /// The account that posted it.
    pub author_id: Uuid,
    /// When the announcement was posted.
    pub created_at: DateTime<Utc>,
    /// When the announcement was last edited.
    pub updated_at: DateTime<Utc>,
}

impl Entity for Announcement {
    const TABLE: &'static str = "announcements";
    const COLUMNS: &'static [&'static str] = &["id", "hospital_id", "author_id", "title"];
    const ORDER_BY: SortField = SortField::desc("created_at");

    fn id(&self) -> Uuid {
        self.id
    }
}
