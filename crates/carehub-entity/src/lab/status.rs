//! Lab order lifecycle.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of a lab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "lab_order_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LabOrderStatus {
    /// Ordered, specimen not yet processed.
    Pending,
    /// Being processed.
    InProgress,
    /// A preliminary result is available.
    Preliminary,
    /// Final result recorded.
    Final,
    /// Cancelled by the ordering doctor.
    Cancelled,
}

impl LabOrderStatus {
    /// Whether a (new) result can still be recorded.
    pub fn accepts_result(&self) -> bool {
        matches!(self, Self::Pending | Self::InProgress | Self::Preliminary)
    }

    /// Whether the order can still be cancelled.
    pub fn is_cancellable(&self) -> bool {
        matches!(self, Self::Pending | Self::InProgress | Self::Preliminary)
    }

    /// Return the status as its wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::InProgress => "IN_PROGRESS",
            Self::Preliminary => "PRELIMINARY",
            Self::Final => "FINAL",
            Self::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for LabOrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
