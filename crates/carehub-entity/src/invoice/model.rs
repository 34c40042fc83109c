//! Invoice entity model.

use carehub_core::traits::Entity;
use carehub_core::types::SortField;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use uuid::Uuid;

/// Status of an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "invoice_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvoiceStatus {
    /// Not yet issued.
    Draft,
    /// Issued to the payer.
    Issued,
    /// Settled.
    Paid,
    /// Voided; can no longer be sent.
    Void,
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Draft => "DRAFT",
            Self::Issued => "ISSUED",
            Self::Paid => "PAID",
            Self::Void => "VOID",
        };
        f.write_str(s)
    }
}

/// A bill for services rendered to a patient.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Invoice {
    /// Unique invoice identifier.
    pub id: Uuid,
    /// Owning hospital.
    pub hospital_id: Uuid,
    /// The billed patient.
    pub patient_id: Uuid,
    /// Human-facing invoice number, unique per hospital.
    pub number: String,
    /// Amount in minor currency units.
    pub amount_cents: i64,
    /// ISO 4217 currency code.
    pub currency: String,
    /// Current status.
    pub status: InvoiceStatus,
    /// Default recipient for invoice mail.
    pub billing_email: Option<String>,
    /// Last address the invoice was sent to.
    pub last_sent_to: Option<String>,
    /// When the invoice was last sent.
    pub last_sent_at: Option<DateTime<Utc>>,
    /// The billing specialist who created it.
    pub created_by: Uuid,
    /// When the invoice was created.
    pub created_at: DateTime<Utc>,
    /// When the invoice was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Invoice {
    /// Amount formatted as `12.34 EUR`.
    pub fn display_amount(&self) -> String {
        let sign = if self.amount_cents < 0 { "-" } else { "" };
        let abs = self.amount_cents.unsigned_abs();
        format!("{sign}{}.{:02} {}", abs / 100, abs % 100, self.currency)
    }
}

impl Entity for Invoice {
    const TABLE: &'static str = "invoices";
    const COLUMNS: &'static [&'static str] =
        &["id", "hospital_id", "patient_id", "number", "status"];
    const ORDER_BY: SortField = SortField::desc("created_at");

    fn id(&self) -> Uuid {
        self.id
    }
}
