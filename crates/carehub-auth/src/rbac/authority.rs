//! Granted authorities.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use carehub_core::error::AppError;

/// An authority granted to an account.
///
/// Canonical names are bare upper-case (`DOCTOR`). Parsing also accepts the
/// `ROLE_` prefix and any letter case, so tokens minted by older clients
/// keep working.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Authority {
    SuperAdmin,
    HospitalAdmin,
    Doctor,
    Nurse,
    LabTechnician,
    Pharmacist,
    Receptionist,
    BillingSpecialist,
    Patient,
}

impl Authority {
    /// Every authority, in declaration order.
    pub const ALL: [Authority; 9] = [
        Self::SuperAdmin,
        Self::HospitalAdmin,
        Self::Doctor,
        Self::Nurse,
        Self::LabTechnician,
        Self::Pharmacist,
        Self::Receptionist,
        Self::BillingSpecialist,
        Self::Patient,
    ];

    /// Canonical name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SuperAdmin => "SUPER_ADMIN",
            Self::HospitalAdmin => "HOSPITAL_ADMIN",
            Self::Doctor => "DOCTOR",
            Self::Nurse => "NURSE",
            Self::LabTechnician => "LAB_TECHNICIAN",
            Self::Pharmacist => "PHARMACIST",
            Self::Receptionist => "RECEPTIONIST",
            Self::BillingSpecialist => "BILLING_SPECIALIST",
            Self::Patient => "PATIENT",
        }
    }
}

impl fmt::Display for Authority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Authority {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        let name = upper.strip_prefix("ROLE_").unwrap_or(&upper);
        Self::ALL
            .into_iter()
            .find(|a| a.as_str() == name)
            .ok_or_else(|| AppError::validation(format!("Unknown authority '{s}'")))
    }
}
