//! Query-string DTOs. Parameter names are camelCase on the wire.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use carehub_core::error::AppError;
use carehub_core::result::AppResult;
use carehub_entity::appointment::AppointmentStatus;
use carehub_entity::discharge::DischargeStatus;
use carehub_entity::invoice::InvoiceStatus;
use carehub_entity::lab::LabOrderStatus;
use carehub_entity::prescription::PrescriptionStatus;
use carehub_entity::treatment::TreatmentPlanStatus;
use carehub_service::ExportFormat;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HospitalListQuery {
    pub name: Option<String>,
    pub city: Option<String>,
    pub active: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchQuery {
    pub search: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentListQuery {
    pub status: Option<AppointmentStatus>,
    pub patient_id: Option<Uuid>,
    pub practitioner_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabOrderListQuery {
    pub status: Option<LabOrderStatus>,
    pub patient_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrescriptionListQuery {
    pub status: Option<PrescriptionStatus>,
    pub patient_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreatmentPlanListQuery {
    pub status: Option<TreatmentPlanStatus>,
    pub patient_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DischargeListQuery {
    pub status: Option<DischargeStatus>,
    pub patient_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceListQuery {
    pub status: Option<InvoiceStatus>,
    pub patient_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditListQuery {
    pub action: Option<String>,
    pub actor_id: Option<Uuid>,
    pub target_type: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoleQuery {
    pub role: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationListQuery {
    #[serde(default)]
    pub unread_only: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlagScopeQuery {
    pub hospital_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmailQuery {
    pub email: Option<String>,
}

/// `format` of an export request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportQuery {
    pub format: Option<String>,
}

impl ExportQuery {
    /// The requested format; missing or unknown values are rejected.
    pub fn format(&self) -> AppResult<ExportFormat> {
        self.format
            .as_deref()
            .ok_or_else(|| AppError::validation("The 'format' query parameter is required"))?
            .parse()
    }
}
