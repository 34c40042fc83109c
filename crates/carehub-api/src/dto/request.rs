//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;
use validator::Validate;

use carehub_auth::Authority;
use carehub_entity::appointment::AppointmentStatus;
use carehub_service::account::{AssignmentView, CreateAccountRequest};
use carehub_service::announcement::AnnouncementRequest;
use carehub_service::hospital::{CreateHospitalRequest, UpdateHospitalRequest};

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Username.
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Token refresh request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RefreshRequest {
    /// Refresh token.
    #[validate(length(min = 1))]
    pub refresh_token: String,
}

/// Body of the password-reset and username-reminder requests.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct EmailRequest {
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
}

/// Completes a password reset.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PasswordResetConfirmRequest {
    /// Token from the reset mail.
    #[validate(length(min = 1))]
    pub token: String,
    #[validate(length(min = 1))]
    pub new_password: String,
}

/// Create account request (super admin).
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateAccountBody {
    #[validate(length(min = 3, max = 64))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(max = 255))]
    pub display_name: Option<String>,
    #[validate(length(min = 1))]
    pub password: String,
    #[validate(length(min = 1, message = "At least one authority is required"))]
    pub authorities: Vec<Authority>,
    #[serde(default)]
    pub assignments: Vec<AssignmentView>,
}

impl From<CreateAccountBody> for CreateAccountRequest {
    fn from(body: CreateAccountBody) -> Self {
        Self {
            username: body.username,
            email: body.email,
            display_name: body.display_name,
            password: body.password,
            authorities: body.authorities,
            assignments: body.assignments,
        }
    }
}

/// Create hospital request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateHospitalBody {
    #[validate(length(min = 1, max = 32))]
    pub code: String,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub city: Option<String>,
    pub phone: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
}

impl From<CreateHospitalBody> for CreateHospitalRequest {
    fn from(body: CreateHospitalBody) -> Self {
        Self {
            code: body.code,
            name: body.name,
            city: body.city,
            phone: body.phone,
            email: body.email,
        }
    }
}

/// Partial hospital update.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateHospitalBody {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub city: Option<String>,
    pub phone: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub active: Option<bool>,
}

impl From<UpdateHospitalBody> for UpdateHospitalRequest {
    fn from(body: UpdateHospitalBody) -> Self {
        Self {
            name: body.name,
            city: body.city,
            phone: body.phone,
            email: body.email,
            active: body.active,
        }
    }
}

/// Announcement create/update body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AnnouncementBody {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1))]
    pub body: String,
}

impl From<AnnouncementBody> for AnnouncementRequest {
    fn from(body: AnnouncementBody) -> Self {
        Self {
            title: body.title,
            body: body.body,
        }
    }
}

/// Client-reported audit event.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AuditEventBody {
    #[validate(length(min = 1, max = 100))]
    pub action: String,
    #[validate(length(min = 1, max = 100))]
    pub target_type: String,
    pub target_id: Option<Uuid>,
    pub details: Option<Value>,
    /// Address of the end user when the event is relayed by another system.
    pub client_ip: Option<String>,
}

/// Appointment status change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentStatusBody {
    pub status: AppointmentStatus,
    pub notes: Option<String>,
}

/// Optional free-text reason for a workflow step.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ReasonBody {
    #[validate(length(max = 1000))]
    pub reason: Option<String>,
}

/// Optional note attached to a discharge decision.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct DecisionBody {
    #[validate(length(max = 1000))]
    pub note: Option<String>,
}

/// Grant a permission to a role.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct GrantPermissionBody {
    pub role: Authority,
    #[validate(length(min = 1, max = 100))]
    pub permission: String,
}
