//! Per-request context handed to every service call.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use carehub_auth::{Authority, CallerIdentity};
use carehub_core::error::AppError;
use carehub_core::result::AppResult;
use carehub_core::types::Locale;

/// Whether the caller acts as staff or as a patient for this request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActingAs {
    /// Acting on behalf of a hospital.
    #[default]
    Staff,
    /// Acting on one's own patient record.
    Patient,
}

impl fmt::Display for ActingAs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Staff => f.write_str("STAFF"),
            Self::Patient => f.write_str("PATIENT"),
        }
    }
}

impl FromStr for ActingAs {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "STAFF" => Ok(Self::Staff),
            "PATIENT" => Ok(Self::Patient),
            other => Err(AppError::validation(format!(
                "Unsupported acting-as mode '{other}'; expected STAFF or PATIENT"
            ))),
        }
    }
}

impl ActingAs {
    /// Mode a caller may use, given the `X-Act-As` value if one was sent.
    ///
    /// Callers holding only `PATIENT` always act as patients, header or
    /// not. `PATIENT` mode requires the `PATIENT` authority.
    pub fn for_caller(requested: Option<Self>, identity: &CallerIdentity) -> AppResult<Self> {
        let is_patient = identity.has_authority(Authority::Patient);
        let is_staff = identity
            .authorities
            .iter()
            .any(|&a| a != Authority::Patient);

        match requested {
            Some(Self::Patient) if !is_patient => {
                Err(AppError::authorization("Access is denied"))
            }
            Some(Self::Staff) if is_patient && !is_staff => {
                Err(AppError::authorization("Patients cannot act as staff"))
            }
            Some(mode) => Ok(mode),
            None if is_patient && !is_staff => Ok(Self::Patient),
            None => Ok(Self::Staff),
        }
    }
}

/// What is known about a request before (or without) authentication.
#[derive(Debug, Clone)]
pub struct RequestMeta {
    /// Negotiated locale.
    pub locale: Locale,
    /// Client IP as resolved from proxy headers or the socket.
    pub client_ip: String,
    /// User-Agent header value.
    pub user_agent: Option<String>,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestMeta {
    /// Creates request metadata stamped with the current time.
    pub fn new(locale: Locale, client_ip: String, user_agent: Option<String>) -> Self {
        Self {
            locale,
            client_ip,
            user_agent,
            request_time: Utc::now(),
        }
    }
}

/// Context for an authenticated request.
///
/// Assembled by the API layer after the authorization gate has run. Never
/// persisted.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// The authenticated caller.
    pub identity: CallerIdentity,
    /// Locale, client IP and user agent.
    pub meta: RequestMeta,
    /// Resolved hospital, for hospital-scoped routes.
    pub hospital_id: Option<Uuid>,
    /// Acting-as mode from `X-Act-As`.
    pub acting_as: ActingAs,
    /// Role selected with `X-Role-Code`.
    pub active_role: Option<Authority>,
}

impl RequestContext {
    /// Context without hospital scope.
    pub fn new(identity: CallerIdentity, meta: RequestMeta) -> Self {
        Self {
            identity,
            meta,
            hospital_id: None,
            acting_as: ActingAs::Staff,
            active_role: None,
        }
    }

    /// Copy of this context scoped to `hospital_id`.
    pub fn scoped_to(mut self, hospital_id: Uuid) -> Self {
        self.hospital_id = Some(hospital_id);
        self
    }

    /// The caller's account ID.
    pub fn caller_id(&self) -> Uuid {
        self.identity.subject
    }

    /// The resolved hospital, or the error explaining how to supply one.
    pub fn hospital(&self) -> AppResult<Uuid> {
        self.hospital_id.ok_or_else(missing_hospital_context)
    }

    /// Whether the caller acts as a patient.
    pub fn is_acting_as_patient(&self) -> bool {
        self.acting_as == ActingAs::Patient
    }
}

/// Error returned when no hospital context could be determined.
pub fn missing_hospital_context() -> AppError {
    AppError::authorization(
        "No hospital context: supply the 'hospitalId' query parameter, the 'X-Hospital-Id' \
         header, a 'hospitalId' token claim, or hold a staff assignment",
    )
}
