//! # carehub-service
//!
//! Business logic service layer for CareHub. Each service owns the
//! repositories it needs and implements the use cases of one resource
//! group. Handlers call exactly one service method per request.
//!
//! Services follow constructor injection: all dependencies are provided at
//! construction time via `Arc` references.

pub mod account;
pub mod announcement;
pub mod appointment;
pub mod audit;
pub mod context;
pub mod discharge;
pub mod export;
pub mod feature_flag;
pub mod hospital;
pub mod invoice;
pub mod lab;
pub mod mail;
pub mod notification;
pub mod permission;
pub mod prescription;
pub mod recovery;
mod scope;
pub mod treatment;

#[cfg(test)]
mod testing;

pub use account::AccountService;
pub use announcement::AnnouncementService;
pub use appointment::AppointmentService;
pub use audit::AuditService;
pub use context::{ActingAs, RequestContext, RequestMeta};
pub use discharge::DischargeService;
pub use export::{ExportDocument, ExportFormat};
pub use feature_flag::FeatureFlagService;
pub use hospital::HospitalService;
pub use invoice::InvoiceService;
pub use lab::LabOrderService;
pub use mail::{LogMailer, MailMessage, Mailer};
pub use notification::NotificationService;
pub use permission::PermissionService;
pub use prescription::PrescriptionService;
pub use recovery::RecoveryService;
pub use treatment::TreatmentPlanService;
