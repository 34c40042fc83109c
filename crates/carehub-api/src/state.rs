//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use carehub_auth::{JwtDecoder, JwtEncoder, PasswordHasher, PasswordValidator};
use carehub_core::config::AppConfig;
use carehub_database::{DatabasePool, Repositories};
use carehub_service::{
    AccountService, AnnouncementService, AppointmentService, AuditService, DischargeService,
    FeatureFlagService, HospitalService, InvoiceService, LabOrderService, Mailer,
    NotificationService, PermissionService, PrescriptionService, RecoveryService,
    TreatmentPlanService,
};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Infrastructure ───────────────────────────────────────
    /// PostgreSQL pool; `None` on the in-memory backend
    pub database: Option<DatabasePool>,

    // ── Auth ─────────────────────────────────────────────────
    /// JWT token decoder and validator
    pub jwt_decoder: Arc<JwtDecoder>,

    // ── Services ─────────────────────────────────────────────
    pub account_service: Arc<AccountService>,
    pub recovery_service: Arc<RecoveryService>,
    pub audit_service: Arc<AuditService>,
    pub notification_service: Arc<NotificationService>,
    pub hospital_service: Arc<HospitalService>,
    pub announcement_service: Arc<AnnouncementService>,
    pub appointment_service: Arc<AppointmentService>,
    pub lab_order_service: Arc<LabOrderService>,
    pub prescription_service: Arc<PrescriptionService>,
    pub treatment_plan_service: Arc<TreatmentPlanService>,
    pub discharge_service: Arc<DischargeService>,
    pub permission_service: Arc<PermissionService>,
    pub feature_flag_service: Arc<FeatureFlagService>,
    pub invoice_service: Arc<InvoiceService>,
}

impl AppState {
    /// Wire every service from the repositories and configuration.
    pub fn build(
        config: AppConfig,
        repos: Repositories,
        database: Option<DatabasePool>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        let jwt_encoder = Arc::new(JwtEncoder::new(&config.auth));
        let jwt_decoder = Arc::new(JwtDecoder::new(&config.auth));
        let password_hasher = Arc::new(PasswordHasher::new());
        let password_validator = Arc::new(PasswordValidator::new(&config.auth));

        let audit_service = Arc::new(AuditService::new(repos.audit_log.clone()));
        let notification_service = Arc::new(NotificationService::new(repos.notifications.clone()));

        let account_service = Arc::new(AccountService::new(
            repos.staff.clone(),
            repos.assignments.clone(),
            repos.hospitals.clone(),
            jwt_encoder,
            Arc::clone(&jwt_decoder),
            Arc::clone(&password_hasher),
            Arc::clone(&password_validator),
            Arc::clone(&audit_service),
        ));
        let recovery_service = Arc::new(RecoveryService::new(
            repos.staff.clone(),
            repos.reset_tokens.clone(),
            password_hasher,
            password_validator,
            Arc::clone(&mailer),
            Arc::clone(&audit_service),
            &config.auth,
            &config.mail,
        ));

        let hospital_service = Arc::new(HospitalService::new(
            repos.hospitals.clone(),
            Arc::clone(&audit_service),
        ));
        let announcement_service = Arc::new(AnnouncementService::new(
            repos.announcements.clone(),
            Arc::clone(&audit_service),
        ));
        let appointment_service = Arc::new(AppointmentService::new(
            repos.appointments.clone(),
            Arc::clone(&audit_service),
        ));
        let lab_order_service = Arc::new(LabOrderService::new(
            repos.lab_orders.clone(),
            Arc::clone(&notification_service),
            Arc::clone(&audit_service),
        ));
        let prescription_service = Arc::new(PrescriptionService::new(
            repos.prescriptions.clone(),
            Arc::clone(&audit_service),
        ));
        let treatment_plan_service = Arc::new(TreatmentPlanService::new(
            repos.treatment_plans.clone(),
            Arc::clone(&audit_service),
        ));
        let discharge_service = Arc::new(DischargeService::new(
            repos.discharge_approvals.clone(),
            Arc::clone(&notification_service),
            Arc::clone(&audit_service),
        ));
        let permission_service = Arc::new(PermissionService::new(
            repos.role_permissions.clone(),
            Arc::clone(&audit_service),
        ));
        let feature_flag_service = Arc::new(FeatureFlagService::new(
            repos.feature_flags.clone(),
            Arc::clone(&audit_service),
        ));
        let invoice_service = Arc::new(InvoiceService::new(
            repos.invoices.clone(),
            mailer,
            Arc::clone(&audit_service),
        ));

        Self {
            config: Arc::new(config),
            database,
            jwt_decoder,
            account_service,
            recovery_service,
            audit_service,
            notification_service,
            hospital_service,
            announcement_service,
            appointment_service,
            lab_order_service,
            prescription_service,
            treatment_plan_service,
            discharge_service,
            permission_service,
            feature_flag_service,
            invoice_service,
        }
    }
}
