//! The set of repositories the services are built from.

use std::sync::Arc;

use sqlx::PgPool;

use carehub_core::traits::Repository;
use carehub_entity::announcement::Announcement;
use carehub_entity::appointment::Appointment;
use carehub_entity::audit::AuditLogEntry;
use carehub_entity::discharge::DischargeApproval;
use carehub_entity::feature_flag::FeatureFlag;
use carehub_entity::hospital::Hospital;
use carehub_entity::invoice::Invoice;
use carehub_entity::lab::LabOrder;
use carehub_entity::notification::Notification;
use carehub_entity::permission::RolePermission;
use carehub_entity::prescription::Prescription;
use carehub_entity::staff::{PasswordResetToken, StaffAccount, StaffAssignment};
use carehub_entity::treatment::TreatmentPlan;

use crate::repository::{MemoryRepository, PgRepository};

/// Shared handle to a repository of `E`.
pub type Repo<E> = Arc<dyn Repository<E>>;

/// One repository per entity, all on the same backend.
#[derive(Debug, Clone)]
pub struct Repositories {
    pub hospitals: Repo<Hospital>,
    pub staff: Repo<StaffAccount>,
    pub assignments: Repo<StaffAssignment>,
    pub reset_tokens: Repo<PasswordResetToken>,
    pub announcements: Repo<Announcement>,
    pub appointments: Repo<Appointment>,
    pub lab_orders: Repo<LabOrder>,
    pub prescriptions: Repo<Prescription>,
    pub treatment_plans: Repo<TreatmentPlan>,
    pub discharge_approvals: Repo<DischargeApproval>,
    pub role_permissions: Repo<RolePermission>,
    pub audit_log: Repo<AuditLogEntry>,
    pub feature_flags: Repo<FeatureFlag>,
    pub notifications: Repo<Notification>,
    pub invoices: Repo<Invoice>,
}

impl Repositories {
    /// Repositories over a PostgreSQL pool.
    pub fn postgres(pool: PgPool) -> Self {
        fn pg<E>(pool: &PgPool) -> Repo<E>
        where
            E: carehub_core::traits::Entity
                + for<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow>
                + Unpin,
        {
            Arc::new(PgRepository::<E>::new(pool.clone()))
        }

        Self {
            hospitals: pg(&pool),
            staff: pg(&pool),
            assignments: pg(&pool),
            reset_tokens: pg(&pool),
            announcements: pg(&pool),
            appointments: pg(&pool),
            lab_orders: pg(&pool),
            prescriptions: pg(&pool),
            treatment_plans: pg(&pool),
            discharge_approvals: pg(&pool),
            role_permissions: pg(&pool),
            audit_log: pg(&pool),
            feature_flags: pg(&pool),
            notifications: pg(&pool),
            invoices: pg(&pool),
        }
    }

    /// Empty in-memory repositories.
    pub fn in_memory() -> Self {
        fn mem<E: carehub_core::traits::Entity>() -> Repo<E> {
            Arc::new(MemoryRepository::<E>::new())
        }

        Self {
            hospitals: mem(),
            staff: mem(),
            assignments: mem(),
            reset_tokens: mem(),
            announcements: mem(),
            appointments: mem(),
            lab_orders: mem(),
            prescriptions: mem(),
            treatment_plans: mem(),
            discharge_approvals: mem(),
            role_permissions: mem(),
            audit_log: mem(),
            feature_flags: mem(),
            notifications: mem(),
            invoices: mem(),
        }
    }
}
