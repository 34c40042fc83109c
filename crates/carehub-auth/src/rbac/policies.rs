//! Route policy table.
//!
//! Each constant is attached to one or more routes when the router is
//! built. Names follow `<resource>_<operation>`.

use super::authority::Authority::{self, *};
use super::policy::AccessPolicy;

const ADMINS: &[Authority] = &[SuperAdmin, HospitalAdmin];

/// Any authenticated caller.
pub const AUTHENTICATED: AccessPolicy = AccessPolicy::authenticated("authenticated");

pub const ACCOUNT_CREATE: AccessPolicy = AccessPolicy::any_of("account.create", &[SuperAdmin]);

pub const HOSPITAL_CREATE: AccessPolicy = AccessPolicy::any_of("hospital.create", &[SuperAdmin]);
pub const HOSPITAL_UPDATE: AccessPolicy = AccessPolicy::any_of("hospital.update", ADMINS);
pub const HOSPITAL_DELETE: AccessPolicy = AccessPolicy::any_of("hospital.delete", &[SuperAdmin]);
pub const HOSPITAL_IMPORT: AccessPolicy = AccessPolicy::any_of("hospital.import", &[SuperAdmin]);

pub const ANNOUNCEMENT_MANAGE: AccessPolicy = AccessPolicy::any_of("announcement.manage", ADMINS);

pub const APPOINTMENT_READ: AccessPolicy = AccessPolicy::any_of(
    "appointment.read",
    &[HospitalAdmin, Doctor, Nurse, Receptionist],
);
pub const APPOINTMENT_CREATE: AccessPolicy = AccessPolicy::any_of(
    "appointment.create",
    &[Doctor, Nurse, Receptionist, Patient],
);
pub const APPOINTMENT_STATUS: AccessPolicy =
    AccessPolicy::any_of("appointment.status", &[Doctor, Nurse, Receptionist]);
pub const APPOINTMENT_DELETE: AccessPolicy =
    AccessPolicy::any_of("appointment.delete", &[HospitalAdmin, Receptionist]);

pub const LAB_ORDER_READ: AccessPolicy =
    AccessPolicy::any_of("lab_order.read", &[Doctor, Nurse, LabTechnician]);
pub const LAB_ORDER_CREATE: AccessPolicy = AccessPolicy::any_of("lab_order.create", &[Doctor]);
pub const LAB_ORDER_RESULT: AccessPolicy =
    AccessPolicy::any_of("lab_order.result", &[LabTechnician]);
pub const LAB_ORDER_CANCEL: AccessPolicy = AccessPolicy::any_of("lab_order.cancel", &[Doctor]);
pub const LAB_ORDER_EXPORT: AccessPolicy =
    AccessPolicy::any_of("lab_order.export", &[Doctor, HospitalAdmin]);

pub const PRESCRIPTION_READ: AccessPolicy =
    AccessPolicy::any_of("prescription.read", &[Doctor, Nurse, Pharmacist]);
pub const PRESCRIPTION_WRITE: AccessPolicy =
    AccessPolicy::any_of("prescription.write", &[Doctor]);

pub const TREATMENT_PLAN_READ: AccessPolicy =
    AccessPolicy::any_of("treatment_plan.read", &[Doctor, Nurse]);
pub const TREATMENT_PLAN_WRITE: AccessPolicy =
    AccessPolicy::any_of("treatment_plan.write", &[Doctor]);
pub const TREATMENT_PLAN_DELETE: AccessPolicy =
    AccessPolicy::any_of("treatment_plan.delete", &[Doctor, HospitalAdmin]);

pub const DISCHARGE_REQUEST: AccessPolicy =
    AccessPolicy::any_of("discharge.request", &[Doctor, Nurse]);
pub const DISCHARGE_READ: AccessPolicy =
    AccessPolicy::any_of("discharge.read", &[Doctor, Nurse, HospitalAdmin]);
pub const DISCHARGE_DECIDE: AccessPolicy =
    AccessPolicy::any_of("discharge.decide", &[Doctor, HospitalAdmin]);

pub const PERMISSION_MANAGE: AccessPolicy =
    AccessPolicy::any_of("permission.manage", &[SuperAdmin]);

pub const AUDIT_READ: AccessPolicy = AccessPolicy::any_of("audit.read", ADMINS);

pub const FEATURE_FLAG_MANAGE: AccessPolicy =
    AccessPolicy::any_of("feature_flag.manage", &[SuperAdmin]);

pub const INVOICE_READ: AccessPolicy =
    AccessPolicy::any_of("invoice.read", &[BillingSpecialist, HospitalAdmin]);
pub const INVOICE_CREATE: AccessPolicy =
    AccessPolicy::any_of("invoice.create", &[BillingSpecialist]);
pub const INVOICE_SEND: AccessPolicy =
    AccessPolicy::any_of("invoice.send", &[BillingSpecialist, HospitalAdmin]);
