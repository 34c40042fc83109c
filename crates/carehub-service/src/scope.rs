//! Hospital scoping for clinical records.

use uuid::Uuid;

use carehub_core::error::AppError;
use carehub_core::result::AppResult;
use carehub_core::traits::Entity;
use carehub_core::types::FilterField;
use carehub_database::Repo;
use carehub_entity::announcement::Announcement;
use carehub_entity::appointment::Appointment;
use carehub_entity::discharge::DischargeApproval;
use carehub_entity::invoice::Invoice;
use carehub_entity::lab::LabOrder;
use carehub_entity::prescription::Prescription;
use carehub_entity::treatment::TreatmentPlan;

use crate::context::RequestContext;

/// A record owned by one hospital.
pub(crate) trait HospitalOwned: Entity {
    /// Name used in not-found messages.
    const LABEL: &'static str;

    fn hospital_id(&self) -> Uuid;
}

/// Load a record of the caller's hospital. Records of other hospitals are
/// reported exactly like missing ones.
pub(crate) async fn find_scoped<E: HospitalOwned>(
    repo: &Repo<E>,
    ctx: &RequestContext,
    id: Uuid,
) -> AppResult<E> {
    let hospital_id = ctx.hospital()?;
    repo.find_by_id(id)
        .await?
        .filter(|e| e.hospital_id() == hospital_id)
        .ok_or_else(|| AppError::not_found(format!("{} not found", E::LABEL)))
}

/// The hospital filter every scoped list starts with.
pub(crate) fn hospital_filter(ctx: &RequestContext) -> AppResult<Vec<FilterField>> {
    Ok(vec![FilterField::eq("hospital_id", ctx.hospital()?)])
}

macro_rules! hospital_owned {
    ($($ty:ty => $label:literal),* $(,)?) => {
        $(
            impl HospitalOwned for $ty {
                const LABEL: &'static str = $label;

                fn hospital_id(&self) -> Uuid {
                    self.hospital_id
                }
            }
        )*
    };
}

hospital_owned! {
    Announcement => "Announcement",
    Appointment => "Appointment",
    LabOrder => "Lab order",
    Prescription => "Prescription",
    TreatmentPlan => "Treatment plan",
    DischargeApproval => "Discharge approval",
    Invoice => "Invoice",
}
