//! Treatment plan entities.

pub mod model;

pub use model::{TreatmentPlan, TreatmentPlanStatus};
