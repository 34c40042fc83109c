//! Discharge approval entities.

pub mod model;

pub use model::{DischargeApproval, DischargeStatus};
