//! Prescription entities.

pub mod model;

pub use model::{Prescription, PrescriptionStatus};
