//! Appointment entities.

pub mod model;
pub mod status;

pub use model::Appointment;
pub use status::AppointmentStatus;
