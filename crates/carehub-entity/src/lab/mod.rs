//! Laboratory order entities.

pub mod model;
pub mod status;

pub use model::LabOrder;
pub use status::LabOrderStatus;
