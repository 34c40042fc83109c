//! Invoice entities.

pub mod model;

pub use model::{Invoice, InvoiceStatus};
