//! Hospital (tenant) entities.

pub mod model;

pub use model::Hospital;
