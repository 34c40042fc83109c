//! Custom Axum extractors.

pub mod context;
pub mod json;
pub mod pagination;
pub mod query;

pub use context::{AuthContext, HospitalContext, Meta, OptionalHospitalContext};
pub use json::{JsonBody, ValidatedJson};
pub use pagination::PaginationParams;
pub use query::QueryParams;
