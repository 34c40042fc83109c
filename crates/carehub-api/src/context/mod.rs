//! Request context resolvers.
//!
//! Pure functions over header and claim values. None of them performs I/O;
//! the extractors in [`crate::extractors`] feed them from the request.

pub mod client_ip;
pub mod hospital;
pub mod locale;

pub use client_ip::resolve_client_ip;
pub use hospital::{HospitalInputs, HospitalSource, resolve_hospital};
pub use locale::resolve_locale;

/// Header selecting the hospital explicitly.
pub const HOSPITAL_HEADER: &str = "x-hospital-id";
/// Query parameter selecting the hospital explicitly.
pub const HOSPITAL_QUERY_PARAM: &str = "hospitalId";
/// Header selecting the acting-as mode.
pub const ACT_AS_HEADER: &str = "x-act-as";
/// Header selecting the active role.
pub const ROLE_CODE_HEADER: &str = "x-role-code";
