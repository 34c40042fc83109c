//! Authorities and declarative access policies.

pub mod authority;
pub mod policies;
pub mod policy;

pub use authority::Authority;
pub use policy::AccessPolicy;
