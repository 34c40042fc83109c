//! # carehub-core
//!
//! Shared vocabulary of the CareHub workspace: the layered configuration
//! schema, [`AppError`], paging and filtering types, request locales, and
//! the repository traits the database crate implements.
//!
//! Depends on no other CareHub crate.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
