//! Core traits defined in `carehub-core` and implemented by other crates.

pub mod repository;

pub use repository::{Entity, Repository};
