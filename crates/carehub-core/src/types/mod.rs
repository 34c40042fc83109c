//! Core type definitions used across the CareHub workspace.

pub mod filter;
pub mod locale;
pub mod pagination;
pub mod sorting;

pub use filter::{FilterField, FilterOp, FilterValue};
pub use locale::Locale;
pub use pagination::{PageRequest, PageResponse};
pub use sorting::{SortDirection, SortField};
