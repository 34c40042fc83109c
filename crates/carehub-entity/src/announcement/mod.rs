//! Announcement entities.

pub mod model;

pub use model::Announcement;
