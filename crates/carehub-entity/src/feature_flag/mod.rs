//! Feature flag entities.

pub mod model;

pub use model::FeatureFlag;
