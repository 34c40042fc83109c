//! Axum middleware stack.

pub mod authenticate;
pub mod compression;
pub mod cors;
pub mod gate;
pub mod locale;
pub mod logging;
pub mod timeout;

pub use gate::Gated;
