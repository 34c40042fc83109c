//! # carehub-api
//!
//! HTTP API layer for CareHub built on Axum.
//!
//! Provides the REST endpoints, the per-route authorization gate, request
//! context resolution (locale, client IP, hospital), extractors, DTOs and
//! error mapping.

pub mod app;
pub mod context;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod i18n;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, serve};
pub use state::AppState;
