//! # carehub-database
//!
//! PostgreSQL connection management, migrations and the repository
//! implementations behind every CareHub entity. Two backends implement
//! [`carehub_core::traits::Repository`]: [`PgRepository`] for production
//! and [`MemoryRepository`] for local runs and tests.

pub mod connection;
pub mod migration;
pub mod repositories;
pub mod repository;

pub use connection::DatabasePool;
pub use repositories::{Repo, Repositories};
pub use repository::{MemoryRepository, PgRepository};
