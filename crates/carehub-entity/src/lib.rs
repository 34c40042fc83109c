//! # carehub-entity
//!
//! Domain entity models for CareHub. Every struct in this crate represents
//! a database table row. All entities derive `Debug`, `Clone`, `Serialize`,
//! `Deserialize` and `sqlx::FromRow`, and implement
//! [`carehub_core::traits::Entity`] so the generic repositories can store
//! them.
//!
//! Field names double as column names: the repositories persist the
//! serialized form of an entity directly.

pub mod announcement;
pub mod appointment;
pub mod audit;
pub mod discharge;
pub mod feature_flag;
pub mod hospital;
pub mod invoice;
pub mod lab;
pub mod notification;
pub mod permission;
pub mod prescription;
pub mod staff;
pub mod treatment;
