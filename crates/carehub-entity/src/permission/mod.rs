//! Role permission grants.

pub mod model;

pub use model::RolePermission;
