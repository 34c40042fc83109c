//! Backend-neutral row predicates.
//!
//! Services describe what they want with [`FilterField`]s; the Postgres
//! repository renders them into a `WHERE` clause and the in-memory one
//! evaluates them against each row's column map. Field names are checked
//! against the entity's column list before either happens.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOp {
    Eq,
    Ne,
    /// Case-insensitive substring.
    ILike,
    In,
    IsNull,
    IsNotNull,
}

/// Operand of a filter, always compared in text form. UUIDs, enum columns
/// stored as `TEXT` and booleans therefore behave alike on both backends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    String(String),
    /// Operand of [`FilterOp::In`].
    StringList(Vec<String>),
    /// Operand of the null checks.
    Null,
}

/// `field <op> value`. Several filters in one query are AND-ed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterField {
    pub field: String,
    pub op: FilterOp,
    pub value: FilterValue,
}

impl FilterField {
    pub fn new(field: impl Into<String>, op: FilterOp, value: FilterValue) -> Self {
        let field = field.into();
        Self { field, op, value }
    }

    pub fn eq(field: impl Into<String>, value: impl ToString) -> Self {
        Self::new(field, FilterOp::Eq, FilterValue::String(value.to_string()))
    }

    /// Used by the free-text `search` parameters.
    pub fn contains(field: impl Into<String>, needle: impl Into<String>) -> Self {
        Self::new(field, FilterOp::ILike, FilterValue::String(needle.into()))
    }

    pub fn is_null(field: impl Into<String>) -> Self {
        Self::new(field, FilterOp::IsNull, FilterValue::Null)
    }

    /// For optional query parameters: `None` adds no condition.
    pub fn eq_opt<V: ToString>(field: &str, value: Option<V>) -> Option<Self> {
        value.map(|v| Self::eq(field, v))
    }
}
