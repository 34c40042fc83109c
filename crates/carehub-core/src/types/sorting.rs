//! Default ordering of entity listings.

use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Keyword for an `ORDER BY` clause.
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }

    /// Orient an ascending comparison result.
    pub fn apply(self, ord: Ordering) -> Ordering {
        match self {
            Self::Asc => ord,
            Self::Desc => ord.reverse(),
        }
    }
}

/// Column an entity's listings are ordered by. Ties break on `id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortField {
    pub field: &'static str,
    pub direction: SortDirection,
}

impl SortField {
    pub const fn asc(field: &'static str) -> Self {
        Self::on(field, SortDirection::Asc)
    }

    /// Newest first, for `created_at` style columns.
    pub const fn desc(field: &'static str) -> Self {
        Self::on(field, SortDirection::Desc)
    }

    const fn on(field: &'static str, direction: SortDirection) -> Self {
        Self { field, direction }
    }
}
