//! Generic repository backends.

pub mod memory;
pub mod postgres;

pub use memory::MemoryRepository;
pub use postgres::PgRepository;

use carehub_core::error::AppError;
use carehub_core::result::AppResult;
use carehub_core::traits::Entity;
use carehub_core::types::{FilterField, FilterOp, FilterValue};

/// Reject filters on unknown columns or with a value that does not fit the
/// operator. Both backends call this first so they fail identically.
pub(crate) fn validate_filters<E: Entity>(filters: &[FilterField]) -> AppResult<()> {
    for filter in filters {
        if !E::COLUMNS.contains(&filter.field.as_str()) {
            return Err(AppError::validation(format!(
                "Cannot filter {} by '{}'",
                E::TABLE,
                filter.field
            )));
        }
        let fits = matches!(
            (filter.op, &filter.value),
            (FilterOp::Eq | FilterOp::Ne | FilterOp::ILike, FilterValue::String(_))
                | (FilterOp::In, FilterValue::StringList(_))
                | (FilterOp::IsNull | FilterOp::IsNotNull, FilterValue::Null)
        );
        if !fits {
            return Err(AppError::validation(format!(
                "Filter on '{}' has a value that does not match {:?}",
                filter.field, filter.op
            )));
        }
    }
    Ok(())
}
