//! In-process repository backed by a `DashMap`.
//!
//! Matches the filtering and ordering semantics of the Postgres backend:
//! filters compare the textual form of a field, lists follow the entity's
//! default ordering with `id` as tie-breaker.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde_json::Value;
use uuid::Uuid;

use carehub_core::error::AppError;
use carehub_core::result::AppResult;
use carehub_core::traits::Entity;
use carehub_core::traits::repository::{LIST_LIMIT, Repository};
use carehub_core::types::pagination::{PageRequest, PageResponse};
use carehub_core::types::{FilterField, FilterOp, FilterValue};

use super::validate_filters;

/// A stored entity together with its serialized form, used for filtering.
#[derive(Clone)]
struct Row<E> {
    entity: E,
    fields: serde_json::Map<String, Value>,
}

/// Repository keeping every row in memory.
#[derive(Clone)]
pub struct MemoryRepository<E> {
    rows: Arc<DashMap<Uuid, Row<E>>>,
}

impl<E: Entity> MemoryRepository<E> {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self {
            rows: Arc::new(DashMap::new()),
        }
    }

    fn row(entity: &E) -> AppResult<Row<E>> {
        match serde_json::to_value(entity)? {
            Value::Object(fields) => Ok(Row {
                entity: entity.clone(),
                fields,
            }),
            _ => Err(AppError::internal(format!(
                "{} does not serialize to an object",
                E::TABLE
            ))),
        }
    }

    /// All matching rows in default order.
    fn select(&self, filters: &[FilterField]) -> AppResult<Vec<E>> {
        validate_filters::<E>(filters)?;
        let mut rows: Vec<Row<E>> = self
            .rows
            .iter()
            .filter(|r| filters.iter().all(|f| matches(&r.fields, f)))
            .map(|r| r.value().clone())
            .collect();

        let order = E::ORDER_BY;
        rows.sort_by(|a, b| {
            let ord = compare(a.fields.get(order.field), b.fields.get(order.field));
            order
                .direction
                .apply(ord)
                .then_with(|| a.entity.id().cmp(&b.entity.id()))
        });
        Ok(rows.into_iter().map(|r| r.entity).collect())
    }
}

impl<E: Entity> Default for MemoryRepository<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for MemoryRepository<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryRepository")
            .field("rows", &self.rows.len())
            .finish()
    }
}

/// Textual form of a field; `None` for null or missing.
fn text_of(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn matches(fields: &serde_json::Map<String, Value>, filter: &FilterField) -> bool {
    let actual = text_of(fields.get(&filter.field));
    match (&filter.op, &filter.value) {
        (FilterOp::Eq, FilterValue::String(v)) => actual.as_deref() == Some(v.as_str()),
        (FilterOp::Ne, FilterValue::String(v)) => actual.as_deref() != Some(v.as_str()),
        (FilterOp::ILike, FilterValue::String(v)) => actual
            .map(|a| a.to_lowercase().contains(&v.to_lowercase()))
            .unwrap_or(false),
        (FilterOp::In, FilterValue::StringList(list)) => {
            actual.map(|a| list.contains(&a)).unwrap_or(false)
        }
        (FilterOp::IsNull, _) => actual.is_none(),
        (FilterOp::IsNotNull, _) => actual.is_some(),
        _ => false,
    }
}

/// Order two field values: nulls last, timestamps chronologically, numbers
/// numerically, anything else by text.
fn compare(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None | Some(Value::Null), None | Some(Value::Null)) => Ordering::Equal,
        (None | Some(Value::Null), _) => Ordering::Greater,
        (_, None | Some(Value::Null)) => Ordering::Less,
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => {
            match (
                DateTime::<FixedOffset>::parse_from_rfc3339(x),
                DateTime::<FixedOffset>::parse_from_rfc3339(y),
            ) {
                (Ok(dx), Ok(dy)) => dx.cmp(&dy),
                _ => x.cmp(y),
            }
        }
        (Some(x), Some(y)) => x.to_string().cmp(&y.to_string()),
    }
}

#[async_trait]
impl<E: Entity> Repository<E> for MemoryRepository<E> {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<E>> {
        Ok(self.rows.get(&id).map(|r| r.entity.clone()))
    }

    async fn find_all(
        &self,
        filters: &[FilterField],
        page: &PageRequest,
    ) -> AppResult<PageResponse<E>> {
        let all = self.select(filters)?;
        let total = all.len() as u64;
        let items = all
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect();
        Ok(PageResponse::new(items, page.page, page.page_size, total))
    }

    async fn list(&self, filters: &[FilterField]) -> AppResult<Vec<E>> {
        let mut all = self.select(filters)?;
        all.truncate(LIST_LIMIT as usize);
        Ok(all)
    }

    async fn find_one(&self, filters: &[FilterField]) -> AppResult<Option<E>> {
        Ok(self.select(filters)?.into_iter().next())
    }

    async fn create(&self, entity: &E) -> AppResult<E> {
        let row = Self::row(entity)?;
        match self.rows.entry(entity.id()) {
            Entry::Occupied(_) => Err(AppError::conflict(format!(
                "{} {} already exists",
                E::TABLE,
                entity.id()
            ))),
            Entry::Vacant(slot) => {
                slot.insert(row);
                Ok(entity.clone())
            }
        }
    }

    async fn update(&self, entity: &E) -> AppResult<E> {
        let row = Self::row(entity)?;
        match self.rows.get_mut(&entity.id()) {
            Some(mut existing) => {
                *existing = row;
                Ok(entity.clone())
            }
            None => Err(AppError::not_found(format!(
                "{} {} not found",
                E::TABLE,
                entity.id()
            ))),
        }
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.rows.remove(&id).is_some())
    }

    async fn count(&self, filters: &[FilterField]) -> AppResult<u64> {
        Ok(self.select(filters)?.len() as u64)
    }
}
