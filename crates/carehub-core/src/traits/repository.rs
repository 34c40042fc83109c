//! Generic repository trait for persistence access.

use std::fmt::Debug;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::result::AppResult;
use crate::types::filter::FilterField;
use crate::types::pagination::{PageRequest, PageResponse};
use crate::types::sorting::SortField;

/// Upper bound on rows returned by [`Repository::list`].
pub const LIST_LIMIT: u64 = 10_000;

/// Rows fetched per round trip by [`Repository::list_unbounded`].
pub const SCAN_BATCH: u64 = 1_000;

/// A persisted record with a UUID primary key.
///
/// The serialized form of an entity must use the column names as field
/// names; both backends rely on that to store and filter rows.
pub trait Entity: Serialize + DeserializeOwned + Clone + Debug + Send + Sync + 'static {
    /// Table name.
    const TABLE: &'static str;
    /// Columns that may appear in filters and ordering.
    const COLUMNS: &'static [&'static str];
    /// Default ordering for lists.
    const ORDER_BY: SortField;

    /// Primary key.
    fn id(&self) -> Uuid;
}

/// Generic CRUD repository.
///
/// Filters are combined with `AND`. Entity-specific queries are expressed
/// through filters in the service layer.
#[async_trait]
pub trait Repository<E: Entity>: Debug + Send + Sync + 'static {
    /// Find an entity by its primary key.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<E>>;

    /// Find one page of matching entities.
    async fn find_all(
        &self,
        filters: &[FilterField],
        page: &PageRequest,
    ) -> AppResult<PageResponse<E>>;

    /// All matching entities in default order, capped at [`LIST_LIMIT`].
    async fn list(&self, filters: &[FilterField]) -> AppResult<Vec<E>>;

    /// Every matching entity in default order, fetched in batches of
    /// [`SCAN_BATCH`]. For exports, which must not stop at [`LIST_LIMIT`].
    async fn list_unbounded(&self, filters: &[FilterField]) -> AppResult<Vec<E>> {
        let mut rows = Vec::new();
        let mut page = PageRequest {
            page: 1,
            page_size: SCAN_BATCH,
        };
        loop {
            let batch = self.find_all(filters, &page).await?;
            let more = batch.has_next;
            rows.extend(batch.items);
            if !more {
                return Ok(rows);
            }
            page.page += 1;
        }
    }

    /// First matching entity in default order.
    async fn find_one(&self, filters: &[FilterField]) -> AppResult<Option<E>>;

    /// Insert a new entity and return it.
    async fn create(&self, entity: &E) -> AppResult<E>;

    /// Replace an existing entity and return the stored version.
    async fn update(&self, entity: &E) -> AppResult<E>;

    /// Delete an entity by its primary key. Returns `true` if deleted.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;

    /// Count matching entities.
    async fn count(&self, filters: &[FilterField]) -> AppResult<u64>;
}
