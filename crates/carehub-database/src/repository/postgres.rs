//! PostgreSQL repository shared by every entity.
//!
//! Rows are written through `jsonb_populate_record`, so the serialized
//! entity is the single source of column values. Filters compare the
//! textual form of a column, which lets UUID, enum, boolean and text
//! columns share one code path.

use std::fmt::Debug;
use std::marker::PhantomData;

use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use carehub_core::error::{AppError, ErrorKind};
use carehub_core::result::AppResult;
use carehub_core::traits::Entity;
use carehub_core::traits::repository::{LIST_LIMIT, Repository};
use carehub_core::types::pagination::{PageRequest, PageResponse};
use carehub_core::types::{FilterField, FilterOp, FilterValue};

use super::validate_filters;

/// A bind parameter produced by a filter.
#[derive(Debug, Clone)]
enum Bind {
    Text(String),
    TextList(Vec<String>),
}

/// A `WHERE` clause with its parameters, numbered from `$1`.
#[derive(Debug, Default)]
struct WhereClause {
    sql: String,
    binds: Vec<Bind>,
}

impl WhereClause {
    fn build<E: Entity>(filters: &[FilterField]) -> AppResult<Self> {
        validate_filters::<E>(filters)?;

        let mut conditions = Vec::with_capacity(filters.len());
        let mut binds = Vec::new();

        for filter in filters {
            let column = format!("CAST({} AS TEXT)", quote(&filter.field));
            let param = binds.len() + 1;
            match (&filter.op, &filter.value) {
                (FilterOp::Eq, FilterValue::String(v)) => {
                    conditions.push(format!("{column} = ${param}"));
                    binds.push(Bind::Text(v.clone()));
                }
                (FilterOp::Ne, FilterValue::String(v)) => {
                    conditions.push(format!("{column} IS DISTINCT FROM ${param}"));
                    binds.push(Bind::Text(v.clone()));
                }
                (FilterOp::ILike, FilterValue::String(v)) => {
                    conditions.push(format!("{column} ILIKE ${param}"));
                    binds.push(Bind::Text(format!("%{}%", escape_like(v))));
                }
                (FilterOp::In, FilterValue::StringList(v)) => {
                    conditions.push(format!("{column} = ANY(${param})"));
                    binds.push(Bind::TextList(v.clone()));
                }
                (FilterOp::IsNull, _) => conditions.push(format!("{column} IS NULL")),
                (FilterOp::IsNotNull, _) => conditions.push(format!("{column} IS NOT NULL")),
                _ => {
                    return Err(AppError::internal(format!(
                        "Unsupported filter on '{}'",
                        filter.field
                    )));
                }
            }
        }

        let sql = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };
        Ok(Self { sql, binds })
    }

    fn next_param(&self) -> usize {
        self.binds.len() + 1
    }
}

macro_rules! bind_filters {
    ($query:expr, $binds:expr) => {{
        let mut query = $query;
        for bind in $binds {
            query = match bind {
                Bind::Text(v) => query.bind(v.clone()),
                Bind::TextList(v) => query.bind(v.clone()),
            };
        }
        query
    }};
}

/// Generic sqlx-backed repository for one entity table.
#[derive(Debug, Clone)]
pub struct PgRepository<E> {
    pool: PgPool,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> PgRepository<E> {
    /// Create a repository over the given pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _entity: PhantomData,
        }
    }

    fn order_by() -> String {
        format!(
            "ORDER BY {} {}, id ASC",
            quote(E::ORDER_BY.field),
            E::ORDER_BY.direction.as_sql()
        )
    }

    /// Serialize an entity and return it with its column names, `id` excluded.
    fn columns_of(entity: &E) -> AppResult<Vec<String>> {
        match serde_json::to_value(entity)? {
            Value::Object(map) => Ok(map.keys().filter(|k| *k != "id").cloned().collect()),
            _ => Err(AppError::internal(format!(
                "{} does not serialize to an object",
                E::TABLE
            ))),
        }
    }
}

#[async_trait]
impl<E> Repository<E> for PgRepository<E>
where
    E: Entity + for<'r> FromRow<'r, PgRow> + Unpin,
{
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<E>> {
        let sql = format!("SELECT * FROM {} WHERE id = $1", E::TABLE);
        sqlx::query_as::<_, E>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_db_error(e, E::TABLE, "find"))
    }

    async fn find_all(
        &self,
        filters: &[FilterField],
        page: &PageRequest,
    ) -> AppResult<PageResponse<E>> {
        let clause = WhereClause::build::<E>(filters)?;
        let count_sql = format!("SELECT COUNT(*) FROM {} {}", E::TABLE, clause.sql);
        let param = clause.next_param();
        let select_sql = format!(
            "SELECT * FROM {} {} {} LIMIT ${} OFFSET ${}",
            E::TABLE,
            clause.sql,
            Self::order_by(),
            param,
            param + 1
        );

        let total = bind_filters!(sqlx::query_scalar::<_, i64>(&count_sql), &clause.binds)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_db_error(e, E::TABLE, "count"))?;

        let items = bind_filters!(sqlx::query_as::<_, E>(&select_sql), &clause.binds)
            .bind(page.limit() as i64)
            .bind(page.offset() as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_db_error(e, E::TABLE, "list"))?;

        Ok(PageResponse::new(
            items,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    async fn list(&self, filters: &[FilterField]) -> AppResult<Vec<E>> {
        let clause = WhereClause::build::<E>(filters)?;
        let sql = format!(
            "SELECT * FROM {} {} {} LIMIT {}",
            E::TABLE,
            clause.sql,
            Self::order_by(),
            LIST_LIMIT
        );
        bind_filters!(sqlx::query_as::<_, E>(&sql), &clause.binds)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_db_error(e, E::TABLE, "list"))
    }

    async fn find_one(&self, filters: &[FilterField]) -> AppResult<Option<E>> {
        let clause = WhereClause::build::<E>(filters)?;
        let sql = format!(
            "SELECT * FROM {} {} {} LIMIT 1",
            E::TABLE,
            clause.sql,
            Self::order_by()
        );
        bind_filters!(sqlx::query_as::<_, E>(&sql), &clause.binds)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_db_error(e, E::TABLE, "find"))
    }

    async fn create(&self, entity: &E) -> AppResult<E> {
        let mut columns = Self::columns_of(entity)?;
        columns.insert(0, "id".to_string());
        let column_list = columns.iter().map(|c| quote(c)).collect::<Vec<_>>().join(", ");
        let sql = format!(
            "INSERT INTO {table} ({column_list}) \
             SELECT {column_list} FROM jsonb_populate_record(NULL::{table}, $1) \
             RETURNING *",
            table = E::TABLE,
        );
        sqlx::query_as::<_, E>(&sql)
            .bind(Json(entity))
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_db_error(e, E::TABLE, "create"))
    }

    async fn update(&self, entity: &E) -> AppResult<E> {
        let columns = Self::columns_of(entity)?;
        let column_list = columns.iter().map(|c| quote(c)).collect::<Vec<_>>().join(", ");
        let sql = format!(
            "UPDATE {table} SET ({column_list}) = \
             (SELECT {column_list} FROM jsonb_populate_record(NULL::{table}, $1)) \
             WHERE id = $2 RETURNING *",
            table = E::TABLE,
        );
        sqlx::query_as::<_, E>(&sql)
            .bind(Json(entity))
            .bind(entity.id())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_db_error(e, E::TABLE, "update"))?
            .ok_or_else(|| AppError::not_found(format!("{} {} not found", E::TABLE, entity.id())))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let sql = format!("DELETE FROM {} WHERE id = $1", E::TABLE);
        let result = sqlx::query(&sql)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_db_error(e, E::TABLE, "delete"))?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self, filters: &[FilterField]) -> AppResult<u64> {
        let clause = WhereClause::build::<E>(filters)?;
        let sql = format!("SELECT COUNT(*) FROM {} {}", E::TABLE, clause.sql);
        let total = bind_filters!(sqlx::query_scalar::<_, i64>(&sql), &clause.binds)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_db_error(e, E::TABLE, "count"))?;
        Ok(total as u64)
    }
}

fn quote(identifier: &str) -> String {
    format!("\"{}\"", identifier.replace('"', "\"\""))
}

fn escape_like(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Unique and foreign-key violations surface as conflicts; everything else
/// is a database error.
fn map_db_error(e: sqlx::Error, table: &str, op: &str) -> AppError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() {
            return AppError::conflict(format!("A conflicting {table} record already exists"));
        }
        if db.is_foreign_key_violation() {
            return AppError::conflict(format!("{table} record references a missing row"));
        }
    }
    AppError::with_source(ErrorKind::Database, format!("Failed to {op} {table}"), e)
}

#[cfg(test)]
mod tests {
    use super::*;
    use carehub_entity::lab::LabOrder;

    #[test]
    fn test_where_clause_numbers_params() {
        let filters = vec![
            FilterField::eq("hospital_id", Uuid::nil()),
            FilterField::is_null("test_code"),
            FilterField::new(
                "status",
                FilterOp::In,
                FilterValue::StringList(vec!["FINAL".into(), "PRELIMINARY".into()]),
            ),
        ];
        let clause = WhereClause::build::<LabOrder>(&filters).unwrap();
        assert_eq!(
            clause.sql,
            "WHERE CAST(\"hospital_id\" AS TEXT) = $1 AND CAST(\"test_code\" AS TEXT) IS NULL \
             AND CAST(\"status\" AS TEXT) = ANY($2)"
        );
        assert_eq!(clause.next_param(), 3);
    }

    #[test]
    fn test_where_clause_rejects_unknown_column() {
        let filters = vec![FilterField::eq("result_value; DROP TABLE x", "1")];
        let err = WhereClause::build::<LabOrder>(&filters).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("50%_a"), "50\\%\\_a");
    }
}
