use std::marker::PhantomData;

use chrono::Utc;
use sqlx::{Executor, FromRow, IntoArguments};
use stowage_data::schema::{CREATED_AT_COLUMN, DELETED_AT_COLUMN, UPDATED_AT_COLUMN};
use stowage_data::statement::{LIMIT_PARAM, OFFSET_PARAM};
use stowage_data::{
    DataError, GenericStorage, Page, Pageable, Params, Projections, QueryError, Record, SqlValue,
    Statements,
};

use crate::backend::Backend;
use crate::conn::Conn;

/// Generic storage engine for one entity type bound to one table.
///
/// Holds no connection; every operation receives a [`Conn`]. Row-returning
/// selects lock their rows when `conn` is a transaction. Cheap to clone.
///
/// ```ignore
/// let storage = SqlxStorage::<Roster, Sqlite>::new("rosters")?;
/// storage.insert(Conn::Pool(&pool), &mut roster).await?;
/// ```
pub struct SqlxStorage<T, DB> {
    table: String,
    statements: Statements,
    _marker: PhantomData<fn() -> (T, DB)>,
}

impl<T, DB> Clone for SqlxStorage<T, DB> {
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
            statements: self.statements.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T, DB> std::fmt::Debug for SqlxStorage<T, DB> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqlxStorage")
            .field("table", &self.table)
            .finish_non_exhaustive()
    }
}

impl<T: Record, DB: Backend> SqlxStorage<T, DB> {
    /// Bind `T` to `table`. Fails on an invalid table name or descriptor.
    pub fn new(table: impl Into<String>) -> Result<Self, DataError> {
        let table = table.into();
        let statements = Statements::new(&table, Projections::of::<T>()?, DB::DIALECT)?;
        Ok(Self {
            table,
            statements,
            _marker: PhantomData,
        })
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn projections(&self) -> &Projections {
        self.statements.projections()
    }

    pub fn statements(&self) -> &Statements {
        &self.statements
    }

    fn trace(&self, operation: &'static str) {
        tracing::debug!(table = %self.table, operation, "storage operation");
    }
}

fn field_value<T: Record>(elem: &T, column: &'static str) -> Result<SqlValue, DataError> {
    elem.field(column).ok_or(DataError::MissingField(column))
}

impl<T, DB> GenericStorage<T> for SqlxStorage<T, DB>
where
    T: Record + for<'r> FromRow<'r, DB::Row>,
    DB: Backend,
    for<'c> &'c mut DB::Connection: Executor<'c, Database = DB>,
    for<'q> DB::Arguments<'q>: IntoArguments<'q, DB>,
    (i64,): for<'r> FromRow<'r, DB::Row>,
{
    type Conn<'c>
        = Conn<'c, DB>
    where
        Self: 'c;

    async fn single(
        &self,
        conn: Self::Conn<'_>,
        elem: &mut T,
        predicate: &str,
        args: Params,
    ) -> Result<(), DataError> {
        self.trace("single");
        let sql = self.statements.select(predicate, conn.is_transaction())?;
        *elem = conn.fetch_one(&sql, &args).await?;
        Ok(())
    }

    async fn find_where(
        &self,
        conn: Self::Conn<'_>,
        out: &mut Vec<T>,
        predicate: &str,
        args: Params,
    ) -> Result<(), DataError> {
        self.trace("find_where");
        let sql = self.statements.select(predicate, conn.is_transaction())?;
        *out = conn.fetch_all(&sql, &args).await?;
        Ok(())
    }

    async fn find_by_id(
        &self,
        conn: Self::Conn<'_>,
        elem: &mut T,
        id: impl Into<SqlValue>,
    ) -> Result<(), DataError> {
        let args = Params::new().with(self.projections().identity, id);
        self.single(conn, elem, &self.statements.identity_predicate(), args)
            .await
    }

    async fn find_all(
        &self,
        conn: Self::Conn<'_>,
        out: &mut Vec<T>,
        page: i64,
        limit: i64,
    ) -> Result<(), DataError> {
        self.trace("find_all");
        let offset = Pageable::new(page, limit)
            .offset()
            .ok_or(QueryError::PageOutOfRange { page, limit })?;
        let sql = self.statements.find_all(conn.is_transaction())?;
        let args = Params::new()
            .with(LIMIT_PARAM, limit)
            .with(OFFSET_PARAM, offset);
        *out = conn.fetch_all(&sql, &args).await?;
        Ok(())
    }

    async fn count(&self, conn: Self::Conn<'_>) -> Result<i64, DataError> {
        self.trace("count");
        conn.fetch_scalar(&self.statements.count(), &Params::new())
            .await
    }

    async fn insert(&self, conn: Self::Conn<'_>, elem: &mut T) -> Result<(), DataError> {
        self.trace("insert");
        let now = Utc::now();
        let mut args = Params::new()
            .with(CREATED_AT_COLUMN, now)
            .with(UPDATED_AT_COLUMN, now);
        for &column in &self.projections().writable {
            args.insert(column, field_value(elem, column)?);
        }
        *elem = conn.fetch_one(&self.statements.insert(), &args).await?;
        Ok(())
    }

    async fn insert_bulk(&self, conn: Self::Conn<'_>, elems: &mut Vec<T>) -> Result<(), DataError> {
        if elems.is_empty() {
            return Ok(());
        }
        self.trace("insert_bulk");

        let now = Utc::now();
        let mut args = Params::new();
        for (row, elem) in elems.iter().enumerate() {
            args.insert(Projections::row_parameter(CREATED_AT_COLUMN, row), now);
            args.insert(Projections::row_parameter(UPDATED_AT_COLUMN, row), now);
            for &column in &self.projections().writable {
                args.insert(
                    Projections::row_parameter(column, row),
                    field_value(elem, column)?,
                );
            }
        }

        let sql = self.statements.insert_bulk(elems.len());
        let inserted: Vec<T> = conn.fetch_all(&sql, &args).await?;
        if inserted.len() != elems.len() {
            return Err(DataError::BulkCountMismatch {
                expected: elems.len(),
                actual: inserted.len(),
            });
        }
        *elems = inserted;
        Ok(())
    }

    async fn update(&self, conn: Self::Conn<'_>, elem: &mut T) -> Result<(), DataError> {
        let identity = self.projections().identity;
        let id = field_value(elem, identity)?;

        // The row must exist (and is locked when `conn` is a transaction).
        let current_args = Params::new().with(identity, id.clone());
        let current_sql = self
            .statements
            .select(&self.statements.identity_predicate(), conn.is_transaction())?;
        let _current: T = conn.fetch_one(&current_sql, &current_args).await?;

        self.trace("update");
        let mut args = Params::new()
            .with(UPDATED_AT_COLUMN, Utc::now())
            .with(identity, id);
        for &column in &self.projections().writable {
            args.insert(column, field_value(elem, column)?);
        }
        *elem = conn.fetch_one(&self.statements.update(), &args).await?;
        Ok(())
    }

    async fn delete(&self, conn: Self::Conn<'_>, id: impl Into<SqlValue>) -> Result<(), DataError> {
        self.trace("delete");
        let args = Params::new()
            .with(DELETED_AT_COLUMN, Utc::now())
            .with(self.projections().identity, id);
        conn.execute(&self.statements.delete(), &args).await
    }

    async fn find_page(&self, conn: Self::Conn<'_>, pageable: &Pageable) -> Result<Page<T>, DataError> {
        let mut content = Vec::new();
        self.find_all(conn, &mut content, pageable.page, pageable.limit)
            .await?;
        let total = self.count(conn).await?;
        Ok(Page::new(content, pageable, total))
    }
}

#[cfg(all(test, feature = "sqlite"))]
mod tests {
    use super::*;
    use stowage_data::{Schema, SchemaError};

    #[derive(sqlx::FromRow)]
    struct Tag {
        id: i64,
        label: String,
    }

    impl Record for Tag {
        fn schema() -> Result<Schema, SchemaError> {
            Schema::builder()
                .field("id", "id")
                .field("label", "label")
                .build()
        }

        fn field(&self, column: &str) -> Option<SqlValue> {
            match column {
                "id" => Some(self.id.into()),
                "label" => Some((&self.label).into()),
                _ => None,
            }
        }
    }

    #[test]
    fn test_new_rejects_bad_table_name() {
        let err = SqlxStorage::<Tag, sqlx::Sqlite>::new("tags; DROP TABLE x").unwrap_err();
        assert!(matches!(err, DataError::Query(_)));
    }

    #[test]
    fn test_pool_statements_are_unlocked() {
        let storage = SqlxStorage::<Tag, sqlx::Sqlite>::new("tags").unwrap();
        let sql = storage
            .statements()
            .select(r#""label" = :label"#, false)
            .unwrap();
        assert_eq!(
            sql,
            r#"SELECT "id", "label" FROM "tags" WHERE "deletedAt" IS NULL AND ("label" = :label)"#
        );
    }
}
