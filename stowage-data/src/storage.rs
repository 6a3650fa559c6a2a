use crate::entity::Record;
use crate::error::DataError;
use crate::page::{Page, Pageable};
use crate::value::{Params, SqlValue};
use std::future::Future;

/// The generic CRUD + pagination contract over one table.
///
/// Every operation takes the connection it runs on explicitly. Backends
/// define [`GenericStorage::Conn`] as either a plain pool or an active
/// transaction; row-returning reads inside a transaction lock the rows they
/// return where the database supports it.
///
/// Reads never return soft-deleted rows. Operations that decode a row write
/// it back into the caller's value.
pub trait GenericStorage<T: Record> {
    type Conn<'c>
    where
        Self: 'c;

    /// Fetch exactly one row matching `predicate`.
    fn single(
        &self,
        conn: Self::Conn<'_>,
        elem: &mut T,
        predicate: &str,
        args: Params,
    ) -> impl Future<Output = Result<(), DataError>>;

    /// Fetch every row matching `predicate`, replacing the contents of `out`.
    ///
    /// The predicate may end with `ORDER BY`, `LIMIT` and `OFFSET` clauses.
    fn find_where(
        &self,
        conn: Self::Conn<'_>,
        out: &mut Vec<T>,
        predicate: &str,
        args: Params,
    ) -> impl Future<Output = Result<(), DataError>>;

    fn find_by_id(
        &self,
        conn: Self::Conn<'_>,
        elem: &mut T,
        id: impl Into<SqlValue>,
    ) -> impl Future<Output = Result<(), DataError>>;

    /// Newest first by identity. `page` is 1-indexed.
    fn find_all(
        &self,
        conn: Self::Conn<'_>,
        out: &mut Vec<T>,
        page: i64,
        limit: i64,
    ) -> impl Future<Output = Result<(), DataError>>;

    fn count(&self, conn: Self::Conn<'_>) -> impl Future<Output = Result<i64, DataError>>;

    fn insert(&self, conn: Self::Conn<'_>, elem: &mut T) -> impl Future<Output = Result<(), DataError>>;

    /// Insert all of `elems` in one statement. A no-op for an empty vector.
    fn insert_bulk(
        &self,
        conn: Self::Conn<'_>,
        elems: &mut Vec<T>,
    ) -> impl Future<Output = Result<(), DataError>>;

    /// Overwrite every writable column of the row identified by `elem`.
    fn update(&self, conn: Self::Conn<'_>, elem: &mut T) -> impl Future<Output = Result<(), DataError>>;

    /// Soft delete: stamps `deletedAt`. Deleting a missing id succeeds.
    fn delete(
        &self,
        conn: Self::Conn<'_>,
        id: impl Into<SqlValue>,
    ) -> impl Future<Output = Result<(), DataError>>;

    /// `find_all` and `count` combined into a [`Page`].
    fn find_page(
        &self,
        conn: Self::Conn<'_>,
        pageable: &Pageable,
    ) -> impl Future<Output = Result<Page<T>, DataError>>;
}
