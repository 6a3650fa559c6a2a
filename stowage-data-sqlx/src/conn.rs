use sqlx::{Executor, FromRow, IntoArguments, Pool};
use stowage_data::{compile_named, DataError, Params};

use crate::backend::Backend;
use crate::tx::Tx;

/// The connection a storage operation runs on.
///
/// `Tx` makes the operation part of that transaction and turns on row
/// locking for row-returning selects. `Pool` checks out a connection for
/// the single statement.
pub enum Conn<'a, DB: sqlx::Database> {
    Pool(&'a Pool<DB>),
    Tx(&'a Tx<DB>),
}

impl<DB: sqlx::Database> Clone for Conn<'_, DB> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<DB: sqlx::Database> Copy for Conn<'_, DB> {}

impl<'a, DB: sqlx::Database> From<&'a Pool<DB>> for Conn<'a, DB> {
    fn from(pool: &'a Pool<DB>) -> Self {
        Conn::Pool(pool)
    }
}

impl<'a, DB: sqlx::Database> From<&'a Tx<DB>> for Conn<'a, DB> {
    fn from(tx: &'a Tx<DB>) -> Self {
        Conn::Tx(tx)
    }
}

impl<DB: sqlx::Database> Conn<'_, DB> {
    pub fn is_transaction(&self) -> bool {
        matches!(self, Conn::Tx(_))
    }
}

// One macro body per fetch style; `$fetch` is the sqlx terminal method.
macro_rules! run_on_conn {
    ($conn:expr, $query:expr, $fetch:ident) => {
        match $conn {
            Conn::Pool(pool) => $query.$fetch(pool).await,
            Conn::Tx(tx) => {
                let mut guard = tx.lock().await;
                let tx = guard.as_mut().ok_or(DataError::TransactionClosed)?;
                $query.$fetch(&mut **tx).await
            }
        }
        .map_err(DataError::database)
    };
}

impl<DB> Conn<'_, DB>
where
    DB: Backend,
    for<'c> &'c mut DB::Connection: Executor<'c, Database = DB>,
    for<'q> DB::Arguments<'q>: IntoArguments<'q, DB>,
{
    fn prepare<'q>(
        sql: &str,
        params: &Params,
    ) -> Result<(String, DB::Arguments<'q>), DataError> {
        let (compiled, values) = compile_named(sql, params, DB::DIALECT)?;
        tracing::debug!(sql = %compiled, binds = values.len(), "executing statement");
        let args = DB::arguments(values).map_err(DataError::Encode)?;
        Ok((compiled, args))
    }

    pub(crate) async fn fetch_one<T>(self, sql: &str, params: &Params) -> Result<T, DataError>
    where
        T: for<'r> FromRow<'r, DB::Row> + Send + Unpin,
    {
        let (sql, args) = Self::prepare(sql, params)?;
        run_on_conn!(self, sqlx::query_as_with::<DB, T, _>(&sql, args), fetch_one)
    }

    pub(crate) async fn fetch_all<T>(self, sql: &str, params: &Params) -> Result<Vec<T>, DataError>
    where
        T: for<'r> FromRow<'r, DB::Row> + Send + Unpin,
    {
        let (sql, args) = Self::prepare(sql, params)?;
        run_on_conn!(self, sqlx::query_as_with::<DB, T, _>(&sql, args), fetch_all)
    }

    pub(crate) async fn fetch_scalar<O>(self, sql: &str, params: &Params) -> Result<O, DataError>
    where
        O: Send + Unpin,
        (O,): for<'r> FromRow<'r, DB::Row>,
    {
        let (sql, args) = Self::prepare(sql, params)?;
        run_on_conn!(self, sqlx::query_scalar_with::<DB, O, _>(&sql, args), fetch_one)
    }

    pub(crate) async fn execute(self, sql: &str, params: &Params) -> Result<(), DataError> {
        let (sql, args) = Self::prepare(sql, params)?;
        run_on_conn!(self, sqlx::query_with::<DB, _>(&sql, args), execute).map(drop)
    }
}
