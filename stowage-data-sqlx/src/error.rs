use stowage_data::DataError;

/// Extension trait for converting `sqlx::Error` into `DataError`.
///
/// Due to Rust's orphan rules, we can't implement `From<sqlx::Error> for DataError`
/// in this crate. Use `.into_data_error()` when mixing raw `sqlx` calls with
/// storage calls inside one unit of work.
pub trait SqlxErrorExt {
    fn into_data_error(self) -> DataError;
}

impl SqlxErrorExt for sqlx::Error {
    fn into_data_error(self) -> DataError {
        DataError::database(self)
    }
}

/// Inspect the driver error wrapped in a [`DataError`].
pub trait DataErrorExt {
    /// The `sqlx::Error` behind a driver or transaction failure.
    fn sqlx_error(&self) -> Option<&sqlx::Error>;

    /// `true` when a single-row read found no row.
    fn is_row_not_found(&self) -> bool {
        matches!(self.sqlx_error(), Some(sqlx::Error::RowNotFound))
    }
}

impl DataErrorExt for DataError {
    fn sqlx_error(&self) -> Option<&sqlx::Error> {
        self.cause()?.downcast_ref::<sqlx::Error>()
    }
}

/// Convenience alias for data-layer results using `DataError`.
pub type SqlxResult<T> = Result<T, DataError>;
