use crate::query::QueryError;
use crate::schema::SchemaError;

type Cause = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur in the data layer.
#[derive(Debug)]
pub enum DataError {
    /// Error reported by the database driver, passed through unchanged.
    Database(Cause),
    Query(QueryError),
    Schema(SchemaError),
    /// A value could not be added to the driver's argument buffer.
    Encode(Cause),
    /// `Record::field` returned nothing for a mapped column.
    MissingField(&'static str),
    /// A multi-row insert returned a different number of rows than it sent.
    BulkCountMismatch { expected: usize, actual: usize },
    TransactionStartFailed(Cause),
    TransactionCommitFailed(Cause),
    /// The transaction handle was used after commit or rollback.
    TransactionClosed,
}

impl DataError {
    /// Construct a `Database` variant from any error type.
    ///
    /// Used by backend crates (e.g. `stowage-data-sqlx`) to wrap
    /// driver-specific errors.
    pub fn database(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        DataError::Database(Box::new(err))
    }

    /// The wrapped driver error, if this is a driver or transaction failure.
    pub fn cause(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            DataError::Database(err)
            | DataError::Encode(err)
            | DataError::TransactionStartFailed(err)
            | DataError::TransactionCommitFailed(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl std::fmt::Display for DataError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataError::Database(err) => write!(f, "Database error: {err}"),
            DataError::Query(err) => write!(f, "Query error: {err}"),
            DataError::Schema(err) => write!(f, "Schema error: {err}"),
            DataError::Encode(err) => write!(f, "Failed to encode parameter: {err}"),
            DataError::MissingField(column) => {
                write!(f, "Record returned no value for column `{column}`")
            }
            DataError::BulkCountMismatch { expected, actual } => write!(
                f,
                "Bulk insert returned {actual} rows, expected {expected}"
            ),
            DataError::TransactionStartFailed(err) => {
                write!(f, "Error when creating transaction: {err}")
            }
            DataError::TransactionCommitFailed(err) => {
                write!(f, "Error when committing transaction: {err}")
            }
            DataError::TransactionClosed => write!(f, "Transaction already finished"),
        }
    }
}

impl std::error::Error for DataError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DataError::Query(err) => Some(err),
            DataError::Schema(err) => Some(err),
            other => other
                .cause()
                .map(|err| err as &(dyn std::error::Error + 'static)),
        }
    }
}

impl From<QueryError> for DataError {
    fn from(err: QueryError) -> Self {
        DataError::Query(err)
    }
}

impl From<SchemaError> for DataError {
    fn from(err: SchemaError) -> Self {
        DataError::Schema(err)
    }
}
