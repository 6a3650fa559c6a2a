use crate::schema::{Schema, SchemaError};
use crate::value::SqlValue;

/// A type the generic storage engine can persist.
///
/// The descriptor is declared once per type and validated when a storage
/// instance is built for it. Row decoding is left to the driver (for SQLx,
/// `#[derive(sqlx::FromRow)]`).
///
/// # Example
///
/// ```ignore
/// impl Record for Roster {
///     fn schema() -> Result<Schema, SchemaError> {
///         Schema::builder()
///             .field("id", "id")
///             .field("name", "name")
///             .field("created_at", "createdAt")
///             .field("updated_at", "updatedAt")
///             .build()
///     }
///
///     fn field(&self, column: &str) -> Option<SqlValue> {
///         match column {
///             "id" => Some(self.id.into()),
///             "name" => Some((&self.name).into()),
///             _ => None,
///         }
///     }
/// }
/// ```
pub trait Record: Send + Sync + Unpin + 'static {
    fn schema() -> Result<Schema, SchemaError>;

    /// Current value of the field mapped to `column`.
    ///
    /// Must answer for the identity column and every writable column.
    fn field(&self, column: &str) -> Option<SqlValue>;
}
