use sqlx::error::BoxDynError;
use sqlx::Database;
use stowage_data::{Dialect, SqlValue};

/// A SQLx database the storage engine can generate statements for.
///
/// Supplies the placeholder dialect and moves compiled [`SqlValue`]s into the
/// driver's argument buffer. Implemented for `sqlx::Sqlite` (feature
/// `sqlite`) and `sqlx::Postgres` (feature `postgres`).
pub trait Backend: Database {
    const DIALECT: Dialect;

    fn arguments<'q>(values: Vec<SqlValue>) -> Result<Self::Arguments<'q>, BoxDynError>;
}

#[allow(unused_macros)]
macro_rules! impl_backend {
    ($db:ty, $dialect:expr) => {
        impl Backend for $db {
            const DIALECT: Dialect = $dialect;

            fn arguments<'q>(
                values: Vec<SqlValue>,
            ) -> Result<<Self as Database>::Arguments<'q>, BoxDynError> {
                use sqlx::Arguments as _;

                let mut args: <Self as Database>::Arguments<'q> = Default::default();
                args.reserve(values.len(), 0);
                for value in values {
                    match value {
                        SqlValue::Bool(v) => args.add(v)?,
                        SqlValue::Int(v) => args.add(v)?,
                        SqlValue::Float(v) => args.add(v)?,
                        SqlValue::Text(v) => args.add(v)?,
                        SqlValue::Bytes(v) => args.add(v)?,
                        SqlValue::Timestamp(v) => args.add(v)?,
                    }
                }
                Ok(args)
            }
        }
    };
}

#[cfg(feature = "sqlite")]
impl_backend!(sqlx::Sqlite, Dialect::Sqlite);

#[cfg(feature = "postgres")]
impl_backend!(sqlx::Postgres, Dialect::Postgres);
