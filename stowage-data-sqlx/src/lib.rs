//! # stowage-data-sqlx — SQLx backend for the Stowage data layer
//!
//! This crate provides the [SQLx](https://github.com/launchbadge/sqlx)-specific
//! pieces of the data access layer. It depends on [`stowage-data`] for the
//! entity descriptors and the storage contract, and adds the storage engine,
//! transaction management and error bridging needed to talk to a real
//! database.
//!
//! # What's in this crate
//!
//! | Type | Description |
//! |------|-------------|
//! | [`SqlxStorage`] | Generic storage engine for one entity type and one table |
//! | [`Conn`] | The connection an operation runs on: a pool or a [`Tx`] |
//! | [`Tx`] | Shared handle to an open transaction |
//! | [`TxManager`] | Begins transactions and runs units of work with auto commit / rollback |
//! | [`Backend`] | Dialect and argument binding for a concrete SQLx database |
//! | [`SqlxErrorExt`] | `sqlx::Error` → `DataError` (`.into_data_error()`) |
//! | [`DataErrorExt`] | Inspect the `sqlx::Error` inside a `DataError` |
//! | [`connect`] | Build a pool from [`DatabaseSettings`](stowage_core::DatabaseSettings) |
//!
//! # Feature flags
//!
//! | Feature    | Driver |
//! |------------|--------|
//! | `sqlite`   | SQLite via `sqlx/sqlite` (default) |
//! | `postgres` | PostgreSQL via `sqlx/postgres` |
//!
//! # Quick start
//!
//! ```ignore
//! use stowage_data_sqlx::prelude::*;
//! use sqlx::Sqlite;
//!
//! let storage = SqlxStorage::<Roster, Sqlite>::new("rosters")?;
//! let manager = TxManager::new(pool.clone());
//!
//! let mut roster = Roster::new("GuardiaN", "AWP");
//! storage.insert(Conn::Pool(&pool), &mut roster).await?;
//!
//! manager
//!     .run_in_transaction(|tx| async move {
//!         roster.role = "Rifler".into();
//!         storage.update(Conn::Tx(&tx), &mut roster).await?;
//!         Ok::<_, DataError>(())
//!     })
//!     .await?;
//! ```
//!
//! # Locking
//!
//! Row-returning selects issued through [`Conn::Tx`] end with the dialect's
//! row-locking clause (`FOR UPDATE` on PostgreSQL). SQLite has no such
//! clause; its transactions lock the database on first write.

pub mod backend;
pub mod conn;
pub mod error;
pub mod pool;
pub mod storage;
pub mod tx;

pub use backend::Backend;
pub use conn::Conn;
pub use error::{DataErrorExt, SqlxErrorExt, SqlxResult};
pub use pool::connect;
pub use storage::SqlxStorage;
pub use tx::{Tx, TxManager};

/// Re-exports of the most commonly used types from both `stowage-data` and this crate.
pub mod prelude {
    pub use crate::{Conn, DataErrorExt, SqlxErrorExt, SqlxStorage, Tx, TxManager};
    pub use stowage_data::prelude::*;
}
