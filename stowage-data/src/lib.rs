//! # stowage-data — driver-agnostic pieces of the storage engine
//!
//! Entity descriptors and their column projections, bound values and named
//! parameters, SQL fragment checks, statement text, paging types, errors, and the
//! [`GenericStorage`] contract. The SQLx implementation lives in
//! `stowage-data-sqlx`.

pub mod entity;
pub mod error;
pub mod page;
pub mod projection;
pub mod query;
pub mod schema;
pub mod statement;
pub mod storage;
pub mod value;

pub use entity::Record;
pub use error::DataError;
pub use page::{Page, Pageable};
pub use projection::Projections;
pub use query::{compile_named, split_predicate, validate_predicate, Dialect, QueryError};
pub use schema::{ColumnKind, Field, Schema, SchemaBuilder, SchemaError};
pub use statement::Statements;
pub use storage::GenericStorage;
pub use value::{Params, SqlValue};

pub mod prelude {
    //! Re-exports of the most commonly used data types.
    pub use crate::params;
    pub use crate::{
        DataError, GenericStorage, Page, Pageable, Params, Record, Schema, SchemaError, SqlValue,
    };
}
