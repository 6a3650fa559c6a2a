//! SQL text for every statement the storage engine runs on one table.
//!
//! Builders take the target [`Dialect`] and whether row locking applies, so
//! the text does not depend on a live connection.

use std::sync::Arc;

use crate::projection::Projections;
use crate::query::{quote_identifier, split_predicate, Dialect, QueryError};
use crate::schema::DELETED_AT_COLUMN;

/// Parameter names bound by [`Statements::find_all`].
pub const LIMIT_PARAM: &str = "limit";
pub const OFFSET_PARAM: &str = "offset";

#[derive(Debug, Clone)]
pub struct Statements {
    table: String,
    projections: Arc<Projections>,
    dialect: Dialect,
}

impl Statements {
    /// Fails when `table` is not a plain identifier.
    pub fn new(
        table: &str,
        projections: Arc<Projections>,
        dialect: Dialect,
    ) -> Result<Self, QueryError> {
        Ok(Self {
            table: quote_identifier(table, "table")?,
            projections,
            dialect,
        })
    }

    pub fn projections(&self) -> &Projections {
        &self.projections
    }

    fn lock(&self, locked: bool) -> &'static str {
        if locked {
            self.dialect.row_lock_clause()
        } else {
            ""
        }
    }

    /// `"<identity>" = :<identity>`
    pub fn identity_predicate(&self) -> String {
        let id = self.projections.identity;
        format!("\"{id}\" = :{id}")
    }

    /// Live rows matching `predicate`. An `ORDER BY` / `LIMIT` / `OFFSET`
    /// tail is kept outside the parenthesized condition; the lock clause
    /// always comes last.
    pub fn select(&self, predicate: &str, locked: bool) -> Result<String, QueryError> {
        let (condition, tail) = split_predicate(predicate)?;
        let tail = if tail.is_empty() {
            String::new()
        } else {
            format!(" {tail}")
        };
        Ok(format!(
            "SELECT {} FROM {} WHERE \"{DELETED_AT_COLUMN}\" IS NULL AND ({condition}){tail}{}",
            self.projections.select_columns,
            self.table,
            self.lock(locked),
        ))
    }

    /// One page of live rows, newest identity first. Binds `:limit` and
    /// `:offset`.
    pub fn find_all(&self, locked: bool) -> Result<String, QueryError> {
        self.select(
            &format!(
                "TRUE ORDER BY \"{}\" DESC LIMIT :{LIMIT_PARAM} OFFSET :{OFFSET_PARAM}",
                self.projections.identity
            ),
            locked,
        )
    }

    /// Aggregates cannot take row locks, so this is never locked.
    pub fn count(&self) -> String {
        format!(
            "SELECT COUNT(*) FROM {} WHERE \"{DELETED_AT_COLUMN}\" IS NULL",
            self.table
        )
    }

    pub fn insert(&self) -> String {
        format!(
            "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
            self.table,
            self.projections.insert_columns,
            self.projections.insert_placeholders,
            self.projections.select_columns,
        )
    }

    /// Multi-row insert for `rows` rows, using
    /// [`Projections::row_placeholders`] names.
    pub fn insert_bulk(&self, rows: usize) -> String {
        let values = (0..rows)
            .map(|row| self.projections.row_placeholders(row))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "INSERT INTO {} ({}) VALUES {values} RETURNING {}",
            self.table, self.projections.insert_columns, self.projections.select_columns,
        )
    }

    pub fn update(&self) -> String {
        format!(
            "UPDATE {} SET {} WHERE {} RETURNING {}",
            self.table,
            self.projections.update_set,
            self.identity_predicate(),
            self.projections.select_columns,
        )
    }

    /// Soft delete: stamps `deletedAt` on the row.
    pub fn delete(&self) -> String {
        format!(
            "UPDATE {} SET \"{DELETED_AT_COLUMN}\" = :{DELETED_AT_COLUMN} WHERE {} RETURNING {}",
            self.table,
            self.identity_predicate(),
            self.projections.select_columns,
        )
    }
}
