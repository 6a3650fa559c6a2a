//! Column projections derived from a [`Schema`].
//!
//! Projections are pure functions of the descriptor, so they are computed
//! once per entity type and shared through a process-wide cache.

use std::any::TypeId;
use std::sync::{Arc, LazyLock};

use dashmap::DashMap;

use crate::entity::Record;
use crate::schema::{Schema, SchemaError, CREATED_AT_COLUMN, UPDATED_AT_COLUMN};

static PROJECTIONS: LazyLock<DashMap<TypeId, Arc<Projections>>> = LazyLock::new(DashMap::new);

/// SQL fragments shared by every statement the engine builds for one entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Projections {
    /// `"id", "name", ...` for every non-ignored column.
    pub select_columns: String,
    /// `"createdAt", "updatedAt", <writable columns>`.
    pub insert_columns: String,
    /// `:createdAt, :updatedAt, :<writable column>...`.
    pub insert_placeholders: String,
    /// `"updatedAt" = :updatedAt, "<col>" = :<col>...`.
    pub update_set: String,
    pub identity: &'static str,
    pub writable: Vec<&'static str>,
}

impl Projections {
    pub fn compute(schema: &Schema) -> Self {
        let writable: Vec<&'static str> = schema.writable().map(|f| f.column).collect();
        let audit = [CREATED_AT_COLUMN, UPDATED_AT_COLUMN];

        let select_columns = schema
            .selectable()
            .map(|f| quoted(f.column))
            .collect::<Vec<_>>()
            .join(", ");
        let insert_columns = audit
            .iter()
            .chain(&writable)
            .map(|c| quoted(c))
            .collect::<Vec<_>>()
            .join(", ");
        let insert_placeholders = audit
            .iter()
            .chain(&writable)
            .map(|c| format!(":{c}"))
            .collect::<Vec<_>>()
            .join(", ");
        let update_set = std::iter::once(&UPDATED_AT_COLUMN)
            .chain(&writable)
            .map(|c| format!("\"{c}\" = :{c}"))
            .collect::<Vec<_>>()
            .join(", ");

        Self {
            select_columns,
            insert_columns,
            insert_placeholders,
            update_set,
            identity: schema.identity().column,
            writable,
        }
    }

    /// Projections for `T`, computed on first use.
    pub fn of<T: Record>() -> Result<Arc<Self>, SchemaError> {
        let key = TypeId::of::<T>();
        if let Some(cached) = PROJECTIONS.get(&key) {
            return Ok(Arc::clone(cached.value()));
        }
        let computed = Arc::new(Self::compute(&T::schema()?));
        Ok(Arc::clone(
            PROJECTIONS.entry(key).or_insert(computed).value(),
        ))
    }

    /// Placeholder tuple for one row of a multi-row insert.
    pub fn row_placeholders(&self, row: usize) -> String {
        let names: Vec<String> = [CREATED_AT_COLUMN, UPDATED_AT_COLUMN]
            .iter()
            .chain(&self.writable)
            .map(|c| format!(":{}", Self::row_parameter(c, row)))
            .collect();
        format!("({})", names.join(", "))
    }

    /// Parameter name of `column` in row `row` of a multi-row insert.
    pub fn row_parameter(column: &str, row: usize) -> String {
        format!("{column}__{row}")
    }
}

fn quoted(column: &str) -> String {
    format!("\"{column}\"")
}
