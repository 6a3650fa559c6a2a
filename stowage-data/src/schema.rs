//! Entity descriptors and convention-based column classification.
//!
//! A [`Schema`] lists an entity's fields in declaration order, each mapped to
//! a storage column. The column name alone decides how the engine treats the
//! field:
//!
//! | Column | Kind | SELECT | INSERT / UPDATE |
//! |--------|------|--------|-----------------|
//! | `""`, `"-"` | [`ColumnKind::Ignored`] | no | no |
//! | `id` | [`ColumnKind::Identity`] | yes | never (database-generated) |
//! | `createdAt`, `updatedAt`, `deletedAt` | [`ColumnKind::Audit`] | yes | engine-generated |
//! | anything else | [`ColumnKind::Writable`] | yes | yes |

use crate::query::is_valid_identifier;

pub const IDENTITY_COLUMN: &str = "id";
pub const CREATED_AT_COLUMN: &str = "createdAt";
pub const UPDATED_AT_COLUMN: &str = "updatedAt";
pub const DELETED_AT_COLUMN: &str = "deletedAt";

const IGNORE_MARKER: &str = "-";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Ignored,
    Identity,
    Audit,
    Writable,
}

impl ColumnKind {
    pub fn classify(column: &str) -> Self {
        match column {
            "" | IGNORE_MARKER => ColumnKind::Ignored,
            IDENTITY_COLUMN => ColumnKind::Identity,
            CREATED_AT_COLUMN | UPDATED_AT_COLUMN | DELETED_AT_COLUMN => ColumnKind::Audit,
            _ => ColumnKind::Writable,
        }
    }

    pub fn is_selectable(self) -> bool {
        self != ColumnKind::Ignored
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub column: &'static str,
    pub kind: ColumnKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    MissingIdentity,
    DuplicateIdentity { fields: Vec<&'static str> },
    DuplicateColumn(&'static str),
    InvalidColumn { field: &'static str, column: &'static str },
}

impl std::fmt::Display for SchemaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchemaError::MissingIdentity => {
                write!(f, "Schema has no field mapped to the `{IDENTITY_COLUMN}` column")
            }
            SchemaError::DuplicateIdentity { fields } => write!(
                f,
                "Schema maps more than one field to `{IDENTITY_COLUMN}`: {}",
                fields.join(", ")
            ),
            SchemaError::DuplicateColumn(column) => {
                write!(f, "Column `{column}` is mapped more than once")
            }
            SchemaError::InvalidColumn { field, column } => {
                write!(f, "Field `{field}` maps to invalid column name `{column}`")
            }
        }
    }
}

impl std::error::Error for SchemaError {}

/// Validated entity descriptor. Built with [`Schema::builder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    fields: Vec<Field>,
    identity: usize,
}

impl Schema {
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder { fields: Vec::new() }
    }

    /// All fields in declaration order, ignored ones included.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// The single identity field.
    pub fn identity(&self) -> &Field {
        &self.fields[self.identity]
    }

    pub fn writable(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| f.kind == ColumnKind::Writable)
    }

    pub fn selectable(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| f.kind.is_selectable())
    }
}

pub struct SchemaBuilder {
    fields: Vec<Field>,
}

impl SchemaBuilder {
    /// Map a logical field to a storage column.
    pub fn field(mut self, name: &'static str, column: &'static str) -> Self {
        self.fields.push(Field {
            name,
            column,
            kind: ColumnKind::classify(column),
        });
        self
    }

    /// Declare a field that never takes part in generated SQL.
    pub fn ignore(self, name: &'static str) -> Self {
        self.field(name, IGNORE_MARKER)
    }

    pub fn build(self) -> Result<Schema, SchemaError> {
        let identities: Vec<usize> = self
            .fields
            .iter()
            .enumerate()
            .filter(|(_, f)| f.kind == ColumnKind::Identity)
            .map(|(idx, _)| idx)
            .collect();
        let identity = match identities.as_slice() {
            [] => return Err(SchemaError::MissingIdentity),
            [idx] => *idx,
            _ => {
                return Err(SchemaError::DuplicateIdentity {
                    fields: identities.iter().map(|&idx| self.fields[idx].name).collect(),
                })
            }
        };

        let mut seen: Vec<&'static str> = Vec::with_capacity(self.fields.len());
        for field in self.fields.iter().filter(|f| f.kind.is_selectable()) {
            if !is_valid_identifier(field.column) {
                return Err(SchemaError::InvalidColumn {
                    field: field.name,
                    column: field.column,
                });
            }
            if seen.contains(&field.column) {
                return Err(SchemaError::DuplicateColumn(field.column));
            }
            seen.push(field.column);
        }

        Ok(Schema {
            fields: self.fields,
            identity,
        })
    }
}
