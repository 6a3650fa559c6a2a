use chrono::{DateTime, Utc};
use serde::Serialize;
use stowage_data::{Record, Schema, SchemaError, SqlValue};

pub const TABLE: &str = "rosters";

pub const CREATE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS "rosters" (
    "id" INTEGER PRIMARY KEY AUTOINCREMENT,
    "name" TEXT NOT NULL UNIQUE,
    "role" TEXT NOT NULL,
    "team" TEXT,
    "createdAt" DATETIME NOT NULL,
    "updatedAt" DATETIME NOT NULL,
    "deletedAt" DATETIME
)
"#;

#[derive(Clone, Debug, Serialize, sqlx::FromRow)]
pub struct Roster {
    pub id: i64,
    pub name: String,
    pub role: String,
    pub team: Option<String>,
    #[sqlx(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[sqlx(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl Roster {
    pub fn new(name: &str, role: &str, team: Option<&str>) -> Self {
        Self {
            id: 0,
            name: name.to_string(),
            role: role.to_string(),
            team: team.map(str::to_string),
            created_at: DateTime::UNIX_EPOCH,
            updated_at: DateTime::UNIX_EPOCH,
        }
    }
}

impl Record for Roster {
    fn schema() -> Result<Schema, SchemaError> {
        Schema::builder()
            .field("id", "id")
            .field("name", "name")
            .field("role", "role")
            .field("team", "team")
            .field("created_at", "createdAt")
            .field("updated_at", "updatedAt")
            .build()
    }

    fn field(&self, column: &str) -> Option<SqlValue> {
        match column {
            "id" => Some(self.id.into()),
            "name" => Some((&self.name).into()),
            "role" => Some((&self.role).into()),
            "team" => Some(self.team.as_deref().into()),
            _ => None,
        }
    }
}
