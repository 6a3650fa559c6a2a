#![allow(dead_code)]

use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use sqlx::Sqlite;
use stowage_data::{Record, Schema, SchemaError, SqlValue};
use stowage_data_sqlx::SqlxStorage;

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Roster {
    pub id: i64,
    pub name: String,
    pub role: String,
    #[sqlx(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[sqlx(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
    #[sqlx(skip)]
    pub display: Option<String>,
}

impl Roster {
    pub fn new(name: &str, role: &str) -> Self {
        Self {
            id: 0,
            name: name.to_string(),
            role: role.to_string(),
            created_at: DateTime::UNIX_EPOCH,
            updated_at: DateTime::UNIX_EPOCH,
            display: None,
        }
    }
}

impl Record for Roster {
    fn schema() -> Result<Schema, SchemaError> {
        Schema::builder()
            .field("id", "id")
            .field("name", "name")
            .field("role", "role")
            .field("created_at", "createdAt")
            .field("updated_at", "updatedAt")
            .ignore("display")
            .build()
    }

    fn field(&self, column: &str) -> Option<SqlValue> {
        match column {
            "id" => Some(self.id.into()),
            "name" => Some((&self.name).into()),
            "role" => Some((&self.role).into()),
            "createdAt" => Some(self.created_at.into()),
            "updatedAt" => Some(self.updated_at.into()),
            _ => None,
        }
    }
}

pub const CREATE_ROSTERS: &str = r#"
CREATE TABLE "rosters" (
    "id" INTEGER PRIMARY KEY AUTOINCREMENT,
    "name" TEXT NOT NULL UNIQUE,
    "role" TEXT NOT NULL,
    "createdAt" DATETIME NOT NULL,
    "updatedAt" DATETIME NOT NULL,
    "deletedAt" DATETIME
)
"#;

/// One-connection in-memory database with an empty `rosters` table.
pub async fn setup() -> (SqlitePool, SqlxStorage<Roster, Sqlite>) {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    sqlx::query(CREATE_ROSTERS).execute(&pool).await.unwrap();
    let storage = SqlxStorage::new("rosters").unwrap();
    (pool, storage)
}

/// Entity with no writable columns: only identity and audit timestamps.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Heartbeat {
    pub id: i64,
    #[sqlx(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[sqlx(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl Heartbeat {
    pub fn new() -> Self {
        Self {
            id: 0,
            created_at: DateTime::UNIX_EPOCH,
            updated_at: DateTime::UNIX_EPOCH,
        }
    }
}

impl Record for Heartbeat {
    fn schema() -> Result<Schema, SchemaError> {
        Schema::builder()
            .field("id", "id")
            .field("created_at", "createdAt")
            .field("updated_at", "updatedAt")
            .build()
    }

    fn field(&self, column: &str) -> Option<SqlValue> {
        match column {
            "id" => Some(self.id.into()),
            "createdAt" => Some(self.created_at.into()),
            "updatedAt" => Some(self.updated_at.into()),
            _ => None,
        }
    }
}

pub const CREATE_HEARTBEATS: &str = r#"
CREATE TABLE "heartbeats" (
    "id" INTEGER PRIMARY KEY AUTOINCREMENT,
    "createdAt" DATETIME NOT NULL,
    "updatedAt" DATETIME NOT NULL,
    "deletedAt" DATETIME
)
"#;
