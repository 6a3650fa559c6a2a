use sqlx::pool::PoolOptions;
use sqlx::{Database, Pool};
use stowage_core::DatabaseSettings;
use stowage_data::DataError;

/// Open a pool sized and timed by `settings`.
pub async fn connect<DB: Database>(settings: &DatabaseSettings) -> Result<Pool<DB>, DataError> {
    let pool = PoolOptions::<DB>::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(settings.acquire_timeout)
        .connect(&settings.url)
        .await
        .map_err(DataError::database)?;
    tracing::info!(
        max_connections = settings.max_connections,
        "database pool ready"
    );
    Ok(pool)
}

#[cfg(all(test, feature = "sqlite"))]
mod tests {
    use super::*;
    use sqlx::Sqlite;

    #[tokio::test]
    async fn test_connect_sqlite_memory() {
        let settings = DatabaseSettings::new("sqlite::memory:").with_max_connections(1);
        let pool = connect::<Sqlite>(&settings).await.unwrap();
        assert_eq!(pool.options().get_max_connections(), 1);
        let one: i64 = sqlx::query_scalar("SELECT 1").fetch_one(&pool).await.unwrap();
        assert_eq!(one, 1);
    }

    #[tokio::test]
    async fn test_connect_bad_url() {
        let settings = DatabaseSettings::new("sqlite:/definitely/missing/dir/stowage.db");
        assert!(matches!(
            connect::<Sqlite>(&settings).await,
            Err(DataError::Database(_))
        ));
    }
}
