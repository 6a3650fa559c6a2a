use stowage_core::{init_tracing, ConfigError, DatabaseSettings, LoggingSettings, StowageConfig};
use stowage_data::Pageable;
use stowage_data_sqlx::connect;

mod error;
mod models;
mod services;

use error::AppError;
use models::roster::{Roster, CREATE_TABLE};
use services::roster_service::RosterService;

fn database_settings(config: &StowageConfig) -> Result<DatabaseSettings, ConfigError> {
    match config.section::<DatabaseSettings>() {
        Err(ConfigError::NotFound(_)) => {
            Ok(DatabaseSettings::new("sqlite::memory:").with_max_connections(1))
        }
        other => other,
    }
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let config = StowageConfig::load("dev").unwrap_or_else(|_| StowageConfig::empty());

    let logging: LoggingSettings = config.section()?;
    init_tracing(&logging);

    let settings = database_settings(&config)?;
    let pool = connect::<sqlx::Sqlite>(&settings).await?;
    sqlx::query(CREATE_TABLE).execute(&pool).await?;

    let service = RosterService::new(pool)?;

    let guardian = service.sign("GuardiaN", "AWP", "FaZe").await?;
    let zywoo = service.sign("ZywOo", "AWP", "Vitality").await?;
    service
        .sign_all(vec![
            Roster::new("ropz", "Lurker", Some("FaZe")),
            Roster::new("apEX", "IGL", Some("Vitality")),
            Roster::new("karrigan", "IGL", Some("FaZe")),
        ])
        .await?;

    service.transfer(guardian.id, zywoo.id).await?;
    let moved = service.get(guardian.id).await?;
    tracing::info!(name = %moved.name, team = ?moved.team, "after transfer");

    // Same team: the transaction rolls back and nothing changes.
    if let Err(err) = service.transfer(guardian.id, moved.id).await {
        tracing::warn!(error = %err, "transfer refused");
    }

    service.release(zywoo.id).await?;
    match service.get(zywoo.id).await {
        Err(AppError::NotFound(what)) => tracing::info!(%what, "released player is hidden"),
        other => tracing::warn!(result = ?other.map(|r| r.id), "released player still visible"),
    }

    let faze = service.by_team("FaZe").await?;
    tracing::info!(count = faze.len(), "FaZe roster");

    let page = service.list(&Pageable::new(1, 2)).await?;
    let json = serde_json::to_string_pretty(&page)
        .map_err(|e| AppError::Internal(e.to_string()))?;
    println!("{json}");

    Ok(())
}
