use sqlx::{Sqlite, SqlitePool};
use stowage_data::{params, GenericStorage, Page, Pageable};
use stowage_data_sqlx::{Conn, DataErrorExt, SqlxStorage, TxManager};

use crate::error::AppError;
use crate::models::roster::{Roster, TABLE};

#[derive(Clone)]
pub struct RosterService {
    pool: SqlitePool,
    storage: SqlxStorage<Roster, Sqlite>,
    tx: TxManager<Sqlite>,
}

impl RosterService {
    pub fn new(pool: SqlitePool) -> Result<Self, AppError> {
        Ok(Self {
            storage: SqlxStorage::new(TABLE)?,
            tx: TxManager::new(pool.clone()),
            pool,
        })
    }

    pub async fn sign(&self, name: &str, role: &str, team: &str) -> Result<Roster, AppError> {
        let mut roster = Roster::new(name, role, Some(team));
        self.storage
            .insert(Conn::Pool(&self.pool), &mut roster)
            .await?;
        tracing::info!(id = roster.id, name = %roster.name, "player signed");
        Ok(roster)
    }

    pub async fn sign_all(&self, mut rosters: Vec<Roster>) -> Result<Vec<Roster>, AppError> {
        self.storage
            .insert_bulk(Conn::Pool(&self.pool), &mut rosters)
            .await?;
        Ok(rosters)
    }

    pub async fn get(&self, id: i64) -> Result<Roster, AppError> {
        let mut roster = Roster::new("", "", None);
        match self
            .storage
            .find_by_id(Conn::Pool(&self.pool), &mut roster, id)
            .await
        {
            Ok(()) => Ok(roster),
            Err(err) if err.is_row_not_found() => Err(AppError::NotFound(format!("roster {id}"))),
            Err(err) => Err(err.into()),
        }
    }

    pub async fn by_team(&self, team: &str) -> Result<Vec<Roster>, AppError> {
        let mut out = Vec::new();
        self.storage
            .find_where(
                Conn::Pool(&self.pool),
                &mut out,
                r#""team" = :team"#,
                params! { "team" => team },
            )
            .await?;
        Ok(out)
    }

    pub async fn list(&self, pageable: &Pageable) -> Result<Page<Roster>, AppError> {
        Ok(self
            .storage
            .find_page(Conn::Pool(&self.pool), pageable)
            .await?)
    }

    /// Move a player to another team, swapping roles with the player they
    /// replace. Both rows change or neither does.
    pub async fn transfer(&self, player_id: i64, replaced_id: i64) -> Result<(), AppError> {
        let storage = &self.storage;
        self.tx
            .run_in_transaction(|tx| async move {
                let mut player = Roster::new("", "", None);
                storage
                    .find_by_id(Conn::Tx(&tx), &mut player, player_id)
                    .await?;
                let mut replaced = Roster::new("", "", None);
                storage
                    .find_by_id(Conn::Tx(&tx), &mut replaced, replaced_id)
                    .await?;

                if player.team == replaced.team {
                    return Err(AppError::Internal(format!(
                        "{} and {} already play together",
                        player.name, replaced.name
                    )));
                }

                std::mem::swap(&mut player.team, &mut replaced.team);
                std::mem::swap(&mut player.role, &mut replaced.role);
                storage.update(Conn::Tx(&tx), &mut player).await?;
                storage.update(Conn::Tx(&tx), &mut replaced).await?;
                tracing::info!(
                    player = %player.name,
                    replaced = %replaced.name,
                    "transfer completed"
                );
                Ok(())
            })
            .await
    }

    pub async fn release(&self, id: i64) -> Result<(), AppError> {
        self.storage.delete(Conn::Pool(&self.pool), id).await?;
        tracing::info!(id, "player released");
        Ok(())
    }
}
