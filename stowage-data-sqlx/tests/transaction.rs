mod common;

use common::{setup, Roster};
use stowage_data::{DataError, GenericStorage};
use stowage_data_sqlx::{Conn, DataErrorExt, SqlxErrorExt, TxManager};

#[derive(Debug)]
enum AppError {
    Data(DataError),
    Forced,
}

impl From<DataError> for AppError {
    fn from(err: DataError) -> Self {
        AppError::Data(err)
    }
}

#[tokio::test]
async fn test_commit_on_success() {
    let (pool, storage) = setup().await;
    let manager = TxManager::new(pool.clone());

    let storage_ref = &storage;
    let id = manager
        .run_in_transaction(|tx| async move {
            let mut roster = Roster::new("ZywOo", "AWP");
            storage_ref.insert(Conn::Tx(&tx), &mut roster).await?;

            let mut seen = Roster::new("", "");
            storage_ref
                .find_by_id(Conn::Tx(&tx), &mut seen, roster.id)
                .await?;
            assert_eq!(seen.name, "ZywOo");
            Ok::<_, DataError>(roster.id)
        })
        .await
        .unwrap();

    let mut found = Roster::new("", "");
    storage
        .find_by_id(Conn::Pool(&pool), &mut found, id)
        .await
        .unwrap();
    assert_eq!(found.name, "ZywOo");
}

#[tokio::test]
async fn test_rollback_on_work_failure() {
    let (pool, storage) = setup().await;
    let manager = TxManager::new(pool.clone());

    let mut attempted = 0i64;
    let slot = &mut attempted;
    let storage_ref = &storage;
    let result: Result<(), AppError> = manager
        .run_in_transaction(|tx| async move {
            let mut roster = Roster::new("A", "Rifler");
            storage_ref.insert(Conn::Tx(&tx), &mut roster).await?;
            *slot = roster.id;
            Err(AppError::Forced)
        })
        .await;

    assert!(matches!(result, Err(AppError::Forced)));
    assert_eq!(attempted, 1);

    let mut found = Roster::new("", "");
    let err = storage
        .find_by_id(Conn::Pool(&pool), &mut found, attempted)
        .await
        .unwrap_err();
    assert!(err.is_row_not_found());
    assert_eq!(storage.count(Conn::Pool(&pool)).await.unwrap(), 0);
}

#[tokio::test]
async fn test_storage_error_inside_work_rolls_back() {
    let (pool, storage) = setup().await;
    let manager = TxManager::new(pool.clone());

    let storage_ref = &storage;
    let result = manager
        .run_in_transaction(|tx| async move {
            let mut first = Roster::new("dupe", "AWP");
            storage_ref.insert(Conn::Tx(&tx), &mut first).await?;
            let mut second = Roster::new("dupe", "AWP");
            storage_ref.insert(Conn::Tx(&tx), &mut second).await?;
            Ok::<_, AppError>(())
        })
        .await;

    match result {
        Err(AppError::Data(err)) => assert!(matches!(err, DataError::Database(_))),
        other => panic!("unexpected result: {other:?}"),
    }
    assert_eq!(storage.count(Conn::Pool(&pool)).await.unwrap(), 0);
}

#[tokio::test]
async fn test_raw_queries_share_the_transaction() {
    let (pool, storage) = setup().await;
    let manager = TxManager::new(pool.clone());

    let storage_ref = &storage;
    let result: Result<(), AppError> = manager
        .run_in_transaction(|tx| async move {
            let mut roster = Roster::new("NiKo", "Rifler");
            storage_ref.insert(Conn::Tx(&tx), &mut roster).await?;

            {
                let mut guard = tx.lock().await;
                let conn = guard.as_mut().ok_or(DataError::TransactionClosed)?;
                sqlx::query(r#"UPDATE "rosters" SET "role" = 'IGL' WHERE "id" = ?"#)
                    .bind(roster.id)
                    .execute(&mut **conn)
                    .await
                    .map_err(|e| e.into_data_error())?;
            }

            let id = roster.id;
            storage_ref.find_by_id(Conn::Tx(&tx), &mut roster, id).await?;
            assert_eq!(roster.role, "IGL");
            Err(AppError::Forced)
        })
        .await;

    assert!(matches!(result, Err(AppError::Forced)));
    assert_eq!(storage.count(Conn::Pool(&pool)).await.unwrap(), 0);
}

#[tokio::test]
async fn test_manual_begin_and_closed_handle() {
    let (pool, storage) = setup().await;
    let manager = TxManager::new(pool.clone());

    let tx = manager.begin().await.unwrap();
    let mut roster = Roster::new("ropz", "Lurker");
    storage.insert(Conn::Tx(&tx), &mut roster).await.unwrap();
    tx.commit().await.unwrap();
    assert!(!tx.is_active().await);

    let mut late = Roster::new("late", "Entry");
    let err = storage
        .insert(Conn::Tx(&tx), &mut late)
        .await
        .unwrap_err();
    assert!(matches!(err, DataError::TransactionClosed));
    assert_eq!(storage.count(Conn::Pool(&pool)).await.unwrap(), 1);
}

#[tokio::test]
async fn test_manual_rollback() {
    let (pool, storage) = setup().await;
    let manager = TxManager::new(pool.clone());

    let tx = manager.begin().await.unwrap();
    let mut rosters = vec![Roster::new("a", "AWP"), Roster::new("b", "AWP")];
    storage
        .insert_bulk(Conn::Tx(&tx), &mut rosters)
        .await
        .unwrap();
    assert_eq!(storage.count(Conn::Tx(&tx)).await.unwrap(), 2);
    tx.rollback().await.unwrap();

    assert_eq!(storage.count(Conn::Pool(&pool)).await.unwrap(), 0);
}

#[tokio::test]
async fn test_commit_failure_is_reported_and_rolled_back() {
    let (pool, storage) = setup().await;
    sqlx::query(
        r#"CREATE TABLE "contracts" (
            "id" INTEGER PRIMARY KEY,
            "rosterId" INTEGER NOT NULL
                REFERENCES "rosters"("id") DEFERRABLE INITIALLY DEFERRED
        )"#,
    )
    .execute(&pool)
    .await
    .unwrap();
    let manager = TxManager::new(pool.clone());

    let storage_ref = &storage;
    let err = manager
        .run_in_transaction(|tx| async move {
            let mut roster = Roster::new("Twistzz", "Rifler");
            storage_ref.insert(Conn::Tx(&tx), &mut roster).await?;

            // Deferred: only checked when the transaction commits.
            let mut guard = tx.lock().await;
            let conn = guard.as_mut().ok_or(DataError::TransactionClosed)?;
            sqlx::query(r#"INSERT INTO "contracts" ("rosterId") VALUES (999)"#)
                .execute(&mut **conn)
                .await
                .map_err(|e| e.into_data_error())?;
            Ok::<_, DataError>(())
        })
        .await
        .unwrap_err();

    assert!(matches!(err, DataError::TransactionCommitFailed(_)));
    assert!(err
        .to_string()
        .starts_with("Error when committing transaction"));
    assert_eq!(storage.count(Conn::Pool(&pool)).await.unwrap(), 0);
    let (contracts,): (i64,) = sqlx::query_as(r#"SELECT COUNT(*) FROM "contracts""#)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(contracts, 0);
}

#[tokio::test]
async fn test_failed_rollback_keeps_the_work_error() {
    let (pool, storage) = setup().await;
    let manager = TxManager::new(pool.clone());

    let storage_ref = &storage;
    let result: Result<(), AppError> = manager
        .run_in_transaction(|tx| async move {
            let mut roster = Roster::new("ropz", "Lurker");
            storage_ref.insert(Conn::Tx(&tx), &mut roster).await?;
            // The runner's own rollback now fails with `TransactionClosed`.
            tx.rollback().await?;
            Err(AppError::Forced)
        })
        .await;

    assert!(matches!(result, Err(AppError::Forced)));
    assert_eq!(storage.count(Conn::Pool(&pool)).await.unwrap(), 0);
}
