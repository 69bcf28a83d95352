use std::time::{Duration, Instant};

use anyhow::Result;
use sea_orm::{ConnectionTrait, DatabaseBackend, Statement};

use crate::db::connect_with_config;

#[tokio::test]
async fn test_basic_connection() -> Result<()> {
    let start = Instant::now();
    let Some(db) = super::live_db().await else { return Ok(()) };
    let elapsed = start.elapsed();

    let stmt = Statement::from_string(DatabaseBackend::Postgres, "SELECT 1 as test".to_string());
    let row = db.query_one(stmt).await?.expect("one row");
    let v: i32 = row.try_get("", "test")?;
    assert_eq!(v, 1);
    assert!(elapsed < Duration::from_secs(30), "connect + migrate took {:?}", elapsed);
    Ok(())
}

#[tokio::test]
async fn test_custom_config_connection() -> Result<()> {
    if super::live_db().await.is_none() {
        return Ok(());
    }
    let cfg = configs::DatabaseConfig {
        url: crate::db::DATABASE_URL.clone(),
        max_connections: 5,
        min_connections: 1,
        connect_timeout_secs: 10,
        idle_timeout_secs: 60,
        max_lifetime_secs: 600,
        acquire_timeout_secs: 10,
        sqlx_logging: false,
    };
    let db = connect_with_config(&cfg).await?;
    let stmt = Statement::from_string(DatabaseBackend::Postgres, "SELECT current_database()".to_string());
    assert!(db.query_one(stmt).await?.is_some());
    Ok(())
}

#[tokio::test]
async fn test_seeded_roles_present() -> Result<()> {
    let Some(db) = super::live_db().await else { return Ok(()) };
    assert!(crate::role::find_by_name(&db, crate::role::ADMIN).await?.is_some());
    assert!(crate::role::find_by_name(&db, crate::role::CUSTOMER).await?.is_some());
    Ok(())
}
