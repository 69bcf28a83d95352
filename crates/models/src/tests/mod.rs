/// Connection checks against a live Postgres
pub mod db_tests;

/// Catalog CRUD against a live Postgres
pub mod crud_tests;

/// Query shapes checked with the sea-orm mock backend
pub mod mock_tests;

/// Skip live-database tests when asked to or when Postgres is unreachable.
pub(crate) async fn live_db() -> Option<sea_orm::DatabaseConnection> {
    use migration::MigratorTrait;

    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return None;
    }
    let db = match crate::db::connect().await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("skip: cannot connect to db: {}", e);
            return None;
        }
    };
    if let Err(e) = migration::Migrator::up(&db, None).await {
        eprintln!("skip: migrate up failed: {}", e);
        return None;
    }
    Some(db)
}
