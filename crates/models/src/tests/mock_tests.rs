use anyhow::Result;
use sea_orm::{DatabaseBackend, EntityTrait, MockDatabase, QueryTrait};
use uuid::Uuid;

use crate::{currency, now, role, user, Resource};

#[test]
fn visible_filter_hides_soft_deleted() {
    let sql = <currency::Entity as Resource>::visible(currency::Entity::find())
        .build(DatabaseBackend::Postgres)
        .to_string();
    assert!(sql.contains(r#""is_deleted" = FALSE"#), "{sql}");
}

#[tokio::test]
async fn find_role_by_name_on_mock() -> Result<()> {
    let admin = role::Model { id: Uuid::new_v4(), name: role::ADMIN.into(), description: None, created_date: now() };
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![admin.clone()]])
        .into_connection();
    let found = role::find_by_name(&db, role::ADMIN).await?;
    assert_eq!(found, Some(admin));
    Ok(())
}

#[tokio::test]
async fn find_user_by_email_lowercases() -> Result<()> {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<user::Model>::new()])
        .into_connection();
    assert!(user::find_by_email(&db, "Chef@Example.COM").await?.is_none());
    let log = db.into_transaction_log();
    let sql = format!("{:?}", log[0]);
    assert!(sql.contains("chef@example.com"), "{sql}");
    Ok(())
}
