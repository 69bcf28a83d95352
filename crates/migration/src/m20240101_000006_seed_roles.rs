//! Seed the two built-in roles. Registration assigns `customer`.
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(
                r#"INSERT INTO "role" ("id", "name", "description", "created_date") VALUES
                    (gen_random_uuid(), 'admin', 'Store administrator', now()),
                    (gen_random_uuid(), 'customer', 'Storefront customer', now())
                ON CONFLICT ("name") DO NOTHING"#,
            )
            .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(r#"DELETE FROM "role" WHERE "name" IN ('admin', 'customer')"#)
            .await?;
        Ok(())
    }
}
