//! Migrator registering schema migrations in dependency order.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_masters;
mod m20240101_000002_create_catalog;
mod m20240101_000003_create_users;
mod m20240101_000004_create_commerce;
mod m20240101_000005_create_shipping_and_logs;
mod m20240101_000006_seed_roles;
mod m20240101_000007_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_masters::Migration),
            Box::new(m20240101_000002_create_catalog::Migration),
            Box::new(m20240101_000003_create_users::Migration),
            Box::new(m20240101_000004_create_commerce::Migration),
            Box::new(m20240101_000005_create_shipping_and_logs::Migration),
            Box::new(m20240101_000006_seed_roles::Migration),
            // Indexes should always be applied last
            Box::new(m20240101_000007_add_indexes::Migration),
        ]
    }
}
