//! Create lookup tables: `country_master`, `state_master`, `currency`, `weight`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CountryMaster::Table)
                    .if_not_exists()
                    .col(uuid(CountryMaster::Id).primary_key())
                    .col(string_len(CountryMaster::Code, 3).unique_key())
                    .col(string_len(CountryMaster::Name, 128))
                    .col(string_len_null(CountryMaster::PhoneCode, 8))
                    .col(boolean(CountryMaster::IsActive))
                    .col(timestamp_with_time_zone(CountryMaster::CreatedDate))
                    .col(timestamp_with_time_zone(CountryMaster::ModifiedDate))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(StateMaster::Table)
                    .if_not_exists()
                    .col(uuid(StateMaster::Id).primary_key())
                    .col(uuid(StateMaster::CountryId))
                    .col(string_len(StateMaster::Code, 8))
                    .col(string_len(StateMaster::Name, 128))
                    .col(string_len_null(StateMaster::GstCode, 2))
                    .col(boolean(StateMaster::IsActive))
                    .col(timestamp_with_time_zone(StateMaster::CreatedDate))
                    .col(timestamp_with_time_zone(StateMaster::ModifiedDate))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_state_country")
                            .from(StateMaster::Table, StateMaster::CountryId)
                            .to(CountryMaster::Table, CountryMaster::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Currency::Table)
                    .if_not_exists()
                    .col(uuid(Currency::Id).primary_key())
                    .col(string_len(Currency::Code, 3).unique_key())
                    .col(string_len(Currency::Name, 64))
                    .col(string_len(Currency::Symbol, 8))
                    .col(boolean(Currency::IsActive))
                    .col(boolean(Currency::IsDeleted))
                    .col(timestamp_with_time_zone(Currency::CreatedDate))
                    .col(timestamp_with_time_zone(Currency::ModifiedDate))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Weight::Table)
                    .if_not_exists()
                    .col(uuid(Weight::Id).primary_key())
                    .col(decimal_len(Weight::Value, 10, 3))
                    .col(string_len(Weight::Unit, 8))
                    .col(string_len(Weight::Label, 32))
                    .col(boolean(Weight::IsActive))
                    .col(boolean(Weight::IsDeleted))
                    .col(timestamp_with_time_zone(Weight::CreatedDate))
                    .col(timestamp_with_time_zone(Weight::ModifiedDate))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Weight::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Currency::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(StateMaster::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(CountryMaster::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum CountryMaster { Table, Id, Code, Name, PhoneCode, IsActive, CreatedDate, ModifiedDate }

#[derive(DeriveIden)]
enum StateMaster { Table, Id, CountryId, Code, Name, GstCode, IsActive, CreatedDate, ModifiedDate }

#[derive(DeriveIden)]
enum Currency { Table, Id, Code, Name, Symbol, IsActive, IsDeleted, CreatedDate, ModifiedDate }

#[derive(DeriveIden)]
enum Weight { Table, Id, Value, Unit, Label, IsActive, IsDeleted, CreatedDate, ModifiedDate }
