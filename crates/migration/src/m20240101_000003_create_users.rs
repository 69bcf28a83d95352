//! Create `role`, `user`, `user_credentials` and `address`.
//!
//! Users reference a role; credentials and addresses cascade with their user.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Role::Table)
                    .if_not_exists()
                    .col(uuid(Role::Id).primary_key())
                    .col(string_len(Role::Name, 32).unique_key())
                    .col(string_len_null(Role::Description, 256))
                    .col(timestamp_with_time_zone(Role::CreatedDate))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(User::Table)
                    .if_not_exists()
                    .col(uuid(User::Id).primary_key())
                    .col(uuid(User::RoleId))
                    .col(string_len(User::Email, 255).unique_key())
                    .col(string_len(User::Name, 128))
                    .col(string_len_null(User::Phone, 20))
                    .col(boolean(User::IsActive))
                    .col(boolean(User::IsDeleted))
                    .col(timestamp_with_time_zone(User::CreatedDate))
                    .col(timestamp_with_time_zone(User::ModifiedDate))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_role")
                            .from(User::Table, User::RoleId)
                            .to(Role::Table, Role::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(UserCredentials::Table)
                    .if_not_exists()
                    .col(uuid(UserCredentials::Id).primary_key())
                    .col(uuid(UserCredentials::UserId).unique_key())
                    .col(string_len(UserCredentials::PasswordHash, 255))
                    .col(string_len(UserCredentials::PasswordAlgorithm, 32))
                    .col(timestamp_with_time_zone(UserCredentials::CreatedDate))
                    .col(timestamp_with_time_zone(UserCredentials::ModifiedDate))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_credentials_user")
                            .from(UserCredentials::Table, UserCredentials::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Address::Table)
                    .if_not_exists()
                    .col(uuid(Address::Id).primary_key())
                    .col(uuid(Address::UserId))
                    .col(string_len(Address::FullName, 128))
                    .col(string_len(Address::Phone, 20))
                    .col(string_len(Address::Line1, 256))
                    .col(string_len_null(Address::Line2, 256))
                    .col(string_len_null(Address::Landmark, 128))
                    .col(string_len(Address::City, 128))
                    .col(uuid(Address::StateId))
                    .col(uuid(Address::CountryId))
                    .col(string_len(Address::PostalCode, 12))
                    .col(boolean(Address::IsDefault))
                    .col(boolean(Address::IsDeleted))
                    .col(timestamp_with_time_zone(Address::CreatedDate))
                    .col(timestamp_with_time_zone(Address::ModifiedDate))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_address_user")
                            .from(Address::Table, Address::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_address_state")
                            .from(Address::Table, Address::StateId)
                            .to(StateMaster::Table, StateMaster::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_address_country")
                            .from(Address::Table, Address::CountryId)
                            .to(CountryMaster::Table, CountryMaster::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Address::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(UserCredentials::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(User::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Role::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Role { Table, Id, Name, Description, CreatedDate }

#[derive(DeriveIden)]
enum User { Table, Id, RoleId, Email, Name, Phone, IsActive, IsDeleted, CreatedDate, ModifiedDate }

#[derive(DeriveIden)]
enum UserCredentials { Table, Id, UserId, PasswordHash, PasswordAlgorithm, CreatedDate, ModifiedDate }

#[derive(DeriveIden)]
enum Address {
    Table,
    Id,
    UserId,
    FullName,
    Phone,
    Line1,
    Line2,
    Landmark,
    City,
    StateId,
    CountryId,
    PostalCode,
    IsDefault,
    IsDeleted,
    CreatedDate,
    ModifiedDate,
}

#[derive(DeriveIden)]
enum StateMaster { Table, Id }

#[derive(DeriveIden)]
enum CountryMaster { Table, Id }
