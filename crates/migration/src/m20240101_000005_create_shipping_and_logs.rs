//! Create `shipment`, `analytics_event` and `third_party_api_log`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Shipment::Table)
                    .if_not_exists()
                    .col(uuid(Shipment::Id).primary_key())
                    .col(uuid(Shipment::OrderId))
                    .col(string_len(Shipment::Carrier, 16))
                    .col(string_len_null(Shipment::AwbNumber, 64))
                    .col(string_len(Shipment::Status, 32))
                    .col(text_null(Shipment::LastEvent))
                    .col(string_len_null(Shipment::LastLocation, 128))
                    .col(timestamp_with_time_zone_null(Shipment::ExpectedDelivery))
                    .col(timestamp_with_time_zone(Shipment::CreatedDate))
                    .col(timestamp_with_time_zone(Shipment::ModifiedDate))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_shipment_order")
                            .from(Shipment::Table, Shipment::OrderId)
                            .to(Order::Table, Order::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AnalyticsEvent::Table)
                    .if_not_exists()
                    .col(uuid(AnalyticsEvent::Id).primary_key())
                    .col(uuid_null(AnalyticsEvent::UserId))
                    .col(string_len_null(AnalyticsEvent::SessionId, 64))
                    .col(string_len(AnalyticsEvent::EventType, 64))
                    .col(string_len_null(AnalyticsEvent::Path, 512))
                    .col(json_binary_null(AnalyticsEvent::Payload))
                    .col(timestamp_with_time_zone(AnalyticsEvent::CreatedDate))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ThirdPartyApiLog::Table)
                    .if_not_exists()
                    .col(uuid(ThirdPartyApiLog::Id).primary_key())
                    .col(string_len(ThirdPartyApiLog::Provider, 32))
                    .col(string_len(ThirdPartyApiLog::Endpoint, 512))
                    .col(string_len(ThirdPartyApiLog::Method, 8))
                    .col(text_null(ThirdPartyApiLog::RequestBody))
                    .col(text_null(ThirdPartyApiLog::ResponseBody))
                    .col(integer_null(ThirdPartyApiLog::StatusCode))
                    .col(big_integer(ThirdPartyApiLog::DurationMs))
                    .col(text_null(ThirdPartyApiLog::Error))
                    .col(timestamp_with_time_zone(ThirdPartyApiLog::CreatedDate))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(ThirdPartyApiLog::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(AnalyticsEvent::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Shipment::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Shipment {
    Table,
    Id,
    OrderId,
    Carrier,
    AwbNumber,
    Status,
    LastEvent,
    LastLocation,
    ExpectedDelivery,
    CreatedDate,
    ModifiedDate,
}

#[derive(DeriveIden)]
enum AnalyticsEvent { Table, Id, UserId, SessionId, EventType, Path, Payload, CreatedDate }

#[derive(DeriveIden)]
enum ThirdPartyApiLog {
    Table,
    Id,
    Provider,
    Endpoint,
    Method,
    RequestBody,
    ResponseBody,
    StatusCode,
    DurationMs,
    Error,
    CreatedDate,
}

#[derive(DeriveIden)]
enum Order { Table, Id }
