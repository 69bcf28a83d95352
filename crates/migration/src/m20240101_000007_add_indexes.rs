use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // StateMaster: (country_id, code) is the natural key
        manager
            .create_index(
                Index::create()
                    .name("uniq_state_country_code")
                    .table(StateMaster::Table)
                    .col(StateMaster::CountryId)
                    .col(StateMaster::Code)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Product listing by category
        manager
            .create_index(
                Index::create()
                    .name("idx_product_category")
                    .table(Product::Table)
                    .col(Product::CategoryId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_product_price_product")
                    .table(ProductPrice::Table)
                    .col(ProductPrice::ProductId)
                    .to_owned(),
            )
            .await?;

        // Cart: one line per (user, price)
        manager
            .create_index(
                Index::create()
                    .name("uniq_cart_user_price")
                    .table(Cart::Table)
                    .col(Cart::UserId)
                    .col(Cart::ProductPriceId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_order_user")
                    .table(Order::Table)
                    .col(Order::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_order_item_order")
                    .table(OrderItem::Table)
                    .col(OrderItem::OrderId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_payment_order")
                    .table(Payment::Table)
                    .col(Payment::OrderId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_shipment_order")
                    .table(Shipment::Table)
                    .col(Shipment::OrderId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_analytics_type_created")
                    .table(AnalyticsEvent::Table)
                    .col(AnalyticsEvent::EventType)
                    .col(AnalyticsEvent::CreatedDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_api_log_provider_created")
                    .table(ThirdPartyApiLog::Table)
                    .col(ThirdPartyApiLog::Provider)
                    .col(ThirdPartyApiLog::CreatedDate)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("uniq_state_country_code").table(StateMaster::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_product_category").table(Product::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_product_price_product").table(ProductPrice::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("uniq_cart_user_price").table(Cart::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_order_user").table(Order::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_order_item_order").table(OrderItem::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_payment_order").table(Payment::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_shipment_order").table(Shipment::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_analytics_type_created").table(AnalyticsEvent::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_api_log_provider_created").table(ThirdPartyApiLog::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum StateMaster { Table, CountryId, Code }

#[derive(DeriveIden)]
enum Product { Table, CategoryId }

#[derive(DeriveIden)]
enum ProductPrice { Table, ProductId }

#[derive(DeriveIden)]
enum Cart { Table, UserId, ProductPriceId }

#[derive(DeriveIden)]
enum Order { Table, UserId }

#[derive(DeriveIden)]
enum OrderItem { Table, OrderId }

#[derive(DeriveIden)]
enum Payment { Table, OrderId }

#[derive(DeriveIden)]
enum Shipment { Table, OrderId }

#[derive(DeriveIden)]
enum AnalyticsEvent { Table, EventType, CreatedDate }

#[derive(DeriveIden)]
enum ThirdPartyApiLog { Table, Provider, CreatedDate }
