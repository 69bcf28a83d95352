//! Create `cart`, `order`, `order_item`, `payment`, `transaction` and `refund`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Cart::Table)
                    .if_not_exists()
                    .col(uuid(Cart::Id).primary_key())
                    .col(uuid(Cart::UserId))
                    .col(uuid(Cart::ProductPriceId))
                    .col(integer(Cart::Quantity))
                    .col(timestamp_with_time_zone(Cart::CreatedDate))
                    .col(timestamp_with_time_zone(Cart::ModifiedDate))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cart_user")
                            .from(Cart::Table, Cart::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cart_product_price")
                            .from(Cart::Table, Cart::ProductPriceId)
                            .to(ProductPrice::Table, ProductPrice::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Order::Table)
                    .if_not_exists()
                    .col(uuid(Order::Id).primary_key())
                    .col(string_len(Order::OrderNumber, 32).unique_key())
                    .col(uuid(Order::UserId))
                    .col(uuid(Order::AddressId))
                    .col(string_len(Order::CurrencyCode, 3))
                    .col(decimal_len(Order::Subtotal, 12, 2))
                    .col(decimal_len(Order::TaxTotal, 12, 2))
                    .col(decimal_len(Order::ShippingFee, 12, 2))
                    .col(decimal_len(Order::DiscountTotal, 12, 2))
                    .col(decimal_len(Order::GrandTotal, 12, 2))
                    .col(string_len(Order::Status, 16))
                    .col(string_len_null(Order::InvoiceNumber, 32))
                    .col(timestamp_with_time_zone_null(Order::InvoiceDate))
                    .col(text_null(Order::Notes))
                    .col(boolean(Order::IsDeleted))
                    .col(timestamp_with_time_zone(Order::CreatedDate))
                    .col(timestamp_with_time_zone(Order::ModifiedDate))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_order_user")
                            .from(Order::Table, Order::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_order_address")
                            .from(Order::Table, Order::AddressId)
                            .to(Address::Table, Address::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(OrderItem::Table)
                    .if_not_exists()
                    .col(uuid(OrderItem::Id).primary_key())
                    .col(uuid(OrderItem::OrderId))
                    .col(uuid(OrderItem::ProductId))
                    .col(uuid(OrderItem::ProductPriceId))
                    .col(string_len(OrderItem::ProductName, 256))
                    .col(string_len(OrderItem::WeightLabel, 32))
                    .col(string_len_null(OrderItem::HsnCode, 16))
                    .col(integer(OrderItem::Quantity))
                    .col(decimal_len(OrderItem::UnitPrice, 12, 2))
                    .col(decimal_len(OrderItem::GstRate, 5, 2))
                    .col(decimal_len(OrderItem::LineTotal, 12, 2))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_order_item_order")
                            .from(OrderItem::Table, OrderItem::OrderId)
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
                    .table(Payment::Table)
                    .if_not_exists()
                    .col(uuid(Payment::Id).primary_key())
                    .col(uuid(Payment::OrderId))
                    .col(string_len(Payment::Provider, 32))
                    .col(string_len_null(Payment::ProviderOrderId, 64))
                    .col(string_len_null(Payment::ProviderPaymentId, 64))
                    .col(decimal_len(Payment::Amount, 12, 2))
                    .col(string_len(Payment::CurrencyCode, 3))
                    .col(string_len_null(Payment::Method, 32))
                    .col(string_len(Payment::Status, 16))
                    .col(timestamp_with_time_zone(Payment::CreatedDate))
                    .col(timestamp_with_time_zone(Payment::ModifiedDate))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payment_order")
                            .from(Payment::Table, Payment::OrderId)
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
                    .table(Transaction::Table)
                    .if_not_exists()
                    .col(uuid(Transaction::Id).primary_key())
                    .col(uuid(Transaction::PaymentId))
                    .col(string_len(Transaction::Kind, 16))
                    .col(decimal_len(Transaction::Amount, 12, 2))
                    .col(string_len(Transaction::Status, 16))
                    .col(string_len_null(Transaction::Reference, 128))
                    .col(json_binary_null(Transaction::Payload))
                    .col(timestamp_with_time_zone(Transaction::CreatedDate))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transaction_payment")
                            .from(Transaction::Table, Transaction::PaymentId)
                            .to(Payment::Table, Payment::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Refund::Table)
                    .if_not_exists()
                    .col(uuid(Refund::Id).primary_key())
                    .col(uuid(Refund::PaymentId))
                    .col(decimal_len(Refund::Amount, 12, 2))
                    .col(text_null(Refund::Reason))
                    .col(string_len(Refund::Status, 16))
                    .col(string_len_null(Refund::ProviderRefundId, 64))
                    .col(timestamp_with_time_zone(Refund::CreatedDate))
                    .col(timestamp_with_time_zone(Refund::ModifiedDate))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_refund_payment")
                            .from(Refund::Table, Refund::PaymentId)
                            .to(Payment::Table, Payment::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Refund::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Transaction::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Payment::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(OrderItem::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Order::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Cart::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Cart { Table, Id, UserId, ProductPriceId, Quantity, CreatedDate, ModifiedDate }

#[derive(DeriveIden)]
enum Order {
    Table,
    Id,
    OrderNumber,
    UserId,
    AddressId,
    CurrencyCode,
    Subtotal,
    TaxTotal,
    ShippingFee,
    DiscountTotal,
    GrandTotal,
    Status,
    InvoiceNumber,
    InvoiceDate,
    Notes,
    IsDeleted,
    CreatedDate,
    ModifiedDate,
}

#[derive(DeriveIden)]
enum OrderItem {
    Table,
    Id,
    OrderId,
    ProductId,
    ProductPriceId,
    ProductName,
    WeightLabel,
    HsnCode,
    Quantity,
    UnitPrice,
    GstRate,
    LineTotal,
}

#[derive(DeriveIden)]
enum Payment {
    Table,
    Id,
    OrderId,
    Provider,
    ProviderOrderId,
    ProviderPaymentId,
    Amount,
    CurrencyCode,
    Method,
    Status,
    CreatedDate,
    ModifiedDate,
}

#[derive(DeriveIden)]
enum Transaction { Table, Id, PaymentId, Kind, Amount, Status, Reference, Payload, CreatedDate }

#[derive(DeriveIden)]
enum Refund { Table, Id, PaymentId, Amount, Reason, Status, ProviderRefundId, CreatedDate, ModifiedDate }

#[derive(DeriveIden)]
enum User { Table, Id }

#[derive(DeriveIden)]
enum Address { Table, Id }

#[derive(DeriveIden)]
enum ProductPrice { Table, Id }
