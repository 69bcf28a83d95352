//! Create catalog tables: `brand`, `category`, `product`, `product_price`, `sku`, `inventory`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Brand::Table)
                    .if_not_exists()
                    .col(uuid(Brand::Id).primary_key())
                    .col(string_len(Brand::Name, 128))
                    .col(string_len(Brand::Slug, 128).unique_key())
                    .col(text_null(Brand::Description))
                    .col(string_len_null(Brand::LogoUrl, 512))
                    .col(boolean(Brand::IsActive))
                    .col(boolean(Brand::IsDeleted))
                    .col(timestamp_with_time_zone(Brand::CreatedDate))
                    .col(timestamp_with_time_zone(Brand::ModifiedDate))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Category::Table)
                    .if_not_exists()
                    .col(uuid(Category::Id).primary_key())
                    .col(uuid_null(Category::ParentId))
                    .col(string_len(Category::Name, 128))
                    .col(string_len(Category::Slug, 128).unique_key())
                    .col(text_null(Category::Description))
                    .col(string_len_null(Category::ImageUrl, 512))
                    .col(integer(Category::SortOrder))
                    .col(boolean(Category::IsActive))
                    .col(boolean(Category::IsDeleted))
                    .col(timestamp_with_time_zone(Category::CreatedDate))
                    .col(timestamp_with_time_zone(Category::ModifiedDate))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_category_parent")
                            .from(Category::Table, Category::ParentId)
                            .to(Category::Table, Category::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Product::Table)
                    .if_not_exists()
                    .col(uuid(Product::Id).primary_key())
                    .col(uuid(Product::CategoryId))
                    .col(uuid_null(Product::BrandId))
                    .col(string_len(Product::Name, 256))
                    .col(string_len(Product::Slug, 256).unique_key())
                    .col(text_null(Product::Description))
                    .col(string_len_null(Product::HsnCode, 16))
                    .col(decimal_len(Product::GstRate, 5, 2))
                    .col(string_len_null(Product::ImageUrl, 512))
                    .col(boolean(Product::IsFeatured))
                    .col(boolean(Product::IsActive))
                    .col(boolean(Product::IsDeleted))
                    .col(timestamp_with_time_zone(Product::CreatedDate))
                    .col(timestamp_with_time_zone(Product::ModifiedDate))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_product_category")
                            .from(Product::Table, Product::CategoryId)
                            .to(Category::Table, Category::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_product_brand")
                            .from(Product::Table, Product::BrandId)
                            .to(Brand::Table, Brand::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ProductPrice::Table)
                    .if_not_exists()
                    .col(uuid(ProductPrice::Id).primary_key())
                    .col(uuid(ProductPrice::ProductId))
                    .col(uuid(ProductPrice::CurrencyId))
                    .col(uuid(ProductPrice::WeightId))
                    .col(decimal_len(ProductPrice::Price, 12, 2))
                    .col(decimal_len_null(ProductPrice::Mrp, 12, 2))
                    .col(boolean(ProductPrice::IsActive))
                    .col(boolean(ProductPrice::IsDeleted))
                    .col(timestamp_with_time_zone(ProductPrice::CreatedDate))
                    .col(timestamp_with_time_zone(ProductPrice::ModifiedDate))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_product_price_product")
                            .from(ProductPrice::Table, ProductPrice::ProductId)
                            .to(Product::Table, Product::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_product_price_currency")
                            .from(ProductPrice::Table, ProductPrice::CurrencyId)
                            .to(Currency::Table, Currency::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_product_price_weight")
                            .from(ProductPrice::Table, ProductPrice::WeightId)
                            .to(Weight::Table, Weight::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Sku::Table)
                    .if_not_exists()
                    .col(uuid(Sku::Id).primary_key())
                    .col(uuid(Sku::ProductPriceId))
                    .col(string_len(Sku::Code, 64).unique_key())
                    .col(string_len_null(Sku::Barcode, 64))
                    .col(boolean(Sku::IsActive))
                    .col(boolean(Sku::IsDeleted))
                    .col(timestamp_with_time_zone(Sku::CreatedDate))
                    .col(timestamp_with_time_zone(Sku::ModifiedDate))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sku_product_price")
                            .from(Sku::Table, Sku::ProductPriceId)
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
                    .table(Inventory::Table)
                    .if_not_exists()
                    .col(uuid(Inventory::Id).primary_key())
                    .col(uuid(Inventory::SkuId).unique_key())
                    .col(integer(Inventory::Quantity))
                    .col(integer(Inventory::Reserved))
                    .col(integer(Inventory::ReorderLevel))
                    .col(timestamp_with_time_zone(Inventory::CreatedDate))
                    .col(timestamp_with_time_zone(Inventory::ModifiedDate))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_inventory_sku")
                            .from(Inventory::Table, Inventory::SkuId)
                            .to(Sku::Table, Sku::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Inventory::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Sku::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(ProductPrice::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Product::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Category::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Brand::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Brand { Table, Id, Name, Slug, Description, LogoUrl, IsActive, IsDeleted, CreatedDate, ModifiedDate }

#[derive(DeriveIden)]
enum Category { Table, Id, ParentId, Name, Slug, Description, ImageUrl, SortOrder, IsActive, IsDeleted, CreatedDate, ModifiedDate }

#[derive(DeriveIden)]
enum Product {
    Table,
    Id,
    CategoryId,
    BrandId,
    Name,
    Slug,
    Description,
    HsnCode,
    GstRate,
    ImageUrl,
    IsFeatured,
    IsActive,
    IsDeleted,
    CreatedDate,
    ModifiedDate,
}

#[derive(DeriveIden)]
enum ProductPrice { Table, Id, ProductId, CurrencyId, WeightId, Price, Mrp, IsActive, IsDeleted, CreatedDate, ModifiedDate }

#[derive(DeriveIden)]
enum Sku { Table, Id, ProductPriceId, Code, Barcode, IsActive, IsDeleted, CreatedDate, ModifiedDate }

#[derive(DeriveIden)]
enum Inventory { Table, Id, SkuId, Quantity, Reserved, ReorderLevel, CreatedDate, ModifiedDate }

#[derive(DeriveIden)]
enum Currency { Table, Id }

#[derive(DeriveIden)]
enum Weight { Table, Id }
