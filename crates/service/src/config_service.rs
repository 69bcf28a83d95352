//! Catalog and master-data facade used by the HTTP layer.
//!
//! CRUD calls forward straight to [`Repository`]; the few read queries the
//! storefront needs beyond plain CRUD live here as well.

use std::collections::HashMap;

use rust_decimal::Decimal;
use sea_orm::{
    sea_query::{Expr, Func},
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, Condition, EntityTrait, IntoActiveModel, PaginatorTrait,
    PrimaryKeyTrait, QueryFilter, QueryOrder, Set,
};
use serde::Serialize;
use tracing::{info, instrument};
use uuid::Uuid;

use common::types::Page;
use models::{brand, category, currency, inventory, now, product, product_price, state_master, weight, Resource};

use crate::{errors::ServiceError, pagination::Pagination, repository::Repository};

/// One purchasable pack size of a product.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceOption {
    pub product_price_id: Uuid,
    pub price: Decimal,
    pub mrp: Option<Decimal>,
    pub weight_label: String,
    pub currency_code: String,
    pub currency_symbol: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: product::Model,
    pub category: Option<category::Model>,
    pub brand: Option<brand::Model>,
    pub prices: Vec<PriceOption>,
}

#[derive(Clone)]
pub struct ConfigService {
    repo: Repository,
}

impl ConfigService {
    pub fn new(repo: Repository) -> Self { Self { repo } }

    pub fn repository(&self) -> &Repository { &self.repo }

    pub async fn list<E>(&self, page: Pagination, include_inactive: bool) -> Result<Page<E::Model>, ServiceError>
    where
        E: Resource,
        E::Model: Sync,
    {
        self.repo.list::<E>(page, include_inactive).await
    }

    pub async fn get<E>(&self, id: Uuid) -> Result<Option<E::Model>, ServiceError>
    where
        E: Resource,
        <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<Uuid>,
    {
        self.repo.get::<E>(id).await
    }

    pub async fn create<E>(&self, input: E::Create) -> Result<E::Model, ServiceError>
    where
        E: Resource,
        E::Model: IntoActiveModel<E::ActiveModel>,
        E::ActiveModel: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send,
    {
        self.repo.create::<E>(input).await
    }

    pub async fn update<E>(&self, id: Uuid, patch: E::Patch) -> Result<E::Model, ServiceError>
    where
        E: Resource,
        E::Model: IntoActiveModel<E::ActiveModel>,
        E::ActiveModel: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send,
        <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<Uuid>,
    {
        self.repo.update::<E>(id, patch).await
    }

    pub async fn delete<E>(&self, id: Uuid) -> Result<bool, ServiceError>
    where
        E: Resource,
        E::Model: IntoActiveModel<E::ActiveModel>,
        E::ActiveModel: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send,
        <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<Uuid>,
    {
        self.repo.delete::<E>(id).await
    }

    /// Storefront listing of a category and its direct sub-categories.
    #[instrument(skip(self))]
    pub async fn products_by_category_slug(&self, slug: &str, page: Pagination) -> Result<Page<product::Model>, ServiceError> {
        let db = self.repo.db();
        let cat = category::Entity::find()
            .filter(category::Column::Slug.eq(slug))
            .filter(category::Column::IsDeleted.eq(false))
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("category"))?;
        let mut ids: Vec<Uuid> = category::Entity::find()
            .filter(category::Column::ParentId.eq(cat.id))
            .filter(category::Column::IsDeleted.eq(false))
            .all(db)
            .await?
            .into_iter()
            .map(|c| c.id)
            .collect();
        ids.push(cat.id);
        self.product_page(Condition::all().add(product::Column::CategoryId.is_in(ids)), page).await
    }

    pub async fn products_by_brand(&self, brand_id: Uuid, page: Pagination) -> Result<Page<product::Model>, ServiceError> {
        self.product_page(Condition::all().add(product::Column::BrandId.eq(brand_id)), page).await
    }

    pub async fn featured_products(&self, page: Pagination) -> Result<Page<product::Model>, ServiceError> {
        self.product_page(Condition::all().add(product::Column::IsFeatured.eq(true)), page).await
    }

    /// Case-insensitive match on the product name.
    #[instrument(skip(self))]
    pub async fn search_products(&self, q: &str, page: Pagination) -> Result<Page<product::Model>, ServiceError> {
        let needle: String = q.trim().to_lowercase().chars().filter(|c| *c != '%' && *c != '_').collect();
        if needle.is_empty() {
            return Err(ServiceError::Validation("search text required".into()));
        }
        let cond = Condition::all()
            .add(Expr::expr(Func::lower(Expr::col(product::Column::Name))).like(format!("%{needle}%")));
        self.product_page(cond, page).await
    }

    async fn product_page(&self, cond: Condition, page: Pagination) -> Result<Page<product::Model>, ServiceError> {
        let (idx, per_page) = page.normalize();
        let select = product::Entity::active(product::Entity::visible(product::Entity::find()))
            .filter(cond)
            .order_by_desc(product::Column::CreatedDate);
        let paginator = select.paginate(self.repo.db(), per_page);
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(idx).await?;
        Ok(page.to_page(items, total))
    }

    /// Product with its category, brand and active pack prices.
    #[instrument(skip(self), fields(%id))]
    pub async fn product_detail(&self, id: Uuid) -> Result<ProductDetail, ServiceError> {
        let db = self.repo.db();
        let product = self.repo.require::<product::Entity>(id).await?;
        let category = category::Entity::find_by_id(product.category_id).one(db).await?;
        let brand = match product.brand_id {
            Some(b) => brand::Entity::find_by_id(b).one(db).await?,
            None => None,
        };

        let rows = product_price::Entity::find()
            .filter(product_price::Column::ProductId.eq(product.id))
            .filter(product_price::Column::IsActive.eq(true))
            .filter(product_price::Column::IsDeleted.eq(false))
            .order_by_asc(product_price::Column::Price)
            .find_also_related(weight::Entity)
            .all(db)
            .await?;
        let currency_ids: Vec<Uuid> = rows.iter().map(|(p, _)| p.currency_id).collect();
        let currencies: HashMap<Uuid, currency::Model> = currency::Entity::find()
            .filter(currency::Column::Id.is_in(currency_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

        let prices = rows
            .into_iter()
            .map(|(p, w)| {
                let cur = currencies.get(&p.currency_id);
                PriceOption {
                    product_price_id: p.id,
                    price: p.price,
                    mrp: p.mrp,
                    weight_label: w.map(|w| w.label).unwrap_or_default(),
                    currency_code: cur.map(|c| c.code.clone()).unwrap_or_default(),
                    currency_symbol: cur.map(|c| c.symbol.clone()).unwrap_or_default(),
                }
            })
            .collect();
        Ok(ProductDetail { product, category, brand, prices })
    }

    pub async fn states_for_country(&self, country_id: Uuid) -> Result<Vec<state_master::Model>, ServiceError> {
        Ok(state_master::Entity::find()
            .filter(state_master::Column::CountryId.eq(country_id))
            .filter(state_master::Column::IsActive.eq(true))
            .order_by_asc(state_master::Column::Name)
            .all(self.repo.db())
            .await?)
    }

    pub async fn inventory_for_sku(&self, sku_id: Uuid) -> Result<Option<inventory::Model>, ServiceError> {
        Ok(inventory::Entity::find()
            .filter(inventory::Column::SkuId.eq(sku_id))
            .one(self.repo.db())
            .await?)
    }

    /// Apply a stock delta; stock may not go below zero.
    #[instrument(skip(self), fields(%id, delta))]
    pub async fn adjust_inventory(&self, id: Uuid, delta: i32) -> Result<inventory::Model, ServiceError> {
        let current = self.repo.require::<inventory::Entity>(id).await?;
        let next = inventory::adjusted_quantity(current.quantity, delta)?;
        if next < current.reserved {
            return Err(ServiceError::Validation(format!("quantity {next} would fall below reserved {}", current.reserved)));
        }
        let sku_id = current.sku_id;
        let mut am: inventory::ActiveModel = current.into();
        am.quantity = Set(next);
        am.modified_date = Set(now());
        let updated = am.update(self.repo.db()).await?;
        info!(%sku_id, quantity = updated.quantity, "inventory_adjusted");
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn stock(quantity: i32, reserved: i32) -> inventory::Model {
        let ts = now();
        inventory::Model { id: Uuid::new_v4(), sku_id: Uuid::new_v4(), quantity, reserved, reorder_level: 2, created_date: ts, modified_date: ts }
    }

    #[tokio::test]
    async fn adjust_inventory_below_zero_is_validation() {
        let row = stock(2, 0);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![row.clone()]])
            .into_connection();
        let svc = ConfigService::new(Repository::new(db));
        let err = svc.adjust_inventory(row.id, -3).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn adjust_inventory_respects_reservations() {
        let row = stock(5, 4);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![row.clone()]])
            .into_connection();
        let svc = ConfigService::new(Repository::new(db));
        assert!(svc.adjust_inventory(row.id, -2).await.is_err());
    }

    #[tokio::test]
    async fn adjust_inventory_writes_new_quantity() {
        let row = stock(5, 0);
        let mut after = row.clone();
        after.quantity = 9;
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![row.clone()], vec![after]])
            .into_connection();
        let svc = ConfigService::new(Repository::new(db));
        let updated = svc.adjust_inventory(row.id, 4).await.unwrap();
        assert_eq!(updated.quantity, 9);
    }

    #[tokio::test]
    async fn blank_search_is_rejected() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let svc = ConfigService::new(Repository::new(db));
        assert!(svc.search_products(" %% ", Pagination::default()).await.is_err());
    }
}
