//! Per-user cart lines, priced live from the catalog.

use std::collections::HashMap;

use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use uuid::Uuid;

use models::{cart, now, product, product_price, validate, weight};

use crate::errors::ServiceError;

/// A cart or checkout line joined with its product and pack size.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricedLine {
    pub cart_id: Option<Uuid>,
    pub product_id: Uuid,
    pub product_price_id: Uuid,
    pub product_name: String,
    pub product_slug: String,
    pub image_url: Option<String>,
    pub weight_label: String,
    pub hsn_code: Option<String>,
    pub gst_rate: Decimal,
    pub unit_price: Decimal,
    pub quantity: i32,
    pub line_total: Decimal,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineRequest {
    pub product_price_id: Uuid,
    pub quantity: i32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub lines: Vec<PricedLine>,
    pub item_count: i32,
    pub subtotal: Decimal,
}

/// Price `(cart_id, request)` pairs against active catalog rows. Any line whose
/// price or product is missing, inactive or deleted fails the whole call.
pub async fn price_lines<C: ConnectionTrait>(
    db: &C,
    requests: &[(Option<Uuid>, LineRequest)],
) -> Result<Vec<PricedLine>, ServiceError> {
    if requests.is_empty() {
        return Ok(Vec::new());
    }
    let price_ids: Vec<Uuid> = requests.iter().map(|(_, r)| r.product_price_id).collect();
    let prices: HashMap<Uuid, (product_price::Model, Option<weight::Model>)> = product_price::Entity::find()
        .filter(product_price::Column::Id.is_in(price_ids))
        .filter(product_price::Column::IsActive.eq(true))
        .filter(product_price::Column::IsDeleted.eq(false))
        .find_also_related(weight::Entity)
        .all(db)
        .await?
        .into_iter()
        .map(|(p, w)| (p.id, (p, w)))
        .collect();
    let product_ids: Vec<Uuid> = prices.values().map(|(p, _)| p.product_id).collect();
    let products: HashMap<Uuid, product::Model> = product::Entity::find()
        .filter(product::Column::Id.is_in(product_ids))
        .filter(product::Column::IsActive.eq(true))
        .filter(product::Column::IsDeleted.eq(false))
        .all(db)
        .await?
        .into_iter()
        .map(|p| (p.id, p))
        .collect();

    requests
        .iter()
        .map(|(cart_id, req)| {
            let (price, w) = prices
                .get(&req.product_price_id)
                .ok_or_else(|| ServiceError::Validation(format!("product price {} is not available", req.product_price_id)))?;
            let prod = products
                .get(&price.product_id)
                .ok_or_else(|| ServiceError::Validation(format!("product {} is not available", price.product_id)))?;
            Ok(PricedLine {
                cart_id: *cart_id,
                product_id: prod.id,
                product_price_id: price.id,
                product_name: prod.name.clone(),
                product_slug: prod.slug.clone(),
                image_url: prod.image_url.clone(),
                weight_label: w.as_ref().map(|w| w.label.clone()).unwrap_or_default(),
                hsn_code: prod.hsn_code.clone(),
                gst_rate: prod.gst_rate,
                unit_price: price.price,
                quantity: req.quantity,
                line_total: validate::round_money(price.price * Decimal::from(req.quantity)),
            })
        })
        .collect()
}

async fn lines<C: ConnectionTrait>(db: &C, user_id: Uuid) -> Result<Vec<cart::Model>, ServiceError> {
    Ok(cart::Entity::find()
        .filter(cart::Column::UserId.eq(user_id))
        .order_by_asc(cart::Column::CreatedDate)
        .all(db)
        .await?)
}

pub async fn list<C: ConnectionTrait>(db: &C, user_id: Uuid) -> Result<CartView, ServiceError> {
    let rows = lines(db, user_id).await?;
    let requests: Vec<(Option<Uuid>, LineRequest)> = rows
        .iter()
        .map(|c| (Some(c.id), LineRequest { product_price_id: c.product_price_id, quantity: c.quantity }))
        .collect();
    let priced = price_lines(db, &requests).await?;
    let subtotal = priced.iter().map(|l| l.line_total).sum();
    let item_count = priced.iter().map(|l| l.quantity).sum();
    Ok(CartView { lines: priced, item_count, subtotal })
}

/// Add to the cart, merging with an existing line for the same pack.
#[instrument(skip(db), fields(%user_id, product_price_id = %req.product_price_id, qty = req.quantity))]
pub async fn add(db: &DatabaseConnection, user_id: Uuid, req: LineRequest) -> Result<cart::Model, ServiceError> {
    validate::positive_qty("quantity", req.quantity)?;
    price_lines(db, &[(None, req)]).await?;
    let existing = cart::Entity::find()
        .filter(cart::Column::UserId.eq(user_id))
        .filter(cart::Column::ProductPriceId.eq(req.product_price_id))
        .one(db)
        .await?;
    let saved = match existing {
        Some(line) => {
            let merged = line.quantity.saturating_add(req.quantity);
            let mut am: cart::ActiveModel = line.into();
            am.quantity = Set(merged);
            am.modified_date = Set(now());
            am.update(db).await?
        }
        None => cart::new_line(user_id, req.product_price_id, req.quantity).insert(db).await?,
    };
    debug!(cart_id = %saved.id, quantity = saved.quantity, "cart_line_saved");
    Ok(saved)
}

/// Set an exact quantity; zero removes the line.
pub async fn set_quantity(db: &DatabaseConnection, user_id: Uuid, cart_id: Uuid, quantity: i32) -> Result<Option<cart::Model>, ServiceError> {
    validate::non_negative("quantity", quantity)?;
    let line = cart::Entity::find_by_id(cart_id)
        .filter(cart::Column::UserId.eq(user_id))
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("cart line"))?;
    if quantity == 0 {
        cart::Entity::delete_by_id(line.id).exec(db).await?;
        return Ok(None);
    }
    let mut am: cart::ActiveModel = line.into();
    am.quantity = Set(quantity);
    am.modified_date = Set(now());
    Ok(Some(am.update(db).await?))
}

pub async fn remove(db: &DatabaseConnection, user_id: Uuid, cart_id: Uuid) -> Result<bool, ServiceError> {
    let res = cart::Entity::delete_many()
        .filter(cart::Column::Id.eq(cart_id))
        .filter(cart::Column::UserId.eq(user_id))
        .exec(db)
        .await?;
    Ok(res.rows_affected > 0)
}

pub async fn clear<C: ConnectionTrait>(db: &C, user_id: Uuid) -> Result<u64, ServiceError> {
    let res = cart::Entity::delete_many().filter(cart::Column::UserId.eq(user_id)).exec(db).await?;
    Ok(res.rows_affected)
}
