use rust_decimal::Decimal;
use sea_orm::{entity::prelude::*, QueryFilter, Select, Set};
use serde::{Deserialize, Serialize};

use crate::{errors::ModelError, now, resource::Resource, validate};

/// Price of a product in one pack size and currency.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "product_price")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub product_id: Uuid,
    pub currency_id: Uuid,
    pub weight_id: Uuid,
    /// Selling price, GST inclusive.
    pub price: Decimal,
    pub mrp: Option<Decimal>,
    pub is_active: bool,
    pub is_deleted: bool,
    pub created_date: DateTimeWithTimeZone,
    pub modified_date: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id"
    )]
    Product,
    #[sea_orm(
        belongs_to = "super::currency::Entity",
        from = "Column::CurrencyId",
        to = "super::currency::Column::Id"
    )]
    Currency,
    #[sea_orm(
        belongs_to = "super::weight::Entity",
        from = "Column::WeightId",
        to = "super::weight::Column::Id"
    )]
    Weight,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef { Relation::Product.def() }
}

impl Related<super::currency::Entity> for Entity {
    fn to() -> RelationDef { Relation::Currency.def() }
}

impl Related<super::weight::Entity> for Entity {
    fn to() -> RelationDef { Relation::Weight.def() }
}

impl ActiveModelBehavior for ActiveModel {}

fn check_mrp(price: Decimal, mrp: Option<Decimal>) -> Result<Option<Decimal>, ModelError> {
    match mrp {
        Some(m) => {
            let m = validate::money("mrp", m)?;
            if m < price {
                return Err(ModelError::Validation("mrp must not be below price".into()));
            }
            Ok(Some(m))
        }
        None => Ok(None),
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProductPrice {
    pub product_id: Uuid,
    pub currency_id: Uuid,
    pub weight_id: Uuid,
    pub price: Decimal,
    pub mrp: Option<Decimal>,
    #[serde(default = "crate::default_true")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPricePatch {
    pub price: Option<Decimal>,
    pub mrp: Option<Decimal>,
    pub is_active: Option<bool>,
}

impl Resource for Entity {
    type Create = NewProductPrice;
    type Patch = ProductPricePatch;
    const LABEL: &'static str = "product price";

    fn build(input: NewProductPrice) -> Result<ActiveModel, ModelError> {
        let price = validate::money("price", input.price)?;
        let mrp = check_mrp(price, input.mrp)?;
        let ts = now();
        Ok(ActiveModel {
            id: Set(Uuid::new_v4()),
            product_id: Set(input.product_id),
            currency_id: Set(input.currency_id),
            weight_id: Set(input.weight_id),
            price: Set(price),
            mrp: Set(mrp),
            is_active: Set(input.is_active),
            is_deleted: Set(false),
            created_date: Set(ts),
            modified_date: Set(ts),
        })
    }

    fn patch(model: Model, patch: ProductPricePatch) -> Result<ActiveModel, ModelError> {
        let price = match patch.price {
            Some(p) => validate::money("price", p)?,
            None => model.price,
        };
        let mrp = check_mrp(price, patch.mrp.or(model.mrp))?;
        let mut am: ActiveModel = model.into();
        am.price = Set(price);
        am.mrp = Set(mrp);
        if let Some(active) = patch.is_active { am.is_active = Set(active); }
        am.modified_date = Set(now());
        Ok(am)
    }

    fn visible(select: Select<Self>) -> Select<Self> {
        select.filter(Column::IsDeleted.eq(false))
    }

    fn active(select: Select<Self>) -> Select<Self> {
        select.filter(Column::IsActive.eq(true))
    }

    fn retire(model: Model) -> Option<ActiveModel> {
        let mut am: ActiveModel = model.into();
        am.is_deleted = Set(true);
        am.modified_date = Set(now());
        Some(am)
    }

    fn order_column() -> Column { Column::CreatedDate }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mrp_below_price_is_rejected() {
        let input = NewProductPrice {
            product_id: Uuid::new_v4(),
            currency_id: Uuid::new_v4(),
            weight_id: Uuid::new_v4(),
            price: Decimal::new(199, 0),
            mrp: Some(Decimal::new(150, 0)),
            is_active: true,
        };
        assert!(<Entity as Resource>::build(input).is_err());
    }

    #[test]
    fn patch_price_rechecks_existing_mrp() {
        let ts = now();
        let model = Model {
            id: Uuid::new_v4(),
            product_id: Uuid::new_v4(),
            currency_id: Uuid::new_v4(),
            weight_id: Uuid::new_v4(),
            price: Decimal::new(100, 0),
            mrp: Some(Decimal::new(120, 0)),
            is_active: true,
            is_deleted: false,
            created_date: ts,
            modified_date: ts,
        };
        let patch = ProductPricePatch { price: Some(Decimal::new(130, 0)), ..Default::default() };
        assert!(<Entity as Resource>::patch(model, patch).is_err());
    }
}
