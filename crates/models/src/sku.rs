use sea_orm::{entity::prelude::*, QueryFilter, Select, Set};
use serde::{Deserialize, Serialize};

use crate::{errors::ModelError, now, resource::Resource, validate};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sku")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub product_price_id: Uuid,
    #[sea_orm(unique)]
    pub code: String,
    pub barcode: Option<String>,
    pub is_active: bool,
    pub is_deleted: bool,
    pub created_date: DateTimeWithTimeZone,
    pub modified_date: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::product_price::Entity",
        from = "Column::ProductPriceId",
        to = "super::product_price::Column::Id"
    )]
    ProductPrice,
}

impl Related<super::product_price::Entity> for Entity {
    fn to() -> RelationDef { Relation::ProductPrice.def() }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSku {
    pub product_price_id: Uuid,
    pub code: String,
    pub barcode: Option<String>,
    #[serde(default = "crate::default_true")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkuPatch {
    pub barcode: Option<String>,
    pub is_active: Option<bool>,
}

impl Resource for Entity {
    type Create = NewSku;
    type Patch = SkuPatch;
    const LABEL: &'static str = "sku";

    fn build(input: NewSku) -> Result<ActiveModel, ModelError> {
        let ts = now();
        Ok(ActiveModel {
            id: Set(Uuid::new_v4()),
            product_price_id: Set(input.product_price_id),
            code: Set(validate::code("code", &input.code, 3, 64)?),
            barcode: Set(input.barcode),
            is_active: Set(input.is_active),
            is_deleted: Set(false),
            created_date: Set(ts),
            modified_date: Set(ts),
        })
    }

    fn patch(model: Model, patch: SkuPatch) -> Result<ActiveModel, ModelError> {
        let mut am: ActiveModel = model.into();
        if let Some(b) = patch.barcode { am.barcode = Set(Some(b)); }
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
