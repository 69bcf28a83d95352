use sea_orm::{entity::prelude::*, QueryFilter, Select, Set};
use serde::{Deserialize, Serialize};

use crate::{errors::ModelError, now, resource::Resource, validate};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "currency")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub code: String,
    pub name: String,
    pub symbol: String,
    pub is_active: bool,
    pub is_deleted: bool,
    pub created_date: DateTimeWithTimeZone,
    pub modified_date: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCurrency {
    pub code: String,
    pub name: String,
    pub symbol: String,
    #[serde(default = "crate::default_true")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyPatch {
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub is_active: Option<bool>,
}

impl Resource for Entity {
    type Create = NewCurrency;
    type Patch = CurrencyPatch;
    const LABEL: &'static str = "currency";

    fn build(input: NewCurrency) -> Result<ActiveModel, ModelError> {
        let ts = now();
        Ok(ActiveModel {
            id: Set(Uuid::new_v4()),
            code: Set(validate::code("code", &input.code, 3, 3)?),
            name: Set(validate::required("name", &input.name)?),
            symbol: Set(validate::required("symbol", &input.symbol)?),
            is_active: Set(input.is_active),
            is_deleted: Set(false),
            created_date: Set(ts),
            modified_date: Set(ts),
        })
    }

    fn patch(model: Model, patch: CurrencyPatch) -> Result<ActiveModel, ModelError> {
        let mut am: ActiveModel = model.into();
        if let Some(name) = patch.name { am.name = Set(validate::required("name", &name)?); }
        if let Some(symbol) = patch.symbol { am.symbol = Set(validate::required("symbol", &symbol)?); }
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
