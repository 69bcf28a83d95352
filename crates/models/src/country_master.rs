use sea_orm::{entity::prelude::*, QueryFilter, Select, Set};
use serde::{Deserialize, Serialize};

use crate::{errors::ModelError, now, resource::Resource, validate};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "country_master")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub code: String,
    pub name: String,
    pub phone_code: Option<String>,
    pub is_active: bool,
    pub created_date: DateTimeWithTimeZone,
    pub modified_date: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCountry {
    pub code: String,
    pub name: String,
    pub phone_code: Option<String>,
    #[serde(default = "crate::default_true")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryPatch {
    pub name: Option<String>,
    pub phone_code: Option<String>,
    pub is_active: Option<bool>,
}

impl Resource for Entity {
    type Create = NewCountry;
    type Patch = CountryPatch;
    const LABEL: &'static str = "country";

    fn build(input: NewCountry) -> Result<ActiveModel, ModelError> {
        let ts = now();
        Ok(ActiveModel {
            id: Set(Uuid::new_v4()),
            code: Set(validate::code("code", &input.code, 2, 3)?),
            name: Set(validate::required("name", &input.name)?),
            phone_code: Set(input.phone_code),
            is_active: Set(input.is_active),
            created_date: Set(ts),
            modified_date: Set(ts),
        })
    }

    fn patch(model: Model, patch: CountryPatch) -> Result<ActiveModel, ModelError> {
        let mut am: ActiveModel = model.into();
        if let Some(name) = patch.name { am.name = Set(validate::required("name", &name)?); }
        if let Some(pc) = patch.phone_code { am.phone_code = Set(Some(pc)); }
        if let Some(active) = patch.is_active { am.is_active = Set(active); }
        am.modified_date = Set(now());
        Ok(am)
    }

    fn active(select: Select<Self>) -> Select<Self> {
        select.filter(Column::IsActive.eq(true))
    }

    fn order_column() -> Column { Column::CreatedDate }
}
