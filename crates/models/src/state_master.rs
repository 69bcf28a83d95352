use sea_orm::{entity::prelude::*, QueryFilter, Select, Set};
use serde::{Deserialize, Serialize};

use crate::{errors::ModelError, now, resource::Resource, validate};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "state_master")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub country_id: Uuid,
    pub code: String,
    pub name: String,
    /// Two-digit GST state code; drives the CGST/SGST vs IGST split on invoices.
    pub gst_code: Option<String>,
    pub is_active: bool,
    pub created_date: DateTimeWithTimeZone,
    pub modified_date: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::country_master::Entity",
        from = "Column::CountryId",
        to = "super::country_master::Column::Id"
    )]
    Country,
}

impl Related<super::country_master::Entity> for Entity {
    fn to() -> RelationDef { Relation::Country.def() }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewState {
    pub country_id: Uuid,
    pub code: String,
    pub name: String,
    pub gst_code: Option<String>,
    #[serde(default = "crate::default_true")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatePatch {
    pub name: Option<String>,
    pub gst_code: Option<String>,
    pub is_active: Option<bool>,
}

pub fn validate_gst_code(code: &str) -> Result<String, ModelError> {
    let c = code.trim();
    if c.len() != 2 || !c.chars().all(|ch| ch.is_ascii_digit()) {
        return Err(ModelError::Validation("gstCode must be two digits".into()));
    }
    Ok(c.to_string())
}

impl Resource for Entity {
    type Create = NewState;
    type Patch = StatePatch;
    const LABEL: &'static str = "state";

    fn build(input: NewState) -> Result<ActiveModel, ModelError> {
        let gst_code = input.gst_code.as_deref().map(validate_gst_code).transpose()?;
        let ts = now();
        Ok(ActiveModel {
            id: Set(Uuid::new_v4()),
            country_id: Set(input.country_id),
            code: Set(validate::code("code", &input.code, 2, 8)?),
            name: Set(validate::required("name", &input.name)?),
            gst_code: Set(gst_code),
            is_active: Set(input.is_active),
            created_date: Set(ts),
            modified_date: Set(ts),
        })
    }

    fn patch(model: Model, patch: StatePatch) -> Result<ActiveModel, ModelError> {
        let mut am: ActiveModel = model.into();
        if let Some(name) = patch.name { am.name = Set(validate::required("name", &name)?); }
        if let Some(code) = patch.gst_code { am.gst_code = Set(Some(validate_gst_code(&code)?)); }
        if let Some(active) = patch.is_active { am.is_active = Set(active); }
        am.modified_date = Set(now());
        Ok(am)
    }

    fn active(select: Select<Self>) -> Select<Self> {
        select.filter(Column::IsActive.eq(true))
    }

    fn order_column() -> Column { Column::CreatedDate }
}
