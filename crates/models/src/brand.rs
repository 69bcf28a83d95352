use sea_orm::{entity::prelude::*, QueryFilter, Select, Set};
use serde::{Deserialize, Serialize};

use crate::{errors::ModelError, now, resource::Resource, validate};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "brand")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub slug: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub logo_url: Option<String>,
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
pub struct NewBrand {
    pub name: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    #[serde(default = "crate::default_true")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandPatch {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    pub is_active: Option<bool>,
}

impl Resource for Entity {
    type Create = NewBrand;
    type Patch = BrandPatch;
    const LABEL: &'static str = "brand";

    fn build(input: NewBrand) -> Result<ActiveModel, ModelError> {
        let name = validate::required("name", &input.name)?;
        validate::max_len("name", &name, 128)?;
        let slug = validate::slug_or_derive(input.slug.as_deref(), &name)?;
        let ts = now();
        Ok(ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            slug: Set(slug),
            description: Set(input.description),
            logo_url: Set(input.logo_url),
            is_active: Set(input.is_active),
            is_deleted: Set(false),
            created_date: Set(ts),
            modified_date: Set(ts),
        })
    }

    fn patch(model: Model, patch: BrandPatch) -> Result<ActiveModel, ModelError> {
        let mut am: ActiveModel = model.into();
        if let Some(name) = patch.name {
            let name = validate::required("name", &name)?;
            validate::max_len("name", &name, 128)?;
            am.name = Set(name);
        }
        if let Some(slug) = patch.slug { am.slug = Set(validate::slug(&slug)?); }
        if let Some(d) = patch.description { am.description = Set(Some(d)); }
        if let Some(url) = patch.logo_url { am.logo_url = Set(Some(url)); }
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
