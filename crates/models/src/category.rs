use sea_orm::{entity::prelude::*, QueryFilter, Select, Set};
use serde::{Deserialize, Serialize};

use crate::{errors::ModelError, now, resource::Resource, validate};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "category")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub parent_id: Option<Uuid>,
    pub name: String,
    #[sea_orm(unique)]
    pub slug: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub sort_order: i32,
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
pub struct NewCategory {
    pub parent_id: Option<Uuid>,
    pub name: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default = "crate::default_true")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPatch {
    pub parent_id: Option<Uuid>,
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub sort_order: Option<i32>,
    pub is_active: Option<bool>,
}

impl Resource for Entity {
    type Create = NewCategory;
    type Patch = CategoryPatch;
    const LABEL: &'static str = "category";

    fn build(input: NewCategory) -> Result<ActiveModel, ModelError> {
        let name = validate::required("name", &input.name)?;
        let slug = validate::slug_or_derive(input.slug.as_deref(), &name)?;
        let ts = now();
        Ok(ActiveModel {
            id: Set(Uuid::new_v4()),
            parent_id: Set(input.parent_id),
            name: Set(name),
            slug: Set(slug),
            description: Set(input.description),
            image_url: Set(input.image_url),
            sort_order: Set(input.sort_order),
            is_active: Set(input.is_active),
            is_deleted: Set(false),
            created_date: Set(ts),
            modified_date: Set(ts),
        })
    }

    fn patch(model: Model, patch: CategoryPatch) -> Result<ActiveModel, ModelError> {
        if patch.parent_id == Some(model.id) {
            return Err(ModelError::Validation("category cannot be its own parent".into()));
        }
        let mut am: ActiveModel = model.into();
        if let Some(p) = patch.parent_id { am.parent_id = Set(Some(p)); }
        if let Some(name) = patch.name { am.name = Set(validate::required("name", &name)?); }
        if let Some(slug) = patch.slug { am.slug = Set(validate::slug(&slug)?); }
        if let Some(d) = patch.description { am.description = Set(Some(d)); }
        if let Some(url) = patch.image_url { am.image_url = Set(Some(url)); }
        if let Some(order) = patch.sort_order { am.sort_order = Set(order); }
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

    fn sample() -> Model {
        let ts = now();
        Model {
            id: Uuid::new_v4(),
            parent_id: None,
            name: "Whole Spices".into(),
            slug: "whole-spices".into(),
            description: None,
            image_url: None,
            sort_order: 0,
            is_active: true,
            is_deleted: false,
            created_date: ts,
            modified_date: ts,
        }
    }

    #[test]
    fn self_parent_is_rejected() {
        let m = sample();
        let id = m.id;
        let patch = CategoryPatch { parent_id: Some(id), ..Default::default() };
        assert!(<Entity as Resource>::patch(m, patch).is_err());
    }

    #[test]
    fn retire_marks_deleted() {
        let am = <Entity as Resource>::retire(sample()).unwrap();
        assert_eq!(am.is_deleted, sea_orm::ActiveValue::Set(true));
    }
}
