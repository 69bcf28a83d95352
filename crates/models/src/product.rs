use rust_decimal::Decimal;
use sea_orm::{entity::prelude::*, QueryFilter, Select, Set};
use serde::{Deserialize, Serialize};

use crate::{errors::ModelError, now, resource::Resource, validate};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "product")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub category_id: Uuid,
    pub brand_id: Option<Uuid>,
    pub name: String,
    #[sea_orm(unique)]
    pub slug: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub hsn_code: Option<String>,
    pub gst_rate: Decimal,
    pub image_url: Option<String>,
    pub is_featured: bool,
    pub is_active: bool,
    pub is_deleted: bool,
    pub created_date: DateTimeWithTimeZone,
    pub modified_date: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id"
    )]
    Category,
    #[sea_orm(
        belongs_to = "super::brand::Entity",
        from = "Column::BrandId",
        to = "super::brand::Column::Id"
    )]
    Brand,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef { Relation::Category.def() }
}

impl Related<super::brand::Entity> for Entity {
    fn to() -> RelationDef { Relation::Brand.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// HSN codes on GST invoices are 4, 6 or 8 digits.
pub fn validate_hsn(code: &str) -> Result<String, ModelError> {
    let c = code.trim();
    if !matches!(c.len(), 4 | 6 | 8) || !c.chars().all(|ch| ch.is_ascii_digit()) {
        return Err(ModelError::Validation("hsnCode must be 4, 6 or 8 digits".into()));
    }
    Ok(c.to_string())
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub category_id: Uuid,
    pub brand_id: Option<Uuid>,
    pub name: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub hsn_code: Option<String>,
    #[serde(default)]
    pub gst_rate: Decimal,
    pub image_url: Option<String>,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default = "crate::default_true")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    pub category_id: Option<Uuid>,
    pub brand_id: Option<Uuid>,
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub hsn_code: Option<String>,
    pub gst_rate: Option<Decimal>,
    pub image_url: Option<String>,
    pub is_featured: Option<bool>,
    pub is_active: Option<bool>,
}

impl Resource for Entity {
    type Create = NewProduct;
    type Patch = ProductPatch;
    const LABEL: &'static str = "product";

    fn build(input: NewProduct) -> Result<ActiveModel, ModelError> {
        let name = validate::required("name", &input.name)?;
        validate::max_len("name", &name, 256)?;
        let slug = validate::slug_or_derive(input.slug.as_deref(), &name)?;
        let hsn = input.hsn_code.as_deref().map(validate_hsn).transpose()?;
        let ts = now();
        Ok(ActiveModel {
            id: Set(Uuid::new_v4()),
            category_id: Set(input.category_id),
            brand_id: Set(input.brand_id),
            name: Set(name),
            slug: Set(slug),
            description: Set(input.description),
            hsn_code: Set(hsn),
            gst_rate: Set(validate::gst_rate(input.gst_rate)?),
            image_url: Set(input.image_url),
            is_featured: Set(input.is_featured),
            is_active: Set(input.is_active),
            is_deleted: Set(false),
            created_date: Set(ts),
            modified_date: Set(ts),
        })
    }

    fn patch(model: Model, patch: ProductPatch) -> Result<ActiveModel, ModelError> {
        let mut am: ActiveModel = model.into();
        if let Some(c) = patch.category_id { am.category_id = Set(c); }
        if let Some(b) = patch.brand_id { am.brand_id = Set(Some(b)); }
        if let Some(name) = patch.name {
            let name = validate::required("name", &name)?;
            validate::max_len("name", &name, 256)?;
            am.name = Set(name);
        }
        if let Some(slug) = patch.slug { am.slug = Set(validate::slug(&slug)?); }
        if let Some(d) = patch.description { am.description = Set(Some(d)); }
        if let Some(h) = patch.hsn_code { am.hsn_code = Set(Some(validate_hsn(&h)?)); }
        if let Some(rate) = patch.gst_rate { am.gst_rate = Set(validate::gst_rate(rate)?); }
        if let Some(url) = patch.image_url { am.image_url = Set(Some(url)); }
        if let Some(f) = patch.is_featured { am.is_featured = Set(f); }
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
    use sea_orm::ActiveValue;

    fn input() -> NewProduct {
        NewProduct {
            category_id: Uuid::new_v4(),
            brand_id: None,
            name: "Kashmiri Chilli Powder".into(),
            slug: None,
            description: None,
            hsn_code: Some("0904".into()),
            gst_rate: Decimal::new(5, 0),
            image_url: None,
            is_featured: false,
            is_active: true,
        }
    }

    #[test]
    fn build_derives_slug() {
        let am = <Entity as Resource>::build(input()).unwrap();
        assert_eq!(am.slug, ActiveValue::Set("kashmiri-chilli-powder".to_string()));
        assert_eq!(am.is_deleted, ActiveValue::Set(false));
    }

    #[test]
    fn build_rejects_bad_hsn_and_rate() {
        let mut bad = input();
        bad.hsn_code = Some("09".into());
        assert!(<Entity as Resource>::build(bad).is_err());
        let mut bad = input();
        bad.gst_rate = Decimal::new(40, 0);
        assert!(<Entity as Resource>::build(bad).is_err());
    }

    #[test]
    fn deserializes_camel_case() {
        let v = serde_json::json!({
            "categoryId": Uuid::new_v4(),
            "name": "Cumin",
            "gstRate": "5",
            "isFeatured": true
        });
        let p: NewProduct = serde_json::from_value(v).unwrap();
        assert!(p.is_featured);
        assert!(p.is_active);
        assert_eq!(p.gst_rate, Decimal::new(5, 0));
    }
}
