use sea_orm::{entity::prelude::*, QueryFilter, Select, Set};
use serde::{Deserialize, Serialize};

use crate::{errors::ModelError, now, validate};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "address")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub full_name: String,
    pub phone: String,
    pub line1: String,
    pub line2: Option<String>,
    pub landmark: Option<String>,
    pub city: String,
    pub state_id: Uuid,
    pub country_id: Uuid,
    pub postal_code: String,
    pub is_default: bool,
    pub is_deleted: bool,
    pub created_date: DateTimeWithTimeZone,
    pub modified_date: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::state_master::Entity",
        from = "Column::StateId",
        to = "super::state_master::Column::Id"
    )]
    State,
    #[sea_orm(
        belongs_to = "super::country_master::Entity",
        from = "Column::CountryId",
        to = "super::country_master::Column::Id"
    )]
    Country,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef { Relation::User.def() }
}

impl Related<super::state_master::Entity> for Entity {
    fn to() -> RelationDef { Relation::State.def() }
}

impl Related<super::country_master::Entity> for Entity {
    fn to() -> RelationDef { Relation::Country.def() }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAddress {
    pub full_name: String,
    pub phone: String,
    pub line1: String,
    pub line2: Option<String>,
    pub landmark: Option<String>,
    pub city: String,
    pub state_id: Uuid,
    pub country_id: Uuid,
    pub postal_code: String,
    #[serde(default)]
    pub is_default: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressPatch {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub line1: Option<String>,
    pub line2: Option<String>,
    pub landmark: Option<String>,
    pub city: Option<String>,
    pub state_id: Option<Uuid>,
    pub country_id: Option<Uuid>,
    pub postal_code: Option<String>,
    pub is_default: Option<bool>,
}

fn line(field: &str, v: &str) -> Result<String, ModelError> {
    let v = validate::required(field, v)?;
    validate::max_len(field, &v, 256)?;
    Ok(v)
}

pub fn build(user_id: Uuid, input: NewAddress) -> Result<ActiveModel, ModelError> {
    let ts = now();
    Ok(ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        full_name: Set(line("fullName", &input.full_name)?),
        phone: Set(validate::phone(&input.phone)?),
        line1: Set(line("line1", &input.line1)?),
        line2: Set(input.line2.filter(|s| !s.trim().is_empty())),
        landmark: Set(input.landmark.filter(|s| !s.trim().is_empty())),
        city: Set(line("city", &input.city)?),
        state_id: Set(input.state_id),
        country_id: Set(input.country_id),
        postal_code: Set(validate::pin_code(&input.postal_code)?),
        is_default: Set(input.is_default),
        is_deleted: Set(false),
        created_date: Set(ts),
        modified_date: Set(ts),
    })
}

pub fn patch(model: Model, p: AddressPatch) -> Result<ActiveModel, ModelError> {
    let mut am: ActiveModel = model.into();
    if let Some(v) = p.full_name { am.full_name = Set(line("fullName", &v)?); }
    if let Some(v) = p.phone { am.phone = Set(validate::phone(&v)?); }
    if let Some(v) = p.line1 { am.line1 = Set(line("line1", &v)?); }
    if let Some(v) = p.line2 { am.line2 = Set(Some(v)); }
    if let Some(v) = p.landmark { am.landmark = Set(Some(v)); }
    if let Some(v) = p.city { am.city = Set(line("city", &v)?); }
    if let Some(v) = p.state_id { am.state_id = Set(v); }
    if let Some(v) = p.country_id { am.country_id = Set(v); }
    if let Some(v) = p.postal_code { am.postal_code = Set(validate::pin_code(&v)?); }
    if let Some(v) = p.is_default { am.is_default = Set(v); }
    am.modified_date = Set(now());
    Ok(am)
}

/// Addresses owned by `user_id` that have not been deleted.
pub fn owned_by(user_id: Uuid) -> Select<Entity> {
    Entity::find()
        .filter(Column::UserId.eq(user_id))
        .filter(Column::IsDeleted.eq(false))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> NewAddress {
        NewAddress {
            full_name: "Meera Nair".into(),
            phone: "9847012345".into(),
            line1: "12 Spice Market Road".into(),
            line2: Some("".into()),
            landmark: None,
            city: "Kochi".into(),
            state_id: Uuid::new_v4(),
            country_id: Uuid::new_v4(),
            postal_code: "682002".into(),
            is_default: true,
        }
    }

    #[test]
    fn build_validates_pin_and_drops_blank_lines() {
        let am = build(Uuid::new_v4(), sample()).unwrap();
        assert_eq!(am.line2, sea_orm::ActiveValue::Set(None));
        let mut bad = sample();
        bad.postal_code = "68200".into();
        assert!(build(Uuid::new_v4(), bad).is_err());
    }
}
