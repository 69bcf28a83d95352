use sea_orm::{entity::prelude::*, QueryFilter, Set};
use serde::{Deserialize, Serialize};

use crate::{errors::ModelError, now, validate};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub role_id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    pub name: String,
    pub phone: Option<String>,
    pub is_active: bool,
    pub is_deleted: bool,
    pub created_date: DateTimeWithTimeZone,
    pub modified_date: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::role::Entity",
        from = "Column::RoleId",
        to = "super::role::Column::Id"
    )]
    Role,
}

impl Related<super::role::Entity> for Entity {
    fn to() -> RelationDef { Relation::Role.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Validated insert for a new account.
pub fn new_active(role_id: Uuid, email: &str, name: &str, phone: Option<&str>) -> Result<ActiveModel, ModelError> {
    let email = validate::email(email)?;
    let name = validate::required("name", name)?;
    validate::max_len("name", &name, 128)?;
    let phone = phone.filter(|p| !p.trim().is_empty()).map(validate::phone).transpose()?;
    let ts = now();
    Ok(ActiveModel {
        id: Set(Uuid::new_v4()),
        role_id: Set(role_id),
        email: Set(email),
        name: Set(name),
        phone: Set(phone),
        is_active: Set(true),
        is_deleted: Set(false),
        created_date: Set(ts),
        modified_date: Set(ts),
    })
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePatch {
    pub name: Option<String>,
    pub phone: Option<String>,
}

pub fn apply_profile(model: Model, patch: ProfilePatch) -> Result<ActiveModel, ModelError> {
    let mut am: ActiveModel = model.into();
    if let Some(name) = patch.name {
        let name = validate::required("name", &name)?;
        validate::max_len("name", &name, 128)?;
        am.name = Set(name);
    }
    if let Some(phone) = patch.phone {
        let phone = if phone.trim().is_empty() { None } else { Some(validate::phone(&phone)?) };
        am.phone = Set(phone);
    }
    am.modified_date = Set(now());
    Ok(am)
}

pub async fn find_by_email<C: ConnectionTrait>(db: &C, email: &str) -> Result<Option<Model>, DbErr> {
    Entity::find()
        .filter(Column::Email.eq(email.trim().to_ascii_lowercase()))
        .filter(Column::IsDeleted.eq(false))
        .one(db)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::ActiveValue;

    #[test]
    fn new_active_normalizes() {
        let am = new_active(Uuid::new_v4(), " Cook@Example.com", "Asha", Some("98765 43210")).unwrap();
        assert_eq!(am.email, ActiveValue::Set("cook@example.com".to_string()));
        assert_eq!(am.phone, ActiveValue::Set(Some("9876543210".to_string())));
        assert_eq!(am.is_active, ActiveValue::Set(true));
    }

    #[test]
    fn blank_phone_is_dropped() {
        let am = new_active(Uuid::new_v4(), "a@b.in", "Asha", Some("  ")).unwrap();
        assert_eq!(am.phone, ActiveValue::Set(None));
        assert!(new_active(Uuid::new_v4(), "a@b.in", " ", None).is_err());
    }
}
