use sea_orm::{entity::prelude::*, Set};
use serde::{Deserialize, Serialize};

use crate::{errors::ModelError, now, validate};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "analytics_event")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub session_id: Option<String>,
    pub event_type: String,
    pub path: Option<String>,
    pub payload: Option<Json>,
    pub created_date: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEvent {
    pub session_id: Option<String>,
    pub event_type: String,
    pub path: Option<String>,
    pub payload: Option<Json>,
}

pub fn build(user_id: Option<Uuid>, input: NewEvent) -> Result<ActiveModel, ModelError> {
    let event_type = validate::required("eventType", &input.event_type)?;
    validate::max_len("eventType", &event_type, 64)?;
    if let Some(p) = &input.path {
        validate::max_len("path", p, 512)?;
    }
    Ok(ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        session_id: Set(input.session_id),
        event_type: Set(event_type),
        path: Set(input.path),
        payload: Set(input.payload),
        created_date: Set(now()),
    })
}
