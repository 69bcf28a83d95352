use sea_orm::{entity::prelude::*, QueryFilter, Set};
use serde::{Deserialize, Serialize};

use crate::now;

pub const CARRIER_DTDC: &str = "dtdc";
pub const CARRIER_TRACKON: &str = "trackon";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "shipment")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub order_id: Uuid,
    pub carrier: String,
    pub awb_number: Option<String>,
    pub status: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub last_event: Option<String>,
    pub last_location: Option<String>,
    pub expected_delivery: Option<DateTimeWithTimeZone>,
    pub created_date: DateTimeWithTimeZone,
    pub modified_date: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::order::Entity",
        from = "Column::OrderId",
        to = "super::order::Column::Id"
    )]
    Order,
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef { Relation::Order.def() }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn booked(order_id: Uuid, carrier: &str, awb_number: String, status: &str) -> ActiveModel {
    let ts = now();
    ActiveModel {
        id: Set(Uuid::new_v4()),
        order_id: Set(order_id),
        carrier: Set(carrier.to_string()),
        awb_number: Set(Some(awb_number)),
        status: Set(status.to_string()),
        last_event: Set(None),
        last_location: Set(None),
        expected_delivery: Set(None),
        created_date: Set(ts),
        modified_date: Set(ts),
    }
}

pub async fn for_order<C: ConnectionTrait>(db: &C, order_id: Uuid) -> Result<Vec<Model>, DbErr> {
    Entity::find().filter(Column::OrderId.eq(order_id)).all(db).await
}
