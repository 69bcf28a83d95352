use sea_orm::{entity::prelude::*, Set};
use serde::{Deserialize, Serialize};

use crate::now;

/// One line in a user's cart; unique per (user, product price).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cart")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub product_price_id: Uuid,
    pub quantity: i32,
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
        belongs_to = "super::product_price::Entity",
        from = "Column::ProductPriceId",
        to = "super::product_price::Column::Id"
    )]
    ProductPrice,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef { Relation::User.def() }
}

impl Related<super::product_price::Entity> for Entity {
    fn to() -> RelationDef { Relation::ProductPrice.def() }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn new_line(user_id: Uuid, product_price_id: Uuid, quantity: i32) -> ActiveModel {
    let ts = now();
    ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        product_price_id: Set(product_price_id),
        quantity: Set(quantity),
        created_date: Set(ts),
        modified_date: Set(ts),
    }
}
