use rust_decimal::Decimal;
use sea_orm::{entity::prelude::*, Set};
use serde::{Deserialize, Serialize};

use crate::now;

pub const KIND_VERIFY: &str = "verify";
pub const KIND_REFUND: &str = "refund";
pub const STATUS_SUCCESS: &str = "success";
pub const STATUS_FAILED: &str = "failed";

/// Append-only ledger of payment events.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transaction")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub payment_id: Uuid,
    pub kind: String,
    pub amount: Decimal,
    pub status: String,
    pub reference: Option<String>,
    pub payload: Option<Json>,
    pub created_date: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::payment::Entity",
        from = "Column::PaymentId",
        to = "super::payment::Column::Id"
    )]
    Payment,
}

impl Related<super::payment::Entity> for Entity {
    fn to() -> RelationDef { Relation::Payment.def() }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn record(payment_id: Uuid, kind: &str, amount: Decimal, status: &str, reference: Option<String>, payload: Option<Json>) -> ActiveModel {
    ActiveModel {
        id: Set(Uuid::new_v4()),
        payment_id: Set(payment_id),
        kind: Set(kind.to_string()),
        amount: Set(amount),
        status: Set(status.to_string()),
        reference: Set(reference),
        payload: Set(payload),
        created_date: Set(now()),
    }
}
