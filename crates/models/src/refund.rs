use rust_decimal::Decimal;
use sea_orm::{entity::prelude::*, Set};
use serde::{Deserialize, Serialize};

use crate::{errors::ModelError, now, validate};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "refund")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub payment_id: Uuid,
    pub amount: Decimal,
    #[sea_orm(column_type = "Text", nullable)]
    pub reason: Option<String>,
    pub status: String,
    pub provider_refund_id: Option<String>,
    pub created_date: DateTimeWithTimeZone,
    pub modified_date: DateTimeWithTimeZone,
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

/// Refund of `amount` against a payment that still has `refundable` left.
pub fn new_refund(payment_id: Uuid, amount: Decimal, refundable: Decimal, reason: Option<String>) -> Result<ActiveModel, ModelError> {
    let amount = validate::money("amount", amount)?;
    if amount.is_zero() {
        return Err(ModelError::invalid("amount", "must be positive"));
    }
    if amount > refundable {
        return Err(ModelError::Validation(format!("refund {amount} exceeds refundable {refundable}")));
    }
    let ts = now();
    Ok(ActiveModel {
        id: Set(Uuid::new_v4()),
        payment_id: Set(payment_id),
        amount: Set(amount),
        reason: Set(reason),
        status: Set("processed".into()),
        provider_refund_id: Set(None),
        created_date: Set(ts),
        modified_date: Set(ts),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refund_bounded_by_refundable() {
        let pid = Uuid::new_v4();
        assert!(new_refund(pid, Decimal::new(50, 0), Decimal::new(100, 0), None).is_ok());
        assert!(new_refund(pid, Decimal::new(101, 0), Decimal::new(100, 0), None).is_err());
        assert!(new_refund(pid, Decimal::ZERO, Decimal::new(100, 0), None).is_err());
    }
}
