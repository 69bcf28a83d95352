use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use sea_orm::{entity::prelude::*, Set};
use serde::{Deserialize, Serialize};

use crate::{errors::ModelError, now};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "order")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub order_number: String,
    pub user_id: Uuid,
    pub address_id: Uuid,
    pub currency_code: String,
    pub subtotal: Decimal,
    pub tax_total: Decimal,
    pub shipping_fee: Decimal,
    pub discount_total: Decimal,
    pub grand_total: Decimal,
    pub status: String,
    pub invoice_number: Option<String>,
    /// Set when payment is verified; the invoice is dated from it.
    pub invoice_date: Option<DateTimeWithTimeZone>,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
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
        belongs_to = "super::address::Entity",
        from = "Column::AddressId",
        to = "super::address::Column::Id"
    )]
    Address,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef { Relation::User.def() }
}

impl Related<super::address::Entity> for Entity {
    fn to() -> RelationDef { Relation::Address.def() }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn status(&self) -> Result<OrderStatus, ModelError> {
        self.status.parse()
    }
}

/// Lifecycle of an order, stored as its lower-case name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Created,
    Paid,
    Failed,
    Packed,
    Shipped,
    Delivered,
    Cancelled,
    Refunded,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 8] = [
        OrderStatus::Created,
        OrderStatus::Paid,
        OrderStatus::Failed,
        OrderStatus::Packed,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
        OrderStatus::Refunded,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Created => "created",
            OrderStatus::Paid => "paid",
            OrderStatus::Failed => "failed",
            OrderStatus::Packed => "packed",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Refunded => "refunded",
        }
    }

    pub fn can_transition(self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Created, Paid | Failed | Cancelled)
                | (Failed, Paid | Cancelled)
                | (Paid, Packed | Cancelled | Refunded)
                | (Packed, Shipped | Cancelled)
                | (Shipped, Delivered)
                | (Delivered, Refunded)
        )
    }

    /// Orders that have been paid for and not yet closed out.
    pub fn is_paid(self) -> bool {
        matches!(self, OrderStatus::Paid | OrderStatus::Packed | OrderStatus::Shipped | OrderStatus::Delivered)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        OrderStatus::ALL
            .into_iter()
            .find(|st| st.as_str() == lower)
            .ok_or_else(|| ModelError::Validation(format!("unknown order status: {s}")))
    }
}

/// Money totals computed by checkout pricing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Totals {
    pub subtotal: Decimal,
    pub tax_total: Decimal,
    pub shipping_fee: Decimal,
    pub discount_total: Decimal,
    pub grand_total: Decimal,
}

pub fn new_order(
    order_number: String,
    user_id: Uuid,
    address_id: Uuid,
    currency_code: &str,
    totals: Totals,
    notes: Option<String>,
) -> ActiveModel {
    let ts = now();
    ActiveModel {
        id: Set(Uuid::new_v4()),
        order_number: Set(order_number),
        user_id: Set(user_id),
        address_id: Set(address_id),
        currency_code: Set(currency_code.to_string()),
        subtotal: Set(totals.subtotal),
        tax_total: Set(totals.tax_total),
        shipping_fee: Set(totals.shipping_fee),
        discount_total: Set(totals.discount_total),
        grand_total: Set(totals.grand_total),
        status: Set(OrderStatus::Created.as_str().to_string()),
        invoice_number: Set(None),
        invoice_date: Set(None),
        notes: Set(notes.filter(|n| !n.trim().is_empty())),
        is_deleted: Set(false),
        created_date: Set(ts),
        modified_date: Set(ts),
    }
}

/// Move `model` to `next`, refusing transitions the lifecycle does not allow.
pub fn transition(model: Model, next: OrderStatus) -> Result<ActiveModel, ModelError> {
    let current = model.status()?;
    if !current.can_transition(next) {
        return Err(ModelError::Validation(format!("cannot move order from {current} to {next}")));
    }
    let mut am: ActiveModel = model.into();
    am.status = Set(next.as_str().to_string());
    am.modified_date = Set(now());
    Ok(am)
}
