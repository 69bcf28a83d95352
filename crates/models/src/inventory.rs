use sea_orm::{entity::prelude::*, Set};
use serde::{Deserialize, Serialize};

use crate::{errors::ModelError, now, resource::Resource, validate};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "inventory")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub sku_id: Uuid,
    pub quantity: i32,
    pub reserved: i32,
    pub reorder_level: i32,
    pub created_date: DateTimeWithTimeZone,
    pub modified_date: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::sku::Entity",
        from = "Column::SkuId",
        to = "super::sku::Column::Id"
    )]
    Sku,
}

impl Related<super::sku::Entity> for Entity {
    fn to() -> RelationDef { Relation::Sku.def() }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn available(&self) -> i32 {
        (self.quantity - self.reserved).max(0)
    }

    pub fn needs_reorder(&self) -> bool {
        self.available() <= self.reorder_level
    }
}

/// New on-hand quantity after applying `delta`; stock never goes negative.
pub fn adjusted_quantity(current: i32, delta: i32) -> Result<i32, ModelError> {
    let next = current
        .checked_add(delta)
        .ok_or_else(|| ModelError::Validation("quantity overflow".into()))?;
    if next < 0 {
        return Err(ModelError::Validation(format!("insufficient stock: have {current}, adjusting by {delta}")));
    }
    Ok(next)
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInventory {
    pub sku_id: Uuid,
    #[serde(default)]
    pub quantity: i32,
    #[serde(default)]
    pub reorder_level: i32,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryPatch {
    pub quantity: Option<i32>,
    pub reserved: Option<i32>,
    pub reorder_level: Option<i32>,
}

impl Resource for Entity {
    type Create = NewInventory;
    type Patch = InventoryPatch;
    const LABEL: &'static str = "inventory";

    fn build(input: NewInventory) -> Result<ActiveModel, ModelError> {
        let ts = now();
        Ok(ActiveModel {
            id: Set(Uuid::new_v4()),
            sku_id: Set(input.sku_id),
            quantity: Set(validate::non_negative("quantity", input.quantity)?),
            reserved: Set(0),
            reorder_level: Set(validate::non_negative("reorderLevel", input.reorder_level)?),
            created_date: Set(ts),
            modified_date: Set(ts),
        })
    }

    fn patch(model: Model, patch: InventoryPatch) -> Result<ActiveModel, ModelError> {
        let quantity = validate::non_negative("quantity", patch.quantity.unwrap_or(model.quantity))?;
        let reserved = validate::non_negative("reserved", patch.reserved.unwrap_or(model.reserved))?;
        if reserved > quantity {
            return Err(ModelError::Validation("reserved cannot exceed quantity".into()));
        }
        let mut am: ActiveModel = model.into();
        am.quantity = Set(quantity);
        am.reserved = Set(reserved);
        if let Some(level) = patch.reorder_level { am.reorder_level = Set(validate::non_negative("reorderLevel", level)?); }
        am.modified_date = Set(now());
        Ok(am)
    }

    fn order_column() -> Column { Column::ModifiedDate }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjust_never_below_zero() {
        assert_eq!(adjusted_quantity(10, -4).unwrap(), 6);
        assert_eq!(adjusted_quantity(3, -3).unwrap(), 0);
        assert!(adjusted_quantity(3, -4).is_err());
        assert!(adjusted_quantity(i32::MAX, 1).is_err());
    }

    #[test]
    fn availability_and_reorder() {
        let ts = now();
        let m = Model { id: Uuid::new_v4(), sku_id: Uuid::new_v4(), quantity: 12, reserved: 4, reorder_level: 8, created_date: ts, modified_date: ts };
        assert_eq!(m.available(), 8);
        assert!(m.needs_reorder());
    }
}
