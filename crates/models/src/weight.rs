use rust_decimal::Decimal;
use sea_orm::{entity::prelude::*, QueryFilter, Select, Set};
use serde::{Deserialize, Serialize};

use crate::{errors::ModelError, now, resource::Resource, validate};

/// Pack size a product is sold in, e.g. `100 g`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "weight")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub value: Decimal,
    pub unit: String,
    pub label: String,
    pub is_active: bool,
    pub is_deleted: bool,
    pub created_date: DateTimeWithTimeZone,
    pub modified_date: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub const UNITS: [&str; 5] = ["g", "kg", "ml", "l", "pc"];

pub fn validate_unit(unit: &str) -> Result<String, ModelError> {
    let u = unit.trim().to_ascii_lowercase();
    if !UNITS.contains(&u.as_str()) {
        return Err(ModelError::Validation(format!("unit must be one of {}", UNITS.join(", "))));
    }
    Ok(u)
}

/// `100 g`, `1.5 kg`; trailing zeros dropped.
pub fn default_label(value: Decimal, unit: &str) -> String {
    format!("{} {}", value.normalize(), unit)
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWeight {
    pub value: Decimal,
    pub unit: String,
    pub label: Option<String>,
    #[serde(default = "crate::default_true")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightPatch {
    pub label: Option<String>,
    pub is_active: Option<bool>,
}

impl Resource for Entity {
    type Create = NewWeight;
    type Patch = WeightPatch;
    const LABEL: &'static str = "weight";

    fn build(input: NewWeight) -> Result<ActiveModel, ModelError> {
        if input.value <= Decimal::ZERO {
            return Err(ModelError::invalid("value", "must be positive"));
        }
        let unit = validate_unit(&input.unit)?;
        let label = match input.label {
            Some(l) => validate::required("label", &l)?,
            None => default_label(input.value, &unit),
        };
        let ts = now();
        Ok(ActiveModel {
            id: Set(Uuid::new_v4()),
            value: Set(input.value),
            unit: Set(unit),
            label: Set(label),
            is_active: Set(input.is_active),
            is_deleted: Set(false),
            created_date: Set(ts),
            modified_date: Set(ts),
        })
    }

    fn patch(model: Model, patch: WeightPatch) -> Result<ActiveModel, ModelError> {
        let mut am: ActiveModel = model.into();
        if let Some(label) = patch.label { am.label = Set(validate::required("label", &label)?); }
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

    #[test]
    fn label_defaults_from_value_and_unit() {
        let am = <Entity as Resource>::build(NewWeight { value: Decimal::new(1000, 1), unit: "G".into(), label: None, is_active: true }).unwrap();
        assert_eq!(am.label, ActiveValue::Set("100 g".to_string()));
        assert_eq!(am.unit, ActiveValue::Set("g".to_string()));
    }

    #[test]
    fn rejects_unknown_unit_and_zero() {
        assert!(<Entity as Resource>::build(NewWeight { value: Decimal::ONE, unit: "oz".into(), label: None, is_active: true }).is_err());
        assert!(<Entity as Resource>::build(NewWeight { value: Decimal::ZERO, unit: "g".into(), label: None, is_active: true }).is_err());
    }
}
