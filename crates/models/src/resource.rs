//! Contract between an entity and the generic CRUD repository in `service`.

use sea_orm::{EntityTrait, Select};
use serde::de::DeserializeOwned;

use crate::errors::ModelError;

/// An entity managed through plain create/read/update/delete.
///
/// `build` and `patch` own all validation so the repository can stay a
/// pass-through.
pub trait Resource: EntityTrait {
    type Create: DeserializeOwned + Send + 'static;
    type Patch: DeserializeOwned + Send + 'static;

    /// Used in error messages and log fields.
    const LABEL: &'static str;

    fn build(input: Self::Create) -> Result<Self::ActiveModel, ModelError>;

    fn patch(model: Self::Model, patch: Self::Patch) -> Result<Self::ActiveModel, ModelError>;

    /// Hide soft-deleted rows.
    fn visible(select: Select<Self>) -> Select<Self> {
        select
    }

    /// Storefront view: only active rows.
    fn active(select: Select<Self>) -> Select<Self> {
        select
    }

    /// Soft-deleted form of `model`, or `None` when rows are removed outright.
    fn retire(model: Self::Model) -> Option<Self::ActiveModel> {
        let _ = model;
        None
    }

    /// Listings are ordered by this column, newest first.
    fn order_column() -> Self::Column;
}
