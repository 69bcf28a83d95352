//! Generic data access: one operation per CRUD verb for any `Resource` entity.
//!
//! Entities own their validation through `Resource::build` / `Resource::patch`,
//! so these functions only translate between the HTTP shapes and sea-orm.

use std::sync::Arc;

use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, DatabaseConnection, EntityTrait, IntoActiveModel, PaginatorTrait,
    PrimaryKeyTrait, QueryOrder,
};
use tracing::{debug, instrument};
use uuid::Uuid;

use common::types::Page;
use models::Resource;

use crate::{errors::ServiceError, pagination::Pagination};

#[derive(Clone)]
pub struct Repository {
    db: Arc<DatabaseConnection>,
}

impl Repository {
    pub fn new(db: impl Into<Arc<DatabaseConnection>>) -> Self { Self { db: db.into() } }

    pub fn db(&self) -> &DatabaseConnection { &self.db }

    /// Newest first; soft-deleted rows never appear and inactive rows only on request.
    #[instrument(skip(self), fields(entity = E::LABEL))]
    pub async fn list<E>(&self, page: Pagination, include_inactive: bool) -> Result<Page<E::Model>, ServiceError>
    where
        E: Resource,
        E::Model: Sync,
    {
        let mut select = E::visible(E::find());
        if !include_inactive {
            select = E::active(select);
        }
        let (idx, per_page) = page.normalize();
        let paginator = select.order_by_desc(E::order_column()).paginate(self.db.as_ref(), per_page);
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(idx).await?;
        debug!(total, returned = items.len(), "listed");
        Ok(page.to_page(items, total))
    }

    pub async fn get<E>(&self, id: Uuid) -> Result<Option<E::Model>, ServiceError>
    where
        E: Resource,
        <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<Uuid>,
    {
        Ok(E::visible(E::find_by_id(id)).one(self.db.as_ref()).await?)
    }

    pub async fn require<E>(&self, id: Uuid) -> Result<E::Model, ServiceError>
    where
        E: Resource,
        <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<Uuid>,
    {
        self.get::<E>(id).await?.ok_or_else(|| ServiceError::not_found(E::LABEL))
    }

    #[instrument(skip(self, input), fields(entity = E::LABEL))]
    pub async fn create<E>(&self, input: E::Create) -> Result<E::Model, ServiceError>
    where
        E: Resource,
        E::Model: IntoActiveModel<E::ActiveModel>,
        E::ActiveModel: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send,
    {
        let am = E::build(input)?;
        let created = am.insert(self.db.as_ref()).await?;
        debug!("created");
        Ok(created)
    }

    #[instrument(skip(self, patch), fields(entity = E::LABEL, %id))]
    pub async fn update<E>(&self, id: Uuid, patch: E::Patch) -> Result<E::Model, ServiceError>
    where
        E: Resource,
        E::Model: IntoActiveModel<E::ActiveModel>,
        E::ActiveModel: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send,
        <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<Uuid>,
    {
        let current = self.require::<E>(id).await?;
        let am = E::patch(current, patch)?;
        Ok(am.update(self.db.as_ref()).await?)
    }

    /// Soft delete where the entity supports it, otherwise remove the row.
    /// Returns whether anything was affected.
    #[instrument(skip(self), fields(entity = E::LABEL, %id))]
    pub async fn delete<E>(&self, id: Uuid) -> Result<bool, ServiceError>
    where
        E: Resource,
        E::Model: IntoActiveModel<E::ActiveModel>,
        E::ActiveModel: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send,
        <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<Uuid>,
    {
        let Some(current) = self.get::<E>(id).await? else { return Ok(false) };
        match E::retire(current) {
            Some(am) => {
                am.update(self.db.as_ref()).await?;
                Ok(true)
            }
            None => {
                let res = E::delete_by_id(id).exec(self.db.as_ref()).await?;
                Ok(res.rows_affected > 0)
            }
        }
    }
}
