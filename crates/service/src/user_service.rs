//! Profile and address book for the signed-in user.

use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::Serialize;
use tracing::{info, instrument};
use uuid::Uuid;

use models::{address, now, role, user};

use crate::errors::ServiceError;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(flatten)]
    pub user: user::Model,
    pub role: String,
}

pub async fn get_profile(db: &DatabaseConnection, user_id: Uuid) -> Result<Profile, ServiceError> {
    let (u, r) = user::Entity::find_by_id(user_id)
        .filter(user::Column::IsDeleted.eq(false))
        .find_also_related(role::Entity)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("user"))?;
    Ok(Profile { user: u, role: r.map(|r| r.name).unwrap_or_else(|| role::CUSTOMER.into()) })
}

#[instrument(skip(db, patch), fields(%user_id))]
pub async fn update_profile(db: &DatabaseConnection, user_id: Uuid, patch: user::ProfilePatch) -> Result<Profile, ServiceError> {
    let current = user::Entity::find_by_id(user_id)
        .one(db)
        .await?
        .filter(|u| !u.is_deleted)
        .ok_or_else(|| ServiceError::not_found("user"))?;
    user::apply_profile(current, patch)?.update(db).await?;
    get_profile(db, user_id).await
}

pub async fn list_addresses(db: &DatabaseConnection, user_id: Uuid) -> Result<Vec<address::Model>, ServiceError> {
    Ok(address::owned_by(user_id)
        .order_by_desc(address::Column::IsDefault)
        .order_by_desc(address::Column::CreatedDate)
        .all(db)
        .await?)
}

/// Address owned by `user_id`; other users' addresses read as not found.
pub async fn get_address<C: sea_orm::ConnectionTrait>(db: &C, user_id: Uuid, id: Uuid) -> Result<address::Model, ServiceError> {
    address::owned_by(user_id)
        .filter(address::Column::Id.eq(id))
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("address"))
}

async fn clear_default<C: sea_orm::ConnectionTrait>(db: &C, user_id: Uuid, keep: Uuid) -> Result<(), ServiceError> {
    address::Entity::update_many()
        .col_expr(address::Column::IsDefault, Expr::value(false))
        .col_expr(address::Column::ModifiedDate, Expr::value(now()))
        .filter(address::Column::UserId.eq(user_id))
        .filter(address::Column::Id.ne(keep))
        .exec(db)
        .await?;
    Ok(())
}

#[instrument(skip(db, input), fields(%user_id))]
pub async fn create_address(db: &DatabaseConnection, user_id: Uuid, input: address::NewAddress) -> Result<address::Model, ServiceError> {
    let am = address::build(user_id, input)?;
    let txn = db.begin().await?;
    let created = am.insert(&txn).await?;
    if created.is_default {
        clear_default(&txn, user_id, created.id).await?;
    }
    txn.commit().await?;
    info!(address_id = %created.id, "address_created");
    Ok(created)
}

#[instrument(skip(db, patch), fields(%user_id, %id))]
pub async fn update_address(db: &DatabaseConnection, user_id: Uuid, id: Uuid, patch: address::AddressPatch) -> Result<address::Model, ServiceError> {
    let txn = db.begin().await?;
    let current = get_address(&txn, user_id, id).await?;
    let updated = address::patch(current, patch)?.update(&txn).await?;
    if updated.is_default {
        clear_default(&txn, user_id, updated.id).await?;
    }
    txn.commit().await?;
    Ok(updated)
}

/// Soft delete; historical orders keep pointing at the row.
pub async fn delete_address(db: &DatabaseConnection, user_id: Uuid, id: Uuid) -> Result<(), ServiceError> {
    let current = get_address(db, user_id, id).await?;
    let mut am: address::ActiveModel = current.into();
    am.is_deleted = Set(true);
    am.is_default = Set(false);
    am.modified_date = Set(now());
    am.update(db).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn addr(user_id: Uuid, is_default: bool) -> address::Model {
        let ts = now();
        address::Model {
            id: Uuid::new_v4(),
            user_id,
            full_name: "Ravi Kumar".into(),
            phone: "9000000001".into(),
            line1: "4 Gandhi Bazaar".into(),
            line2: None,
            landmark: None,
            city: "Bengaluru".into(),
            state_id: Uuid::new_v4(),
            country_id: Uuid::new_v4(),
            postal_code: "560004".into(),
            is_default,
            is_deleted: false,
            created_date: ts,
            modified_date: ts,
        }
    }

    #[tokio::test]
    async fn foreign_address_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<address::Model>::new()])
            .into_connection();
        let err = get_address(&db, Uuid::new_v4(), Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn default_address_clears_siblings() {
        let uid = Uuid::new_v4();
        let row = addr(uid, true);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![row.clone()]])
            .append_exec_results([MockExecResult { last_insert_id: 0, rows_affected: 2 }])
            .into_connection();
        let input = address::NewAddress {
            full_name: row.full_name.clone(),
            phone: row.phone.clone(),
            line1: row.line1.clone(),
            line2: None,
            landmark: None,
            city: row.city.clone(),
            state_id: row.state_id,
            country_id: row.country_id,
            postal_code: row.postal_code.clone(),
            is_default: true,
        };
        let created = create_address(&db, uid, input).await.unwrap();
        assert!(created.is_default);
        let log = format!("{:?}", db.into_transaction_log());
        assert!(log.contains("UPDATE") && log.contains("is_default"), "{log}");
    }
}
