use std::sync::Arc;

use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use uuid::Uuid;

use models::{role, user, user_credentials};

use crate::auth::domain::{AuthUser, Credentials};
use crate::auth::errors::AuthError;
use crate::auth::repository::AuthRepository;

pub struct SeaOrmAuthRepository {
    pub db: Arc<DatabaseConnection>,
}

fn repo_err(e: impl std::fmt::Display) -> AuthError {
    AuthError::Repository(e.to_string())
}

#[async_trait::async_trait]
impl AuthRepository for SeaOrmAuthRepository {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError> {
        let res = user::Entity::find()
            .filter(user::Column::Email.eq(email.trim().to_ascii_lowercase()))
            .filter(user::Column::IsDeleted.eq(false))
            .find_also_related(role::Entity)
            .one(self.db.as_ref())
            .await
            .map_err(repo_err)?;
        Ok(res.map(|(u, r)| AuthUser {
            id: u.id,
            email: u.email,
            name: u.name,
            role: r.map(|r| r.name).unwrap_or_else(|| role::CUSTOMER.to_string()),
            is_active: u.is_active,
        }))
    }

    async fn create_user(&self, email: &str, name: &str, phone: Option<&str>, role_name: &str) -> Result<AuthUser, AuthError> {
        let r = role::find_by_name(self.db.as_ref(), role_name)
            .await
            .map_err(repo_err)?
            .ok_or_else(|| AuthError::Repository(format!("role {role_name} is not seeded")))?;
        let am = user::new_active(r.id, email, name, phone).map_err(|e| AuthError::Validation(e.to_string()))?;
        let created = am.insert(self.db.as_ref()).await.map_err(|e| {
            if e.to_string().contains("duplicate key value") { AuthError::Conflict } else { repo_err(e) }
        })?;
        Ok(AuthUser { id: created.id, email: created.email, name: created.name, role: r.name, is_active: created.is_active })
    }

    async fn get_credentials(&self, user_id: Uuid) -> Result<Option<Credentials>, AuthError> {
        let res = user_credentials::find_for_user(self.db.as_ref(), user_id).await.map_err(repo_err)?;
        Ok(res.map(|c| Credentials { user_id: c.user_id, password_hash: c.password_hash, password_algorithm: c.password_algorithm }))
    }

    async fn upsert_password(&self, user_id: Uuid, password_hash: String, password_algorithm: String) -> Result<Credentials, AuthError> {
        let c = user_credentials::upsert_password(self.db.as_ref(), user_id, password_hash, &password_algorithm)
            .await
            .map_err(repo_err)?;
        Ok(Credentials { user_id: c.user_id, password_hash: c.password_hash, password_algorithm: c.password_algorithm })
    }
}
