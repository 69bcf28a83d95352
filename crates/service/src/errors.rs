use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("invalid state: {0}")]
    InvalidState(String),
    #[error("database error: {0}")]
    Db(String),
    #[error("external service error: {0}")]
    External(String),
    #[error("model error: {0}")]
    Model(models::errors::ModelError),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }

    pub fn external(provider: &str, err: impl std::fmt::Display) -> Self {
        Self::External(format!("{provider}: {err}"))
    }
}

impl From<models::errors::ModelError> for ServiceError {
    fn from(e: models::errors::ModelError) -> Self {
        match e {
            models::errors::ModelError::Validation(msg) => Self::Validation(msg),
            other => Self::Model(other),
        }
    }
}

impl From<sea_orm::DbErr> for ServiceError {
    fn from(e: sea_orm::DbErr) -> Self {
        let msg = e.to_string();
        // Postgres unique_violation surfaces through sqlx as a message with the constraint name
        if msg.contains("duplicate key value") {
            return Self::Conflict(msg);
        }
        Self::Db(msg)
    }
}

impl From<sea_orm::TransactionError<ServiceError>> for ServiceError {
    fn from(e: sea_orm::TransactionError<ServiceError>) -> Self {
        match e {
            sea_orm::TransactionError::Connection(db) => db.into(),
            sea_orm::TransactionError::Transaction(inner) => inner,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_validation_becomes_service_validation() {
        let e: ServiceError = models::errors::ModelError::Validation("name required".into()).into();
        assert!(matches!(e, ServiceError::Validation(m) if m == "name required"));
    }

    #[test]
    fn duplicate_key_is_conflict() {
        let e: ServiceError = sea_orm::DbErr::Custom("duplicate key value violates unique constraint".into()).into();
        assert!(matches!(e, ServiceError::Conflict(_)));
        let e: ServiceError = sea_orm::DbErr::Custom("boom".into()).into();
        assert!(matches!(e, ServiceError::Db(_)));
    }
}
