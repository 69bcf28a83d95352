use std::sync::Arc;

use argon2::{Argon2, password_hash::{PasswordHasher, PasswordVerifier, SaltString}, PasswordHash};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header as JwtHeader, Validation};
use rand::rngs::OsRng;
use tracing::{info, debug, instrument};

use super::domain::{RegisterInput, LoginInput, AuthUser, AuthSession, Claims};
use super::errors::AuthError;
use super::repository::AuthRepository;

/// Auth service configuration
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub password_algorithm: String,
}

impl From<&configs::AuthConfig> for AuthConfig {
    fn from(c: &configs::AuthConfig) -> Self {
        Self { jwt_secret: c.jwt_secret.clone(), token_ttl_hours: c.token_ttl_hours, password_algorithm: "argon2".into() }
    }
}

/// Auth business service independent of web framework
pub struct AuthService<R: AuthRepository + ?Sized> {
    repo: Arc<R>,
    cfg: AuthConfig,
}

impl<R: AuthRepository + ?Sized> AuthService<R> {
    pub fn new(repo: Arc<R>, cfg: AuthConfig) -> Self { Self { repo, cfg } }

    /// Register a customer account with a hashed password.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, repository::mock::MockAuthRepository};
    /// use service::auth::domain::RegisterInput;
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAuthRepository::default());
    /// let svc = AuthService::new(repo, AuthConfig { jwt_secret: "secret".into(), token_ttl_hours: 1, password_algorithm: "argon2".into() });
    /// let input = RegisterInput { email: "cook@example.com".into(), name: "Cook".into(), phone: None, password: "Secret123".into() };
    /// let user = tokio_test::block_on(svc.register(input)).unwrap();
    /// assert_eq!(user.role, "customer");
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn register(&self, input: RegisterInput) -> Result<AuthUser, AuthError> {
        if input.password.chars().count() < 8 {
            return Err(AuthError::Validation("password too short (>=8)".into()));
        }
        if let Some(existing) = self.repo.find_user_by_email(&input.email).await? {
            debug!("user exists: {}", existing.email);
            return Err(AuthError::Conflict);
        }

        let hash = hash_password(&input.password)?;
        let user = self
            .repo
            .create_user(&input.email, &input.name, input.phone.as_deref(), models::role::CUSTOMER)
            .await?;
        let _cred = self.repo.upsert_password(user.id, hash, self.cfg.password_algorithm.clone()).await?;
        info!(user_id = %user.id, email = %user.email, "user_registered");
        Ok(user)
    }

    /// Authenticate a user and issue a token.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, repository::mock::MockAuthRepository};
    /// use service::auth::domain::{RegisterInput, LoginInput};
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAuthRepository::default());
    /// let svc = AuthService::new(repo.clone(), AuthConfig { jwt_secret: "secret".into(), token_ttl_hours: 1, password_algorithm: "argon2".into() });
    /// let _ = tokio_test::block_on(svc.register(RegisterInput { email: "u@e.com".into(), name: "N".into(), phone: None, password: "Passw0rd".into() }));
    /// let session = tokio_test::block_on(svc.login(LoginInput { email: "u@e.com".into(), password: "Passw0rd".into() })).unwrap();
    /// assert_eq!(session.user.email, "u@e.com");
    /// assert!(!session.token.is_empty());
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, AuthError> {
        let user = self.repo
            .find_user_by_email(&input.email)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        let cred = self.repo
            .get_credentials(user.id)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        let parsed = PasswordHash::new(&cred.password_hash).map_err(|e| AuthError::HashError(e.to_string()))?;
        if Argon2::default().verify_password(input.password.as_bytes(), &parsed).is_err() {
            return Err(AuthError::Unauthorized);
        }
        if !user.is_active {
            return Err(AuthError::Disabled);
        }

        let (token, expires_at) = self.issue_token(&user)?;
        info!(user_id = %user.id, role = %user.role, "user_logged_in");
        Ok(AuthSession { user, token, expires_at })
    }

    pub fn issue_token(&self, user: &AuthUser) -> Result<(String, i64), AuthError> {
        let exp = (chrono::Utc::now() + chrono::Duration::hours(self.cfg.token_ttl_hours)).timestamp();
        let claims = Claims { sub: user.email.clone(), uid: user.id, role: user.role.clone(), exp: exp as usize };
        let token = encode(&JwtHeader::default(), &claims, &EncodingKey::from_secret(self.cfg.jwt_secret.as_bytes()))
            .map_err(|e| AuthError::TokenError(e.to_string()))?;
        Ok((token, exp))
    }

    /// Check signature and expiry; returns the embedded claims.
    pub fn decode_token(&self, token: &str) -> Result<Claims, AuthError> {
        decode_token(token, &self.cfg.jwt_secret)
    }
}

pub fn decode_token(token: &str, secret: &str) -> Result<Claims, AuthError> {
    decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &Validation::default())
        .map(|data| data.claims)
        .map_err(|e| AuthError::TokenError(e.to_string()))
}

pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AuthError::HashError(e.to_string()))?
        .to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::repository::mock::MockAuthRepository;

    fn svc(repo: Arc<MockAuthRepository>) -> AuthService<MockAuthRepository> {
        AuthService::new(repo, AuthConfig { jwt_secret: "test-secret".into(), token_ttl_hours: 2, password_algorithm: "argon2".into() })
    }

    fn reg(email: &str) -> RegisterInput {
        RegisterInput { email: email.into(), name: "Tester".into(), phone: None, password: "Cardamom9".into() }
    }

    #[tokio::test]
    async fn register_then_login_round_trip() {
        let repo = Arc::new(MockAuthRepository::default());
        let s = svc(repo);
        s.register(reg("a@spice.in")).await.unwrap();
        let session = s.login(LoginInput { email: "A@Spice.in".into(), password: "Cardamom9".into() }).await.unwrap();
        let claims = s.decode_token(&session.token).unwrap();
        assert_eq!(claims.sub, "a@spice.in");
        assert_eq!(claims.role, "customer");
        assert!(!claims.is_admin());
        assert_eq!(claims.exp as i64, session.expires_at);
    }

    #[tokio::test]
    async fn registered_user_has_argon2_credentials() {
        let repo = Arc::new(MockAuthRepository::default());
        let user = svc(repo.clone()).register(reg("c@spice.in")).await.unwrap();
        let creds = repo.get_credentials(user.id).await.unwrap().unwrap();
        assert!(creds.password_hash.starts_with("$argon2"));
        assert_ne!(creds.password_hash, "Cardamom9");
        let parsed = PasswordHash::new(&creds.password_hash).unwrap();
        assert!(Argon2::default().verify_password(b"Cardamom9", &parsed).is_ok());
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let s = svc(Arc::new(MockAuthRepository::default()));
        s.register(reg("dup@spice.in")).await.unwrap();
        assert!(matches!(s.register(reg("dup@spice.in")).await, Err(AuthError::Conflict)));
    }

    #[tokio::test]
    async fn short_password_rejected() {
        let s = svc(Arc::new(MockAuthRepository::default()));
        let mut input = reg("short@spice.in");
        input.password = "abc".into();
        assert!(matches!(s.register(input).await, Err(AuthError::Validation(_))));
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_user_are_unauthorized() {
        let s = svc(Arc::new(MockAuthRepository::default()));
        s.register(reg("b@spice.in")).await.unwrap();
        let bad = s.login(LoginInput { email: "b@spice.in".into(), password: "nope-nope".into() }).await;
        assert!(matches!(bad, Err(AuthError::Unauthorized)));
        let missing = s.login(LoginInput { email: "ghost@spice.in".into(), password: "Cardamom9".into() }).await;
        assert!(matches!(missing, Err(AuthError::Unauthorized)));
    }

    #[tokio::test]
    async fn disabled_user_cannot_login() {
        let repo = Arc::new(MockAuthRepository::default());
        let s = svc(repo.clone());
        s.register(reg("off@spice.in")).await.unwrap();
        repo.set_active("off@spice.in", false);
        let res = s.login(LoginInput { email: "off@spice.in".into(), password: "Cardamom9".into() }).await;
        assert!(matches!(res, Err(AuthError::Disabled)));
    }

    #[test]
    fn tampered_token_fails() {
        let s = svc(Arc::new(MockAuthRepository::default()));
        let user = AuthUser { id: uuid::Uuid::new_v4(), email: "x@y.in".into(), name: "X".into(), role: "admin".into(), is_active: true };
        let (token, _) = s.issue_token(&user).unwrap();
        assert!(decode_token(&token, "other-secret").is_err());
        assert!(s.decode_token(&token).unwrap().is_admin());
    }
}
