use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use models::user;
use service::{
    auth::domain::{AuthUser, Claims, LoginInput, RegisterInput},
    user_service::{self, Profile},
};

use crate::{errors::JsonApiError, state::ServerState};

pub fn routes() -> Router<ServerState> {
    Router::new()
        .route("/Auth/register", post(register))
        .route("/Auth/login", post(login))
        .route("/Auth/logout", post(logout))
        .route("/Auth/user-profile", get(profile).put(update_profile))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginOutput {
    pub user_id: Uuid,
    pub email: String,
    pub name: String,
    pub role: String,
    pub token: String,
    pub expires_at: i64,
}

#[utoipa::path(post, path = "/Auth/register", tag = "auth", request_body = crate::openapi::RegisterRequest, responses((status = 201, description = "Registered"), (status = 400, description = "Bad Request"), (status = 409, description = "Conflict")))]
pub async fn register(State(state): State<ServerState>, Json(input): Json<RegisterInput>) -> Result<(StatusCode, Json<AuthUser>), JsonApiError> {
    models::validate::email(&input.email)?;
    let user = state.auth.register(input).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

#[utoipa::path(post, path = "/Auth/login", tag = "auth", request_body = crate::openapi::LoginRequest, responses((status = 200, description = "Logged in; sets the auth cookie"), (status = 401, description = "Unauthorized")))]
pub async fn login(State(state): State<ServerState>, jar: CookieJar, Json(input): Json<LoginInput>) -> Result<(CookieJar, Json<LoginOutput>), JsonApiError> {
    let session = state.auth.login(input).await?;
    let mut cookie = Cookie::new(state.cfg.auth.cookie_name.clone(), session.token.clone());
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_secure(state.cfg.auth.secure_cookie);
    cookie.set_same_site(SameSite::Lax);
    let user = session.user;
    let out = LoginOutput {
        user_id: user.id,
        email: user.email,
        name: user.name,
        role: user.role,
        token: session.token,
        expires_at: session.expires_at,
    };
    Ok((jar.add(cookie), Json(out)))
}

#[utoipa::path(post, path = "/Auth/logout", tag = "auth", responses((status = 204, description = "Cookie cleared")))]
pub async fn logout(State(state): State<ServerState>, jar: CookieJar) -> (CookieJar, StatusCode) {
    let mut cookie = Cookie::from(state.cfg.auth.cookie_name.clone());
    cookie.set_path("/");
    (jar.remove(cookie), StatusCode::NO_CONTENT)
}

#[utoipa::path(get, path = "/Auth/user-profile", tag = "auth", responses((status = 200, description = "Current user"), (status = 401, description = "Unauthorized")))]
pub async fn profile(State(state): State<ServerState>, Extension(claims): Extension<Claims>) -> Result<Json<Profile>, JsonApiError> {
    Ok(Json(user_service::get_profile(state.db.as_ref(), claims.uid).await?))
}

pub async fn update_profile(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    Json(patch): Json<user::ProfilePatch>,
) -> Result<Json<Profile>, JsonApiError> {
    let updated = user_service::update_profile(state.db.as_ref(), claims.uid, patch).await?;
    info!(user_id = %claims.uid, "profile_updated");
    Ok(Json(updated))
}
