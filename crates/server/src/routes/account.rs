//! Address book of the signed-in customer.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use uuid::Uuid;

use models::address;
use service::{auth::domain::Claims, user_service};

use crate::{errors::JsonApiError, state::ServerState};

pub fn routes() -> Router<ServerState> {
    Router::new()
        .route("/Address", get(list).post(create))
        .route("/Address/:id", get(get_one).put(update).delete(remove))
}

pub async fn list(State(state): State<ServerState>, Extension(claims): Extension<Claims>) -> Result<Json<Vec<address::Model>>, JsonApiError> {
    Ok(Json(user_service::list_addresses(state.db.as_ref(), claims.uid).await?))
}

pub async fn get_one(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Json<address::Model>, JsonApiError> {
    Ok(Json(user_service::get_address(state.db.as_ref(), claims.uid, id).await?))
}

pub async fn create(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    Json(input): Json<address::NewAddress>,
) -> Result<(StatusCode, Json<address::Model>), JsonApiError> {
    let created = user_service::create_address(state.db.as_ref(), claims.uid, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(patch): Json<address::AddressPatch>,
) -> Result<Json<address::Model>, JsonApiError> {
    Ok(Json(user_service::update_address(state.db.as_ref(), claims.uid, id, patch).await?))
}

pub async fn remove(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, JsonApiError> {
    user_service::delete_address(state.db.as_ref(), claims.uid, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
