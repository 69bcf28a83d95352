use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, put},
    Extension, Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use models::cart;
use service::{
    auth::domain::Claims,
    cart_service::{self, CartView, LineRequest},
};

use crate::{errors::JsonApiError, state::ServerState};

pub fn routes() -> Router<ServerState> {
    Router::new()
        .route("/Cart", get(view).post(add).delete(clear))
        .route("/Cart/:id", put(set_quantity).delete(remove))
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct QuantityInput {
    pub quantity: i32,
}

#[utoipa::path(get, path = "/Cart", tag = "cart", responses((status = 200, description = "Priced cart lines"), (status = 401, description = "Unauthorized")))]
pub async fn view(State(state): State<ServerState>, Extension(claims): Extension<Claims>) -> Result<Json<CartView>, JsonApiError> {
    Ok(Json(cart_service::list(state.db.as_ref(), claims.uid).await?))
}

#[utoipa::path(post, path = "/Cart", tag = "cart", request_body = crate::openapi::CartLineRequest, responses((status = 200, description = "Line added or merged"), (status = 400, description = "Unknown pack or bad quantity")))]
pub async fn add(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<LineRequest>,
) -> Result<Json<cart::Model>, JsonApiError> {
    Ok(Json(cart_service::add(state.db.as_ref(), claims.uid, req).await?))
}

pub async fn set_quantity(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(input): Json<QuantityInput>,
) -> Result<Response, JsonApiError> {
    // zero removes the line
    match cart_service::set_quantity(state.db.as_ref(), claims.uid, id, input.quantity).await? {
        Some(line) => Ok(Json(line).into_response()),
        None => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}

pub async fn remove(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, JsonApiError> {
    if cart_service::remove(state.db.as_ref(), claims.uid, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(JsonApiError::new(StatusCode::NOT_FOUND, "Not Found", Some("cart line not found".into())))
    }
}

pub async fn clear(State(state): State<ServerState>, Extension(claims): Extension<Claims>) -> Result<StatusCode, JsonApiError> {
    cart_service::clear(state.db.as_ref(), claims.uid).await?;
    Ok(StatusCode::NO_CONTENT)
}
