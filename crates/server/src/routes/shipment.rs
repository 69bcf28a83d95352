use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use uuid::Uuid;

use models::shipment;
use service::{auth::domain::Claims, shipping::CreateShipmentInput};

use crate::{errors::JsonApiError, state::ServerState};

pub fn routes() -> Router<ServerState> {
    Router::new()
        .route("/Shipment", post(create))
        .route("/Shipment/order/:order_id", get(for_order))
        .route("/Shipment/:id/refresh", post(refresh))
}

#[utoipa::path(post, path = "/Shipment", tag = "shipment", request_body = crate::openapi::CreateShipmentRequest, responses((status = 201, description = "Booked with the carrier"), (status = 400, description = "Carrier not configured"), (status = 409, description = "Order not paid or packed"), (status = 502, description = "Carrier call failed")))]
pub async fn create(State(state): State<ServerState>, Json(input): Json<CreateShipmentInput>) -> Result<(StatusCode, Json<shipment::Model>), JsonApiError> {
    let created = state.shipments.create_for_order(input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(get, path = "/Shipment/order/{orderId}", tag = "shipment", params(("orderId" = Uuid, Path, description = "Order id")), responses((status = 200, description = "Shipments of the order"), (status = 404, description = "Not Found")))]
pub async fn for_order(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    Path(order_id): Path<Uuid>,
) -> Result<Json<Vec<shipment::Model>>, JsonApiError> {
    if claims.is_admin() {
        return Ok(Json(state.shipments.list_for_order(order_id).await?));
    }
    let detail = state.checkout.get_order(claims.uid, order_id).await?;
    Ok(Json(detail.shipments))
}

#[utoipa::path(post, path = "/Shipment/{id}/refresh", tag = "shipment", params(("id" = Uuid, Path, description = "Shipment id")), responses((status = 200, description = "Tracking refreshed"), (status = 404, description = "Not Found"), (status = 502, description = "Carrier call failed")))]
pub async fn refresh(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<Json<shipment::Model>, JsonApiError> {
    Ok(Json(state.shipments.refresh(id).await?))
}
