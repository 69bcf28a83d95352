//! Checkout and the customer's order history.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use uuid::Uuid;

use common::types::Page;
use models::order;
use service::{
    auth::domain::Claims,
    checkout::{CreateOrderInput, OrderDetail, PlacedOrder, VerifyOutcome, VerifyPaymentInput},
};

use crate::{errors::JsonApiError, state::ServerState};

use super::ListQuery;

pub fn routes() -> Router<ServerState> {
    Router::new()
        .route("/Checkout/create-order", post(create_order))
        .route("/Checkout/verify-payment", post(verify_payment))
        .route("/Order", get(list_orders))
        .route("/Order/:id", get(get_order))
}

#[utoipa::path(post, path = "/Checkout/create-order", tag = "checkout", request_body = crate::openapi::CreateOrderRequest, responses((status = 201, description = "Order placed, payment pending"), (status = 400, description = "Empty or invalid lines"), (status = 404, description = "Address not found"), (status = 502, description = "Payment provider failed")))]
pub async fn create_order(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    Json(input): Json<CreateOrderInput>,
) -> Result<(StatusCode, Json<PlacedOrder>), JsonApiError> {
    let placed = state.checkout.create_order(claims.uid, input).await?;
    Ok((StatusCode::CREATED, Json(placed)))
}

#[utoipa::path(post, path = "/Checkout/verify-payment", tag = "checkout", request_body = crate::openapi::VerifyPaymentRequest, responses((status = 200, description = "Verification outcome"), (status = 404, description = "Order not found"), (status = 409, description = "Order cannot be paid")))]
pub async fn verify_payment(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    Json(input): Json<VerifyPaymentInput>,
) -> Result<Json<VerifyOutcome>, JsonApiError> {
    Ok(Json(state.checkout.verify_payment(claims.uid, input).await?))
}

#[utoipa::path(get, path = "/Order", tag = "orders", params(ListQuery), responses((status = 200, description = "Own orders, newest first")))]
pub async fn list_orders(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    Query(q): Query<ListQuery>,
) -> Result<Json<Page<order::Model>>, JsonApiError> {
    Ok(Json(state.checkout.list_orders(claims.uid, q.pagination()).await?))
}

#[utoipa::path(get, path = "/Order/{id}", tag = "orders", params(("id" = Uuid, Path, description = "Order id")), responses((status = 200, description = "Order with items, payments and shipments"), (status = 404, description = "Not Found")))]
pub async fn get_order(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Json<OrderDetail>, JsonApiError> {
    Ok(Json(state.checkout.get_order(claims.uid, id).await?))
}
