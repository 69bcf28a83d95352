//! Back-office endpoints. `require_auth` already rejects non-admins for
//! everything under `/Admin`.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::Deserialize;
use uuid::Uuid;

use common::types::Page;
use models::{analytics_event, order::{self, OrderStatus}, refund, third_party_api_log};
use service::{
    analytics_service::{self, TypeCount},
    api_log,
    checkout::{OrderDetail, RefundInput},
    pagination::Pagination,
};

use crate::{errors::JsonApiError, state::ServerState};

pub fn routes() -> Router<ServerState> {
    Router::new()
        .route("/Admin/orders", get(list_orders))
        .route("/Admin/orders/:id", get(get_order))
        .route("/Admin/orders/:id/status", put(update_status))
        .route("/Admin/orders/:id/refund", post(refund_order))
        .route("/Admin/third-party-logs", get(third_party_logs))
        .route("/Admin/analytics", get(analytics_events))
        .route("/Admin/analytics/summary", get(analytics_summary))
}

#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct FilterQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    /// Order status, carrier/provider name or event type depending on the endpoint.
    pub status: Option<String>,
    pub provider: Option<String>,
    pub event_type: Option<String>,
}

impl FilterQuery {
    fn pagination(&self) -> Pagination {
        let d = Pagination::default();
        Pagination { page: self.page.unwrap_or(d.page), per_page: self.per_page.unwrap_or(d.per_page) }
    }
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct StatusInput {
    #[schema(value_type = String, example = "shipped")]
    pub status: OrderStatus,
}

#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SummaryQuery {
    /// RFC 3339 lower bound on `created_at`.
    #[param(value_type = Option<String>)]
    pub since: Option<DateTimeWithTimeZone>,
}

#[utoipa::path(get, path = "/Admin/orders", tag = "admin", params(FilterQuery), responses((status = 200, description = "All orders, newest first"), (status = 400, description = "Unknown status"), (status = 403, description = "Forbidden")))]
pub async fn list_orders(State(state): State<ServerState>, Query(q): Query<FilterQuery>) -> Result<Json<Page<order::Model>>, JsonApiError> {
    let status = q.status.as_deref().map(str::parse::<OrderStatus>).transpose()?;
    Ok(Json(state.checkout.list_all(q.pagination(), status).await?))
}

pub async fn get_order(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<Json<OrderDetail>, JsonApiError> {
    Ok(Json(state.checkout.get_any_order(id).await?))
}

#[utoipa::path(put, path = "/Admin/orders/{id}/status", tag = "admin", params(("id" = Uuid, Path, description = "Order id")), request_body = StatusInput, responses((status = 200, description = "Status changed"), (status = 404, description = "Not Found"), (status = 409, description = "Transition not allowed")))]
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(input): Json<StatusInput>,
) -> Result<Json<order::Model>, JsonApiError> {
    Ok(Json(state.checkout.update_status(id, input.status).await?))
}

#[utoipa::path(post, path = "/Admin/orders/{id}/refund", tag = "admin", params(("id" = Uuid, Path, description = "Order id")), request_body = crate::openapi::RefundRequest, responses((status = 201, description = "Refund recorded"), (status = 400, description = "Amount exceeds the refundable balance"), (status = 409, description = "Order not refundable"), (status = 502, description = "Payment provider failed")))]
pub async fn refund_order(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(input): Json<RefundInput>,
) -> Result<(StatusCode, Json<refund::Model>), JsonApiError> {
    let created = state.checkout.refund(id, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(get, path = "/Admin/third-party-logs", tag = "admin", params(FilterQuery), responses((status = 200, description = "Outbound provider calls, newest first")))]
pub async fn third_party_logs(
    State(state): State<ServerState>,
    Query(q): Query<FilterQuery>,
) -> Result<Json<Page<third_party_api_log::Model>>, JsonApiError> {
    Ok(Json(api_log::list(state.db.as_ref(), q.pagination(), q.provider.as_deref()).await?))
}

pub async fn analytics_events(
    State(state): State<ServerState>,
    Query(q): Query<FilterQuery>,
) -> Result<Json<Page<analytics_event::Model>>, JsonApiError> {
    Ok(Json(analytics_service::list(state.db.as_ref(), q.pagination(), q.event_type.as_deref()).await?))
}

#[utoipa::path(get, path = "/Admin/analytics/summary", tag = "admin", params(SummaryQuery), responses((status = 200, description = "Event counts per type")))]
pub async fn analytics_summary(State(state): State<ServerState>, Query(q): Query<SummaryQuery>) -> Result<Json<Vec<TypeCount>>, JsonApiError> {
    Ok(Json(analytics_service::counts_by_type(state.db.as_ref(), q.since).await?))
}
