use axum::{
    extract::{Path, State},
    http::header,
    response::{Html, IntoResponse, Response},
    routing::get,
    Extension, Router,
};
use uuid::Uuid;

use service::auth::domain::Claims;

use crate::{errors::JsonApiError, state::ServerState};

pub fn routes() -> Router<ServerState> {
    Router::new()
        .route("/Invoice/:order_id", get(html))
        .route("/Invoice/:order_id/pdf", get(pdf))
}

/// Admins may open any invoice; customers only their own.
fn requester(claims: &Claims) -> Option<Uuid> {
    if claims.is_admin() { None } else { Some(claims.uid) }
}

#[utoipa::path(get, path = "/Invoice/{orderId}", tag = "invoice", params(("orderId" = Uuid, Path, description = "Order id")), responses((status = 200, description = "Invoice HTML"), (status = 404, description = "Not Found"), (status = 409, description = "Order not paid yet")))]
pub async fn html(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    Path(order_id): Path<Uuid>,
) -> Result<Html<String>, JsonApiError> {
    Ok(Html(state.invoices.render_html(order_id, requester(&claims)).await?))
}

#[utoipa::path(get, path = "/Invoice/{orderId}/pdf", tag = "invoice", params(("orderId" = Uuid, Path, description = "Order id")), responses((status = 200, description = "Invoice PDF"), (status = 404, description = "Not Found"), (status = 502, description = "PDF renderer failed")))]
pub async fn pdf(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    Path(order_id): Path<Uuid>,
) -> Result<Response, JsonApiError> {
    let (file_name, bytes) = state.invoices.render_pdf(order_id, requester(&claims)).await?;
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{file_name}\"")),
        ],
        bytes,
    )
        .into_response())
}
