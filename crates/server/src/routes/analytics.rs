use axum::{extract::State, http::StatusCode, routing::post, Extension, Json, Router};

use models::analytics_event;
use service::{analytics_service, auth::domain::Claims};

use crate::{errors::JsonApiError, state::ServerState};

pub fn routes() -> Router<ServerState> {
    Router::new().route("/Analytics", post(record))
}

/// Anonymous events are accepted; signed-in callers are attributed.
#[utoipa::path(post, path = "/Analytics", tag = "analytics", request_body = crate::openapi::AnalyticsEventRequest, responses((status = 202, description = "Recorded"), (status = 400, description = "Bad Request")))]
pub async fn record(
    State(state): State<ServerState>,
    claims: Option<Extension<Claims>>,
    Json(input): Json<analytics_event::NewEvent>,
) -> Result<StatusCode, JsonApiError> {
    let user_id = claims.map(|Extension(c)| c.uid);
    analytics_service::record(state.db.as_ref(), user_id, input).await?;
    Ok(StatusCode::ACCEPTED)
}
