use axum::{middleware, routing::get, Json, Router};
use serde::Deserialize;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;
use models::{brand, category, country_master, currency, inventory, product, product_price, sku, state_master, weight};
use service::pagination::Pagination;

use crate::{auth::require_auth, openapi::ApiDoc, state::ServerState};

pub mod account;
pub mod admin;
pub mod analytics;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod invoice;
pub mod shipment;

/// `?page=&perPage=` plus an admin-only `includeInactive`.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub include_inactive: Option<bool>,
}

impl ListQuery {
    pub fn pagination(&self) -> Pagination {
        let d = Pagination::default();
        Pagination { page: self.page.unwrap_or(d.page), per_page: self.per_page.unwrap_or(d.per_page) }
    }
}

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

fn catalog_routes() -> Router<ServerState> {
    Router::new()
        .nest(
            "/Product",
            catalog::resource::<product::Entity>()
                .route("/featured", get(catalog::featured))
                .route("/search", get(catalog::search))
                .route("/category/:slug", get(catalog::by_category))
                .route("/brand/:brand_id", get(catalog::by_brand))
                .route("/:id/detail", get(catalog::detail)),
        )
        .nest("/Category", catalog::resource::<category::Entity>())
        .nest("/Brand", catalog::resource::<brand::Entity>())
        .nest("/Currency", catalog::resource::<currency::Entity>())
        .nest("/Weight", catalog::resource::<weight::Entity>())
        .nest("/ProductPrice", catalog::resource::<product_price::Entity>())
        .nest("/Sku", catalog::resource::<sku::Entity>())
        .nest(
            "/Inventory",
            catalog::resource::<inventory::Entity>()
                .route("/sku/:sku_id", get(catalog::inventory_for_sku))
                .route("/:id/adjust", axum::routing::post(catalog::adjust_inventory)),
        )
        .nest("/Country", catalog::resource::<country_master::Entity>())
        .nest(
            "/State",
            catalog::resource::<state_master::Entity>().route("/country/:country_id", get(catalog::states_for_country)),
        )
}

/// Build the full application router; `require_auth` decides per request
/// whether the route is public, customer or admin.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(catalog_routes())
        .merge(auth::routes())
        .merge(account::routes())
        .merge(cart::routes())
        .merge(checkout::routes())
        .merge(invoice::routes())
        .merge(shipment::routes())
        .merge(analytics::routes())
        .merge(admin::routes())
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
