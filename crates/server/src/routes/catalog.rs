//! Catalog and master-data endpoints. Every collection shares the same
//! generic CRUD handlers; a few extra storefront queries sit on top.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use sea_orm::{ActiveModelBehavior, ActiveModelTrait, IntoActiveModel, PrimaryKeyTrait};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use common::types::Page;
use models::{inventory, product, state_master, Resource};
use service::{auth::domain::Claims, config_service::ProductDetail};

use crate::{errors::JsonApiError, state::ServerState};

use super::ListQuery;

pub fn resource<E>() -> Router<ServerState>
where
    E: Resource,
    E::Model: Serialize + Sync + IntoActiveModel<E::ActiveModel>,
    E::ActiveModel: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send,
    <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<Uuid>,
{
    Router::new()
        .route("/", get(list::<E>).post(create::<E>))
        .route("/:id", get(get_one::<E>).put(update::<E>).delete(remove::<E>))
}

pub async fn list<E>(
    State(state): State<ServerState>,
    claims: Option<Extension<Claims>>,
    Query(q): Query<ListQuery>,
) -> Result<Json<Page<E::Model>>, JsonApiError>
where
    E: Resource,
    E::Model: Serialize + Sync,
{
    let is_admin = claims.map_or(false, |Extension(c)| c.is_admin());
    let include_inactive = is_admin && q.include_inactive.unwrap_or(false);
    Ok(Json(state.catalog.list::<E>(q.pagination(), include_inactive).await?))
}

pub async fn get_one<E>(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<Json<E::Model>, JsonApiError>
where
    E: Resource,
    E::Model: Serialize,
    <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<Uuid>,
{
    match state.catalog.get::<E>(id).await? {
        Some(m) => Ok(Json(m)),
        None => Err(JsonApiError::new(StatusCode::NOT_FOUND, "Not Found", Some(format!("{} {id} not found", E::LABEL)))),
    }
}

pub async fn create<E>(State(state): State<ServerState>, Json(input): Json<E::Create>) -> Result<(StatusCode, Json<E::Model>), JsonApiError>
where
    E: Resource,
    E::Model: Serialize + IntoActiveModel<E::ActiveModel>,
    E::ActiveModel: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send,
{
    let created = state.catalog.create::<E>(input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update<E>(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<E::Patch>,
) -> Result<Json<E::Model>, JsonApiError>
where
    E: Resource,
    E::Model: Serialize + IntoActiveModel<E::ActiveModel>,
    E::ActiveModel: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send,
    <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<Uuid>,
{
    Ok(Json(state.catalog.update::<E>(id, patch).await?))
}

pub async fn remove<E>(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<StatusCode, JsonApiError>
where
    E: Resource,
    E::Model: IntoActiveModel<E::ActiveModel>,
    E::ActiveModel: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send,
    <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<Uuid>,
{
    if state.catalog.delete::<E>(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(JsonApiError::new(StatusCode::NOT_FOUND, "Not Found", Some(format!("{} {id} not found", E::LABEL))))
    }
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    pub q: String,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[utoipa::path(get, path = "/Product/featured", tag = "catalog", params(ListQuery), responses((status = 200, description = "Featured products")))]
pub async fn featured(State(state): State<ServerState>, Query(q): Query<ListQuery>) -> Result<Json<Page<product::Model>>, JsonApiError> {
    Ok(Json(state.catalog.featured_products(q.pagination()).await?))
}

#[utoipa::path(get, path = "/Product/search", tag = "catalog", params(SearchQuery), responses((status = 200, description = "Matching products"), (status = 400, description = "Blank query")))]
pub async fn search(State(state): State<ServerState>, Query(q): Query<SearchQuery>) -> Result<Json<Page<product::Model>>, JsonApiError> {
    let page = ListQuery { page: q.page, per_page: q.per_page, include_inactive: None }.pagination();
    Ok(Json(state.catalog.search_products(&q.q, page).await?))
}

#[utoipa::path(get, path = "/Product/category/{slug}", tag = "catalog", params(("slug" = String, Path, description = "Category slug"), ListQuery), responses((status = 200, description = "Products in category"), (status = 404, description = "Unknown category")))]
pub async fn by_category(
    State(state): State<ServerState>,
    Path(slug): Path<String>,
    Query(q): Query<ListQuery>,
) -> Result<Json<Page<product::Model>>, JsonApiError> {
    Ok(Json(state.catalog.products_by_category_slug(&slug, q.pagination()).await?))
}

pub async fn by_brand(
    State(state): State<ServerState>,
    Path(brand_id): Path<Uuid>,
    Query(q): Query<ListQuery>,
) -> Result<Json<Page<product::Model>>, JsonApiError> {
    Ok(Json(state.catalog.products_by_brand(brand_id, q.pagination()).await?))
}

#[utoipa::path(get, path = "/Product/{id}/detail", tag = "catalog", params(("id" = Uuid, Path, description = "Product id")), responses((status = 200, description = "Product with prices"), (status = 404, description = "Not Found")))]
pub async fn detail(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<Json<ProductDetail>, JsonApiError> {
    Ok(Json(state.catalog.product_detail(id).await?))
}

pub async fn states_for_country(State(state): State<ServerState>, Path(country_id): Path<Uuid>) -> Result<Json<Vec<state_master::Model>>, JsonApiError> {
    Ok(Json(state.catalog.states_for_country(country_id).await?))
}

pub async fn inventory_for_sku(State(state): State<ServerState>, Path(sku_id): Path<Uuid>) -> Result<Json<inventory::Model>, JsonApiError> {
    state
        .catalog
        .inventory_for_sku(sku_id)
        .await?
        .map(Json)
        .ok_or_else(|| JsonApiError::new(StatusCode::NOT_FOUND, "Not Found", Some("no inventory for sku".into())))
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct AdjustInput {
    pub delta: i32,
}

#[utoipa::path(post, path = "/Inventory/{id}/adjust", tag = "catalog", params(("id" = Uuid, Path, description = "Inventory id")), request_body = AdjustInput, responses((status = 200, description = "Adjusted"), (status = 400, description = "Would go below zero or reserved")))]
pub async fn adjust_inventory(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(input): Json<AdjustInput>,
) -> Result<Json<inventory::Model>, JsonApiError> {
    Ok(Json(state.catalog.adjust_inventory(id, input.delta).await?))
}
