use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    dto::catalog::{CatalogData, MediaData, ProductDetail},
    error::AppResult,
    models::{Brand, Category},
    response::ApiResponse,
    services::catalog_service,
    state::AppState,
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CatalogQuery {
    pub parent_id: Option<Uuid>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/products", get(list_products))
        .route("/products/{id}", get(get_product))
        .route("/categories", get(list_categories))
        .route("/brands", get(list_brands))
        .route("/media", get(list_media))
}

#[utoipa::path(
    get,
    path = "/api/products",
    params(
        ("parent_id" = Option<Uuid>, Query, description = "Restrict to categories under this parent")
    ),
    responses(
        (status = 200, description = "Products with brands and categories", body = ApiResponse<CatalogData>),
        (status = 500, description = "Persistence error"),
    ),
    tag = "Catalog"
)]
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> AppResult<Json<ApiResponse<CatalogData>>> {
    let resp = catalog_service::list_catalog(&state.pool, query.parent_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product with brand and category", body = ApiResponse<ProductDetail>),
        (status = 404, description = "Product not found"),
    ),
    tag = "Catalog"
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<ProductDetail>>> {
    let resp = catalog_service::get_product(&state.pool, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/categories",
    responses(
        (status = 200, description = "All categories", body = ApiResponse<Vec<Category>>),
    ),
    tag = "Catalog"
)]
pub async fn list_categories(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<Category>>>> {
    let resp = catalog_service::list_categories(&state.pool).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/brands",
    responses(
        (status = 200, description = "All brands", body = ApiResponse<Vec<Brand>>),
    ),
    tag = "Catalog"
)]
pub async fn list_brands(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<Brand>>>> {
    let resp = catalog_service::list_brands(&state.pool).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/media",
    responses(
        (status = 200, description = "Slideshow and intro media assets", body = ApiResponse<MediaData>),
    ),
    tag = "Catalog"
)]
pub async fn list_media(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<MediaData>>> {
    let resp = catalog_service::list_media(&state.pool).await?;
    Ok(Json(resp))
}
