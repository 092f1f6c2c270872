use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get, post, put},
};
use uuid::Uuid;

use crate::{
    dto::cart::{AddItemRequest, CartContents, RemoveItemRequest, UpdateCartRequest},
    error::AppResult,
    response::ApiResponse,
    services::cart_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/add", post(add_item))
        .route("/carts/{id_user}", get(get_cart))
        .route("/update", put(update_cart))
        .route("/remove", delete(remove_item))
}

#[utoipa::path(
    post,
    path = "/api/add",
    request_body = AddItemRequest,
    responses(
        (status = 200, description = "Added to the user's open cart", body = ApiResponse<serde_json::Value>),
        (status = 400, description = "Non-positive quantity"),
        (status = 404, description = "Product not found"),
        (status = 500, description = "Persistence error"),
    ),
    tag = "Cart"
)]
pub async fn add_item(
    State(state): State<AppState>,
    Json(payload): Json<AddItemRequest>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = cart_service::add_item(&state.pool, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/carts/{id_user}",
    params(
        ("id_user" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Flattened cart items for the user", body = ApiResponse<CartContents>),
        (status = 500, description = "Persistence error"),
    ),
    tag = "Cart"
)]
pub async fn get_cart(
    State(state): State<AppState>,
    Path(id_user): Path<Uuid>,
) -> AppResult<Json<ApiResponse<CartContents>>> {
    let resp = cart_service::list_cart(&state.pool, id_user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/update",
    request_body = UpdateCartRequest,
    responses(
        (status = 200, description = "Quantities overwritten", body = ApiResponse<serde_json::Value>),
        (status = 500, description = "Persistence error, earlier updates may have applied"),
    ),
    tag = "Cart"
)]
pub async fn update_cart(
    State(state): State<AppState>,
    Json(payload): Json<UpdateCartRequest>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = cart_service::update_quantities(&state.pool, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/remove",
    request_body = RemoveItemRequest,
    responses(
        (status = 200, description = "Removed (idempotent)", body = ApiResponse<serde_json::Value>),
        (status = 500, description = "Persistence error"),
    ),
    tag = "Cart"
)]
pub async fn remove_item(
    State(state): State<AppState>,
    Json(payload): Json<RemoveItemRequest>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = cart_service::remove_item(&state.pool, payload).await?;
    Ok(Json(resp))
}
