use axum::{Json, Router, extract::State, routing::post};

use crate::{
    dto::payment::{CheckoutData, CheckoutRequest},
    error::AppResult,
    response::ApiResponse,
    services::payment_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/checkout", post(checkout))
}

#[utoipa::path(
    post,
    path = "/api/checkout",
    request_body = CheckoutRequest,
    responses(
        (status = 200, description = "Cart converted into a completed payment", body = ApiResponse<CheckoutData>),
        (status = 400, description = "Cart is empty"),
        (status = 500, description = "Persistence error, workflow rolled back"),
    ),
    tag = "Payment"
)]
pub async fn checkout(
    State(state): State<AppState>,
    Json(payload): Json<CheckoutRequest>,
) -> AppResult<Json<ApiResponse<CheckoutData>>> {
    let resp = payment_service::checkout(&state, payload).await?;
    Ok(Json(resp))
}
