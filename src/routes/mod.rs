use axum::Router;

use crate::state::AppState;

pub mod admin;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod doc;
pub mod health;
pub mod payment;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .merge(cart::router())
        .merge(payment::router())
        .merge(catalog::router())
        .nest("/auth", auth::router())
        .nest("/admin", admin::router())
}
