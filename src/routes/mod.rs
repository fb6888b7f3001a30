//! Router assembly.

mod api;
mod common;

pub use api::{catalog_routes, generated_routes};
pub use common::common_routes;

use crate::error::AppError;
use crate::state::AppState;
use axum::{http::Uri, response::IntoResponse, Router};
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;

async fn route_not_found(uri: Uri) -> impl IntoResponse {
    AppError::RouteNotFound(uri.path().to_string())
}

/// Full application: fixed routes, generated routes, CORS and a body size limit.
pub fn app(state: AppState) -> Router {
    let body_limit = state.settings.body_limit_bytes;
    Router::new()
        .merge(common_routes(state.clone()))
        .merge(catalog_routes(state.clone()))
        .merge(generated_routes(state))
        .fallback(route_not_found)
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(CorsLayer::permissive())
}
