//! `POST /:segment` is shared by table create and procedure dispatch.

use crate::error::AppError;
use crate::handlers::{procedure, table};
use crate::registry::Route;
use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::{Path, State},
    response::{IntoResponse, Response},
};

pub async fn post(
    State(state): State<AppState>,
    Path(segment): Path<String>,
    body: Bytes,
) -> Result<Response, AppError> {
    // The body is parsed only once the segment is known to exist.
    match state.routes.resolve(&segment) {
        Some(Route::Table(route)) => Ok(table::create(&state, route, &body).await?.into_response()),
        Some(Route::Procedure(route)) => Ok(procedure::dispatch(&state, route, &body).await?.into_response()),
        None => Err(AppError::RouteNotFound(format!("/{}", segment))),
    }
}
