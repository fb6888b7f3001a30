//! Table CRUD handlers. The table is resolved by path segment in the route table.

use crate::catalog::ParamType;
use crate::error::AppError;
use crate::registry::TableRoute;
use crate::response::{CreatedBody, MessageBody, UpdatedBody};
use crate::service::{CrudService, RequestValidator, UpdateOutcome};
use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{Map, Value};

fn table_route<'a>(state: &'a AppState, segment: &str) -> Result<&'a TableRoute, AppError> {
    state
        .routes
        .table(segment)
        .ok_or_else(|| AppError::RouteNotFound(format!("/{}", segment)))
}

/// Ids travel as text; integer keys must still parse. Returns the trimmed id that is forwarded.
fn check_id<'i>(route: &TableRoute, id: &'i str) -> Result<&'i str, AppError> {
    let id = id.trim();
    if route.primary_key.param_type() == ParamType::Integer && id.parse::<i64>().is_err() {
        return Err(AppError::BadRequest(format!("invalid id '{}' for {}", id, route.table.name)));
    }
    Ok(id)
}

pub(crate) fn body_to_map(value: Value) -> Result<Map<String, Value>, AppError> {
    match value {
        Value::Object(m) => Ok(m),
        _ => Err(AppError::BadRequest("body must be a JSON object".into())),
    }
}

/// Parse a raw request body into a JSON object. Content-Type is not checked.
pub(crate) fn parse_body(bytes: &[u8]) -> Result<Map<String, Value>, AppError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(AppError::BadRequest("request body is required".into()));
    }
    let value: Value =
        serde_json::from_slice(bytes).map_err(|e| AppError::BadRequest(format!("invalid JSON body: {}", e)))?;
    body_to_map(value)
}

fn crud(state: &AppState) -> CrudService<'_> {
    CrudService::new(state.executor.as_ref(), &state.settings.procedures)
}

pub async fn list(
    State(state): State<AppState>,
    Path(segment): Path<String>,
) -> Result<Json<Vec<Value>>, AppError> {
    read_rows(&state, &segment, None).await
}

pub async fn read(
    State(state): State<AppState>,
    Path((segment, id)): Path<(String, String)>,
) -> Result<Json<Vec<Value>>, AppError> {
    read_rows(&state, &segment, Some(&id)).await
}

async fn read_rows(state: &AppState, segment: &str, id: Option<&str>) -> Result<Json<Vec<Value>>, AppError> {
    let route = table_route(state, segment)?;
    let id = id.map(|id| check_id(route, id)).transpose()?;
    let table = &route.table.name;
    let rows = crud(state)
        .list(table, &route.primary_key.name, id)
        .await
        .map_err(|e| AppError::data_access(format!("error retrieving records from {}", table), e))?;
    Ok(Json(rows))
}

pub async fn create(state: &AppState, route: &TableRoute, body: &[u8]) -> Result<Json<CreatedBody>, AppError> {
    let body = parse_body(body)?;
    let table = &route.table.name;
    let created = crud(state)
        .create(table, &body)
        .await
        .map_err(|e| AppError::data_access(format!("error creating record in {}", table), e))?;
    tracing::debug!(table = %table, new_id = %created.new_id, "record created");
    Ok(Json(CreatedBody {
        message: created.message,
        new_id: created.new_id,
    }))
}

pub async fn update(
    State(state): State<AppState>,
    Path((segment, id)): Path<(String, String)>,
    body: Bytes,
) -> Result<(StatusCode, Json<UpdatedBody>), AppError> {
    let route = table_route(&state, &segment)?;
    let id = check_id(route, &id)?;
    let body = parse_body(&body)?;
    let table = &route.table.name;
    let report = RequestValidator::validate_columns(&body, &route.table);
    if !report.is_valid() {
        tracing::warn!(table = %table, violations = %report.summary(), "update rejected");
        return Err(AppError::Validation {
            message: format!("invalid columns for {}: {}", table, report.summary()),
            violations: report.violations,
        });
    }
    let outcome = crud(&state)
        .update(table, &route.primary_key.name, id, &body)
        .await
        .map_err(|e| AppError::data_access(format!("error updating record in {}", table), e))?;
    match outcome {
        UpdateOutcome::Updated { message, updated_id } => {
            Ok((StatusCode::OK, Json(UpdatedBody { message, updated_id })))
        }
        UpdateOutcome::NotFound { message } => Err(AppError::NotFound(message)),
    }
}

pub async fn delete(
    State(state): State<AppState>,
    Path((segment, id)): Path<(String, String)>,
) -> Result<Json<MessageBody>, AppError> {
    let route = table_route(&state, &segment)?;
    let id = check_id(route, &id)?;
    let table = &route.table.name;
    let message = crud(&state)
        .delete(table, &route.primary_key.name, id)
        .await
        .map_err(|e| AppError::data_access(format!("error deleting record from {}", table), e))?;
    Ok(Json(MessageBody { message }))
}
