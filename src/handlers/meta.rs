//! Catalog passthrough: table list and fresh column introspection.

use crate::catalog::{ColumnDescriptor, SchemaIntrospector};
use crate::error::AppError;
use crate::response::TableDataBody;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};

fn introspector(state: &AppState) -> SchemaIntrospector<'_> {
    SchemaIntrospector::new(state.executor.as_ref(), &state.settings.procedures)
}

pub async fn get_all_tables(State(state): State<AppState>) -> Result<Json<Vec<String>>, AppError> {
    let tables = introspector(&state)
        .list_tables()
        .await
        .map_err(|e| AppError::data_access("error listing tables", e))?;
    Ok(Json(tables))
}

async fn columns(state: &AppState, table_name: &str) -> Result<Vec<ColumnDescriptor>, AppError> {
    let table = introspector(state)
        .describe_table(table_name)
        .await
        .map_err(|e| AppError::data_access(format!("error retrieving columns of {}", table_name), e))?;
    Ok(table.columns)
}

pub async fn get_table_columns(
    State(state): State<AppState>,
    Path(table_name): Path<String>,
) -> Result<Json<Vec<ColumnDescriptor>>, AppError> {
    Ok(Json(columns(&state, &table_name).await?))
}

pub async fn get_table_data(
    State(state): State<AppState>,
    Path(table_name): Path<String>,
) -> Result<Json<TableDataBody>, AppError> {
    let columns = columns(&state, &table_name).await?;
    Ok(Json(TableDataBody { columns }))
}
