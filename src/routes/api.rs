//! Catalog routes and the generated table/procedure routes.
//! Dynamic routes use one parameterized path per kind; handlers resolve the descriptor by segment.

use crate::handlers::{meta, segment, table};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn catalog_routes(state: AppState) -> Router {
    Router::new()
        .route("/getAllTables", get(meta::get_all_tables))
        .route("/getTableColumns/:table_name", get(meta::get_table_columns))
        .route("/getTableData/:table_name", get(meta::get_table_data))
        .with_state(state)
}

pub fn generated_routes(state: AppState) -> Router {
    Router::new()
        .route("/:segment", get(table::list).post(segment::post))
        .route(
            "/:segment/:id",
            get(table::read).put(table::update).delete(table::delete),
        )
        .with_state(state)
}
