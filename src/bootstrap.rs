//! Startup discovery: list tables and procedures, describe tables, and fill the route table.
//! Listing failures are fatal; a single table that cannot be described is skipped.

use crate::catalog::{ProcedureIntrospector, SchemaIntrospector};
use crate::config::Settings;
use crate::error::BootstrapError;
use crate::registry::RouteTable;
use crate::service::Executor;

pub async fn build_route_table(executor: &dyn Executor, settings: &Settings) -> Result<RouteTable, BootstrapError> {
    let names = &settings.procedures;
    let mut routes = RouteTable::new();

    let schema = SchemaIntrospector::new(executor, names);
    let tables = schema.list_tables().await.map_err(BootstrapError::ListTables)?;
    for name in &tables {
        let table = match schema.describe_table(name).await {
            Ok(t) => t,
            Err(e) => {
                tracing::error!(table = %name, error = %e, "cannot describe table; no endpoints built");
                continue;
            }
        };
        let columns = table.columns.len();
        match routes.register_table(table) {
            Ok(()) => tracing::info!(table = %name, columns, "CRUD endpoints registered"),
            Err(reason) => tracing::warn!(table = %name, %reason, "table skipped"),
        }
    }

    let procedures = ProcedureIntrospector::new(executor, names)
        .list_procedures()
        .await
        .map_err(BootstrapError::ListProcedures)?;
    for name in &procedures {
        if names.is_generic(name) {
            tracing::debug!(procedure = %name, "generic procedure not exposed");
            continue;
        }
        match routes.register_procedure(name) {
            Ok(()) => tracing::info!(procedure = %name, "procedure endpoint registered"),
            Err(reason) => tracing::warn!(procedure = %name, %reason, "procedure skipped"),
        }
    }

    tracing::info!(
        tables = routes.table_names().count(),
        procedures = routes.procedure_names().count(),
        "route table built"
    );
    Ok(routes)
}
