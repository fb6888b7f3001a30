//! Schema and procedure introspection through the generic catalog procedures.

use crate::catalog::types::{field, ColumnDescriptor, ProcedureDescriptor, ProcedureParameter, TableDescriptor};
use crate::config::ProcedureNames;
use crate::error::DataAccessError;
use crate::service::Executor;
use crate::sql::BoundArg;
use serde_json::Value;

/// Tables and their columns.
pub struct SchemaIntrospector<'a> {
    executor: &'a dyn Executor,
    names: &'a ProcedureNames,
}

impl<'a> SchemaIntrospector<'a> {
    pub fn new(executor: &'a dyn Executor, names: &'a ProcedureNames) -> Self {
        SchemaIntrospector { executor, names }
    }

    pub async fn list_tables(&self) -> Result<Vec<String>, DataAccessError> {
        let procedure = &self.names.get_all_tables;
        let rows = self.executor.call(procedure, &[]).await?;
        names_from_rows(procedure, &rows, "TableName")
    }

    /// Columns in declared order. A table the catalog knows nothing about is an error.
    pub async fn describe_table(&self, name: &str) -> Result<TableDescriptor, DataAccessError> {
        let procedure = &self.names.get_table_columns;
        let rows = self
            .executor
            .call(procedure, &[BoundArg::text("TableName", name)])
            .await?;
        if rows.is_empty() {
            return Err(DataAccessError::EmptyResult {
                procedure: procedure.clone(),
            });
        }
        let columns = rows
            .iter()
            .map(|r| ColumnDescriptor::from_row(procedure, r))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(TableDescriptor {
            name: name.to_string(),
            columns,
        })
    }
}

/// Stored procedures and their declared parameters.
pub struct ProcedureIntrospector<'a> {
    executor: &'a dyn Executor,
    names: &'a ProcedureNames,
}

impl<'a> ProcedureIntrospector<'a> {
    pub fn new(executor: &'a dyn Executor, names: &'a ProcedureNames) -> Self {
        ProcedureIntrospector { executor, names }
    }

    pub async fn list_procedures(&self) -> Result<Vec<String>, DataAccessError> {
        let procedure = &self.names.get_all_procedures;
        let rows = self.executor.call(procedure, &[]).await?;
        names_from_rows(procedure, &rows, "ProcedureName")
    }

    /// Parameters in declared order. A procedure without parameters yields an empty list.
    pub async fn describe_procedure(&self, name: &str) -> Result<ProcedureDescriptor, DataAccessError> {
        let procedure = &self.names.get_procedure_parameters;
        let rows = self
            .executor
            .call(procedure, &[BoundArg::text("ProcedureName", name)])
            .await?;
        let parameters = rows
            .iter()
            .map(|r| ProcedureParameter::from_row(procedure, r))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ProcedureDescriptor {
            name: name.to_string(),
            parameters,
        })
    }
}

fn names_from_rows(procedure: &str, rows: &[Value], key: &str) -> Result<Vec<String>, DataAccessError> {
    rows.iter()
        .map(|row| {
            row.as_object()
                .and_then(|obj| field(obj, key))
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or_else(|| DataAccessError::decode(procedure, format!("row without {}", key)))
        })
        .collect()
}
