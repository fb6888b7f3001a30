//! Generic CRUD through the pre-existing per-database procedures.

use crate::catalog::types::field;
use crate::config::ProcedureNames;
use crate::error::DataAccessError;
use crate::service::{Executor, Recordset};
use crate::sql::BoundArg;
use serde_json::{Map, Value};

/// Result of the generic insert.
#[derive(Clone, Debug, PartialEq)]
pub struct Created {
    pub message: String,
    pub new_id: Value,
}

/// Result of the generic update, driven by the procedure's `status` field.
#[derive(Clone, Debug, PartialEq)]
pub enum UpdateOutcome {
    Updated { message: String, updated_id: Value },
    NotFound { message: String },
}

pub struct CrudService<'a> {
    executor: &'a dyn Executor,
    names: &'a ProcedureNames,
}

impl<'a> CrudService<'a> {
    pub fn new(executor: &'a dyn Executor, names: &'a ProcedureNames) -> Self {
        CrudService { executor, names }
    }

    /// All rows when `id` is None, else the rows whose primary key equals `id`.
    pub async fn list(&self, table: &str, primary_key: &str, id: Option<&str>) -> Result<Recordset, DataAccessError> {
        let args = [
            BoundArg::text("TableName", table),
            BoundArg::text("PrimaryKey", primary_key),
            BoundArg::optional_text("Id", id),
        ];
        self.executor.call(&self.names.get_records, &args).await
    }

    /// Insert; `data` is forwarded as one serialized JSON payload.
    pub async fn create(&self, table: &str, data: &Map<String, Value>) -> Result<Created, DataAccessError> {
        let procedure = &self.names.create_record;
        let args = [
            BoundArg::text("TableName", table),
            BoundArg::text("Data", serialize(data)),
        ];
        let rows = self.executor.call(procedure, &args).await?;
        let row = first_row(procedure, &rows)?;
        Ok(Created {
            message: message(row),
            new_id: field(row, "newId").cloned().unwrap_or(Value::Null),
        })
    }

    pub async fn update(
        &self,
        table: &str,
        primary_key: &str,
        id: &str,
        data: &Map<String, Value>,
    ) -> Result<UpdateOutcome, DataAccessError> {
        let procedure = &self.names.update_record;
        let args = [
            BoundArg::text("TableName", table),
            BoundArg::text("PrimaryKey", primary_key),
            BoundArg::text("Id", id),
            BoundArg::text("Data", serialize(data)),
        ];
        let rows = self.executor.call(procedure, &args).await?;
        let row = first_row(procedure, &rows)?;
        let success = field(row, "status")
            .and_then(Value::as_str)
            .map_or(false, |s| s.eq_ignore_ascii_case("success"));
        Ok(if success {
            UpdateOutcome::Updated {
                message: message(row),
                updated_id: field(row, "updatedId").cloned().unwrap_or(Value::Null),
            }
        } else {
            UpdateOutcome::NotFound { message: message(row) }
        })
    }

    /// Delete by id; returns the procedure's message.
    pub async fn delete(&self, table: &str, primary_key: &str, id: &str) -> Result<String, DataAccessError> {
        let procedure = &self.names.delete_record;
        let args = [
            BoundArg::text("TableName", table),
            BoundArg::text("PrimaryKey", primary_key),
            BoundArg::text("Id", id),
        ];
        let rows = self.executor.call(procedure, &args).await?;
        Ok(message(first_row(procedure, &rows)?))
    }

    /// Execute an arbitrary procedure with pre-validated arguments.
    pub async fn execute(&self, procedure: &str, args: &[BoundArg]) -> Result<Recordset, DataAccessError> {
        self.executor.call(procedure, args).await
    }
}

fn serialize(data: &Map<String, Value>) -> String {
    Value::Object(data.clone()).to_string()
}

fn first_row<'r>(procedure: &str, rows: &'r [Value]) -> Result<&'r Map<String, Value>, DataAccessError> {
    rows.first()
        .ok_or_else(|| DataAccessError::EmptyResult {
            procedure: procedure.to_string(),
        })?
        .as_object()
        .ok_or_else(|| DataAccessError::decode(procedure, "result row is not an object"))
}

fn message(row: &Map<String, Value>) -> String {
    match field(row, "message") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}
