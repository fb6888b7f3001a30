//! Response bodies for the generated routes.

use crate::catalog::ColumnDescriptor;
use serde::Serialize;
use serde_json::Value;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedBody {
    pub message: String,
    pub new_id: Value,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatedBody {
    pub message: String,
    pub updated_id: Value,
}

#[derive(Serialize)]
pub struct MessageBody {
    pub message: String,
}

#[derive(Serialize)]
pub struct ProcedureResultBody {
    pub message: String,
    pub result: Vec<Value>,
}

#[derive(Serialize)]
pub struct TableDataBody {
    pub columns: Vec<ColumnDescriptor>,
}
