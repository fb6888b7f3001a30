//! The database collaborator: parameterized procedure calls returning recordsets.

use crate::error::DataAccessError;
use crate::sql::{call_statement, BoundArg};
use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;

/// Rows of one result set, each a JSON object keyed by column name.
pub type Recordset = Vec<Value>;

#[async_trait]
pub trait Executor: Send + Sync {
    /// Call a set-returning procedure with named arguments.
    async fn call(&self, procedure: &str, args: &[BoundArg]) -> Result<Recordset, DataAccessError>;
}

/// Executor over a shared PostgreSQL pool. The pool is owned by the caller, who closes it on shutdown.
#[derive(Clone)]
pub struct PgExecutor {
    pool: PgPool,
}

impl PgExecutor {
    pub fn new(pool: PgPool) -> Self {
        PgExecutor { pool }
    }
}

#[async_trait]
impl Executor for PgExecutor {
    async fn call(&self, procedure: &str, args: &[BoundArg]) -> Result<Recordset, DataAccessError> {
        let sql = call_statement(procedure, args);
        tracing::debug!(sql = %sql, args = ?args, "call");
        let mut query = sqlx::query(&sql);
        for a in args {
            query = query.bind(a.value.clone());
        }
        let rows = query.fetch_all(&self.pool).await?;
        Ok(rows.iter().map(row_to_json).collect())
    }
}

fn row_to_json(row: &sqlx::postgres::PgRow) -> Value {
    use sqlx::Column;
    use sqlx::Row;
    let mut map = serde_json::Map::new();
    for col in row.columns() {
        let name = col.name();
        map.insert(name.to_string(), cell_to_value(row, col.ordinal()));
    }
    Value::Object(map)
}

fn cell_to_value(row: &sqlx::postgres::PgRow, idx: usize) -> Value {
    use sqlx::Row;
    if let Ok(v) = row.try_get::<Option<i16>, _>(idx) {
        return v.map_or(Value::Null, |n| Value::Number(n.into()));
    }
    if let Ok(v) = row.try_get::<Option<i32>, _>(idx) {
        return v.map_or(Value::Null, |n| Value::Number(n.into()));
    }
    if let Ok(v) = row.try_get::<Option<i64>, _>(idx) {
        return v.map_or(Value::Null, |n| Value::Number(n.into()));
    }
    if let Ok(v) = row.try_get::<Option<f32>, _>(idx) {
        return v
            .and_then(|n| serde_json::Number::from_f64(n as f64))
            .map_or(Value::Null, Value::Number);
    }
    if let Ok(v) = row.try_get::<Option<f64>, _>(idx) {
        return v.and_then(serde_json::Number::from_f64).map_or(Value::Null, Value::Number);
    }
    if let Ok(v) = row.try_get::<Option<bool>, _>(idx) {
        return v.map_or(Value::Null, Value::Bool);
    }
    if let Ok(v) = row.try_get::<Option<uuid::Uuid>, _>(idx) {
        return v.map_or(Value::Null, |u| Value::String(u.to_string()));
    }
    if let Ok(v) = row.try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(idx) {
        return v.map_or(Value::Null, |d| Value::String(d.to_rfc3339()));
    }
    if let Ok(v) = row.try_get::<Option<chrono::NaiveDateTime>, _>(idx) {
        return v.map_or(Value::Null, |d| {
            Value::String(d.format("%Y-%m-%dT%H:%M:%S%.f").to_string())
        });
    }
    if let Ok(v) = row.try_get::<Option<chrono::NaiveDate>, _>(idx) {
        return v.map_or(Value::Null, |d| Value::String(d.format("%Y-%m-%d").to_string()));
    }
    if let Ok(v) = row.try_get::<Option<rust_decimal::Decimal>, _>(idx) {
        return v.map_or(Value::Null, |d| Value::String(d.to_string()));
    }
    if let Ok(v) = row.try_get::<Option<String>, _>(idx) {
        return v.map_or(Value::Null, Value::String);
    }
    if let Ok(v) = row.try_get::<Option<Value>, _>(idx) {
        return v.unwrap_or(Value::Null);
    }
    // types without a decoder here (arrays, geometry, ...)
    Value::Null
}
