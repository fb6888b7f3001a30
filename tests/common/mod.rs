//! In-memory database double and request helpers shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use sproc_gateway::service::Recordset;
use sproc_gateway::sql::{BoundArg, PgBindValue};
use sproc_gateway::{app, build_route_table, AppState, DataAccessError, Executor, Settings};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

#[derive(Clone, Debug)]
pub struct Call {
    pub procedure: String,
    pub args: Vec<BoundArg>,
}

impl Call {
    pub fn arg(&self, name: &str) -> Option<&BoundArg> {
        self.args.iter().find(|a| a.name == name)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.arg(name).and_then(BoundArg::as_text)
    }
}

/// Answers the catalog procedures from registered tables and procedures,
/// and any other procedure from canned recordsets. Every call is recorded.
#[derive(Default)]
pub struct FakeDb {
    tables: Vec<(String, Vec<Value>)>,
    procedures: Vec<(String, Vec<Value>)>,
    responses: HashMap<String, Recordset>,
    failing: HashSet<String>,
    calls: Mutex<Vec<Call>>,
}

impl FakeDb {
    pub fn new() -> Self {
        Self::default()
    }

    /// Columns as (name, type, is primary key).
    pub fn table(mut self, name: &str, columns: &[(&str, &str, bool)]) -> Self {
        let rows = columns
            .iter()
            .map(|(col, ty, pk)| {
                json!({
                    "COLUMN_NAME": col,
                    "DATA_TYPE": ty,
                    "CHARACTER_MAXIMUM_LENGTH": null,
                    "IS_NULLABLE": if *pk { "NO" } else { "YES" },
                    "IS_PRIMARY_KEY": pk,
                })
            })
            .collect();
        self.tables.push((name.to_string(), rows));
        self
    }

    /// Parameters as (name with sigil, type).
    pub fn procedure(mut self, name: &str, params: &[(&str, &str)]) -> Self {
        let rows = params
            .iter()
            .map(|(p, ty)| json!({"PARAMETER_NAME": p, "DATA_TYPE": ty}))
            .collect();
        self.procedures.push((name.to_string(), rows));
        self
    }

    pub fn respond(mut self, procedure: &str, rows: Vec<Value>) -> Self {
        self.responses.insert(procedure.to_string(), rows);
        self
    }

    pub fn fail(mut self, procedure: &str) -> Self {
        self.failing.insert(procedure.to_string());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, procedure: &str) -> Vec<Call> {
        self.calls().into_iter().filter(|c| c.procedure == procedure).collect()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

fn text_arg<'a>(args: &'a [BoundArg], name: &str) -> Option<&'a str> {
    args.iter().find(|a| a.name == name).and_then(BoundArg::as_text)
}

#[async_trait]
impl Executor for FakeDb {
    async fn call(&self, procedure: &str, args: &[BoundArg]) -> Result<Recordset, DataAccessError> {
        self.calls.lock().unwrap().push(Call {
            procedure: procedure.to_string(),
            args: args.to_vec(),
        });
        if self.failing.contains(procedure) {
            return Err(DataAccessError::Sql(sqlx::Error::Protocol("connection reset".into())));
        }
        let rows = match procedure {
            "GetAllTables" => self.tables.iter().map(|(t, _)| json!({"TableName": t})).collect(),
            "GetTableColumns" => {
                let name = text_arg(args, "TableName");
                self.tables
                    .iter()
                    .find(|(t, _)| Some(t.as_str()) == name)
                    .map(|(_, cols)| cols.clone())
                    .unwrap_or_default()
            }
            "GetAllProcedures" => self.procedures.iter().map(|(p, _)| json!({"ProcedureName": p})).collect(),
            "GetProcedureParameters" => {
                let name = text_arg(args, "ProcedureName");
                self.procedures
                    .iter()
                    .find(|(p, _)| Some(p.as_str()) == name)
                    .map(|(_, params)| params.clone())
                    .unwrap_or_default()
            }
            other => self.responses.get(other).cloned().unwrap_or_default(),
        };
        Ok(rows)
    }
}

pub async fn router_with(db: Arc<FakeDb>, settings: Settings) -> Router {
    let routes = build_route_table(db.as_ref(), &settings)
        .await
        .expect("bootstrap");
    app(AppState::new(db, routes, settings))
}

pub async fn router(db: Arc<FakeDb>) -> Router {
    router_with(db, Settings::default()).await
}

/// Routes discovered from `catalog`, requests served by `db`.
pub async fn router_serving(catalog: &FakeDb, db: Arc<FakeDb>) -> Router {
    let settings = Settings::default();
    let routes = build_route_table(catalog, &settings).await.expect("bootstrap");
    app(AppState::new(db, routes, settings))
}

/// Sends a raw body, with an optional Content-Type, and returns the response Content-Type too.
pub async fn send_text(
    app: &Router,
    method: Method,
    uri: &str,
    content_type: Option<&str>,
    body: &str,
) -> (StatusCode, String, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(ct) = content_type {
        builder = builder.header(header::CONTENT_TYPE, ct);
    }
    let request = builder.body(Body::from(body.to_string())).unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, content_type, value)
}

pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let (status, bytes) = send_raw(app, method, uri, body).await;
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, value)
}

pub async fn send_raw(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(v) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(v.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

/// Articles (integer key), Precios (text key), Logs (no key), and StoreDePrueba.
pub fn inventory() -> FakeDb {
    FakeDb::new()
        .table(
            "Articles",
            &[("ArticleId", "int", true), ("name", "nvarchar", false), ("stock", "int", false)],
        )
        .table("Precios", &[("Codigo", "varchar", true), ("valor", "numeric", false)])
        .table("Logs", &[("line", "text", false)])
        .procedure("StoreDePrueba", &[("@Nombre", "nvarchar"), ("@Cantidad", "int")])
        .procedure("GetRecords", &[("@TableName", "text")])
}

pub fn is_null(arg: Option<&BoundArg>) -> bool {
    matches!(arg.map(|a| &a.value), Some(PgBindValue::Null))
}
