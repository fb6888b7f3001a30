//! Typed errors and HTTP mapping.

use crate::service::Violation;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing setting: {0}")]
    Missing(&'static str),
    #[error("invalid value for {key}: '{value}'")]
    Invalid { key: &'static str, value: String },
}

/// Failure of any call against the database collaborator.
#[derive(Error, Debug)]
pub enum DataAccessError {
    #[error(transparent)]
    Sql(#[from] sqlx::Error),
    #[error("procedure {procedure} returned no rows")]
    EmptyResult { procedure: String },
    #[error("procedure {procedure}: {message}")]
    Decode { procedure: String, message: String },
}

impl DataAccessError {
    pub fn decode(procedure: &str, message: impl Into<String>) -> Self {
        DataAccessError::Decode {
            procedure: procedure.to_string(),
            message: message.into(),
        }
    }
}

/// Startup failures. Only table and procedure listing are fatal.
#[derive(Error, Debug)]
pub enum BootstrapError {
    #[error("listing tables: {0}")]
    ListTables(#[source] DataAccessError),
    #[error("listing procedures: {0}")]
    ListProcedures(#[source] DataAccessError),
}

#[derive(Error, Debug)]
pub enum AppError {
    /// Database failure; `message` is the generic text sent to the client.
    #[error("{message}")]
    DataAccess {
        message: String,
        #[source]
        source: DataAccessError,
    },
    #[error("{message}")]
    Validation {
        message: String,
        violations: Vec<Violation>,
    },
    #[error("{0}")]
    BadRequest(String),
    /// Data-driven miss reported by a procedure status field.
    #[error("{0}")]
    NotFound(String),
    #[error("route not found: {0}")]
    RouteNotFound(String),
}

impl AppError {
    pub fn data_access(message: impl Into<String>, source: DataAccessError) -> Self {
        AppError::DataAccess {
            message: message.into(),
            source,
        }
    }
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub violations: Option<Vec<Violation>>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::DataAccess { source, .. } => {
                tracing::error!(error = %source, "data access failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Validation { .. } | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) | AppError::RouteNotFound(_) => StatusCode::NOT_FOUND,
        };
        let message = self.to_string();
        let violations = match self {
            AppError::Validation { violations, .. } => Some(violations),
            _ => None,
        };
        let body = ErrorBody {
            error: message,
            violations,
        };
        (status, Json(body)).into_response()
    }
}
