//! sproc-gateway: REST routes generated at startup from a PostgreSQL catalog.
//! Tables with a single-column primary key get CRUD routes backed by generic procedures;
//! every other stored procedure gets an RPC route that validates its arguments first.

pub mod bootstrap;
pub mod catalog;
pub mod config;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod registry;
pub mod response;
pub mod routes;
pub mod service;
pub mod sql;
pub mod state;

pub use bootstrap::build_route_table;
pub use config::{ProcedureNames, Settings};
pub use error::{AppError, BootstrapError, ConfigError, DataAccessError};
pub use registry::RouteTable;
pub use routes::app;
pub use service::{Executor, PgExecutor};
pub use state::AppState;
