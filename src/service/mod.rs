//! Procedure execution, generic CRUD, and argument validation.

mod crud;
mod executor;
mod validation;
pub use crud::{Created, CrudService, UpdateOutcome};
pub use executor::{Executor, PgExecutor, Recordset};
pub use validation::{RequestValidator, ValidationReport, Violation};
