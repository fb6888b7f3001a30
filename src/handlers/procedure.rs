//! RPC-style procedure dispatch: fresh parameter lookup, validation, execution.

use crate::catalog::ProcedureIntrospector;
use crate::error::{AppError, DataAccessError};
use crate::handlers::table::parse_body;
use crate::registry::ProcedureRoute;
use crate::response::ProcedureResultBody;
use crate::service::{CrudService, RequestValidator};
use crate::sql::BoundArg;
use crate::state::AppState;
use axum::Json;
use serde_json::Map;

pub async fn dispatch(
    state: &AppState,
    route: &ProcedureRoute,
    body: &[u8],
) -> Result<Json<ProcedureResultBody>, AppError> {
    let name = &route.name;
    let failed = |e: DataAccessError| AppError::data_access(format!("error executing procedure {}", name), e);
    let names = &state.settings.procedures;

    // An empty body calls the procedure with no arguments.
    let supplied = if body.iter().all(u8::is_ascii_whitespace) {
        Map::new()
    } else {
        parse_body(body)?
    };

    // Parameters are looked up on every call; signatures may change while we run.
    let declared = ProcedureIntrospector::new(state.executor.as_ref(), names)
        .describe_procedure(name)
        .await
        .map_err(failed)?
        .parameters;

    let report = if state.settings.strict_procedure_args {
        RequestValidator::validate_strict(&supplied, &declared)
    } else {
        RequestValidator::validate(&supplied, &declared)
    };
    if !report.is_valid() {
        for v in &report.violations {
            tracing::warn!(procedure = %name, violation = %v, "argument rejected");
        }
        return Err(AppError::Validation {
            message: format!("invalid arguments for {}: {}", name, report.summary()),
            violations: report.violations,
        });
    }

    let args: Vec<BoundArg> = declared
        .iter()
        .filter_map(|p| supplied.get(&p.name).map(|v| BoundArg::for_parameter(p, v)))
        .collect();
    let result = CrudService::new(state.executor.as_ref(), names)
        .execute(name, &args)
        .await
        .map_err(failed)?;
    Ok(Json(ProcedureResultBody {
        message: format!("procedure {} executed", name),
        result,
    }))
}
