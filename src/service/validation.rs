//! Argument validation against introspected metadata.

use crate::catalog::{json_kind, ParamType, ProcedureParameter, TableDescriptor};
use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    Missing { parameter: String },
    TypeMismatch {
        parameter: String,
        expected: ParamType,
        found: &'static str,
    },
    Unexpected { parameter: String },
    UnknownColumn { column: String },
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Violation::Missing { parameter } => write!(f, "{} is required", parameter),
            Violation::TypeMismatch { parameter, expected, found } => {
                write!(f, "{} expects {:?}, got {}", parameter, expected, found)
            }
            Violation::Unexpected { parameter } => write!(f, "{} is not a declared parameter", parameter),
            Violation::UnknownColumn { column } => write!(f, "{} is not a column", column),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ValidationReport {
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// Comma-joined violation messages, for the response's error text.
    pub fn summary(&self) -> String {
        self.violations.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(", ")
    }
}

pub struct RequestValidator;

impl RequestValidator {
    /// Every declared parameter must be supplied with a coarse-matching value.
    /// Keys that are not declared parameters are ignored.
    pub fn validate(supplied: &Map<String, Value>, declared: &[ProcedureParameter]) -> ValidationReport {
        let mut violations = Vec::new();
        for param in declared {
            match supplied.get(&param.name) {
                None => violations.push(Violation::Missing {
                    parameter: param.name.clone(),
                }),
                Some(v) if !param.param_type.matches(v) => violations.push(Violation::TypeMismatch {
                    parameter: param.name.clone(),
                    expected: param.param_type.clone(),
                    found: json_kind(v),
                }),
                Some(_) => {}
            }
        }
        ValidationReport { violations }
    }

    /// Like `validate`, but supplied keys that are not declared parameters are violations too.
    pub fn validate_strict(supplied: &Map<String, Value>, declared: &[ProcedureParameter]) -> ValidationReport {
        let mut report = Self::validate(supplied, declared);
        for key in supplied.keys() {
            if !declared.iter().any(|p| &p.name == key) {
                report.violations.push(Violation::Unexpected { parameter: key.clone() });
            }
        }
        report
    }

    /// Every body key must name a column of the table.
    pub fn validate_columns(body: &Map<String, Value>, table: &TableDescriptor) -> ValidationReport {
        let violations = body
            .keys()
            .filter(|k| table.column(k).is_none())
            .map(|k| Violation::UnknownColumn { column: k.clone() })
            .collect();
        ValidationReport { violations }
    }
}
