//! Builds parameterized calls to set-returning procedures.
//! Identifiers come from introspection only; values are always placeholders.

use super::BoundArg;
use regex::Regex;
use std::sync::OnceLock;

/// Quote identifier for PostgreSQL.
pub fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// Quote a possibly schema-qualified routine name (`schema.name`).
pub fn quoted_routine(name: &str) -> String {
    name.split('.').map(quoted).collect::<Vec<_>>().join(".")
}

fn type_name_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z_][A-Za-z0-9_ ]*(\(\s*\d+\s*(,\s*\d+\s*)?\))?(\[\])?$")
            .expect("static pattern")
    })
}

/// Returns the type name when it is safe to splice into a cast, else None (the argument goes uncast).
pub fn safe_type_name(name: &str) -> Option<&str> {
    let name = name.trim();
    if type_name_pattern().is_match(name) {
        Some(name)
    } else {
        None
    }
}

/// `SELECT * FROM "proc"("a" => $1::text, "b" => $2)`. Named notation so argument order is irrelevant.
pub fn call_statement(procedure: &str, args: &[BoundArg]) -> String {
    let list = args
        .iter()
        .enumerate()
        .map(|(i, a)| {
            let placeholder = match &a.cast {
                Some(t) => format!("${}::{}", i + 1, t),
                None => format!("${}", i + 1),
            };
            format!("{} => {}", quoted(&a.name), placeholder)
        })
        .collect::<Vec<_>>()
        .join(", ");
    format!("SELECT * FROM {}({})", quoted_routine(procedure), list)
}
