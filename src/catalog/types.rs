//! Descriptors produced by introspection: tables, columns, procedure parameters.

use crate::error::DataAccessError;
use serde::Serialize;
use serde_json::{Map, Value};

/// Coarse type of a column or procedure parameter, derived from its declared SQL type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamType {
    Integer,
    Decimal,
    Boolean,
    Text,
    Json,
    /// Declared type with no coarse category (arrays, geometry, ...). Accepts any non-null value.
    Other(String),
}

impl ParamType {
    pub fn from_sql(declared: &str) -> Self {
        let lower = declared.trim().to_lowercase();
        if lower.ends_with("[]") || lower.starts_with('_') {
            return ParamType::Other(declared.trim().to_string());
        }
        let base = lower.split('(').next().unwrap_or("").trim();
        match base {
            "int" | "integer" | "int2" | "int4" | "int8" | "smallint" | "bigint" | "tinyint"
            | "serial" | "bigserial" | "smallserial" => ParamType::Integer,
            "numeric" | "decimal" | "real" | "float" | "float4" | "float8" | "double precision"
            | "money" | "smallmoney" => ParamType::Decimal,
            "bool" | "boolean" | "bit" => ParamType::Boolean,
            "json" | "jsonb" => ParamType::Json,
            "uuid" | "uniqueidentifier" | "date" | "xml" | "name" | "citext" => ParamType::Text,
            b if b.contains("char") || b.contains("text") || b.starts_with("time") => ParamType::Text,
            _ => ParamType::Other(declared.trim().to_string()),
        }
    }

    /// Coarse match of a JSON value against this type. `null` never matches.
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            ParamType::Integer => value.as_i64().is_some() || value.as_u64().is_some(),
            ParamType::Decimal => value.is_number(),
            ParamType::Boolean => value.is_boolean(),
            ParamType::Text => value.is_string(),
            ParamType::Json => value.is_object() || value.is_array(),
            ParamType::Other(_) => !value.is_null(),
        }
    }
}

/// Name of a JSON value's runtime category, for diagnostics.
pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "decimal",
        Value::Number(_) => "integer",
        Value::String(_) => "text",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDescriptor {
    pub name: String,
    pub data_type: String,
    pub max_length: Option<i64>,
    pub nullable: bool,
    pub is_primary_key: bool,
}

impl ColumnDescriptor {
    /// Decode one row of the column-introspection procedure.
    pub fn from_row(procedure: &str, row: &Value) -> Result<Self, DataAccessError> {
        let obj = row
            .as_object()
            .ok_or_else(|| DataAccessError::decode(procedure, "column row is not an object"))?;
        let name = field(obj, "COLUMN_NAME")
            .and_then(Value::as_str)
            .ok_or_else(|| DataAccessError::decode(procedure, "column row without COLUMN_NAME"))?;
        let data_type = field(obj, "DATA_TYPE").and_then(Value::as_str).unwrap_or("");
        let max_length = field(obj, "CHARACTER_MAXIMUM_LENGTH").and_then(|v| match v {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.parse().ok(),
            _ => None,
        });
        Ok(ColumnDescriptor {
            name: name.to_string(),
            data_type: data_type.to_string(),
            max_length,
            nullable: field(obj, "IS_NULLABLE").map(flag).unwrap_or(true),
            is_primary_key: field(obj, "IS_PRIMARY_KEY").map(flag).unwrap_or(false),
        })
    }

    pub fn param_type(&self) -> ParamType {
        ParamType::from_sql(&self.data_type)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TableDescriptor {
    pub name: String,
    pub columns: Vec<ColumnDescriptor>,
}

impl TableDescriptor {
    pub fn primary_keys(&self) -> Vec<&ColumnDescriptor> {
        self.columns.iter().filter(|c| c.is_primary_key).collect()
    }

    pub fn column(&self, name: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|c| c.name == name)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcedureParameter {
    /// Name without its leading sigil.
    pub name: String,
    pub data_type: String,
    pub param_type: ParamType,
}

impl ProcedureParameter {
    pub fn new(raw_name: &str, data_type: &str) -> Self {
        ProcedureParameter {
            name: strip_sigil(raw_name).to_string(),
            data_type: data_type.to_string(),
            param_type: ParamType::from_sql(data_type),
        }
    }

    pub fn from_row(procedure: &str, row: &Value) -> Result<Self, DataAccessError> {
        let obj = row
            .as_object()
            .ok_or_else(|| DataAccessError::decode(procedure, "parameter row is not an object"))?;
        let name = field(obj, "PARAMETER_NAME")
            .and_then(Value::as_str)
            .ok_or_else(|| DataAccessError::decode(procedure, "parameter row without PARAMETER_NAME"))?;
        let data_type = field(obj, "DATA_TYPE").and_then(Value::as_str).unwrap_or("");
        Ok(ProcedureParameter::new(name, data_type))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProcedureDescriptor {
    pub name: String,
    pub parameters: Vec<ProcedureParameter>,
}

/// Strip exactly one leading sigil (`@`, `:` or `$`).
pub fn strip_sigil(name: &str) -> &str {
    name.strip_prefix(['@', ':', '$']).unwrap_or(name)
}

/// Case-insensitive field lookup; introspection views differ in key casing.
pub(crate) fn field<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    obj.get(key)
        .or_else(|| obj.iter().find(|(k, _)| k.eq_ignore_ascii_case(key)).map(|(_, v)| v))
}

fn flag(v: &Value) -> bool {
    match v {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_i64().map_or(false, |n| n != 0),
        Value::String(s) => matches!(s.trim().to_ascii_uppercase().as_str(), "YES" | "Y" | "TRUE" | "1"),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sql_types_map_to_coarse_families() {
        assert_eq!(ParamType::from_sql("int"), ParamType::Integer);
        assert_eq!(ParamType::from_sql("BIGINT"), ParamType::Integer);
        assert_eq!(ParamType::from_sql("nvarchar"), ParamType::Text);
        assert_eq!(ParamType::from_sql("character varying(50)"), ParamType::Text);
        assert_eq!(ParamType::from_sql("timestamp with time zone"), ParamType::Text);
        assert_eq!(ParamType::from_sql("numeric(10,2)"), ParamType::Decimal);
        assert_eq!(ParamType::from_sql("double precision"), ParamType::Decimal);
        assert_eq!(ParamType::from_sql("boolean"), ParamType::Boolean);
        assert_eq!(ParamType::from_sql("jsonb"), ParamType::Json);
        assert_eq!(ParamType::from_sql("integer[]"), ParamType::Other("integer[]".into()));
        assert_eq!(ParamType::from_sql("geometry"), ParamType::Other("geometry".into()));
    }

    #[test]
    fn coarse_matching() {
        assert!(ParamType::Integer.matches(&json!(1)));
        assert!(!ParamType::Integer.matches(&json!(1.5)));
        assert!(!ParamType::Integer.matches(&json!("1")));
        assert!(ParamType::Decimal.matches(&json!(1)));
        assert!(ParamType::Text.matches(&json!("s")));
        assert!(!ParamType::Text.matches(&Value::Null));
        assert!(ParamType::Other("point".into()).matches(&json!("(1,2)")));
        assert!(!ParamType::Other("point".into()).matches(&Value::Null));
    }

    #[test]
    fn sigil_is_stripped_once() {
        assert_eq!(strip_sigil("@Nombre"), "Nombre");
        assert_eq!(strip_sigil("@@x"), "@x");
        assert_eq!(strip_sigil("plain"), "plain");
    }

    #[test]
    fn column_rows_decode_leniently() {
        let row = json!({
            "column_name": "ArticleId",
            "data_type": "integer",
            "character_maximum_length": null,
            "is_nullable": "NO",
            "is_primary_key": 1
        });
        let col = ColumnDescriptor::from_row("GetTableColumns", &row).unwrap();
        assert_eq!(col.name, "ArticleId");
        assert!(!col.nullable);
        assert!(col.is_primary_key);
        assert_eq!(col.max_length, None);
        assert_eq!(col.param_type(), ParamType::Integer);
    }

    #[test]
    fn nullability_accepts_booleans() {
        let row = json!({"COLUMN_NAME": "nota", "DATA_TYPE": "text", "IS_NULLABLE": false});
        assert!(!ColumnDescriptor::from_row("GetTableColumns", &row).unwrap().nullable);
        let row = json!({"COLUMN_NAME": "nota", "DATA_TYPE": "text", "IS_NULLABLE": true});
        assert!(ColumnDescriptor::from_row("GetTableColumns", &row).unwrap().nullable);
    }

    #[test]
    fn column_row_without_name_is_a_decode_error() {
        let err = ColumnDescriptor::from_row("GetTableColumns", &json!({"DATA_TYPE": "int"})).unwrap_err();
        assert!(matches!(err, DataAccessError::Decode { .. }));
    }
}
