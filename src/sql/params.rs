//! Convert serde_json::Value to types that sqlx can bind, plus named procedure arguments.

use crate::catalog::ProcedureParameter;
use serde_json::Value;
use sqlx::encode::{Encode, IsNull};
use sqlx::postgres::{PgTypeInfo, Postgres};
use sqlx::{Database, Type};

/// A value that can be bound to a PostgreSQL query. Converts from serde_json::Value.
#[derive(Clone, Debug, PartialEq)]
pub enum PgBindValue {
    Null,
    Bool(bool),
    I64(i64),
    F64(f64),
    String(String),
    Json(Value),
}

impl PgBindValue {
    pub fn from_json(v: &Value) -> Self {
        match v {
            Value::Null => PgBindValue::Null,
            Value::Bool(b) => PgBindValue::Bool(*b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    PgBindValue::I64(i)
                } else {
                    PgBindValue::F64(n.as_f64().unwrap_or(0.0))
                }
            }
            Value::String(s) => PgBindValue::String(s.clone()),
            Value::Array(_) | Value::Object(_) => PgBindValue::Json(v.clone()),
        }
    }
}

impl<'q> Encode<'q, Postgres> for PgBindValue {
    fn encode_by_ref(
        &self,
        buf: &mut <Postgres as Database>::ArgumentBuffer<'q>,
    ) -> Result<IsNull, Box<dyn std::error::Error + Send + Sync>> {
        Ok(match self {
            PgBindValue::Null => <Option<String> as Encode<Postgres>>::encode_by_ref(&None, buf)?,
            PgBindValue::Bool(b) => <bool as Encode<Postgres>>::encode_by_ref(b, buf)?,
            PgBindValue::I64(n) => <i64 as Encode<Postgres>>::encode_by_ref(n, buf)?,
            PgBindValue::F64(n) => <f64 as Encode<Postgres>>::encode_by_ref(n, buf)?,
            PgBindValue::String(s) => {
                let s_ref: &str = s.as_str();
                <&str as Encode<Postgres>>::encode_by_ref(&s_ref, buf)?
            }
            PgBindValue::Json(v) => <Value as Encode<Postgres>>::encode_by_ref(v, buf)?,
        })
    }

    fn produces(&self) -> Option<PgTypeInfo> {
        Some(match self {
            PgBindValue::Null | PgBindValue::String(_) => <String as Type<Postgres>>::type_info(),
            PgBindValue::Bool(_) => <bool as Type<Postgres>>::type_info(),
            PgBindValue::I64(_) => <i64 as Type<Postgres>>::type_info(),
            PgBindValue::F64(_) => <f64 as Type<Postgres>>::type_info(),
            PgBindValue::Json(_) => <Value as Type<Postgres>>::type_info(),
        })
    }
}

impl Type<Postgres> for PgBindValue {
    fn type_info() -> PgTypeInfo {
        PgTypeInfo::with_name("TEXT")
    }
}

/// One named argument of a procedure call. `cast` is the SQL type marker
/// appended to the placeholder (`$1::integer`).
#[derive(Clone, Debug, PartialEq)]
pub struct BoundArg {
    pub name: String,
    pub value: PgBindValue,
    pub cast: Option<String>,
}

impl BoundArg {
    pub fn text(name: &str, value: impl Into<String>) -> Self {
        BoundArg {
            name: name.to_string(),
            value: PgBindValue::String(value.into()),
            cast: Some("text".into()),
        }
    }

    /// Text argument bound as SQL NULL when absent.
    pub fn optional_text(name: &str, value: Option<&str>) -> Self {
        BoundArg {
            name: name.to_string(),
            value: value.map_or(PgBindValue::Null, |s| PgBindValue::String(s.to_string())),
            cast: Some("text".into()),
        }
    }

    /// Bind a caller-supplied value against its declared parameter; the declared SQL type is the marker.
    pub fn for_parameter(param: &ProcedureParameter, value: &Value) -> Self {
        BoundArg {
            name: param.name.clone(),
            value: PgBindValue::from_json(value),
            cast: super::safe_type_name(&param.data_type).map(str::to_string),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match &self.value {
            PgBindValue::String(s) => Some(s),
            _ => None,
        }
    }
}
