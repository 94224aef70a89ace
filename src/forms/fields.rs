use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveTime};
use regex::Regex;
use serde_json::{Map, Value};

use super::schema::{FieldKind, FieldSpec, FormSchema};

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

#[derive(Debug, Clone, PartialEq)]
pub enum Violation {
    Missing(&'static str),
    InvalidEmail(&'static str),
    NotANumber(&'static str),
    OutOfRange {
        field: &'static str,
        min: i64,
        max: i64,
    },
    NotABoolean(&'static str),
    NotText(&'static str),
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Violation::Missing(field) => write!(f, "Missing required field: {field}"),
            Violation::InvalidEmail(field) => write!(f, "Invalid email format: {field}"),
            Violation::NotANumber(field) => write!(f, "Expected a whole number: {field}"),
            Violation::OutOfRange { field, min, max } => {
                write!(f, "{field} must be a number between {min} and {max}")
            }
            Violation::NotABoolean(field) => write!(f, "Expected true or false: {field}"),
            Violation::NotText(field) => write!(f, "Expected text: {field}"),
        }
    }
}

/// Summarize violations into one client-facing message. Missing fields are
/// grouped into a single clause.
pub fn describe(violations: &[Violation]) -> String {
    let missing: Vec<&str> = violations
        .iter()
        .filter_map(|v| match v {
            Violation::Missing(field) => Some(*field),
            _ => None,
        })
        .collect();

    let mut parts = Vec::new();
    if !missing.is_empty() {
        parts.push(format!("Missing required fields: {}", missing.join(", ")));
    }
    parts.extend(
        violations
            .iter()
            .filter(|v| !matches!(v, Violation::Missing(_)))
            .map(|v| v.to_string()),
    );

    parts.join("; ")
}

/// Absent, `null` and blank strings all count as not provided.
fn is_present(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(_) => true,
    }
}

/// Coerce one provided value to the column type declared for it.
fn coerce(spec: &FieldSpec, value: &Value) -> Result<Value, Violation> {
    match spec.kind {
        FieldKind::Text | FieldKind::Date | FieldKind::Time => match value {
            Value::String(s) => Ok(Value::String(s.trim().to_string())),
            Value::Number(n) => Ok(Value::String(n.to_string())),
            _ => Err(Violation::NotText(spec.field)),
        },
        FieldKind::Email => match value {
            Value::String(s) if EMAIL_RE.is_match(s.trim()) => Ok(Value::String(s.trim().to_string())),
            _ => Err(Violation::InvalidEmail(spec.field)),
        },
        FieldKind::Integer { min, max } => {
            let n = match value {
                Value::Number(n) => n.as_i64().or_else(|| {
                    n.as_f64()
                        .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                        .map(|f| f as i64)
                }),
                Value::String(s) => s.trim().parse::<i64>().ok(),
                _ => None,
            }
            .ok_or(Violation::NotANumber(spec.field))?;

            if n < min || n > max {
                return Err(Violation::OutOfRange {
                    field: spec.field,
                    min,
                    max,
                });
            }
            Ok(Value::from(n))
        }
        FieldKind::Boolean => match value {
            Value::Bool(b) => Ok(Value::Bool(*b)),
            Value::Number(n) => match n.as_i64() {
                Some(0) => Ok(Value::Bool(false)),
                Some(1) => Ok(Value::Bool(true)),
                _ => Err(Violation::NotABoolean(spec.field)),
            },
            Value::String(s) => match s.trim().to_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => Ok(Value::Bool(true)),
                "false" | "0" | "no" | "off" => Ok(Value::Bool(false)),
                _ => Err(Violation::NotABoolean(spec.field)),
            },
            _ => Err(Violation::NotABoolean(spec.field)),
        },
    }
}

/// Check a payload against the form's declared fields.
/// An empty result means the payload is valid.
pub fn validate(schema: &FormSchema, payload: &Map<String, Value>) -> Vec<Violation> {
    normalize(schema, payload).err().unwrap_or_default()
}

/// Map payload fields onto table columns, applying defaults and coercions.
/// This is the single validation pass: every violation is collected.
/// Keys the schema does not declare are dropped.
pub fn normalize(
    schema: &FormSchema,
    payload: &Map<String, Value>,
) -> Result<Map<String, Value>, Vec<Violation>> {
    let mut record = Map::new();
    let mut violations = Vec::new();

    for spec in schema.fields {
        let value = payload.get(spec.field).filter(|v| is_present(Some(*v)));

        match value {
            Some(value) => match coerce(spec, value) {
                Ok(coerced) => {
                    record.insert(spec.column.to_string(), coerced);
                }
                Err(v) => violations.push(v),
            },
            None if spec.required => violations.push(Violation::Missing(spec.field)),
            None => {
                if let Some(default) = spec.default {
                    record.insert(spec.column.to_string(), default.to_value());
                }
            }
        }
    }

    if !violations.is_empty() {
        return Err(violations);
    }

    for (column, value) in schema.fixed {
        record.insert(column.to_string(), Value::String(value.to_string()));
    }

    Ok(record)
}

/// Soft format checks. Returns warnings (doesn't reject).
pub fn advisories(schema: &FormSchema, payload: &Map<String, Value>) -> Vec<String> {
    let mut warnings = Vec::new();

    for spec in schema.fields {
        let Some(Value::String(s)) = payload.get(spec.field) else {
            continue;
        };
        let s = s.trim();

        match spec.kind {
            FieldKind::Date if NaiveDate::parse_from_str(s, "%Y-%m-%d").is_err() => {
                warnings.push(format!("Unexpected date format: {}", spec.field));
            }
            FieldKind::Time
                if NaiveTime::parse_from_str(s, "%H:%M").is_err()
                    && NaiveTime::parse_from_str(s, "%H:%M:%S").is_err() =>
            {
                warnings.push(format!("Unexpected time format: {}", spec.field));
            }
            _ => {}
        }
    }

    warnings
}
