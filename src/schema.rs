// ABOUTME: Column type inference and value coercion for datasets
// ABOUTME: Maps inferred semantic types to SQLite and MySQL column types

use crate::dataset::{Dataset, Value};
use crate::error::SchemaInferenceError;

/// Semantic column types a dataset column can be assigned.
///
/// Every column gets exactly one of these; the loader coerces each cell to
/// the column's type at insert time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Text,
    Integer,
    Float,
    Boolean,
}

impl ColumnType {
    pub fn name(&self) -> &'static str {
        match self {
            ColumnType::Text => "text",
            ColumnType::Integer => "integer",
            ColumnType::Float => "float",
            ColumnType::Boolean => "boolean",
        }
    }
}

/// SQL dialect a schema is rendered against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Sqlite,
    Mysql,
}

/// One inferred column: name, type, and the widest text rendering seen.
///
/// `max_text_len` sizes MySQL VARCHAR columns; SQLite ignores it.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSchema {
    pub name: String,
    pub ty: ColumnType,
    pub max_text_len: usize,
}

impl ColumnSchema {
    /// Native column type for the given dialect.
    ///
    /// SQLite: TEXT / INTEGER / REAL, boolean stored as INTEGER.
    /// MySQL: VARCHAR sized from the widest observed value, BIGINT, DOUBLE,
    /// BOOLEAN.
    pub fn sql_type(&self, dialect: Dialect) -> String {
        match (dialect, self.ty) {
            (Dialect::Sqlite, ColumnType::Text) => "TEXT".to_string(),
            (Dialect::Sqlite, ColumnType::Integer) => "INTEGER".to_string(),
            (Dialect::Sqlite, ColumnType::Float) => "REAL".to_string(),
            // SQLite has no native boolean type
            (Dialect::Sqlite, ColumnType::Boolean) => "INTEGER".to_string(),

            (Dialect::Mysql, ColumnType::Text) => {
                // Widest observed value plus headroom, clamped to VARCHAR limits
                let len = (self.max_text_len + 100).clamp(255, 65535);
                format!("VARCHAR({})", len)
            }
            (Dialect::Mysql, ColumnType::Integer) => "BIGINT".to_string(),
            (Dialect::Mysql, ColumnType::Float) => "DOUBLE".to_string(),
            (Dialect::Mysql, ColumnType::Boolean) => "BOOLEAN".to_string(),
        }
    }
}

/// The full inferred schema: columns in dataset order.
#[derive(Debug, Clone, PartialEq)]
pub struct TableSchema {
    pub columns: Vec<ColumnSchema>,
}

impl TableSchema {
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }
}

/// Infer a schema from a dataset.
///
/// For each column, every non-null value is inspected. Types are tried in
/// priority order: boolean, then integer, then float, then text. A column
/// where every non-null value is a boolean token (`true`/`false`, any case)
/// is boolean; one where every value parses as `i64` is integer; one where
/// every value parses as a finite `f64` is float; everything else, and any
/// all-null column, is text.
///
/// Numeric edge cases: leading zeros parse as integers ("007" is 7),
/// scientific notation parses only as float, and only the ASCII '.' decimal
/// separator is recognized, so "1,5" is text. Integers too large for i64
/// fall through to float.
///
/// Already-typed values (from a SQLite source) count as their own type:
/// `Integer` satisfies integer and float, `Float` satisfies float only,
/// `Boolean` satisfies boolean only.
///
/// Deterministic for identical input; no side effects.
///
/// # Errors
///
/// `SchemaInferenceError::NoColumns` if the dataset has zero columns.
pub fn infer_schema(dataset: &Dataset) -> Result<TableSchema, SchemaInferenceError> {
    if dataset.column_count() == 0 {
        return Err(SchemaInferenceError::NoColumns);
    }

    tracing::debug!(
        "Inferring schema over {} columns and {} rows",
        dataset.column_count(),
        dataset.row_count()
    );

    let mut columns = Vec::with_capacity(dataset.column_count());

    for (idx, name) in dataset.columns().iter().enumerate() {
        let mut all_boolean = true;
        let mut all_integer = true;
        let mut all_float = true;
        let mut any_non_null = false;
        let mut max_text_len = 0usize;

        for value in dataset.column_values(idx) {
            if value.is_null() {
                continue;
            }
            any_non_null = true;

            if let Some(rendered) = value.render() {
                max_text_len = max_text_len.max(rendered.chars().count());
            }

            all_boolean &= satisfies_boolean(value);
            all_integer &= satisfies_integer(value);
            all_float &= satisfies_float(value);
        }

        let ty = if !any_non_null {
            ColumnType::Text
        } else if all_boolean {
            ColumnType::Boolean
        } else if all_integer {
            ColumnType::Integer
        } else if all_float {
            ColumnType::Float
        } else {
            ColumnType::Text
        };

        tracing::debug!("Column '{}' inferred as {}", name, ty.name());

        columns.push(ColumnSchema {
            name: name.clone(),
            ty,
            max_text_len,
        });
    }

    Ok(TableSchema { columns })
}

/// The boolean token set: `true`/`false`, case-insensitive. Numeric 0/1 are
/// deliberately excluded so integer columns never infer as boolean.
fn is_boolean_token(s: &str) -> bool {
    s.eq_ignore_ascii_case("true") || s.eq_ignore_ascii_case("false")
}

fn parse_boolean_token(s: &str) -> Option<bool> {
    if s.eq_ignore_ascii_case("true") {
        Some(true)
    } else if s.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

fn satisfies_boolean(value: &Value) -> bool {
    match value {
        Value::Boolean(_) => true,
        Value::Text(s) => is_boolean_token(s),
        _ => false,
    }
}

fn satisfies_integer(value: &Value) -> bool {
    match value {
        Value::Integer(_) => true,
        Value::Text(s) => s.trim().parse::<i64>().is_ok(),
        _ => false,
    }
}

fn satisfies_float(value: &Value) -> bool {
    match value {
        Value::Integer(_) => true,
        Value::Float(f) => f.is_finite(),
        Value::Text(s) => matches!(s.trim().parse::<f64>(), Ok(f) if f.is_finite()),
        _ => false,
    }
}

/// Coerce one value to a declared column type.
///
/// Returns the normalized value on success and a human-readable reason on
/// failure. `Null` passes through for every target type. Failures here are
/// per-row data problems, recorded by the loader and never fatal.
pub fn coerce_value(value: &Value, ty: ColumnType) -> Result<Value, String> {
    if value.is_null() {
        return Ok(Value::Null);
    }

    match ty {
        ColumnType::Text => match value.render() {
            Some(s) => Ok(Value::Text(s)),
            None => Ok(Value::Null),
        },

        ColumnType::Integer => match value {
            Value::Integer(i) => Ok(Value::Integer(*i)),
            Value::Text(s) => s
                .trim()
                .parse::<i64>()
                .map(Value::Integer)
                .map_err(|_| format!("'{}' is not an integer", s)),
            // Accept floats that carry no fractional part; 2.0 is 2
            Value::Float(f) if f.fract() == 0.0 && f.is_finite() => Ok(Value::Integer(*f as i64)),
            other => Err(format!("cannot coerce {} to integer", other)),
        },

        ColumnType::Float => match value {
            Value::Float(f) => Ok(Value::Float(*f)),
            Value::Integer(i) => Ok(Value::Float(*i as f64)),
            Value::Text(s) => match s.trim().parse::<f64>() {
                Ok(f) if f.is_finite() => Ok(Value::Float(f)),
                _ => Err(format!("'{}' is not a finite number", s)),
            },
            other => Err(format!("cannot coerce {} to float", other)),
        },

        ColumnType::Boolean => match value {
            Value::Boolean(b) => Ok(Value::Boolean(*b)),
            Value::Text(s) => parse_boolean_token(s.trim())
                .map(Value::Boolean)
                .ok_or_else(|| format!("'{}' is not a boolean", s)),
            // SQLite stores booleans as 0/1 integers; accept exactly those
            Value::Integer(0) => Ok(Value::Boolean(false)),
            Value::Integer(1) => Ok(Value::Boolean(true)),
            other => Err(format!("cannot coerce {} to boolean", other)),
        },
    }
}
