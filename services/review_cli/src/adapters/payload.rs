//! services/review_cli/src/adapters/payload.rs
//!
//! Wire types for the review backend and their conversion into core records.

use app_review_core::domain::{FieldValue, Record};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

//=========================================================================================
// Request and Response Bodies
//=========================================================================================

/// The body sent with a question.
#[derive(Serialize, Debug)]
pub struct QuestionRequest<'a> {
    pub question: &'a str,
}

/// The body of `GET /table/{platform}`.
#[derive(Deserialize, Debug)]
pub struct TableResponse {
    pub table: Option<Value>,
    #[serde(default)]
    pub error: Option<String>,
}

/// The body of `POST /question/{platform}`.
#[derive(Deserialize, Debug)]
pub struct QuestionResponse {
    pub answer: Option<String>,
    pub table: Option<Value>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Whatever a failed request may say about itself.
#[derive(Deserialize, Debug, Default)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

//=========================================================================================
// Table Decoding
//=========================================================================================

/// Decodes a `table` field into records.
///
/// Accepts a row-oriented array of objects, or the column-oriented
/// `{ column: { rowKey: value } }` shape, which is pivoted into rows ordered
/// by the first column's row keys.
pub fn decode_table(table: Option<&Value>) -> Result<Vec<Record>, String> {
    match table {
        Some(Value::Array(rows)) => rows
            .iter()
            .enumerate()
            .map(|(i, row)| match row {
                Value::Object(fields) => Ok(record_from_object(fields)),
                other => Err(format!("row {} is {}, not an object", i, kind(other))),
            })
            .collect(),
        Some(Value::Object(columns)) => pivot_columns(columns),
        Some(other) => Err(format!("table is {}, not an array or object", kind(other))),
        None => Err("missing table field".to_string()),
    }
}

fn record_from_object(fields: &Map<String, Value>) -> Record {
    fields
        .iter()
        .map(|(name, value)| (name.clone(), field_value(value)))
        .collect()
}

fn pivot_columns(columns: &Map<String, Value>) -> Result<Vec<Record>, String> {
    let mut by_column = Vec::with_capacity(columns.len());
    for (name, cells) in columns {
        match cells {
            Value::Object(cells) => by_column.push((name, cells)),
            other => return Err(format!("column '{}' is {}, not an object", name, kind(other))),
        }
    }

    let Some((_, first)) = by_column.first() else {
        return Ok(Vec::new());
    };
    let records = row_keys(first)
        .into_iter()
        .map(|row_key| {
            by_column
                .iter()
                .map(|(name, cells)| {
                    let value = cells
                        .get(row_key)
                        .map(field_value)
                        .unwrap_or(FieldValue::Null);
                    (name.to_string(), value)
                })
                .collect()
        })
        .collect();
    Ok(records)
}

/// Row keys of a column, in numeric order when they are all integers.
///
/// `jsonify` sorts keys as strings, so "10" would otherwise precede "2".
fn row_keys(cells: &Map<String, Value>) -> Vec<&String> {
    let mut keys: Vec<&String> = cells.keys().collect();
    let numeric: Option<Vec<i64>> = keys.iter().map(|k| k.parse::<i64>().ok()).collect();
    if let Some(numeric) = numeric {
        let mut paired: Vec<(i64, &String)> = numeric.into_iter().zip(keys).collect();
        paired.sort_by_key(|(n, _)| *n);
        keys = paired.into_iter().map(|(_, k)| k).collect();
    }
    keys
}

/// Scalars map directly; nested arrays and objects become their JSON text.
fn field_value(value: &Value) -> FieldValue {
    match value {
        Value::Null => FieldValue::Null,
        Value::Bool(b) => FieldValue::Bool(*b),
        Value::Number(n) => n
            .as_f64()
            .map(FieldValue::Number)
            .unwrap_or_else(|| FieldValue::Text(n.to_string())),
        Value::String(s) => FieldValue::Text(s.clone()),
        nested => FieldValue::Text(nested.to_string()),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
