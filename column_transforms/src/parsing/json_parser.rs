use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::{Map, Number, Value as JsonValue};
use std::path::Path;

use crate::error::{TransformError, TransformResult};
use crate::models::{
    parse_date, parse_timestamp_lenient, DataType, Dataset, Field, Record, Schema, Value,
    DATE_FORMAT,
};

/// Raw JSON structure as it comes from a dataset file
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDataset {
    schema: Vec<Field>,
    #[serde(default)]
    records: Vec<Map<String, JsonValue>>,
}

/// Parse a dataset JSON file
pub fn parse_dataset_json(json_path: &Path) -> Result<Dataset> {
    let json_content = std::fs::read_to_string(json_path)
        .with_context(|| format!("Failed to read JSON file: {}", json_path.display()))?;

    parse_dataset_json_str(&json_content)
        .with_context(|| format!("Invalid dataset file: {}", json_path.display()))
}

/// Parse a dataset from a JSON string
pub fn parse_dataset_json_str(json_str: &str) -> Result<Dataset> {
    let deserializer = &mut serde_json::Deserializer::from_str(json_str);
    let raw: RawDataset = serde_path_to_error::deserialize(deserializer).map_err(|e| {
        let preview = if json_str.len() > 200 {
            let end = (0..=200).rev().find(|i| json_str.is_char_boundary(*i)).unwrap_or(0);
            format!("{}...", &json_str[..end])
        } else {
            json_str.to_string()
        };
        anyhow::anyhow!(
            "JSON deserialization error at '{}': {}\nFirst 200 chars: {}",
            e.path(),
            e.inner(),
            preview
        )
    })?;

    let schema = Schema::new(raw.schema)?;

    let records = raw
        .records
        .iter()
        .enumerate()
        .map(|(idx, object)| {
            convert_record(&schema, object)
                .with_context(|| format!("Error in record at index {}", idx))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Dataset::new(schema, records)?)
}

/// Convert one JSON object to a record. Keys missing from the object are
/// null; keys missing from the schema are ignored.
fn convert_record(schema: &Schema, object: &Map<String, JsonValue>) -> TransformResult<Record> {
    schema
        .fields()
        .iter()
        .map(|field| match object.get(&field.name) {
            None | Some(JsonValue::Null) => Ok(Value::Null),
            Some(json) => convert_value(field, json),
        })
        .collect::<TransformResult<Vec<_>>>()
        .map(Record::new)
}

fn convert_value(field: &Field, json: &JsonValue) -> TransformResult<Value> {
    let value = match (field.data_type, json) {
        (DataType::Text, JsonValue::String(s)) => Some(Value::Text(s.clone())),
        (DataType::Integer, JsonValue::Number(n)) => n.as_i64().map(Value::Integer),
        (DataType::Integer, JsonValue::String(s)) => {
            let parsed = s.trim().parse::<i64>().map_err(|e| {
                TransformError::ParseError(format!(
                    "column '{}': '{}' is not an integer: {}",
                    field.name, s, e
                ))
            })?;
            Some(Value::Integer(parsed))
        }
        (DataType::Float, JsonValue::Number(n)) => n.as_f64().map(Value::Float),
        (DataType::Float, JsonValue::String(s)) => Some(Value::Float(parse_special_float(field, s)?)),
        (DataType::Boolean, JsonValue::Bool(b)) => Some(Value::Boolean(*b)),
        (DataType::Date, JsonValue::String(s)) => {
            let date = parse_date(s).ok_or_else(|| {
                TransformError::ParseError(format!(
                    "column '{}': '{}' is not a YYYY-MM-DD date",
                    field.name, s
                ))
            })?;
            Some(Value::Date(date))
        }
        (DataType::Timestamp, JsonValue::String(s)) => {
            let ts = parse_timestamp_lenient(s).ok_or_else(|| {
                TransformError::ParseError(format!(
                    "column '{}': '{}' is not a YYYY-MM-DDTHH:MM:SS timestamp",
                    field.name, s
                ))
            })?;
            Some(Value::Timestamp(ts))
        }
        _ => None,
    };

    value.ok_or_else(|| TransformError::TypeMismatch {
        column: field.name.clone(),
        expected: field.data_type,
        found: json_kind(json).to_string(),
    })
}

/// Non-finite floats have no JSON number form and travel as strings.
fn parse_special_float(field: &Field, s: &str) -> TransformResult<f64> {
    match s {
        "NaN" => Ok(f64::NAN),
        "Infinity" => Ok(f64::INFINITY),
        "-Infinity" => Ok(f64::NEG_INFINITY),
        _ => Err(TransformError::ParseError(format!(
            "column '{}': '{}' is not a float",
            field.name, s
        ))),
    }
}

fn json_kind(json: &JsonValue) -> &'static str {
    match json {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(n) if n.is_i64() || n.is_u64() => "integer",
        JsonValue::Number(_) => "float",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

/// Serialize a dataset back to the JSON dataset format.
///
/// Nulls are written explicitly, so every record has every column.
pub fn dataset_to_json(dataset: &Dataset) -> TransformResult<JsonValue> {
    let fields = dataset.schema().fields();
    let records: Vec<JsonValue> = dataset
        .records()?
        .iter()
        .map(|record| {
            let object: Map<String, JsonValue> = fields
                .iter()
                .zip(record.values())
                .map(|(field, value)| (field.name.clone(), value_to_json(value)))
                .collect();
            JsonValue::Object(object)
        })
        .collect();

    Ok(serde_json::json!({
        "schema": dataset.schema(),
        "records": records,
    }))
}

fn value_to_json(value: &Value) -> JsonValue {
    match value {
        Value::Null => JsonValue::Null,
        Value::Text(s) => JsonValue::String(s.clone()),
        Value::Integer(i) => JsonValue::from(*i),
        Value::Float(f) => Number::from_f64(*f).map(JsonValue::Number).unwrap_or_else(|| {
            let special = if f.is_nan() {
                "NaN"
            } else if f.is_sign_positive() {
                "Infinity"
            } else {
                "-Infinity"
            };
            JsonValue::String(special.to_string())
        }),
        Value::Boolean(b) => JsonValue::Bool(*b),
        Value::Date(d) => JsonValue::String(d.format(DATE_FORMAT).to_string()),
        Value::Timestamp(ts) => JsonValue::String(ts.format("%Y-%m-%dT%H:%M:%S%.f").to_string()),
    }
}

/// Write a dataset to `path` as pretty-printed JSON.
pub fn write_dataset_json(dataset: &Dataset, path: &Path) -> Result<()> {
    let content = serde_json::to_string_pretty(&dataset_to_json(dataset)?)
        .context("Failed to serialize dataset")?;
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write JSON file: {}", path.display()))
}
