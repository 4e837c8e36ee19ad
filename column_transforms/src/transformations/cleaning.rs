use log::{debug, warn};
use polars::prelude::{col, lit};

use crate::error::TransformResult;
use crate::models::columns::literal;
use crate::models::{parse_date, parse_timestamp, DataType, Dataset, Value};
use crate::transformations::selection::ColumnFilter;

/// Remove leading and trailing spaces from every text column.
///
/// Only the space character is stripped; tabs and line breaks are kept.
pub fn trim(dataset: &Dataset) -> TransformResult<Dataset> {
    let updates = ColumnFilter::of_types(&[DataType::Text])
        .select(dataset.schema())
        .into_iter()
        .map(|field| {
            debug!("Trimming column '{}'", field.name);
            let expr = col(field.name.as_str()).str().strip_chars(lit(" "));
            (field, expr)
        })
        .collect();
    dataset.with_exprs(updates)
}

/// Replace nulls with `default` in the columns its type applies to.
///
/// A text default written as `YYYY-MM-DD` is treated as a date and fills
/// date columns; one written as `YYYY-MM-DDTHH:MM:SS` fills timestamp
/// columns. Otherwise the default fills columns of its own kind:
///
/// | default   | columns filled                             |
/// |-----------|--------------------------------------------|
/// | text      | text                                       |
/// | integer   | integer, float                             |
/// | float     | float, integer (truncated toward zero)     |
/// | boolean   | boolean                                    |
/// | date      | date                                       |
/// | timestamp | timestamp                                  |
///
/// Only nullable columns are considered; `subset` restricts them further.
pub fn replace_null(
    dataset: &Dataset,
    default: &Value,
    subset: Option<&[&str]>,
) -> TransformResult<Dataset> {
    let default = classify_default(default);

    let targets: &[DataType] = match &default {
        Value::Null => {
            warn!("replace_null called with a null default; dataset left unchanged");
            return Ok(dataset.clone());
        }
        Value::Text(_) => &[DataType::Text],
        Value::Integer(_) | Value::Float(_) => &[DataType::Integer, DataType::Float],
        Value::Boolean(_) => &[DataType::Boolean],
        Value::Date(_) => &[DataType::Date],
        Value::Timestamp(_) => &[DataType::Timestamp],
    };

    let updates = ColumnFilter::of_types(targets)
        .within(subset)
        .nullable_only()
        .select(dataset.schema())
        .into_iter()
        .filter_map(|field| {
            let fill = coerce_fill(&default, field.data_type);
            debug!("Filling nulls in column '{}' with {:?}", field.name, fill);
            let expr = col(field.name.as_str()).fill_null(literal(&fill)?);
            Some((field, expr))
        })
        .collect();
    dataset.with_exprs(updates)
}

/// Text that spells a date or timestamp becomes that value.
fn classify_default(default: &Value) -> Value {
    match default {
        Value::Text(s) => {
            if let Some(date) = parse_date(s) {
                Value::Date(date)
            } else if let Some(ts) = parse_timestamp(s) {
                Value::Timestamp(ts)
            } else {
                default.clone()
            }
        }
        other => other.clone(),
    }
}

/// Fill value stored in a column of `target` type.
fn coerce_fill(default: &Value, target: DataType) -> Value {
    match (default, target) {
        (Value::Integer(i), DataType::Float) => Value::Float(*i as f64),
        (Value::Float(f), DataType::Integer) => Value::Integer(f.trunc() as i64),
        _ => default.clone(),
    }
}

/// Remove duplicate rows.
///
/// `None` compares whole rows. With a subset, names missing from the
/// schema are skipped; if none remain the dataset is returned unchanged.
/// The first occurrence of each key is kept and row order is preserved.
pub fn deduplicate(dataset: &Dataset, subset: Option<&[&str]>) -> TransformResult<Dataset> {
    let Some(names) = subset else {
        return dataset.distinct(None);
    };

    let key: Vec<&str> = names
        .iter()
        .copied()
        .filter(|name| {
            let known = dataset.schema().contains(name);
            if !known {
                debug!("Skipping de-duplication key '{}': not in schema", name);
            }
            known
        })
        .collect();

    if key.is_empty() {
        warn!("No de-duplication key columns found in schema; dataset left unchanged");
        return Ok(dataset.clone());
    }

    let deduplicated = dataset.distinct(Some(&key))?;
    debug!(
        "De-duplicated on {:?}: {} -> {} rows",
        key,
        dataset.height(),
        deduplicated.height()
    );
    Ok(deduplicated)
}

/// Drop system or other non-business columns. Unknown names are ignored.
pub fn drop_columns(dataset: &Dataset, columns: &[&str]) -> Dataset {
    dataset.drop_columns(columns)
}
