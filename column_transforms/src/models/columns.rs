//! Conversion between cell values and polars columns.
//!
//! Every [`DataType`] is stored as one polars type: text as `String`,
//! integers as `Int64`, floats as `Float64`, booleans as `Boolean`, dates
//! as `Date` and timestamps as zone-less `Datetime` in microseconds.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use polars::prelude::{
    lit, DataType as PlDataType, Expr, NamedFrom, PolarsResult, Series, TimeUnit,
};

use super::schema::DataType;
use super::value::Value;

/// `num_days_from_ce` of 1970-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// The polars type a column of `data_type` is stored as.
pub fn polars_type(data_type: DataType) -> PlDataType {
    match data_type {
        DataType::Text => PlDataType::String,
        DataType::Integer => PlDataType::Int64,
        DataType::Float => PlDataType::Float64,
        DataType::Boolean => PlDataType::Boolean,
        DataType::Date => PlDataType::Date,
        DataType::Timestamp => PlDataType::Datetime(TimeUnit::Microseconds, None),
    }
}

/// The column type a polars type maps to. Narrower numbers and other
/// datetime units map to the wider type and need a cast first.
pub fn data_type_of(dtype: &PlDataType) -> Option<DataType> {
    match dtype {
        PlDataType::String => Some(DataType::Text),
        PlDataType::Int32 | PlDataType::UInt32 | PlDataType::Int64 => Some(DataType::Integer),
        PlDataType::Float32 | PlDataType::Float64 => Some(DataType::Float),
        PlDataType::Boolean => Some(DataType::Boolean),
        PlDataType::Date => Some(DataType::Date),
        PlDataType::Datetime(_, None) => Some(DataType::Timestamp),
        _ => None,
    }
}

/// Name of a polars type for error messages, in column-type terms where
/// one applies.
pub fn describe(dtype: &PlDataType) -> String {
    data_type_of(dtype).map_or_else(|| dtype.to_string(), |t| t.as_str().to_string())
}

pub fn days_from_epoch(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE
}

pub fn date_from_days(days: i32) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(days.checked_add(UNIX_EPOCH_DAYS_FROM_CE)?)
}

pub fn timestamp_micros(ts: NaiveDateTime) -> i64 {
    ts.and_utc().timestamp_micros()
}

pub fn timestamp_from_micros(micros: i64) -> Option<NaiveDateTime> {
    DateTime::from_timestamp_micros(micros).map(|dt| dt.naive_utc())
}

/// Build a `Date` column.
pub fn date_series<I>(name: &str, dates: I) -> PolarsResult<Series>
where
    I: IntoIterator<Item = Option<NaiveDate>>,
{
    let days: Vec<Option<i32>> = dates.into_iter().map(|d| d.map(days_from_epoch)).collect();
    Series::new(name.into(), days).cast(&PlDataType::Date)
}

/// Build a `Datetime` column.
pub fn timestamp_series<I>(name: &str, timestamps: I) -> PolarsResult<Series>
where
    I: IntoIterator<Item = Option<NaiveDateTime>>,
{
    let micros: Vec<Option<i64>> = timestamps
        .into_iter()
        .map(|ts| ts.map(timestamp_micros))
        .collect();
    Series::new(name.into(), micros).cast(&polars_type(DataType::Timestamp))
}

/// Dates of a `Date` column.
pub fn series_dates(series: &Series) -> PolarsResult<Vec<Option<NaiveDate>>> {
    let days = series.cast(&PlDataType::Int32)?;
    Ok(days
        .i32()?
        .into_iter()
        .map(|d| d.and_then(date_from_days))
        .collect())
}

/// Timestamps of a microsecond `Datetime` column.
pub fn series_timestamps(series: &Series) -> PolarsResult<Vec<Option<NaiveDateTime>>> {
    let micros = series.cast(&PlDataType::Int64)?;
    Ok(micros
        .i64()?
        .into_iter()
        .map(|m| m.and_then(timestamp_from_micros))
        .collect())
}

/// Build a column of `data_type` from values already checked to fit it.
pub fn values_to_series<'a, I>(name: &str, data_type: DataType, values: I) -> PolarsResult<Series>
where
    I: IntoIterator<Item = &'a Value>,
{
    let values = values.into_iter();
    let series = match data_type {
        DataType::Text => {
            let texts: Vec<Option<&str>> = values.map(Value::as_text).collect();
            Series::new(name.into(), texts)
        }
        DataType::Integer => {
            let ints: Vec<Option<i64>> = values.map(Value::as_integer).collect();
            Series::new(name.into(), ints)
        }
        DataType::Float => {
            let floats: Vec<Option<f64>> = values.map(Value::as_float).collect();
            Series::new(name.into(), floats)
        }
        DataType::Boolean => {
            let bools: Vec<Option<bool>> = values.map(Value::as_boolean).collect();
            Series::new(name.into(), bools)
        }
        DataType::Date => date_series(name, values.map(Value::as_date))?,
        DataType::Timestamp => timestamp_series(name, values.map(Value::as_timestamp))?,
    };
    Ok(series)
}

/// Read a column stored as `data_type` back into values.
pub fn series_to_values(series: &Series, data_type: DataType) -> PolarsResult<Vec<Value>> {
    let values = match data_type {
        DataType::Text => series.str()?.into_iter().map(Value::from).collect(),
        DataType::Integer => series.i64()?.into_iter().map(Value::from).collect(),
        DataType::Float => series.f64()?.into_iter().map(Value::from).collect(),
        DataType::Boolean => series.bool()?.into_iter().map(Value::from).collect(),
        DataType::Date => series_dates(series)?.into_iter().map(Value::from).collect(),
        DataType::Timestamp => series_timestamps(series)?
            .into_iter()
            .map(Value::from)
            .collect(),
    };
    Ok(values)
}

/// A typed literal expression for a non-null value.
pub fn literal(value: &Value) -> Option<Expr> {
    let expr = match value {
        Value::Null => return None,
        Value::Text(s) => lit(s.clone()),
        Value::Integer(i) => lit(*i),
        Value::Float(f) => lit(*f),
        Value::Boolean(b) => lit(*b),
        Value::Date(d) => lit(days_from_epoch(*d)).cast(PlDataType::Date),
        Value::Timestamp(ts) => lit(timestamp_micros(*ts)).cast(polars_type(DataType::Timestamp)),
    };
    Some(expr)
}
