//! Column-wise Julian / calendar date conversion.
//!
//! Converted columns keep their name and nullability; only the type
//! changes. Each column is mapped value by value through the pure
//! functions in [`crate::time::julian`].

use log::debug;
use polars::prelude::{NamedFrom, Series};

use crate::error::TransformResult;
use crate::models::columns::{date_series, series_dates, series_timestamps};
use crate::models::{DataType, Dataset};
use crate::time::julian;
use crate::transformations::selection::ColumnFilter;

/// Replace integer Julian code columns with calendar dates.
///
/// Only the named columns of type `Integer` are converted; other names are
/// skipped. Codes that are not 5 or 7 digits long become the sentinel date
/// `0000-01-01`. Nulls stay null.
pub fn julian_to_calendar(dataset: &Dataset, columns: &[&str]) -> TransformResult<Dataset> {
    ColumnFilter::of_types(&[DataType::Integer])
        .within(Some(columns))
        .select(dataset.schema())
        .into_iter()
        .try_fold(dataset.clone(), |df, field| {
            debug!("Converting Julian codes to dates in column '{}'", field.name);
            let Some(codes) = df.series(&field.name) else {
                return Ok(df);
            };
            let dates = date_series(
                &field.name,
                codes.i64()?.into_iter().map(|code| code.map(julian::decode)),
            )?;
            df.with_column(field.retyped(DataType::Date), dates)
        })
}

/// Replace date or timestamp columns with compact Julian codes.
///
/// Timestamps are converted from their date part. The day of year is not
/// zero padded, so days 1 to 99 give codes shorter than five digits
/// (`2023-01-05` becomes `235`). Nulls stay null.
pub fn calendar_to_julian(dataset: &Dataset, columns: &[&str]) -> TransformResult<Dataset> {
    ColumnFilter::of_types(&[DataType::Date, DataType::Timestamp])
        .within(Some(columns))
        .select(dataset.schema())
        .into_iter()
        .try_fold(dataset.clone(), |df, field| {
            debug!("Converting dates to Julian codes in column '{}'", field.name);
            let Some(series) = df.series(&field.name) else {
                return Ok(df);
            };
            let dates = match field.data_type {
                DataType::Timestamp => series_timestamps(series)?
                    .into_iter()
                    .map(|ts| ts.map(|ts| ts.date()))
                    .collect(),
                _ => series_dates(series)?,
            };
            let codes: Vec<Option<i64>> = dates
                .into_iter()
                .map(|date| date.map(julian::encode))
                .collect();
            let codes = Series::new(field.name.as_str().into(), codes);
            df.with_column(field.retyped(DataType::Integer), codes)
        })
}
