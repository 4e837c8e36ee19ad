//! Timezone shifts of timestamp columns.
//!
//! Timestamps carry no zone: a shift rewrites the wall clock reading. The
//! zone rules, including how gaps and overlaps around DST changes resolve,
//! live in [`crate::time::zones`], and each column is mapped through them.

use chrono::NaiveDateTime;
use log::debug;

use crate::error::TransformResult;
use crate::models::columns::{series_timestamps, timestamp_series};
use crate::models::{DataType, Dataset};
use crate::time::Zone;
use crate::transformations::selection::ColumnFilter;

/// Treat timestamp columns as UTC and render them in `local_timezone`.
///
/// # Errors
/// `InvalidTimezone` if the zone cannot be parsed.
pub fn utc_to_local(
    dataset: &Dataset,
    local_timezone: &str,
    subset: Option<&[&str]>,
) -> TransformResult<Dataset> {
    let zone: Zone = local_timezone.parse()?;
    shift_timestamps(dataset, subset, move |ts| zone.shift_from_utc(ts))
}

/// Treat timestamp columns as wall clock time in `local_timezone` and
/// render them in UTC.
///
/// # Errors
/// `InvalidTimezone` if the zone cannot be parsed.
pub fn local_to_utc(
    dataset: &Dataset,
    local_timezone: &str,
    subset: Option<&[&str]>,
) -> TransformResult<Dataset> {
    let zone: Zone = local_timezone.parse()?;
    shift_timestamps(dataset, subset, move |ts| zone.shift_to_utc(ts))
}

/// Move timestamp columns from one zone's wall clock to another's.
///
/// # Errors
/// `InvalidTimezone` if either zone cannot be parsed. Both are checked
/// before any column is touched.
pub fn change_timezone(
    dataset: &Dataset,
    from_timezone: &str,
    to_timezone: &str,
    subset: Option<&[&str]>,
) -> TransformResult<Dataset> {
    let from: Zone = from_timezone.parse()?;
    let to: Zone = to_timezone.parse()?;
    shift_timestamps(dataset, subset, move |ts| {
        to.shift_from_utc(from.shift_to_utc(ts))
    })
}

fn shift_timestamps<F>(
    dataset: &Dataset,
    subset: Option<&[&str]>,
    shift: F,
) -> TransformResult<Dataset>
where
    F: Fn(NaiveDateTime) -> NaiveDateTime,
{
    ColumnFilter::of_types(&[DataType::Timestamp])
        .within(subset)
        .select(dataset.schema())
        .into_iter()
        .try_fold(dataset.clone(), |df, field| {
            debug!("Shifting timezone of column '{}'", field.name);
            let Some(series) = df.series(&field.name) else {
                return Ok(df);
            };
            let shifted = timestamp_series(
                &field.name,
                series_timestamps(series)?
                    .into_iter()
                    .map(|ts| ts.map(&shift)),
            )?;
            df.with_column(field, shifted)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransformError;
    use crate::models::{Field, Record, Schema, Value};
    use chrono::NaiveDate;

    fn ts(y: i32, mo: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn events() -> Dataset {
        let schema = Schema::new(vec![
            Field::new("created", DataType::Timestamp, true),
            Field::new("updated", DataType::Timestamp, true),
            Field::new("day", DataType::Date, true),
        ])
        .unwrap();
        Dataset::new(
            schema,
            vec![
                Record::new(vec![
                    Value::Timestamp(ts(2023, 1, 15, 12)),
                    Value::Timestamp(ts(2023, 7, 15, 12)),
                    Value::Date(NaiveDate::from_ymd_opt(2023, 1, 15).unwrap()),
                ]),
                Record::new(vec![Value::Null, Value::Timestamp(ts(2023, 7, 15, 23)), Value::Null]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_utc_to_local_all_timestamp_columns() {
        let out = utc_to_local(&events(), "America/New_York", None).unwrap();
        assert_eq!(out.value(0, "created"), Some(Value::Timestamp(ts(2023, 1, 15, 7))));
        assert_eq!(out.value(0, "updated"), Some(Value::Timestamp(ts(2023, 7, 15, 8))));
        assert_eq!(out.value(1, "created"), Some(Value::Null));
        assert_eq!(out.value(0, "day"), events().value(0, "day"));
    }

    #[test]
    fn test_fixed_offset_keeps_fractional_seconds() {
        let created = ts(2023, 1, 15, 12) + chrono::Duration::microseconds(250_000);
        let schema = Schema::new(vec![Field::new("created", DataType::Timestamp, false)]).unwrap();
        let df = Dataset::new(schema, vec![Record::new(vec![Value::Timestamp(created)])]).unwrap();

        let out = utc_to_local(&df, "+05:30", None).unwrap();
        let expected = ts(2023, 1, 15, 17) + chrono::Duration::microseconds(1_800_250_000);
        assert_eq!(out.value(0, "created"), Some(Value::Timestamp(expected)));
        assert!(!out.schema().field("created").unwrap().nullable);
    }

    #[test]
    fn test_local_to_utc_subset() {
        let out = local_to_utc(&events(), "Asia/Tokyo", Some(&["updated", "day"])).unwrap();
        assert_eq!(out.value(0, "created"), Some(Value::Timestamp(ts(2023, 1, 15, 12))));
        assert_eq!(out.value(0, "updated"), Some(Value::Timestamp(ts(2023, 7, 15, 3))));
        assert_eq!(out.value(1, "updated"), Some(Value::Timestamp(ts(2023, 7, 15, 14))));
    }

    #[test]
    fn test_change_timezone() {
        let out = change_timezone(&events(), "Asia/Tokyo", "Europe/London", None).unwrap();
        // 12:00 JST = 03:00 UTC = 03:00 GMT
        assert_eq!(out.value(0, "created"), Some(Value::Timestamp(ts(2023, 1, 15, 3))));
        // 12:00 JST = 03:00 UTC = 04:00 BST
        assert_eq!(out.value(0, "updated"), Some(Value::Timestamp(ts(2023, 7, 15, 4))));
    }

    #[test]
    fn test_invalid_timezone_is_an_error() {
        let result = change_timezone(&events(), "UTC", "Not/AZone", None);
        assert_eq!(result, Err(TransformError::InvalidTimezone("Not/AZone".to_string())));
    }
}
