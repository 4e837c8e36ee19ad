//! Column transformations over a [`Dataset`](crate::models::Dataset).
//!
//! Every operation takes the dataset by reference and returns a new one;
//! the input is never modified. Operations are polars expressions or
//! column maps over the dataset's frame. Column selections that name unknown or
//! mistyped columns skip them instead of failing.
//!
//! # Modules
//!
//! - [`cleaning`]: trim text, fill nulls, remove duplicates, drop columns
//! - [`dates`]: convert between Julian codes and calendar dates
//! - [`timezones`]: shift timestamp columns between zones
//! - [`enrichment`]: add row checksums and literal columns
//!
//! # Example
//!
//! ```
//! use column_transforms::models::{DataType, Dataset, Field, Record, Schema, Value};
//! use column_transforms::transformations::{julian_to_calendar, trim};
//!
//! let schema = Schema::new(vec![
//!     Field::new("order_jdate", DataType::Integer, true),
//!     Field::new("customer", DataType::Text, true),
//! ])
//! .unwrap();
//! let df = Dataset::new(
//!     schema,
//!     vec![Record::new(vec![Value::Integer(23100), Value::from(" acme ")])],
//! )
//! .unwrap();
//!
//! let out = julian_to_calendar(&trim(&df).unwrap(), &["order_jdate"]).unwrap();
//! assert_eq!(out.value(0, "customer"), Some(Value::from("acme")));
//! assert_eq!(out.schema().field("order_jdate").unwrap().data_type, DataType::Date);
//! ```

pub mod cleaning;
pub mod dates;
pub mod enrichment;
pub mod selection;
pub mod timezones;

pub use cleaning::{deduplicate, drop_columns, replace_null, trim};
pub use dates::{calendar_to_julian, julian_to_calendar};
pub use enrichment::{add_checksum_column, add_checksum_column_with, add_literal_columns};
pub use selection::{as_str_slice, ColumnFilter};
pub use timezones::{change_timezone, local_to_utc, utc_to_local};
