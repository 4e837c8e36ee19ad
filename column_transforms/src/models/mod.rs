//! Tabular data model: column types, schemas, cell values and the
//! polars-backed `Dataset` the transformations run on.
//!
//! # Example
//!
//! ```
//! use column_transforms::models::{DataType, Dataset, Field, Record, Schema, Value};
//!
//! let schema = Schema::new(vec![
//!     Field::new("id", DataType::Integer, false),
//!     Field::new("name", DataType::Text, true),
//! ])
//! .unwrap();
//! let dataset = Dataset::new(
//!     schema,
//!     vec![Record::new(vec![Value::Integer(1), Value::from("a")])],
//! )
//! .unwrap();
//! assert_eq!(dataset.height(), 1);
//! ```

pub mod columns;
pub mod dataset;
pub mod schema;
pub mod value;


pub use dataset::{Dataset, Record};
pub use schema::{DataType, Field, Schema};
pub use value::{
    parse_date, parse_timestamp, parse_timestamp_lenient, Value, DATE_FORMAT, TIMESTAMP_FORMAT,
};
