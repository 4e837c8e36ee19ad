//! Loading and writing datasets as JSON.
//!
//! A dataset file carries its schema next to its records:
//!
//! ```json
//! { "schema": [ {"name": "id", "type": "integer", "nullable": false} ],
//!   "records": [ {"id": 1} ] }
//! ```
//!
//! # Example
//!
//! ```
//! use column_transforms::parsing::{dataset_to_json, parse_dataset_json_str};
//!
//! let df = parse_dataset_json_str(
//!     r#"{"schema": [{"name": "jdate", "type": "integer"}],
//!         "records": [{"jdate": 23100}, {"jdate": "99365"}]}"#,
//! )
//! .unwrap();
//! assert_eq!(df.height(), 2);
//! assert_eq!(dataset_to_json(&df).unwrap()["records"][1]["jdate"], 99365);
//! ```

pub mod json_parser;


pub use json_parser::{dataset_to_json, parse_dataset_json, parse_dataset_json_str, write_dataset_json};
