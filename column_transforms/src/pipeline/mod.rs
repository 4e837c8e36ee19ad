//! Configurable transformation pipelines.
//!
//! A [`PipelineConfig`] is loaded from TOML and run by a
//! [`TransformPipeline`], which applies each step in order and reports
//! row counts in a [`PipelineResult`].
//!
//! # Example
//!
//! ```
//! use column_transforms::pipeline::{PipelineConfig, TransformPipeline};
//!
//! let config = PipelineConfig::from_toml_str(
//!     r#"
//!     [[steps]]
//!     op = "julian_to_calendar"
//!     columns = ["jdate"]
//!     "#,
//! )
//! .unwrap();
//!
//! let result = TransformPipeline::new(config)
//!     .process_json_str(
//!         r#"{"schema": [{"name": "jdate", "type": "integer"}],
//!             "records": [{"jdate": 23100}]}"#,
//!     )
//!     .unwrap();
//! assert_eq!(result.rows_out, 1);
//! ```

pub mod config;
pub mod runner;

pub use config::{LiteralColumn, LiteralValue, PipelineConfig, StepConfig};
pub use runner::{PipelineResult, TransformPipeline};
