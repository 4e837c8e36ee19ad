//! Column-oriented transformations over tabular datasets.
//!
//! The crate bundles small, composable column operations: trimming text,
//! type-directed null substitution, de-duplication, timezone shifts, row
//! checksums, literal columns, column drops, and conversion between
//! compact Julian date codes (`YYDDD` / `YYYYDDD`) and calendar dates.
//!
//! Every transformation takes a [`Dataset`](models::Dataset) by reference
//! and returns a new one. Pipelines of transformations can be described in
//! TOML and run with [`TransformPipeline`](pipeline::TransformPipeline).

pub mod checksum;
pub mod error;
pub mod models;
pub mod parsing;
pub mod pipeline;
pub mod time;
pub mod transformations;

pub use error::{TransformError, TransformResult};
pub use models::{DataType, Dataset, Field, Record, Schema, Value};
pub use pipeline::{PipelineConfig, PipelineResult, TransformPipeline};
