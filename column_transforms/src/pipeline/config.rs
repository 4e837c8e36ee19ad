//! Pipeline configuration file support.
//!
//! A pipeline is described in TOML as an optional `name` and an ordered
//! list of `[[steps]]` tables, each selecting an operation with `op`.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::checksum::ChecksumAlgorithm;
use crate::error::{TransformError, TransformResult};
use crate::models::{Dataset, Value};
use crate::transformations::{self, as_str_slice};

/// Pipeline configuration from file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub steps: Vec<StepConfig>,
}

/// A literal as written in TOML. TOML has no null, so a literal always
/// has a concrete type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LiteralValue {
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl From<&LiteralValue> for Value {
    fn from(literal: &LiteralValue) -> Self {
        match literal {
            LiteralValue::Boolean(b) => Value::Boolean(*b),
            LiteralValue::Integer(i) => Value::Integer(*i),
            LiteralValue::Float(f) => Value::Float(*f),
            LiteralValue::Text(s) => Value::Text(s.clone()),
        }
    }
}

/// One constant column for `add_literal_columns`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LiteralColumn {
    pub name: String,
    pub value: LiteralValue,
}

/// A single pipeline step. Keys a step does not take are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case", deny_unknown_fields)]
pub enum StepConfig {
    Trim,
    ReplaceNull {
        value: LiteralValue,
        #[serde(default)]
        subset: Option<Vec<String>>,
    },
    Deduplicate {
        #[serde(default)]
        subset: Option<Vec<String>>,
    },
    UtcToLocal {
        timezone: String,
        #[serde(default)]
        subset: Option<Vec<String>>,
    },
    LocalToUtc {
        timezone: String,
        #[serde(default)]
        subset: Option<Vec<String>>,
    },
    ChangeTimezone {
        from: String,
        to: String,
        #[serde(default)]
        subset: Option<Vec<String>>,
    },
    DropColumns {
        columns: Vec<String>,
    },
    AddChecksum {
        column: String,
        #[serde(default)]
        algorithm: ChecksumAlgorithm,
    },
    JulianToCalendar {
        columns: Vec<String>,
    },
    CalendarToJulian {
        columns: Vec<String>,
    },
    AddLiteralColumns {
        columns: Vec<LiteralColumn>,
    },
}

impl StepConfig {
    /// The `op` name of this step.
    pub fn name(&self) -> &'static str {
        match self {
            StepConfig::Trim => "trim",
            StepConfig::ReplaceNull { .. } => "replace_null",
            StepConfig::Deduplicate { .. } => "deduplicate",
            StepConfig::UtcToLocal { .. } => "utc_to_local",
            StepConfig::LocalToUtc { .. } => "local_to_utc",
            StepConfig::ChangeTimezone { .. } => "change_timezone",
            StepConfig::DropColumns { .. } => "drop_columns",
            StepConfig::AddChecksum { .. } => "add_checksum",
            StepConfig::JulianToCalendar { .. } => "julian_to_calendar",
            StepConfig::CalendarToJulian { .. } => "calendar_to_julian",
            StepConfig::AddLiteralColumns { .. } => "add_literal_columns",
        }
    }

    /// Run this step on `dataset`.
    ///
    /// # Errors
    /// `InvalidTimezone` from the timezone steps on an unknown zone, and
    /// `ComputeError` if the dataframe engine fails.
    pub fn apply(&self, dataset: &Dataset) -> TransformResult<Dataset> {
        match self {
            StepConfig::Trim => transformations::trim(dataset),
            StepConfig::ReplaceNull { value, subset } => {
                let subset = subset.as_deref().map(as_str_slice);
                transformations::replace_null(dataset, &Value::from(value), subset.as_deref())
            }
            StepConfig::Deduplicate { subset } => {
                let subset = subset.as_deref().map(as_str_slice);
                transformations::deduplicate(dataset, subset.as_deref())
            }
            StepConfig::UtcToLocal { timezone, subset } => {
                let subset = subset.as_deref().map(as_str_slice);
                transformations::utc_to_local(dataset, timezone, subset.as_deref())
            }
            StepConfig::LocalToUtc { timezone, subset } => {
                let subset = subset.as_deref().map(as_str_slice);
                transformations::local_to_utc(dataset, timezone, subset.as_deref())
            }
            StepConfig::ChangeTimezone { from, to, subset } => {
                let subset = subset.as_deref().map(as_str_slice);
                transformations::change_timezone(dataset, from, to, subset.as_deref())
            }
            StepConfig::DropColumns { columns } => {
                Ok(transformations::drop_columns(dataset, &as_str_slice(columns)))
            }
            StepConfig::AddChecksum { column, algorithm } => {
                transformations::add_checksum_column_with(dataset, column, *algorithm)
            }
            StepConfig::JulianToCalendar { columns } => {
                transformations::julian_to_calendar(dataset, &as_str_slice(columns))
            }
            StepConfig::CalendarToJulian { columns } => {
                transformations::calendar_to_julian(dataset, &as_str_slice(columns))
            }
            StepConfig::AddLiteralColumns { columns } => {
                let literals: Vec<(String, Value)> = columns
                    .iter()
                    .map(|c| (c.name.clone(), Value::from(&c.value)))
                    .collect();
                transformations::add_literal_columns(dataset, &literals)
            }
        }
    }
}

impl PipelineConfig {
    /// Load a pipeline configuration from a TOML file.
    ///
    /// # Returns
    /// * `Ok(PipelineConfig)` if successful
    /// * `Err(TransformError::ConfigurationError)` if the file cannot be
    ///   read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> TransformResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            TransformError::ConfigurationError(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        Self::from_toml_str(&content).map_err(|e| match e {
            TransformError::ConfigurationError(msg) => {
                TransformError::ConfigurationError(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })
    }

    /// Parse a pipeline configuration from TOML text.
    ///
    /// Errors name the offending key path, e.g. `steps[1].columns`.
    pub fn from_toml_str(content: &str) -> TransformResult<Self> {
        let deserializer = toml::Deserializer::new(content);
        serde_path_to_error::deserialize(deserializer).map_err(|e| {
            TransformError::ConfigurationError(format!(
                "Failed to parse config at '{}': {}",
                e.path(),
                e.inner()
            ))
        })
    }

    /// Load the pipeline configuration from the default location.
    ///
    /// Searches for `transforms.toml` in:
    /// 1. Current directory
    /// 2. `column_transforms/` directory
    /// 3. Parent directory
    pub fn from_default_location() -> TransformResult<Self> {
        let search_paths = [
            PathBuf::from("transforms.toml"),
            PathBuf::from("column_transforms/transforms.toml"),
            PathBuf::from("../transforms.toml"),
        ];

        for path in &search_paths {
            if path.exists() {
                return Self::from_file(path);
            }
        }

        Err(TransformError::ConfigurationError(
            "No transforms.toml found in standard locations".to_string(),
        ))
    }
}
