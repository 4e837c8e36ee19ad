use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::error::{TransformError, TransformResult};

/// Declared type of a dataset column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    #[serde(alias = "string")]
    Text,
    #[serde(alias = "int", alias = "long")]
    Integer,
    #[serde(alias = "double")]
    Float,
    #[serde(alias = "bool")]
    Boolean,
    Date,
    #[serde(alias = "datetime")]
    Timestamp,
}

impl DataType {
    /// Lower-case name, as used in dataset files.
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Text => "text",
            DataType::Integer => "integer",
            DataType::Float => "float",
            DataType::Boolean => "boolean",
            DataType::Date => "date",
            DataType::Timestamp => "timestamp",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named, typed column declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: DataType,
    #[serde(default = "default_nullable")]
    pub nullable: bool,
}

fn default_nullable() -> bool {
    true
}

impl Field {
    pub fn new(name: impl Into<String>, data_type: DataType, nullable: bool) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable,
        }
    }

    /// Same column name and nullability, different type.
    pub fn retyped(&self, data_type: DataType) -> Self {
        Self {
            name: self.name.clone(),
            data_type,
            nullable: self.nullable,
        }
    }
}

/// Ordered list of uniquely named fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Schema {
    fields: Vec<Field>,
}

impl Schema {
    /// Build a schema, rejecting duplicate column names.
    pub fn new(fields: Vec<Field>) -> TransformResult<Self> {
        let mut seen = HashSet::with_capacity(fields.len());
        for field in &fields {
            if !seen.insert(field.name.as_str()) {
                return Err(TransformError::SchemaError(format!(
                    "duplicate column name: {}",
                    field.name
                )));
            }
        }
        Ok(Self { fields })
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    pub fn names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    // Crate-internal mutators keep the uniqueness invariant; callers only
    // ever see schemas through `Dataset`, which returns fresh copies.

    pub(crate) fn set_field(&mut self, index: usize, field: Field) {
        self.fields[index] = field;
    }

    pub(crate) fn push_field(&mut self, field: Field) {
        debug_assert!(!self.contains(&field.name));
        self.fields.push(field);
    }

    pub(crate) fn retain_indices(&mut self, keep: &[bool]) {
        let mut i = 0;
        self.fields.retain(|_| {
            let kept = keep[i];
            i += 1;
            kept
        });
    }
}
