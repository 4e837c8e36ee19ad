//! Column selection shared by all transformations.
//!
//! Operations only touch columns that exist and have an accepted type.
//! Requested columns that fail either test are skipped rather than
//! reported as errors; every skip is logged at `debug` level so the
//! behaviour can be traced.

use log::debug;

use crate::models::{DataType, Field, Schema};

/// Which columns an operation applies to.
#[derive(Debug, Clone, Copy)]
pub struct ColumnFilter<'a> {
    accepted: &'a [DataType],
    subset: Option<&'a [&'a str]>,
    nullable_only: bool,
}

impl<'a> ColumnFilter<'a> {
    /// Every column whose type is one of `accepted`.
    pub fn of_types(accepted: &'a [DataType]) -> Self {
        Self {
            accepted,
            subset: None,
            nullable_only: false,
        }
    }

    /// Restrict to the named columns (`None` keeps every column).
    pub fn within(mut self, subset: Option<&'a [&'a str]>) -> Self {
        self.subset = subset;
        self
    }

    /// Restrict to columns declared nullable.
    pub fn nullable_only(mut self) -> Self {
        self.nullable_only = true;
        self
    }

    fn accepts(&self, field: &Field) -> bool {
        self.accepted.contains(&field.data_type) && (!self.nullable_only || field.nullable)
    }

    /// Resolve the filter against a schema. Result is in schema order.
    pub fn select(&self, schema: &Schema) -> Vec<Field> {
        if let Some(subset) = self.subset {
            for name in subset {
                match schema.field(name) {
                    None => debug!("Skipping column '{}': not in schema", name),
                    Some(field) if !self.accepts(field) => debug!(
                        "Skipping column '{}': {}{} column not accepted",
                        name,
                        if field.nullable { "nullable " } else { "" },
                        field.data_type
                    ),
                    Some(_) => {}
                }
            }
        }

        schema
            .fields()
            .iter()
            .filter(|field| self.accepts(field))
            .filter(|field| {
                self.subset
                    .map_or(true, |subset| subset.contains(&field.name.as_str()))
            })
            .cloned()
            .collect()
    }
}

/// Convert owned column names into the borrowed form the filters take.
pub fn as_str_slice(names: &[String]) -> Vec<&str> {
    names.iter().map(String::as_str).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> Schema {
        Schema::new(vec![
            Field::new("code", DataType::Integer, true),
            Field::new("label", DataType::Text, true),
            Field::new("count", DataType::Integer, false),
            Field::new("shipped", DataType::Date, true),
        ])
        .unwrap()
    }

    fn names(fields: &[Field]) -> Vec<&str> {
        fields.iter().map(|f| f.name.as_str()).collect()
    }

    #[test]
    fn test_types_only() {
        let selected = ColumnFilter::of_types(&[DataType::Integer]).select(&schema());
        assert_eq!(names(&selected), vec!["code", "count"]);
    }

    #[test]
    fn test_subset_skips_missing_and_mistyped() {
        let subset = ["label", "missing", "count"];
        let selected = ColumnFilter::of_types(&[DataType::Integer])
            .within(Some(&subset))
            .select(&schema());
        assert_eq!(names(&selected), vec!["count"]);
    }

    #[test]
    fn test_nullable_only() {
        let selected = ColumnFilter::of_types(&[DataType::Integer])
            .nullable_only()
            .select(&schema());
        assert_eq!(names(&selected), vec!["code"]);
    }

    #[test]
    fn test_result_follows_schema_order() {
        let subset = ["shipped", "code"];
        let selected = ColumnFilter::of_types(&[DataType::Integer, DataType::Date])
            .within(Some(&subset))
            .select(&schema());
        assert_eq!(names(&selected), vec!["code", "shipped"]);
    }
}
