//! Typed datasets on top of a polars `DataFrame`.
//!
//! `Dataset` pairs a frame with the [`Schema`] that declares each column's
//! [`DataType`](super::DataType) and nullability. The frame stores every
//! column in the polars type given by [`columns::polars_type`]; both are
//! kept in step by every method here. All methods have value semantics and
//! return a new dataset.

use polars::prelude::*;

use super::columns::{self, data_type_of, describe, polars_type};
use super::schema::{Field, Schema};
use super::value::Value;
use crate::error::{TransformError, TransformResult};

/// One row, positionally aligned with the owning dataset's schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    values: Vec<Value>,
}

impl Record {
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<Vec<Value>> for Record {
    fn from(values: Vec<Value>) -> Self {
        Self::new(values)
    }
}

/// A typed, immutable table.
#[derive(Debug, Clone)]
pub struct Dataset {
    schema: Schema,
    frame: DataFrame,
}

impl Default for Dataset {
    fn default() -> Self {
        Self {
            schema: Schema::default(),
            frame: DataFrame::empty(),
        }
    }
}

impl Dataset {
    /// Create a dataset, checking every record against the schema.
    ///
    /// # Errors
    /// * `SchemaError` if a record's length differs from the schema's
    /// * `TypeMismatch` if a value does not match its column type
    /// * `NullViolation` if a non-nullable column holds `Null`
    pub fn new(schema: Schema, records: Vec<Record>) -> TransformResult<Self> {
        for (row, record) in records.iter().enumerate() {
            if record.len() != schema.len() {
                return Err(TransformError::SchemaError(format!(
                    "record {} has {} values, schema has {} columns",
                    row,
                    record.len(),
                    schema.len()
                )));
            }
            for (field, value) in schema.fields().iter().zip(record.values()) {
                if !value.fits(field.data_type) {
                    return Err(TransformError::TypeMismatch {
                        column: field.name.clone(),
                        expected: field.data_type,
                        found: value.type_name().to_string(),
                    });
                }
                if value.is_null() && !field.nullable {
                    return Err(TransformError::NullViolation(field.name.clone()));
                }
            }
        }

        let frame_columns = schema
            .fields()
            .iter()
            .enumerate()
            .map(|(i, field)| {
                let values = records.iter().map(|r| &r.values[i]);
                columns::values_to_series(&field.name, field.data_type, values).map(Column::from)
            })
            .collect::<PolarsResult<Vec<_>>>()?;

        Ok(Self {
            schema,
            frame: DataFrame::new(frame_columns)?,
        })
    }

    /// Wrap an existing frame. Every column becomes nullable; integer,
    /// float and datetime columns are widened to the stored types.
    ///
    /// # Errors
    /// `SchemaError` if a column has a type with no [`DataType`](super::DataType).
    pub fn from_frame(frame: DataFrame) -> TransformResult<Self> {
        let mut fields = Vec::with_capacity(frame.width());
        let mut stored = Vec::with_capacity(frame.width());
        for column in frame.get_columns() {
            let data_type = data_type_of(column.dtype()).ok_or_else(|| {
                TransformError::SchemaError(format!(
                    "column '{}' has unsupported type {}",
                    column.name(),
                    column.dtype()
                ))
            })?;
            fields.push(Field::new(column.name().as_str(), data_type, true));
            stored.push(column.cast(&polars_type(data_type))?);
        }

        Ok(Self {
            schema: Schema::new(fields)?,
            frame: DataFrame::new(stored)?,
        })
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// The underlying frame.
    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn into_frame(self) -> DataFrame {
        self.frame
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.frame.height()
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.schema.len()
    }

    /// The named column as a series, `None` if it does not exist.
    pub fn series(&self, name: &str) -> Option<&Series> {
        self.frame
            .column(name)
            .ok()
            .map(Column::as_materialized_series)
    }

    /// All values of a column, in row order.
    ///
    /// # Errors
    /// `SchemaError` if the column does not exist.
    pub fn column(&self, name: &str) -> TransformResult<Vec<Value>> {
        let (field, series) = self.field_and_series(name)?;
        Ok(columns::series_to_values(series, field.data_type)?)
    }

    /// A single cell, `None` if the row or column does not exist.
    pub fn value(&self, row: usize, name: &str) -> Option<Value> {
        if row >= self.height() {
            return None;
        }
        let (field, series) = self.field_and_series(name).ok()?;
        let cell = series.slice(row as i64, 1);
        columns::series_to_values(&cell, field.data_type)
            .ok()?
            .into_iter()
            .next()
    }

    /// Every row, materialized.
    pub fn records(&self) -> TransformResult<Vec<Record>> {
        let mut records: Vec<Record> = (0..self.height())
            .map(|_| Record::new(Vec::with_capacity(self.width())))
            .collect();
        for field in self.schema.fields() {
            for (record, value) in records.iter_mut().zip(self.column(&field.name)?) {
                record.values.push(value);
            }
        }
        Ok(records)
    }

    fn field_and_series(&self, name: &str) -> TransformResult<(&Field, &Series)> {
        let field = self
            .schema
            .field(name)
            .ok_or_else(|| TransformError::SchemaError(format!("no column named '{}'", name)))?;
        let series = self.frame.column(name)?.as_materialized_series();
        Ok((field, series))
    }

    /// Store `series` under `field`.
    ///
    /// A column with the same name is replaced at its current position;
    /// otherwise the column is appended. A series of a narrower type that
    /// maps to the field's type is widened. If the series holds nulls for
    /// a field declared non-nullable, the stored field is marked nullable.
    ///
    /// # Errors
    /// * `TypeMismatch` if the series type does not map to the field's type
    /// * `SchemaError` if its length differs from the dataset's height
    pub fn with_column(&self, field: Field, series: Series) -> TransformResult<Dataset> {
        if self.width() > 0 && series.len() != self.height() {
            return Err(TransformError::SchemaError(format!(
                "column '{}' has {} rows, dataset has {}",
                field.name,
                series.len(),
                self.height()
            )));
        }
        let series = conform(&field, series)?.with_name(field.name.as_str().into());

        let mut field = field;
        if series.null_count() > 0 {
            field.nullable = true;
        }

        let mut frame = self.frame.clone();
        frame.with_column(series)?;

        let mut schema = self.schema.clone();
        match schema.index_of(&field.name) {
            Some(i) => schema.set_field(i, field),
            None => schema.push_field(field),
        }

        Ok(Dataset { schema, frame })
    }

    /// Evaluate polars expressions and store each result under its field.
    ///
    /// Same placement, type and nullability rules as [`Dataset::with_column`].
    /// Every expression sees the input columns, not the other results.
    pub fn with_exprs(&self, updates: Vec<(Field, Expr)>) -> TransformResult<Dataset> {
        if updates.is_empty() {
            return Ok(self.clone());
        }

        let exprs: Vec<Expr> = updates
            .iter()
            .map(|(field, expr)| expr.clone().alias(field.name.as_str()))
            .collect();
        let evaluated = self.frame.clone().lazy().with_columns(exprs).collect()?;

        updates.into_iter().try_fold(self.clone(), |dataset, (field, _)| {
            let series = evaluated.column(&field.name)?.as_materialized_series().clone();
            dataset.with_column(field, series)
        })
    }

    /// Store a constant under `field`.
    pub fn with_literal(&self, field: Field, value: Value) -> TransformResult<Dataset> {
        if !value.fits(field.data_type) {
            return Err(TransformError::TypeMismatch {
                column: field.name.clone(),
                expected: field.data_type,
                found: value.type_name().to_string(),
            });
        }
        let values = vec![value; self.height()];
        let series = columns::values_to_series(&field.name, field.data_type, &values)?;
        self.with_column(field, series)
    }

    /// Drop the named columns. Names not in the schema are ignored.
    pub fn drop_columns(&self, names: &[&str]) -> Dataset {
        let keep: Vec<bool> = self
            .schema
            .fields()
            .iter()
            .map(|f| !names.contains(&f.name.as_str()))
            .collect();

        if keep.iter().all(|k| *k) {
            return self.clone();
        }

        let dropped = self
            .schema
            .fields()
            .iter()
            .zip(&keep)
            .filter(|(_, k)| !**k)
            .map(|(f, _)| f.name.as_str());

        let mut schema = self.schema.clone();
        schema.retain_indices(&keep);

        Dataset {
            schema,
            frame: self.frame.drop_many(dropped),
        }
    }

    /// Rename a column. An unknown `from` is a no-op.
    ///
    /// # Errors
    /// `SchemaError` if `to` already names a different column.
    pub fn rename_column(&self, from: &str, to: &str) -> TransformResult<Dataset> {
        let Some(index) = self.schema.index_of(from) else {
            return Ok(self.clone());
        };
        if from == to {
            return Ok(self.clone());
        }
        if self.schema.contains(to) {
            return Err(TransformError::SchemaError(format!(
                "cannot rename '{}' to '{}': column already exists",
                from, to
            )));
        }

        let mut frame = self.frame.clone();
        frame.rename(from, to.into())?;

        let mut schema = self.schema.clone();
        let mut field = schema.fields()[index].clone();
        field.name = to.to_string();
        schema.set_field(index, field);

        Ok(Dataset { schema, frame })
    }

    /// Remove duplicate rows, keeping the first occurrence of each key and
    /// the original row order.
    ///
    /// `None` compares whole rows. With `Some(names)`, unknown names are
    /// ignored; if none of them resolve, the dataset is returned as is.
    pub fn distinct(&self, subset: Option<&[&str]>) -> TransformResult<Dataset> {
        let key: Option<Vec<String>> = subset.map(|names| {
            names
                .iter()
                .filter(|name| self.schema.contains(name))
                .map(|name| name.to_string())
                .collect()
        });
        if self.width() == 0 || key.as_ref().is_some_and(Vec::is_empty) {
            return Ok(self.clone());
        }

        let frame = self
            .frame
            .unique_stable(key.as_deref(), UniqueKeepStrategy::First, None)?;

        Ok(Dataset {
            schema: self.schema.clone(),
            frame,
        })
    }
}

/// Check that `series` can be stored under `field`, widening it if needed.
fn conform(field: &Field, series: Series) -> TransformResult<Series> {
    let stored = polars_type(field.data_type);
    if series.dtype() == &stored {
        return Ok(series);
    }
    if data_type_of(series.dtype()) == Some(field.data_type) {
        return Ok(series.cast(&stored)?);
    }
    Err(TransformError::TypeMismatch {
        column: field.name.clone(),
        expected: field.data_type,
        found: describe(series.dtype()),
    })
}

impl PartialEq for Dataset {
    /// Same schema and the same values row by row. Float cells compare as
    /// [`Value`]s do, so NaN equals NaN.
    fn eq(&self, other: &Self) -> bool {
        if self.schema != other.schema || self.height() != other.height() {
            return false;
        }
        match (self.records(), other.records()) {
            (Ok(ours), Ok(theirs)) => ours == theirs,
            _ => false,
        }
    }
}
