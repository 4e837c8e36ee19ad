use log::debug;
use polars::prelude::{col, concat_str, Column, DataFrame, Expr, IntoLazy, NamedFrom, Series};

use crate::checksum::{calculate_checksum, ChecksumAlgorithm, FIELD_SEPARATOR};
use crate::error::TransformResult;
use crate::models::{DataType, Dataset, Field, Value};

/// Add a SHA-1 row checksum column named `column`.
///
/// See [`add_checksum_column_with`].
pub fn add_checksum_column(dataset: &Dataset, column: &str) -> TransformResult<Dataset> {
    add_checksum_column_with(dataset, column, ChecksumAlgorithm::Sha1)
}

/// Add a row checksum column computed with `algorithm`.
///
/// Every column takes part, in schema order, nulls skipped, values joined
/// with `~~` after rendering them as [`Value::render`] does. If `column`
/// already exists its current value is hashed too and then replaced.
pub fn add_checksum_column_with(
    dataset: &Dataset,
    column: &str,
    algorithm: ChecksumAlgorithm,
) -> TransformResult<Dataset> {
    debug!("Adding {:?} checksum column '{}'", algorithm, column);

    let rendered = rendered_frame(dataset)?;
    let joined: Vec<String> = if rendered.width() == 0 {
        vec![String::new(); dataset.height()]
    } else {
        let parts: Vec<Expr> = rendered
            .get_column_names()
            .into_iter()
            .map(|name| col(name.as_str()))
            .collect();
        let concatenated = rendered
            .lazy()
            .select([concat_str(parts, FIELD_SEPARATOR, true).alias(column)])
            .collect()?;
        concatenated
            .column(column)?
            .str()?
            .into_iter()
            .map(|row| row.unwrap_or_default().to_string())
            .collect()
    };

    let checksums: Vec<String> = joined
        .iter()
        .map(|row| calculate_checksum(row, algorithm))
        .collect();
    dataset.with_column(
        Field::new(column, DataType::Text, false),
        Series::new(column.into(), checksums),
    )
}

/// Every column of `dataset` as text, rendered for hashing. Column names
/// are positional so a dataset column may share the checksum's name.
fn rendered_frame(dataset: &Dataset) -> TransformResult<DataFrame> {
    let columns = dataset
        .schema()
        .fields()
        .iter()
        .enumerate()
        .map(|(i, field)| -> TransformResult<Column> {
            let texts: Vec<Option<String>> = dataset
                .column(&field.name)?
                .iter()
                .map(Value::render)
                .collect();
            Ok(Column::from(Series::new(format!("c{}", i).into(), texts)))
        })
        .collect::<TransformResult<Vec<_>>>()?;
    Ok(DataFrame::new(columns)?)
}

/// Add one constant column per `(name, value)` pair, in order.
///
/// The column type follows the value; a null literal gives a nullable
/// text column. Existing columns with the same name are overwritten.
pub fn add_literal_columns(
    dataset: &Dataset,
    columns: &[(String, Value)],
) -> TransformResult<Dataset> {
    columns.iter().try_fold(dataset.clone(), |df, (name, value)| {
        let field = match value.data_type() {
            Some(data_type) => Field::new(name.as_str(), data_type, false),
            None => Field::new(name.as_str(), DataType::Text, true),
        };
        debug!("Adding literal column '{}' = {:?}", name, value);
        df.with_literal(field, value.clone())
    })
}
