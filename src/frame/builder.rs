//! Conversion of result tables and series into frames.

use tracing::debug;

use super::{resolve_field_type, Field, FieldType, OutputFrame};
use crate::error::{FramesError, Result};
use crate::query::DEFAULT_TIME_COLUMN;
use crate::result::{lookup_declared_type, ColumnDescriptor, ResultSeries, ResultTable};

/// Builds one frame from `table`, one field per column in column order.
///
/// `time_column` is the column forced to `Time`; pass `None` to type purely
/// from `meta`. `table_index` only labels errors.
///
/// Fails with [`FramesError::MalformedTable`] if any row's length differs
/// from the column count.
pub fn build_table_frame(
    table: &ResultTable,
    meta: &[ColumnDescriptor],
    ref_id: &str,
    time_column: Option<&str>,
    table_index: usize,
) -> Result<OutputFrame> {
    let width = table.columns.len();
    if let Some((row_index, row)) = table
        .rows
        .iter()
        .enumerate()
        .find(|(_, row)| row.len() != width)
    {
        return Err(FramesError::malformed_table(
            ref_id,
            table_index,
            format!(
                "row {row_index} has {} cells, expected {width}",
                row.len()
            ),
        ));
    }

    let fields = table
        .columns
        .iter()
        .enumerate()
        .map(|(column_index, column)| {
            let declared = lookup_declared_type(meta, &column.text);
            let field_type = resolve_field_type(&column.text, declared, time_column);
            let values = table
                .rows
                .iter()
                .map(|row| row[column_index].clone())
                .collect();
            Field::new(column.text.clone(), field_type, values)
        })
        .collect::<Vec<_>>();

    debug!(
        ref_id,
        table = table_index,
        columns = width,
        rows = table.rows.len(),
        "Built table frame"
    );

    Ok(OutputFrame {
        ref_id: ref_id.to_string(),
        name: None,
        fields,
    })
}

/// Builds a two-field frame (time, value) from one series.
pub fn build_series_frame(series: &ResultSeries, ref_id: &str) -> OutputFrame {
    let (values, timestamps): (Vec<_>, Vec<_>) = series.points.iter().cloned().unzip();

    OutputFrame {
        ref_id: ref_id.to_string(),
        name: Some(series.name.clone()),
        fields: vec![
            Field::new(DEFAULT_TIME_COLUMN, FieldType::Time, timestamps),
            Field::new(series.name.clone(), FieldType::Number, values),
        ],
    }
}
