use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::Value;
use crate::error::{RebinError, RebinResult};

/// Row-major tabular input consumed by the views.
///
/// Column order must stay stable for the lifetime of a view.
pub trait DatasetSource {
    fn column_names(&self) -> &[String];
    fn rows(&self) -> &[Vec<Value>];

    /// Name of column `index`, or `UnknownColumn` when it does not exist.
    fn column_name(&self, index: usize) -> RebinResult<&str> {
        self.column_names()
            .get(index)
            .map(String::as_str)
            .ok_or(RebinError::UnknownColumn {
                index,
                available: self.column_names().len(),
            })
    }
}

/// Dataset held entirely in memory.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InMemoryDataset {
    column_names: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl InMemoryDataset {
    /// Creates a dataset; every row must have one cell per column.
    pub fn new(column_names: Vec<String>, rows: Vec<Vec<Value>>) -> RebinResult<Self> {
        if let Some((index, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != column_names.len())
        {
            return Err(RebinError::InvalidData(format!(
                "row {index} has {} cells, expected {}",
                row.len(),
                column_names.len()
            )));
        }
        Ok(Self { column_names, rows })
    }

    /// Parses `{"column_names": [...], "rows": [[...], ...]}`.
    pub fn from_json_str(input: &str) -> RebinResult<Self> {
        let parsed: Self = serde_json::from_str(input)
            .map_err(|e| RebinError::InvalidData(format!("failed to parse dataset: {e}")))?;
        Self::new(parsed.column_names, parsed.rows)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl DatasetSource for InMemoryDataset {
    fn column_names(&self) -> &[String] {
        &self.column_names
    }

    fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }
}

/// Cells of one column in row order.
pub fn column_values<D>(source: &D, index: usize) -> RebinResult<Vec<Value>>
where
    D: DatasetSource + ?Sized,
{
    source.column_name(index)?;
    Ok(source
        .rows()
        .iter()
        .filter_map(|row| row.get(index).cloned())
        .collect())
}

/// Finite numbers of one column in row order. Other cells are skipped.
pub fn numeric_column<D>(source: &D, index: usize) -> RebinResult<Vec<f64>>
where
    D: DatasetSource + ?Sized,
{
    source.column_name(index)?;
    let rows = source.rows();
    let values: Vec<f64> = rows
        .iter()
        .filter_map(|row| row.get(index).and_then(Value::as_f64))
        .filter(|value| value.is_finite())
        .collect();
    let skipped = rows.len() - values.len();
    if skipped > 0 {
        warn!(column = index, skipped, "skipped non-numeric cells");
    }
    Ok(values)
}
