//! Split module - stratified train/test partitioning and Usage assignment

mod stratified;
mod usage;

pub use stratified::{StratifiedSplitter, TrainTest};
pub use usage::{UsageStratifier, UsageTag};

use polars::prelude::*;
use std::collections::HashMap;
use thiserror::Error;

use crate::data::DataLoader;

#[derive(Error, Debug)]
pub enum SplitError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Label column `{0}` not found")]
    MissingLabel(String),
    #[error("Label column `{column}` is null at row {row}")]
    NullLabel { column: String, row: usize },
    #[error("Cannot split an empty table")]
    EmptyTable,
    #[error("{name} ratio must be in {range}, got {value}")]
    RatioOutOfRange {
        name: &'static str,
        range: &'static str,
        value: f64,
    },
    #[error("Label value `{label}` has only {count} row(s); at least 2 are needed to stratify")]
    ClassTooSmall { label: String, count: usize },
    #[error("{partition} partition of {size} row(s) cannot hold all {classes} label values")]
    PartitionTooSmall {
        partition: &'static str,
        size: usize,
        classes: usize,
    },
}

/// Row positions sharing one label value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelGroup {
    pub value: String,
    pub rows: Vec<usize>,
}

/// Group row positions by label value, in order of first appearance.
///
/// Values are compared by their text rendering so integer and string labels
/// group the same way.
pub fn group_by_label(df: &DataFrame, label: &str) -> Result<Vec<LabelGroup>, SplitError> {
    if !DataLoader::has_column(df, label) {
        return Err(SplitError::MissingLabel(label.to_string()));
    }

    let as_text = df.column(label)?.cast(&DataType::String)?;
    let values = as_text.as_materialized_series().str()?;

    let mut groups: Vec<LabelGroup> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for (row, value) in values.into_iter().enumerate() {
        let value = value.ok_or_else(|| SplitError::NullLabel {
            column: label.to_string(),
            row,
        })?;
        match index.get(value) {
            Some(&g) => groups[g].rows.push(row),
            None => {
                index.insert(value, groups.len());
                groups.push(LabelGroup {
                    value: value.to_string(),
                    rows: vec![row],
                });
            }
        }
    }

    Ok(groups)
}
