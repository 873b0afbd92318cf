//! Data Processor Module
//! Column pruning and the test-side views released with a bundle.

use polars::prelude::*;
use thiserror::Error;
use tracing::debug;

use super::loader::DataLoader;

/// Name of the public/private marker column in the solution file.
pub const USAGE_COLUMN: &str = "Usage";

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Column `{0}` not found")]
    MissingColumn(String),
    #[error("Label column `{0}` was already removed from the test set")]
    LabelAlreadyStripped(String),
}

/// Handles column removal and projection of the test partition.
pub struct DataProcessor;

impl DataProcessor {
    /// Drop every named column. All names must be present.
    pub fn drop_columns(df: &DataFrame, columns: &[String]) -> Result<DataFrame, ProcessorError> {
        if let Some(missing) = columns.iter().find(|c| !DataLoader::has_column(df, c)) {
            return Err(ProcessorError::MissingColumn(missing.clone()));
        }

        let mut out = df.clone();
        let mut dropped: Vec<&str> = Vec::with_capacity(columns.len());
        for name in columns {
            if dropped.contains(&name.as_str()) {
                continue;
            }
            out = out.drop(name)?;
            dropped.push(name);
        }
        if !columns.is_empty() {
            debug!("dropped columns {:?}", columns);
        }
        Ok(out)
    }

    /// Placeholder submission: the label column with every value set to `default_value`.
    ///
    /// The placeholder is cast to the label's dtype when it parses as one,
    /// otherwise the column is written as text.
    pub fn build_sample(
        test: &DataFrame,
        label: &str,
        default_value: &str,
    ) -> Result<DataFrame, ProcessorError> {
        let mut sample = Self::project_label(test, label)?;
        let dtype = sample.column(label)?.dtype().clone();

        let placeholder = Series::new(label.into(), vec![default_value; sample.height()]);
        let placeholder = placeholder.strict_cast(&dtype).unwrap_or(placeholder);

        sample.with_column(placeholder)?;
        Ok(sample)
    }

    /// Ground truth: the true label plus an empty `Usage` column.
    pub fn build_solution(test: &DataFrame, label: &str) -> Result<DataFrame, ProcessorError> {
        let mut solution = Self::project_label(test, label)?;
        let usage = Column::new(USAGE_COLUMN.into(), vec![""; solution.height()]);
        solution.with_column(usage)?;
        Ok(solution)
    }

    /// Remove the label from the test partition, leaving features only.
    pub fn strip_label(test: &DataFrame, label: &str) -> Result<DataFrame, ProcessorError> {
        if !DataLoader::has_column(test, label) {
            return Err(ProcessorError::LabelAlreadyStripped(label.to_string()));
        }
        Ok(test.drop(label)?)
    }

    fn project_label(test: &DataFrame, label: &str) -> Result<DataFrame, ProcessorError> {
        if !DataLoader::has_column(test, label) {
            return Err(ProcessorError::MissingColumn(label.to_string()));
        }
        Ok(test.select([label])?)
    }
}
