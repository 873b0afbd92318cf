//! Bundle Writer Module
//! Persists the four competition files with a leading `id` column.

use polars::prelude::*;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

use crate::pipeline::Bundle;

pub const ID_COLUMN: &str = "id";
pub const TRAIN_FILE: &str = "train.csv";
pub const TEST_FILE: &str = "test.csv";
pub const SAMPLE_FILE: &str = "sample_submission.csv";
pub const SOLUTION_FILE: &str = "solution.csv";

#[derive(Error, Debug)]
pub enum WriterError {
    #[error("Failed to create {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write {path}: {source}")]
    Csv { path: PathBuf, source: PolarsError },
}

/// Locations of the files written for one bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundlePaths {
    pub train: PathBuf,
    pub test: PathBuf,
    pub sample: PathBuf,
    pub solution: PathBuf,
}

/// Writes bundles into a single output directory.
pub struct BundleWriter {
    output_dir: PathBuf,
}

impl BundleWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Write all four files. A failure part way through leaves earlier files in place.
    pub fn write(&self, bundle: &Bundle) -> Result<BundlePaths, WriterError> {
        fs::create_dir_all(&self.output_dir).map_err(|source| WriterError::Io {
            path: self.output_dir.clone(),
            source,
        })?;

        let paths = BundlePaths {
            train: self.output_dir.join(TRAIN_FILE),
            test: self.output_dir.join(TEST_FILE),
            sample: self.output_dir.join(SAMPLE_FILE),
            solution: self.output_dir.join(SOLUTION_FILE),
        };

        write_with_ids(&bundle.train, &paths.train)?;
        write_with_ids(&bundle.test, &paths.test)?;
        write_with_ids(&bundle.sample, &paths.sample)?;
        write_with_ids(&bundle.solution, &paths.solution)?;

        info!("wrote bundle to {}", self.output_dir.display());
        Ok(paths)
    }
}

/// Write `df` as comma-separated CSV, prefixed by a dense 0-based `id` column.
fn write_with_ids(df: &DataFrame, path: &Path) -> Result<(), WriterError> {
    let csv_err = |source: PolarsError| WriterError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut indexed = df.with_row_index(ID_COLUMN.into(), None).map_err(csv_err)?;
    let mut file = File::create(path).map_err(|source| WriterError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    CsvWriter::new(&mut file)
        .include_header(true)
        .with_separator(b',')
        .finish(&mut indexed)
        .map_err(csv_err)
}
