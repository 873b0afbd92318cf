//! CSV Data Loader Module
//! Handles delimited file loading using Polars.

use polars::prelude::*;
use std::fs::File;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Rows sampled for dtype inference.
const INFER_SCHEMA_ROWS: usize = 10_000;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Malformed CSV {path}: {source}")]
    Malformed { path: PathBuf, source: csv::Error },
    #[error("Failed to parse CSV {path}: {source}")]
    Parse { path: PathBuf, source: PolarsError },
}

/// Loads a labeled dataset from delimited text.
pub struct DataLoader;

impl DataLoader {
    /// Load a CSV file with a header row and the given field separator.
    ///
    /// Malformed rows are fatal: every record must have as many fields as
    /// the header, and the reader does not skip parse errors.
    pub fn load_csv(path: &Path, separator: u8) -> Result<DataFrame, LoaderError> {
        Self::check_field_counts(path, separator)?;

        let file = Self::open(path)?;

        let opts = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
            .map_parse_options(|parse| parse.with_separator(separator));

        opts.into_reader_with_file_handle(file)
            .finish()
            .map_err(|source| LoaderError::Parse {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Polars null-pads short rows, so ragged records are rejected up front.
    fn check_field_counts(path: &Path, separator: u8) -> Result<(), LoaderError> {
        let malformed = |source: csv::Error| LoaderError::Malformed {
            path: path.to_path_buf(),
            source,
        };

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(separator)
            .has_headers(true)
            .flexible(false)
            .from_reader(Self::open(path)?);

        let mut record = csv::ByteRecord::new();
        while reader.read_byte_record(&mut record).map_err(malformed)? {}
        Ok(())
    }

    fn open(path: &Path) -> Result<File, LoaderError> {
        File::open(path).map_err(|source| LoaderError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Column names of a loaded frame, in file order.
    pub fn column_names(df: &DataFrame) -> Vec<String> {
        df.get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    /// Whether `df` has a column called `name`.
    pub fn has_column(df: &DataFrame, name: &str) -> bool {
        df.get_column_names().iter().any(|c| c.as_str() == name)
    }
}
