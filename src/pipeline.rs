//! Bundle pipeline: load, prune, split, derive views, tag usage, write.

use polars::prelude::*;
use rand::Rng;
use thiserror::Error;
use tracing::info;

use crate::config::{BundleConfig, BundleParams, ConfigError};
use crate::data::{DataLoader, DataProcessor, LoaderError, ProcessorError};
use crate::split::{SplitError, StratifiedSplitter, TrainTest, UsageStratifier};
use crate::writer::{BundleWriter, WriterError};

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Load(#[from] LoaderError),
    #[error(transparent)]
    Process(#[from] ProcessorError),
    #[error(transparent)]
    Split(#[from] SplitError),
    #[error(transparent)]
    Write(#[from] WriterError),
}

/// The four tables of a competition bundle.
#[derive(Debug, Clone)]
pub struct Bundle {
    /// Training rows with every post-drop column.
    pub train: DataFrame,
    /// Test rows without the label.
    pub test: DataFrame,
    /// Label column filled with the placeholder value.
    pub sample: DataFrame,
    /// True label plus `Usage`.
    pub solution: DataFrame,
}

/// Build a bundle from an already loaded table. No I/O.
///
/// The same `rng` drives the train/test split and then the Usage tags.
pub fn build_bundle<R: Rng + ?Sized>(
    df: &DataFrame,
    params: &BundleParams,
    rng: &mut R,
) -> Result<Bundle, PipelineError> {
    let label = params.label_column.as_str();
    let df = DataProcessor::drop_columns(df, &params.junk_columns)?;

    let TrainTest { train, test } = StratifiedSplitter::new(label, params.test_ratio).split(&df, rng)?;
    info!("split {} rows -> {} train / {} test", df.height(), train.height(), test.height());

    let sample = DataProcessor::build_sample(&test, label, &params.default_value)?;
    let mut solution = DataProcessor::build_solution(&test, label)?;
    UsageStratifier::new(label, params.usage_ratio).assign(&mut solution, rng)?;

    let test = DataProcessor::strip_label(&test, label)?;

    Ok(Bundle {
        train,
        test,
        sample,
        solution,
    })
}

/// Load `config.data_path`, build the bundle and write its four files to
/// `config.output_dir`.
pub fn process_data<R: Rng + ?Sized>(config: &BundleConfig, rng: &mut R) -> Result<Bundle, PipelineError> {
    config.validate()?;

    let df = DataLoader::load_csv(&config.data_path, config.separator_byte()?)?;
    info!(
        "loaded {} ({} rows x {} columns)",
        config.data_path.display(),
        df.height(),
        df.width()
    );

    let bundle = build_bundle(&df, &config.params(), rng)?;
    BundleWriter::new(&config.output_dir).write(&bundle)?;
    info!("Data processed successfully!");
    Ok(bundle)
}
