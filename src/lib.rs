//! Kaggle Bundle - stratified competition file builder
//!
//! Turns a labeled CSV into `train.csv`, `test.csv`, `sample_submission.csv`
//! and `solution.csv`, with a stratified train/test split and a stratified
//! Public/Private `Usage` column on the solution.

pub mod config;
pub mod data;
pub mod pipeline;
pub mod split;
pub mod stats;
pub mod writer;

pub use config::{BundleConfig, BundleParams};
pub use pipeline::{build_bundle, process_data, Bundle, PipelineError};
pub use stats::BundleSummary;
