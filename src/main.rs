//! Kaggle Bundle - build competition files from a JSON config.
//!
//! Usage: `kaggle_bundle [CONFIG_JSON]` (defaults to `bundle.json`).

use anyhow::{Context, Result};
use kaggle_bundle::{process_data, BundleConfig, BundleSummary};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_CONFIG: &str = "bundle.json";

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG));
    let config = BundleConfig::from_json_file(&config_path)
        .with_context(|| format!("loading config {}", config_path.display()))?;
    info!("config: {:?}", config);

    let mut rng = StdRng::seed_from_u64(config.seed);
    let bundle = process_data(&config, &mut rng)
        .with_context(|| format!("processing {}", config.data_path.display()))?;

    println!("Data processed successfully!");

    BundleSummary::from_bundle(&bundle, &config.label_column)
        .context("summarising bundle")?
        .log();
    Ok(())
}
