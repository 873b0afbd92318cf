//! Data module - CSV loading and column processing

mod loader;
mod processor;

pub use loader::{DataLoader, LoaderError};
pub use processor::{DataProcessor, ProcessorError, USAGE_COLUMN};
