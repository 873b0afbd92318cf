//! Statistics module - bundle summaries

mod summary;

pub use summary::{BundleSummary, LabelCounts};
