//! Bundle Summary Module
//! Per-label row counts across the partitions of a finished bundle.

use std::collections::HashMap;
use tracing::info;

use crate::data::USAGE_COLUMN;
use crate::pipeline::Bundle;
use crate::split::{group_by_label, SplitError, UsageTag};

/// Counts for a single label value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelCounts {
    pub label: String,
    pub train: usize,
    pub test: usize,
    pub private: usize,
    pub public: usize,
}

/// Row counts for a whole bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleSummary {
    pub total_rows: usize,
    pub train_rows: usize,
    pub test_rows: usize,
    pub labels: Vec<LabelCounts>,
}

impl BundleSummary {
    /// Tally train/test/usage counts per label.
    ///
    /// Test-side labels come from the solution frame since the released test
    /// set no longer carries them.
    pub fn from_bundle(bundle: &Bundle, label: &str) -> Result<Self, SplitError> {
        let mut labels: Vec<LabelCounts> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for group in group_by_label(&bundle.train, label)? {
            index.insert(group.value.clone(), labels.len());
            labels.push(LabelCounts {
                label: group.value,
                train: group.rows.len(),
                ..Default::default()
            });
        }

        let usage = bundle.solution.column(USAGE_COLUMN)?.str()?;
        for group in group_by_label(&bundle.solution, label)? {
            let slot = *index.entry(group.value.clone()).or_insert_with(|| {
                labels.push(LabelCounts {
                    label: group.value.clone(),
                    ..Default::default()
                });
                labels.len() - 1
            });
            let counts = &mut labels[slot];
            counts.test = group.rows.len();
            counts.private = group
                .rows
                .iter()
                .filter(|&&r| usage.get(r) == Some(UsageTag::Private.as_str()))
                .count();
            counts.public = counts.test - counts.private;
        }

        Ok(Self {
            total_rows: bundle.train.height() + bundle.test.height(),
            train_rows: bundle.train.height(),
            test_rows: bundle.test.height(),
            labels,
        })
    }

    pub fn private_rows(&self) -> usize {
        self.labels.iter().map(|l| l.private).sum()
    }

    /// Emit the summary through tracing.
    pub fn log(&self) {
        info!(
            "bundle: {} rows -> {} train / {} test ({} private)",
            self.total_rows,
            self.train_rows,
            self.test_rows,
            self.private_rows()
        );
        for l in &self.labels {
            info!(
                "  `{}`: train={} test={} private={} public={}",
                l.label, l.train, l.test, l.private, l.public
            );
        }
    }
}
