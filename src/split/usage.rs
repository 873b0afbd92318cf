//! Public/Private Usage assignment for the solution file.

use polars::prelude::*;
use rand::seq::SliceRandom;
use rand::Rng;
use std::fmt;
use tracing::debug;

use super::{group_by_label, SplitError};
use crate::data::USAGE_COLUMN;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UsageTag {
    Public,
    Private,
}

impl UsageTag {
    pub fn as_str(self) -> &'static str {
        match self {
            UsageTag::Public => "Public",
            UsageTag::Private => "Private",
        }
    }
}

impl fmt::Display for UsageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tags each solution row `Public` or `Private`, stratified by label value.
#[derive(Debug, Clone)]
pub struct UsageStratifier {
    label: String,
    usage_ratio: f64,
}

impl UsageStratifier {
    pub fn new(label: impl Into<String>, usage_ratio: f64) -> Self {
        Self {
            label: label.into(),
            usage_ratio,
        }
    }

    /// Number of `Private` rows for a label group of `size` rows.
    pub fn private_count(&self, size: usize) -> usize {
        ((size as f64 * self.usage_ratio).floor() as usize).min(size)
    }

    /// Compute one tag per row, aligned to the row order of `solution`.
    pub fn tags<R: Rng + ?Sized>(
        &self,
        solution: &DataFrame,
        rng: &mut R,
    ) -> Result<Vec<UsageTag>, SplitError> {
        if !(0.0..=1.0).contains(&self.usage_ratio) {
            return Err(SplitError::RatioOutOfRange {
                name: "usage",
                range: "[0, 1]",
                value: self.usage_ratio,
            });
        }

        let mut tags = vec![UsageTag::Public; solution.height()];
        for group in group_by_label(solution, &self.label)? {
            let size = group.rows.len();
            let private = self.private_count(size);

            let mut pool: Vec<UsageTag> = std::iter::repeat(UsageTag::Private)
                .take(private)
                .chain(std::iter::repeat(UsageTag::Public).take(size - private))
                .collect();
            pool.shuffle(rng);

            for (&row, tag) in group.rows.iter().zip(pool) {
                tags[row] = tag;
            }
            debug!(
                "label `{}`: {} private / {} public",
                group.value,
                private,
                size - private
            );
        }
        Ok(tags)
    }

    /// Fill the `Usage` column of `solution` in place.
    pub fn assign<R: Rng + ?Sized>(&self, solution: &mut DataFrame, rng: &mut R) -> Result<(), SplitError> {
        let tags = self.tags(solution, rng)?;
        let values: Vec<&str> = tags.iter().map(|t| t.as_str()).collect();
        solution.with_column(Column::new(USAGE_COLUMN.into(), values))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn solution(labels: &[&str]) -> DataFrame {
        df!("label" => labels, USAGE_COLUMN => vec![""; labels.len()]).unwrap()
    }

    fn private_by_label(df: &DataFrame) -> Vec<(String, usize)> {
        group_by_label(df, "label")
            .unwrap()
            .into_iter()
            .map(|g| {
                let usage = df.column(USAGE_COLUMN).unwrap().str().unwrap();
                let private = g
                    .rows
                    .iter()
                    .filter(|&&r| usage.get(r) == Some("Private"))
                    .count();
                (g.value, private)
            })
            .collect()
    }

    #[test]
    fn private_count_is_floor_per_label() {
        let mut df = solution(&["A", "B", "A", "A", "B", "A", "A", "B", "B", "B", "B"]);
        UsageStratifier::new("label", 0.5)
            .assign(&mut df, &mut StdRng::seed_from_u64(1))
            .unwrap();

        // A: floor(5 * 0.5) = 2, B: floor(6 * 0.5) = 3
        assert_eq!(
            private_by_label(&df),
            vec![("A".to_string(), 2), ("B".to_string(), 3)]
        );
    }

    #[test]
    fn every_row_gets_exactly_one_tag() {
        let mut df = solution(&["x"; 9]);
        UsageStratifier::new("label", 0.3)
            .assign(&mut df, &mut StdRng::seed_from_u64(5))
            .unwrap();

        let usage = df.column(USAGE_COLUMN).unwrap().str().unwrap();
        let private = usage.into_iter().filter(|v| *v == Some("Private")).count();
        let public = usage.into_iter().filter(|v| *v == Some("Public")).count();
        assert_eq!((private, public), (2, 7));
    }

    #[test]
    fn ratio_extremes_yield_uniform_tags() {
        let df = solution(&["A", "A", "B"]);
        let mut rng = StdRng::seed_from_u64(0);

        let none = UsageStratifier::new("label", 0.0).tags(&df, &mut rng).unwrap();
        assert!(none.iter().all(|t| *t == UsageTag::Public));

        let all = UsageStratifier::new("label", 1.0).tags(&df, &mut rng).unwrap();
        assert!(all.iter().all(|t| *t == UsageTag::Private));
    }

    #[test]
    fn same_seed_same_tags() {
        let df = solution(&["A", "B", "A", "B", "A", "B", "A", "B"]);
        let stratifier = UsageStratifier::new("label", 0.5);
        let a = stratifier.tags(&df, &mut StdRng::seed_from_u64(9)).unwrap();
        let b = stratifier.tags(&df, &mut StdRng::seed_from_u64(9)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn usage_ratio_above_one_is_rejected() {
        let df = solution(&["A", "A"]);
        let err = UsageStratifier::new("label", 1.5)
            .tags(&df, &mut StdRng::seed_from_u64(0))
            .unwrap_err();
        assert!(matches!(err, SplitError::RatioOutOfRange { name: "usage", .. }));
    }
}
