//! Stratified train/test splitting.

use polars::prelude::*;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use super::{group_by_label, LabelGroup, SplitError};

/// The two partitions of a split, each in original row order.
#[derive(Debug, Clone)]
pub struct TrainTest {
    pub train: DataFrame,
    pub test: DataFrame,
}

/// Splits rows so every label value keeps its share in the test partition.
#[derive(Debug, Clone)]
pub struct StratifiedSplitter {
    label: String,
    test_ratio: f64,
}

impl StratifiedSplitter {
    pub fn new(label: impl Into<String>, test_ratio: f64) -> Self {
        Self {
            label: label.into(),
            test_ratio,
        }
    }

    pub fn split<R: Rng + ?Sized>(&self, df: &DataFrame, rng: &mut R) -> Result<TrainTest, SplitError> {
        if !(self.test_ratio > 0.0 && self.test_ratio < 1.0) {
            return Err(SplitError::RatioOutOfRange {
                name: "test",
                range: "(0, 1)",
                value: self.test_ratio,
            });
        }

        let groups = group_by_label(df, &self.label)?;
        let n = df.height();
        if n == 0 {
            return Err(SplitError::EmptyTable);
        }
        if let Some(small) = groups.iter().find(|g| g.rows.len() < 2) {
            return Err(SplitError::ClassTooSmall {
                label: small.value.clone(),
                count: small.rows.len(),
            });
        }

        let n_test = (n as f64 * self.test_ratio).round() as usize;
        let n_train = n - n_test;
        for (partition, size) in [("test", n_test), ("train", n_train)] {
            if size < groups.len() {
                return Err(SplitError::PartitionTooSmall {
                    partition,
                    size,
                    classes: groups.len(),
                });
            }
        }

        let allocation = allocate(&groups, n_test, n);

        let mut train_rows: Vec<IdxSize> = Vec::with_capacity(n_train);
        let mut test_rows: Vec<IdxSize> = Vec::with_capacity(n_test);
        for (group, &take) in groups.iter().zip(&allocation) {
            let mut rows = group.rows.clone();
            rows.shuffle(rng);
            let (test, train) = rows.split_at(take);
            test_rows.extend(test.iter().map(|&r| r as IdxSize));
            train_rows.extend(train.iter().map(|&r| r as IdxSize));
            debug!(
                "label `{}`: {} train / {} test",
                group.value,
                train.len(),
                take
            );
        }

        // Restore file order within each partition.
        train_rows.sort_unstable();
        test_rows.sort_unstable();

        let train = df.take(&IdxCa::from_vec("train".into(), train_rows))?;
        let test = df.take(&IdxCa::from_vec("test".into(), test_rows))?;
        Ok(TrainTest { train, test })
    }
}

/// Largest-remainder allocation of `n_test` rows across label groups.
///
/// Each group first receives `floor(n_test * size / n)`. Leftover rows go to
/// the largest remainders, ties broken by larger group, then first appearance.
fn allocate(groups: &[LabelGroup], n_test: usize, n: usize) -> Vec<usize> {
    let mut counts: Vec<usize> = Vec::with_capacity(groups.len());
    let mut remainders: Vec<(usize, usize, usize)> = Vec::with_capacity(groups.len());

    for (i, group) in groups.iter().enumerate() {
        let scaled = n_test * group.rows.len();
        counts.push(scaled / n);
        remainders.push((scaled % n, group.rows.len(), i));
    }

    let leftover = n_test - counts.iter().sum::<usize>();
    remainders.sort_by(|a, b| b.0.cmp(&a.0).then(b.1.cmp(&a.1)).then(a.2.cmp(&b.2)));
    for &(_, _, i) in remainders.iter().take(leftover) {
        counts[i] += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::split::group_by_label;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn labelled(labels: &[&str]) -> DataFrame {
        let ids: Vec<i64> = (0..labels.len() as i64).collect();
        df!("row" => ids, "label" => labels).unwrap()
    }

    fn label_counts(df: &DataFrame) -> Vec<(String, usize)> {
        group_by_label(df, "label")
            .unwrap()
            .into_iter()
            .map(|g| (g.value, g.rows.len()))
            .collect()
    }

    fn rows(df: &DataFrame) -> Vec<i64> {
        df.column("row").unwrap().i64().unwrap().into_iter().flatten().collect()
    }

    #[test]
    fn six_four_split_in_half() {
        let df = labelled(&["A", "A", "A", "A", "A", "A", "B", "B", "B", "B"]);
        let mut rng = StdRng::seed_from_u64(7);
        let parts = StratifiedSplitter::new("label", 0.5).split(&df, &mut rng).unwrap();

        assert_eq!(parts.train.height(), 5);
        assert_eq!(parts.test.height(), 5);
        assert_eq!(
            label_counts(&parts.test),
            vec![("A".to_string(), 3), ("B".to_string(), 2)]
        );
    }

    #[test]
    fn partitions_are_disjoint_cover_and_ordered() {
        let labels: Vec<&str> = (0..37).map(|i| ["x", "y", "z"][i % 3]).collect();
        let df = labelled(&labels);
        let mut rng = StdRng::seed_from_u64(11);
        let parts = StratifiedSplitter::new("label", 0.3).split(&df, &mut rng).unwrap();

        let train = rows(&parts.train);
        let test = rows(&parts.test);
        assert_eq!(test.len(), 11); // round(37 * 0.3)
        assert!(train.windows(2).all(|w| w[0] < w[1]));
        assert!(test.windows(2).all(|w| w[0] < w[1]));

        let mut all: Vec<i64> = train.iter().chain(&test).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..37).collect::<Vec<_>>());
    }

    #[test]
    fn same_seed_same_split() {
        let labels: Vec<&str> = (0..50).map(|i| if i % 4 == 0 { "p" } else { "q" }).collect();
        let df = labelled(&labels);
        let splitter = StratifiedSplitter::new("label", 0.2);

        let a = splitter.split(&df, &mut StdRng::seed_from_u64(3)).unwrap();
        let b = splitter.split(&df, &mut StdRng::seed_from_u64(3)).unwrap();
        assert_eq!(rows(&a.test), rows(&b.test));
        assert_eq!(rows(&a.train), rows(&b.train));
    }

    #[test]
    fn singleton_class_is_rejected() {
        let df = labelled(&["A", "A", "A", "B"]);
        let err = StratifiedSplitter::new("label", 0.5)
            .split(&df, &mut StdRng::seed_from_u64(0))
            .unwrap_err();
        assert!(matches!(err, SplitError::ClassTooSmall { count: 1, .. }));
    }

    #[test]
    fn tiny_test_partition_is_rejected() {
        let df = labelled(&["A", "A", "B", "B", "C", "C"]);
        let err = StratifiedSplitter::new("label", 0.2)
            .split(&df, &mut StdRng::seed_from_u64(0))
            .unwrap_err();
        assert!(matches!(
            err,
            SplitError::PartitionTooSmall { partition: "test", size: 1, classes: 3 }
        ));
    }

    #[test]
    fn ratio_must_be_open_interval() {
        let df = labelled(&["A", "A", "B", "B"]);
        for ratio in [0.0, 1.0, -0.5, f64::NAN] {
            let err = StratifiedSplitter::new("label", ratio)
                .split(&df, &mut StdRng::seed_from_u64(0))
                .unwrap_err();
            assert!(matches!(err, SplitError::RatioOutOfRange { .. }));
        }
    }

    #[test]
    fn allocation_hands_leftovers_to_largest_remainders() {
        let groups = vec![
            LabelGroup { value: "a".into(), rows: (0..5).collect() },
            LabelGroup { value: "b".into(), rows: (5..8).collect() },
            LabelGroup { value: "c".into(), rows: (8..10).collect() },
        ];
        // 4 * [5, 3, 2] / 10 = [2.0, 1.2, 0.8]
        assert_eq!(allocate(&groups, 4, 10), vec![2, 1, 1]);
    }
}
