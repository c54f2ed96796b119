//! Cross-sectional orderings and the count-based decile cut.

use crate::N_BUCKETS;

/// Positions of `values` sorted by value, ties kept in input order.
///
/// The sort is stable, so among equal values the one that occurs first in
/// `values` comes first in either direction.
///
/// # Arguments
/// * `values` - Sizing metric, one per security
/// * `descending` - If true, largest first
///
/// # Returns
/// Indices into `values`.
#[must_use]
pub fn stable_order(values: &[f64], descending: bool) -> Vec<usize> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    if descending {
        order.sort_by(|&a, &b| values[b].total_cmp(&values[a]));
    } else {
        order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));
    }
    order
}

/// Decile bucket of the security at 0-based `position` in an ascending
/// ordering of `n` securities.
///
/// `floor(position * 10 / n) + 1`, clamped to `[1, 10]`. Bucket sizes differ
/// by at most one for any `n >= 10`.
#[must_use]
pub fn decile_bucket(position: usize, n: usize) -> u8 {
    if n == 0 {
        return 1;
    }
    let bucket = position.saturating_mul(N_BUCKETS) / n + 1;
    bucket.clamp(1, N_BUCKETS) as u8
}

/// Rank-then-cut decile assignment.
///
/// Returns one bucket per input value, 1 holding the smallest values.
#[must_use]
pub fn deciles(values: &[f64]) -> Vec<u8> {
    let n = values.len();
    let mut buckets = vec![0u8; n];
    for (position, idx) in stable_order(values, false).into_iter().enumerate() {
        buckets[idx] = decile_bucket(position, n);
    }
    buckets
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn stable_order_keeps_ties_in_input_order() {
        let values = [5.0, 1.0, 5.0, 3.0];
        assert_eq!(stable_order(&values, false), vec![1, 3, 0, 2]);
        assert_eq!(stable_order(&values, true), vec![0, 2, 3, 1]);
    }

    #[rstest]
    #[case(10)]
    #[case(11)]
    #[case(19)]
    #[case(23)]
    #[case(100)]
    #[case(1001)]
    fn decile_sizes_differ_by_at_most_one(#[case] n: usize) {
        let values: Vec<f64> = (0..n).map(|i| ((i * 7919) % 104_729) as f64).collect();
        let buckets = deciles(&values);

        let mut counts = [0usize; 10];
        for b in &buckets {
            assert!((1..=10).contains(b));
            counts[(*b - 1) as usize] += 1;
        }
        let min = counts.iter().min().copied().unwrap();
        let max = counts.iter().max().copied().unwrap();
        assert!(max - min <= 1, "n={n} counts={counts:?}");
        assert_eq!(counts.iter().sum::<usize>(), n);
    }

    #[test]
    fn deciles_are_contiguous_in_size() {
        let values: Vec<f64> = (1..=20).rev().map(f64::from).collect();
        let buckets = deciles(&values);
        // values descend, so the first inputs are the largest
        assert_eq!(buckets[0], 10);
        assert_eq!(buckets[1], 10);
        assert_eq!(buckets[18], 1);
        assert_eq!(buckets[19], 1);
    }

    #[test]
    fn ties_split_by_first_occurrence() {
        let values = vec![1.0; 10];
        let buckets = deciles(&values);
        assert_eq!(buckets, (1..=10).collect::<Vec<u8>>());
    }

    #[test]
    fn decile_bucket_edges() {
        assert_eq!(decile_bucket(0, 3), 1);
        assert_eq!(decile_bucket(2, 3), 7);
        assert_eq!(decile_bucket(99, 100), 10);
        assert_eq!(decile_bucket(0, 0), 1);
    }
}
