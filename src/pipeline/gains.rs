//! Gains table construction and the Kolmogorov-Smirnov statistic
//!
//! Observations are ranked by score (ties broken by first occurrence), split into
//! equal-frequency buckets on the rank, and accumulated per bucket. The KS value
//! is the largest gap between the cumulative bad and cumulative good distributions.

use serde::Serialize;
use std::cmp::Ordering;

use super::error::KsError;

/// Default number of quantile bins for a gains table
pub const DEFAULT_BINS: usize = 10;

/// Decimal places the cumulative fraction gap is rounded to before scaling to percent
const SEPARATION_DECIMALS: i32 = 4;

/// A single row of the gains table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GainsBin {
    /// Lowest raw score in this bin
    pub min_score: f64,
    /// Highest raw score in this bin
    pub max_score: f64,
    /// Sum of labels (bads) in this bin
    pub count_bad: f64,
    /// Sum of `1 - label` (goods) in this bin
    pub count_good: f64,
    /// `count_bad + count_good`
    pub count_total: f64,
    /// Good-to-bad ratio (infinite when the bin has no bads)
    pub odds: f64,
    /// Fraction of the bin that is bad
    pub bad_rate: f64,
    /// Fraction of the bin that is good
    pub good_rate: f64,
    /// Running share of all bads up to and including this bin, in percent
    pub cumulative_bad_pct: f64,
    /// Running share of all goods up to and including this bin, in percent
    pub cumulative_good_pct: f64,
    /// Absolute gap between the cumulative distributions, in percent
    pub separation: f64,
    /// True for every bin whose separation equals the KS value
    pub is_max_separation: bool,
}

/// Gains table with its KS statistic
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GainsTable {
    /// Bins ordered by ascending score
    pub bins: Vec<GainsBin>,
    /// Maximum separation across all bins
    pub ks: f64,
    /// Total bads in the input
    pub total_bad: f64,
    /// Total goods in the input
    pub total_good: f64,
}

impl GainsTable {
    /// Number of bins in the table
    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// Number of observations the table was built from
    pub fn n_observations(&self) -> f64 {
        self.total_bad + self.total_good
    }

    /// Zero-based indices of the bins flagged as reaching the KS value
    pub fn max_separation_bins(&self) -> Vec<usize> {
        self.bins
            .iter()
            .enumerate()
            .filter(|(_, bin)| bin.is_max_separation)
            .map(|(idx, _)| idx)
            .collect()
    }
}

/// Running totals for one bucket while observations are assigned
#[derive(Debug, Clone, Copy)]
struct BucketAccumulator {
    min_score: f64,
    max_score: f64,
    bad: f64,
    good: f64,
    members: usize,
}

impl Default for BucketAccumulator {
    fn default() -> Self {
        Self {
            min_score: f64::INFINITY,
            max_score: f64::NEG_INFINITY,
            bad: 0.0,
            good: 0.0,
            members: 0,
        }
    }
}

/// Build a gains table from aligned labels and scores
///
/// # Arguments
/// * `labels` - 0/1 labels where 1 is "bad"; other values are not rejected and
///   flow through `good = 1 - label`
/// * `scores` - Classifier scores aligned index-for-index with `labels`
/// * `n_bins` - Number of equal-frequency bins to cut the score ranks into
///
/// # Returns
/// The gains table ordered by ascending score, carrying the KS value
pub fn build_gains_table(
    labels: &[f64],
    scores: &[f64],
    n_bins: usize,
) -> Result<GainsTable, KsError> {
    if labels.len() != scores.len() {
        return Err(KsError::ShapeMismatch {
            labels: labels.len(),
            scores: scores.len(),
        });
    }

    let n = scores.len();
    if n == 0 {
        return Err(KsError::EmptyInput);
    }

    if let Some(index) = scores.iter().position(|s| s.is_nan()) {
        return Err(KsError::NanScore { index });
    }

    // A single observation yields identical quantile edges
    if n_bins == 0 || n < 2 || n_bins > n {
        return Err(KsError::InvalidBinning {
            n_bins,
            n_observations: n,
        });
    }

    let edges = rank_quantile_edges(n, n_bins);
    if edges.windows(2).any(|pair| pair[0] >= pair[1]) {
        return Err(KsError::InvalidBinning {
            n_bins,
            n_observations: n,
        });
    }

    let order = rank_order(scores);
    let mut buckets = vec![BucketAccumulator::default(); n_bins];

    for (position, &idx) in order.iter().enumerate() {
        let bucket = &mut buckets[bucket_for_rank((position + 1) as f64, &edges)];
        let score = scores[idx];
        let label = labels[idx];

        bucket.min_score = bucket.min_score.min(score);
        bucket.max_score = bucket.max_score.max(score);
        bucket.bad += label;
        bucket.good += 1.0 - label;
        bucket.members += 1;
    }

    if buckets.iter().any(|b| b.members == 0) {
        return Err(KsError::InvalidBinning {
            n_bins,
            n_observations: n,
        });
    }

    let total_bad: f64 = labels.iter().sum();
    let total_good: f64 = labels.iter().map(|l| 1.0 - l).sum();

    let mut cum_bad_frac = 0.0;
    let mut cum_good_frac = 0.0;
    let mut bins: Vec<GainsBin> = buckets
        .iter()
        .map(|b| {
            let total = b.bad + b.good;
            cum_bad_frac += b.bad / total_bad;
            cum_good_frac += b.good / total_good;

            GainsBin {
                min_score: b.min_score,
                max_score: b.max_score,
                count_bad: b.bad,
                count_good: b.good,
                count_total: total,
                odds: b.good / b.bad,
                bad_rate: b.bad / total,
                good_rate: b.good / total,
                cumulative_bad_pct: cum_bad_frac * 100.0,
                cumulative_good_pct: cum_good_frac * 100.0,
                separation: (round_half_even(cum_bad_frac - cum_good_frac, SEPARATION_DECIMALS)
                    * 100.0)
                    .abs(),
                is_max_separation: false,
            }
        })
        .collect();

    let ks = max_ignoring_nan(bins.iter().map(|b| b.separation));
    for bin in &mut bins {
        bin.is_max_separation = bin.separation == ks;
    }

    Ok(GainsTable {
        bins,
        ks,
        total_bad,
        total_good,
    })
}

/// Compute only the KS statistic for aligned labels and scores
pub fn ks_score(labels: &[f64], scores: &[f64], n_bins: usize) -> Result<f64, KsError> {
    build_gains_table(labels, scores, n_bins).map(|table| table.ks)
}

/// Indices of `scores` in ascending score order, ties kept in input order
fn rank_order(scores: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    // sort_by is stable, so equal scores keep first-occurrence order
    order.sort_by(|&a, &b| scores[a].partial_cmp(&scores[b]).unwrap_or(Ordering::Equal));
    order
}

/// Quantile edges over the ranks `1..=n`, one more than `n_bins`
///
/// Follows the linear-interpolation percentile path in floating point: the
/// quantile levels are `k * (1 / n_bins)` (the last one exactly 1), scaled to
/// percent and back, placed at virtual index `(n - 1) * q` and interpolated
/// between neighbouring ranks. Edges that should be integers can land one ulp
/// below, which moves that rank into the next bucket.
fn rank_quantile_edges(n: usize, n_bins: usize) -> Vec<f64> {
    let step = 1.0 / n_bins as f64;
    (0..=n_bins)
        .map(|k| {
            let level = if k == n_bins { 1.0 } else { k as f64 * step };
            let level = (level * 100.0) / 100.0;
            let virtual_index = (n - 1) as f64 * level;
            let below = virtual_index.floor();
            let lower = below as usize;
            let upper = (lower + 1).min(n - 1);
            lerp(
                (lower + 1) as f64,
                (upper + 1) as f64,
                virtual_index - below,
            )
        })
        .collect()
}

/// Interpolate from `a` towards `b`, anchored on `b` once `t` passes one half
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    let diff = b - a;
    if t >= 0.5 {
        b - diff * (1.0 - t)
    } else {
        a + diff * t
    }
}

/// Zero-based bucket for a one-based `rank`
///
/// A rank belongs to the bucket whose half-open interval `(lower, upper]` holds
/// it; the lowest edge is closed so the smallest rank lands in the first bucket.
fn bucket_for_rank(rank: f64, edges: &[f64]) -> usize {
    edges.partition_point(|&edge| edge < rank).max(1) - 1
}

/// Round to `decimals` places with ties going to the even neighbour
fn round_half_even(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}

/// Largest non-NaN value, or NaN if there is none
fn max_ignoring_nan(values: impl Iterator<Item = f64>) -> f64 {
    values
        .filter(|v| !v.is_nan())
        .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |m| m.max(v))))
        .unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bucket_sizes(n: usize, n_bins: usize) -> Vec<usize> {
        let edges = rank_quantile_edges(n, n_bins);
        let mut sizes = vec![0; n_bins];
        for rank in 1..=n {
            sizes[bucket_for_rank(rank as f64, &edges)] += 1;
        }
        sizes
    }

    #[test]
    fn test_rank_order_breaks_ties_by_first_occurrence() {
        let scores = [3.0, 1.0, 2.0, 1.0, 3.0];
        assert_eq!(rank_order(&scores), vec![1, 3, 2, 0, 4]);
    }

    #[test]
    fn test_rank_order_treats_signed_zero_as_tie() {
        let scores = [0.0, -0.0, -1.0];
        assert_eq!(rank_order(&scores), vec![2, 0, 1]);
    }

    #[test]
    fn test_rank_quantile_edges_carry_float_error() {
        let edges = rank_quantile_edges(10, 3);
        assert_eq!(edges[0], 1.0);
        assert!(edges[1] < 4.0 && edges[1] > 3.999);
        assert!(edges[2] < 7.0 && edges[2] > 6.999);
        assert_eq!(edges[3], 10.0);

        assert_eq!(rank_quantile_edges(10, 4), vec![1.0, 3.25, 5.5, 7.75, 10.0]);
    }

    #[test]
    fn test_bucket_sizes_follow_quantile_edges() {
        // Edges just below 4 and 7 push those ranks up a bucket
        assert_eq!(bucket_sizes(10, 3), vec![3, 3, 4]);
        assert_eq!(bucket_sizes(4, 3), vec![1, 1, 2]);
        // Edges 1, 3.25, 5.5, 7.75, 10
        assert_eq!(bucket_sizes(10, 4), vec![3, 2, 2, 3]);
        assert_eq!(bucket_sizes(10, 10), vec![1; 10]);
        assert_eq!(bucket_sizes(8, 2), vec![4, 4]);
        assert_eq!(bucket_sizes(91, 10), vec![10, 9, 9, 9, 9, 9, 8, 10, 9, 9]);
    }

    #[test]
    fn test_bucket_for_rank_closes_lowest_edge() {
        let edges = [1.0, 2.5, 4.0];
        assert_eq!(bucket_for_rank(1.0, &edges), 0);
        assert_eq!(bucket_for_rank(2.0, &edges), 0);
        assert_eq!(bucket_for_rank(2.5, &edges), 0);
        assert_eq!(bucket_for_rank(3.0, &edges), 1);
        assert_eq!(bucket_for_rank(4.0, &edges), 1);
    }

    #[test]
    fn test_one_bin_per_observation_never_leaves_a_bucket_empty() {
        for n in 2..200 {
            let sizes = bucket_sizes(n, n);
            assert!(sizes.iter().all(|&s| s == 1), "n={} gave sizes {:?}", n, sizes);
        }
    }

    #[test]
    fn test_round_half_even() {
        assert_eq!(round_half_even(0.5, 0), 0.0);
        assert_eq!(round_half_even(1.5, 0), 2.0);
        assert!((round_half_even(0.123456, 4) - 0.1235).abs() < 1e-12);
        assert!(round_half_even(f64::NAN, 4).is_nan());
    }

    #[test]
    fn test_max_ignoring_nan() {
        assert_eq!(max_ignoring_nan([1.0, f64::NAN, 3.0].into_iter()), 3.0);
        assert!(max_ignoring_nan([f64::NAN, f64::NAN].into_iter()).is_nan());
    }

    #[test]
    fn test_perfect_separation() {
        let labels = [0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0];
        let scores = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];

        let table = build_gains_table(&labels, &scores, 2).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.ks, 100.0);
        assert_eq!(table.max_separation_bins(), vec![0]);

        let low = &table.bins[0];
        assert_eq!((low.min_score, low.max_score), (1.0, 4.0));
        assert_eq!((low.count_bad, low.count_good, low.count_total), (0.0, 4.0, 4.0));
        assert!(low.odds.is_infinite());
        assert_eq!(low.bad_rate, 0.0);
        assert_eq!(low.good_rate, 1.0);
        assert_eq!(low.cumulative_good_pct, 100.0);

        let high = &table.bins[1];
        assert_eq!(high.odds, 0.0);
        assert_eq!(high.separation, 0.0);
        assert_eq!(high.cumulative_bad_pct, 100.0);
    }

    #[test]
    fn test_tied_maximum_separation_flags_every_bin() {
        let labels = [1.0, 0.0, 0.0, 1.0];
        let scores = [1.0, 2.0, 3.0, 4.0];

        let table = build_gains_table(&labels, &scores, 4).unwrap();

        assert_eq!(table.ks, 50.0);
        assert_eq!(table.max_separation_bins(), vec![0, 2]);
    }

    #[test]
    fn test_duplicate_scores_split_by_first_occurrence() {
        let labels = [0.0, 0.0, 1.0, 1.0];
        let scores = [5.0, 5.0, 5.0, 5.0];

        let table = build_gains_table(&labels, &scores, 2).unwrap();

        assert_eq!(table.bins[0].count_good, 2.0);
        assert_eq!(table.bins[1].count_bad, 2.0);
        assert_eq!(table.bins[0].min_score, table.bins[1].max_score);
        assert_eq!(table.ks, 100.0);
    }

    #[test]
    fn test_input_order_does_not_need_to_be_sorted() {
        let labels = [1.0, 0.0, 1.0, 0.0];
        let scores = [0.9, 0.1, 0.8, 0.2];

        let table = build_gains_table(&labels, &scores, 2).unwrap();

        assert_eq!((table.bins[0].min_score, table.bins[0].max_score), (0.1, 0.2));
        assert_eq!((table.bins[1].min_score, table.bins[1].max_score), (0.8, 0.9));
        assert_eq!(table.ks, 100.0);
    }

    #[test]
    fn test_separation_rounds_fraction_before_scaling() {
        // Cumulative gaps of 1/3 round to 0.3333 then scale to 33.33
        let labels = [1.0, 1.0, 1.0, 0.0, 0.0, 0.0];
        let scores = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];

        let table = build_gains_table(&labels, &scores, 6).unwrap();

        assert!((table.bins[0].separation - 33.33).abs() < 1e-9);
        assert!((table.bins[1].separation - 66.67).abs() < 1e-9);
        assert_eq!(table.ks, 100.0);
    }

    #[test]
    fn test_single_class_propagates_nan() {
        let labels = [1.0, 1.0, 1.0, 1.0];
        let scores = [1.0, 2.0, 3.0, 4.0];

        let table = build_gains_table(&labels, &scores, 2).unwrap();

        assert!(table.bins[0].cumulative_good_pct.is_nan());
        assert!(table.ks.is_nan());
        assert!(table.max_separation_bins().is_empty());
    }

    #[test]
    fn test_ten_observations_in_three_bins_put_the_remainder_last() {
        let labels = [0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 1.0, 1.0];
        let scores: Vec<f64> = (1..=10).map(f64::from).collect();

        let table = build_gains_table(&labels, &scores, 3).unwrap();

        let totals: Vec<f64> = table.bins.iter().map(|b| b.count_total).collect();
        assert_eq!(totals, vec![3.0, 3.0, 4.0]);
        assert_eq!((table.bins[1].min_score, table.bins[1].max_score), (4.0, 6.0));
        assert_eq!(table.bins[2].min_score, 7.0);
    }

    #[test]
    fn test_bucket_left_empty_by_edges_is_invalid() {
        // Six bins over seven ranks leave the fourth bucket without a member
        let labels = [0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0];
        let scores = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0];

        assert_eq!(
            build_gains_table(&labels, &scores, 6),
            Err(KsError::InvalidBinning {
                n_bins: 6,
                n_observations: 7
            })
        );
    }

    #[test]
    fn test_non_binary_label_flows_through_good_count() {
        let labels = [0.0, 2.0, 0.0, 1.0];
        let scores = [1.0, 2.0, 3.0, 4.0];

        let table = build_gains_table(&labels, &scores, 4).unwrap();

        let bin = &table.bins[1];
        assert_eq!(bin.count_bad, 2.0);
        assert_eq!(bin.count_good, -1.0);
        assert_eq!(bin.count_total, 1.0);
        assert_eq!(table.total_bad, 3.0);
        assert_eq!(table.total_good, 1.0);
    }

    #[test]
    fn test_errors() {
        assert_eq!(
            build_gains_table(&[0.0, 1.0, 0.0, 1.0, 0.0], &[1.0, 2.0, 3.0, 4.0], 2),
            Err(KsError::ShapeMismatch { labels: 5, scores: 4 })
        );
        assert_eq!(build_gains_table(&[], &[], 10), Err(KsError::EmptyInput));
        assert_eq!(
            build_gains_table(&[0.0, 1.0], &[1.0, f64::NAN], 2),
            Err(KsError::NanScore { index: 1 })
        );
        assert_eq!(
            build_gains_table(&[0.0, 1.0, 1.0], &[1.0, 2.0, 3.0], 4),
            Err(KsError::InvalidBinning {
                n_bins: 4,
                n_observations: 3
            })
        );
        assert!(matches!(
            build_gains_table(&[1.0], &[0.5], 1),
            Err(KsError::InvalidBinning { .. })
        ));
        assert!(matches!(
            build_gains_table(&[0.0, 1.0], &[0.5, 0.6], 0),
            Err(KsError::InvalidBinning { .. })
        ));
    }

    #[test]
    fn test_ks_score_matches_table() {
        let labels = [0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0];
        let scores = [0.1, 0.4, 0.35, 0.8, 0.7, 0.2, 0.9, 0.5, 0.3, 0.65];

        let table = build_gains_table(&labels, &scores, 5).unwrap();
        assert_eq!(ks_score(&labels, &scores, 5).unwrap(), table.ks);
    }
}
