//! Feature Quantisation for Histogram Split Search

/// Sorted cut points for one feature.
///
/// A value falls in bin `b` when exactly `b` cuts are `<=` it, so splitting
/// after bin `b` sends `x < cuts[b]` left.
#[derive(Debug, Clone)]
pub(crate) struct FeatureBins {
    cuts: Vec<f64>,
}

impl FeatureBins {
    /// Derive cut points from a column of training values
    pub(crate) fn from_values(values: &[f64], max_bins: usize) -> Self {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
        sorted.sort_by(f64::total_cmp);

        let mut distinct = sorted.clone();
        distinct.dedup();

        let cuts = if distinct.len() <= max_bins {
            distinct.windows(2).map(|w| midpoint(w[0], w[1])).collect()
        } else {
            let n = sorted.len();
            let mut cuts: Vec<f64> = (1..max_bins)
                .filter_map(|k| {
                    let candidate = sorted[k * n / max_bins];
                    let pos = distinct.partition_point(|&d| d < candidate);
                    (pos > 0).then(|| midpoint(distinct[pos - 1], candidate))
                })
                .collect();
            cuts.dedup();
            cuts
        };

        Self { cuts }
    }

    /// Bin index of a value
    pub(crate) fn bin(&self, value: f64) -> u16 {
        self.cuts.partition_point(|&c| c <= value) as u16
    }

    /// Number of bins (cuts + 1)
    pub(crate) fn len(&self) -> usize {
        self.cuts.len() + 1
    }

    /// Threshold separating bin `b` from bin `b + 1`
    pub(crate) fn threshold(&self, b: usize) -> f64 {
        self.cuts[b]
    }
}

fn midpoint(a: f64, b: f64) -> f64 {
    a + (b - a) / 2.0
}

/// Training rows quantised per feature (feature-major)
#[derive(Debug, Clone)]
pub(crate) struct BinnedMatrix {
    pub(crate) bins: Vec<FeatureBins>,
    /// `codes[feature][row]`
    pub(crate) codes: Vec<Vec<u16>>,
}

impl BinnedMatrix {
    pub(crate) fn new(rows: &[Vec<f64>], n_features: usize, max_bins: usize) -> Self {
        let mut bins = Vec::with_capacity(n_features);
        let mut codes = Vec::with_capacity(n_features);

        for f in 0..n_features {
            let column: Vec<f64> = rows.iter().map(|r| r[f]).collect();
            let feature_bins = FeatureBins::from_values(&column, max_bins);
            codes.push(column.iter().map(|&v| feature_bins.bin(v)).collect());
            bins.push(feature_bins);
        }

        Self { bins, codes }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_few_distinct_values_use_midpoints() {
        let bins = FeatureBins::from_values(&[1.0, 3.0, 3.0, 5.0], 256);
        assert_eq!(bins.len(), 3);
        assert_eq!(bins.threshold(0), 2.0);
        assert_eq!(bins.threshold(1), 4.0);
        assert_eq!(bins.bin(1.0), 0);
        assert_eq!(bins.bin(3.0), 1);
        assert_eq!(bins.bin(5.0), 2);
        assert_eq!(bins.bin(100.0), 2);
        assert_eq!(bins.bin(-100.0), 0);
    }

    #[test]
    fn test_constant_column_has_single_bin() {
        let bins = FeatureBins::from_values(&[100.0; 10], 256);
        assert_eq!(bins.len(), 1);
        assert_eq!(bins.bin(100.0), 0);
    }

    #[test]
    fn test_quantile_cuts_bounded() {
        let values: Vec<f64> = (0..10_000).map(|i| i as f64 * 0.5).collect();
        let bins = FeatureBins::from_values(&values, 16);
        assert!(bins.len() <= 16);
        assert!(bins.len() > 8);

        // bins are monotone in value
        let mut last = 0;
        for v in &values {
            let b = bins.bin(*v);
            assert!(b >= last);
            last = b;
        }
    }

    #[test]
    fn test_split_predicate_matches_bins() {
        let values = [0.5, 1.5, 2.5, 3.5, 4.5];
        let bins = FeatureBins::from_values(&values, 256);
        for b in 0..bins.len() - 1 {
            let t = bins.threshold(b);
            for v in values {
                assert_eq!((bins.bin(v) as usize) <= b, v < t);
            }
        }
    }

    #[test]
    fn test_matrix_layout() {
        let rows = vec![vec![1.0, 10.0], vec![2.0, 10.0], vec![3.0, 20.0]];
        let m = BinnedMatrix::new(&rows, 2, 256);
        assert_eq!(m.codes.len(), 2);
        assert_eq!(m.codes[0], vec![0, 1, 2]);
        assert_eq!(m.codes[1], vec![0, 0, 1]);
    }

    proptest! {
        #[test]
        fn prop_bin_index_is_monotone_and_bounded(
            values in proptest::collection::vec(-1.0e4f64..1.0e4, 1..300),
            max_bins in 2usize..64,
        ) {
            let bins = FeatureBins::from_values(&values, max_bins);
            prop_assert!(bins.len() <= max_bins);

            let mut sorted = values.clone();
            sorted.sort_by(f64::total_cmp);
            for pair in sorted.windows(2) {
                prop_assert!(bins.bin(pair[0]) <= bins.bin(pair[1]));
            }
            for &v in &values {
                let b = bins.bin(v) as usize;
                prop_assert!(b < bins.len());
                if b > 0 {
                    prop_assert!(v >= bins.threshold(b - 1));
                }
            }
        }
    }
}
