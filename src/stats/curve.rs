//! Length-conditioned significance curve
//!
//! True orthologs aligned over long stretches are expected to be highly
//! significant while short alignments tolerate weaker e-values. The curve maps
//! an alignment length to the mean transformed e-value of strict reciprocal
//! hits whose length falls inside a sliding window around it. The window widens
//! with length (10% of the centre, never narrower than 5 on each side) because
//! long alignments are sparser per exact length.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;

/// Shortest alignment length that gets a curve entry.
pub const MIN_CURVE_LENGTH: usize = 10;

/// Minimum half-width of the smoothing window.
pub const MIN_HALF_WINDOW: usize = 5;

/// A strict reciprocal hit reduced to what the curve needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvaluePoint {
    pub length: usize,
    /// `-log10(e-value)` after flooring.
    pub significance: f64,
}

/// Half-width of the window centred on `centre`: `max(5, floor(centre * 0.1))`.
#[inline]
pub fn half_window(centre: usize) -> usize {
    (centre / 10).max(MIN_HALF_WINDOW)
}

/// Mapping from alignment length to smoothed mean transformed e-value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignificanceCurve {
    fitted: BTreeMap<usize, f64>,
}

impl SignificanceCurve {
    /// Fit the curve over every centre in `10..=longest`.
    ///
    /// `longest` is the longest strict alignment observed; no entry is
    /// produced past it even when the window of a shorter centre would reach
    /// further. Centres whose window contains no point get no entry.
    pub fn build(points: &[EvaluePoint], longest: usize) -> Self {
        let mut buckets: FxHashMap<usize, Vec<f64>> = FxHashMap::default();
        for p in points {
            buckets.entry(p.length).or_default().push(p.significance);
        }

        let mut fitted = BTreeMap::new();
        if longest < MIN_CURVE_LENGTH || buckets.is_empty() {
            return SignificanceCurve { fitted };
        }

        for centre in MIN_CURVE_LENGTH..=longest {
            let s = half_window(centre);
            let mut sum = 0.0;
            let mut count = 0usize;
            for length in centre.saturating_sub(s)..=centre + s {
                if let Some(values) = buckets.get(&length) {
                    sum += values.iter().sum::<f64>();
                    count += values.len();
                }
            }
            if count > 0 {
                fitted.insert(centre, sum / count as f64);
            }
        }

        log::debug!(
            "significance curve: {} points in {} length buckets, {} fitted lengths (10..={})",
            points.len(),
            buckets.len(),
            fitted.len(),
            longest
        );

        SignificanceCurve { fitted }
    }

    /// Expected transformed e-value for an alignment of `length`, if fitted.
    #[inline]
    pub fn get(&self, length: usize) -> Option<f64> {
        self.fitted.get(&length).copied()
    }

    pub fn len(&self) -> usize {
        self.fitted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fitted.is_empty()
    }

    /// Fitted `(length, mean)` pairs in ascending length order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.fitted.iter().map(|(&l, &m)| (l, m))
    }

    /// Shortest and longest fitted length.
    pub fn domain(&self) -> Option<(usize, usize)> {
        let first = self.fitted.keys().next()?;
        let last = self.fitted.keys().next_back()?;
        Some((*first, *last))
    }
}
