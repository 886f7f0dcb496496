//! Station accumulator: running min, max, sum and count of one station.

use crate::combiners::{CombineFn, LiftableCombiner};
use crate::error::{Error, Result};
use crate::report::StationSummary;

/// Width of the lane-wise reduction in [`StationStats::from_values`].
const LANES: usize = 8;

/* ===================== StationStats ===================== */

/// Mergeable `{min, max, sum, count}` summary of one station's measurements.
///
/// A zero `count` marks the identity element. It merges with anything without
/// changing it and is never rendered.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StationStats {
    min: f64,
    max: f64,
    sum: f64,
    count: u64,
}

impl Default for StationStats {
    fn default() -> Self {
        Self::identity()
    }
}

impl StationStats {
    /// `{min: +inf, max: -inf, sum: 0, count: 0}`.
    #[must_use]
    pub const fn identity() -> Self {
        Self {
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            sum: 0.0,
            count: 0,
        }
    }

    /// Accumulator holding exactly one measurement.
    #[must_use]
    pub const fn from_value(v: f64) -> Self {
        Self {
            min: v,
            max: v,
            sum: v,
            count: 1,
        }
    }

    /// Fold one measurement in.
    #[inline]
    pub fn fold(&mut self, v: f64) {
        self.min = self.min.min(v);
        self.max = self.max.max(v);
        self.sum += v;
        self.count += 1;
    }

    /// Merge an accumulator built over a disjoint set of measurements.
    #[inline]
    pub fn merge(&mut self, other: Self) {
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
        self.sum += other.sum;
        self.count += other.count;
    }

    /// Build an accumulator from a buffered slice in one pass.
    ///
    /// The bulk of the slice is reduced in `LANES` independent lanes that the
    /// compiler can vectorize; the tail is folded one value at a time.
    #[must_use]
    pub fn from_values(values: &[f64]) -> Self {
        let mut mins = [f64::INFINITY; LANES];
        let mut maxs = [f64::NEG_INFINITY; LANES];
        let mut sums = [0.0_f64; LANES];

        let chunks = values.chunks_exact(LANES);
        let tail = chunks.remainder();
        for chunk in chunks {
            for lane in 0..LANES {
                mins[lane] = mins[lane].min(chunk[lane]);
                maxs[lane] = maxs[lane].max(chunk[lane]);
                sums[lane] += chunk[lane];
            }
        }

        let mut stats = Self {
            min: mins.iter().copied().fold(f64::INFINITY, f64::min),
            max: maxs.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            sum: sums.iter().sum(),
            count: (values.len() - tail.len()) as u64,
        };
        for &v in tail {
            stats.fold(v);
        }
        stats
    }

    /// `sum / count`.
    ///
    /// # Errors
    /// [`Error::EmptyAccumulator`] on the identity element.
    #[allow(clippy::cast_precision_loss)]
    pub fn mean(&self) -> Result<f64> {
        if self.count == 0 {
            return Err(Error::EmptyAccumulator);
        }
        Ok(self.sum / self.count as f64)
    }

    /// `true` while nothing has been folded in.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    #[must_use]
    pub const fn min(&self) -> f64 {
        self.min
    }

    #[must_use]
    pub const fn max(&self) -> f64 {
        self.max
    }

    #[must_use]
    pub const fn sum(&self) -> f64 {
        self.sum
    }

    #[must_use]
    pub const fn count(&self) -> u64 {
        self.count
    }
}

/* ===================== MinMeanMax ===================== */

/// Rounded min/mean/max per station.
///
/// - Accumulator: [`StationStats`]
/// - Output: [`StationSummary`]
#[derive(Clone, Copy, Debug, Default)]
pub struct MinMeanMax;

impl CombineFn<f64, StationStats, StationSummary> for MinMeanMax {
    fn create(&self) -> StationStats {
        StationStats::identity()
    }

    #[inline]
    fn add_input(&self, acc: &mut StationStats, v: f64) {
        acc.fold(v);
    }

    fn merge(&self, acc: &mut StationStats, other: StationStats) {
        acc.merge(other);
    }

    fn finish(&self, acc: StationStats) -> Result<StationSummary> {
        StationSummary::from_stats(&acc)
    }
}

impl LiftableCombiner<f64, StationStats, StationSummary> for MinMeanMax {
    fn build_from_group(&self, values: &[f64]) -> StationStats {
        StationStats::from_values(values)
    }
}
