use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::core::LinearScale;
use crate::core::scale::DEFAULT_TICK_COUNT;

/// Factors above this collapse the histogram into a single bin.
pub const SINGLE_BIN_FACTOR_THRESHOLD: f64 = 0.95;

/// Smallest bin is at least this fraction of the natural tick interval.
const MIN_WIDTH_TICK_FRACTION: f64 = 1.0 / 16.0;
/// Smallest bin is at least this many pixels wide.
const MIN_WIDTH_PIXELS: f64 = 2.0;
/// Nice bin widths are these multiples of a power of ten.
const NICE_MULTIPLIERS: [f64; 5] = [1.0, 2.0, 4.0, 5.0, 8.0];
const SCOTT_COEFFICIENT: f64 = 3.49;
/// Upper bound of the single bin is widened by this many machine epsilons
/// times the domain width so the maximum value stays inside it.
const SINGLE_BIN_EPSILON_SCALE: f64 = 1000.0;
const MAX_THRESHOLDS: usize = 100_000;

/// Normalizes an aggregate factor: NaN becomes 0, everything else is clamped
/// to `[0, 1]`.
#[must_use]
pub fn sanitize_aggregate_factor(factor: f64) -> f64 {
    if factor.is_nan() {
        return 0.0;
    }
    factor.clamp(0.0, 1.0)
}

/// One histogram bin over `[x0, x1)`; the last bin of a set also includes `x1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bin {
    pub x0: f64,
    pub x1: f64,
    pub count: usize,
    /// Sum of sample weights; equals `count` when counting plain values.
    pub value: f64,
}

/// Bin count derived from an aggregate factor before width snapping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BinCountPlan {
    /// Narrowest bin that is still visually distinguishable.
    pub min_width: f64,
    /// Bin count at factor 0.
    pub max_bin_count: usize,
    /// Bin count requested for the factor.
    pub bin_count: usize,
    /// Domain width divided by `bin_count`.
    pub raw_width: f64,
}

/// Bin width of the form `multiplier × 10^exponent`.
///
/// Grid values are produced by division for negative exponents so that
/// multiples such as `3 × 0.1` come out as the closest double to `0.3`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NiceWidth {
    pub multiplier: f64,
    pub exponent: i32,
}

impl NiceWidth {
    /// Snaps `raw_width` to the nearest `{1, 2, 4, 5, 8} × 10^m`.
    ///
    /// Returns `None` for non-positive or non-finite widths.
    #[must_use]
    pub fn nearest(raw_width: f64) -> Option<Self> {
        if !raw_width.is_finite() || raw_width <= 0.0 {
            return None;
        }

        let exponent = raw_width.log10().floor() as i32;
        let mut candidates: SmallVec<[Self; 6]> = NICE_MULTIPLIERS
            .iter()
            .map(|multiplier| Self {
                multiplier: *multiplier,
                exponent,
            })
            .collect();
        candidates.push(Self {
            multiplier: 1.0,
            exponent: exponent + 1,
        });

        candidates.into_iter().min_by(|left, right| {
            (left.value() - raw_width)
                .abs()
                .total_cmp(&(right.value() - raw_width).abs())
        })
    }

    /// Smallest `{1, 2, 4, 5, 8} × 10^m` that is at least `floor`.
    ///
    /// Returns `None` for non-positive or non-finite floors.
    #[must_use]
    pub fn at_least(floor: f64) -> Option<Self> {
        if !floor.is_finite() || floor <= 0.0 {
            return None;
        }

        let exponent = floor.log10().floor() as i32;
        let tolerance = floor * 1e-9;
        NICE_MULTIPLIERS
            .iter()
            .map(|multiplier| Self {
                multiplier: *multiplier,
                exponent,
            })
            .chain([Self {
                multiplier: 1.0,
                exponent: exponent + 1,
            }])
            .find(|candidate| candidate.value() + tolerance >= floor)
    }

    /// Nearest nice width to `raw_width`, stepped up to the next candidate
    /// when the nearest one would be narrower than `floor`.
    #[must_use]
    pub fn nearest_at_least(raw_width: f64, floor: f64) -> Option<Self> {
        let nearest = Self::nearest(raw_width)?;
        if nearest.value() + floor * 1e-9 >= floor {
            return Some(nearest);
        }
        Self::at_least(floor).or(Some(nearest))
    }

    #[must_use]
    pub fn value(self) -> f64 {
        self.grid_value(1.0)
    }

    /// Value of the `index`-th multiple of the width.
    #[must_use]
    pub fn grid_value(self, index: f64) -> f64 {
        if self.exponent >= 0 {
            index * self.multiplier * 10_f64.powi(self.exponent)
        } else {
            index * self.multiplier / 10_f64.powi(-self.exponent)
        }
    }

    /// Index of the last grid multiple at or below `value`.
    #[must_use]
    pub fn floor_index(self, value: f64) -> f64 {
        let raw = if self.exponent >= 0 {
            value / (self.multiplier * 10_f64.powi(self.exponent))
        } else {
            value * 10_f64.powi(-self.exponent) / self.multiplier
        };
        let nearest = raw.round();
        if (raw - nearest).abs() <= 1e-9 {
            nearest
        } else {
            raw.floor()
        }
    }
}

/// Threshold set for one continuous axis at one aggregate factor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinThresholds {
    thresholds: Vec<f64>,
    bin_width: f64,
    domain: (f64, f64),
    plan: BinCountPlan,
    single_bin: bool,
}

impl BinThresholds {
    /// Grid-aligned thresholds; the first may lie below the domain minimum.
    #[must_use]
    pub fn thresholds(&self) -> &[f64] {
        &self.thresholds
    }

    #[must_use]
    pub fn bin_width(&self) -> f64 {
        self.bin_width
    }

    /// Binning domain. In the single-bin case the upper bound is slightly
    /// wider than the scale domain.
    #[must_use]
    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    #[must_use]
    pub fn plan(&self) -> BinCountPlan {
        self.plan
    }

    #[must_use]
    pub fn is_single_bin(&self) -> bool {
        self.single_bin
    }

    /// Bin edges: domain minimum, thresholds strictly inside the domain,
    /// domain maximum.
    #[must_use]
    pub fn edges(&self) -> Vec<f64> {
        let (lo, hi) = self.domain;
        let mut edges = Vec::with_capacity(self.thresholds.len() + 2);
        edges.push(lo);
        edges.extend(
            self.thresholds
                .iter()
                .copied()
                .filter(|threshold| *threshold > lo && *threshold < hi),
        );
        edges.push(hi);
        edges
    }

    #[must_use]
    pub fn bin_count(&self) -> usize {
        self.edges().len() - 1
    }

    /// Index of the bin holding `value`, or `None` when the value is outside
    /// the domain or not finite.
    #[must_use]
    pub fn bin_index(&self, value: f64) -> Option<usize> {
        let (lo, hi) = self.domain;
        if !value.is_finite() || value < lo || value > hi {
            return None;
        }
        let edges = self.edges();
        let interior = &edges[1..edges.len() - 1];
        Some(interior.partition_point(|threshold| *threshold <= value))
    }

    /// Counts values into bins.
    #[must_use]
    pub fn bin(&self, values: &[f64]) -> Vec<Bin> {
        let counts = self.count_values(values);
        self.edges()
            .windows(2)
            .zip(counts)
            .map(|(edge, count)| Bin {
                x0: edge[0],
                x1: edge[1],
                count,
                value: count as f64,
            })
            .collect()
    }

    /// Sums `(value, weight)` samples into bins.
    #[must_use]
    pub fn bin_weighted<I>(&self, samples: I) -> Vec<Bin>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let mut bins: Vec<Bin> = self
            .edges()
            .windows(2)
            .map(|edge| Bin {
                x0: edge[0],
                x1: edge[1],
                count: 0,
                value: 0.0,
            })
            .collect();
        for (value, weight) in samples {
            if let Some(index) = self.bin_index(value) {
                bins[index].count += 1;
                if weight.is_finite() {
                    bins[index].value += weight;
                }
            }
        }
        bins
    }

    #[cfg(not(feature = "parallel-binning"))]
    fn count_values(&self, values: &[f64]) -> Vec<usize> {
        let mut counts = vec![0_usize; self.bin_count()];
        for value in values {
            if let Some(index) = self.bin_index(*value) {
                counts[index] += 1;
            }
        }
        counts
    }

    #[cfg(feature = "parallel-binning")]
    fn count_values(&self, values: &[f64]) -> Vec<usize> {
        use rayon::prelude::*;

        let bin_count = self.bin_count();
        values
            .par_iter()
            .fold(
                || vec![0_usize; bin_count],
                |mut counts, value| {
                    if let Some(index) = self.bin_index(*value) {
                        counts[index] += 1;
                    }
                    counts
                },
            )
            .reduce(
                || vec![0_usize; bin_count],
                |mut left, right| {
                    for (total, count) in left.iter_mut().zip(right) {
                        *total += count;
                    }
                    left
                },
            )
    }
}

/// Narrowest visible bin width for a scale: a sixteenth of the natural tick
/// interval, but never less than two pixels.
#[must_use]
pub fn min_bin_width(scale: LinearScale) -> f64 {
    let tick_fraction = scale.tick_step(DEFAULT_TICK_COUNT) * MIN_WIDTH_TICK_FRACTION;
    tick_fraction.max(MIN_WIDTH_PIXELS * scale.units_per_pixel())
}

/// Converts an aggregate factor into a bin count.
///
/// The factor is passed through a fourth root so that equal slider moves
/// feel like equal changes in bin count.
#[must_use]
pub fn plan_bin_count(scale: LinearScale, factor: f64) -> BinCountPlan {
    let factor = sanitize_aggregate_factor(factor);
    let width = scale.domain_span();
    let min_width = min_bin_width(scale);

    let max_bin_count = if min_width > 0.0 && width > 0.0 {
        (width / min_width).round().max(1.0) as usize
    } else {
        1
    };
    let transformed = factor.sqrt().sqrt();
    let bin_count = (1.0 + (max_bin_count as f64 - 1.0) * (1.0 - transformed))
        .round()
        .max(1.0) as usize;

    BinCountPlan {
        min_width,
        max_bin_count,
        bin_count,
        raw_width: width / bin_count as f64,
    }
}

/// Computes tick-aligned bin thresholds for the scale domain at `factor`.
///
/// Empty input, a zero-width domain and factors above
/// [`SINGLE_BIN_FACTOR_THRESHOLD`] produce a single bin.
#[must_use]
pub fn bins_for_factor(values: &[f64], scale: LinearScale, factor: f64) -> BinThresholds {
    let (lo, hi) = sorted(scale.domain());
    let width = hi - lo;
    let plan = plan_bin_count(scale, factor);
    let factor = sanitize_aggregate_factor(factor);

    let nice = NiceWidth::nearest_at_least(plan.raw_width, plan.min_width);
    let single_bin = values.is_empty() || width <= 0.0 || factor > SINGLE_BIN_FACTOR_THRESHOLD;
    let Some(nice) = nice.filter(|_| !single_bin) else {
        let upper = hi + SINGLE_BIN_EPSILON_SCALE * f64::EPSILON * width;
        trace!(lo, upper, factor, "single bin");
        return BinThresholds {
            thresholds: vec![lo],
            bin_width: upper - lo,
            domain: (lo, upper),
            plan,
            single_bin: true,
        };
    };

    let first_index = nice.floor_index(lo);
    let mut thresholds = Vec::new();
    for offset in 0..MAX_THRESHOLDS {
        let threshold = nice.grid_value(first_index + offset as f64);
        if threshold >= hi {
            break;
        }
        thresholds.push(threshold);
    }

    trace!(
        factor,
        bin_count = plan.bin_count,
        width = nice.value(),
        thresholds = thresholds.len(),
        "bin thresholds"
    );

    BinThresholds {
        thresholds,
        bin_width: nice.value(),
        domain: (lo, hi),
        plan,
        single_bin: false,
    }
}

/// Bin count suggested by Scott's normal reference rule, or `None` when the
/// sample has fewer than two finite values or no spread.
#[must_use]
pub fn scott_bin_count(values: &[f64]) -> Option<usize> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    let n = finite.len();
    if n < 2 {
        return None;
    }

    let mean = finite.iter().sum::<f64>() / n as f64;
    let variance = finite
        .iter()
        .map(|value| (value - mean) * (value - mean))
        .sum::<f64>()
        / (n - 1) as f64;
    let deviation = variance.sqrt();
    if !(deviation > 0.0) {
        return None;
    }

    let (min, max) = finite
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), value| {
            (lo.min(*value), hi.max(*value))
        });
    let count = ((max - min) * (n as f64).cbrt() / (SCOTT_COEFFICIENT * deviation)).ceil();
    Some(count.max(1.0) as usize)
}

/// Estimates the initial aggregate factor for `values` on `scale`.
///
/// The Scott bin count is placed on the `[1, max_bin_count]` interval, turned
/// into a coarseness in `[0, 1]`, and raised to the fourth power.
#[must_use]
pub fn default_aggregate(values: &[f64], scale: LinearScale) -> f64 {
    let Some(suggested) = scott_bin_count(values) else {
        debug!(samples = values.len(), "no spread in sample, defaulting to one bin");
        return 1.0;
    };

    let max_bin_count = plan_bin_count(scale, 0.0).max_bin_count;
    if max_bin_count <= 1 {
        return 0.0;
    }

    let coarseness = 1.0 - (suggested as f64 - 1.0) / (max_bin_count as f64 - 1.0);
    let coarseness = coarseness.clamp(0.0, 1.0);
    let factor = coarseness * coarseness * coarseness * coarseness;
    debug!(suggested, max_bin_count, factor, "default aggregate");
    factor
}

fn sorted((start, end): (f64, f64)) -> (f64, f64) {
    if start <= end { (start, end) } else { (end, start) }
}

#[cfg(test)]
mod tests {
    use super::{NiceWidth, sanitize_aggregate_factor};

    #[test]
    fn nice_width_picks_nearest_candidate() {
        let nice = NiceWidth::nearest(0.625).expect("nice");
        assert_eq!(nice.value(), 0.5);
        let nice = NiceWidth::nearest(3.846).expect("nice");
        assert_eq!(nice.value(), 4.0);
        let nice = NiceWidth::nearest(9.3).expect("nice");
        assert_eq!((nice.multiplier, nice.exponent), (1.0, 1));
        assert!(NiceWidth::nearest(0.0).is_none());
    }

    #[test]
    fn nice_width_steps_up_to_the_visibility_floor() {
        let nice = NiceWidth::nearest_at_least(0.625, 0.625).expect("nice");
        assert_eq!(nice.value(), 0.8);
        let nice = NiceWidth::nearest_at_least(3.846, 0.625).expect("nice");
        assert_eq!(nice.value(), 4.0);
        let nice = NiceWidth::at_least(9.3).expect("nice");
        assert_eq!((nice.multiplier, nice.exponent), (1.0, 1));
        let nice = NiceWidth::at_least(0.5).expect("nice");
        assert_eq!(nice.value(), 0.5);
        assert!(NiceWidth::at_least(-1.0).is_none());
    }

    #[test]
    fn grid_values_avoid_accumulated_error() {
        let nice = NiceWidth {
            multiplier: 1.0,
            exponent: -1,
        };
        assert_eq!(nice.grid_value(3.0), 0.3);
        assert_eq!(nice.floor_index(0.3), 3.0);
        assert_eq!(nice.floor_index(-0.25), -3.0);
    }

    #[test]
    fn nan_factor_is_treated_as_zero() {
        assert_eq!(sanitize_aggregate_factor(f64::NAN), 0.0);
        assert_eq!(sanitize_aggregate_factor(1.7), 1.0);
        assert_eq!(sanitize_aggregate_factor(-0.2), 0.0);
    }
}
