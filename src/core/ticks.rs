use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::LinearScale;
use crate::core::continuous_binning::BinThresholds;

/// Default minimum distance between two tick labels, in pixels.
pub const MIN_LABEL_SPACING_PX: f64 = 40.0;

const DIVISOR_MULTIPLIERS: [u64; 5] = [1, 2, 4, 5, 8];
const MAX_DIVISOR_EXPONENT: u32 = 15;
const MAX_PRECISION: usize = 15;
/// Rounding the step may lose at most this share of it.
const PRECISION_TOLERANCE: f64 = 0.01;

/// Ticks chosen for one axis together with their label precision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickSelection {
    pub values: Vec<f64>,
    /// Distance between two kept ticks.
    pub step: f64,
    /// Decimal places used for labels.
    pub precision: usize,
}

impl TickSelection {
    #[must_use]
    pub fn labels(&self) -> Vec<String> {
        self.values
            .iter()
            .map(|value| format!("{:.*}", self.precision, value))
            .collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Picks label ticks from bin thresholds.
///
/// A tick one bin beyond the last threshold is added when it still lies in
/// the domain, and a first threshold below the domain is dropped. The set is
/// then thinned by the smallest `{1, 2, 4, 5, 8} × 10^m` divisor that keeps
/// labels at least `min_spacing_px` apart. Kept ticks are those whose grid
/// index is a multiple of the divisor, so they stay put while panning.
#[must_use]
pub fn select_ticks(
    thresholds: &BinThresholds,
    scale: LinearScale,
    min_spacing_px: f64,
) -> TickSelection {
    let (start, end) = scale.domain();
    let (lo, hi) = if start <= end { (start, end) } else { (end, start) };
    let step = thresholds.bin_width();

    let mut candidates = thresholds.thresholds().to_vec();
    if let Some(last) = candidates.last().copied() {
        let next = last + step;
        if next <= hi {
            candidates.push(next);
        }
    }
    if candidates.first().is_some_and(|first| *first < lo) {
        candidates.remove(0);
    }

    if !(step > 0.0) || !step.is_finite() {
        return TickSelection {
            values: candidates,
            step: 0.0,
            precision: 0,
        };
    }

    let divisor = thinning_divisor(step, scale.units_per_pixel(), min_spacing_px);
    let values: Vec<f64> = candidates
        .into_iter()
        .filter(|tick| ((tick / step).round() as i64).rem_euclid(divisor as i64) == 0)
        .collect();
    let kept_step = step * divisor as f64;

    trace!(divisor, kept = values.len(), "ticks thinned");
    TickSelection {
        values,
        step: kept_step,
        precision: label_precision(kept_step),
    }
}

/// Ticks for a value axis at the scale's natural step.
#[must_use]
pub fn linear_axis_ticks(scale: LinearScale, count: usize) -> TickSelection {
    let step = scale.tick_step(count);
    TickSelection {
        values: scale.ticks(count),
        step,
        precision: label_precision(step),
    }
}

/// Decimal places needed to print multiples of `step`.
///
/// Starts from the step's order of magnitude and adds digits while rounding
/// the step to that many places loses more than 1% of it.
#[must_use]
pub fn label_precision(step: f64) -> usize {
    if !(step > 0.0) || !step.is_finite() {
        return 0;
    }

    let mut precision = (-step.log10().floor()).max(0.0) as usize;
    while precision < MAX_PRECISION {
        let scale = 10_f64.powi(precision as i32);
        let rounded = (step * scale).round() / scale;
        if (rounded - step).abs() <= PRECISION_TOLERANCE * step {
            break;
        }
        precision += 1;
    }
    precision.min(MAX_PRECISION)
}

fn thinning_divisor(step: f64, units_per_pixel: f64, min_spacing_px: f64) -> u64 {
    if !(units_per_pixel > 0.0) {
        return 1;
    }
    let pixels_per_step = step / units_per_pixel;
    for exponent in 0..=MAX_DIVISOR_EXPONENT {
        let magnitude = 10_u64.pow(exponent);
        for multiplier in DIVISOR_MULTIPLIERS {
            let divisor = multiplier * magnitude;
            if pixels_per_step * divisor as f64 >= min_spacing_px {
                return divisor;
            }
        }
    }
    10_u64.pow(MAX_DIVISOR_EXPONENT)
}

#[cfg(test)]
mod tests {
    use super::{label_precision, thinning_divisor};

    #[test]
    fn precision_follows_step_magnitude() {
        assert_eq!(label_precision(10.0), 0);
        assert_eq!(label_precision(0.5), 1);
        assert_eq!(label_precision(0.25), 2);
        assert_eq!(label_precision(0.04), 2);
        assert_eq!(label_precision(0.0), 0);
    }

    #[test]
    fn divisor_is_smallest_candidate_meeting_spacing() {
        assert_eq!(thinning_divisor(1.0, 0.1, 40.0), 4);
        assert_eq!(thinning_divisor(1.0, 0.01, 40.0), 1);
        assert_eq!(thinning_divisor(1.0, 1.0, 40.0), 40);
    }
}
