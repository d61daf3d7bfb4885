use serde::{Deserialize, Serialize};

use crate::error::{RebinError, RebinResult};

const E10: f64 = 7.071_067_811_865_475; // sqrt(50)
const E5: f64 = 3.162_277_660_168_379_5; // sqrt(10)
const E2: f64 = std::f64::consts::SQRT_2;
const NICE_MAX_ITERATIONS: usize = 10;

/// Number of ticks a continuous axis asks for when nothing else is specified.
pub const DEFAULT_TICK_COUNT: usize = 10;

/// Continuous linear mapping from a data domain to a pixel range.
///
/// A zero-width domain is accepted and maps every value to the middle of the
/// range, so degenerate data can still be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearScale {
    domain_start: f64,
    domain_end: f64,
    range_start: f64,
    range_end: f64,
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> RebinResult<Self> {
        if !domain.0.is_finite() || !domain.1.is_finite() {
            return Err(RebinError::InvalidData(
                "scale domain must be finite".to_owned(),
            ));
        }
        if !range.0.is_finite() || !range.1.is_finite() {
            return Err(RebinError::InvalidData(
                "scale range must be finite".to_owned(),
            ));
        }

        Ok(Self {
            domain_start: domain.0,
            domain_end: domain.1,
            range_start: range.0,
            range_end: range.1,
        })
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        (self.domain_start, self.domain_end)
    }

    #[must_use]
    pub fn range(self) -> (f64, f64) {
        (self.range_start, self.range_end)
    }

    /// Absolute width of the domain.
    #[must_use]
    pub fn domain_span(self) -> f64 {
        (self.domain_end - self.domain_start).abs()
    }

    /// Absolute length of the pixel range.
    #[must_use]
    pub fn range_span(self) -> f64 {
        (self.range_end - self.range_start).abs()
    }

    /// Returns a copy with a new domain and the same range.
    pub fn with_domain(self, start: f64, end: f64) -> RebinResult<Self> {
        Self::new((start, end), self.range())
    }

    #[must_use]
    pub fn map(self, value: f64) -> f64 {
        let span = self.domain_end - self.domain_start;
        if span == 0.0 {
            return (self.range_start + self.range_end) * 0.5;
        }
        let normalized = (value - self.domain_start) / span;
        self.range_start + normalized * (self.range_end - self.range_start)
    }

    #[must_use]
    pub fn invert(self, pixel: f64) -> f64 {
        let span = self.range_end - self.range_start;
        if span == 0.0 {
            return self.domain_start;
        }
        let normalized = (pixel - self.range_start) / span;
        self.domain_start + normalized * (self.domain_end - self.domain_start)
    }

    /// Domain units covered by one pixel.
    #[must_use]
    pub fn units_per_pixel(self) -> f64 {
        let range_span = self.range_span();
        if range_span == 0.0 {
            return self.domain_span();
        }
        self.domain_span() / range_span
    }

    /// Natural tick interval for roughly `count` ticks over the domain.
    ///
    /// Returns `0.0` for a zero-width domain.
    #[must_use]
    pub fn tick_step(self, count: usize) -> f64 {
        let (lo, hi) = self.sorted_domain();
        let increment = tick_increment(lo, hi, count);
        if increment > 0.0 {
            increment
        } else if increment < 0.0 {
            1.0 / -increment
        } else {
            0.0
        }
    }

    /// Tick values at multiples of a 1/2/5 × 10^k step inside the domain.
    #[must_use]
    pub fn ticks(self, count: usize) -> Vec<f64> {
        if count == 0 {
            return Vec::new();
        }
        let (lo, hi) = self.sorted_domain();
        if lo == hi {
            return vec![lo];
        }

        let increment = tick_increment(lo, hi, count);
        if increment == 0.0 || !increment.is_finite() {
            return Vec::new();
        }

        let ticks: Vec<f64> = if increment < 0.0 {
            let inverse = -increment;
            let mut first = (lo * inverse).round();
            let mut last = (hi * inverse).round();
            if first / inverse < lo {
                first += 1.0;
            }
            if last / inverse > hi {
                last -= 1.0;
            }
            integer_span(first, last)
                .map(|index| index / inverse)
                .collect()
        } else {
            let mut first = (lo / increment).round();
            let mut last = (hi / increment).round();
            if first * increment < lo {
                first += 1.0;
            }
            if last * increment > hi {
                last -= 1.0;
            }
            integer_span(first, last)
                .map(|index| index * increment)
                .collect()
        };

        if self.domain_end < self.domain_start {
            ticks.into_iter().rev().collect()
        } else {
            ticks
        }
    }

    /// Extends the domain outward to multiples of the tick step.
    ///
    /// The step is recomputed after each extension until it stops changing;
    /// the domain is left untouched when it never settles.
    #[must_use]
    pub fn nice(self, count: usize) -> Self {
        let reversed = self.domain_end < self.domain_start;
        let (mut start, mut stop) = self.sorted_domain();
        if start == stop || count == 0 {
            return self;
        }

        let mut previous_step: Option<f64> = None;
        for _ in 0..NICE_MAX_ITERATIONS {
            let step = tick_increment(start, stop, count);
            if previous_step == Some(step) {
                let (domain_start, domain_end) = if reversed {
                    (stop, start)
                } else {
                    (start, stop)
                };
                return Self {
                    domain_start,
                    domain_end,
                    ..self
                };
            }
            if step > 0.0 {
                start = (start / step).floor() * step;
                stop = (stop / step).ceil() * step;
            } else if step < 0.0 {
                start = (start * step).ceil() / step;
                stop = (stop * step).floor() / step;
            } else {
                break;
            }
            previous_step = Some(step);
        }

        self
    }

    fn sorted_domain(self) -> (f64, f64) {
        if self.domain_start <= self.domain_end {
            (self.domain_start, self.domain_end)
        } else {
            (self.domain_end, self.domain_start)
        }
    }
}

/// Tick increment for `count` ticks over `[start, stop]`.
///
/// Steps below one are returned as the negated inverse (`-10` for `0.1`) so
/// that tick values can be produced by division without accumulating error.
pub(crate) fn tick_increment(start: f64, stop: f64, count: usize) -> f64 {
    if count == 0 || !(stop > start) {
        return 0.0;
    }

    let step = (stop - start) / count as f64;
    let power = step.log10().floor();
    let error = step / 10_f64.powf(power);
    let factor = if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    };

    if power >= 0.0 {
        factor * 10_f64.powf(power)
    } else {
        -10_f64.powf(-power) / factor
    }
}

fn integer_span(first: f64, last: f64) -> impl Iterator<Item = f64> {
    let count = if last >= first {
        (last - first) as usize + 1
    } else {
        0
    };
    (0..count).map(move |offset| first + offset as f64)
}

#[cfg(test)]
mod tests {
    use super::{LinearScale, tick_increment};

    #[test]
    fn tick_increment_uses_inverse_form_below_one() {
        assert_eq!(tick_increment(0.0, 1.0, 10), -10.0);
        assert_eq!(tick_increment(0.0, 100.0, 10), 10.0);
        assert_eq!(tick_increment(0.0, 1.0, 0), 0.0);
    }

    #[test]
    fn ticks_on_unit_domain_are_exact_tenths() {
        let scale = LinearScale::new((0.0, 1.0), (0.0, 100.0)).expect("scale");
        let ticks = scale.ticks(10);
        assert_eq!(ticks.len(), 11);
        assert_eq!(ticks[3], 0.3);
        assert_eq!(ticks[10], 1.0);
    }

    #[test]
    fn nice_extends_domain_to_step_multiples() {
        let scale = LinearScale::new((0.13, 9.87), (0.0, 500.0))
            .expect("scale")
            .nice(10);
        assert_eq!(scale.domain(), (0.0, 10.0));
    }
}
