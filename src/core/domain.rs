use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::Value;
use crate::error::{RebinError, RebinResult};

/// Set of input values a scale maps from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Domain {
    Continuous { min: f64, max: f64 },
    Ordinal(Vec<Value>),
}

impl Domain {
    #[must_use]
    pub fn is_ordinal(&self) -> bool {
        matches!(self, Self::Ordinal(_))
    }

    /// Continuous bounds, or `None` for ordinal domains.
    #[must_use]
    pub fn as_continuous(&self) -> Option<(f64, f64)> {
        match self {
            Self::Continuous { min, max } => Some((*min, *max)),
            Self::Ordinal(_) => None,
        }
    }

    /// Category list, or `None` for continuous domains.
    #[must_use]
    pub fn as_ordinal(&self) -> Option<&[Value]> {
        match self {
            Self::Continuous { .. } => None,
            Self::Ordinal(keys) => Some(keys),
        }
    }
}

/// Initial and current bounds of one axis in numeric form.
///
/// Ordinal axes use category indices and `step = 1`, so that an index window
/// `[min, max]` covers `max - min + step` categories. Continuous axes use
/// `step = 0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisBounds {
    pub min0: f64,
    pub max0: f64,
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl AxisBounds {
    /// Initial extent including the trailing category of an ordinal axis.
    #[must_use]
    pub fn initial_extent(self) -> f64 {
        self.max0 - self.min0 + self.step
    }

    /// Current extent including the trailing category of an ordinal axis.
    #[must_use]
    pub fn current_extent(self) -> f64 {
        self.max - self.min + self.step
    }

    #[must_use]
    pub fn is_ordinal(self) -> bool {
        self.step > 0.0
    }

    #[must_use]
    pub fn contains_current(self) -> bool {
        self.min0 <= self.min && self.min <= self.max && self.max <= self.max0
    }
}

/// Per-axis record of the immutable initial domain and the live window.
///
/// The window is stored as numeric bounds into the initial domain, which keeps
/// the current domain contained in the initial one by construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisDomains {
    initial: Domain,
    current_min: f64,
    current_max: f64,
}

impl AxisDomains {
    pub fn continuous(min: f64, max: f64) -> RebinResult<Self> {
        if !min.is_finite() || !max.is_finite() {
            return Err(RebinError::InvalidData(
                "continuous domain bounds must be finite".to_owned(),
            ));
        }
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        Ok(Self {
            initial: Domain::Continuous { min, max },
            current_min: min,
            current_max: max,
        })
    }

    #[must_use]
    pub fn ordinal(keys: Vec<Value>) -> Self {
        let last = keys.len().saturating_sub(1) as f64;
        Self {
            initial: Domain::Ordinal(keys),
            current_min: 0.0,
            current_max: last,
        }
    }

    #[must_use]
    pub fn initial(&self) -> &Domain {
        &self.initial
    }

    #[must_use]
    pub fn is_ordinal(&self) -> bool {
        self.initial.is_ordinal()
    }

    /// Materializes the current window as a domain.
    #[must_use]
    pub fn current(&self) -> Domain {
        match &self.initial {
            Domain::Continuous { .. } => Domain::Continuous {
                min: self.current_min,
                max: self.current_max,
            },
            Domain::Ordinal(keys) => Domain::Ordinal(self.current_keys(keys).to_vec()),
        }
    }

    /// Current categories as a borrowed slice of the initial list.
    ///
    /// Continuous axes return an empty slice.
    #[must_use]
    pub fn current_categories(&self) -> &[Value] {
        match &self.initial {
            Domain::Continuous { .. } => &[],
            Domain::Ordinal(keys) => self.current_keys(keys),
        }
    }

    #[must_use]
    pub fn bounds(&self) -> AxisBounds {
        match &self.initial {
            Domain::Continuous { min, max } => AxisBounds {
                min0: *min,
                max0: *max,
                min: self.current_min,
                max: self.current_max,
                step: 0.0,
            },
            Domain::Ordinal(keys) => AxisBounds {
                min0: 0.0,
                max0: keys.len().saturating_sub(1) as f64,
                min: self.current_min,
                max: self.current_max,
                step: 1.0,
            },
        }
    }

    /// Moves the window, clamped to the initial bounds.
    ///
    /// Ordinal bounds are rounded to whole category indices. Non-finite input
    /// leaves the window unchanged.
    pub fn set_bounds(&mut self, min: f64, max: f64) {
        if !min.is_finite() || !max.is_finite() {
            return;
        }
        let bounds = self.bounds();
        let (mut min, mut max) = if min <= max { (min, max) } else { (max, min) };
        if bounds.is_ordinal() {
            min = min.round();
            max = max.round();
        }
        self.current_min = min.clamp(bounds.min0, bounds.max0);
        self.current_max = max.clamp(self.current_min, bounds.max0);
        trace!(
            min = self.current_min,
            max = self.current_max,
            "axis window updated"
        );
    }

    /// Restores the window to the full initial domain.
    pub fn reset(&mut self) {
        let bounds = self.bounds();
        self.current_min = bounds.min0;
        self.current_max = bounds.max0;
    }

    /// Carries the current window over to `next`, the same axis rebuilt from
    /// new data.
    ///
    /// A full window stays full. A continuous window is clamped into the new
    /// initial domain. An ordinal window is kept while both of its end
    /// categories still exist. Anything else leaves `next` at full extent.
    #[must_use]
    pub fn rebased(&self, mut next: AxisDomains) -> AxisDomains {
        let bounds = self.bounds();
        if bounds.min == bounds.min0 && bounds.max == bounds.max0 {
            return next;
        }

        let window = match (&self.initial, &next.initial) {
            (Domain::Continuous { .. }, Domain::Continuous { min, max }) => {
                (bounds.min < *max && bounds.max > *min).then_some((bounds.min, bounds.max))
            }
            (Domain::Ordinal(keys), Domain::Ordinal(next_keys)) => {
                let current = self.current_keys(keys);
                let position =
                    |key: &Value| next_keys.iter().position(|candidate| candidate == key);
                let first = current.first().and_then(position);
                let last = current.last().and_then(position);
                match (first, last) {
                    (Some(first), Some(last)) if first <= last => {
                        Some((first as f64, last as f64))
                    }
                    _ => None,
                }
            }
            _ => None,
        };

        if let Some((min, max)) = window {
            next.set_bounds(min, max);
        }
        next
    }

    fn current_keys<'a>(&self, keys: &'a [Value]) -> &'a [Value] {
        if keys.is_empty() {
            return keys;
        }
        let start = self.current_min as usize;
        let end = (self.current_max as usize + 1).min(keys.len());
        &keys[start.min(end)..end]
    }
}
