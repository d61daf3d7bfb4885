use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{AxisBounds, AxisDomains};

/// Each zoom-in trims `1 / ZOOM_DIVISOR` of the window from both sides, and the
/// window never shrinks below `1 / ZOOM_DIVISOR` of the initial extent.
pub const ZOOM_DIVISOR: f64 = 8.0;

/// Share of the initial extent a bound may travel inward: `(d - 1) / 2d`.
const ZOOM_IN_LIMIT_RATIO: f64 = (ZOOM_DIVISOR - 1.0) / (2.0 * ZOOM_DIVISOR);

/// Each zoom-out grows both sides by `1 / ZOOM_OUT_DIVISOR` of the window.
const ZOOM_OUT_DIVISOR: f64 = ZOOM_DIVISOR - 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZoomDirection {
    In,
    Out,
}

/// Axes a zoom request applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoomAxes {
    pub x: bool,
    pub y: bool,
}

impl ZoomAxes {
    pub const BOTH: Self = Self { x: true, y: true };
    pub const X_ONLY: Self = Self { x: true, y: false };
    pub const Y_ONLY: Self = Self { x: false, y: true };
    pub const NONE: Self = Self { x: false, y: false };

    #[must_use]
    pub fn any(self) -> bool {
        self.x || self.y
    }
}

impl Default for ZoomAxes {
    fn default() -> Self {
        Self::BOTH
    }
}

/// Computes the window of one axis after a single zoom step.
///
/// Ordinal bounds are index bounds (`step = 1`): zoom-in rounds inward and
/// collapses to the first current category instead of producing an empty
/// window; zoom-out rounds outward.
#[must_use]
pub fn zoom_axis_bounds(direction: ZoomDirection, bounds: AxisBounds) -> (f64, f64) {
    let AxisBounds {
        min0,
        max0,
        min,
        max,
        step,
    } = bounds;
    let initial_extent = bounds.initial_extent();
    let current_extent = bounds.current_extent();

    match direction {
        ZoomDirection::In => {
            let mut new_min = (min0 + initial_extent * ZOOM_IN_LIMIT_RATIO)
                .min(min + current_extent / ZOOM_DIVISOR);
            let mut new_max = (max0 - initial_extent * ZOOM_IN_LIMIT_RATIO)
                .max(max - current_extent / ZOOM_DIVISOR);
            if step > 0.0 {
                new_min = new_min.ceil();
                new_max = new_max.floor();
                if new_min > new_max {
                    new_min = min;
                    new_max = min;
                }
            }
            (new_min, new_max)
        }
        ZoomDirection::Out => {
            let mut new_min = min0.max(min - current_extent / ZOOM_OUT_DIVISOR);
            let mut new_max = max0.min(max + current_extent / ZOOM_OUT_DIVISOR);
            if step > 0.0 {
                new_min = new_min.floor();
                new_max = new_max.ceil();
                if new_max < new_min {
                    new_max = max;
                    new_min = max;
                }
            }
            (new_min, new_max)
        }
    }
}

/// Applies one zoom step to the selected axes of a two-dimensional view.
///
/// Degenerate axes (empty ordinal lists) are left unchanged.
pub fn zoom_step(
    direction: ZoomDirection,
    x: &mut AxisDomains,
    y: &mut AxisDomains,
    axes: ZoomAxes,
) {
    if axes.x {
        zoom_axis(direction, x);
    }
    if axes.y {
        zoom_axis(direction, y);
    }
    debug!(?direction, zoom_x = axes.x, zoom_y = axes.y, "zoom step");
}

fn zoom_axis(direction: ZoomDirection, axis: &mut AxisDomains) {
    if axis
        .initial()
        .as_ordinal()
        .is_some_and(|keys| keys.is_empty())
    {
        return;
    }
    let (min, max) = zoom_axis_bounds(direction, axis.bounds());
    axis.set_bounds(min, max);
}

#[cfg(test)]
mod tests {
    use super::{ZoomDirection, zoom_axis_bounds};
    use crate::core::AxisBounds;

    #[test]
    fn repeated_zoom_in_stops_at_minimum_window() {
        let mut bounds = AxisBounds {
            min0: 0.0,
            max0: 1.0,
            min: 0.0,
            max: 1.0,
            step: 0.0,
        };
        for _ in 0..64 {
            let (min, max) = zoom_axis_bounds(ZoomDirection::In, bounds);
            bounds.min = min;
            bounds.max = max;
        }
        assert!((bounds.max - bounds.min - 0.125).abs() <= 1e-12);
        assert!((bounds.min - 0.4375).abs() <= 1e-12);
    }
}
