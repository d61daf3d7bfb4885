use serde::{Deserialize, Serialize};

use crate::core::{AxisBounds, Insets, PointerPosition, Viewport, ZoomAxes};
use crate::error::{RebinError, RebinResult};

use super::{DragAxis, DragTarget};

/// Axis-aligned pixel rectangle, inclusive on every edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackRect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl TrackRect {
    #[must_use]
    pub fn contains(self, position: PointerPosition) -> bool {
        self.left <= position.x
            && position.x <= self.right
            && self.top <= position.y
            && position.y <= self.bottom
    }
}

/// Pixel layout of the two scrollbar tracks of a view.
///
/// The X track runs along the bottom edge under the plot area; the Y track
/// runs down the left edge beside it. Both tracks map the full initial domain
/// onto their length.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrollbarGeometry {
    viewport: Viewport,
    insets: Insets,
    x_scroll_size: f64,
    scroll_size: f64,
    end_cap: f64,
    axes: ZoomAxes,
}

impl ScrollbarGeometry {
    /// `x_scroll_size` overrides the X track thickness when the X track hosts
    /// an overview strip.
    pub fn new(
        viewport: Viewport,
        margin: Insets,
        padding: Insets,
        x_scroll_size: Option<f64>,
        scroll_size: f64,
        end_cap_ratio: f64,
    ) -> RebinResult<Self> {
        if !viewport.is_valid() {
            return Err(RebinError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }
        if !margin.is_valid() || !padding.is_valid() {
            return Err(RebinError::InvalidConfig(
                "margin and padding must be finite and non-negative".to_owned(),
            ));
        }
        if !scroll_size.is_finite() || scroll_size <= 0.0 {
            return Err(RebinError::InvalidConfig(
                "scroll size must be finite and > 0".to_owned(),
            ));
        }
        if !end_cap_ratio.is_finite() || end_cap_ratio < 0.0 {
            return Err(RebinError::InvalidConfig(
                "end cap ratio must be finite and >= 0".to_owned(),
            ));
        }

        let x_scroll_size = x_scroll_size
            .filter(|size| size.is_finite() && *size > 0.0)
            .unwrap_or(scroll_size);
        Ok(Self {
            viewport,
            insets: margin + padding,
            x_scroll_size,
            scroll_size,
            end_cap: end_cap_ratio * scroll_size,
            axes: ZoomAxes::BOTH,
        })
    }

    /// Restricts which tracks accept pointer input.
    #[must_use]
    pub fn with_axes(mut self, axes: ZoomAxes) -> Self {
        self.axes = axes;
        self
    }

    #[must_use]
    pub fn axes(self) -> ZoomAxes {
        self.axes
    }

    /// Length of an end cap in pixels.
    #[must_use]
    pub fn end_cap(self) -> f64 {
        self.end_cap
    }

    #[must_use]
    pub fn x_track(self) -> TrackRect {
        let width = f64::from(self.viewport.width);
        let height = f64::from(self.viewport.height);
        TrackRect {
            left: self.insets.left,
            top: height - self.x_scroll_size,
            right: width - self.insets.right,
            bottom: height,
        }
    }

    #[must_use]
    pub fn y_track(self) -> TrackRect {
        let height = f64::from(self.viewport.height);
        TrackRect {
            left: 0.0,
            top: self.insets.top,
            right: self.scroll_size,
            bottom: height - self.insets.bottom,
        }
    }

    /// Pixel length the initial X domain is spread over.
    #[must_use]
    pub fn x_track_length(self) -> f64 {
        f64::from(self.viewport.width) - self.insets.right - self.insets.left + 1.0
    }

    /// Pixel length the initial Y domain is spread over.
    #[must_use]
    pub fn y_track_length(self) -> f64 {
        f64::from(self.viewport.height) - self.insets.bottom - self.insets.top + 1.0
    }

    /// Track under the pointer. The X track wins where both overlap.
    #[must_use]
    pub fn hit_axis(self, position: PointerPosition) -> Option<DragAxis> {
        if self.axes.x && self.x_track().contains(position) {
            Some(DragAxis::X)
        } else if self.axes.y && self.y_track().contains(position) {
            Some(DragAxis::Y)
        } else {
            None
        }
    }

    /// Pixel extent `(min_edge, max_edge)` of the X thumb.
    #[must_use]
    pub fn x_thumb(self, bounds: AxisBounds) -> (f64, f64) {
        let left = self.insets.left;
        let length = self.x_track_length();
        let extent = bounds.initial_extent();
        if extent <= 0.0 {
            return (left, left + length);
        }
        (
            left + length * (bounds.min - bounds.min0) / extent,
            left + length * (bounds.max - bounds.min0 + bounds.step) / extent,
        )
    }

    /// Pixel extent `(min_edge, max_edge)` of the Y thumb. The min edge is
    /// the lower one on screen, so it has the larger y coordinate.
    #[must_use]
    pub fn y_thumb(self, bounds: AxisBounds) -> (f64, f64) {
        let top = self.insets.top;
        let length = self.y_track_length();
        let extent = bounds.initial_extent();
        if extent <= 0.0 {
            return (top + length, top);
        }
        (
            top + length * (1.0 - (bounds.min - bounds.min0) / extent),
            top + length * (1.0 - (bounds.max - bounds.min0 + bounds.step) / extent),
        )
    }

    /// Classifies a hit on a track as an end cap or the thumb.
    #[must_use]
    pub fn classify(self, axis: DragAxis, position: PointerPosition, bounds: AxisBounds) -> DragTarget {
        match axis {
            DragAxis::X => {
                let (min_edge, max_edge) = self.x_thumb(bounds);
                let x = position.x;
                if min_edge <= x && x <= min_edge + self.end_cap {
                    DragTarget::MinHandle
                } else if max_edge - self.end_cap <= x && x <= max_edge {
                    DragTarget::MaxHandle
                } else {
                    DragTarget::Thumb
                }
            }
            DragAxis::Y => {
                let (min_edge, max_edge) = self.y_thumb(bounds);
                let y = position.y;
                if max_edge <= y && y <= max_edge + self.end_cap {
                    DragTarget::MaxHandle
                } else if min_edge - self.end_cap <= y && y <= min_edge {
                    DragTarget::MinHandle
                } else {
                    DragTarget::Thumb
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ScrollbarGeometry;
    use crate::core::{Insets, PointerPosition, Viewport};
    use crate::interaction::DragAxis;

    #[test]
    fn tracks_follow_margin_and_padding() {
        let geometry = ScrollbarGeometry::new(
            Viewport::new(400, 300),
            Insets::new(10.0, 20.0, 30.0, 40.0),
            Insets::new(1.0, 2.0, 3.0, 4.0),
            None,
            15.0,
            0.8,
        )
        .expect("geometry");

        let x_track = geometry.x_track();
        assert_eq!((x_track.left, x_track.right), (44.0, 378.0));
        assert_eq!((x_track.top, x_track.bottom), (285.0, 300.0));
        let y_track = geometry.y_track();
        assert_eq!((y_track.top, y_track.bottom), (11.0, 267.0));
        assert_eq!(geometry.x_track_length(), 335.0);
        assert!((geometry.end_cap() - 12.0).abs() <= 1e-12);
    }

    #[test]
    fn overview_strip_widens_x_track() {
        let geometry = ScrollbarGeometry::new(
            Viewport::new(400, 300),
            Insets::default(),
            Insets::default(),
            Some(60.0),
            15.0,
            0.8,
        )
        .expect("geometry");
        assert_eq!(
            geometry.hit_axis(PointerPosition::new(200.0, 250.0)),
            Some(DragAxis::X)
        );
    }
}
