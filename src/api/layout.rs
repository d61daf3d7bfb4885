use serde::{Deserialize, Serialize};

use crate::core::{Insets, Viewport};

/// Plot rectangle inside the viewport, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotLayout {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl PlotLayout {
    #[must_use]
    pub fn new(viewport: Viewport, insets: Insets) -> Self {
        Self {
            left: insets.left,
            top: insets.top,
            right: f64::from(viewport.width) - insets.right,
            bottom: f64::from(viewport.height) - insets.bottom,
        }
    }

    /// Pixel range for a horizontal axis, left to right.
    #[must_use]
    pub fn x_range(self) -> (f64, f64) {
        (self.left, self.right)
    }

    /// Pixel range for a vertical value axis; larger values sit higher.
    #[must_use]
    pub fn y_range(self) -> (f64, f64) {
        (self.bottom, self.top)
    }

    #[must_use]
    pub fn width(self) -> f64 {
        self.right - self.left
    }

    #[must_use]
    pub fn height(self) -> f64 {
        self.bottom - self.top
    }
}
