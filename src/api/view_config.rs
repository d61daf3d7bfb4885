use serde::{Deserialize, Serialize};

use crate::core::categorical_aggregation::OTHER_LENGTH_RATIO;
use crate::core::ticks::MIN_LABEL_SPACING_PX;
use crate::core::{Insets, Viewport, ZoomAxes};
use crate::error::{RebinError, RebinResult};
use crate::interaction::ScrollbarGeometry;

use super::PlotLayout;

/// Public view bootstrap configuration.
///
/// Serializable so host applications can persist and reload a view setup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewConfig {
    pub viewport: Viewport,
    #[serde(default = "default_margin")]
    pub margin: Insets,
    #[serde(default = "default_padding")]
    pub padding: Insets,
    /// Thickness of the X track when it hosts an overview strip.
    #[serde(default)]
    pub x_scroll_size: Option<f64>,
    #[serde(default = "default_scroll_size")]
    pub scroll_size: f64,
    /// End-cap length as a fraction of `scroll_size`.
    #[serde(default = "default_end_cap_ratio")]
    pub end_cap_ratio: f64,
    #[serde(default)]
    pub zoom_axes: ZoomAxes,
    #[serde(default = "default_min_label_spacing_px")]
    pub min_label_spacing_px: f64,
    /// Longest "Other" bar relative to the largest remaining bar before the
    /// axis is drawn broken.
    #[serde(default = "default_other_length_ratio")]
    pub other_length_ratio: f64,
    /// Value axes extend to `y_headroom × max`.
    #[serde(default = "default_y_headroom")]
    pub y_headroom: f64,
    /// Share of the data extent added on each side of a histogram X domain.
    #[serde(default = "default_x_padding_ratio")]
    pub x_padding_ratio: f64,
    #[serde(default = "default_band_padding")]
    pub band_padding: f64,
}

impl ViewConfig {
    /// Creates a config with default layout for `viewport`.
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            margin: default_margin(),
            padding: default_padding(),
            x_scroll_size: None,
            scroll_size: default_scroll_size(),
            end_cap_ratio: default_end_cap_ratio(),
            zoom_axes: ZoomAxes::default(),
            min_label_spacing_px: default_min_label_spacing_px(),
            other_length_ratio: default_other_length_ratio(),
            y_headroom: default_y_headroom(),
            x_padding_ratio: default_x_padding_ratio(),
            band_padding: default_band_padding(),
        }
    }

    #[must_use]
    pub fn with_margin(mut self, margin: Insets) -> Self {
        self.margin = margin;
        self
    }

    #[must_use]
    pub fn with_padding(mut self, padding: Insets) -> Self {
        self.padding = padding;
        self
    }

    #[must_use]
    pub fn with_x_scroll_size(mut self, size: f64) -> Self {
        self.x_scroll_size = Some(size);
        self
    }

    #[must_use]
    pub fn with_scroll_size(mut self, size: f64) -> Self {
        self.scroll_size = size;
        self
    }

    #[must_use]
    pub fn with_end_cap_ratio(mut self, ratio: f64) -> Self {
        self.end_cap_ratio = ratio;
        self
    }

    #[must_use]
    pub fn with_zoom_axes(mut self, axes: ZoomAxes) -> Self {
        self.zoom_axes = axes;
        self
    }

    #[must_use]
    pub fn with_min_label_spacing_px(mut self, spacing: f64) -> Self {
        self.min_label_spacing_px = spacing;
        self
    }

    #[must_use]
    pub fn with_other_length_ratio(mut self, ratio: f64) -> Self {
        self.other_length_ratio = ratio;
        self
    }

    #[must_use]
    pub fn with_y_headroom(mut self, headroom: f64) -> Self {
        self.y_headroom = headroom;
        self
    }

    #[must_use]
    pub fn with_x_padding_ratio(mut self, ratio: f64) -> Self {
        self.x_padding_ratio = ratio;
        self
    }

    #[must_use]
    pub fn with_band_padding(mut self, padding: f64) -> Self {
        self.band_padding = padding;
        self
    }

    pub fn validate(self) -> RebinResult<()> {
        if !self.viewport.is_valid() {
            return Err(RebinError::InvalidViewport {
                width: self.viewport.width,
                height: self.viewport.height,
            });
        }
        if !self.margin.is_valid() || !self.padding.is_valid() {
            return Err(RebinError::InvalidConfig(
                "margin and padding must be finite and non-negative".to_owned(),
            ));
        }
        let insets = self.margin + self.padding;
        if insets.left + insets.right >= f64::from(self.viewport.width)
            || insets.top + insets.bottom >= f64::from(self.viewport.height)
        {
            return Err(RebinError::InvalidConfig(
                "margin and padding leave no plot area".to_owned(),
            ));
        }
        if let Some(size) = self.x_scroll_size {
            if !size.is_finite() || size <= 0.0 {
                return Err(RebinError::InvalidConfig(
                    "x scroll size must be finite and > 0".to_owned(),
                ));
            }
        }
        require_positive(self.scroll_size, "scroll size")?;
        require_positive(self.min_label_spacing_px, "minimum label spacing")?;
        require_positive(self.other_length_ratio, "other length ratio")?;
        if !self.end_cap_ratio.is_finite() || self.end_cap_ratio < 0.0 {
            return Err(RebinError::InvalidConfig(
                "end cap ratio must be finite and >= 0".to_owned(),
            ));
        }
        if !self.y_headroom.is_finite() || self.y_headroom < 1.0 {
            return Err(RebinError::InvalidConfig(
                "y headroom must be finite and >= 1".to_owned(),
            ));
        }
        if !self.x_padding_ratio.is_finite() || self.x_padding_ratio < 0.0 {
            return Err(RebinError::InvalidConfig(
                "x padding ratio must be finite and >= 0".to_owned(),
            ));
        }
        if !self.band_padding.is_finite() || !(0.0..1.0).contains(&self.band_padding) {
            return Err(RebinError::InvalidConfig(
                "band padding must be finite and in [0, 1)".to_owned(),
            ));
        }
        Ok(())
    }

    /// Plot area derived from viewport, margin and padding.
    #[must_use]
    pub fn layout(self) -> PlotLayout {
        PlotLayout::new(self.viewport, self.margin + self.padding)
    }

    pub fn scrollbar_geometry(self) -> RebinResult<ScrollbarGeometry> {
        Ok(ScrollbarGeometry::new(
            self.viewport,
            self.margin,
            self.padding,
            self.x_scroll_size,
            self.scroll_size,
            self.end_cap_ratio,
        )?
        .with_axes(self.zoom_axes))
    }

    /// Serializes config to pretty JSON.
    pub fn to_json_pretty(self) -> RebinResult<String> {
        serde_json::to_string_pretty(&self)
            .map_err(|e| RebinError::InvalidConfig(format!("failed to serialize config: {e}")))
    }

    /// Deserializes and validates config from JSON.
    pub fn from_json_str(input: &str) -> RebinResult<Self> {
        let config: Self = serde_json::from_str(input)
            .map_err(|e| RebinError::InvalidConfig(format!("failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }
}

fn require_positive(value: f64, name: &str) -> RebinResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(RebinError::InvalidConfig(format!(
            "{name} must be finite and > 0"
        )));
    }
    Ok(())
}

fn default_margin() -> Insets {
    Insets::new(0.0, 10.0, 50.0, 50.0)
}

fn default_padding() -> Insets {
    Insets::new(20.0, 20.0, 0.0, 20.0)
}

fn default_scroll_size() -> f64 {
    15.0
}

fn default_end_cap_ratio() -> f64 {
    0.8
}

fn default_min_label_spacing_px() -> f64 {
    MIN_LABEL_SPACING_PX
}

fn default_other_length_ratio() -> f64 {
    OTHER_LENGTH_RATIO
}

fn default_y_headroom() -> f64 {
    1.05
}

fn default_x_padding_ratio() -> f64 {
    0.1
}

fn default_band_padding() -> f64 {
    0.2
}
