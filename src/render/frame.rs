use serde::{Deserialize, Serialize};

use crate::core::{
    BandScale, Bin, BrokenAxis, CategoryBucket, CategoryTable, LinearScale, TickSelection, Value,
    Viewport,
};
use crate::error::{RebinError, RebinResult};

/// Everything a backend needs to draw one histogram pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramFrame {
    pub viewport: Viewport,
    pub x_scale: LinearScale,
    pub y_scale: LinearScale,
    pub bins: Vec<Bin>,
    pub x_ticks: TickSelection,
    pub y_ticks: TickSelection,
    pub x_aggregate: f64,
}

/// Everything a backend needs to draw one bar chart pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarChartFrame {
    pub viewport: Viewport,
    pub x_scale: BandScale,
    pub y_scale: LinearScale,
    /// Visible buckets in band order; the merged bucket, if any, is last.
    pub buckets: Vec<CategoryBucket>,
    pub broken_axis: Option<BrokenAxis>,
    pub y_ticks: TickSelection,
    pub x_aggregate: f64,
}

/// One heatmap cell: a bin on X crossed with a category on Y.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapTile {
    pub x0: f64,
    pub x1: f64,
    pub category: Value,
    pub value: f64,
}

/// Everything a backend needs to draw one heatmap pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapFrame {
    pub viewport: Viewport,
    pub x_scale: LinearScale,
    pub y_scale: BandScale,
    /// Aggregated table before the Y window is applied.
    pub table: CategoryTable,
    /// Tiles for the categories inside the current Y window.
    pub tiles: Vec<HeatmapTile>,
    pub x_ticks: TickSelection,
    pub x_aggregate: f64,
    pub y_aggregate: f64,
}

/// Backend-agnostic output of one view for one draw pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RenderFrame {
    Histogram(HistogramFrame),
    BarChart(BarChartFrame),
    Heatmap(HeatmapFrame),
}

impl RenderFrame {
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        match self {
            Self::Histogram(frame) => frame.viewport,
            Self::BarChart(frame) => frame.viewport,
            Self::Heatmap(frame) => frame.viewport,
        }
    }

    /// Number of marks the frame asks a backend to draw.
    #[must_use]
    pub fn mark_count(&self) -> usize {
        match self {
            Self::Histogram(frame) => frame.bins.len(),
            Self::BarChart(frame) => frame.buckets.len(),
            Self::Heatmap(frame) => frame.tiles.len(),
        }
    }

    #[must_use]
    pub fn tick_count(&self) -> usize {
        match self {
            Self::Histogram(frame) => frame.x_ticks.values.len() + frame.y_ticks.values.len(),
            Self::BarChart(frame) => frame.y_ticks.values.len(),
            Self::Heatmap(frame) => frame.x_ticks.values.len(),
        }
    }

    pub fn validate(&self) -> RebinResult<()> {
        let viewport = self.viewport();
        if !viewport.is_valid() {
            return Err(RebinError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }

        match self {
            Self::Histogram(frame) => {
                for bin in &frame.bins {
                    validate_bin(bin.x0, bin.x1, bin.value)?;
                }
                validate_ticks(&frame.x_ticks)?;
                validate_ticks(&frame.y_ticks)
            }
            Self::BarChart(frame) => {
                for bucket in &frame.buckets {
                    if !bucket.value.is_finite() || bucket.value < 0.0 {
                        return Err(RebinError::InvalidData(format!(
                            "bucket `{}` must have a finite non-negative value",
                            bucket.key
                        )));
                    }
                }
                validate_ticks(&frame.y_ticks)
            }
            Self::Heatmap(frame) => {
                for tile in &frame.tiles {
                    validate_bin(tile.x0, tile.x1, tile.value)?;
                }
                validate_ticks(&frame.x_ticks)
            }
        }
    }
}

fn validate_bin(x0: f64, x1: f64, value: f64) -> RebinResult<()> {
    if !x0.is_finite() || !x1.is_finite() || x1 < x0 {
        return Err(RebinError::InvalidData(
            "bin edges must be finite and ordered".to_owned(),
        ));
    }
    if !value.is_finite() {
        return Err(RebinError::InvalidData(
            "bin value must be finite".to_owned(),
        ));
    }
    Ok(())
}

fn validate_ticks(ticks: &TickSelection) -> RebinResult<()> {
    if ticks.values.iter().any(|tick| !tick.is_finite()) {
        return Err(RebinError::InvalidData(
            "tick values must be finite".to_owned(),
        ));
    }
    Ok(())
}
