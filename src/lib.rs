//! rebin-rs: interactive re-binning, zoom and pan engine.
//!
//! The crate computes everything a histogram, bar chart or heatmap needs for
//! one draw pass (bins, merged categories, scales and ticks) from a dataset,
//! an aggregate factor per axis and the scrollbar gestures of the user.
//! Drawing is left to a `Renderer` implementation.

pub mod api;
pub mod core;
pub mod error;
pub mod interaction;
pub mod render;
pub mod telemetry;

pub use api::{BarChartView, HeatmapView, HistogramView, InMemoryDataset, ViewConfig};
pub use error::{RebinError, RebinResult};
