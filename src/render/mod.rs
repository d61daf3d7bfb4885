mod frame;
mod null_renderer;

pub use frame::{BarChartFrame, HeatmapFrame, HeatmapTile, HistogramFrame, RenderFrame};
pub use null_renderer::NullRenderer;

use crate::error::RebinResult;

/// Contract implemented by any rendering backend.
///
/// Backends receive a fully materialized `RenderFrame`; bins, buckets, scales
/// and ticks are already computed, so drawing code never sees interaction
/// state.
pub trait Renderer {
    fn render(&mut self, frame: &RenderFrame) -> RebinResult<()>;
}
