mod bar_chart_view;
mod dataset;
mod heatmap_view;
mod histogram_view;
mod layout;
mod view_config;
mod view_interaction;

pub use bar_chart_view::BarChartView;
pub use dataset::{DatasetSource, InMemoryDataset, column_values, numeric_column};
pub use heatmap_view::{HeatmapColumns, HeatmapView};
pub use histogram_view::HistogramView;
pub use layout::PlotLayout;
pub use view_config::ViewConfig;
pub use view_interaction::ViewInteraction;

use crate::core::AxisDomains;
use crate::error::RebinResult;

/// Tick count requested for value axes.
pub const VALUE_AXIS_TICK_COUNT: usize = 5;

/// Value axis `[0, headroom × tallest]`; an all-zero chart gets `[0, 1]`.
fn value_axis(tallest: f64, headroom: f64) -> RebinResult<AxisDomains> {
    let top = if tallest > 0.0 { headroom * tallest } else { 1.0 };
    AxisDomains::continuous(0.0, top)
}

fn data_extent(values: &[f64]) -> Option<(f64, f64)> {
    values.iter().fold(None, |extent, value| match extent {
        None => Some((*value, *value)),
        Some((lo, hi)) => Some((lo.min(*value), hi.max(*value))),
    })
}
