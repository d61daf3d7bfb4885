pub mod band_scale;
pub mod categorical_aggregation;
pub mod continuous_binning;
pub mod domain;
pub mod scale;
pub mod ticks;
pub mod types;
pub mod zoom;

pub use band_scale::BandScale;
pub use categorical_aggregation::{
    BrokenAxis, CategoryBucket, CategoryTable, OTHER_LENGTH_RATIO, aggregate, broken_axis,
    rollup_counts,
};
pub use continuous_binning::{
    Bin, BinCountPlan, BinThresholds, NiceWidth, SINGLE_BIN_FACTOR_THRESHOLD, bins_for_factor,
    default_aggregate, min_bin_width, plan_bin_count, sanitize_aggregate_factor,
};
pub use domain::{AxisBounds, AxisDomains, Domain};
pub use scale::LinearScale;
pub use ticks::{MIN_LABEL_SPACING_PX, TickSelection, linear_axis_ticks, select_ticks};
pub use types::{Insets, OTHER_KEY, PointerPosition, Value, Viewport};
pub use zoom::{ZoomAxes, ZoomDirection, zoom_axis_bounds, zoom_step};
