use tracing::debug;

use crate::core::scale::DEFAULT_TICK_COUNT;
use crate::core::{
    AxisBounds, AxisDomains, Bin, BinThresholds, Domain, LinearScale, PointerPosition, ZoomDirection,
    bins_for_factor, default_aggregate, linear_axis_ticks, sanitize_aggregate_factor,
    select_ticks,
};
use crate::error::RebinResult;
use crate::interaction::DragState;
use crate::render::{HistogramFrame, RenderFrame, Renderer};

use super::dataset::{DatasetSource, numeric_column};
use super::{PlotLayout, VALUE_AXIS_TICK_COUNT, ViewConfig, ViewInteraction, data_extent, value_axis};

/// Interactive histogram of one numeric column.
///
/// The X window and the aggregate factor drive the bins; the Y domain
/// follows the tallest bin and is rebuilt whenever the bins change, keeping
/// a zoomed Y window clamped into the new domain.
pub struct HistogramView<R: Renderer> {
    renderer: R,
    config: ViewConfig,
    layout: PlotLayout,
    column_name: String,
    values: Vec<f64>,
    x_aggregate: f64,
    interaction: ViewInteraction,
    thresholds: BinThresholds,
    bins: Vec<Bin>,
}

impl<R: Renderer> HistogramView<R> {
    pub fn new<D>(renderer: R, config: ViewConfig, dataset: &D, column: usize) -> RebinResult<Self>
    where
        D: DatasetSource + ?Sized,
    {
        config.validate()?;
        let column_name = dataset.column_name(column)?.to_owned();
        let values = numeric_column(dataset, column)?;
        let layout = config.layout();

        let (x_min, x_max) = padded_extent(&values, config.x_padding_ratio);
        let x_scale = LinearScale::new((x_min, x_max), layout.x_range())?.nice(DEFAULT_TICK_COUNT);
        let (x_min, x_max) = x_scale.domain();
        let x_aggregate = default_aggregate(&values, x_scale);
        debug!(
            column = column_name.as_str(),
            samples = values.len(),
            x_min,
            x_max,
            x_aggregate,
            "histogram view created"
        );

        let thresholds = bins_for_factor(&values, x_scale, x_aggregate);
        let bins = thresholds.bin(&values);
        let y = value_axis(tallest_bin(&bins), config.y_headroom)?;
        let interaction = ViewInteraction::new(
            AxisDomains::continuous(x_min, x_max)?,
            y,
            config.scrollbar_geometry()?,
        );

        Ok(Self {
            renderer,
            config,
            layout,
            column_name,
            values,
            x_aggregate,
            interaction,
            thresholds,
            bins,
        })
    }

    #[must_use]
    pub fn config(&self) -> ViewConfig {
        self.config
    }

    #[must_use]
    pub fn column_name(&self) -> &str {
        &self.column_name
    }

    #[must_use]
    pub fn x_aggregate(&self) -> f64 {
        self.x_aggregate
    }

    #[must_use]
    pub fn x_axis(&self) -> &AxisDomains {
        self.interaction.x()
    }

    #[must_use]
    pub fn y_axis(&self) -> &AxisDomains {
        self.interaction.y()
    }

    #[must_use]
    pub fn initial_x_domain(&self) -> &Domain {
        self.interaction.x().initial()
    }

    #[must_use]
    pub fn current_x_domain(&self) -> Domain {
        self.interaction.x().current()
    }

    #[must_use]
    pub fn current_y_domain(&self) -> Domain {
        self.interaction.y().current()
    }

    #[must_use]
    pub fn thresholds(&self) -> &BinThresholds {
        &self.thresholds
    }

    #[must_use]
    pub fn bins(&self) -> &[Bin] {
        &self.bins
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    #[must_use]
    pub fn into_renderer(self) -> R {
        self.renderer
    }

    /// Sets the X aggregate factor and re-bins. NaN counts as 0.
    pub fn on_aggregate_change(&mut self, factor: f64) -> RebinResult<()> {
        self.x_aggregate = sanitize_aggregate_factor(factor);
        debug!(x_aggregate = self.x_aggregate, "histogram aggregate changed");
        self.rebin()
    }

    pub fn on_zoom_request(&mut self, direction: ZoomDirection) -> RebinResult<bool> {
        let x_before = self.interaction.x().bounds();
        let changed = self.interaction.zoom(direction);
        self.rebin_if_x_moved(x_before)?;
        Ok(changed)
    }

    pub fn on_pointer_down(&mut self, position: PointerPosition) -> Option<DragState> {
        self.interaction.pointer_down(position)
    }

    pub fn on_pointer_move(&mut self, position: PointerPosition) -> RebinResult<bool> {
        let x_before = self.interaction.x().bounds();
        let changed = self.interaction.pointer_move(position);
        self.rebin_if_x_moved(x_before)?;
        Ok(changed)
    }

    pub fn on_pointer_up(&mut self, position: PointerPosition) -> RebinResult<bool> {
        let x_before = self.interaction.x().bounds();
        let changed = self.interaction.pointer_up(position);
        self.rebin_if_x_moved(x_before)?;
        Ok(changed)
    }

    pub fn on_pointer_leave(&mut self) {
        self.interaction.pointer_leave();
    }

    /// Materializes bins, scales and ticks for the current state.
    pub fn frame(&self) -> RebinResult<RenderFrame> {
        let x_scale = self.x_scale()?;
        let y_bounds = self.interaction.y().bounds();
        let y_scale = LinearScale::new((y_bounds.min, y_bounds.max), self.layout.y_range())?;

        Ok(RenderFrame::Histogram(HistogramFrame {
            viewport: self.config.viewport,
            x_scale,
            y_scale,
            bins: self.bins.clone(),
            x_ticks: select_ticks(&self.thresholds, x_scale, self.config.min_label_spacing_px),
            y_ticks: linear_axis_ticks(y_scale, VALUE_AXIS_TICK_COUNT),
            x_aggregate: self.x_aggregate,
        }))
    }

    pub fn render(&mut self) -> RebinResult<()> {
        let frame = self.frame()?;
        self.renderer.render(&frame)
    }

    fn x_scale(&self) -> RebinResult<LinearScale> {
        let bounds = self.interaction.x().bounds();
        LinearScale::new((bounds.min, bounds.max), self.layout.x_range())
    }

    fn rebin_if_x_moved(&mut self, x_before: AxisBounds) -> RebinResult<()> {
        if self.interaction.x().bounds() != x_before {
            self.rebin()?;
        }
        Ok(())
    }

    fn rebin(&mut self) -> RebinResult<()> {
        let x_scale = self.x_scale()?;
        self.thresholds = bins_for_factor(&self.values, x_scale, self.x_aggregate);
        self.bins = self.thresholds.bin(&self.values);
        self.interaction
            .rebase_y(value_axis(tallest_bin(&self.bins), self.config.y_headroom)?);
        Ok(())
    }
}

/// Data extent widened by `ratio` of its width on each side.
fn padded_extent(values: &[f64], ratio: f64) -> (f64, f64) {
    let Some((min, max)) = data_extent(values) else {
        return (0.0, 0.0);
    };
    let pad = ratio * (max - min);
    (min - pad, max + pad)
}

fn tallest_bin(bins: &[Bin]) -> f64 {
    bins.iter().map(|bin| bin.value).fold(0.0, f64::max)
}
