use tracing::debug;

use crate::core::{
    AxisDomains, BandScale, BrokenAxis, CategoryBucket, Domain, LinearScale, PointerPosition,
    Value, ZoomDirection, aggregate, broken_axis, linear_axis_ticks, rollup_counts,
    sanitize_aggregate_factor,
};
use crate::error::RebinResult;
use crate::interaction::DragState;
use crate::render::{BarChartFrame, RenderFrame, Renderer};

use super::dataset::{DatasetSource, column_values};
use super::{PlotLayout, VALUE_AXIS_TICK_COUNT, ViewConfig, ViewInteraction, value_axis};

/// Interactive bar chart of category counts in one column.
///
/// Categories are ordered by count, largest first. The aggregate factor
/// merges the smallest ones into a trailing "Other" bar.
pub struct BarChartView<R: Renderer> {
    renderer: R,
    config: ViewConfig,
    layout: PlotLayout,
    column_name: String,
    counts: Vec<CategoryBucket>,
    x_aggregate: f64,
    buckets: Vec<CategoryBucket>,
    broken_axis: Option<BrokenAxis>,
    interaction: ViewInteraction,
}

impl<R: Renderer> BarChartView<R> {
    pub fn new<D>(renderer: R, config: ViewConfig, dataset: &D, column: usize) -> RebinResult<Self>
    where
        D: DatasetSource + ?Sized,
    {
        config.validate()?;
        let column_name = dataset.column_name(column)?.to_owned();
        let counts = rollup_counts(column_values(dataset, column)?);
        debug!(
            column = column_name.as_str(),
            categories = counts.len(),
            "bar chart view created"
        );

        let (buckets, broken) = group(&counts, 0.0, config.other_length_ratio);
        let interaction = ViewInteraction::new(
            category_axis(&buckets),
            value_axis(display_max(&buckets, broken), config.y_headroom)?,
            config.scrollbar_geometry()?,
        );

        Ok(Self {
            renderer,
            config,
            layout: config.layout(),
            column_name,
            counts,
            x_aggregate: 0.0,
            buckets,
            broken_axis: broken,
            interaction,
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

    /// Per-category counts before merging, largest first.
    #[must_use]
    pub fn counts(&self) -> &[CategoryBucket] {
        &self.counts
    }

    /// All buckets after merging, regardless of the X window.
    #[must_use]
    pub fn buckets(&self) -> &[CategoryBucket] {
        &self.buckets
    }

    #[must_use]
    pub fn broken_axis(&self) -> Option<BrokenAxis> {
        self.broken_axis
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
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    #[must_use]
    pub fn into_renderer(self) -> R {
        self.renderer
    }

    /// Sets the merge factor. The category axis is rebuilt and its window
    /// reset, since the category list changes.
    pub fn on_aggregate_change(&mut self, factor: f64) -> RebinResult<()> {
        self.x_aggregate = sanitize_aggregate_factor(factor);
        let (buckets, broken) = group(&self.counts, self.x_aggregate, self.config.other_length_ratio);
        self.interaction.replace_x(category_axis(&buckets));
        self.interaction.replace_y(value_axis(
            display_max(&buckets, broken),
            self.config.y_headroom,
        )?);
        debug!(
            x_aggregate = self.x_aggregate,
            buckets = buckets.len(),
            broken = broken.is_some(),
            "bar chart aggregate changed"
        );
        self.buckets = buckets;
        self.broken_axis = broken;
        Ok(())
    }

    pub fn on_zoom_request(&mut self, direction: ZoomDirection) -> bool {
        self.interaction.zoom(direction)
    }

    pub fn on_pointer_down(&mut self, position: PointerPosition) -> Option<DragState> {
        self.interaction.pointer_down(position)
    }

    pub fn on_pointer_move(&mut self, position: PointerPosition) -> bool {
        self.interaction.pointer_move(position)
    }

    pub fn on_pointer_up(&mut self, position: PointerPosition) -> bool {
        self.interaction.pointer_up(position)
    }

    pub fn on_pointer_leave(&mut self) {
        self.interaction.pointer_leave();
    }

    /// Buckets inside the current X window, in band order.
    #[must_use]
    pub fn visible_buckets(&self) -> &[CategoryBucket] {
        let x = self.interaction.x();
        let start = (x.bounds().min as usize).min(self.buckets.len());
        let end = (start + x.current_categories().len()).min(self.buckets.len());
        &self.buckets[start..end]
    }

    pub fn frame(&self) -> RebinResult<RenderFrame> {
        let visible = self.visible_buckets();
        let keys: Vec<Value> = visible.iter().map(|bucket| bucket.key.clone()).collect();
        let x_scale =
            BandScale::new(keys, self.layout.x_range())?.with_padding(self.config.band_padding)?;
        let y_bounds = self.interaction.y().bounds();
        let y_scale = LinearScale::new((y_bounds.min, y_bounds.max), self.layout.y_range())?;
        let other_visible = visible.last().is_some_and(|bucket| bucket.key.is_other());

        Ok(RenderFrame::BarChart(BarChartFrame {
            viewport: self.config.viewport,
            x_scale,
            y_scale,
            buckets: visible.to_vec(),
            broken_axis: self.broken_axis.filter(|_| other_visible),
            y_ticks: linear_axis_ticks(y_scale, VALUE_AXIS_TICK_COUNT),
            x_aggregate: self.x_aggregate,
        }))
    }

    pub fn render(&mut self) -> RebinResult<()> {
        let frame = self.frame()?;
        self.renderer.render(&frame)
    }
}

fn group(
    counts: &[CategoryBucket],
    factor: f64,
    other_length_ratio: f64,
) -> (Vec<CategoryBucket>, Option<BrokenAxis>) {
    let buckets = aggregate(counts, factor);
    let broken = broken_axis(&buckets, other_length_ratio);
    (buckets, broken)
}

fn category_axis(buckets: &[CategoryBucket]) -> AxisDomains {
    AxisDomains::ordinal(buckets.iter().map(|bucket| bucket.key.clone()).collect())
}

/// Tallest bar as drawn: a broken "Other" bar counts with its compressed
/// length.
fn display_max(buckets: &[CategoryBucket], broken: Option<BrokenAxis>) -> f64 {
    let tallest_regular = buckets
        .iter()
        .filter(|bucket| broken.is_none() || !bucket.key.is_other())
        .map(|bucket| bucket.value)
        .fold(0.0, f64::max);
    broken.map_or(tallest_regular, |hint| tallest_regular.max(hint.display))
}
