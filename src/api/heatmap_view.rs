use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::scale::DEFAULT_TICK_COUNT;
use crate::core::{
    AxisBounds, AxisDomains, BandScale, BinThresholds, CategoryTable, Domain, LinearScale,
    PointerPosition, Value, ZoomDirection, bins_for_factor, default_aggregate,
    sanitize_aggregate_factor, select_ticks,
};
use crate::error::RebinResult;
use crate::interaction::DragState;
use crate::render::{HeatmapFrame, HeatmapTile, RenderFrame, Renderer};

use super::dataset::DatasetSource;
use super::{PlotLayout, ViewConfig, ViewInteraction, data_extent};

/// Dataset columns a heatmap reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeatmapColumns {
    /// Continuous column binned along X.
    pub x: usize,
    /// Category column laid out along Y.
    pub y: usize,
    /// Numeric column summed into each tile.
    pub z: usize,
}

impl Default for HeatmapColumns {
    fn default() -> Self {
        Self { x: 0, y: 2, z: 3 }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct HeatmapSample {
    x: f64,
    category: usize,
    weight: f64,
}

/// Interactive heatmap: X bins crossed with Y categories, tiles hold the sum
/// of the Z column.
///
/// The X factor drives binning; the Y factor merges the categories with the
/// smallest totals into "Other" across every bin at once.
pub struct HeatmapView<R: Renderer> {
    renderer: R,
    config: ViewConfig,
    layout: PlotLayout,
    columns: HeatmapColumns,
    column_names: [String; 3],
    categories: Vec<Value>,
    samples: Vec<HeatmapSample>,
    x_values: Vec<f64>,
    x_aggregate: f64,
    y_aggregate: f64,
    thresholds: BinThresholds,
    table: CategoryTable,
    interaction: ViewInteraction,
}

impl<R: Renderer> HeatmapView<R> {
    pub fn new<D>(
        renderer: R,
        config: ViewConfig,
        dataset: &D,
        columns: HeatmapColumns,
    ) -> RebinResult<Self>
    where
        D: DatasetSource + ?Sized,
    {
        config.validate()?;
        let column_names = [
            dataset.column_name(columns.x)?.to_owned(),
            dataset.column_name(columns.y)?.to_owned(),
            dataset.column_name(columns.z)?.to_owned(),
        ];

        let mut keys: Vec<Value> = dataset
            .rows()
            .iter()
            .filter_map(|row| row.get(columns.y).cloned())
            .collect::<IndexSet<Value>>()
            .into_iter()
            .collect();
        keys.sort_by(|left, right| right.cmp(left));
        let index: IndexSet<Value> = keys.iter().cloned().collect();

        let mut samples = Vec::with_capacity(dataset.rows().len());
        for row in dataset.rows() {
            let x = row.get(columns.x).and_then(Value::as_f64);
            let weight = row.get(columns.z).and_then(Value::as_f64);
            let category = row.get(columns.y).and_then(|key| index.get_index_of(key));
            if let (Some(x), Some(weight), Some(category)) = (x, weight, category) {
                if x.is_finite() && weight.is_finite() {
                    samples.push(HeatmapSample {
                        x,
                        category,
                        weight,
                    });
                }
            }
        }
        let skipped = dataset.rows().len() - samples.len();
        if skipped > 0 {
            warn!(skipped, "skipped heatmap rows without numeric x and z");
        }

        let x_values: Vec<f64> = samples.iter().map(|sample| sample.x).collect();
        let layout = config.layout();
        let (x_min, x_max) = data_extent(&x_values).unwrap_or((0.0, 0.0));
        let x_scale = LinearScale::new((x_min, x_max), layout.x_range())?.nice(DEFAULT_TICK_COUNT);
        let (x_min, x_max) = x_scale.domain();
        let x_aggregate = default_aggregate(&x_values, x_scale);
        debug!(
            samples = samples.len(),
            categories = keys.len(),
            x_aggregate,
            "heatmap view created"
        );

        let (thresholds, table) = tabulate(&samples, &x_values, &keys, x_scale, x_aggregate, 0.0);
        let interaction = ViewInteraction::new(
            AxisDomains::continuous(x_min, x_max)?,
            AxisDomains::ordinal(table.categories().to_vec()),
            config.scrollbar_geometry()?,
        );

        Ok(Self {
            renderer,
            config,
            layout,
            columns,
            column_names,
            categories: keys,
            samples,
            x_values,
            x_aggregate,
            y_aggregate: 0.0,
            thresholds,
            table,
            interaction,
        })
    }

    #[must_use]
    pub fn config(&self) -> ViewConfig {
        self.config
    }

    #[must_use]
    pub fn columns(&self) -> HeatmapColumns {
        self.columns
    }

    /// Names of the X, Y and Z columns.
    #[must_use]
    pub fn column_names(&self) -> &[String; 3] {
        &self.column_names
    }

    /// Distinct Y categories before merging, largest key first.
    #[must_use]
    pub fn categories(&self) -> &[Value] {
        &self.categories
    }

    #[must_use]
    pub fn x_aggregate(&self) -> f64 {
        self.x_aggregate
    }

    #[must_use]
    pub fn y_aggregate(&self) -> f64 {
        self.y_aggregate
    }

    #[must_use]
    pub fn thresholds(&self) -> &BinThresholds {
        &self.thresholds
    }

    /// Aggregated bin × category table for the current X window.
    #[must_use]
    pub fn table(&self) -> &CategoryTable {
        &self.table
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
    pub fn current_y_domain(&self) -> Domain {
        self.interaction.y().current()
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    #[must_use]
    pub fn into_renderer(self) -> R {
        self.renderer
    }

    pub fn on_x_aggregate_change(&mut self, factor: f64) -> RebinResult<()> {
        self.x_aggregate = sanitize_aggregate_factor(factor);
        debug!(x_aggregate = self.x_aggregate, "heatmap x aggregate changed");
        self.retabulate()?;
        self.sync_y_categories();
        Ok(())
    }

    /// Sets the category merge factor; the Y window is reset.
    pub fn on_y_aggregate_change(&mut self, factor: f64) -> RebinResult<()> {
        self.y_aggregate = sanitize_aggregate_factor(factor);
        debug!(y_aggregate = self.y_aggregate, "heatmap y aggregate changed");
        self.retabulate()?;
        self.interaction
            .replace_y(AxisDomains::ordinal(self.table.categories().to_vec()));
        Ok(())
    }

    pub fn on_zoom_request(&mut self, direction: ZoomDirection) -> RebinResult<bool> {
        let x_before = self.interaction.x().bounds();
        let changed = self.interaction.zoom(direction);
        self.retabulate_if_x_moved(x_before)?;
        Ok(changed)
    }

    pub fn on_pointer_down(&mut self, position: PointerPosition) -> Option<DragState> {
        self.interaction.pointer_down(position)
    }

    pub fn on_pointer_move(&mut self, position: PointerPosition) -> RebinResult<bool> {
        let x_before = self.interaction.x().bounds();
        let changed = self.interaction.pointer_move(position);
        self.retabulate_if_x_moved(x_before)?;
        Ok(changed)
    }

    pub fn on_pointer_up(&mut self, position: PointerPosition) -> RebinResult<bool> {
        let x_before = self.interaction.x().bounds();
        let changed = self.interaction.pointer_up(position);
        self.retabulate_if_x_moved(x_before)?;
        Ok(changed)
    }

    pub fn on_pointer_leave(&mut self) {
        self.interaction.pointer_leave();
    }

    /// Tiles for every bin and every category inside the Y window.
    #[must_use]
    pub fn tiles(&self) -> Vec<HeatmapTile> {
        let y = self.interaction.y();
        let start = y.bounds().min as usize;
        let visible = y.current_categories().len();
        let edges = self.thresholds.edges();

        let mut tiles = Vec::with_capacity(self.table.bin_count() * visible);
        for (edge, row) in edges.windows(2).zip(self.table.rows()) {
            for (category, value) in self
                .table
                .categories()
                .iter()
                .zip(row)
                .skip(start)
                .take(visible)
            {
                tiles.push(HeatmapTile {
                    x0: edge[0],
                    x1: edge[1],
                    category: category.clone(),
                    value: *value,
                });
            }
        }
        tiles
    }

    pub fn frame(&self) -> RebinResult<RenderFrame> {
        let x_scale = self.x_scale()?;
        let y_scale = BandScale::new(
            self.interaction.y().current_categories().to_vec(),
            self.layout.y_range(),
        )?;

        Ok(RenderFrame::Heatmap(HeatmapFrame {
            viewport: self.config.viewport,
            x_scale,
            y_scale,
            table: self.table.clone(),
            tiles: self.tiles(),
            x_ticks: select_ticks(&self.thresholds, x_scale, self.config.min_label_spacing_px),
            x_aggregate: self.x_aggregate,
            y_aggregate: self.y_aggregate,
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

    fn retabulate_if_x_moved(&mut self, x_before: AxisBounds) -> RebinResult<()> {
        if self.interaction.x().bounds() == x_before {
            return Ok(());
        }
        self.retabulate()?;
        self.sync_y_categories();
        Ok(())
    }

    /// Rebuilds the Y axis when the merged category list changed. The Y
    /// window survives while its end categories are still listed.
    fn sync_y_categories(&mut self) {
        let current = self.interaction.y().initial().as_ordinal().unwrap_or_default();
        if current != self.table.categories() {
            self.interaction
                .rebase_y(AxisDomains::ordinal(self.table.categories().to_vec()));
        }
    }

    fn retabulate(&mut self) -> RebinResult<()> {
        let x_scale = self.x_scale()?;
        let (thresholds, table) = tabulate(
            &self.samples,
            &self.x_values,
            &self.categories,
            x_scale,
            self.x_aggregate,
            self.y_aggregate,
        );
        self.thresholds = thresholds;
        self.table = table;
        Ok(())
    }
}

fn tabulate(
    samples: &[HeatmapSample],
    x_values: &[f64],
    categories: &[Value],
    x_scale: LinearScale,
    x_aggregate: f64,
    y_aggregate: f64,
) -> (BinThresholds, CategoryTable) {
    let thresholds = bins_for_factor(x_values, x_scale, x_aggregate);
    let mut table = CategoryTable::zeros(categories.to_vec(), thresholds.bin_count());
    for sample in samples {
        if let Some(bin) = thresholds.bin_index(sample.x) {
            table.add(bin, sample.category, sample.weight);
        }
    }
    let table = table.aggregate_by_total(y_aggregate);
    (thresholds, table)
}
