use criterion::{Criterion, criterion_group, criterion_main};
use rebin_rs::api::ViewConfig;
use rebin_rs::core::{
    AxisDomains, CategoryBucket, LinearScale, MIN_LABEL_SPACING_PX, Value, Viewport, ZoomAxes,
    ZoomDirection, aggregate, bins_for_factor, select_ticks, zoom_step,
};
use rebin_rs::render::NullRenderer;
use rebin_rs::{HistogramView, InMemoryDataset};
use std::hint::black_box;

fn generated_values(count: usize) -> Vec<f64> {
    (0..count)
        .map(|i| {
            let t = i as f64;
            500.0 + 300.0 * (t * 0.013).sin() + (t * 0.7).cos() * 25.0
        })
        .collect()
}

fn bench_bin_100k(c: &mut Criterion) {
    let values = generated_values(100_000);
    let scale = LinearScale::new((0.0, 1_000.0), (0.0, 1_600.0)).expect("valid scale");

    c.bench_function("bin_100k", |b| {
        b.iter(|| {
            let thresholds = bins_for_factor(black_box(&values), scale, black_box(0.2));
            let _ = thresholds.bin(black_box(&values));
        })
    });
}

fn bench_tick_selection(c: &mut Criterion) {
    let values = generated_values(1_000);
    let scale = LinearScale::new((0.0, 1_000.0), (0.0, 1_600.0)).expect("valid scale");
    let thresholds = bins_for_factor(&values, scale, 0.0);

    c.bench_function("tick_selection_finest", |b| {
        b.iter(|| {
            let _ = select_ticks(black_box(&thresholds), scale, MIN_LABEL_SPACING_PX);
        })
    });
}

fn bench_zoom_cycle(c: &mut Criterion) {
    let keys: Vec<Value> = (0..500).map(|i| Value::text(format!("k{i}"))).collect();

    c.bench_function("zoom_in_out_cycle", |b| {
        b.iter(|| {
            let mut x = AxisDomains::continuous(0.0, 1.0).expect("x domain");
            let mut y = AxisDomains::ordinal(keys.clone());
            for _ in 0..8 {
                zoom_step(ZoomDirection::In, &mut x, &mut y, ZoomAxes::BOTH);
            }
            for _ in 0..8 {
                zoom_step(ZoomDirection::Out, &mut x, &mut y, ZoomAxes::BOTH);
            }
            black_box((x, y));
        })
    });
}

fn bench_category_merge_10k(c: &mut Criterion) {
    let buckets: Vec<CategoryBucket> = (0..10_000)
        .map(|i| CategoryBucket::new(format!("c{i}"), (10_000 - i) as f64))
        .collect();

    c.bench_function("category_merge_10k", |b| {
        b.iter(|| {
            let _ = aggregate(black_box(&buckets), black_box(0.7));
        })
    });
}

fn bench_histogram_frame_20k(c: &mut Criterion) {
    let rows = generated_values(20_000)
        .into_iter()
        .map(|value| vec![Value::number(value)])
        .collect();
    let dataset =
        InMemoryDataset::new(vec!["value".to_owned()], rows).expect("valid generated dataset");
    let mut view = HistogramView::new(
        NullRenderer::default(),
        ViewConfig::new(Viewport::new(1600, 900)),
        &dataset,
        0,
    )
    .expect("view init");

    c.bench_function("histogram_rebin_and_render_20k", |b| {
        b.iter(|| {
            view.on_aggregate_change(black_box(0.3)).expect("rebin");
            view.render().expect("render");
        })
    });
}

criterion_group!(
    benches,
    bench_bin_100k,
    bench_tick_selection,
    bench_zoom_cycle,
    bench_category_merge_10k,
    bench_histogram_frame_20k
);
criterion_main!(benches);
