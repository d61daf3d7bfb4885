use proptest::prelude::*;
use rebin_rs::core::{
    AxisDomains, CategoryBucket, Insets, LinearScale, PointerPosition,
    SINGLE_BIN_FACTOR_THRESHOLD, Value, Viewport, ZoomAxes, ZoomDirection, aggregate,
    bins_for_factor, plan_bin_count, zoom_step,
};
use rebin_rs::interaction::{
    DragContext, ScrollbarGeometry, pointer_down, pointer_move, pointer_up,
};

#[derive(Debug, Clone)]
enum Gesture {
    Zoom(bool),
    Drag { from: (f64, f64), to: (f64, f64) },
}

fn gesture() -> impl Strategy<Value = Gesture> {
    prop_oneof![
        any::<bool>().prop_map(Gesture::Zoom),
        ((0.0f64..420.0, 0.0f64..420.0), (-100.0f64..500.0, -100.0f64..500.0))
            .prop_map(|(from, to)| Gesture::Drag { from, to }),
    ]
}

fn category_keys(count: usize) -> Vec<Value> {
    (0..count).map(|index| Value::text(format!("k{index}"))).collect()
}

proptest! {
    #[test]
    fn gestures_keep_windows_inside_initial_domains(
        lo in -1_000.0f64..1_000.0,
        width in 0.001f64..1_000.0,
        key_count in 1usize..12,
        gestures in prop::collection::vec(gesture(), 1..40)
    ) {
        let geometry = ScrollbarGeometry::new(
            Viewport::new(400, 400),
            Insets::new(0.0, 0.0, 50.0, 50.0),
            Insets::default(),
            None,
            15.0,
            0.8,
        )
        .expect("geometry");
        let mut x = AxisDomains::continuous(lo, lo + width).expect("x domain");
        let mut y = AxisDomains::ordinal(category_keys(key_count));
        let mut context = DragContext::default();

        for gesture in gestures {
            match gesture {
                Gesture::Zoom(zoom_in) => {
                    let direction = if zoom_in { ZoomDirection::In } else { ZoomDirection::Out };
                    zoom_step(direction, &mut x, &mut y, ZoomAxes::BOTH);
                }
                Gesture::Drag { from, to } => {
                    let from = PointerPosition::new(from.0, from.1);
                    let to = PointerPosition::new(to.0, to.1);
                    if pointer_down(&mut context, &geometry, from, &x, &y).is_some() {
                        pointer_move(&context, &geometry, to, &mut x, &mut y);
                        pointer_up(&mut context, &geometry, to, &mut x, &mut y);
                    }
                }
            }

            prop_assert!(x.bounds().contains_current());
            prop_assert!(y.bounds().contains_current());
            prop_assert!(!y.current_categories().is_empty());
            prop_assert!(!context.is_dragging());
        }
    }

    #[test]
    fn coarser_factor_never_adds_bins(
        lo in -1_000.0f64..1_000.0,
        width in 0.01f64..10_000.0,
        pixels in 100.0f64..2_000.0,
        a in 0.0f64..1.0,
        b in 0.0f64..1.0
    ) {
        let scale = LinearScale::new((lo, lo + width), (0.0, pixels)).expect("scale");
        let (fine, coarse) = if a <= b { (a, b) } else { (b, a) };

        let fine_plan = plan_bin_count(scale, fine);
        let coarse_plan = plan_bin_count(scale, coarse);
        prop_assert!(fine_plan.bin_count >= coarse_plan.bin_count);
        prop_assert!(fine_plan.bin_count <= fine_plan.max_bin_count);

        // A single bin is as wide as the domain, which a snapped width may exceed.
        if coarse <= SINGLE_BIN_FACTOR_THRESHOLD {
            let values = [lo, lo + width / 2.0, lo + width];
            let fine_bins = bins_for_factor(&values, scale, fine);
            let coarse_bins = bins_for_factor(&values, scale, coarse);
            prop_assert!(fine_bins.bin_width() <= coarse_bins.bin_width());
            prop_assert!(fine_bins.bin_width() >= fine_plan.min_width * (1.0 - 1e-9));
        }
    }

    #[test]
    fn binning_is_deterministic_and_counts_every_value(
        values in prop::collection::vec(-500.0f64..500.0, 1..200),
        factor in 0.0f64..1.0
    ) {
        let scale = LinearScale::new((-500.0, 500.0), (0.0, 800.0)).expect("scale");
        let first = bins_for_factor(&values, scale, factor);
        let second = bins_for_factor(&values, scale, factor);
        prop_assert_eq!(&first, &second);

        let bins = first.bin(&values);
        prop_assert_eq!(bins.iter().map(|bin| bin.count).sum::<usize>(), values.len());
        for pair in bins.windows(2) {
            prop_assert!(pair[0].x1 <= pair[1].x0 + 1e-9);
        }
    }

    #[test]
    fn stronger_merge_never_adds_categories(
        counts in prop::collection::vec(1u32..1_000, 0..30),
        a in 0.0f64..1.0,
        b in 0.0f64..1.0
    ) {
        let mut counts = counts;
        counts.sort_unstable_by(|left, right| right.cmp(left));
        let buckets: Vec<CategoryBucket> = counts
            .iter()
            .enumerate()
            .map(|(index, count)| CategoryBucket::new(format!("k{index}"), f64::from(*count)))
            .collect();
        let (weak, strong) = if a <= b { (a, b) } else { (b, a) };

        let weak_merge = aggregate(&buckets, weak);
        let strong_merge = aggregate(&buckets, strong);
        prop_assert!(weak_merge.len() >= strong_merge.len());
        prop_assert_eq!(aggregate(&buckets, strong), strong_merge.clone());

        let total: f64 = buckets.iter().map(|bucket| bucket.value).sum();
        let merged_total: f64 = strong_merge.iter().map(|bucket| bucket.value).sum();
        prop_assert!((total - merged_total).abs() <= 1e-9);
    }
}
