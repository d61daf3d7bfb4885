use rebin_rs::core::continuous_binning::scott_bin_count;
use rebin_rs::core::{
    LinearScale, bins_for_factor, default_aggregate, min_bin_width, plan_bin_count,
};

fn percent_scale() -> LinearScale {
    LinearScale::new((0.0, 100.0), (0.0, 500.0)).expect("scale")
}

fn uniform_values() -> Vec<f64> {
    (0..100).map(|index| index as f64 + 0.5).collect()
}

#[test]
fn min_width_is_a_sixteenth_of_the_tick_step() {
    let scale = percent_scale();
    assert!((min_bin_width(scale) - 0.625).abs() <= 1e-12);

    let plan = plan_bin_count(scale, 0.0);
    assert_eq!(plan.max_bin_count, 160);
    assert_eq!(plan.bin_count, 160);
}

#[test]
fn finest_factor_never_drops_below_visibility_floor() {
    let scale = percent_scale();
    let thresholds = bins_for_factor(&uniform_values(), scale, 0.0);
    assert!(!thresholds.is_single_bin());
    assert!(thresholds.bin_width() >= min_bin_width(scale));
    assert!(thresholds.bin_count() <= thresholds.plan().max_bin_count);
    assert_eq!(thresholds.bin_width(), 0.8);
    assert_eq!(thresholds.bin_count(), 125);
}

#[test]
fn half_factor_produces_width_four_bins() {
    let values = uniform_values();
    let thresholds = bins_for_factor(&values, percent_scale(), 0.5);

    let plan = thresholds.plan();
    assert_eq!(plan.bin_count, 26);
    assert!((plan.raw_width - 100.0 / 26.0).abs() <= 1e-12);
    assert_eq!(thresholds.bin_width(), 4.0);

    let expected: Vec<f64> = (0..25).map(|index| index as f64 * 4.0).collect();
    assert_eq!(thresholds.thresholds(), expected.as_slice());

    let bins = thresholds.bin(&values);
    assert_eq!(bins.len(), 25);
    let last = bins.last().expect("last bin");
    assert_eq!((last.x0, last.x1), (96.0, 100.0));
    assert!(bins.iter().all(|bin| bin.count == 4));
    assert_eq!(bins.iter().map(|bin| bin.count).sum::<usize>(), 100);
}

#[test]
fn first_threshold_may_sit_below_domain_start() {
    let scale = LinearScale::new((3.0, 100.0), (0.0, 500.0)).expect("scale");
    let thresholds = bins_for_factor(&uniform_values(), scale, 0.5);

    assert_eq!(thresholds.bin_width(), 4.0);
    assert_eq!(thresholds.thresholds()[0], 0.0);
    let edges = thresholds.edges();
    assert_eq!(edges[0], 3.0);
    assert_eq!(edges[1], 4.0);
    assert_eq!(*edges.last().expect("last edge"), 100.0);
}

#[test]
fn coarse_factors_collapse_into_one_bin_containing_the_maximum() {
    let mut values = uniform_values();
    values.push(100.0);

    for factor in [0.96, 1.0, 7.0] {
        let thresholds = bins_for_factor(&values, percent_scale(), factor);
        assert!(thresholds.is_single_bin());
        let (lo, hi) = thresholds.domain();
        assert_eq!(lo, 0.0);
        assert!(hi > 100.0);

        let bins = thresholds.bin(&values);
        assert_eq!(bins.len(), 1);
        assert_eq!(bins[0].count, values.len());
    }
}

#[test]
fn degenerate_inputs_give_a_single_bin() {
    let empty = bins_for_factor(&[], percent_scale(), 0.0);
    assert!(empty.is_single_bin());
    assert_eq!(empty.bin_count(), 1);

    let flat = LinearScale::new((5.0, 5.0), (0.0, 500.0)).expect("scale");
    let thresholds = bins_for_factor(&[5.0, 5.0], flat, 0.0);
    assert!(thresholds.is_single_bin());
    assert_eq!(thresholds.domain(), (5.0, 5.0));
    assert_eq!(thresholds.bin(&[5.0, 5.0])[0].count, 2);
}

#[test]
fn nan_factor_behaves_like_finest_factor() {
    let values = uniform_values();
    let finest = bins_for_factor(&values, percent_scale(), 0.0);
    let nan = bins_for_factor(&values, percent_scale(), f64::NAN);
    assert_eq!(finest, nan);
}

#[test]
fn values_outside_domain_are_not_counted() {
    let thresholds = bins_for_factor(&uniform_values(), percent_scale(), 0.5);
    let bins = thresholds.bin(&[-1.0, 0.0, 50.0, 100.0, 101.0, f64::NAN]);
    assert_eq!(bins.iter().map(|bin| bin.count).sum::<usize>(), 3);
    assert_eq!(bins[0].count, 1);
    assert_eq!(bins[12].count, 1);
    assert_eq!(bins[24].count, 1);
}

#[test]
fn weighted_binning_sums_weights() {
    let thresholds = bins_for_factor(&uniform_values(), percent_scale(), 0.5);
    let bins = thresholds.bin_weighted([(1.0, 2.5), (2.0, 0.5), (99.0, 4.0), (200.0, 1.0)]);
    assert_eq!(bins[0].count, 2);
    assert!((bins[0].value - 3.0).abs() <= 1e-12);
    assert!((bins[24].value - 4.0).abs() <= 1e-12);
}

#[test]
fn default_aggregate_reproduces_scott_bin_count() {
    let values = uniform_values();
    assert_eq!(scott_bin_count(&values), Some(5));

    let factor = default_aggregate(&values, percent_scale());
    assert!(factor > 0.0 && factor < 1.0);
    assert_eq!(plan_bin_count(percent_scale(), factor).bin_count, 5);
}

#[test]
fn default_aggregate_without_spread_is_one() {
    assert_eq!(default_aggregate(&[4.0, 4.0, 4.0], percent_scale()), 1.0);
    assert_eq!(default_aggregate(&[4.0], percent_scale()), 1.0);
    assert_eq!(scott_bin_count(&[]), None);
}
