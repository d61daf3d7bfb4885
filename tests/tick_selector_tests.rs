use rebin_rs::core::ticks::label_precision;
use rebin_rs::core::{
    LinearScale, MIN_LABEL_SPACING_PX, bins_for_factor, linear_axis_ticks, select_ticks,
};

fn sample_values(lo: f64, hi: f64) -> Vec<f64> {
    (0..=100).map(|index| lo + (hi - lo) * index as f64 / 100.0).collect()
}

#[test]
fn ticks_are_thinned_to_keep_labels_apart() {
    let scale = LinearScale::new((0.0, 100.0), (0.0, 500.0)).expect("scale");
    let thresholds = bins_for_factor(&sample_values(0.0, 100.0), scale, 0.5);

    let ticks = select_ticks(&thresholds, scale, MIN_LABEL_SPACING_PX);
    let expected: Vec<f64> = (0..13).map(|index| index as f64 * 8.0).collect();
    assert_eq!(ticks.values, expected);
    assert_eq!(ticks.step, 8.0);
    assert_eq!(ticks.precision, 0);
    assert_eq!(ticks.labels()[..3], ["0", "8", "16"]);
}

#[test]
fn threshold_below_domain_is_not_labelled() {
    let scale = LinearScale::new((3.0, 100.0), (0.0, 500.0)).expect("scale");
    let thresholds = bins_for_factor(&sample_values(3.0, 100.0), scale, 0.5);

    let ticks = select_ticks(&thresholds, scale, MIN_LABEL_SPACING_PX);
    assert_eq!(ticks.values.first().copied(), Some(8.0));
    assert!(ticks.values.iter().all(|tick| *tick >= 3.0 && *tick <= 100.0));
}

#[test]
fn fractional_steps_get_matching_precision() {
    let scale = LinearScale::new((0.0, 1.0), (0.0, 500.0)).expect("scale");
    let thresholds = bins_for_factor(&sample_values(0.0, 1.0), scale, 0.5);
    assert!((thresholds.bin_width() - 0.04).abs() <= 1e-12);

    let ticks = select_ticks(&thresholds, scale, MIN_LABEL_SPACING_PX);
    assert_eq!(ticks.values.len(), 13);
    assert_eq!(ticks.precision, 2);
    assert_eq!(ticks.labels()[..3], ["0.00", "0.08", "0.16"]);
}

#[test]
fn wider_spacing_keeps_fewer_ticks() {
    let scale = LinearScale::new((0.0, 100.0), (0.0, 500.0)).expect("scale");
    let thresholds = bins_for_factor(&sample_values(0.0, 100.0), scale, 0.5);

    let dense = select_ticks(&thresholds, scale, MIN_LABEL_SPACING_PX);
    let sparse = select_ticks(&thresholds, scale, 150.0);
    assert!(sparse.values.len() < dense.values.len());
    assert_eq!(sparse.step, 32.0);
}

#[test]
fn single_bin_still_yields_ticks() {
    let scale = LinearScale::new((0.0, 100.0), (0.0, 500.0)).expect("scale");
    let thresholds = bins_for_factor(&sample_values(0.0, 100.0), scale, 1.0);
    let ticks = select_ticks(&thresholds, scale, MIN_LABEL_SPACING_PX);
    assert_eq!(ticks.values.first().copied(), Some(0.0));
}

#[test]
fn value_axis_ticks_use_natural_step() {
    let scale = LinearScale::new((0.0, 105.0), (350.0, 20.0)).expect("scale");
    let ticks = linear_axis_ticks(scale, 5);
    assert_eq!(ticks.values, vec![0.0, 20.0, 40.0, 60.0, 80.0, 100.0]);
    assert_eq!(ticks.step, 20.0);
    assert_eq!(ticks.precision, 0);
}

#[test]
fn precision_adds_digits_for_uneven_steps() {
    assert_eq!(label_precision(8.0), 0);
    assert_eq!(label_precision(0.08), 2);
    assert_eq!(label_precision(0.125), 3);
    assert_eq!(label_precision(f64::NAN), 0);
}
