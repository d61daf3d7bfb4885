use rebin_rs::api::{DatasetSource, PlotLayout, numeric_column};
use rebin_rs::core::{Insets, Value, Viewport, ZoomAxes};
use rebin_rs::{InMemoryDataset, RebinError, ViewConfig};

#[test]
fn config_json_roundtrip_keeps_every_field() {
    let config = ViewConfig::new(Viewport::new(800, 600))
        .with_x_scroll_size(60.0)
        .with_zoom_axes(ZoomAxes::X_ONLY)
        .with_other_length_ratio(1.5)
        .with_band_padding(0.1);

    let json = config.to_json_pretty().expect("serialize");
    let restored = ViewConfig::from_json_str(&json).expect("deserialize");
    assert_eq!(restored, config);
}

#[test]
fn missing_fields_fall_back_to_defaults() {
    let config = ViewConfig::from_json_str(r#"{"viewport":{"width":650,"height":400}}"#)
        .expect("minimal config");
    assert_eq!(config, ViewConfig::new(Viewport::new(650, 400)));
    assert_eq!(config.margin, Insets::new(0.0, 10.0, 50.0, 50.0));
    assert_eq!(config.scroll_size, 15.0);
    assert_eq!(config.zoom_axes, ZoomAxes::BOTH);
}

#[test]
fn invalid_configs_are_rejected() {
    let zero = ViewConfig::new(Viewport::new(0, 400));
    assert!(matches!(
        zero.validate(),
        Err(RebinError::InvalidViewport {
            width: 0,
            height: 400
        })
    ));

    let padded = ViewConfig::new(Viewport::new(650, 400)).with_band_padding(1.5);
    assert!(matches!(padded.validate(), Err(RebinError::InvalidConfig(_))));

    let crowded = ViewConfig::new(Viewport::new(100, 100))
        .with_margin(Insets::new(0.0, 60.0, 0.0, 60.0));
    assert!(matches!(crowded.validate(), Err(RebinError::InvalidConfig(_))));

    let headroom = ViewConfig::new(Viewport::new(650, 400)).with_y_headroom(0.5);
    assert!(headroom.validate().is_err());

    assert!(matches!(
        ViewConfig::from_json_str("{not json"),
        Err(RebinError::InvalidConfig(_))
    ));
}

#[test]
fn layout_subtracts_margin_and_padding() {
    let layout = ViewConfig::new(Viewport::new(650, 400)).layout();
    assert_eq!(layout.x_range(), (70.0, 620.0));
    assert_eq!(layout.y_range(), (350.0, 20.0));
    assert_eq!(layout.width(), 550.0);

    let manual = PlotLayout::new(Viewport::new(650, 400), Insets::new(20.0, 30.0, 50.0, 70.0));
    assert_eq!(manual, layout);
}

#[test]
fn dataset_parses_mixed_cells_from_json() {
    let dataset = InMemoryDataset::from_json_str(
        r#"{"column_names":["x","label"],"rows":[[1.5,"a"],[2,"b"],["n/a","c"]]}"#,
    )
    .expect("dataset");

    assert_eq!(dataset.len(), 3);
    assert_eq!(dataset.column_name(1).expect("column"), "label");
    assert_eq!(dataset.rows()[1][0], Value::number(2.0));
    assert_eq!(numeric_column(&dataset, 0).expect("numbers"), vec![1.5, 2.0]);
    assert!(numeric_column(&dataset, 1).expect("labels").is_empty());
}

#[test]
fn dataset_rejects_ragged_rows_and_unknown_columns() {
    let ragged = InMemoryDataset::new(
        vec!["x".to_owned(), "y".to_owned()],
        vec![vec![Value::number(1.0)]],
    );
    assert!(matches!(ragged, Err(RebinError::InvalidData(_))));

    let dataset = InMemoryDataset::new(vec!["x".to_owned()], Vec::new()).expect("empty dataset");
    assert!(dataset.is_empty());
    assert!(matches!(
        numeric_column(&dataset, 5),
        Err(RebinError::UnknownColumn {
            index: 5,
            available: 1
        })
    ));
}
