use approx::assert_relative_eq;
use statchart::core::{Scale, ScaleTransform, ScaleType, TickFormat, Value};

#[test]
fn linear_scale_maps_domain_endpoints_to_range_endpoints() {
    let scale = Scale::linear((0.0, 100.0), (60.0, 440.0));

    assert_relative_eq!(scale.map_number(0.0).expect("start"), 60.0);
    assert_relative_eq!(scale.map_number(100.0).expect("end"), 440.0);
    assert_relative_eq!(scale.map_number(25.0).expect("quarter"), 155.0);
}

#[test]
fn inverted_range_flips_vertical_axis() {
    let scale = Scale::linear((0.0, 10.0), (350.0, 40.0));

    assert_relative_eq!(scale.map_number(0.0).expect("bottom"), 350.0);
    assert_relative_eq!(scale.map_number(10.0).expect("top"), 40.0);
    assert_relative_eq!(scale.invert(195.0).expect("middle"), 5.0);
}

#[test]
fn log_scale_spaces_decades_evenly() {
    let scale = Scale::log((1.0, 1000.0), (0.0, 300.0));

    assert_eq!(scale.scale_type(), ScaleType::Continuous);
    assert_eq!(scale.transform(), Some(ScaleTransform::Log));
    assert_relative_eq!(scale.map_number(10.0).expect("10"), 100.0, epsilon = 1e-9);
    assert_relative_eq!(scale.map_number(100.0).expect("100"), 200.0, epsilon = 1e-9);
    assert!(scale.map_number(0.0).is_none());
    assert!(scale.map_number(-5.0).is_none());
}

#[test]
fn discrete_scale_places_categories_at_band_centres() {
    let scale = Scale::discrete(["a", "b", "c", "d"], (0.0, 400.0));

    let positions: Vec<f64> = ["a", "b", "c", "d"]
        .iter()
        .map(|key| scale.map(&Value::from(*key)).expect("known key"))
        .collect();
    assert_eq!(positions, vec![50.0, 150.0, 250.0, 350.0]);
    assert_relative_eq!(scale.band_width(), 100.0);
    assert!(scale.map(&Value::from("missing")).is_none());
    assert!(scale.invert(10.0).is_none());
}

#[test]
fn discrete_ticks_follow_domain_order() {
    let scale = Scale::discrete(["low", "mid", "high"], (0.0, 300.0));

    let labels: Vec<String> = scale.ticks(10).into_iter().map(|tick| tick.label).collect();
    assert_eq!(labels, vec!["low", "mid", "high"]);
}

#[test]
fn non_finite_and_null_values_have_no_position() {
    let scale = Scale::linear((0.0, 1.0), (0.0, 100.0));

    assert!(scale.map(&Value::Null).is_none());
    assert!(scale.map(&Value::Number(f64::NAN)).is_none());
    assert!(scale.map(&Value::Number(f64::INFINITY)).is_none());
}

#[test]
fn degenerate_scales_fail_validation() {
    assert!(Scale::linear((5.0, 5.0), (0.0, 100.0)).validate().is_err());
    assert!(Scale::linear((0.0, 1.0), (10.0, 10.0)).validate().is_err());
    assert!(Scale::log((0.0, 10.0), (0.0, 100.0)).validate().is_err());
    assert!(
        Scale::discrete(Vec::<String>::new(), (0.0, 100.0))
            .validate()
            .is_err()
    );
    assert!(Scale::linear((0.0, 1.0), (0.0, 100.0)).validate().is_ok());
}

#[test]
fn tick_keys_are_stable_across_equal_scales() {
    let first = Scale::linear((0.0, 1.0), (0.0, 500.0));
    let second = Scale::linear((0.0, 1.0), (0.0, 800.0));

    let first_keys: Vec<String> = first.ticks(5).into_iter().map(|tick| tick.key).collect();
    let second_keys: Vec<String> = second.ticks(5).into_iter().map(|tick| tick.key).collect();
    assert_eq!(first_keys, second_keys);
    assert!(!first_keys.is_empty());
}

#[test]
fn hover_format_overrides_tick_format() {
    let scale = Scale::linear((0.0, 1.0), (0.0, 100.0))
        .with_hover_format(TickFormat::custom(|value| format!("{:.0}%", value * 100.0)));

    assert_eq!(scale.format_hover(&Value::Number(0.25)), "25%");
}
