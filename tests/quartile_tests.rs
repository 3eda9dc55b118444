use approx::assert_relative_eq;
use statchart::core::{QuartileSummary, WHISKER_IQR_FACTOR};

#[test]
fn odd_group_with_one_far_sample_classifies_it_as_outlier() {
    let samples = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 100.0];
    let summary = QuartileSummary::from_samples(samples).expect("summary");

    assert_relative_eq!(summary.median, 6.0);
    assert_relative_eq!(summary.q1, 3.0);
    assert_relative_eq!(summary.q3, 9.0);
    assert_relative_eq!(summary.iqr, 6.0);
    assert_relative_eq!(summary.upper_fence(), 9.0 + WHISKER_IQR_FACTOR * 6.0);

    let outliers: Vec<f64> = summary.outliers().collect();
    assert_eq!(outliers, vec![100.0]);
    for value in 1..=10 {
        assert!(!summary.is_outlier(f64::from(value)));
    }
}

#[test]
fn whiskers_reach_the_extreme_in_fence_samples() {
    let samples = [100.0, 10.0, 9.0, 8.0, 7.0, 6.0, 5.0, 4.0, 3.0, 2.0, 1.0];
    let summary = QuartileSummary::from_samples(samples).expect("summary");

    assert_eq!(summary.upper_whisker(), Some(10.0));
    assert_eq!(summary.lower_whisker(), Some(1.0));
    assert_eq!(summary.sorted_values.first().copied(), Some(1.0));
    assert_eq!(summary.sorted_values.last().copied(), Some(100.0));
}

#[test]
fn whisker_is_suppressed_when_every_value_above_q3_is_an_outlier() {
    let samples = [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 10.0];
    let summary = QuartileSummary::from_samples(samples).expect("summary");

    assert_relative_eq!(summary.q3, 0.0);
    assert_relative_eq!(summary.iqr, 0.0);
    assert_eq!(summary.upper_whisker(), None);
    assert_eq!(summary.lower_whisker(), None);
    assert_eq!(summary.outliers().collect::<Vec<_>>(), vec![10.0]);
}

#[test]
fn group_without_finite_samples_has_no_summary() {
    assert!(QuartileSummary::from_samples(Vec::<f64>::new()).is_none());
    assert!(QuartileSummary::from_samples([f64::NAN, f64::INFINITY]).is_none());
}
