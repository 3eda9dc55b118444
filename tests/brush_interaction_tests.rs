use std::sync::{Arc, Mutex};

use approx::assert_relative_eq;
use statchart::api::{
    AxisExtent, BrushEvent, BrushEventKind, Chart, ChartEventListener, LabelClickEvent,
};
use statchart::core::{
    Aes, BrushConfig, Geom, LabelTarget, Layer, Plot, PlotLabel, PlotLabels, Row, Scale, Viewport,
};
use statchart::error::ChartError;
use statchart::interaction::BrushState;
use statchart::render::NullRenderer;

#[derive(Clone, Default)]
struct Recorder {
    brush: Arc<Mutex<Vec<BrushEvent>>>,
    labels: Arc<Mutex<Vec<LabelClickEvent>>>,
}

impl Recorder {
    fn brush_kinds(&self) -> Vec<BrushEventKind> {
        self.brush
            .lock()
            .expect("lock")
            .iter()
            .map(|event| event.kind)
            .collect()
    }

    fn last_brush(&self) -> BrushEvent {
        self.brush
            .lock()
            .expect("lock")
            .last()
            .cloned()
            .expect("at least one brush event")
    }
}

impl ChartEventListener for Recorder {
    fn on_brush(&mut self, event: &BrushEvent) {
        self.brush.lock().expect("lock").push(event.clone());
    }

    fn on_label_click(&mut self, event: &LabelClickEvent) {
        self.labels.lock().expect("lock").push(*event);
    }
}

/// Grid spans x 60..440 and y 40..350 on a 600x400 viewport.
fn brushable_plot(x_domain: (f64, f64)) -> Plot {
    let plot = Plot::new(Viewport::new(600, 400));
    let x_range = plot.x_range();
    let y_range = plot.y_range();
    let data = [(5.0, 60.0), (15.0, 60.0), (25.0, 60.0), (35.0, 60.0), (25.0, 10.0)]
        .iter()
        .map(|(x, y)| Row::new().with("x", *x).with("y", *y))
        .collect();
    plot.with_x_scale(Scale::linear(x_domain, x_range))
        .with_y_left_scale(Scale::linear((0.0, 100.0), y_range))
        .with_layer(Layer::new("points", Geom::Point, Aes::xy("x", "y"), data))
        .with_brush(BrushConfig::default())
}

fn continuous(extent: Option<&AxisExtent>) -> (f64, f64) {
    match extent {
        Some(AxisExtent::Continuous(low, high)) => (*low, *high),
        other => panic!("expected continuous extent, got {other:?}"),
    }
}

fn brushed_chart() -> (Chart<NullRenderer>, Recorder) {
    let recorder = Recorder::default();
    let mut chart = Chart::new(NullRenderer::default());
    chart.set_event_listener(recorder.clone());
    chart.render(&brushable_plot((0.0, 100.0))).expect("render");
    (chart, recorder)
}

#[test]
fn brush_without_listener_is_a_contract_error() {
    let mut chart = Chart::new(NullRenderer::default());

    let result = chart.render(&brushable_plot((0.0, 100.0)));

    assert!(matches!(result, Err(ChartError::MissingCallback(_))));
}

#[test]
fn brush_round_trip_none_x_both_none() {
    let (mut chart, recorder) = brushed_chart();
    assert_eq!(chart.brush_state(), BrushState::None);
    assert!(chart.brush_extent().is_none());

    // 98..174 px is 10..30 in data units.
    assert!(chart.test_control().brush_x(98.0, 174.0).expect("brush x"));
    assert_eq!(chart.brush_state(), BrushState::X);
    assert_eq!(
        recorder.brush_kinds(),
        vec![BrushEventKind::Start, BrushEventKind::Brush, BrushEventKind::End]
    );
    let extent = chart.brush_extent().expect("x extent");
    let (low, high) = continuous(extent.x.as_ref());
    assert_relative_eq!(low, 10.0, epsilon = 1e-9);
    assert_relative_eq!(high, 30.0, epsilon = 1e-9);
    assert!(extent.y.is_none());

    let end = recorder.last_brush();
    assert_eq!(end.state, BrushState::X);
    assert_eq!(end.layer_data.len(), 1);
    assert_eq!(end.selections[0].rows, vec![1, 2, 4]);

    // 133..195 px is 70..50 in data units.
    assert!(chart.test_control().brush_y(133.0, 195.0).expect("brush y"));
    assert_eq!(chart.brush_state(), BrushState::Both);
    let extent = chart.brush_extent().expect("both extent");
    let (x_low, x_high) = continuous(extent.x.as_ref());
    assert_relative_eq!(x_low, 10.0, epsilon = 1e-9);
    assert_relative_eq!(x_high, 30.0, epsilon = 1e-9);
    let (y_low, y_high) = continuous(extent.y.as_ref());
    assert_relative_eq!(y_low, 50.0, epsilon = 1e-9);
    assert_relative_eq!(y_high, 70.0, epsilon = 1e-9);
    assert_eq!(recorder.last_brush().selections[0].rows, vec![1, 2]);

    chart.clear_brush().expect("clear");
    assert_eq!(chart.brush_state(), BrushState::None);
    assert!(chart.brush_extent().is_none());
    let cleared = recorder.last_brush();
    assert_eq!(cleared.kind, BrushEventKind::Clear);
    assert!(cleared.pointer.is_none());
    assert!(cleared.selections.is_empty());
}

#[test]
fn zero_length_gesture_clears_the_brush() {
    let (mut chart, recorder) = brushed_chart();
    chart.test_control().brush_x(98.0, 174.0).expect("brush x");

    chart.test_control().brush_x(200.0, 200.0).expect("empty brush");

    assert_eq!(chart.brush_state(), BrushState::None);
    let end = recorder.last_brush();
    assert_eq!(end.kind, BrushEventKind::End);
    assert_eq!(end.state, BrushState::None);
}

#[test]
fn main_surface_selects_both_axes() {
    let (mut chart, _recorder) = brushed_chart();

    assert!(
        chart
            .test_control()
            .brush_main((98.0, 133.0), (174.0, 195.0))
            .expect("brush main")
    );

    assert_eq!(chart.brush_state(), BrushState::Both);
    let snapshot = chart.snapshot().expect("scene");
    // Main selection plus one rect per handle strip.
    assert_eq!(snapshot.count_class("brush-selection"), 3);
}

#[test]
fn handle_strips_mirror_the_main_selection() {
    let (mut chart, _recorder) = brushed_chart();
    chart.test_control().brush_x(98.0, 174.0).expect("brush x");

    let snapshot = chart.snapshot().expect("scene");
    assert_eq!(snapshot.count_class("brush"), 1);
    assert_eq!(snapshot.count_class("brush-x-handle"), 1);
    assert_eq!(snapshot.count_class("brush-y-handle"), 1);
    // Main rect and x handle show the selection; the y handle stays empty.
    assert_eq!(snapshot.count_class("brush-selection"), 2);
}

#[test]
fn brush_data_extent_survives_rescale() {
    let (mut chart, _recorder) = brushed_chart();
    chart.test_control().brush_x(98.0, 174.0).expect("brush x");

    chart.render(&brushable_plot((0.0, 200.0))).expect("re-render");

    assert_eq!(chart.brush_state(), BrushState::X);
    let extent = chart.brush_extent().expect("extent kept");
    let (low, high) = continuous(extent.x.as_ref());
    assert_relative_eq!(low, 10.0, epsilon = 1e-6);
    assert_relative_eq!(high, 30.0, epsilon = 1e-6);
}

#[test]
fn removing_brush_config_drops_brush_nodes() {
    let (mut chart, _recorder) = brushed_chart();
    chart.test_control().brush_x(98.0, 174.0).expect("brush x");

    let mut plot = brushable_plot((0.0, 100.0));
    plot.brush = None;
    chart.render(&plot).expect("render");

    assert_eq!(chart.brush_state(), BrushState::None);
    assert_eq!(chart.snapshot().expect("scene").count_class("brush"), 0);
}

#[test]
fn pointer_input_drives_the_main_brush() {
    let (mut chart, recorder) = brushed_chart();

    assert!(chart.pointer_down(100.0, 100.0).expect("down"));
    assert!(chart.pointer_move(200.0, 250.0).expect("move"));
    assert!(chart.pointer_up(200.0, 250.0).expect("up"));

    assert_eq!(chart.brush_state(), BrushState::Both);
    assert_eq!(
        recorder.brush_kinds(),
        vec![BrushEventKind::Start, BrushEventKind::Brush, BrushEventKind::End]
    );
    assert!(!chart.pointer_up(200.0, 250.0).expect("up without gesture"));
    assert!(!chart.pointer_down(5.0, 5.0).expect("down outside brush"));
}

#[test]
fn clickable_label_emits_label_click() {
    let recorder = Recorder::default();
    let mut chart = Chart::new(NullRenderer::default());
    chart.set_event_listener(recorder.clone());
    let labels = PlotLabels {
        title: Some(PlotLabel::new("Response by dose").clickable()),
        x: Some(PlotLabel::new("dose")),
        ..PlotLabels::default()
    };
    let mut plot = brushable_plot((0.0, 100.0)).with_labels(labels);
    plot.brush = None;
    chart.render(&plot).expect("render");

    assert!(chart.test_control().click_label(LabelTarget::Title).expect("click"));
    assert!(!chart.test_control().click_label(LabelTarget::X).expect("no overlay"));

    let clicks = recorder.labels.lock().expect("lock");
    assert_eq!(clicks.len(), 1);
    assert_eq!(clicks[0].target, LabelTarget::Title);
}

#[test]
fn clickable_label_without_listener_is_a_contract_error() {
    let mut chart = Chart::new(NullRenderer::default());
    let labels = PlotLabels {
        x: Some(PlotLabel::new("dose").clickable()),
        ..PlotLabels::default()
    };
    let mut plot = brushable_plot((0.0, 100.0)).with_labels(labels);
    plot.brush = None;

    assert!(matches!(
        chart.render(&plot),
        Err(ChartError::MissingCallback(_))
    ));
}

#[test]
fn error_render_keeps_brush_overlays_off_the_message() {
    let (mut chart, recorder) = brushed_chart();
    chart.test_control().brush_x(98.0, 174.0).expect("brush x");

    let mut broken = brushable_plot((0.0, 100.0));
    broken.scales.x = None;
    let report = chart.render(&broken).expect("error render");
    assert!(report.error().is_some());
    assert_eq!(chart.brush_state(), BrushState::X);

    chart.clear_brush().expect("clear");

    let snapshot = chart.snapshot().expect("scene");
    assert_eq!(snapshot.count_class("chart-error"), 1);
    assert_eq!(snapshot.count_class("brush"), 0);
    assert_eq!(snapshot.count_class("brush-x-handle"), 0);
    assert_eq!(snapshot.count_class("brush-overlay"), 0);
    assert_eq!(recorder.last_brush().kind, BrushEventKind::Clear);
    assert_eq!(chart.brush_state(), BrushState::None);

    chart.render(&brushable_plot((0.0, 100.0))).expect("recovered render");
    let snapshot = chart.snapshot().expect("scene");
    assert_eq!(snapshot.count_class("chart-error"), 0);
    assert_eq!(snapshot.count_class("brush"), 1);
}

#[test]
fn re_render_mid_gesture_keeps_the_gesture() {
    let (mut chart, recorder) = brushed_chart();

    assert!(chart.pointer_down(100.0, 100.0).expect("down"));
    chart.render(&brushable_plot((0.0, 200.0))).expect("re-render mid drag");
    assert!(chart.pointer_move(200.0, 250.0).expect("move"));
    assert!(chart.pointer_up(200.0, 250.0).expect("up"));

    assert_eq!(chart.brush_state(), BrushState::Both);
    assert_eq!(
        recorder.brush_kinds(),
        vec![BrushEventKind::Start, BrushEventKind::Brush, BrushEventKind::End]
    );
    // Pixels 100..200 measured on the rescaled x axis (60..440 px over 0..200).
    let extent = chart.brush_extent().expect("extent");
    let (low, high) = continuous(extent.x.as_ref());
    assert_relative_eq!(low, 40.0 / 380.0 * 200.0, epsilon = 1e-6);
    assert_relative_eq!(high, 140.0 / 380.0 * 200.0, epsilon = 1e-6);
}
