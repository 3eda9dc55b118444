use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use statchart::api::Chart;
use statchart::core::{
    Aes, Channel, Geom, GeomOptions, Layer, LayerHandlers, Plot, Row, RowPointerEvent, Scale,
    Viewport,
};
use statchart::render::{NodeKind, NullRenderer};

fn continuous_plot() -> Plot {
    let plot = Plot::new(Viewport::new(600, 400));
    let x_range = plot.x_range();
    let y_range = plot.y_range();
    plot.with_x_scale(Scale::linear((0.0, 100.0), x_range))
        .with_y_left_scale(Scale::linear((0.0, 100.0), y_range))
}

fn box_plot(show_outliers: bool) -> Plot {
    let plot = Plot::new(Viewport::new(600, 400));
    let x_range = plot.x_range();
    let y_range = plot.y_range();

    let mut data = Vec::new();
    for value in [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 100.0] {
        data.push(Row::new().with("group", "a").with("value", value));
    }
    for value in [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 10.0] {
        data.push(Row::new().with("group", "b").with("value", value));
    }
    // Group without numeric samples draws no box.
    data.push(Row::new().with("group", "c"));

    plot.with_x_scale(Scale::discrete(["a", "b", "c"], x_range))
        .with_y_left_scale(Scale::linear((0.0, 110.0), y_range))
        .with_layer(
            Layer::new("boxes", Geom::BoxPlot, Aes::xy("group", "value"), data).with_options(
                GeomOptions {
                    show_outliers,
                    ..GeomOptions::default()
                },
            ),
        )
}

#[test]
fn path_layer_draws_one_polyline_per_group() {
    let mut chart = Chart::new(NullRenderer::default());
    let data = vec![
        Row::new().with("x", 0.0).with("y", 10.0).with("series", "a"),
        Row::new().with("x", 50.0).with("y", 20.0).with("series", "a"),
        Row::new().with("x", 0.0).with("y", 30.0).with("series", "b"),
        Row::new().with("x", 50.0).with("y", 40.0).with("series", "b"),
        Row::new().with("x", 90.0).with("y", 50.0).with("series", "b"),
    ];
    let aes = Aes::xy("x", "y")
        .with_group(Channel::column("series"))
        .with_color(Channel::column("series"));
    let plot = continuous_plot().with_layer(Layer::new("lines", Geom::Path, aes, data));

    let report = chart.render(&plot).expect("render");

    assert!(report.is_rendered());
    let scene = chart.scene().expect("scene");
    let paths = scene.nodes_with_class("geom-path");
    assert_eq!(paths.len(), 2);
    let vertex_counts: Vec<usize> = paths
        .iter()
        .map(|node| match &node.kind {
            NodeKind::Path { d } => d.commands().len(),
            _ => 0,
        })
        .collect();
    assert_eq!(vertex_counts, vec![2, 3]);
    assert_eq!(report.legend_entries, 2);
}

#[test]
fn ungrouped_path_layer_is_a_single_line() {
    let mut chart = Chart::new(NullRenderer::default());
    let data = (0..5)
        .map(|index| {
            Row::new()
                .with("x", f64::from(index) * 20.0)
                .with("y", f64::from(index) * 10.0)
        })
        .collect();
    let plot = continuous_plot().with_layer(Layer::new("line", Geom::Path, Aes::xy("x", "y"), data));

    chart.render(&plot).expect("render");

    assert_eq!(chart.snapshot().expect("scene").count_class("geom-path"), 1);
}

#[test]
fn error_bars_draw_stem_and_caps_per_row() {
    let mut chart = Chart::new(NullRenderer::default());
    let data = vec![
        Row::new().with("x", 10.0).with("y", 50.0).with("err", 5.0),
        Row::new().with("x", 20.0).with("y", 60.0).with("err", -8.0),
        Row::new().with("x", 30.0).with("y", 70.0),
    ];
    let aes = Aes::xy("x", "y").with_y_error(Channel::column("err"));
    let plot = continuous_plot().with_layer(Layer::new("errors", Geom::ErrorBar, aes, data));

    chart.render(&plot).expect("render");

    let snapshot = chart.snapshot().expect("scene");
    assert_eq!(snapshot.count_class("geom-errorbar"), 2);
    assert_eq!(snapshot.count_class("errorbar-stem"), 2);
    assert_eq!(snapshot.count_class("errorbar-cap"), 4);
}

#[test]
fn box_plot_draws_one_box_per_group_with_samples() {
    let mut chart = Chart::new(NullRenderer::default());

    let report = chart.render(&box_plot(false)).expect("render");

    assert!(report.is_rendered());
    let snapshot = chart.snapshot().expect("scene");
    assert_eq!(snapshot.count_class("geom-boxplot"), 2);
    assert_eq!(snapshot.count_class("box-body"), 2);
    assert_eq!(snapshot.count_class("box-median"), 2);
    assert_eq!(snapshot.count_class("geom-boxplot-outlier"), 0);
}

#[test]
fn box_plot_suppresses_whiskers_without_in_fence_samples() {
    let mut chart = Chart::new(NullRenderer::default());

    chart.render(&box_plot(false)).expect("render");

    let snapshot = chart.snapshot().expect("scene");
    // Group `a` has both whiskers; every sample of `b` outside the box is an outlier.
    assert_eq!(snapshot.count_class("box-whisker-upper"), 1);
    assert_eq!(snapshot.count_class("box-whisker-lower"), 1);
}

#[test]
fn box_plot_outliers_are_drawn_as_glyphs_on_request() {
    let mut chart = Chart::new(NullRenderer::default());

    chart.render(&box_plot(true)).expect("render");
    assert_eq!(
        chart.snapshot().expect("scene").count_class("geom-boxplot-outlier"),
        2
    );

    chart.render(&box_plot(false)).expect("render");
    assert_eq!(
        chart.snapshot().expect("scene").count_class("geom-boxplot-outlier"),
        0
    );
}

#[test]
fn glyph_handlers_receive_hover_mouseout_and_click() {
    let hovered = Arc::new(AtomicUsize::new(0));
    let left = Arc::new(AtomicUsize::new(0));
    let clicked_row = Arc::new(AtomicUsize::new(usize::MAX));

    let handlers = {
        let hovered = Arc::clone(&hovered);
        let left = Arc::clone(&left);
        let clicked_row = Arc::clone(&clicked_row);
        LayerHandlers {
            on_hover: Some(Arc::new(move |_: &RowPointerEvent| {
                hovered.fetch_add(1, Ordering::SeqCst);
            })),
            on_mouseout: Some(Arc::new(move |_: &RowPointerEvent| {
                left.fetch_add(1, Ordering::SeqCst);
            })),
            on_click: Some(Arc::new(move |event: &RowPointerEvent| {
                clicked_row.store(event.row_index, Ordering::SeqCst);
            })),
        }
    };
    let data = vec![
        Row::new().with("x", 50.0).with("y", 50.0),
        Row::new().with("x", 90.0).with("y", 90.0),
    ];
    let plot = continuous_plot().with_layer(
        Layer::new("points", Geom::Point, Aes::xy("x", "y"), data).with_handlers(handlers),
    );
    let mut chart = Chart::new(NullRenderer::default());
    chart.render(&plot).expect("render");

    // (50, 50) projects to (250, 195).
    assert!(chart.pointer_move(250.0, 195.0).expect("move"));
    assert!(chart.pointer_move(251.0, 196.0).expect("move within glyph"));
    assert_eq!(hovered.load(Ordering::SeqCst), 1);

    chart.pointer_move(100.0, 300.0).expect("move away");
    assert_eq!(left.load(Ordering::SeqCst), 1);

    assert!(chart.click(250.0, 195.0).expect("click"));
    assert_eq!(clicked_row.load(Ordering::SeqCst), 0);
    assert!(!chart.click(f64::NAN, 10.0).expect("non-finite click"));
}

#[test]
fn color_scale_assigns_distinct_colors_per_key() {
    let mut chart = Chart::new(NullRenderer::default());
    let data = vec![
        Row::new().with("x", 10.0).with("y", 10.0).with("kind", "a"),
        Row::new().with("x", 20.0).with("y", 20.0).with("kind", "b"),
        Row::new().with("x", 30.0).with("y", 30.0).with("kind", "a"),
    ];
    let aes = Aes::xy("x", "y").with_color(Channel::column("kind"));
    let plot = continuous_plot().with_layer(Layer::new("points", Geom::Point, aes, data));

    chart.render(&plot).expect("render");

    let scene = chart.scene().expect("scene");
    let fills: Vec<_> = scene
        .nodes_with_class("geom-point")
        .iter()
        .map(|node| node.style.fill)
        .collect();
    assert_eq!(fills.len(), 3);
    assert_eq!(fills[0], fills[2]);
    assert_ne!(fills[0], fills[1]);
}

fn two_group_box_plot(y_scale: fn((f64, f64)) -> Scale) -> Plot {
    let plot = Plot::new(Viewport::new(600, 400));
    let x_range = plot.x_range();
    let y_range = plot.y_range();
    let mut data = Vec::new();
    for value in [10.0, 20.0, 30.0, 40.0, 50.0] {
        data.push(Row::new().with("group", "a").with("value", value));
    }
    for value in [-5.0, -4.0, -3.0, -2.0, -1.0] {
        data.push(Row::new().with("group", "b").with("value", value));
    }
    plot.with_x_scale(Scale::discrete(["a", "b"], x_range))
        .with_y_left_scale(y_scale(y_range))
        .with_layer(Layer::new(
            "boxes",
            Geom::BoxPlot,
            Aes::xy("group", "value"),
            data,
        ))
}

#[test]
fn box_whose_quartiles_leave_the_scale_is_removed_entirely() {
    let mut chart = Chart::new(NullRenderer::default());
    chart
        .render(&two_group_box_plot(|range| Scale::linear((-10.0, 60.0), range)))
        .expect("linear render");
    let snapshot = chart.snapshot().expect("scene");
    assert_eq!(snapshot.count_class("geom-boxplot"), 2);
    assert_eq!(snapshot.count_class("box-body"), 2);

    // Group `b` has no positive quartile on a log axis.
    chart
        .render(&two_group_box_plot(|range| Scale::log((1.0, 100.0), range)))
        .expect("log render");

    let snapshot = chart.snapshot().expect("scene");
    assert_eq!(snapshot.count_class("geom-boxplot"), 1);
    assert_eq!(snapshot.count_class("box-body"), 1);
    assert_eq!(snapshot.count_class("box-median"), 1);
    assert_eq!(snapshot.count_class("box-whisker"), 2);
}
