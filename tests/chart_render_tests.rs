use statchart::api::{Chart, ChartConfig, RenderStatus};
use statchart::core::{
    Aes, Channel, Geom, GeomOptions, Layer, Plot, PlotLabel, PlotLabels, Row, Scale, Viewport,
};
use statchart::error::ChartError;
use statchart::render::NullRenderer;

fn rows(points: &[(f64, f64)]) -> Vec<Row> {
    points
        .iter()
        .map(|(x, y)| Row::new().with("x", *x).with("y", *y))
        .collect()
}

fn base_plot() -> Plot {
    let plot = Plot::new(Viewport::new(600, 400));
    let x_range = plot.x_range();
    let y_range = plot.y_range();
    plot.with_x_scale(Scale::linear((0.0, 100.0), x_range))
        .with_y_left_scale(Scale::linear((0.0, 100.0), y_range))
}

fn scatter_plot(points: &[(f64, f64)]) -> Plot {
    base_plot().with_layer(Layer::new("points", Geom::Point, Aes::xy("x", "y"), rows(points)))
}

#[test]
fn scatter_draws_one_glyph_per_finite_row() {
    let mut chart = Chart::new(NullRenderer::default());
    let mut data = rows(&[(10.0, 10.0), (20.0, 40.0), (30.0, 90.0)]);
    data.push(Row::new().with("x", 40.0));
    let plot = base_plot().with_layer(Layer::new("points", Geom::Point, Aes::xy("x", "y"), data));

    let report = chart.render(&plot).expect("render");

    assert!(report.is_rendered());
    let snapshot = chart.snapshot().expect("scene exists");
    assert_eq!(snapshot.count_class("geom-point"), 3);
    assert_eq!(snapshot.count_class("axis-bottom"), 1);
    assert_eq!(snapshot.count_class("axis-left"), 1);
    assert_eq!(snapshot.count_class("axis-right"), 0);
    assert_eq!(chart.renderer().render_count, 1);
    assert_eq!(chart.renderer().last_node_count, report.node_count);
}

#[test]
fn rendering_the_same_plot_twice_is_idempotent() {
    let mut chart = Chart::new(NullRenderer::default());
    let plot = Plot::new(Viewport::new(600, 400));
    let x_range = plot.x_range();
    let y_range = plot.y_range();
    let data = ["a", "b", "c", "a"]
        .iter()
        .enumerate()
        .map(|(index, category)| {
            Row::new()
                .with("x", *category)
                .with("y", index as f64 * 20.0)
        })
        .collect();
    let plot = plot
        .with_x_scale(Scale::discrete(["a", "b", "c"], x_range))
        .with_y_left_scale(Scale::linear((0.0, 100.0), y_range))
        .with_layer(
            Layer::new("jittered", Geom::Point, Aes::xy("x", "y"), data).with_options(
                GeomOptions {
                    jitter: true,
                    ..GeomOptions::default()
                },
            ),
        );

    chart.test_control().set_jitter_seed(7);
    chart.render(&plot).expect("first render");
    let first = chart.snapshot().expect("first snapshot");

    chart.test_control().set_jitter_seed(7);
    chart.render(&plot).expect("second render");
    let second = chart.snapshot().expect("second snapshot");

    assert_eq!(first, second);
}

#[test]
fn shrinking_data_keeps_nodes_for_surviving_rows() {
    let mut chart = Chart::new(NullRenderer::default());
    chart
        .render(&scatter_plot(&[(10.0, 10.0), (20.0, 20.0), (30.0, 30.0)]))
        .expect("first render");
    let before: Vec<_> = chart
        .scene()
        .expect("scene")
        .nodes_with_class("geom-point")
        .iter()
        .map(|node| node.id)
        .collect();

    chart
        .render(&scatter_plot(&[(15.0, 10.0), (25.0, 20.0)]))
        .expect("second render");
    let after: Vec<_> = chart
        .scene()
        .expect("scene")
        .nodes_with_class("geom-point")
        .iter()
        .map(|node| node.id)
        .collect();

    assert_eq!(after.len(), 2);
    assert_eq!(after, before[..2].to_vec());
}

#[test]
fn missing_x_scale_replaces_chart_with_error_message() {
    let mut chart = Chart::new(NullRenderer::default());
    let plot = Plot::new(Viewport::new(600, 400));
    let y_range = plot.y_range();
    let plot = plot
        .with_y_left_scale(Scale::linear((0.0, 1.0), y_range))
        .with_layer(Layer::new("points", Geom::Point, Aes::xy("x", "y"), rows(&[(0.5, 0.5)])));

    let report = chart.render(&plot).expect("presentable error is not returned");

    assert!(matches!(report.status, RenderStatus::Failed(ChartError::Configuration(_))));
    let snapshot = chart.snapshot().expect("scene exists");
    assert_eq!(snapshot.count_class("chart-error"), 1);
    assert_eq!(snapshot.count_class("layer"), 0);
    assert_eq!(snapshot.count_class("axis"), 0);
}

#[test]
fn chart_recovers_after_an_error_render() {
    let mut chart = Chart::new(NullRenderer::default());
    let broken = Plot::new(Viewport::new(600, 400));
    chart.render(&broken).expect("error render");

    let report = chart.render(&scatter_plot(&[(1.0, 1.0)])).expect("render");

    assert!(report.is_rendered());
    let snapshot = chart.snapshot().expect("scene");
    assert_eq!(snapshot.count_class("chart-error"), 0);
    assert_eq!(snapshot.count_class("geom-point"), 1);
}

#[test]
fn box_plot_on_continuous_x_is_unsupported_geometry() {
    let mut chart = Chart::new(NullRenderer::default());
    let plot = base_plot().with_layer(Layer::new(
        "boxes",
        Geom::BoxPlot,
        Aes::xy("x", "y"),
        rows(&[(1.0, 1.0), (1.0, 2.0)]),
    ));

    let report = chart.render(&plot).expect("presentable error is not returned");

    assert!(matches!(
        report.error(),
        Some(ChartError::UnsupportedGeometry(_))
    ));
    assert_eq!(chart.snapshot().expect("scene").count_class("chart-error"), 1);
}

#[test]
fn partially_empty_plot_draws_warning_banner() {
    let mut chart = Chart::new(NullRenderer::default());
    let empty = vec![Row::new().with("x", 1.0), Row::new().with("y", 2.0)];
    let plot = scatter_plot(&[(10.0, 10.0)])
        .with_layer(Layer::new("empty", Geom::Point, Aes::xy("x", "y"), empty));

    let report = chart.render(&plot).expect("render");

    assert!(report.is_rendered());
    assert_eq!(report.empty_layers, vec!["empty".to_owned()]);
    let snapshot = chart.snapshot().expect("scene");
    assert_eq!(snapshot.count_class("chart-warning"), 1);
    assert_eq!(snapshot.count_class("geom-point"), 1);

    chart.render(&scatter_plot(&[(10.0, 10.0)])).expect("render");
    assert_eq!(chart.snapshot().expect("scene").count_class("chart-warning"), 0);
}

#[test]
fn all_layers_empty_escalates_to_error() {
    let mut chart = Chart::new(NullRenderer::default());
    let plot = base_plot().with_layer(Layer::new(
        "empty",
        Geom::Point,
        Aes::xy("x", "y"),
        vec![Row::new().with("x", "not a number").with("y", 3.0)],
    ));

    let report = chart.render(&plot).expect("render");

    assert!(matches!(report.error(), Some(ChartError::Configuration(_))));
}

#[test]
fn layer_on_unconfigured_right_axis_is_a_configuration_error() {
    let mut chart = Chart::new(NullRenderer::default());
    let plot = base_plot().with_layer(
        Layer::new("right", Geom::Point, Aes::xy("x", "y"), rows(&[(1.0, 1.0)]))
            .on_y_axis(statchart::core::YAxisSide::Right),
    );

    let report = chart.render(&plot).expect("render");

    assert!(matches!(report.error(), Some(ChartError::Configuration(_))));
}

#[test]
fn layer_without_y_mapping_is_a_contract_error() {
    let mut chart = Chart::new(NullRenderer::default());
    let aes = Aes::default().with_x(Channel::column("x"));
    let plot = base_plot().with_layer(Layer::new("partial", Geom::Point, aes, rows(&[(1.0, 1.0)])));

    let result = chart.render(&plot);

    assert!(matches!(result, Err(ChartError::InvalidData(_))));
}

#[test]
fn invalid_viewport_is_rejected() {
    let mut chart = Chart::new(NullRenderer::default());
    let plot = Plot::new(Viewport::new(0, 0));

    assert!(matches!(
        chart.render(&plot),
        Err(ChartError::InvalidViewport { .. })
    ));
}

#[test]
fn legend_lists_each_color_key_once_and_can_be_hidden() {
    let mut chart = Chart::new(NullRenderer::default());
    let data = vec![
        Row::new().with("x", 10.0).with("y", 10.0).with("series", "a"),
        Row::new().with("x", 20.0).with("y", 20.0).with("series", "b"),
        Row::new().with("x", 30.0).with("y", 30.0).with("series", "a"),
    ];
    let aes = Aes::xy("x", "y").with_color(Channel::column("series"));
    let plot = base_plot().with_layer(Layer::new("points", Geom::Point, aes, data));

    let report = chart.render(&plot).expect("render");
    assert_eq!(report.legend_entries, 2);
    assert_eq!(chart.snapshot().expect("scene").count_class("legend-entry"), 2);

    chart.render(&plot.clone().with_legend(false)).expect("render");
    assert_eq!(chart.snapshot().expect("scene").count_class("legend"), 0);
}

#[test]
fn clip_region_follows_plot_flag() {
    let mut chart = Chart::new(NullRenderer::default());
    let plot = scatter_plot(&[(10.0, 10.0)]);

    chart.render(&plot).expect("render");
    assert_eq!(chart.snapshot().expect("scene").count_class("clip-region"), 1);

    chart.render(&plot.with_clip(false)).expect("render");
    assert_eq!(chart.snapshot().expect("scene").count_class("clip-region"), 0);
}

#[test]
fn clear_empties_the_scene() {
    let mut chart = Chart::new(NullRenderer::default());
    chart.render(&scatter_plot(&[(10.0, 10.0)])).expect("render");

    chart.clear().expect("clear");

    let scene = chart.scene().expect("scene kept");
    assert_eq!(scene.len(), 1);
    assert_eq!(chart.renderer().last_node_count, 1);
}

#[test]
fn invalid_config_is_rejected_up_front() {
    let config = ChartConfig {
        x_tick_count: 0,
        ..ChartConfig::default()
    };

    assert!(Chart::with_config(NullRenderer::default(), config).is_err());
}

#[test]
fn right_axis_label_is_drawn_only_with_a_right_scale() {
    let mut chart = Chart::new(NullRenderer::default());
    let labels = PlotLabels {
        y_left: Some(PlotLabel::new("count")),
        y_right: Some(PlotLabel::new("share")),
        ..PlotLabels::default()
    };
    let plot = scatter_plot(&[(10.0, 10.0)]).with_labels(labels);

    chart.render(&plot).expect("render");
    let snapshot = chart.snapshot().expect("scene");
    assert_eq!(snapshot.count_class("label-y-left"), 1);
    assert_eq!(snapshot.count_class("label-y-right"), 0);

    let y_range = plot.y_range();
    chart
        .render(&plot.with_y_right_scale(Scale::linear((0.0, 1.0), y_range)))
        .expect("render");
    assert_eq!(chart.snapshot().expect("scene").count_class("label-y-right"), 1);
}
