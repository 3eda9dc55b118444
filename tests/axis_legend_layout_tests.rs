use approx::assert_relative_eq;
use statchart::api::{
    AxisOrientation, AxisSpec, Chart, ChartConfig, LegendItem, LegendLayoutParams, labels_collide,
    layout_legend, render_axis,
};
use statchart::core::{Aes, BoundingBox, Geom, Layer, Plot, PlotGrid, Row, Scale, Viewport};
use statchart::render::{
    ApproxTextMeasurer, Color, NodeKind, NullRenderer, Scene, ShapeKind, TextAnchor, TextMeasurer,
};

/// Every glyph is ten pixels wide regardless of font size.
struct FixedWidthMeasurer;

impl TextMeasurer for FixedWidthMeasurer {
    fn text_width(&self, text: &str, _font_size_px: f64) -> f64 {
        text.chars().count() as f64 * 10.0
    }
}

fn category_plot(width: u32) -> Plot {
    let categories: Vec<String> = (1..=5).map(|index| format!("category-{index}")).collect();
    let plot = Plot::new(Viewport::new(width, 400));
    let x_range = plot.x_range();
    let y_range = plot.y_range();
    let data = categories
        .iter()
        .map(|category| Row::new().with("x", category.as_str()).with("y", 1.0))
        .collect();
    plot.with_x_scale(Scale::discrete(categories.clone(), x_range))
        .with_y_left_scale(Scale::linear((0.0, 2.0), y_range))
        .with_layer(Layer::new("counts", Geom::Point, Aes::xy("x", "y"), data))
}

fn rotated_bottom_labels(chart: &Chart<NullRenderer>) -> usize {
    chart
        .scene()
        .expect("scene")
        .nodes_with_class("tick-label")
        .iter()
        .filter(|node| {
            matches!(
                node.kind,
                NodeKind::Text { rotate, anchor: TextAnchor::Start, .. } if rotate == 15.0
            )
        })
        .count()
}

fn item(label: &str) -> LegendItem {
    LegendItem {
        layer_name: "layer".to_owned(),
        key: label.to_owned(),
        label: label.to_owned(),
        color: Color::BLACK,
        shape: ShapeKind::Circle,
        line: false,
    }
}

fn legend_params() -> LegendLayoutParams {
    LegendLayoutParams {
        x: 0.0,
        start_y: 0.0,
        entry_spacing: 20.0,
        gap: 4.0,
        max_width: 100.0,
        font_size: 10.0,
        glyph_size: 64.0,
    }
}

#[test]
fn adjacent_boxes_collide_when_touching() {
    let apart = [
        BoundingBox::new(0.0, 0.0, 10.0, 5.0),
        BoundingBox::new(20.0, 0.0, 10.0, 5.0),
    ];
    let touching = [
        BoundingBox::new(10.0, 0.0, 10.0, 5.0),
        BoundingBox::new(0.0, 0.0, 10.0, 5.0),
    ];

    assert!(!labels_collide(&apart));
    assert!(labels_collide(&touching));
    assert!(!labels_collide(&[]));
}

#[test]
fn wide_axis_keeps_bottom_labels_horizontal() {
    let mut chart = Chart::new(NullRenderer::default());

    let report = chart.render(&category_plot(1020)).expect("render");

    assert!(!report.bottom_labels_rotated);
    assert_eq!(rotated_bottom_labels(&chart), 0);
}

#[test]
fn shrinking_the_axis_rotates_all_bottom_labels() {
    let mut chart = Chart::new(NullRenderer::default());
    chart.render(&category_plot(1020)).expect("wide render");

    let report = chart.render(&category_plot(320)).expect("narrow render");

    assert!(report.bottom_labels_rotated);
    assert_eq!(rotated_bottom_labels(&chart), 5);

    let report = chart.render(&category_plot(1020)).expect("wide again");
    assert!(!report.bottom_labels_rotated);
    assert_eq!(rotated_bottom_labels(&chart), 0);
}

#[test]
fn render_axis_reconciles_ticks_by_key() {
    let viewport = Viewport::new(400, 300);
    let grid = PlotGrid::new(50.0, 350.0, 20.0, 250.0);
    let config = ChartConfig::default();
    let spec = AxisSpec::from_config(AxisOrientation::Left, &config);
    let mut scene = Scene::new(viewport);
    let root = scene.root();

    let scale = Scale::linear((0.0, 10.0), (250.0, 20.0));
    let layout = render_axis(&mut scene, root, &scale, &spec, grid, &ApproxTextMeasurer);
    let first_ids: Vec<_> = scene
        .nodes_with_class("tick")
        .iter()
        .map(|node| node.id)
        .collect();

    render_axis(&mut scene, root, &scale, &spec, grid, &ApproxTextMeasurer);
    let second_ids: Vec<_> = scene
        .nodes_with_class("tick")
        .iter()
        .map(|node| node.id)
        .collect();

    assert!(!layout.labels_rotated);
    assert_eq!(layout.tick_count, first_ids.len());
    assert_eq!(first_ids, second_ids);
    assert_eq!(scene.count_class("axis-border"), 1);
}

#[test]
fn overlapping_legend_entry_is_pushed_down_by_overlap_plus_gap() {
    let params = legend_params();
    let measurer = FixedWidthMeasurer;
    let line_height = measurer.line_height(params.font_size);

    let entries = layout_legend(&[item("aaaa bbbb cccc"), item("z")], params, &measurer);

    assert_eq!(entries[0].lines, vec!["aaaa", "bbbb", "cccc"]);
    assert_relative_eq!(entries[0].height, 36.0);
    // Default position 20 overlaps the three-line entry above by 16.
    assert_relative_eq!(entries[1].y, 20.0 + 16.0 + params.gap);
    assert_relative_eq!(
        entries[1].top(line_height) - entries[0].bottom(line_height),
        params.gap
    );
}

#[test]
fn push_down_cascades_in_a_single_forward_pass() {
    let params = legend_params();
    let measurer = FixedWidthMeasurer;
    let line_height = measurer.line_height(params.font_size);

    let entries = layout_legend(
        &[item("aaaa bbbb cccc"), item("y"), item("z")],
        params,
        &measurer,
    );

    for pair in entries.windows(2) {
        assert!(pair[1].top(line_height) >= pair[0].bottom(line_height) + params.gap - 1e-9);
    }
    assert_relative_eq!(entries[2].y, 56.0);
}

#[test]
fn short_entries_keep_their_default_spacing() {
    let params = legend_params();

    let entries = layout_legend(&[item("a"), item("b"), item("c")], params, &FixedWidthMeasurer);

    let ys: Vec<f64> = entries.iter().map(|entry| entry.y).collect();
    assert_eq!(ys, vec![0.0, 20.0, 40.0]);
}
