use tracing::{debug, error, warn};

use crate::core::{Plot, Scale};
use crate::error::ChartResult;
use crate::render::{NodeId, Renderer, Scene, TextMeasurer};

use super::axis_renderer::{AxisLayout, AxisOrientation, AxisSpec, render_axis};
use super::clip_region::update_clip_region;
use super::label_renderer::render_labels;
use super::layer_renderer::render_layers;
use super::legend_renderer::render_legend;
use super::message_renderer::{ERROR_CLASS, render_error_message, update_warning_banner};
use super::plot_validation::{check_plot_contract, validate_plot};
use super::{Chart, ChartConfig, RenderReport, RenderStatus};

pub(super) const AXES_CLASS: &str = "axes";

pub(super) struct RenderCoordinator;

impl RenderCoordinator {
    pub(super) fn render<R: Renderer>(chart: &mut Chart<R>, plot: &Plot) -> ChartResult<RenderReport> {
        chart.config.validate()?;
        check_plot_contract(plot, chart.listener.is_some())?;

        let Chart {
            renderer,
            config,
            palette,
            scene,
            brush,
            rng,
            measurer,
            hovered,
            last_plot,
            ..
        } = chart;

        let scene = scene.get_or_insert_with(|| Scene::new(plot.viewport));
        scene.resize(plot.viewport);

        let diagnostics = match validate_plot(plot) {
            Ok(diagnostics) => diagnostics,
            Err(err) if err.is_presentable() => {
                error!(error = %err, "chart replaced by error message");
                render_error_message(scene, plot.viewport, &err, config);
                renderer.render(scene)?;
                *hovered = None;
                *last_plot = None;
                return Ok(RenderReport {
                    status: RenderStatus::Failed(err),
                    empty_layers: Vec::new(),
                    node_count: scene.len(),
                    legend_entries: 0,
                    bottom_labels_rotated: false,
                });
            }
            Err(err) => return Err(err),
        };

        let root = scene.root();
        scene.remove_child(root, ERROR_CLASS);

        let clip = update_clip_region(scene, plot.grid, config.clip_margin_px, plot.clip);
        let bottom = render_axes(scene, plot, config, &**measurer);
        render_labels(scene, plot, config, &**measurer);
        let legend_items = render_layers(scene, plot, palette, clip, rng);
        let legend_entries = render_legend(scene, &legend_items, plot, config, &**measurer);

        brush.configure(plot, config);
        brush.draw(scene, config);

        if !diagnostics.empty_layers.is_empty() {
            warn!(layers = ?diagnostics.empty_layers, "layers without drawable rows");
        }
        update_warning_banner(scene, plot.grid, &diagnostics.empty_layers, config);

        renderer.render(scene)?;
        debug!(
            nodes = scene.len(),
            layers = plot.layers.len(),
            legend_entries,
            labels_rotated = bottom.labels_rotated,
            "chart rendered"
        );

        let report = RenderReport {
            status: RenderStatus::Rendered,
            empty_layers: diagnostics.empty_layers,
            node_count: scene.len(),
            legend_entries,
            bottom_labels_rotated: bottom.labels_rotated,
        };
        *last_plot = Some(plot.clone());
        Ok(report)
    }
}

/// Draws the bottom axis and whichever vertical axes have a scale.
fn render_axes(
    scene: &mut Scene,
    plot: &Plot,
    config: &ChartConfig,
    measurer: &dyn TextMeasurer,
) -> AxisLayout {
    let root = scene.root();
    let axes = scene.ensure_group(root, AXES_CLASS);
    let mut bottom = AxisLayout::default();
    for (orientation, scale) in [
        (AxisOrientation::Bottom, plot.scales.x.as_ref()),
        (AxisOrientation::Left, plot.scales.y_left.as_ref()),
        (AxisOrientation::Right, plot.scales.y_right.as_ref()),
    ] {
        let layout = draw_or_remove_axis(scene, axes, orientation, scale, plot, config, measurer);
        if orientation == AxisOrientation::Bottom {
            bottom = layout;
        }
    }
    bottom
}

fn draw_or_remove_axis(
    scene: &mut Scene,
    axes: NodeId,
    orientation: AxisOrientation,
    scale: Option<&Scale>,
    plot: &Plot,
    config: &ChartConfig,
    measurer: &dyn TextMeasurer,
) -> AxisLayout {
    match scale {
        Some(scale) => {
            let spec = AxisSpec::from_config(orientation, config);
            render_axis(scene, axes, scale, &spec, plot.grid, measurer)
        }
        None => {
            scene.remove_child(axes, orientation.class());
            AxisLayout::default()
        }
    }
}
