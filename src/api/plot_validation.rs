use crate::core::{Geom, Layer, Plot, ScaleType, YAxisSide};
use crate::error::{ChartError, ChartResult};

/// Non-fatal findings of a successful validation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(super) struct PlotDiagnostics {
    /// Names of layers with no row that projects to a finite position.
    pub empty_layers: Vec<String>,
}

/// Checks that can only fail through a programming mistake in the caller.
pub(super) fn check_plot_contract(plot: &Plot, has_listener: bool) -> ChartResult<()> {
    plot.viewport.validate()?;
    if plot.brush.is_some() && !has_listener {
        return Err(ChartError::MissingCallback(
            "brushing is configured but no event listener is registered".to_owned(),
        ));
    }
    if plot.labels.any_clickable() && !has_listener {
        return Err(ChartError::MissingCallback(
            "clickable labels are configured but no event listener is registered".to_owned(),
        ));
    }
    for layer in &plot.layers {
        check_layer_aes(layer)?;
    }
    Ok(())
}

fn check_layer_aes(layer: &Layer) -> ChartResult<()> {
    if layer.aes.x.is_none() || layer.aes.y.is_none() {
        return Err(ChartError::InvalidData(format!(
            "layer `{}` must map both `x` and `y`",
            layer.name
        )));
    }
    if layer.geom == Geom::ErrorBar && layer.aes.y_error.is_none() {
        return Err(ChartError::InvalidData(format!(
            "error-bar layer `{}` must map `y_error`",
            layer.name
        )));
    }
    Ok(())
}

/// Validates scales and geometry. Errors are rendered in place of the chart.
pub(super) fn validate_plot(plot: &Plot) -> Result<PlotDiagnostics, ChartError> {
    plot.grid
        .validate()
        .map_err(|err| ChartError::Configuration(format!("invalid plot area: {err}")))?;

    let x_scale = plot
        .scales
        .x
        .as_ref()
        .ok_or_else(|| ChartError::Configuration("missing x scale".to_owned()))?;
    x_scale
        .validate()
        .map_err(|err| ChartError::Configuration(format!("x scale: {err}")))?;
    for (name, scale) in [
        ("left y", plot.scales.y_left.as_ref()),
        ("right y", plot.scales.y_right.as_ref()),
    ] {
        if let Some(scale) = scale {
            scale
                .validate()
                .map_err(|err| ChartError::Configuration(format!("{name} scale: {err}")))?;
        }
    }

    let mut diagnostics = PlotDiagnostics::default();
    for layer in &plot.layers {
        let Some(y_scale) = plot.scales.y_for(layer.y_axis) else {
            let side = match layer.y_axis {
                YAxisSide::Left => "left",
                YAxisSide::Right => "right",
            };
            return Err(ChartError::Configuration(format!(
                "layer `{}` uses the {side} y axis but no {side} y scale is configured",
                layer.name
            )));
        };
        if layer.geom == Geom::BoxPlot && x_scale.scale_type() != ScaleType::Discrete {
            return Err(ChartError::UnsupportedGeometry(format!(
                "box plot `{}` requires a discrete x scale",
                layer.name
            )));
        }

        let has_finite_row = layer.data.iter().any(|row| {
            x_scale.map(&layer.aes.x_value(row)).is_some()
                && y_scale.map(&layer.aes.y_value(row)).is_some()
        });
        if !has_finite_row {
            diagnostics.empty_layers.push(layer.name.clone());
        }
    }

    if !plot.layers.is_empty() && diagnostics.empty_layers.len() == plot.layers.len() {
        return Err(ChartError::Configuration(format!(
            "no finite data to draw in: {}",
            diagnostics.empty_layers.join(", ")
        )));
    }
    Ok(diagnostics)
}
