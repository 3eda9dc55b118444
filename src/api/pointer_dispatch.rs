use tracing::trace;

use crate::core::{PointerHandler, RowPointerEvent};
use crate::error::ChartResult;
use crate::interaction::{BrushTarget, BrushTransition, PointerEvent};
use crate::render::{NodeDatum, NodeId, Renderer};

use super::{Chart, LabelClickEvent};

/// Which slot of a glyph's handlers to invoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowHandlerSlot {
    Click,
    Hover,
    Mouseout,
}

impl<R: Renderer> Chart<R> {
    /// Starts a brush gesture when the press lands on a brush surface.
    ///
    /// Returns whether the event was consumed.
    pub fn pointer_down(&mut self, x: f64, y: f64) -> ChartResult<bool> {
        let pointer = PointerEvent::down(x, y);
        if !pointer.is_finite() {
            return Ok(false);
        }
        let Some(target) = self.brush_target_at(x, y) else {
            return Ok(false);
        };
        let transition = self.brush.begin(target, x, y);
        self.after_brush_step(transition, Some(pointer))
    }

    /// Drives an active brush gesture, otherwise dispatches hover handlers.
    pub fn pointer_move(&mut self, x: f64, y: f64) -> ChartResult<bool> {
        let pointer = PointerEvent::moved(x, y);
        if !pointer.is_finite() {
            return Ok(false);
        }
        if self.brush.is_active() {
            let transition = self.brush.update(x, y);
            return self.after_brush_step(transition, Some(pointer));
        }

        let hit = self.row_node_at(x, y);
        if hit == self.hovered {
            return Ok(hit.is_some());
        }
        if let Some(previous) = self.hovered.take() {
            self.dispatch_row_handler(previous, RowHandlerSlot::Mouseout, pointer);
        }
        if let Some(current) = hit {
            self.dispatch_row_handler(current, RowHandlerSlot::Hover, pointer);
        }
        self.hovered = hit;
        Ok(true)
    }

    /// Finishes an active brush gesture.
    pub fn pointer_up(&mut self, x: f64, y: f64) -> ChartResult<bool> {
        let pointer = PointerEvent::up(x, y);
        if !pointer.is_finite() || !self.brush.is_active() {
            return Ok(false);
        }
        let transition = self.brush.end(x, y);
        self.after_brush_step(transition, Some(pointer))
    }

    /// Routes a click to a label overlay or a glyph click handler.
    pub fn click(&mut self, x: f64, y: f64) -> ChartResult<bool> {
        let pointer = PointerEvent::click(x, y);
        if !pointer.is_finite() {
            return Ok(false);
        }
        let Some(scene) = self.scene.as_ref() else {
            return Ok(false);
        };
        let label_hit = scene.hit_test_matching(x, y, |node| {
            matches!(node.datum, NodeDatum::Label(_))
        });
        if let Some(NodeDatum::Label(target)) =
            label_hit.and_then(|id| scene.node(id)).map(|node| node.datum)
        {
            trace!(?target, "label clicked");
            if let Some(listener) = self.listener.as_mut() {
                listener.on_label_click(&LabelClickEvent { target, pointer });
            }
            return Ok(true);
        }

        match self.row_node_at(x, y) {
            Some(id) => Ok(self.dispatch_row_handler(id, RowHandlerSlot::Click, pointer)),
            None => Ok(false),
        }
    }

    /// Clears every brush selection and notifies the listener.
    pub fn clear_brush(&mut self) -> ChartResult<()> {
        let transition = self.brush.clear();
        self.after_brush_step(transition, None).map(|_| ())
    }

    /// Runs a full gesture on `target` from `from` to `to`.
    pub(super) fn drive_brush(
        &mut self,
        target: BrushTarget,
        from: (f64, f64),
        to: (f64, f64),
    ) -> ChartResult<bool> {
        let started = self.brush.begin(target, from.0, from.1);
        if started.is_none() {
            return Ok(false);
        }
        self.after_brush_step(started, Some(PointerEvent::down(from.0, from.1)))?;
        let moved = self.brush.update(to.0, to.1);
        self.after_brush_step(moved, Some(PointerEvent::moved(to.0, to.1)))?;
        let ended = self.brush.end(to.0, to.1);
        self.after_brush_step(ended, Some(PointerEvent::up(to.0, to.1)))
    }

    fn brush_target_at(&self, x: f64, y: f64) -> Option<BrushTarget> {
        let scene = self.scene.as_ref()?;
        let id = scene.hit_test_matching(x, y, |node| matches!(node.datum, NodeDatum::Brush(_)))?;
        match scene.node(id)?.datum {
            NodeDatum::Brush(target) => Some(target),
            _ => None,
        }
    }

    fn row_node_at(&self, x: f64, y: f64) -> Option<NodeId> {
        let scene = self.scene.as_ref()?;
        scene.hit_test_matching(x, y, |node| matches!(node.datum, NodeDatum::Row { .. }))
    }

    /// Emits the brush event, then redraws the brush and re-renders.
    fn after_brush_step(
        &mut self,
        transition: Option<BrushTransition>,
        pointer: Option<PointerEvent>,
    ) -> ChartResult<bool> {
        let Some(transition) = transition else {
            return Ok(false);
        };
        let event = self.brush.event(transition, pointer, self.last_plot.as_ref());
        if let Some(listener) = self.listener.as_mut() {
            listener.on_brush(&event);
        }
        // An error message owns the scene until the next successful render.
        if let (Some(scene), Some(_)) = (self.scene.as_mut(), self.last_plot.as_ref()) {
            self.brush.draw(scene, &self.config);
            self.renderer.render(scene)?;
        }
        Ok(true)
    }

    /// Invokes one handler of the glyph `id`; `false` when the slot is unset.
    fn dispatch_row_handler(
        &self,
        id: NodeId,
        slot: RowHandlerSlot,
        pointer: PointerEvent,
    ) -> bool {
        let Some(node) = self.scene.as_ref().and_then(|scene| scene.node(id)) else {
            return false;
        };
        let NodeDatum::Row { layer, row } = node.datum else {
            return false;
        };
        let handler: Option<&PointerHandler> = match slot {
            RowHandlerSlot::Click => node.handlers.on_click.as_ref(),
            RowHandlerSlot::Hover => node.handlers.on_hover.as_ref(),
            RowHandlerSlot::Mouseout => node.handlers.on_mouseout.as_ref(),
        };
        let Some(handler) = handler else {
            return false;
        };
        let Some(plot_layer) = self.last_plot.as_ref().and_then(|plot| plot.layers.get(layer))
        else {
            return false;
        };
        let Some(data_row) = plot_layer.data.get(row) else {
            return false;
        };
        handler(&RowPointerEvent {
            pointer,
            layer_index: layer,
            layer_name: plot_layer.name.clone(),
            row_index: row,
            row: data_row.clone(),
        });
        true
    }
}
