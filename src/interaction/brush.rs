use serde::{Deserialize, Serialize};
use tracing::trace;

/// Which axes currently hold a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum BrushState {
    #[default]
    None,
    X,
    Y,
    Both,
}

impl BrushState {
    fn from_selections(x: bool, y: bool) -> Self {
        match (x, y) {
            (false, false) => Self::None,
            (true, false) => Self::X,
            (false, true) => Self::Y,
            (true, true) => Self::Both,
        }
    }
}

/// Brush surface a gesture started on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BrushTarget {
    /// 2D surface covering the plot area.
    Main,
    /// Strip below the plot area that edits only the x selection.
    XHandle,
    /// Strip left of the plot area that edits only the y selection.
    YHandle,
}

impl BrushTarget {
    #[must_use]
    pub fn class(self) -> &'static str {
        match self {
            Self::Main => "brush",
            Self::XHandle => "brush-x-handle",
            Self::YHandle => "brush-y-handle",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BrushPhase {
    Start,
    Brush,
    End,
    Clear,
}

/// Ascending pixel interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelSpan {
    pub start: f64,
    pub end: f64,
}

impl PixelSpan {
    #[must_use]
    pub fn new(a: f64, b: f64) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    #[must_use]
    pub fn len(self) -> f64 {
        self.end - self.start
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.len() <= f64::EPSILON
    }

    #[must_use]
    pub fn contains(self, value: f64) -> bool {
        value >= self.start && value <= self.end
    }

    #[must_use]
    fn clamp_to(self, bounds: Self) -> Self {
        Self::new(
            self.start.clamp(bounds.start, bounds.end),
            self.end.clamp(bounds.start, bounds.end),
        )
    }

    /// Shifts by `delta`, stopping at the bounds without shrinking.
    #[must_use]
    fn shifted_within(self, delta: f64, bounds: Self) -> Self {
        let delta = delta.clamp(bounds.start - self.start, bounds.end - self.end);
        Self {
            start: self.start + delta,
            end: self.end + delta,
        }
    }
}

/// Pixel area the brush may select inside (the padded plot area).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BrushBounds {
    pub x: PixelSpan,
    pub y: PixelSpan,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GestureKind {
    /// Drawing a new selection from the press point.
    Select,
    /// Dragging an existing selection.
    Move,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Gesture {
    target: BrushTarget,
    kind: GestureKind,
    edits_x: bool,
    edits_y: bool,
    origin: (f64, f64),
    x_at_start: Option<PixelSpan>,
    y_at_start: Option<PixelSpan>,
}

/// Result of one brush input step, forwarded to listeners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrushTransition {
    pub phase: BrushPhase,
    pub target: BrushTarget,
    pub state: BrushState,
}

/// Pure brush state machine.
///
/// Only one x and one y selection are stored. The main extent and both
/// handle extents are derived from them, so every edit keeps all three
/// consistent within the same step.
#[derive(Debug, Clone, PartialEq)]
pub struct BrushModel {
    enable_x: bool,
    enable_y: bool,
    bounds: BrushBounds,
    x: Option<PixelSpan>,
    y: Option<PixelSpan>,
    gesture: Option<Gesture>,
}

impl BrushModel {
    #[must_use]
    pub fn new(enable_x: bool, enable_y: bool, bounds: BrushBounds) -> Self {
        Self {
            enable_x,
            enable_y,
            bounds,
            x: None,
            y: None,
            gesture: None,
        }
    }

    #[must_use]
    pub fn state(&self) -> BrushState {
        BrushState::from_selections(self.x.is_some(), self.y.is_some())
    }

    #[must_use]
    pub fn bounds(&self) -> BrushBounds {
        self.bounds
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.gesture.is_some()
    }

    #[must_use]
    pub fn x_selection(&self) -> Option<PixelSpan> {
        self.x
    }

    #[must_use]
    pub fn y_selection(&self) -> Option<PixelSpan> {
        self.y
    }

    /// Extent of the edge handle brushes.
    #[must_use]
    pub fn handle_extents(&self) -> (Option<PixelSpan>, Option<PixelSpan>) {
        (self.x, self.y)
    }

    /// Rectangle drawn by the main brush; an unselected axis spans its bounds.
    #[must_use]
    pub fn main_extent(&self) -> Option<(PixelSpan, PixelSpan)> {
        if self.state() == BrushState::None {
            return None;
        }
        Some((
            self.x.unwrap_or(self.bounds.x),
            self.y.unwrap_or(self.bounds.y),
        ))
    }

    /// Updates the enabled axes and bounds after a re-render.
    ///
    /// Selections are clamped to the new bounds; a gesture in progress keeps
    /// going. Callers remap selections through the new scales beforehand.
    pub fn reconfigure(&mut self, enable_x: bool, enable_y: bool, bounds: BrushBounds) {
        self.enable_x = enable_x;
        self.enable_y = enable_y;
        self.bounds = bounds;
        self.x = self
            .x
            .filter(|_| enable_x)
            .map(|span| span.clamp_to(bounds.x))
            .filter(|span| !span.is_empty());
        self.y = self
            .y
            .filter(|_| enable_y)
            .map(|span| span.clamp_to(bounds.y))
            .filter(|span| !span.is_empty());
    }

    /// Replaces both selections, for remapping and scripted brushes.
    pub fn set_selections(&mut self, x: Option<PixelSpan>, y: Option<PixelSpan>) {
        self.x = x
            .filter(|_| self.enable_x)
            .map(|span| span.clamp_to(self.bounds.x))
            .filter(|span| !span.is_empty());
        self.y = y
            .filter(|_| self.enable_y)
            .map(|span| span.clamp_to(self.bounds.y))
            .filter(|span| !span.is_empty());
    }

    /// Starts a gesture on `target`; `None` when that surface is disabled.
    pub fn begin(&mut self, target: BrushTarget, x: f64, y: f64) -> Option<BrushTransition> {
        let (edits_x, edits_y) = match target {
            BrushTarget::Main => (self.enable_x, self.enable_y),
            BrushTarget::XHandle => (self.enable_x, false),
            BrushTarget::YHandle => (false, self.enable_y),
        };
        if !edits_x && !edits_y {
            return None;
        }

        // The main surface only moves a selection that already covers every
        // axis it edits; otherwise a drag there widens the brush to both axes.
        let inside_selection = match target {
            BrushTarget::Main => {
                let covers_edited =
                    (!edits_x || self.x.is_some()) && (!edits_y || self.y.is_some());
                covers_edited
                    && self
                        .main_extent()
                        .is_some_and(|(sx, sy)| sx.contains(x) && sy.contains(y))
            }
            BrushTarget::XHandle => self.x.is_some_and(|span| span.contains(x)),
            BrushTarget::YHandle => self.y.is_some_and(|span| span.contains(y)),
        };
        let kind = if inside_selection {
            GestureKind::Move
        } else {
            GestureKind::Select
        };

        if kind == GestureKind::Select {
            if edits_x {
                self.x = None;
            }
            if edits_y {
                self.y = None;
            }
        }

        self.gesture = Some(Gesture {
            target,
            kind,
            edits_x,
            edits_y,
            origin: (x, y),
            x_at_start: self.x,
            y_at_start: self.y,
        });
        trace!(?target, ?kind, state = ?self.state(), "brush gesture started");
        Some(self.transition(BrushPhase::Start, target))
    }

    /// Applies pointer motion to the active gesture.
    pub fn update(&mut self, x: f64, y: f64) -> Option<BrushTransition> {
        let gesture = self.gesture?;
        match gesture.kind {
            GestureKind::Select => {
                if gesture.edits_x {
                    self.x = Some(PixelSpan::new(gesture.origin.0, x).clamp_to(self.bounds.x));
                }
                if gesture.edits_y {
                    self.y = Some(PixelSpan::new(gesture.origin.1, y).clamp_to(self.bounds.y));
                }
            }
            GestureKind::Move => {
                if gesture.edits_x {
                    self.x = gesture
                        .x_at_start
                        .map(|span| span.shifted_within(x - gesture.origin.0, self.bounds.x));
                }
                if gesture.edits_y {
                    self.y = gesture
                        .y_at_start
                        .map(|span| span.shifted_within(y - gesture.origin.1, self.bounds.y));
                }
            }
        }
        Some(self.transition(BrushPhase::Brush, gesture.target))
    }

    /// Finishes the gesture. An empty selection on any edited axis clears
    /// the whole brush and reports `BrushState::None`.
    pub fn end(&mut self, x: f64, y: f64) -> Option<BrushTransition> {
        let gesture = self.gesture?;
        self.update(x, y);
        self.gesture = None;

        let x_empty = gesture.edits_x && self.x.is_none_or(PixelSpan::is_empty);
        let y_empty = gesture.edits_y && self.y.is_none_or(PixelSpan::is_empty);
        if x_empty || y_empty {
            self.x = None;
            self.y = None;
        }
        trace!(target = ?gesture.target, state = ?self.state(), "brush gesture ended");
        Some(self.transition(BrushPhase::End, gesture.target))
    }

    /// Drops every selection and any gesture; `None` when already empty.
    pub fn clear(&mut self) -> Option<BrushTransition> {
        let had_anything = self.x.is_some() || self.y.is_some() || self.gesture.is_some();
        let target = self.gesture.map_or(BrushTarget::Main, |gesture| gesture.target);
        self.x = None;
        self.y = None;
        self.gesture = None;
        had_anything.then(|| self.transition(BrushPhase::Clear, target))
    }

    fn transition(&self, phase: BrushPhase, target: BrushTarget) -> BrushTransition {
        BrushTransition {
            phase,
            target,
            state: self.state(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{BrushBounds, BrushModel, BrushPhase, BrushState, BrushTarget, PixelSpan};

    fn model() -> BrushModel {
        BrushModel::new(
            true,
            true,
            BrushBounds {
                x: PixelSpan::new(0.0, 100.0),
                y: PixelSpan::new(0.0, 50.0),
            },
        )
    }

    #[test]
    fn x_handle_then_y_handle_reaches_both() {
        let mut brush = model();
        brush.begin(BrushTarget::XHandle, 10.0, 0.0);
        brush.update(30.0, 0.0);
        let end = brush.end(40.0, 0.0).expect("gesture active");
        assert_eq!(end.state, BrushState::X);
        assert_eq!(brush.x_selection(), Some(PixelSpan::new(10.0, 40.0)));

        brush.begin(BrushTarget::YHandle, 0.0, 5.0);
        brush.end(0.0, 20.0);
        assert_eq!(brush.state(), BrushState::Both);
        assert_eq!(brush.handle_extents().0, Some(PixelSpan::new(10.0, 40.0)));
    }

    #[test]
    fn click_without_drag_clears_everything() {
        let mut brush = model();
        brush.begin(BrushTarget::XHandle, 10.0, 0.0);
        brush.end(60.0, 0.0);
        brush.begin(BrushTarget::Main, 80.0, 10.0);
        let end = brush.end(80.0, 10.0).expect("gesture active");
        assert_eq!(end.phase, BrushPhase::End);
        assert_eq!(end.state, BrushState::None);
        assert_eq!(brush.handle_extents(), (None, None));
    }

    #[test]
    fn main_extent_follows_handle_edits() {
        let mut brush = model();
        brush.begin(BrushTarget::XHandle, 20.0, 0.0);
        brush.update(60.0, 0.0);
        let (x, y) = brush.main_extent().expect("selection");
        assert_eq!(x, PixelSpan::new(20.0, 60.0));
        assert_eq!(y, PixelSpan::new(0.0, 50.0));
    }

    #[test]
    fn dragging_inside_selection_moves_it_within_bounds() {
        let mut brush = model();
        brush.begin(BrushTarget::XHandle, 20.0, 0.0);
        brush.end(40.0, 0.0);
        brush.begin(BrushTarget::XHandle, 30.0, 0.0);
        brush.end(130.0, 0.0);
        assert_eq!(brush.x_selection(), Some(PixelSpan::new(80.0, 100.0)));
    }

    #[test]
    fn main_drag_inside_x_column_selects_both_axes() {
        let mut brush = model();
        brush.begin(BrushTarget::XHandle, 20.0, 0.0);
        brush.end(60.0, 0.0);
        brush.begin(BrushTarget::Main, 30.0, 10.0);
        brush.end(50.0, 30.0);
        assert_eq!(brush.state(), BrushState::Both);
        assert_eq!(brush.x_selection(), Some(PixelSpan::new(30.0, 50.0)));
        assert_eq!(brush.y_selection(), Some(PixelSpan::new(10.0, 30.0)));

        brush.begin(BrushTarget::Main, 40.0, 20.0);
        brush.end(45.0, 25.0);
        assert_eq!(brush.x_selection(), Some(PixelSpan::new(35.0, 55.0)));
    }

    #[test]
    fn disabled_axis_ignores_its_handle() {
        let mut brush = BrushModel::new(true, false, model().bounds());
        assert!(brush.begin(BrushTarget::YHandle, 0.0, 10.0).is_none());
        brush.begin(BrushTarget::Main, 10.0, 10.0);
        brush.end(30.0, 40.0);
        assert_eq!(brush.state(), BrushState::X);
    }
}
