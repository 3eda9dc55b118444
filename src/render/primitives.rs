use std::f64::consts::PI;
use std::fmt::Write as _;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::{ChartError, ChartResult};

/// RGBA color in normalized 0..=1 channel values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const TRANSPARENT: Self = Self::rgba(0.0, 0.0, 0.0, 0.0);

    #[must_use]
    pub const fn rgba(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    #[must_use]
    pub const fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::rgba(red, green, blue, 1.0)
    }

    /// Parses any CSS color notation (`#4e79a7`, `steelblue`, `rgb(...)`, `hsl(...)`).
    pub fn parse(css: &str) -> ChartResult<Self> {
        let parsed = csscolorparser::parse(css)
            .map_err(|err| ChartError::InvalidData(format!("invalid color `{css}`: {err}")))?;
        Ok(Self::rgba(
            f64::from(parsed.r),
            f64::from(parsed.g),
            f64::from(parsed.b),
            f64::from(parsed.a),
        ))
    }

    #[must_use]
    pub fn with_alpha(self, alpha: f64) -> Self {
        Self { alpha, ..self }
    }

    /// `#rrggbb`, alpha is emitted separately as an opacity attribute.
    #[must_use]
    pub fn to_css_hex(self) -> String {
        let channel = |value: f64| (value.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "#{:02x}{:02x}{:02x}",
            channel(self.red),
            channel(self.green),
            channel(self.blue)
        )
    }

    pub fn validate(self) -> ChartResult<()> {
        for (channel, value) in [
            ("red", self.red),
            ("green", self.green),
            ("blue", self.blue),
            ("alpha", self.alpha),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ChartError::InvalidData(format!(
                    "color channel `{channel}` must be finite and in [0, 1]"
                )));
            }
        }
        Ok(())
    }
}

/// Anchor of a text node relative to its `x` coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TextAnchor {
    #[default]
    Start,
    Middle,
    End,
}

impl TextAnchor {
    #[must_use]
    pub fn as_svg(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Middle => "middle",
            Self::End => "end",
        }
    }
}

/// Vertical alignment of a text node relative to its `y` coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TextBaseline {
    #[default]
    Alphabetic,
    Middle,
    Hanging,
}

impl TextBaseline {
    #[must_use]
    pub fn as_svg(self) -> &'static str {
        match self {
            Self::Alphabetic => "alphabetic",
            Self::Middle => "central",
            Self::Hanging => "hanging",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PathCommand {
    MoveTo(f64, f64),
    LineTo(f64, f64),
    /// Circular arc to the end point with the given radius.
    ArcTo { radius: f64, x: f64, y: f64 },
    Close,
}

/// Vector path in pixel space.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PathData {
    commands: SmallVec<[PathCommand; 8]>,
}

impl PathData {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Straight segment between two points.
    #[must_use]
    pub fn segment(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        let mut path = Self::new();
        path.move_to(x1, y1);
        path.line_to(x2, y2);
        path
    }

    /// Connects the points in order.
    #[must_use]
    pub fn polyline(points: impl IntoIterator<Item = (f64, f64)>) -> Self {
        let mut path = Self::new();
        for (index, (x, y)) in points.into_iter().enumerate() {
            if index == 0 {
                path.move_to(x, y);
            } else {
                path.line_to(x, y);
            }
        }
        path
    }

    pub fn move_to(&mut self, x: f64, y: f64) {
        self.commands.push(PathCommand::MoveTo(x, y));
    }

    pub fn line_to(&mut self, x: f64, y: f64) {
        self.commands.push(PathCommand::LineTo(x, y));
    }

    pub fn arc_to(&mut self, radius: f64, x: f64, y: f64) {
        self.commands.push(PathCommand::ArcTo { radius, x, y });
    }

    pub fn close(&mut self) {
        self.commands.push(PathCommand::Close);
    }

    /// Copy with every point offset by `(dx, dy)`.
    #[must_use]
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        let commands = self
            .commands
            .iter()
            .map(|command| match *command {
                PathCommand::MoveTo(x, y) => PathCommand::MoveTo(x + dx, y + dy),
                PathCommand::LineTo(x, y) => PathCommand::LineTo(x + dx, y + dy),
                PathCommand::ArcTo { radius, x, y } => PathCommand::ArcTo {
                    radius,
                    x: x + dx,
                    y: y + dy,
                },
                PathCommand::Close => PathCommand::Close,
            })
            .collect();
        Self { commands }
    }

    #[must_use]
    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// SVG `d` attribute text; empty for an empty path.
    #[must_use]
    pub fn to_svg(&self) -> String {
        let mut out = String::new();
        for command in &self.commands {
            if !out.is_empty() {
                out.push(' ');
            }
            let _ = match *command {
                PathCommand::MoveTo(x, y) => write!(out, "M{},{}", fmt_coord(x), fmt_coord(y)),
                PathCommand::LineTo(x, y) => write!(out, "L{},{}", fmt_coord(x), fmt_coord(y)),
                PathCommand::ArcTo { radius, x, y } => write!(
                    out,
                    "A{r},{r} 0 0,1 {},{}",
                    fmt_coord(x),
                    fmt_coord(y),
                    r = fmt_coord(radius)
                ),
                PathCommand::Close => write!(out, "Z"),
            };
        }
        out
    }

    pub fn validate(&self) -> ChartResult<()> {
        for command in &self.commands {
            let finite = match *command {
                PathCommand::MoveTo(x, y) | PathCommand::LineTo(x, y) => {
                    x.is_finite() && y.is_finite()
                }
                PathCommand::ArcTo { radius, x, y } => {
                    radius.is_finite() && x.is_finite() && y.is_finite()
                }
                PathCommand::Close => true,
            };
            if !finite {
                return Err(ChartError::InvalidData(
                    "path coordinates must be finite".to_owned(),
                ));
            }
        }
        Ok(())
    }
}

/// Rounds to 3 decimals so serialized scenes stay compact and stable.
pub(crate) fn fmt_coord(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    if rounded == 0.0 {
        "0".to_owned()
    } else {
        format!("{rounded}")
    }
}

/// Glyph drawn for point-like marks and legend entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ShapeKind {
    #[default]
    Circle,
    Square,
    Triangle,
    Diamond,
    Cross,
}

impl ShapeKind {
    pub const ALL: [Self; 5] = [
        Self::Circle,
        Self::Square,
        Self::Triangle,
        Self::Diamond,
        Self::Cross,
    ];

    /// Glyph centred on the origin whose area is roughly `area` px².
    #[must_use]
    pub fn path(self, area: f64) -> PathData {
        let area = if area.is_finite() && area > 0.0 { area } else { 64.0 };
        let mut path = PathData::new();
        match self {
            Self::Circle => {
                let r = (area / PI).sqrt();
                path.move_to(r, 0.0);
                path.arc_to(r, -r, 0.0);
                path.arc_to(r, r, 0.0);
                path.close();
            }
            Self::Square => {
                let h = area.sqrt() / 2.0;
                path.move_to(-h, -h);
                path.line_to(h, -h);
                path.line_to(h, h);
                path.line_to(-h, h);
                path.close();
            }
            Self::Triangle => {
                let side = (area / (3f64.sqrt() / 4.0)).sqrt();
                let height = side * 3f64.sqrt() / 2.0;
                path.move_to(0.0, -height * 2.0 / 3.0);
                path.line_to(side / 2.0, height / 3.0);
                path.line_to(-side / 2.0, height / 3.0);
                path.close();
            }
            Self::Diamond => {
                let h = (area / 2.0).sqrt();
                path.move_to(0.0, -h);
                path.line_to(h, 0.0);
                path.line_to(0.0, h);
                path.line_to(-h, 0.0);
                path.close();
            }
            Self::Cross => {
                let arm = (area / 5.0).sqrt();
                let h = arm / 2.0;
                let o = h * 3.0;
                path = PathData::polyline([
                    (-o, -h),
                    (-h, -h),
                    (-h, -o),
                    (h, -o),
                    (h, -h),
                    (o, -h),
                    (o, h),
                    (h, h),
                    (h, o),
                    (-h, o),
                    (-h, h),
                    (-o, h),
                ]);
                path.close();
            }
        }
        path
    }

    /// Radius of the circle enclosing a glyph of the given area, used for hit tests.
    #[must_use]
    pub fn hit_radius(self, area: f64) -> f64 {
        let area = if area.is_finite() && area > 0.0 { area } else { 64.0 };
        match self {
            Self::Circle => (area / PI).sqrt(),
            Self::Square => area.sqrt() / 2.0 * 2f64.sqrt(),
            Self::Triangle => (area / (3f64.sqrt() / 4.0)).sqrt() / 3f64.sqrt(),
            Self::Diamond => (area / 2.0).sqrt(),
            Self::Cross => (area / 5.0).sqrt() * 1.5 * 2f64.sqrt(),
        }
    }
}
