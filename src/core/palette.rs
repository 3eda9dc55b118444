use indexmap::IndexMap;

use crate::render::{Color, ShapeKind};

/// D3 category10, the default categorical palette.
pub const CATEGORY10: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

#[must_use]
pub fn default_palette() -> Vec<Color> {
    CATEGORY10
        .iter()
        .filter_map(|hex| Color::parse(hex).ok())
        .collect()
}

/// Discrete key to color mapping.
///
/// Keys outside the explicit domain cycle through the palette in first-seen
/// order so data-driven series never render without a color.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorScale {
    domain: IndexMap<String, usize>,
    palette: Vec<Color>,
}

impl Default for ColorScale {
    fn default() -> Self {
        Self::new(Vec::<String>::new())
    }
}

impl ColorScale {
    #[must_use]
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_palette(keys, default_palette())
    }

    #[must_use]
    pub fn with_palette<I, S>(keys: I, palette: Vec<Color>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut scale = Self {
            domain: IndexMap::new(),
            palette: if palette.is_empty() {
                vec![Color::BLACK]
            } else {
                palette
            },
        };
        for key in keys {
            scale.register(&key.into());
        }
        scale
    }

    /// Adds `key` to the domain when unseen and returns its slot.
    pub fn register(&mut self, key: &str) -> usize {
        let next = self.domain.len();
        *self.domain.entry(key.to_owned()).or_insert(next)
    }

    #[must_use]
    pub fn color(&self, key: &str) -> Color {
        let slot = self
            .domain
            .get(key)
            .copied()
            .unwrap_or(self.domain.len());
        self.palette[slot % self.palette.len()]
    }

    /// Color for `key`, extending the domain when the key is new.
    pub fn resolve(&mut self, key: &str) -> Color {
        let slot = self.register(key);
        self.palette[slot % self.palette.len()]
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.domain.keys().map(String::as_str)
    }
}

/// Discrete key to glyph mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeScale {
    domain: IndexMap<String, usize>,
    shapes: Vec<ShapeKind>,
}

impl Default for ShapeScale {
    fn default() -> Self {
        Self::new(Vec::<String>::new())
    }
}

impl ShapeScale {
    #[must_use]
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut scale = Self {
            domain: IndexMap::new(),
            shapes: ShapeKind::ALL.to_vec(),
        };
        for key in keys {
            scale.register(&key.into());
        }
        scale
    }

    pub fn register(&mut self, key: &str) -> usize {
        let next = self.domain.len();
        *self.domain.entry(key.to_owned()).or_insert(next)
    }

    pub fn resolve(&mut self, key: &str) -> ShapeKind {
        let slot = self.register(key);
        self.shapes[slot % self.shapes.len()]
    }

    #[must_use]
    pub fn shape(&self, key: &str) -> ShapeKind {
        let slot = self
            .domain
            .get(key)
            .copied()
            .unwrap_or(self.domain.len());
        self.shapes[slot % self.shapes.len()]
    }
}
