use std::fmt;
use std::sync::Arc;

use crate::core::{Row, Value};

pub type ChannelFn = Arc<dyn Fn(&Row) -> Value + Send + Sync>;

/// Pure function from a row to one visual channel value.
#[derive(Clone)]
pub struct Channel {
    label: String,
    func: ChannelFn,
}

impl fmt::Debug for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Channel").field(&self.label).finish()
    }
}

impl Channel {
    /// Reads one column; missing columns evaluate to `Value::Null`.
    #[must_use]
    pub fn column(name: impl Into<String>) -> Self {
        let name = name.into();
        let column = name.clone();
        Self {
            label: name,
            func: Arc::new(move |row: &Row| row.get(&column).clone()),
        }
    }

    #[must_use]
    pub fn from_fn(
        label: impl Into<String>,
        func: impl Fn(&Row) -> Value + Send + Sync + 'static,
    ) -> Self {
        Self {
            label: label.into(),
            func: Arc::new(func),
        }
    }

    #[must_use]
    pub fn constant(value: impl Into<Value>) -> Self {
        let value = value.into();
        Self {
            label: format!("{value:?}"),
            func: Arc::new(move |_| value.clone()),
        }
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn eval(&self, row: &Row) -> Value {
        (self.func)(row)
    }
}

/// Aesthetic mapping of a layer: row to visual channels.
#[derive(Debug, Clone, Default)]
pub struct Aes {
    pub x: Option<Channel>,
    pub y: Option<Channel>,
    /// Symmetric error around `y`, used by error bars.
    pub y_error: Option<Channel>,
    pub color: Option<Channel>,
    pub shape: Option<Channel>,
    /// Glyph area in px².
    pub size: Option<Channel>,
    pub group: Option<Channel>,
    pub hover_text: Option<Channel>,
}

impl Aes {
    /// Column-backed `x`/`y` mapping.
    #[must_use]
    pub fn xy(x: impl Into<String>, y: impl Into<String>) -> Self {
        Self {
            x: Some(Channel::column(x)),
            y: Some(Channel::column(y)),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_x(mut self, channel: Channel) -> Self {
        self.x = Some(channel);
        self
    }

    #[must_use]
    pub fn with_y(mut self, channel: Channel) -> Self {
        self.y = Some(channel);
        self
    }

    #[must_use]
    pub fn with_y_error(mut self, channel: Channel) -> Self {
        self.y_error = Some(channel);
        self
    }

    #[must_use]
    pub fn with_color(mut self, channel: Channel) -> Self {
        self.color = Some(channel);
        self
    }

    #[must_use]
    pub fn with_shape(mut self, channel: Channel) -> Self {
        self.shape = Some(channel);
        self
    }

    #[must_use]
    pub fn with_size(mut self, channel: Channel) -> Self {
        self.size = Some(channel);
        self
    }

    #[must_use]
    pub fn with_group(mut self, channel: Channel) -> Self {
        self.group = Some(channel);
        self
    }

    #[must_use]
    pub fn with_hover_text(mut self, channel: Channel) -> Self {
        self.hover_text = Some(channel);
        self
    }

    #[must_use]
    pub fn x_value(&self, row: &Row) -> Value {
        eval_or_null(self.x.as_ref(), row)
    }

    #[must_use]
    pub fn y_value(&self, row: &Row) -> Value {
        eval_or_null(self.y.as_ref(), row)
    }

    #[must_use]
    pub fn color_key(&self, row: &Row) -> Option<String> {
        self.color.as_ref()?.eval(row).key()
    }

    #[must_use]
    pub fn shape_key(&self, row: &Row) -> Option<String> {
        self.shape.as_ref()?.eval(row).key()
    }

    #[must_use]
    pub fn group_key(&self, row: &Row) -> Option<String> {
        self.group.as_ref()?.eval(row).key()
    }
}

fn eval_or_null(channel: Option<&Channel>, row: &Row) -> Value {
    channel.map_or(Value::Null, |channel| channel.eval(row))
}

#[cfg(test)]
mod tests {
    use super::{Aes, Channel};
    use crate::core::{Row, Value};

    #[test]
    fn column_channel_reads_cells() {
        let row = Row::new().with("a", 2.0).with("g", "left");
        let aes = Aes::xy("a", "missing").with_color(Channel::column("g"));
        assert_eq!(aes.x_value(&row), Value::Number(2.0));
        assert_eq!(aes.y_value(&row), Value::Null);
        assert_eq!(aes.color_key(&row).as_deref(), Some("left"));
    }

    #[test]
    fn derived_channel_runs_the_closure() {
        let doubled = Channel::from_fn("2a", |row| {
            row.get("a").as_number().map(|v| v * 2.0).into()
        });
        let row = Row::new().with("a", 3.0);
        assert_eq!(doubled.eval(&row), Value::Number(6.0));
        assert_eq!(doubled.eval(&Row::new()), Value::Null);
    }
}
