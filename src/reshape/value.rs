use chrono::NaiveDateTime;
use std::fmt::Display;

/// A single cell as read from or written to a spreadsheet.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Boolean(bool),
    DateTime(NaiveDateTime),
}

/// Cells of one row, identified by position.
pub type Row = Vec<Value>;

impl Value {
    /// The text of a `Text` cell; every other variant has none.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Empty => write!(f, "nan"),
            Value::Text(text) => write!(f, "{}", text),
            Value::Number(number) => write!(f, "{}", number),
            Value::Boolean(true) => write!(f, "True"),
            Value::Boolean(false) => write!(f, "False"),
            Value::DateTime(datetime) => write!(f, "{}", datetime.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::Text(text.to_owned())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::Text(text)
    }
}

impl From<Option<String>> for Value {
    fn from(text: Option<String>) -> Self {
        text.map_or(Value::Empty, Value::Text)
    }
}
