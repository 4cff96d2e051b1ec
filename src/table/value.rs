use std::fmt;

/// The raw value a column resolves to for one row.
///
/// Search runs against these values, never against rendered output.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Empty,
    Text(String),
    Integer(i64),
    Decimal(f64),
    Flag(bool),
    /// A nested record reduced to its display name (e.g. the agent of an inquiry).
    Reference(String),
}

impl FieldValue {
    /// Lower-cased text used for search matching.
    ///
    /// Returns `None` for values that must never match a non-empty term.
    pub fn search_text(&self) -> Option<String> {
        match self {
            Self::Empty => None,
            Self::Text(s) | Self::Reference(s) if s.trim().is_empty() => None,
            other => Some(other.display().to_lowercase()),
        }
    }

    /// Text shown in a cell when the column has no custom renderer.
    pub fn display(&self) -> String {
        self.to_string()
    }

    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Text(s) | Self::Reference(s) => f.write_str(s),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Decimal(n) => write!(f, "{n}"),
            Self::Flag(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&String> for FieldValue {
    fn from(value: &String) -> Self {
        Self::Text(value.clone())
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Decimal(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

impl<T: Into<Self>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Empty, Into::into)
    }
}
