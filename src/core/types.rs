use std::fmt;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

/// Label of the synthetic bucket that collects merged small categories.
pub const OTHER_KEY: &str = "Other";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// Distances around the plot area, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Insets {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Insets {
    #[must_use]
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        [self.top, self.right, self.bottom, self.left]
            .iter()
            .all(|side| side.is_finite() && *side >= 0.0)
    }
}

impl std::ops::Add for Insets {
    type Output = Insets;

    fn add(self, rhs: Insets) -> Insets {
        Insets {
            top: self.top + rhs.top,
            right: self.right + rhs.right,
            bottom: self.bottom + rhs.bottom,
            left: self.left + rhs.left,
        }
    }
}

/// Pointer position in the control's pixel space (origin at the top-left).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerPosition {
    pub x: f64,
    pub y: f64,
}

impl PointerPosition {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One dataset cell, also used as a category key.
///
/// Numbers are wrapped in `OrderedFloat` so values can be hashed and sorted
/// when they act as categories. Serialized untagged, so JSON numbers and
/// strings map onto the two data variants directly. `Other` is the merged
/// bucket; it never comes from a dataset, so a text cell spelled "Other" stays
/// a regular category.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Number(OrderedFloat<f64>),
    Text(String),
    #[serde(skip_deserializing)]
    Other,
}

impl Value {
    #[must_use]
    pub fn number(value: f64) -> Self {
        Self::Number(OrderedFloat(value))
    }

    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    #[must_use]
    pub fn other() -> Self {
        Self::Other
    }

    #[must_use]
    pub fn is_other(&self) -> bool {
        matches!(self, Self::Other)
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(value.0),
            Self::Text(_) | Self::Other => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{}", value.0),
            Self::Text(text) => f.write_str(text),
            Self::Other => f.write_str(OTHER_KEY),
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::number(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::text(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}
