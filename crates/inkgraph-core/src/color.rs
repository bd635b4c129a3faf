//! Overlay colours.
//!
//! [`Color`] wraps `DynamicColor` from the color crate so overlay styles can
//! be written as CSS colour strings and passed straight to SVG attributes.

use std::{fmt, str::FromStr};

use color::DynamicColor;

/// A CSS colour, such as `"#ff0000"`, `"rgb(255, 0, 0)"` or `"red"`.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Color {
    color: DynamicColor,
}

impl Color {
    /// Parses a CSS colour string.
    ///
    /// # Examples
    ///
    /// ```
    /// use inkgraph_core::color::Color;
    ///
    /// let red = Color::new("#ff0000").unwrap();
    /// assert!(Color::new("not-a-color").is_err());
    /// ```
    pub fn new(color_str: &str) -> Result<Self, String> {
        DynamicColor::from_str(color_str)
            .map(|color| Self { color })
            .map_err(|err| format!("invalid color `{color_str}`: {err}"))
    }

}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.color)
    }
}

impl From<&Color> for svg::node::Value {
    fn from(color: &Color) -> Self {
        Self::from(color.to_string())
    }
}
