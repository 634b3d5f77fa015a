//! Color handling for Tapeloom diagrams
//!
//! Head colors are part of the diagram only: the automaton model never sees
//! them. The [`Color`] type wraps `DynamicColor` from the color crate so it
//! can be parsed from CSS strings, used as a registry value and written into
//! SVG attributes.

use std::{
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
};

use color::DynamicColor;
use serde::Deserialize;

/// A CSS color used to tell the heads of a machine apart.
///
/// Equality and hashing go through the CSS serialization, so two colors
/// parsed from different spellings of the same value compare equal only if
/// the color crate serializes them identically.
///
/// Deserializes from a CSS color string.
#[derive(Clone, Copy, PartialEq, Debug, Deserialize)]
#[serde(try_from = "String")]
pub struct Color {
    color: DynamicColor,
}

impl Eq for Color {}

impl Hash for Color {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_string().hash(state);
    }
}

impl Color {
    /// Parses a CSS color string such as `"#ff0000"`, `"rgb(255, 0, 0)"` or
    /// `"crimson"`.
    ///
    /// # Examples
    ///
    /// ```
    /// use tapeloom_core::color::Color;
    ///
    /// let head = Color::new("cadetblue").unwrap();
    /// assert!(Color::new("not-a-color").is_err());
    /// # let _ = head;
    /// ```
    pub fn new(color_str: &str) -> Result<Self, String> {
        DynamicColor::from_str(color_str)
            .map(|color| Self { color })
            .map_err(|err| format!("invalid color `{color_str}`: {err}"))
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::new("black").expect("'black' is a valid CSS color")
    }
}

impl FromStr for Color {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
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

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_color_parse() {
        assert!(Color::new("#ff0000").is_ok());
        assert!(Color::new("blueviolet").is_ok());
        assert!("darkgray".parse::<Color>().is_ok());

        let err = Color::new("nope").unwrap_err();
        assert!(err.contains("nope"));
    }

    #[test]
    fn test_color_default_is_black() {
        assert_eq!(Color::default().to_string(), "black");
    }

    #[test]
    fn test_color_eq_hash() {
        let red1 = Color::new("red").unwrap();
        let red2 = Color::new("red").unwrap();
        let blue = Color::new("blue").unwrap();

        assert_eq!(red1, red2);
        assert_ne!(red1, blue);

        let mut set = HashSet::new();
        set.insert(red1);
        assert!(set.contains(&red2));
        assert!(!set.contains(&blue));
    }
}
