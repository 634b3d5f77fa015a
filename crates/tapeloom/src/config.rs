//! Configuration types for the Tapeloom editor.
//!
//! All types implement [`serde::Deserialize`] and fall back to defaults for
//! every missing field, so a configuration file only needs to mention what
//! it changes.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining geometry and style settings.
//! - [`GeometryConfig`] - Grid pitch and curve shape constants.
//! - [`StyleConfig`] - Background color and the head color palette.
//!
//! # Example
//!
//! ```
//! # use tapeloom::config::AppConfig;
//! let config: AppConfig = toml::from_str("[geometry]\ngrid_pitch = 20.0").unwrap();
//! assert_eq!(config.geometry().grid_pitch(), 20.0);
//! assert_eq!(config.geometry().node_radius(), 25.0);
//! ```

use serde::Deserialize;

use tapeloom_core::{color::Color, curve::CurveStyle};

use crate::diagram::{DEFAULT_GRID_PITCH, DEFAULT_HEAD_PALETTE, Diagram};

/// Top-level application configuration combining geometry and style settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Geometry configuration section.
    #[serde(default)]
    geometry: GeometryConfig,

    /// Style configuration section.
    #[serde(default)]
    style: StyleConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] with the specified geometry and style configurations.
    pub fn new(geometry: GeometryConfig, style: StyleConfig) -> Self {
        Self { geometry, style }
    }

    /// Returns the geometry configuration.
    pub fn geometry(&self) -> &GeometryConfig {
        &self.geometry
    }

    /// Returns the style configuration.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    /// Builds an empty [`Diagram`] using this configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a palette entry is not a valid color.
    pub fn diagram(&self) -> Result<Diagram, String> {
        Ok(Diagram::new(
            self.geometry.curve_style(),
            self.geometry.grid_pitch,
            self.style.head_palette()?,
        ))
    }
}

/// Grid and curve constants. Angles are given in degrees.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeometryConfig {
    grid_pitch: f32,
    node_radius: f32,
    bow_ratio: f32,
    loop_angle_degrees: f32,
    loop_distance_ratio: f32,
    arrow_size: f32,
    arrow_angle_degrees: f32,
    label_margin: f32,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        let style = CurveStyle::default();
        Self {
            grid_pitch: DEFAULT_GRID_PITCH,
            node_radius: style.node_radius(),
            bow_ratio: style.bow_ratio(),
            loop_angle_degrees: style.loop_angle().to_degrees(),
            loop_distance_ratio: style.loop_distance_ratio(),
            arrow_size: style.arrow_size(),
            arrow_angle_degrees: style.arrow_angle().to_degrees(),
            label_margin: style.label_margin(),
        }
    }
}

impl GeometryConfig {
    /// Returns the snapping pitch. Zero or negative disables snapping.
    pub fn grid_pitch(&self) -> f32 {
        self.grid_pitch
    }

    pub fn node_radius(&self) -> f32 {
        self.node_radius
    }

    /// Converts to the core [`CurveStyle`].
    pub fn curve_style(&self) -> CurveStyle {
        CurveStyle::default()
            .with_node_radius(self.node_radius)
            .with_bow_ratio(self.bow_ratio)
            .with_loop_angle(self.loop_angle_degrees.to_radians())
            .with_loop_distance_ratio(self.loop_distance_ratio)
            .with_arrow_size(self.arrow_size)
            .with_arrow_angle(self.arrow_angle_degrees.to_radians())
            .with_label_margin(self.label_margin)
    }
}

/// Visual styling configuration.
///
/// Colors are kept as strings and parsed on access so a bad value is
/// reported with its context.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct StyleConfig {
    /// Background [`Color`] of exported diagrams, as a color string.
    #[serde(default)]
    background_color: Option<String>,

    /// Colors given, in order, to heads created without one.
    #[serde(default)]
    head_palette: Option<Vec<String>>,
}

impl StyleConfig {
    /// Returns the parsed background [`Color`], or `None` if no color is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed
    /// into a valid [`Color`].
    pub fn background_color(&self) -> Result<Option<Color>, String> {
        self.background_color
            .as_ref()
            .map(|color| Color::new(color))
            .transpose()
            .map_err(|err| format!("Invalid background color in config: {err}"))
    }

    /// Returns the parsed head palette, or the built-in one when none is
    /// configured.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first entry that is not a valid color.
    pub fn head_palette(&self) -> Result<Vec<Color>, String> {
        match &self.head_palette {
            Some(names) => names
                .iter()
                .map(|name| Color::new(name))
                .collect::<Result<Vec<_>, _>>()
                .map_err(|err| format!("Invalid head palette in config: {err}")),
            None => DEFAULT_HEAD_PALETTE
                .iter()
                .map(|name| Color::new(name))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_defaults_match_curve_style() {
        let config = AppConfig::default();
        let style = config.geometry().curve_style();
        let defaults = CurveStyle::default();

        assert_eq!(config.geometry().grid_pitch(), 10.0);
        assert_approx_eq!(f32, style.loop_angle(), defaults.loop_angle(), epsilon = 1e-6);
        assert_approx_eq!(f32, style.arrow_angle(), defaults.arrow_angle(), epsilon = 1e-6);
        assert_eq!(style.node_radius(), 25.0);
        assert_eq!(config.style().head_palette().unwrap().len(), 9);
        assert_eq!(config.style().background_color(), Ok(None));
    }

    #[test]
    fn test_partial_toml() {
        let config: AppConfig = toml::from_str(
            r#"
            [geometry]
            node_radius = 30.0
            arrow_angle_degrees = 20.0

            [style]
            background_color = "white"
            head_palette = ["teal", "orange"]
            "#,
        )
        .unwrap();

        assert_eq!(config.geometry().node_radius(), 30.0);
        assert_eq!(config.geometry().grid_pitch(), 10.0);
        assert_approx_eq!(
            f32,
            config.geometry().curve_style().arrow_angle(),
            20f32.to_radians()
        );
        assert_eq!(
            config.style().head_palette().unwrap(),
            [Color::new("teal").unwrap(), Color::new("orange").unwrap()]
        );
        assert!(config.style().background_color().unwrap().is_some());
    }

    #[test]
    fn test_invalid_palette_entry() {
        let config: AppConfig =
            toml::from_str("[style]\nhead_palette = [\"blue\", \"nope\"]").unwrap();
        let err = config.style().head_palette().unwrap_err();
        assert!(err.contains("nope"));
        assert!(config.diagram().is_err());
    }
}
