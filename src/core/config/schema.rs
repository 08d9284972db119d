//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Validation
//!
//! Config values are validated after parsing: the default lattice must be
//! registered and the SVG settings must describe a drawable canvas.

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::core::lattice::LatticeRegistry;
use crate::package::svg::RenderStyle;

/// User configuration.
///
/// # Example
///
/// ```toml
/// default_lattice = "G2"
///
/// [svg]
/// size = 256
/// stroke = "#202020"
/// background = "white"
/// start_marker = false
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct QbcConfig {
    /// Lattice used when no `--lattice` is given
    pub default_lattice: Option<String>,

    /// SVG rendering overrides
    pub svg: Option<SvgConfig>,
}

impl QbcConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self, registry: &LatticeRegistry) -> Result<(), ConfigError> {
        if let Some(key) = &self.default_lattice {
            if !registry.contains(key) {
                let known: Vec<&str> = registry.keys().map(|k| k.as_str()).collect();
                return Err(ConfigError::InvalidValue(format!(
                    "unknown default_lattice '{}', must be one of: {}",
                    key,
                    known.join(", ")
                )));
            }
        }

        if let Some(svg) = &self.svg {
            svg.render_style()
                .validate()
                .map_err(|e| ConfigError::InvalidValue(format!("[svg] {e}")))?;
        }

        Ok(())
    }
}

/// `[svg]` table. Unset fields keep the [`RenderStyle`] defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SvgConfig {
    pub size: Option<u32>,
    pub padding: Option<f64>,
    pub stroke: Option<String>,
    pub stroke_width: Option<f64>,
    pub tick_length: Option<f64>,
    pub background: Option<String>,
    pub start_marker: Option<bool>,
}

impl SvgConfig {
    /// Overlay these settings on the default style.
    pub fn render_style(&self) -> RenderStyle {
        let defaults = RenderStyle::default();
        RenderStyle {
            size: self.size.unwrap_or(defaults.size),
            padding: self.padding.unwrap_or(defaults.padding),
            stroke: self.stroke.clone().unwrap_or(defaults.stroke),
            stroke_width: self.stroke_width.unwrap_or(defaults.stroke_width),
            tick_length: self.tick_length.unwrap_or(defaults.tick_length),
            background: self.background.clone().or(defaults.background),
            start_marker: self.start_marker.unwrap_or(defaults.start_marker),
        }
    }

    /// Every field set, from a full style.
    pub fn from_style(style: &RenderStyle) -> Self {
        Self {
            size: Some(style.size),
            padding: Some(style.padding),
            stroke: Some(style.stroke.clone()),
            stroke_width: Some(style.stroke_width),
            tick_length: Some(style.tick_length),
            background: style.background.clone(),
            start_marker: Some(style.start_marker),
        }
    }
}
