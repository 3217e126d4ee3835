//! Gauge configuration.
//!
//! [`GaugeConfig`] can be put together in code with its generated builder or
//! read from a TOML file; every key is optional and falls back to the same
//! default the builder uses.
//!
//! ```toml
//! min_value = 0.0
//! max_value = 8000.0
//! start_degree = 150
//! end_degree = 390
//! ticks = [0.0, 0.25, 0.5, 0.75, 1.0]
//! unit = "rpm"
//! easing = "ease_in_out"
//!
//! [[sections]]
//! start_offset = 0.0
//! end_offset = 0.8
//! color = "#2e7d32"
//!
//! [[sections]]
//! start_offset = 0.8
//! end_offset = 1.0
//! color = "#c62828"
//! cap = "round"
//! ```

use bon::Builder;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::animation::{Easing, DEFAULT_DURATION_MS};
use crate::error::ConfigError;
use crate::geometry::StrokeCap;
use crate::section::{default_sections, Section};

/// Color representation for gauge elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::new(0xff, 0xff, 0xff);
    pub const BLACK: Color = Color::new(0x00, 0x00, 0x00);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` (the `#` is optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        Some(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::from_hex(&value).ok_or_else(|| format!("invalid color {value:?}, expected #rrggbb"))
    }
}

/// Which decoration is drawn under the ticks and the needle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialStyle {
    /// Every section painted as its own arc.
    #[default]
    SpeedView,
    /// A grey track with a bar that grows with the value and takes the color
    /// of the section the value is in.
    Tube,
}

#[derive(Debug, Clone, Builder, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GaugeConfig {
    #[builder(default = "Speedometer".to_string())]
    pub title: String,

    // Range
    #[builder(default = 0.0)]
    pub min_value: f64,
    #[builder(default = 100.0)]
    pub max_value: f64,
    #[builder(default = 135)]
    pub start_degree: i32,
    #[builder(default = 405)]
    pub end_degree: i32,
    /// Value shown before the first target arrives. Defaults to `min_value`.
    pub value: Option<f64>,

    // Animation
    #[builder(default = DEFAULT_DURATION_MS)]
    pub animation_duration_ms: i64,
    #[builder(default)]
    pub easing: Easing,

    // Dial
    #[builder(default)]
    pub style: DialStyle,
    #[builder(default = default_sections())]
    pub sections: Vec<Section>,
    #[builder(default = 40.0)]
    pub bar_width: f64,
    #[builder(default)]
    pub bar_cap: StrokeCap,
    #[builder(default = Color::new(0x75, 0x75, 0x75))]
    pub track_color: Color,
    #[builder(default = Color::WHITE)]
    pub background_color: Color,
    #[builder(default = 10)]
    pub margin: i32,

    // Ticks
    #[builder(default = vec![0.0, 1.0])]
    pub ticks: Vec<f64>,
    #[builder(default = true)]
    pub tick_rotate: bool,
    #[builder(default = 30.0)]
    pub tick_padding: f64,
    #[builder(default = 14.0)]
    pub tick_font_size: f32,

    // Marks
    #[builder(default = 8)]
    pub marks_count: usize,
    #[builder(default = 0.0)]
    pub marks_padding: f64,
    #[builder(default = 3.0)]
    pub marks_width: f64,
    #[builder(default = 9.0)]
    pub marks_height: f64,
    #[builder(default)]
    pub marks_cap: StrokeCap,
    #[builder(default = Color::BLACK)]
    pub marks_color: Color,

    // Needle
    #[builder(default = Color::new(0x21, 0x96, 0xf3))]
    pub needle_color: Color,
    #[builder(default = 6.0)]
    pub needle_width: f32,
    #[builder(default = 0.85)]
    pub needle_length_factor: f64,
    #[builder(default = 8)]
    pub dot_radius: i32,

    // Text
    #[builder(default = "Km/h".to_string())]
    pub unit: String,
    #[builder(default = 32.0)]
    pub speed_font_size: f32,
    #[builder(default = 16.0)]
    pub unit_font_size: f32,
    #[builder(default = Color::BLACK)]
    pub text_color: Color,
    /// TrueType/OpenType font for every label. Without one no text is drawn.
    pub font_path: Option<PathBuf>,

    // Window
    #[builder(default = 300)]
    pub window_width: usize,
    #[builder(default = 300)]
    pub window_height: usize,
    #[builder(default = 60.0)]
    pub max_framerate: f64,
}

impl Default for GaugeConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl GaugeConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }
}

/// Load a [`GaugeConfig`] from a TOML file.
pub fn load_config(path: impl AsRef<Path>) -> Result<GaugeConfig, ConfigError> {
    let path = path.as_ref();
    match std::fs::read_to_string(path) {
        Ok(contents) => match GaugeConfig::from_toml_str(&contents) {
            Ok(config) => {
                tracing::info!("Loaded gauge configuration from {}", path.display());
                Ok(config)
            }
            Err(e) => {
                tracing::error!("Failed to parse gauge config {}: {}", path.display(), e);
                Err(e)
            }
        },
        Err(e) => {
            tracing::error!("Failed to read gauge config {}: {}", path.display(), e);
            Err(ConfigError::Io(e))
        }
    }
}
