//! Engine startup options.
//!
//! Besides building [`EngineConfig`] in code, it can be parsed from a string
//! of whitespace-separated `key=value` pairs:
//!
//! ```text
//! title=tanks width=800 height=600 vsync=false clear_color=0,0,0.2,1
//! ```
//!
//! Keys not given keep their defaults; the empty string is the default config.

use std::str::FromStr;

use thiserror::Error;

use crate::color::{Color, ColorError};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("expected key=value, found {0:?}")]
    MissingEquals(String),
    #[error("unknown config key {0:?}")]
    UnknownKey(String),
    #[error("invalid value {value:?} for {key}")]
    InvalidValue { key: &'static str, value: String },
    #[error("window size must be non-zero, got {width}x{height}")]
    ZeroSize { width: u32, height: u32 },
    #[error("invalid clear color: {0}")]
    Color(#[from] ColorError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
    pub clear_color: Color,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            title: "eng2d".to_string(),
            width: 640,
            height: 480,
            vsync: true,
            clear_color: Color::TRANSPARENT,
        }
    }
}

impl EngineConfig {
    /// Width over height, for aspect-correcting transforms.
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::ZeroSize {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}

fn parse_value<T: FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: value.to_string(),
    })
}

fn parse_color(value: &str) -> Result<Color, ConfigError> {
    let channels = value
        .split(',')
        .map(|c| parse_value::<f32>("clear_color", c.trim()))
        .collect::<Result<Vec<_>, _>>()?;
    match channels[..] {
        [r, g, b, a] => Ok(Color::new(r, g, b, a)?),
        _ => Err(ConfigError::InvalidValue {
            key: "clear_color",
            value: value.to_string(),
        }),
    }
}

impl FromStr for EngineConfig {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut config = EngineConfig::default();
        for pair in s.split_whitespace() {
            let (key, value) = pair
                .split_once('=')
                .ok_or_else(|| ConfigError::MissingEquals(pair.to_string()))?;
            match key {
                "title" => config.title = value.to_string(),
                "width" => config.width = parse_value("width", value)?,
                "height" => config.height = parse_value("height", value)?,
                "vsync" => config.vsync = parse_value("vsync", value)?,
                "clear_color" => config.clear_color = parse_color(value)?,
                other => return Err(ConfigError::UnknownKey(other.to_string())),
            }
        }
        config.validate()?;
        Ok(config)
    }
}
