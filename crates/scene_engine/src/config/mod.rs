//! Configuration system

pub use serde::{Serialize, Deserialize};

use crate::render::ProjectionType;

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(ConfigError::Io)?;

        Self::from_str_with_format(&contents, path)
    }

    /// Parse configuration text, picking the format from the path extension
    fn from_str_with_format(contents: &str, path: &str) -> Result<Self, ConfigError> {
        if path.ends_with(".toml") {
            toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Settings used to build a [`crate::render::ViewEnvironment`]
///
/// Missing fields fall back to the defaults of a fresh view environment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Perspective or orthographic projection
    pub projection: ProjectionType,
    /// Vertical field of view in degrees
    pub field_of_view: f64,
    /// Near clip plane distance
    pub near_clip: f64,
    /// Far clip plane distance
    pub far_clip: f64,
    /// Width / height; values `<= 0` derive the ratio from the viewport
    pub aspect_ratio: f64,
    /// Render this view in stereo
    pub stereo: bool,
    /// Orthographic planes as `[left, right, bottom, top]`
    pub ortho_params: [f64; 4],
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            projection: ProjectionType::Perspective,
            field_of_view: 45.0,
            near_clip: 0.01,
            far_clip: 1000.0,
            aspect_ratio: 0.0,
            stereo: false,
            ortho_params: [-1.0, 1.0, -1.0, 1.0],
        }
    }
}

impl Config for ViewConfig {}
