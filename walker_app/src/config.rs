//! Walker configuration

use scene_engine::config::{Config, ViewConfig};
use serde::{Deserialize, Serialize};

/// Settings for the scene walker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalkerConfig {
    /// Fallback log filter when `RUST_LOG` is unset
    pub log_level: String,
    /// Number of cull passes to run over the demo scene
    pub passes: u32,
    /// Clear the shared-node memory between passes
    pub reset_between_passes: bool,
    /// Main view settings
    pub view: ViewConfig,
    /// Main viewport size in pixels
    pub window_size: [i32; 2],
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            passes: 2,
            reset_between_passes: true,
            view: ViewConfig::default(),
            window_size: [1280, 720],
        }
    }
}

impl Config for WalkerConfig {}
