//! Engine settings with persistence
//!
//! Settings are saved to `~/.config/polaris/settings.toml`

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// All engine settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub ecs: EcsSettings,
    pub camera: CameraSettings,
    pub demo: DemoSettings,
}

/// ECS sizing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EcsSettings {
    /// Fixed bound on simultaneously alive entities
    pub max_entities: usize,
}

impl Default for EcsSettings {
    fn default() -> Self {
        Self { max_entities: 4096 }
    }
}

/// Default camera parameters for new scenes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    pub aspect: f32,
    pub orbit_distance: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            fov_degrees: 60.0,
            aspect: 16.0 / 9.0,
            orbit_distance: 6.0,
        }
    }
}

/// Headless demo loop parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoSettings {
    /// Number of frames to simulate
    pub frames: u32,
    /// Fixed timestep in seconds
    pub timestep: f32,
}

impl Default for DemoSettings {
    fn default() -> Self {
        Self {
            frames: 240,
            timestep: 1.0 / 60.0,
        }
    }
}

impl EngineSettings {
    fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("polaris"))
    }

    fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("settings.toml"))
    }

    /// Load settings from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else {
            warn!("Could not determine config directory");
            return Self::default();
        };

        if !path.exists() {
            info!("No settings file found, writing defaults");
            let settings = Self::default();
            if let Err(e) = settings.save() {
                warn!("Failed to save default settings: {}", e);
            }
            return settings;
        }

        match fs::read_to_string(&path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(settings) => {
                    info!("Loaded settings from {:?}", path);
                    settings
                }
                Err(e) => {
                    warn!("Failed to parse settings: {}, using defaults", e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read settings file: {}, using defaults", e);
                Self::default()
            }
        }
    }

    /// Save settings to disk
    pub fn save(&self) -> anyhow::Result<()> {
        let Some(dir) = Self::config_dir() else {
            anyhow::bail!("could not determine config directory");
        };
        fs::create_dir_all(&dir)?;
        let path = dir.join("settings.toml");
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        info!("Saved settings to {:?}", path);
        Ok(())
    }
}
