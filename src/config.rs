use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::SceneError;

/// Full scene configuration. Every field has a default, so a config file
/// only needs to name what it overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub terrain: TerrainConfig,
    pub camera: CameraConfig,
    pub registry: RegistryConfig,
    pub day_cycle: DayCycleConfig,
    pub snow: SnowConfig,
    pub flight: FlightConfig,
    pub window: WindowConfig,
    pub assets: AssetConfig,
}

impl SceneConfig {
    /// Load config from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&text)
    }

    /// Parse config from JSON text
    pub fn from_json(text: &str) -> Result<Self, SceneError> {
        Ok(serde_json::from_str(text)?)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    pub width: usize,
    pub height: usize,
    pub roughness: f32,
    pub scale_xz: f32,
    pub scale_y: f32,
    pub seed: u64,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            width: 1025,
            height: 1025,
            roughness: 0.6,
            scale_xz: 100.0,
            scale_y: 10.0,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Yaw rate in radians per second
    pub turn_rate: f32,
    /// Walking speed in world units per second
    pub step_speed: f32,
    /// Eye height above the terrain
    pub eye_height: f32,
    /// How far below the origin's altitude the water line sits
    pub water_drop: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            turn_rate: std::f32::consts::PI,
            step_speed: 15.0,
            eye_height: 2.0,
            water_drop: 3.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    pub capacity: usize,
    pub half_width: f32,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            capacity: 15,
            half_width: 2.5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DayCycleConfig {
    pub step_increment: u32,
    pub lap_window: (u32, u32),
    pub dim_start_lap: u32,
    pub floor_lap: u32,
    pub brighten_after_lap: u32,
    pub reset_lap: u32,
    pub snow_after_lap: u32,
    pub channel_step: f32,
    pub day_start: f32,
    pub day_floor: f32,
    pub night_start: f32,
    pub night_floor: f32,
    pub initial_clear_color: [f32; 4],
}

impl Default for DayCycleConfig {
    fn default() -> Self {
        Self {
            step_increment: 3,
            lap_window: (10, 1000),
            dim_start_lap: 45,
            floor_lap: 140,
            brighten_after_lap: 160,
            reset_lap: 200,
            snow_after_lap: 50,
            channel_step: 0.02,
            day_start: 0.4,
            day_floor: 0.02,
            night_start: 0.5,
            night_floor: 0.12,
            initial_clear_color: [0.0, 0.4, 0.9, 0.0],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SnowConfig {
    pub count: usize,
    pub floor: f32,
    pub respawn_height: f32,
    pub half_extent: i32,
    pub max_start_height: i32,
    pub seed: u64,
}

impl Default for SnowConfig {
    fn default() -> Self {
        Self {
            count: 1000,
            floor: -20.0,
            respawn_height: 80.0,
            half_extent: 100,
            max_start_height: 100,
            seed: 7,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightConfig {
    pub center: [f32; 3],
    pub radius: f32,
    /// Radians per second; the angle decreases over time
    pub angular_speed: f32,
}

impl Default for FlightConfig {
    fn default() -> Self {
        Self {
            center: [10.0, 2.5, -10.0],
            radius: 10.0,
            angular_speed: 0.5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            title: "Snowfield".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    pub model: Option<PathBuf>,
    pub clouds_texture: PathBuf,
    pub terrain_gradient: PathBuf,
    pub plasma_texture: PathBuf,
    pub sun_gradient: PathBuf,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            model: Some(PathBuf::from("models/fish/fish.gltf")),
            clouds_texture: PathBuf::from("images/nuages.jpg"),
            terrain_gradient: PathBuf::from("images/neige.png"),
            plasma_texture: PathBuf::from("images/plasma.png"),
            sun_gradient: PathBuf::from("images/yellowred.png"),
        }
    }
}
