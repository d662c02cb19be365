//! Engine configuration
//!
//! Every tunable of the locomotion pipeline, loadable from TOML or JSON.
//! Missing fields fall back to the values in `constants`.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::constants;
use crate::error::{EngineError, EngineResult};
use crate::physics::SlewMode;

/// Character movement tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    pub move_speed: f32,
    pub sprint_multiplier: f32,
    pub acceleration_speed: f32,
    pub deceleration_speed: f32,
    pub rotation_speed: f32,
    pub slew_mode: SlewMode,
    pub speed_deadband: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        use constants::movement::*;
        Self {
            move_speed: MOVE_SPEED,
            sprint_multiplier: SPRINT_MULTIPLIER,
            acceleration_speed: ACCELERATION_SPEED,
            deceleration_speed: DECELERATION_SPEED,
            rotation_speed: ROTATION_SPEED,
            slew_mode: SlewMode::default(),
            speed_deadband: SPEED_DEADBAND,
        }
    }
}

/// Third-person camera rig tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub follow_speed: f32,
    pub rotation_smoothing: f32,
    pub height_offset: f32,
    pub default_distance: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub min_pitch: f32,
    pub max_pitch: f32,
    pub mouse_sensitivity: f32,
    pub zoom_speed: f32,
    pub follow_smoothing_base: f32,
    pub fov_degrees: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        use constants::camera::*;
        Self {
            follow_speed: FOLLOW_SPEED,
            rotation_smoothing: ROTATION_SMOOTHING,
            height_offset: HEIGHT_OFFSET,
            default_distance: DEFAULT_DISTANCE,
            min_distance: MIN_DISTANCE,
            max_distance: MAX_DISTANCE,
            min_pitch: MIN_PITCH,
            max_pitch: MAX_PITCH,
            mouse_sensitivity: MOUSE_SENSITIVITY,
            zoom_speed: ZOOM_SPEED,
            follow_smoothing_base: FOLLOW_SMOOTHING_BASE,
            fov_degrees: FOV_DEGREES,
            znear: ZNEAR,
            zfar: ZFAR,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub smoothing_speed: f32,
    pub walk_start_speed: f32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            smoothing_speed: constants::animation::WEIGHT_SMOOTHING_SPEED,
            walk_start_speed: constants::animation::WALK_START_SPEED,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravity: Vec3,
    /// Skin width of the character controller
    pub controller_offset: f32,
    pub player_half_height: f32,
    pub player_radius: f32,
    /// Collider position relative to the entity's transform
    pub player_collider_offset: Vec3,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        use constants::physics::*;
        Self {
            gravity: Vec3::from_array(GRAVITY),
            controller_offset: CONTROLLER_OFFSET,
            player_half_height: PLAYER_HALF_HEIGHT,
            player_radius: PLAYER_RADIUS,
            player_collider_offset: Vec3::from_array(PLAYER_COLLIDER_OFFSET),
        }
    }
}

/// Where the player model and its clips come from, and how patiently
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    pub model_path: String,
    pub idle_clip: String,
    pub walk_clip: String,
    pub run_clip: String,
    pub player_scale: f32,
    pub load_timeout_ms: u64,
    pub load_retries: u32,
}

impl Default for AssetConfig {
    fn default() -> Self {
        use constants::assets::*;
        Self {
            model_path: MODEL_PATH.to_string(),
            idle_clip: IDLE_CLIP_PATH.to_string(),
            walk_clip: WALK_CLIP_PATH.to_string(),
            run_clip: RUN_CLIP_PATH.to_string(),
            player_scale: PLAYER_SCALE,
            load_timeout_ms: LOAD_TIMEOUT_MS,
            load_retries: LOAD_RETRIES,
        }
    }
}

/// Demo scene layout and viewport
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub reference_cubes: usize,
    pub scatter_extent: f32,
    pub cube_half_extent: f32,
    /// Fixed seed for a reproducible cube layout; random when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub viewport_width: u32,
    pub viewport_height: u32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        use constants::scene::*;
        Self {
            reference_cubes: REFERENCE_CUBE_COUNT,
            scatter_extent: SCATTER_EXTENT,
            cube_half_extent: CUBE_HALF_EXTENT,
            seed: None,
            viewport_width: VIEWPORT_WIDTH,
            viewport_height: VIEWPORT_HEIGHT,
        }
    }
}

/// Complete engine configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub movement: MovementConfig,
    pub camera: CameraConfig,
    pub animation: AnimationConfig,
    pub physics: PhysicsConfig,
    pub assets: AssetConfig,
    pub scene: SceneConfig,
}

/// Config file format, detected from the extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json,
}

impl ConfigFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Some(ConfigFormat::Toml),
            Some("json") => Some(ConfigFormat::Json),
            _ => None,
        }
    }
}

impl EngineConfig {
    /// Load configuration from a `.toml` or `.json` file
    pub fn from_path(path: impl AsRef<Path>) -> EngineResult<Self> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path).ok_or_else(|| EngineError::UnknownConfigFormat {
            path: path.to_path_buf(),
        })?;

        let raw = std::fs::read_to_string(path).map_err(|source| EngineError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;

        let parsed = match format {
            ConfigFormat::Toml => toml::from_str::<EngineConfig>(&raw).map_err(|e| e.to_string()),
            ConfigFormat::Json => serde_json::from_str::<EngineConfig>(&raw).map_err(|e| e.to_string()),
        };

        let config = parsed.map_err(|error| EngineError::ConfigParse {
            path: path.to_path_buf(),
            error,
        })?;
        log::info!("[CONFIG] Loaded {:?} ({:?})", path, format);
        Ok(config)
    }

    pub fn from_toml_str(raw: &str) -> EngineResult<Self> {
        toml::from_str(raw).map_err(|e| EngineError::ConfigParse {
            path: "<inline toml>".into(),
            error: e.to_string(),
        })
    }

    pub fn from_json_str(raw: &str) -> EngineResult<Self> {
        serde_json::from_str(raw).map_err(|e| EngineError::ConfigParse {
            path: "<inline json>".into(),
            error: e.to_string(),
        })
    }
}
