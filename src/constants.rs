// Stride Engine Constants - SINGLE SOURCE OF TRUTH
//
// This file contains the default tuning values for the locomotion pipeline.
// Config structs take their `Default` values from here.
//
// Do NOT scatter tuning literals through the systems; add them here.

/// Character movement tuning
pub mod movement {
    /// Walking speed (units per second)
    pub const MOVE_SPEED: f32 = 1.5;
    pub const SPRINT_MULTIPLIER: f32 = 4.0;

    /// Speed change rates (units per second squared)
    pub const ACCELERATION_SPEED: f32 = 15.0;
    pub const DECELERATION_SPEED: f32 = 10.0;

    /// How fast the character turns to face its movement direction
    pub const ROTATION_SPEED: f32 = 5.0;

    /// Below this speed velocity is forced to exactly zero
    pub const SPEED_DEADBAND: f32 = 0.01;
}

/// Locomotion blend tuning
pub mod animation {
    /// Speed at which walk starts blending in over idle
    pub const WALK_START_SPEED: f32 = 0.1;

    /// Weight smoothing rate (per second, linear approximation)
    pub const WEIGHT_SMOOTHING_SPEED: f32 = 5.0;

    /// Clip names used as keys in the action map
    pub const IDLE_CLIP: &str = "idle";
    pub const WALK_CLIP: &str = "walk";
    pub const RUN_CLIP: &str = "run";
}

/// Device input translation
pub mod input {
    /// Pixels scrolled per wheel line, matching browser wheel deltas
    pub const WHEEL_LINE_PIXELS: f32 = 100.0;
}

/// Third-person camera rig tuning
pub mod camera {
    pub const FOLLOW_SPEED: f32 = 3.0;
    pub const ROTATION_SMOOTHING: f32 = 1.0;
    pub const HEIGHT_OFFSET: f32 = 1.5;

    /// Camera distance along the pitch node's local Z axis
    pub const DEFAULT_DISTANCE: f32 = 5.0;
    pub const MIN_DISTANCE: f32 = 0.0;
    pub const MAX_DISTANCE: f32 = 10.0;

    /// Pitch limits (radians)
    pub const MIN_PITCH: f32 = -1.0;
    pub const MAX_PITCH: f32 = 0.1;

    pub const MOUSE_SENSITIVITY: f32 = 0.0025;
    pub const ZOOM_SPEED: f32 = 0.005;

    /// Fraction of the follow error left after one second at follow speed 1
    pub const FOLLOW_SMOOTHING_BASE: f32 = 0.001;

    /// Perspective projection
    pub const FOV_DEGREES: f32 = 70.0;
    pub const ZNEAR: f32 = 0.01;
    pub const ZFAR: f32 = 100.0;
}

/// Physics world tuning
pub mod physics {
    /// Gravitational acceleration (units/s²)
    pub const GRAVITY: [f32; 3] = [0.0, -9.81, 0.0];

    /// Skin width the character controller keeps from obstacles
    pub const CONTROLLER_OFFSET: f32 = 0.01;

    /// Player capsule (half height of the cylinder part, radius)
    pub const PLAYER_HALF_HEIGHT: f32 = 0.5;
    pub const PLAYER_RADIUS: f32 = 0.3;
    pub const PLAYER_COLLIDER_OFFSET: [f32; 3] = [0.0, 1.0, 0.0];
}

/// Asset loading
pub mod assets {
    pub const MODEL_PATH: &str = "./models/Y Bot.fbx";
    pub const IDLE_CLIP_PATH: &str = "./animations/idle.fbx";
    pub const WALK_CLIP_PATH: &str = "./animations/walking.fbx";
    pub const RUN_CLIP_PATH: &str = "./animations/running.fbx";

    /// Model units are centimetres
    pub const PLAYER_SCALE: f32 = 0.01;

    pub const LOAD_TIMEOUT_MS: u64 = 30_000;
    pub const LOAD_RETRIES: u32 = 1;

    /// Bone names whose position tracks carry root motion
    pub const ROOT_BONES: [&str; 2] = ["Hips", "mixamorig:Hips"];
}

/// Demo scene layout
pub mod scene {
    pub const REFERENCE_CUBE_COUNT: usize = 10;
    pub const SCATTER_EXTENT: f32 = 20.0;
    pub const CUBE_HALF_EXTENT: f32 = 0.5;

    pub const VIEWPORT_WIDTH: u32 = 1280;
    pub const VIEWPORT_HEIGHT: u32 = 720;
}
