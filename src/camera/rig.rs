/// Third-person rig math
///
/// Pure functions over plain values so the camera system stays a thin loop.

use glam::{Quat, Vec3};

use crate::config::CameraConfig;

/// Apply one frame of mouse look to the target angles
/// Pure function - returns (target_yaw, target_pitch), pitch clamped
pub fn apply_mouse_look(
    target_yaw: f32,
    target_pitch: f32,
    movement_x: f32,
    movement_y: f32,
    config: &CameraConfig,
) -> (f32, f32) {
    let yaw = target_yaw - movement_x * config.mouse_sensitivity;
    let pitch = (target_pitch - movement_y * config.mouse_sensitivity)
        .clamp(config.min_pitch, config.max_pitch);
    (yaw, pitch)
}

/// Apply a wheel delta to the camera distance
/// Pure function - result always within [min_distance, max_distance]
pub fn apply_zoom(distance: f32, wheel_delta_y: f32, config: &CameraConfig) -> f32 {
    (distance + wheel_delta_y * config.zoom_speed).clamp(config.min_distance, config.max_distance)
}

/// Move `current` a fraction of the way to `target`
///
/// This is per-frame exponential smoothing; with a fraction of 1.0 it
/// snaps to the target.
pub fn smooth_towards(current: f32, target: f32, fraction: f32) -> f32 {
    if fraction >= 1.0 {
        return target;
    }
    current + (target - current) * fraction
}

/// Frame-rate independent follow factor: 1 - base^(dt * speed)
pub fn follow_factor(delta_time: f32, follow_speed: f32, smoothing_base: f32) -> f32 {
    1.0 - smoothing_base.powf(delta_time * follow_speed)
}

/// Rotation about the world up axis
pub fn yaw_rotation(yaw: f32) -> Quat {
    Quat::from_rotation_y(yaw)
}

/// Rotate an input-space direction into world space by a camera yaw
///
/// Length is preserved; callers must not re-normalize.
pub fn rotate_by_yaw(direction: Vec3, yaw: f32) -> Vec3 {
    yaw_rotation(yaw) * direction
}
