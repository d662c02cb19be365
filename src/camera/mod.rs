/// Camera Module
///
/// Perspective projection data plus the pure math behind the third-person
/// rig (`rig`). The per-frame rig update lives in `ecs::systems::camera`.

pub mod rig;

pub use rig::{
    apply_mouse_look, apply_zoom, follow_factor, rotate_by_yaw, smooth_towards, yaw_rotation,
};

use glam::Mat4;

use crate::config::CameraConfig;
use crate::renderer::NodeId;

/// Perspective camera as the rendering engine sees it
#[derive(Debug, Clone, PartialEq)]
pub struct PerspectiveCamera {
    pub node: NodeId,
    pub fovy_radians: f32,
    pub aspect: f32,
    pub znear: f32,
    pub zfar: f32,
    projection: Mat4,
}

impl PerspectiveCamera {
    pub fn new(node: NodeId, config: &CameraConfig, width: u32, height: u32) -> Self {
        let mut camera = Self {
            node,
            fovy_radians: config.fov_degrees.to_radians(),
            aspect: aspect_ratio(width, height),
            znear: config.znear,
            zfar: config.zfar,
            projection: Mat4::IDENTITY,
        };
        camera.update_projection();
        camera
    }

    /// Update aspect ratio for a viewport resize
    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = aspect_ratio(width, height);
        self.update_projection();
    }

    pub fn update_projection(&mut self) {
        self.projection = Mat4::perspective_rh_gl(self.fovy_radians, self.aspect, self.znear, self.zfar);
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }
}

/// A zero-height viewport keeps the previous behaviour of a square aspect
fn aspect_ratio(width: u32, height: u32) -> f32 {
    if height == 0 {
        1.0
    } else {
        width as f32 / height as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_initialization() {
        let camera = PerspectiveCamera::new(NodeId(0), &CameraConfig::default(), 1920, 1080);
        assert!((camera.aspect - 1920.0 / 1080.0).abs() < 0.001);
        assert!((camera.fovy_radians - 70f32.to_radians()).abs() < 1e-6);
        assert_ne!(camera.projection(), Mat4::IDENTITY);
    }

    #[test]
    fn test_resize_updates_projection() {
        let mut camera = PerspectiveCamera::new(NodeId(0), &CameraConfig::default(), 800, 600);
        let before = camera.projection();
        camera.resize(600, 800);

        assert!((camera.aspect - 0.75).abs() < 1e-6);
        assert_ne!(camera.projection(), before);
    }

    #[test]
    fn test_zero_height_viewport() {
        let mut camera = PerspectiveCamera::new(NodeId(0), &CameraConfig::default(), 800, 600);
        camera.resize(800, 0);
        assert_eq!(camera.aspect, 1.0);
    }
}
