use glam::{Quat, Vec3};

use crate::camera::{apply_mouse_look, apply_zoom, follow_factor, smooth_towards, yaw_rotation};
use crate::ecs::{CameraRig, Component, ComponentKind, EntityId, InputState, MouseState, System, SystemContext, Transform, World};
use crate::error::contract_violation;
use crate::renderer::{SceneGraph, SharedScene};

/// Advance a rig by one frame of input and target motion
///
/// `target_position` is `None` when the rig has no target or the target is
/// gone; the pivot then stays where it is.
pub fn update_rig(rig: &mut CameraRig, mouse: &MouseState, target_position: Option<Vec3>, delta_time: f32) {
    let config = &rig.config;

    if mouse.has_movement() {
        (rig.target_yaw, rig.target_pitch) =
            apply_mouse_look(rig.target_yaw, rig.target_pitch, mouse.movement_x, mouse.movement_y, config);
    }
    if mouse.wheel_delta_y != 0.0 {
        rig.distance = apply_zoom(rig.distance, mouse.wheel_delta_y, config);
    }

    rig.yaw = smooth_towards(rig.yaw, rig.target_yaw, config.rotation_smoothing);
    rig.pitch = smooth_towards(rig.pitch, rig.target_pitch, config.rotation_smoothing)
        .clamp(config.min_pitch, config.max_pitch);

    if let Some(target) = target_position {
        let goal = target + Vec3::Y * config.height_offset;
        let t = follow_factor(delta_time, config.follow_speed, config.follow_smoothing_base);
        rig.pivot = rig.pivot.lerp(goal, t);
    }
}

/// Resolved yaw of a camera rig, for the frame driver's direction pass
pub fn camera_yaw(world: &World, camera: EntityId) -> Option<f32> {
    world.entity(camera)?.get::<CameraRig>().map(|rig| rig.yaw)
}

fn mirror_into_scene(rig: &CameraRig, scene: &mut dyn SceneGraph) {
    if let Some(nodes) = rig.nodes {
        scene.set_position(nodes.pivot, rig.pivot);
        scene.set_rotation(nodes.yaw, yaw_rotation(rig.yaw));
        scene.set_rotation(nodes.pitch, Quat::from_rotation_x(rig.pitch));
    }
    scene.set_position(rig.camera, Vec3::new(0.0, 0.0, rig.distance));
}

/// Third-person follow camera: mouse look, wheel zoom, smoothed follow
pub struct CameraSystem {
    scene: SharedScene,
    required: [ComponentKind; 2],
}

impl CameraSystem {
    pub fn new(scene: SharedScene) -> Self {
        Self {
            scene,
            required: [CameraRig::kind(), InputState::kind()],
        }
    }
}

impl System for CameraSystem {
    fn name(&self) -> &str {
        "camera"
    }

    fn required_components(&self) -> &[ComponentKind] {
        &self.required
    }

    fn update(&mut self, ctx: &mut SystemContext<'_>, delta_time: f32) {
        let mut scene = self.scene.borrow_mut();

        for &id in ctx.tracked() {
            // Weak lookup of the follow target
            let target = ctx.entity(id).and_then(|e| e.get::<CameraRig>()).and_then(|rig| rig.target);
            let target_position = target
                .and_then(|target| ctx.entity(target))
                .and_then(|e| e.get::<Transform>())
                .map(|transform| transform.position);
            if let (Some(target), None) = (target, target_position) {
                log::debug!("[CAMERA] Target {} unavailable, skipping follow", target);
            }

            let Some(entity) = ctx.entity_mut(id) else {
                continue;
            };
            let Some(mouse) = entity.get::<InputState>().map(|input| input.mouse) else {
                contract_violation("camera", id, InputState::kind());
                continue;
            };
            let Some(rig) = entity.get_mut::<CameraRig>() else {
                contract_violation("camera", id, CameraRig::kind());
                continue;
            };

            update_rig(rig, &mouse, target_position, delta_time);
            mirror_into_scene(rig, &mut *scene);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CameraConfig;
    use crate::renderer::NodeId;

    fn rig() -> CameraRig {
        CameraRig::new(NodeId(0), CameraConfig::default())
    }

    #[test]
    fn test_mouse_look_updates_targets_then_smooths() {
        let mut rig = rig();
        let mouse = MouseState {
            movement_x: 100.0,
            movement_y: 0.0,
            wheel_delta_y: 0.0,
        };
        update_rig(&mut rig, &mouse, None, 1.0 / 60.0);

        assert!((rig.target_yaw + 0.25).abs() < 1e-6);
        // Default smoothing of 1.0 snaps to the target
        assert!((rig.yaw - rig.target_yaw).abs() < 1e-6);
    }

    #[test]
    fn test_partial_rotation_smoothing() {
        let mut rig = rig();
        rig.config.rotation_smoothing = 0.5;
        rig.target_yaw = 1.0;
        update_rig(&mut rig, &MouseState::default(), None, 1.0 / 60.0);
        assert!((rig.yaw - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_resolved_pitch_stays_in_range_across_full_swing() {
        for smoothing in [1.0, 0.5] {
            let mut rig = rig();
            rig.config.rotation_smoothing = smoothing;
            let down = MouseState { movement_x: 0.0, movement_y: 10_000.0, wheel_delta_y: 0.0 };
            let up = MouseState { movement_x: 0.0, movement_y: -10_000.0, wheel_delta_y: 0.0 };

            update_rig(&mut rig, &down, None, 1.0 / 60.0);
            for _ in 0..30 {
                update_rig(&mut rig, &up, None, 1.0 / 60.0);
                assert!(rig.pitch >= rig.config.min_pitch && rig.pitch <= rig.config.max_pitch);
            }
        }

        let mut rig = rig();
        rig.pitch = -1.0;
        rig.target_pitch = 0.1;
        update_rig(&mut rig, &MouseState::default(), None, 1.0 / 60.0);
        assert_eq!(rig.pitch, 0.1);
    }

    #[test]
    fn test_follow_moves_pivot_toward_target() {
        let mut rig = rig();
        let target = Vec3::new(10.0, 0.0, 0.0);
        update_rig(&mut rig, &MouseState::default(), Some(target), 1.0 / 60.0);

        assert!(rig.pivot.x > 0.0 && rig.pivot.x < 10.0);
        for _ in 0..600 {
            update_rig(&mut rig, &MouseState::default(), Some(target), 1.0 / 60.0);
        }
        assert!((rig.pivot - Vec3::new(10.0, 1.5, 0.0)).length() < 1e-3);
    }

    #[test]
    fn test_no_target_keeps_pivot() {
        let mut rig = rig();
        rig.pivot = Vec3::new(1.0, 2.0, 3.0);
        update_rig(&mut rig, &MouseState::default(), None, 0.5);
        assert_eq!(rig.pivot, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_zoom_clamped() {
        let mut rig = rig();
        let mouse = MouseState {
            wheel_delta_y: 1e6,
            ..MouseState::default()
        };
        update_rig(&mut rig, &mouse, None, 1.0 / 60.0);
        assert_eq!(rig.distance, rig.config.max_distance);
    }
}
