/// Physics collaborator interface
///
/// The physics system only needs a steppable world with static colliders and
/// a kinematic character controller. `PhysicsBackend` is that seam;
/// `KinematicWorld` is the in-crate implementation.

pub mod aabb;
pub mod kinematic;

pub use aabb::Aabb;
pub use kinematic::KinematicWorld;

use std::cell::RefCell;
use std::rc::Rc;

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Handle to a collider owned by the physics backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColliderHandle(pub u32);

/// Handle to a character controller owned by the physics backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ControllerHandle(pub u32);

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColliderShape {
    Cuboid { half_extents: Vec3 },
    /// Vertical capsule; `half_height` excludes the hemispherical caps
    Capsule { half_height: f32, radius: f32 },
}

impl ColliderShape {
    /// Half extents of the shape's bounding box
    pub fn half_extents(&self) -> Vec3 {
        match *self {
            ColliderShape::Cuboid { half_extents } => half_extents,
            ColliderShape::Capsule { half_height, radius } => Vec3::new(radius, half_height + radius, radius),
        }
    }
}

/// Collider description, consumed by `PhysicsBackend::create_collider`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColliderDesc {
    pub shape: ColliderShape,
    pub translation: Vec3,
}

impl ColliderDesc {
    pub fn cuboid(hx: f32, hy: f32, hz: f32) -> Self {
        Self {
            shape: ColliderShape::Cuboid { half_extents: Vec3::new(hx, hy, hz) },
            translation: Vec3::ZERO,
        }
    }

    pub fn capsule(half_height: f32, radius: f32) -> Self {
        Self {
            shape: ColliderShape::Capsule { half_height, radius },
            translation: Vec3::ZERO,
        }
    }

    pub fn with_translation(mut self, translation: Vec3) -> Self {
        self.translation = translation;
        self
    }
}

/// Result of resolving a desired displacement against collision geometry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CharacterMovement {
    /// Corrected displacement
    pub translation: Vec3,
    pub grounded: bool,
}

/// Steppable physics world with a kinematic character controller
pub trait PhysicsBackend {
    /// Advance the world by one step
    fn step(&mut self);
    fn gravity(&self) -> Vec3;

    fn create_collider(&mut self, desc: ColliderDesc) -> ColliderHandle;
    /// Release a collider; returns `false` for an unknown or already removed handle
    fn remove_collider(&mut self, collider: ColliderHandle) -> bool;
    fn create_character_controller(&mut self, offset: f32) -> ControllerHandle;

    fn set_collider_translation(&mut self, collider: ColliderHandle, translation: Vec3);
    fn collider_translation(&self, collider: ColliderHandle) -> Option<Vec3>;

    /// Resolve `desired` for `collider` driven by `controller`
    ///
    /// Returns `None` when either handle is unknown.
    fn compute_collider_movement(
        &self,
        controller: ControllerHandle,
        collider: ColliderHandle,
        desired: Vec3,
    ) -> Option<CharacterMovement>;
}

pub type SharedPhysics = Rc<RefCell<dyn PhysicsBackend>>;

/// How a body's orientation turns toward its facing target
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlewMode {
    /// Spherical interpolation by `rate * dt` of the remaining arc each frame
    #[default]
    Slerp,
    /// Turn by at most `rate * dt` radians each frame
    MaxAngle,
}

/// Facing rotation for a movement direction, projected onto the ground plane
/// Pure function - `None` when the direction has no horizontal component
pub fn facing_rotation(direction: Vec3) -> Option<Quat> {
    let horizontal = Vec3::new(direction.x, 0.0, direction.z);
    if horizontal.length_squared() < 1e-12 {
        return None;
    }
    Some(Quat::from_rotation_y(horizontal.x.atan2(horizontal.z)))
}

/// Turn `current` toward `target` by one frame's worth of `rate`
pub fn slew_orientation(current: Quat, target: Quat, rate: f32, delta_time: f32, mode: SlewMode) -> Quat {
    let step = (rate * delta_time).max(0.0);
    match mode {
        SlewMode::Slerp => current.slerp(target, step.min(1.0)).normalize(),
        SlewMode::MaxAngle => {
            let angle = current.angle_between(target);
            if angle <= step || angle <= f32::EPSILON {
                target
            } else {
                current.slerp(target, step / angle).normalize()
            }
        }
    }
}
