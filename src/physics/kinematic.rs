/// Kinematic physics world
///
/// Static and kinematic colliders resolved as AABBs, plus a character
/// controller that slides a collider along each axis in turn. There is no
/// rigid-body dynamics; gravity is stored for callers that want it.

use glam::Vec3;

use super::aabb::{aabb_clamp_axis_motion, aabb_from_center_half_extents, aabb_overlaps_on_axis, Aabb};
use super::{
    CharacterMovement, ColliderDesc, ColliderHandle, ColliderShape, ControllerHandle, PhysicsBackend,
};

#[derive(Debug, Clone, Copy)]
struct Collider {
    shape: ColliderShape,
    translation: Vec3,
}

impl Collider {
    fn aabb(&self) -> Aabb {
        aabb_from_center_half_extents(self.translation, self.shape.half_extents())
    }
}

#[derive(Debug, Clone, Copy)]
struct CharacterController {
    /// Skin gap kept between the character and obstacles
    offset: f32,
}

pub struct KinematicWorld {
    gravity: Vec3,
    /// Removed colliders leave an empty slot so handles stay stable
    colliders: Vec<Option<Collider>>,
    controllers: Vec<CharacterController>,
    steps: u64,
}

impl KinematicWorld {
    pub fn new(gravity: Vec3) -> Self {
        Self {
            gravity,
            colliders: Vec::new(),
            controllers: Vec::new(),
            steps: 0,
        }
    }

    /// Number of `step` calls so far
    pub fn step_count(&self) -> u64 {
        self.steps
    }

    /// Number of live colliders
    pub fn collider_count(&self) -> usize {
        self.colliders.iter().flatten().count()
    }

    fn collider(&self, collider: ColliderHandle) -> Option<&Collider> {
        self.colliders.get(collider.0 as usize)?.as_ref()
    }

    pub fn collider_aabb(&self, collider: ColliderHandle) -> Option<Aabb> {
        self.collider(collider).map(Collider::aabb)
    }

    /// Whether a collider other than `collider` sits directly below it within `tolerance`
    fn has_support(&self, collider: ColliderHandle, aabb: &Aabb, tolerance: f32) -> bool {
        self.obstacles(collider).any(|other| {
            aabb_overlaps_on_axis(aabb, &other, 0)
                && aabb_overlaps_on_axis(aabb, &other, 2)
                && other.max.y <= aabb.min.y + tolerance
                && other.max.y >= aabb.min.y - tolerance
        })
    }

    fn obstacles(&self, collider: ColliderHandle) -> impl Iterator<Item = Aabb> + '_ {
        self.colliders
            .iter()
            .enumerate()
            .filter(move |(index, _)| *index != collider.0 as usize)
            .filter_map(|(_, slot)| slot.as_ref().map(Collider::aabb))
    }
}

impl Default for KinematicWorld {
    fn default() -> Self {
        Self::new(Vec3::from_array(crate::constants::physics::GRAVITY))
    }
}

impl PhysicsBackend for KinematicWorld {
    fn step(&mut self) {
        self.steps += 1;
    }

    fn gravity(&self) -> Vec3 {
        self.gravity
    }

    fn create_collider(&mut self, desc: ColliderDesc) -> ColliderHandle {
        let handle = ColliderHandle(self.colliders.len() as u32);
        self.colliders.push(Some(Collider {
            shape: desc.shape,
            translation: desc.translation,
        }));
        log::debug!("[PHYSICS] Created collider {:?} at {:?}", handle, desc.translation);
        handle
    }

    fn remove_collider(&mut self, collider: ColliderHandle) -> bool {
        let removed = self
            .colliders
            .get_mut(collider.0 as usize)
            .and_then(Option::take)
            .is_some();
        if removed {
            log::debug!("[PHYSICS] Removed collider {:?}", collider);
        }
        removed
    }

    fn create_character_controller(&mut self, offset: f32) -> ControllerHandle {
        let handle = ControllerHandle(self.controllers.len() as u32);
        self.controllers.push(CharacterController { offset });
        handle
    }

    fn set_collider_translation(&mut self, collider: ColliderHandle, translation: Vec3) {
        if let Some(Some(c)) = self.colliders.get_mut(collider.0 as usize) {
            c.translation = translation;
        }
    }

    fn collider_translation(&self, collider: ColliderHandle) -> Option<Vec3> {
        self.collider(collider).map(|c| c.translation)
    }

    fn compute_collider_movement(
        &self,
        controller: ControllerHandle,
        collider: ColliderHandle,
        desired: Vec3,
    ) -> Option<CharacterMovement> {
        let skin = self.controllers.get(controller.0 as usize)?.offset;
        let mut aabb = self.collider(collider)?.aabb();
        let mut corrected = Vec3::ZERO;

        // Resolve one axis at a time so blocked motion slides along walls
        for axis in 0..3 {
            let mut delta = desired[axis];
            if delta == 0.0 {
                continue;
            }
            for other in self.obstacles(collider) {
                delta = aabb_clamp_axis_motion(&aabb, &other, axis, delta, skin);
            }

            corrected[axis] = delta;
            aabb.min[axis] += delta;
            aabb.max[axis] += delta;
        }

        let grounded = self.has_support(collider, &aabb, skin * 2.0);
        Some(CharacterMovement {
            translation: corrected,
            grounded,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world_with_player() -> (KinematicWorld, ColliderHandle, ControllerHandle) {
        let mut world = KinematicWorld::default();
        let player = world.create_collider(ColliderDesc::capsule(0.5, 0.3).with_translation(Vec3::new(0.0, 1.0, 0.0)));
        let controller = world.create_character_controller(0.01);
        (world, player, controller)
    }

    #[test]
    fn test_free_motion_is_unchanged() {
        let (world, player, controller) = world_with_player();
        let movement = world
            .compute_collider_movement(controller, player, Vec3::new(0.1, 0.0, -0.2))
            .unwrap();
        assert_eq!(movement.translation, Vec3::new(0.1, 0.0, -0.2));
        assert!(!movement.grounded);
    }

    #[test]
    fn test_wall_blocks_and_slides() {
        let (mut world, player, controller) = world_with_player();
        // Cube directly ahead along -Z
        world.create_collider(ColliderDesc::cuboid(0.5, 0.5, 0.5).with_translation(Vec3::new(0.0, 0.5, -1.0)));

        let movement = world
            .compute_collider_movement(controller, player, Vec3::new(0.2, 0.0, -1.0))
            .unwrap();

        assert!((movement.translation.x - 0.2).abs() < 1e-6);
        // Capsule front at -0.3, cube face at -0.5, minus skin
        assert!((movement.translation.z + 0.19).abs() < 1e-5);
    }

    #[test]
    fn test_grounded_on_support() {
        let (mut world, player, controller) = world_with_player();
        // Floor whose top sits at the capsule bottom (y = 0.2)
        world.create_collider(ColliderDesc::cuboid(5.0, 0.1, 5.0).with_translation(Vec3::new(0.0, 0.1, 0.0)));

        let movement = world
            .compute_collider_movement(controller, player, Vec3::new(0.0, -1.0, 0.0))
            .unwrap();
        assert_eq!(movement.translation.y, 0.0);
        assert!(movement.grounded);
    }

    #[test]
    fn test_unknown_handles() {
        let (world, player, _) = world_with_player();
        assert!(world
            .compute_collider_movement(ControllerHandle(9), player, Vec3::X)
            .is_none());
        assert!(world
            .compute_collider_movement(ControllerHandle(0), ColliderHandle(9), Vec3::X)
            .is_none());
    }

    #[test]
    fn test_removed_collider_stops_blocking() {
        let (mut world, player, controller) = world_with_player();
        let wall = world.create_collider(ColliderDesc::cuboid(0.5, 0.5, 0.5).with_translation(Vec3::new(0.0, 0.5, -1.0)));
        assert_eq!(world.collider_count(), 2);

        assert!(world.remove_collider(wall));
        assert!(!world.remove_collider(wall));
        assert_eq!(world.collider_count(), 1);
        assert!(world.collider_translation(wall).is_none());

        let movement = world
            .compute_collider_movement(controller, player, Vec3::new(0.0, 0.0, -1.0))
            .unwrap();
        assert_eq!(movement.translation, Vec3::new(0.0, 0.0, -1.0));

        // Handles created afterwards do not reuse the freed slot
        let next = world.create_collider(ColliderDesc::cuboid(0.1, 0.1, 0.1));
        assert_ne!(next, wall);
    }

    #[test]
    fn test_step_counts() {
        let mut world = KinematicWorld::default();
        world.step();
        world.step();
        assert_eq!(world.step_count(), 2);
        assert_eq!(world.gravity(), Vec3::new(0.0, -9.81, 0.0));
    }
}
