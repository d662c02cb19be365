use crate::ecs::{Component, ComponentKind, Entity, Movement, PhysicsBody, RenderableMesh, System, SystemContext, Transform};
use crate::error::contract_violation;
use crate::physics::{facing_rotation, slew_orientation, PhysicsBackend, SharedPhysics, SlewMode};
use crate::renderer::{SceneGraph, SharedScene};

/// Steps the physics world once per frame and moves controller-driven bodies
///
/// There is no accumulator: a slow frame still gets exactly one step.
pub struct PhysicsSystem {
    physics: SharedPhysics,
    scene: SharedScene,
    slew_mode: SlewMode,
    deadband: f32,
    required: [ComponentKind; 3],
}

impl PhysicsSystem {
    pub fn new(physics: SharedPhysics, scene: SharedScene, slew_mode: SlewMode, deadband: f32) -> Self {
        Self {
            physics,
            scene,
            slew_mode,
            deadband,
            required: [Transform::kind(), Movement::kind(), PhysicsBody::kind()],
        }
    }

    fn move_entity(
        &self,
        entity: &mut Entity,
        physics: &mut dyn PhysicsBackend,
        scene: &mut dyn SceneGraph,
        delta_time: f32,
    ) {
        let (Some(mut transform), Some(movement), Some(mut body)) = (
            entity.get::<Transform>().copied(),
            entity.get::<Movement>().copied(),
            entity.get::<PhysicsBody>().copied(),
        ) else {
            let missing = [Transform::kind(), Movement::kind(), PhysicsBody::kind()]
                .into_iter()
                .find(|kind| !entity.has_kind(*kind));
            if let Some(kind) = missing {
                contract_violation("physics", entity.id(), kind);
            }
            return;
        };

        if movement.velocity == glam::Vec3::ZERO {
            return;
        }
        let (Some(controller), Some(collider)) = (body.character_controller, body.collider) else {
            return;
        };
        let Some(resolved) = physics.compute_collider_movement(controller, collider, movement.velocity) else {
            log::debug!("[PHYSICS] Entity {} references unknown physics handles", entity.id());
            return;
        };

        transform.position += resolved.translation;
        physics.set_collider_translation(collider, transform.position + body.collider_offset);
        body.grounded = resolved.grounded;

        let node = entity.get::<RenderableMesh>().and_then(|mesh| mesh.node);
        if let Some(node) = node {
            scene.set_position(node, transform.position);
        }

        if movement.current_speed > self.deadband {
            if let Some(target) = facing_rotation(movement.direction) {
                let orientation = slew_orientation(
                    transform.orientation(),
                    target,
                    movement.rotation_speed,
                    delta_time,
                    self.slew_mode,
                );
                transform.set_orientation(orientation);
                if let Some(node) = node {
                    scene.set_rotation(node, orientation);
                }
            }
        }

        entity.attach(transform).attach(body);
    }
}

impl System for PhysicsSystem {
    fn name(&self) -> &str {
        "physics"
    }

    fn required_components(&self) -> &[ComponentKind] {
        &self.required
    }

    /// Leaving the pipeline releases the body's collider so it stops blocking others
    fn on_entity_removed(&mut self, entity: &mut Entity) {
        let id = entity.id();
        let Some(body) = entity.get_mut::<PhysicsBody>() else {
            return;
        };
        if let Some(collider) = body.collider.take() {
            if self.physics.borrow_mut().remove_collider(collider) {
                log::debug!("[PHYSICS] Released collider of entity {}", id);
            }
        }
        body.character_controller = None;
        body.grounded = false;
    }

    fn update(&mut self, ctx: &mut SystemContext<'_>, delta_time: f32) {
        let mut physics = self.physics.borrow_mut();
        physics.step();

        let mut scene = self.scene.borrow_mut();
        ctx.for_each_tracked(|entity| self.move_entity(entity, &mut *physics, &mut *scene, delta_time));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::World;
    use crate::physics::{ColliderDesc, KinematicWorld};
    use crate::renderer::{HeadlessScene, NodeKind};
    use glam::Vec3;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Rig {
        world: World,
        physics: Rc<RefCell<KinematicWorld>>,
        scene: Rc<RefCell<HeadlessScene>>,
    }

    fn rig() -> Rig {
        let physics = Rc::new(RefCell::new(KinematicWorld::default()));
        let scene = Rc::new(RefCell::new(HeadlessScene::new()));
        let mut world = World::new();
        world.add_system(PhysicsSystem::new(physics.clone(), scene.clone(), SlewMode::Slerp, 0.01));
        Rig { world, physics, scene }
    }

    fn spawn_character(rig: &mut Rig, velocity: Vec3, speed: f32) -> crate::ecs::EntityId {
        let offset = Vec3::new(0.0, 1.0, 0.0);
        let (collider, controller) = {
            let mut physics = rig.physics.borrow_mut();
            let collider = physics.create_collider(ColliderDesc::capsule(0.5, 0.3).with_translation(offset));
            (collider, physics.create_character_controller(0.01))
        };
        let node = rig.scene.borrow_mut().create_node(NodeKind::Model { name: "bot".into() });

        let mut movement = Movement::default();
        movement.velocity = velocity;
        movement.current_speed = speed;
        movement.direction = velocity.normalize_or_zero();

        let id = rig
            .world
            .create_entity()
            .attach(Transform::default())
            .attach(movement)
            .attach(PhysicsBody::character(collider, controller, offset))
            .attach(RenderableMesh::new(node))
            .id();
        rig.world.on_entity_changed(id);
        id
    }

    #[test]
    fn test_one_step_per_frame() {
        let mut rig = rig();
        rig.world.update(0.5);
        rig.world.update(0.001);
        assert_eq!(rig.physics.borrow().step_count(), 2);
    }

    #[test]
    fn test_displacement_moves_transform_collider_and_mesh() {
        let mut rig = rig();
        let id = spawn_character(&mut rig, Vec3::new(0.1, 0.0, 0.0), 1.5);
        rig.world.update(1.0 / 60.0);

        let entity = rig.world.entity(id).unwrap();
        let position = entity.get::<Transform>().unwrap().position;
        assert!((position - Vec3::new(0.1, 0.0, 0.0)).length() < 1e-6);

        let collider = entity.get::<PhysicsBody>().unwrap().collider.unwrap();
        let translation = rig.physics.borrow().collider_translation(collider).unwrap();
        assert!((translation - Vec3::new(0.1, 1.0, 0.0)).length() < 1e-6);

        let node = entity.get::<RenderableMesh>().unwrap().node.unwrap();
        assert_eq!(rig.scene.borrow().position(node), Some(position));
    }

    #[test]
    fn test_orientation_slews_toward_direction() {
        let mut rig = rig();
        let id = spawn_character(&mut rig, Vec3::new(0.05, 0.0, 0.0), 1.5);

        for _ in 0..120 {
            rig.world.update(1.0 / 60.0);
        }

        let transform = rig.world.entity(id).unwrap().get::<Transform>().copied().unwrap();
        let facing = transform.orientation() * Vec3::Z;
        assert!((facing - Vec3::X).length() < 1e-3);
    }

    #[test]
    fn test_removed_entity_no_longer_blocks() {
        let mut rig = rig();
        let walker = spawn_character(&mut rig, Vec3::new(0.0, 0.0, -0.05), 3.0);
        let blocker = spawn_character(&mut rig, Vec3::ZERO, 0.0);
        let blocker_collider = rig.world.entity(blocker).unwrap().get::<PhysicsBody>().unwrap().collider.unwrap();
        rig.physics
            .borrow_mut()
            .set_collider_translation(blocker_collider, Vec3::new(0.0, 1.0, -1.2));

        let removed = rig.world.remove_entity(blocker).unwrap();
        let body = removed.get::<PhysicsBody>().unwrap();
        assert_eq!(body.collider, None);
        assert_eq!(body.character_controller, None);
        assert_eq!(rig.physics.borrow().collider_count(), 1);

        for _ in 0..60 {
            rig.world.update(1.0 / 60.0);
        }

        let position = rig.world.entity(walker).unwrap().get::<Transform>().unwrap().position;
        assert!(position.z < -2.0, "walker stopped at {:?}", position);
    }

    #[test]
    fn test_zero_velocity_leaves_body_alone() {
        let mut rig = rig();
        let id = spawn_character(&mut rig, Vec3::ZERO, 0.0);
        rig.world.update(1.0 / 60.0);

        let transform = rig.world.entity(id).unwrap().get::<Transform>().copied().unwrap();
        assert_eq!(transform, Transform::default());
    }
}
