use rustc_hash::FxHashMap;

use crate::ecs::{Component, ComponentKind, Entity, EntityId, RenderableMesh, System, SystemContext, Transform};
use crate::renderer::{NodeId, SharedCamera, SharedRenderer, SharedScene};

/// Keeps scene nodes in step with entity transforms and draws the frame
pub struct RenderSystem {
    scene: SharedScene,
    renderer: SharedRenderer,
    camera: SharedCamera,
    /// Nodes this system added to the scene, by owning entity
    nodes: FxHashMap<EntityId, NodeId>,
    required: [ComponentKind; 2],
}

impl RenderSystem {
    pub fn new(scene: SharedScene, renderer: SharedRenderer, camera: SharedCamera) -> Self {
        Self {
            scene,
            renderer,
            camera,
            nodes: FxHashMap::default(),
            required: [Transform::kind(), RenderableMesh::kind()],
        }
    }
}

impl System for RenderSystem {
    fn name(&self) -> &str {
        "render"
    }

    fn required_components(&self) -> &[ComponentKind] {
        &self.required
    }

    fn on_entity_added(&mut self, entity: &mut Entity) {
        let id = entity.id();
        let Some(mesh) = entity.get_mut::<RenderableMesh>() else {
            return;
        };
        if let Some(node) = mesh.node {
            self.scene.borrow_mut().add(node);
            mesh.in_scene = true;
            self.nodes.insert(id, node);
        }
    }

    fn on_entity_removed(&mut self, entity: &mut Entity) {
        if let Some(node) = self.nodes.remove(&entity.id()) {
            self.scene.borrow_mut().remove(node);
        }
        if let Some(mesh) = entity.get_mut::<RenderableMesh>() {
            mesh.in_scene = false;
        }
    }

    fn update(&mut self, ctx: &mut SystemContext<'_>, _delta_time: f32) {
        let mut scene = self.scene.borrow_mut();

        ctx.for_each_tracked(|entity| {
            let (Some(transform), Some(node)) = (
                entity.get::<Transform>(),
                entity.get::<RenderableMesh>().and_then(|mesh| mesh.node),
            ) else {
                return;
            };
            scene.set_position(node, transform.position);
            scene.set_rotation(node, transform.orientation());
            scene.set_scale(node, transform.scale);
        });

        self.renderer.borrow_mut().render(&*scene, &self.camera.borrow());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::PerspectiveCamera;
    use crate::config::CameraConfig;
    use crate::ecs::World;
    use crate::renderer::{HeadlessRenderer, HeadlessScene, NodeKind, SceneGraph};
    use glam::Vec3;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Setup {
        world: World,
        scene: Rc<RefCell<HeadlessScene>>,
        renderer: Rc<RefCell<HeadlessRenderer>>,
    }

    fn setup() -> Setup {
        let scene = Rc::new(RefCell::new(HeadlessScene::new()));
        let renderer = Rc::new(RefCell::new(HeadlessRenderer::new(800, 600)));
        let camera_node = scene.borrow_mut().create_node(NodeKind::Camera);
        let camera = Rc::new(RefCell::new(PerspectiveCamera::new(camera_node, &CameraConfig::default(), 800, 600)));

        let mut world = World::new();
        world.add_system(RenderSystem::new(scene.clone(), renderer.clone(), camera));
        Setup { world, scene, renderer }
    }

    #[test]
    fn test_added_entities_join_scene_and_sync() {
        let mut s = setup();
        let node = s.scene.borrow_mut().create_node(NodeKind::Cuboid {
            half_extents: Vec3::splat(0.5),
            color: 0xff0000,
        });
        let transform = Transform::new(Vec3::new(1.0, 0.5, -2.0)).with_scale(Vec3::splat(0.01));
        let id = s
            .world
            .create_entity()
            .attach(transform)
            .attach(RenderableMesh::new(node))
            .id();
        s.world.on_entity_changed(id);

        assert!(s.scene.borrow().contains(node));
        assert!(s.world.entity(id).unwrap().get::<RenderableMesh>().unwrap().in_scene);

        s.world.update(1.0 / 60.0);
        let scene = s.scene.borrow();
        assert_eq!(scene.position(node), Some(Vec3::new(1.0, 0.5, -2.0)));
        assert_eq!(scene.scale(node), Some(Vec3::splat(0.01)));
        assert_eq!(s.renderer.borrow().frames_rendered, 1);
    }

    #[test]
    fn test_removal_detaches_node_even_after_mesh_detach() {
        let mut s = setup();
        let node = s.scene.borrow_mut().create_node(NodeKind::Group);
        let id = s
            .world
            .create_entity()
            .attach(Transform::default())
            .attach(RenderableMesh::new(node))
            .id();
        s.world.on_entity_changed(id);

        if let Some(entity) = s.world.entity_mut(id) {
            entity.detach::<RenderableMesh>();
        }
        s.world.on_entity_changed(id);

        assert!(!s.scene.borrow().contains(node));
        assert_eq!(s.world.tracked("render").map(<[EntityId]>::len), Some(0));
    }

    #[test]
    fn test_renders_with_no_entities() {
        let mut s = setup();
        s.world.update(1.0 / 60.0);
        s.world.update(1.0 / 60.0);
        assert_eq!(s.renderer.borrow().frames_rendered, 2);
    }
}
