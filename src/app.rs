//! Frame driver
//!
//! Owns the single `World`, wires the collaborators into the six pipeline
//! systems, spawns the demo entities and runs one frame per display refresh.

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rustc_hash::FxHashMap;

use crate::animation::{BlendWeights, LocomotionClip};
use crate::assets::{load_locomotion_assets, AssetSource};
use crate::camera::{rotate_by_yaw, PerspectiveCamera};
use crate::config::{EngineConfig, SceneConfig};
use crate::ecs::systems::camera_yaw;
use crate::ecs::{
    AnimationState, AnimationSystem, CameraRig, CameraSystem, EntityId, InputState, InputSystem, Movement,
    MovementSystem, PhysicsBody, PhysicsSystem, RenderSystem, RenderableMesh, RigNodes, Transform, World,
};
use crate::error::{EngineError, EngineResult};
use crate::input::{EventResponse, InputEvent, InputQueue};
use crate::physics::{ColliderDesc, KinematicWorld, SharedPhysics};
use crate::renderer::{HeadlessRenderer, HeadlessScene, NodeKind, SharedCamera, SharedRenderer, SharedScene};

/// The external engines the pipeline drives
#[derive(Clone)]
pub struct Collaborators {
    pub scene: SharedScene,
    pub renderer: SharedRenderer,
    pub physics: SharedPhysics,
}

/// In-memory collaborators with their concrete types still reachable
#[derive(Clone)]
pub struct HeadlessCollaborators {
    pub scene: Rc<RefCell<HeadlessScene>>,
    pub renderer: Rc<RefCell<HeadlessRenderer>>,
    pub physics: Rc<RefCell<KinematicWorld>>,
}

impl HeadlessCollaborators {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            scene: Rc::new(RefCell::new(HeadlessScene::new())),
            renderer: Rc::new(RefCell::new(HeadlessRenderer::new(
                config.scene.viewport_width,
                config.scene.viewport_height,
            ))),
            physics: Rc::new(RefCell::new(KinematicWorld::new(config.physics.gravity))),
        }
    }

    pub fn shared(&self) -> Collaborators {
        Collaborators {
            scene: self.scene.clone(),
            renderer: self.renderer.clone(),
            physics: self.physics.clone(),
        }
    }
}

/// RNG for the reference cube layout, seeded when the config asks for it
pub fn scene_rng(config: &SceneConfig) -> StdRng {
    match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

pub struct FrameDriver {
    config: EngineConfig,
    world: World,
    scene: SharedScene,
    renderer: SharedRenderer,
    physics: SharedPhysics,
    camera: SharedCamera,
    input: InputQueue,
    player: Option<EntityId>,
    camera_entity: Option<EntityId>,
}

impl FrameDriver {
    /// Create the world and register input, movement, physics, animation,
    /// camera and render, in that order
    pub fn new(config: EngineConfig, collaborators: Collaborators) -> Self {
        let Collaborators { scene, renderer, physics } = collaborators;
        let (width, height) = (config.scene.viewport_width, config.scene.viewport_height);

        let camera_node = scene.borrow_mut().create_node(NodeKind::Camera);
        let camera = Rc::new(RefCell::new(PerspectiveCamera::new(camera_node, &config.camera, width, height)));
        renderer.borrow_mut().set_size(width, height);

        let input_system = InputSystem::new();
        let input = input_system.queue();
        let deadband = config.movement.speed_deadband;

        let mut world = World::new();
        world.add_system(input_system);
        world.add_system(MovementSystem::new(deadband));
        world.add_system(PhysicsSystem::new(
            physics.clone(),
            scene.clone(),
            config.movement.slew_mode,
            deadband,
        ));
        world.add_system(AnimationSystem::new(config.animation.clone()));
        world.add_system(CameraSystem::new(scene.clone()));
        world.add_system(RenderSystem::new(scene.clone(), renderer.clone(), camera.clone()));

        log::info!("[ENGINE] Pipeline ready: {}", world.system_names().join(" -> "));

        Self {
            config,
            world,
            scene,
            renderer,
            physics,
            camera,
            input,
            player: None,
            camera_entity: None,
        }
    }

    /// Queue a device event; the response tells the host what to do with it
    pub fn handle_event(&self, event: InputEvent) -> EventResponse {
        self.input.push(event)
    }

    /// The host reports that pointer capture was granted or released
    pub fn pointer_capture_changed(&self, captured: bool) {
        self.input.push(InputEvent::PointerCapture(captured));
    }

    pub fn input_queue(&self) -> InputQueue {
        self.input.clone()
    }

    /// Load the player's model and clips, then create the player entity
    ///
    /// Nothing is created if any load fails.
    pub async fn spawn_player(&mut self, source: &dyn AssetSource) -> EngineResult<EntityId> {
        let assets = match load_locomotion_assets(source, &self.config.assets).await {
            Ok(assets) => assets,
            Err(error) => {
                log::error!("[ASSETS] Player not spawned: {}", error);
                return Err(error);
            }
        };

        let mut clips = Vec::with_capacity(LocomotionClip::ALL.len());
        for role in LocomotionClip::ALL {
            let clip = assets.clip(role).ok_or_else(|| EngineError::MissingClip {
                path: role.as_str().to_string(),
            })?;
            clips.push((role, clip));
        }

        let scale = Vec3::splat(self.config.assets.player_scale);
        let (node, mut mixer) = {
            let mut scene = self.scene.borrow_mut();
            let node = scene.create_node(NodeKind::Model {
                name: assets.model.name.clone(),
            });
            scene.set_scale(node, scale);
            (node, scene.create_mixer(node))
        };

        let mut actions = FxHashMap::default();
        for (role, clip) in clips {
            let action = mixer.clip_action(clip);
            mixer.play(action);
            mixer.set_effective_weight(action, BlendWeights::IDLE.get(role));
            actions.insert(role, action);
        }
        let mut animation = AnimationState::new(mixer);
        animation.actions = actions;

        let physics_config = &self.config.physics;
        let body = {
            let mut physics = self.physics.borrow_mut();
            let collider = physics.create_collider(
                ColliderDesc::capsule(physics_config.player_half_height, physics_config.player_radius)
                    .with_translation(physics_config.player_collider_offset),
            );
            let controller = physics.create_character_controller(physics_config.controller_offset);
            PhysicsBody::character(collider, controller, physics_config.player_collider_offset)
        };

        let id = self
            .world
            .create_entity()
            .attach(Transform::default().with_scale(scale))
            .attach(RenderableMesh::new(node))
            .attach(Movement::from_config(&self.config.movement))
            .attach(InputState::default())
            .attach(body)
            .attach(animation)
            .id();
        self.world.on_entity_changed(id);
        self.player = Some(id);

        log::info!("[ENGINE] Spawned player {}", id);
        Ok(id)
    }

    /// Build the pivot -> yaw -> pitch -> camera hierarchy and its entity
    pub fn spawn_camera(&mut self, target: Option<EntityId>) -> EntityId {
        let camera_node = self.camera.borrow().node;
        let distance = self.config.camera.default_distance;

        let nodes = {
            let mut scene = self.scene.borrow_mut();
            let pivot = scene.create_node(NodeKind::Group);
            let yaw = scene.create_node(NodeKind::Group);
            let pitch = scene.create_node(NodeKind::Group);
            scene.add(pivot);
            scene.attach(pivot, yaw);
            scene.attach(yaw, pitch);
            scene.attach(pitch, camera_node);
            scene.set_position(camera_node, Vec3::new(0.0, 0.0, distance));
            RigNodes { pivot, yaw, pitch }
        };

        let mut rig = CameraRig::new(camera_node, self.config.camera.clone()).with_nodes(nodes);
        if let Some(target) = target {
            rig = rig.with_target(target);
        }

        let id = self
            .world
            .create_entity()
            .attach(rig)
            .attach(InputState::default())
            .id();
        self.world.on_entity_changed(id);
        self.camera_entity = Some(id);
        id
    }

    /// Scatter static cubes over the ground as visual and collision references
    pub fn spawn_reference_cubes(&mut self, rng: &mut impl Rng) -> Vec<EntityId> {
        let count = self.config.scene.reference_cubes;
        let scatter_extent = self.config.scene.scatter_extent;
        let half = self.config.scene.cube_half_extent;

        let mut spawned = Vec::with_capacity(count);
        for _ in 0..count {
            let position = Vec3::new(
                (rng.gen::<f32>() - 0.5) * scatter_extent,
                half,
                (rng.gen::<f32>() - 0.5) * scatter_extent,
            );
            let color = rng.gen_range(0..=0x00ff_ffff);

            let node = {
                let mut scene = self.scene.borrow_mut();
                let node = scene.create_node(NodeKind::Cuboid {
                    half_extents: Vec3::splat(half),
                    color,
                });
                scene.set_position(node, position);
                node
            };
            self.physics
                .borrow_mut()
                .create_collider(ColliderDesc::cuboid(half, half, half).with_translation(position));

            let id = self
                .world
                .create_entity()
                .attach(Transform::new(position))
                .attach(RenderableMesh::new(node))
                .id();
            self.world.on_entity_changed(id);
            spawned.push(id);
        }

        log::debug!("[ENGINE] Spawned {} reference cubes", spawned.len());
        spawned
    }

    /// Run one frame, then publish the camera's resolved yaw to movement
    pub fn frame(&mut self, delta_time: f32) {
        self.world.update(delta_time);
        self.apply_camera_yaw();
    }

    /// Camera yaw is final only after the camera system ran, so the
    /// world-space direction is refreshed here rather than in a system
    fn apply_camera_yaw(&mut self) {
        let Some(yaw) = self.camera_entity.and_then(|camera| camera_yaw(&self.world, camera)) else {
            return;
        };
        let driven: Vec<EntityId> = self.world.tracked("movement").map(<[EntityId]>::to_vec).unwrap_or_default();

        for id in driven {
            let Some(movement) = self.world.entity_mut(id).and_then(|e| e.get_mut::<Movement>()) else {
                continue;
            };
            movement.reference_yaw = yaw;
            if movement.target_speed > 0.0 {
                movement.direction = rotate_by_yaw(movement.local_direction, yaw);
            }
        }
    }

    /// Viewport resize: camera aspect and projection, then renderer size
    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.borrow_mut().resize(width, height);
        self.renderer.borrow_mut().set_size(width, height);
        log::debug!("[ENGINE] Resized to {}x{}", width, height);
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn camera(&self) -> SharedCamera {
        self.camera.clone()
    }

    pub fn player(&self) -> Option<EntityId> {
        self.player
    }

    pub fn camera_entity(&self) -> Option<EntityId> {
        self.camera_entity
    }
}
