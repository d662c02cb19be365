//! Component kinds for the locomotion pipeline
//!
//! Pure data. Behavior lives in `ecs::systems`.

use glam::{EulerRot, Quat, Vec3};
use rustc_hash::FxHashMap;

use super::{Component, EntityId};
use crate::animation::{BlendWeights, LocomotionClip};
use crate::config::{CameraConfig, MovementConfig};
use crate::physics::{ColliderHandle, ControllerHandle};
use crate::renderer::{ActionHandle, AnimationMixer, NodeId};

/// Transform component for position, rotation and scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3, // Euler angles, XYZ order
    pub scale: Vec3,
}

impl Transform {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Rotation as a quaternion
    pub fn orientation(&self) -> Quat {
        Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z)
    }

    pub fn set_orientation(&mut self, orientation: Quat) {
        let (x, y, z) = orientation.to_euler(EulerRot::XYZ);
        self.rotation = Vec3::new(x, y, z);
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new(Vec3::ZERO)
    }
}

impl Component for Transform {
    const NAME: &'static str = "Transform";
}

/// Back-reference to a scene node owned by the rendering engine
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RenderableMesh {
    pub node: Option<NodeId>,
    /// Set by render sync while the node is part of the scene graph
    pub in_scene: bool,
}

impl RenderableMesh {
    pub fn new(node: NodeId) -> Self {
        Self {
            node: Some(node),
            in_scene: false,
        }
    }
}

impl Component for RenderableMesh {
    const NAME: &'static str = "RenderableMesh";
}

/// Movement component: speed state, direction and tuning
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Movement {
    /// Displacement for this frame (not per second)
    pub velocity: Vec3,
    pub current_speed: f32,
    pub target_speed: f32,
    /// World-space unit direction
    pub direction: Vec3,
    /// Input-space unit direction, before the camera yaw is applied
    pub local_direction: Vec3,
    /// Last camera yaw published by the frame driver
    pub reference_yaw: f32,

    pub move_speed: f32,
    pub sprint_multiplier: f32,
    pub acceleration_speed: f32,
    pub deceleration_speed: f32,
    pub rotation_speed: f32,
}

impl Movement {
    pub fn from_config(config: &MovementConfig) -> Self {
        Self {
            velocity: Vec3::ZERO,
            current_speed: 0.0,
            target_speed: 0.0,
            direction: Vec3::ZERO,
            local_direction: Vec3::ZERO,
            reference_yaw: 0.0,
            move_speed: config.move_speed,
            sprint_multiplier: config.sprint_multiplier,
            acceleration_speed: config.acceleration_speed,
            deceleration_speed: config.deceleration_speed,
            rotation_speed: config.rotation_speed,
        }
    }

    /// Top speed with sprint held
    pub fn run_speed(&self) -> f32 {
        self.move_speed * self.sprint_multiplier
    }
}

impl Default for Movement {
    fn default() -> Self {
        Self::from_config(&MovementConfig::default())
    }
}

impl Component for Movement {
    const NAME: &'static str = "Movement";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyboardState {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
    pub sprint: bool,
}

impl KeyboardState {
    pub fn any_direction(&self) -> bool {
        self.forward || self.back || self.left || self.right
    }
}

/// Mouse deltas for the current frame only
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MouseState {
    pub movement_x: f32,
    pub movement_y: f32,
    pub wheel_delta_y: f32,
}

impl MouseState {
    pub fn has_movement(&self) -> bool {
        self.movement_x != 0.0 || self.movement_y != 0.0
    }
}

/// Input component for keyboard/mouse state
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InputState {
    pub keyboard: KeyboardState,
    pub mouse: MouseState,
}

impl InputState {
    /// Zero this frame's mouse deltas
    pub fn reset_mouse(&mut self) {
        self.mouse = MouseState::default();
    }
}

impl Component for InputState {
    const NAME: &'static str = "InputState";
}

/// Animation component: mixer, locomotion actions and blended weights
pub struct AnimationState {
    pub mixer: Option<Box<dyn AnimationMixer>>,
    pub actions: FxHashMap<LocomotionClip, ActionHandle>,
    pub weights: BlendWeights,
}

impl AnimationState {
    pub fn new(mixer: Box<dyn AnimationMixer>) -> Self {
        Self {
            mixer: Some(mixer),
            actions: FxHashMap::default(),
            weights: BlendWeights::IDLE,
        }
    }
}

impl Default for AnimationState {
    fn default() -> Self {
        Self {
            mixer: None,
            actions: FxHashMap::default(),
            weights: BlendWeights::IDLE,
        }
    }
}

impl std::fmt::Debug for AnimationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationState")
            .field("has_mixer", &self.mixer.is_some())
            .field("actions", &self.actions)
            .field("weights", &self.weights)
            .finish()
    }
}

impl Component for AnimationState {
    const NAME: &'static str = "AnimationState";
}

/// Physics component for collider-backed entities
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PhysicsBody {
    pub collider: Option<ColliderHandle>,
    pub character_controller: Option<ControllerHandle>,
    /// Collider translation relative to `Transform::position`
    pub collider_offset: Vec3,
    pub grounded: bool,
}

impl PhysicsBody {
    pub fn character(collider: ColliderHandle, controller: ControllerHandle, collider_offset: Vec3) -> Self {
        Self {
            collider: Some(collider),
            character_controller: Some(controller),
            collider_offset,
            grounded: false,
        }
    }
}

impl Component for PhysicsBody {
    const NAME: &'static str = "PhysicsBody";
}

/// Scene nodes of the pivot -> yaw -> pitch -> camera hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RigNodes {
    pub pivot: NodeId,
    pub yaw: NodeId,
    pub pitch: NodeId,
}

/// Third-person camera rig component
#[derive(Debug, Clone, PartialEq)]
pub struct CameraRig {
    pub camera: NodeId,
    /// Weak reference; a dead target means "no target this frame"
    pub target: Option<EntityId>,
    pub target_yaw: f32,
    pub target_pitch: f32,

    // Resolved rig state, mirrored into the scene nodes
    pub yaw: f32,
    pub pitch: f32,
    pub distance: f32,
    pub pivot: Vec3,

    pub nodes: Option<RigNodes>,
    pub config: CameraConfig,
}

impl CameraRig {
    pub fn new(camera: NodeId, config: CameraConfig) -> Self {
        Self {
            camera,
            target: None,
            target_yaw: 0.0,
            target_pitch: 0.0,
            yaw: 0.0,
            pitch: 0.0,
            distance: config.default_distance,
            pivot: Vec3::ZERO,
            nodes: None,
            config,
        }
    }

    pub fn with_target(mut self, target: EntityId) -> Self {
        self.target = Some(target);
        self
    }

    pub fn with_nodes(mut self, nodes: RigNodes) -> Self {
        self.nodes = Some(nodes);
        self
    }
}

impl Component for CameraRig {
    const NAME: &'static str = "CameraRig";
}
