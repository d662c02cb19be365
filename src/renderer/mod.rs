/// Rendering engine collaborator interface
///
/// The pipeline never talks to a GPU directly. It drives a scene graph,
/// per-entity animation mixers and a renderer through these traits; a real
/// backend implements them, and `headless` provides in-memory versions for
/// tests and the demo binary.

pub mod headless;

pub use headless::{HeadlessMixer, HeadlessRenderer, HeadlessScene};

use std::cell::RefCell;
use std::rc::Rc;

use glam::{Quat, Vec3};

use crate::animation::AnimationClip;
use crate::camera::PerspectiveCamera;

/// Handle to a node in the scene graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

/// Handle to a playable action inside one mixer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActionHandle(pub u32);

/// What a scene node stands for
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Transform-only node (camera rig pivots)
    Group,
    Camera,
    Cuboid { half_extents: Vec3, color: u32 },
    /// Instance of a loaded skinned model
    Model { name: String },
}

/// Scene graph with hierarchical parenting
pub trait SceneGraph {
    fn create_node(&mut self, kind: NodeKind) -> NodeId;

    /// Add a node to the scene root
    fn add(&mut self, node: NodeId);
    /// Remove a node from the scene root
    fn remove(&mut self, node: NodeId);
    /// Whether a node is attached to the scene root
    fn contains(&self, node: NodeId) -> bool;

    /// Parent `child` under `parent`
    fn attach(&mut self, parent: NodeId, child: NodeId);

    fn set_position(&mut self, node: NodeId, position: Vec3);
    fn position(&self, node: NodeId) -> Option<Vec3>;
    fn set_rotation(&mut self, node: NodeId, rotation: Quat);
    fn rotation(&self, node: NodeId) -> Option<Quat>;
    fn set_scale(&mut self, node: NodeId, scale: Vec3);
    fn scale(&self, node: NodeId) -> Option<Vec3>;

    /// Create an animation mixer driving the skeleton under `root`
    fn create_mixer(&mut self, root: NodeId) -> Box<dyn AnimationMixer>;
}

/// Draws a scene from a camera
pub trait Renderer {
    fn render(&mut self, scene: &dyn SceneGraph, camera: &PerspectiveCamera);
    fn set_size(&mut self, width: u32, height: u32);
}

/// Time-driven animation mixer with weighted actions
pub trait AnimationMixer {
    fn clip_action(&mut self, clip: &AnimationClip) -> ActionHandle;
    fn play(&mut self, action: ActionHandle);
    fn set_effective_weight(&mut self, action: ActionHandle, weight: f32);
    fn effective_weight(&self, action: ActionHandle) -> f32;
    fn set_effective_time_scale(&mut self, action: ActionHandle, time_scale: f32);
    /// Advance every playing action by `delta_time` seconds
    fn advance(&mut self, delta_time: f32);
    fn time(&self) -> f32;
}

/// Single-threaded shared handles to the collaborators
pub type SharedScene = Rc<RefCell<dyn SceneGraph>>;
pub type SharedRenderer = Rc<RefCell<dyn Renderer>>;
pub type SharedCamera = Rc<RefCell<PerspectiveCamera>>;
