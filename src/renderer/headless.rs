//! In-memory rendering collaborators
//!
//! No GPU work happens here. The scene keeps node transforms and parenting so
//! world-space positions can be inspected; the renderer counts frames.

use glam::{Mat4, Quat, Vec3};
use rustc_hash::FxHashMap;

use super::{ActionHandle, AnimationMixer, NodeId, NodeKind, Renderer, SceneGraph};
use crate::animation::AnimationClip;
use crate::camera::PerspectiveCamera;

#[derive(Debug, Clone)]
struct SceneNode {
    kind: NodeKind,
    parent: Option<NodeId>,
    position: Vec3,
    rotation: Quat,
    scale: Vec3,
}

/// Scene graph kept entirely in memory
#[derive(Debug, Default)]
pub struct HeadlessScene {
    nodes: Vec<SceneNode>,
    root: Vec<NodeId>,
}

impl HeadlessScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Nodes attached directly to the scene root, in insertion order
    pub fn root_nodes(&self) -> &[NodeId] {
        &self.root
    }

    pub fn kind(&self, node: NodeId) -> Option<&NodeKind> {
        self.node(node).map(|n| &n.kind)
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node)?.parent
    }

    /// Local-to-world matrix, composed through the parent chain
    pub fn world_matrix(&self, node: NodeId) -> Option<Mat4> {
        let n = self.node(node)?;
        let local = Mat4::from_scale_rotation_translation(n.scale, n.rotation, n.position);
        match n.parent {
            Some(parent) => Some(self.world_matrix(parent)? * local),
            None => Some(local),
        }
    }

    pub fn world_position(&self, node: NodeId) -> Option<Vec3> {
        self.world_matrix(node).map(|m| m.transform_point3(Vec3::ZERO))
    }

    fn node(&self, node: NodeId) -> Option<&SceneNode> {
        self.nodes.get(node.0 as usize)
    }

    fn node_mut(&mut self, node: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(node.0 as usize)
    }
}

impl SceneGraph for HeadlessScene {
    fn create_node(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(SceneNode {
            kind,
            parent: None,
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        });
        id
    }

    fn add(&mut self, node: NodeId) {
        if self.node(node).is_some() && !self.root.contains(&node) {
            self.root.push(node);
        }
    }

    fn remove(&mut self, node: NodeId) {
        self.root.retain(|n| *n != node);
    }

    fn contains(&self, node: NodeId) -> bool {
        self.root.contains(&node)
    }

    fn attach(&mut self, parent: NodeId, child: NodeId) {
        if self.node(parent).is_none() {
            return;
        }
        if let Some(n) = self.node_mut(child) {
            n.parent = Some(parent);
        }
    }

    fn set_position(&mut self, node: NodeId, position: Vec3) {
        if let Some(n) = self.node_mut(node) {
            n.position = position;
        }
    }

    fn position(&self, node: NodeId) -> Option<Vec3> {
        self.node(node).map(|n| n.position)
    }

    fn set_rotation(&mut self, node: NodeId, rotation: Quat) {
        if let Some(n) = self.node_mut(node) {
            n.rotation = rotation;
        }
    }

    fn rotation(&self, node: NodeId) -> Option<Quat> {
        self.node(node).map(|n| n.rotation)
    }

    fn set_scale(&mut self, node: NodeId, scale: Vec3) {
        if let Some(n) = self.node_mut(node) {
            n.scale = scale;
        }
    }

    fn scale(&self, node: NodeId) -> Option<Vec3> {
        self.node(node).map(|n| n.scale)
    }

    fn create_mixer(&mut self, _root: NodeId) -> Box<dyn AnimationMixer> {
        Box::new(HeadlessMixer::new())
    }
}

/// Renderer that records what it was asked to draw
#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    pub frames_rendered: u64,
    pub size: (u32, u32),
    pub last_visible_nodes: usize,
    pub last_camera_aspect: f32,
}

impl HeadlessRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: (width, height),
            ..Self::default()
        }
    }
}

impl Renderer for HeadlessRenderer {
    fn render(&mut self, scene: &dyn SceneGraph, camera: &PerspectiveCamera) {
        self.frames_rendered += 1;
        self.last_camera_aspect = camera.aspect;
        // Root membership is the only visibility notion a headless scene has
        self.last_visible_nodes = (0..u32::MAX)
            .map(NodeId)
            .take_while(|node| scene.position(*node).is_some())
            .filter(|node| scene.contains(*node))
            .count();
    }

    fn set_size(&mut self, width: u32, height: u32) {
        self.size = (width, height);
    }
}

#[derive(Debug, Clone)]
struct MixerAction {
    clip_name: String,
    duration: f32,
    playing: bool,
    weight: f32,
    time_scale: f32,
    local_time: f32,
}

/// Mixer that advances clip-local time and stores weights
#[derive(Debug, Default)]
pub struct HeadlessMixer {
    actions: Vec<MixerAction>,
    by_clip: FxHashMap<String, ActionHandle>,
    time: f32,
}

impl HeadlessMixer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_playing(&self, action: ActionHandle) -> bool {
        self.action(action).map_or(false, |a| a.playing)
    }

    pub fn local_time(&self, action: ActionHandle) -> Option<f32> {
        self.action(action).map(|a| a.local_time)
    }

    pub fn clip_name(&self, action: ActionHandle) -> Option<&str> {
        self.action(action).map(|a| a.clip_name.as_str())
    }

    fn action(&self, action: ActionHandle) -> Option<&MixerAction> {
        self.actions.get(action.0 as usize)
    }

    fn action_mut(&mut self, action: ActionHandle) -> Option<&mut MixerAction> {
        self.actions.get_mut(action.0 as usize)
    }
}

impl AnimationMixer for HeadlessMixer {
    /// One action per clip; asking twice returns the same handle
    fn clip_action(&mut self, clip: &AnimationClip) -> ActionHandle {
        if let Some(handle) = self.by_clip.get(&clip.name) {
            return *handle;
        }
        let handle = ActionHandle(self.actions.len() as u32);
        self.actions.push(MixerAction {
            clip_name: clip.name.clone(),
            duration: clip.duration,
            playing: false,
            weight: 1.0,
            time_scale: 1.0,
            local_time: 0.0,
        });
        self.by_clip.insert(clip.name.clone(), handle);
        handle
    }

    fn play(&mut self, action: ActionHandle) {
        if let Some(a) = self.action_mut(action) {
            a.playing = true;
        }
    }

    fn set_effective_weight(&mut self, action: ActionHandle, weight: f32) {
        if let Some(a) = self.action_mut(action) {
            a.weight = weight;
        }
    }

    fn effective_weight(&self, action: ActionHandle) -> f32 {
        self.action(action).map_or(0.0, |a| a.weight)
    }

    fn set_effective_time_scale(&mut self, action: ActionHandle, time_scale: f32) {
        if let Some(a) = self.action_mut(action) {
            a.time_scale = time_scale;
        }
    }

    fn advance(&mut self, delta_time: f32) {
        self.time += delta_time;
        for action in self.actions.iter_mut().filter(|a| a.playing) {
            action.local_time += delta_time * action.time_scale;
            if action.duration > 0.0 {
                action.local_time = action.local_time.rem_euclid(action.duration);
            }
        }
    }

    fn time(&self) -> f32 {
        self.time
    }
}
