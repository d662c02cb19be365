// Minimal entity-component-system runtime
pub mod component;
pub mod components;
pub mod entity;
pub mod system;
pub mod systems;
pub mod world;

// Re-export main types
pub use component::{Component, ComponentKind};
pub use components::{
    AnimationState, CameraRig, InputState, KeyboardState, MouseState, Movement, PhysicsBody,
    RenderableMesh, RigNodes, Transform,
};
pub use entity::{Entity, EntityId, EntityStore};
pub use system::{System, SystemContext};
pub use world::World;

// Re-export the pipeline systems
pub use systems::{
    AnimationSystem, CameraSystem, InputSystem, MovementSystem, PhysicsSystem, RenderSystem,
};
