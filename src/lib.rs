pub mod animation;
pub mod app;
pub mod assets;
pub mod camera;
pub mod config;
pub mod constants;
pub mod ecs;
pub mod error;
pub mod input;
pub mod physics;
pub mod renderer;

pub use app::{scene_rng, Collaborators, FrameDriver, HeadlessCollaborators};
pub use assets::{AssetSource, InMemoryAssets};
pub use camera::PerspectiveCamera;
pub use config::EngineConfig;
pub use ecs::{Component, ComponentKind, Entity, EntityId, System, SystemContext, World};
pub use error::{EngineError, EngineResult};
pub use input::{EventResponse, InputEvent, KeyCode};
pub use physics::{KinematicWorld, PhysicsBackend};
pub use renderer::{AnimationMixer, HeadlessRenderer, HeadlessScene, Renderer, SceneGraph};
