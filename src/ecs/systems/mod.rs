// Locomotion pipeline systems, registered in this order:
// input -> movement -> physics -> animation -> camera -> render
pub mod animation;
pub mod camera;
pub mod input;
pub mod movement;
pub mod physics;
pub mod render;

pub use animation::AnimationSystem;
pub use camera::{camera_yaw, update_rig, CameraSystem};
pub use input::InputSystem;
pub use movement::{local_direction, resolve_movement, MovementSystem};
pub use physics::PhysicsSystem;
pub use render::RenderSystem;
