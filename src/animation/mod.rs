/// Locomotion animation
///
/// Clip data as loaded from assets, and the idle/walk/run blend math the
/// animation system applies every frame.

pub mod blend;
pub mod clip;

pub use blend::{smooth_weights, target_weights, BlendThresholds, BlendWeights, LocomotionClip};
pub use clip::{strip_root_motion, AnimationClip, KeyframeTrack};
