//! Speed-driven idle/walk/run blending

use crate::constants::animation::{IDLE_CLIP, RUN_CLIP, WALK_CLIP};

/// The three locomotion clips every animated character carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocomotionClip {
    Idle,
    Walk,
    Run,
}

impl LocomotionClip {
    pub const ALL: [LocomotionClip; 3] = [LocomotionClip::Idle, LocomotionClip::Walk, LocomotionClip::Run];

    pub fn as_str(&self) -> &'static str {
        match self {
            LocomotionClip::Idle => IDLE_CLIP,
            LocomotionClip::Walk => WALK_CLIP,
            LocomotionClip::Run => RUN_CLIP,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|clip| clip.as_str() == name)
    }
}

/// Blend weights of the three locomotion actions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlendWeights {
    pub idle: f32,
    pub walk: f32,
    pub run: f32,
}

impl BlendWeights {
    pub const IDLE: BlendWeights = BlendWeights { idle: 1.0, walk: 0.0, run: 0.0 };
    pub const WALK: BlendWeights = BlendWeights { idle: 0.0, walk: 1.0, run: 0.0 };
    pub const RUN: BlendWeights = BlendWeights { idle: 0.0, walk: 0.0, run: 1.0 };

    pub fn get(&self, clip: LocomotionClip) -> f32 {
        match clip {
            LocomotionClip::Idle => self.idle,
            LocomotionClip::Walk => self.walk,
            LocomotionClip::Run => self.run,
        }
    }

    pub fn sum(&self) -> f32 {
        self.idle + self.walk + self.run
    }
}

impl Default for BlendWeights {
    fn default() -> Self {
        Self::IDLE
    }
}

/// Speeds at which each blend band begins and ends
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlendThresholds {
    pub walk_start: f32,
    pub walk_full: f32,
    pub run_full: f32,
}

impl BlendThresholds {
    /// Walk is full at the base move speed, run at move speed x sprint multiplier
    pub fn new(walk_start: f32, move_speed: f32, sprint_multiplier: f32) -> Self {
        Self {
            walk_start,
            walk_full: move_speed,
            run_full: move_speed * sprint_multiplier,
        }
    }
}

/// Target weights for a speed and sprint state
/// Pure function - the three weights always sum to 1
pub fn target_weights(speed: f32, sprint: bool, thresholds: &BlendThresholds) -> BlendWeights {
    let BlendThresholds { walk_start, walk_full, run_full } = *thresholds;

    if speed < walk_start {
        BlendWeights::IDLE
    } else if speed < walk_full {
        let t = (speed - walk_start) / (walk_full - walk_start);
        BlendWeights { idle: 1.0 - t, walk: t, run: 0.0 }
    } else if speed < run_full && sprint {
        let t = (speed - walk_full) / (run_full - walk_full);
        BlendWeights { idle: 0.0, walk: 1.0 - t, run: t }
    } else if !sprint {
        BlendWeights::WALK
    } else {
        BlendWeights::RUN
    }
}

/// Move each weight toward its target by `(target - weight) * k * dt`
///
/// Linear per-frame approximation, not an exact exponential decay; it can
/// overshoot once `k * dt` exceeds 1.
pub fn smooth_weights(
    current: BlendWeights,
    target: BlendWeights,
    smoothing_speed: f32,
    delta_time: f32,
) -> BlendWeights {
    let step = smoothing_speed * delta_time;
    BlendWeights {
        idle: current.idle + (target.idle - current.idle) * step,
        walk: current.walk + (target.walk - current.walk) * step,
        run: current.run + (target.run - current.run) * step,
    }
}
