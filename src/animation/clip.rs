//! Animation clip data

/// A named, time-sampled curve for one animated property
#[derive(Debug, Clone, PartialEq)]
pub struct KeyframeTrack {
    /// Property path, e.g. `mixamorig:Hips.position`
    pub name: String,
    pub times: Vec<f32>,
    pub values: Vec<f32>,
}

impl KeyframeTrack {
    pub fn new(name: impl Into<String>, times: Vec<f32>, values: Vec<f32>) -> Self {
        Self {
            name: name.into(),
            times,
            values,
        }
    }
}

/// A set of tracks played together
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationClip {
    pub name: String,
    pub duration: f32,
    pub tracks: Vec<KeyframeTrack>,
}

impl AnimationClip {
    pub fn new(name: impl Into<String>, duration: f32, tracks: Vec<KeyframeTrack>) -> Self {
        Self {
            name: name.into(),
            duration,
            tracks,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

/// Remove root-motion position tracks so the controller alone moves the body
///
/// A track is dropped when it animates `.position` on any of `root_bones`.
pub fn strip_root_motion(mut clip: AnimationClip, root_bones: &[&str]) -> AnimationClip {
    let before = clip.tracks.len();
    clip.tracks.retain(|track| {
        !track.name.contains(".position") || !root_bones.iter().any(|bone| track.name.contains(bone))
    });

    let removed = before - clip.tracks.len();
    if removed > 0 {
        log::debug!("[ANIMATION] Stripped {} root-motion track(s) from '{}'", removed, clip.name);
    }
    clip
}
