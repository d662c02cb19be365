/// Asset loading
///
/// Models and their animation clips arrive asynchronously from an
/// `AssetSource`. Every load is raced against a timer and retried a bounded
/// number of times; a load that still fails is reported and the caller never
/// creates the entity that needed it.

use std::cell::RefCell;
use std::time::Duration;

use futures::future::{select, Either, LocalBoxFuture};
use futures_timer::Delay;
use rustc_hash::FxHashMap;

use crate::animation::{strip_root_motion, AnimationClip, KeyframeTrack, LocomotionClip};
use crate::config::AssetConfig;
use crate::constants::assets::ROOT_BONES;
use crate::error::{asset_load_error, EngineError, EngineResult};

/// A loaded skinned model and the clips stored alongside it
#[derive(Debug, Clone, PartialEq)]
pub struct ModelData {
    pub name: String,
    pub clips: Vec<AnimationClip>,
}

impl ModelData {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            clips: Vec::new(),
        }
    }

    pub fn with_clip(mut self, clip: AnimationClip) -> Self {
        self.clips.push(clip);
        self
    }
}

/// Where model files come from
pub trait AssetSource {
    fn load<'a>(&'a self, path: &'a str) -> LocalBoxFuture<'a, EngineResult<ModelData>>;
}

/// Timeout and retry policy for every load
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadPolicy {
    pub timeout: Duration,
    /// Extra attempts after the first failure
    pub retries: u32,
}

impl LoadPolicy {
    pub fn from_config(config: &AssetConfig) -> Self {
        Self {
            timeout: Duration::from_millis(config.load_timeout_ms),
            retries: config.load_retries,
        }
    }
}

/// Log load progress as a percentage when the total is known
pub fn log_progress(path: &str, loaded: u64, total: u64) {
    if total == 0 {
        log::debug!("[ASSETS] {}: {} bytes loaded", path, loaded);
    } else {
        let progress = (loaded as f64 / total as f64) * 100.0;
        log::info!("[ASSETS] {}: {:.1}% loaded", path, progress);
    }
}

/// Race a load against the policy timeout
async fn with_timeout<T>(
    path: &str,
    timeout: Duration,
    future: LocalBoxFuture<'_, EngineResult<T>>,
) -> EngineResult<T> {
    match select(future, Delay::new(timeout)).await {
        Either::Left((result, _)) => result,
        Either::Right(_) => Err(EngineError::AssetTimeout {
            path: path.to_string(),
            timeout_ms: timeout.as_millis() as u64,
        }),
    }
}

/// Load a model, retrying failures and timeouts up to `policy.retries` times
pub async fn load_with_policy(
    source: &dyn AssetSource,
    path: &str,
    policy: &LoadPolicy,
) -> EngineResult<ModelData> {
    let mut attempt = 0;
    loop {
        attempt += 1;
        match with_timeout(path, policy.timeout, source.load(path)).await {
            Ok(model) => return Ok(model),
            Err(error) if attempt <= policy.retries => {
                log::warn!(
                    "[ASSETS] Retrying '{}' ({}/{}): {}",
                    path,
                    attempt,
                    policy.retries,
                    error
                );
            }
            Err(error) => {
                log::error!("[ASSETS] Giving up on '{}' after {} attempt(s): {}", path, attempt, error);
                return Err(error);
            }
        }
    }
}

/// Load the first clip of an animation file with root motion removed
pub async fn load_clip(source: &dyn AssetSource, path: &str, policy: &LoadPolicy) -> EngineResult<AnimationClip> {
    let model = load_with_policy(source, path, policy).await?;
    let clip = model
        .clips
        .into_iter()
        .next()
        .ok_or_else(|| EngineError::MissingClip { path: path.to_string() })?;
    Ok(strip_root_motion(clip, &ROOT_BONES))
}

/// Everything a locomotion character needs before it can join the world
#[derive(Debug, Clone)]
pub struct LocomotionAssets {
    pub model: ModelData,
    clips: FxHashMap<LocomotionClip, AnimationClip>,
}

impl LocomotionAssets {
    pub fn clip(&self, clip: LocomotionClip) -> Option<&AnimationClip> {
        self.clips.get(&clip)
    }
}

/// Load the player model, then its idle, walk and run clips in turn
///
/// Clips are renamed to their locomotion role so mixers key them uniquely.
pub async fn load_locomotion_assets(source: &dyn AssetSource, config: &AssetConfig) -> EngineResult<LocomotionAssets> {
    let policy = LoadPolicy::from_config(config);

    log::info!("[ASSETS] Loading model '{}'", config.model_path);
    let model = load_with_policy(source, &config.model_path, &policy).await?;

    let mut clips = FxHashMap::default();
    for (role, path) in [
        (LocomotionClip::Idle, &config.idle_clip),
        (LocomotionClip::Walk, &config.walk_clip),
        (LocomotionClip::Run, &config.run_clip),
    ] {
        let clip = load_clip(source, path, &policy).await?;
        clips.insert(role, clip.with_name(role.as_str()));
    }

    log::info!("[ASSETS] Loaded '{}' with {} locomotion clips", model.name, clips.len());
    Ok(LocomotionAssets { model, clips })
}

#[derive(Debug, Clone)]
enum Entry {
    Ready(ModelData),
    Failing(String),
    /// Fails the given number of times, then succeeds
    Flaky(ModelData, u32),
}

/// Asset source backed by a map of preloaded models
#[derive(Debug, Default)]
pub struct InMemoryAssets {
    entries: FxHashMap<String, Entry>,
    latency: Option<Duration>,
    attempts: RefCell<FxHashMap<String, u32>>,
}

impl InMemoryAssets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, model: ModelData) {
        self.entries.insert(path.into(), Entry::Ready(model));
    }

    pub fn insert_failure(&mut self, path: impl Into<String>, reason: impl Into<String>) {
        self.entries.insert(path.into(), Entry::Failing(reason.into()));
    }

    pub fn insert_flaky(&mut self, path: impl Into<String>, model: ModelData, failures: u32) {
        self.entries.insert(path.into(), Entry::Flaky(model, failures));
    }

    /// Delay every load by `latency`
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// How many times `path` has been requested
    pub fn attempts(&self, path: &str) -> u32 {
        self.attempts.borrow().get(path).copied().unwrap_or(0)
    }

    /// The player model and three locomotion clips at the configured paths
    pub fn demo_set(config: &AssetConfig) -> Self {
        let mut assets = Self::new();
        assets.insert(&config.model_path, ModelData::new("Y Bot"));
        for (path, duration) in [(&config.idle_clip, 2.0), (&config.walk_clip, 1.1), (&config.run_clip, 0.7)] {
            assets.insert(path, ModelData::new(path.as_str()).with_clip(mixamo_clip(duration)));
        }
        assets
    }

    fn resolve(&self, path: &str, attempt: u32) -> EngineResult<ModelData> {
        match self.entries.get(path) {
            Some(Entry::Ready(model)) => Ok(model.clone()),
            Some(Entry::Failing(reason)) => Err(asset_load_error(path, reason)),
            Some(Entry::Flaky(model, failures)) => {
                if attempt > *failures {
                    Ok(model.clone())
                } else {
                    Err(asset_load_error(path, format!("transient failure {}", attempt)))
                }
            }
            None => Err(asset_load_error(path, "not found")),
        }
    }
}

impl AssetSource for InMemoryAssets {
    fn load<'a>(&'a self, path: &'a str) -> LocalBoxFuture<'a, EngineResult<ModelData>> {
        Box::pin(async move {
            let attempt = {
                let mut attempts = self.attempts.borrow_mut();
                let count = attempts.entry(path.to_string()).or_insert(0);
                *count += 1;
                *count
            };

            if let Some(latency) = self.latency {
                Delay::new(latency).await;
            }

            let result = self.resolve(path, attempt);
            if result.is_ok() {
                log_progress(path, 1, 1);
            }
            result
        })
    }
}

/// A clip shaped like a Mixamo export: hips carry root motion
fn mixamo_clip(duration: f32) -> AnimationClip {
    AnimationClip::new(
        "mixamo.com",
        duration,
        vec![
            KeyframeTrack::new(
                "mixamorig:Hips.position",
                vec![0.0, duration],
                vec![0.0, 100.0, 0.0, 0.0, 100.0, 150.0 * duration],
            ),
            KeyframeTrack::new(
                "mixamorig:Hips.quaternion",
                vec![0.0, duration],
                vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0],
            ),
            KeyframeTrack::new(
                "mixamorig:Spine.quaternion",
                vec![0.0, duration],
                vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0],
            ),
        ],
    )
}
