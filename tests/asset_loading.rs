// Stride Engine Asset Loading Integration Tests
//
// Player spawning is all-or-nothing: a failed or timed-out load leaves the
// world, scene and physics untouched.

use std::io::Write;
use std::time::Duration;

use stride_engine::assets::ModelData;
use stride_engine::{EngineConfig, EngineError, FrameDriver, HeadlessCollaborators, InMemoryAssets};

fn driver(config: EngineConfig) -> (FrameDriver, HeadlessCollaborators) {
    let headless = HeadlessCollaborators::new(&config);
    (FrameDriver::new(config, headless.shared()), headless)
}

#[test]
fn test_missing_clip_file_spawns_nothing() {
    println!("🧪 Testing failed player load...");
    let (mut driver, headless) = driver(EngineConfig::default());
    let nodes_before = headless.scene.borrow().node_count();

    let mut assets = InMemoryAssets::demo_set(&driver.config().assets);
    let walk = driver.config().assets.walk_clip.clone();
    assets.insert_failure(walk.as_str(), "404 Not Found");

    let result = pollster::block_on(driver.spawn_player(&assets));

    assert!(matches!(result, Err(EngineError::AssetLoad { ref path, .. }) if *path == walk));
    assert_eq!(driver.player(), None);
    assert_eq!(driver.world().entity_count(), 0);
    assert_eq!(headless.scene.borrow().node_count(), nodes_before);
    assert_eq!(headless.physics.borrow().collider_count(), 0);

    // The pipeline keeps running without a player
    driver.frame(1.0 / 60.0);
    assert_eq!(headless.renderer.borrow().frames_rendered, 1);
    println!("✅ Nothing was created");
}

#[test]
fn test_model_without_clips_is_rejected() {
    let (mut driver, _) = driver(EngineConfig::default());
    let mut assets = InMemoryAssets::demo_set(&driver.config().assets);
    assets.insert(driver.config().assets.idle_clip.clone(), ModelData::new("no animations"));

    let result = pollster::block_on(driver.spawn_player(&assets));

    assert!(matches!(result, Err(EngineError::MissingClip { .. })));
    assert_eq!(driver.world().entity_count(), 0);
}

#[test]
fn test_transient_failure_is_retried() {
    let (mut driver, _) = driver(EngineConfig::default());
    let model_path = driver.config().assets.model_path.clone();
    let mut assets = InMemoryAssets::demo_set(&driver.config().assets);
    assets.insert_flaky(model_path.as_str(), ModelData::new("Y Bot"), 1);

    let player = pollster::block_on(driver.spawn_player(&assets)).expect("retry should recover");

    assert_eq!(driver.player(), Some(player));
    assert_eq!(assets.attempts(&model_path), 2);
}

#[test]
fn test_slow_source_times_out_after_retries() {
    let mut config = EngineConfig::default();
    config.assets.load_timeout_ms = 20;
    config.assets.load_retries = 1;
    let (mut driver, _) = driver(config);

    let assets = InMemoryAssets::demo_set(&driver.config().assets).with_latency(Duration::from_secs(5));
    let result = pollster::block_on(driver.spawn_player(&assets));

    assert!(matches!(result, Err(EngineError::AssetTimeout { timeout_ms: 20, .. })));
    assert_eq!(assets.attempts(&driver.config().assets.model_path), 2);
    assert_eq!(driver.world().entity_count(), 0);
}

#[test]
fn test_asset_paths_from_config_file() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(
        file,
        r#"
[assets]
model_path = "models/hero.fbx"
idle_clip = "anims/hero_idle.fbx"
walk_clip = "anims/hero_walk.fbx"
run_clip = "anims/hero_run.fbx"
player_scale = 0.5
"#
    )
    .unwrap();

    let config = EngineConfig::from_path(file.path()).unwrap();
    assert_eq!(config.assets.model_path, "models/hero.fbx");

    let assets = InMemoryAssets::demo_set(&config.assets);
    let (mut driver, _) = driver(config);
    let player = pollster::block_on(driver.spawn_player(&assets)).unwrap();

    let transform = driver
        .world()
        .entity(player)
        .unwrap()
        .get::<stride_engine::ecs::Transform>()
        .copied()
        .unwrap();
    assert_eq!(transform.scale, glam::Vec3::splat(0.5));
}
