/// Stride demo executable
/// Runs the locomotion pipeline headless through a scripted input session:
/// capture the pointer, walk, sprint, look around, zoom and stop.

use std::path::PathBuf;

use anyhow::{Context, Result};
use stride_engine::ecs::{AnimationState, Movement, Transform};
use stride_engine::{
    scene_rng, EngineConfig, EventResponse, FrameDriver, HeadlessCollaborators, InMemoryAssets, InputEvent, KeyCode,
};
use winit::event::{ElementState, MouseScrollDelta};
use winit::keyboard::PhysicalKey;

const FRAME_TIME: f32 = 1.0 / 60.0;

fn load_config() -> Result<EngineConfig> {
    match std::env::args().nth(1).map(PathBuf::from) {
        Some(path) => EngineConfig::from_path(&path)
            .with_context(|| format!("loading config from {}", path.display())),
        None => Ok(EngineConfig::default()),
    }
}

fn key(driver: &FrameDriver, code: KeyCode, state: ElementState) {
    if let Some(event) = InputEvent::from_winit_key(PhysicalKey::Code(code), state) {
        driver.handle_event(event);
    }
}

fn run_frames(driver: &mut FrameDriver, frames: usize) {
    for _ in 0..frames {
        driver.frame(FRAME_TIME);
    }
}

fn report(driver: &FrameDriver, label: &str) -> Result<()> {
    let player = driver.player().context("no player spawned")?;
    let world = driver.world();
    let movement = world.component::<Movement>(player)?;
    let position = world.component::<Transform>(player)?.position;
    let w = world.component::<AnimationState>(player)?.weights;

    log::info!(
        "[DEMO] {:<10} speed {:.2} pos ({:.2}, {:.2}, {:.2}) weights idle {:.2} walk {:.2} run {:.2}",
        label,
        movement.current_speed,
        position.x,
        position.y,
        position.z,
        w.idle,
        w.walk,
        w.run
    );
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = load_config()?;
    log::info!("[ENGINE] Starting Stride demo");

    let headless = HeadlessCollaborators::new(&config);
    let assets = InMemoryAssets::demo_set(&config.assets);
    let mut rng = scene_rng(&config.scene);
    let mut driver = FrameDriver::new(config, headless.shared());

    let player = pollster::block_on(driver.spawn_player(&assets)).context("spawning player")?;
    driver.spawn_camera(Some(player));
    driver.spawn_reference_cubes(&mut rng);

    // The host grants capture when the click asks for it
    if driver.handle_event(InputEvent::Click) == EventResponse::RequestPointerCapture {
        driver.pointer_capture_changed(true);
    }
    run_frames(&mut driver, 1);
    report(&driver, "idle")?;

    key(&driver, KeyCode::KeyW, ElementState::Pressed);
    run_frames(&mut driver, 60);
    report(&driver, "walk")?;

    key(&driver, KeyCode::ShiftLeft, ElementState::Pressed);
    run_frames(&mut driver, 90);
    report(&driver, "sprint")?;

    for _ in 0..30 {
        driver.handle_event(InputEvent::from_mouse_motion((8.0, 0.0)));
        driver.frame(FRAME_TIME);
    }
    report(&driver, "turn")?;

    driver.handle_event(InputEvent::from_winit_scroll(MouseScrollDelta::LineDelta(0.0, -2.0)));
    key(&driver, KeyCode::ShiftLeft, ElementState::Released);
    key(&driver, KeyCode::KeyW, ElementState::Released);
    run_frames(&mut driver, 120);
    report(&driver, "stop")?;

    driver.pointer_capture_changed(false);
    driver.frame(FRAME_TIME);

    log::info!(
        "[RENDER] {} frames rendered, {} nodes in scene",
        headless.renderer.borrow().frames_rendered,
        headless.scene.borrow().node_count()
    );
    Ok(())
}
