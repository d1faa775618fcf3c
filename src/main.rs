use std::f32::consts::TAU;

use anyhow::{Context, Result};
use clap::Parser;
use glam::Vec3;
use log::{info, warn};

use gallery_xr::catalog;
use gallery_xr::cli::Cli;
use gallery_xr::config::Config;
use gallery_xr::frame::FixedFrames;
use gallery_xr::gallery::Gallery;
use gallery_xr::manager::XrManager;
use gallery_xr::registry::Payload;
use gallery_xr::session::SessionToggle;
use gallery_xr::sim::{controller_pose, RecordingScene, SimulatedRuntime};
use gallery_xr::traits::Handedness;

/// Standing eye-level controller position in the middle of the room
const HAND_POSITION: Vec3 = Vec3::new(0.0, 4.5, 0.0);
/// Slight upward tilt toward the panel centers
const HAND_PITCH: f32 = 0.05;
/// Seconds for one full turn of the sweeping controller
const SWEEP_PERIOD: f32 = 12.0;
/// Frames between trigger pulls, and how long each is held
const PULL_EVERY: u64 = 90;
const PULL_HOLD: u64 = 10;
/// Frame at which the second controller wakes up
const SECOND_HAND_AT: u64 = 180;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.quiet { "warn" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let config = match &cli.config {
        Some(path) => Config::load(path).with_context(|| format!("Failed to load config {:?}", path))?,
        None => Config::default(),
    };
    let artworks = match &cli.catalog {
        Some(path) => catalog::load(path)?,
        None => catalog::bundled()?,
    };

    let mut runtime = SimulatedRuntime::new(true);
    let mut scene = RecordingScene::default();

    let mut toggle = SessionToggle::default();
    pollster::block_on(toggle.check_support(&runtime));
    if let Some(label) = toggle.label() {
        info!("Session toggle shows {:?}", label);
    }
    if let Err(err) = pollster::block_on(toggle.toggle(&mut runtime)) {
        warn!("Continuing without an immersive session: {}", err);
    }

    let mut manager = XrManager::new(config.xr.clone());
    manager
        .initialize(&mut runtime, &mut scene)
        .context("Failed to initialize XR controllers")?;
    let gallery = Gallery::mount(manager.registry(), config.gallery.clone(), &artworks)
        .context("Failed to mount artwork panels")?;

    manager.set_selection_observer(|event, payload| match payload {
        Payload::ArtworkPanel(panel) => info!(
            "Controller {} selected {:?} ({:.2}m away)",
            event.controller_index,
            panel.artwork.as_ref().map(|a| a.caption()),
            event.distance
        ),
        Payload::ClosePanel { .. } => info!("Controller {} closed the info panel", event.controller_index),
    });

    let sink = manager.event_sink();
    runtime.connect(0, controller_pose(HAND_POSITION, 0.0, HAND_PITCH));
    runtime.set_handedness(0, Handedness::Right);

    let mut selections = 0;
    for frame in FixedFrames::new(cli.hz).take(cli.frames as usize) {
        let yaw = frame.time / SWEEP_PERIOD * TAU;
        runtime.set_pose(0, controller_pose(HAND_POSITION, yaw, HAND_PITCH));

        if frame.number == SECOND_HAND_AT {
            runtime.connect(1, controller_pose(HAND_POSITION, yaw + TAU / 2.0, HAND_PITCH));
            runtime.set_handedness(1, Handedness::Left);
        }
        runtime.set_pose(1, controller_pose(HAND_POSITION, yaw + TAU / 2.0, HAND_PITCH));

        match frame.number % PULL_EVERY {
            0 if frame.number > 0 => {
                sink.select_start(0);
            }
            PULL_HOLD => {
                sink.select_end(0);
            }
            _ => {}
        }
        if frame.number > SECOND_HAND_AT && frame.number % (PULL_EVERY * 2) == PULL_EVERY / 2 {
            sink.select_start(1);
            sink.select_end(1);
        }

        selections += manager.update(&runtime, &mut scene).len();
    }

    info!(
        "Ran {} frames: {} selections, info panel showing {:?}",
        cli.frames,
        selections,
        gallery.selected().map(|selected| selected.artwork.title.clone())
    );

    if let Err(err) = pollster::block_on(toggle.toggle(&mut runtime)) {
        warn!("Failed to leave VR: {}", err);
    }
    manager.dispose(&mut scene);
    drop(gallery);
    info!("{} scene nodes left after dispose", scene.len());

    Ok(())
}
