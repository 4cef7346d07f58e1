//! Polaris - the runtime core of a real-time 3D engine
//!
//! Headless entry point: builds the ECS, registers the camera, lighting,
//! animation, and extraction systems in their fixed tick order, populates the
//! procedural demo scene, and drives a fixed-timestep frame loop. A windowed
//! renderer would attach by reading the `FrameView` resource after each tick.

mod demo;
mod settings;

use std::sync::Arc;

use anyhow::Result;
use glam::Vec2;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use polaris_anim::Animator;
use polaris_assets::AssetServer;
use polaris_core::FrameClock;
use polaris_ecs::Nexus;
use polaris_render::{CameraInput, FrameView};

use settings::EngineSettings;

fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set subscriber");

    info!("Starting Polaris engine...");

    let settings = EngineSettings::load();
    let assets = Arc::new(AssetServer::new());
    let mut nexus = Nexus::with_capacity(settings.ecs.max_entities);
    info!(
        max_entities = nexus.entity_capacity(),
        "Nexus created"
    );

    demo::register(&mut nexus)?;
    let rig = demo::spawn(&mut nexus, &assets, &settings)?;
    info!(
        entities = nexus.entity_count(),
        meshes = assets.mesh_count(),
        "demo scene spawned"
    );

    let mut clock = FrameClock::new();
    for frame in 0..settings.demo.frames {
        clock.advance(settings.demo.timestep);

        // Stand-in for the input layer: drift the orbit camera slowly.
        nexus.insert_resource(CameraInput {
            orbit_delta: Vec2::new(0.01, 0.0),
            zoom_delta: 0.0,
        });

        nexus.tick(clock.delta());

        if frame % 60 == 0 {
            let animator = nexus.get_component::<Animator>(rig)?;
            let time = animator.time();
            let draws = nexus
                .resource::<FrameView>()
                .map_or(0, |view| view.draws.len());
            info!(frame, time, draws, "frame complete");
        }
    }

    info!(
        frames = settings.demo.frames,
        elapsed = clock.elapsed(),
        "demo finished"
    );
    Ok(())
}
