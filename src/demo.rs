//! Procedural demo scene for the headless runner
//!
//! Builds a small rig (a two-bone pendulum with a looping swing clip), a
//! camera, and a pair of lights, entirely from code, so the demo exercises
//! the whole frame pipeline without touching any asset files.

use std::f32::consts::FRAC_PI_4;
use std::sync::Arc;

use anyhow::{Context, Result};
use glam::{Mat4, Quat, Vec3, Vec4};

use polaris_anim::{AnimationSystem, Animator};
use polaris_assets::{
    AnimationClip, AssetServer, Bone, BonePose, Channel, ChannelPath, Interpolation, MeshAsset,
    Model, Sampler, Skeleton,
};
use polaris_core::{Color, Transform};
use polaris_ecs::{Entity, Nexus, Signature};
use polaris_render::{Camera, CameraSystem, ExtractSystem, Light, LightingSystem, OrbitState};

use crate::settings::EngineSettings;

/// Quaternion keyframe value in the sampler's w,x,y,z layout.
fn quat_key(q: Quat) -> Vec4 {
    Vec4::new(q.w, q.x, q.y, q.z)
}

/// A two-bone pendulum: the root swings around Z, the tip hangs one unit below.
fn pendulum_mesh() -> Result<MeshAsset> {
    let skeleton = Skeleton::new(vec![
        Bone {
            name: "pivot".to_string(),
            parent: None,
            inverse_bind: Mat4::IDENTITY,
            rest: BonePose {
                translation: Vec3::new(0.0, 2.0, 0.0),
                ..BonePose::IDENTITY
            },
        },
        Bone {
            name: "weight".to_string(),
            parent: Some(0),
            inverse_bind: Mat4::from_translation(Vec3::new(0.0, -1.0, 0.0)),
            rest: BonePose {
                translation: Vec3::new(0.0, -1.0, 0.0),
                ..BonePose::IDENTITY
            },
        },
    ])
    .context("pendulum skeleton is malformed")?;

    // 2-second swing: rest, +45 degrees, rest, -45 degrees, rest.
    let swing = AnimationClip::new(
        "swing",
        vec![Channel {
            sampler: 0,
            target_bone: 0,
            path: ChannelPath::Rotation,
        }],
        vec![Sampler {
            timestamps: vec![0.0, 0.5, 1.0, 1.5, 2.0],
            values: vec![
                quat_key(Quat::IDENTITY),
                quat_key(Quat::from_rotation_z(FRAC_PI_4)),
                quat_key(Quat::IDENTITY),
                quat_key(Quat::from_rotation_z(-FRAC_PI_4)),
                quat_key(Quat::IDENTITY),
            ],
            interpolation: Interpolation::Linear,
        }],
    );

    let mut mesh = MeshAsset::empty("pendulum");
    mesh.skeleton = Some(skeleton);
    mesh.animations = vec![swing];
    Ok(mesh)
}

/// Register all component types and the fixed system order:
/// camera, lighting, animation, extraction.
pub fn register(nexus: &mut Nexus) -> Result<()> {
    nexus.register_component::<Transform>()?;
    nexus.register_component::<Camera>()?;
    nexus.register_component::<Light>()?;
    nexus.register_component::<Model>()?;
    nexus.register_component::<Animator>()?;

    let transform = nexus.component_id::<Transform>()?;
    let camera = nexus.component_id::<Camera>()?;
    let light = nexus.component_id::<Light>()?;
    let model = nexus.component_id::<Model>()?;
    let animator = nexus.component_id::<Animator>()?;

    nexus.register_system(CameraSystem)?;
    nexus.set_system_signature::<CameraSystem>(Signature::from_ids(&[camera]))?;

    nexus.register_system(LightingSystem)?;
    nexus.set_system_signature::<LightingSystem>(Signature::from_ids(&[transform, light]))?;

    nexus.register_system(AnimationSystem)?;
    nexus.set_system_signature::<AnimationSystem>(Signature::from_ids(&[model, animator]))?;

    nexus.register_system(ExtractSystem)?;
    nexus.set_system_signature::<ExtractSystem>(Signature::from_ids(&[transform, model]))?;

    Ok(())
}

/// Populate the scene. Returns the animated rig entity.
pub fn spawn(
    nexus: &mut Nexus,
    assets: &Arc<AssetServer>,
    settings: &EngineSettings,
) -> Result<Entity> {
    // Camera orbiting the pendulum's pivot.
    let cam = nexus.create_entity()?;
    nexus.add_component(cam, Transform::default())?;
    nexus.add_component(
        cam,
        Camera {
            fov_y: settings.camera.fov_degrees.to_radians(),
            aspect: settings.camera.aspect,
            orbit: OrbitState {
                distance: settings.camera.orbit_distance,
                target: Vec3::new(0.0, 2.0, 0.0),
                ..OrbitState::default()
            },
            ..Camera::default()
        },
    )?;

    // Sun plus a warm fill light.
    let sun = nexus.create_entity()?;
    nexus.add_component(
        sun,
        Transform::from_position_rotation(
            Vec3::new(0.0, 20.0, 0.0),
            Quat::from_rotation_x(-1.0),
        ),
    )?;
    nexus.add_component(sun, Light::directional(Color::WHITE, 1.0))?;

    let lamp = nexus.create_entity()?;
    nexus.add_component(lamp, Transform::from_position(Vec3::new(2.0, 3.0, 2.0)))?;
    nexus.add_component(lamp, Light::point(Color::from_hex(0xFFAA55), 2.5))?;

    // The animated pendulum rig.
    let handle = assets
        .register_mesh(pendulum_mesh()?)
        .context("failed to register pendulum mesh")?;
    let mesh = assets
        .mesh(handle)
        .context("pendulum mesh missing after registration")?;

    let rig = nexus.create_entity()?;
    nexus.add_component(rig, Transform::default())?;
    nexus.add_component(rig, Model::new(mesh.clone()))?;
    let mut animator = Animator::for_mesh(&mesh);
    animator
        .play(&mesh, "swing", true)
        .context("swing clip missing from pendulum mesh")?;
    nexus.add_component(rig, animator)?;

    // A static prop to exercise the unskinned draw path.
    let floor_handle = assets
        .register_mesh(MeshAsset::empty("floor"))
        .context("failed to register floor mesh")?;
    let floor_mesh = assets
        .mesh(floor_handle)
        .context("floor mesh missing after registration")?;
    let floor = nexus.create_entity()?;
    nexus.add_component(floor, Transform::default())?;
    let mut floor_model = Model::new(floor_mesh);
    floor_model.drop_shadow = false;
    nexus.add_component(floor, floor_model)?;

    Ok(rig)
}
