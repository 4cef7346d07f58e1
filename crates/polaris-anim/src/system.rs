use glam::Quat;
use tracing::warn;

use polaris_assets::{AnimationClip, ChannelPath, MeshAsset, Model};
use polaris_ecs::{Entity, Nexus, System};

use crate::animator::Animator;
use crate::sampler::interpolate;
use crate::skinning::compute_skinning_matrices;

/// Per-frame skeletal animation: advances every playing animator, evaluates
/// its clip's channels into the entity's pose, and composes skinning matrices.
/// Tracks entities with both a `Model` and an `Animator`.
pub struct AnimationSystem;

impl System for AnimationSystem {
    fn update(&mut self, nexus: &mut Nexus, entities: &[Entity], dt: f32) {
        for &entity in entities {
            let Ok(model) = nexus.get_component::<Model>(entity) else {
                continue;
            };
            let mesh = model.mesh.clone();
            let Ok(animator) = nexus.get_component_mut::<Animator>(entity) else {
                continue;
            };
            evaluate(animator, &mesh, dt);
        }
    }
}

/// Advance one animator by `dt` against its mesh. No-op unless the animator is
/// playing and the mesh has a skeleton.
fn evaluate(animator: &mut Animator, mesh: &MeshAsset, dt: f32) {
    if !animator.is_playing() {
        return;
    }
    let Some(skeleton) = mesh.skeleton.as_ref() else {
        return;
    };
    let Some(clip) = animator.clip().and_then(|name| mesh.find_animation(name)) else {
        warn!(
            mesh = %mesh.name,
            clip = ?animator.clip(),
            "playing clip no longer exists on mesh, holding pose"
        );
        return;
    };

    animator.advance(dt, clip.duration());
    apply_channels(animator, clip, &mesh.name);

    // Matrices are composed once, after every channel has been applied, so
    // children always see their parent's final transform.
    let (pose, matrices) = animator.pose_and_matrices_mut();
    compute_skinning_matrices(skeleton, pose, matrices);
}

/// Write each valid channel's sampled value into the animator's pose.
/// Out-of-range sampler or bone indices skip the channel with a warning.
fn apply_channels(animator: &mut Animator, clip: &AnimationClip, mesh_name: &str) {
    let t = animator.time();
    let pose = animator.pose_mut();
    for (index, channel) in clip.channels().iter().enumerate() {
        let Some(sampler) = clip.samplers().get(channel.sampler) else {
            warn!(
                mesh = mesh_name,
                clip = clip.name(),
                channel = index,
                sampler = channel.sampler,
                "channel sampler index out of range, skipping"
            );
            continue;
        };
        let Some(bone_pose) = pose.get_mut(channel.target_bone) else {
            warn!(
                mesh = mesh_name,
                clip = clip.name(),
                channel = index,
                bone = channel.target_bone,
                "channel target bone out of range, skipping"
            );
            continue;
        };

        let value = interpolate(sampler, t);
        match channel.path {
            ChannelPath::Translation => bone_pose.translation = value.truncate(),
            ChannelPath::Rotation => {
                // Samples are quaternions in w,x,y,z order. Linear blending
                // drifts off unit length, so renormalize before use.
                let q = Quat::from_xyzw(value.y, value.z, value.w, value.x);
                bone_pose.rotation = if q.length_squared() > 1e-12 {
                    q.normalize()
                } else {
                    Quat::IDENTITY
                };
            }
            ChannelPath::Scale => bone_pose.scale = value.truncate(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Mat4, Vec3, Vec4};
    use polaris_assets::{Bone, BonePose, Channel, Interpolation, Sampler, Skeleton};
    use polaris_ecs::Signature;
    use std::sync::Arc;

    fn two_bone_skeleton() -> Skeleton {
        Skeleton::new(vec![
            Bone {
                name: "root".to_string(),
                parent: None,
                inverse_bind: Mat4::IDENTITY,
                rest: BonePose::IDENTITY,
            },
            Bone {
                name: "tip".to_string(),
                parent: Some(0),
                inverse_bind: Mat4::IDENTITY,
                rest: BonePose {
                    translation: Vec3::new(0.0, 1.0, 0.0),
                    ..BonePose::IDENTITY
                },
            },
        ])
        .unwrap()
    }

    /// A 2-second clip sliding the root from the origin to (1, 0, 0).
    fn slide_clip() -> AnimationClip {
        AnimationClip::new(
            "slide",
            vec![Channel {
                sampler: 0,
                target_bone: 0,
                path: ChannelPath::Translation,
            }],
            vec![Sampler {
                timestamps: vec![0.0, 2.0],
                values: vec![Vec4::ZERO, Vec4::new(1.0, 0.0, 0.0, 0.0)],
                interpolation: Interpolation::Linear,
            }],
        )
    }

    fn skinned_mesh(clips: Vec<AnimationClip>) -> Arc<MeshAsset> {
        let mut mesh = MeshAsset::empty("rig");
        mesh.skeleton = Some(two_bone_skeleton());
        mesh.animations = clips;
        Arc::new(mesh)
    }

    fn animated_nexus(mesh: &Arc<MeshAsset>) -> (Nexus, polaris_ecs::Entity) {
        let mut nexus = Nexus::with_capacity(16);
        nexus.register_component::<Model>().unwrap();
        nexus.register_component::<Animator>().unwrap();
        nexus.register_system(AnimationSystem).unwrap();
        let required = Signature::from_ids(&[
            nexus.component_id::<Model>().unwrap(),
            nexus.component_id::<Animator>().unwrap(),
        ]);
        nexus.set_system_signature::<AnimationSystem>(required).unwrap();

        let entity = nexus.create_entity().unwrap();
        nexus.add_component(entity, Model::new(mesh.clone())).unwrap();
        nexus
            .add_component(entity, Animator::for_mesh(mesh))
            .unwrap();
        (nexus, entity)
    }

    #[test]
    fn tick_animates_pose_and_matrices() {
        let mesh = skinned_mesh(vec![slide_clip()]);
        let (mut nexus, entity) = animated_nexus(&mesh);
        nexus
            .get_component_mut::<Animator>(entity)
            .unwrap()
            .play(&mesh, "slide", false)
            .unwrap();

        nexus.tick(1.0);
        let animator = nexus.get_component::<Animator>(entity).unwrap();
        assert_eq!(animator.time(), 1.0);
        assert!((animator.pose()[0].translation.x - 0.5).abs() < 1e-6);
        // Child skinning matrix carries both the animated root offset and its
        // own rest translation.
        let tip = animator.matrices()[1].col(3).truncate();
        assert!((tip - Vec3::new(0.5, 1.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn stopped_animator_is_untouched() {
        let mesh = skinned_mesh(vec![slide_clip()]);
        let (mut nexus, entity) = animated_nexus(&mesh);
        nexus.tick(1.0);
        let animator = nexus.get_component::<Animator>(entity).unwrap();
        assert_eq!(animator.time(), 0.0);
        assert_eq!(animator.pose()[0].translation, Vec3::ZERO);
    }

    #[test]
    fn unskinned_mesh_is_skipped() {
        let mesh = Arc::new(MeshAsset::empty("prop"));
        let mut nexus = Nexus::with_capacity(16);
        nexus.register_component::<Model>().unwrap();
        nexus.register_component::<Animator>().unwrap();
        nexus.register_system(AnimationSystem).unwrap();
        let required = Signature::from_ids(&[
            nexus.component_id::<Model>().unwrap(),
            nexus.component_id::<Animator>().unwrap(),
        ]);
        nexus.set_system_signature::<AnimationSystem>(required).unwrap();
        let entity = nexus.create_entity().unwrap();
        nexus.add_component(entity, Model::new(mesh.clone())).unwrap();
        nexus
            .add_component(entity, Animator::for_mesh(&mesh))
            .unwrap();

        // Nothing to evaluate; the tick must not warn or panic.
        nexus.tick(0.016);
        let animator = nexus.get_component::<Animator>(entity).unwrap();
        assert!(animator.pose().is_empty());
    }

    #[test]
    fn out_of_range_channels_are_skipped() {
        let clip = AnimationClip::new(
            "broken",
            vec![
                Channel {
                    sampler: 9,
                    target_bone: 0,
                    path: ChannelPath::Translation,
                },
                Channel {
                    sampler: 0,
                    target_bone: 42,
                    path: ChannelPath::Scale,
                },
                Channel {
                    sampler: 0,
                    target_bone: 0,
                    path: ChannelPath::Translation,
                },
            ],
            vec![Sampler {
                timestamps: vec![0.0, 1.0],
                values: vec![Vec4::ZERO, Vec4::new(2.0, 0.0, 0.0, 0.0)],
                interpolation: Interpolation::Linear,
            }],
        );
        let mesh = skinned_mesh(vec![clip]);
        let (mut nexus, entity) = animated_nexus(&mesh);
        nexus
            .get_component_mut::<Animator>(entity)
            .unwrap()
            .play(&mesh, "broken", false)
            .unwrap();

        nexus.tick(0.5);
        // The two malformed channels are skipped; the valid one still lands.
        let animator = nexus.get_component::<Animator>(entity).unwrap();
        assert!((animator.pose()[0].translation.x - 1.0).abs() < 1e-6);
    }

    #[test]
    fn rotation_channel_uses_wxyz_order() {
        // A half-turn around Y: quaternion (w=0, x=0, y=1, z=0).
        let clip = AnimationClip::new(
            "turn",
            vec![Channel {
                sampler: 0,
                target_bone: 0,
                path: ChannelPath::Rotation,
            }],
            vec![Sampler {
                timestamps: vec![0.0],
                values: vec![Vec4::new(0.0, 0.0, 1.0, 0.0)],
                interpolation: Interpolation::Step,
            }],
        );
        let mesh = skinned_mesh(vec![clip]);
        let (mut nexus, entity) = animated_nexus(&mesh);
        nexus
            .get_component_mut::<Animator>(entity)
            .unwrap()
            .play(&mesh, "turn", false)
            .unwrap();

        nexus.tick(0.0);
        let animator = nexus.get_component::<Animator>(entity).unwrap();
        let expected = Quat::from_xyzw(0.0, 1.0, 0.0, 0.0);
        assert!(animator.pose()[0].rotation.abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn degenerate_rotation_sample_falls_back_to_identity() {
        let clip = AnimationClip::new(
            "flat",
            vec![Channel {
                sampler: 0,
                target_bone: 0,
                path: ChannelPath::Rotation,
            }],
            vec![Sampler {
                timestamps: vec![0.0],
                values: vec![Vec4::ZERO],
                interpolation: Interpolation::Step,
            }],
        );
        let mesh = skinned_mesh(vec![clip]);
        let (mut nexus, entity) = animated_nexus(&mesh);
        nexus
            .get_component_mut::<Animator>(entity)
            .unwrap()
            .play(&mesh, "flat", false)
            .unwrap();

        nexus.tick(0.0);
        let animator = nexus.get_component::<Animator>(entity).unwrap();
        assert_eq!(animator.pose()[0].rotation, Quat::IDENTITY);
    }

    #[test]
    fn looping_tick_sequence_wraps() {
        let mesh = skinned_mesh(vec![slide_clip()]);
        let (mut nexus, entity) = animated_nexus(&mesh);
        nexus
            .get_component_mut::<Animator>(entity)
            .unwrap()
            .play(&mesh, "slide", true)
            .unwrap();

        nexus.tick(1.2);
        nexus.tick(1.5);
        let animator = nexus.get_component::<Animator>(entity).unwrap();
        assert!((animator.time() - 0.7).abs() < 1e-6);
    }
}
