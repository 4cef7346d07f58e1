use glam::Mat4;

use polaris_assets::{BonePose, Skeleton};

/// Compose final skinning matrices from a skeleton and a fully evaluated pose.
///
/// Must run once per entity per frame, after every channel of the clip has been
/// applied: a bone's children read the parent's final transform, never a
/// partially updated one. Pass one walks parent-to-child (the skeleton's
/// storage order) accumulating model-space transforms; pass two multiplies in
/// each bone's inverse bind matrix.
pub fn compute_skinning_matrices(skeleton: &Skeleton, pose: &[BonePose], out: &mut [Mat4]) {
    let bones = skeleton.bones();
    let count = bones.len().min(pose.len()).min(out.len());

    for i in 0..count {
        let local = pose[i].matrix();
        out[i] = match bones[i].parent {
            Some(parent) => out[parent] * local,
            None => local,
        };
    }
    for i in 0..count {
        out[i] *= bones[i].inverse_bind;
    }
}
