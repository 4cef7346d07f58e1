use std::sync::Arc;

use crate::animation::AnimationClip;
use crate::skeleton::Skeleton;

/// A loaded mesh asset (renderer-agnostic): vertex data per primitive, plus the
/// optional skeleton and animation clips for skinned meshes. Constructed once
/// by the loading layer and shared read-only from then on.
#[derive(Debug, Clone)]
pub struct MeshAsset {
    pub name: String,
    pub primitives: Vec<MeshPrimitive>,
    pub skeleton: Option<Skeleton>,
    pub animations: Vec<AnimationClip>,
}

/// A single draw primitive within a mesh.
#[derive(Debug, Clone)]
pub struct MeshPrimitive {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub tex_coords: Option<Vec<[f32; 2]>>,
    pub indices: Option<Vec<u32>>,
    /// Index into the material table of the owning asset bundle.
    pub material: Option<usize>,
}

impl MeshAsset {
    /// A mesh with no primitives, skeleton, or clips.
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            primitives: Vec::new(),
            skeleton: None,
            animations: Vec::new(),
        }
    }

    pub fn has_skeleton(&self) -> bool {
        self.skeleton.is_some()
    }

    /// Number of bones, zero for unskinned meshes.
    pub fn bone_count(&self) -> usize {
        self.skeleton.as_ref().map_or(0, |s| s.bone_count())
    }

    /// Look up an animation clip by name.
    pub fn find_animation(&self, name: &str) -> Option<&AnimationClip> {
        self.animations.iter().find(|c| c.name() == name)
    }
}

/// Component attaching a shared mesh asset to an entity, with the per-entity
/// flags the render layer uses to filter draw batches.
#[derive(Debug, Clone)]
pub struct Model {
    pub mesh: Arc<MeshAsset>,
    /// Whether this model casts a drop shadow.
    pub drop_shadow: bool,
    /// Whether this model is drawn with non-photorealistic shading.
    pub npr_shading: bool,
}

impl Model {
    pub fn new(mesh: Arc<MeshAsset>) -> Self {
        Self {
            mesh,
            drop_shadow: true,
            npr_shading: false,
        }
    }
}
