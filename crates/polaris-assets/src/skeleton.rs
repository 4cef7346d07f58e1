use glam::{Mat4, Quat, Vec3};

use crate::error::AssetError;

/// A single bone's local transform relative to its parent. This is both the
/// bind-pose entry stored on a [`Bone`] and the unit of per-entity animated
/// state: an animator clones the skeleton's rest pose once and mutates its own
/// copy every frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BonePose {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl BonePose {
    pub const IDENTITY: BonePose = BonePose {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    /// Local transform matrix for this pose.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

impl Default for BonePose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// One joint of a skeleton. Immutable after load.
#[derive(Debug, Clone)]
pub struct Bone {
    pub name: String,
    /// Index of the parent bone; `None` for the root.
    pub parent: Option<usize>,
    /// Inverse of the bone's bind-pose model-space transform.
    pub inverse_bind: Mat4,
    /// Bind-pose local transform, used as the rest pose.
    pub rest: BonePose,
}

/// Immutable bone hierarchy owned by a mesh asset. Bones are stored so that
/// every parent precedes its children, which lets pose propagation run as a
/// single forward pass.
#[derive(Debug, Clone)]
pub struct Skeleton {
    bones: Vec<Bone>,
}

impl Skeleton {
    /// Build a skeleton, validating the parent ordering invariant.
    pub fn new(bones: Vec<Bone>) -> Result<Self, AssetError> {
        for (i, bone) in bones.iter().enumerate() {
            if let Some(parent) = bone.parent {
                if parent >= i {
                    return Err(AssetError::InvalidSkeleton(format!(
                        "bone '{}' (index {i}) has parent index {parent}, parents must precede children",
                        bone.name
                    )));
                }
            }
        }
        Ok(Self { bones })
    }

    pub fn bones(&self) -> &[Bone] {
        &self.bones
    }

    pub fn bone_count(&self) -> usize {
        self.bones.len()
    }

    /// Clone the bind pose as a fresh per-entity pose buffer.
    pub fn rest_pose(&self) -> Vec<BonePose> {
        self.bones.iter().map(|b| b.rest).collect()
    }
}
