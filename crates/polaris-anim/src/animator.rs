use glam::Mat4;

use polaris_assets::{BonePose, MeshAsset};

/// Recoverable animation errors. Play requests and channel evaluation degrade
/// gracefully; these never abort a frame.
#[derive(Debug, thiserror::Error)]
pub enum AnimationError {
    #[error("mesh '{mesh}' has no animation clip named '{clip}'")]
    ClipNotFound { mesh: String, clip: String },
}

/// Per-entity animation playback state. Owns the entity's mutable pose and
/// skinning matrices, sized once from the mesh's skeleton and never resized;
/// the skeleton topology and clips stay shared on the mesh asset.
#[derive(Debug, Clone)]
pub struct Animator {
    /// Name of the clip currently playing, if any.
    clip: Option<String>,
    /// Playback position in seconds.
    time: f32,
    looping: bool,
    playing: bool,
    pose: Vec<BonePose>,
    matrices: Vec<Mat4>,
}

impl Animator {
    /// Create an animator for the given mesh, starting at the rest pose.
    pub fn for_mesh(mesh: &MeshAsset) -> Self {
        let pose = mesh
            .skeleton
            .as_ref()
            .map(|s| s.rest_pose())
            .unwrap_or_default();
        let matrices = vec![Mat4::IDENTITY; pose.len()];
        Self {
            clip: None,
            time: 0.0,
            looping: false,
            playing: false,
            pose,
            matrices,
        }
    }

    /// Start playing a named clip from its beginning. On failure the previous
    /// playback state is left untouched.
    pub fn play(
        &mut self,
        mesh: &MeshAsset,
        clip: &str,
        looping: bool,
    ) -> Result<(), AnimationError> {
        if mesh.find_animation(clip).is_none() {
            return Err(AnimationError::ClipNotFound {
                mesh: mesh.name.clone(),
                clip: clip.to_string(),
            });
        }
        self.clip = Some(clip.to_string());
        self.time = 0.0;
        self.looping = looping;
        self.playing = true;
        Ok(())
    }

    /// Stop playback. The pose is left as-is.
    pub fn stop(&mut self) {
        self.playing = false;
    }

    /// Advance the playback position, wrapping when looping and clamping to
    /// the clip duration otherwise. A non-looping clip that reaches its end
    /// stays `playing` and holds the final pose; completion is observable only
    /// through [`finished`](Animator::finished).
    pub(crate) fn advance(&mut self, dt: f32, duration: f32) {
        self.time += dt;
        if self.time > duration {
            if self.looping && duration > 0.0 {
                self.time %= duration;
            } else {
                self.time = duration.max(0.0);
            }
        }
    }

    pub fn clip(&self) -> Option<&str> {
        self.clip.as_deref()
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    /// Whether a non-looping clip has reached its end.
    pub fn finished(&self, mesh: &MeshAsset) -> bool {
        if self.looping || !self.playing {
            return false;
        }
        match self.clip.as_deref().and_then(|c| mesh.find_animation(c)) {
            Some(clip) => self.time >= clip.duration(),
            None => false,
        }
    }

    /// The entity's current per-bone local transforms.
    pub fn pose(&self) -> &[BonePose] {
        &self.pose
    }

    pub(crate) fn pose_mut(&mut self) -> &mut [BonePose] {
        &mut self.pose
    }

    /// The skinning matrices composed from the last evaluated pose.
    pub fn matrices(&self) -> &[Mat4] {
        &self.matrices
    }

    pub(crate) fn pose_and_matrices_mut(&mut self) -> (&[BonePose], &mut [Mat4]) {
        (&self.pose, &mut self.matrices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;
    use polaris_assets::{AnimationClip, Interpolation, Sampler};

    fn mesh_with_clip(duration: f32) -> MeshAsset {
        let mut mesh = MeshAsset::empty("rig");
        mesh.animations.push(AnimationClip::new(
            "swing",
            vec![],
            vec![Sampler {
                timestamps: vec![0.0, duration],
                values: vec![Vec4::ZERO, Vec4::ONE],
                interpolation: Interpolation::Linear,
            }],
        ));
        mesh
    }

    #[test]
    fn play_known_clip() {
        let mesh = mesh_with_clip(2.0);
        let mut animator = Animator::for_mesh(&mesh);
        animator.play(&mesh, "swing", true).unwrap();
        assert!(animator.is_playing());
        assert!(animator.is_looping());
        assert_eq!(animator.time(), 0.0);
        assert_eq!(animator.clip(), Some("swing"));
    }

    #[test]
    fn play_missing_clip_leaves_state() {
        let mesh = mesh_with_clip(2.0);
        let mut animator = Animator::for_mesh(&mesh);
        animator.play(&mesh, "swing", false).unwrap();
        animator.advance(0.5, 2.0);

        let err = animator.play(&mesh, "sprint", true).unwrap_err();
        assert!(matches!(err, AnimationError::ClipNotFound { .. }));
        assert_eq!(animator.clip(), Some("swing"));
        assert_eq!(animator.time(), 0.5);
        assert!(!animator.is_looping());
    }

    #[test]
    fn looping_wraps_by_modulo() {
        let mesh = mesh_with_clip(2.0);
        let mut animator = Animator::for_mesh(&mesh);
        animator.play(&mesh, "swing", true).unwrap();
        animator.advance(1.2, 2.0);
        assert!((animator.time() - 1.2).abs() < 1e-6);
        animator.advance(1.5, 2.0);
        assert!((animator.time() - 0.7).abs() < 1e-6);
    }

    #[test]
    fn non_looping_clamps_and_stays_playing() {
        let mesh = mesh_with_clip(2.0);
        let mut animator = Animator::for_mesh(&mesh);
        animator.play(&mesh, "swing", false).unwrap();
        animator.advance(5.0, 2.0);
        assert_eq!(animator.time(), 2.0);
        assert!(animator.is_playing());
        assert!(animator.finished(&mesh));
    }

    #[test]
    fn looping_clip_never_finishes() {
        let mesh = mesh_with_clip(2.0);
        let mut animator = Animator::for_mesh(&mesh);
        animator.play(&mesh, "swing", true).unwrap();
        animator.advance(10.0, 2.0);
        assert!(!animator.finished(&mesh));
    }
}
