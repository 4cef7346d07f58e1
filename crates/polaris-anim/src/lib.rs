//! Polaris Anim - skeletal animation evaluation
//!
//! Evaluates keyframe clips into per-bone local transforms and composes the
//! skinning matrices the render layer consumes. Runs as an ECS system over
//! `Model` + `Animator` entities; each animator owns only its small mutable
//! pose, indexed against the mesh asset's shared, immutable skeleton and clips.
//!
//! Malformed animation data (missing clips, out-of-range channel indices,
//! empty samplers) degrades to a skipped channel or held pose with a logged
//! warning; it never aborts the frame.

mod animator;
mod sampler;
mod skinning;
mod system;

pub use animator::{Animator, AnimationError};
pub use sampler::interpolate;
pub use skinning::compute_skinning_matrices;
pub use system::AnimationSystem;
