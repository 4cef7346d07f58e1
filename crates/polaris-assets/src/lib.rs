//! Polaris Assets - mesh, skeleton, and animation clip assets
//!
//! Assets are immutable once constructed and shared by `Arc`: a mesh owns its
//! skeleton topology and animation clips, while per-entity animation state
//! (the mutable pose) lives in components that index into the shared data.
//! Asset files are parsed by an external loader; this crate only models and
//! registers already-constructed assets.

mod animation;
mod error;
mod handle;
mod mesh;
mod server;
mod skeleton;

pub use animation::{AnimationClip, Channel, ChannelPath, Interpolation, Sampler};
pub use error::AssetError;
pub use handle::{AssetHandle, AssetId};
pub use mesh::{MeshAsset, MeshPrimitive, Model};
pub use server::AssetServer;
pub use skeleton::{Bone, BonePose, Skeleton};
