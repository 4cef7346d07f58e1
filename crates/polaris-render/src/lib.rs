//! Polaris Render - render-facing scene data
//!
//! The renderer proper (device, swapchain, pipelines) lives outside the engine
//! core. This crate defines the boundary it reads from once per frame: camera
//! matrices, an ordered light table, and per-model draw items with skinning
//! matrices and batch-filter flags, all published as Nexus resources by the
//! camera, lighting, and extraction systems.

mod components;
mod scene;
mod systems;

pub use components::{Camera, Light, LightKind, OrbitState};
pub use scene::{CameraMatrices, DrawItem, FrameView, GpuLight, LightTable};
pub use systems::{CameraInput, CameraSystem, ExtractSystem, LightingSystem};
