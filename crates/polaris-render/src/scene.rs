//! Data handed to the render layer, read once per frame.

use std::sync::Arc;

use glam::Mat4;

use polaris_assets::MeshAsset;

/// Camera matrices for the current frame.
#[derive(Clone, Copy, Debug)]
pub struct CameraMatrices {
    pub projection: Mat4,
    pub view: Mat4,
    pub view_inverse: Mat4,
}

impl Default for CameraMatrices {
    fn default() -> Self {
        Self {
            projection: Mat4::IDENTITY,
            view: Mat4::IDENTITY,
            view_inverse: Mat4::IDENTITY,
        }
    }
}

/// One light entry as the shader consumes it.
#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GpuLight {
    /// xyz = world position, w = light kind (0 directional, 1 point)
    pub position: [f32; 4],
    /// xyz = direction, w = 1.0 when the light casts shadows
    pub direction: [f32; 4],
    /// rgb = color, w = intensity
    pub color: [f32; 4],
}

/// Ordered list of the frame's lights, ready to copy into a uniform buffer.
#[derive(Clone, Debug, Default)]
pub struct LightTable {
    pub lights: Vec<GpuLight>,
}

/// One model to draw this frame.
#[derive(Clone)]
pub struct DrawItem {
    pub mesh: Arc<MeshAsset>,
    pub model: Mat4,
    /// Skinning matrices, present only when the mesh has a skeleton.
    pub bone_matrices: Option<Vec<Mat4>>,
    pub drop_shadow: bool,
    pub npr_shading: bool,
}

/// Everything the render layer reads for one frame. Published as a Nexus
/// resource by the extraction system after camera and lighting have run.
#[derive(Clone, Default)]
pub struct FrameView {
    pub camera: CameraMatrices,
    pub lights: Vec<GpuLight>,
    pub draws: Vec<DrawItem>,
}
