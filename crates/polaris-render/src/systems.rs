use glam::{Mat4, Vec2, Vec3};
use tracing::trace;

use polaris_anim::Animator;
use polaris_assets::Model;
use polaris_core::Transform;
use polaris_ecs::{Entity, Nexus, System};

use crate::components::{Camera, Light, LightKind};
use crate::scene::{CameraMatrices, DrawItem, FrameView, GpuLight, LightTable};

const PITCH_LIMIT: f32 = 1.54;
const MIN_ORBIT_DISTANCE: f32 = 0.5;
const MAX_ORBIT_DISTANCE: f32 = 64.0;

/// Raw camera-control deltas for the current frame, pushed by the input layer
/// and consumed (then reset) by [`CameraSystem`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CameraInput {
    /// Orbit angle deltas in radians (x = yaw, y = pitch).
    pub orbit_delta: Vec2,
    /// Change in orbit distance.
    pub zoom_delta: f32,
}

/// Applies the frame's control deltas to every camera's orbit state and
/// publishes the active camera's matrices. Tracks entities with a `Camera`.
pub struct CameraSystem;

impl System for CameraSystem {
    fn update(&mut self, nexus: &mut Nexus, entities: &[Entity], _dt: f32) {
        let input = nexus
            .resource_mut::<CameraInput>()
            .map(|input| std::mem::take(input))
            .unwrap_or_default();

        let mut matrices = None;
        for &entity in entities {
            let Ok(camera) = nexus.get_component_mut::<Camera>(entity) else {
                continue;
            };
            camera.orbit.yaw += input.orbit_delta.x;
            camera.orbit.pitch =
                (camera.orbit.pitch + input.orbit_delta.y).clamp(-PITCH_LIMIT, PITCH_LIMIT);
            camera.orbit.distance = (camera.orbit.distance - input.zoom_delta)
                .clamp(MIN_ORBIT_DISTANCE, MAX_ORBIT_DISTANCE);

            let eye = camera.orbit.eye();
            let target = camera.orbit.target + camera.offset;
            let view = Mat4::look_at_rh(eye, target, Vec3::Y);
            let camera = *camera;
            matrices = Some(CameraMatrices {
                projection: Mat4::perspective_rh(
                    camera.fov_y,
                    camera.aspect,
                    camera.near,
                    camera.far,
                ),
                view,
                view_inverse: view.inverse(),
            });

            // Mirror the computed eye position onto the entity's transform so
            // other systems (audio, culling) can read it.
            if let Ok(transform) = nexus.get_component_mut::<Transform>(entity) {
                transform.position = eye;
            }
        }

        // The last tracked camera wins; a camera-less scene keeps the previous
        // matrices so the renderer never sees garbage mid-transition.
        if let Some(matrices) = matrices {
            nexus.insert_resource(matrices);
        }
    }
}

/// Collects every light entity into the frame's ordered light table. Tracks
/// entities with a `Transform` and a `Light`.
pub struct LightingSystem;

impl System for LightingSystem {
    fn update(&mut self, nexus: &mut Nexus, entities: &[Entity], _dt: f32) {
        let mut table = LightTable::default();
        for &entity in entities {
            let (Ok(transform), Ok(light)) = (
                nexus.get_component::<Transform>(entity),
                nexus.get_component::<Light>(entity),
            ) else {
                continue;
            };
            let position = transform.position;
            let direction = transform.forward();
            let kind = match light.kind {
                LightKind::Directional => 0.0,
                LightKind::Point => 1.0,
            };
            table.lights.push(GpuLight {
                position: [position.x, position.y, position.z, kind],
                direction: [
                    direction.x,
                    direction.y,
                    direction.z,
                    if light.casts_shadows { 1.0 } else { 0.0 },
                ],
                color: [
                    light.color.r,
                    light.color.g,
                    light.color.b,
                    light.intensity,
                ],
            });
        }
        trace!(lights = table.lights.len(), "light table rebuilt");
        nexus.insert_resource(table);
    }
}

/// Builds the [`FrameView`] the render layer reads once per frame. Runs after
/// the camera, lighting, and animation systems in the tick order. Tracks
/// entities with a `Transform` and a `Model`.
pub struct ExtractSystem;

impl System for ExtractSystem {
    fn update(&mut self, nexus: &mut Nexus, entities: &[Entity], _dt: f32) {
        let camera = nexus
            .resource::<CameraMatrices>()
            .copied()
            .unwrap_or_default();
        let lights = nexus
            .resource::<LightTable>()
            .map(|t| t.lights.clone())
            .unwrap_or_default();

        let mut draws = Vec::with_capacity(entities.len());
        for &entity in entities {
            let (Ok(transform), Ok(model)) = (
                nexus.get_component::<Transform>(entity),
                nexus.get_component::<Model>(entity),
            ) else {
                continue;
            };

            let bone_matrices = if model.mesh.has_skeleton() {
                nexus
                    .get_component::<Animator>(entity)
                    .ok()
                    .map(|animator| animator.matrices().to_vec())
            } else {
                None
            };

            draws.push(DrawItem {
                mesh: model.mesh.clone(),
                model: transform.matrix(),
                bone_matrices,
                drop_shadow: model.drop_shadow,
                npr_shading: model.npr_shading,
            });
        }

        trace!(draws = draws.len(), "frame view extracted");
        nexus.insert_resource(FrameView {
            camera,
            lights,
            draws,
        });
    }
}
