use glam::Vec3;

use polaris_core::Color;

/// What kind of light an entity emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightKind {
    /// Infinitely distant light; direction comes from the entity's transform.
    Directional,
    /// Positional light radiating in all directions.
    Point,
}

/// Light component. Position and direction come from the entity's `Transform`.
#[derive(Debug, Clone, Copy)]
pub struct Light {
    pub kind: LightKind,
    pub color: Color,
    pub intensity: f32,
    pub casts_shadows: bool,
}

impl Light {
    pub fn directional(color: Color, intensity: f32) -> Self {
        Self {
            kind: LightKind::Directional,
            color,
            intensity,
            casts_shadows: true,
        }
    }

    pub fn point(color: Color, intensity: f32) -> Self {
        Self {
            kind: LightKind::Point,
            color,
            intensity,
            casts_shadows: false,
        }
    }
}

/// Orbit parameters for a third-person style camera.
#[derive(Debug, Clone, Copy)]
pub struct OrbitState {
    /// Horizontal angle in radians.
    pub yaw: f32,
    /// Vertical angle in radians, clamped to avoid the poles.
    pub pitch: f32,
    /// Distance from the target point.
    pub distance: f32,
    /// World-space point the camera orbits.
    pub target: Vec3,
}

impl Default for OrbitState {
    fn default() -> Self {
        Self {
            yaw: 0.0,
            pitch: -0.4,
            distance: 5.0,
            target: Vec3::ZERO,
        }
    }
}

impl OrbitState {
    /// Camera eye position for the current orbit angles.
    pub fn eye(&self) -> Vec3 {
        let cos_pitch = self.pitch.cos();
        let offset = Vec3::new(
            self.yaw.sin() * cos_pitch,
            -self.pitch.sin(),
            self.yaw.cos() * cos_pitch,
        ) * self.distance;
        self.target + offset
    }
}

/// Camera component: projection parameters plus orbit-control state.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    /// Vertical field of view in radians.
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    /// Offset applied to the orbit target (e.g. to look over a shoulder).
    pub offset: Vec3,
    pub orbit: OrbitState,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            fov_y: 60f32.to_radians(),
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 512.0,
            offset: Vec3::ZERO,
            orbit: OrbitState::default(),
        }
    }
}
