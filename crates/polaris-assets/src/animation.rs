use glam::Vec4;

/// How a sampler blends between keyframes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interpolation {
    /// Hold the previous keyframe's value until the next timestamp.
    Step,
    /// Component-wise linear blend between the surrounding keyframes.
    Linear,
}

/// A keyframe curve: parallel timestamp/value arrays plus an interpolation
/// mode. Values are stored as `Vec4`; rotation channels reinterpret them as
/// quaternions in `w,x,y,z` order.
#[derive(Debug, Clone)]
pub struct Sampler {
    pub timestamps: Vec<f32>,
    pub values: Vec<Vec4>,
    pub interpolation: Interpolation,
}

/// Which transform property of a bone a channel drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelPath {
    Translation,
    Rotation,
    Scale,
}

/// Binds one sampler's output to one bone's one transform property.
#[derive(Debug, Clone)]
pub struct Channel {
    /// Index into the clip's sampler list.
    pub sampler: usize,
    /// Index into the skeleton's bone list.
    pub target_bone: usize,
    pub path: ChannelPath,
}

/// A named, immutable animation asset. Loaded once per mesh; never mutated at
/// runtime.
#[derive(Debug, Clone)]
pub struct AnimationClip {
    name: String,
    duration: f32,
    channels: Vec<Channel>,
    samplers: Vec<Sampler>,
}

impl AnimationClip {
    /// Build a clip. The duration is the largest timestamp across all samplers.
    pub fn new(name: impl Into<String>, channels: Vec<Channel>, samplers: Vec<Sampler>) -> Self {
        let duration = samplers
            .iter()
            .flat_map(|s| s.timestamps.iter().copied())
            .fold(0.0f32, f32::max);
        Self {
            name: name.into(),
            duration,
            channels,
            samplers,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Clip length in seconds.
    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    pub fn samplers(&self) -> &[Sampler] {
        &self.samplers
    }
}
