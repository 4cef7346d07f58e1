use glam::Vec4;

use polaris_assets::{Interpolation, Sampler};

/// Timestamp pairs closer than this are treated as coincident instead of
/// dividing by a near-zero interval.
const MIN_FRAME_DELTA: f32 = 1e-4;

/// Evaluate a keyframe curve at time `t`.
///
/// An empty sampler yields zero; a single keyframe is returned verbatim for
/// every `t` (no extrapolation). Otherwise the surrounding keyframe pair is
/// found by a forward scan for the first timestamp strictly greater than `t`,
/// clamping to the first pair before the curve and the last value past its end.
pub fn interpolate(sampler: &Sampler, t: f32) -> Vec4 {
    let count = sampler.timestamps.len().min(sampler.values.len());
    if count == 0 {
        return Vec4::ZERO;
    }
    if count == 1 {
        return sampler.values[0];
    }

    // Past the last keyframe both indices land on it, holding the final value.
    let next = sampler.timestamps[..count]
        .iter()
        .position(|&ts| ts > t)
        .unwrap_or(count - 1);
    let prev = if t >= sampler.timestamps[count - 1] {
        count - 1
    } else {
        next.saturating_sub(1)
    };

    if sampler.interpolation == Interpolation::Step {
        return sampler.values[prev];
    }

    let t0 = sampler.timestamps[prev];
    let t1 = sampler.timestamps[next];
    let delta = t1 - t0;
    if delta < MIN_FRAME_DELTA {
        return sampler.values[prev];
    }
    let factor = ((t - t0) / delta).clamp(0.0, 1.0);
    sampler.values[prev].lerp(sampler.values[next], factor)
}
