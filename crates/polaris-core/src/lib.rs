//! Polaris Core - foundational types for the Polaris engine
//!
//! This crate provides the types used throughout the engine:
//! - Mathematical primitives (re-exported from glam)
//! - Transform component for entity positioning
//! - Frame clock for per-frame delta time

pub mod time;
pub mod types;

pub use glam::{Mat4, Quat, Vec2, Vec3, Vec4};
pub use time::FrameClock;
pub use types::{Color, Transform};
