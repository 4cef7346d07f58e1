//! Polaris ECS - Entity Component System
//!
//! A signature-based ECS: each registered component type is assigned a bit in a
//! fixed-width [`Signature`], each entity carries the signature of the components
//! it currently holds, and each system declares a required signature. The registry
//! keeps every system's tracked entity set exactly in sync with component
//! add/remove traffic, so per-frame updates iterate only matching entities.
//!
//! Components live in sparse-set stores (dense values, O(1) insert/remove/lookup)
//! and entities are generational handles, so stale ids are detected rather than
//! silently aliasing recycled slots. All access goes through the [`Nexus`] facade.

mod entity;
mod error;
mod nexus;
mod resource;
mod signature;
mod store;
mod system;

pub use entity::Entity;
pub use error::EcsError;
pub use nexus::{Nexus, DEFAULT_MAX_ENTITIES};
pub use signature::{ComponentId, Signature, MAX_COMPONENT_TYPES};
pub use store::Component;
pub use system::{System, SystemId};
