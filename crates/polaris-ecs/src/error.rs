use crate::entity::Entity;
use crate::signature::MAX_COMPONENT_TYPES;

/// Structural ECS errors. Every variant indicates a call-site bug rather than a
/// runtime condition to recover from; callers are expected to `?` or `expect`
/// these so misuse surfaces immediately.
#[derive(Debug, thiserror::Error)]
pub enum EcsError {
    #[error("entity {0} does not exist or was already destroyed")]
    UnknownEntity(Entity),

    #[error("live entity limit reached ({0})")]
    CapacityExceeded(usize),

    #[error("entity {entity} already has a {component} component")]
    DuplicateComponent {
        entity: Entity,
        component: &'static str,
    },

    #[error("entity {entity} has no {component} component")]
    MissingComponent {
        entity: Entity,
        component: &'static str,
    },

    #[error("component type {0} was never registered")]
    UnregisteredComponent(&'static str),

    #[error("cannot register more than {MAX_COMPONENT_TYPES} component types")]
    ComponentLimitReached,

    #[error("system type {0} was never registered")]
    UnregisteredSystem(&'static str),

    #[error("system type {0} is already registered")]
    DuplicateSystem(&'static str),
}
