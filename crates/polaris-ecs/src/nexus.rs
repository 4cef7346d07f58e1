use tracing::debug;

use crate::entity::{Entity, EntityManager};
use crate::error::EcsError;
use crate::resource::Resources;
use crate::signature::{ComponentId, Signature};
use crate::store::{Component, ComponentRegistry};
use crate::system::{System, SystemId, SystemRegistry};

/// Default live-entity bound when none is configured.
pub const DEFAULT_MAX_ENTITIES: usize = 4096;

/// The single entry point to the ECS: composes the entity manager, the
/// component stores, and the system registry, and keeps the three consistent.
///
/// Entity destruction is deferred: [`destroy_entity`](Nexus::destroy_entity)
/// queues the entity and the actual teardown happens at the end of
/// [`tick`](Nexus::tick) (or via [`flush_destroyed`](Nexus::flush_destroyed)),
/// so ids handed out during a frame stay valid for the whole frame and no
/// system iterates over a set that is mutated under it.
pub struct Nexus {
    entities: EntityManager,
    components: ComponentRegistry,
    systems: SystemRegistry,
    pending_destroy: Vec<Entity>,
    resources: Resources,
}

impl Nexus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_ENTITIES)
    }

    /// Create a Nexus with a fixed live-entity bound.
    pub fn with_capacity(max_entities: usize) -> Self {
        Self {
            entities: EntityManager::new(max_entities),
            components: ComponentRegistry::new(),
            systems: SystemRegistry::new(),
            pending_destroy: Vec::new(),
            resources: Resources::new(),
        }
    }

    // ---- Entities ----

    pub fn create_entity(&mut self) -> Result<Entity, EcsError> {
        self.entities.create()
    }

    /// Queue an entity for destruction at the end of the current tick. The
    /// entity stays fully alive (components readable, tracked sets unchanged)
    /// until the queue is flushed. Destroying an entity twice in the same
    /// frame reports it as unknown, same as a stale handle.
    pub fn destroy_entity(&mut self, entity: Entity) -> Result<(), EcsError> {
        if !self.entities.is_alive(entity) || self.pending_destroy.contains(&entity) {
            return Err(EcsError::UnknownEntity(entity));
        }
        self.pending_destroy.push(entity);
        Ok(())
    }

    /// Tear down every entity queued by `destroy_entity`: clear its signature,
    /// erase it from every component store and every system's tracked set, and
    /// return its slot to the free list.
    pub fn flush_destroyed(&mut self) {
        if self.pending_destroy.is_empty() {
            return;
        }
        let pending = std::mem::take(&mut self.pending_destroy);
        debug!(count = pending.len(), "flushing destroyed entities");
        for entity in pending {
            // Queued entities were validated alive and the queue rejects
            // duplicates.
            let destroyed = self.entities.destroy(entity);
            debug_assert!(destroyed.is_ok(), "queued entity {entity} was not alive at flush");
            self.components.remove_all(entity.index);
            self.systems.entity_destroyed(entity);
        }
    }

    pub fn is_alive(&self, entity: Entity) -> bool {
        self.entities.is_alive(entity)
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// The fixed live-entity bound this Nexus was constructed with.
    pub fn entity_capacity(&self) -> usize {
        self.entities.capacity()
    }

    pub fn signature_of(&self, entity: Entity) -> Result<Signature, EcsError> {
        self.entities.signature(entity)
    }

    // ---- Components ----

    /// Register a component type, assigning it a signature bit. Idempotent.
    pub fn register_component<T: Component>(&mut self) -> Result<ComponentId, EcsError> {
        self.components.register::<T>()
    }

    /// The signature bit assigned to a registered component type.
    pub fn component_id<T: Component>(&self) -> Result<ComponentId, EcsError> {
        self.components.id_of::<T>()
    }

    /// Attach a component to an entity. The store insertion and the signature
    /// bit are updated first, then the system registry reacts, all before this
    /// call returns, so tracked sets never lag behind component traffic.
    pub fn add_component<T: Component>(
        &mut self,
        entity: Entity,
        component: T,
    ) -> Result<(), EcsError> {
        let id = self.components.id_of::<T>()?;
        let mut signature = self.entities.signature(entity)?;
        if !self.components.store_mut::<T>(id).insert(entity.index, component) {
            return Err(EcsError::DuplicateComponent {
                entity,
                component: std::any::type_name::<T>(),
            });
        }
        signature.insert(id);
        self.entities.set_signature(entity, signature)?;
        self.systems.signature_changed(entity, signature);
        Ok(())
    }

    /// Detach a component from an entity. A no-op (not an error) if the entity
    /// does not have one.
    pub fn remove_component<T: Component>(&mut self, entity: Entity) -> Result<(), EcsError> {
        let id = self.components.id_of::<T>()?;
        let mut signature = self.entities.signature(entity)?;
        if !self.components.remove(id, entity.index) {
            return Ok(());
        }
        signature.remove(id);
        self.entities.set_signature(entity, signature)?;
        self.systems.signature_changed(entity, signature);
        Ok(())
    }

    pub fn get_component<T: Component>(&self, entity: Entity) -> Result<&T, EcsError> {
        let id = self.components.id_of::<T>()?;
        if !self.entities.is_alive(entity) {
            return Err(EcsError::UnknownEntity(entity));
        }
        self.components
            .store::<T>(id)
            .get(entity.index)
            .ok_or_else(|| EcsError::MissingComponent {
                entity,
                component: std::any::type_name::<T>(),
            })
    }

    pub fn get_component_mut<T: Component>(&mut self, entity: Entity) -> Result<&mut T, EcsError> {
        let id = self.components.id_of::<T>()?;
        if !self.entities.is_alive(entity) {
            return Err(EcsError::UnknownEntity(entity));
        }
        self.components
            .store_mut::<T>(id)
            .get_mut(entity.index)
            .ok_or_else(|| EcsError::MissingComponent {
                entity,
                component: std::any::type_name::<T>(),
            })
    }

    /// O(1), allocation-free component presence check. `false` for dead
    /// entities and unregistered component types.
    pub fn has_component<T: Component>(&self, entity: Entity) -> bool {
        if !self.entities.is_alive(entity) {
            return false;
        }
        match self.components.id_of::<T>() {
            Ok(id) => self.components.has(id, entity.index),
            Err(_) => false,
        }
    }

    // ---- Systems ----

    /// Register a system instance. One instance per system type; tick order is
    /// registration order.
    pub fn register_system<S: System>(&mut self, system: S) -> Result<SystemId, EcsError> {
        self.systems.register(system)
    }

    /// Assign a system's required signature and rebuild its tracked set from
    /// the currently alive entities.
    pub fn set_system_signature<S: System>(&mut self, required: Signature) -> Result<(), EcsError> {
        let id = self.systems.id_of::<S>()?;
        self.systems
            .set_signature(id, required, self.entities.iter_alive());
        Ok(())
    }

    /// Ordered snapshot of the entities currently tracked for a system.
    pub fn entities_for<S: System>(&self) -> Result<Vec<Entity>, EcsError> {
        let id = self.systems.id_of::<S>()?;
        Ok(self.systems.snapshot(id))
    }

    /// Run every system once, in registration order, then flush the deferred
    /// destroy queue. Each system receives the snapshot of its tracked set
    /// taken immediately before it runs, so mutations from earlier systems in
    /// the same tick are visible and nothing is iterated while being mutated.
    pub fn tick(&mut self, dt: f32) {
        for slot in 0..self.systems.len() {
            let id = SystemId(slot);
            let Some(mut system) = self.systems.take(id) else {
                continue;
            };
            let entities = self.systems.snapshot(id);
            system.update(self, &entities, dt);
            self.systems.restore(id, system);
        }
        self.flush_destroyed();
    }

    // ---- Resources ----

    /// Insert a frame-scoped singleton, replacing any previous value.
    pub fn insert_resource<T: 'static + Send + Sync>(&mut self, value: T) {
        self.resources.insert(value);
    }

    pub fn resource<T: 'static + Send + Sync>(&self) -> Option<&T> {
        self.resources.get::<T>()
    }

    pub fn resource_mut<T: 'static + Send + Sync>(&mut self) -> Option<&mut T> {
        self.resources.get_mut::<T>()
    }

    pub fn remove_resource<T: 'static + Send + Sync>(&mut self) -> Option<T> {
        self.resources.remove::<T>()
    }
}

impl Default for Nexus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Position {
        x: f32,
        y: f32,
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Velocity {
        dx: f32,
        dy: f32,
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Tag;

    fn nexus_with_components() -> Nexus {
        let mut nexus = Nexus::with_capacity(64);
        nexus.register_component::<Position>().unwrap();
        nexus.register_component::<Velocity>().unwrap();
        nexus.register_component::<Tag>().unwrap();
        nexus
    }

    struct MoveSystem;

    impl System for MoveSystem {
        fn update(&mut self, nexus: &mut Nexus, entities: &[Entity], dt: f32) {
            for &e in entities {
                let vel = nexus.get_component::<Velocity>(e).unwrap().clone();
                let pos = nexus.get_component_mut::<Position>(e).unwrap();
                pos.x += vel.dx * dt;
                pos.y += vel.dy * dt;
            }
        }
    }

    struct CountSystem {
        seen: Vec<usize>,
    }

    impl System for CountSystem {
        fn update(&mut self, _nexus: &mut Nexus, entities: &[Entity], _dt: f32) {
            self.seen.push(entities.len());
        }
    }

    #[test]
    fn add_get_remove_component() {
        let mut nexus = nexus_with_components();
        let e = nexus.create_entity().unwrap();
        nexus.add_component(e, Position { x: 1.0, y: 2.0 }).unwrap();
        assert_eq!(
            nexus.get_component::<Position>(e).unwrap(),
            &Position { x: 1.0, y: 2.0 }
        );
        nexus.get_component_mut::<Position>(e).unwrap().x = 5.0;
        assert_eq!(nexus.get_component::<Position>(e).unwrap().x, 5.0);
        nexus.remove_component::<Position>(e).unwrap();
        assert!(matches!(
            nexus.get_component::<Position>(e),
            Err(EcsError::MissingComponent { .. })
        ));
    }

    #[test]
    fn duplicate_add_fails() {
        let mut nexus = nexus_with_components();
        let e = nexus.create_entity().unwrap();
        nexus.add_component(e, Tag).unwrap();
        assert!(matches!(
            nexus.add_component(e, Tag),
            Err(EcsError::DuplicateComponent { .. })
        ));
    }

    #[test]
    fn remove_absent_component_is_noop() {
        let mut nexus = nexus_with_components();
        let e = nexus.create_entity().unwrap();
        nexus.remove_component::<Position>(e).unwrap();
        nexus.add_component(e, Position { x: 0.0, y: 0.0 }).unwrap();
        nexus.remove_component::<Position>(e).unwrap();
        nexus.remove_component::<Position>(e).unwrap();
        assert!(!nexus.has_component::<Position>(e));
    }

    #[test]
    fn unregistered_component_fails() {
        let mut nexus = Nexus::with_capacity(8);
        let e = nexus.create_entity().unwrap();
        assert!(matches!(
            nexus.add_component(e, Position { x: 0.0, y: 0.0 }),
            Err(EcsError::UnregisteredComponent(_))
        ));
    }

    #[test]
    fn signature_tracks_stores() {
        let mut nexus = nexus_with_components();
        let pos_id = nexus.component_id::<Position>().unwrap();
        let vel_id = nexus.component_id::<Velocity>().unwrap();
        let e = nexus.create_entity().unwrap();

        nexus.add_component(e, Position { x: 0.0, y: 0.0 }).unwrap();
        nexus.add_component(e, Velocity { dx: 1.0, dy: 0.0 }).unwrap();
        let sig = nexus.signature_of(e).unwrap();
        assert_eq!(sig.contains(pos_id), nexus.has_component::<Position>(e));
        assert_eq!(sig.contains(vel_id), nexus.has_component::<Velocity>(e));

        nexus.remove_component::<Velocity>(e).unwrap();
        let sig = nexus.signature_of(e).unwrap();
        assert!(sig.contains(pos_id));
        assert!(!sig.contains(vel_id));
        assert!(!nexus.has_component::<Velocity>(e));
    }

    #[test]
    fn system_membership_follows_signature_traffic() {
        let mut nexus = nexus_with_components();
        nexus.register_system(MoveSystem).unwrap();
        let required = Signature::from_ids(&[
            nexus.component_id::<Position>().unwrap(),
            nexus.component_id::<Velocity>().unwrap(),
        ]);
        nexus.set_system_signature::<MoveSystem>(required).unwrap();

        let e = nexus.create_entity().unwrap();
        nexus.add_component(e, Position { x: 0.0, y: 0.0 }).unwrap();
        assert!(nexus.entities_for::<MoveSystem>().unwrap().is_empty());

        nexus.add_component(e, Velocity { dx: 1.0, dy: 0.0 }).unwrap();
        assert_eq!(nexus.entities_for::<MoveSystem>().unwrap(), vec![e]);

        nexus.remove_component::<Position>(e).unwrap();
        assert!(nexus.entities_for::<MoveSystem>().unwrap().is_empty());
    }

    #[test]
    fn set_signature_rebuilds_for_existing_entities() {
        let mut nexus = nexus_with_components();
        let e1 = nexus.create_entity().unwrap();
        let e2 = nexus.create_entity().unwrap();
        nexus.add_component(e1, Position { x: 0.0, y: 0.0 }).unwrap();
        nexus.add_component(e1, Velocity { dx: 0.0, dy: 0.0 }).unwrap();
        nexus.add_component(e2, Position { x: 0.0, y: 0.0 }).unwrap();

        // Signature assigned after the components already exist.
        nexus.register_system(MoveSystem).unwrap();
        let required = Signature::from_ids(&[
            nexus.component_id::<Position>().unwrap(),
            nexus.component_id::<Velocity>().unwrap(),
        ]);
        nexus.set_system_signature::<MoveSystem>(required).unwrap();
        assert_eq!(nexus.entities_for::<MoveSystem>().unwrap(), vec![e1]);
    }

    #[test]
    fn tick_runs_system_over_tracked_set() {
        let mut nexus = nexus_with_components();
        nexus.register_system(MoveSystem).unwrap();
        let required = Signature::from_ids(&[
            nexus.component_id::<Position>().unwrap(),
            nexus.component_id::<Velocity>().unwrap(),
        ]);
        nexus.set_system_signature::<MoveSystem>(required).unwrap();

        let e = nexus.create_entity().unwrap();
        nexus.add_component(e, Position { x: 0.0, y: 0.0 }).unwrap();
        nexus.add_component(e, Velocity { dx: 2.0, dy: 0.0 }).unwrap();

        nexus.tick(0.5);
        assert_eq!(nexus.get_component::<Position>(e).unwrap().x, 1.0);
    }

    #[test]
    fn destroy_is_deferred_until_flush() {
        let mut nexus = nexus_with_components();
        let e = nexus.create_entity().unwrap();
        nexus.add_component(e, Position { x: 3.0, y: 0.0 }).unwrap();

        nexus.destroy_entity(e).unwrap();
        // Still alive and readable until the frame boundary.
        assert!(nexus.is_alive(e));
        assert_eq!(nexus.get_component::<Position>(e).unwrap().x, 3.0);

        // A new entity created in the same frame never collides.
        let e_new = nexus.create_entity().unwrap();
        assert_ne!(e, e_new);
        assert_ne!(e.index(), e_new.index());

        nexus.flush_destroyed();
        assert!(!nexus.is_alive(e));
        assert!(!nexus.has_component::<Position>(e));
        assert!(nexus.is_alive(e_new));
    }

    #[test]
    fn double_destroy_same_frame_is_unknown() {
        let mut nexus = nexus_with_components();
        let e = nexus.create_entity().unwrap();
        nexus.destroy_entity(e).unwrap();
        assert!(matches!(
            nexus.destroy_entity(e),
            Err(EcsError::UnknownEntity(_))
        ));
    }

    #[test]
    fn flush_removes_from_system_sets() {
        let mut nexus = nexus_with_components();
        nexus.register_system(MoveSystem).unwrap();
        let required = Signature::from_ids(&[
            nexus.component_id::<Position>().unwrap(),
            nexus.component_id::<Velocity>().unwrap(),
        ]);
        nexus.set_system_signature::<MoveSystem>(required).unwrap();

        let e = nexus.create_entity().unwrap();
        nexus.add_component(e, Position { x: 0.0, y: 0.0 }).unwrap();
        nexus.add_component(e, Velocity { dx: 0.0, dy: 0.0 }).unwrap();
        assert_eq!(nexus.entities_for::<MoveSystem>().unwrap().len(), 1);

        nexus.destroy_entity(e).unwrap();
        nexus.flush_destroyed();
        assert!(nexus.entities_for::<MoveSystem>().unwrap().is_empty());
    }

    #[test]
    fn tick_flushes_destroy_queue() {
        let mut nexus = nexus_with_components();
        nexus.register_system(CountSystem { seen: Vec::new() }).unwrap();
        nexus
            .set_system_signature::<CountSystem>(Signature::from_ids(&[
                nexus.component_id::<Tag>().unwrap()
            ]))
            .unwrap();

        let e = nexus.create_entity().unwrap();
        nexus.add_component(e, Tag).unwrap();
        nexus.destroy_entity(e).unwrap();
        nexus.tick(0.016);
        assert!(!nexus.is_alive(e));
    }

    #[test]
    fn stale_handle_after_reuse_sees_nothing() {
        let mut nexus = nexus_with_components();
        let e1 = nexus.create_entity().unwrap();
        nexus.add_component(e1, Position { x: 1.0, y: 0.0 }).unwrap();
        nexus.destroy_entity(e1).unwrap();
        nexus.flush_destroyed();

        // Slot is recycled with a new generation.
        let e2 = nexus.create_entity().unwrap();
        assert_eq!(e1.index(), e2.index());
        assert_ne!(e1, e2);
        assert!(matches!(
            nexus.get_component::<Position>(e1),
            Err(EcsError::UnknownEntity(_))
        ));
        assert!(!nexus.has_component::<Position>(e2));
    }

    #[test]
    fn capacity_exceeded_surfaces() {
        let mut nexus = Nexus::with_capacity(1);
        nexus.create_entity().unwrap();
        assert!(matches!(
            nexus.create_entity(),
            Err(EcsError::CapacityExceeded(1))
        ));
    }

    #[test]
    fn interleaved_traffic_keeps_sets_exact() {
        let mut nexus = nexus_with_components();
        nexus.register_system(MoveSystem).unwrap();
        let required = Signature::from_ids(&[
            nexus.component_id::<Position>().unwrap(),
            nexus.component_id::<Velocity>().unwrap(),
        ]);
        nexus.set_system_signature::<MoveSystem>(required).unwrap();

        let mut entities = Vec::new();
        for i in 0..8 {
            let e = nexus.create_entity().unwrap();
            nexus
                .add_component(e, Position { x: i as f32, y: 0.0 })
                .unwrap();
            if i % 2 == 0 {
                nexus.add_component(e, Velocity { dx: 0.0, dy: 0.0 }).unwrap();
            }
            entities.push(e);
        }
        nexus.remove_component::<Velocity>(entities[2]).unwrap();
        nexus
            .add_component(entities[1], Velocity { dx: 0.0, dy: 0.0 })
            .unwrap();

        let tracked = nexus.entities_for::<MoveSystem>().unwrap();
        for &e in &entities {
            let matches_sig = nexus.signature_of(e).unwrap().contains_all(required);
            assert_eq!(tracked.contains(&e), matches_sig, "entity {e}");
        }
    }
}
