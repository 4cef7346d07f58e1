use std::any::{type_name, TypeId};
use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use crate::entity::Entity;
use crate::error::EcsError;
use crate::nexus::Nexus;
use crate::signature::Signature;

/// A per-frame simulation step. One instance exists per system type; the
/// [`Nexus`](crate::Nexus) hands each update the snapshot of entities whose
/// signature currently satisfies the system's required signature.
pub trait System: Send + Sync + 'static {
    fn update(&mut self, nexus: &mut Nexus, entities: &[Entity], dt: f32);
}

/// Index of a registered system, in registration (and therefore tick) order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SystemId(pub(crate) usize);

struct SystemEntry {
    name: &'static str,
    required: Signature,
    /// Entities whose signature is a superset of `required`. Ordered, so every
    /// system (and anything derived from its iteration, like the light table)
    /// sees a deterministic entity order.
    entities: BTreeSet<Entity>,
    /// Taken out while the system runs so it can receive `&mut Nexus`.
    system: Option<Box<dyn System>>,
}

/// Tracks one entry per registered system type and keeps each tracked entity
/// set exactly in sync with signature changes, incrementally rather than by
/// periodic rescan.
pub(crate) struct SystemRegistry {
    ids: HashMap<TypeId, SystemId>,
    entries: Vec<SystemEntry>,
}

impl SystemRegistry {
    pub fn new() -> Self {
        Self {
            ids: HashMap::new(),
            entries: Vec::new(),
        }
    }

    pub fn register<S: System>(&mut self, system: S) -> Result<SystemId, EcsError> {
        if self.ids.contains_key(&TypeId::of::<S>()) {
            return Err(EcsError::DuplicateSystem(type_name::<S>()));
        }
        let id = SystemId(self.entries.len());
        self.ids.insert(TypeId::of::<S>(), id);
        self.entries.push(SystemEntry {
            name: type_name::<S>(),
            required: Signature::EMPTY,
            entities: BTreeSet::new(),
            system: Some(Box::new(system)),
        });
        debug!(system = type_name::<S>(), "registered system");
        Ok(id)
    }

    pub fn id_of<S: System>(&self) -> Result<SystemId, EcsError> {
        self.ids
            .get(&TypeId::of::<S>())
            .copied()
            .ok_or_else(|| EcsError::UnregisteredSystem(type_name::<S>()))
    }

    /// Assign a system's required signature and rebuild its tracked set from
    /// the currently alive entities.
    pub fn set_signature(
        &mut self,
        id: SystemId,
        required: Signature,
        alive: impl Iterator<Item = (Entity, Signature)>,
    ) {
        let entry = &mut self.entries[id.0];
        entry.required = required;
        entry.entities.clear();
        for (entity, signature) in alive {
            if signature.contains_all(required) {
                entry.entities.insert(entity);
            }
        }
        debug!(
            system = entry.name,
            matched = entry.entities.len(),
            "system signature assigned"
        );
    }

    /// React to an entity's signature changing: insert it into every system set
    /// it now matches and erase it from every set it no longer matches. Called
    /// synchronously from each store mutation before the mutating call returns.
    pub fn signature_changed(&mut self, entity: Entity, signature: Signature) {
        for entry in &mut self.entries {
            if signature.contains_all(entry.required) {
                entry.entities.insert(entity);
            } else {
                entry.entities.remove(&entity);
            }
        }
    }

    /// Erase a destroyed entity from every system's tracked set.
    pub fn entity_destroyed(&mut self, entity: Entity) {
        for entry in &mut self.entries {
            entry.entities.remove(&entity);
        }
    }

    #[cfg(test)]
    pub fn tracked(&self, id: SystemId) -> &BTreeSet<Entity> {
        &self.entries[id.0].entities
    }

    /// Snapshot a system's tracked set as an ordered vector. Taken immediately
    /// before the system runs so component traffic from earlier systems in the
    /// same tick is already reflected.
    pub fn snapshot(&self, id: SystemId) -> Vec<Entity> {
        self.entries[id.0].entities.iter().copied().collect()
    }

    pub fn take(&mut self, id: SystemId) -> Option<Box<dyn System>> {
        self.entries[id.0].system.take()
    }

    pub fn restore(&mut self, id: SystemId, system: Box<dyn System>) {
        self.entries[id.0].system = Some(system);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
