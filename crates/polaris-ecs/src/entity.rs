use std::fmt;

use crate::error::EcsError;
use crate::signature::Signature;

/// A generational entity handle: a compact u32 slot index plus a generation that
/// is bumped every time the slot is recycled, so stale handles are detectable.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Entity {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl Entity {
    /// Create an entity from raw parts (mainly for testing).
    pub fn from_raw(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// The slot index of this entity.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// The generation of this entity (incremented on slot reuse).
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({}v{})", self.index, self.generation)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

/// Allocates and recycles entity slots, and tracks each entity's component
/// signature. Enforces a fixed live-entity bound chosen at construction.
pub struct EntityManager {
    generations: Vec<u32>,
    alive: Vec<bool>,
    signatures: Vec<Signature>,
    free_list: Vec<u32>,
    live: usize,
    capacity: usize,
}

impl EntityManager {
    pub fn new(capacity: usize) -> Self {
        Self {
            generations: Vec::new(),
            alive: Vec::new(),
            signatures: Vec::new(),
            free_list: Vec::new(),
            live: 0,
            capacity,
        }
    }

    /// Allocate a new entity, reusing a freed slot if available.
    pub fn create(&mut self) -> Result<Entity, EcsError> {
        if self.live >= self.capacity {
            return Err(EcsError::CapacityExceeded(self.capacity));
        }
        self.live += 1;
        if let Some(index) = self.free_list.pop() {
            let idx = index as usize;
            self.alive[idx] = true;
            self.signatures[idx] = Signature::EMPTY;
            Ok(Entity {
                index,
                generation: self.generations[idx],
            })
        } else {
            let index = self.generations.len() as u32;
            self.generations.push(0);
            self.alive.push(true);
            self.signatures.push(Signature::EMPTY);
            Ok(Entity {
                index,
                generation: 0,
            })
        }
    }

    /// Destroy an entity: clears its signature, bumps the slot generation, and
    /// returns the slot to the free list.
    pub fn destroy(&mut self, entity: Entity) -> Result<(), EcsError> {
        if !self.is_alive(entity) {
            return Err(EcsError::UnknownEntity(entity));
        }
        let idx = entity.index as usize;
        self.alive[idx] = false;
        self.signatures[idx].clear();
        self.generations[idx] += 1;
        self.free_list.push(entity.index);
        self.live -= 1;
        Ok(())
    }

    /// Check if an entity handle refers to a currently alive entity.
    pub fn is_alive(&self, entity: Entity) -> bool {
        let idx = entity.index as usize;
        idx < self.alive.len() && self.alive[idx] && self.generations[idx] == entity.generation
    }

    pub fn signature(&self, entity: Entity) -> Result<Signature, EcsError> {
        if !self.is_alive(entity) {
            return Err(EcsError::UnknownEntity(entity));
        }
        Ok(self.signatures[entity.index as usize])
    }

    pub fn set_signature(&mut self, entity: Entity, signature: Signature) -> Result<(), EcsError> {
        if !self.is_alive(entity) {
            return Err(EcsError::UnknownEntity(entity));
        }
        self.signatures[entity.index as usize] = signature;
        Ok(())
    }

    /// Iterate all currently alive entities with their signatures.
    pub fn iter_alive(&self) -> impl Iterator<Item = (Entity, Signature)> + '_ {
        self.alive
            .iter()
            .enumerate()
            .filter(|(_, &alive)| alive)
            .map(|(idx, _)| {
                let entity = Entity {
                    index: idx as u32,
                    generation: self.generations[idx],
                };
                (entity, self.signatures[idx])
            })
    }

    /// Number of currently alive entities.
    pub fn len(&self) -> usize {
        self.live
    }

    /// The fixed live-entity bound.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
