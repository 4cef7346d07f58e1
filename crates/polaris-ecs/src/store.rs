use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;

use crate::error::EcsError;
use crate::signature::{ComponentId, MAX_COMPONENT_TYPES};

/// Marker trait for types that can be stored as ECS components.
pub trait Component: 'static + Send + Sync {}

/// Blanket implementation: any `'static + Send + Sync` type is a valid component.
impl<T: 'static + Send + Sync> Component for T {}

/// Type-erased component store interface, used by entity teardown and signature
/// bookkeeping paths that cannot name the concrete component type.
pub(crate) trait ComponentStorage: Any + Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn remove(&mut self, index: u32) -> bool;
    fn has(&self, index: u32) -> bool;
}

/// Sparse-set store for a single component type: a sparse entity-index map into
/// densely packed values, so iteration stays contiguous and removal swap-fills
/// the freed slot in O(1) without shifting.
pub(crate) struct SparseSet<T> {
    /// Maps entity slot index to dense index. `None` means no component.
    sparse: Vec<Option<usize>>,
    /// Packed component values.
    dense: Vec<T>,
    /// Entity slot indices parallel to `dense` (needed to fix up the sparse map
    /// when a swap-remove moves the last element).
    entities: Vec<u32>,
}

impl<T: Component> SparseSet<T> {
    pub fn new() -> Self {
        Self {
            sparse: Vec::new(),
            dense: Vec::new(),
            entities: Vec::new(),
        }
    }

    /// Insert a component for the given entity slot. Returns `false` if the slot
    /// already holds one (the caller reports the duplicate).
    pub fn insert(&mut self, index: u32, value: T) -> bool {
        let idx = index as usize;
        if idx >= self.sparse.len() {
            self.sparse.resize(idx + 1, None);
        }
        if self.sparse[idx].is_some() {
            return false;
        }
        let dense_idx = self.dense.len();
        self.sparse[idx] = Some(dense_idx);
        self.dense.push(value);
        self.entities.push(index);
        true
    }

    pub fn get(&self, index: u32) -> Option<&T> {
        let idx = index as usize;
        self.sparse
            .get(idx)
            .and_then(|s| s.map(|dense_idx| &self.dense[dense_idx]))
    }

    pub fn get_mut(&mut self, index: u32) -> Option<&mut T> {
        let idx = index as usize;
        self.sparse
            .get(idx)
            .and_then(|s| s.map(|dense_idx| &mut self.dense[dense_idx]))
    }

    /// Number of components stored.
    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.dense.len()
    }
}

impl<T: Component> ComponentStorage for SparseSet<T> {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn remove(&mut self, index: u32) -> bool {
        let idx = index as usize;
        if idx >= self.sparse.len() {
            return false;
        }
        let Some(dense_idx) = self.sparse[idx] else {
            return false;
        };
        self.sparse[idx] = None;

        let last = self.dense.len() - 1;
        if dense_idx != last {
            // Swap-remove: move the last element into the freed slot.
            self.dense.swap(dense_idx, last);
            self.entities.swap(dense_idx, last);
            let moved_entity = self.entities[dense_idx];
            self.sparse[moved_entity as usize] = Some(dense_idx);
        }
        self.dense.pop();
        self.entities.pop();
        true
    }

    fn has(&self, index: u32) -> bool {
        let idx = index as usize;
        idx < self.sparse.len() && self.sparse[idx].is_some()
    }
}

/// Resolves component types to small integer ids and owns one type-erased store
/// per registered type, addressed by that id.
pub(crate) struct ComponentRegistry {
    ids: HashMap<TypeId, ComponentId>,
    stores: Vec<Box<dyn ComponentStorage>>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self {
            ids: HashMap::new(),
            stores: Vec::new(),
        }
    }

    /// Register a component type, assigning it the next free signature bit.
    /// Re-registering a type returns its existing id.
    pub fn register<T: Component>(&mut self) -> Result<ComponentId, EcsError> {
        if let Some(&id) = self.ids.get(&TypeId::of::<T>()) {
            return Ok(id);
        }
        if self.stores.len() >= MAX_COMPONENT_TYPES {
            return Err(EcsError::ComponentLimitReached);
        }
        let id = ComponentId(self.stores.len() as u8);
        self.ids.insert(TypeId::of::<T>(), id);
        self.stores.push(Box::new(SparseSet::<T>::new()));
        Ok(id)
    }

    /// Look up the id assigned to a component type.
    pub fn id_of<T: Component>(&self) -> Result<ComponentId, EcsError> {
        self.ids
            .get(&TypeId::of::<T>())
            .copied()
            .ok_or_else(|| EcsError::UnregisteredComponent(type_name::<T>()))
    }

    pub fn store<T: Component>(&self, id: ComponentId) -> &SparseSet<T> {
        self.stores[id.index()]
            .as_any()
            .downcast_ref::<SparseSet<T>>()
            .expect("component id resolved to a store of a different type")
    }

    pub fn store_mut<T: Component>(&mut self, id: ComponentId) -> &mut SparseSet<T> {
        self.stores[id.index()]
            .as_any_mut()
            .downcast_mut::<SparseSet<T>>()
            .expect("component id resolved to a store of a different type")
    }

    /// Allocation-free presence check through the erased interface.
    pub fn has(&self, id: ComponentId, index: u32) -> bool {
        self.stores[id.index()].has(index)
    }

    /// Erase the component with the given id from an entity slot.
    pub fn remove(&mut self, id: ComponentId, index: u32) -> bool {
        self.stores[id.index()].remove(index)
    }

    /// Erase every component held by an entity slot (entity teardown).
    pub fn remove_all(&mut self, index: u32) {
        for store in &mut self.stores {
            store.remove(index);
        }
    }
}
