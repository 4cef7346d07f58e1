use std::any::{Any, TypeId};
use std::collections::HashMap;

/// Type-map for frame-scoped singletons (input deltas, camera matrices, the
/// extracted frame view). One value per type.
pub(crate) struct Resources {
    map: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl Resources {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    /// Insert a resource, replacing any previous value of the same type.
    pub fn insert<T: 'static + Send + Sync>(&mut self, value: T) {
        self.map.insert(TypeId::of::<T>(), Box::new(value));
    }

    pub fn get<T: 'static + Send + Sync>(&self) -> Option<&T> {
        self.map
            .get(&TypeId::of::<T>())
            .and_then(|b| b.downcast_ref())
    }

    pub fn get_mut<T: 'static + Send + Sync>(&mut self) -> Option<&mut T> {
        self.map
            .get_mut(&TypeId::of::<T>())
            .and_then(|b| b.downcast_mut())
    }

    pub fn remove<T: 'static + Send + Sync>(&mut self) -> Option<T> {
        self.map
            .remove(&TypeId::of::<T>())
            .and_then(|b| b.downcast().ok())
            .map(|b| *b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_get_and_replace() {
        let mut res = Resources::new();
        res.insert(1u32);
        res.insert(2u32);
        assert_eq!(res.get::<u32>(), Some(&2));
    }

    #[test]
    fn mutate_in_place() {
        let mut res = Resources::new();
        res.insert(vec![1, 2, 3]);
        res.get_mut::<Vec<i32>>().unwrap().push(4);
        assert_eq!(res.get::<Vec<i32>>().unwrap().len(), 4);
    }

    #[test]
    fn remove_returns_value() {
        let mut res = Resources::new();
        res.insert("frame".to_string());
        assert_eq!(res.remove::<String>(), Some("frame".to_string()));
        assert_eq!(res.get::<String>(), None);
    }
}
