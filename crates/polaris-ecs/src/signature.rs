use std::fmt;

/// Width of a [`Signature`], and thus the maximum number of registrable
/// component types.
pub const MAX_COMPONENT_TYPES: usize = 64;

/// The small integer assigned to a component type at registration. Doubles as
/// the type's bit position inside a [`Signature`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComponentId(pub(crate) u8);

impl ComponentId {
    /// Bit position / store index of this component type.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Fixed-width bitset over registered component types. Bit `i` is set for an
/// entity iff the store for component type `i` holds a value for it.
#[derive(Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Signature(u64);

impl Signature {
    pub const EMPTY: Signature = Signature(0);

    /// Build a signature from a list of component ids.
    pub fn from_ids(ids: &[ComponentId]) -> Self {
        let mut sig = Self::EMPTY;
        for &id in ids {
            sig.insert(id);
        }
        sig
    }

    pub fn insert(&mut self, id: ComponentId) {
        self.0 |= 1 << id.0;
    }

    pub fn remove(&mut self, id: ComponentId) {
        self.0 &= !(1 << id.0);
    }

    pub fn contains(&self, id: ComponentId) -> bool {
        self.0 & (1 << id.0) != 0
    }

    /// Whether every bit set in `required` is also set in `self`.
    pub fn contains_all(&self, required: Signature) -> bool {
        self.0 & required.0 == required.0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn clear(&mut self) {
        self.0 = 0;
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({:#b})", self.0)
    }
}
