//! # Component Storage
//!
//! Sparse, growable storage for a single component type.
//!
//! The storage is a vector of optional slots indexed by [`EntityId`]:
//! - Access is O(1) via the entity index
//! - Writing past the end grows the vector, filling the gap with empty slots
//! - Clearing a slot never shrinks the vector, so every other live index
//!   stays valid

use crate::entity::EntityId;

/// Sparse storage for one component type.
///
/// # Type Parameters
///
/// * `T` - The component type to store
///
/// # Example
///
/// ```rust
/// use tessera_core::{ComponentStore, EntityId};
///
/// let mut store: ComponentStore<f32> = ComponentStore::new();
/// store.set(EntityId::new(3), 1.5);
/// assert_eq!(store.get(EntityId::new(3)), Some(&1.5));
/// assert_eq!(store.get(EntityId::new(1)), None);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ComponentStore<T> {
    /// One slot per id ever written.
    slots: Vec<Option<T>>,
}

impl<T> Default for ComponentStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ComponentStore<T> {
    /// Creates an empty store.
    #[must_use]
    pub const fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Creates an empty store with room for `capacity` slots.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
        }
    }

    /// Returns the number of slots, present or not.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if no slot has ever been written.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Returns the number of present values.
    #[must_use]
    pub fn count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Gets the component at `id`.
    #[inline]
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&T> {
        self.slots.get(id.index()).and_then(Option::as_ref)
    }

    /// Gets the component at `id` mutably.
    #[inline]
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut T> {
        self.slots.get_mut(id.index()).and_then(Option::as_mut)
    }

    /// Checks whether a value is present at `id`.
    #[inline]
    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.get(id).is_some()
    }

    /// Writes `value` at `id`, growing the store if needed.
    ///
    /// Returns the previous value, if any.
    pub fn set(&mut self, id: EntityId, value: T) -> Option<T> {
        let index = id.index();
        if index >= self.slots.len() {
            self.slots.resize_with(index + 1, || None);
        }
        self.slots[index].replace(value)
    }

    /// Empties the slot at `id` and returns what was there.
    ///
    /// Clearing an absent or out-of-range slot is a no-op.
    pub fn clear(&mut self, id: EntityId) -> Option<T> {
        self.slots.get_mut(id.index()).and_then(Option::take)
    }

    /// Iterates over present values in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|value| (EntityId::new(index as u32), value)))
    }

    /// Iterates mutably over present values in ascending id order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (EntityId, &mut T)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_mut().map(|value| (EntityId::new(index as u32), value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: u32) -> EntityId {
        EntityId::new(raw)
    }

    #[test]
    fn test_storage_get_set() {
        let mut store = ComponentStore::new();
        assert_eq!(store.set(id(2), 7_u32), None);
        assert_eq!(store.get(id(2)), Some(&7));
        assert_eq!(store.set(id(2), 9), Some(7));
        assert_eq!(store.get(id(2)), Some(&9));
    }

    #[test]
    fn test_set_grows_with_gaps() {
        let mut store = ComponentStore::new();
        store.set(id(5), 'x');
        assert_eq!(store.len(), 6);
        assert_eq!(store.count(), 1);
        for raw in 0..5 {
            assert!(!store.contains(id(raw)));
        }
    }

    #[test]
    fn test_clear_does_not_shrink() {
        let mut store = ComponentStore::new();
        store.set(id(0), 1);
        store.set(id(3), 2);

        assert_eq!(store.clear(id(3)), Some(2));
        assert_eq!(store.len(), 4);
        assert_eq!(store.clear(id(3)), None);
        assert_eq!(store.clear(id(40)), None);
        assert_eq!(store.get(id(0)), Some(&1));
    }

    #[test]
    fn test_iter_ascending_present_only() {
        let mut store = ComponentStore::new();
        store.set(id(4), "d");
        store.set(id(1), "a");
        store.set(id(2), "b");
        store.clear(id(2));

        let seen: Vec<_> = store.iter().map(|(id, v)| (id.raw(), *v)).collect();
        assert_eq!(seen, vec![(1, "a"), (4, "d")]);
    }

    #[test]
    fn test_iter_mut() {
        let mut store = ComponentStore::new();
        store.set(id(0), 1);
        store.set(id(2), 2);
        for (_, value) in store.iter_mut() {
            *value *= 10;
        }
        assert_eq!(store.get(id(2)), Some(&20));
    }
}
