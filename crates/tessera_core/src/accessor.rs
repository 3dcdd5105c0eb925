//! # Component Accessors
//!
//! An [`Accessor`] is a named `(read, write)` pair of plain function
//! pointers that reach one [`ComponentStore`] inside a world. Generic code
//! (joins, mutation helpers, the deletion composer) is written against
//! accessors, so it never needs to know the full shape of the world.

use std::fmt;

use crate::entity::EntityId;
use crate::storage::ComponentStore;

/// Reads one component store out of a world.
pub type ReadFn<W, T> = fn(&W) -> &ComponentStore<T>;

/// Reaches one component store inside a world mutably.
pub type WriteFn<W, T> = fn(&mut W) -> &mut ComponentStore<T>;

/// Capability to read and write the `T` store of a `W` world.
pub struct Accessor<W, T> {
    name: &'static str,
    read: ReadFn<W, T>,
    write: WriteFn<W, T>,
}

impl<W, T> Clone for Accessor<W, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<W, T> Copy for Accessor<W, T> {}

impl<W, T> fmt::Debug for Accessor<W, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Accessor").field("name", &self.name).finish()
    }
}

impl<W, T> Accessor<W, T> {
    /// Bundles a read and a write function under a name.
    #[must_use]
    pub const fn new(name: &'static str, read: ReadFn<W, T>, write: WriteFn<W, T>) -> Self {
        Self { name, read, write }
    }

    /// Name of the store, for diagnostics.
    #[inline]
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Borrows the store.
    #[inline]
    #[must_use]
    pub fn store<'w>(&self, world: &'w W) -> &'w ComponentStore<T> {
        (self.read)(world)
    }

    /// Borrows the store mutably.
    #[inline]
    pub fn store_mut<'w>(&self, world: &'w mut W) -> &'w mut ComponentStore<T> {
        (self.write)(world)
    }

    /// Reads the component at `id`.
    #[inline]
    #[must_use]
    pub fn get<'w>(&self, world: &'w W, id: EntityId) -> Option<&'w T> {
        self.store(world).get(id)
    }

    /// Writes the component at `id`, returning the previous value.
    #[inline]
    pub fn set(&self, world: &mut W, id: EntityId, value: T) -> Option<T> {
        self.store_mut(world).set(id, value)
    }

    /// Clears the component at `id`, returning the previous value.
    #[inline]
    pub fn clear(&self, world: &mut W, id: EntityId) -> Option<T> {
        self.store_mut(world).clear(id)
    }
}

/// Builds an [`Accessor`] for a `ComponentStore` field of a world struct.
///
/// ```rust
/// use tessera_core::{accessor, Accessor, ComponentStore, EntityId};
///
/// struct Sim {
///     mass: ComponentStore<f32>,
/// }
///
/// const MASS: Accessor<Sim, f32> = accessor!(Sim, mass: f32);
///
/// let mut sim = Sim { mass: ComponentStore::new() };
/// MASS.set(&mut sim, EntityId::new(0), 2.0);
/// assert_eq!(MASS.name(), "mass");
/// assert_eq!(sim.mass.get(EntityId::new(0)), Some(&2.0));
/// ```
#[macro_export]
macro_rules! accessor {
    ($world:ty, $field:ident : $component:ty) => {{
        fn read(world: &$world) -> &$crate::ComponentStore<$component> {
            &world.$field
        }
        fn write(world: &mut $world) -> &mut $crate::ComponentStore<$component> {
            &mut world.$field
        }
        $crate::Accessor::<$world, $component>::new(stringify!($field), read, write)
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Pair {
        left: ComponentStore<i32>,
        right: ComponentStore<&'static str>,
    }

    const LEFT: Accessor<Pair, i32> = accessor!(Pair, left: i32);
    const RIGHT: Accessor<Pair, &'static str> = accessor!(Pair, right: &'static str);

    #[test]
    fn test_accessor_reaches_its_own_store() {
        let mut pair = Pair {
            left: ComponentStore::new(),
            right: ComponentStore::new(),
        };
        let id = EntityId::new(1);

        LEFT.set(&mut pair, id, 4);
        RIGHT.set(&mut pair, id, "four");

        assert_eq!(LEFT.get(&pair, id), Some(&4));
        assert_eq!(pair.right.get(id), Some(&"four"));
        assert_eq!(LEFT.clear(&mut pair, id), Some(4));
        assert!(pair.left.get(id).is_none());
        assert_eq!(RIGHT.name(), "right");
    }
}
