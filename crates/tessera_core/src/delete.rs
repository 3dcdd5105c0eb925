//! # Deletion Composer
//!
//! A [`Deletor`] is an ordered list of per-store clear operations followed
//! by one allocator reclaim. Clearing order does not affect the resulting
//! world; the reclaim always runs last, exactly once per call.
//!
//! Deleting an id that is not live is a no-op: clearing an absent slot and
//! reclaiming an unmapped id both do nothing.

use std::fmt;

use crate::accessor::Accessor;
use crate::entity::EntityId;
use crate::world::World;

/// One type-erased clear operation.
struct Eraser<W> {
    name: &'static str,
    clear: Box<dyn Fn(&mut W, EntityId)>,
}

/// Deletes an entity from every registered store and reclaims its id.
pub struct Deletor<W> {
    erasers: Vec<Eraser<W>>,
}

impl<W> fmt::Debug for Deletor<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deletor")
            .field("stores", &self.store_names().collect::<Vec<_>>())
            .finish()
    }
}

impl<W> Default for Deletor<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W> Deletor<W> {
    /// Creates a deletor that only reclaims ids.
    #[must_use]
    pub fn new() -> Self {
        Self { erasers: Vec::new() }
    }

    /// Adds a store to clear.
    #[must_use]
    pub fn with<T: 'static>(mut self, accessor: Accessor<W, T>) -> Self
    where
        W: 'static,
    {
        self.erasers.push(Eraser {
            name: accessor.name(),
            clear: Box::new(move |world, id| {
                accessor.clear(world, id);
            }),
        });
        self
    }

    /// Names of the registered stores, in clearing order.
    pub fn store_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.erasers.iter().map(|eraser| eraser.name)
    }
}

impl<W: World> Deletor<W> {
    /// Clears every registered store at `id`, then reclaims `id`.
    ///
    /// Returns `true` if `id` was live and has been reclaimed.
    pub fn delete(&self, world: &mut W, id: EntityId) -> bool {
        for eraser in &self.erasers {
            (eraser.clear)(world, id);
        }
        world.allocator_mut().reclaim(id)
    }

    /// Deletes every id in `ids`, in order.
    ///
    /// Duplicates are harmless. Returns the number of ids reclaimed.
    pub fn delete_all(&self, world: &mut W, ids: &[EntityId]) -> usize {
        ids.iter().filter(|&&id| self.delete(world, id)).count()
    }
}

/// Chains accessors into a [`Deletor`].
///
/// `compose_deletor!(A, B, C)` is `Deletor::new().with(A).with(B).with(C)`.
#[macro_export]
macro_rules! compose_deletor {
    ($($accessor:expr),* $(,)?) => {
        $crate::Deletor::new()$(.with($accessor))*
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{accessor, ComponentStore, IdAllocator};

    #[derive(Clone, Debug, Default, PartialEq)]
    struct Pond {
        allocator: IdAllocator,
        depth: ComponentStore<u32>,
        name: ComponentStore<String>,
    }

    impl World for Pond {
        fn allocator(&self) -> &IdAllocator {
            &self.allocator
        }
        fn allocator_mut(&mut self) -> &mut IdAllocator {
            &mut self.allocator
        }
    }

    const DEPTH: Accessor<Pond, u32> = accessor!(Pond, depth: u32);
    const NAME: Accessor<Pond, String> = accessor!(Pond, name: String);

    fn pond() -> (Pond, Vec<EntityId>) {
        let mut pond = Pond::default();
        let mut ids = Vec::new();
        for n in 0..3 {
            let (id, _) = pond.spawn().unwrap();
            pond.depth.set(id, n);
            pond.name.set(id, format!("fish-{n}"));
            ids.push(id);
        }
        (pond, ids)
    }

    #[test]
    fn test_delete_clears_and_reclaims() {
        let (mut pond, ids) = pond();
        let deletor = compose_deletor!(DEPTH, NAME);

        assert!(deletor.delete(&mut pond, ids[1]));
        assert!(pond.depth.get(ids[1]).is_none());
        assert!(pond.name.get(ids[1]).is_none());
        assert!(!pond.is_live(ids[1]));
        assert_eq!(pond.depth.get(ids[2]), Some(&2));

        let (reused, _) = pond.spawn().unwrap();
        assert_eq!(reused, ids[1]);
    }

    #[test]
    fn test_delete_is_idempotent() {
        let (mut once, ids) = pond();
        let mut twice = once.clone();
        let deletor = compose_deletor!(DEPTH, NAME);

        deletor.delete(&mut once, ids[0]);
        deletor.delete(&mut twice, ids[0]);
        assert!(!deletor.delete(&mut twice, ids[0]));
        assert_eq!(once, twice);
    }

    #[test]
    fn test_clear_order_is_irrelevant() {
        let (mut forward, ids) = pond();
        let mut backward = forward.clone();

        compose_deletor!(DEPTH, NAME).delete(&mut forward, ids[2]);
        compose_deletor!(NAME, DEPTH).delete(&mut backward, ids[2]);
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_delete_all_counts_reclaims() {
        let (mut pond, ids) = pond();
        let deletor = compose_deletor!(DEPTH, NAME);
        let reclaimed = deletor.delete_all(&mut pond, &[ids[0], ids[0], EntityId::new(77)]);
        assert_eq!(reclaimed, 1);
        assert_eq!(pond.allocator().live_count(), 2);
        assert_eq!(deletor.store_names().collect::<Vec<_>>(), vec!["depth", "name"]);
    }
}
