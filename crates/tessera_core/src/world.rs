//! # World
//!
//! A world is whatever struct the application declares: one [`IdAllocator`]
//! plus one [`ComponentStore`](crate::ComponentStore) per component type.
//! The set of component types is fixed at compile time by that struct's
//! fields. The core only needs to reach the allocator; stores are reached
//! through [`Accessor`](crate::Accessor)s.
//!
//! # Example
//!
//! ```rust
//! use tessera_core::{ComponentStore, IdAllocator, World};
//!
//! #[derive(Default)]
//! struct Sim {
//!     allocator: IdAllocator,
//!     heat: ComponentStore<f32>,
//! }
//!
//! impl World for Sim {
//!     fn allocator(&self) -> &IdAllocator { &self.allocator }
//!     fn allocator_mut(&mut self) -> &mut IdAllocator { &mut self.allocator }
//! }
//!
//! let mut sim = Sim::default();
//! let (id, _uid) = sim.spawn().unwrap();
//! sim.heat.set(id, 21.0);
//! ```

use crate::entity::{EntityId, IdAllocator, Uid};
use crate::error::CoreResult;

/// Aggregate simulation state owned by the driver.
pub trait World {
    /// The identifier allocator for this world.
    fn allocator(&self) -> &IdAllocator;

    /// The identifier allocator for this world, mutably.
    fn allocator_mut(&mut self) -> &mut IdAllocator;

    /// Issues identifiers for a new entity.
    ///
    /// The entity is inert until a component store receives a value at the
    /// returned id.
    ///
    /// # Errors
    ///
    /// Propagates allocator exhaustion.
    fn spawn(&mut self) -> CoreResult<(EntityId, Uid)> {
        self.allocator_mut().allocate()
    }

    /// Checks whether `id` belongs to a live entity.
    fn is_live(&self, id: EntityId) -> bool {
        self.allocator().is_live(id)
    }
}
