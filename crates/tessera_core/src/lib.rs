//! # TESSERA Core Engine
//!
//! Sparse Entity Component System with a deterministic step engine:
//! - Entities are recyclable integer ids paired with never-reused uids
//! - Each component type lives in its own sparse store, indexed by id
//! - Systems are pure updates folded over the world in declaration order
//!
//! ## Architecture Rules
//!
//! 1. **The world is one owned value** - systems take it and hand it back
//! 2. **Joins are materialized** - views are copies, never live borrows
//! 3. **Deletes are deferred** - swept after the emitting system returns
//!
//! ## Example
//!
//! ```rust
//! use tessera_core::prelude::*;
//!
//! #[derive(Default)]
//! struct Sim {
//!     allocator: IdAllocator,
//!     level: ComponentStore<f32>,
//! }
//!
//! impl World for Sim {
//!     fn allocator(&self) -> &IdAllocator { &self.allocator }
//!     fn allocator_mut(&mut self) -> &mut IdAllocator { &mut self.allocator }
//! }
//!
//! const LEVEL: Accessor<Sim, f32> = accessor!(Sim, level: f32);
//!
//! let mut sim = Sim::default();
//! let (id, _) = sim.spawn().unwrap();
//! sim.level.set(id, 5.0);
//!
//! let engine: Engine<Sim, (), ()> = Engine::new(compose_deletor!(LEVEL)).with_system(
//!     "fill",
//!     System::time(|mut sim: Sim, dt| {
//!         step_all(&mut sim, &LEVEL, |mut e| {
//!             e.value += dt;
//!             e
//!         });
//!         sim
//!     }),
//! );
//!
//! let sim = engine.step(sim, 2.0).world;
//! assert_eq!(sim.level.get(id), Some(&7.0));
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod accessor;
pub mod config;
pub mod delete;
pub mod engine;
pub mod entity;
pub mod error;
pub mod mutate;
pub mod query;
pub mod storage;
pub mod system;
pub mod world;

pub use accessor::Accessor;
pub use config::EngineConfig;
pub use delete::Deletor;
pub use engine::{Engine, StepOutput};
pub use entity::{EntityId, IdAllocator, Uid};
pub use error::{CoreError, CoreResult};
pub use mutate::{set_entities, set_entity, step_all, step_with_accumulator};
pub use query::{join, Entity, Entity2, Entity3, Join, View};
pub use storage::ComponentStore;
pub use system::{DeleteList, Listener, Outcome, System};
pub use world::World;

/// Commonly used types and macros.
pub mod prelude {
    pub use crate::{
        accessor, compose_deletor, join, set_entity, step_all, step_with_accumulator, Accessor,
        ComponentStore, Deletor, Engine, Entity, Entity2, Entity3, EntityId, IdAllocator, Join,
        Listener, System, Uid, View, World,
    };
}
