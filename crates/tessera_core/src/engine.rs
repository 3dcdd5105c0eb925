//! # Execution Engine
//!
//! ```text
//! step(world, Δt):
//!   ┌────────────┐   ┌────────────┐         ┌────────────┐
//!   │  system 0  │──>│  system 1  │── ... ─>│  system n  │──> (world, effects)
//!   └─────┬──────┘   └─────┬──────┘         └─────┬──────┘
//!         └ sweep deletes  └ sweep deletes        └ sweep deletes
//! ```
//!
//! Systems run strictly in registration order, each receiving the world as
//! left by the previous one. A system's delete list is swept through the
//! [`Deletor`] right after it returns, so no later system in the same step
//! sees components of a deleted entity. Effects are concatenated in system
//! order into one batch.
//!
//! `dispatch(world, message)` does the same over the listeners, all of them
//! receiving the same message.
//!
//! Nothing in a step can fail. A system that finds nothing to do returns the
//! world unchanged.

use crate::config::EngineConfig;
use crate::delete::Deletor;
use crate::system::{Listener, Outcome, System};
use crate::world::World;

/// Result of a step or dispatch.
#[derive(Debug)]
pub struct StepOutput<W, E> {
    /// The world after every system or listener has run.
    pub world: W,
    /// Effects from every system or listener, in registration order.
    pub effects: Vec<E>,
    /// Number of entities deleted during the fold.
    pub deleted: usize,
}

impl<W, E> StepOutput<W, E> {
    /// Splits into `(world, effects)`.
    #[must_use]
    pub fn into_parts(self) -> (W, Vec<E>) {
        (self.world, self.effects)
    }
}

struct Named<S> {
    name: &'static str,
    inner: S,
}

/// Ordered systems and listeners plus the deletor they share.
///
/// # Type Parameters
///
/// * `W` - The world type
/// * `M` - The message type listeners react to
/// * `E` - The effect type handed back to the host
pub struct Engine<W, M, E> {
    systems: Vec<Named<System<W, E>>>,
    listeners: Vec<Named<Listener<W, M, E>>>,
    deletor: Deletor<W>,
    config: EngineConfig,
}

impl<W: World, M, E> Engine<W, M, E> {
    /// Creates an engine with no systems or listeners.
    ///
    /// `deletor` must name every component store of the world, otherwise
    /// deleted entities leave stale components behind.
    #[must_use]
    pub fn new(deletor: Deletor<W>) -> Self {
        Self {
            systems: Vec::new(),
            listeners: Vec::new(),
            deletor,
            config: EngineConfig::default(),
        }
    }

    /// Replaces the configuration.
    #[must_use]
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Appends a system.
    #[must_use]
    pub fn with_system(mut self, name: &'static str, system: System<W, E>) -> Self {
        self.add_system(name, system);
        self
    }

    /// Appends a listener.
    #[must_use]
    pub fn with_listener(mut self, name: &'static str, listener: Listener<W, M, E>) -> Self {
        self.add_listener(name, listener);
        self
    }

    /// Appends a system.
    pub fn add_system(&mut self, name: &'static str, system: System<W, E>) {
        self.systems.push(Named { name, inner: system });
    }

    /// Appends a listener.
    pub fn add_listener(&mut self, name: &'static str, listener: Listener<W, M, E>) {
        self.listeners.push(Named { name, inner: listener });
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The deletor used to sweep delete lists.
    #[must_use]
    pub fn deletor(&self) -> &Deletor<W> {
        &self.deletor
    }

    /// Names of the registered systems, in run order.
    pub fn system_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.systems.iter().map(|entry| entry.name)
    }

    /// Names of the registered listeners, in run order.
    pub fn listener_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.listeners.iter().map(|entry| entry.name)
    }

    /// Advances the world by `dt` seconds.
    ///
    /// A negative or non-finite `dt` is treated as zero.
    pub fn step(&self, world: W, dt: f32) -> StepOutput<W, E> {
        let dt = if !dt.is_finite() || dt < 0.0 {
            tracing::warn!(dt, "invalid step delta, clamping to zero");
            0.0
        } else {
            dt
        };

        let mut world = world;
        let mut effects = Vec::new();
        let mut deleted = 0;
        for entry in &self.systems {
            let outcome = entry.inner.run(world, dt);
            let (next, swept) = self.absorb(outcome, &mut effects);
            world = next;
            deleted += swept;
            if self.config.trace_systems {
                tracing::trace!(system = entry.name, shape = entry.inner.shape(), swept, "system applied");
            }
        }

        tracing::debug!(
            systems = self.systems.len(),
            dt,
            effects = effects.len(),
            deleted,
            "step complete"
        );
        StepOutput { world, effects, deleted }
    }

    /// Feeds one message to every listener.
    pub fn dispatch(&self, world: W, message: &M) -> StepOutput<W, E> {
        let mut world = world;
        let mut effects = Vec::new();
        let mut deleted = 0;
        for entry in &self.listeners {
            let outcome = entry.inner.run(message, world);
            let (next, swept) = self.absorb(outcome, &mut effects);
            world = next;
            deleted += swept;
            if self.config.trace_systems {
                tracing::trace!(listener = entry.name, shape = entry.inner.shape(), swept, "listener applied");
            }
        }

        tracing::debug!(
            listeners = self.listeners.len(),
            effects = effects.len(),
            deleted,
            "dispatch complete"
        );
        StepOutput { world, effects, deleted }
    }

    /// Sweeps an outcome's deletes and queues its effects.
    ///
    /// Returns the world to hand to the next system and the number of
    /// entities reclaimed.
    fn absorb(&self, outcome: Outcome<W, E>, effects: &mut Vec<E>) -> (W, usize) {
        let Outcome {
            mut world,
            effects: mut emitted,
            deletes,
        } = outcome;
        let swept = self.deletor.delete_all(&mut world, &deletes);
        effects.append(&mut emitted);
        (world, swept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{accessor, compose_deletor, mutate, Accessor, ComponentStore, EntityId, IdAllocator};

    #[derive(Clone, Debug, Default, PartialEq)]
    struct Tank {
        allocator: IdAllocator,
        level: ComponentStore<f32>,
    }

    impl World for Tank {
        fn allocator(&self) -> &IdAllocator {
            &self.allocator
        }
        fn allocator_mut(&mut self) -> &mut IdAllocator {
            &mut self.allocator
        }
    }

    const LEVEL: Accessor<Tank, f32> = accessor!(Tank, level: f32);

    fn tank(levels: &[f32]) -> (Tank, Vec<EntityId>) {
        let mut tank = Tank::default();
        let ids = levels
            .iter()
            .map(|&level| {
                let (id, _) = tank.spawn().unwrap();
                tank.level.set(id, level);
                id
            })
            .collect();
        (tank, ids)
    }

    fn engine() -> Engine<Tank, (), String> {
        Engine::new(compose_deletor!(LEVEL))
    }

    #[test]
    fn test_time_system_adds_dt() {
        let (tank, ids) = tank(&[5.0, 3.0]);
        let engine = engine().with_system(
            "fill",
            System::time(|mut w: Tank, dt| {
                mutate::step_all(&mut w, &LEVEL, |mut e| {
                    e.value += dt;
                    e
                });
                w
            }),
        );

        let out = engine.step(tank, 2.0);
        assert_eq!(out.world.level.get(ids[0]), Some(&7.0));
        assert_eq!(out.world.level.get(ids[1]), Some(&5.0));
    }

    #[test]
    fn test_systems_see_previous_results() {
        let (tank, ids) = tank(&[1.0]);
        let engine = engine()
            .with_system(
                "double",
                System::basic(|mut w: Tank| {
                    mutate::step_all(&mut w, &LEVEL, |mut e| {
                        e.value *= 2.0;
                        e
                    });
                    w
                }),
            )
            .with_system(
                "add_one",
                System::basic(|mut w: Tank| {
                    mutate::step_all(&mut w, &LEVEL, |mut e| {
                        e.value += 1.0;
                        e
                    });
                    w
                }),
            );

        let out = engine.step(tank, 0.0);
        assert_eq!(out.world.level.get(ids[0]), Some(&3.0));
    }

    #[test]
    fn test_deletes_swept_before_next_system() {
        let (tank, ids) = tank(&[5.0, 3.0]);
        let doomed = ids[1];
        let engine = engine()
            .with_system("drain", System::deletes(move |w: Tank| (w, vec![doomed])))
            .with_system(
                "count",
                System::commands(|w: Tank| {
                    let n = w.level.count();
                    (w, vec![format!("{n} left")])
                }),
            );

        let out = engine.step(tank, 1.0);
        assert_eq!(out.effects, vec!["1 left".to_string()]);
        assert_eq!(out.deleted, 1);
        assert!(out.world.level.get(doomed).is_none());

        let mut world = out.world;
        let (reused, _) = world.spawn().unwrap();
        assert_eq!(reused, doomed);
    }

    #[test]
    fn test_effects_in_registration_order() {
        let (tank, _) = tank(&[]);
        let engine = engine()
            .with_system("a", System::commands(|w: Tank| (w, vec!["a".to_string()])))
            .with_system("b", System::time_and_commands(|w: Tank, _| (w, vec!["b1".to_string(), "b2".to_string()])))
            .with_system("c", System::commands(|w: Tank| (w, vec!["c".to_string()])));

        let (_, effects) = engine.step(tank, 0.5).into_parts();
        assert_eq!(effects, vec!["a", "b1", "b2", "c"]);
    }

    #[test]
    fn test_invalid_dt_clamped() {
        let (tank, ids) = tank(&[1.0]);
        let engine = engine().with_system(
            "fill",
            System::time(|mut w: Tank, dt| {
                mutate::step_all(&mut w, &LEVEL, |mut e| {
                    e.value += dt;
                    e
                });
                w
            }),
        );
        let out = engine.step(tank, -4.0);
        assert_eq!(out.world.level.get(ids[0]), Some(&1.0));

        let out = engine.step(out.world, f32::INFINITY);
        assert_eq!(out.world.level.get(ids[0]), Some(&1.0));
        let out = engine.step(out.world, f32::NAN);
        assert_eq!(out.world.level.get(ids[0]), Some(&1.0));
    }

    #[test]
    fn test_empty_engine_is_identity() {
        let (tank, _) = tank(&[1.0, 2.0]);
        let snapshot = tank.clone();
        let out = engine().step(tank, 1.0);
        assert_eq!(out.world, snapshot);
        assert!(out.effects.is_empty());
    }

    #[test]
    fn test_dispatch_threads_same_message() {
        let (tank, ids) = tank(&[0.0]);
        let engine: Engine<Tank, f32, String> = Engine::new(compose_deletor!(LEVEL))
            .with_listener(
                "pour",
                Listener::basic(|amount: &f32, mut w: Tank| {
                    let amount = *amount;
                    mutate::step_all(&mut w, &LEVEL, |mut e| {
                        e.value += amount;
                        e
                    });
                    w
                }),
            )
            .with_listener(
                "report",
                Listener::commands_deletes(|amount: &f32, w: Tank| {
                    let full: Vec<_> = w
                        .level
                        .iter()
                        .filter(|(_, level)| **level >= 10.0)
                        .map(|(id, _)| id)
                        .collect();
                    (w, vec![format!("poured {amount}")], full)
                }),
            );

        let out = engine.dispatch(tank, &4.0);
        assert_eq!(out.world.level.get(ids[0]), Some(&4.0));
        assert_eq!(out.effects, vec!["poured 4".to_string()]);

        let out = engine.dispatch(out.world, &6.0);
        assert_eq!(out.deleted, 1);
        assert!(!out.world.is_live(ids[0]));
        assert_eq!(engine.listener_names().collect::<Vec<_>>(), vec!["pour", "report"]);
    }
}
