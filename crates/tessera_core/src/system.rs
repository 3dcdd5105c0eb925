//! # Systems and Listeners
//!
//! A system is a pure update over the world, run once per step. A listener
//! is the same thing driven by a discrete message instead of elapsed time.
//! Neither holds state between invocations; everything lives in the world.
//!
//! Each may optionally take Δt (systems only), emit effects for the host,
//! and ask for entities to be deleted. That is a closed set of shapes:
//!
//! | shape                    | receives       | returns                      |
//! |--------------------------|----------------|------------------------------|
//! | `Basic`                  | world          | world                        |
//! | `Time`                   | world, Δt      | world                        |
//! | `Deletes`                | world          | world, deletes               |
//! | `TimeAndDeletes`         | world, Δt      | world, deletes               |
//! | `Commands`               | world          | world, effects               |
//! | `CommandsDeletes`        | world          | world, effects, deletes      |
//! | `TimeAndCommands`        | world, Δt      | world, effects               |
//! | `TimeAndCommandsDeletes` | world, Δt      | world, effects, deletes      |
//!
//! [`System::run`] and [`Listener::run`] flatten every shape into one
//! [`Outcome`], so the engine handles a single result type.

use crate::entity::EntityId;

/// Entities a system wants removed once it has finished.
pub type DeleteList = Vec<EntityId>;

type BasicFn<W> = Box<dyn Fn(W) -> W>;
type TimeFn<W> = Box<dyn Fn(W, f32) -> W>;
type DeletesFn<W> = Box<dyn Fn(W) -> (W, DeleteList)>;
type TimeDeletesFn<W> = Box<dyn Fn(W, f32) -> (W, DeleteList)>;
type CommandsFn<W, E> = Box<dyn Fn(W) -> (W, Vec<E>)>;
type CommandsDeletesFn<W, E> = Box<dyn Fn(W) -> (W, Vec<E>, DeleteList)>;
type TimeCommandsFn<W, E> = Box<dyn Fn(W, f32) -> (W, Vec<E>)>;
type TimeCommandsDeletesFn<W, E> = Box<dyn Fn(W, f32) -> (W, Vec<E>, DeleteList)>;

/// Uniform result of applying any system or listener shape.
#[derive(Debug)]
pub struct Outcome<W, E> {
    /// The updated world.
    pub world: W,
    /// Effects emitted, in order.
    pub effects: Vec<E>,
    /// Entities to delete before the next system runs.
    pub deletes: DeleteList,
}

impl<W, E> Outcome<W, E> {
    fn world(world: W) -> Self {
        Self {
            world,
            effects: Vec::new(),
            deletes: Vec::new(),
        }
    }

    fn with_deletes(world: W, deletes: DeleteList) -> Self {
        Self {
            world,
            effects: Vec::new(),
            deletes,
        }
    }

    fn with_effects(world: W, effects: Vec<E>) -> Self {
        Self {
            world,
            effects,
            deletes: Vec::new(),
        }
    }
}

/// A per-step update over a `W` world emitting `E` effects.
pub enum System<W, E> {
    /// `world -> world`
    Basic(BasicFn<W>),
    /// `world, Δt -> world`
    Time(TimeFn<W>),
    /// `world -> world, deletes`
    Deletes(DeletesFn<W>),
    /// `world, Δt -> world, deletes`
    TimeAndDeletes(TimeDeletesFn<W>),
    /// `world -> world, effects`
    Commands(CommandsFn<W, E>),
    /// `world -> world, effects, deletes`
    CommandsDeletes(CommandsDeletesFn<W, E>),
    /// `world, Δt -> world, effects`
    TimeAndCommands(TimeCommandsFn<W, E>),
    /// `world, Δt -> world, effects, deletes`
    TimeAndCommandsDeletes(TimeCommandsDeletesFn<W, E>),
}

impl<W, E> System<W, E> {
    /// Wraps a `world -> world` function.
    pub fn basic(f: impl Fn(W) -> W + 'static) -> Self {
        Self::Basic(Box::new(f))
    }

    /// Wraps a `world, Δt -> world` function.
    pub fn time(f: impl Fn(W, f32) -> W + 'static) -> Self {
        Self::Time(Box::new(f))
    }

    /// Wraps a `world -> world, deletes` function.
    pub fn deletes(f: impl Fn(W) -> (W, DeleteList) + 'static) -> Self {
        Self::Deletes(Box::new(f))
    }

    /// Wraps a `world, Δt -> world, deletes` function.
    pub fn time_and_deletes(f: impl Fn(W, f32) -> (W, DeleteList) + 'static) -> Self {
        Self::TimeAndDeletes(Box::new(f))
    }

    /// Wraps a `world -> world, effects` function.
    pub fn commands(f: impl Fn(W) -> (W, Vec<E>) + 'static) -> Self {
        Self::Commands(Box::new(f))
    }

    /// Wraps a `world -> world, effects, deletes` function.
    pub fn commands_deletes(f: impl Fn(W) -> (W, Vec<E>, DeleteList) + 'static) -> Self {
        Self::CommandsDeletes(Box::new(f))
    }

    /// Wraps a `world, Δt -> world, effects` function.
    pub fn time_and_commands(f: impl Fn(W, f32) -> (W, Vec<E>) + 'static) -> Self {
        Self::TimeAndCommands(Box::new(f))
    }

    /// Wraps a `world, Δt -> world, effects, deletes` function.
    pub fn time_and_commands_deletes(
        f: impl Fn(W, f32) -> (W, Vec<E>, DeleteList) + 'static,
    ) -> Self {
        Self::TimeAndCommandsDeletes(Box::new(f))
    }

    /// Name of the contract shape, for diagnostics.
    #[must_use]
    pub const fn shape(&self) -> &'static str {
        match self {
            Self::Basic(_) => "basic",
            Self::Time(_) => "time",
            Self::Deletes(_) => "deletes",
            Self::TimeAndDeletes(_) => "time_and_deletes",
            Self::Commands(_) => "commands",
            Self::CommandsDeletes(_) => "commands_deletes",
            Self::TimeAndCommands(_) => "time_and_commands",
            Self::TimeAndCommandsDeletes(_) => "time_and_commands_deletes",
        }
    }

    /// Applies the system. Δt is ignored by shapes that do not take it.
    pub fn run(&self, world: W, dt: f32) -> Outcome<W, E> {
        match self {
            Self::Basic(f) => Outcome::world(f(world)),
            Self::Time(f) => Outcome::world(f(world, dt)),
            Self::Deletes(f) => {
                let (world, deletes) = f(world);
                Outcome::with_deletes(world, deletes)
            }
            Self::TimeAndDeletes(f) => {
                let (world, deletes) = f(world, dt);
                Outcome::with_deletes(world, deletes)
            }
            Self::Commands(f) => {
                let (world, effects) = f(world);
                Outcome::with_effects(world, effects)
            }
            Self::CommandsDeletes(f) => {
                let (world, effects, deletes) = f(world);
                Outcome { world, effects, deletes }
            }
            Self::TimeAndCommands(f) => {
                let (world, effects) = f(world, dt);
                Outcome::with_effects(world, effects)
            }
            Self::TimeAndCommandsDeletes(f) => {
                let (world, effects, deletes) = f(world, dt);
                Outcome { world, effects, deletes }
            }
        }
    }
}

type MsgFn<M, W> = Box<dyn Fn(&M, W) -> W>;
type MsgDeletesFn<M, W> = Box<dyn Fn(&M, W) -> (W, DeleteList)>;
type MsgCommandsFn<M, W, E> = Box<dyn Fn(&M, W) -> (W, Vec<E>)>;
type MsgCommandsDeletesFn<M, W, E> = Box<dyn Fn(&M, W) -> (W, Vec<E>, DeleteList)>;

/// A message-driven update over a `W` world, reacting to `M`, emitting `E`.
pub enum Listener<W, M, E> {
    /// `message, world -> world`
    Basic(MsgFn<M, W>),
    /// `message, world -> world, deletes`
    Deletes(MsgDeletesFn<M, W>),
    /// `message, world -> world, effects`
    Commands(MsgCommandsFn<M, W, E>),
    /// `message, world -> world, effects, deletes`
    CommandsDeletes(MsgCommandsDeletesFn<M, W, E>),
}

impl<W, M, E> Listener<W, M, E> {
    /// Wraps a `message, world -> world` function.
    pub fn basic(f: impl Fn(&M, W) -> W + 'static) -> Self {
        Self::Basic(Box::new(f))
    }

    /// Wraps a `message, world -> world, deletes` function.
    pub fn deletes(f: impl Fn(&M, W) -> (W, DeleteList) + 'static) -> Self {
        Self::Deletes(Box::new(f))
    }

    /// Wraps a `message, world -> world, effects` function.
    pub fn commands(f: impl Fn(&M, W) -> (W, Vec<E>) + 'static) -> Self {
        Self::Commands(Box::new(f))
    }

    /// Wraps a `message, world -> world, effects, deletes` function.
    pub fn commands_deletes(f: impl Fn(&M, W) -> (W, Vec<E>, DeleteList) + 'static) -> Self {
        Self::CommandsDeletes(Box::new(f))
    }

    /// Name of the contract shape, for diagnostics.
    #[must_use]
    pub const fn shape(&self) -> &'static str {
        match self {
            Self::Basic(_) => "basic",
            Self::Deletes(_) => "deletes",
            Self::Commands(_) => "commands",
            Self::CommandsDeletes(_) => "commands_deletes",
        }
    }

    /// Applies the listener to one message.
    pub fn run(&self, message: &M, world: W) -> Outcome<W, E> {
        match self {
            Self::Basic(f) => Outcome::world(f(message, world)),
            Self::Deletes(f) => {
                let (world, deletes) = f(message, world);
                Outcome::with_deletes(world, deletes)
            }
            Self::Commands(f) => {
                let (world, effects) = f(message, world);
                Outcome::with_effects(world, effects)
            }
            Self::CommandsDeletes(f) => {
                let (world, effects, deletes) = f(message, world);
                Outcome { world, effects, deletes }
            }
        }
    }
}
