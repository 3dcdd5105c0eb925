//! # TESSERA
//!
//! Host-side glue around [`tessera_core`]: the core computes the next world
//! and a batch of effects, this crate decides when to ask and where the
//! effects go.
//!
//! ```text
//! ┌──────────────┐  Δt / message   ┌──────────────┐
//! │   GameLoop   │────────────────>│    Engine    │
//! │  (timing,    │<────────────────│  (systems,   │
//! │   stats)     │ world, effects  │  listeners)  │
//! └──────┬───────┘                 └──────────────┘
//!        │ effects
//!        v
//! ┌──────────────┐
//! │  EffectBus   │──> host consumers
//! └──────────────┘
//! ```
//!
//! ## Modules
//!
//! - `config`: Loop configuration loaded from TOML
//! - `effects`: Bounded effect channel
//! - `game_loop`: Frame orchestration and timing
//! - `demo`: A headless pong court built on the engine

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod config;
pub mod demo;
pub mod effects;
pub mod error;
pub mod game_loop;

pub use tessera_core as core;

pub use config::LoopConfig;
pub use effects::{EffectBus, EffectReceiver, EffectSender};
pub use error::{LoopError, LoopResult};
pub use game_loop::{FrameStats, FrameStatsAccumulator, GameLoop};
