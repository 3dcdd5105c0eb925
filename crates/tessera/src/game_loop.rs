//! # TESSERA Game Loop
//!
//! The host side of the step contract:
//! ```text
//! Frame N:
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │ 1. MEASURE                                                          │
//! │    └─ Wall clock since last frame, clamped to max_delta_seconds     │
//! │                                                                     │
//! │ 2. STEP                                                             │
//! │    └─ engine.step(world, Δt) -> (world, effects)                    │
//! │                                                                     │
//! │ 3. PUBLISH                                                          │
//! │    └─ Effects pushed onto the bounded effect channel                │
//! │                                                                     │
//! │ 4. RECORD                                                           │
//! │    └─ Step timing, effect counts, budget overruns                   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Discrete input goes through [`GameLoop::handle`], which dispatches the
//! message to the engine's listeners and publishes their effects the same
//! way.

use std::time::{Duration, Instant};

use tessera_core::{Engine, StepOutput, World};

use crate::config::LoopConfig;
use crate::effects::{EffectBus, EffectReceiver, EffectSender};

/// Statistics for a single step or dispatch.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameStats {
    /// Frame number (dispatches do not advance it).
    pub frame: u64,
    /// Δt handed to the engine, after clamping.
    pub dt: f32,
    /// Time spent inside the engine, in microseconds.
    pub step_us: u64,
    /// Effects delivered to the channel.
    pub effects_published: usize,
    /// Effects dropped because the channel was full.
    pub effects_dropped: usize,
    /// Entities deleted during the fold.
    pub deleted: usize,
}

/// Owns the world and the engine, and drives them frame by frame.
pub struct GameLoop<W, M, E> {
    /// The simulation state. Replaced wholesale by every step.
    world: W,
    /// Systems and listeners.
    engine: Engine<W, M, E>,
    /// Outbound effects.
    bus: EffectBus<E>,
    /// Cached sender for `bus`.
    sender: EffectSender<E>,
    /// Configuration.
    config: LoopConfig,
    /// Frame counter.
    frame_count: u64,
    /// Start of the previous `tick`, if any.
    last_tick: Option<Instant>,
    /// Accumulated frame statistics.
    stats: FrameStatsAccumulator,
}

impl<W: World + Default, M, E> GameLoop<W, M, E> {
    /// Creates a loop around an initialized world.
    ///
    /// The engine's configuration is replaced by `config.engine`.
    #[must_use]
    pub fn new(config: LoopConfig, world: W, engine: Engine<W, M, E>) -> Self {
        let bus = EffectBus::new(config.effect_capacity);
        let sender = bus.sender();
        let engine = engine.with_config(config.engine.clone());

        Self {
            world,
            engine,
            bus,
            sender,
            config,
            frame_count: 0,
            last_tick: None,
            stats: FrameStatsAccumulator::new(),
        }
    }

    /// Steps the world using wall-clock time since the previous `tick`.
    ///
    /// The first tick steps with Δt = 0.
    pub fn tick(&mut self) -> FrameStats {
        let now = Instant::now();
        let elapsed = self
            .last_tick
            .map_or(Duration::ZERO, |last| now.duration_since(last));
        self.last_tick = Some(now);
        self.advance(elapsed)
    }

    /// Steps the world by `elapsed`, clamped to the configured maximum.
    pub fn advance(&mut self, elapsed: Duration) -> FrameStats {
        // Clamp delta time to prevent tunneling after a pause
        let dt = elapsed.as_secs_f32().min(self.config.max_delta_seconds);

        let started = Instant::now();
        let output = self.engine.step(std::mem::take(&mut self.world), dt);
        let step_us = elapsed_us(started);

        let mut stats = self.absorb(output, step_us);
        stats.frame = self.frame_count;
        stats.dt = dt;
        self.frame_count += 1;

        let budget = self.config.frame_budget();
        self.stats.record(stats, budget);
        if self.config.enable_timing_logs && step_us > budget.as_micros() as u64 {
            tracing::warn!(
                frame = stats.frame,
                step_us,
                budget_us = budget.as_micros() as u64,
                "frame exceeded budget"
            );
        }
        stats
    }

    /// Dispatches one message to the listeners.
    pub fn handle(&mut self, message: &M) -> FrameStats {
        let started = Instant::now();
        let output = self.engine.dispatch(std::mem::take(&mut self.world), message);
        let step_us = elapsed_us(started);

        let mut stats = self.absorb(output, step_us);
        stats.frame = self.frame_count;
        stats
    }

    /// Installs the new world and publishes its effects.
    fn absorb(&mut self, output: StepOutput<W, E>, step_us: u64) -> FrameStats {
        let StepOutput {
            world,
            effects,
            deleted,
        } = output;
        self.world = world;

        let total = effects.len();
        let published = self.sender.send_batch(effects);
        let dropped = total - published;
        if dropped > 0 {
            tracing::warn!(dropped, capacity = self.config.effect_capacity, "effect channel full");
        }
        self.stats.effects_published += published as u64;
        self.stats.effects_dropped += dropped as u64;
        self.stats.entities_deleted += deleted as u64;

        FrameStats {
            step_us,
            effects_published: published,
            effects_dropped: dropped,
            deleted,
            ..FrameStats::default()
        }
    }

    /// Read-only view of the current world.
    #[must_use]
    pub fn world(&self) -> &W {
        &self.world
    }

    /// Consumes the loop, returning the world.
    #[must_use]
    pub fn into_world(self) -> W {
        self.world
    }

    /// Creates a receiver for published effects.
    #[must_use]
    pub fn effects(&self) -> EffectReceiver<E> {
        self.bus.receiver()
    }

    /// Returns the number of completed frames.
    #[inline]
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Returns the accumulated statistics.
    #[must_use]
    pub fn stats(&self) -> &FrameStatsAccumulator {
        &self.stats
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &LoopConfig {
        &self.config
    }
}

fn elapsed_us(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX)
}

/// Accumulator for frame statistics.
#[derive(Clone, Debug)]
pub struct FrameStatsAccumulator {
    /// Total frames recorded.
    pub frames_recorded: u64,
    /// Sum of step times.
    pub step_us_sum: u64,
    /// Min step time.
    pub min_step_us: u64,
    /// Max step time.
    pub max_step_us: u64,
    /// Frames whose step exceeded the frame budget.
    pub frames_over_budget: u64,
    /// Effects delivered, steps and dispatches combined.
    pub effects_published: u64,
    /// Effects dropped on a full channel.
    pub effects_dropped: u64,
    /// Entities deleted, steps and dispatches combined.
    pub entities_deleted: u64,
}

impl FrameStatsAccumulator {
    /// Creates a new accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self {
            frames_recorded: 0,
            step_us_sum: 0,
            min_step_us: u64::MAX,
            max_step_us: 0,
            frames_over_budget: 0,
            effects_published: 0,
            effects_dropped: 0,
            entities_deleted: 0,
        }
    }

    /// Records a frame's timing against a frame budget.
    ///
    /// Effect and deletion totals are counted by the loop itself, since
    /// dispatches produce them too.
    pub fn record(&mut self, stats: FrameStats, budget: Duration) {
        self.frames_recorded += 1;
        self.step_us_sum += stats.step_us;
        self.min_step_us = self.min_step_us.min(stats.step_us);
        self.max_step_us = self.max_step_us.max(stats.step_us);

        if u128::from(stats.step_us) > budget.as_micros() {
            self.frames_over_budget += 1;
        }
    }

    /// Returns average step time in milliseconds.
    #[must_use]
    pub fn avg_step_ms(&self) -> f64 {
        if self.frames_recorded == 0 {
            return 0.0;
        }
        (self.step_us_sum as f64 / self.frames_recorded as f64) / 1000.0
    }

    /// Returns the fraction of frames over budget.
    #[must_use]
    pub fn over_budget_ratio(&self) -> f64 {
        if self.frames_recorded == 0 {
            return 0.0;
        }
        self.frames_over_budget as f64 / self.frames_recorded as f64
    }

    /// Logs a summary of the statistics.
    pub fn log_summary(&self) {
        tracing::info!(
            frames = self.frames_recorded,
            avg_step_ms = self.avg_step_ms(),
            min_step_us = if self.frames_recorded == 0 { 0 } else { self.min_step_us },
            max_step_us = self.max_step_us,
            over_budget = self.frames_over_budget,
            effects_published = self.effects_published,
            effects_dropped = self.effects_dropped,
            entities_deleted = self.entities_deleted,
            "frame statistics"
        );
    }
}

impl Default for FrameStatsAccumulator {
    fn default() -> Self {
        Self::new()
    }
}
