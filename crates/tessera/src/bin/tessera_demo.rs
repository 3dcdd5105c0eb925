//! # TESSERA Demo
//!
//! Plays a headless pong rally and logs every effect the engine emits.
//!
//! ```bash
//! # Defaults
//! RUST_LOG=info ./tessera_demo
//!
//! # With a config file
//! RUST_LOG=debug ./tessera_demo tessera.toml
//! ```

use std::process::ExitCode;

use tessera::demo::{build_engine, Message, PongWorld, Side};
use tessera::{GameLoop, LoopConfig, LoopResult};
use tracing_subscriber::EnvFilter;

/// Frames to simulate.
const FRAMES: u64 = 1_800;
/// Serve seed, fixed so every run plays the same rally.
const SEED: u64 = 0x7E55;
/// Frames between serves.
const SERVE_EVERY: u64 = 240;
/// Largest paddle move per frame.
const PADDLE_STEP: f32 = 0.15;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(%err, "demo failed");
            ExitCode::FAILURE
        }
    }
}

fn run() -> LoopResult<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => {
            tracing::info!(%path, "loading configuration");
            LoopConfig::load(path)?
        }
        None => LoopConfig::default(),
    };

    let world = PongWorld::with_config(&config.engine, SEED)?;
    let mut game = GameLoop::new(config, world, build_engine());
    let effects = game.effects();
    let frame = game.config().frame_budget();

    for n in 0..FRAMES {
        if n % SERVE_EVERY == 0 {
            let toward = if (n / SERVE_EVERY) % 2 == 0 { Side::Left } else { Side::Right };
            game.handle(&Message::Serve { toward });
        }

        // Each paddle tracks the ball nearest to it.
        for side in [Side::Left, Side::Right] {
            if let Some(dy) = tracking_move(game.world(), side) {
                game.handle(&Message::MovePaddle { side, dy });
            }
        }

        game.advance(frame);

        for effect in effects.drain() {
            tracing::info!(frame = n, ?effect, "effect");
        }
    }

    let score = game.world().score;
    tracing::info!(left = score.left, right = score.right, "final score");
    game.stats().log_summary();
    Ok(())
}

/// Vertical step that brings `side`'s paddle toward the closest ball.
fn tracking_move(world: &PongWorld, side: Side) -> Option<f32> {
    let paddle = world.paddle_position(side)?;
    let target = world
        .ball
        .iter()
        .filter_map(|(id, _)| world.position.get(id))
        .min_by(|a, b| (a.x - paddle.x).abs().total_cmp(&(b.x - paddle.x).abs()))?;
    let dy = (target.y - paddle.y).clamp(-PADDLE_STEP, PADDLE_STEP);
    (dy.abs() > f32::EPSILON).then_some(dy)
}
