//! # Pong Demo
//!
//! A headless two-paddle court exercising every part of the engine:
//!
//! | name          | kind     | shape             |
//! |---------------|----------|-------------------|
//! | `integrate`   | system   | `Time`            |
//! | `bounce`      | system   | `Commands`        |
//! | `score`       | system   | `CommandsDeletes` |
//! | `move_paddle` | listener | `Basic`           |
//! | `serve`       | listener | `Commands`        |
//!
//! Coordinates run from `(0, 0)` at the bottom-left corner to
//! `(COURT_WIDTH, COURT_HEIGHT)`. A ball leaving the court through a side
//! line is deleted and the opposite side scores.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tessera_core::prelude::*;
use tessera_core::{CoreResult, DeleteList, EngineConfig};

/// Court width.
pub const COURT_WIDTH: f32 = 40.0;
/// Court height.
pub const COURT_HEIGHT: f32 = 20.0;
/// Distance from a side line to its paddle's centre.
pub const PADDLE_INSET: f32 = 1.0;
/// Half of a paddle's height.
pub const PADDLE_HALF_HEIGHT: f32 = 2.0;
/// Half of a paddle's thickness.
pub const PADDLE_HALF_WIDTH: f32 = 0.25;
/// Ball radius.
pub const BALL_RADIUS: f32 = 0.25;
/// Ball speed right after a serve.
pub const BALL_SPEED: f32 = 12.0;
/// Largest serve deflection from the horizontal, in radians.
pub const SERVE_JITTER: f32 = 0.35;

// ============================================================================
// COMPONENTS
// ============================================================================

/// One side of the court.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    /// The `x = 0` side.
    Left,
    /// The `x = COURT_WIDTH` side.
    Right,
}

impl Side {
    /// The other side.
    #[must_use]
    pub fn opponent(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Sign of the x axis pointing toward this side.
    fn direction(self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }
}

/// Centre of a body.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Position {
    /// Horizontal coordinate.
    pub x: f32,
    /// Vertical coordinate.
    pub y: f32,
}

/// Units per second.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Velocity {
    /// Horizontal speed.
    pub x: f32,
    /// Vertical speed.
    pub y: f32,
}

impl Velocity {
    /// Magnitude.
    #[must_use]
    pub fn speed(&self) -> f32 {
        self.x.hypot(self.y)
    }
}

/// A paddle guarding one side line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Paddle {
    /// The side it guards.
    pub side: Side,
    /// Half of its height.
    pub half_height: f32,
}

impl Paddle {
    /// Checks whether a ball at `ball` moving with `velocity` hits this
    /// paddle centred at `at`.
    fn deflects(&self, at: Position, ball: Position, velocity: Velocity, radius: f32) -> bool {
        let approaching = velocity.x * self.side.direction() > 0.0;
        approaching
            && (ball.x - at.x).abs() <= radius + PADDLE_HALF_WIDTH
            && (ball.y - at.y).abs() <= self.half_height + radius
    }
}

/// A ball in play.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ball {
    /// Radius.
    pub radius: f32,
    /// Set until the serve angle has been drawn.
    pub awaiting_serve: bool,
}

/// Points per side.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Score {
    /// Points won by the left side.
    pub left: u32,
    /// Points won by the right side.
    pub right: u32,
}

impl Score {
    fn award(&mut self, side: Side) {
        match side {
            Side::Left => self.left += 1,
            Side::Right => self.right += 1,
        }
    }
}

// ============================================================================
// WORLD
// ============================================================================

/// The demo world.
#[derive(Clone, Debug)]
pub struct PongWorld {
    allocator: IdAllocator,
    /// Body centres.
    pub position: ComponentStore<Position>,
    /// Body velocities.
    pub velocity: ComponentStore<Velocity>,
    /// Paddles.
    pub paddle: ComponentStore<Paddle>,
    /// Balls.
    pub ball: ComponentStore<Ball>,
    /// Running score.
    pub score: Score,
    /// Serve angle source. Lives in the world so systems stay pure.
    rng: ChaCha8Rng,
}

/// Accessor for [`Position`].
pub const POSITION: Accessor<PongWorld, Position> = accessor!(PongWorld, position: Position);
/// Accessor for [`Velocity`].
pub const VELOCITY: Accessor<PongWorld, Velocity> = accessor!(PongWorld, velocity: Velocity);
/// Accessor for [`Paddle`].
pub const PADDLE: Accessor<PongWorld, Paddle> = accessor!(PongWorld, paddle: Paddle);
/// Accessor for [`Ball`].
pub const BALL: Accessor<PongWorld, Ball> = accessor!(PongWorld, ball: Ball);

impl World for PongWorld {
    fn allocator(&self) -> &IdAllocator {
        &self.allocator
    }
    fn allocator_mut(&mut self) -> &mut IdAllocator {
        &mut self.allocator
    }
}

/// An empty court: no paddles, no balls, serve seed 0.
impl Default for PongWorld {
    fn default() -> Self {
        Self::empty(&EngineConfig::default(), 0)
    }
}

impl PongWorld {
    /// Creates a court with both paddles centred.
    ///
    /// # Errors
    ///
    /// Fails if the id domain cannot hold the two paddles.
    pub fn new(seed: u64) -> CoreResult<Self> {
        Self::with_config(&EngineConfig::default(), seed)
    }

    /// Like [`PongWorld::new`], with allocator limits and store capacity
    /// taken from `config`.
    ///
    /// # Errors
    ///
    /// Fails if the id domain cannot hold the two paddles.
    pub fn with_config(config: &EngineConfig, seed: u64) -> CoreResult<Self> {
        let mut world = Self::empty(config, seed);
        world.spawn_paddle(Side::Left)?;
        world.spawn_paddle(Side::Right)?;
        Ok(world)
    }

    fn empty(config: &EngineConfig, seed: u64) -> Self {
        let capacity = config.initial_capacity;
        Self {
            allocator: IdAllocator::with_config(config),
            position: ComponentStore::with_capacity(capacity),
            velocity: ComponentStore::with_capacity(capacity),
            paddle: ComponentStore::with_capacity(capacity),
            ball: ComponentStore::with_capacity(capacity),
            score: Score::default(),
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    fn spawn_paddle(&mut self, side: Side) -> CoreResult<EntityId> {
        let (id, _) = self.spawn()?;
        let x = match side {
            Side::Left => PADDLE_INSET,
            Side::Right => COURT_WIDTH - PADDLE_INSET,
        };
        self.position.set(id, Position { x, y: COURT_HEIGHT / 2.0 });
        self.paddle.set(
            id,
            Paddle {
                side,
                half_height: PADDLE_HALF_HEIGHT,
            },
        );
        Ok(id)
    }

    /// Places a ball at the centre spot heading horizontally toward `toward`.
    fn spawn_ball(&mut self, toward: Side) -> CoreResult<EntityId> {
        let (id, _) = self.spawn()?;
        self.position.set(
            id,
            Position {
                x: COURT_WIDTH / 2.0,
                y: COURT_HEIGHT / 2.0,
            },
        );
        self.velocity.set(
            id,
            Velocity {
                x: BALL_SPEED * toward.direction(),
                y: 0.0,
            },
        );
        self.ball.set(
            id,
            Ball {
                radius: BALL_RADIUS,
                awaiting_serve: true,
            },
        );
        Ok(id)
    }

    /// Number of balls in play.
    #[must_use]
    pub fn balls_in_play(&self) -> usize {
        self.ball.count()
    }

    /// Centre of the paddle guarding `side`, if it exists.
    #[must_use]
    pub fn paddle_position(&self, side: Side) -> Option<Position> {
        join(self, &(PADDLE, POSITION))
            .into_iter()
            .find(|e| e.a.side == side)
            .map(|e| e.b)
    }
}

// ============================================================================
// MESSAGES AND EFFECTS
// ============================================================================

/// Discrete input.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Message {
    /// Move a paddle vertically by `dy`, staying on court.
    MovePaddle {
        /// Which paddle.
        side: Side,
        /// Signed distance.
        dy: f32,
    },
    /// Put a new ball in play.
    Serve {
        /// Side the ball travels toward.
        toward: Side,
    },
}

/// Where a ball bounced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Surface {
    /// Top or bottom wall.
    Wall,
    /// A paddle.
    Paddle(Side),
}

/// Output for the host (sound, score display, logging).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Effect {
    /// A ball was put in play.
    Served {
        /// The new ball.
        ball: EntityId,
        /// Direction of travel.
        toward: Side,
    },
    /// A ball changed direction.
    Bounced {
        /// The ball.
        ball: EntityId,
        /// What it hit.
        surface: Surface,
    },
    /// A ball left the court.
    Scored {
        /// Side awarded the point.
        scorer: Side,
        /// Score after the point.
        score: Score,
    },
}

// ============================================================================
// SYSTEMS
// ============================================================================

/// Moves every body by its velocity.
pub fn integrate(mut world: PongWorld, dt: f32) -> PongWorld {
    step_all(&mut world, &(POSITION, VELOCITY), |mut e| {
        e.a.x += e.b.x * dt;
        e.a.y += e.b.y * dt;
        e
    });
    world
}

/// Reflects balls off the walls and the paddles.
pub fn bounce(mut world: PongWorld) -> (PongWorld, Vec<Effect>) {
    let paddles = join(&world, &(PADDLE, POSITION));

    let effects = step_with_accumulator(
        &mut world,
        &(BALL, POSITION, VELOCITY),
        Vec::new(),
        |mut e, mut effects| {
            let radius = e.a.radius;
            let floor = e.b.y - radius <= 0.0 && e.c.y < 0.0;
            let ceiling = e.b.y + radius >= COURT_HEIGHT && e.c.y > 0.0;
            if floor || ceiling {
                e.c.y = -e.c.y;
                effects.push(Effect::Bounced {
                    ball: e.id,
                    surface: Surface::Wall,
                });
            }

            if let Some(hit) = paddles.iter().find(|p| p.a.deflects(p.b, e.b, e.c, radius)) {
                e.c.x = -e.c.x;
                effects.push(Effect::Bounced {
                    ball: e.id,
                    surface: Surface::Paddle(hit.a.side),
                });
            }
            (e, effects)
        },
    );
    (world, effects)
}

/// Awards points for balls past a side line and removes them.
pub fn score(mut world: PongWorld) -> (PongWorld, Vec<Effect>, DeleteList) {
    let mut effects = Vec::new();
    let mut out = Vec::new();

    for e in join(&world, &(BALL, POSITION)) {
        let scorer = if e.b.x < 0.0 {
            Side::Right
        } else if e.b.x > COURT_WIDTH {
            Side::Left
        } else {
            continue;
        };
        world.score.award(scorer);
        effects.push(Effect::Scored {
            scorer,
            score: world.score,
        });
        out.push(e.id);
    }
    (world, effects, out)
}

// ============================================================================
// LISTENERS
// ============================================================================

/// Applies [`Message::MovePaddle`].
pub fn move_paddle(message: &Message, mut world: PongWorld) -> PongWorld {
    let Message::MovePaddle { side, dy } = *message else {
        return world;
    };
    step_all(&mut world, &(PADDLE, POSITION), |mut e| {
        if e.a.side == side {
            let reach = e.a.half_height;
            e.b.y = (e.b.y + dy).clamp(reach, COURT_HEIGHT - reach);
        }
        e
    });
    world
}

/// Applies [`Message::Serve`].
///
/// The serve angle is drawn from the world's generator, so a given seed
/// always produces the same rally.
pub fn serve(message: &Message, mut world: PongWorld) -> (PongWorld, Vec<Effect>) {
    let Message::Serve { toward } = *message else {
        return (world, Vec::new());
    };
    let ball = match world.spawn_ball(toward) {
        Ok(id) => id,
        Err(err) => {
            tracing::warn!(%err, "serve rejected");
            return (world, Vec::new());
        }
    };

    let rng = world.rng.clone();
    world.rng = step_with_accumulator(&mut world, &(BALL, VELOCITY), rng, aim);
    (world, vec![Effect::Served { ball, toward }])
}

/// Rotates a freshly served ball by a random angle.
fn aim(mut e: Entity2<Ball, Velocity>, mut rng: ChaCha8Rng) -> (Entity2<Ball, Velocity>, ChaCha8Rng) {
    if e.a.awaiting_serve {
        let angle: f32 = rng.gen_range(-SERVE_JITTER..=SERVE_JITTER);
        let (sin, cos) = angle.sin_cos();
        let Velocity { x, y } = e.b;
        e.b = Velocity {
            x: x * cos - y * sin,
            y: x * sin + y * cos,
        };
        e.a.awaiting_serve = false;
    }
    (e, rng)
}

/// Builds the demo engine.
#[must_use]
pub fn build_engine() -> Engine<PongWorld, Message, Effect> {
    Engine::new(compose_deletor!(POSITION, VELOCITY, PADDLE, BALL))
        .with_system("integrate", System::time(integrate))
        .with_system("bounce", System::commands(bounce))
        .with_system("score", System::commands_deletes(score))
        .with_listener("move_paddle", Listener::basic(move_paddle))
        .with_listener("serve", Listener::commands(serve))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place_ball(world: &mut PongWorld, at: Position, velocity: Velocity) -> EntityId {
        let id = world.spawn_ball(Side::Left).unwrap();
        world.position.set(id, at);
        world.velocity.set(id, velocity);
        world.ball.set(
            id,
            Ball {
                radius: BALL_RADIUS,
                awaiting_serve: false,
            },
        );
        id
    }

    fn served_velocity(seed: u64) -> Velocity {
        let world = PongWorld::new(seed).unwrap();
        let out = build_engine().dispatch(world, &Message::Serve { toward: Side::Left });
        let Some(Effect::Served { ball, .. }) = out.effects.first().copied() else {
            panic!("expected a serve effect, got {:?}", out.effects);
        };
        *out.world.velocity.get(ball).unwrap()
    }

    #[test]
    fn test_new_court_has_paddles_only() {
        let world = PongWorld::new(1).unwrap();
        assert_eq!(world.paddle.count(), 2);
        assert_eq!(world.balls_in_play(), 0);
        assert_eq!(world.paddle_position(Side::Left).unwrap().x, PADDLE_INSET);
        assert_eq!(world.paddle_position(Side::Right).unwrap().x, COURT_WIDTH - PADDLE_INSET);
    }

    #[test]
    fn test_serve_aims_within_jitter() {
        let v = served_velocity(7);
        assert!((v.speed() - BALL_SPEED).abs() < 1e-3);
        assert!(v.x < 0.0);
        assert!(v.y.abs() <= BALL_SPEED * SERVE_JITTER.sin() + 1e-3);
    }

    #[test]
    fn test_serve_is_deterministic_per_seed() {
        assert_eq!(served_velocity(42), served_velocity(42));
    }

    #[test]
    fn test_serve_only_aims_new_ball() {
        let mut world = PongWorld::new(3).unwrap();
        let resting = Velocity { x: 2.0, y: 0.0 };
        let old = place_ball(&mut world, Position { x: 10.0, y: 10.0 }, resting);

        let out = build_engine().dispatch(world, &Message::Serve { toward: Side::Right });
        assert_eq!(out.world.balls_in_play(), 2);
        assert_eq!(out.world.velocity.get(old), Some(&resting));
    }

    #[test]
    fn test_serve_rejected_when_ids_exhausted() {
        let config = EngineConfig {
            max_entities: 2,
            ..EngineConfig::default()
        };
        let world = PongWorld::with_config(&config, 0).unwrap();
        let out = build_engine().dispatch(world, &Message::Serve { toward: Side::Left });
        assert!(out.effects.is_empty());
        assert_eq!(out.world.balls_in_play(), 0);
    }

    #[test]
    fn test_integrate_moves_bodies() {
        let mut world = PongWorld::new(0).unwrap();
        let id = place_ball(&mut world, Position { x: 20.0, y: 10.0 }, Velocity { x: 4.0, y: -2.0 });
        let world = integrate(world, 0.5);
        assert_eq!(world.position.get(id), Some(&Position { x: 22.0, y: 9.0 }));
        // Paddles have no velocity.
        assert_eq!(world.paddle_position(Side::Left).unwrap().y, COURT_HEIGHT / 2.0);
    }

    #[test]
    fn test_wall_bounce() {
        let mut world = PongWorld::new(0).unwrap();
        let id = place_ball(&mut world, Position { x: 20.0, y: 0.1 }, Velocity { x: 0.0, y: -5.0 });
        let (world, effects) = bounce(world);
        assert_eq!(world.velocity.get(id), Some(&Velocity { x: 0.0, y: 5.0 }));
        assert_eq!(
            effects,
            vec![Effect::Bounced {
                ball: id,
                surface: Surface::Wall
            }]
        );
    }

    #[test]
    fn test_paddle_bounce() {
        let mut world = PongWorld::new(0).unwrap();
        let id = place_ball(&mut world, Position { x: 1.3, y: 10.5 }, Velocity { x: -5.0, y: 0.0 });
        let (world, effects) = bounce(world);
        assert_eq!(world.velocity.get(id), Some(&Velocity { x: 5.0, y: 0.0 }));
        assert_eq!(
            effects,
            vec![Effect::Bounced {
                ball: id,
                surface: Surface::Paddle(Side::Left)
            }]
        );

        // Moving away, the same overlap is not a hit.
        let (_, effects) = bounce(world);
        assert!(effects.is_empty());
    }

    #[test]
    fn test_score_deletes_ball_and_frees_id() {
        let mut world = PongWorld::new(0).unwrap();
        let id = place_ball(&mut world, Position { x: 39.0, y: 10.0 }, Velocity { x: 10.0, y: 0.0 });

        let out = build_engine().step(world, 0.2);
        assert_eq!(out.deleted, 1);
        assert_eq!(
            out.effects,
            vec![Effect::Scored {
                scorer: Side::Left,
                score: Score { left: 1, right: 0 }
            }]
        );
        let mut world = out.world;
        assert!(!world.is_live(id));
        assert!(world.position.get(id).is_none());
        assert!(world.velocity.get(id).is_none());
        assert!(world.ball.get(id).is_none());
        assert_eq!(world.spawn().unwrap().0, id);
    }

    #[test]
    fn test_move_paddle_stays_on_court() {
        let world = PongWorld::new(0).unwrap();
        let engine = build_engine();

        let world = engine
            .dispatch(
                world,
                &Message::MovePaddle {
                    side: Side::Right,
                    dy: 3.0,
                },
            )
            .world;
        assert_eq!(world.paddle_position(Side::Right).unwrap().y, 13.0);
        assert_eq!(world.paddle_position(Side::Left).unwrap().y, 10.0);

        let world = engine
            .dispatch(
                world,
                &Message::MovePaddle {
                    side: Side::Right,
                    dy: 100.0,
                },
            )
            .world;
        assert_eq!(world.paddle_position(Side::Right).unwrap().y, COURT_HEIGHT - PADDLE_HALF_HEIGHT);
    }
}
