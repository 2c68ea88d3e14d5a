//! Fixed timestep simulation tick
//!
//! Advances paddle, ball and drops by one tick and resolves collisions
//! against walls, paddle and the block field. The tick is a pure function of
//! (state, input) except for two explicit RNG draws: the drop-spawn chance on
//! block destruction and the heal chance on a caught drop.

use rand::Rng;
use rand_pcg::Pcg32;

use super::collision::{circle_rect_overlap, reflect_axis, ReflectAxis};
use super::drops;
use super::state::World;
use crate::config::Config;

/// Input intent for a single tick, sampled point-in-time (not queued)
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    /// Launch / resume (discrete action, consumed by the state machine)
    pub start: bool,
    /// Pause toggle (discrete action)
    pub pause: bool,
    /// Full game reset (discrete action)
    pub reset: bool,
}

/// Outcome events of one physics tick, consumed by the game state machine.
/// These are expected control flow, never errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimEvent {
    /// An alive block was struck and destroyed this tick
    BlockDestroyed { index: usize },
    /// The destroyed block spawned a falling pickup
    DropSpawned,
    /// The paddle caught a pickup; `healed` is the already-gated heal draw
    DropCaught { healed: bool },
    /// The ball exited below the playfield
    BallLost,
    /// The last alive block was destroyed
    LevelCleared,
}

/// Advance the world by one tick.
///
/// `lives` is the state machine's current value, read only for the heal cap;
/// all results flow back through the returned events.
pub fn tick(
    world: &mut World,
    input: &TickInput,
    config: &Config,
    lives: u32,
    rng: &mut Pcg32,
) -> Vec<SimEvent> {
    let mut events = Vec::new();

    // Paddle movement. Right wins when both directions are held.
    world.paddle.vx = if input.right {
        world.paddle.speed
    } else if input.left {
        -world.paddle.speed
    } else {
        0.0
    };
    let max_x = config.canvas_width - world.paddle.w - config.canvas_padding;
    world.paddle.pos.x =
        (world.paddle.pos.x + world.paddle.vx).clamp(config.canvas_padding, max_x);

    // Stuck ball rides the paddle; no other physics this tick
    if world.ball.stuck {
        world.ball.ride_paddle(&world.paddle);
        return events;
    }

    // Integrate
    world.ball.pos += world.ball.vel;

    // Walls: left/right/top reflect with position clamped to the boundary.
    // There is intentionally no bottom wall.
    let r = world.ball.r;
    if world.ball.pos.x - r <= 0.0 {
        world.ball.pos.x = r;
        world.ball.vel.x = -world.ball.vel.x;
    } else if world.ball.pos.x + r >= config.canvas_width {
        world.ball.pos.x = config.canvas_width - r;
        world.ball.vel.x = -world.ball.vel.x;
    }
    if world.ball.pos.y - r <= 0.0 {
        world.ball.pos.y = r;
        world.ball.vel.y = -world.ball.vel.y;
    }

    // Paddle bounce, only while moving downward (prevents re-collision on
    // the tick right after a bounce). Always sends the ball upward and adds
    // horizontal "english" from the paddle-center offset.
    let paddle = &world.paddle;
    if world.ball.vel.y > 0.0
        && circle_rect_overlap(
            world.ball.pos,
            r,
            paddle.pos.x,
            paddle.pos.y,
            paddle.w,
            paddle.h,
        )
    {
        let offset = (world.ball.pos.x - paddle.center_x()) / (paddle.w / 2.0);
        world.ball.vel.y = -world.ball.vel.y.abs();
        world.ball.vel.x = (world.ball.vel.x + offset * config.paddle_english)
            .clamp(-config.ball_max_vx, config.ball_max_vx);
    }

    // Block collisions: first overlapping alive block in field order wins,
    // at most one per tick.
    let mut struck = None;
    for (index, block) in world.field.alive() {
        if circle_rect_overlap(world.ball.pos, r, block.x, block.y, block.w, block.h) {
            struck = Some(index);
            break;
        }
    }
    if let Some(index) = struck {
        if let Some(block) = world.field.get(index) {
            let (bx, by, bw, bh) = (block.x, block.y, block.w, block.h);
            let center = block.center();

            if world.field.mark_destroyed(index) {
                events.push(SimEvent::BlockDestroyed { index });

                if rng.random_bool(config.drop_chance) {
                    world.drops.push(super::state::Drop {
                        pos: center,
                        vy: config.drop_fall_speed,
                    });
                    events.push(SimEvent::DropSpawned);
                }

                match reflect_axis(world.ball.pos, bx, by, bw, bh) {
                    ReflectAxis::Horizontal => world.ball.vel.x = -world.ball.vel.x,
                    ReflectAxis::Vertical => world.ball.vel.y = -world.ball.vel.y,
                }
            }
        }
    }

    // Falling pickups
    drops::update(world, config, lives, rng, &mut events);

    // Level clear preempts the ball-lost check
    if world.field.remaining() == 0 {
        events.push(SimEvent::LevelCleared);
        return events;
    }

    // Ball lost below the playfield
    if world.ball.pos.y - r > config.canvas_height {
        events.push(SimEvent::BallLost);
    }

    events
}
