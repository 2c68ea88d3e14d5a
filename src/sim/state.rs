//! Simulation entities
//!
//! The paddle and ball are singletons, reset (not recreated) between lives
//! and levels. All velocities are in pixels per tick.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::field::BlockField;
use crate::config::Config;

/// The player's paddle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    /// Top-left corner
    pub pos: Vec2,
    pub w: f32,
    pub h: f32,
    /// Horizontal velocity set from input intent each tick
    pub vx: f32,
    /// Movement speed in pixels per tick
    pub speed: f32,
}

impl Paddle {
    pub fn new(config: &Config) -> Self {
        Self {
            pos: Vec2::new(
                config.canvas_width / 2.0 - config.paddle_width / 2.0,
                config.canvas_height - 40.0,
            ),
            w: config.paddle_width,
            h: config.paddle_height,
            vx: 0.0,
            speed: config.paddle_speed,
        }
    }

    /// Horizontal center
    pub fn center_x(&self) -> f32 {
        self.pos.x + self.w / 2.0
    }
}

/// The ball. While `stuck` is true it rides the paddle and has no
/// independent motion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    /// Center position
    pub pos: Vec2,
    pub vel: Vec2,
    pub r: f32,
    /// Riding the paddle, not yet launched
    pub stuck: bool,
}

impl Ball {
    pub fn new(config: &Config) -> Self {
        Self {
            pos: Vec2::new(config.canvas_width / 2.0, config.canvas_height - 70.0),
            vel: Vec2::ZERO,
            r: config.ball_radius,
            stuck: true,
        }
    }

    /// Slave the stuck ball to the paddle center
    pub fn ride_paddle(&mut self, paddle: &Paddle) {
        self.pos.x = paddle.center_x();
        self.pos.y = paddle.pos.y - self.r - 2.0;
    }
}

/// A falling pickup, spawned when a block is destroyed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Drop {
    /// Center position
    pub pos: Vec2,
    /// Fall speed in pixels per tick
    pub vy: f32,
}

/// All mutable simulation state for the current level. Exclusively owned and
/// mutated by the tick function; the game layer only reads it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    pub paddle: Paddle,
    pub ball: Ball,
    pub drops: Vec<Drop>,
    pub field: BlockField,
}

impl World {
    pub fn new(config: &Config) -> Self {
        Self {
            paddle: Paddle::new(config),
            ball: Ball::new(config),
            drops: Vec::new(),
            field: BlockField::default(),
        }
    }

    /// Re-center the paddle and stick the ball to it with a fresh serve
    /// velocity. Serve speed grows with the level index; direction and a
    /// small speed jitter come from the injected RNG.
    pub fn reset_ball_and_paddle(&mut self, config: &Config, level_index: usize, rng: &mut Pcg32) {
        self.paddle.pos.x = config.canvas_width / 2.0 - self.paddle.w / 2.0;
        self.paddle.vx = 0.0;
        self.ball.stuck = true;
        self.ball.ride_paddle(&self.paddle);

        let base = config.ball_base_speed + level_index as f32 * config.ball_level_speed_step;
        let dir = if rng.random_bool(0.5) { -1.0 } else { 1.0 };
        self.ball.vel.x = dir * (base + rng.random::<f32>() * 0.6);
        self.ball.vel.y = -(base + rng.random::<f32>() * 0.6);
    }
}
