//! Game state machine
//!
//! Owns score, lives, level index and the phase flags. Physics results
//! arrive as `SimEvent`s and are applied here, keeping a single writer per
//! field. Level transitions go through the asynchronous loader; no physics
//! tick runs while a load is pending.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::config::Config;
use crate::level::{LevelDef, PendingLevel};
use crate::sim::field::BlockField;
use crate::sim::state::World;
use crate::sim::tick::{self, SimEvent, TickInput};

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Level image decode in flight; physics suspended
    Loading,
    /// Ball stuck to the paddle, waiting for start
    Idle,
    /// Active gameplay
    Running,
    /// Physics suspended, resumes to Running
    Paused,
    /// Out of lives. Terminal until an explicit reset.
    GameOver,
    /// Every level cleared. Terminal until an explicit reset.
    Completed,
}

/// Terminal result handed to the caller for leaderboard submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinalScore {
    pub score: u64,
    /// 1-based level number reached
    pub level_reached: u32,
}

/// Outward events for the embedding layer (HUD, leaderboard, messages)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    /// A level finished loading and play can begin
    LevelLoaded { index: usize },
    /// Level image failed to load; prior field kept, no auto-retry
    LoadFailed { message: String },
    /// A level was cleared and the next one is loading
    LevelCleared { index: usize },
    /// A life was lost with lives remaining
    LifeLost { lives: u32 },
    GameOver(FinalScore),
    GameCompleted(FinalScore),
}

/// One game session: exactly one simulation instance is live at a time
pub struct Game {
    config: Config,
    catalog: Vec<LevelDef>,
    phase: Phase,
    score: u64,
    lives: u32,
    level_index: usize,
    world: World,
    pending: Option<PendingLevel>,
    rng: Pcg32,
}

impl Game {
    /// Create a session and start loading the first level
    pub fn new(config: Config, catalog: Vec<LevelDef>, seed: u64) -> Self {
        config.validate();
        assert!(!catalog.is_empty(), "level catalog must not be empty");

        let world = World::new(&config);
        let lives = config.max_lives;
        let mut game = Self {
            config,
            catalog,
            phase: Phase::Loading,
            score: 0,
            lives,
            level_index: 0,
            world,
            pending: None,
            rng: Pcg32::seed_from_u64(seed),
        };
        game.begin_load(0);
        game
    }

    /// Advance the session by one tick. Discrete actions in the input are
    /// handled first; physics runs only in the Running phase.
    pub fn tick(&mut self, input: &TickInput) -> Vec<GameEvent> {
        let mut events = Vec::new();

        if self.phase == Phase::Loading {
            self.poll_load(&mut events);
            return events;
        }

        if input.reset {
            self.reset();
            return events;
        }
        if input.start {
            self.start();
        }
        if input.pause {
            self.toggle_pause();
        }

        if self.phase == Phase::Running {
            let sim_events = tick::tick(
                &mut self.world,
                input,
                &self.config,
                self.lives,
                &mut self.rng,
            );
            self.apply_sim_events(&sim_events, &mut events);
        }

        events
    }

    /// Begin play, or resume from pause. Ignored when terminal or when no
    /// blocks are in play.
    pub fn start(&mut self) {
        match self.phase {
            Phase::Idle if self.world.field.remaining() > 0 => {
                self.world.ball.stuck = false;
                self.phase = Phase::Running;
            }
            Phase::Paused => self.phase = Phase::Running,
            _ => {}
        }
    }

    /// Toggle pause. Only meaningful while playing.
    pub fn toggle_pause(&mut self) {
        match self.phase {
            Phase::Running => self.phase = Phase::Paused,
            Phase::Paused => self.phase = Phase::Running,
            _ => {}
        }
    }

    /// Reinitialize score and lives and reload the first level. The only way
    /// out of the terminal phases.
    pub fn reset(&mut self) {
        log::info!("Game reset");
        self.score = 0;
        self.lives = self.config.max_lives;
        self.begin_load(0);
    }

    /// Load a specific level, keeping score and lives (manual level select)
    pub fn load_level(&mut self, index: usize) {
        if index < self.catalog.len() && self.phase != Phase::Loading {
            self.begin_load(index);
        }
    }

    fn begin_load(&mut self, index: usize) {
        let def = &self.catalog[index];
        log::info!("Loading level {} ({})", index + 1, def.name);
        self.level_index = index;
        self.world.drops.clear();
        self.pending = Some(PendingLevel::spawn(def.image.clone(), self.config.clone()));
        self.phase = Phase::Loading;
    }

    fn poll_load(&mut self, events: &mut Vec<GameEvent>) {
        let Some(pending) = &self.pending else {
            // No handle while Loading is a bug; recover to Idle
            self.phase = Phase::Idle;
            return;
        };
        match pending.poll() {
            None => {}
            Some(Ok(blocks)) => {
                self.pending = None;
                self.world.field = BlockField::new(blocks);
                self.world
                    .reset_ball_and_paddle(&self.config, self.level_index, &mut self.rng);
                self.phase = Phase::Idle;
                log::info!(
                    "Level {} ready: {} blocks",
                    self.level_index + 1,
                    self.world.field.remaining()
                );
                events.push(GameEvent::LevelLoaded {
                    index: self.level_index,
                });
            }
            Some(Err(e)) => {
                // Keep the prior field; stay non-running on it
                self.pending = None;
                self.phase = Phase::Idle;
                log::error!("Level load failed: {e}");
                events.push(GameEvent::LoadFailed {
                    message: e.to_string(),
                });
            }
        }
    }

    fn apply_sim_events(&mut self, sim_events: &[SimEvent], events: &mut Vec<GameEvent>) {
        for event in sim_events {
            match event {
                SimEvent::BlockDestroyed { .. } => {
                    self.score += self.config.hit_score;
                }
                SimEvent::DropSpawned => {}
                SimEvent::DropCaught { healed } => {
                    self.score += self.config.drop_catch_score;
                    if *healed {
                        self.lives = (self.lives + 1).min(self.config.max_lives);
                    }
                }
                SimEvent::LevelCleared => {
                    if self.level_index + 1 < self.catalog.len() {
                        events.push(GameEvent::LevelCleared {
                            index: self.level_index,
                        });
                        self.begin_load(self.level_index + 1);
                    } else {
                        self.phase = Phase::Completed;
                        log::info!("All levels cleared, final score {}", self.score);
                        events.push(GameEvent::GameCompleted(self.final_score()));
                    }
                }
                SimEvent::BallLost => {
                    self.lives = self.lives.saturating_sub(1);
                    if self.lives == 0 {
                        self.phase = Phase::GameOver;
                        log::info!("Game over, final score {}", self.score);
                        events.push(GameEvent::GameOver(self.final_score()));
                    } else {
                        self.world
                            .reset_ball_and_paddle(&self.config, self.level_index, &mut self.rng);
                        self.phase = Phase::Idle;
                        events.push(GameEvent::LifeLost { lives: self.lives });
                    }
                }
            }
        }
    }

    fn final_score(&self) -> FinalScore {
        FinalScore {
            score: self.score,
            level_reached: self.level_index as u32 + 1,
        }
    }

    // === Read-only snapshot surface for renderers/HUD ===

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn level_index(&self) -> usize {
        self.level_index
    }

    pub fn level_name(&self) -> &str {
        &self.catalog[self.level_index].name
    }

    pub fn level_count(&self) -> usize {
        self.catalog.len()
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::field::Block;
    use crate::sim::state::Drop;
    use glam::Vec2;
    use image::{DynamicImage, Rgb, RgbImage};
    use std::path::PathBuf;
    use std::time::{Duration, Instant};

    fn block_at(x: f32, y: f32) -> Block {
        Block {
            x,
            y,
            w: 60.0,
            h: 60.0,
            color: [90, 60, 30],
            alive: true,
        }
    }

    /// Game in Idle with a hand-built field, bypassing the loader
    fn game_with_field(blocks: Vec<Block>, levels: usize) -> Game {
        let config = Config::default();
        let catalog = (0..levels)
            .map(|i| LevelDef {
                name: format!("level {}", i + 1),
                image: PathBuf::from(format!("/nonexistent/{i}.png")),
            })
            .collect();
        let mut world = World::new(&config);
        world.field = BlockField::new(blocks);
        let lives = config.max_lives;
        Game {
            config,
            catalog,
            phase: Phase::Idle,
            score: 0,
            lives,
            level_index: 0,
            world,
            pending: None,
            rng: Pcg32::seed_from_u64(9),
        }
    }

    /// Aim the ball to strike the given block on the next tick
    fn aim_at_block(game: &mut Game, x: f32, y: f32) {
        game.world.ball.stuck = false;
        game.world.ball.pos = Vec2::new(x + 30.0, y + 25.0 - 5.0);
        game.world.ball.vel = Vec2::new(0.0, 5.0);
    }

    #[test]
    fn start_unsticks_ball_and_runs() {
        let mut game = game_with_field(vec![block_at(400.0, 200.0)], 1);
        assert!(game.world().ball.stuck);
        game.tick(&TickInput {
            start: true,
            ..Default::default()
        });
        assert_eq!(game.phase(), Phase::Running);
        assert!(!game.world().ball.stuck);
    }

    #[test]
    fn pause_toggles_only_while_playing() {
        let mut game = game_with_field(vec![block_at(400.0, 200.0)], 1);
        // Pause in Idle is ignored
        game.tick(&TickInput {
            pause: true,
            ..Default::default()
        });
        assert_eq!(game.phase(), Phase::Idle);

        game.start();
        game.tick(&TickInput {
            pause: true,
            ..Default::default()
        });
        assert_eq!(game.phase(), Phase::Paused);
        game.tick(&TickInput {
            pause: true,
            ..Default::default()
        });
        assert_eq!(game.phase(), Phase::Running);
    }

    #[test]
    fn paused_tick_does_not_advance_physics() {
        let mut game = game_with_field(vec![block_at(400.0, 200.0)], 1);
        game.start();
        game.world.ball.pos = Vec2::new(300.0, 300.0);
        game.world.ball.vel = Vec2::new(5.0, 5.0);
        game.toggle_pause();
        game.tick(&TickInput::default());
        assert_eq!(game.world().ball.pos, Vec2::new(300.0, 300.0));
    }

    #[test]
    fn block_hit_scores_fixed_reward() {
        let mut game = game_with_field(vec![block_at(400.0, 200.0), block_at(700.0, 400.0)], 1);
        game.start();
        aim_at_block(&mut game, 400.0, 200.0);
        game.tick(&TickInput::default());
        assert_eq!(game.score(), game.config().hit_score);
        assert_eq!(game.world().field.remaining(), 1);
    }

    #[test]
    fn drop_catch_scores_bonus_and_heal_respects_cap() {
        let mut game = game_with_field(vec![block_at(700.0, 500.0)], 1);
        game.config.drop_heal_chance = 1.0;
        game.start();
        // Ball heading up, far from the block and the paddle
        game.world.ball.pos = Vec2::new(100.0, 300.0);
        game.world.ball.vel = Vec2::new(0.0, -5.0);

        let drop_at_paddle = Drop {
            pos: Vec2::new(game.world.paddle.center_x(), game.world.paddle.pos.y),
            vy: game.config.drop_fall_speed,
        };

        // At the life cap the catch still scores but cannot heal
        game.world.drops.push(drop_at_paddle.clone());
        game.tick(&TickInput::default());
        assert_eq!(game.score(), game.config().drop_catch_score);
        assert_eq!(game.lives(), game.config().max_lives);

        // Below the cap a certain heal restores exactly one life
        game.lives = game.config.max_lives - 2;
        game.world.drops.push(drop_at_paddle);
        game.tick(&TickInput::default());
        assert_eq!(game.score(), 2 * game.config().drop_catch_score);
        assert_eq!(game.lives(), game.config().max_lives - 1);
    }

    #[test]
    fn last_life_lost_is_terminal_game_over() {
        let mut game = game_with_field(vec![block_at(400.0, 200.0)], 1);
        game.lives = 1;
        game.start();
        game.world.ball.pos = Vec2::new(300.0, game.config.canvas_height + 20.0);
        game.world.ball.vel = Vec2::new(0.0, 5.0);

        let events = game.tick(&TickInput::default());
        assert_eq!(game.lives(), 0);
        assert_eq!(game.phase(), Phase::GameOver);
        assert!(events.iter().any(|e| matches!(
            e,
            GameEvent::GameOver(FinalScore {
                score: 0,
                level_reached: 1
            })
        )));

        // Terminal: further ticks are no-ops, start is refused
        let score = game.score();
        let events = game.tick(&TickInput {
            start: true,
            ..Default::default()
        });
        assert!(events.is_empty());
        assert_eq!(game.phase(), Phase::GameOver);
        assert_eq!(game.score(), score);
    }

    #[test]
    fn ball_lost_with_lives_left_returns_to_idle() {
        let mut game = game_with_field(vec![block_at(400.0, 200.0)], 1);
        game.start();
        game.world.ball.pos = Vec2::new(300.0, game.config.canvas_height + 20.0);
        game.world.ball.vel = Vec2::new(0.0, 5.0);

        let events = game.tick(&TickInput::default());
        assert_eq!(game.lives(), game.config().max_lives - 1);
        assert_eq!(game.phase(), Phase::Idle);
        assert!(game.world().ball.stuck);
        assert!(events
            .iter()
            .any(|e| matches!(e, GameEvent::LifeLost { .. })));
    }

    #[test]
    fn clearing_last_level_completes_instead_of_loading() {
        let mut game = game_with_field(vec![block_at(400.0, 200.0)], 1);
        game.start();
        aim_at_block(&mut game, 400.0, 200.0);

        let events = game.tick(&TickInput::default());
        assert_eq!(game.phase(), Phase::Completed);
        assert!(game.pending.is_none());
        assert!(events.iter().any(|e| matches!(
            e,
            GameEvent::GameCompleted(FinalScore {
                level_reached: 1,
                ..
            })
        )));
    }

    #[test]
    fn clearing_mid_catalog_level_requests_next_load() {
        let mut game = game_with_field(vec![block_at(400.0, 200.0)], 2);
        game.start();
        aim_at_block(&mut game, 400.0, 200.0);

        let events = game.tick(&TickInput::default());
        assert_eq!(game.phase(), Phase::Loading);
        assert_eq!(game.level_index(), 1);
        assert!(game.pending.is_some());
        assert!(events
            .iter()
            .any(|e| matches!(e, GameEvent::LevelCleared { index: 0 })));
    }

    #[test]
    fn load_failure_keeps_prior_field_and_idles() {
        let mut game = game_with_field(vec![block_at(400.0, 200.0), block_at(700.0, 400.0)], 2);
        game.start();
        aim_at_block(&mut game, 400.0, 200.0);
        game.tick(&TickInput::default());
        aim_at_block(&mut game, 700.0, 400.0);
        game.start();
        game.tick(&TickInput::default());
        assert_eq!(game.phase(), Phase::Loading);

        // The catalog paths do not exist, so the load must fail
        let deadline = Instant::now() + Duration::from_secs(10);
        let mut failed = false;
        while Instant::now() < deadline {
            let events = game.tick(&TickInput::default());
            if events
                .iter()
                .any(|e| matches!(e, GameEvent::LoadFailed { .. }))
            {
                failed = true;
                break;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        assert!(failed);
        assert_eq!(game.phase(), Phase::Idle);
    }

    #[test]
    fn reset_reinitializes_and_reloads_first_level() {
        let mut game = game_with_field(vec![block_at(400.0, 200.0)], 1);
        game.score = 500;
        game.lives = 1;
        game.phase = Phase::GameOver;

        game.tick(&TickInput {
            reset: true,
            ..Default::default()
        });
        assert_eq!(game.score(), 0);
        assert_eq!(game.lives(), game.config().max_lives);
        assert_eq!(game.level_index(), 0);
        assert_eq!(game.phase(), Phase::Loading);
    }

    #[test]
    fn full_session_through_real_level_image() {
        let path = std::env::temp_dir().join(format!(
            "mosaic_breaker_game_{}.png",
            std::process::id()
        ));
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(24, 24, Rgb([50, 80, 110])));
        img.save(&path).expect("write temp level image");

        let catalog = vec![LevelDef::from_path(&path)];
        let mut game = Game::new(Config::default(), catalog, 1234);
        assert_eq!(game.phase(), Phase::Loading);

        let deadline = Instant::now() + Duration::from_secs(10);
        let mut loaded = false;
        while Instant::now() < deadline {
            let events = game.tick(&TickInput::default());
            if events
                .iter()
                .any(|e| matches!(e, GameEvent::LevelLoaded { index: 0 }))
            {
                loaded = true;
                break;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        assert!(loaded);
        assert_eq!(game.phase(), Phase::Idle);
        assert_eq!(game.world().field.remaining(), 100);
        assert!(game.world().ball.stuck);

        let _ = std::fs::remove_file(path);
    }
}
