//! Mosaic Breaker - a paddle-and-ball arcade game with picture-mosaic levels
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, block field)
//! - `mosaic`: Image-to-block-grid conversion
//! - `level`: Level catalog and asynchronous level loading
//! - `game`: Game state machine (lives, score, level progression)
//! - `highscores`: Local leaderboard
//! - `config`: Data-driven tunables

pub mod config;
pub mod game;
pub mod highscores;
pub mod level;
pub mod mosaic;
pub mod sim;

pub use config::Config;
pub use game::{FinalScore, Game, GameEvent, Phase};
pub use highscores::HighScores;
pub use level::LevelDef;
pub use mosaic::LevelLoadError;
