//! Mosaic Breaker entry point
//!
//! Headless driver: builds the level catalog from image paths on the
//! command line and runs the simulation at a fixed tick rate with a simple
//! autoplayer, logging events as they happen. A renderer would consume the
//! same read-only snapshot surface the autoplayer uses.

use std::path::PathBuf;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use mosaic_breaker::sim::TickInput;
use mosaic_breaker::{Config, FinalScore, Game, GameEvent, HighScores, LevelDef, Phase};

const HIGHSCORE_FILE: &str = "mosaic-breaker-scores.json";

fn main() {
    env_logger::init();

    let mut seed = None;
    let mut paths: Vec<PathBuf> = Vec::new();
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--seed" => {
                seed = args.next().and_then(|v| v.parse::<u64>().ok());
                if seed.is_none() {
                    eprintln!("--seed requires an integer value");
                    std::process::exit(2);
                }
            }
            _ => paths.push(PathBuf::from(arg)),
        }
    }
    if paths.is_empty() {
        eprintln!("usage: mosaic-breaker [--seed N] <level-image>...");
        std::process::exit(2);
    }

    let seed = seed.unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0)
    });
    log::info!("Seed: {seed}");

    let catalog: Vec<LevelDef> = paths.into_iter().map(LevelDef::from_path).collect();
    let config = Config::default();
    let mut game = Game::new(config.clone(), catalog, seed);

    let frame = Duration::from_secs_f64(1.0 / config.tick_hz as f64);
    let mut last = Instant::now();
    let mut final_score: Option<FinalScore> = None;

    loop {
        let now = Instant::now();
        let elapsed = now - last;
        if elapsed >= frame {
            // At most one tick per frame; carry the remainder so the average
            // rate stays on target
            let carry = Duration::from_nanos((elapsed.as_nanos() % frame.as_nanos()) as u64);
            last = now - carry;

            let input = autoplay(&game);
            let mut out_of_levels = false;
            for event in game.tick(&input) {
                match event {
                    GameEvent::LevelLoaded { index } => {
                        println!(
                            "Level {}/{}: {} ({} blocks)",
                            index + 1,
                            game.level_count(),
                            game.level_name(),
                            game.world().field.remaining()
                        );
                    }
                    GameEvent::LoadFailed { message } => {
                        // Recoverable: move on to the next level if there is
                        // one, else keep playing whatever field remains
                        eprintln!("{message}");
                        let next = game.level_index() + 1;
                        if next < game.level_count() {
                            println!("Skipping to level {}", next + 1);
                            game.load_level(next);
                        } else if game.world().field.remaining() == 0 {
                            out_of_levels = true;
                        }
                    }
                    GameEvent::LevelCleared { index } => {
                        println!("Level {} cleared! Score: {}", index + 1, game.score());
                    }
                    GameEvent::LifeLost { lives } => {
                        println!("Ball lost. Lives left: {lives}");
                    }
                    GameEvent::GameOver(result) => {
                        println!("Game over. Final score: {}", result.score);
                        final_score = Some(result);
                    }
                    GameEvent::GameCompleted(result) => {
                        println!("All levels cleared! Final score: {}", result.score);
                        final_score = Some(result);
                    }
                }
            }

            if out_of_levels {
                eprintln!("No playable level left");
                break;
            }
            if matches!(game.phase(), Phase::GameOver | Phase::Completed) {
                break;
            }
        } else {
            std::thread::sleep((frame - elapsed).min(Duration::from_millis(2)));
        }
    }

    if let Some(result) = final_score {
        submit_score(result);
    }
}

/// Minimal autoplayer: launch when idle, then chase the ball (or the lowest
/// falling drop when the ball is heading up and away)
fn autoplay(game: &Game) -> TickInput {
    let mut input = TickInput::default();
    match game.phase() {
        Phase::Idle => input.start = true,
        Phase::Running => {
            let world = game.world();
            let target_x = world
                .drops
                .iter()
                .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
                .filter(|_| world.ball.vel.y < 0.0)
                .map(|d| d.pos.x)
                .unwrap_or(world.ball.pos.x);

            let center = world.paddle.center_x();
            if target_x < center - 4.0 {
                input.left = true;
            } else if target_x > center + 4.0 {
                input.right = true;
            }
        }
        _ => {}
    }
    input
}

/// Record the terminal result in the local leaderboard
fn submit_score(result: FinalScore) {
    let path = PathBuf::from(HIGHSCORE_FILE);
    let mut scores = HighScores::load(&path);
    if let Some(rank) = scores.add_score("autoplay", result.score, result.level_reached) {
        println!("New high score! Rank {rank}");
        if let Err(e) = scores.save(&path) {
            log::warn!("Could not save high scores: {e}");
        }
    }
}
