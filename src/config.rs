//! Game configuration
//!
//! Every tunable the simulation and mosaic converter consume lives here,
//! read once at startup. Defaults match the original game feel; a JSON file
//! can override them.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// All gameplay/layout tunables
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // === Rules ===
    /// Starting (and maximum) number of lives
    pub max_lives: u32,
    /// Score awarded per destroyed block
    pub hit_score: u64,

    // === Mosaic ===
    /// Mosaic grid resolution (N x N cells)
    pub mosaic_n: u32,
    /// Cells with mean luminance at or above this are skipped (no block)
    pub bright_cutoff: f32,
    /// Saturation boost factor applied to surviving cells
    pub sat_boost: f32,
    /// Block edge enlargement factor
    pub block_scale: f32,
    /// Gap between blocks in pixels
    pub block_gap: f32,
    /// Scale applied to the usable block area (0.7 = 30% margin)
    pub field_area_scale: f32,
    /// Fraction of canvas width available to the grid
    pub field_width_frac: f32,
    /// Fraction of canvas height available to the grid
    pub field_height_frac: f32,
    /// Vertical offset below which the grid band starts
    pub field_top_offset: f32,

    // === Drops ===
    /// Probability a destroyed block spawns a pickup
    pub drop_chance: f64,
    /// Pickup fall speed in pixels per tick
    pub drop_fall_speed: f32,
    /// Score awarded for catching a pickup
    pub drop_catch_score: u64,
    /// Probability a caught pickup restores one life
    pub drop_heal_chance: f64,

    // === Physics ===
    pub paddle_width: f32,
    pub paddle_height: f32,
    /// Paddle movement speed in pixels per tick
    pub paddle_speed: f32,
    /// Horizontal spin added per unit of paddle-center offset on a bounce
    pub paddle_english: f32,
    pub ball_radius: f32,
    /// Horizontal ball speed cap
    pub ball_max_vx: f32,
    /// Serve speed at level 0
    pub ball_base_speed: f32,
    /// Serve speed increase per level
    pub ball_level_speed_step: f32,

    // === Playfield ===
    pub canvas_width: f32,
    pub canvas_height: f32,
    /// Side margin the paddle cannot enter
    pub canvas_padding: f32,

    // === Scheduler ===
    /// Simulation tick rate in Hz
    pub tick_hz: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_lives: 5,
            hit_score: 50,

            mosaic_n: 10,
            bright_cutoff: 255.0,
            sat_boost: 1.1,
            block_scale: 1.5,
            block_gap: 6.0,
            field_area_scale: 0.7,
            field_width_frac: 0.86,
            field_height_frac: 0.62,
            field_top_offset: 68.0,

            drop_chance: 0.01,
            drop_fall_speed: 2.8,
            drop_catch_score: 100,
            drop_heal_chance: 0.35,

            paddle_width: 180.0,
            paddle_height: 22.0,
            paddle_speed: 9.0,
            paddle_english: 1.35,
            ball_radius: 16.0,
            ball_max_vx: 9.5,
            ball_base_speed: 4.8,
            ball_level_speed_step: 0.35,

            canvas_width: 960.0,
            canvas_height: 640.0,
            canvas_padding: 20.0,

            tick_hz: 60,
        }
    }
}

impl Config {
    /// Validate startup invariants. Non-positive dimensions or out-of-range
    /// probabilities are programmer errors, not runtime conditions.
    pub fn validate(&self) {
        assert!(self.max_lives > 0, "max_lives must be positive");
        assert!(self.mosaic_n > 0, "mosaic_n must be positive");
        assert!(
            self.canvas_width > 0.0 && self.canvas_height > 0.0,
            "canvas dimensions must be positive"
        );
        assert!(
            self.paddle_width > 0.0 && self.paddle_height > 0.0,
            "paddle dimensions must be positive"
        );
        assert!(self.ball_radius > 0.0, "ball_radius must be positive");
        assert!(
            (0.0..=1.0).contains(&self.drop_chance),
            "drop_chance must be in [0, 1]"
        );
        assert!(
            (0.0..=1.0).contains(&self.drop_heal_chance),
            "drop_heal_chance must be in [0, 1]"
        );
        assert!(self.tick_hz > 0, "tick_hz must be positive");
        assert!(
            self.paddle_width + 2.0 * self.canvas_padding <= self.canvas_width,
            "paddle cannot fit inside the padded canvas"
        );
    }

    /// Load config from a JSON file, falling back to defaults
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(config) => {
                    log::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    log::warn!("Bad config file {}: {e}, using defaults", path.display());
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Using default config");
                Self::default()
            }
        }
    }

    /// Save config to a JSON file
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self).expect("config serializes");
        std::fs::write(path, json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        Config::default().validate();
    }

    #[test]
    #[should_panic(expected = "drop_chance")]
    fn out_of_range_chance_is_rejected() {
        let config = Config {
            drop_chance: 1.5,
            ..Default::default()
        };
        config.validate();
    }

    #[test]
    fn config_round_trips_through_json() {
        let config = Config::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(back.hit_score, config.hit_score);
        assert_eq!(back.mosaic_n, config.mosaic_n);
    }
}
