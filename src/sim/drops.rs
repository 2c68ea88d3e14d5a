//! Drop manager - falling pickups spawned from destroyed blocks

use rand::Rng;
use rand_pcg::Pcg32;

use super::state::World;
use super::tick::SimEvent;
use crate::config::Config;

/// Margin below the playfield after which an uncaught drop is discarded
const DISCARD_MARGIN: f32 = 40.0;

/// Advance all drops one tick and resolve catches.
///
/// A drop is caught when it reaches the paddle's top edge inside its
/// horizontal span. The heal draw happens on every catch but only grants a
/// life while below the cap; `lives` is the state machine's current value,
/// read-only here. Removal is reverse-index so no entry is skipped or
/// processed twice within a tick.
pub fn update(
    world: &mut World,
    config: &Config,
    lives: u32,
    rng: &mut Pcg32,
    events: &mut Vec<SimEvent>,
) {
    let paddle_left = world.paddle.pos.x;
    let paddle_right = world.paddle.pos.x + world.paddle.w;
    let paddle_top = world.paddle.pos.y;

    for i in (0..world.drops.len()).rev() {
        world.drops[i].pos.y += world.drops[i].vy;
        let pos = world.drops[i].pos;

        if pos.y >= paddle_top && pos.x >= paddle_left && pos.x <= paddle_right {
            let healed = rng.random_bool(config.drop_heal_chance) && lives < config.max_lives;
            events.push(SimEvent::DropCaught { healed });
            world.drops.remove(i);
        } else if pos.y > config.canvas_height + DISCARD_MARGIN {
            world.drops.remove(i);
        }
    }
}
