//! Deterministic simulation module
//!
//! All gameplay physics lives here. This module must be pure and deterministic:
//! - Fixed timestep only (velocities are pixels per tick)
//! - Seeded RNG only, passed in explicitly
//! - Stable iteration order (block field order)
//! - No rendering, I/O, or platform dependencies

pub mod collision;
pub mod drops;
pub mod field;
pub mod state;
pub mod tick;

pub use collision::{circle_rect_overlap, reflect_axis, ReflectAxis};
pub use field::{Block, BlockField};
pub use state::{Ball, Drop, Paddle, World};
pub use tick::{tick, SimEvent, TickInput};
