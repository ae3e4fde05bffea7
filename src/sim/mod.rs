//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only, consumed during level setup
//! - Stable iteration order (layout order for walls, spawn order for bullets)
//! - No rendering or platform dependencies

pub mod collision;
pub mod enemies;
pub mod level;
pub mod state;
pub mod tick;

pub use collision::{BorderHit, has_line_of_sight, reflect_off_wall};
pub use enemies::distribute_enemies;
pub use level::{RoomTemplate, generate_level, level_rooms};
pub use state::{Bullet, Cube, GameEvent, MatchPhase, SimulationState, Wall};
pub use tick::{
    TickInput, apply_player_input, check_player_collision, enemy_shoot_at_player, tick,
    update_bullets,
};
