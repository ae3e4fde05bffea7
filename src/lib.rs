//! Cube Arena - bouncing-bullet arena shooter core
//!
//! Core modules:
//! - `sim`: Simulation (entities, collisions, level layout, tick loop)
//! - `settings`: Validated configuration loaded from JSON
//! - `snapshot`: Read-only frame hand-off for external renderers

pub mod settings;
pub mod sim;
pub mod snapshot;

pub use settings::{Settings, SettingsError};
pub use snapshot::{RenderSnapshot, Renderer};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (one update per 60 Hz frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Platform is PLATFORM_SIZE x PLATFORM_SIZE, centered on the origin
    pub const PLATFORM_SIZE: f32 = 120.0;

    /// Half-width of every wall collision box, regardless of rendered height
    pub const WALL_HALF_EXTENT: f32 = 0.5;
    /// Half-width of a cube's collision box
    pub const CUBE_HALF_EXTENT: f32 = 0.5;
    /// Cube radius used for bullet hits
    pub const CUBE_RADIUS: f32 = 0.5;
    /// Bullet radius used for hits
    pub const BULLET_RADIUS: f32 = 0.2;
    /// Bullet travel per tick
    pub const BULLET_SPEED: f32 = 0.2;
    /// Wall bounces a fresh bullet may survive
    pub const BULLET_BOUNCES: u32 = 1;

    /// Player spawn pose (inside the spawn room, facing its entrance)
    pub const PLAYER_SPAWN_X: f32 = 0.0;
    pub const PLAYER_SPAWN_Z: f32 = -50.0;
    pub const PLAYER_SPAWN_ROTATION: f32 = 180.0;
    pub const PLAYER_SPEED: f32 = 0.1;
    /// Enemies never move, they only turn
    pub const ENEMY_SPEED: f32 = 0.05;
    /// Seconds between shots for any cube
    pub const SHOOT_COOLDOWN: f32 = 5.0;

    /// Degrees per tick for body rotation and camera yaw
    pub const TURN_STEP: f32 = 1.0;
    pub const YAW_STEP: f32 = 1.0;

    /// Line-of-sight sampling
    pub const SIGHT_STEP: f32 = 0.5;
    pub const SIGHT_WALL_RADIUS: f32 = 0.5;

    /// Wall heights
    pub const MAX_WALL_HEIGHT: f32 = 5.0;
    pub const MIN_RANDOM_WALL_HEIGHT: i32 = 4;
    pub const MAX_RANDOM_WALL_HEIGHT: i32 = 7;

    /// Per-axis enemy placement jitter around a room center
    pub const ENEMY_JITTER: i32 = 4;

    /// Pre-game camera orbit (degrees per tick, stop angle)
    pub const CAMERA_ORBIT_STEP: f32 = 0.1;
    pub const CAMERA_ORBIT_LIMIT: f32 = 360.1;
    /// Pre-game wall rise (start depth, depth per tick)
    pub const WALL_RISE_START: f32 = 10.0;
    pub const WALL_RISE_STEP: f32 = 0.005;
}

/// Unit travel direction for a rotation in degrees.
///
/// Rotation 0 faces -z and increases clockwise, so the direction is
/// `(sin r, -cos r)` with `y` holding the platform z axis.
#[inline]
pub fn heading(rotation_deg: f32) -> Vec2 {
    let r = rotation_deg.to_radians();
    Vec2::new(r.sin(), -r.cos())
}

/// Rotation in degrees that faces from `from` toward `to`.
#[inline]
pub fn facing(from: Vec2, to: Vec2) -> f32 {
    let delta = to - from;
    delta.x.atan2(-delta.y).to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_convention() {
        let north = heading(0.0);
        assert!(north.x.abs() < 1e-6);
        assert!((north.y + 1.0).abs() < 1e-6);

        let east = heading(90.0);
        assert!((east.x - 1.0).abs() < 1e-6);
        assert!(east.y.abs() < 1e-6);
    }

    #[test]
    fn test_facing_matches_heading() {
        let from = Vec2::new(0.0, -40.0);
        let to = Vec2::new(0.0, -50.0);
        assert!(facing(from, to).abs() < 1e-4);

        let to = Vec2::new(3.0, 7.0);
        let dir = heading(facing(from, to));
        let expected = (to - from).normalize();
        assert!((dir - expected).length() < 1e-4);
    }
}
