//! Read-only frame hand-off to renderers
//!
//! Everything a renderer needs is copied out of the simulation after the
//! tick completes, so drawing never holds a borrow of the live state.

use glam::Vec2;
use serde::Serialize;

use crate::sim::{GameEvent, MatchPhase, SimulationState};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CubeView {
    pub pos: Vec2,
    pub rotation: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WallView {
    pub x: i32,
    pub z: i32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BulletView {
    pub pos: Vec2,
    pub rotation: f32,
    pub enemy: bool,
}

/// One frame of world state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderSnapshot {
    pub tick: u64,
    pub phase: MatchPhase,
    pub level: u32,
    pub is_player_alive: bool,
    pub is_cleared: bool,
    pub player: CubeView,
    /// Body rotation plus yaw, the direction the view looks
    pub view_rotation: f32,
    pub camera_yaw: f32,
    pub camera_angle: f32,
    pub wall_rise: f32,
    pub enemies: Vec<CubeView>,
    pub walls: Vec<WallView>,
    pub bullets: Vec<BulletView>,
    pub events: Vec<GameEvent>,
}

impl RenderSnapshot {
    pub fn capture(state: &SimulationState) -> Self {
        let cube = |c: &crate::sim::Cube| CubeView {
            pos: c.pos,
            rotation: c.rotation,
        };

        Self {
            tick: state.time_ticks,
            phase: state.phase,
            level: state.level,
            is_player_alive: state.is_player_alive,
            is_cleared: state.is_cleared(),
            player: cube(&state.player),
            view_rotation: state.player.rotation + state.camera_yaw,
            camera_yaw: state.camera_yaw,
            camera_angle: state.camera_angle,
            wall_rise: state.wall_rise,
            enemies: state.enemies.iter().map(cube).collect(),
            walls: state
                .walls
                .iter()
                .map(|w| WallView {
                    x: w.x,
                    z: w.z,
                    height: w.height,
                })
                .collect(),
            bullets: state
                .bullets
                .iter()
                .map(|b| BulletView {
                    pos: b.pos,
                    rotation: b.rotation,
                    enemy: b.enemy,
                })
                .collect(),
            events: state.events.clone(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Consumer of finished frames
pub trait Renderer {
    fn draw(&mut self, frame: &RenderSnapshot);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::{Bullet, Cube, Wall};

    #[derive(Default)]
    struct Recorder {
        frames: Vec<RenderSnapshot>,
    }

    impl Renderer for Recorder {
        fn draw(&mut self, frame: &RenderSnapshot) {
            self.frames.push(frame.clone());
        }
    }

    #[test]
    fn test_capture_copies_entities() {
        let mut state = SimulationState::from_parts(
            Settings::default(),
            vec![Wall::new(3, 4, 6.0)],
            vec![Cube::enemy(Vec2::new(10.0, 0.0))],
        )
        .unwrap();
        state.camera_yaw = 15.0;
        state
            .bullets
            .push(Bullet::new(Vec2::new(1.0, 2.0), 45.0, true));

        let frame = RenderSnapshot::capture(&state);
        assert_eq!(frame.phase, MatchPhase::PreGame);
        assert_eq!(frame.player.pos, Vec2::new(0.0, -50.0));
        assert_eq!(frame.view_rotation, 195.0);
        assert_eq!(frame.enemies.len(), 1);
        assert_eq!(
            frame.walls,
            vec![WallView {
                x: 3,
                z: 4,
                height: 6.0
            }]
        );
        assert!(frame.bullets[0].enemy);
        assert!(!frame.is_cleared);
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut state = SimulationState::from_parts(Settings::default(), vec![], vec![]).unwrap();
        let mut recorder = Recorder::default();
        recorder.draw(&RenderSnapshot::capture(&state));

        state.player.pos = Vec2::new(5.0, 5.0);
        assert_eq!(recorder.frames[0].player.pos, Vec2::new(0.0, -50.0));
        assert!(recorder.frames[0].is_cleared);
    }

    #[test]
    fn test_snapshot_json() {
        let state = SimulationState::from_parts(Settings::default(), vec![], vec![]).unwrap();
        let json = RenderSnapshot::capture(&state).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["phase"], "PreGame");
        assert_eq!(value["is_player_alive"], true);
    }
}
