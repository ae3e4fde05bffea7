//! Cube Arena headless driver
//!
//! Runs one match with a simple autopilot at a fixed timestep and prints the
//! final frame as JSON.
//!
//! Usage: `cube-arena [settings.json]`

use std::path::Path;

use cube_arena::consts::*;
use cube_arena::sim::{
    Cube, GameEvent, MatchPhase, SimulationState, TickInput, has_line_of_sight, tick,
};
use cube_arena::{RenderSnapshot, Renderer, Settings, SettingsError, facing};

/// Wall-clock length of one driver frame
const FRAME_DT: f32 = 1.0 / 30.0;
/// Hard stop for matches that never resolve
const MAX_TICKS: u64 = 60 * 60 * 10;
/// Fire when the view is this close to the target bearing (degrees)
const AIM_TOLERANCE: f32 = 2.0;

/// Renderer that writes notable events to the log
#[derive(Default)]
struct LogRenderer {
    frames: u64,
}

impl Renderer for LogRenderer {
    fn draw(&mut self, frame: &RenderSnapshot) {
        self.frames += 1;
        for event in &frame.events {
            match event {
                GameEvent::PhaseChanged { from, to } => {
                    log::info!("[tick {}] {:?} -> {:?}", frame.tick, from, to);
                }
                GameEvent::EnemyKilled { pos } => {
                    log::info!(
                        "[tick {}] enemy down at ({:.1}, {:.1}), {} left",
                        frame.tick,
                        pos.x,
                        pos.y,
                        frame.enemies.len()
                    );
                }
                GameEvent::PlayerKilled { pos } => {
                    log::info!("[tick {}] player hit at ({:.1}, {:.1})", frame.tick, pos.x, pos.y);
                }
                other => log::trace!("[tick {}] {:?}", frame.tick, other),
            }
        }
    }
}

/// Game instance holding all driver state
struct Game {
    state: SimulationState,
    renderer: LogRenderer,
    accumulator: f32,
    /// Simulated seconds since start
    clock: f32,
}

impl Game {
    fn new(settings: Settings) -> Result<Self, SettingsError> {
        Ok(Self {
            state: SimulationState::new(settings)?,
            renderer: LogRenderer::default(),
            accumulator: 0.0,
            clock: 0.0,
        })
    }

    /// Run simulation ticks for one frame
    fn update(&mut self, dt: f32) {
        let dt = dt.min(0.1);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.clock += SIM_DT;
            let input = autopilot(&self.state, self.clock);
            tick(&mut self.state, &input);
            self.renderer.draw(&RenderSnapshot::capture(&self.state));
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
    }

    fn finished(&self) -> bool {
        self.state.phase.is_over()
            || self.state.quit_requested
            || self.state.time_ticks >= MAX_TICKS
    }
}

/// Wrap an angle into [-180, 180)
fn wrap_degrees(angle: f32) -> f32 {
    (angle + 180.0).rem_euclid(360.0) - 180.0
}

/// Pick inputs for the next tick.
///
/// Waits out the pre-game orbit, then turns toward the nearest enemy in
/// sight and fires once aligned. With nobody in sight it walks toward the
/// nearest enemy instead.
fn autopilot(state: &SimulationState, clock: f32) -> TickInput {
    let mut input = TickInput {
        clock,
        ..Default::default()
    };

    match state.phase {
        MatchPhase::PreGame => {
            input.confirm = state.camera_angle >= CAMERA_ORBIT_LIMIT;
        }
        MatchPhase::Active => {
            let player = state.player.pos;
            let by_distance = |a: &&Cube, b: &&Cube| {
                a.pos
                    .distance_squared(player)
                    .total_cmp(&b.pos.distance_squared(player))
            };
            let visible = state
                .enemies
                .iter()
                .filter(|e| has_line_of_sight(player, e.pos, &state.walls))
                .min_by(by_distance);
            let target = visible.or_else(|| state.enemies.iter().min_by(by_distance));

            if let Some(enemy) = target {
                let view = state.player.rotation + state.camera_yaw;
                let diff = wrap_degrees(facing(player, enemy.pos) - view);
                let half_step = state.settings.turn_step * 0.5;
                input.rotate_right = diff > half_step;
                input.rotate_left = diff < -half_step;
                input.fire = visible.is_some() && diff.abs() <= AIM_TOLERANCE;
                input.move_forward = visible.is_none();
            }
        }
        MatchPhase::Defeated | MatchPhase::Cleared => {}
    }

    input
}

fn load_settings() -> Result<Settings, SettingsError> {
    match std::env::args().nth(1) {
        Some(path) => Settings::load(Path::new(&path)),
        None => {
            log::info!("No settings file given, using defaults");
            Ok(Settings::default())
        }
    }
}

fn main() {
    env_logger::init();
    log::info!("Cube Arena (headless) starting...");

    let mut game = match load_settings().and_then(Game::new) {
        Ok(game) => game,
        Err(e) => {
            log::error!("Failed to set up match: {}", e);
            std::process::exit(1);
        }
    };
    while !game.finished() {
        game.update(FRAME_DT);
    }

    log::info!(
        "Match ended after {} ticks ({} frames drawn): {:?}",
        game.state.time_ticks,
        game.renderer.frames,
        game.state.phase
    );

    match RenderSnapshot::capture(&game.state).to_json() {
        Ok(json) => println!("{}", json),
        Err(e) => {
            log::error!("Failed to serialize final frame: {}", e);
            std::process::exit(1);
        }
    }
}
