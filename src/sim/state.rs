//! Simulation state and entity types
//!
//! Positions are `Vec2` on the platform plane: `x` is world x, `y` is world z.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::enemies::distribute_enemies;
use super::level::generate_level;
use crate::consts::*;
use crate::settings::{Settings, SettingsError};
use crate::heading;

/// Current phase of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPhase {
    /// Camera orbits the level, walls rise, player is frozen
    PreGame,
    /// Full simulation runs
    Active,
    /// Player was hit
    Defeated,
    /// Every enemy is gone
    Cleared,
}

impl MatchPhase {
    /// Terminal phases wait for a confirm to restart
    pub fn is_over(self) -> bool {
        matches!(self, MatchPhase::Defeated | MatchPhase::Cleared)
    }
}

/// Something that happened during a tick (for renderers, audio, logs)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ShotFired { pos: Vec2, rotation: f32, enemy: bool },
    BulletBounced { pos: Vec2 },
    BulletExpired { pos: Vec2 },
    EnemyKilled { pos: Vec2 },
    PlayerKilled { pos: Vec2 },
    PhaseChanged { from: MatchPhase, to: MatchPhase },
}

/// Player or enemy cube
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cube {
    pub pos: Vec2,
    /// Degrees, 0 faces -z, clockwise positive
    pub rotation: f32,
    /// Units per tick
    pub speed: f32,
    /// Clock seconds of the last shot
    pub last_shot_time: f32,
    /// Seconds between shots
    pub shoot_cooldown: f32,
}

impl Cube {
    pub fn new(pos: Vec2, rotation: f32, speed: f32) -> Self {
        Self {
            pos,
            rotation,
            speed,
            last_shot_time: 0.0,
            shoot_cooldown: SHOOT_COOLDOWN,
        }
    }

    /// Player at the spawn pose
    pub fn player(settings: &Settings) -> Self {
        Self {
            shoot_cooldown: settings.shoot_cooldown,
            ..Self::new(
                Vec2::new(PLAYER_SPAWN_X, PLAYER_SPAWN_Z),
                PLAYER_SPAWN_ROTATION,
                settings.player_speed,
            )
        }
    }

    /// Enemy facing north with no shot history
    pub fn enemy(pos: Vec2) -> Self {
        Self::new(pos, 0.0, ENEMY_SPEED)
    }

    pub fn rotate_left(&mut self, step: f32) {
        self.rotation -= step;
    }

    pub fn rotate_right(&mut self, step: f32) {
        self.rotation += step;
    }

    pub fn move_forward(&mut self) {
        self.pos += heading(self.rotation) * self.speed;
    }

    pub fn move_backward(&mut self) {
        self.pos -= heading(self.rotation) * self.speed;
    }

    /// Strictly more than the cooldown must have passed
    pub fn can_shoot(&self, clock: f32) -> bool {
        clock - self.last_shot_time > self.shoot_cooldown
    }
}

/// Axis-aligned wall unit on the integer grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Wall {
    pub x: i32,
    pub z: i32,
    /// Render height only
    pub height: f32,
}

impl Wall {
    pub fn new(x: i32, z: i32, height: f32) -> Self {
        Self { x, z, height }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x as f32, self.z as f32)
    }

    #[inline]
    pub fn grid(&self) -> (i32, i32) {
        (self.x, self.z)
    }
}

/// A bouncing projectile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bullet {
    pub pos: Vec2,
    /// Travel direction in degrees
    pub rotation: f32,
    /// Bounces left before the next one destroys the bullet
    pub bounce: u32,
    /// Fired by an enemy (hurts the player) or by the player (hurts enemies)
    pub enemy: bool,
    /// Grid coordinates of walls this bullet bounced off
    #[serde(default)]
    pub collided_walls: Vec<(i32, i32)>,
}

impl Bullet {
    pub fn new(pos: Vec2, rotation: f32, enemy: bool) -> Self {
        Self {
            pos,
            rotation,
            bounce: BULLET_BOUNCES,
            enemy,
            collided_walls: Vec::new(),
        }
    }
}

/// Complete simulation state, owned by the tick loop
#[derive(Debug, Clone)]
pub struct SimulationState {
    pub settings: Settings,
    /// Current level index
    pub level: u32,
    pub phase: MatchPhase,
    pub is_player_alive: bool,
    /// Set by the quit input; the driver stops between ticks
    pub quit_requested: bool,
    /// Simulation tick counter
    pub time_ticks: u64,

    pub player: Cube,
    pub enemies: Vec<Cube>,
    /// Immutable after generation
    pub walls: Vec<Wall>,
    pub bullets: Vec<Bullet>,

    /// View yaw relative to the player's body, degrees
    pub camera_yaw: f32,
    /// Pre-game orbit angle, degrees
    pub camera_angle: f32,
    /// Pre-game depth of the walls below the floor
    pub wall_rise: f32,

    /// Events recorded during the last tick
    pub events: Vec<GameEvent>,

    /// Enemy layout restored on restart
    roster: Vec<Cube>,
}

impl SimulationState {
    /// Build a match, seeding the layout RNG from the settings
    pub fn new(settings: Settings) -> Result<Self, SettingsError> {
        let mut rng = Pcg32::seed_from_u64(settings.seed);
        Self::with_rng(settings, &mut rng)
    }

    /// Build a match drawing wall heights and enemy jitter from `rng`
    pub fn with_rng<R: Rng>(settings: Settings, rng: &mut R) -> Result<Self, SettingsError> {
        settings.validate()?;
        let walls = generate_level(settings.level, rng);
        let enemies = distribute_enemies(settings.level, rng);
        log::info!(
            "Level {} ready: {} walls, {} enemies",
            settings.level,
            walls.len(),
            enemies.len()
        );
        Self::from_parts(settings, walls, enemies)
    }

    /// Build a match from an explicit layout; fails on invalid settings
    pub fn from_parts(
        settings: Settings,
        walls: Vec<Wall>,
        enemies: Vec<Cube>,
    ) -> Result<Self, SettingsError> {
        settings.validate()?;
        let enemies: Vec<Cube> = enemies
            .into_iter()
            .map(|mut enemy| {
                enemy.speed = settings.enemy_speed;
                enemy.shoot_cooldown = settings.shoot_cooldown;
                enemy
            })
            .collect();

        Ok(Self {
            level: settings.level,
            phase: MatchPhase::PreGame,
            is_player_alive: true,
            quit_requested: false,
            time_ticks: 0,
            player: Cube::player(&settings),
            roster: enemies.clone(),
            enemies,
            walls,
            bullets: Vec::new(),
            camera_yaw: 0.0,
            camera_angle: 0.0,
            wall_rise: WALL_RISE_START,
            events: Vec::new(),
            settings,
        })
    }

    /// Border coordinate on both axes
    #[inline]
    pub fn half_platform(&self) -> f32 {
        self.settings.half_platform()
    }

    /// No enemies left
    pub fn is_cleared(&self) -> bool {
        self.enemies.is_empty()
    }

    /// Move to a new phase, recording the transition
    pub fn set_phase(&mut self, phase: MatchPhase) {
        if self.phase != phase {
            log::info!("Phase {:?} -> {:?}", self.phase, phase);
            self.events.push(GameEvent::PhaseChanged {
                from: self.phase,
                to: phase,
            });
            self.phase = phase;
        }
    }

    /// Reset the match to the pre-game with the initial layout
    pub fn restart(&mut self) {
        self.player = Cube::player(&self.settings);
        self.enemies = self.roster.clone();
        self.bullets.clear();
        self.is_player_alive = true;
        self.camera_yaw = 0.0;
        self.camera_angle = 0.0;
        self.wall_rise = WALL_RISE_START;
        self.set_phase(MatchPhase::PreGame);
    }
}
