//! Fixed timestep simulation tick
//!
//! Advances a match by one step. While active, the order inside a tick is:
//! player input, bullets, player collision, enemy fire, outcome. Later steps
//! see the effects of earlier ones.

use glam::Vec2;

use super::collision::{
    border_hit, clamp_to_platform, first_wall_hit, has_line_of_sight, push_out, reflect_off_wall,
    reflect_x, reflect_z, within_radius,
};
use super::state::{Bullet, GameEvent, MatchPhase, SimulationState};
use crate::consts::*;
use crate::{facing, heading};

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub rotate_left: bool,
    pub rotate_right: bool,
    pub move_forward: bool,
    pub move_backward: bool,
    /// Turn the view without turning the body
    pub yaw_left: bool,
    pub yaw_right: bool,
    pub fire: bool,
    /// Start the match / restart after it ends
    pub confirm: bool,
    pub quit: bool,
    /// Monotonic clock in seconds (cooldown timing)
    pub clock: f32,
}

/// Advance the simulation by one step
pub fn tick(state: &mut SimulationState, input: &TickInput) {
    state.events.clear();

    if input.quit {
        if !state.quit_requested {
            log::info!("Quit requested at tick {}", state.time_ticks);
        }
        state.quit_requested = true;
        return;
    }

    state.time_ticks += 1;

    match state.phase {
        MatchPhase::PreGame => {
            advance_pregame(state);
            if input.confirm {
                state.camera_angle = 0.0;
                state.wall_rise = 0.0;
                state.set_phase(MatchPhase::Active);
            }
        }

        MatchPhase::Active => {
            apply_player_input(state, input);
            update_bullets(state);
            check_player_collision(state);
            enemy_shoot_at_player(state, input.clock);

            // A simultaneous kill and clear counts as a defeat
            if !state.is_player_alive {
                log::info!("Player has been defeated");
                state.set_phase(MatchPhase::Defeated);
            } else if state.is_cleared() {
                log::info!("All enemies cleared");
                state.set_phase(MatchPhase::Cleared);
            }
        }

        MatchPhase::Defeated | MatchPhase::Cleared => {
            if input.confirm {
                state.restart();
            }
        }
    }
}

/// Orbit the overview camera and raise the walls
pub fn advance_pregame(state: &mut SimulationState) {
    if state.camera_angle < CAMERA_ORBIT_LIMIT {
        state.camera_angle += CAMERA_ORBIT_STEP;
    }
    if state.wall_rise > 0.0 {
        state.wall_rise = (state.wall_rise - WALL_RISE_STEP).max(0.0);
    }
}

fn spawn_bullet(
    bullets: &mut Vec<Bullet>,
    events: &mut Vec<GameEvent>,
    pos: Vec2,
    rotation: f32,
    enemy: bool,
) {
    log::debug!(
        "{} shot from ({:.1}, {:.1}) at {:.1} deg",
        if enemy { "Enemy" } else { "Player" },
        pos.x,
        pos.y,
        rotation
    );
    bullets.push(Bullet::new(pos, rotation, enemy));
    events.push(GameEvent::ShotFired {
        pos,
        rotation,
        enemy,
    });
}

/// Turn, move, yaw the camera and fire the player's weapon
pub fn apply_player_input(state: &mut SimulationState, input: &TickInput) {
    let turn = state.settings.turn_step;
    let yaw = state.settings.yaw_step;

    let player = &mut state.player;
    if input.rotate_left {
        player.rotate_left(turn);
    }
    if input.rotate_right {
        player.rotate_right(turn);
    }
    if input.move_forward {
        player.move_forward();
    }
    if input.move_backward {
        player.move_backward();
    }

    if input.yaw_left {
        state.camera_yaw -= yaw;
    }
    if input.yaw_right {
        state.camera_yaw += yaw;
    }

    if input.fire && state.player.can_shoot(input.clock) {
        let rotation = state.player.rotation + state.camera_yaw;
        spawn_bullet(
            &mut state.bullets,
            &mut state.events,
            state.player.pos,
            rotation,
            false,
        );
        state.player.last_shot_time = input.clock;
    }
}

/// Move every bullet, bounce it off borders and walls, and resolve hits.
///
/// Bullets and enemies to delete are collected during the pass and erased
/// afterwards in descending index order so no index shifts mid-pass.
pub fn update_bullets(state: &mut SimulationState) {
    let half = state.half_platform();
    let speed = state.settings.bullet_speed;
    let dedup = state.settings.dedup_wall_bounces;
    let hit_radius = BULLET_RADIUS + CUBE_RADIUS;

    let mut bullets_to_remove: Vec<usize> = Vec::new();
    let mut enemies_to_remove: Vec<usize> = Vec::new();

    for (i, bullet) in state.bullets.iter_mut().enumerate() {
        bullet.pos += heading(bullet.rotation) * speed;

        // Staged so a spent bullet is removed rather than redirected
        let mut rotation = bullet.rotation;
        let mut bounced = false;

        let border = border_hit(bullet.pos, half);
        if border.any() {
            bounced = true;
            if border.x {
                rotation = reflect_x(rotation);
            }
            if border.z {
                rotation = reflect_z(rotation);
            }
        }

        let ignore: &[(i32, i32)] = if dedup { &bullet.collided_walls } else { &[] };
        if let Some(wall) = first_wall_hit(bullet.pos, &state.walls, ignore) {
            rotation = reflect_off_wall(rotation, bullet.pos, wall);
            bounced = true;
            let cell = wall.grid();
            if !bullet.collided_walls.contains(&cell) {
                bullet.collided_walls.push(cell);
            }
        }

        if bullet.enemy {
            if within_radius(bullet.pos, state.player.pos, hit_radius) {
                state.is_player_alive = false;
                bullets_to_remove.push(i);
                state.events.push(GameEvent::PlayerKilled {
                    pos: state.player.pos,
                });
            }
        } else {
            let target = state
                .enemies
                .iter()
                .enumerate()
                .find(|&(j, enemy)| {
                    !enemies_to_remove.contains(&j)
                        && within_radius(bullet.pos, enemy.pos, hit_radius)
                })
                .map(|(j, _)| j);
            if let Some(j) = target {
                enemies_to_remove.push(j);
                bullets_to_remove.push(i);
            }
        }

        if bounced {
            if bullet.bounce > 0 {
                bullet.bounce -= 1;
                bullet.rotation = rotation;
                state.events.push(GameEvent::BulletBounced { pos: bullet.pos });
            } else {
                bullets_to_remove.push(i);
                state.events.push(GameEvent::BulletExpired { pos: bullet.pos });
            }
        }
    }

    // A bullet can be listed twice (hit and expired in the same tick)
    bullets_to_remove.sort_unstable();
    bullets_to_remove.dedup();
    for &i in bullets_to_remove.iter().rev() {
        state.bullets.remove(i);
    }

    enemies_to_remove.sort_unstable();
    for &j in enemies_to_remove.iter().rev() {
        let enemy = state.enemies.remove(j);
        log::debug!("Enemy at ({:.1}, {:.1}) destroyed", enemy.pos.x, enemy.pos.y);
        state.events.push(GameEvent::EnemyKilled { pos: enemy.pos });
    }
}

/// Keep the player on the platform and out of walls
pub fn check_player_collision(state: &mut SimulationState) {
    let half = state.half_platform();
    let mut pos = clamp_to_platform(state.player.pos, half, CUBE_HALF_EXTENT);
    for wall in &state.walls {
        pos = push_out(pos, CUBE_HALF_EXTENT, wall);
    }
    // Border walls can push outward
    state.player.pos = clamp_to_platform(pos, half, CUBE_HALF_EXTENT);
}

/// Turn every enemy toward the player and fire where sight and cooldown allow
pub fn enemy_shoot_at_player(state: &mut SimulationState, clock: f32) {
    let target = state.player.pos;
    for enemy in state.enemies.iter_mut() {
        enemy.rotation = facing(enemy.pos, target);
        if enemy.can_shoot(clock) && has_line_of_sight(enemy.pos, target, &state.walls) {
            spawn_bullet(
                &mut state.bullets,
                &mut state.events,
                enemy.pos,
                enemy.rotation,
                true,
            );
            enemy.last_shot_time = clock;
        }
    }
}
