//! Enemy placement around the level's rooms

use glam::Vec2;
use rand::Rng;

use super::level::LEVEL_ONE_SQUARE_ROOMS;
use super::state::Cube;
use crate::consts::ENEMY_JITTER;

/// Guards placed inside the circular room of level 1
pub const LEVEL_ONE_FIXED_ENEMIES: [(f32, f32); 3] = [(14.0, 12.0), (-10.0, -8.0), (-4.0, 3.0)];

/// Place the enemies of a level
///
/// Every square room gets one or two enemies jittered around its center,
/// then the fixed guards are appended.
pub fn distribute_enemies<R: Rng>(level: u32, rng: &mut R) -> Vec<Cube> {
    let mut enemies = Vec::new();
    if level != 1 {
        log::warn!("No enemy layout for level {}", level);
        return enemies;
    }

    for &(cx, cz, _) in &LEVEL_ONE_SQUARE_ROOMS {
        let count = rng.random_range(1..=2);
        for _ in 0..count {
            let dx = rng.random_range(-ENEMY_JITTER..=ENEMY_JITTER);
            let dz = rng.random_range(-ENEMY_JITTER..=ENEMY_JITTER);
            let pos = Vec2::new((cx + dx) as f32, (cz + dz) as f32);
            enemies.push(Cube::enemy(pos));
        }
    }

    enemies.extend(
        LEVEL_ONE_FIXED_ENEMIES
            .iter()
            .map(|&(x, z)| Cube::enemy(Vec2::new(x, z))),
    );

    log::debug!("Distributed {} enemies for level {}", enemies.len(), level);
    enemies
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::ENEMY_SPEED;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_enemy_count_bounds() {
        for seed in 0..32 {
            let mut rng = Pcg32::seed_from_u64(seed);
            let enemies = distribute_enemies(1, &mut rng);
            assert!((11..=19).contains(&enemies.len()), "got {}", enemies.len());
        }
    }

    #[test]
    fn test_enemies_near_room_centers() {
        let mut rng = Pcg32::seed_from_u64(5);
        let enemies = distribute_enemies(1, &mut rng);
        let roomed = enemies.len() - LEVEL_ONE_FIXED_ENEMIES.len();

        for enemy in &enemies[..roomed] {
            let near_some_room = LEVEL_ONE_SQUARE_ROOMS.iter().any(|&(cx, cz, _)| {
                (enemy.pos.x - cx as f32).abs() <= ENEMY_JITTER as f32
                    && (enemy.pos.y - cz as f32).abs() <= ENEMY_JITTER as f32
            });
            assert!(near_some_room, "enemy at {:?} is not near a room", enemy.pos);
            assert_eq!(enemy.pos.x.fract(), 0.0);
        }
    }

    #[test]
    fn test_fixed_guards_and_initial_pose() {
        let mut rng = Pcg32::seed_from_u64(11);
        let enemies = distribute_enemies(1, &mut rng);
        let guards = &enemies[enemies.len() - 3..];
        for (guard, &(x, z)) in guards.iter().zip(LEVEL_ONE_FIXED_ENEMIES.iter()) {
            assert_eq!(guard.pos, Vec2::new(x, z));
        }
        for enemy in &enemies {
            assert_eq!(enemy.rotation, 0.0);
            assert_eq!(enemy.speed, ENEMY_SPEED);
            assert_eq!(enemy.last_shot_time, 0.0);
        }
    }

    #[test]
    fn test_same_seed_same_enemies() {
        let mut a = Pcg32::seed_from_u64(77);
        let mut b = Pcg32::seed_from_u64(77);
        assert_eq!(distribute_enemies(1, &mut a), distribute_enemies(1, &mut b));
    }

    #[test]
    fn test_unknown_level_has_no_enemies() {
        let mut rng = Pcg32::seed_from_u64(0);
        assert!(distribute_enemies(3, &mut rng).is_empty());
    }
}
