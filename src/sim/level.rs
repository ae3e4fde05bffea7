//! Level layout from declarative room templates
//!
//! Room placement is fixed per level; only wall heights draw from the RNG.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::Wall;
use crate::consts::*;

/// Square rooms of level 1 as `(center_x, center_z, size)`
pub const LEVEL_ONE_SQUARE_ROOMS: [(i32, i32, i32); 8] = [
    (-50, -50, 20),
    (50, -50, 20),
    (-50, 50, 20),
    (50, 50, 20),
    (35, -15, 15),
    (-20, 25, 12),
    (-40, -10, 18),
    (30, 33, 8),
];

/// Circular rooms of level 1 as `(center_x, center_z, radius)`
pub const LEVEL_ONE_ROUND_ROOMS: [(i32, i32, i32); 1] = [(0, 0, 20)];

/// Crosses of level 1 as `(center_x, center_z, arm_length)`
pub const LEVEL_ONE_CROSSES: [(i32, i32, i32); 1] = [(0, 0, 10)];

/// Spawn room of level 1 as `(center_x, center_z, size)`
pub const LEVEL_ONE_SPAWN_ROOM: (i32, i32, i32) = (0, -50, 20);

/// Half-width of an entrance gap (gap spans `-1..=1` around a side midpoint)
const GAP_HALF_WIDTH: i32 = 1;

/// A room shape placed on the grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RoomTemplate {
    /// Square perimeter with an entrance on every side
    Square {
        center: (i32, i32),
        size: i32,
        height: Option<f32>,
    },
    /// One-cell ring with 3-cell entrances at the four cardinal extremes
    Circular {
        center: (i32, i32),
        radius: i32,
        height: Option<f32>,
    },
    /// Plus-shaped pair of one-cell corridors
    Cross {
        center: (i32, i32),
        arm_length: i32,
        height: Option<f32>,
    },
    /// Square perimeter with a single entrance on the +z side
    Spawn {
        center: (i32, i32),
        size: i32,
        height: Option<f32>,
    },
}

impl RoomTemplate {
    pub fn square(x: i32, z: i32, size: i32) -> Self {
        RoomTemplate::Square {
            center: (x, z),
            size,
            height: None,
        }
    }

    pub fn circular(x: i32, z: i32, radius: i32) -> Self {
        RoomTemplate::Circular {
            center: (x, z),
            radius,
            height: None,
        }
    }

    pub fn cross(x: i32, z: i32, arm_length: i32) -> Self {
        RoomTemplate::Cross {
            center: (x, z),
            arm_length,
            height: None,
        }
    }

    pub fn spawn(x: i32, z: i32, size: i32) -> Self {
        RoomTemplate::Spawn {
            center: (x, z),
            size,
            height: Some(MAX_WALL_HEIGHT),
        }
    }

    /// Append this room's walls
    pub fn build<R: Rng>(&self, walls: &mut Vec<Wall>, rng: &mut R) {
        match *self {
            RoomTemplate::Square {
                center,
                size,
                height,
            } => {
                let half = size / 2;
                for x in -half..=half {
                    for z in -half..=half {
                        if on_perimeter(x, z, half) && !in_side_gap(x, z, half) {
                            push_wall(walls, center, x, z, height, rng);
                        }
                    }
                }
            }
            RoomTemplate::Circular {
                center,
                radius,
                height,
            } => {
                let outer = radius * radius;
                let inner = (radius - 1) * (radius - 1);
                for x in -radius..=radius {
                    for z in -radius..=radius {
                        let d2 = x * x + z * z;
                        let in_ring = d2 <= outer && d2 > inner;
                        // Ring cells near an axis sit on the N/S or E/W arcs
                        let north_south_gap = x.abs() <= GAP_HALF_WIDTH;
                        let east_west_gap = z.abs() <= GAP_HALF_WIDTH;
                        if in_ring && !north_south_gap && !east_west_gap {
                            push_wall(walls, center, x, z, height, rng);
                        }
                    }
                }
            }
            RoomTemplate::Cross {
                center,
                arm_length,
                height,
            } => {
                // Intersection is emitted by both arms
                for z in -arm_length..=arm_length {
                    push_wall(walls, center, 0, z, height, rng);
                }
                for x in -arm_length..=arm_length {
                    push_wall(walls, center, x, 0, height, rng);
                }
            }
            RoomTemplate::Spawn {
                center,
                size,
                height,
            } => {
                let half = size / 2;
                for x in -half..=half {
                    for z in -half..=half {
                        let entrance =
                            z == half && (-GAP_HALF_WIDTH..=GAP_HALF_WIDTH).contains(&x);
                        if on_perimeter(x, z, half) && !entrance {
                            push_wall(walls, center, x, z, height, rng);
                        }
                    }
                }
            }
        }
    }
}

#[inline]
fn on_perimeter(x: i32, z: i32, half: i32) -> bool {
    x == -half || x == half || z == -half || z == half
}

/// Cell lies in the 3-wide gap at the middle of any side
#[inline]
fn in_side_gap(x: i32, z: i32, half: i32) -> bool {
    let gap = -GAP_HALF_WIDTH..=GAP_HALF_WIDTH;
    (gap.contains(&x) && (z == -half || z == half))
        || (gap.contains(&z) && (x == -half || x == half))
}

fn push_wall<R: Rng>(
    walls: &mut Vec<Wall>,
    center: (i32, i32),
    x: i32,
    z: i32,
    height: Option<f32>,
    rng: &mut R,
) {
    let height = height.unwrap_or_else(|| {
        rng.random_range(MIN_RANDOM_WALL_HEIGHT..=MAX_RANDOM_WALL_HEIGHT) as f32
    });
    walls.push(Wall::new(center.0 + x, center.1 + z, height));
}

/// Room templates that make up a level (empty for unknown levels)
pub fn level_rooms(level: u32) -> Vec<RoomTemplate> {
    match level {
        1 => {
            let mut rooms = Vec::new();
            rooms.extend(
                LEVEL_ONE_SQUARE_ROOMS
                    .iter()
                    .map(|&(x, z, size)| RoomTemplate::square(x, z, size)),
            );
            rooms.extend(
                LEVEL_ONE_ROUND_ROOMS
                    .iter()
                    .map(|&(x, z, radius)| RoomTemplate::circular(x, z, radius)),
            );
            rooms.extend(
                LEVEL_ONE_CROSSES
                    .iter()
                    .map(|&(x, z, arm)| RoomTemplate::cross(x, z, arm)),
            );
            let (x, z, size) = LEVEL_ONE_SPAWN_ROOM;
            rooms.push(RoomTemplate::spawn(x, z, size));
            rooms
        }
        _ => Vec::new(),
    }
}

/// Build the wall set for a level
pub fn generate_level<R: Rng>(level: u32, rng: &mut R) -> Vec<Wall> {
    let rooms = level_rooms(level);
    if rooms.is_empty() {
        log::warn!("No layout for level {}, generating an empty arena", level);
        return Vec::new();
    }

    let mut walls = Vec::new();
    for room in &rooms {
        room.build(&mut walls, rng);
    }
    log::info!(
        "Level {}: {} rooms, {} walls",
        level,
        rooms.len(),
        walls.len()
    );
    walls
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use std::collections::HashSet;

    fn build(room: RoomTemplate) -> Vec<Wall> {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut walls = Vec::new();
        room.build(&mut walls, &mut rng);
        walls
    }

    fn cells(walls: &[Wall]) -> HashSet<(i32, i32)> {
        walls.iter().map(Wall::grid).collect()
    }

    #[test]
    fn test_square_room_counts() {
        // 21 cells per side, 80 perimeter cells, minus 4 gaps of 3
        assert_eq!(build(RoomTemplate::square(0, 0, 20)).len(), 68);
        // Odd sizes round down: 15 cells per side
        assert_eq!(build(RoomTemplate::square(0, 0, 15)).len(), 44);
        assert_eq!(build(RoomTemplate::square(0, 0, 8)).len(), 20);
    }

    #[test]
    fn test_square_room_gaps_are_three_wide() {
        let (cx, cz) = (35, -15);
        let half = 15 / 2;
        let set = cells(&build(RoomTemplate::square(cx, cz, 15)));

        for side in [-half, half] {
            // Rows z = cz +- half
            for dx in -1..=1 {
                assert!(!set.contains(&(cx + dx, cz + side)));
                assert!(!set.contains(&(cx + side, cz + dx)));
            }
            for dx in [-2, 2] {
                assert!(set.contains(&(cx + dx, cz + side)));
                assert!(set.contains(&(cx + side, cz + dx)));
            }
        }
    }

    #[test]
    fn test_random_heights_in_range() {
        for wall in build(RoomTemplate::square(0, 0, 20)) {
            assert!((4.0..=7.0).contains(&wall.height));
            assert_eq!(wall.height.fract(), 0.0);
        }
    }

    #[test]
    fn test_circular_room_ring() {
        let radius = 20;
        let walls = build(RoomTemplate::circular(0, 0, radius));
        let set = cells(&walls);
        for wall in &walls {
            let d2 = wall.x * wall.x + wall.z * wall.z;
            assert!(d2 <= radius * radius);
            assert!(d2 > (radius - 1) * (radius - 1));
        }
        for extreme in [(0, radius), (0, -radius), (radius, 0), (-radius, 0)] {
            assert!(!set.contains(&extreme));
        }
    }

    #[test]
    fn test_circular_room_gaps_are_three_wide() {
        let walls = build(RoomTemplate::circular(0, 0, 20));
        let set = cells(&walls);

        // North arc near the axis: x = +-1 sit one row in from the extreme
        let north: Vec<_> = walls
            .iter()
            .map(Wall::grid)
            .filter(|&(x, z)| x.abs() <= 2 && z > 15)
            .collect();
        assert_eq!(north, vec![(-2, 19), (2, 19)]);

        for (x, z) in [(-1, 19), (1, 19), (-1, -19), (1, -19), (19, 1), (19, -1), (-19, 1)] {
            assert!(!set.contains(&(x, z)), "({x}, {z}) blocks an entrance");
        }
        for (x, z) in [(2, -19), (-2, -19), (19, 2), (-19, -2)] {
            assert!(set.contains(&(x, z)));
        }
    }

    #[test]
    fn test_cross_keeps_duplicate_center() {
        let walls = build(RoomTemplate::cross(3, 4, 10));
        assert_eq!(walls.len(), 42);
        assert_eq!(walls.iter().filter(|w| w.grid() == (3, 4)).count(), 2);
        assert_eq!(cells(&walls).len(), 41);
    }

    #[test]
    fn test_spawn_room_single_entrance() {
        let (cx, cz, size) = LEVEL_ONE_SPAWN_ROOM;
        let half = size / 2;
        let walls = build(RoomTemplate::spawn(cx, cz, size));
        assert_eq!(walls.len(), 77);
        assert!(walls.iter().all(|w| w.height == MAX_WALL_HEIGHT));

        let set = cells(&walls);
        for dx in -1..=1 {
            assert!(!set.contains(&(cx + dx, cz + half)));
            assert!(set.contains(&(cx + dx, cz - half)));
            assert!(set.contains(&(cx + half, cz + dx)));
            assert!(set.contains(&(cx - half, cz + dx)));
        }
    }

    #[test]
    fn test_level_positions_ignore_seed() {
        let mut a = Pcg32::seed_from_u64(1);
        let mut b = Pcg32::seed_from_u64(2);
        let walls_a = generate_level(1, &mut a);
        let walls_b = generate_level(1, &mut b);
        let pos_a: Vec<_> = walls_a.iter().map(Wall::grid).collect();
        let pos_b: Vec<_> = walls_b.iter().map(Wall::grid).collect();
        assert_eq!(pos_a, pos_b);
    }

    #[test]
    fn test_level_same_seed_same_heights() {
        let mut a = Pcg32::seed_from_u64(9);
        let mut b = Pcg32::seed_from_u64(9);
        assert_eq!(generate_level(1, &mut a), generate_level(1, &mut b));
    }

    #[test]
    fn test_level_one_room_count() {
        assert_eq!(level_rooms(1).len(), 11);
        assert!(level_rooms(2).is_empty());
        let mut rng = Pcg32::seed_from_u64(3);
        assert!(generate_level(2, &mut rng).is_empty());
    }
}
