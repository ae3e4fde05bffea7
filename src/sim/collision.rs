//! Collision tests against axis-aligned walls and the platform border
//!
//! Walls are unit boxes centered on integer grid points. Bullets are tested
//! as points, cubes as boxes, and bullet hits use a circular distance.

use glam::Vec2;

use super::state::Wall;
use crate::consts::*;

/// Which platform borders a point has reached
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BorderHit {
    pub x: bool,
    pub z: bool,
}

impl BorderHit {
    #[inline]
    pub fn any(&self) -> bool {
        self.x || self.z
    }
}

/// Check a point against the border at `+-half` on both axes (inclusive)
pub fn border_hit(pos: Vec2, half: f32) -> BorderHit {
    BorderHit {
        x: pos.x <= -half || pos.x >= half,
        z: pos.y <= -half || pos.y >= half,
    }
}

/// Keep a box of `extent` half-width fully on the platform
pub fn clamp_to_platform(pos: Vec2, half: f32, extent: f32) -> Vec2 {
    let limit = half - extent;
    pos.clamp(Vec2::splat(-limit), Vec2::splat(limit))
}

/// Point strictly inside a wall's box
#[inline]
pub fn point_in_wall(pos: Vec2, wall: &Wall) -> bool {
    let d = (pos - wall.center()).abs();
    d.x < WALL_HALF_EXTENT && d.y < WALL_HALF_EXTENT
}

/// First wall (in layout order) containing the point, skipping `ignore`d cells
pub fn first_wall_hit<'a>(pos: Vec2, walls: &'a [Wall], ignore: &[(i32, i32)]) -> Option<&'a Wall> {
    walls
        .iter()
        .find(|w| point_in_wall(pos, w) && !ignore.contains(&w.grid()))
}

/// Mirror a travel direction across the x axis (hit an x-facing surface)
#[inline]
pub fn reflect_x(rotation: f32) -> f32 {
    -rotation
}

/// Mirror a travel direction across the z axis (hit a z-facing surface)
#[inline]
pub fn reflect_z(rotation: f32) -> f32 {
    180.0 - rotation
}

/// New rotation after bouncing off a wall the point is inside.
///
/// The axis with the larger center distance is the face that was crossed.
/// Strictly larger x reflects on x; ties reflect on z.
pub fn reflect_off_wall(rotation: f32, pos: Vec2, wall: &Wall) -> f32 {
    let d = (pos - wall.center()).abs();
    if d.x > d.y {
        reflect_x(rotation)
    } else {
        reflect_z(rotation)
    }
}

/// Per-axis overlap of a cube box with a wall box, if they intersect
pub fn box_overlap(pos: Vec2, extent: f32, wall: &Wall) -> Option<Vec2> {
    let reach = extent + WALL_HALF_EXTENT;
    let d = (pos - wall.center()).abs();
    if d.x < reach && d.y < reach {
        Some(Vec2::splat(reach) - d)
    } else {
        None
    }
}

/// Minimum translation out of a wall along the axis of smaller overlap.
///
/// Returns the position unchanged when there is no overlap.
pub fn push_out(pos: Vec2, extent: f32, wall: &Wall) -> Vec2 {
    let Some(overlap) = box_overlap(pos, extent, wall) else {
        return pos;
    };
    let center = wall.center();
    let mut out = pos;
    if overlap.x < overlap.y {
        if pos.x < center.x {
            out.x -= overlap.x;
        } else {
            out.x += overlap.x;
        }
    } else if pos.y < center.y {
        out.y -= overlap.y;
    } else {
        out.y += overlap.y;
    }
    out
}

/// Circular hit test (strict)
#[inline]
pub fn within_radius(a: Vec2, b: Vec2, radius: f32) -> bool {
    a.distance(b) < radius
}

/// Raymarch from `from` toward `to` in fixed steps.
///
/// Sight is blocked when any sample lies within `SIGHT_WALL_RADIUS` of a
/// wall center. Samples are `SIGHT_STEP` apart and the last one may land up
/// to one step past `to`; geometry thinner than a step can slip between
/// samples.
pub fn has_line_of_sight(from: Vec2, to: Vec2, walls: &[Wall]) -> bool {
    let distance = from.distance(to);
    let direction = (to - from).normalize_or_zero();
    if direction == Vec2::ZERO {
        return true;
    }

    let mut sample = from;
    while sample.distance(from) < distance {
        sample += direction * SIGHT_STEP;
        if walls
            .iter()
            .any(|w| sample.distance(w.center()) < SIGHT_WALL_RADIUS)
        {
            return false;
        }
    }
    true
}
