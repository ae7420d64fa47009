//! Distance and radius collision primitives
//!
//! Every interaction in the game (enemy stealing a note, projectile striking
//! an enemy, picking the nearest target) reduces to a point-point distance
//! compared against a radius.

use glam::Vec2;

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

/// Check whether two points lie within `radius` of each other
///
/// The boundary is inclusive: `distance == radius` counts as a hit.
#[inline]
pub fn detect_collision(a: Vec2, b: Vec2, radius: f32) -> bool {
    distance(a, b) <= radius
}

/// Index of the point closest to `origin`
///
/// Ties keep the earliest candidate. Returns `None` for an empty iterator.
pub fn closest<I>(origin: Vec2, points: I) -> Option<usize>
where
    I: IntoIterator<Item = (usize, Vec2)>,
{
    let mut best: Option<(usize, f32)> = None;
    for (idx, point) in points {
        let dist = distance(origin, point);
        match best {
            Some((_, best_dist)) if dist >= best_dist => {}
            _ => best = Some((idx, dist)),
        }
    }
    best.map(|(idx, _)| idx)
}
