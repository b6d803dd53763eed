//! Pairwise attraction between tracked bodies.
//!
//! The falloff is `1 / distance`, not `1 / distance²`: orbits stay tight and
//! readable at screen scale. Coincident bodies produce a non-finite force;
//! that case is left unguarded.

use glam::Vec2;

/// What the gravity pass reads from a body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GravitySource {
    pub pos: Vec2,
    pub mass: f32,
}

/// Force on every body from every other body, in input order.
///
/// For each ordered pair `(i, j)`, `i != j`, body `i` is pulled toward body `j`
/// with magnitude `elapsed * g * m_i * m_j / distance`. O(n²), meant for a
/// handful of bodies.
pub fn accumulate(sources: &[GravitySource], g: f32, elapsed: f32) -> Vec<Vec2> {
    let mut forces = vec![Vec2::ZERO; sources.len()];
    for (i, a) in sources.iter().enumerate() {
        for (j, b) in sources.iter().enumerate() {
            if i == j {
                continue;
            }
            let d = b.pos - a.pos;
            let distance = (d.x * d.x + d.y * d.y).sqrt();
            let magnitude = elapsed * g * a.mass * b.mass / distance;
            let angle = d.y.atan2(d.x);
            forces[i] += Vec2::new(magnitude * angle.cos(), magnitude * angle.sin());
        }
    }
    forces
}
