//! Thruster flame geometry. Cosmetic only.
//!
//! Each flame is one triangle in a frame attached to the hull: a jittered tip
//! fading to transparent and a base in the flame colour.

use glam::Vec2;

use super::rng::Rng;
use crate::api::types::Side;
use crate::systems::vector::VectorColor;

/// rgba(160, 192, 255, 1)
pub const FLAME_COLOR: VectorColor = VectorColor::new(160.0 / 255.0, 192.0 / 255.0, 1.0, 1.0);

/// Length over which the flame gradient runs, in hull units.
const GRADIENT_LENGTH: f32 = 15.0;

const EXHAUST_OFFSET: f32 = -33.0;
const EXHAUST_JITTER: f32 = 10.0;
const EXHAUST_HALF_WIDTH: f32 = 7.0;
const EXHAUST_LENGTH: f32 = 20.0;

const SIDE_OFFSET: f32 = -23.0;
const SIDE_SWING: f32 = 0.6 * std::f32::consts::PI;
const SIDE_JITTER: f32 = 6.0;
const SIDE_LENGTH: f32 = 14.0;
/// Side gradient stays transparent over its first 10%.
const SIDE_GRADIENT_START: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FlameKind {
    /// Main engine, fired by forward thrust.
    Exhaust,
    /// Side thruster, fired by reverse thrust and rotation.
    Side(Side),
}

/// A flame triangle in world space with per-vertex colour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlameTriangle {
    pub points: [Vec2; 3],
    pub colors: [VectorColor; 3],
}

/// Colour at `y` along a gradient that runs transparent → flame over
/// `[0, GRADIENT_LENGTH]`, staying transparent until `start` (0..1).
fn gradient(y: f32, start: f32) -> VectorColor {
    let t = (y / GRADIENT_LENGTH).clamp(0.0, 1.0);
    let t = ((t - start) / (1.0 - start)).clamp(0.0, 1.0);
    VectorColor::new(FLAME_COLOR.r * t, FLAME_COLOR.g * t, FLAME_COLOR.b * t, t)
}

/// Build one flame for a ship at `ship_pos` rotated by `ship_angle`.
pub fn flame(kind: FlameKind, ship_pos: Vec2, ship_angle: f32, rng: &mut Rng) -> FlameTriangle {
    let (frame_angle, offset, local, start) = match kind {
        FlameKind::Exhaust => {
            let tip = Vec2::new(EXHAUST_JITTER * rng.jitter(), EXHAUST_JITTER * rng.jitter());
            (
                ship_angle,
                EXHAUST_OFFSET,
                [
                    tip,
                    Vec2::new(EXHAUST_HALF_WIDTH, EXHAUST_LENGTH),
                    Vec2::new(-EXHAUST_HALF_WIDTH, EXHAUST_LENGTH),
                ],
                0.0,
            )
        }
        FlameKind::Side(side) => {
            let dir = side.sign();
            let tip = Vec2::new(
                dir * SIDE_JITTER * rng.jitter() + 12.0 * dir,
                SIDE_JITTER * rng.jitter(),
            );
            (
                ship_angle - SIDE_SWING * dir,
                SIDE_OFFSET,
                [
                    tip,
                    Vec2::new(dir * 8.0, SIDE_LENGTH),
                    Vec2::new(dir * 12.0, SIDE_LENGTH),
                ],
                SIDE_GRADIENT_START,
            )
        }
    };

    let rot = Vec2::from_angle(frame_angle);
    let to_world = |p: Vec2| ship_pos + rot.rotate(Vec2::new(p.x, p.y + offset));
    FlameTriangle {
        points: local.map(to_world),
        colors: local.map(|p| gradient(p.y, start)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exhaust_base_is_opaque_and_tip_fades() {
        let mut rng = Rng::new(3);
        let f = flame(FlameKind::Exhaust, Vec2::ZERO, 0.0, &mut rng);
        assert_eq!(f.colors[1], FLAME_COLOR);
        assert_eq!(f.colors[2], FLAME_COLOR);
        assert!(f.colors[0].a < 0.5, "tip alpha {}", f.colors[0].a);
    }

    #[test]
    fn exhaust_sits_behind_the_hull() {
        let mut rng = Rng::new(3);
        // Hull faces +Y at angle 0, so the exhaust is on the -Y side.
        let f = flame(FlameKind::Exhaust, Vec2::new(100.0, 100.0), 0.0, &mut rng);
        for p in f.points {
            assert!(p.y < 100.0, "point {:?} not behind ship", p);
        }
        assert!((f.points[1] - Vec2::new(107.0, 87.0)).length() < 1e-4);
    }

    #[test]
    fn exhaust_follows_ship_rotation() {
        let mut a = Rng::new(9);
        let mut b = Rng::new(9);
        let upright = flame(FlameKind::Exhaust, Vec2::ZERO, 0.0, &mut a);
        let turned = flame(FlameKind::Exhaust, Vec2::ZERO, std::f32::consts::PI, &mut b);
        for (p, q) in upright.points.iter().zip(turned.points.iter()) {
            assert!((*p + *q).length() < 1e-3);
        }
    }

    #[test]
    fn side_flames_mirror_each_other() {
        let left = flame(FlameKind::Side(Side::Left), Vec2::ZERO, 0.0, &mut Rng::new(5));
        let right = flame(FlameKind::Side(Side::Right), Vec2::ZERO, 0.0, &mut Rng::new(5));
        // Base vertices mirror across the hull axis.
        assert!((left.points[1].x + right.points[1].x).abs() < 1e-3);
        assert!((left.points[1].y - right.points[1].y).abs() < 1e-3);
    }

    #[test]
    fn side_gradient_starts_late() {
        let c = gradient(1.0, SIDE_GRADIENT_START);
        assert_eq!(c.a, 0.0);
        assert_eq!(gradient(GRADIENT_LENGTH, SIDE_GRADIENT_START), FLAME_COLOR);
    }
}
