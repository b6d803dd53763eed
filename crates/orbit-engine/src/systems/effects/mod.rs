//! Cosmetic effects: thruster flames.
//!
//! Flames are rebuilt every tick from the control pass output and have no
//! physical effect.

mod flame;
mod rng;

pub use flame::{flame, FlameKind, FlameTriangle, FLAME_COLOR};
pub use rng::Rng;

use glam::Vec2;

use crate::systems::controls::ThrusterFiring;

/// Container for the flames of the current tick.
pub struct EffectsState {
    pub flames: Vec<FlameTriangle>,
    pub rng: Rng,
}

impl EffectsState {
    /// Create a new EffectsState with the given RNG seed.
    pub fn new(seed: u64) -> Self {
        EffectsState {
            flames: Vec::with_capacity(4),
            rng: Rng::new(seed.wrapping_add(7919)),
        }
    }

    /// Drop the previous tick's flames.
    pub fn clear(&mut self) {
        self.flames.clear();
    }

    /// Add the flames for one tick of thruster firing.
    pub fn fire(&mut self, firing: &ThrusterFiring, ship_pos: Vec2, ship_angle: f32) {
        if firing.exhaust {
            let f = flame(FlameKind::Exhaust, ship_pos, ship_angle, &mut self.rng);
            self.flames.push(f);
        }
        for &side in &firing.sides {
            let f = flame(FlameKind::Side(side), ship_pos, ship_angle, &mut self.rng);
            self.flames.push(f);
        }
    }
}
