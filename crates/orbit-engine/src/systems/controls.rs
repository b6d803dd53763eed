//! Maps held keys to ship force and torque.
//!
//! Stateless: every tick recomputes from the key table alone.

use glam::Vec2;
use rapier2d::prelude::RigidBody;

use crate::api::config::{KeyBindings, ShipConfig};
use crate::api::types::{Action, Side};
use crate::input::keys::KeyState;

/// What the control pass may touch on the ship body.
pub trait ShipActuator {
    fn angle(&self) -> f32;
    fn add_force(&mut self, force: Vec2);
    /// Replace the accumulated force.
    fn set_force(&mut self, force: Vec2);
    /// Replace the accumulated torque.
    fn set_torque(&mut self, torque: f32);
    fn angular_velocity(&self) -> f32;
    fn set_angular_velocity(&mut self, angvel: f32);
}

impl ShipActuator for RigidBody {
    fn angle(&self) -> f32 {
        self.rotation().angle()
    }

    fn add_force(&mut self, force: Vec2) {
        RigidBody::add_force(self, [force.x, force.y].into(), true);
    }

    fn set_force(&mut self, force: Vec2) {
        self.reset_forces(true);
        RigidBody::add_force(self, [force.x, force.y].into(), true);
    }

    fn set_torque(&mut self, torque: f32) {
        self.reset_torques(true);
        self.add_torque(torque, true);
    }

    fn angular_velocity(&self) -> f32 {
        self.angvel()
    }

    fn set_angular_velocity(&mut self, angvel: f32) {
        self.set_angvel(angvel, true);
    }
}

/// Logical actions held this tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControlInput {
    pub forward: bool,
    pub reverse: bool,
    pub yaw_left: bool,
    pub yaw_right: bool,
}

impl ControlInput {
    pub fn from_keys(keys: &KeyState, bindings: &KeyBindings) -> Self {
        Self {
            forward: keys.action_held(bindings, Action::Forward),
            reverse: keys.action_held(bindings, Action::Reverse),
            yaw_left: keys.action_held(bindings, Action::YawLeft),
            yaw_right: keys.action_held(bindings, Action::YawRight),
        }
    }
}

/// Cosmetic thruster draws requested by the control pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThrusterFiring {
    pub exhaust: bool,
    /// One entry per side-thruster draw. Reverse fires both sides.
    pub sides: Vec<Side>,
}

impl ThrusterFiring {
    pub fn is_idle(&self) -> bool {
        !self.exhaust && self.sides.is_empty()
    }
}

/// Unit vector the hull faces: 90° past the body angle.
pub fn facing(angle: f32) -> Vec2 {
    let a = angle + std::f32::consts::FRAC_PI_2;
    Vec2::new(a.cos(), a.sin())
}

/// Apply one tick of ship controls.
///
/// - Forward adds `thrust` along the facing. Reverse *replaces* the force with
///   half of it pointing backwards. Forward wins when both are held.
/// - Rotate-left sets torque to `-yaw`, rotate-right to `+yaw`. Rotate-left
///   wins when both are held.
/// - Angular velocity above `rotation_limit` is damped by `angular_friction`.
pub fn apply<S: ShipActuator>(ship: &mut S, input: ControlInput, params: &ShipConfig) -> ThrusterFiring {
    let mut firing = ThrusterFiring::default();
    let dir = facing(ship.angle());

    if input.forward {
        ship.add_force(dir * params.thrust);
        firing.exhaust = true;
    } else if input.reverse {
        ship.set_force(-dir * params.thrust * 0.5);
        firing.sides.push(Side::Left);
        firing.sides.push(Side::Right);
    }

    if input.yaw_left {
        ship.set_torque(-params.yaw);
        firing.sides.push(Side::Left);
    } else if input.yaw_right {
        ship.set_torque(params.yaw);
        firing.sides.push(Side::Right);
    }

    let angvel = ship.angular_velocity();
    if angvel.abs() > params.rotation_limit {
        ship.set_angular_velocity(angvel * params.angular_friction);
    }

    firing
}

#[cfg(test)]
mod tests {
    use super::*;
    use rapier2d::prelude::RigidBodyBuilder;

    /// Plain-data stand-in for a ship body.
    #[derive(Debug, Default)]
    struct TestShip {
        angle: f32,
        force: Vec2,
        torque: f32,
        angvel: f32,
    }

    impl ShipActuator for TestShip {
        fn angle(&self) -> f32 {
            self.angle
        }
        fn add_force(&mut self, force: Vec2) {
            self.force += force;
        }
        fn set_force(&mut self, force: Vec2) {
            self.force = force;
        }
        fn set_torque(&mut self, torque: f32) {
            self.torque = torque;
        }
        fn angular_velocity(&self) -> f32 {
            self.angvel
        }
        fn set_angular_velocity(&mut self, angvel: f32) {
            self.angvel = angvel;
        }
    }

    fn params() -> ShipConfig {
        ShipConfig {
            thrust: 4.0,
            yaw: 0.018,
            rotation_limit: 0.05,
            angular_friction: 0.98,
            ..ShipConfig::default()
        }
    }

    fn held(forward: bool, reverse: bool, yaw_left: bool, yaw_right: bool) -> ControlInput {
        ControlInput {
            forward,
            reverse,
            yaw_left,
            yaw_right,
        }
    }

    #[test]
    fn facing_is_ninety_degrees_past_angle() {
        assert!((facing(0.0) - Vec2::new(0.0, 1.0)).length() < 1e-6);
        assert!((facing(std::f32::consts::FRAC_PI_2) - Vec2::new(-1.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn forward_adds_thrust_along_facing() {
        let angle = 0.7;
        let mut ship = TestShip {
            angle,
            force: Vec2::new(1.0, 1.0),
            ..Default::default()
        };
        let firing = apply(&mut ship, held(true, false, false, false), &params());

        let thrust = ship.force - Vec2::new(1.0, 1.0);
        assert!((thrust.length() - 4.0).abs() < 1e-5);
        let expected = Vec2::new((angle + std::f32::consts::FRAC_PI_2).cos(), (angle + std::f32::consts::FRAC_PI_2).sin()) * 4.0;
        assert!((thrust - expected).length() < 1e-5);
        assert!(firing.exhaust);
        assert!(firing.sides.is_empty());
    }

    #[test]
    fn reverse_overwrites_with_half_thrust_backwards() {
        let mut ship = TestShip {
            angle: 0.0,
            force: Vec2::new(100.0, -50.0),
            ..Default::default()
        };
        let firing = apply(&mut ship, held(false, true, false, false), &params());

        assert!((ship.force - Vec2::new(0.0, -2.0)).length() < 1e-5, "force was {:?}", ship.force);
        assert!(!firing.exhaust);
        assert_eq!(firing.sides, vec![Side::Left, Side::Right]);
    }

    #[test]
    fn forward_wins_over_reverse() {
        let mut ship = TestShip::default();
        apply(&mut ship, held(true, true, false, false), &params());
        assert!((ship.force - Vec2::new(0.0, 4.0)).length() < 1e-5);
    }

    #[test]
    fn yaw_sets_signed_torque() {
        let mut left = TestShip {
            torque: 5.0,
            ..Default::default()
        };
        apply(&mut left, held(false, false, true, false), &params());
        assert_eq!(left.torque, -0.018);

        let mut right = TestShip::default();
        let firing = apply(&mut right, held(false, false, false, true), &params());
        assert_eq!(right.torque, 0.018);
        assert_eq!(firing.sides, vec![Side::Right]);
    }

    #[test]
    fn yaw_left_wins_when_both_held() {
        let mut ship = TestShip::default();
        let firing = apply(&mut ship, held(false, false, true, true), &params());
        assert_eq!(ship.torque, -0.018);
        assert_eq!(firing.sides, vec![Side::Left]);
    }

    #[test]
    fn fast_spin_is_damped() {
        let mut ship = TestShip {
            angvel: -0.2,
            ..Default::default()
        };
        apply(&mut ship, ControlInput::default(), &params());
        assert!((ship.angvel - (-0.2 * 0.98)).abs() < 1e-7);
    }

    #[test]
    fn slow_spin_is_untouched() {
        let mut ship = TestShip {
            angvel: 0.05,
            ..Default::default()
        };
        apply(&mut ship, ControlInput::default(), &params());
        assert_eq!(ship.angvel, 0.05);
    }

    #[test]
    fn no_keys_no_effect() {
        let mut ship = TestShip {
            force: Vec2::new(3.0, 4.0),
            torque: 1.0,
            ..Default::default()
        };
        let firing = apply(&mut ship, ControlInput::default(), &params());
        assert_eq!(ship.force, Vec2::new(3.0, 4.0));
        assert_eq!(ship.torque, 1.0);
        assert!(firing.is_idle());
    }

    #[test]
    fn rapier_body_receives_force_and_torque() {
        let mut rb = RigidBodyBuilder::dynamic().rotation(0.0).build();
        apply(&mut rb, held(true, false, true, false), &params());
        assert!((rb.user_force().y - 4.0).abs() < 1e-5);
        assert!(rb.user_force().x.abs() < 1e-5);
        assert_eq!(rb.user_torque(), -0.018);

        apply(&mut rb, held(false, true, false, false), &params());
        assert!((rb.user_force().y - (-2.0)).abs() < 1e-5);
        // Torque from the previous tick is untouched when no rotate key is held.
        assert_eq!(rb.user_torque(), -0.018);
    }
}
