use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::api::types::Action;

/// Browser key codes used by the default bindings.
pub mod keycode {
    pub const ARROW_LEFT: u32 = 37;
    pub const ARROW_UP: u32 = 38;
    pub const ARROW_RIGHT: u32 = 39;
    pub const ARROW_DOWN: u32 = 40;
    pub const A: u32 = 65;
    pub const D: u32 = 68;
    pub const S: u32 = 83;
    pub const W: u32 = 87;
}

/// Simulation configuration. Every tuning constant lives here.
///
/// Loaded from JSON at runtime; any field left out keeps its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Fixed timestep in seconds (default: 1/60).
    pub fixed_dt: f32,
    /// Multiplier applied to both the physics dt and the simulation clock.
    pub time_scale: f32,
    /// World width in pixels. Overwritten with the viewport size at startup.
    pub world_width: f32,
    /// World height in pixels. Overwritten with the viewport size at startup.
    pub world_height: f32,
    /// G in `elapsed_ms * G * m1 * m2 / distance`.
    pub gravity_constant: f32,
    /// Spring stiffness of the pointer drag, per tick.
    pub drag_stiffness: f32,
    /// Draw a velocity indicator line on every dynamic body.
    pub show_velocity: bool,
    /// Maximum number of vector vertices the host allocates for (default: 16384).
    pub max_vector_vertices: usize,
    pub ship: ShipConfig,
    pub keys: KeyBindings,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            time_scale: 0.5,
            world_width: 1280.0,
            world_height: 720.0,
            gravity_constant: 180.0,
            drag_stiffness: 0.2,
            show_velocity: true,
            max_vector_vertices: 16384,
            ship: ShipConfig::default(),
            keys: KeyBindings::default(),
        }
    }
}

impl SimConfig {
    /// Parse a configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Center of the world in pixels.
    pub fn world_center(&self) -> Vec2 {
        Vec2::new(self.world_width / 2.0, self.world_height / 2.0)
    }
}

/// Physical tuning of the player ship.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShipConfig {
    pub mass: f32,
    /// Forward force. Needs to grow with `mass`.
    pub thrust: f32,
    /// Torque applied while a rotate key is held. Needs to grow with `mass`.
    pub yaw: f32,
    /// Angular speed (rad/s) above which angular friction kicks in.
    pub rotation_limit: f32,
    /// 1.0 = no friction, 0.9 = high friction.
    pub angular_friction: f32,
    pub spawn: Vec2,
}

impl Default for ShipConfig {
    fn default() -> Self {
        Self {
            mass: 0.1,
            thrust: 30.0,
            yaw: 200.0,
            rotation_limit: 3.0,
            angular_friction: 0.98,
            spawn: Vec2::new(200.0, 560.0),
        }
    }
}

/// Key codes bound to each ship action. Every action accepts several keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub forward: Vec<u32>,
    pub reverse: Vec<u32>,
    pub yaw_left: Vec<u32>,
    pub yaw_right: Vec<u32>,
}

impl Default for KeyBindings {
    /// Arrow keys plus WASD. The hull faces +Y (down the screen) at angle 0,
    /// so "forward" sits on the down arrow.
    fn default() -> Self {
        use self::keycode::*;
        Self {
            forward: vec![ARROW_DOWN, S],
            reverse: vec![ARROW_UP, W],
            yaw_left: vec![ARROW_LEFT, A],
            yaw_right: vec![ARROW_RIGHT, D],
        }
    }
}

impl KeyBindings {
    /// Keys bound to an action.
    pub fn keys_for(&self, action: Action) -> &[u32] {
        match action {
            Action::Forward => &self.forward,
            Action::Reverse => &self.reverse,
            Action::YawLeft => &self.yaw_left,
            Action::YawRight => &self.yaw_right,
        }
    }

    /// The action a key code is bound to, if any. First match wins.
    pub fn action_for(&self, key_code: u32) -> Option<Action> {
        Action::ALL
            .into_iter()
            .find(|&action| self.keys_for(action).contains(&key_code))
    }
}
