/// Unique identifier for a body in the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyId(pub u32);

/// The four logical ship actions a key can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Forward,
    Reverse,
    YawLeft,
    YawRight,
}

impl Action {
    pub const ALL: [Action; 4] = [
        Action::Forward,
        Action::Reverse,
        Action::YawLeft,
        Action::YawRight,
    ];
}

/// Which side of the hull a side thruster fires from.
/// The discriminant is the sign used by the flame geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left = -1,
    Right = 1,
}

impl Side {
    pub fn sign(self) -> f32 {
        self as i32 as f32
    }
}
