use glam::Vec2;

use crate::api::types::BodyId;
use crate::core::physics::{BodyPose, PhysicsBody};
use crate::systems::vector::VectorColor;

/// Visual outline of a body, in body-local coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum BodyShape {
    Circle { radius: f32 },
    Polygons(Vec<Vec<Vec2>>),
}

impl BodyShape {
    /// Radius of the smallest origin-centred circle enclosing the shape.
    pub fn bounding_radius(&self) -> f32 {
        match self {
            BodyShape::Circle { radius } => *radius,
            BodyShape::Polygons(sets) => sets
                .iter()
                .flatten()
                .map(|p| p.length())
                .fold(0.0, f32::max),
        }
    }
}

/// A simulated body: its physics handle plus what the frame builder and the
/// gravity pass need to know about it.
#[derive(Debug, Clone)]
pub struct Body {
    pub id: BodyId,
    /// Human-readable name ("earth", "moon", "ship").
    pub label: String,
    pub physics: PhysicsBody,
    /// The mass the body was created with. Gravity reads this.
    pub mass: f32,
    pub is_static: bool,
    pub shape: BodyShape,
    pub color: VectorColor,
    /// Pose synced from Rapier after every step.
    pub pose: BodyPose,
}

impl Body {
    pub fn pos(&self) -> Vec2 {
        self.pose.pos
    }

    /// Whether `point` (world space) lies within the body's bounding circle.
    pub fn contains(&self, point: Vec2) -> bool {
        self.pose.pos.distance(point) <= self.shape.bounding_radius()
    }

    /// Transform a body-local point into world space.
    pub fn to_world(&self, local: Vec2) -> Vec2 {
        self.pose.pos + Vec2::from_angle(self.pose.rotation).rotate(local)
    }
}
