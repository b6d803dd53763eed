use glam::Vec2;

use crate::api::types::BodyId;
use crate::core::scene::Scene;

/// Pointer drag: grab a body under the pointer and pull it along with a spring.
#[derive(Debug, Clone, Default)]
pub struct PointerDrag {
    grabbed: Option<BodyId>,
    pointer: Vec2,
}

impl PointerDrag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grab the dynamic body nearest to `point` whose outline contains it.
    pub fn press(&mut self, point: Vec2, scene: &Scene) {
        self.pointer = point;
        self.grabbed = scene
            .iter()
            .filter(|b| !b.is_static && b.contains(point))
            .min_by(|a, b| {
                a.pos()
                    .distance_squared(point)
                    .total_cmp(&b.pos().distance_squared(point))
            })
            .map(|b| b.id);
        if let Some(id) = self.grabbed {
            log::debug!("drag: grabbed {:?}", id);
        }
    }

    pub fn move_to(&mut self, point: Vec2) {
        self.pointer = point;
    }

    pub fn release(&mut self) {
        self.grabbed = None;
    }

    pub fn grabbed(&self) -> Option<BodyId> {
        self.grabbed
    }

    /// Spring force pulling a body at `body_pos` toward the pointer.
    pub fn spring_force(&self, body_pos: Vec2, mass: f32, stiffness: f32) -> Vec2 {
        (self.pointer - body_pos) * stiffness * mass
    }
}
