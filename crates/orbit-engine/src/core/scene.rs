use crate::api::types::BodyId;
use crate::core::body::Body;

/// Insertion-ordered body storage using a flat Vec.
/// A handful of bodies live here; bodies are never removed.
pub struct Scene {
    bodies: Vec<Body>,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            bodies: Vec::with_capacity(8),
        }
    }

    /// Add a body to the scene.
    pub fn spawn(&mut self, body: Body) {
        self.bodies.push(body);
    }

    /// Get a reference to a body by ID.
    pub fn get(&self, id: BodyId) -> Option<&Body> {
        self.bodies.iter().find(|b| b.id == id)
    }

    /// Get a mutable reference to a body by ID.
    pub fn get_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.bodies.iter_mut().find(|b| b.id == id)
    }

    /// Iterate over all bodies in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Body> {
        self.bodies.iter()
    }

    /// Iterate over all bodies mutably.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Body> {
        self.bodies.iter_mut()
    }

    /// Find the first body with the given label.
    pub fn find_by_label(&self, label: &str) -> Option<&Body> {
        self.bodies.iter().find(|b| b.label == label)
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}
