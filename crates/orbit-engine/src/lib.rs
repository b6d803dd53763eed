pub mod api;
pub mod assets;
pub mod core;
pub mod input;
pub mod systems;

// Re-export key types at crate root for convenience
pub use api::config::{KeyBindings, ShipConfig, SimConfig};
pub use api::types::{Action, BodyId, Side};
pub use assets::shape::{ShapeError, ShipShape};
pub use crate::core::body::{Body, BodyShape};
pub use crate::core::physics::{
    BodyDesc, BodyPose, BodyType, ColliderDesc, ColliderMaterial, PhysicsBody, PhysicsWorld,
};
pub use crate::core::scene::Scene;
pub use crate::core::simulation::{Player, Simulation};
pub use crate::core::time::{FixedTimestep, SimClock};
pub use crate::core::universe::{build_universe, PlanetDesc};
pub use input::{InputEvent, InputQueue, KeyState};
pub use systems::controls::{ControlInput, ShipActuator, ThrusterFiring};
pub use systems::effects::{EffectsState, FlameTriangle};
pub use systems::gravity::GravitySource;
pub use systems::render::build_frame;
pub use systems::vector::{VectorColor, VectorState, VectorVertex};
