//! The default scene: a static earth, an orbiting moon, and the ship once its
//! outline arrives.

use glam::Vec2;

use crate::api::types::BodyId;
use crate::assets::shape::ShipShape;
use crate::core::body::BodyShape;
use crate::core::physics::{BodyDesc, ColliderDesc, ColliderMaterial};
use crate::core::simulation::Simulation;
use crate::systems::vector::VectorColor;

/// #3D8EB9
pub const EARTH_COLOR: VectorColor = VectorColor::rgb(61.0 / 255.0, 142.0 / 255.0, 185.0 / 255.0);
/// #BDC3C7
pub const MOON_COLOR: VectorColor = VectorColor::rgb(189.0 / 255.0, 195.0 / 255.0, 199.0 / 255.0);
/// #96281B
pub const SHIP_COLOR: VectorColor = VectorColor::rgb(150.0 / 255.0, 40.0 / 255.0, 27.0 / 255.0);

/// Launch velocity that puts the moon on a loose orbit around the earth. The
/// moon starts at its farthest point, so it never drifts further out than
/// its spawn distance.
pub const MOON_VELOCITY: Vec2 = Vec2::new(-40.0, 84.0);

/// A round, gravity-tracked body. Start from `default()` and override.
#[derive(Debug, Clone)]
pub struct PlanetDesc {
    pub label: String,
    pub position: Vec2,
    pub radius: f32,
    pub velocity: Vec2,
    pub is_static: bool,
    pub mass: f32,
    pub material: ColliderMaterial,
    pub color: VectorColor,
}

impl Default for PlanetDesc {
    fn default() -> Self {
        Self {
            label: "planet".to_string(),
            position: Vec2::new(200.0, 200.0),
            radius: 100.0,
            velocity: Vec2::ZERO,
            is_static: false,
            mass: 1.0,
            material: ColliderMaterial::default(),
            color: VectorColor::WHITE,
        }
    }
}

impl PlanetDesc {
    pub fn named(label: &str) -> Self {
        Self {
            label: label.to_string(),
            ..Self::default()
        }
    }

    pub fn at(mut self, position: Vec2) -> Self {
        self.position = position;
        self
    }

    pub fn radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    pub fn velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    /// Pin the planet in place.
    pub fn fixed(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn mass(mut self, mass: f32) -> Self {
        self.mass = mass;
        self
    }

    pub fn material(mut self, material: ColliderMaterial) -> Self {
        self.material = material;
        self
    }

    pub fn color(mut self, color: VectorColor) -> Self {
        self.color = color;
        self
    }

    fn body_desc(&self) -> BodyDesc {
        let collider = ColliderDesc::Ball {
            radius: self.radius,
        };
        let desc = if self.is_static {
            BodyDesc::fixed(collider)
        } else {
            BodyDesc::dynamic(collider)
        };
        desc.with_position(self.position)
            .with_mass(self.mass)
            .with_material(self.material)
    }
}

impl Simulation {
    /// Create a planet, add it to the gravity set, then launch it.
    pub fn spawn_planet(&mut self, planet: PlanetDesc) -> BodyId {
        let id = self.spawn_body(
            &planet.label,
            &planet.body_desc(),
            BodyShape::Circle {
                radius: planet.radius,
            },
            planet.color,
        );
        self.track(id);
        if !planet.is_static {
            self.set_velocity(id, planet.velocity);
        }
        id
    }

    /// Create the ship body at the configured spawn point. The ship does not
    /// take part in gravity.
    pub fn spawn_ship(&mut self, shape: ShipShape) -> BodyId {
        let ship = &self.config().ship;
        let parts = shape.into_vertex_sets();
        let desc = BodyDesc::dynamic(ColliderDesc::ConvexParts(parts.clone()))
            .with_position(ship.spawn)
            .with_mass(ship.mass);
        self.spawn_body("ship", &desc, BodyShape::Polygons(parts), SHIP_COLOR)
    }
}

/// Populate the world with the earth and the moon.
pub fn build_universe(sim: &mut Simulation) {
    let center = sim.config().world_center();

    sim.spawn_planet(
        PlanetDesc::named("earth")
            .at(center)
            .radius(100.0)
            .mass(15.0)
            .fixed()
            .color(EARTH_COLOR),
    );
    sim.spawn_planet(
        PlanetDesc::named("moon")
            .at(Vec2::new(200.0, 200.0))
            .radius(30.0)
            .mass(0.2)
            .velocity(MOON_VELOCITY)
            .color(MOON_COLOR),
    );
    log::info!("universe built: {} bodies", sim.scene.len());
}
