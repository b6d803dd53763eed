use glam::Vec2;
use rapier2d::prelude::*;

use crate::api::types::BodyId;

// ---------------------------------------------------------------------------
// Conversion helpers (private): glam ↔ nalgebra
// ---------------------------------------------------------------------------

fn to_na(v: Vec2) -> Vector<Real> {
    vector![v.x, v.y]
}

fn from_na(v: &Vector<Real>) -> Vec2 {
    Vec2::new(v.x, v.y)
}

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// The kind of rigid body. Planets can be pinned in place; everything else moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyType {
    Dynamic,
    Fixed,
}

impl BodyType {
    fn to_rapier(self) -> RigidBodyType {
        match self {
            BodyType::Dynamic => RigidBodyType::Dynamic,
            BodyType::Fixed => RigidBodyType::Fixed,
        }
    }
}

/// Shape description for the colliders of a body.
#[derive(Debug, Clone)]
pub enum ColliderDesc {
    Ball { radius: f32 },
    /// One convex-hull collider per vertex set, in body-local coordinates.
    /// The body's mass is split evenly between the parts.
    ConvexParts(Vec<Vec<Vec2>>),
}

/// Surface material shared by all colliders of a body.
#[derive(Debug, Clone, Copy)]
pub struct ColliderMaterial {
    pub restitution: f32,
    pub friction: f32,
}

impl Default for ColliderMaterial {
    fn default() -> Self {
        Self {
            restitution: 0.2,
            friction: 0.0,
        }
    }
}

/// Builder for describing a rigid body before creation.
#[derive(Debug, Clone)]
pub struct BodyDesc {
    pub body_type: BodyType,
    pub position: Vec2,
    pub rotation: f32,
    pub velocity: Vec2,
    pub mass: f32,
    pub collider: ColliderDesc,
    pub material: ColliderMaterial,
}

impl BodyDesc {
    /// Create a dynamic body description with the given collider shape.
    pub fn dynamic(collider: ColliderDesc) -> Self {
        Self {
            body_type: BodyType::Dynamic,
            position: Vec2::ZERO,
            rotation: 0.0,
            velocity: Vec2::ZERO,
            mass: 1.0,
            collider,
            material: ColliderMaterial::default(),
        }
    }

    /// Create a fixed (static) body description with the given collider shape.
    pub fn fixed(collider: ColliderDesc) -> Self {
        Self {
            body_type: BodyType::Fixed,
            ..Self::dynamic(collider)
        }
    }

    pub fn with_position(mut self, pos: Vec2) -> Self {
        self.position = pos;
        self
    }

    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_velocity(mut self, vel: Vec2) -> Self {
        self.velocity = vel;
        self
    }

    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = mass;
        self
    }

    pub fn with_material(mut self, material: ColliderMaterial) -> Self {
        self.material = material;
        self
    }
}

/// Handle stored on a `Body`, referencing Rapier internals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsBody {
    pub body_handle: RigidBodyHandle,
}

/// Kinematic state of a body after the latest step.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BodyPose {
    pub pos: Vec2,
    pub rotation: f32,
    pub velocity: Vec2,
    pub angular_velocity: f32,
}

// ---------------------------------------------------------------------------
// PhysicsWorld
// ---------------------------------------------------------------------------

/// Wraps all Rapier2D boilerplate into a single struct.
///
/// World gravity is always zero: attraction between bodies is computed by the
/// gravity pass and applied as user forces. Rapier keeps user forces across
/// steps, so callers reset them at the start of every tick.
pub struct PhysicsWorld {
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
}

impl PhysicsWorld {
    pub fn new() -> Self {
        Self {
            gravity: Vector::zeros(),
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
        }
    }

    /// Set the integration timestep in seconds.
    pub fn set_dt(&mut self, dt: f32) {
        self.integration_parameters.dt = dt;
    }

    pub fn dt(&self) -> f32 {
        self.integration_parameters.dt
    }

    /// Create a rigid body with its colliders and return the handle.
    /// The BodyId is stored in the body's `user_data`.
    ///
    /// Convex parts whose hull cannot be computed (collinear points) are skipped.
    pub fn create_body(&mut self, id: BodyId, desc: &BodyDesc) -> PhysicsBody {
        let rb = RigidBodyBuilder::new(desc.body_type.to_rapier())
            .translation(to_na(desc.position))
            .rotation(desc.rotation)
            .linvel(to_na(desc.velocity))
            .can_sleep(false)
            .user_data(id.0 as u128)
            .build();

        let body_handle = self.bodies.insert(rb);

        let builders: Vec<ColliderBuilder> = match &desc.collider {
            ColliderDesc::Ball { radius } => vec![ColliderBuilder::ball(*radius).mass(desc.mass)],
            ColliderDesc::ConvexParts(parts) => {
                let hulls: Vec<ColliderBuilder> = parts
                    .iter()
                    .filter_map(|part| {
                        let points: Vec<Point<Real>> =
                            part.iter().map(|p| point![p.x, p.y]).collect();
                        let hull = ColliderBuilder::convex_hull(&points);
                        if hull.is_none() {
                            log::warn!("body {:?}: skipping degenerate collider part", id);
                        }
                        hull
                    })
                    .collect();
                // Split over the parts that survived.
                let part_mass = desc.mass / hulls.len().max(1) as f32;
                hulls.into_iter().map(|b| b.mass(part_mass)).collect()
            }
        };

        for builder in builders {
            let collider = builder
                .restitution(desc.material.restitution)
                .friction(desc.material.friction)
                .build();
            self.colliders
                .insert_with_parent(collider, body_handle, &mut self.bodies);
        }

        PhysicsBody { body_handle }
    }

    /// Advance the simulation by one timestep.
    pub fn step(&mut self) {
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
    }

    /// Mutable access to the underlying Rapier body, for the control pass.
    pub(crate) fn rigid_body_mut(&mut self, body: &PhysicsBody) -> Option<&mut RigidBody> {
        self.bodies.get_mut(body.body_handle)
    }

    /// Clear the accumulated force and torque of a body.
    pub fn reset_forces(&mut self, body: &PhysicsBody) {
        if let Some(rb) = self.bodies.get_mut(body.body_handle) {
            rb.reset_forces(false);
            rb.reset_torques(false);
        }
    }

    /// Add to the force accumulator of a body. Forces on fixed bodies are ignored.
    pub fn add_force(&mut self, body: &PhysicsBody, force: Vec2) {
        if let Some(rb) = self.bodies.get_mut(body.body_handle) {
            rb.add_force(to_na(force), true);
        }
    }

    /// The force accumulated on a body since the last reset.
    pub fn force(&self, body: &PhysicsBody) -> Vec2 {
        self.bodies
            .get(body.body_handle)
            .map(|rb| from_na(&rb.user_force()))
            .unwrap_or(Vec2::ZERO)
    }

    /// Total mass of a body, as rapier computed it from the colliders.
    pub fn mass(&self, body: &PhysicsBody) -> f32 {
        self.bodies
            .get(body.body_handle)
            .map(|rb| rb.mass())
            .unwrap_or(0.0)
    }

    /// The torque accumulated on a body since the last reset.
    pub fn torque(&self, body: &PhysicsBody) -> f32 {
        self.bodies
            .get(body.body_handle)
            .map(|rb| rb.user_torque())
            .unwrap_or(0.0)
    }

    /// Set the linear velocity of a body directly.
    pub fn set_velocity(&mut self, body: &PhysicsBody, vel: Vec2) {
        if let Some(rb) = self.bodies.get_mut(body.body_handle) {
            rb.set_linvel(to_na(vel), true);
        }
    }

    /// Set the angular velocity of a body directly.
    pub fn set_angular_velocity(&mut self, body: &PhysicsBody, angvel: f32) {
        if let Some(rb) = self.bodies.get_mut(body.body_handle) {
            rb.set_angvel(angvel, true);
        }
    }

    /// Current position, rotation and velocities of a body.
    pub fn pose(&self, body: &PhysicsBody) -> BodyPose {
        self.bodies
            .get(body.body_handle)
            .map(|rb| BodyPose {
                pos: from_na(rb.translation()),
                rotation: rb.rotation().angle(),
                velocity: from_na(rb.linvel()),
                angular_velocity: rb.angvel(),
            })
            .unwrap_or_default()
    }

    /// Number of rigid bodies in the simulation.
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Number of colliders attached to a body.
    pub fn collider_count(&self, body: &PhysicsBody) -> usize {
        self.bodies
            .get(body.body_handle)
            .map(|rb| rb.colliders().len())
            .unwrap_or(0)
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
