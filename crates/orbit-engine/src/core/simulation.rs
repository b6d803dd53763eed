use glam::Vec2;

use crate::api::config::SimConfig;
use crate::api::types::BodyId;
use crate::assets::shape::ShipShape;
use crate::core::body::{Body, BodyShape};
use crate::core::physics::{BodyDesc, BodyType, PhysicsWorld};
use crate::core::scene::Scene;
use crate::core::time::SimClock;
use crate::input::keys::KeyState;
use crate::input::queue::InputEvent;
use crate::systems::controls::{self, ControlInput, ThrusterFiring};
use crate::systems::drag::PointerDrag;
use crate::systems::effects::EffectsState;
use crate::systems::gravity::{self, GravitySource};
use crate::systems::vector::VectorColor;

const FLAME_SEED: u64 = 0x5EED;

/// Player lifecycle. The ship only exists once its outline has been loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Player {
    Pending,
    Active(BodyId),
}

/// Everything one sandbox instance owns: the physics world, the bodies, the
/// gravity set, key state, timing and the player.
pub struct Simulation {
    config: SimConfig,
    pub physics: PhysicsWorld,
    pub scene: Scene,
    /// Bodies subject to gravity, in creation order. Never shrinks.
    tracked: Vec<BodyId>,
    pub keys: KeyState,
    pub clock: SimClock,
    player: Player,
    pub effects: EffectsState,
    pub drag: PointerDrag,
    next_id: u32,
}

impl Simulation {
    /// Create an empty world. See `build_universe` for the default scene.
    pub fn new(config: SimConfig) -> Self {
        let mut physics = PhysicsWorld::new();
        physics.set_dt(config.fixed_dt * config.time_scale);

        Self {
            clock: SimClock::new(config.time_scale),
            config,
            physics,
            scene: Scene::new(),
            tracked: Vec::new(),
            keys: KeyState::new(),
            player: Player::Pending,
            effects: EffectsState::new(FLAME_SEED),
            drag: PointerDrag::new(),
            next_id: 1,
        }
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn player(&self) -> Player {
        self.player
    }

    /// The ship body, once installed.
    pub fn player_body(&self) -> Option<&Body> {
        match self.player {
            Player::Active(id) => self.scene.get(id),
            Player::Pending => None,
        }
    }

    pub fn tracked(&self) -> &[BodyId] {
        &self.tracked
    }

    pub fn next_id(&mut self) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Create a rigid body and add it to the scene. It is not tracked.
    pub fn spawn_body(
        &mut self,
        label: &str,
        desc: &BodyDesc,
        shape: BodyShape,
        color: VectorColor,
    ) -> BodyId {
        let id = self.next_id();
        let physics = self.physics.create_body(id, desc);
        let pose = self.physics.pose(&physics);
        self.scene.spawn(Body {
            id,
            label: label.to_string(),
            physics,
            mass: desc.mass,
            is_static: desc.body_type == BodyType::Fixed,
            shape,
            color,
            pose,
        });
        log::debug!("spawned {} as {:?}", label, id);
        id
    }

    /// Add a body to the gravity set.
    pub fn track(&mut self, id: BodyId) {
        if !self.tracked.contains(&id) {
            self.tracked.push(id);
        }
    }

    /// Set the velocity of a body and refresh its cached pose.
    pub fn set_velocity(&mut self, id: BodyId, velocity: Vec2) {
        if let Some(body) = self.scene.get_mut(id) {
            self.physics.set_velocity(&body.physics, velocity);
            body.pose = self.physics.pose(&body.physics);
        }
    }

    pub fn handle_input(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::KeyDown { key_code } => self.keys.press(key_code),
            InputEvent::KeyUp { key_code } => self.keys.release(key_code),
            InputEvent::PointerDown { x, y } => self.drag.press(Vec2::new(x, y), &self.scene),
            InputEvent::PointerMove { x, y } => self.drag.move_to(Vec2::new(x, y)),
            InputEvent::PointerUp { .. } => self.drag.release(),
        }
    }

    /// Create the ship from its outline and hand it the controls.
    ///
    /// Only the first call has an effect.
    pub fn install_player(&mut self, shape: ShipShape) -> BodyId {
        if let Player::Active(id) = self.player {
            log::warn!("player already installed as {:?}; ignoring new shape", id);
            return id;
        }
        let id = self.spawn_ship(shape);
        self.player = Player::Active(id);
        log::info!("player installed as {:?}", id);
        id
    }

    /// Pull every tracked body toward every other one.
    pub fn gravity_step(&mut self, elapsed: f32) {
        let bodies: Vec<&Body> = self
            .tracked
            .iter()
            .filter_map(|id| self.scene.get(*id))
            .collect();
        let sources: Vec<GravitySource> = bodies
            .iter()
            .map(|b| GravitySource {
                pos: b.pos(),
                mass: b.mass,
            })
            .collect();

        let forces = gravity::accumulate(&sources, self.config.gravity_constant, elapsed);
        for (body, force) in bodies.iter().zip(forces) {
            self.physics.add_force(&body.physics, force);
        }
    }

    /// Turn held keys into ship force and torque. A no-op while the player is
    /// pending.
    pub fn control_step(&mut self) -> ThrusterFiring {
        let Player::Active(id) = self.player else {
            return ThrusterFiring::default();
        };
        let Some(handle) = self.scene.get(id).map(|b| b.physics) else {
            return ThrusterFiring::default();
        };
        let input = ControlInput::from_keys(&self.keys, &self.config.keys);
        let Some(rb) = self.physics.rigid_body_mut(&handle) else {
            return ThrusterFiring::default();
        };

        let firing = controls::apply(rb, input, &self.config.ship);
        if !firing.is_idle() {
            let pose = self.physics.pose(&handle);
            self.effects.fire(&firing, pose.pos, pose.rotation);
        }
        firing
    }

    /// Spring the grabbed body toward the pointer.
    pub fn drag_step(&mut self) {
        let Some(body) = self.drag.grabbed().and_then(|id| self.scene.get(id)) else {
            return;
        };
        let force = self
            .drag
            .spring_force(body.pos(), body.mass, self.config.drag_stiffness);
        self.physics.add_force(&body.physics, force);
    }

    /// Everything that runs before the physics step: clear last tick's
    /// forces, then gravity, controls and drag.
    pub fn before_tick(&mut self) {
        for body in self.scene.iter() {
            self.physics.reset_forces(&body.physics);
        }
        self.effects.clear();

        let elapsed = self.clock.take_elapsed();
        log::trace!("tick at {:.1}ms, elapsed {:.2}ms", self.clock.timestamp(), elapsed);
        self.gravity_step(elapsed);
        self.control_step();
        self.drag_step();
    }

    /// Run one fixed step.
    pub fn tick(&mut self) {
        self.before_tick();
        self.physics.step();
        for body in self.scene.iter_mut() {
            body.pose = self.physics.pose(&body.physics);
        }
        self.clock.advance(self.config.fixed_dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::config::keycode;
    use crate::core::physics::ColliderDesc;

    fn ball(sim: &mut Simulation, label: &str, pos: Vec2, mass: f32) -> BodyId {
        let desc = BodyDesc::dynamic(ColliderDesc::Ball { radius: 5.0 })
            .with_position(pos)
            .with_mass(mass);
        sim.spawn_body(label, &desc, BodyShape::Circle { radius: 5.0 }, VectorColor::WHITE)
    }

    fn triangle() -> ShipShape {
        ShipShape::from_vertex_sets(vec![vec![
            Vec2::new(-10.0, -10.0),
            Vec2::new(10.0, -10.0),
            Vec2::new(0.0, 20.0),
        ]])
        .unwrap()
    }

    #[test]
    fn ids_are_unique_and_increasing() {
        let mut sim = Simulation::new(SimConfig::default());
        let a = sim.next_id();
        let b = sim.next_id();
        assert!(b.0 > a.0);
    }

    #[test]
    fn physics_dt_is_scaled() {
        let config = SimConfig {
            fixed_dt: 0.02,
            time_scale: 0.5,
            ..SimConfig::default()
        };
        let sim = Simulation::new(config);
        assert!((sim.physics.dt() - 0.01).abs() < 1e-7);
    }

    #[test]
    fn pending_player_ignores_every_key() {
        let mut sim = Simulation::new(SimConfig::default());
        for key in [
            keycode::ARROW_DOWN,
            keycode::ARROW_UP,
            keycode::ARROW_LEFT,
            keycode::ARROW_RIGHT,
            keycode::W,
            keycode::A,
            keycode::S,
            keycode::D,
        ] {
            sim.handle_input(&InputEvent::KeyDown { key_code: key });
        }
        assert_eq!(sim.player(), Player::Pending);
        assert!(sim.control_step().is_idle());
        sim.tick();
        assert!(sim.effects.flames.is_empty());
    }

    #[test]
    fn first_tick_applies_no_gravity() {
        let mut sim = Simulation::new(SimConfig::default());
        let a = ball(&mut sim, "a", Vec2::new(0.0, 0.0), 1.0);
        let b = ball(&mut sim, "b", Vec2::new(100.0, 0.0), 1.0);
        sim.track(a);
        sim.track(b);

        sim.before_tick();
        let body_a = sim.scene.get(a).unwrap().physics;
        assert_eq!(sim.physics.force(&body_a), Vec2::ZERO);

        sim.physics.step();
        sim.clock.advance(sim.config().fixed_dt);
        sim.before_tick();
        let f = sim.physics.force(&body_a);
        assert!(f.x > 0.0, "a should be pulled toward b, got {:?}", f);
        assert!(f.y.abs() < 1e-4);
    }

    #[test]
    fn forces_do_not_accumulate_across_ticks() {
        let mut sim = Simulation::new(SimConfig::default());
        let a = ball(&mut sim, "a", Vec2::new(0.0, 0.0), 1.0);
        let b = ball(&mut sim, "b", Vec2::new(400.0, 0.0), 1.0);
        sim.track(a);
        sim.track(b);
        let body_a = sim.scene.get(a).unwrap().physics;

        sim.tick();
        sim.tick();
        sim.before_tick();
        let second = sim.physics.force(&body_a);

        // Same elapsed time and almost the same distance: same force.
        let dt_ms = sim.config().fixed_dt * 1000.0 * sim.config().time_scale;
        let expected = dt_ms * sim.config().gravity_constant / 400.0;
        assert!((second.x - expected).abs() / expected < 0.01, "{} vs {}", second.x, expected);
    }

    #[test]
    fn untracked_bodies_feel_no_gravity() {
        let mut sim = Simulation::new(SimConfig::default());
        let a = ball(&mut sim, "a", Vec2::new(0.0, 0.0), 1.0);
        let b = ball(&mut sim, "b", Vec2::new(100.0, 0.0), 1.0);
        sim.track(a);
        sim.track(a);
        assert_eq!(sim.tracked(), &[a]);

        sim.tick();
        sim.before_tick();
        let body_b = sim.scene.get(b).unwrap().physics;
        assert_eq!(sim.physics.force(&body_b), Vec2::ZERO);
    }

    #[test]
    fn installed_player_takes_controls() {
        let mut sim = Simulation::new(SimConfig::default());
        let ship = sim.install_player(triangle());
        assert_eq!(sim.player(), Player::Active(ship));
        assert!(!sim.tracked().contains(&ship));

        sim.handle_input(&InputEvent::KeyDown { key_code: keycode::ARROW_DOWN });
        sim.before_tick();

        let handle = sim.player_body().unwrap().physics;
        let f = sim.physics.force(&handle);
        assert!((f - Vec2::new(0.0, sim.config().ship.thrust)).length() < 1e-3, "{:?}", f);
        assert_eq!(sim.effects.flames.len(), 1);

        sim.handle_input(&InputEvent::KeyUp { key_code: keycode::ARROW_DOWN });
        sim.before_tick();
        assert_eq!(sim.physics.force(&handle), Vec2::ZERO);
        assert!(sim.effects.flames.is_empty());
    }

    #[test]
    fn second_install_keeps_the_first_ship() {
        let mut sim = Simulation::new(SimConfig::default());
        let first = sim.install_player(triangle());
        let second = sim.install_player(triangle());
        assert_eq!(first, second);
        assert_eq!(sim.scene.len(), 1);
    }

    #[test]
    fn thrust_moves_the_ship() {
        let mut sim = Simulation::new(SimConfig::default());
        sim.install_player(triangle());
        let start = sim.player_body().unwrap().pos();

        sim.handle_input(&InputEvent::KeyDown { key_code: keycode::S });
        for _ in 0..30 {
            sim.tick();
        }
        let end = sim.player_body().unwrap().pos();
        assert!(end.y > start.y + 1.0, "ship did not move: {:?} -> {:?}", start, end);
    }

    #[test]
    fn drag_pulls_grabbed_body() {
        let mut sim = Simulation::new(SimConfig::default());
        let a = ball(&mut sim, "a", Vec2::new(50.0, 50.0), 2.0);

        sim.handle_input(&InputEvent::PointerDown { x: 52.0, y: 50.0 });
        assert_eq!(sim.drag.grabbed(), Some(a));
        sim.handle_input(&InputEvent::PointerMove { x: 150.0, y: 50.0 });

        sim.before_tick();
        let body = sim.scene.get(a).unwrap().physics;
        let f = sim.physics.force(&body);
        assert!((f - Vec2::new(100.0 * 0.2 * 2.0, 0.0)).length() < 1e-3, "{:?}", f);

        sim.handle_input(&InputEvent::PointerUp { x: 150.0, y: 50.0 });
        sim.before_tick();
        assert_eq!(sim.physics.force(&body), Vec2::ZERO);
    }
}
