use crate::core::body::BodyShape;
use crate::core::simulation::Simulation;
use crate::systems::vector::{VectorColor, VectorState};

/// cornflowerblue
pub const VELOCITY_COLOR: VectorColor = VectorColor::rgb(100.0 / 255.0, 149.0 / 255.0, 237.0 / 255.0);
const VELOCITY_WIDTH: f32 = 3.0;
/// Seconds of travel the velocity indicator covers.
const VELOCITY_SCALE: f32 = 0.1;

/// Build the frame's triangle list.
/// Draw order: bodies in creation order, velocity indicators, then flames.
pub fn build_frame(sim: &Simulation, vectors: &mut VectorState) {
    vectors.clear();

    for body in sim.scene.iter() {
        match &body.shape {
            BodyShape::Circle { radius } => vectors.fill_circle(body.pos(), *radius, body.color),
            BodyShape::Polygons(parts) => {
                for part in parts {
                    let world: Vec<_> = part.iter().map(|p| body.to_world(*p)).collect();
                    vectors.fill_polygon(&world, body.color);
                }
            }
        }
    }

    if sim.config().show_velocity {
        for body in sim.scene.iter().filter(|b| !b.is_static) {
            let from = body.pos();
            let to = from + body.pose.velocity * VELOCITY_SCALE;
            if from.distance_squared(to) > 1e-6 {
                vectors.stroke_polyline(&[from, to], VELOCITY_WIDTH, VELOCITY_COLOR);
            }
        }
    }

    for flame in &sim.effects.flames {
        vectors.fill_triangle_colored(flame.points, flame.colors);
    }

    if vectors.dropped() > 0 {
        log::debug!("frame: dropped {} shapes, buffer full", vectors.dropped());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::config::{keycode, SimConfig};
    use crate::assets::shape::ShipShape;
    use crate::core::universe::{build_universe, EARTH_COLOR};
    use crate::input::queue::InputEvent;
    use glam::Vec2;

    fn square_ship() -> ShipShape {
        ShipShape::from_vertex_sets(vec![vec![
            Vec2::new(-10.0, -10.0),
            Vec2::new(10.0, -10.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(-10.0, 10.0),
        ]])
        .unwrap()
    }

    /// Vertices in the frame whose colour matches `color`.
    fn count_colored(vectors: &VectorState, color: VectorColor) -> usize {
        vectors
            .buffer()
            .chunks_exact(6)
            .filter(|v| v[2] == color.r && v[3] == color.g && v[4] == color.b && v[5] == color.a)
            .count()
    }

    #[test]
    fn empty_world_draws_nothing() {
        let sim = Simulation::new(SimConfig::default());
        let mut vectors = VectorState::new(1024);
        build_frame(&sim, &mut vectors);
        assert_eq!(vectors.vertex_count(), 0);
    }

    #[test]
    fn planets_are_filled_circles() {
        let config = SimConfig {
            show_velocity: false,
            ..SimConfig::default()
        };
        let mut sim = Simulation::new(config);
        build_universe(&mut sim);
        let mut vectors = VectorState::new(16384);
        build_frame(&sim, &mut vectors);

        assert!(vectors.vertex_count() > 0);
        assert_eq!(vectors.vertex_count() % 3, 0);
        assert!(count_colored(&vectors, EARTH_COLOR) > 0);
    }

    #[test]
    fn ship_polygon_follows_pose() {
        let config = SimConfig {
            show_velocity: false,
            ..SimConfig::default()
        };
        let mut sim = Simulation::new(config);
        sim.install_player(square_ship());
        let spawn = sim.config().ship.spawn;

        let mut vectors = VectorState::new(1024);
        build_frame(&sim, &mut vectors);
        // Two triangles for the square.
        assert_eq!(vectors.vertex_count(), 6);
        for v in vectors.buffer().chunks_exact(6) {
            let p = Vec2::new(v[0], v[1]);
            assert!((p - spawn).abs().max_element() <= 10.0 + 1e-3, "{:?}", p);
        }
    }

    #[test]
    fn velocity_indicator_only_for_moving_bodies() {
        let mut sim = Simulation::new(SimConfig::default());
        build_universe(&mut sim);
        let mut vectors = VectorState::new(16384);
        build_frame(&sim, &mut vectors);
        // The moon moves, the earth is static.
        assert!(count_colored(&vectors, VELOCITY_COLOR) > 0);

        let quiet = SimConfig {
            show_velocity: false,
            ..SimConfig::default()
        };
        let mut sim = Simulation::new(quiet);
        build_universe(&mut sim);
        build_frame(&sim, &mut vectors);
        assert_eq!(count_colored(&vectors, VELOCITY_COLOR), 0);
    }

    #[test]
    fn flames_are_drawn_while_thrusting() {
        let config = SimConfig {
            show_velocity: false,
            ..SimConfig::default()
        };
        let mut sim = Simulation::new(config);
        sim.install_player(square_ship());
        let mut vectors = VectorState::new(1024);

        build_frame(&sim, &mut vectors);
        let idle = vectors.vertex_count();

        sim.handle_input(&InputEvent::KeyDown { key_code: keycode::ARROW_UP });
        sim.before_tick();
        build_frame(&sim, &mut vectors);
        // Reverse fires both side thrusters.
        assert_eq!(vectors.vertex_count(), idle + 6);
    }
}
