//! Wall field for Wallcast
//! Short arc-chords that rotate and pulse around the canvas center

use egui::{Painter, Pos2, Stroke, Vec2};
use rand::Rng;

use crate::config::{
    max_wall_radius, DRIFT_MAX, DRIFT_MIN, INK, PULSE_MAX, PULSE_MIN, RADIUS_FLOOR, WALL_ARC,
    WALL_BAND_MIN,
};

/// One wall: a chord between two points `WALL_ARC` radians apart on a circle
/// around the canvas center.
#[derive(Clone, Copy, Debug)]
pub struct Boundary {
    pub angle: f32,
    pub radius: f32,
    /// Signed radius change per frame; the sign flips at the band edges.
    pub radius_speed: f32,
    /// Rotation speed assigned at spawn. The frame driver rotates every wall
    /// with the amplitude-mapped speed instead, so this stays as spawned.
    pub rotation_speed: f32,
}

impl Boundary {
    pub fn spawn(rng: &mut impl Rng, width: f32, height: f32) -> Self {
        Self {
            angle: rng.gen_range(0.0..std::f32::consts::TAU),
            radius: rng.gen_range(WALL_BAND_MIN..max_wall_radius(width, height)),
            radius_speed: rng.gen_range(PULSE_MIN..PULSE_MAX),
            rotation_speed: rng.gen_range(DRIFT_MIN..DRIFT_MAX),
        }
    }

    /// Advance the rotation and the radius pulse. A radius beyond
    /// `max_radius` or under the floor reverses the pulse direction; the
    /// overshoot itself is kept, never clamped.
    pub fn update(&mut self, speed: f32, max_radius: f32) {
        self.angle += speed;
        self.radius += self.radius_speed;
        if self.radius > max_radius || self.radius < RADIUS_FLOOR {
            self.radius_speed = -self.radius_speed;
        }
    }

    pub fn endpoints(&self, center: Pos2) -> [Pos2; 2] {
        [
            center + Vec2::angled(self.angle) * self.radius,
            center + Vec2::angled(self.angle + WALL_ARC) * self.radius,
        ]
    }

    pub fn render(&self, painter: &Painter, center: Pos2) {
        let [a, b] = self.endpoints(center);
        painter.line_segment([a, b], Stroke::new(1.0, INK));
    }
}

/// The fixed collection of walls, spawned once from the live canvas size.
pub struct WallField {
    walls: Vec<Boundary>,
}

impl WallField {
    /// Empty field; the real spawn waits for the first frame's canvas size.
    pub fn new() -> Self {
        Self { walls: Vec::new() }
    }

    pub fn spawn(rng: &mut impl Rng, count: usize, width: f32, height: f32) -> Self {
        let walls: Vec<Boundary> = (0..count)
            .map(|_| Boundary::spawn(rng, width, height))
            .collect();
        for (i, wall) in walls.iter().enumerate() {
            log::debug!(
                "wall {i}: angle {:.2} radius {:.1} pulse {:.2} drift {:.3}",
                wall.angle,
                wall.radius,
                wall.radius_speed,
                wall.rotation_speed
            );
        }
        log::info!("spawned {count} walls on a {width:.0}x{height:.0} canvas");
        Self { walls }
    }

    pub fn is_empty(&self) -> bool {
        self.walls.is_empty()
    }

    pub fn boundaries(&self) -> &[Boundary] {
        &self.walls
    }

    pub fn update(&mut self, speed: f32, max_radius: f32) {
        for wall in &mut self.walls {
            wall.update(speed, max_radius);
        }
    }

    pub fn render(&self, painter: &Painter, center: Pos2) {
        for wall in &self.walls {
            wall.render(painter, center);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn wall(radius: f32, radius_speed: f32) -> Boundary {
        Boundary {
            angle: 0.0,
            radius,
            radius_speed,
            rotation_speed: 0.01,
        }
    }

    #[test]
    fn update_advances_angle_by_the_mapped_speed() {
        let mut w = wall(200.0, 0.3);
        w.update(0.05, 400.0);
        assert!((w.angle - 0.05).abs() < 1e-6);
        w.update(0.05, 400.0);
        assert!((w.angle - 0.1).abs() < 1e-6);
    }

    #[test]
    fn no_reversal_inside_band() {
        let mut w = wall(200.0, 0.4);
        w.update(0.0, 400.0);
        assert!((w.radius - 200.4).abs() < 1e-3);
        assert!(w.radius_speed > 0.0);
    }

    #[test]
    fn reverses_at_floor() {
        let mut w = wall(50.1, -0.4);
        w.update(0.0, 400.0);
        // the overshoot is kept, only the direction flips
        assert!((w.radius - 49.7).abs() < 1e-3);
        assert!(w.radius_speed > 0.0);
    }

    #[test]
    fn reverses_at_ceiling() {
        let mut w = wall(399.8, 0.4);
        w.update(0.0, 400.0);
        assert!((w.radius - 400.2).abs() < 1e-3);
        assert!(w.radius_speed < 0.0);
    }

    #[test]
    fn parked_beyond_ceiling_jitters_in_place() {
        // Before any music plays the ceiling sits at the band minimum, so a
        // wall spawned above it can only tremble around its spawn radius.
        let mut w = wall(400.0, 0.3);
        for _ in 0..1000 {
            w.update(0.0, 100.0);
            assert!(w.radius >= 400.0 - 0.3 - 1e-3);
            assert!(w.radius <= 400.0 + 0.3 + 1e-3);
        }
    }

    #[test]
    fn spawn_respects_configured_ranges() {
        let mut rng = Pcg32::seed_from_u64(7);
        let field = WallField::spawn(&mut rng, 25, 900.0, 600.0);
        assert_eq!(field.boundaries().len(), 25);
        for wall in field.boundaries() {
            assert!(wall.angle >= 0.0 && wall.angle < std::f32::consts::TAU);
            assert!(wall.radius >= WALL_BAND_MIN && wall.radius < 300.0);
            assert!(wall.radius_speed >= PULSE_MIN && wall.radius_speed < PULSE_MAX);
            assert!(wall.rotation_speed >= DRIFT_MIN && wall.rotation_speed < DRIFT_MAX);
        }
    }

    #[test]
    fn seeded_spawns_are_reproducible() {
        let a = WallField::spawn(&mut Pcg32::seed_from_u64(42), 25, 800.0, 600.0);
        let b = WallField::spawn(&mut Pcg32::seed_from_u64(42), 25, 800.0, 600.0);
        for (x, y) in a.boundaries().iter().zip(b.boundaries()) {
            assert_eq!(x.angle, y.angle);
            assert_eq!(x.radius, y.radius);
            assert_eq!(x.radius_speed, y.radius_speed);
            assert_eq!(x.rotation_speed, y.rotation_speed);
        }
    }

    proptest! {
        #[test]
        fn radius_stays_inside_padded_band(
            r0 in RADIUS_FLOOR..300.0f32,
            pulse in PULSE_MIN..PULSE_MAX,
            down in proptest::bool::ANY,
            steps in 1usize..3000,
        ) {
            let mut w = wall(r0, if down { -pulse } else { pulse });
            for _ in 0..steps {
                w.update(0.01, 300.0);
                prop_assert!(w.radius >= RADIUS_FLOOR - PULSE_MAX - 1e-3);
                prop_assert!(w.radius <= 300.0 + PULSE_MAX + 1e-3);
            }
        }
    }
}
