//! Ray casting for Wallcast
//! A center particle probes every wall with a fixed bundle of rays and lights
//! up the nearest intersection in each direction

use egui::{Color32, Painter, Pos2, Stroke, Vec2};
use rayon::prelude::*;

use crate::config::{BEAM_ALPHA, INK, RAY_STEP_DEG};
use crate::walls::Boundary;

/// A directed half-line. The origin is not stored; it is always the owning
/// particle's position and is passed into every cast.
#[derive(Clone, Copy, Debug)]
pub struct Ray {
    pub dir: Vec2,
}

impl Ray {
    pub fn new(angle: f32) -> Self {
        Self {
            dir: Vec2::angled(angle),
        }
    }

    /// Exact line/segment intersection between this ray and a wall chord.
    ///
    /// Solves the two-segment parametric system: `t` runs along the chord,
    /// `u` along the ray direction. A hit needs `0 < t < 1` and `u > 0`, all
    /// strict, so a graze exactly on a chord endpoint or exactly at the ray
    /// origin does not count. A zero denominator means parallel lines and
    /// yields no hit.
    pub fn cast(&self, origin: Pos2, segment: [Pos2; 2]) -> Option<Pos2> {
        let [a, b] = segment;
        let (x1, y1) = (a.x, a.y);
        let (x2, y2) = (b.x, b.y);
        let (x3, y3) = (origin.x, origin.y);
        let (x4, y4) = (origin.x + self.dir.x, origin.y + self.dir.y);

        let den = (x1 - x2) * (y3 - y4) - (y1 - y2) * (x3 - x4);
        if den == 0.0 {
            return None;
        }

        let t = ((x1 - x3) * (y3 - y4) - (y1 - y3) * (x3 - x4)) / den;
        let u = -((x1 - x2) * (y1 - y3) - (y1 - y2) * (x1 - x3)) / den;
        if t > 0.0 && t < 1.0 && u > 0.0 {
            Some(Pos2::new(x1 + t * (x2 - x1), y1 + t * (y2 - y1)))
        } else {
            None
        }
    }
}

/// The light source at the canvas center, owning the full ray bundle.
pub struct Particle {
    pos: Pos2,
    rays: Vec<Ray>,
}

impl Particle {
    /// One ray every `RAY_STEP_DEG` degrees. The bundle never changes size
    /// or aim after construction.
    pub fn new() -> Self {
        let count = (360.0 / RAY_STEP_DEG) as usize;
        let rays = (0..count)
            .map(|k| Ray::new((k as f32 * RAY_STEP_DEG).to_radians()))
            .collect();
        Self {
            pos: Pos2::ZERO,
            rays,
        }
    }

    /// Recenter on the canvas; called every frame before the sweep.
    pub fn update(&mut self, center: Pos2) {
        self.pos = center;
    }

    /// Cast every ray against every wall and keep the strictly nearest hit
    /// per ray. Results are indexed by ray order; walls are examined in
    /// order within each ray, so an exact distance tie keeps the earlier
    /// wall's point.
    pub fn cast_all(&self, boundaries: &[Boundary], center: Pos2) -> Vec<Option<Pos2>> {
        let segments: Vec<[Pos2; 2]> = boundaries.iter().map(|b| b.endpoints(center)).collect();

        self.rays
            .par_iter()
            .map(|ray| {
                let mut closest: Option<Pos2> = None;
                let mut record = f32::INFINITY;
                for segment in &segments {
                    if let Some(pt) = ray.cast(self.pos, *segment) {
                        let d = self.pos.distance(pt);
                        if d < record {
                            record = d;
                            closest = Some(pt);
                        }
                    }
                }
                closest
            })
            .collect()
    }

    /// Draw the source: a diameter-1 dot plus a short stub along each ray.
    pub fn render(&self, painter: &Painter) {
        painter.circle_filled(self.pos, 0.5, INK);
        for ray in &self.rays {
            painter.line_segment([self.pos, self.pos + ray.dir * 2.0], Stroke::new(1.0, INK));
        }
    }

    /// Draw a translucent beam from the source to each ray's nearest hit.
    pub fn render_beams(&self, painter: &Painter, hits: &[Option<Pos2>]) {
        let beam = Color32::from_rgba_unmultiplied(INK.r(), INK.g(), INK.b(), BEAM_ALPHA);
        for hit in hits.iter().flatten() {
            painter.line_segment([self.pos, *hit], Stroke::new(1.0, beam));
        }
    }
}
