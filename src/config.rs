//! Fixed sketch parameters for Wallcast
//! There is no runtime configuration surface; every tunable lives here

use egui::Color32;

// ============================================================================
// Palette
// ============================================================================

/// Pale beige canvas background.
pub const BACKGROUND: Color32 = Color32::from_rgb(245, 245, 235);

/// Near-black ink used for walls, the particle, and text.
pub const INK: Color32 = Color32::from_rgb(38, 38, 38);

/// Alpha of the light beams drawn from the particle to its hits.
pub const BEAM_ALPHA: u8 = 100;

// ============================================================================
// Scene
// ============================================================================

/// Number of walls spawned around the center.
pub const WALL_COUNT: usize = 25;

/// Degrees between adjacent rays in the particle's bundle (0.25 -> 1440 rays).
pub const RAY_STEP_DEG: f32 = 0.25;

/// Angular span of one wall chord, in radians.
pub const WALL_ARC: f32 = 0.1;

// ============================================================================
// Wall motion
// ============================================================================

/// Hard lower bound for a wall's radius; crossing it reverses the pulse.
pub const RADIUS_FLOOR: f32 = 50.0;

/// Inner edge of the wall band: spawn minimum and the quiet-level ceiling.
pub const WALL_BAND_MIN: f32 = 100.0;

/// Per-wall rotation speed assigned at spawn (uniform in this range).
pub const DRIFT_MIN: f32 = 0.005;
pub const DRIFT_MAX: f32 = 0.015;

/// Per-wall radius pulse speed assigned at spawn (uniform in this range).
pub const PULSE_MIN: f32 = 0.2;
pub const PULSE_MAX: f32 = 0.5;

// ============================================================================
// Amplitude mapping
// ============================================================================

/// Wall rotation speed range the amplitude level maps onto, radians per frame.
pub const SPEED_MIN: f32 = 0.005;
pub const SPEED_MAX: f32 = 0.1;

/// Largest wall radius that stays inside the canvas; upper end of the mapped
/// ceiling range.
pub fn max_wall_radius(width: f32, height: f32) -> f32 {
    width.min(height) / 2.0
}

// ============================================================================
// Typography
// ============================================================================

pub const TITLE_FONT_SIZE: f32 = 32.0;
pub const FOOTER_FONT_SIZE: f32 = 20.0;

/// Distance of both labels from their canvas edge.
pub const TEXT_MARGIN: f32 = 20.0;

pub const INSTRUCTION: &str = "Click to start and change the piece :))";

/// Candidate titles; one is drawn at random at startup.
pub const MUSICAL_KEYS: &[&str] = &["E minor"];

// ============================================================================
// Audio
// ============================================================================

/// The fixed playlist. All three pieces are in E minor.
pub const TRACKS: &[&str] = &[
    "assets/Chopin - Prelude in E Minor (Op. 28 No. 4).mp3",
    "assets/Mendelssohn Violin Concerto E Minor OP.64 - 3rd mov..mp3",
    "assets/Vivaldi Concerto for Violin, Strings and Harpsichord in E Minor, RV 278 - I. Allegro molto (1).mp3",
];

/// Amplitude envelope resolution, windows per second.
pub const ENVELOPE_FPS: u32 = 60;
