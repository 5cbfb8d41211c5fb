//! Wallcast - audio-reactive ray casting
//! Drifting walls lit by rays from the canvas center, with the walls'
//! motion following the loudness of the piece being played.

mod audio;
mod config;
mod rays;
mod walls;

use eframe::egui;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use audio::AudioPlayer;
use rays::Particle;
use walls::WallField;

/// Linear map from a [0, 1] level onto an output range. Deliberately
/// unclamped: a level above 1 keeps scaling the output past `out_max`.
fn map_level(level: f32, out_min: f32, out_max: f32) -> f32 {
    out_min + (out_max - out_min) * level
}

/// Main application state
struct WallcastApp {
    audio: AudioPlayer,
    walls: WallField,
    particle: Particle,
    musical_key: &'static str,
    rng: Pcg32,
}

impl WallcastApp {
    fn new(cc: &eframe::CreationContext<'_>, audio: AudioPlayer, mut rng: Pcg32) -> Self {
        cc.egui_ctx.set_visuals(egui::Visuals::light());

        let musical_key = config::MUSICAL_KEYS[rng.gen_range(0..config::MUSICAL_KEYS.len())];
        log::info!("key of the piece: {musical_key}");

        Self {
            audio,
            walls: WallField::new(),
            particle: Particle::new(),
            musical_key,
            rng,
        }
    }

    fn render_canvas(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                let (rect, response) =
                    ui.allocate_exact_size(ui.available_size(), egui::Sense::click());

                if response.clicked() {
                    self.audio.play_random(&mut self.rng);
                }

                // Walls spawn on the first frame, once the real canvas
                // size is known.
                if self.walls.is_empty() {
                    self.walls = WallField::spawn(
                        &mut self.rng,
                        config::WALL_COUNT,
                        rect.width(),
                        rect.height(),
                    );
                }

                let painter = ui.painter_at(rect);
                painter.rect_filled(rect, 0.0, config::BACKGROUND);

                painter.text(
                    egui::Pos2::new(rect.center().x, rect.top() + config::TEXT_MARGIN),
                    egui::Align2::CENTER_TOP,
                    self.musical_key,
                    egui::FontId::new(config::TITLE_FONT_SIZE, egui::FontFamily::Proportional),
                    config::INK,
                );

                // The current loudness drives both how fast the walls turn
                // and how far out they may pulse.
                let level = self.audio.level();
                let speed = map_level(level, config::SPEED_MIN, config::SPEED_MAX);
                let max_radius = map_level(
                    level,
                    config::WALL_BAND_MIN,
                    config::max_wall_radius(rect.width(), rect.height()),
                );

                let center = rect.center();
                self.walls.update(speed, max_radius);
                self.walls.render(&painter, center);

                self.particle.update(center);
                self.particle.render(&painter);
                let hits = self.particle.cast_all(self.walls.boundaries(), center);
                self.particle.render_beams(&painter, &hits);

                painter.text(
                    egui::Pos2::new(rect.center().x, rect.bottom() - config::TEXT_MARGIN),
                    egui::Align2::CENTER_BOTTOM,
                    config::INSTRUCTION,
                    egui::FontId::new(config::FOOTER_FONT_SIZE, egui::FontFamily::Proportional),
                    config::INK,
                );
            });
    }
}

impl eframe::App for WallcastApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.render_canvas(ctx);
        // Request continuous repaint for the animation
        ctx.request_repaint();
    }
}

fn main() -> eframe::Result<()> {
    env_logger::init();

    let audio = match AudioPlayer::new(config::TRACKS, config::ENVELOPE_FPS) {
        Ok(audio) => audio,
        Err(e) => {
            log::error!("audio startup failed: {e:#}");
            std::process::exit(1);
        }
    };

    let seed: u64 = rand::random();
    log::debug!("scene seed: {seed}");
    let rng = Pcg32::seed_from_u64(seed);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_title("Wallcast")
            .with_min_inner_size([640.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Wallcast",
        options,
        Box::new(move |cc| Box::new(WallcastApp::new(cc, audio, rng))),
    )
}
