//! Playback and amplitude analysis for Wallcast
//! Every track is decoded once at startup into a per-frame RMS envelope;
//! during playback the animation reads the envelope back by wall-clock time.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::Context as _;
use rand::Rng;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// Precomputed loudness curve of one track: RMS per animation frame.
#[derive(Clone, Debug)]
pub struct AmplitudeEnvelope {
    levels: Vec<f32>,
    fps: u32,
}

impl AmplitudeEnvelope {
    /// Windowed RMS over mono samples, one window per envelope frame.
    /// A trailing partial window is dropped.
    pub fn from_samples(samples: &[f32], sample_rate: u32, fps: u32) -> Self {
        let samples_per_frame = (sample_rate / fps) as usize;
        let total_frames = samples.len() / samples_per_frame;
        let mut levels = Vec::with_capacity(total_frames);
        for frame in 0..total_frames {
            let start = frame * samples_per_frame;
            let window = &samples[start..start + samples_per_frame];
            let mean_square =
                window.iter().map(|s| s * s).sum::<f32>() / samples_per_frame as f32;
            levels.push(mean_square.sqrt());
        }
        Self { levels, fps }
    }

    /// Loudness at a playback position, 0 past the end of the track.
    pub fn level_at(&self, elapsed: Duration) -> f32 {
        let frame = (elapsed.as_secs_f32() * self.fps as f32) as usize;
        self.levels.get(frame).copied().unwrap_or(0.0)
    }

    pub fn duration_secs(&self) -> f32 {
        self.levels.len() as f32 / self.fps as f32
    }
}

/// One playlist entry: the file on disk plus its precomputed envelope.
struct Track {
    path: PathBuf,
    envelope: AmplitudeEnvelope,
}

/// Playback state for the fixed playlist. A single sink is reused for the
/// whole session, so starting a track always silences the previous one.
pub struct AudioPlayer {
    _stream: OutputStream,
    _stream_handle: OutputStreamHandle,
    sink: Sink,
    tracks: Vec<Track>,
    now_playing: Option<(usize, Instant)>,
}

impl AudioPlayer {
    /// Opens the default output device and analyzes every track up front.
    /// An unreadable or undecodable track is a startup failure.
    pub fn new(track_paths: &[&str], fps: u32) -> anyhow::Result<Self> {
        let (stream, stream_handle) =
            OutputStream::try_default().context("failed to open the default audio output")?;
        let sink = Sink::try_new(&stream_handle).context("failed to create the playback sink")?;

        let mut tracks = Vec::with_capacity(track_paths.len());
        for path in track_paths {
            let envelope = analyze_track(Path::new(path), fps)
                .with_context(|| format!("failed to load track {path}"))?;
            log::info!("analyzed {path}: {:.1}s", envelope.duration_secs());
            tracks.push(Track {
                path: PathBuf::from(*path),
                envelope,
            });
        }

        Ok(Self {
            _stream: stream,
            _stream_handle: stream_handle,
            sink,
            tracks,
            now_playing: None,
        })
    }

    /// Stops whatever is playing and starts a random track. The draw covers
    /// the full playlist, so the same piece may come up again.
    pub fn play_random(&mut self, rng: &mut impl Rng) {
        let index = rng.gen_range(0..self.tracks.len());
        let path = self.tracks[index].path.clone();
        match self.start(&path) {
            Ok(()) => {
                log::info!("now playing: {}", path.display());
                self.now_playing = Some((index, Instant::now()));
            }
            Err(e) => {
                // The file was readable at startup; log and drop the click.
                log::error!("failed to start {}: {e:#}", path.display());
            }
        }
    }

    fn start(&self, path: &Path) -> anyhow::Result<()> {
        let file = File::open(path)?;
        let source = Decoder::new(BufReader::new(file))?;
        self.sink.stop();
        self.sink.append(source);
        self.sink.play();
        Ok(())
    }

    pub fn is_playing(&self) -> bool {
        !self.sink.is_paused() && !self.sink.empty()
    }

    /// Amplitude of the current track at the playback position, 0 when idle.
    pub fn level(&self) -> f32 {
        match self.now_playing {
            Some((index, started_at)) if self.is_playing() => {
                self.tracks[index].envelope.level_at(started_at.elapsed())
            }
            _ => 0.0,
        }
    }
}

/// Decodes a track to mono and reduces it to an RMS envelope.
fn analyze_track(path: &Path, fps: u32) -> anyhow::Result<AmplitudeEnvelope> {
    let (samples, sample_rate) = decode_mono(path)?;
    anyhow::ensure!(!samples.is_empty(), "no audio frames decoded");
    Ok(AmplitudeEnvelope::from_samples(&samples, sample_rate, fps))
}

/// Full offline decode, downmixing interleaved channels to mono.
fn decode_mono(path: &Path) -> anyhow::Result<(Vec<f32>, u32)> {
    let file = File::open(path)?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let format_opts = FormatOptions::default();
    let metadata_opts = MetadataOptions::default();
    let decoder_opts = DecoderOptions::default();

    let probed =
        symphonia::default::get_probe().format(&hint, mss, &format_opts, &metadata_opts)?;
    let mut format = probed.format;

    let track = format
        .default_track()
        .ok_or_else(|| anyhow::anyhow!("no default audio track"))?;
    let sample_rate = track.codec_params.sample_rate.unwrap_or(44100);
    let channels = track.codec_params.channels.map(|c| c.count()).unwrap_or(2);
    let track_id = track.id;

    let mut decoder = symphonia::default::get_codecs().make(&track.codec_params, &decoder_opts)?;

    let mut samples = Vec::new();
    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(_) => break,
        };
        if packet.track_id() != track_id {
            continue;
        }
        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            // Skip malformed packets, keep the rest of the stream.
            Err(_) => continue,
        };
        let spec = *decoded.spec();
        let mut buffer = SampleBuffer::<f32>::new(decoded.frames() as u64, spec);
        buffer.copy_interleaved_ref(decoded);
        for frame in buffer.samples().chunks(channels) {
            samples.push(frame.iter().sum::<f32>() / channels as f32);
        }
    }

    Ok((samples, sample_rate))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::TAU;

    #[test]
    fn constant_signal_rms_is_its_amplitude() {
        // One second of DC at 0.5 and 60 fps: 60 windows, each with RMS 0.5.
        let samples = vec![0.5f32; 44100];
        let envelope = AmplitudeEnvelope::from_samples(&samples, 44100, 60);
        assert_eq!(envelope.levels.len(), 60);
        for &level in &envelope.levels {
            assert!((level - 0.5).abs() < 1e-4);
        }
    }

    #[test]
    fn sine_rms_is_amplitude_over_sqrt_two() {
        // The 49-sample period divides the 735-sample window exactly, so
        // every window sees whole cycles.
        let samples: Vec<f32> = (0..44100)
            .map(|i| (TAU * (i % 49) as f32 / 49.0).sin())
            .collect();
        let envelope = AmplitudeEnvelope::from_samples(&samples, 44100, 60);
        for &level in &envelope.levels {
            assert!((level - std::f32::consts::FRAC_1_SQRT_2).abs() < 1e-3);
        }
    }

    #[test]
    fn silence_has_zero_rms() {
        let samples = vec![0.0f32; 44100];
        let envelope = AmplitudeEnvelope::from_samples(&samples, 44100, 60);
        assert!(envelope.levels.iter().all(|&level| level == 0.0));
    }

    #[test]
    fn trailing_partial_window_is_dropped() {
        let samples = vec![0.25f32; 735 + 300];
        let envelope = AmplitudeEnvelope::from_samples(&samples, 44100, 60);
        assert_eq!(envelope.levels.len(), 1);
    }

    #[test]
    fn level_is_indexed_by_elapsed_time() {
        let envelope = AmplitudeEnvelope {
            levels: vec![0.1, 0.2, 0.3],
            fps: 60,
        };
        assert_eq!(envelope.level_at(Duration::ZERO), 0.1);
        assert_eq!(envelope.level_at(Duration::from_millis(25)), 0.2);
        assert_eq!(envelope.level_at(Duration::from_millis(40)), 0.3);
    }

    #[test]
    fn level_past_the_end_is_zero() {
        let envelope = AmplitudeEnvelope {
            levels: vec![0.9; 60],
            fps: 60,
        };
        assert_eq!(envelope.level_at(Duration::from_secs(1)), 0.0);
        assert_eq!(envelope.level_at(Duration::from_secs(3600)), 0.0);
    }

    #[test]
    fn duration_counts_whole_frames() {
        let samples = vec![0.1f32; 44100 * 2];
        let envelope = AmplitudeEnvelope::from_samples(&samples, 44100, 60);
        assert!((envelope.duration_secs() - 2.0).abs() < 1e-6);
    }
}
