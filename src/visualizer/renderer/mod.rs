// src/visualizer/renderer/mod.rs
//! Per-tick frame composition: background, the active mode, then overlays.

mod bars;
mod radial;
mod spectrum;
mod waves;

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use tiny_skia::{Color, Pixmap, PixmapPaint, Transform};

use super::canvas::{self, Canvas};
use super::font;
use super::palette::{ColorScheme, Rgb};
use super::{
    BackgroundPattern, BeatState, EffectState, Frame, MagnitudeVector, ParticleSystem, SongInfo,
    SpectrumHistory, VisualizationMode,
};

pub use bars::{frequency_label, group_bands};
pub use waves::{oscilloscope_trace, wave_points};

pub const BACKGROUND: Rgb = Rgb::new(20, 20, 20);
pub const BACKGROUND_INVERTED: Rgb = Rgb::new(240, 240, 240);

/// Samples kept for the FPS readout.
const FPS_WINDOW: usize = 60;
const PATTERN_SPACING: usize = 20;
const NOISE_CELL: usize = 4;
/// Opacity of the previous frame when motion blur is on.
const TRAIL_OPACITY: f32 = 0.55;

/// Everything one frame is drawn from.
pub struct RenderInput<'a> {
    pub vector: &'a MagnitudeVector,
    pub history: &'a SpectrumHistory,
    pub beat: &'a BeatState,
    pub particles: &'a ParticleSystem,
    pub effects: &'a EffectState,
    pub song: &'a SongInfo,
    pub now: Instant,
}

/// What the per-mode routines get to look at.
pub(crate) struct ModeContext<'a> {
    pub scheme: ColorScheme,
    pub vector: &'a MagnitudeVector,
    pub history: &'a SpectrumHistory,
    pub particles: &'a ParticleSystem,
    pub frame_counter: u64,
}

pub struct FrameRenderer {
    width: u32,
    height: u32,
    beat_cooldown: Duration,
    frame_counter: u64,
    noise_offset: f32,
    frame_times: VecDeque<Duration>,
    last_render: Option<Instant>,
    trail: Option<Pixmap>,
}

impl FrameRenderer {
    pub fn new(width: u32, height: u32, beat_cooldown: Duration) -> Self {
        Self {
            width,
            height,
            beat_cooldown,
            frame_counter: 0,
            noise_offset: 0.0,
            frame_times: VecDeque::with_capacity(FPS_WINDOW),
            last_render: None,
            trail: None,
        }
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn set_size(&mut self, width: u32, height: u32) {
        if (width, height) != (self.width, self.height) {
            self.width = width;
            self.height = height;
            self.trail = None;
        }
    }

    pub fn frame_counter(&self) -> u64 {
        self.frame_counter
    }

    /// Frames per second averaged over the last [`FPS_WINDOW`] renders.
    pub fn fps(&self) -> f32 {
        if self.frame_times.is_empty() {
            return 0.0;
        }
        let avg = self.frame_times.iter().sum::<Duration>().as_secs_f32()
            / self.frame_times.len() as f32;
        if avg > 0.0 { 1.0 / avg } else { 0.0 }
    }

    pub fn render(&mut self, input: &RenderInput<'_>) -> Frame {
        self.record_frame_time(input.now);

        let Some(mut pixmap) = Pixmap::new(self.width, self.height) else {
            self.frame_counter += 1;
            return Frame::empty(self.width, self.height);
        };
        let effects = input.effects;
        let scheme = effects.resolved_scheme();

        {
            let mut c = Canvas::new(&mut pixmap);
            self.noise_offset = paint_background(&mut c, effects, self.noise_offset);

            if effects.motion_blur {
                if let Some(trail) = &self.trail {
                    let paint = PixmapPaint {
                        opacity: TRAIL_OPACITY,
                        ..PixmapPaint::default()
                    };
                    c.pixmap()
                        .draw_pixmap(0, 0, trail.as_ref(), &paint, Transform::identity(), None);
                }
            }

            let ctx = ModeContext {
                scheme,
                vector: input.vector,
                history: input.history,
                particles: input.particles,
                frame_counter: self.frame_counter,
            };
            draw_mode(&mut c, effects.mode, &ctx);

            if effects.glow {
                if let Some(progress) = input.beat.progress(input.now, self.beat_cooldown) {
                    draw_glow(&mut c, scheme.start, progress);
                }
            }
            if effects.show_song_info {
                draw_song_info(&mut c, input.song, scheme.start);
            }
            if effects.show_fps {
                let text = format!("FPS: {:.1}", self.fps());
                c.text(&text, 10.0, 8.0, 1.0, Color::WHITE);
            }
            if effects.show_time {
                let text = chrono::Local::now().format("%H:%M:%S").to_string();
                let x = c.width() - font::text_width(&text, 1.0) - 10.0;
                c.text(&text, x, 8.0, 1.0, Color::WHITE);
            }
        }

        self.trail = effects.motion_blur.then(|| pixmap.clone());

        if effects.mirror {
            mirror_horizontally(&mut pixmap);
        }

        self.frame_counter += 1;
        Frame::new(self.width, self.height, Some(pixmap))
    }

    fn record_frame_time(&mut self, now: Instant) {
        if let Some(last) = self.last_render.replace(now) {
            if self.frame_times.len() == FPS_WINDOW {
                self.frame_times.pop_front();
            }
            self.frame_times.push_back(now.saturating_duration_since(last));
        }
    }
}

/// Exactly one routine per mode.
fn draw_mode(c: &mut Canvas<'_>, mode: VisualizationMode, ctx: &ModeContext<'_>) {
    match mode {
        VisualizationMode::Bars => bars::draw_bars(c, ctx),
        VisualizationMode::Waves => waves::draw_waves(c, ctx),
        VisualizationMode::Circles => radial::draw_circles(c, ctx),
        VisualizationMode::Spectrum => spectrum::draw_waterfall(c, ctx),
        VisualizationMode::Particles => radial::draw_particles(c, ctx),
        VisualizationMode::Equalizer => bars::draw_equalizer(c, ctx),
        VisualizationMode::Waveform => waves::draw_waveform(c, ctx),
        VisualizationMode::Bars3d => bars::draw_3d_bars(c, ctx),
        VisualizationMode::Fireworks => radial::draw_fireworks(c, ctx),
        VisualizationMode::Oscilloscope => waves::draw_oscilloscope(c, ctx),
    }
}

/// Background colour for the current inversion state.
pub fn background_color(effects: &EffectState) -> Rgb {
    if effects.invert { BACKGROUND_INVERTED } else { BACKGROUND }
}

/// Paints the background and returns the advanced noise phase.
fn paint_background(c: &mut Canvas<'_>, effects: &EffectState, noise_offset: f32) -> f32 {
    let base = background_color(effects);
    c.clear(base.to_color());

    // Pattern ink sits slightly off the base, toward the middle grey.
    let ink = if effects.invert {
        base.darker(110)
    } else {
        Rgb::new(40, 40, 40)
    };
    let (w, h) = (c.width(), c.height());

    match effects.background {
        BackgroundPattern::Solid => noise_offset,
        BackgroundPattern::Grid => {
            for x in (0..w as usize).step_by(PATTERN_SPACING) {
                c.fill_rect(x as f32, 0.0, 1.0, h, ink.to_color());
            }
            for y in (0..h as usize).step_by(PATTERN_SPACING) {
                c.fill_rect(0.0, y as f32, w, 1.0, ink.to_color());
            }
            noise_offset
        }
        BackgroundPattern::Dots => {
            for x in (PATTERN_SPACING / 2..w as usize).step_by(PATTERN_SPACING) {
                for y in (PATTERN_SPACING / 2..h as usize).step_by(PATTERN_SPACING) {
                    c.fill_circle(x as f32, y as f32, 2.0, canvas::solid(ink.to_color()));
                }
            }
            noise_offset
        }
        BackgroundPattern::Noise => {
            let phase = noise_offset + 0.01;
            for x in (0..w as usize).step_by(NOISE_CELL) {
                for y in (0..h as usize).step_by(NOISE_CELL) {
                    let n = ((x as f32 * 0.05 + phase).sin() + (y as f32 * 0.05 + phase).cos())
                        * 0.5
                        + 0.5;
                    let shade = (n * 30.0) as u8;
                    let v = if effects.invert {
                        base.r.saturating_sub(shade)
                    } else {
                        base.r.saturating_add(shade)
                    };
                    let cell = NOISE_CELL as f32;
                    c.fill_rect(x as f32, y as f32, cell, cell, Rgb::new(v, v, v).to_color());
                }
            }
            phase
        }
    }
}

/// Radial pulse that shrinks to nothing as `progress` runs from 0 to 1.
fn draw_glow(c: &mut Canvas<'_>, color: Rgb, progress: f32) {
    let max_radius = c.width().min(c.height()) * 0.2;
    let radius = max_radius * (1.0 - progress.clamp(0.0, 1.0));
    if radius < 1.0 {
        return;
    }
    let center = (c.width() / 2.0, c.height() / 2.0);
    let shader = canvas::radial_gradient(
        center,
        radius,
        &[(0.0, color.with_alpha(150)), (1.0, color.with_alpha(0))],
    );
    if shader.is_some() {
        c.fill_circle(center.0, center.1, radius, canvas::shaded(shader, color.with_alpha(0)));
    }
}

fn draw_song_info(c: &mut Canvas<'_>, song: &SongInfo, color: Rgb) {
    if song.is_empty() {
        return;
    }
    let (w, h) = (c.width(), c.height());
    c.fill_rect(10.0, h - 70.0, w - 20.0, 60.0, Color::from_rgba8(0, 0, 0, 180));
    c.text(&song.title, 20.0, h - 62.0, 2.0, color.to_color());
    let byline = format!("{} - {}", song.artist, song.album);
    c.text(&byline, 20.0, h - 36.0, 1.0, color.to_color());
}

/// Copy the left half onto the right half, flipped, so the result is symmetric.
fn mirror_horizontally(pixmap: &mut Pixmap) {
    let w = pixmap.width() as usize;
    let pixels = pixmap.pixels_mut();
    for row in pixels.chunks_exact_mut(w.max(1)) {
        for x in 0..w / 2 {
            row[w - 1 - x] = row[x];
        }
    }
}
