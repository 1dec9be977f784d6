// src/visualizer/controller.rs
//! Owns every piece of pipeline state and advances it one tick at a time.

use std::sync::mpsc::{self, Receiver, Sender};
use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info};

use super::{
    BackgroundPattern, BeatDetector, BeatState, DEFAULT_BANDS, DEFAULT_HISTORY_DEPTH, Effect,
    EffectState, Frame, FrameRenderer, MagnitudeVector, ParticleConfig, ParticleSystem,
    RenderInput, SignalSource, SimulatedSource, SongInfo, SpectrumHistory, VisualizationMode,
};

pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    Stopped,
    Running,
}

/// Construction parameters for [`VisualizationController`].
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    pub width: u32,
    pub height: u32,
    pub bands: usize,
    pub history_depth: usize,
    pub tick_interval: Duration,
    /// Fixed seed for the simulated source and particle motion.
    pub seed: Option<u64>,
    pub particles: ParticleConfig,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 360,
            bands: DEFAULT_BANDS,
            history_depth: DEFAULT_HISTORY_DEPTH,
            tick_interval: DEFAULT_TICK_INTERVAL,
            seed: None,
            particles: ParticleConfig::default(),
        }
    }
}

pub struct VisualizationController {
    state: ControllerState,
    tick_interval: Duration,
    next_tick: Option<Instant>,
    source: Box<dyn SignalSource + Send>,
    beat: BeatDetector,
    beat_state: BeatState,
    effects: EffectState,
    particles: ParticleSystem,
    history: SpectrumHistory,
    renderer: FrameRenderer,
    song: SongInfo,
    rng: StdRng,
    subscribers: Vec<Sender<Frame>>,
    last_frame: Option<Frame>,
    frames_emitted: u64,
}

impl VisualizationController {
    /// Controller driven by a [`SimulatedSource`].
    pub fn new(config: ControllerConfig) -> Self {
        let source: Box<dyn SignalSource + Send> = match config.seed {
            Some(seed) => Box::new(SimulatedSource::seeded(config.bands, seed)),
            None => Box::new(SimulatedSource::new(config.bands)),
        };
        Self::with_source(config, source)
    }

    pub fn with_source(config: ControllerConfig, mut source: Box<dyn SignalSource + Send>) -> Self {
        source.set_bands(config.bands);
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(1)),
            None => StdRng::from_entropy(),
        };
        let beat = BeatDetector::new();
        let renderer = FrameRenderer::new(config.width, config.height, beat.cooldown());
        Self {
            state: ControllerState::Stopped,
            tick_interval: config.tick_interval,
            next_tick: None,
            source,
            beat,
            beat_state: BeatState::default(),
            effects: EffectState::default(),
            particles: ParticleSystem::new(config.particles, &mut rng),
            history: SpectrumHistory::new(config.history_depth),
            renderer,
            song: SongInfo::default(),
            rng,
            subscribers: Vec::new(),
            last_frame: None,
            frames_emitted: 0,
        }
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == ControllerState::Running
    }

    /// Begin ticking. The first [`pump`](Self::pump) after this fires immediately.
    pub fn start(&mut self) {
        if self.is_running() {
            return;
        }
        self.state = ControllerState::Running;
        self.next_tick = None;
        info!(interval_ms = self.tick_interval.as_millis() as u64, "visualizer started");
    }

    /// Halt ticking. The last frame stays available through [`last_frame`](Self::last_frame).
    pub fn stop(&mut self) {
        if !self.is_running() {
            return;
        }
        self.state = ControllerState::Stopped;
        self.next_tick = None;
        info!(frames = self.frames_emitted, "visualizer stopped");
    }

    /// Register for frame-ready events. Dropped receivers are pruned on the next emit.
    pub fn subscribe(&mut self) -> Receiver<Frame> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    /// Run a tick if one is due. Missed firings are skipped, never queued.
    pub fn pump(&mut self, now: Instant, is_playing: bool) -> Option<Frame> {
        if !self.is_running() {
            return None;
        }
        let due = self.next_tick.unwrap_or(now);
        if now < due {
            return None;
        }
        let mut next = due + self.tick_interval;
        if next <= now {
            next = now + self.tick_interval;
        }
        self.next_tick = Some(next);
        Some(self.tick_at(now, is_playing))
    }

    /// Time left until the next scheduled tick; `None` while stopped.
    pub fn time_until_next_tick(&self, now: Instant) -> Option<Duration> {
        if !self.is_running() {
            return None;
        }
        Some(
            self.next_tick
                .map_or(Duration::ZERO, |t| t.saturating_duration_since(now)),
        )
    }

    /// Advance the whole pipeline once and emit the resulting frame.
    pub fn tick_at(&mut self, now: Instant, is_playing: bool) -> Frame {
        let vector = self.source.next_vector(is_playing).clone();
        self.beat_state = self.beat.update(&vector, now);
        self.particles.advance(&vector, &self.beat_state, &mut self.rng);
        self.history.push(vector.clone());

        let frame = self.renderer.render(&RenderInput {
            vector: &vector,
            history: &self.history,
            beat: &self.beat_state,
            particles: &self.particles,
            effects: &self.effects,
            song: &self.song,
            now,
        });

        self.subscribers.retain(|tx| tx.send(frame.clone()).is_ok());
        self.frames_emitted += 1;
        self.last_frame = Some(frame.clone());
        frame
    }

    pub fn set_size(&mut self, width: u32, height: u32) {
        if self.renderer.size() != (width, height) {
            debug!(width, height, "visualizer surface resized");
            self.renderer.set_size(width, height);
        }
    }

    pub fn size(&self) -> (u32, u32) {
        self.renderer.size()
    }

    /// Change the band count, zeroing all band-dependent state.
    pub fn set_bands(&mut self, bands: usize) {
        if bands == self.source.bands() {
            return;
        }
        self.source.set_bands(bands);
        self.history.clear();
        self.beat.reset();
        self.beat_state = BeatState::default();
    }

    pub fn set_mode(&mut self, mode: VisualizationMode) {
        self.effects.set_mode(mode);
    }

    /// Unknown names are ignored; returns whether the mode changed.
    pub fn set_visualization_mode(&mut self, name: &str) -> bool {
        self.effects.set_mode_by_name(name)
    }

    pub fn set_color_scheme(&mut self, name: &str) -> bool {
        self.effects.set_color_scheme(name)
    }

    pub fn set_background_pattern(&mut self, name: &str) -> bool {
        self.effects.set_background_by_name(name)
    }

    /// Flip an effect by name, returning its new state, or `None` for unknown names.
    pub fn toggle_effect(&mut self, name: &str) -> Option<bool> {
        self.effects.toggle_by_name(name)
    }

    pub fn toggle(&mut self, effect: Effect) -> bool {
        self.effects.toggle(effect)
    }

    pub fn cycle_visualization_mode(&mut self) -> VisualizationMode {
        self.effects.cycle_mode()
    }

    pub fn cycle_color_scheme(&mut self) -> &'static str {
        self.effects.cycle_color_scheme()
    }

    pub fn cycle_background_pattern(&mut self) -> BackgroundPattern {
        self.effects.cycle_background()
    }

    pub fn set_song_info(&mut self, song: SongInfo) {
        self.song = song;
    }

    pub fn song_info(&self) -> &SongInfo {
        &self.song
    }

    pub fn effects(&self) -> &EffectState {
        &self.effects
    }

    pub fn beat(&self) -> BeatState {
        self.beat_state
    }

    pub fn magnitudes(&self) -> &MagnitudeVector {
        self.source.current()
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    pub fn history(&self) -> &SpectrumHistory {
        &self.history
    }

    pub fn frames_emitted(&self) -> u64 {
        self.frames_emitted
    }

    pub fn last_frame(&self) -> Option<&Frame> {
        self.last_frame.as_ref()
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visualizer::renderer::BACKGROUND;

    /// Every band pinned at full scale.
    struct FullScale(MagnitudeVector);

    impl SignalSource for FullScale {
        fn next_vector(&mut self, _is_playing: bool) -> &MagnitudeVector {
            &self.0
        }

        fn current(&self) -> &MagnitudeVector {
            &self.0
        }

        fn set_bands(&mut self, bands: usize) {
            self.0 = MagnitudeVector::from_values(vec![1.0; bands]);
        }
    }

    fn seeded(width: u32, height: u32) -> VisualizationController {
        VisualizationController::new(ControllerConfig {
            width,
            height,
            seed: Some(7),
            ..ControllerConfig::default()
        })
    }

    #[test]
    fn start_and_stop_are_idempotent() {
        let mut ctl = seeded(40, 30);
        assert_eq!(ctl.state(), ControllerState::Stopped);
        ctl.stop();
        ctl.start();
        ctl.start();
        assert_eq!(ctl.state(), ControllerState::Running);
        ctl.stop();
        ctl.stop();
        assert_eq!(ctl.state(), ControllerState::Stopped);
    }

    #[test]
    fn pump_only_ticks_while_running_and_on_schedule() {
        let mut ctl = seeded(40, 30);
        let t0 = Instant::now();
        assert!(ctl.pump(t0, true).is_none());

        ctl.start();
        assert!(ctl.pump(t0, true).is_some());
        assert!(ctl.pump(t0 + Duration::from_millis(10), true).is_none());
        assert!(ctl.pump(t0 + Duration::from_millis(50), true).is_some());
        assert_eq!(ctl.frames_emitted(), 2);
        assert_eq!(
            ctl.time_until_next_tick(t0 + Duration::from_millis(60)),
            Some(Duration::from_millis(40))
        );
    }

    #[test]
    fn late_pump_skips_missed_firings() {
        let mut ctl = seeded(20, 20);
        let t0 = Instant::now();
        ctl.start();
        ctl.pump(t0, true);
        // Far past several intervals: one tick, then back on a fresh schedule.
        let late = t0 + Duration::from_millis(500);
        assert!(ctl.pump(late, true).is_some());
        assert!(ctl.pump(late + Duration::from_millis(1), true).is_none());
        assert_eq!(ctl.frames_emitted(), 2);
    }

    #[test]
    fn subscribers_receive_each_frame() {
        let mut ctl = seeded(16, 8);
        let rx = ctl.subscribe();
        let dropped = ctl.subscribe();
        drop(dropped);
        let now = Instant::now();
        for i in 0..3 {
            ctl.tick_at(now + Duration::from_millis(50 * i), true);
        }
        let frames: Vec<Frame> = rx.try_iter().collect();
        assert_eq!(frames.len(), 3);
        assert_eq!((frames[0].width(), frames[0].height()), (16, 8));
    }

    #[test]
    fn stop_keeps_last_frame() {
        let mut ctl = seeded(16, 8);
        ctl.start();
        ctl.pump(Instant::now(), true);
        ctl.stop();
        assert!(ctl.last_frame().is_some());
        assert!(ctl.pump(Instant::now(), true).is_none());
    }

    #[test]
    fn invalid_selectors_leave_state_unchanged() {
        let mut ctl = seeded(16, 8);
        let before = ctl.effects().clone();
        assert!(!ctl.set_visualization_mode("lasers"));
        assert!(!ctl.set_color_scheme("plaid"));
        assert!(!ctl.set_background_pattern("stripes"));
        assert_eq!(ctl.toggle_effect("sparkle"), None);
        assert_eq!(ctl.effects(), &before);

        assert!(ctl.set_visualization_mode("oscilloscope"));
        assert_eq!(ctl.effects().mode, VisualizationMode::Oscilloscope);
    }

    #[test]
    fn resize_applies_on_next_tick() {
        let mut ctl = seeded(16, 8);
        ctl.set_size(0, 0);
        assert!(ctl.tick_at(Instant::now(), true).is_empty());
        ctl.set_size(32, 24);
        let frame = ctl.tick_at(Instant::now(), true);
        assert_eq!((frame.width(), frame.height()), (32, 24));
    }

    #[test]
    fn band_length_survives_mode_switches() {
        let mut ctl = seeded(24, 24);
        let now = Instant::now();
        for i in 0..30u32 {
            ctl.cycle_visualization_mode();
            ctl.cycle_color_scheme();
            ctl.tick_at(now + Duration::from_millis(50) * i, i % 3 != 0);
            assert_eq!(ctl.magnitudes().len(), DEFAULT_BANDS);
        }
        ctl.set_bands(16);
        ctl.tick_at(now + Duration::from_secs(2), true);
        assert_eq!(ctl.magnitudes().len(), 16);
        assert_eq!(ctl.history().len(), 1);
    }

    #[test]
    fn waterfall_shows_current_tick_at_bottom() {
        let config = ControllerConfig {
            width: 64,
            height: 40,
            seed: Some(3),
            ..ControllerConfig::default()
        };
        let mut ctl = VisualizationController::with_source(
            config,
            Box::new(FullScale(MagnitudeVector::zeros(0))),
        );
        assert!(ctl.set_visualization_mode("spectrum"));

        let frame = ctl.tick_at(Instant::now(), true);
        let bg = [BACKGROUND.r, BACKGROUND.g, BACKGROUND.b, 255];
        assert_ne!(frame.pixel(10, 39), Some(bg));
        // Only one row of history so far; the top of the surface is untouched.
        assert_eq!(frame.pixel(10, 0), Some(bg));
        assert_eq!(ctl.history().len(), 1);
    }
}
