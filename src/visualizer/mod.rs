// src/visualizer/mod.rs
//! The visualization engine: a magnitude source, beat and particle state,
//! and a renderer that composes one frame per controller tick.

mod beat;
mod canvas;
mod controller;
mod effects;
mod error;
mod fft;
mod font;
mod frame;
mod history;
mod palette;
mod particles;
pub mod renderer;
mod signal;

pub use beat::{BEAT_COOLDOWN, BEAT_RATIO, BEAT_THRESHOLD, BeatDetector, BeatState};
pub use controller::{
    ControllerConfig, ControllerState, DEFAULT_TICK_INTERVAL, VisualizationController,
};
pub use effects::{BackgroundPattern, Effect, EffectState, VisualizationMode};
pub use error::SelectorError;
pub use frame::Frame;
pub use history::{DEFAULT_HISTORY_DEPTH, SpectrumHistory};
pub use palette::{ColorScheme, Rgb, SCHEMES, scheme_names};
pub use particles::{Particle, ParticleConfig, ParticleSystem};
pub use renderer::{FrameRenderer, RenderInput};
pub use signal::{CaptureSource, MagnitudeVector, SignalSource, SimulatedSource};

/// Default number of frequency bands.
pub const DEFAULT_BANDS: usize = 32;

/// Track text shown by the song info overlay.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SongInfo {
    pub title: String,
    pub artist: String,
    pub album: String,
}

impl SongInfo {
    pub fn new(title: impl Into<String>, artist: impl Into<String>, album: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
            album: album.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.artist.is_empty() && self.album.is_empty()
    }
}
