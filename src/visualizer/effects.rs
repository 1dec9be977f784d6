// src/visualizer/effects.rs
//! Mode, colour scheme, background and effect toggles read by the renderer.

use std::fmt;
use std::str::FromStr;

use tracing::warn;

use super::SelectorError;
use super::palette::{self, ColorScheme, SCHEMES};

/// The ten visualization modes, in cycling order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VisualizationMode {
    #[default]
    Bars,
    Waves,
    Circles,
    Spectrum,
    Particles,
    Equalizer,
    Waveform,
    Bars3d,
    Fireworks,
    Oscilloscope,
}

impl VisualizationMode {
    pub const ALL: [VisualizationMode; 10] = [
        Self::Bars,
        Self::Waves,
        Self::Circles,
        Self::Spectrum,
        Self::Particles,
        Self::Equalizer,
        Self::Waveform,
        Self::Bars3d,
        Self::Fireworks,
        Self::Oscilloscope,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Bars => "bars",
            Self::Waves => "waves",
            Self::Circles => "circles",
            Self::Spectrum => "spectrum",
            Self::Particles => "particles",
            Self::Equalizer => "equalizer",
            Self::Waveform => "waveform",
            Self::Bars3d => "3d-bars",
            Self::Fireworks => "fireworks",
            Self::Oscilloscope => "oscilloscope",
        }
    }

    /// The mode after this one, wrapping at the end.
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|m| *m == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for VisualizationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for VisualizationMode {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Menu labels such as "3D Bars" map onto "3d-bars".
        let key = s.trim().to_ascii_lowercase().replace(' ', "-");
        Self::ALL
            .into_iter()
            .find(|m| m.name() == key)
            .ok_or_else(|| SelectorError::unknown("visualization mode", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BackgroundPattern {
    #[default]
    Solid,
    Grid,
    Dots,
    Noise,
}

impl BackgroundPattern {
    pub const ALL: [BackgroundPattern; 4] = [Self::Solid, Self::Grid, Self::Dots, Self::Noise];

    pub fn name(self) -> &'static str {
        match self {
            Self::Solid => "solid",
            Self::Grid => "grid",
            Self::Dots => "dots",
            Self::Noise => "noise",
        }
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|p| *p == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for BackgroundPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BackgroundPattern {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|p| p.name() == key)
            .ok_or_else(|| SelectorError::unknown("background pattern", s))
    }
}

/// Toggleable rendering modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Effect {
    Glow,
    Mirror,
    Invert,
    SongInfo,
    Fps,
    Time,
    MotionBlur,
}

impl Effect {
    pub const ALL: [Effect; 7] = [
        Self::Glow,
        Self::Mirror,
        Self::Invert,
        Self::SongInfo,
        Self::Fps,
        Self::Time,
        Self::MotionBlur,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Glow => "glow",
            Self::Mirror => "mirror",
            Self::Invert => "invert",
            Self::SongInfo => "song_info",
            Self::Fps => "fps",
            Self::Time => "time",
            Self::MotionBlur => "motion_blur",
        }
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Effect {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        Self::ALL
            .into_iter()
            .find(|e| e.name() == key)
            .ok_or_else(|| SelectorError::unknown("effect", s))
    }
}

/// Everything the renderer needs to know about *how* to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectState {
    pub mode: VisualizationMode,
    scheme_index: usize,
    pub background: BackgroundPattern,
    pub glow: bool,
    pub mirror: bool,
    pub invert: bool,
    pub show_song_info: bool,
    pub show_fps: bool,
    pub show_time: bool,
    pub motion_blur: bool,
}

impl Default for EffectState {
    fn default() -> Self {
        Self {
            mode: VisualizationMode::default(),
            scheme_index: 0,
            background: BackgroundPattern::default(),
            glow: false,
            mirror: false,
            invert: false,
            show_song_info: false,
            show_fps: false,
            show_time: false,
            motion_blur: false,
        }
    }
}

impl EffectState {
    pub fn set_mode(&mut self, mode: VisualizationMode) {
        self.mode = mode;
    }

    /// Switch by name; unknown names leave the state untouched.
    pub fn set_mode_by_name(&mut self, name: &str) -> bool {
        match name.parse() {
            Ok(mode) => {
                self.mode = mode;
                true
            }
            Err(err) => {
                warn!(%err, "ignoring visualization mode");
                false
            }
        }
    }

    pub fn cycle_mode(&mut self) -> VisualizationMode {
        self.mode = self.mode.next();
        self.mode
    }

    pub fn set_color_scheme(&mut self, name: &str) -> bool {
        match palette::scheme_index(name) {
            Ok(idx) => {
                self.scheme_index = idx;
                true
            }
            Err(err) => {
                warn!(%err, "ignoring color scheme");
                false
            }
        }
    }

    pub fn cycle_color_scheme(&mut self) -> &'static str {
        self.scheme_index = (self.scheme_index + 1) % SCHEMES.len();
        SCHEMES[self.scheme_index].name
    }

    pub fn color_scheme_name(&self) -> &'static str {
        SCHEMES[self.scheme_index].name
    }

    /// The active scheme with inversion already applied.
    pub fn resolved_scheme(&self) -> ColorScheme {
        let scheme = SCHEMES[self.scheme_index];
        if self.invert { scheme.inverted() } else { scheme }
    }

    pub fn set_background(&mut self, pattern: BackgroundPattern) {
        self.background = pattern;
    }

    pub fn set_background_by_name(&mut self, name: &str) -> bool {
        match name.parse() {
            Ok(pattern) => {
                self.background = pattern;
                true
            }
            Err(err) => {
                warn!(%err, "ignoring background pattern");
                false
            }
        }
    }

    pub fn cycle_background(&mut self) -> BackgroundPattern {
        self.background = self.background.next();
        self.background
    }

    pub fn toggle(&mut self, effect: Effect) -> bool {
        let flag = self.flag_mut(effect);
        *flag = !*flag;
        *flag
    }

    /// Flip the named effect. Returns the new value, or `None` for unknown names.
    pub fn toggle_by_name(&mut self, name: &str) -> Option<bool> {
        match name.parse() {
            Ok(effect) => Some(self.toggle(effect)),
            Err(err) => {
                warn!(%err, "ignoring effect toggle");
                None
            }
        }
    }

    pub fn is_enabled(&self, effect: Effect) -> bool {
        match effect {
            Effect::Glow => self.glow,
            Effect::Mirror => self.mirror,
            Effect::Invert => self.invert,
            Effect::SongInfo => self.show_song_info,
            Effect::Fps => self.show_fps,
            Effect::Time => self.show_time,
            Effect::MotionBlur => self.motion_blur,
        }
    }

    fn flag_mut(&mut self, effect: Effect) -> &mut bool {
        match effect {
            Effect::Glow => &mut self.glow,
            Effect::Mirror => &mut self.mirror,
            Effect::Invert => &mut self.invert,
            Effect::SongInfo => &mut self.show_song_info,
            Effect::Fps => &mut self.show_fps,
            Effect::Time => &mut self.show_time,
            Effect::MotionBlur => &mut self.motion_blur,
        }
    }
}
