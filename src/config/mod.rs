// src/config/mod.rs
//! User settings persisted as TOML, plus command-line overrides.

mod cli;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::visualizer::{
    ControllerConfig, DEFAULT_BANDS, DEFAULT_HISTORY_DEPTH, EffectState, ParticleConfig,
    VisualizationController,
};

pub use cli::{Cli, Command, SnapshotArgs, parse_size};

const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("no configuration directory available for this user")]
    NoConfigDir,
}

/// Where magnitudes come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    #[default]
    Simulated,
    /// FFT over the samples the player is currently outputting.
    Capture,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualizerSettings {
    pub bands: usize,
    pub history_depth: usize,
    pub tick_interval_ms: u64,
    pub mode: String,
    pub color_scheme: String,
    pub background: String,
    /// Effects switched on at startup, by name.
    pub effects: Vec<String>,
    pub seed: Option<u64>,
    pub source: SourceKind,
}

impl Default for VisualizerSettings {
    fn default() -> Self {
        Self {
            bands: DEFAULT_BANDS,
            history_depth: DEFAULT_HISTORY_DEPTH,
            tick_interval_ms: 50,
            mode: "bars".into(),
            color_scheme: "default".into(),
            background: "solid".into(),
            effects: Vec::new(),
            seed: None,
            source: SourceKind::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    pub enabled: bool,
    /// Default filter directive; `RUST_LOG` wins when set.
    pub level: String,
    pub directory: Option<PathBuf>,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            level: "info".into(),
            directory: None,
        }
    }
}

impl LogSettings {
    pub fn parse_level(&self) -> tracing::Level {
        self.level.parse().unwrap_or(tracing::Level::INFO)
    }

    /// Configured directory, else the per-user data dir, else the system temp dir.
    pub fn log_directory(&self) -> PathBuf {
        if let Some(dir) = &self.directory {
            return dir.clone();
        }
        project_dirs()
            .map(|dirs| dirs.data_local_dir().join("logs"))
            .unwrap_or_else(|| std::env::temp_dir().join("retrojukebox"))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub visualizer: VisualizerSettings,
    pub particles: ParticleConfig,
    pub logging: LogSettings,
}

impl Settings {
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        project_dirs()
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let text = toml::to_string_pretty(self)?;
        fs::write(path, text).map_err(io_err)
    }

    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::default_path()?)
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::default_path()?)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.visualizer.tick_interval_ms.max(1))
    }

    pub fn controller_config(&self, width: u32, height: u32) -> ControllerConfig {
        ControllerConfig {
            width,
            height,
            bands: self.visualizer.bands,
            history_depth: self.visualizer.history_depth,
            tick_interval: self.tick_interval(),
            seed: self.visualizer.seed,
            particles: self.particles.clone(),
        }
    }

    /// Push the stored selections into a controller. Unknown names are ignored.
    pub fn apply_to(&self, controller: &mut VisualizationController) {
        let v = &self.visualizer;
        controller.set_visualization_mode(&v.mode);
        controller.set_color_scheme(&v.color_scheme);
        controller.set_background_pattern(&v.background);
        for name in &v.effects {
            if controller.toggle_effect(name) == Some(false) {
                // Listed twice; switch it back on.
                controller.toggle_effect(name);
            }
        }
    }

    /// Record the selections worth keeping across runs.
    pub fn remember(&mut self, effects: &EffectState) {
        self.visualizer.mode = effects.mode.name().to_string();
        self.visualizer.color_scheme = effects.color_scheme_name().to_string();
        self.visualizer.background = effects.background.name().to_string();
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "retrojukebox")
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;
    use crate::visualizer::{BackgroundPattern, Effect, VisualizationMode};

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let settings = Settings::load_from(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.visualizer.bands, 32);
        assert_eq!(settings.particles.ambient_count, 100);
    }

    #[test]
    fn save_then_load_preserves_settings() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE);
        let mut settings = Settings::default();
        settings.visualizer.mode = "fireworks".into();
        settings.visualizer.seed = Some(99);
        settings.visualizer.source = SourceKind::Capture;
        settings.particles.burst_probability = 0.25;
        settings.save_to(&path).unwrap();

        assert_eq!(Settings::load_from(&path).unwrap(), settings);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[visualizer]\nbands = 16\n\n[particles]\nmax_bursts = 5\n").unwrap();
        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.visualizer.bands, 16);
        assert_eq!(settings.visualizer.tick_interval_ms, 50);
        assert_eq!(settings.particles.max_bursts, 5);
        assert_eq!(settings.particles.particles_per_burst, 20);
        assert!(settings.logging.enabled);
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[visualizer\nbands = ").unwrap();
        assert!(matches!(
            Settings::load_from(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn apply_and_remember_round_trip_selections() {
        let mut settings = Settings::default();
        settings.visualizer.mode = "Oscilloscope".into();
        settings.visualizer.color_scheme = "neon".into();
        settings.visualizer.background = "grid".into();
        settings.visualizer.effects = vec!["glow".into(), "bogus".into(), "motion-blur".into()];

        let mut ctl = VisualizationController::new(settings.controller_config(32, 16));
        settings.apply_to(&mut ctl);
        let effects = ctl.effects();
        assert_eq!(effects.mode, VisualizationMode::Oscilloscope);
        assert_eq!(effects.color_scheme_name(), "neon");
        assert_eq!(effects.background, BackgroundPattern::Grid);
        assert!(effects.is_enabled(Effect::Glow));
        assert!(effects.is_enabled(Effect::MotionBlur));
        assert!(!effects.is_enabled(Effect::Mirror));

        let mut saved = Settings::default();
        saved.remember(effects);
        assert_eq!(saved.visualizer.mode, "oscilloscope");
        assert_eq!(saved.visualizer.color_scheme, "neon");
        assert_eq!(saved.visualizer.background, "grid");
    }

    #[test]
    fn log_level_falls_back_to_info() {
        let mut logging = LogSettings::default();
        logging.level = "loud".into();
        assert_eq!(logging.parse_level(), tracing::Level::INFO);
        logging.level = "debug".into();
        assert_eq!(logging.parse_level(), tracing::Level::DEBUG);
    }
}
