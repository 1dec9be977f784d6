// src/config/cli.rs

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use super::Settings;

#[derive(Debug, Parser)]
#[command(name = "retrojukebox")]
#[command(about = "Terminal music player with a retro audio visualizer")]
#[command(version)]
pub struct Cli {
    /// Settings file to use instead of the per-user default.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Visualization mode, e.g. bars, oscilloscope, 3d-bars.
    #[arg(long)]
    pub mode: Option<String>,

    /// Colour scheme name.
    #[arg(long)]
    pub scheme: Option<String>,

    /// Background pattern: solid, grid, dots or noise.
    #[arg(long)]
    pub background: Option<String>,

    /// Number of frequency bands.
    #[arg(long)]
    pub bands: Option<usize>,

    /// Seed for the simulated spectrum and particles.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Directory to start browsing in.
    pub directory: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Render frames without a terminal and write the last one as PNG.
    Snapshot(SnapshotArgs),
}

#[derive(Debug, Args)]
pub struct SnapshotArgs {
    pub output: PathBuf,

    #[arg(long, default_value = "60")]
    pub ticks: u32,

    /// Surface size as WIDTHxHEIGHT.
    #[arg(long, default_value = "640x360", value_parser = parse_size)]
    pub size: (u32, u32),

    /// Treat audio as playing so the spectrum rises instead of decaying.
    #[arg(long)]
    pub playing: bool,
}

impl Cli {
    /// Command-line values win over the settings file.
    pub fn apply_overrides(&self, settings: &mut Settings) {
        let v = &mut settings.visualizer;
        if let Some(mode) = &self.mode {
            v.mode = mode.clone();
        }
        if let Some(scheme) = &self.scheme {
            v.color_scheme = scheme.clone();
        }
        if let Some(background) = &self.background {
            v.background = background.clone();
        }
        if let Some(bands) = self.bands {
            v.bands = bands;
        }
        if self.seed.is_some() {
            v.seed = self.seed;
        }
    }
}

pub fn parse_size(s: &str) -> Result<(u32, u32), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {s:?}"))?;
    let w = w.trim().parse().map_err(|e| format!("bad width {w:?}: {e}"))?;
    let h = h.trim().parse().map_err(|e| format!("bad height {h:?}: {e}"))?;
    Ok((w, h))
}
