// src/app/snapshot.rs
//! Headless rendering: tick a controller on a synthetic clock and keep the last frame.

use std::time::Instant;

use anyhow::{Result, bail};
use tracing::info;

use crate::config::{Settings, SnapshotArgs};
use crate::visualizer::{Frame, VisualizationController};

/// Render `ticks` frames of `width` x `height` using the simulated source.
pub fn render_snapshot(settings: &Settings, width: u32, height: u32, ticks: u32, playing: bool) -> Result<Frame> {
    if ticks == 0 {
        bail!("snapshot needs at least one tick");
    }
    let mut controller = VisualizationController::new(settings.controller_config(width, height));
    settings.apply_to(&mut controller);

    let start = Instant::now();
    let interval = controller.tick_interval();
    let mut frame = Frame::empty(width, height);
    for i in 0..ticks {
        frame = controller.tick_at(start + interval * i, playing);
    }
    info!(ticks, width, height, mode = %controller.effects().mode, "snapshot rendered");
    Ok(frame)
}

pub fn run_snapshot(settings: &Settings, args: &SnapshotArgs) -> Result<()> {
    let (width, height) = args.size;
    let frame = render_snapshot(settings, width, height, args.ticks, args.playing)?;
    if frame.is_empty() {
        bail!("surface {width}x{height} has no pixels");
    }
    frame.save_png(&args.output)?;
    println!("wrote {}", args.output.display());
    Ok(())
}
