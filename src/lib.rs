// src/lib.rs
//! Retrojukebox - a terminal music player with a retro audio visualizer.
//!
//! The [`visualizer`] module is self-contained; everything else is the
//! terminal host that feeds it playback state and shows its frames.

pub mod app;
pub mod audio;
pub mod config;
pub mod fs;
pub mod logging;
pub mod ui;
pub mod visualizer;
