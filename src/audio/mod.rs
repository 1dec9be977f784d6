// src/audio/mod.rs
//! Playback, sample capture for the visualizer, and track metadata.

pub mod metadata;
pub mod player;
pub mod sample_capture;

pub use metadata::{TagEntry, TrackMetadata, load_metadata};
pub use player::MusicPlayer;
pub use sample_capture::{SampleBuffer, SampleCapture, new_sample_buffer};
