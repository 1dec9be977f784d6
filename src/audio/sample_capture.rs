// src/audio/sample_capture.rs
//! Pass-through source that copies a mono mix of what is played into a ring buffer.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use ringbuf::{HeapRb, traits::*};
use rodio::Source;

/// About 370ms of mono audio at 44.1kHz.
pub const CAPTURE_CAPACITY: usize = 16384;

pub type SampleBuffer = Arc<Mutex<HeapRb<f32>>>;

pub fn new_sample_buffer() -> SampleBuffer {
    Arc::new(Mutex::new(HeapRb::new(CAPTURE_CAPACITY)))
}

/// Averages each interleaved frame down to one sample before storing it.
pub struct SampleCapture<S> {
    source: S,
    buffer: SampleBuffer,
    channels: u16,
    frame_sum: f32,
    frame_pos: u16,
}

impl<S> SampleCapture<S>
where
    S: Source<Item = f32>,
{
    pub fn new(source: S, buffer: SampleBuffer) -> Self {
        let channels = source.channels().max(1);
        Self {
            source,
            buffer,
            channels,
            frame_sum: 0.0,
            frame_pos: 0,
        }
    }
}

impl<S> Iterator for SampleCapture<S>
where
    S: Source<Item = f32>,
{
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        let sample = self.source.next()?;
        self.frame_sum += sample;
        self.frame_pos += 1;
        if self.frame_pos == self.channels {
            let mono = self.frame_sum / self.channels as f32;
            self.frame_sum = 0.0;
            self.frame_pos = 0;
            if let Ok(mut buf) = self.buffer.lock() {
                let _ = buf.push_overwrite(mono);
            }
        }
        Some(sample)
    }
}

impl<S> Source for SampleCapture<S>
where
    S: Source<Item = f32>,
{
    fn current_frame_len(&self) -> Option<usize> {
        self.source.current_frame_len()
    }

    fn channels(&self) -> u16 {
        self.source.channels()
    }

    fn sample_rate(&self) -> u32 {
        self.source.sample_rate()
    }

    fn total_duration(&self) -> Option<Duration> {
        self.source.total_duration()
    }
}
