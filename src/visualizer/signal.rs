// src/visualizer/signal.rs
//! Per-tick magnitude vectors: simulated when no audio tap exists, FFT-backed otherwise.

use std::sync::{Arc, Mutex};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ringbuf::HeapRb;
use tracing::debug;

use super::fft::BandAnalyzer;

/// Blend weight of the previous visible vector when smoothing.
const SMOOTHING: f32 = 0.7;
/// Per-tick fade applied while nothing is playing.
const IDLE_DECAY: f32 = 0.9;

/// Fixed-length band energies in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct MagnitudeVector {
    values: Vec<f32>,
}

impl MagnitudeVector {
    pub fn zeros(bands: usize) -> Self {
        Self {
            values: vec![0.0; bands],
        }
    }

    /// Build from raw values, clamping each into `[0, 1]`. NaN becomes 0.
    pub fn from_values(values: impl IntoIterator<Item = f32>) -> Self {
        Self {
            values: values.into_iter().map(clamp_unit).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Value at `idx`, or 0 when out of range.
    pub fn get(&self, idx: usize) -> f32 {
        self.values.get(idx).copied().unwrap_or(0.0)
    }

    /// Arithmetic mean; 0 for an empty vector.
    pub fn mean(&self) -> f32 {
        if self.values.is_empty() {
            0.0
        } else {
            self.values.iter().sum::<f32>() / self.values.len() as f32
        }
    }

    /// `self = keep * self + (1 - keep) * other`, band by band.
    fn blend_toward(&mut self, other: &[f32], keep: f32) {
        for (v, &o) in self.values.iter_mut().zip(other) {
            *v = clamp_unit(keep * *v + (1.0 - keep) * o);
        }
    }

    fn scale(&mut self, factor: f32) {
        for v in &mut self.values {
            *v = clamp_unit(*v * factor);
        }
    }
}

fn clamp_unit(v: f32) -> f32 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

/// Produces one magnitude vector per tick.
///
/// Implementations must keep the vector length fixed between calls to
/// [`SignalSource::set_bands`] and keep values in `[0, 1]`.
pub trait SignalSource {
    fn next_vector(&mut self, is_playing: bool) -> &MagnitudeVector;

    fn current(&self) -> &MagnitudeVector;

    fn bands(&self) -> usize {
        self.current().len()
    }

    /// Reallocate to `bands` values, zeroing all state. No-op if unchanged.
    fn set_bands(&mut self, bands: usize);
}

/// Coherent random spectra standing in for real analysis.
pub struct SimulatedSource {
    rng: StdRng,
    target: Vec<f32>,
    visible: MagnitudeVector,
}

impl SimulatedSource {
    pub fn new(bands: usize) -> Self {
        Self::with_rng(bands, StdRng::from_entropy())
    }

    pub fn seeded(bands: usize, seed: u64) -> Self {
        Self::with_rng(bands, StdRng::seed_from_u64(seed))
    }

    fn with_rng(bands: usize, rng: StdRng) -> Self {
        Self {
            rng,
            target: vec![0.0; bands],
            visible: MagnitudeVector::zeros(bands),
        }
    }
}

impl SignalSource for SimulatedSource {
    fn next_vector(&mut self, is_playing: bool) -> &MagnitudeVector {
        if is_playing {
            for t in &mut self.target {
                *t = 0.3 * self.rng.r#gen::<f32>() + 0.7 * *t;
            }
            self.visible.blend_toward(&self.target, SMOOTHING);
        } else {
            self.visible.scale(IDLE_DECAY);
        }
        &self.visible
    }

    fn current(&self) -> &MagnitudeVector {
        &self.visible
    }

    fn set_bands(&mut self, bands: usize) {
        if bands == self.visible.len() {
            return;
        }
        debug!(from = self.visible.len(), to = bands, "reallocating simulated bands");
        self.target = vec![0.0; bands];
        self.visible = MagnitudeVector::zeros(bands);
    }
}

/// Minimum buffered samples needed before an FFT is attempted.
const MIN_SAMPLES: usize = 512;
/// Largest analysis window taken from the capture buffer.
const MAX_SAMPLES: usize = 2048;

/// Spectral magnitudes from the samples the player copies into a shared ring buffer.
pub struct CaptureSource {
    buffer: Arc<Mutex<HeapRb<f32>>>,
    analyzer: BandAnalyzer,
    visible: MagnitudeVector,
}

impl CaptureSource {
    pub fn new(bands: usize, buffer: Arc<Mutex<HeapRb<f32>>>) -> Self {
        Self {
            buffer,
            analyzer: BandAnalyzer::new(bands),
            visible: MagnitudeVector::zeros(bands),
        }
    }

    /// Copy the newest samples without consuming them.
    fn recent_samples(&self) -> Option<Vec<f32>> {
        use ringbuf::traits::*;

        let buf = self.buffer.lock().ok()?;
        let available = buf.occupied_len();
        if available < MIN_SAMPLES {
            return None;
        }
        let count = available.min(MAX_SAMPLES);
        let skip = available - count;
        Some(buf.iter().skip(skip).copied().collect())
    }
}

impl SignalSource for CaptureSource {
    fn next_vector(&mut self, is_playing: bool) -> &MagnitudeVector {
        let samples = if is_playing { self.recent_samples() } else { None };
        match samples {
            Some(samples) => {
                let bands = self.analyzer.analyze(&samples);
                self.visible.blend_toward(&bands, SMOOTHING);
            }
            None => self.visible.scale(IDLE_DECAY),
        }
        &self.visible
    }

    fn current(&self) -> &MagnitudeVector {
        &self.visible
    }

    fn set_bands(&mut self, bands: usize) {
        if bands == self.visible.len() {
            return;
        }
        debug!(from = self.visible.len(), to = bands, "reallocating capture bands");
        self.analyzer = BandAnalyzer::new(bands);
        self.visible = MagnitudeVector::zeros(bands);
    }
}
