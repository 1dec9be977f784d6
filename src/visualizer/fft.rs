// src/visualizer/fft.rs
//! Windowed FFT reduced to log-spaced bands with rolling auto-sensitivity.

use std::sync::Arc;

use rustfft::{Fft, FftPlanner, num_complex::Complex};

/// Width of the dB window mapped onto `[0, 1]`.
const DB_WINDOW: f32 = 60.0;
/// Floor for the tracked maximum so silence does not get amplified.
const DB_CEILING_FLOOR: f32 = -30.0;
const SILENCE_DB: f32 = -80.0;

pub struct BandAnalyzer {
    planner: FftPlanner<f32>,
    plan: Option<(usize, Arc<dyn Fft<f32>>)>,
    bands: usize,
    max_db: f32,
}

impl BandAnalyzer {
    pub fn new(bands: usize) -> Self {
        Self {
            planner: FftPlanner::new(),
            plan: None,
            bands,
            max_db: -10.0,
        }
    }

    /// Band magnitudes in `[0, 1]` for the given time-domain samples.
    pub fn analyze(&mut self, samples: &[f32]) -> Vec<f32> {
        if samples.is_empty() || self.bands == 0 {
            return vec![0.0; self.bands];
        }
        let size = samples.len().next_power_of_two().min(2048);
        let spectrum = self.spectrum_db(samples, size);
        self.normalize(self.group(&spectrum))
    }

    fn fft_for(&mut self, size: usize) -> Arc<dyn Fft<f32>> {
        match &self.plan {
            Some((planned, fft)) if *planned == size => fft.clone(),
            _ => {
                let fft = self.planner.plan_fft_forward(size);
                self.plan = Some((size, fft.clone()));
                fft
            }
        }
    }

    /// dBFS per bin for the lower half of a Hann-windowed FFT.
    fn spectrum_db(&mut self, samples: &[f32], size: usize) -> Vec<f32> {
        let mut buffer: Vec<Complex<f32>> = samples
            .iter()
            .take(size)
            .enumerate()
            .map(|(i, &s)| {
                let phase = 2.0 * std::f32::consts::PI * i as f32 / size as f32;
                Complex::new(s * 0.5 * (1.0 - phase.cos()), 0.0)
            })
            .collect();
        buffer.resize(size, Complex::new(0.0, 0.0));

        self.fft_for(size).process(&mut buffer);

        let scale = 1.0 / size as f32;
        buffer
            .iter()
            .take(size / 2)
            .map(|c| 20.0 * (c.norm() * scale).max(1e-10).log10())
            .collect()
    }

    /// Average bins into bands spaced on a `x^2.5` curve.
    fn group(&self, bins: &[f32]) -> Vec<f32> {
        let n = bins.len() as f32;
        (0..self.bands)
            .map(|i| {
                let lo = ((i as f32 / self.bands as f32).powf(2.5) * n) as usize;
                let hi = (((i + 1) as f32 / self.bands as f32).powf(2.5) * n).min(n) as usize;
                if lo < hi && hi <= bins.len() {
                    bins[lo..hi].iter().sum::<f32>() / (hi - lo) as f32
                } else {
                    SILENCE_DB
                }
            })
            .collect()
    }

    fn normalize(&mut self, bands_db: Vec<f32>) -> Vec<f32> {
        let frame_max = bands_db.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        self.max_db = 0.9 * self.max_db + 0.1 * frame_max.max(DB_CEILING_FLOOR);
        let min_db = self.max_db - DB_WINDOW;

        bands_db
            .into_iter()
            .map(|db| ((db - min_db) / DB_WINDOW).clamp(0.0, 1.0).powf(1.2))
            .collect()
    }
}
