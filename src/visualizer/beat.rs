// src/visualizer/beat.rs
//! Double-threshold transient detector over the magnitude stream.

use std::time::{Duration, Instant};

use super::MagnitudeVector;

/// Mean level a vector must exceed to count as a beat.
pub const BEAT_THRESHOLD: f32 = 0.6;
/// Required jump over the previous vector's mean.
pub const BEAT_RATIO: f32 = 1.5;
pub const BEAT_COOLDOWN: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeatState {
    pub detected: bool,
    /// When the most recent trigger happened, if ever.
    pub timestamp: Option<Instant>,
    /// Mean level at the most recent trigger.
    pub intensity: f32,
}

impl Default for BeatState {
    fn default() -> Self {
        Self {
            detected: false,
            timestamp: None,
            intensity: 0.0,
        }
    }
}

impl BeatState {
    /// Fraction of the cooldown elapsed since the last trigger, in `[0, 1]`.
    /// Returns `None` when no beat is active.
    pub fn progress(&self, now: Instant, cooldown: Duration) -> Option<f32> {
        if !self.detected {
            return None;
        }
        let since = now.saturating_duration_since(self.timestamp?);
        if cooldown.is_zero() {
            return Some(1.0);
        }
        Some((since.as_secs_f32() / cooldown.as_secs_f32()).clamp(0.0, 1.0))
    }
}

pub struct BeatDetector {
    state: BeatState,
    previous_mean: Option<f32>,
    cooldown: Duration,
}

impl BeatDetector {
    pub fn new() -> Self {
        Self::with_cooldown(BEAT_COOLDOWN)
    }

    pub fn with_cooldown(cooldown: Duration) -> Self {
        Self {
            state: BeatState::default(),
            previous_mean: None,
            cooldown,
        }
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    pub fn state(&self) -> BeatState {
        self.state
    }

    pub fn update(&mut self, vector: &MagnitudeVector, now: Instant) -> BeatState {
        let avg = vector.mean();
        let previous = self.previous_mean.replace(avg).unwrap_or(0.0);

        if avg > BEAT_THRESHOLD && avg > BEAT_RATIO * previous {
            self.state = BeatState {
                detected: true,
                timestamp: Some(now),
                intensity: avg,
            };
        } else if self.state.detected {
            let expired = self
                .state
                .timestamp
                .is_none_or(|t| now.saturating_duration_since(t) > self.cooldown);
            if expired {
                self.state.detected = false;
            }
        }
        self.state
    }

    pub fn reset(&mut self) {
        self.state = BeatState::default();
        self.previous_mean = None;
    }
}

impl Default for BeatDetector {
    fn default() -> Self {
        Self::new()
    }
}
