// src/visualizer/particles.rs
//! Ambient drifting particles plus finite-life bursts spawned on beat edges.

use std::f32::consts::TAU;

use rand::Rng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tracing::trace;

use super::{BeatState, MagnitudeVector};

/// Life at or below this is treated as expired; absorbs f32 drift from repeated subtraction.
const LIFE_EPSILON: f32 = 1e-4;
/// Ambient particles re-aimed on each beat edge.
const REAIM_ON_BEAT: usize = 20;
/// Smallest accepted life step, so every burst expires within 1000 ticks.
const MIN_LIFE_STEP: f32 = 0.001;
const MAX_BURSTS: usize = 10;
const MAX_PARTICLES_PER_BURST: usize = 200;
const MAX_AMBIENT: usize = 10_000;

/// Tuning for the particle pool and firework bursts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    pub ambient_count: usize,
    /// Chance that a beat edge produces any bursts at all.
    pub burst_probability: f64,
    pub max_bursts: usize,
    pub particles_per_burst: usize,
    /// Life removed from every burst particle per tick.
    pub life_step: f32,
    /// Multiplicative speed decay per tick for burst particles.
    pub burst_drag: f32,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            ambient_count: 100,
            burst_probability: 0.8,
            max_bursts: 3,
            particles_per_burst: 20,
            life_step: 0.01,
            burst_drag: 0.98,
        }
    }
}

/// A point in normalized `[0, 1] x [0, 1]` space.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub speed: f32,
    /// Heading in radians.
    pub angle: f32,
    /// Position along the colour scheme gradient.
    pub color_mix: f32,
    /// `None` for ambient particles, remaining life in `(0, 1]` for bursts.
    pub life: Option<f32>,
}

impl ParticleConfig {
    /// Clamp hand-edited values into a range the pool can run with.
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        let burst_probability = if self.burst_probability.is_finite() {
            self.burst_probability.clamp(0.0, 1.0)
        } else {
            defaults.burst_probability
        };
        let life_step = if self.life_step.is_finite() {
            self.life_step.clamp(MIN_LIFE_STEP, 1.0)
        } else {
            defaults.life_step
        };
        let burst_drag = if self.burst_drag.is_finite() {
            self.burst_drag.clamp(0.0, 1.0)
        } else {
            defaults.burst_drag
        };
        Self {
            ambient_count: self.ambient_count.min(MAX_AMBIENT),
            burst_probability,
            max_bursts: self.max_bursts.min(MAX_BURSTS),
            particles_per_burst: self.particles_per_burst.min(MAX_PARTICLES_PER_BURST),
            life_step,
            burst_drag,
        }
    }
}

impl Particle {
    pub fn is_burst(&self) -> bool {
        self.life.is_some()
    }
}

pub struct ParticleSystem {
    config: ParticleConfig,
    ambient: Vec<Particle>,
    bursts: Vec<Particle>,
    beat_active: bool,
}

impl ParticleSystem {
    pub fn new(config: ParticleConfig, rng: &mut StdRng) -> Self {
        let config = config.sanitized();
        let ambient = (0..config.ambient_count)
            .map(|_| random_ambient(rng))
            .collect();
        Self {
            config,
            ambient,
            bursts: Vec::new(),
            beat_active: false,
        }
    }

    pub fn config(&self) -> &ParticleConfig {
        &self.config
    }

    pub fn ambient(&self) -> &[Particle] {
        &self.ambient
    }

    pub fn bursts(&self) -> &[Particle] {
        &self.bursts
    }

    pub fn len(&self) -> usize {
        self.ambient.len() + self.bursts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All live particles, ambient first.
    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.ambient.iter().chain(self.bursts.iter())
    }

    /// Grow or shrink the ambient pool.
    pub fn resize_ambient(&mut self, count: usize, rng: &mut StdRng) {
        let count = count.min(MAX_AMBIENT);
        self.config.ambient_count = count;
        if count < self.ambient.len() {
            self.ambient.truncate(count);
        } else {
            let missing = count - self.ambient.len();
            self.ambient.extend((0..missing).map(|_| random_ambient(rng)));
        }
    }

    /// Advance one tick.
    pub fn advance(&mut self, vector: &MagnitudeVector, beat: &BeatState, rng: &mut StdRng) {
        let level = vector.mean();
        let boost = 1.0 + 5.0 * level;

        for p in &mut self.ambient {
            p.x = wrap_unit(p.x + p.angle.cos() * p.speed * boost);
            p.y = wrap_unit(p.y + p.angle.sin() * p.speed * boost);
        }

        let step = self.config.life_step;
        let drag = self.config.burst_drag;
        self.bursts.retain_mut(|p| {
            let life = p.life.unwrap_or(0.0) - step;
            p.life = Some(life);
            if life <= LIFE_EPSILON {
                return false;
            }
            p.x += p.angle.cos() * p.speed;
            p.y += p.angle.sin() * p.speed;
            p.speed *= drag;
            // Bursts do not wrap; off the surface they are gone.
            (0.0..=1.0).contains(&p.x) && (0.0..=1.0).contains(&p.y)
        });

        let edge = beat.detected && !self.beat_active;
        self.beat_active = beat.detected;
        if edge {
            self.on_beat_edge(rng);
        }
    }

    fn on_beat_edge(&mut self, rng: &mut StdRng) {
        if !self.ambient.is_empty() {
            for _ in 0..REAIM_ON_BEAT {
                let idx = rng.gen_range(0..self.ambient.len());
                self.ambient[idx].angle = rng.gen_range(0.0..TAU);
            }
        }

        if self.config.max_bursts == 0 || !rng.gen_bool(self.config.burst_probability) {
            return;
        }
        let groups = rng.gen_range(1..=self.config.max_bursts);
        for _ in 0..groups {
            let cx = rng.gen_range(0.2..0.8);
            let cy = rng.gen_range(0.2..0.8);
            let color_mix = rng.r#gen::<f32>();
            for _ in 0..self.config.particles_per_burst {
                self.bursts.push(Particle {
                    x: cx,
                    y: cy,
                    size: rng.gen_range(2.0..6.0),
                    speed: rng.gen_range(0.005..0.015),
                    angle: rng.gen_range(0.0..TAU),
                    color_mix,
                    life: Some(1.0),
                });
            }
        }
        trace!(groups, total = self.bursts.len(), "spawned burst particles");
    }
}

fn random_ambient(rng: &mut StdRng) -> Particle {
    Particle {
        x: rng.r#gen(),
        y: rng.r#gen(),
        size: rng.gen_range(2.0..8.0),
        speed: rng.gen_range(0.001..0.005),
        angle: rng.gen_range(0.0..TAU),
        color_mix: rng.r#gen(),
        life: None,
    }
}

/// Leaving one edge re-enters at the opposite one.
fn wrap_unit(v: f32) -> f32 {
    if v < 0.0 {
        1.0
    } else if v > 1.0 {
        0.0
    } else {
        v
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use rand::SeedableRng;

    use super::*;

    fn quiet() -> MagnitudeVector {
        MagnitudeVector::from_values([0.2; 32])
    }

    fn beat(detected: bool) -> BeatState {
        BeatState {
            detected,
            timestamp: Some(Instant::now()),
            intensity: 0.9,
        }
    }

    fn always_burst() -> ParticleConfig {
        ParticleConfig {
            burst_probability: 1.0,
            ..ParticleConfig::default()
        }
    }

    #[test]
    fn ambient_count_constant_without_beats() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut system = ParticleSystem::new(ParticleConfig::default(), &mut rng);
        for _ in 0..500 {
            system.advance(&quiet(), &BeatState::default(), &mut rng);
            assert_eq!(system.len(), 100);
        }
        assert!(system.ambient().iter().all(|p| (0.0..=1.0).contains(&p.x)));
        assert!(system.ambient().iter().all(|p| (0.0..=1.0).contains(&p.y)));
    }

    #[test]
    fn bursts_spawn_on_edge_only() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut system = ParticleSystem::new(always_burst(), &mut rng);
        system.advance(&quiet(), &beat(true), &mut rng);
        let after_edge = system.len();
        assert!(after_edge > 100);
        assert_eq!((after_edge - 100) % 20, 0);
        assert!(after_edge <= 100 + 3 * 20);

        // Holding the beat does not spawn more.
        for _ in 0..10 {
            system.advance(&quiet(), &beat(true), &mut rng);
            assert_eq!(system.len(), after_edge);
        }
    }

    #[test]
    fn bursts_expire_within_hundred_ticks() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut system = ParticleSystem::new(always_burst(), &mut rng);
        system.advance(&quiet(), &beat(true), &mut rng);
        assert!(!system.bursts().is_empty());

        for _ in 0..100 {
            system.advance(&quiet(), &BeatState::default(), &mut rng);
        }
        assert!(system.bursts().is_empty());
        assert_eq!(system.len(), 100);
    }

    #[test]
    fn burst_speed_decays() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut system = ParticleSystem::new(always_burst(), &mut rng);
        system.advance(&quiet(), &beat(true), &mut rng);
        let before: Vec<f32> = system.bursts().iter().map(|p| p.speed).collect();
        system.advance(&quiet(), &beat(true), &mut rng);
        for (p, s) in system.bursts().iter().zip(before) {
            assert!((p.speed - s * 0.98).abs() < 1e-7);
            assert!(p.life.is_some_and(|l| l < 1.0));
        }
    }

    #[test]
    fn zero_probability_never_bursts() {
        let mut rng = StdRng::seed_from_u64(4);
        let config = ParticleConfig {
            burst_probability: 0.0,
            ..ParticleConfig::default()
        };
        let mut system = ParticleSystem::new(config, &mut rng);
        for i in 0..50 {
            system.advance(&quiet(), &beat(i % 2 == 0), &mut rng);
        }
        assert_eq!(system.len(), 100);
    }

    #[test]
    fn resize_changes_pool() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut system = ParticleSystem::new(ParticleConfig::default(), &mut rng);
        system.resize_ambient(40, &mut rng);
        assert_eq!(system.ambient().len(), 40);
        system.resize_ambient(150, &mut rng);
        assert_eq!(system.ambient().len(), 150);
        assert!(system.iter().all(|p| !p.is_burst()));
    }

    #[test]
    fn zero_life_step_still_expires_bursts() {
        let mut rng = StdRng::seed_from_u64(21);
        let config = ParticleConfig {
            life_step: 0.0,
            ..always_burst()
        };
        let mut system = ParticleSystem::new(config, &mut rng);
        assert_eq!(system.config().life_step, MIN_LIFE_STEP);

        // Beat edge every other tick for a long stretch.
        let mut peak = 0;
        for i in 0..4000 {
            system.advance(&quiet(), &beat(i % 2 == 0 && i < 2000), &mut rng);
            peak = peak.max(system.len());
        }
        assert!(peak <= 100 + 1000 * 3 * 20);
        assert_eq!(system.len(), 100);
    }

    #[test]
    fn nan_probability_falls_back_to_default() {
        let mut rng = StdRng::seed_from_u64(22);
        let config = ParticleConfig {
            burst_probability: f64::NAN,
            life_step: f32::NAN,
            burst_drag: f32::INFINITY,
            max_bursts: 1_000,
            particles_per_burst: 1_000_000,
            ..ParticleConfig::default()
        };
        let mut system = ParticleSystem::new(config, &mut rng);
        let cfg = system.config().clone();
        assert_eq!(cfg.burst_probability, 0.8);
        assert_eq!(cfg.life_step, 0.01);
        assert_eq!(cfg.burst_drag, 0.98);
        assert_eq!(cfg.max_bursts, MAX_BURSTS);
        assert_eq!(cfg.particles_per_burst, MAX_PARTICLES_PER_BURST);

        for i in 0..20 {
            system.advance(&quiet(), &beat(i % 2 == 0), &mut rng);
        }
        assert!(system.len() <= 100 + 10 * MAX_BURSTS * MAX_PARTICLES_PER_BURST);
    }

    #[test]
    fn bursts_stay_on_the_surface() {
        let mut rng = StdRng::seed_from_u64(23);
        let config = ParticleConfig {
            burst_drag: 1.0,
            ..always_burst()
        };
        let mut system = ParticleSystem::new(config, &mut rng);
        system.advance(&quiet(), &beat(true), &mut rng);
        for _ in 0..99 {
            system.advance(&quiet(), &BeatState::default(), &mut rng);
            assert!(system.bursts().iter().all(|p| {
                (0.0..=1.0).contains(&p.x) && (0.0..=1.0).contains(&p.y)
            }));
        }
    }
}
