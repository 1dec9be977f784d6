use std::time::{Duration, Instant};

use approx::assert_relative_eq;
use rand::SeedableRng;
use rand::rngs::StdRng;

use retrojukebox::visualizer::renderer::{BACKGROUND, oscilloscope_trace};
use retrojukebox::visualizer::{
    BeatDetector, BeatState, ControllerConfig, Effect, EffectState, FrameRenderer,
    MagnitudeVector, ParticleConfig, ParticleSystem, RenderInput, SCHEMES, SongInfo,
    SpectrumHistory, VisualizationController, VisualizationMode,
};

const TICK: Duration = Duration::from_millis(50);

fn seeded_controller(width: u32, height: u32) -> VisualizationController {
    VisualizationController::new(ControllerConfig {
        width,
        height,
        seed: Some(1234),
        ..ControllerConfig::default()
    })
}

#[test]
fn playing_for_a_hundred_ticks_keeps_magnitudes_in_range() {
    let mut ctl = seeded_controller(64, 48);
    ctl.start();
    let t0 = Instant::now();
    for i in 0..100u32 {
        let frame = ctl.pump(t0 + TICK * i, true);
        assert!(frame.is_some(), "tick {i} did not fire");
        let mags = ctl.magnitudes();
        assert_eq!(mags.len(), 32);
        let mean = mags.mean();
        assert!((0.0..=1.0).contains(&mean), "mean {mean} at tick {i}");
        assert!(mags.values().iter().all(|v| (0.0..=1.0).contains(v)));
    }
    assert_eq!(ctl.frames_emitted(), 100);
}

#[test]
fn idle_magnitudes_decay_monotonically_to_zero() {
    let mut ctl = seeded_controller(16, 16);
    let t0 = Instant::now();
    for i in 0..40u32 {
        ctl.tick_at(t0 + TICK * i, true);
    }
    let mut previous = ctl.magnitudes().mean();
    assert!(previous > 0.0);
    for i in 40..140u32 {
        ctl.tick_at(t0 + TICK * i, false);
        let mean = ctl.magnitudes().mean();
        assert!(mean <= previous);
        previous = mean;
    }
    assert!(previous < 1e-3);
    assert_eq!(ctl.magnitudes().len(), 32);
}

#[test]
fn zero_vector_bars_frame_is_pure_background() {
    let mut rng = StdRng::seed_from_u64(3);
    let particles = ParticleSystem::new(ParticleConfig::default(), &mut rng);
    let history = SpectrumHistory::default();
    let effects = EffectState::default();
    assert_eq!(effects.mode, VisualizationMode::Bars);

    let mut renderer = FrameRenderer::new(200, 120, Duration::from_millis(300));
    let frame = renderer.render(&RenderInput {
        vector: &MagnitudeVector::zeros(32),
        history: &history,
        beat: &BeatState::default(),
        particles: &particles,
        effects: &effects,
        song: &SongInfo::default(),
        now: Instant::now(),
    });

    let bg = [BACKGROUND.r, BACKGROUND.g, BACKGROUND.b, 255];
    for y in 0..120 {
        for x in 0..200 {
            assert_eq!(frame.pixel(x, y), Some(bg), "pixel ({x},{y})");
        }
    }
}

#[test]
fn oscilloscope_peak_matches_half_modulation() {
    let (width, height) = (320.0, 200.0);
    let center = height / 2.0;
    let trace = oscilloscope_trace(&[0.5; 32], width, height, 17);
    let peak = trace
        .iter()
        .map(|&(_, y)| (y - center).abs())
        .fold(0.0f32, f32::max);
    assert_relative_eq!(peak, 0.5 * 0.8 * center, max_relative = 0.01);
    assert!(trace.iter().all(|&(x, _)| (0.0..width).contains(&x)));
}

#[test]
fn beat_fires_on_jump_and_clears_after_cooldown() {
    let mut detector = BeatDetector::new();
    let t0 = Instant::now();
    let quiet = MagnitudeVector::from_values([0.1; 32]);
    let loud = MagnitudeVector::from_values([0.9; 32]);

    for i in 0..5u32 {
        assert!(!detector.update(&quiet, t0 + TICK * i).detected);
    }
    let hit = t0 + TICK * 5;
    let state = detector.update(&loud, hit);
    assert!(state.detected);
    assert_relative_eq!(state.intensity, 0.9, epsilon = 1e-6);

    // Sustained level is not a new trigger.
    assert!(detector.update(&loud, hit + Duration::from_millis(150)).detected);
    assert!(!detector.update(&loud, hit + Duration::from_millis(350)).detected);
}

#[test]
fn quiet_vectors_never_trigger() {
    let mut detector = BeatDetector::new();
    let t0 = Instant::now();
    let at_threshold = MagnitudeVector::from_values([0.6; 32]);
    let silence = MagnitudeVector::zeros(32);
    for i in 0..20u32 {
        let v = if i % 2 == 0 { &silence } else { &at_threshold };
        assert!(!detector.update(v, t0 + TICK * i).detected);
    }
}

#[test]
fn cycling_returns_to_start() {
    let mut ctl = seeded_controller(8, 8);
    let mode = ctl.effects().mode;
    let scheme = ctl.effects().color_scheme_name();
    for _ in 0..VisualizationMode::ALL.len() {
        ctl.cycle_visualization_mode();
    }
    for _ in 0..SCHEMES.len() {
        ctl.cycle_color_scheme();
    }
    assert_eq!(VisualizationMode::ALL.len(), 10);
    assert_eq!(ctl.effects().mode, mode);
    assert_eq!(ctl.effects().color_scheme_name(), scheme);
}

#[test]
fn double_invert_restores_rendered_colors() {
    let mut rng = StdRng::seed_from_u64(8);
    let particles = ParticleSystem::new(ParticleConfig::default(), &mut rng);
    let history = SpectrumHistory::default();
    let vector = MagnitudeVector::from_values((0..32).map(|i| i as f32 / 32.0));
    let now = Instant::now();

    let render = |effects: &EffectState| {
        let mut renderer = FrameRenderer::new(96, 64, Duration::from_millis(300));
        renderer.render(&RenderInput {
            vector: &vector,
            history: &history,
            beat: &BeatState::default(),
            particles: &particles,
            effects,
            song: &SongInfo::default(),
            now,
        })
    };

    let plain = EffectState::default();
    let mut toggled = EffectState::default();
    assert!(toggled.toggle(Effect::Invert));
    let inverted = render(&toggled);
    assert!(!toggled.toggle(Effect::Invert));

    let a = render(&plain).to_rgba_image();
    let b = render(&toggled).to_rgba_image();
    assert_eq!(a, b);
    assert_ne!(a, inverted.to_rgba_image());
}

#[test]
fn mirrored_controller_frames_are_symmetric_in_every_mode() {
    let mut ctl = seeded_controller(50, 30);
    ctl.toggle(Effect::Mirror);
    ctl.toggle(Effect::Glow);
    let t0 = Instant::now();
    for (i, _) in VisualizationMode::ALL.iter().enumerate() {
        let frame = ctl.tick_at(t0 + TICK * i as u32, true);
        for y in 0..30 {
            for x in 0..25 {
                assert_eq!(
                    frame.pixel(x, y),
                    frame.pixel(49 - x, y),
                    "{} at ({x},{y})",
                    ctl.effects().mode
                );
            }
        }
        ctl.cycle_visualization_mode();
    }
}

#[test]
fn ambient_population_is_stable_while_idle() {
    let mut ctl = seeded_controller(16, 16);
    let t0 = Instant::now();
    for i in 0..300u32 {
        ctl.tick_at(t0 + TICK * i, false);
        assert_eq!(ctl.particle_count(), 100);
        assert!(!ctl.beat().detected);
    }
}
