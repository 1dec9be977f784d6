// src/visualizer/renderer/waves.rs
//! Line-based modes: filled waves, the split waveform and the oscilloscope.

use tiny_skia::Color;

use super::ModeContext;
use crate::visualizer::canvas::{self, Canvas};

const WAVE_POINTS: usize = 100;
const SCOPE_POINTS: usize = 200;
const SCOPE_GAIN: f32 = 0.8;
const SCOPE_TRIGGER: f32 = 0.3;

/// Sampled sine outline for waves mode, left edge to right edge.
pub fn wave_points(values: &[f32], width: f32, height: f32) -> Vec<(f32, f32)> {
    let n = values.len();
    if n == 0 {
        return Vec::new();
    }
    (0..WAVE_POINTS)
        .map(|i| {
            let x = i as f32 * width / (WAVE_POINTS - 1) as f32;
            let v = values[i * n / WAVE_POINTS];
            let y = height / 2.0 + (i as f32 * 0.2).sin() * v * height / 2.0;
            (x, y)
        })
        .collect()
}

pub(super) fn draw_waves(c: &mut Canvas<'_>, ctx: &ModeContext<'_>) {
    let (w, h) = (c.width(), c.height());
    let mut outline = wave_points(ctx.vector.values(), w, h);
    if outline.is_empty() {
        return;
    }
    let (start, end) = (ctx.scheme.start, ctx.scheme.end);

    let mut area = outline.clone();
    area.push((w, h));
    area.push((0.0, h));
    let fill = canvas::shaded(
        canvas::linear_gradient(
            (0.0, 0.0),
            (w, 0.0),
            &[(0.0, start.to_color()), (1.0, end.to_color())],
        ),
        start.to_color(),
    );
    c.fill_polygon(&area, fill);

    outline.dedup();
    c.stroke_polyline(&outline, 2.0, start.to_color());
}

pub(super) fn draw_waveform(c: &mut Canvas<'_>, ctx: &ModeContext<'_>) {
    let values = ctx.vector.values();
    let n = values.len();
    if n == 0 {
        return;
    }
    let (w, h) = (c.width(), c.height());
    let cy = h / 2.0;
    let spacing = w / n.saturating_sub(1).max(1) as f32;
    let (start, end) = (ctx.scheme.start, ctx.scheme.end);

    for (sign, color) in [(-1.0, start), (1.0, end)] {
        let mut shape = Vec::with_capacity(n + 2);
        shape.push((0.0, cy));
        shape.extend(
            values
                .iter()
                .enumerate()
                .map(|(i, &v)| (i as f32 * spacing, cy + sign * v * cy * 0.8)),
        );
        shape.push((w, cy));
        let fill = canvas::shaded(
            canvas::linear_gradient(
                (0.0, cy),
                (0.0, cy + sign * cy),
                &[(0.0, color.with_alpha(150)), (1.0, color.with_alpha(50))],
            ),
            color.with_alpha(100),
        );
        c.fill_polygon(&shape, fill);
    }

    c.line((0.0, cy), (w, cy), 1.0, Color::from_rgba8(255, 255, 255, 100));
}

/// Trace points for the oscilloscope, phase-shifted by `frame`.
/// Amplitude is `value * centre * 0.8` around the vertical centre.
pub fn oscilloscope_trace(values: &[f32], width: f32, height: f32, frame: u64) -> Vec<(f32, f32)> {
    let n = values.len();
    if n == 0 {
        return Vec::new();
    }
    let cy = height / 2.0;
    let phase = frame as f32 * 0.05;
    (0..SCOPE_POINTS)
        .map(|i| {
            let a = values[i * n / SCOPE_POINTS];
            let b = values[((i + 1) * n / SCOPE_POINTS) % n];
            let v = (a + b) / 2.0;
            let x = i as f32 * width / SCOPE_POINTS as f32;
            let y = cy + (i as f32 * 0.1 + phase).sin() * v * cy * SCOPE_GAIN;
            (x, y)
        })
        .collect()
}

pub(super) fn draw_oscilloscope(c: &mut Canvas<'_>, ctx: &ModeContext<'_>) {
    let (w, h) = (c.width(), c.height());
    let cy = h / 2.0;
    let grid = Color::from_rgba8(100, 100, 100, 100);
    let label = Color::from_rgba8(150, 150, 150, 255);

    for i in 0..5 {
        let y = i as f32 * h / 4.0;
        c.line((0.0, y), (w, y), 1.0, grid);
    }
    for i in 0..11 {
        let x = i as f32 * w / 10.0;
        c.line((x, 0.0), (x, h), 1.0, grid);
    }
    for (i, text) in ["+100%", "+50%", "0", "-50%", "-100%"].iter().enumerate() {
        let y = (i as f32 * h / 4.0 + 2.0).min(h - 9.0);
        c.text(text, 4.0, y, 1.0, label);
    }
    c.text("5 MS/DIV", w - 58.0, h - 10.0, 1.0, label);

    let trigger_y = cy + cy * SCOPE_TRIGGER;
    let trigger = Color::from_rgba8(255, 165, 0, 255);
    c.dashed_line((0.0, trigger_y), (w, trigger_y), 1.0, trigger, &[4.0, 4.0]);
    c.text("TRIG", w - 30.0, trigger_y - 9.0, 1.0, trigger);

    let trace = oscilloscope_trace(ctx.vector.values(), w, h, ctx.frame_counter);
    if trace.is_empty() {
        return;
    }
    let mut path = Vec::with_capacity(trace.len() + 1);
    path.push((0.0, cy));
    path.extend(trace);
    c.stroke_polyline(&path, 2.0, ctx.scheme.start.to_color());
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn trace_peak_tracks_magnitude() {
        let trace = oscilloscope_trace(&[0.5; 32], 400.0, 300.0, 0);
        assert_eq!(trace.len(), 200);
        let peak = trace
            .iter()
            .map(|&(_, y)| (y - 150.0).abs())
            .fold(0.0f32, f32::max);
        assert_relative_eq!(peak, 0.5 * 0.8 * 150.0, max_relative = 0.01);
    }

    #[test]
    fn trace_is_flat_for_silence() {
        let trace = oscilloscope_trace(&[0.0; 16], 100.0, 80.0, 7);
        assert!(trace.iter().all(|&(_, y)| y == 40.0));
    }

    #[test]
    fn trace_phase_moves_with_frames() {
        let a = oscilloscope_trace(&[0.5; 8], 100.0, 100.0, 0);
        let b = oscilloscope_trace(&[0.5; 8], 100.0, 100.0, 10);
        assert_ne!(a, b);
    }

    #[test]
    fn waves_span_the_width() {
        let points = wave_points(&[1.0; 32], 200.0, 100.0);
        assert_eq!(points.len(), 100);
        assert_eq!(points[0], (0.0, 50.0));
        assert_relative_eq!(points[99].0, 200.0);
        assert!(points.iter().all(|&(_, y)| (0.0..=100.0).contains(&y)));
        assert!(wave_points(&[], 200.0, 100.0).is_empty());
    }
}
