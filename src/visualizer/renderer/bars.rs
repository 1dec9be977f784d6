// src/visualizer/renderer/bars.rs
//! Bar-shaped modes: plain bars, the grouped equalizer and fake-3D bars.

use tiny_skia::Color;

use super::ModeContext;
use crate::visualizer::canvas::{self, Canvas};
use crate::visualizer::font;

/// Share of the surface height above the bar baseline; the rest holds the reflection.
const BARS_BASELINE: f32 = 0.85;
const EQ_GROUPS: usize = 16;
const EQ_LABEL_SPACE: f32 = 12.0;
const BARS_3D_MAX: usize = 16;

pub(super) fn draw_bars(c: &mut Canvas<'_>, ctx: &ModeContext<'_>) {
    let n = ctx.vector.len();
    if n == 0 {
        return;
    }
    let (w, h) = (c.width(), c.height());
    let baseline = h * BARS_BASELINE;
    let bar_w = w / (n * 2) as f32;
    let (start, end) = (ctx.scheme.start, ctx.scheme.end);

    let body = canvas::shaded(
        canvas::linear_gradient(
            (0.0, 0.0),
            (0.0, baseline),
            &[(0.0, start.to_color()), (1.0, end.to_color())],
        ),
        start.to_color(),
    );
    let reflection = canvas::shaded(
        canvas::linear_gradient(
            (0.0, baseline),
            (0.0, h),
            &[(0.0, end.with_alpha(120)), (1.0, end.with_alpha(0))],
        ),
        end.with_alpha(60),
    );

    for (i, &v) in ctx.vector.values().iter().enumerate() {
        let bar_h = v * baseline * 0.9;
        let x = i as f32 * bar_w * 2.0 + bar_w / 2.0;
        c.fill_rect_with(x, baseline - bar_h, bar_w, bar_h, body.clone());
        let reflected = (bar_h * 0.2).min(h - baseline);
        c.fill_rect_with(x, baseline, bar_w, reflected, reflection.clone());
    }
}

/// Mean of each of `groups` contiguous slices of `values`.
/// Fewer values than groups yields one group per value.
pub fn group_bands(values: &[f32], groups: usize) -> Vec<f32> {
    let n = values.len();
    let groups = groups.min(n);
    (0..groups)
        .map(|g| {
            let slice = &values[g * n / groups..(g + 1) * n / groups];
            slice.iter().sum::<f32>() / slice.len() as f32
        })
        .collect()
}

/// Nominal centre frequency of equalizer group `index`, log-spaced over 20 Hz to 20 kHz.
pub fn frequency_label(index: usize, groups: usize) -> String {
    let groups = groups.max(1) as f32;
    let hz = 20.0 * 1000f32.powf((index as f32 + 0.5) / groups);
    if hz < 1000.0 {
        format!("{}", hz.round() as u32)
    } else {
        format!("{:.1}K", hz / 1000.0)
    }
}

pub(super) fn draw_equalizer(c: &mut Canvas<'_>, ctx: &ModeContext<'_>) {
    let groups = group_bands(ctx.vector.values(), EQ_GROUPS);
    if groups.is_empty() {
        return;
    }
    let (w, h) = (c.width(), c.height());
    let slot = w / groups.len() as f32;
    let bar_w = slot * 0.8;
    let floor = h - EQ_LABEL_SPACE;
    let (start, end) = (ctx.scheme.start, ctx.scheme.end);
    let fill = canvas::shaded(
        canvas::linear_gradient(
            (0.0, floor),
            (0.0, 0.0),
            &[(0.0, start.to_color()), (1.0, end.to_color())],
        ),
        start.to_color(),
    );

    for (i, &level) in groups.iter().enumerate() {
        let x = i as f32 * slot + (slot - bar_w) / 2.0;
        let bar_h = level * (floor - 4.0).max(0.0);
        c.fill_rect_with(x, floor - bar_h, bar_w, bar_h, fill.clone());

        let label = frequency_label(i, groups.len());
        let label_w = font::text_width(&label, 1.0);
        if label_w <= slot {
            let lx = i as f32 * slot + (slot - label_w) / 2.0;
            c.text(&label, lx, h - 9.0, 1.0, Color::from_rgba8(200, 200, 200, 255));
        }
    }
}

pub(super) fn draw_3d_bars(c: &mut Canvas<'_>, ctx: &ModeContext<'_>) {
    let values = ctx.vector.values();
    let count = values.len().min(BARS_3D_MAX);
    if count == 0 {
        return;
    }
    let (w, h) = (c.width(), c.height());
    let bar_w = w / (count as f32 * 1.5 + 0.5);
    let depth = bar_w * 0.3;
    let span = (count as f32 * 1.5 - 0.5) * bar_w + depth;
    let x0 = (w - span) / 2.0;
    let baseline = h - 2.0;

    for (i, &v) in values.iter().take(count).enumerate() {
        let bar_h = v * (h - depth) * 0.7;
        if bar_h <= 0.0 {
            continue;
        }
        let color = ctx.scheme.at(i as f32 / count as f32);
        let x = x0 + i as f32 * bar_w * 1.5;
        let y = baseline - bar_h;

        c.fill_rect(x, y, bar_w, bar_h, color.to_color());
        c.fill_polygon(
            &[
                (x, y),
                (x + depth, y - depth),
                (x + bar_w + depth, y - depth),
                (x + bar_w, y),
            ],
            canvas::solid(color.lighter(130).to_color()),
        );
        c.fill_polygon(
            &[
                (x + bar_w, y),
                (x + bar_w + depth, y - depth),
                (x + bar_w + depth, baseline - depth),
                (x + bar_w, baseline),
            ],
            canvas::solid(color.darker(150).to_color()),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_average_contiguous_slices() {
        let values: Vec<f32> = (0..32).map(|i| i as f32).collect();
        let groups = group_bands(&values, 16);
        assert_eq!(groups.len(), 16);
        assert_eq!(groups[0], 0.5);
        assert_eq!(groups[15], 30.5);
    }

    #[test]
    fn few_bands_get_one_group_each() {
        assert_eq!(group_bands(&[0.1, 0.2, 0.3], 16), vec![0.1, 0.2, 0.3]);
        assert!(group_bands(&[], 16).is_empty());
    }

    #[test]
    fn labels_rise_across_the_range() {
        assert_eq!(frequency_label(0, 16), "25");
        assert!(frequency_label(15, 16).ends_with('K'));
    }
}
