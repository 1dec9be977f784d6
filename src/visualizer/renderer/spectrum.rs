// src/visualizer/renderer/spectrum.rs

use super::ModeContext;
use crate::visualizer::canvas::Canvas;

/// Scrolling waterfall: newest row at the bottom, older rows above and fainter.
pub(super) fn draw_waterfall(c: &mut Canvas<'_>, ctx: &ModeContext<'_>) {
    let depth = ctx.history.depth();
    if depth == 0 {
        return;
    }
    let (w, h) = (c.width(), c.height());
    let row_h = h / depth as f32;

    for (age, row) in ctx.history.newest_first().into_iter().enumerate() {
        let n = row.len();
        if n == 0 {
            continue;
        }
        let cell_w = w / n as f32;
        let y = h - (age + 1) as f32 * row_h;
        let fade = 1.0 - age as f32 / depth as f32;
        let color = ctx.scheme.at(age as f32 / depth as f32);
        for (i, &v) in row.values().iter().enumerate() {
            let alpha = (v * fade * 255.0) as u8;
            if alpha == 0 {
                continue;
            }
            c.fill_rect(i as f32 * cell_w, y, cell_w, row_h, color.with_alpha(alpha));
        }
    }
}
