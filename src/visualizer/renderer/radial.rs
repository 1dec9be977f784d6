// src/visualizer/renderer/radial.rs
//! Centre-out modes: circles, particles and fireworks.

use std::f32::consts::TAU;

use super::ModeContext;
use crate::visualizer::canvas::{self, Canvas};

const FIREWORK_RINGS: usize = 5;

pub(super) fn draw_circles(c: &mut Canvas<'_>, ctx: &ModeContext<'_>) {
    let values = ctx.vector.values();
    if values.is_empty() {
        return;
    }
    let (w, h) = (c.width(), c.height());
    let m = w.min(h);
    let (cx, cy) = (w / 2.0, h / 2.0);
    let (start, end) = (ctx.scheme.start, ctx.scheme.end);

    let main = ctx.vector.mean() * m / 3.0 + m / 10.0;
    let fill = canvas::shaded(
        canvas::radial_gradient(
            (cx, cy),
            main,
            &[(0.0, start.to_color()), (1.0, end.to_color())],
        ),
        start.to_color(),
    );
    c.fill_circle(cx, cy, main, fill);

    let n = values.len();
    let ring = main * 1.2;
    for (i, &v) in values.iter().enumerate() {
        let angle = i as f32 / n as f32 * TAU;
        let x = cx + angle.cos() * ring;
        let y = cy + angle.sin() * ring;
        let r = v * m / 20.0 + 2.0;
        let color = ctx.scheme.at(i as f32 / n as f32);
        c.fill_circle(x, y, r, canvas::solid(color.to_color()));
        c.stroke_circle(x, y, r, 1.0, color.lighter(120).to_color());
    }
}

pub(super) fn draw_particles(c: &mut Canvas<'_>, ctx: &ModeContext<'_>) {
    let (w, h) = (c.width(), c.height());
    let level = ctx.vector.mean();
    for p in ctx.particles.iter() {
        let color = ctx.scheme.at(p.color_mix);
        let (alpha, size) = match p.life {
            Some(life) => ((life * 255.0) as u8, p.size * life),
            None => (255, p.size * (1.0 + level)),
        };
        c.fill_circle(p.x * w, p.y * h, size / 2.0, canvas::solid(color.with_alpha(alpha)));
    }
}

pub(super) fn draw_fireworks(c: &mut Canvas<'_>, ctx: &ModeContext<'_>) {
    let (w, h) = (c.width(), c.height());
    let (cx, cy) = (w / 2.0, h / 2.0);
    let base = ctx.vector.mean() * w.min(h) / 4.0;

    for i in 0..FIREWORK_RINGS {
        let r = base * (1.0 + i as f32 * 0.4);
        let color = ctx.scheme.at(i as f32 / FIREWORK_RINGS as f32);
        c.stroke_circle(cx, cy, r, 2.0, color.with_alpha(255 - 40 * i as u8));
    }

    for p in ctx.particles.bursts() {
        let life = p.life.unwrap_or(0.0);
        let color = ctx.scheme.at(p.color_mix);
        c.fill_circle(
            p.x * w,
            p.y * h,
            p.size * life,
            canvas::solid(color.with_alpha((life * 255.0) as u8)),
        );
    }
}
