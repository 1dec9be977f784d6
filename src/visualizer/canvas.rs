// src/visualizer/canvas.rs
//! Thin drawing helpers over a tiny-skia pixmap. Degenerate shapes are skipped silently.

use tiny_skia::{
    Color, FillRule, GradientStop, LinearGradient, Paint, Path, PathBuilder, Pixmap, Point,
    RadialGradient, Rect, Shader, SpreadMode, Stroke, StrokeDash, Transform,
};

use super::font;

pub struct Canvas<'a> {
    pixmap: &'a mut Pixmap,
}

impl<'a> Canvas<'a> {
    pub fn new(pixmap: &'a mut Pixmap) -> Self {
        Self { pixmap }
    }

    pub fn width(&self) -> f32 {
        self.pixmap.width() as f32
    }

    pub fn height(&self) -> f32 {
        self.pixmap.height() as f32
    }

    pub fn pixmap(&mut self) -> &mut Pixmap {
        &mut *self.pixmap
    }

    pub fn clear(&mut self, color: Color) {
        self.pixmap.fill(color);
    }

    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        self.fill_rect_with(x, y, w, h, solid(color));
    }

    pub fn fill_rect_with(&mut self, x: f32, y: f32, w: f32, h: f32, paint: Paint<'_>) {
        if w <= 0.0 || h <= 0.0 {
            return;
        }
        if let Some(rect) = Rect::from_xywh(x, y, w, h) {
            self.pixmap
                .fill_rect(rect, &paint, Transform::identity(), None);
        }
    }

    pub fn fill_circle(&mut self, cx: f32, cy: f32, r: f32, paint: Paint<'_>) {
        if r <= 0.0 {
            return;
        }
        if let Some(path) = PathBuilder::from_circle(cx, cy, r) {
            self.fill_path(&path, &paint);
        }
    }

    pub fn stroke_circle(&mut self, cx: f32, cy: f32, r: f32, width: f32, color: Color) {
        if r <= 0.0 {
            return;
        }
        if let Some(path) = PathBuilder::from_circle(cx, cy, r) {
            self.stroke_path(&path, &solid(color), width, None);
        }
    }

    /// Closed polygon through `points`.
    pub fn fill_polygon(&mut self, points: &[(f32, f32)], paint: Paint<'_>) {
        if let Some(path) = polyline(points, true) {
            self.fill_path(&path, &paint);
        }
    }

    pub fn stroke_polyline(&mut self, points: &[(f32, f32)], width: f32, color: Color) {
        if let Some(path) = polyline(points, false) {
            self.stroke_path(&path, &solid(color), width, None);
        }
    }

    pub fn line(&mut self, from: (f32, f32), to: (f32, f32), width: f32, color: Color) {
        self.stroke_polyline(&[from, to], width, color);
    }

    pub fn dashed_line(
        &mut self,
        from: (f32, f32),
        to: (f32, f32),
        width: f32,
        color: Color,
        pattern: &[f32],
    ) {
        if let Some(path) = polyline(&[from, to], false) {
            let dash = StrokeDash::new(pattern.to_vec(), 0.0);
            self.stroke_path(&path, &solid(color), width, dash);
        }
    }

    pub fn fill_path(&mut self, path: &Path, paint: &Paint<'_>) {
        self.pixmap
            .fill_path(path, paint, FillRule::Winding, Transform::identity(), None);
    }

    fn stroke_path(&mut self, path: &Path, paint: &Paint<'_>, width: f32, dash: Option<StrokeDash>) {
        let stroke = Stroke {
            width,
            dash,
            ..Stroke::default()
        };
        self.pixmap
            .stroke_path(path, paint, &stroke, Transform::identity(), None);
    }

    pub fn text(&mut self, text: &str, x: f32, y: f32, scale: f32, color: Color) {
        font::draw_text(&mut *self.pixmap, text, x, y, scale, color);
    }
}

/// Anti-aliased paint with a solid colour.
pub fn solid(color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(color);
    paint.anti_alias = true;
    paint
}

/// Paint from a shader, falling back to `fallback` when the gradient is degenerate.
pub fn shaded(shader: Option<Shader<'static>>, fallback: Color) -> Paint<'static> {
    match shader {
        Some(shader) => Paint {
            shader,
            anti_alias: true,
            ..Paint::default()
        },
        None => solid(fallback),
    }
}

pub fn linear_gradient(from: (f32, f32), to: (f32, f32), stops: &[(f32, Color)]) -> Option<Shader<'static>> {
    LinearGradient::new(
        Point::from_xy(from.0, from.1),
        Point::from_xy(to.0, to.1),
        gradient_stops(stops),
        SpreadMode::Pad,
        Transform::identity(),
    )
}

pub fn radial_gradient(center: (f32, f32), radius: f32, stops: &[(f32, Color)]) -> Option<Shader<'static>> {
    if radius <= 0.0 {
        return None;
    }
    let c = Point::from_xy(center.0, center.1);
    RadialGradient::new(c, c, radius, gradient_stops(stops), SpreadMode::Pad, Transform::identity())
}

fn gradient_stops(stops: &[(f32, Color)]) -> Vec<GradientStop> {
    stops
        .iter()
        .map(|&(pos, color)| GradientStop::new(pos, color))
        .collect()
}

fn polyline(points: &[(f32, f32)], close: bool) -> Option<Path> {
    let (first, rest) = points.split_first()?;
    if rest.is_empty() {
        return None;
    }
    let mut pb = PathBuilder::new();
    pb.move_to(first.0, first.1);
    for &(x, y) in rest {
        pb.line_to(x, y);
    }
    if close {
        pb.close();
    }
    pb.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank(w: u32, h: u32) -> Pixmap {
        let mut pixmap = Pixmap::new(w, h).unwrap();
        pixmap.fill(Color::BLACK);
        pixmap
    }

    #[test]
    fn degenerate_shapes_draw_nothing() {
        let mut pixmap = blank(8, 8);
        let before = pixmap.clone();
        let mut canvas = Canvas::new(&mut pixmap);
        canvas.fill_rect(1.0, 1.0, 0.0, 5.0, Color::WHITE);
        canvas.fill_rect(1.0, 1.0, 5.0, -2.0, Color::WHITE);
        canvas.fill_circle(4.0, 4.0, 0.0, solid(Color::WHITE));
        canvas.fill_polygon(&[(1.0, 1.0)], solid(Color::WHITE));
        canvas.stroke_polyline(&[], 1.0, Color::WHITE);
        assert_eq!(pixmap.data(), before.data());
    }

    #[test]
    fn rect_fills_expected_pixels() {
        let mut pixmap = blank(8, 8);
        Canvas::new(&mut pixmap).fill_rect(2.0, 2.0, 3.0, 3.0, Color::WHITE);
        let lit = pixmap.pixel(3, 3).unwrap();
        let dark = pixmap.pixel(6, 6).unwrap();
        assert_eq!((lit.red(), lit.green()), (255, 255));
        assert_eq!(dark.red(), 0);
    }

    #[test]
    fn zero_radius_gradient_is_none() {
        assert!(radial_gradient((1.0, 1.0), 0.0, &[(0.0, Color::WHITE), (1.0, Color::BLACK)]).is_none());
    }
}
