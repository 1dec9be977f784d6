// src/visualizer/palette.rs
//! Colours and the fixed table of named two-colour gradients.

use tiny_skia::Color;

use super::SelectorError;

/// An opaque 8-bit RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Channel-wise `255 - c`.
    pub fn inverted(self) -> Self {
        Self::new(255 - self.r, 255 - self.g, 255 - self.b)
    }

    /// Linear interpolation toward `other`; `t` is clamped to `[0, 1]`.
    pub fn lerp(self, other: Rgb, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t) as u8;
        Self::new(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }

    /// Brighten by `percent` (120 = 20% brighter), saturating at white.
    pub fn lighter(self, percent: u16) -> Self {
        self.scale(percent as f32 / 100.0)
    }

    /// Darken by `percent` (120 = divide by 1.2).
    pub fn darker(self, percent: u16) -> Self {
        self.scale(100.0 / percent.max(1) as f32)
    }

    fn scale(self, factor: f32) -> Self {
        let s = |c: u8| (c as f32 * factor).round().clamp(0.0, 255.0) as u8;
        Self::new(s(self.r), s(self.g), s(self.b))
    }

    pub fn to_color(self) -> Color {
        Color::from_rgba8(self.r, self.g, self.b, 255)
    }

    pub fn with_alpha(self, alpha: u8) -> Color {
        Color::from_rgba8(self.r, self.g, self.b, alpha)
    }
}

/// Start and end colour of a gradient.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorScheme {
    pub name: &'static str,
    pub start: Rgb,
    pub end: Rgb,
}

impl ColorScheme {
    /// Both colours inverted; applying twice yields the original scheme.
    pub fn inverted(self) -> Self {
        Self {
            name: self.name,
            start: self.start.inverted(),
            end: self.end.inverted(),
        }
    }

    /// Colour at `t` along the start→end gradient.
    pub fn at(&self, t: f32) -> Rgb {
        self.start.lerp(self.end, t)
    }
}

/// Named schemes in cycling order.
pub const SCHEMES: [ColorScheme; 10] = [
    scheme("default", Rgb::new(30, 144, 255), Rgb::new(65, 105, 225)),
    scheme("vintage", Rgb::new(139, 69, 19), Rgb::new(160, 82, 45)),
    scheme("neon", Rgb::new(255, 0, 255), Rgb::new(0, 255, 255)),
    scheme("retro", Rgb::new(255, 215, 0), Rgb::new(255, 69, 0)),
    scheme("monochrome", Rgb::new(240, 240, 240), Rgb::new(50, 50, 50)),
    scheme("sunset", Rgb::new(255, 165, 0), Rgb::new(255, 0, 0)),
    scheme("forest", Rgb::new(34, 139, 34), Rgb::new(0, 100, 0)),
    scheme("ocean", Rgb::new(0, 191, 255), Rgb::new(0, 0, 128)),
    scheme("candy", Rgb::new(255, 105, 180), Rgb::new(147, 112, 219)),
    scheme("fire", Rgb::new(255, 69, 0), Rgb::new(255, 0, 0)),
];

const fn scheme(name: &'static str, start: Rgb, end: Rgb) -> ColorScheme {
    ColorScheme { name, start, end }
}

/// Index of the scheme called `name` (case-insensitive).
pub fn scheme_index(name: &str) -> Result<usize, SelectorError> {
    SCHEMES
        .iter()
        .position(|s| s.name.eq_ignore_ascii_case(name.trim()))
        .ok_or_else(|| SelectorError::unknown("color scheme", name))
}

pub fn scheme_names() -> impl Iterator<Item = &'static str> {
    SCHEMES.iter().map(|s| s.name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_has_unique_names() {
        let mut names: Vec<_> = scheme_names().collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), SCHEMES.len());
        assert!(SCHEMES.len() >= 10);
    }

    #[test]
    fn invert_twice_is_identity() {
        for s in SCHEMES {
            assert_eq!(s.inverted().inverted(), s);
        }
        assert_eq!(Rgb::new(30, 144, 255).inverted(), Rgb::new(225, 111, 0));
    }

    #[test]
    fn lerp_endpoints() {
        let a = Rgb::new(0, 100, 200);
        let b = Rgb::new(200, 100, 0);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.5), Rgb::new(100, 100, 100));
    }

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(scheme_index("Neon").ok(), Some(2));
        assert!(scheme_index("plaid").is_err());
    }
}
