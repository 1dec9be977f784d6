// src/visualizer/frame.rs
//! The rendered raster handed to the host once per tick.

use std::path::Path;

use anyhow::{Context, Result};
use image::RgbaImage;
use tiny_skia::Pixmap;

/// An immutable rendered surface. Zero-sized surfaces produce an empty frame.
#[derive(Clone)]
pub struct Frame {
    width: u32,
    height: u32,
    pixmap: Option<Pixmap>,
}

impl Frame {
    pub(crate) fn new(width: u32, height: u32, pixmap: Option<Pixmap>) -> Self {
        Self {
            width,
            height,
            pixmap,
        }
    }

    pub fn empty(width: u32, height: u32) -> Self {
        Self::new(width, height, None)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.pixmap.is_none()
    }

    /// Straight (non-premultiplied) RGBA at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let c = self.pixmap.as_ref()?.pixel(x, y)?.demultiply();
        Some([c.red(), c.green(), c.blue(), c.alpha()])
    }

    pub fn to_rgba_image(&self) -> RgbaImage {
        let Some(pixmap) = &self.pixmap else {
            return RgbaImage::new(self.width, self.height);
        };
        let data: Vec<u8> = pixmap
            .pixels()
            .iter()
            .flat_map(|p| {
                let c = p.demultiply();
                [c.red(), c.green(), c.blue(), c.alpha()]
            })
            .collect();
        RgbaImage::from_raw(self.width, self.height, data)
            .unwrap_or_else(|| RgbaImage::new(self.width, self.height))
    }

    pub fn save_png(&self, path: &Path) -> Result<()> {
        self.to_rgba_image()
            .save(path)
            .with_context(|| format!("failed to write frame to {}", path.display()))
    }
}

impl std::fmt::Debug for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Frame")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("empty", &self.is_empty())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tiny_skia::Color;

    #[test]
    fn pixel_reads_back_fill() {
        let mut pixmap = Pixmap::new(4, 3).unwrap();
        pixmap.fill(Color::from_rgba8(10, 20, 30, 255));
        let frame = Frame::new(4, 3, Some(pixmap));
        assert_eq!(frame.pixel(3, 2), Some([10, 20, 30, 255]));
        assert_eq!(frame.pixel(4, 0), None);

        let image = frame.to_rgba_image();
        assert_eq!(image.dimensions(), (4, 3));
        assert_eq!(image.get_pixel(0, 0).0, [10, 20, 30, 255]);
    }

    #[test]
    fn empty_frame_has_no_pixels() {
        let frame = Frame::empty(0, 10);
        assert!(frame.is_empty());
        assert_eq!(frame.pixel(0, 0), None);
        assert_eq!(frame.to_rgba_image().dimensions(), (0, 10));
    }
}
