// src/ui/widgets/visualizer.rs
//! Shows controller frames in the terminal, two pixel rows per cell via `▀`.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Color,
    widgets::{Block, Widget},
};

use crate::visualizer::Frame;

const UPPER_HALF: &str = "▀";

/// Pixel size a frame should have to fill `inner` one-to-one.
pub fn pane_pixel_size(inner: Rect) -> (u32, u32) {
    (inner.width as u32, inner.height as u32 * 2)
}

pub struct FrameView<'a> {
    frame: Option<&'a Frame>,
    block: Option<Block<'a>>,
}

impl<'a> FrameView<'a> {
    pub fn new(frame: Option<&'a Frame>) -> Self {
        Self { frame, block: None }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }
}

impl Widget for FrameView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner = match self.block {
            Some(block) => {
                let inner = block.inner(area);
                block.render(area, buf);
                inner
            }
            None => area,
        };
        let Some(frame) = self.frame.filter(|f| !f.is_empty()) else {
            return;
        };
        if inner.is_empty() {
            return;
        }

        // Nearest-neighbour sample so a stale frame size still fills the pane.
        let (fw, fh) = (frame.width() as u64, frame.height() as u64);
        let (cw, ch) = (inner.width as u64, inner.height as u64 * 2);
        let sample = |cx: u64, py: u64| {
            let x = (cx * fw / cw) as u32;
            let y = (py * fh / ch) as u32;
            frame
                .pixel(x, y)
                .map_or(Color::Reset, |[r, g, b, _]| Color::Rgb(r, g, b))
        };

        for row in 0..inner.height {
            for col in 0..inner.width {
                let top = sample(col as u64, row as u64 * 2);
                let bottom = sample(col as u64, row as u64 * 2 + 1);
                if let Some(cell) = buf.cell_mut((inner.x + col, inner.y + row)) {
                    cell.set_symbol(UPPER_HALF).set_fg(top).set_bg(bottom);
                }
            }
        }
    }
}
