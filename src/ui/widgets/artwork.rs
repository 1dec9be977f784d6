// src/ui/widgets/artwork.rs
//! Album artwork display widget.

use image::DynamicImage;
use ratatui::{
    Frame,
    layout::Rect,
    widgets::{Block, Borders},
};
use ratatui_image::{Image, Resize, picker::Picker};
use tracing::debug;

/// Draw the embedded cover, if any, as a square filling the panel width.
pub fn render_artwork(f: &mut Frame<'_>, area: Rect, picker: &mut Picker, artwork: Option<&DynamicImage>) {
    let block = Block::default().borders(Borders::ALL).title("3: Artwork");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(img) = artwork else {
        return;
    };
    if inner.is_empty() {
        return;
    }
    // Cells are about twice as tall as wide.
    let side_h = (inner.width / 2).clamp(1, inner.height);
    let offset_y = inner.y + (inner.height - side_h) / 2;
    let draw_area = Rect::new(inner.x, offset_y, inner.width, side_h);

    match picker.new_protocol(img.clone(), Rect::new(0, 0, inner.width, side_h), Resize::Fit(None)) {
        Ok(proto) => f.render_widget(Image::new(&proto), draw_area),
        Err(err) => debug!(?err, "artwork could not be encoded for this terminal"),
    }
}
