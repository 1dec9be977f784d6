// src/ui/widgets/mod.rs
//! Custom widgets for the player UI.

pub mod artwork;
pub mod file_list;
pub mod player_panel;
pub mod visualizer;

pub use artwork::render_artwork;
pub use file_list::render_file_list;
pub use player_panel::{PlaybackStatus, render_player_panel};
pub use visualizer::{FrameView, pane_pixel_size};
