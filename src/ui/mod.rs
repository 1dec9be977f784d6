// src/ui/mod.rs
//! Terminal interface: layout, input, widgets and the event loop.

pub mod icons;
pub mod keybindings;
pub mod layout;
pub mod tui;
pub mod widgets;

pub use tui::run;
