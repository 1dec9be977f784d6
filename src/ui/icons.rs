// src/ui/icons.rs
//! Nerd-font glyphs for browser entries.

use crate::fs::{DirEntry, FileCategory};

pub const NOW_PLAYING: &str = "\u{f04b}";

pub fn icon_for_entry(entry: &DirEntry) -> &'static str {
    if entry.is_dir {
        return "\u{f07b}";
    }
    match entry.category {
        FileCategory::Audio => "\u{f1c7}",
        FileCategory::Image => "\u{f1c5}",
        FileCategory::Video => "\u{f1c8}",
        FileCategory::Document => "\u{f15c}",
        FileCategory::Binary => "\u{f1c6}",
    }
}
