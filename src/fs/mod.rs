// src/fs/mod.rs
//! Directory browsing and file type detection.

pub mod browser;
pub mod detection;

pub use browser::{DirEntry, load_entries, tail_path};
pub use detection::{FileCategory, FileType, detect_file_type};
