// src/fs/detection.rs
//! File type detection: magic numbers first, file extension as fallback.

use std::{fmt, path::Path};

use anyhow::{Context, Result};
use infer::{Infer, MatcherType};
use mime_guess::MimeGuess;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum FileCategory {
    Image,
    Audio,
    Video,
    Document,
    Binary,
}

impl fmt::Display for FileCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FileCategory::Image => "Image",
            FileCategory::Audio => "Audio",
            FileCategory::Video => "Video",
            FileCategory::Document => "Document",
            FileCategory::Binary => "Binary",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone)]
pub struct FileType {
    pub mime: String,
    pub category: FileCategory,
}

pub fn detect_file_type(path: &Path) -> Result<FileType> {
    let sniffed = Infer::new()
        .get_from_path(path)
        .with_context(|| format!("sniffing {}", path.display()))?;
    if let Some(kind) = sniffed {
        let category = match kind.matcher_type() {
            MatcherType::Image => FileCategory::Image,
            MatcherType::Audio => FileCategory::Audio,
            MatcherType::Video => FileCategory::Video,
            _ => category_for_mime(kind.mime_type()),
        };
        return Ok(FileType {
            mime: kind.mime_type().to_string(),
            category,
        });
    }

    let mime = MimeGuess::from_path(path).first_or_octet_stream().to_string();
    Ok(FileType {
        category: category_for_mime(&mime),
        mime,
    })
}

/// Category from the top-level MIME type.
fn category_for_mime(mime: &str) -> FileCategory {
    match mime.split('/').next().unwrap_or_default() {
        "image" => FileCategory::Image,
        "audio" => FileCategory::Audio,
        "video" => FileCategory::Video,
        "text" => FileCategory::Document,
        _ if mime == "application/octet-stream" => FileCategory::Binary,
        "application" => FileCategory::Document,
        _ => FileCategory::Binary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_prefixes_map_to_categories() {
        assert_eq!(category_for_mime("audio/flac"), FileCategory::Audio);
        assert_eq!(category_for_mime("text/plain"), FileCategory::Document);
        assert_eq!(category_for_mime("application/pdf"), FileCategory::Document);
        assert_eq!(category_for_mime("application/octet-stream"), FileCategory::Binary);
        assert_eq!(category_for_mime("chemical/x-pdb"), FileCategory::Binary);
    }

    #[test]
    fn extension_fallback_for_unsniffable_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("track.ogg");
        std::fs::write(&path, b"").unwrap();
        let ft = detect_file_type(&path).unwrap();
        assert_eq!(ft.category, FileCategory::Audio);
    }
}
