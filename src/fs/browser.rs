// src/fs/browser.rs
//! Directory listing for the file browser pane.

use std::fs;
use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};

use super::detection::{FileCategory, detect_file_type};

#[derive(Debug, Clone, PartialEq)]
pub struct DirEntry {
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
    pub category: FileCategory,
    pub mime: String,
}

impl DirEntry {
    pub fn is_audio(&self) -> bool {
        !self.is_dir && self.category == FileCategory::Audio
    }
}

/// Folders first, then files, each group sorted case-insensitively.
pub fn load_entries(dir: &Path) -> Result<Vec<DirEntry>> {
    let read = fs::read_dir(dir).with_context(|| format!("listing {}", dir.display()))?;
    let mut entries: Vec<DirEntry> = read
        .filter_map(Result::ok)
        .map(|e| {
            let name = e.file_name().to_string_lossy().into_owned();
            let path = e.path();
            if path.is_dir() {
                return DirEntry {
                    name,
                    path,
                    is_dir: true,
                    category: FileCategory::Binary,
                    mime: String::new(),
                };
            }
            let (category, mime) = match detect_file_type(&path) {
                Ok(ft) => (ft.category, ft.mime),
                Err(_) => (FileCategory::Binary, String::new()),
            };
            DirEntry {
                name,
                path,
                is_dir: false,
                category,
                mime,
            }
        })
        .collect();
    entries.sort_by_key(|e| (!e.is_dir, e.name.to_lowercase()));
    Ok(entries)
}

/// The last `n` components of `path`, prefixed with `…/` when shortened.
pub fn tail_path(path: &Path, n: usize) -> String {
    let parts: Vec<String> = path
        .components()
        .filter(|c| matches!(c, Component::Normal(_)))
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    if parts.is_empty() {
        return path.display().to_string();
    }
    let skip = parts.len().saturating_sub(n);
    let tail = parts[skip..].join("/");
    if skip > 0 { format!("…/{tail}") } else { format!("/{tail}") }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folders_sort_before_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("zeta")).unwrap();
        fs::write(dir.path().join("Alpha.txt"), "hello").unwrap();
        fs::write(dir.path().join("beta.mp3"), b"ID3").unwrap();

        let entries = load_entries(dir.path()).unwrap();
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["zeta", "Alpha.txt", "beta.mp3"]);
        assert!(entries[0].is_dir);
        assert!(entries[2].is_audio());
        assert!(!entries[1].is_audio());
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_entries(&dir.path().join("gone")).is_err());
    }

    #[test]
    fn tail_path_keeps_last_components() {
        assert_eq!(tail_path(Path::new("/home/user/music/albums"), 2), "…/music/albums");
        assert_eq!(tail_path(Path::new("/music"), 3), "/music");
        assert_eq!(tail_path(Path::new("/"), 3), "/");
    }
}
