// src/audio/metadata.rs
//! Track metadata extraction using Lofty.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use lofty::file::{AudioFile, TaggedFileExt};
use lofty::probe::Probe;
use lofty::tag::{Accessor, ItemKey, ItemValue};

use crate::visualizer::SongInfo;

pub const UNKNOWN_ARTIST: &str = "Unknown Artist";
pub const UNKNOWN_ALBUM: &str = "Unknown Album";

/// One tag entry: key and display value.
pub type TagEntry = (String, String);

#[derive(Debug, Clone, Default)]
pub struct TrackMetadata {
    pub path: PathBuf,
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    /// Every item of the primary tag.
    pub tags: Vec<TagEntry>,
    /// Bitrate, sample rate, channels.
    pub properties: Vec<(String, String)>,
    pub duration: Duration,
    /// Unsynchronized lyrics from a comment frame described as "lyrics".
    pub lyrics: Option<String>,
    /// Raw bytes of the first embedded picture.
    pub artwork: Option<Vec<u8>>,
}

impl TrackMetadata {
    /// Display strings for the visualizer overlay, with fallbacks for missing tags.
    pub fn song_info(&self) -> SongInfo {
        let title = self.title.clone().unwrap_or_else(|| {
            self.path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default()
        });
        SongInfo::new(
            title,
            self.artist.as_deref().unwrap_or(UNKNOWN_ARTIST),
            self.album.as_deref().unwrap_or(UNKNOWN_ALBUM),
        )
    }
}

/// Read tags and properties for `path`. Safe to call from a background thread.
pub fn load_metadata(path: &Path) -> Result<TrackMetadata> {
    let tagged_file = Probe::open(path)
        .with_context(|| format!("opening {}", path.display()))?
        .read()
        .with_context(|| format!("reading tags from {}", path.display()))?;

    let mut meta = TrackMetadata {
        path: path.to_path_buf(),
        ..TrackMetadata::default()
    };

    if let Some(tag) = tagged_file.primary_tag() {
        meta.title = non_empty(tag.title().map(|s| s.into_owned()));
        meta.artist = non_empty(tag.artist().map(|s| s.into_owned()));
        meta.album = non_empty(tag.album().map(|s| s.into_owned()));
        meta.lyrics = tag
            .get_items(&ItemKey::Comment)
            .find(|item| item.description().eq_ignore_ascii_case("lyrics"))
            .and_then(|item| item.value().text())
            .map(str::to_owned);
        meta.artwork = tag.pictures().first().map(|pic| pic.data().to_vec());
        meta.tags = tag
            .items()
            .map(|item| {
                let value = match item.value() {
                    ItemValue::Text(t) | ItemValue::Locator(t) => t.clone(),
                    ItemValue::Binary(b) => format!("<{} bytes>", b.len()),
                };
                (format!("{:?}", item.key()), value)
            })
            .collect();
    }

    let props = tagged_file.properties();
    if let Some(b) = props.audio_bitrate() {
        meta.properties.push(("Bitrate (kbps)".into(), b.to_string()));
    }
    if let Some(sr) = props.sample_rate() {
        meta.properties.push(("Sample Rate (Hz)".into(), sr.to_string()));
    }
    if let Some(ch) = props.channels() {
        meta.properties.push(("Channels".into(), ch.to_string()));
    }
    meta.duration = props.duration();

    Ok(meta)
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn song_info_falls_back_to_file_stem() {
        let meta = TrackMetadata {
            path: PathBuf::from("/music/Intro Track.flac"),
            ..TrackMetadata::default()
        };
        assert_eq!(
            meta.song_info(),
            SongInfo::new("Intro Track", UNKNOWN_ARTIST, UNKNOWN_ALBUM)
        );
    }

    #[test]
    fn song_info_uses_tags_when_present() {
        let meta = TrackMetadata {
            path: PathBuf::from("a.mp3"),
            title: Some("Song".into()),
            artist: Some("Band".into()),
            album: None,
            ..TrackMetadata::default()
        };
        assert_eq!(meta.song_info(), SongInfo::new("Song", "Band", UNKNOWN_ALBUM));
    }

    #[test]
    fn blank_tags_count_as_missing() {
        assert_eq!(non_empty(Some("  ".into())), None);
        assert_eq!(non_empty(Some(" x ".into())), Some("x".into()));
    }

    #[test]
    fn non_audio_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "not audio").unwrap();
        assert!(load_metadata(&path).is_err());
    }
}
