//! # Song creation from audio files
//!
//! [`TagSongFactory`] reads title, album, genre and artist tags with `lofty`.
//! Missing tags become `"unknown"` and a multi-artist string is split on the
//! configured separator. [`scan_directory`] finds candidate files for it.

use crate::config::RuntimeConfig;
use crate::song::{Song, SongMeta};
use anyhow::{anyhow, Context, Result};
use lofty::{Accessor, Probe, TaggedFileExt};
use log::{debug, trace};
use path_absolutize::Absolutize;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

const UNKNOWN: &str = "unknown";

/// Builds songs from file locators.
pub trait SongFactory {
    /// # Errors
    ///
    /// Any reason the locator cannot be turned into a song.
    fn create(&self, locator: &Path) -> Result<Song>;
}

/// Factory backed by the audio file's own tags.
#[derive(Debug, Clone)]
pub struct TagSongFactory {
    artist_separator: String,
}

impl Default for TagSongFactory {
    fn default() -> Self {
        Self {
            artist_separator: ";".to_owned(),
        }
    }
}

impl TagSongFactory {
    #[must_use]
    pub fn new(artist_separator: impl Into<String>) -> Self {
        Self {
            artist_separator: artist_separator.into(),
        }
    }

    #[must_use]
    pub fn from_config(config: &RuntimeConfig) -> Self {
        Self::new(config.artist_separator.clone())
    }

    /// Splits a raw artist tag into trimmed, non-empty names.
    #[must_use]
    pub fn split_artists(&self, raw: &str) -> Vec<String> {
        let artists: Vec<String> = raw
            .split(self.artist_separator.as_str())
            .map(str::trim)
            .filter(|artist| !artist.is_empty())
            .map(str::to_owned)
            .collect();
        if artists.is_empty() {
            vec![UNKNOWN.to_owned()]
        } else {
            artists
        }
    }
}

impl SongFactory for TagSongFactory {
    fn create(&self, locator: &Path) -> Result<Song> {
        let path = locator
            .absolutize()
            .with_context(|| format!("Cannot resolve path {}", locator.display()))?;

        let tagged_file = Probe::open(&path)
            .map_err(|e| anyhow!("Failed to open {}: {e}", path.display()))?
            .read()
            .map_err(|e| anyhow!("Failed to read tags from {}: {e}", path.display()))?;

        let tag = tagged_file
            .primary_tag()
            .or_else(|| tagged_file.first_tag())
            .with_context(|| format!("No tags found in {}", path.display()))?;

        let artists = tag
            .artist()
            .map_or_else(|| vec![UNKNOWN.to_owned()], |raw| self.split_artists(&raw));
        let meta = SongMeta::new(
            tag_text(tag.title()),
            tag_text(tag.album()),
            tag_text(tag.genre()),
            artists,
        );
        trace!("Read {meta} from {}", path.display());

        Ok(Song::new(path.to_string_lossy(), meta))
    }
}

fn tag_text(value: Option<Cow<'_, str>>) -> String {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| UNKNOWN.to_owned())
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with('.'))
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
}

/// Audio files under `root` whose extension is in `extensions`, sorted by
/// path. Hidden files and directories are skipped.
///
/// # Errors
///
/// Fails when `root` is not a readable directory.
pub fn scan_directory(root: &Path, extensions: &[String]) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        anyhow::bail!("{} is not a directory", root.display());
    }

    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|entry| !is_hidden(entry))
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                debug!("Skipping unreadable entry: {e}");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file() && has_extension(entry.path(), extensions))
        .map(DirEntry::into_path)
        .collect();

    files.sort();
    debug!("Found {} audio files under {}", files.len(), root.display());
    Ok(files)
}
