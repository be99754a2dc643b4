//! Songs and their rating scale.
//!
//! A [`Song`] is shared between the library and every playlist that holds it
//! through a [`SongRef`]. Metadata never changes after creation; rating and
//! play count are interior-mutable. Ratings change through the library only,
//! play counts wherever a finished track is reported.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// Shared handle to a song.
pub type SongRef = Rc<Song>;

/// Six-level ordinal rating, lowest first.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rating {
    #[default]
    Unrated = 0,
    Terrible = 1,
    Bad = 2,
    Ok = 3,
    Good = 4,
    Amazing = 5,
}

impl Rating {
    /// One step up, saturating at [`Rating::Amazing`].
    #[must_use]
    pub const fn inc(self) -> Self {
        match self {
            Self::Unrated => Self::Terrible,
            Self::Terrible => Self::Bad,
            Self::Bad => Self::Ok,
            Self::Ok => Self::Good,
            Self::Good | Self::Amazing => Self::Amazing,
        }
    }

    /// One step down. A rated song bottoms out at [`Rating::Terrible`];
    /// an unrated one stays unrated.
    #[must_use]
    pub const fn dec(self) -> Self {
        match self {
            Self::Unrated => Self::Unrated,
            Self::Terrible | Self::Bad => Self::Terrible,
            Self::Ok => Self::Bad,
            Self::Good => Self::Ok,
            Self::Amazing => Self::Good,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Unrated => "Unrated",
            Self::Terrible => "Terrible",
            Self::Bad => "Bad",
            Self::Ok => "Ok",
            Self::Good => "Good",
            Self::Amazing => "Amazing",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Compiles `pattern` so that it only matches a field in its entirety.
///
/// # Errors
///
/// Returns the regex compilation error for malformed patterns.
pub fn full_match(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!("^(?:{pattern})$"))
}

/// Tag metadata of a song.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SongMeta {
    pub title: String,
    pub album: String,
    pub genre: String,
    pub artists: Vec<String>,
}

impl SongMeta {
    pub fn new(
        title: impl Into<String>,
        album: impl Into<String>,
        genre: impl Into<String>,
        artists: Vec<String>,
    ) -> Self {
        Self {
            title: title.into(),
            album: album.into(),
            genre: genre.into(),
            artists,
        }
    }

    /// Whether `pattern` matches the title, genre, album or any artist name.
    /// Build the pattern with [`full_match`] to require whole-field matches.
    #[must_use]
    pub fn matches(&self, pattern: &Regex) -> bool {
        pattern.is_match(&self.title)
            || pattern.is_match(&self.genre)
            || pattern.is_match(&self.album)
            || self.artists.iter().any(|artist| pattern.is_match(artist))
    }
}

impl fmt::Display for SongMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}, {}, [{}]]",
            self.title,
            self.album,
            self.genre,
            self.artists.join(", ")
        )
    }
}

/// A song in the library.
///
/// Equality compares every field, rating and play count included, so two
/// distinct songs with identical attributes are equal. Use [`Rc::ptr_eq`] on
/// [`SongRef`]s when identity matters.
#[derive(Debug, Clone, PartialEq)]
pub struct Song {
    locator: String,
    meta: SongMeta,
    rating: Cell<Rating>,
    play_count: Cell<u32>,
}

impl Song {
    /// New unrated, never played song.
    pub fn new(locator: impl Into<String>, meta: SongMeta) -> Self {
        Self {
            locator: locator.into(),
            meta,
            rating: Cell::new(Rating::Unrated),
            play_count: Cell::new(0),
        }
    }

    /// Where the audio lives; handed to the player on `load`.
    #[must_use]
    pub fn locator(&self) -> &str {
        &self.locator
    }

    #[must_use]
    pub const fn meta(&self) -> &SongMeta {
        &self.meta
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.meta.title
    }

    #[must_use]
    pub fn album(&self) -> &str {
        &self.meta.album
    }

    #[must_use]
    pub fn genre(&self) -> &str {
        &self.meta.genre
    }

    #[must_use]
    pub fn artists(&self) -> &[String] {
        &self.meta.artists
    }

    #[must_use]
    pub fn rating(&self) -> Rating {
        self.rating.get()
    }

    #[must_use]
    pub fn play_count(&self) -> u32 {
        self.play_count.get()
    }

    #[must_use]
    pub fn matches(&self, pattern: &Regex) -> bool {
        self.meta.matches(pattern)
    }

    pub(crate) fn inc_rating(&self) {
        self.rating.set(self.rating.get().inc());
    }

    pub(crate) fn dec_rating(&self) {
        self.rating.set(self.rating.get().dec());
    }

    pub(crate) fn inc_play_count(&self) {
        self.play_count.set(self.play_count.get().saturating_add(1));
    }
}

impl fmt::Display for Song {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} --- {} --- {}", self.meta, self.rating(), self.play_count())
    }
}
