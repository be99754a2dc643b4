//! Typed failures for the library core.
//!
//! Precondition violations are reported explicitly instead of being silently
//! ignored, so callers can tell "nothing happened" apart from "succeeded".
//! The application layer (config, CLI, session) wraps these in
//! `anyhow::Error`.

use thiserror::Error;

/// Failures of [`SelectionList`](crate::selection::SelectionList) operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SelectionError {
    /// The operation needs a selected element and there is none.
    #[error("no element is selected")]
    NoSelection,
    /// An index outside `0..len` was given.
    #[error("index {index} is out of bounds for a list of {len} elements")]
    IndexOutOfBounds { index: usize, len: usize },
}

/// Failures of [`MusicLibrary`](crate::library::MusicLibrary) operations.
#[derive(Debug, Error)]
pub enum LibraryError {
    #[error(transparent)]
    Selection(#[from] SelectionError),
    /// `stop` was called while nothing is playing.
    #[error("no song is playing")]
    NotPlaying,
    #[error("invalid search pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
    /// The playback engine refused a command.
    #[error(transparent)]
    Playback(#[from] anyhow::Error),
}

/// Failures of [`Playlist`](crate::playlist::Playlist) operations.
#[derive(Debug, Error)]
pub enum PlaylistError {
    #[error(transparent)]
    Selection(#[from] SelectionError),
    /// `move_up_selected` target is past the end or after the selection.
    #[error("cannot move the selected song to index {target}")]
    InvalidTarget { target: usize },
    /// Smart playlists reject manual edits.
    #[error("playlist `{name}` is maintained automatically")]
    AutomaticMembership { name: String },
    /// `stop` was called while no playlist song is playing.
    #[error("no playlist song is playing")]
    NotPlaying,
    #[error(transparent)]
    Playback(#[from] anyhow::Error),
}
