//! Playback engine interface.
//!
//! The library owns a [`Player`] and drives it with `load`/`play`/`stop`;
//! playlists borrow the same engine through
//! [`MusicLibrary::player_mut`](crate::library::MusicLibrary::player_mut).
//! Engine notifications come back through the `handle_player_state` methods
//! of the library and the playlists.
//! Audio output itself lives outside this crate; [`LoggingPlayer`] is the
//! stand-in used by the command-line front end.

use anyhow::{bail, Result};
use log::{debug, info};

/// Notifications a playback engine reports back to its owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    /// The loaded track played to its end.
    Ended,
    /// Playback was stopped from outside the library.
    Stopped,
}

/// Commands the library issues to the playback engine.
pub trait Player {
    /// Prepares the track at `locator` for playback.
    fn load(&mut self, locator: &str) -> Result<()>;
    /// Starts the loaded track.
    fn play(&mut self) -> Result<()>;
    /// Halts playback.
    fn stop(&mut self) -> Result<()>;
}

/// Silent player that keeps track of what it was asked to do.
#[derive(Debug, Default)]
pub struct LoggingPlayer {
    loaded: Option<String>,
    playing: bool,
}

impl LoggingPlayer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn loaded(&self) -> Option<&str> {
        self.loaded.as_deref()
    }

    #[must_use]
    pub const fn is_playing(&self) -> bool {
        self.playing
    }
}

impl Player for LoggingPlayer {
    fn load(&mut self, locator: &str) -> Result<()> {
        debug!("Loading `{locator}'");
        self.playing = false;
        self.loaded = Some(locator.to_owned());
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        let Some(locator) = &self.loaded else {
            bail!("Nothing loaded to play");
        };
        info!("Now playing `{locator}'");
        self.playing = true;
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        if self.playing {
            info!("Stopped playback");
        }
        self.playing = false;
        Ok(())
    }
}
