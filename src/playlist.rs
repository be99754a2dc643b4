//! # Playlists
//!
//! A [`Playlist`] is a named, duplicate-free view over one library's songs,
//! with its own selection cursor. It listens to that library and repairs
//! itself when a member is removed there.
//!
//! Manual playlists are edited by hand. Smart playlists are curated by a
//! [`SmartPolicy`] and refuse manual edits; see [`crate::smart`].
//!
//! Whenever a member is dropped by repair or eviction the cursor is restored
//! by value: the previously selected song stays selected if it is still a
//! member, otherwise nothing is.
//!
//! A playlist also plays its own songs. It keeps the song it started and
//! follows the engine's notifications the same way the library does, so a
//! playlist that reaches the end of a track moves on to its next song.

use crate::error::{PlaylistError, SelectionError};
use crate::library::{LibraryEvent, LibraryEventKind, LibraryId, LibraryListener, MusicLibrary};
use crate::player::{Player, PlayerState};
use crate::selection::SelectionList;
use crate::smart::SmartPolicy;
use crate::song::{Song, SongRef};
use log::{debug, info, trace};
use std::fmt;
use std::rc::Rc;

/// How a playlist's membership is decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaylistKind {
    Manual,
    Smart(SmartPolicy),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Playlist {
    name: String,
    library: LibraryId,
    songs: SelectionList<SongRef>,
    kind: PlaylistKind,
    now_playing: Option<SongRef>,
}

impl Playlist {
    /// Empty hand-edited playlist over `library`. Register it with
    /// [`MusicLibrary::register_listener`] to have it follow removals.
    #[must_use]
    pub fn manual(name: impl Into<String>, library: &MusicLibrary) -> Self {
        Self::with_kind(name.into(), library, PlaylistKind::Manual)
    }

    /// Empty playlist curated by `policy`. Membership builds up from the
    /// library events it receives once registered.
    #[must_use]
    pub fn smart(policy: SmartPolicy, library: &MusicLibrary) -> Self {
        Self::with_kind(policy.name().to_owned(), library, PlaylistKind::Smart(policy))
    }

    #[must_use]
    pub fn most_liked(library: &MusicLibrary, target_size: usize) -> Self {
        Self::smart(SmartPolicy::most_liked(target_size), library)
    }

    #[must_use]
    pub fn most_recently_added(library: &MusicLibrary, target_size: usize) -> Self {
        Self::smart(SmartPolicy::most_recently_added(target_size), library)
    }

    fn with_kind(name: String, library: &MusicLibrary, kind: PlaylistKind) -> Self {
        debug!("Created playlist `{name}' ({kind:?})");
        Self {
            name,
            library: library.id(),
            songs: SelectionList::new(),
            kind,
            now_playing: None,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn kind(&self) -> PlaylistKind {
        self.kind
    }

    #[must_use]
    pub const fn is_smart(&self) -> bool {
        matches!(self.kind, PlaylistKind::Smart(_))
    }

    #[must_use]
    pub const fn songs(&self) -> &SelectionList<SongRef> {
        &self.songs
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SongRef> {
        self.songs.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.songs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&SongRef> {
        self.songs.get(index)
    }

    /// Whether a song equal to `song` is a member.
    #[must_use]
    pub fn contains(&self, song: &Song) -> bool {
        self.songs.iter().any(|member| **member == *song)
    }

    /// # Errors
    ///
    /// Out-of-range `index`.
    pub fn select(&mut self, index: usize) -> Result<(), PlaylistError> {
        Ok(self.songs.select(index)?)
    }

    pub fn deselect(&mut self) {
        self.songs.deselect();
    }

    /// # Errors
    ///
    /// Nothing selected.
    pub fn next(&mut self) -> Result<(), PlaylistError> {
        Ok(self.songs.next()?)
    }

    /// # Errors
    ///
    /// Nothing selected.
    pub fn previous(&mut self) -> Result<(), PlaylistError> {
        Ok(self.songs.previous()?)
    }

    #[must_use]
    pub const fn some_selected(&self) -> bool {
        self.songs.some_selected()
    }

    #[must_use]
    pub fn selected(&self) -> Option<&SongRef> {
        self.songs.selected()
    }

    #[must_use]
    pub const fn index_selected(&self) -> Option<usize> {
        self.songs.index_selected()
    }

    // --- manual editing -------------------------------------------------

    /// Appends `song` and selects it, unless an equal song is already a
    /// member. Smart playlists never accept songs this way.
    ///
    /// Returns whether the song was added.
    pub fn add(&mut self, song: SongRef) -> bool {
        if self.is_smart() {
            debug!("Refusing manual add to smart playlist `{}'", self.name);
            return false;
        }
        self.insert_unique(song)
    }

    /// Removes the selected song.
    ///
    /// # Errors
    ///
    /// [`PlaylistError::AutomaticMembership`] for smart playlists, otherwise
    /// a missing selection.
    pub fn remove(&mut self) -> Result<SongRef, PlaylistError> {
        self.ensure_manual()?;
        let song = self.songs.remove()?;
        debug!("Removed `{}' from playlist `{}'", song.title(), self.name);
        Ok(song)
    }

    /// Moves the selected song up to `target`, shifting the songs in between
    /// down by one. The moved song stays selected.
    ///
    /// # Errors
    ///
    /// [`PlaylistError::AutomaticMembership`] for smart playlists, a missing
    /// selection, or [`PlaylistError::InvalidTarget`] when `target` lies after
    /// the selected position.
    pub fn move_up_selected(&mut self, target: usize) -> Result<(), PlaylistError> {
        self.ensure_manual()?;
        let index = self
            .songs
            .index_selected()
            .ok_or(SelectionError::NoSelection)?;
        if target > index {
            return Err(PlaylistError::InvalidTarget { target });
        }
        self.songs.move_selected(target)?;
        Ok(())
    }

    fn ensure_manual(&self) -> Result<(), PlaylistError> {
        if self.is_smart() {
            return Err(PlaylistError::AutomaticMembership {
                name: self.name.clone(),
            });
        }
        Ok(())
    }

    // --- playback -------------------------------------------------------

    #[must_use]
    pub fn now_playing(&self) -> Option<&SongRef> {
        self.now_playing.as_ref()
    }

    #[must_use]
    pub const fn is_playing(&self) -> bool {
        self.now_playing.is_some()
    }

    /// Plays the selected song on `player`, interrupting this playlist's
    /// current song.
    ///
    /// # Errors
    ///
    /// A missing selection, or the player's own failure.
    pub fn play(&mut self, player: &mut dyn Player) -> Result<(), PlaylistError> {
        let song = self.selected().cloned().ok_or(SelectionError::NoSelection)?;
        if self.is_playing() {
            self.stop(player)?;
        }
        player.load(song.locator())?;
        self.now_playing = Some(Rc::clone(&song));
        player.play()?;
        info!("Playing `{}' from playlist `{}'", song.title(), self.name);
        Ok(())
    }

    /// # Errors
    ///
    /// [`PlaylistError::NotPlaying`] when this playlist is not playing, or the
    /// player's own failure.
    pub fn stop(&mut self, player: &mut dyn Player) -> Result<(), PlaylistError> {
        let song = self.now_playing.take().ok_or(PlaylistError::NotPlaying)?;
        debug!("Stopping `{}' in playlist `{}'", song.title(), self.name);
        player.stop()?;
        Ok(())
    }

    /// Follows an engine notification. A finished track counts as played; if
    /// it was the selected song the cursor advances, and whatever is then
    /// selected starts on `player`. Ignored unless this playlist is playing.
    ///
    /// # Errors
    ///
    /// Failures from restarting playback.
    pub fn handle_player_state(
        &mut self,
        state: PlayerState,
        player: &mut dyn Player,
    ) -> Result<(), PlaylistError> {
        let Some(playing) = self.now_playing.take() else {
            return Ok(());
        };
        match state {
            PlayerState::Ended => {
                playing.inc_play_count();
                debug!("`{}' ended in playlist `{}'", playing.title(), self.name);
                if self.selected().is_some_and(|selected| **selected == *playing) {
                    self.songs.next()?;
                }
                if self.some_selected() {
                    self.play(player)?;
                }
            }
            PlayerState::Stopped => {
                debug!("Playlist `{}' stopped externally", self.name);
            }
        }
        Ok(())
    }

    // --- maintenance ----------------------------------------------------

    /// Set-add: appends and selects `song` unless an equal one is present.
    fn insert_unique(&mut self, song: SongRef) -> bool {
        if self.songs.contains(&song) {
            trace!("`{}' already in playlist `{}'", song.title(), self.name);
            return false;
        }
        trace!("Adding `{}' to playlist `{}'", song.title(), self.name);
        self.songs.add(song);
        true
    }

    /// Removes the member at `index`, then re-anchors the cursor on the song
    /// that was selected before.
    fn remove_automatic(&mut self, index: usize) -> Option<SongRef> {
        if index >= self.songs.len() {
            return None;
        }
        let saved = self.songs.selected().cloned();
        self.songs.select(index).ok()?;
        let removed = self.songs.remove().ok()?;
        self.songs.reanchor(saved.as_ref());
        trace!("Dropped `{}' from playlist `{}'", removed.title(), self.name);
        Some(removed)
    }

    /// Drops the member equal to `song`, if any.
    fn remove_equal(&mut self, song: &SongRef) -> Option<SongRef> {
        let index = self.songs.position_of(song)?;
        self.remove_automatic(index)
    }

    /// Admits `song` under `policy`, evicting or pulling in a replacement as
    /// the policy decides.
    fn add_automatic(&mut self, policy: SmartPolicy, song: SongRef, library: &MusicLibrary) {
        if self.insert_unique(Rc::clone(&song)) {
            if self.songs.len() > policy.target_size {
                if let Some(index) = policy.eviction_index(self.songs.as_slice()) {
                    self.remove_automatic(index);
                }
            }
        } else if let Some(replacement) = policy.replacement(&song, self.songs.as_slice(), library)
        {
            debug!(
                "`{}' replaces `{}' in playlist `{}'",
                replacement.title(),
                song.title(),
                self.name
            );
            self.add_automatic(policy, replacement, library);
        }
    }

    fn maintain(&mut self, policy: SmartPolicy, event: &LibraryEvent<'_>) {
        if let LibraryEventKind::SongRemoved(removed) = event.kind {
            if self.songs.is_empty() {
                return;
            }
            self.remove_equal(removed);
            if let Some(song) = policy.backfill(removed, self.songs.as_slice(), event.library) {
                debug!("Backfilling playlist `{}' with `{}'", self.name, song.title());
                self.add_automatic(policy, song, event.library);
            }
        } else if let Some(candidate) = policy.candidate(event.kind) {
            self.add_automatic(policy, Rc::clone(candidate), event.library);
        }
    }
}

impl LibraryListener for Playlist {
    fn process_event(&mut self, event: &LibraryEvent<'_>) {
        if event.library.id() != self.library {
            trace!("Playlist `{}' ignores an event from another library", self.name);
            return;
        }
        match self.kind {
            PlaylistKind::Manual => {
                if let LibraryEventKind::SongRemoved(song) = event.kind {
                    self.remove_equal(song);
                }
            }
            PlaylistKind::Smart(policy) => self.maintain(policy, event),
        }
    }
}

impl fmt::Display for Playlist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\n*-- Playlist {} --*{}", self.name, self.songs)
    }
}
