//! The playlists of one library.
//!
//! [`PlaylistSet`] is a selection-aware list of shared playlists. It always
//! starts with the two smart playlists and keeps each member registered as a
//! listener of the library for as long as the member is in the set.
//!
//! Playback through the set is exclusive: starting the selected playlist
//! stops any other playlist that is playing.

use crate::error::{PlaylistError, SelectionError};
use crate::events::ListenerId;
use crate::library::MusicLibrary;
use crate::player::{Player, PlayerState};
use crate::playlist::Playlist;
use crate::selection::SelectionList;
use log::debug;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Shared handle to a playlist in a set.
pub type PlaylistRef = Rc<RefCell<Playlist>>;

#[derive(Debug)]
struct Entry {
    playlist: PlaylistRef,
    listener: ListenerId,
}

#[derive(Debug)]
pub struct PlaylistSet {
    entries: SelectionList<Entry>,
}

impl PlaylistSet {
    /// Creates the set with a "Most Liked" and a "Most Recently Added"
    /// playlist of `smart_size` songs each, both listening to `library`.
    /// The last one created is selected.
    pub fn new(library: &mut MusicLibrary, smart_size: usize) -> Self {
        let mut set = Self {
            entries: SelectionList::new(),
        };
        let liked = Playlist::most_liked(library, smart_size);
        set.attach(library, liked);
        let recent = Playlist::most_recently_added(library, smart_size);
        set.attach(library, recent);
        set
    }

    /// Adds and selects a new, empty manual playlist.
    pub fn add_manual(&mut self, library: &mut MusicLibrary, name: &str) -> PlaylistRef {
        let playlist = Playlist::manual(name, library);
        self.attach(library, playlist)
    }

    fn attach(&mut self, library: &mut MusicLibrary, playlist: Playlist) -> PlaylistRef {
        let playlist = Rc::new(RefCell::new(playlist));
        let listener = library.register_listener(&playlist);
        self.entries.add(Entry {
            playlist: Rc::clone(&playlist),
            listener,
        });
        playlist
    }

    /// Removes the selected playlist and stops it listening to `library`.
    ///
    /// # Errors
    ///
    /// [`SelectionError::NoSelection`] when no playlist is selected.
    pub fn remove(&mut self, library: &mut MusicLibrary) -> Result<PlaylistRef, SelectionError> {
        let entry = self.entries.remove()?;
        let was_listening = library.unregister_listener(entry.listener);
        debug!(
            "Removed playlist `{}' (was listening: {was_listening})",
            entry.playlist.borrow().name()
        );
        Ok(entry.playlist)
    }

    /// # Errors
    ///
    /// Out-of-range `index`.
    pub fn select(&mut self, index: usize) -> Result<(), SelectionError> {
        self.entries.select(index)
    }

    pub fn deselect(&mut self) {
        self.entries.deselect();
    }

    /// # Errors
    ///
    /// Nothing selected.
    pub fn next(&mut self) -> Result<(), SelectionError> {
        self.entries.next()
    }

    /// # Errors
    ///
    /// Nothing selected.
    pub fn previous(&mut self) -> Result<(), SelectionError> {
        self.entries.previous()
    }

    #[must_use]
    pub fn selected(&self) -> Option<&PlaylistRef> {
        self.entries.selected().map(|entry| &entry.playlist)
    }

    #[must_use]
    pub const fn index_selected(&self) -> Option<usize> {
        self.entries.index_selected()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&PlaylistRef> {
        self.entries.get(index).map(|entry| &entry.playlist)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlaylistRef> {
        self.entries.iter().map(|entry| &entry.playlist)
    }

    /// First playlist called `name`.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&PlaylistRef> {
        self.iter().find(|playlist| playlist.borrow().name() == name)
    }

    /// Whether the selected playlist has a selected song.
    #[must_use]
    pub fn some_song_selected(&self) -> bool {
        self.selected()
            .is_some_and(|playlist| playlist.borrow().some_selected())
    }

    /// Whether any playlist in the set is playing.
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.iter().any(|playlist| playlist.borrow().is_playing())
    }

    /// Plays the selected song of the selected playlist, stopping whatever
    /// the set was playing.
    ///
    /// # Errors
    ///
    /// [`SelectionError::NoSelection`] without a selected playlist or song,
    /// or the player's own failure.
    pub fn play(&mut self, player: &mut dyn Player) -> Result<(), PlaylistError> {
        if !self.some_song_selected() {
            return Err(SelectionError::NoSelection.into());
        }
        if self.is_playing() {
            self.stop(player)?;
        }
        let playlist = self.selected().ok_or(SelectionError::NoSelection)?;
        playlist.borrow_mut().play(player)
    }

    /// Stops every playlist that is playing.
    ///
    /// # Errors
    ///
    /// [`PlaylistError::NotPlaying`] when none is, or the player's own failure.
    pub fn stop(&mut self, player: &mut dyn Player) -> Result<(), PlaylistError> {
        if !self.is_playing() {
            return Err(PlaylistError::NotPlaying);
        }
        for playlist in self.iter() {
            let mut playlist = playlist.borrow_mut();
            if playlist.is_playing() {
                playlist.stop(player)?;
            }
        }
        Ok(())
    }

    /// Hands an engine notification to every playlist.
    ///
    /// # Errors
    ///
    /// The first playlist that fails to restart playback.
    pub fn handle_player_state(
        &mut self,
        state: PlayerState,
        player: &mut dyn Player,
    ) -> Result<(), PlaylistError> {
        for playlist in self.iter() {
            playlist.borrow_mut().handle_player_state(state, player)?;
        }
        Ok(())
    }
}

impl fmt::Display for PlaylistSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for playlist in self.iter() {
            write!(f, "{}", playlist.borrow())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::LoggingPlayer;
    use crate::song::{Song, SongMeta};

    fn song(title: &str) -> Song {
        Song::new(
            format!("{title}.mp3"),
            SongMeta::new(title, "Album", "Genre", vec!["Artist".into()]),
        )
    }

    fn library() -> MusicLibrary {
        MusicLibrary::new(Box::new(LoggingPlayer::new()))
    }

    #[test]
    fn test_starts_with_smart_playlists() {
        let mut lib = library();
        let set = PlaylistSet::new(&mut lib, 5);
        assert_eq!(set.len(), 2);
        assert_eq!(lib.listener_count(), 2);
        assert_eq!(set.index_selected(), Some(1));
        assert!(set.find("Most Liked").unwrap().borrow().is_smart());
        assert!(set.find("Most Recently Added").is_some());
        assert!(set.find("Road trip").is_none());
    }

    #[test]
    fn test_manual_playlist_follows_library() {
        let mut lib = library();
        let mut set = PlaylistSet::new(&mut lib, 5);
        let mix = set.add_manual(&mut lib, "Mix");
        assert_eq!(set.index_selected(), Some(2));

        let a = lib.add(song("A"));
        mix.borrow_mut().add(a);
        let recent = Rc::clone(set.find("Most Recently Added").unwrap());
        assert_eq!(recent.borrow().len(), 1);

        lib.remove().unwrap();
        assert!(mix.borrow().is_empty());
        assert!(recent.borrow().is_empty());
    }

    #[test]
    fn test_remove_unregisters() {
        let mut lib = library();
        let mut set = PlaylistSet::new(&mut lib, 5);
        let mix = set.add_manual(&mut lib, "Mix");
        let a = lib.add(song("A"));
        mix.borrow_mut().add(a);

        let removed = set.remove(&mut lib).unwrap();
        assert!(Rc::ptr_eq(&removed, &mix));
        assert_eq!(set.len(), 2);
        assert_eq!(lib.listener_count(), 2);
        assert!(set.remove(&mut lib).is_err());

        // no longer repaired by the library
        lib.remove().unwrap();
        assert_eq!(mix.borrow().len(), 1);
    }

    #[test]
    fn test_navigation() {
        let mut lib = library();
        let mut set = PlaylistSet::new(&mut lib, 5);
        set.select(0).unwrap();
        set.next().unwrap();
        assert_eq!(set.selected().unwrap().borrow().name(), "Most Recently Added");
        set.next().unwrap();
        assert!(set.selected().is_none());
        assert!(set.previous().is_err());
        assert!(set.select(2).is_err());
    }

    #[test]
    fn test_borrowed_playlist_misses_event() {
        let mut lib = library();
        let set = PlaylistSet::new(&mut lib, 5);
        let recent = set.find("Most Recently Added").unwrap();

        let held = recent.borrow();
        lib.add(song("A"));
        assert!(held.is_empty());
        drop(held);

        lib.add(song("B"));
        assert_eq!(recent.borrow().len(), 1);
        assert_eq!(recent.borrow().get(0).unwrap().title(), "B");
    }

    #[test]
    fn test_play_is_exclusive_across_playlists() {
        let mut lib = library();
        let mut player = LoggingPlayer::new();
        let mut set = PlaylistSet::new(&mut lib, 5);
        assert!(!set.is_playing());
        assert!(matches!(set.stop(&mut player), Err(PlaylistError::NotPlaying)));

        let mix = set.add_manual(&mut lib, "Mix");
        let a = lib.add(song("A"));
        mix.borrow_mut().add(Rc::clone(&a));

        // "Most Recently Added" now holds A, selected
        set.select(1).unwrap();
        set.play(&mut player).unwrap();
        assert!(set.is_playing());
        let recent = Rc::clone(set.selected().unwrap());

        set.select(2).unwrap();
        set.play(&mut player).unwrap();
        assert!(!recent.borrow().is_playing());
        assert!(Rc::ptr_eq(mix.borrow().now_playing().unwrap(), &a));

        set.stop(&mut player).unwrap();
        assert!(!set.is_playing());
        assert!(!player.is_playing());
    }

    #[test]
    fn test_play_needs_selected_song() {
        let mut lib = library();
        let mut player = LoggingPlayer::new();
        let mut set = PlaylistSet::new(&mut lib, 5);
        // "Most Recently Added" is selected but empty
        assert!(!set.some_song_selected());
        assert!(set.play(&mut player).is_err());
        set.deselect();
        assert!(set.play(&mut player).is_err());
    }

    #[test]
    fn test_track_end_reaches_playing_playlist() {
        let mut lib = library();
        let mut player = LoggingPlayer::new();
        let mut set = PlaylistSet::new(&mut lib, 5);
        let a = lib.add(song("A"));
        let b = lib.add(song("B"));
        let recent = Rc::clone(set.selected().unwrap());
        recent.borrow_mut().select(0).unwrap();
        set.play(&mut player).unwrap();

        set.handle_player_state(PlayerState::Ended, &mut player)
            .unwrap();
        assert_eq!(a.play_count(), 1);
        assert!(Rc::ptr_eq(recent.borrow().now_playing().unwrap(), &b));

        set.handle_player_state(PlayerState::Stopped, &mut player)
            .unwrap();
        assert!(!set.is_playing());
        assert_eq!(b.play_count(), 0);
    }

    #[test]
    fn test_display() {
        let mut lib = library();
        let set = PlaylistSet::new(&mut lib, 5);
        lib.add(song("A"));
        assert_eq!(
            set.to_string(),
            "\n*-- Playlist Most Liked --*\
             \n*-- Playlist Most Recently Added --*\
             \n0 [A, Album, Genre, [Artist]] --- Unrated --- 0 ->"
        );
    }
}
