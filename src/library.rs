//! # Music library
//!
//! [`MusicLibrary`] owns the canonical, ordered song collection together with a
//! selection cursor and the now-playing song. Every structural or rating change
//! is published synchronously to the registered [`LibraryListener`]s before the
//! mutating call returns.
//!
//! ## Events
//!
//! | Operation              | Event                                 | Timing          |
//! |------------------------|---------------------------------------|-----------------|
//! | `add`                  | [`LibraryEventKind::SongAdded`]       | after append    |
//! | `remove`               | [`LibraryEventKind::SongRemoved`]     | before removal  |
//! | `inc/dec_rate_selected`| [`LibraryEventKind::SongRated`]       | after mutation  |
//!
//! A rating event is published even when the rating saturated and did not
//! change; listeners compare `before` and `after` themselves.
//!
//! Listeners only ever see the library through a shared reference, so a
//! handler can read songs and scan the collection but cannot mutate either.

use crate::error::{LibraryError, SelectionError};
use crate::events::{EventBus, ListenerId};
use crate::player::{Player, PlayerState};
use crate::selection::SelectionList;
use crate::song::{self, Rating, SongRef};
use crate::song_factory::SongFactory;
use log::{debug, info, trace, warn};
use std::cell::RefCell;
use std::fmt;
use std::path::Path;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_LIBRARY_ID: AtomicU64 = AtomicU64::new(0);

/// Identifies one library instance; playlists keep it as their back-reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LibraryId(u64);

/// What happened to which song.
#[derive(Debug, Clone)]
pub enum LibraryEventKind {
    SongAdded(SongRef),
    SongRemoved(SongRef),
    SongRated {
        song: SongRef,
        before: Rating,
        after: Rating,
    },
}

/// A change notification, carrying the library it originated from.
#[derive(Debug, Clone, Copy)]
pub struct LibraryEvent<'a> {
    pub library: &'a MusicLibrary,
    pub kind: &'a LibraryEventKind,
}

impl LibraryEvent<'_> {
    /// The song the event is about.
    #[must_use]
    pub fn song(&self) -> &SongRef {
        match self.kind {
            LibraryEventKind::SongAdded(song)
            | LibraryEventKind::SongRemoved(song)
            | LibraryEventKind::SongRated { song, .. } => song,
        }
    }
}

/// Receiver of library change notifications.
pub trait LibraryListener {
    fn process_event(&mut self, event: &LibraryEvent<'_>);
}

/// In-memory song collection with selection, playback bookkeeping and change
/// notifications.
pub struct MusicLibrary {
    id: LibraryId,
    songs: SelectionList<SongRef>,
    now_playing: Option<SongRef>,
    player: Box<dyn Player>,
    listeners: EventBus<dyn LibraryListener>,
}

impl MusicLibrary {
    /// Creates an empty library driving `player`.
    pub fn new(player: Box<dyn Player>) -> Self {
        let id = LibraryId(NEXT_LIBRARY_ID.fetch_add(1, Ordering::Relaxed));
        debug!("Created music library {id:?}");
        Self {
            id,
            songs: SelectionList::new(),
            now_playing: None,
            player,
            listeners: EventBus::new(),
        }
    }

    #[must_use]
    pub const fn id(&self) -> LibraryId {
        self.id
    }

    // --- collection -----------------------------------------------------

    /// Appends `song`, selects it and publishes `SongAdded`.
    pub fn add(&mut self, song: impl Into<SongRef>) -> SongRef {
        let song = song.into();
        debug!("Adding `{}' to the library", song.title());
        self.songs.add(Rc::clone(&song));
        self.emit(LibraryEventKind::SongAdded(Rc::clone(&song)));
        song
    }

    /// Creates a song through `factory` and adds it. A song that cannot be
    /// created is dropped with a warning and the library stays unchanged.
    pub fn add_from(&mut self, factory: &dyn SongFactory, locator: &Path) -> Option<SongRef> {
        match factory.create(locator) {
            Ok(song) => Some(self.add(song)),
            Err(e) => {
                warn!("Skipping `{}': {e:#}", locator.display());
                None
            }
        }
    }

    /// Publishes `SongRemoved` for the selected song, then removes it.
    ///
    /// # Errors
    ///
    /// [`SelectionError::NoSelection`] when nothing is selected.
    pub fn remove(&mut self) -> Result<SongRef, LibraryError> {
        let song = self.selected().cloned().ok_or(SelectionError::NoSelection)?;
        debug!("Removing `{}' from the library", song.title());
        self.emit(LibraryEventKind::SongRemoved(song));
        Ok(self.songs.remove()?)
    }

    /// # Errors
    ///
    /// [`SelectionError::IndexOutOfBounds`] for an index past the end.
    pub fn select(&mut self, index: usize) -> Result<(), LibraryError> {
        Ok(self.songs.select(index)?)
    }

    pub fn deselect(&mut self) {
        self.songs.deselect();
    }

    /// # Errors
    ///
    /// [`SelectionError::NoSelection`] when nothing is selected.
    pub fn next(&mut self) -> Result<(), LibraryError> {
        Ok(self.songs.next()?)
    }

    /// # Errors
    ///
    /// [`SelectionError::NoSelection`] when nothing is selected.
    pub fn previous(&mut self) -> Result<(), LibraryError> {
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

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&SongRef> {
        self.songs.get(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.songs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    /// All songs in library order.
    pub fn songs(&self) -> std::slice::Iter<'_, SongRef> {
        self.songs.iter()
    }

    // --- rating ---------------------------------------------------------

    /// Raises the selected song's rating one step and publishes `SongRated`.
    ///
    /// # Errors
    ///
    /// [`SelectionError::NoSelection`] when nothing is selected.
    pub fn inc_rate_selected(&mut self) -> Result<(Rating, Rating), LibraryError> {
        self.rate_selected(|song| song.inc_rating())
    }

    /// Lowers the selected song's rating one step and publishes `SongRated`.
    ///
    /// # Errors
    ///
    /// [`SelectionError::NoSelection`] when nothing is selected.
    pub fn dec_rate_selected(&mut self) -> Result<(Rating, Rating), LibraryError> {
        self.rate_selected(|song| song.dec_rating())
    }

    fn rate_selected(
        &mut self,
        change: impl FnOnce(&song::Song),
    ) -> Result<(Rating, Rating), LibraryError> {
        let song = self.selected().cloned().ok_or(SelectionError::NoSelection)?;
        let before = song.rating();
        change(&song);
        let after = song.rating();
        debug!("Rated `{}': {before} -> {after}", song.title());
        self.emit(LibraryEventKind::SongRated { song, before, after });
        Ok((before, after))
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

    /// Plays the selected song, interrupting whatever is playing.
    ///
    /// # Errors
    ///
    /// [`SelectionError::NoSelection`] when nothing is selected, or the
    /// player's own failure.
    pub fn play(&mut self) -> Result<(), LibraryError> {
        let song = self.selected().cloned().ok_or(SelectionError::NoSelection)?;
        if self.is_playing() {
            self.stop()?;
        }
        self.player.load(song.locator())?;
        self.now_playing = Some(Rc::clone(&song));
        self.player.play()?;
        info!("Playing `{}'", song.title());
        Ok(())
    }

    /// The engine this library plays through. Playlists of the library play
    /// through it as well.
    pub fn player_mut(&mut self) -> &mut dyn Player {
        self.player.as_mut()
    }

    /// Stops the current song.
    ///
    /// # Errors
    ///
    /// [`LibraryError::NotPlaying`] when nothing is playing, or the player's
    /// own failure.
    pub fn stop(&mut self) -> Result<(), LibraryError> {
        let song = self.now_playing.take().ok_or(LibraryError::NotPlaying)?;
        debug!("Stopping `{}'", song.title());
        self.player.stop()?;
        Ok(())
    }

    /// Reacts to a notification from the playback engine.
    ///
    /// When a track ends its play count goes up; if it was also the selected
    /// song the cursor advances, and whatever is then selected starts playing.
    /// Notifications that arrive while nothing is playing are ignored.
    ///
    /// # Errors
    ///
    /// Failures from restarting playback on the next song.
    pub fn handle_player_state(&mut self, state: PlayerState) -> Result<(), LibraryError> {
        let Some(playing) = self.now_playing.clone() else {
            trace!("Ignoring {state:?}: nothing is playing");
            return Ok(());
        };
        match state {
            PlayerState::Ended => {
                playing.inc_play_count();
                debug!("`{}' ended, played {} times", playing.title(), playing.play_count());
                if self.selected().is_some_and(|selected| **selected == *playing) {
                    self.songs.next()?;
                }
                if self.some_selected() {
                    self.now_playing = None;
                    self.play()?;
                } else {
                    self.now_playing = None;
                }
            }
            PlayerState::Stopped => {
                debug!("Playback of `{}' stopped externally", playing.title());
                self.now_playing = None;
            }
        }
        Ok(())
    }

    // --- search ---------------------------------------------------------

    /// Songs whose title, genre, album or an artist fully matches the regular
    /// expression `pattern`, in library order.
    ///
    /// # Errors
    ///
    /// [`LibraryError::InvalidPattern`] when `pattern` does not compile.
    pub fn find_matches(&self, pattern: &str) -> Result<Vec<SongRef>, LibraryError> {
        let regex = song::full_match(pattern)?;
        Ok(self
            .songs
            .iter()
            .filter(|song| song.matches(&regex))
            .cloned()
            .collect())
    }

    // --- listeners ------------------------------------------------------

    /// Subscribes `listener` to this library's events. Notifications stop when
    /// it is unregistered or when its last strong handle is dropped.
    ///
    /// A listener that is still borrowed when an event is published misses
    /// that event; see [`EventBus::emit`].
    pub fn register_listener<L: LibraryListener + 'static>(
        &mut self,
        listener: &Rc<RefCell<L>>,
    ) -> ListenerId {
        let weak: Weak<RefCell<L>> = Rc::downgrade(listener);
        self.listeners.register(weak)
    }

    pub fn unregister_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.unregister(id)
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn emit(&self, kind: LibraryEventKind) {
        trace!("Publishing {kind:?}");
        let event = LibraryEvent {
            library: self,
            kind: &kind,
        };
        self.listeners.emit(|listener| listener.process_event(&event));
    }
}

impl fmt::Debug for MusicLibrary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MusicLibrary")
            .field("id", &self.id)
            .field("songs", &self.songs)
            .field("now_playing", &self.now_playing)
            .field("listeners", &self.listeners)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for MusicLibrary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.songs)
    }
}
