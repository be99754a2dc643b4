//! # Interactive session
//!
//! A [`Session`] bundles a library, its playlists and a song factory, and
//! drives them through a small line-oriented command language:
//!
//! ```text
//! add <path>             add a song file to the library
//! select <i> | next | previous | deselect
//! remove                 remove the selected library song
//! rate+ | rate-          rate the selected library song
//! play | stop            control playback of the selected song
//! ended | stopped        simulate playback engine notifications
//! search <regex>         list songs with a field matching the pattern
//! playlist new <name>    create and select a manual playlist
//! playlist select <i>    select a playlist
//! playlist remove        remove the selected playlist
//! playlist add           add the selected library song to the selected playlist
//! playlist drop          remove the selected song from the selected playlist
//! playlist up <i>        move the selected song of the selected playlist up
//! playlist pick <i>      select a song inside the selected playlist
//! playlist next | playlist previous
//! playlist play          play the selected song of the selected playlist
//! playlist stop          stop every playing playlist
//! show                   print library and playlists
//! ```
//!
//! Blank lines and lines starting with `#` are ignored.
//!
//! The library and its playlists share one playback engine, so starting one
//! of them stops the other, and engine notifications reach both.

use crate::config::RuntimeConfig;
use crate::library::MusicLibrary;
use crate::player::{LoggingPlayer, Player, PlayerState};
use crate::playlist::PlaylistKind;
use crate::playlist_set::{PlaylistRef, PlaylistSet};
use crate::smart::SmartPolicy;
use crate::song::{Rating, SongRef};
use crate::song_factory::{scan_directory, SongFactory, TagSongFactory};
use anyhow::{anyhow, bail, Context, Result};
use log::{debug, info, warn};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};

/// One parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Add(PathBuf),
    Select(usize),
    Next,
    Previous,
    Deselect,
    Remove,
    RateUp,
    RateDown,
    Play,
    Stop,
    Ended,
    Stopped,
    Search(String),
    PlaylistNew(String),
    PlaylistSelect(usize),
    PlaylistRemove,
    PlaylistAdd,
    PlaylistDrop,
    PlaylistUp(usize),
    PlaylistPick(usize),
    PlaylistNext,
    PlaylistPrevious,
    PlaylistPlay,
    PlaylistStop,
    Show,
}

impl SessionCommand {
    /// Parses one line. Returns `None` for blank lines and comments.
    ///
    /// # Errors
    ///
    /// Unknown commands and missing or malformed arguments.
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }
        let (word, rest) = split_word(line);

        let command = match word {
            "add" => Self::Add(PathBuf::from(required(rest, "add <path>")?)),
            "select" => Self::Select(index(rest, "select <index>")?),
            "next" => Self::Next,
            "previous" => Self::Previous,
            "deselect" => Self::Deselect,
            "remove" => Self::Remove,
            "rate+" => Self::RateUp,
            "rate-" => Self::RateDown,
            "play" => Self::Play,
            "stop" => Self::Stop,
            "ended" => Self::Ended,
            "stopped" => Self::Stopped,
            "search" => Self::Search(required(rest, "search <pattern>")?.to_owned()),
            "show" => Self::Show,
            "playlist" => Self::parse_playlist(rest)?,
            other => bail!("Unknown command `{other}'"),
        };
        Ok(Some(command))
    }

    fn parse_playlist(args: &str) -> Result<Self> {
        let (word, rest) = split_word(args);
        Ok(match word {
            "new" => Self::PlaylistNew(required(rest, "playlist new <name>")?.to_owned()),
            "select" => Self::PlaylistSelect(index(rest, "playlist select <index>")?),
            "remove" => Self::PlaylistRemove,
            "add" => Self::PlaylistAdd,
            "drop" => Self::PlaylistDrop,
            "next" => Self::PlaylistNext,
            "previous" => Self::PlaylistPrevious,
            "play" => Self::PlaylistPlay,
            "stop" => Self::PlaylistStop,
            "up" => Self::PlaylistUp(index(rest, "playlist up <index>")?),
            "pick" => Self::PlaylistPick(index(rest, "playlist pick <index>")?),
            "" => bail!("Missing playlist subcommand"),
            other => bail!("Unknown playlist subcommand `{other}'"),
        })
    }
}

fn split_word(line: &str) -> (&str, &str) {
    match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    }
}

fn required<'a>(arg: &'a str, usage: &str) -> Result<&'a str> {
    if arg.is_empty() {
        bail!("Missing argument, usage: {usage}");
    }
    Ok(arg)
}

fn index(arg: &str, usage: &str) -> Result<usize> {
    required(arg, usage)?
        .parse()
        .with_context(|| format!("Invalid index `{arg}', usage: {usage}"))
}

/// Serializable snapshot of a session, printed by `scan --json`.
#[derive(Debug, Serialize)]
pub struct SessionSummary {
    pub songs: Vec<SongSummary>,
    pub playlists: Vec<PlaylistSummary>,
}

#[derive(Debug, Serialize)]
pub struct SongSummary {
    pub locator: String,
    pub title: String,
    pub album: String,
    pub genre: String,
    pub artists: Vec<String>,
    pub rating: Rating,
    pub play_count: u32,
}

impl From<&SongRef> for SongSummary {
    fn from(song: &SongRef) -> Self {
        Self {
            locator: song.locator().to_owned(),
            title: song.title().to_owned(),
            album: song.album().to_owned(),
            genre: song.genre().to_owned(),
            artists: song.artists().to_vec(),
            rating: song.rating(),
            play_count: song.play_count(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PlaylistSummary {
    pub name: String,
    pub smart: bool,
    /// Curation policy of a smart playlist.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy: Option<SmartPolicy>,
    /// Member locators in playlist order.
    pub songs: Vec<String>,
}

impl From<&PlaylistRef> for PlaylistSummary {
    fn from(playlist: &PlaylistRef) -> Self {
        let playlist = playlist.borrow();
        Self {
            name: playlist.name().to_owned(),
            smart: playlist.is_smart(),
            policy: match playlist.kind() {
                PlaylistKind::Smart(policy) => Some(policy),
                PlaylistKind::Manual => None,
            },
            songs: playlist.iter().map(|s| s.locator().to_owned()).collect(),
        }
    }
}

/// A library, its playlists and the factory that feeds it.
pub struct Session {
    library: MusicLibrary,
    playlists: PlaylistSet,
    factory: Box<dyn SongFactory>,
}

impl Session {
    pub fn new(
        factory: Box<dyn SongFactory>,
        player: Box<dyn Player>,
        smart_playlist_size: usize,
    ) -> Self {
        let mut library = MusicLibrary::new(player);
        let playlists = PlaylistSet::new(&mut library, smart_playlist_size);
        Self {
            library,
            playlists,
            factory,
        }
    }

    /// Session reading real tags and playing through a [`LoggingPlayer`].
    #[must_use]
    pub fn from_config(config: &RuntimeConfig) -> Self {
        Self::new(
            Box::new(TagSongFactory::from_config(config)),
            Box::new(LoggingPlayer::new()),
            config.smart_playlist_size,
        )
    }

    #[must_use]
    pub const fn library(&self) -> &MusicLibrary {
        &self.library
    }

    #[must_use]
    pub const fn playlists(&self) -> &PlaylistSet {
        &self.playlists
    }

    /// Adds every audio file under `root` to the library. Files the factory
    /// cannot read are skipped.
    ///
    /// Returns the number of songs added.
    ///
    /// # Errors
    ///
    /// `root` cannot be scanned.
    pub fn load_directory(&mut self, root: &Path, extensions: &[String]) -> Result<usize> {
        let files = scan_directory(root, extensions)?;
        let before = self.library.len();
        for file in &files {
            self.library.add_from(self.factory.as_ref(), file);
        }
        let added = self.library.len() - before;
        info!(
            "Loaded {added} of {} files from {}",
            files.len(),
            root.display()
        );
        Ok(added)
    }

    /// Parses and executes one line, returning any text it produced.
    ///
    /// # Errors
    ///
    /// Parse failures and failed operations.
    pub fn execute_line(&mut self, line: &str) -> Result<Option<String>> {
        match SessionCommand::parse(line)? {
            Some(command) => {
                debug!("Executing {command:?}");
                self.execute(command)
            }
            None => Ok(None),
        }
    }

    /// Runs `script` line by line, writing command output to `out`. Stops at
    /// the first failing line.
    ///
    /// # Errors
    ///
    /// The first failing line, with its line number.
    pub fn run_script<W: Write>(&mut self, script: &str, out: &mut W) -> Result<()> {
        for (number, line) in script.lines().enumerate() {
            let output = self
                .execute_line(line)
                .with_context(|| format!("Line {}: `{}'", number + 1, line.trim()))?;
            if let Some(text) = output {
                writeln!(out, "{text}")?;
            }
        }
        Ok(())
    }

    /// Executes a parsed command.
    ///
    /// # Errors
    ///
    /// Failed library or playlist operations.
    pub fn execute(&mut self, command: SessionCommand) -> Result<Option<String>> {
        match command {
            SessionCommand::Add(path) => {
                if self.library.add_from(self.factory.as_ref(), &path).is_none() {
                    warn!("Nothing added for {}", path.display());
                }
            }
            SessionCommand::Select(index) => self.library.select(index)?,
            SessionCommand::Next => self.library.next()?,
            SessionCommand::Previous => self.library.previous()?,
            SessionCommand::Deselect => self.library.deselect(),
            SessionCommand::Remove => {
                self.library.remove()?;
            }
            SessionCommand::RateUp => {
                self.library.inc_rate_selected()?;
            }
            SessionCommand::RateDown => {
                self.library.dec_rate_selected()?;
            }
            SessionCommand::Play => {
                if !self.library.some_selected() {
                    bail!("No library song is selected");
                }
                if self.playlists.is_playing() {
                    self.playlists.stop(self.library.player_mut())?;
                }
                self.library.play()?;
            }
            SessionCommand::Stop => self.library.stop()?,
            SessionCommand::Ended => self.notify_player_state(PlayerState::Ended)?,
            SessionCommand::Stopped => self.notify_player_state(PlayerState::Stopped)?,
            SessionCommand::Search(pattern) => {
                let matches = self.library.find_matches(&pattern)?;
                let text = matches
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("\n");
                return Ok(Some(text));
            }
            SessionCommand::PlaylistNew(name) => {
                self.playlists.add_manual(&mut self.library, &name);
            }
            SessionCommand::PlaylistSelect(index) => self.playlists.select(index)?,
            SessionCommand::PlaylistRemove => {
                self.playlists.remove(&mut self.library)?;
            }
            SessionCommand::PlaylistAdd => {
                let song = self
                    .library
                    .selected()
                    .cloned()
                    .context("No library song is selected")?;
                let playlist = self.selected_playlist()?;
                let mut playlist = playlist.borrow_mut();
                if !playlist.add(song) {
                    warn!("Playlist `{}' did not take the song", playlist.name());
                }
            }
            SessionCommand::PlaylistDrop => {
                let song = self.selected_playlist()?.borrow_mut().remove()?;
                debug!("Dropped `{}' from the selected playlist", song.title());
            }
            SessionCommand::PlaylistNext => {
                self.selected_playlist()?.borrow_mut().next()?;
            }
            SessionCommand::PlaylistPrevious => {
                self.selected_playlist()?.borrow_mut().previous()?;
            }
            SessionCommand::PlaylistPlay => {
                if !self.playlists.some_song_selected() {
                    bail!("No playlist song is selected");
                }
                if self.library.is_playing() {
                    self.library.stop()?;
                }
                self.playlists.play(self.library.player_mut())?;
            }
            SessionCommand::PlaylistStop => {
                self.playlists.stop(self.library.player_mut())?;
            }
            SessionCommand::PlaylistUp(target) => {
                self.selected_playlist()?.borrow_mut().move_up_selected(target)?;
            }
            SessionCommand::PlaylistPick(index) => {
                self.selected_playlist()?.borrow_mut().select(index)?;
            }
            SessionCommand::Show => return Ok(Some(self.to_string())),
        }
        Ok(None)
    }

    fn notify_player_state(&mut self, state: PlayerState) -> Result<()> {
        self.library.handle_player_state(state)?;
        self.playlists
            .handle_player_state(state, self.library.player_mut())?;
        Ok(())
    }

    fn selected_playlist(&self) -> Result<&PlaylistRef> {
        self.playlists
            .selected()
            .ok_or_else(|| anyhow!("No playlist is selected"))
    }

    #[must_use]
    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            songs: self.library.songs().map(SongSummary::from).collect(),
            playlists: self.playlists.iter().map(PlaylistSummary::from).collect(),
        }
    }
}

impl std::fmt::Display for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "*-- Library --*{}{}", self.library, self.playlists)
    }
}
