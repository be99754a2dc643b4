//! In-memory music library with manual and self-maintaining playlists.
//!
//! Core modules:
//! - [`selection`] - Ordered collection with a single selection cursor
//! - [`events`] - Listener registry with synchronous fan-out
//! - [`library`] - The canonical song collection, ratings and playback bookkeeping
//! - [`playlist`] - Manual and smart playlists, repaired on library changes
//! - [`smart`] - Curation policies of the smart playlists
//! - [`playlist_set`] - The playlists of one library
//!
//! ### Supporting Modules
//!
//! - [`song`] - Songs, metadata and the rating scale
//! - [`song_factory`] - Songs from audio file tags, directory scanning
//! - [`player`] - Playback engine interface
//! - [`session`] - Line-oriented command language over a library
//! - [`config`] - Runtime configuration
//! - [`cli`] - Command-line interface definitions with clap integration
//! - [`completion`] - Shell completion generation
//! - [`error`] - Typed failures of the core
//!
//! ## Quick Start Example
//!
//! ```
//! use leitunes::library::MusicLibrary;
//! use leitunes::player::LoggingPlayer;
//! use leitunes::playlist_set::PlaylistSet;
//! use leitunes::song::{Rating, Song, SongMeta};
//!
//! let mut library = MusicLibrary::new(Box::new(LoggingPlayer::new()));
//! let playlists = PlaylistSet::new(&mut library, 5);
//!
//! library.add(Song::new(
//!     "/music/so_what.flac",
//!     SongMeta::new("So What", "Kind of Blue", "Jazz", vec!["Miles Davis".into()]),
//! ));
//! library.inc_rate_selected()?;
//!
//! let liked = playlists.find("Most Liked").unwrap().borrow();
//! assert_eq!(liked.get(0).unwrap().rating(), Rating::Terrible);
//! # Ok::<(), leitunes::error::LibraryError>(())
//! ```
//!
//! ## Smart Playlists
//!
//! Smart playlists are never recomputed from scratch. Every library change is
//! published to them as it happens and each one updates its membership
//! incrementally:
//!
//! - **Most Liked** keeps the top N songs by rating, reacting to rating changes
//! - **Most Recently Added** keeps the last N songs added to the library
//!
//! When a member leaves the library, the playlist pulls in a replacement if
//! one qualifies.
//!
//! ## Error Handling
//!
//! The core reports precondition violations as typed errors
//! ([`error::SelectionError`], [`error::LibraryError`],
//! [`error::PlaylistError`]). Configuration, file access and the command line
//! use `anyhow::Result` with context.

pub mod cli;
pub mod completion;
pub mod config;
pub mod error;
pub mod events;
pub mod library;
pub mod player;
pub mod playlist;
pub mod playlist_set;
pub mod selection;
pub mod session;
pub mod smart;
pub mod song;
pub mod song_factory;

pub use error::{LibraryError, PlaylistError, SelectionError};
pub use library::MusicLibrary;
pub use playlist::Playlist;
pub use playlist_set::PlaylistSet;
pub use song::{Rating, Song, SongRef};
