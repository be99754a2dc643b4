//! # LEITunes
//!
//! Command-line front end for the LEITunes music library: loads a music
//! directory, keeps the "Most Liked" and "Most Recently Added" smart playlists
//! up to date, and runs scripted sessions against it.
//!
//! ## Usage
//!
//! ```bash
//! # Show a library and its smart playlists
//! leitunes scan /path/to/music
//!
//! # Machine-readable summary
//! leitunes scan /path/to/music --json
//!
//! # Search titles, albums, genres and artists
//! leitunes search /path/to/music 'Jazz|Blues'
//!
//! # Run a session script
//! leitunes run session.txt --music-dir /path/to/music
//! ```

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use leitunes::cli::{Args, Command};
use leitunes::completion;
use leitunes::config::RuntimeConfig;
use leitunes::session::Session;
use log::{debug, info};
use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// Loads `dir` into a fresh session built from `config`.
fn load_session(config: &RuntimeConfig, dir: &Path) -> Result<Session> {
    let mut session = Session::from_config(config);
    let added = session
        .load_directory(dir, &config.extensions)
        .with_context(|| format!("Failed to load music from {}", dir.display()))?;
    info!("Library holds {added} songs");
    Ok(session)
}

/// Main entry point for the LEITunes application.
///
/// Logging is controlled via `RUST_LOG`:
/// - `RUST_LOG=debug leitunes run script.txt` - Every executed command
/// - `RUST_LOG=leitunes::playlist=trace leitunes scan ~/Music` - Playlist maintenance
fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let config = RuntimeConfig::load(args.config.as_deref())?;
    debug!("Using {config:?}");

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match args.command {
        Command::Scan { path, json } => {
            let session = load_session(&config, &path)?;
            if json {
                serde_json::to_writer_pretty(&mut out, &session.summary())?;
                writeln!(out)?;
            } else {
                writeln!(out, "{session}")?;
            }
        }
        Command::Search { path, pattern } => {
            let session = load_session(&config, &path)?;
            let matches = session.library().find_matches(&pattern)?;
            for song in &matches {
                writeln!(out, "{} ({})", song, song.locator())?;
            }
            info!("{} songs match `{pattern}'", matches.len());
        }
        Command::Run { script, music_dir } => {
            let text = fs::read_to_string(&script)
                .with_context(|| format!("Failed to read script {}", script.display()))?;
            let mut session = match music_dir {
                Some(dir) => load_session(&config, &dir)?,
                None => Session::from_config(&config),
            };
            session.run_script(&text, &mut out)?;
        }
        Command::Completion { shell } => {
            let mut cmd = Args::command();
            completion::generate_completions(
                completion::shell_to_completion_shell(shell),
                &mut cmd,
                &mut out,
            );
        }
    }

    Ok(())
}
