//! # Command-Line Interface Module
//!
//! This module defines the command-line interface for LEITunes using Clap
//! derive macros.
//!
//! ## Commands
//!
//! - `scan`: Load a music directory and print the library with its playlists
//! - `search`: Load a music directory and list the songs matching a pattern
//! - `run`: Execute a session script against a library
//! - `completion`: Generate shell completions
//!
//! ## Examples
//!
//! ```bash
//! leitunes scan /home/user/Music --json
//! leitunes search /home/user/Music 'Miles.*'
//! leitunes run evening.txt --music-dir /home/user/Music
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Shell types supported for completion generation
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    /// Bash shell
    Bash,
    /// Zsh shell
    Zsh,
    /// Fish shell
    Fish,
    /// PowerShell
    PowerShell,
    /// Elvish shell
    Elvish,
}

/// Main application arguments structure.
#[derive(Parser, Debug)]
#[command(name = "leitunes")]
#[command(about = "LEITunes: a music library with manual and smart playlists")]
#[command(version)]
pub struct Args {
    /// Configuration file to use instead of the platform default
    #[arg(long, global = true, env = "LEITUNES_CONFIG")]
    pub config: Option<PathBuf>,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Enumeration of all available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load a music directory and show the library and smart playlists
    ///
    /// Every supported audio file below the directory is read and added in
    /// path order. Files without readable tags are skipped with a warning.
    Scan {
        /// Root of the music collection
        path: PathBuf,

        /// Print a JSON summary instead of the text listing
        #[arg(long)]
        json: bool,
    },

    /// List the songs of a music directory matching a regular expression
    ///
    /// A song matches when its title, album, genre or one of its artists
    /// matches the whole pattern.
    Search {
        /// Root of the music collection
        path: PathBuf,

        /// Regular expression to match
        pattern: String,
    },

    /// Execute a session script, one command per line
    ///
    /// Commands: add, select, next, previous, deselect, remove, rate+, rate-,
    /// play, stop, ended, stopped, search, show and the playlist
    /// subcommands new, select, remove, add, up and pick.
    Run {
        /// Script file to execute
        script: PathBuf,

        /// Music directory to load before the script runs
        #[arg(long)]
        music_dir: Option<PathBuf>,
    },

    /// Generate shell completions
    ///
    /// Outputs shell completion script for the specified shell.
    /// Install the output to your shell's completion directory.
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_scan() {
        let args = Args::parse_from(["leitunes", "scan", "/music", "--json"]);
        match args.command {
            Command::Scan { path, json } => {
                assert_eq!(path, PathBuf::from("/music"));
                assert!(json);
            }
            other => panic!("unexpected command {other:?}"),
        }
        assert!(args.config.is_none());
    }

    #[test]
    fn test_global_config_after_subcommand() {
        let args = Args::parse_from([
            "leitunes",
            "run",
            "script.txt",
            "--music-dir",
            "/music",
            "--config",
            "/tmp/leitunes.json",
        ]);
        assert_eq!(args.config, Some(PathBuf::from("/tmp/leitunes.json")));
        assert!(matches!(
            args.command,
            Command::Run { music_dir: Some(_), .. }
        ));
    }

    #[test]
    fn test_search_requires_pattern() {
        assert!(Args::try_parse_from(["leitunes", "search", "/music"]).is_err());
    }
}
