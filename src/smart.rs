//! # Smart playlist policies
//!
//! A smart playlist is a [`Playlist`](crate::playlist::Playlist) whose
//! membership is curated by a [`SmartPolicy`]. The policy only makes
//! decisions; the playlist's maintenance routine applies them:
//!
//! 1. an event yields an admission candidate ([`SmartPolicy::candidate`])
//! 2. the candidate is set-added; above `target_size` one member is evicted
//!    ([`SmartPolicy::eviction_index`])
//! 3. a rejected candidate may pull in a better song instead
//!    ([`SmartPolicy::replacement`])
//! 4. after a removal leaves the view short, one song is pulled back in
//!    ([`SmartPolicy::backfill`])
//!
//! ## Most liked
//!
//! Top-N by rating, fed by rating changes. The lowest rated member (first one
//! on ties) is evicted. Neither replacement nor backfill looks for the best
//! song: replacement takes the *last* non-member in library order rated above
//! the rejected song, backfill the *first* one rated above the removed song.
//!
//! ## Most recently added
//!
//! Last-N by insertion, fed by additions, evicting the oldest member.
//! Backfill walks the library from its end and takes the first non-member.

use crate::library::{LibraryEventKind, MusicLibrary};
use crate::song::SongRef;
use serde::{Deserialize, Serialize};
use std::rc::Rc;

/// Member count smart playlists converge to unless configured otherwise.
pub const DEFAULT_SMART_SIZE: usize = 5;

/// Which songs a smart playlist keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SmartRule {
    MostLiked,
    MostRecentlyAdded,
}

/// Curation policy: a rule plus the size the view is kept at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SmartPolicy {
    pub rule: SmartRule,
    pub target_size: usize,
}

impl SmartPolicy {
    #[must_use]
    pub const fn most_liked(target_size: usize) -> Self {
        Self {
            rule: SmartRule::MostLiked,
            target_size,
        }
    }

    #[must_use]
    pub const fn most_recently_added(target_size: usize) -> Self {
        Self {
            rule: SmartRule::MostRecentlyAdded,
            target_size,
        }
    }

    /// Display name of playlists following this policy.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self.rule {
            SmartRule::MostLiked => "Most Liked",
            SmartRule::MostRecentlyAdded => "Most Recently Added",
        }
    }

    /// The song an event proposes for admission, if this policy reacts to it.
    /// Re-ratings that leave the rating unchanged propose nothing.
    #[must_use]
    pub fn candidate<'a>(&self, kind: &'a LibraryEventKind) -> Option<&'a SongRef> {
        match (self.rule, kind) {
            (SmartRule::MostLiked, LibraryEventKind::SongRated { song, before, after })
                if before != after =>
            {
                Some(song)
            }
            (SmartRule::MostRecentlyAdded, LibraryEventKind::SongAdded(song)) => Some(song),
            _ => None,
        }
    }

    /// Member to drop once the view has grown past `target_size`.
    #[must_use]
    pub fn eviction_index(&self, members: &[SongRef]) -> Option<usize> {
        if members.is_empty() {
            return None;
        }
        match self.rule {
            SmartRule::MostLiked => lowest_rated_index(members),
            SmartRule::MostRecentlyAdded => Some(0),
        }
    }

    /// Song to admit in place of `rejected`, a candidate that was already a
    /// member.
    ///
    /// For most liked: only when `rejected` is the lowest rated member, the
    /// last non-member in library order rated above it.
    #[must_use]
    pub fn replacement(
        &self,
        rejected: &SongRef,
        members: &[SongRef],
        library: &MusicLibrary,
    ) -> Option<SongRef> {
        match self.rule {
            SmartRule::MostLiked => {
                let lowest = lowest_rated_index(members)?;
                if members[lowest] != *rejected {
                    return None;
                }
                rated_above(rejected, members, library).next_back()
            }
            SmartRule::MostRecentlyAdded => None,
        }
    }

    /// Song to pull in after `removed` left the library and the view fell
    /// below `target_size`. `removed` itself is never proposed.
    #[must_use]
    pub fn backfill(
        &self,
        removed: &SongRef,
        members: &[SongRef],
        library: &MusicLibrary,
    ) -> Option<SongRef> {
        if members.len() >= self.target_size {
            return None;
        }
        match self.rule {
            SmartRule::MostLiked => rated_above(removed, members, library).next(),
            SmartRule::MostRecentlyAdded => library
                .songs()
                .rev()
                .find(|song| !Rc::ptr_eq(song, removed) && !members.contains(song))
                .cloned(),
        }
    }
}

/// Index of the lowest rated song; the first one wins ties.
#[must_use]
pub fn lowest_rated_index(songs: &[SongRef]) -> Option<usize> {
    songs
        .iter()
        .enumerate()
        .fold(None, |lowest: Option<(usize, &SongRef)>, (index, song)| match lowest {
            Some((_, current)) if current.rating() <= song.rating() => lowest,
            _ => Some((index, song)),
        })
        .map(|(index, _)| index)
}

/// Non-members rated strictly above `reference`, in library order.
fn rated_above<'a>(
    reference: &SongRef,
    members: &'a [SongRef],
    library: &'a MusicLibrary,
) -> impl DoubleEndedIterator<Item = SongRef> + 'a {
    let floor = reference.rating();
    library
        .songs()
        .filter(move |song| song.rating() > floor && !members.contains(song))
        .cloned()
}
