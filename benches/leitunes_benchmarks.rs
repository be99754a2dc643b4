//! # LEITunes Performance Benchmarks
//!
//! Benchmarks of the paths every library change goes through.
//!
//! ## Benchmark Categories
//!
//! - **Library Population**: Adding songs with both smart playlists listening
//! - **Rating Churn**: Re-rating songs, driving most-liked admissions and evictions
//! - **Removal Backfill**: Removing members and pulling replacements back in
//! - **Search**: Full-match regular expression search over the library
//!
//! ## Running Benchmarks
//!
//! ```bash
//! # Run all benchmarks
//! cargo bench
//!
//! # Run specific benchmark group
//! cargo bench library_population
//! cargo bench rating_churn
//! ```

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use leitunes::library::MusicLibrary;
use leitunes::player::LoggingPlayer;
use leitunes::playlist_set::PlaylistSet;
use leitunes::song::{Song, SongMeta};
use std::hint::black_box;

/// Helper function to create test songs with a spread of artists and albums
fn create_test_songs(count: usize) -> Vec<Song> {
    (1..=count)
        .map(|i| {
            Song::new(
                format!("/music/Artist{}/Album{}/Song{i:04}.flac", (i - 1) / 50 + 1, (i - 1) / 10 + 1),
                SongMeta::new(
                    format!("Song {i:04}"),
                    format!("Album {}", (i - 1) / 10 + 1),
                    if i % 3 == 0 { "Jazz" } else { "Rock" },
                    vec![format!("Artist {}", (i - 1) / 50 + 1)],
                ),
            )
        })
        .collect()
}

/// Helper function to create a library with its playlists already listening
fn create_library(songs: Vec<Song>) -> (MusicLibrary, PlaylistSet) {
    let mut library = MusicLibrary::new(Box::new(LoggingPlayer::new()));
    let playlists = PlaylistSet::new(&mut library, 5);
    for song in songs {
        library.add(song);
    }
    (library, playlists)
}

/// Benchmark adding songs to a library with smart playlists attached
fn benchmark_library_population(c: &mut Criterion) {
    let mut group = c.benchmark_group("library_population");

    for size in [10, 100, 1000] {
        group.bench_with_input(BenchmarkId::new("add_songs", size), &size, |b, &size| {
            b.iter_batched(
                || create_test_songs(size),
                |songs| black_box(create_library(songs)),
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

/// Benchmark rating changes flowing into the most-liked playlist
fn benchmark_rating_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("rating_churn");

    for size in [100, 1000] {
        group.bench_with_input(BenchmarkId::new("rate_every_song", size), &size, |b, &size| {
            b.iter_batched(
                || create_library(create_test_songs(size)),
                |(mut library, playlists)| {
                    for index in 0..library.len() {
                        library.select(index).unwrap();
                        for _ in 0..(index % 5 + 1) {
                            library.inc_rate_selected().unwrap();
                        }
                    }
                    // demote the top songs so replacement searches kick in
                    for index in (0..library.len()).rev().take(10) {
                        library.select(index).unwrap();
                        library.dec_rate_selected().unwrap();
                    }
                    black_box((library, playlists))
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

/// Benchmark removals that trigger backfill in both smart playlists
fn benchmark_removal_backfill(c: &mut Criterion) {
    let mut group = c.benchmark_group("removal_backfill");

    group.bench_function("remove_newest_100_of_1000", |b| {
        b.iter_batched(
            || create_library(create_test_songs(1000)),
            |(mut library, playlists)| {
                for _ in 0..100 {
                    library.select(library.len() - 1).unwrap();
                    library.remove().unwrap();
                }
                black_box((library, playlists))
            },
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

/// Benchmark library search
fn benchmark_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");
    let (library, _playlists) = create_library(create_test_songs(1000));

    for pattern in ["Jazz", "Artist 1.*", "Song 0(1|2)..", "nothing"] {
        group.bench_with_input(BenchmarkId::new("find_matches", pattern), &pattern, |b, pattern| {
            b.iter(|| library.find_matches(black_box(pattern)).unwrap())
        });
    }

    group.finish();
}

// Group all benchmarks
criterion_group!(
    benches,
    benchmark_library_population,
    benchmark_rating_churn,
    benchmark_removal_backfill,
    benchmark_search
);

criterion_main!(benches);
