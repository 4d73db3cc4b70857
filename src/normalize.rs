//! Entity normalization.
//!
//! Turns raw catalog records into canonical, kind-prefixed entities. The two
//! artist representations (catalog ids resolved against the artist table, or
//! a legacy comma-joined name string) are resolved here once, so the builder
//! only ever sees `NormalizedArtist` values.

use crate::models::{ArtistRecord, NodeKind, PlaylistRecord, TrackRecord};
use regex::Regex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

pub const UNNAMED_PLAYLIST: &str = "Unnamed Playlist";
pub const UNKNOWN_TRACK: &str = "Unknown Track";
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

// ============================================================================
// Types
// ============================================================================

/// Where an artist's identity comes from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ArtistSource {
    /// Catalog artist id found in the artist table.
    Catalog(String),
    /// Slug of a display name from the legacy `artist` field.
    Legacy(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedGenre {
    pub node_id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedArtist {
    pub source: ArtistSource,
    pub node_id: String,
    pub name: String,
    pub genres: Vec<NormalizedGenre>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedTrack {
    pub node_id: String,
    pub uri: String,
    pub name: String,
    pub artists: Vec<NormalizedArtist>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedPlaylist {
    pub node_id: String,
    pub name: String,
    /// Track count as delivered, including tracks later skipped.
    pub track_count: usize,
    pub tracks: Vec<NormalizedTrack>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NormalizeReport {
    pub skipped_playlists: usize,
    pub skipped_tracks: usize,
    pub unresolved_artists: usize,
    pub skipped_artists: usize,
    pub skipped_genres: usize,
}

impl NormalizeReport {
    pub fn total_skipped(&self) -> usize {
        self.skipped_playlists
            + self.skipped_tracks
            + self.unresolved_artists
            + self.skipped_artists
            + self.skipped_genres
    }
}

#[derive(Debug, Clone, Default)]
pub struct Normalized {
    pub playlists: Vec<NormalizedPlaylist>,
    pub report: NormalizeReport,
}

// ============================================================================
// Key Helpers
// ============================================================================

fn separator_runs() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^a-z0-9]+").unwrap())
}

/// Lowercase, collapse every run of non `[a-z0-9]` characters into one `-`,
/// and trim separators from both ends. `"Hip Hop"` and `"hip-hop"` agree.
pub fn slugify(name: &str) -> String {
    let lower = name.to_lowercase();
    separator_runs()
        .replace_all(&lower, "-")
        .trim_matches('-')
        .to_string()
}

/// Identity key for a display name: its slug, or for names whose letters
/// are all outside `[a-z0-9]` (e.g. `坂本龍一`) a short digest of the
/// lowercased name. `None` when the name has no letters or digits at all.
pub fn name_key(name: &str) -> Option<String> {
    let slug = slugify(name);
    if !slug.is_empty() {
        return Some(slug);
    }
    let lower = name.trim().to_lowercase();
    if !lower.chars().any(char::is_alphanumeric) {
        return None;
    }
    let digest = format!("{:x}", Sha256::digest(lower.as_bytes()));
    Some(format!("name-{}", &digest[..12]))
}

/// Node id for a genre display name, or `None` when nothing survives.
pub fn genre_node_id(name: &str) -> Option<String> {
    name_key(name).map(|key| NodeKind::Genre.node_id(&key))
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn label_or(value: &Option<String>, fallback: &str) -> String {
    non_blank(value).unwrap_or(fallback).to_string()
}

// ============================================================================
// Normalizer
// ============================================================================

struct ArtistTable<'a> {
    by_id: HashMap<&'a str, NormalizedArtist>,
}

impl<'a> ArtistTable<'a> {
    fn new(artists: &'a [ArtistRecord], report: &mut NormalizeReport) -> Self {
        let mut by_id = HashMap::new();
        for artist in artists {
            let id = artist.id.trim();
            if id.is_empty() || by_id.contains_key(id) {
                continue;
            }
            let name = if artist.name.trim().is_empty() {
                UNKNOWN_ARTIST.to_string()
            } else {
                artist.name.trim().to_string()
            };
            let genres = normalize_genres(&artist.genres, report);
            by_id.insert(
                id,
                NormalizedArtist {
                    source: ArtistSource::Catalog(id.to_string()),
                    node_id: NodeKind::Artist.node_id(id),
                    name,
                    genres,
                },
            );
        }
        Self { by_id }
    }
}

fn normalize_genres(names: &[String], report: &mut NormalizeReport) -> Vec<NormalizedGenre> {
    let mut seen = HashSet::new();
    let mut genres = Vec::new();
    for name in names {
        match genre_node_id(name) {
            Some(node_id) => {
                if seen.insert(node_id.clone()) {
                    genres.push(NormalizedGenre {
                        node_id,
                        name: name.trim().to_string(),
                    });
                }
            }
            None => report.skipped_genres += 1,
        }
    }
    genres
}

fn resolve_artists(
    track: &TrackRecord,
    table: &ArtistTable<'_>,
    report: &mut NormalizeReport,
) -> Vec<NormalizedArtist> {
    let ids: Vec<&str> = track
        .artist_ids
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(|id| id.trim())
        .filter(|id| !id.is_empty())
        .collect();

    if !ids.is_empty() {
        let mut resolved = Vec::with_capacity(ids.len());
        for id in ids {
            match table.by_id.get(id) {
                Some(artist) => resolved.push(artist.clone()),
                None => {
                    tracing::debug!(artist_id = id, "artist missing from lookup table");
                    report.unresolved_artists += 1;
                }
            }
        }
        return resolved;
    }

    let Some(names) = non_blank(&track.artist) else {
        return Vec::new();
    };
    let mut resolved = Vec::new();
    for name in names.split(',').map(str::trim).filter(|n| !n.is_empty()) {
        let Some(key) = name_key(name) else {
            report.skipped_artists += 1;
            continue;
        };
        resolved.push(NormalizedArtist {
            node_id: NodeKind::Artist.node_id(&key),
            source: ArtistSource::Legacy(key),
            name: name.to_string(),
            genres: Vec::new(),
        });
    }
    resolved
}

/// Normalize a playlist collection against an artist lookup table.
///
/// Never fails: playlists without an id and tracks without a uri are dropped
/// and counted in the returned report.
pub fn normalize(playlists: &[PlaylistRecord], artists: &[ArtistRecord]) -> Normalized {
    let mut report = NormalizeReport::default();
    let table = ArtistTable::new(artists, &mut report);
    let mut out = Vec::with_capacity(playlists.len());

    for playlist in playlists {
        let Some(id) = non_blank(&playlist.id) else {
            report.skipped_playlists += 1;
            continue;
        };

        let mut tracks = Vec::with_capacity(playlist.tracks.len());
        for track in &playlist.tracks {
            let Some(uri) = non_blank(&track.uri) else {
                report.skipped_tracks += 1;
                continue;
            };
            tracks.push(NormalizedTrack {
                node_id: NodeKind::Song.node_id(uri),
                uri: uri.to_string(),
                name: label_or(&track.name, UNKNOWN_TRACK),
                artists: resolve_artists(track, &table, &mut report),
            });
        }

        out.push(NormalizedPlaylist {
            node_id: NodeKind::Playlist.node_id(id),
            name: label_or(&playlist.name, UNNAMED_PLAYLIST),
            track_count: playlist.tracks.len(),
            tracks,
        });
    }

    if report.total_skipped() > 0 {
        tracing::info!(
            skipped_playlists = report.skipped_playlists,
            skipped_tracks = report.skipped_tracks,
            unresolved_artists = report.unresolved_artists,
            "normalization skipped malformed entries"
        );
    }

    Normalized {
        playlists: out,
        report,
    }
}
