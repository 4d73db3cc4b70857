//! Catalog snapshots on disk.
//!
//! The fetch side drops JSON snapshots into a data directory:
//! - `playlists.json`: `[PlaylistRecord]`, required
//! - `artists.json`: `[ArtistRecord]`, optional
//! - `genres.json`: `[GenreRecord]`, optional; aggregated from the artists
//!   when absent
//!
//! The fingerprint is a hash of the raw file bytes. A changed fingerprint is
//! what "the input collections changed identity" means for a rebuild.

use crate::error::CatalogError;
use crate::models::{ArtistRecord, GenreRecord, PlaylistRecord};
use crate::normalize::genre_node_id;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use sha2::{Digest, Sha256};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

pub const PLAYLISTS_FILE: &str = "playlists.json";
pub const ARTISTS_FILE: &str = "artists.json";
pub const GENRES_FILE: &str = "genres.json";

#[derive(Debug, Clone)]
pub struct CatalogSnapshot {
    pub playlists: Vec<PlaylistRecord>,
    pub artists: Vec<ArtistRecord>,
    pub genres: Vec<GenreRecord>,
    pub fingerprint: String,
    pub loaded_at: DateTime<Utc>,
}

// ============================================================================
// Helpers
// ============================================================================

fn read_optional(path: &Path) -> Result<Option<Vec<u8>>, CatalogError> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(source) => Err(CatalogError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn parse<T: DeserializeOwned>(path: &Path, bytes: &[u8]) -> Result<T, CatalogError> {
    serde_json::from_slice(bytes).map_err(|source| CatalogError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// SHA-256 over the parts, each length-prefixed so boundaries count.
pub fn fingerprint(parts: &[&[u8]]) -> String {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update((part.len() as u64).to_le_bytes());
        hasher.update(part);
    }
    format!("{:x}", hasher.finalize())
}

/// Genre tally across artists: one count per artist listing the genre.
/// Spellings that normalize to the same genre are merged under the first
/// one seen. Sorted by count descending, then name.
pub fn aggregate_genres(artists: &[ArtistRecord]) -> Vec<GenreRecord> {
    let mut order: Vec<String> = Vec::new();
    let mut tally: HashMap<String, GenreRecord> = HashMap::new();
    for artist in artists {
        let mut seen = HashSet::new();
        for genre in &artist.genres {
            let Some(key) = genre_node_id(genre) else {
                continue;
            };
            if !seen.insert(key.clone()) {
                continue;
            }
            tally
                .entry(key.clone())
                .or_insert_with(|| {
                    order.push(key);
                    GenreRecord {
                        name: genre.trim().to_string(),
                        count: 0,
                    }
                })
                .count += 1;
        }
    }
    let mut genres: Vec<GenreRecord> = order
        .into_iter()
        .filter_map(|key| tally.remove(&key))
        .collect();
    genres.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    genres
}

// ============================================================================
// Loading
// ============================================================================

pub fn load_snapshot(dir: &Path) -> Result<CatalogSnapshot, CatalogError> {
    let playlists_path = dir.join(PLAYLISTS_FILE);
    let playlists_raw = fs::read(&playlists_path).map_err(|source| CatalogError::Io {
        path: playlists_path.clone(),
        source,
    })?;
    let playlists: Vec<PlaylistRecord> = parse(&playlists_path, &playlists_raw)?;

    let artists_path = dir.join(ARTISTS_FILE);
    let artists_raw = read_optional(&artists_path)?;
    let artists: Vec<ArtistRecord> = match &artists_raw {
        Some(bytes) => parse(&artists_path, bytes)?,
        None => Vec::new(),
    };

    let genres_path = dir.join(GENRES_FILE);
    let genres_raw = read_optional(&genres_path)?;
    let genres: Vec<GenreRecord> = match &genres_raw {
        Some(bytes) => parse(&genres_path, bytes)?,
        None => aggregate_genres(&artists),
    };

    let fingerprint = fingerprint(&[
        playlists_raw.as_slice(),
        artists_raw.as_deref().unwrap_or_default(),
        genres_raw.as_deref().unwrap_or_default(),
    ]);

    tracing::debug!(
        dir = %dir.display(),
        playlists = playlists.len(),
        artists = artists.len(),
        genres = genres.len(),
        %fingerprint,
        "catalog snapshot loaded"
    );

    Ok(CatalogSnapshot {
        playlists,
        artists,
        genres,
        fingerprint,
        loaded_at: Utc::now(),
    })
}
