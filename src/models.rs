//! Data models for the playlist graph.
//!
//! This module contains the catalog records delivered by the data-fetch side,
//! the typed nodes and edges the builder produces, and the render contract
//! handed to whichever drawing backend is in use.

use serde::{Deserialize, Serialize};

// ============================================================================
// Catalog Records
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub tracks: Vec<TrackRecord>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TrackRecord {
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    /// Legacy form: display names joined with ", ".
    #[serde(default)]
    pub artist: Option<String>,
    /// Rich form: catalog artist ids, resolved against the artist table.
    #[serde(default)]
    pub artist_ids: Option<Vec<String>>,
    #[serde(default)]
    pub album: Option<String>,
    #[serde(default)]
    pub duration: Option<u64>, // milliseconds
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ArtistRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub genres: Vec<String>,
}

/// Aggregate hint from the fetch side. Only used for tooltip text.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GenreRecord {
    pub name: String,
    pub count: usize,
}

// ============================================================================
// Graph Node / Edge Types
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Playlist,
    Song,
    Artist,
    Genre,
}

impl NodeKind {
    pub const ALL: [NodeKind; 4] = [
        NodeKind::Playlist,
        NodeKind::Song,
        NodeKind::Artist,
        NodeKind::Genre,
    ];

    /// Id prefix that keeps the four kinds apart in one id space.
    pub fn prefix(self) -> &'static str {
        match self {
            NodeKind::Playlist => "p_",
            NodeKind::Song => "s_",
            NodeKind::Artist => "a_",
            NodeKind::Genre => "g_",
        }
    }

    pub fn node_id(self, key: &str) -> String {
        format!("{}{}", self.prefix(), key)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Playlist => "playlist",
            NodeKind::Song => "song",
            NodeKind::Artist => "artist",
            NodeKind::Genre => "genre",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EdgeKind {
    PlaylistSong,
    SongArtist,
    ArtistGenre,
    /// Derived song -> genre shortcut across the artist layer.
    SongGenre,
}

impl EdgeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EdgeKind::PlaylistSong => "playlist-song",
            EdgeKind::SongArtist => "song-artist",
            EdgeKind::ArtistGenre => "artist-genre",
            EdgeKind::SongGenre => "song-genre",
        }
    }

    /// Edge identity is the ordered (source, target, relation) triple.
    pub fn edge_id(self, from: &str, to: &str) -> String {
        format!("{}-{}-{}", from, to, self.as_str())
    }

    /// Kind of the source endpoint; edges take their base color from it.
    pub fn source_kind(self) -> NodeKind {
        match self {
            EdgeKind::PlaylistSong => NodeKind::Playlist,
            EdgeKind::SongArtist | EdgeKind::SongGenre => NodeKind::Song,
            EdgeKind::ArtistGenre => NodeKind::Artist,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GraphNode {
    pub id: String,
    pub kind: NodeKind,
    pub label: String,
    pub title: String, // Tooltip text
    pub degree: usize, // Sizing signal, see sizing.rs
    pub size: f64,
    pub color: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GraphEdge {
    pub id: String,
    pub kind: EdgeKind,
    pub from: String,
    pub to: String,
    pub color: String,
    pub width: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GraphStats {
    pub total_nodes: usize,
    pub total_edges: usize,
    pub playlists: usize,
    pub songs: usize,
    pub artists: usize,
    pub genres: usize,
    pub shortcut_edges: usize, // SongGenre edges
    pub skipped_playlists: usize,
    pub skipped_tracks: usize,
    pub unresolved_artists: usize,
    pub max_song_playlists: usize, // Most-shared song
    pub avg_degree: f64,
}

// ============================================================================
// Render Contract
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RenderNode {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub size: f64,
    pub color: String,
    pub hidden: bool,
    pub title: String,
    pub show_label: bool,
    pub z: i32, // Draw order, higher on top
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RenderEdge {
    pub id: String,
    pub from: String,
    pub to: String,
    #[serde(rename = "type")]
    pub kind: EdgeKind,
    pub hidden: bool,
    pub color: String,
    pub size: f64,
    /// Touches the selected node.
    pub emphasis: bool,
}
