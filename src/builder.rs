//! Graph construction.
//!
//! A `GraphBuilder` lives for exactly one build. It deduplicates nodes and
//! edges by id, counts degrees inline as edges are first created, and keeps a
//! song -> genre side table from which the SongGenre shortcut edges are
//! synthesized once every playlist has been scanned. Sizing runs afterwards
//! as a separate pass (see `sizing`).

use crate::config::EngineConfig;
use crate::models::{
    ArtistRecord, EdgeKind, GenreRecord, GraphEdge, GraphNode, GraphStats, NodeKind,
    PlaylistRecord,
};
use crate::normalize::{self, genre_node_id, NormalizeReport, NormalizedPlaylist};
use crate::sizing;
use std::collections::{BTreeSet, HashMap, HashSet};

#[cfg(test)]
#[path = "builder_test.rs"]
mod builder_test;

// ============================================================================
// Graph
// ============================================================================

/// The built graph. Immutable once `GraphBuilder::finish` returns.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    node_index: HashMap<String, usize>,
    report: NormalizeReport,
}

impl Graph {
    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn report(&self) -> &NormalizeReport {
        &self.report
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.node_index.get(id).map(|&i| &self.nodes[i])
    }

    pub fn node_position(&self, id: &str) -> Option<usize> {
        self.node_index.get(id).copied()
    }

    pub fn nodes_of(&self, kind: NodeKind) -> impl Iterator<Item = &GraphNode> {
        self.nodes.iter().filter(move |n| n.kind == kind)
    }

    pub fn edges_of(&self, kind: EdgeKind) -> impl Iterator<Item = &GraphEdge> {
        self.edges.iter().filter(move |e| e.kind == kind)
    }

    pub fn has_edge(&self, kind: EdgeKind, from: &str, to: &str) -> bool {
        let id = kind.edge_id(from, to);
        self.edges.iter().any(|e| e.id == id)
    }

    /// Direct neighbors of `id`, over every edge kind, in edge order.
    pub fn neighbors(&self, id: &str) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for e in &self.edges {
            let other = if e.from == id {
                e.to.as_str()
            } else if e.to == id {
                e.from.as_str()
            } else {
                continue;
            };
            if seen.insert(other) {
                out.push(other);
            }
        }
        out
    }

    pub fn stats(&self) -> GraphStats {
        let count = |kind: NodeKind| self.nodes_of(kind).count();
        let total_nodes = self.nodes.len();
        let total_edges = self.edges.len();
        let avg_degree = if total_nodes > 0 {
            (2 * total_edges) as f64 / total_nodes as f64
        } else {
            0.0
        };

        GraphStats {
            total_nodes,
            total_edges,
            playlists: count(NodeKind::Playlist),
            songs: count(NodeKind::Song),
            artists: count(NodeKind::Artist),
            genres: count(NodeKind::Genre),
            shortcut_edges: self.edges_of(EdgeKind::SongGenre).count(),
            skipped_playlists: self.report.skipped_playlists,
            skipped_tracks: self.report.skipped_tracks,
            unresolved_artists: self.report.unresolved_artists,
            max_song_playlists: self
                .nodes_of(NodeKind::Song)
                .map(|n| n.degree)
                .max()
                .unwrap_or(0),
            avg_degree,
        }
    }
}

// ============================================================================
// Builder
// ============================================================================

pub struct GraphBuilder<'a> {
    config: &'a EngineConfig,
    genre_hints: HashMap<String, usize>,
    nodes: Vec<GraphNode>,
    node_index: HashMap<String, usize>,
    edges: Vec<GraphEdge>,
    edge_ids: HashSet<String>,
    song_genres: HashMap<String, BTreeSet<String>>,
}

impl<'a> GraphBuilder<'a> {
    /// `genres` are fetch-side aggregate hints, used only for tooltips.
    pub fn new(config: &'a EngineConfig, genres: &[GenreRecord]) -> Self {
        let mut genre_hints = HashMap::new();
        for g in genres {
            if let Some(id) = genre_node_id(&g.name) {
                *genre_hints.entry(id).or_insert(0) += g.count;
            }
        }
        Self {
            config,
            genre_hints,
            nodes: Vec::new(),
            node_index: HashMap::new(),
            edges: Vec::new(),
            edge_ids: HashSet::new(),
            song_genres: HashMap::new(),
        }
    }

    /// Create the node unless it already exists. First sighting wins.
    fn ensure_node(&mut self, id: &str, kind: NodeKind, label: &str, title: String) -> usize {
        if let Some(&i) = self.node_index.get(id) {
            return i;
        }
        let i = self.nodes.len();
        self.nodes.push(GraphNode {
            id: id.to_string(),
            kind,
            label: label.to_string(),
            title,
            degree: 0,
            size: self.config.sizing.rule(kind).base,
            color: self.config.palette.color(kind).to_string(),
        });
        self.node_index.insert(id.to_string(), i);
        i
    }

    fn bump_degree(&mut self, id: &str) {
        if let Some(&i) = self.node_index.get(id) {
            self.nodes[i].degree += 1;
        }
    }

    /// Add an edge if its (from, to, kind) triple is new. Returns whether it was.
    fn add_edge(&mut self, kind: EdgeKind, from: &str, to: &str) -> bool {
        let id = kind.edge_id(from, to);
        if !self.edge_ids.insert(id.clone()) {
            return false;
        }
        self.edges.push(GraphEdge {
            id,
            kind,
            from: from.to_string(),
            to: to.to_string(),
            color: self.config.palette.color(kind.source_kind()).to_string(),
            width: self.config.sizing.edge_width,
        });

        // Degree signals: distinct playlists per song, SongArtist edges per
        // artist, ArtistGenre edges per genre.
        match kind {
            EdgeKind::PlaylistSong | EdgeKind::SongArtist | EdgeKind::ArtistGenre => {
                self.bump_degree(to)
            }
            EdgeKind::SongGenre => {}
        }
        true
    }

    pub fn add_playlist(&mut self, playlist: &NormalizedPlaylist) {
        if !self.node_index.contains_key(&playlist.node_id) {
            let title = format!("{}: {} tracks", playlist.name, playlist.track_count);
            let i = self.ensure_node(&playlist.node_id, NodeKind::Playlist, &playlist.name, title);
            self.nodes[i].degree = playlist.track_count;
        }

        for track in &playlist.tracks {
            self.ensure_node(&track.node_id, NodeKind::Song, &track.name, track.name.clone());
            self.add_edge(EdgeKind::PlaylistSong, &playlist.node_id, &track.node_id);

            for artist in &track.artists {
                let title = format!("{}: {} genres", artist.name, artist.genres.len());
                self.ensure_node(&artist.node_id, NodeKind::Artist, &artist.name, title);
                self.add_edge(EdgeKind::SongArtist, &track.node_id, &artist.node_id);

                for genre in &artist.genres {
                    let hint = self.genre_hints.get(&genre.node_id).copied().unwrap_or(0);
                    let title = format!("{}: {} artists", genre.name, hint);
                    self.ensure_node(&genre.node_id, NodeKind::Genre, &genre.name, title);
                    self.add_edge(EdgeKind::ArtistGenre, &artist.node_id, &genre.node_id);
                    self.song_genres
                        .entry(track.node_id.clone())
                        .or_default()
                        .insert(genre.node_id.clone());
                }
            }
        }
    }

    /// Synthesize the shortcut edges, run the sizing pass, and seal the graph.
    pub fn finish(mut self, report: NormalizeReport) -> Graph {
        let songs: Vec<String> = self
            .nodes
            .iter()
            .filter(|n| n.kind == NodeKind::Song)
            .map(|n| n.id.clone())
            .collect();
        let mut side_table = std::mem::take(&mut self.song_genres);
        for song in songs {
            if let Some(genres) = side_table.remove(&song) {
                for genre in genres {
                    self.add_edge(EdgeKind::SongGenre, &song, &genre);
                }
            }
        }

        sizing::apply_sizes(&mut self.nodes, &self.config.sizing);

        Graph {
            nodes: self.nodes,
            edges: self.edges,
            node_index: self.node_index,
            report,
        }
    }
}

// ============================================================================
// Entry Point
// ============================================================================

/// Build the full graph from catalog records. Pure: identical input gives an
/// identical graph, including node and edge order.
pub fn build_graph(
    playlists: &[PlaylistRecord],
    artists: &[ArtistRecord],
    genres: &[GenreRecord],
    config: &EngineConfig,
) -> Graph {
    let normalized = normalize::normalize(playlists, artists);
    let mut builder = GraphBuilder::new(config, genres);
    for playlist in &normalized.playlists {
        builder.add_playlist(playlist);
    }
    let graph = builder.finish(normalized.report);

    tracing::info!(
        nodes = graph.nodes().len(),
        edges = graph.edges().len(),
        skipped = graph.report().total_skipped(),
        "graph built"
    );
    graph
}
