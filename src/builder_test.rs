//! Graph construction scenarios.
//!
//! Builds small catalogs in memory and checks dedup, the shortcut relation,
//! degree counting, sizing and rebuild determinism.

use super::*;
use crate::catalog::load_snapshot;
use crate::models::TrackRecord;
use crate::sizing::render_size;
use std::path::PathBuf;

// ============================================================================
// Helpers
// ============================================================================

fn rich_track(uri: &str, name: &str, artist_ids: &[&str]) -> TrackRecord {
    TrackRecord {
        uri: Some(uri.to_string()),
        name: Some(name.to_string()),
        artist_ids: Some(artist_ids.iter().map(|s| s.to_string()).collect()),
        ..Default::default()
    }
}

fn legacy_track(uri: &str, name: &str, artist: &str) -> TrackRecord {
    TrackRecord {
        uri: Some(uri.to_string()),
        name: Some(name.to_string()),
        artist: Some(artist.to_string()),
        ..Default::default()
    }
}

fn playlist(id: &str, name: &str, tracks: Vec<TrackRecord>) -> PlaylistRecord {
    PlaylistRecord {
        id: Some(id.to_string()),
        name: Some(name.to_string()),
        tracks,
        ..Default::default()
    }
}

fn artist(id: &str, name: &str, genres: &[&str]) -> ArtistRecord {
    ArtistRecord {
        id: id.to_string(),
        name: name.to_string(),
        genres: genres.iter().map(|g| g.to_string()).collect(),
    }
}

/// P1 = [T1, T2] both by A1 (pop, rock); P2 = [T1].
fn scenario() -> (Vec<PlaylistRecord>, Vec<ArtistRecord>) {
    let playlists = vec![
        playlist(
            "P1",
            "First",
            vec![rich_track("T1", "One", &["A1"]), rich_track("T2", "Two", &["A1"])],
        ),
        playlist("P2", "Second", vec![rich_track("T1", "One", &["A1"])]),
    ];
    let artists = vec![artist("A1", "Alpha", &["pop", "rock"])];
    (playlists, artists)
}

fn build(playlists: &[PlaylistRecord], artists: &[ArtistRecord]) -> Graph {
    build_graph(playlists, artists, &[], &EngineConfig::default())
}

fn ids_of(graph: &Graph, kind: NodeKind) -> Vec<&str> {
    graph.nodes_of(kind).map(|n| n.id.as_str()).collect()
}

// ============================================================================
// Scenario
// ============================================================================

#[test]
fn test_reference_scenario() {
    let (playlists, artists) = scenario();
    let graph = build(&playlists, &artists);

    assert_eq!(ids_of(&graph, NodeKind::Playlist), vec!["p_P1", "p_P2"]);
    assert_eq!(ids_of(&graph, NodeKind::Song), vec!["s_T1", "s_T2"]);
    assert_eq!(ids_of(&graph, NodeKind::Artist), vec!["a_A1"]);
    assert_eq!(ids_of(&graph, NodeKind::Genre), vec!["g_pop", "g_rock"]);

    assert_eq!(graph.node("s_T1").unwrap().degree, 2);
    assert_eq!(graph.node("s_T2").unwrap().degree, 1);
    assert_eq!(graph.node("a_A1").unwrap().degree, 2);

    for (song, genre) in [("s_T1", "g_pop"), ("s_T1", "g_rock"), ("s_T2", "g_pop"), ("s_T2", "g_rock")] {
        assert!(graph.has_edge(EdgeKind::SongGenre, song, genre), "{song} -> {genre}");
    }
    assert_eq!(graph.edges_of(EdgeKind::SongGenre).count(), 4);
    assert_eq!(graph.edges_of(EdgeKind::PlaylistSong).count(), 3);
    assert_eq!(graph.edges_of(EdgeKind::SongArtist).count(), 2);
    assert_eq!(graph.edges_of(EdgeKind::ArtistGenre).count(), 2);
}

#[test]
fn test_edge_ids_are_ordered_triples() {
    let (playlists, artists) = scenario();
    let graph = build(&playlists, &artists);
    assert!(graph.edges().iter().any(|e| e.id == "p_P1-s_T1-playlist-song"));
    assert!(graph.edges().iter().any(|e| e.id == "s_T1-a_A1-song-artist"));
    assert!(graph.edges().iter().any(|e| e.id == "a_A1-g_pop-artist-genre"));
    assert!(graph.edges().iter().any(|e| e.id == "s_T2-g_rock-song-genre"));
}

#[test]
fn test_no_duplicate_ids() {
    let (playlists, artists) = scenario();
    let graph = build(&playlists, &artists);
    let node_ids: HashSet<&str> = graph.nodes().iter().map(|n| n.id.as_str()).collect();
    let edge_ids: HashSet<&str> = graph.edges().iter().map(|e| e.id.as_str()).collect();
    assert_eq!(node_ids.len(), graph.nodes().len());
    assert_eq!(edge_ids.len(), graph.edges().len());
}

// ============================================================================
// Dedup
// ============================================================================

#[test]
fn test_song_in_n_playlists_is_one_node() {
    let playlists: Vec<PlaylistRecord> = (0..5)
        .map(|i| playlist(&format!("P{i}"), "Mix", vec![rich_track("T1", "Shared", &[])]))
        .collect();
    let graph = build(&playlists, &[]);
    assert_eq!(ids_of(&graph, NodeKind::Song), vec!["s_T1"]);
    assert_eq!(graph.node("s_T1").unwrap().degree, 5);
}

#[test]
fn test_repeat_within_playlist_counts_once() {
    let playlists = vec![playlist(
        "P1",
        "Loop",
        vec![rich_track("T1", "Again", &[]), rich_track("T1", "Again", &[])],
    )];
    let graph = build(&playlists, &[]);
    assert_eq!(graph.node("s_T1").unwrap().degree, 1);
    assert_eq!(graph.edges_of(EdgeKind::PlaylistSong).count(), 1);
    // delivered track count is kept for the playlist
    assert_eq!(graph.node("p_P1").unwrap().degree, 2);
}

#[test]
fn test_first_sighting_metadata_wins() {
    let playlists = vec![
        playlist("P1", "Original", vec![rich_track("T1", "First Name", &[])]),
        playlist("P1", "Renamed", vec![rich_track("T1", "Second Name", &[]), rich_track("T2", "x", &[])]),
    ];
    let graph = build(&playlists, &[]);
    let p1 = graph.node("p_P1").unwrap();
    assert_eq!(p1.label, "Original");
    assert_eq!(p1.degree, 1);
    assert_eq!(graph.node("s_T1").unwrap().label, "First Name");
    // the second sighting still contributes its tracks
    assert!(graph.has_edge(EdgeKind::PlaylistSong, "p_P1", "s_T2"));
}

#[test]
fn test_genre_collapse_across_artists() {
    let playlists = vec![playlist(
        "P1",
        "Mix",
        vec![rich_track("T1", "a", &["A1"]), rich_track("T2", "b", &["A2"])],
    )];
    let artists = vec![
        artist("A1", "Alpha", &["Indie Rock"]),
        artist("A2", "Beta", &["indie-rock"]),
    ];
    let graph = build(&playlists, &artists);
    assert_eq!(ids_of(&graph, NodeKind::Genre), vec!["g_indie-rock"]);
    let genre = graph.node("g_indie-rock").unwrap();
    assert_eq!(genre.label, "Indie Rock");
    assert_eq!(genre.degree, 2);
}

#[test]
fn test_shared_artist_genre_edge_not_duplicated() {
    let (playlists, artists) = scenario();
    let graph = build(&playlists, &artists);
    let pop_edges = graph
        .edges()
        .iter()
        .filter(|e| e.kind == EdgeKind::ArtistGenre && e.to == "g_pop")
        .count();
    assert_eq!(pop_edges, 1);
    assert_eq!(graph.node("g_pop").unwrap().degree, 1);
}

#[test]
fn test_song_genres_accumulate_across_occurrences() {
    // T1 first appears with A1, later with A2 listed too
    let playlists = vec![
        playlist("P1", "a", vec![rich_track("T1", "x", &["A1"])]),
        playlist("P2", "b", vec![rich_track("T1", "x", &["A2"])]),
    ];
    let artists = vec![artist("A1", "Alpha", &["pop"]), artist("A2", "Beta", &["jazz"])];
    let graph = build(&playlists, &artists);
    assert!(graph.has_edge(EdgeKind::SongGenre, "s_T1", "g_pop"));
    assert!(graph.has_edge(EdgeKind::SongGenre, "s_T1", "g_jazz"));
}

#[test]
fn test_neighbors_cover_every_edge_kind() {
    let (playlists, artists) = scenario();
    let graph = build(&playlists, &artists);
    assert_eq!(graph.neighbors("s_T1"), vec!["p_P1", "a_A1", "p_P2", "g_pop", "g_rock"]);
    assert_eq!(graph.neighbors("g_rock"), vec!["a_A1", "s_T1", "s_T2"]);
    assert!(graph.neighbors("s_missing").is_empty());
}

// ============================================================================
// Legacy / Error Handling
// ============================================================================

#[test]
fn test_legacy_artists_share_identity_across_tracks() {
    let playlists = vec![playlist(
        "P1",
        "Old",
        vec![
            legacy_track("T1", "a", "The Band, Solo Act"),
            legacy_track("T2", "b", "the band"),
        ],
    )];
    let graph = build(&playlists, &[]);
    assert_eq!(ids_of(&graph, NodeKind::Artist), vec!["a_the-band", "a_solo-act"]);
    assert_eq!(graph.node("a_the-band").unwrap().degree, 2);
    assert_eq!(graph.node("a_the-band").unwrap().label, "The Band");
    assert_eq!(graph.edges_of(EdgeKind::SongGenre).count(), 0);
}

#[test]
fn test_unknown_artist_keeps_song_and_playlist_edge() {
    let playlists = vec![playlist("P1", "Mix", vec![rich_track("T1", "x", &["GHOST"])])];
    let graph = build(&playlists, &[artist("A1", "Alpha", &["pop"])]);
    assert!(graph.node("s_T1").is_some());
    assert!(graph.has_edge(EdgeKind::PlaylistSong, "p_P1", "s_T1"));
    assert!(ids_of(&graph, NodeKind::Artist).is_empty());
    assert_eq!(graph.report().unresolved_artists, 1);
}

#[test]
fn test_malformed_entries_skipped_not_fatal() {
    let mut broken = playlist("P1", "Mix", vec![TrackRecord::default(), rich_track("T1", "ok", &[])]);
    broken.tracks.push(TrackRecord {
        uri: Some("   ".to_string()),
        ..Default::default()
    });
    let playlists = vec![PlaylistRecord::default(), broken];
    let graph = build(&playlists, &[]);
    assert_eq!(ids_of(&graph, NodeKind::Playlist), vec!["p_P1"]);
    assert_eq!(ids_of(&graph, NodeKind::Song), vec!["s_T1"]);
    let stats = graph.stats();
    assert_eq!(stats.skipped_playlists, 1);
    assert_eq!(stats.skipped_tracks, 2);
}

#[test]
fn test_empty_input_is_empty_graph() {
    let graph = build(&[], &[]);
    assert!(graph.is_empty());
    assert!(graph.edges().is_empty());
    assert_eq!(graph.stats(), GraphStats::default());
}

// ============================================================================
// Degrees, Sizing, Tooltips
// ============================================================================

#[test]
fn test_degrees_match_edge_incidence() {
    let snap = load_snapshot(&fixtures_dir()).unwrap();
    let graph = build_graph(&snap.playlists, &snap.artists, &snap.genres, &EngineConfig::default());

    let incoming = |id: &str, kind: EdgeKind| graph.edges_of(kind).filter(|e| e.to == id).count();
    for node in graph.nodes() {
        let expected = match node.kind {
            NodeKind::Playlist => node.degree,
            NodeKind::Song => incoming(&node.id, EdgeKind::PlaylistSong),
            NodeKind::Artist => incoming(&node.id, EdgeKind::SongArtist),
            NodeKind::Genre => incoming(&node.id, EdgeKind::ArtistGenre),
        };
        assert_eq!(node.degree, expected, "{}", node.id);
    }
}

#[test]
fn test_sizing_law_holds_for_every_node() {
    let snap = load_snapshot(&fixtures_dir()).unwrap();
    let config = EngineConfig::default();
    let graph = build_graph(&snap.playlists, &snap.artists, &snap.genres, &config);
    for node in graph.nodes() {
        let rule = config.sizing.rule(node.kind);
        let expected = (rule.base + rule.k * (node.degree as f64).sqrt()).clamp(rule.base, rule.max);
        assert_eq!(node.size, expected, "{}", node.id);
        assert_eq!(node.size, render_size(rule, node.degree));
        assert!(node.size >= rule.base && node.size <= rule.max);
    }
}

#[test]
fn test_large_playlist_is_capped() {
    let tracks = (0..500).map(|i| rich_track(&format!("T{i}"), "t", &[])).collect();
    let small = (0..20).map(|i| rich_track(&format!("S{i}"), "t", &[])).collect();
    let graph = build(&[playlist("BIG", "Big", tracks), playlist("SMALL", "Small", small)], &[]);
    let big = graph.node("p_BIG").unwrap().size;
    let small = graph.node("p_SMALL").unwrap().size;
    assert_eq!(big, 30.0);
    assert!(small > 10.0 && small < big);
}

#[test]
fn test_tooltips_use_genre_hints() {
    let (playlists, artists) = scenario();
    let hints = vec![GenreRecord {
        name: "Pop".to_string(),
        count: 7,
    }];
    let graph = build_graph(&playlists, &artists, &hints, &EngineConfig::default());
    assert_eq!(graph.node("g_pop").unwrap().title, "pop: 7 artists");
    assert_eq!(graph.node("g_rock").unwrap().title, "rock: 0 artists");
    assert_eq!(graph.node("p_P1").unwrap().title, "First: 2 tracks");
    assert_eq!(graph.node("a_A1").unwrap().title, "Alpha: 2 genres");
    // the hint never drives degree
    assert_eq!(graph.node("g_pop").unwrap().degree, 1);
}

#[test]
fn test_colors_from_palette() {
    let (playlists, artists) = scenario();
    let mut config = EngineConfig::default();
    config.palette.genre = "#123456".to_string();
    let graph = build_graph(&playlists, &artists, &[], &config);
    assert_eq!(graph.node("g_pop").unwrap().color, "#123456");
    let ag = graph.edges_of(EdgeKind::ArtistGenre).next().unwrap();
    assert_eq!(ag.color, config.palette.artist);
}

// ============================================================================
// Determinism
// ============================================================================

#[test]
fn test_rebuild_is_deterministic() {
    let snap = load_snapshot(&fixtures_dir()).unwrap();
    let config = EngineConfig::default();
    let a = build_graph(&snap.playlists, &snap.artists, &snap.genres, &config);
    let b = build_graph(&snap.playlists, &snap.artists, &snap.genres, &config);
    assert_eq!(a.nodes(), b.nodes());
    assert_eq!(a.edges(), b.edges());
}

#[test]
fn test_fixture_catalog_shape() {
    let snap = load_snapshot(&fixtures_dir()).unwrap();
    let graph = build_graph(&snap.playlists, &snap.artists, &snap.genres, &EngineConfig::default());
    let stats = graph.stats();
    assert_eq!(stats.playlists, 3);
    assert_eq!(stats.songs, 4);
    // A1, A2, A3 from the catalog plus two legacy names
    assert_eq!(stats.artists, 5);
    assert!(graph.node("a_delta-sound").is_some());
    assert!(graph.node("a_alpha").is_some());
    // pop, rock, indie-rock, jazz
    assert_eq!(stats.genres, 4);
    assert_eq!(stats.skipped_tracks, 1);
    assert_eq!(stats.max_song_playlists, 2);
    assert_eq!(graph.node("g_pop").unwrap().degree, 2);
}

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}
