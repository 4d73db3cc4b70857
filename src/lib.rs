//! Playlist graph library - re-exports for testing and external use.
//!
//! Turns playlist/track/artist/genre catalog snapshots into a weighted,
//! deduplicated graph and serves interactive views of it.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};

pub mod builder;
pub mod catalog;
pub mod config;
pub mod error;
pub mod graph;
pub mod highlight;
pub mod models;
pub mod normalize;
pub mod render;
pub mod sizing;
pub mod templates;
pub mod view;
pub mod visibility;

// ============================================================================
// Configuration
// ============================================================================

pub const DATA_DIR: &str = "data";
pub const BIND_ADDR: &str = "127.0.0.1:3000";

pub const DATA_DIR_ENV: &str = "PLAYLIST_GRAPH_DATA_DIR";
pub const BIND_ADDR_ENV: &str = "PLAYLIST_GRAPH_ADDR";
pub const CONFIG_ENV: &str = "PLAYLIST_GRAPH_CONFIG";

// ============================================================================
// Application State
// ============================================================================

/// A built graph together with the snapshot identity it was built from.
#[derive(Debug, Clone)]
pub struct CachedGraph {
    pub fingerprint: String,
    pub loaded_at: DateTime<Utc>,
    pub graph: Arc<Graph>,
}

pub struct AppState {
    pub data_dir: PathBuf,
    pub config: EngineConfig,
    cache: Mutex<Option<CachedGraph>>,
}

impl AppState {
    pub fn new(data_dir: PathBuf, config: EngineConfig) -> Self {
        Self {
            data_dir,
            config,
            cache: Mutex::new(None),
        }
    }

    /// Data directory and config from the environment, defaults otherwise.
    pub fn from_env() -> Result<Self, ConfigError> {
        let data_dir = std::env::var(DATA_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DATA_DIR));
        let config_path = std::env::var(CONFIG_ENV).ok().map(PathBuf::from);
        let config = EngineConfig::load(config_path.as_deref())?;
        Ok(Self::new(data_dir, config))
    }

    /// The graph for the current snapshot. Rebuilt only when the snapshot
    /// fingerprint differs from the cached one.
    pub fn current_graph(&self) -> Result<CachedGraph, CatalogError> {
        let snapshot = load_snapshot(&self.data_dir)?;

        let mut cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(cached) = cache.as_ref() {
            if cached.fingerprint == snapshot.fingerprint {
                return Ok(cached.clone());
            }
        }

        let graph = build_graph(
            &snapshot.playlists,
            &snapshot.artists,
            &snapshot.genres,
            &self.config,
        );
        let fresh = CachedGraph {
            fingerprint: snapshot.fingerprint,
            loaded_at: snapshot.loaded_at,
            graph: Arc::new(graph),
        };
        tracing::info!(fingerprint = %fresh.fingerprint, "graph cache refreshed");
        *cache = Some(fresh.clone());
        Ok(fresh)
    }
}

// Re-export commonly used types
pub use builder::{build_graph, Graph, GraphBuilder};
pub use catalog::{aggregate_genres, fingerprint, load_snapshot, CatalogSnapshot};
pub use config::{EngineConfig, HighlightStyle, Palette, SizeRule, SizingConfig};
pub use error::{CatalogError, ConfigError};
pub use highlight::{neighborhood, Neighborhood};
pub use models::{
    ArtistRecord, EdgeKind, GenreRecord, GraphEdge, GraphNode, GraphStats, NodeKind,
    PlaylistRecord, RenderEdge, RenderNode, TrackRecord,
};
pub use normalize::{genre_node_id, normalize, slugify, NormalizeReport, Normalized};
pub use render::{adapter_for, D3Adapter, RenderAdapter, RenderFrame, VisNetworkAdapter};
pub use sizing::render_size;
pub use templates::{base_html, html_escape, STYLE};
pub use view::{EdgeAttrs, GraphView, NodeAttrs};
pub use visibility::{Layer, LayerVisibility};
