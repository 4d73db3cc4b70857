//! Playlist graph server.
//!
//! Serves the interactive graph page and its JSON API. The library is
//! organized into the following modules:
//!
//! - `catalog`: Snapshot loading and fingerprinting
//! - `normalize`: Record cleanup and id derivation
//! - `builder` / `sizing`: Graph construction and visual weighting
//! - `view` / `visibility` / `highlight`: Interaction state over a built graph
//! - `render`: Backend adapters for the render contract
//! - `graph` / `templates`: HTTP handlers and page markup

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use playlist_graph::{graph, AppState, BIND_ADDR, BIND_ADDR_ENV};

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "playlist_graph=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let state = match AppState::from_env() {
        Ok(state) => Arc::new(state),
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            std::process::exit(1);
        }
    };

    // Surface catalog problems at startup; requests retry the load anyway
    match graph::load_graph(&state).await {
        Ok(cached) => {
            let stats = cached.graph.stats();
            tracing::info!(
                playlists = stats.playlists,
                songs = stats.songs,
                artists = stats.artists,
                genres = stats.genres,
                edges = stats.total_edges,
                "initial graph ready"
            );
        }
        Err(e) => tracing::warn!(error = %e, "catalog not loaded yet"),
    }

    let app = Router::new()
        .route("/", get(graph::graph_page))
        .route("/api/graph", get(graph::graph_api))
        .route("/api/stats", get(graph::stats_api))
        .layer(TraceLayer::new_for_http())
        .with_state(state.clone());

    let addr = std::env::var(BIND_ADDR_ENV).unwrap_or_else(|_| BIND_ADDR.to_string());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind listen address");

    tracing::info!("Playlist graph running at http://{}", addr);
    tracing::info!("Data directory: {}", state.data_dir.display());

    axum::serve(listener, app).await.expect("Server error");
}
