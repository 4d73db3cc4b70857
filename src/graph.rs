//! Graph page and JSON API.
//!
//! Every request starts from a fresh `GraphView` over the cached graph and
//! applies the requested interaction state in a fixed order: artist layer,
//! genre layer, then selection. The view itself is never shared.

use crate::models::NodeKind;
use crate::render::adapter_for;
use crate::templates::{base_html, graph_css, html_escape, render_graph_js, GraphRendererConfig};
use crate::view::GraphView;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{AppState, CachedGraph};

pub const DEFAULT_FORMAT: &str = "d3";

// ============================================================================
// Query Parameters
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct GraphParams {
    pub artists: Option<bool>,
    pub genres: Option<bool>,
    pub select: Option<String>,
    pub format: Option<String>,
}

impl GraphParams {
    /// Apply the interaction state to a fresh view.
    pub fn apply(&self, view: &mut GraphView) {
        if let Some(visible) = self.artists {
            view.set_artists_visible(visible);
        }
        if let Some(visible) = self.genres {
            view.set_genres_visible(visible);
        }
        if let Some(id) = self.select.as_deref().filter(|s| !s.is_empty()) {
            view.select(id);
        }
    }
}

// ============================================================================
// Graph Loading
// ============================================================================

/// Current graph, loaded on the blocking pool: reading and hashing the
/// snapshot and any rebuild are synchronous.
pub async fn load_graph(state: &Arc<AppState>) -> Result<CachedGraph, String> {
    let state = Arc::clone(state);
    match tokio::task::spawn_blocking(move || state.current_graph()).await {
        Ok(Ok(cached)) => Ok(cached),
        Ok(Err(e)) => {
            tracing::error!(error = %e, "failed to load catalog snapshot");
            Err(e.to_string())
        }
        Err(e) => {
            tracing::error!(error = %e, "graph load task failed");
            Err(format!("Task join error: {}", e))
        }
    }
}

fn load_error_response(message: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        axum::Json(serde_json::json!({ "error": message })),
    )
        .into_response()
}

// ============================================================================
// Route Handlers
// ============================================================================

pub async fn graph_page(State(state): State<Arc<AppState>>) -> Response {
    let cached = match load_graph(&state).await {
        Ok(cached) => cached,
        Err(e) => {
            let body = format!(
                r#"<h1>Playlist Graph</h1><p class="error">Could not load the catalog: {}</p>"#,
                html_escape(&e)
            );
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(base_html("Playlist Graph", &body)),
            )
                .into_response();
        }
    };

    if cached.graph.is_empty() {
        let body = r#"<h1>Playlist Graph</h1>
        <p class="graph-empty">No playlist data available to display.</p>"#;
        return Html(base_html("Playlist Graph", body)).into_response();
    }

    let stats = cached.graph.stats();
    let palette = &state.config.palette;

    let config = GraphRendererConfig {
        container_selector: "#graph-container".into(),
        api_url: "/api/graph".into(),
        format: DEFAULT_FORMAT.into(),
        auto_fit: true,
        legend: NodeKind::ALL
            .iter()
            .map(|&kind| (kind.as_str().to_string(), palette.color(kind).to_string()))
            .collect(),
    };

    let graph_script = render_graph_js(&config);
    let graph_styles = graph_css();

    let page_styles = r#"
        .graph-container {
            position: relative;
            border: 1px solid var(--border);
            border-radius: 4px;
            background: var(--accent);
            height: calc(100vh - 220px);
            min-height: 400px;
        }
        .graph-container svg { width: 100%; height: 100%; }
        .graph-controls {
            display: flex;
            gap: 1.5rem;
            align-items: center;
            flex-wrap: wrap;
            margin-bottom: 0.75rem;
        }
        .graph-controls label { display: flex; align-items: center; gap: 0.35rem; cursor: pointer; }
        .graph-stats {
            display: flex;
            gap: 1.5rem;
            font-size: 0.85rem;
            color: var(--muted);
            margin-bottom: 0.5rem;
        }
        .graph-stats span { display: flex; align-items: center; gap: 0.3rem; }
    "#;

    let html = format!(
        r##"
        <style>{page_styles}{graph_styles}</style>
        <h1>Playlist Graph</h1>

        <div class="graph-controls">
            <label><input type="checkbox" id="toggle-artists"> Artists</label>
            <label><input type="checkbox" id="toggle-genres"> Genres</label>
            <span class="graph-hint">Click a node to focus it, click the background to clear.</span>
        </div>

        <div class="graph-stats">
            <span><strong>{playlists}</strong> playlists</span>
            <span><strong>{songs}</strong> songs</span>
            <span><strong>{artists}</strong> artists</span>
            <span><strong>{genres}</strong> genres</span>
            <span><strong>{edges}</strong> edges</span>
            <span>avg degree: <strong>{avg_deg:.1}</strong></span>
        </div>

        <div class="graph-container" id="graph-container"></div>

        {graph_script}
        "##,
        playlists = stats.playlists,
        songs = stats.songs,
        artists = stats.artists,
        genres = stats.genres,
        edges = stats.total_edges,
        avg_deg = stats.avg_degree,
    );

    Html(base_html("Playlist Graph", &html)).into_response()
}

pub async fn graph_api(
    Query(params): Query<GraphParams>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let format = params.format.as_deref().unwrap_or(DEFAULT_FORMAT);
    let Some(adapter) = adapter_for(format) else {
        return (
            StatusCode::BAD_REQUEST,
            axum::Json(serde_json::json!({ "error": format!("unknown format: {}", format) })),
        )
            .into_response();
    };

    let cached = match load_graph(&state).await {
        Ok(cached) => cached,
        Err(e) => return load_error_response(&e),
    };

    let mut view = GraphView::new(cached.graph, state.config.highlight.clone());
    params.apply(&mut view);
    let frame = view.frame();

    axum::Json(adapter.render(&frame)).into_response()
}

pub async fn stats_api(State(state): State<Arc<AppState>>) -> Response {
    match load_graph(&state).await {
        Ok(cached) => axum::Json(serde_json::json!({
            "stats": cached.graph.stats(),
            "fingerprint": cached.fingerprint,
            "loadedAt": cached.loaded_at.to_rfc3339(),
        }))
        .into_response(),
        Err(e) => load_error_response(&e),
    }
}
