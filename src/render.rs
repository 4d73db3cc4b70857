//! Rendering backend adapters.
//!
//! The graph is built once; each drawing backend gets its own adapter that
//! reshapes a `RenderFrame` into the payload it expects.

use crate::models::{RenderEdge, RenderNode};
use crate::visibility::LayerVisibility;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderFrame {
    pub nodes: Vec<RenderNode>,
    pub edges: Vec<RenderEdge>,
    pub layers: LayerVisibility,
    pub selected: Option<String>,
}

pub trait RenderAdapter: Send + Sync {
    fn name(&self) -> &'static str;
    fn render(&self, frame: &RenderFrame) -> Value;
}

/// Node/edge datasets with `hidden` flags, `from`/`to` endpoints.
/// Suits vis-network style backends that hide entries themselves.
pub struct VisNetworkAdapter;

impl RenderAdapter for VisNetworkAdapter {
    fn name(&self) -> &'static str {
        "vis"
    }

    fn render(&self, frame: &RenderFrame) -> Value {
        json!({
            "nodes": frame.nodes,
            "edges": frame.edges,
            "layers": frame.layers,
            "selected": frame.selected,
        })
    }
}

/// D3 force layouts have no notion of hidden entries: hidden nodes and edges
/// are dropped, endpoints become `source`/`target`, and nodes are ordered by
/// draw order so later elements paint on top. A link survives only if both
/// endpoints do; `forceLink` rejects dangling ids.
pub struct D3Adapter;

impl RenderAdapter for D3Adapter {
    fn name(&self) -> &'static str {
        "d3"
    }

    fn render(&self, frame: &RenderFrame) -> Value {
        let mut nodes: Vec<&RenderNode> = frame.nodes.iter().filter(|n| !n.hidden).collect();
        nodes.sort_by_key(|n| n.z);
        let kept: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();

        let links: Vec<Value> = frame
            .edges
            .iter()
            .filter(|e| !e.hidden && kept.contains(e.from.as_str()) && kept.contains(e.to.as_str()))
            .map(|e| {
                json!({
                    "id": e.id,
                    "source": e.from,
                    "target": e.to,
                    "type": e.kind,
                    "color": e.color,
                    "size": e.size,
                    "emphasis": e.emphasis,
                })
            })
            .collect();

        json!({
            "nodes": nodes,
            "links": links,
            "layers": frame.layers,
            "selected": frame.selected,
        })
    }
}

pub fn adapter_for(format: &str) -> Option<&'static dyn RenderAdapter> {
    match format {
        "vis" => Some(&VisNetworkAdapter),
        "d3" => Some(&D3Adapter),
        _ => None,
    }
}
