//! Live view over a built graph.
//!
//! A `GraphView` owns the mutable render attributes for one session of
//! interaction: layer toggles and selection both write here, the underlying
//! `Graph` is shared and never modified. Dropping the view releases all of
//! its state; the next build starts from nothing.

use crate::builder::Graph;
use crate::config::HighlightStyle;
use crate::highlight::{self, Neighborhood};
use crate::models::{RenderEdge, RenderNode};
use crate::render::RenderFrame;
use crate::visibility::{self, Layer, LayerVisibility};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub struct NodeAttrs {
    pub size: f64,
    pub color: String,
    pub show_label: bool,
    pub z: i32,
    /// Set only by the layer controller.
    pub hidden: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EdgeAttrs {
    pub color: String,
    pub size: f64,
    /// Set by the layer controller.
    pub layer_hidden: bool,
    /// Set by the highlighter.
    pub focus_hidden: bool,
    pub emphasis: bool,
}

impl EdgeAttrs {
    pub fn hidden(&self) -> bool {
        self.layer_hidden || self.focus_hidden
    }
}

pub struct GraphView {
    graph: Arc<Graph>,
    style: HighlightStyle,
    layers: LayerVisibility,
    selection: Option<Neighborhood>,
    nodes: Vec<NodeAttrs>,
    edges: Vec<EdgeAttrs>,
}

impl GraphView {
    pub fn new(graph: Arc<Graph>, style: HighlightStyle) -> Self {
        let layers = LayerVisibility::default();
        let nodes = graph
            .nodes()
            .iter()
            .map(|n| NodeAttrs {
                size: n.size,
                color: n.color.clone(),
                show_label: true,
                z: style.base_z,
                hidden: !layers.node_visible(n.kind),
            })
            .collect();
        let edges = graph
            .edges()
            .iter()
            .map(|e| EdgeAttrs {
                color: e.color.clone(),
                size: e.width,
                layer_hidden: !layers.edge_visible(e.kind),
                focus_hidden: false,
                emphasis: false,
            })
            .collect();

        Self {
            graph,
            style,
            layers,
            selection: None,
            nodes,
            edges,
        }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn layers(&self) -> LayerVisibility {
        self.layers
    }

    pub fn selection(&self) -> Option<&Neighborhood> {
        self.selection.as_ref()
    }

    pub fn node_attrs(&self, id: &str) -> Option<&NodeAttrs> {
        self.graph.node_position(id).map(|i| &self.nodes[i])
    }

    pub fn edge_attrs(&self, id: &str) -> Option<&EdgeAttrs> {
        self.graph
            .edges()
            .iter()
            .position(|e| e.id == id)
            .map(|i| &self.edges[i])
    }

    fn apply_layers(&mut self, changed: &[Layer]) {
        for &layer in changed {
            let visible = self.layers.is_visible(layer);
            visibility::apply_layer(&self.graph, &mut self.nodes, &mut self.edges, layer, visible);
            tracing::debug!(?layer, visible, "layer visibility changed");
        }
    }

    pub fn set_artists_visible(&mut self, visible: bool) -> Vec<Layer> {
        let changed = self.layers.set_artists(visible);
        self.apply_layers(&changed);
        changed
    }

    pub fn set_genres_visible(&mut self, visible: bool) -> Vec<Layer> {
        let changed = self.layers.set_genres(visible);
        self.apply_layers(&changed);
        changed
    }

    /// Focus on `id`. An unknown id clears the selection and returns false.
    pub fn select(&mut self, id: &str) -> bool {
        match highlight::neighborhood(&self.graph, id) {
            Some(hood) => {
                highlight::apply(&self.graph, &self.style, &mut self.nodes, &mut self.edges, Some(&hood));
                tracing::debug!(
                    node = id,
                    first = hood.first.len(),
                    second = hood.second.len(),
                    "node selected"
                );
                self.selection = Some(hood);
                true
            }
            None => {
                tracing::debug!(node = id, "selection of unknown node ignored");
                self.clear_selection();
                false
            }
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
        highlight::apply(&self.graph, &self.style, &mut self.nodes, &mut self.edges, None);
    }

    /// Snapshot of the current attributes in render-contract form.
    pub fn frame(&self) -> RenderFrame {
        let nodes = self
            .graph
            .nodes()
            .iter()
            .zip(&self.nodes)
            .map(|(n, a)| RenderNode {
                id: n.id.clone(),
                label: n.label.clone(),
                kind: n.kind,
                size: a.size,
                color: a.color.clone(),
                hidden: a.hidden,
                title: n.title.clone(),
                show_label: a.show_label,
                z: a.z,
            })
            .collect();
        let edges = self
            .graph
            .edges()
            .iter()
            .zip(&self.edges)
            .map(|(e, a)| RenderEdge {
                id: e.id.clone(),
                from: e.from.clone(),
                to: e.to.clone(),
                kind: e.kind,
                hidden: a.hidden(),
                color: a.color.clone(),
                size: a.size,
                emphasis: a.emphasis,
            })
            .collect();

        RenderFrame {
            nodes,
            edges,
            layers: self.layers,
            selected: self.selection.as_ref().map(|h| h.selected.clone()),
        }
    }
}
