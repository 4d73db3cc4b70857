//! Neighborhood highlighting.
//!
//! Selecting a node emphasizes it and its direct neighbors and fades
//! everything else. The attribute values are always recomputed from the base
//! graph, so clearing a selection is the same computation with no focus and
//! never an undo of earlier deltas.

use crate::builder::Graph;
use crate::config::HighlightStyle;
use crate::view::{EdgeAttrs, NodeAttrs};
use ascent::{ascent_run, Dual};
use serde::Serialize;
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Neighborhood {
    pub selected: String,
    /// Direct neighbors.
    pub first: BTreeSet<String>,
    /// Neighbors of `first`, excluding `first` and the selected node.
    pub second: BTreeSet<String>,
}

impl Neighborhood {
    /// Selected node or one of its direct neighbors.
    pub fn in_focus(&self, id: &str) -> bool {
        self.selected == id || self.first.contains(id)
    }
}

/// Bidirectional (source, target) pairs for the distance query.
fn edge_pairs(graph: &Graph) -> Vec<(String, String)> {
    let mut pairs = Vec::with_capacity(graph.edges().len() * 2);
    for e in graph.edges() {
        pairs.push((e.from.clone(), e.to.clone()));
        pairs.push((e.to.clone(), e.from.clone()));
    }
    pairs
}

/// 1- and 2-hop neighborhoods of `selected`, or `None` for an unknown id.
pub fn neighborhood(graph: &Graph, selected: &str) -> Option<Neighborhood> {
    graph.node(selected)?;

    let edges = edge_pairs(graph);
    let origin = selected.to_string();

    let result = ascent_run! {
        relation edge(String, String) = edges;
        lattice dist(String, Dual<u32>);

        dist(origin.clone(), Dual(0u32));

        dist(y.clone(), Dual(d + 1)) <--
            dist(x, ?Dual(d)),
            edge(x, y),
            if *d < 2;
    };

    let mut first = BTreeSet::new();
    let mut second = BTreeSet::new();
    for (node, Dual(d)) in result.dist {
        match d {
            1 => {
                first.insert(node);
            }
            2 => {
                second.insert(node);
            }
            _ => {}
        }
    }

    Some(Neighborhood {
        selected: origin,
        first,
        second,
    })
}

/// Recompute every node's and edge's emphasis attributes for `focus`.
/// Layer `hidden` flags are left alone.
pub fn apply(
    graph: &Graph,
    style: &HighlightStyle,
    nodes: &mut [NodeAttrs],
    edges: &mut [EdgeAttrs],
    focus: Option<&Neighborhood>,
) {
    for (node, attrs) in graph.nodes().iter().zip(nodes.iter_mut()) {
        let (scale, color, show_label, z) = match focus {
            None => (1.0, node.color.as_str(), true, style.base_z),
            Some(h) if h.selected == node.id => {
                (style.selected_scale, node.color.as_str(), true, style.selected_z)
            }
            Some(h) if h.first.contains(&node.id) => {
                (style.neighbor_scale, node.color.as_str(), true, style.neighbor_z)
            }
            Some(_) => (style.faded_scale, style.faded_color.as_str(), false, style.base_z),
        };
        attrs.size = node.size * scale;
        attrs.color = color.to_string();
        attrs.show_label = show_label;
        attrs.z = z;
    }

    for (edge, attrs) in graph.edges().iter().zip(edges.iter_mut()) {
        match focus {
            None => {
                attrs.focus_hidden = false;
                attrs.emphasis = false;
                attrs.color = edge.color.clone();
                attrs.size = edge.width;
            }
            Some(h) => {
                let touches = edge.from == h.selected || edge.to == h.selected;
                attrs.focus_hidden = !(h.in_focus(&edge.from) && h.in_focus(&edge.to));
                attrs.emphasis = touches;
                if touches {
                    attrs.color = style.emphasis_edge_color.clone();
                    attrs.size = style.emphasis_edge_width;
                } else {
                    attrs.color = edge.color.clone();
                    attrs.size = edge.width;
                }
            }
        }
    }
}
