//! Layer visibility.
//!
//! Two optional layers sit on top of the always-visible playlist/song
//! skeleton. Genres hang off the artist layer: turning artists off turns
//! genres off too, but turning genres on leaves artists alone.

use crate::builder::Graph;
use crate::models::{EdgeKind, NodeKind};
use crate::view::{EdgeAttrs, NodeAttrs};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    Artists,
    Genres,
}

impl Layer {
    pub fn node_kind(self) -> NodeKind {
        match self {
            Layer::Artists => NodeKind::Artist,
            Layer::Genres => NodeKind::Genre,
        }
    }

    pub fn governs(self, kind: EdgeKind) -> bool {
        edge_layer(kind) == Some(self)
    }
}

/// Layer controlling an edge kind; `None` means always visible.
pub fn edge_layer(kind: EdgeKind) -> Option<Layer> {
    match kind {
        EdgeKind::PlaylistSong => None,
        EdgeKind::SongArtist => Some(Layer::Artists),
        EdgeKind::ArtistGenre | EdgeKind::SongGenre => Some(Layer::Genres),
    }
}

pub fn node_layer(kind: NodeKind) -> Option<Layer> {
    match kind {
        NodeKind::Playlist | NodeKind::Song => None,
        NodeKind::Artist => Some(Layer::Artists),
        NodeKind::Genre => Some(Layer::Genres),
    }
}

/// Both layers start collapsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerVisibility {
    pub artists: bool,
    pub genres: bool,
}

impl LayerVisibility {
    pub fn is_visible(&self, layer: Layer) -> bool {
        match layer {
            Layer::Artists => self.artists,
            Layer::Genres => self.genres,
        }
    }

    pub fn node_visible(&self, kind: NodeKind) -> bool {
        node_layer(kind).map_or(true, |l| self.is_visible(l))
    }

    pub fn edge_visible(&self, kind: EdgeKind) -> bool {
        edge_layer(kind).map_or(true, |l| self.is_visible(l))
    }

    /// Returns the layers whose flag changed, cascade included.
    pub fn set_artists(&mut self, visible: bool) -> Vec<Layer> {
        let mut changed = Vec::new();
        if self.artists != visible {
            self.artists = visible;
            changed.push(Layer::Artists);
        }
        if !visible && self.genres {
            self.genres = false;
            changed.push(Layer::Genres);
        }
        changed
    }

    pub fn set_genres(&mut self, visible: bool) -> Vec<Layer> {
        if self.genres == visible {
            return Vec::new();
        }
        self.genres = visible;
        vec![Layer::Genres]
    }
}

/// Flip `hidden` on the nodes of the layer's kind and the edges it governs.
/// Nothing else in the store is touched.
pub fn apply_layer(
    graph: &Graph,
    nodes: &mut [NodeAttrs],
    edges: &mut [EdgeAttrs],
    layer: Layer,
    visible: bool,
) {
    let kind = layer.node_kind();
    for (node, attrs) in graph.nodes().iter().zip(nodes.iter_mut()) {
        if node.kind == kind {
            attrs.hidden = !visible;
        }
    }
    for (edge, attrs) in graph.edges().iter().zip(edges.iter_mut()) {
        if layer.governs(edge.kind) {
            attrs.layer_hidden = !visible;
        }
    }
}
