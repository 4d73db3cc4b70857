//! Engine configuration.
//!
//! Sizing constants, the node palette and the highlight style. Every field has
//! a default; an optional JSON file may override any subset of them.

use crate::error::ConfigError;
use crate::models::NodeKind;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EngineConfig {
    #[serde(default)]
    pub sizing: SizingConfig,

    #[serde(default)]
    pub palette: Palette,

    #[serde(default)]
    pub highlight: HighlightStyle,
}

impl EngineConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load overrides from `path`, or the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }
}

// ============================================================================
// Sizing
// ============================================================================

/// `size = clamp(base + k * sqrt(degree), base, max)`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SizeRule {
    pub base: f64,
    pub k: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SizingConfig {
    pub playlist: SizeRule,
    pub song: SizeRule,
    pub artist: SizeRule,
    pub genre: SizeRule,
    pub edge_width: f64,
}

impl Default for SizingConfig {
    fn default() -> Self {
        Self {
            playlist: SizeRule { base: 10.0, k: 1.5, max: 30.0 },
            song: SizeRule { base: 5.0, k: 1.0, max: 15.0 },
            artist: SizeRule { base: 8.0, k: 0.8, max: 20.0 },
            genre: SizeRule { base: 8.0, k: 1.2, max: 25.0 },
            edge_width: 1.0,
        }
    }
}

impl SizingConfig {
    pub fn rule(&self, kind: NodeKind) -> &SizeRule {
        match kind {
            NodeKind::Playlist => &self.playlist,
            NodeKind::Song => &self.song,
            NodeKind::Artist => &self.artist,
            NodeKind::Genre => &self.genre,
        }
    }
}

// ============================================================================
// Palette
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Palette {
    pub playlist: String,
    pub song: String,
    pub artist: String,
    pub genre: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            playlist: "#FF6384".to_string(),
            song: "#4CA3FD".to_string(),
            artist: "#36A2EB".to_string(),
            genre: "#FFCE56".to_string(),
        }
    }
}

impl Palette {
    pub fn color(&self, kind: NodeKind) -> &str {
        match kind {
            NodeKind::Playlist => &self.playlist,
            NodeKind::Song => &self.song,
            NodeKind::Artist => &self.artist,
            NodeKind::Genre => &self.genre,
        }
    }
}

// ============================================================================
// Highlight
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HighlightStyle {
    pub selected_scale: f64,
    pub neighbor_scale: f64,
    pub faded_scale: f64,
    pub faded_color: String,
    pub emphasis_edge_color: String,
    pub emphasis_edge_width: f64,
    pub selected_z: i32,
    pub neighbor_z: i32,
    pub base_z: i32,
}

impl Default for HighlightStyle {
    fn default() -> Self {
        Self {
            selected_scale: 1.3,
            neighbor_scale: 1.1,
            faded_scale: 0.8,
            faded_color: "rgba(200,200,200,0.5)".to_string(),
            emphasis_edge_color: "#E8590C".to_string(),
            emphasis_edge_width: 3.0,
            selected_z: 2,
            neighbor_z: 1,
            base_z: 0,
        }
    }
}
