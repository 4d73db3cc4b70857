//! Degree-driven visual weights.
//!
//! Runs after the builder has seen every playlist: a song's playlist count is
//! not final until the last playlist is scanned. Square-root growth keeps a
//! 500-track playlist from swamping a 20-track one while hubs still stand out.

use crate::config::{SizeRule, SizingConfig};
use crate::models::GraphNode;

/// `clamp(base + k * sqrt(degree), base, max)`. A `max` below `base`
/// collapses to `base`.
pub fn render_size(rule: &SizeRule, degree: usize) -> f64 {
    let raw = rule.base + rule.k * (degree as f64).sqrt();
    raw.clamp(rule.base, rule.max.max(rule.base))
}

pub fn apply_sizes(nodes: &mut [GraphNode], sizing: &SizingConfig) {
    for node in nodes.iter_mut() {
        node.size = render_size(sizing.rule(node.kind), node.degree);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NodeKind;

    fn node(kind: NodeKind, degree: usize) -> GraphNode {
        GraphNode {
            id: format!("{}{}", kind.prefix(), degree),
            kind,
            label: String::new(),
            title: String::new(),
            degree,
            size: 0.0,
            color: String::new(),
        }
    }

    #[test]
    fn test_zero_degree_is_base() {
        let rule = SizeRule { base: 5.0, k: 1.0, max: 15.0 };
        assert_eq!(render_size(&rule, 0), 5.0);
    }

    #[test]
    fn test_sqrt_growth() {
        let rule = SizeRule { base: 10.0, k: 1.5, max: 30.0 };
        assert_eq!(render_size(&rule, 4), 13.0);
        assert_eq!(render_size(&rule, 100), 25.0);
    }

    #[test]
    fn test_clamped_to_max() {
        let rule = SizeRule { base: 10.0, k: 1.5, max: 30.0 };
        assert_eq!(render_size(&rule, 500), 30.0);
        assert!(render_size(&rule, 20) < render_size(&rule, 100));
    }

    #[test]
    fn test_inverted_bounds_collapse_to_base() {
        let rule = SizeRule { base: 8.0, k: 2.0, max: 4.0 };
        assert_eq!(render_size(&rule, 9), 8.0);
    }

    #[test]
    fn test_negative_k_never_below_base() {
        let rule = SizeRule { base: 8.0, k: -2.0, max: 20.0 };
        assert_eq!(render_size(&rule, 9), 8.0);
    }

    #[test]
    fn test_apply_sizes_uses_per_kind_rule() {
        let sizing = SizingConfig::default();
        let mut nodes = vec![node(NodeKind::Playlist, 4), node(NodeKind::Genre, 4)];
        apply_sizes(&mut nodes, &sizing);
        assert_eq!(nodes[0].size, 13.0);
        assert_eq!(nodes[1].size, 8.0 + 1.2 * 2.0);
    }
}
