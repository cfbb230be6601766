//! Topology of a multilayer network, without electrical semantics.
//!
//! A multilayer network is handled in two shapes:
//!
//! - [`PlanarGraph`]: layers kept apart. Every node lives in exactly one
//!   layer; boundary nodes (inter-nodes) additionally point at one adjacent
//!   layer.
//! - [`SupraGraph`]: all layers flattened into one integer namespace, each
//!   node and edge remembering where it came from.
//!
//! Both are directed. The input to everything is a list of [`EdgeRecord`]s.

use serde::{Deserialize, Serialize};

pub mod planar;
pub mod supra;

pub use planar::{InterNode, Layer, PlanarEdge, PlanarGraph, PlanarNode};
pub use supra::{SupraEdge, SupraEdgeId, SupraGraph, SupraNode, SupraNodeId};

/// Integer index of a layer. Smaller indices are upper (higher voltage) layers.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct LayerId(usize);

impl LayerId {
    #[inline]
    pub fn new(value: usize) -> Self {
        LayerId(value)
    }
    #[inline]
    pub fn value(&self) -> usize {
        self.0
    }

    /// Whether `other` sits directly above or below this layer.
    pub fn is_adjacent(&self, other: LayerId) -> bool {
        self.0.abs_diff(other.0) == 1
    }

    /// Default layer name, `layer{idx}`.
    pub fn default_name(&self) -> String {
        format!("layer{}", self.0)
    }
}

impl std::fmt::Display for LayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether an edge stays within one layer or crosses into an adjacent one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    #[default]
    Intra,
    Inter,
}

/// Role of a node: an ordinary bus of one layer, or a boundary between two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeRole {
    Intra,
    Inter,
}

/// One row of an input edge list.
///
/// For an intra edge `layer` is the layer both terminals belong to. For an
/// inter edge `source` is the boundary node and `layer` names the layer of
/// `target`, the layer being fed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub source: String,
    pub target: String,
    pub layer: LayerId,
    #[serde(default)]
    pub kind: EdgeKind,
}

impl EdgeRecord {
    pub fn intra(source: impl Into<String>, target: impl Into<String>, layer: usize) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            layer: LayerId(layer),
            kind: EdgeKind::Intra,
        }
    }

    pub fn inter(source: impl Into<String>, target: impl Into<String>, layer: usize) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            layer: LayerId(layer),
            kind: EdgeKind::Inter,
        }
    }
}

/// Where a supra node came from: its layer and its name in the planar graph.
///
/// This is a plain value; it never borrows from the planar structure, which
/// may be dropped once the supra graph exists.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Origin {
    pub layer: LayerId,
    pub node: String,
}

impl Origin {
    pub fn new(layer: LayerId, node: impl Into<String>) -> Self {
        Self {
            layer,
            node: node.into(),
        }
    }
}

impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@layer{}", self.node, self.layer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_record_deserializes_kind() {
        let rec: EdgeRecord =
            serde_json::from_str(r#"{"source":"a","target":"b","layer":2,"kind":"inter"}"#)
                .unwrap();
        assert_eq!(rec, EdgeRecord::inter("a", "b", 2));

        let rec: EdgeRecord =
            serde_json::from_str(r#"{"source":"a","target":"b","layer":0}"#).unwrap();
        assert_eq!(rec.kind, EdgeKind::Intra);
    }

    #[test]
    fn test_layer_ordering_and_names() {
        assert!(LayerId::new(0) < LayerId::new(1));
        assert_eq!(LayerId::new(3).default_name(), "layer3");
        assert_eq!(Origin::new(LayerId::new(1), "n4").to_string(), "n4@layer1");
    }

    #[test]
    fn test_layer_adjacency() {
        let one = LayerId::new(1);
        assert!(one.is_adjacent(LayerId::new(0)));
        assert!(one.is_adjacent(LayerId::new(2)));
        assert!(!one.is_adjacent(one));
        assert!(!one.is_adjacent(LayerId::new(3)));
    }
}
