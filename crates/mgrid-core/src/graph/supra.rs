//! Multilayer network flattened into one graph.
//!
//! A supra graph holds intra-edges and inter-edges side by side in a single
//! integer namespace. It is only ever produced by
//! [`planar2supra`](crate::transformation::planar2supra) (or
//! `SupraGraph::from(&PlanarGraph)`), and exposes no mutators.
//!
//! Node ids are assigned layer by layer: the intra-nodes of each layer occupy
//! one contiguous range (see [`SupraGraph::layer_range`]), and inter-nodes
//! follow after the last layer. Every node and edge keeps its planar
//! [`Origin`].

use std::collections::HashMap;
use std::ops::Range;

use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use serde::Serialize;

use super::{EdgeKind, LayerId, NodeRole, Origin};
use crate::error::{GridError, GridResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct SupraNodeId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct SupraEdgeId(usize);

impl SupraNodeId {
    #[inline]
    pub fn new(value: usize) -> Self {
        SupraNodeId(value)
    }
    #[inline]
    pub fn value(&self) -> usize {
        self.0
    }
}

impl SupraEdgeId {
    #[inline]
    pub fn new(value: usize) -> Self {
        SupraEdgeId(value)
    }
    #[inline]
    pub fn value(&self) -> usize {
        self.0
    }
}

/// A node of the supra graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SupraNode {
    pub id: SupraNodeId,
    /// Name in the planar graph; unique across the supra graph as well
    pub name: String,
    pub role: NodeRole,
    pub origin: Origin,
}

/// An edge of the supra graph, with the planar origin of both terminals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SupraEdge {
    pub id: SupraEdgeId,
    pub source: SupraNodeId,
    pub target: SupraNodeId,
    pub kind: EdgeKind,
    /// Layer tag carried over from the edge list
    pub layer: LayerId,
    pub source_origin: Origin,
    pub target_origin: Origin,
}

/// A layer of the supra graph and the id range of its intra-nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SupraLayer {
    pub id: LayerId,
    pub name: String,
    pub range: Range<usize>,
}

#[derive(Debug, Clone)]
pub struct SupraGraph {
    graph: DiGraph<SupraNode, SupraEdge>,
    node_indices: HashMap<String, NodeIndex>,
    layers: Vec<SupraLayer>,
    intra_edges: Vec<EdgeIndex>,
    inter_edges: Vec<EdgeIndex>,
}

impl SupraGraph {
    pub(crate) fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            node_indices: HashMap::new(),
            layers: Vec::new(),
            intra_edges: Vec::new(),
            inter_edges: Vec::new(),
        }
    }

    pub(crate) fn push_layer(&mut self, id: LayerId, name: &str, range: Range<usize>) {
        self.layers.push(SupraLayer {
            id,
            name: name.to_string(),
            range,
        });
    }

    pub(crate) fn push_node(&mut self, name: &str, role: NodeRole, origin: Origin) -> SupraNodeId {
        let id = SupraNodeId(self.graph.node_count());
        let idx = self.graph.add_node(SupraNode {
            id,
            name: name.to_string(),
            role,
            origin,
        });
        self.node_indices.insert(name.to_string(), idx);
        id
    }

    pub(crate) fn push_edge(
        &mut self,
        source: SupraNodeId,
        target: SupraNodeId,
        kind: EdgeKind,
        layer: LayerId,
    ) -> SupraEdgeId {
        let s = NodeIndex::new(source.0);
        let t = NodeIndex::new(target.0);
        let weight = SupraEdge {
            id: SupraEdgeId(self.graph.edge_count()),
            source,
            target,
            kind,
            layer,
            source_origin: self.graph[s].origin.clone(),
            target_origin: self.graph[t].origin.clone(),
        };
        let id = weight.id;
        let idx = self.graph.add_edge(s, t, weight);
        match kind {
            EdgeKind::Intra => self.intra_edges.push(idx),
            EdgeKind::Inter => self.inter_edges.push(idx),
        }
        id
    }

    pub(crate) fn graph(&self) -> &DiGraph<SupraNode, SupraEdge> {
        &self.graph
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// All nodes in id order.
    pub fn nodelist(&self) -> impl Iterator<Item = &SupraNode> {
        self.graph.node_weights()
    }

    pub fn node(&self, id: SupraNodeId) -> GridResult<&SupraNode> {
        self.graph
            .node_weight(NodeIndex::new(id.0))
            .ok_or_else(|| GridError::lookup(format!("supra node {} does not exist", id.0)))
    }

    /// Supra id of the node named `name` in the planar graph.
    pub fn node_id(&self, name: &str) -> GridResult<SupraNodeId> {
        self.node_indices
            .get(name)
            .map(|idx| SupraNodeId(idx.index()))
            .ok_or_else(|| GridError::lookup(format!("node '{name}' does not exist")))
    }

    pub fn inter_nodes(&self) -> impl Iterator<Item = &SupraNode> {
        self.nodelist().filter(|n| n.role == NodeRole::Inter)
    }

    /// All edges in id order.
    pub fn edges(&self) -> impl Iterator<Item = &SupraEdge> {
        self.graph.edge_weights()
    }

    pub fn edge(&self, id: SupraEdgeId) -> GridResult<&SupraEdge> {
        self.graph
            .edge_weight(EdgeIndex::new(id.0))
            .ok_or_else(|| GridError::lookup(format!("supra edge {} does not exist", id.0)))
    }

    /// Edge between two planar node names, if present.
    pub fn find_edge(&self, source: &str, target: &str) -> Option<&SupraEdge> {
        let s = *self.node_indices.get(source)?;
        let t = *self.node_indices.get(target)?;
        self.graph.find_edge(s, t).map(|e| &self.graph[e])
    }

    pub fn intra_edges(&self) -> impl Iterator<Item = &SupraEdge> {
        self.intra_edges.iter().map(move |&e| &self.graph[e])
    }

    pub fn inter_edges(&self) -> impl Iterator<Item = &SupraEdge> {
        self.inter_edges.iter().map(move |&e| &self.graph[e])
    }

    /// Nodes adjacent to `id`, ignoring edge direction.
    pub fn neighbors(&self, id: SupraNodeId) -> impl Iterator<Item = SupraNodeId> + '_ {
        self.graph
            .neighbors_undirected(NodeIndex::new(id.0))
            .map(|n| SupraNodeId(n.index()))
    }

    pub fn layers(&self) -> &[SupraLayer] {
        &self.layers
    }

    pub fn layer(&self, layer: LayerId) -> GridResult<&SupraLayer> {
        self.layers
            .iter()
            .find(|l| l.id == layer)
            .ok_or_else(|| GridError::lookup(format!("layer {layer} does not exist")))
    }

    /// Contiguous id range holding the intra-nodes of `layer`.
    pub fn layer_range(&self, layer: LayerId) -> GridResult<Range<usize>> {
        Ok(self.layer(layer)?.range.clone())
    }
}
