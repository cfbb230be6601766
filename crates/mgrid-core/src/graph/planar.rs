//! Multilayer network in planar form.
//!
//! Layers are discovered from the edge list in a single pass; nothing is
//! declared up front. Nodes are stored in order of first appearance so that
//! every later step (layer membership, flattening) is reproducible for a
//! given input.

use std::collections::{BTreeMap, HashMap};

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::Serialize;
use tracing::{debug, info};

use super::{EdgeKind, EdgeRecord, LayerId, NodeRole};
use crate::error::{GridError, GridResult};

/// Node weight of a planar graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanarNode {
    pub name: String,
    /// Home layer
    pub layer: LayerId,
}

/// Edge weight of a planar graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlanarEdge {
    pub layer: LayerId,
    pub kind: EdgeKind,
}

/// A boundary node joining its home layer to one adjacent layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterNode {
    pub name: String,
    pub home: LayerId,
    pub adjacent: LayerId,
}

impl InterNode {
    /// The upper of the two joined layers (smaller index).
    pub fn upper(&self) -> LayerId {
        self.home.min(self.adjacent)
    }

    /// The lower of the two joined layers (larger index).
    pub fn lower(&self) -> LayerId {
        self.home.max(self.adjacent)
    }
}

/// A layer and the nodes homed in it, in discovery order.
#[derive(Debug, Clone)]
pub struct Layer {
    pub id: LayerId,
    pub name: String,
    pub(crate) nodes: Vec<NodeIndex>,
}

impl Layer {
    fn new(id: LayerId) -> Self {
        Self {
            id,
            name: id.default_name(),
            nodes: Vec::new(),
        }
    }

    /// Number of nodes homed in this layer (intra- and inter-nodes).
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Layer evidence gathered for one node while scanning the edge list.
#[derive(Debug, Default)]
struct LayerClaim {
    intra: Option<LayerId>,
    fed: Option<LayerId>,
}

/// Multilayer network with layers kept apart.
#[derive(Debug, Clone, Default)]
pub struct PlanarGraph {
    graph: DiGraph<PlanarNode, PlanarEdge>,
    node_indices: HashMap<String, NodeIndex>,
    layers: BTreeMap<LayerId, Layer>,
    inter_nodes: Vec<InterNode>,
    inter_lookup: HashMap<String, usize>,
}

impl PlanarGraph {
    /// Build a planar graph from an edge list.
    ///
    /// Each node's home layer comes from its intra edges, or, for a node that
    /// only terminates inter edges, from the tag of those inter edges. The
    /// source of every inter edge becomes an inter-node.
    ///
    /// Fails with [`GridError::Conflict`] on self-loops, duplicate
    /// `(source, target)` pairs, nodes claimed by two layers and inter edges
    /// that stay inside one layer, and with [`GridError::Lookup`] when a
    /// node's layer cannot be resolved at all.
    pub fn from_edgelist<I>(records: I) -> GridResult<Self>
    where
        I: IntoIterator<Item = EdgeRecord>,
    {
        let records: Vec<EdgeRecord> = records.into_iter().collect();

        let mut order: Vec<&str> = Vec::new();
        let mut claims: HashMap<&str, LayerClaim> = HashMap::new();
        for rec in &records {
            for name in [rec.source.as_str(), rec.target.as_str()] {
                if !claims.contains_key(name) {
                    order.push(name);
                    claims.insert(name, LayerClaim::default());
                }
            }
            match rec.kind {
                EdgeKind::Intra => {
                    for name in [rec.source.as_str(), rec.target.as_str()] {
                        if let Some(claim) = claims.get_mut(name) {
                            claim_layer(&mut claim.intra, name, rec.layer, "intra edges")?;
                        }
                    }
                }
                EdgeKind::Inter => {
                    let name = rec.target.as_str();
                    if let Some(claim) = claims.get_mut(name) {
                        claim_layer(&mut claim.fed, name, rec.layer, "inter edges")?;
                    }
                }
            }
        }

        let mut planar = PlanarGraph::default();
        for name in order {
            let claim = &claims[name];
            let layer = match (claim.intra, claim.fed) {
                (Some(home), Some(fed)) if home != fed => {
                    return Err(GridError::conflict(format!(
                        "node '{name}' is homed in layer {home} but fed by an inter edge \
                         tagged layer {fed}"
                    )));
                }
                (Some(home), _) => home,
                (None, Some(fed)) => fed,
                (None, None) => {
                    return Err(GridError::lookup(format!(
                        "layer of node '{name}' cannot be resolved: it has no intra edge \
                         and is not fed by any inter edge"
                    )));
                }
            };
            planar.insert_node(name, layer);
        }

        for rec in &records {
            let source = planar.node_indices[rec.source.as_str()];
            let target = planar.node_indices[rec.target.as_str()];
            if source == target {
                return Err(GridError::conflict(format!(
                    "self-loop on node '{}' is not allowed",
                    rec.source
                )));
            }
            if planar.graph.find_edge(source, target).is_some() {
                return Err(GridError::conflict(format!(
                    "duplicate edge {} -> {}",
                    rec.source, rec.target
                )));
            }
            planar.graph.add_edge(
                source,
                target,
                PlanarEdge {
                    layer: rec.layer,
                    kind: rec.kind,
                },
            );

            if rec.kind == EdgeKind::Inter {
                let home = planar.graph[source].layer;
                if home == rec.layer {
                    return Err(GridError::conflict(format!(
                        "inter edge {} -> {} does not leave layer {}",
                        rec.source, rec.target, home
                    )));
                }
                if !home.is_adjacent(rec.layer) {
                    return Err(GridError::conflict(format!(
                        "inter edge {} -> {} joins layers {} and {}, which are not adjacent",
                        rec.source, rec.target, home, rec.layer
                    )));
                }
                match planar.inter_node(&rec.source) {
                    Some(existing) if existing.adjacent != rec.layer => {
                        return Err(GridError::conflict(format!(
                            "inter-node '{}' already joins layers {} and {}; \
                             cannot also feed layer {}",
                            rec.source, existing.home, existing.adjacent, rec.layer
                        )));
                    }
                    Some(_) => {}
                    None => planar.push_inter_node(&rec.source, home, rec.layer),
                }
            }
        }

        debug!(
            layers = planar.layers.len(),
            nodes = planar.graph.node_count(),
            edges = planar.graph.edge_count(),
            inter_nodes = planar.inter_nodes.len(),
            "built planar graph from edge list"
        );
        Ok(planar)
    }

    fn insert_node(&mut self, name: &str, layer: LayerId) {
        let idx = self.graph.add_node(PlanarNode {
            name: name.to_string(),
            layer,
        });
        self.node_indices.insert(name.to_string(), idx);
        self.layers
            .entry(layer)
            .or_insert_with(|| Layer::new(layer))
            .nodes
            .push(idx);
    }

    fn push_inter_node(&mut self, name: &str, home: LayerId, adjacent: LayerId) {
        self.inter_lookup
            .insert(name.to_string(), self.inter_nodes.len());
        self.inter_nodes.push(InterNode {
            name: name.to_string(),
            home,
            adjacent,
        });
    }

    pub(crate) fn graph(&self) -> &DiGraph<PlanarNode, PlanarEdge> {
        &self.graph
    }

    pub(crate) fn index_of(&self, node: &str) -> GridResult<NodeIndex> {
        self.node_indices
            .get(node)
            .copied()
            .ok_or_else(|| GridError::lookup(format!("node '{node}' does not exist")))
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains_node(&self, node: &str) -> bool {
        self.node_indices.contains_key(node)
    }

    /// All nodes in discovery order.
    pub fn nodes(&self) -> impl Iterator<Item = &PlanarNode> {
        self.graph.node_weights()
    }

    /// All edges as records, in input order.
    pub fn edges(&self) -> impl Iterator<Item = EdgeRecord> + '_ {
        self.graph.edge_references().map(move |e| EdgeRecord {
            source: self.graph[e.source()].name.clone(),
            target: self.graph[e.target()].name.clone(),
            layer: e.weight().layer,
            kind: e.weight().kind,
        })
    }

    /// The edge `source -> target`, if present.
    pub fn edge(&self, source: &str, target: &str) -> Option<PlanarEdge> {
        let s = *self.node_indices.get(source)?;
        let t = *self.node_indices.get(target)?;
        self.graph
            .find_edge(s, t)
            .map(|e| self.graph[e])
    }

    /// Layers in ascending index order.
    pub fn layers(&self) -> impl Iterator<Item = &Layer> {
        self.layers.values()
    }

    pub fn layer(&self, layer: LayerId) -> GridResult<&Layer> {
        self.layers
            .get(&layer)
            .ok_or_else(|| GridError::lookup(format!("layer {layer} does not exist")))
    }

    /// Names of all nodes homed in `layer`, in discovery order.
    pub fn layer_nodes(&self, layer: LayerId) -> GridResult<Vec<&str>> {
        Ok(self
            .layer(layer)?
            .nodes
            .iter()
            .map(|&idx| self.graph[idx].name.as_str())
            .collect())
    }

    /// Exactly the edge records tagged with `layer`, in input order.
    pub fn layer_edges(&self, layer: LayerId) -> GridResult<Vec<EdgeRecord>> {
        self.layer(layer)?;
        Ok(self.edges().filter(|rec| rec.layer == layer).collect())
    }

    /// Directed subgraph of one layer.
    ///
    /// Keeps the nodes homed in `layer` and the intra edges tagged `layer`.
    /// Inter-nodes homed in the layer are kept as well, since its intra edges
    /// end on them.
    pub fn layer_graph(&self, layer: LayerId) -> GridResult<DiGraph<PlanarNode, PlanarEdge>> {
        self.layer(layer)?;
        Ok(self.graph.filter_map(
            |_, node| (node.layer == layer).then(|| node.clone()),
            |_, edge| (edge.kind == EdgeKind::Intra && edge.layer == layer).then_some(*edge),
        ))
    }

    /// Nodes of `layer` that are not inter-nodes, in discovery order.
    pub fn intra_nodes(&self, layer: LayerId) -> GridResult<Vec<&str>> {
        Ok(self
            .layer_nodes(layer)?
            .into_iter()
            .filter(|name| !self.inter_lookup.contains_key(*name))
            .collect())
    }

    /// All inter-nodes, in discovery order.
    pub fn inter_nodes(&self) -> impl Iterator<Item = &InterNode> {
        self.inter_nodes.iter()
    }

    pub fn inter_node(&self, node: &str) -> Option<&InterNode> {
        self.inter_lookup.get(node).map(|&i| &self.inter_nodes[i])
    }

    pub fn is_inter_node(&self, node: &str) -> bool {
        self.inter_lookup.contains_key(node)
    }

    pub fn role(&self, node: &str) -> GridResult<NodeRole> {
        self.index_of(node)?;
        Ok(if self.is_inter_node(node) {
            NodeRole::Inter
        } else {
            NodeRole::Intra
        })
    }

    /// Home layer of a node.
    pub fn find_layer(&self, node: &str) -> GridResult<LayerId> {
        let idx = self.index_of(node)?;
        Ok(self.graph[idx].layer)
    }

    /// Upper and lower layer of a node; both equal the home layer for
    /// intra-nodes.
    pub fn find_layers(&self, node: &str) -> GridResult<(LayerId, LayerId)> {
        let home = self.find_layer(node)?;
        Ok(match self.inter_node(node) {
            Some(inter) => (inter.upper(), inter.lower()),
            None => (home, home),
        })
    }

    /// Number of intra edges incident to a node, in either direction.
    pub fn intra_degree(&self, node: &str) -> GridResult<usize> {
        let idx = self.index_of(node)?;
        Ok(self
            .graph
            .edges_directed(idx, Direction::Outgoing)
            .chain(self.graph.edges_directed(idx, Direction::Incoming))
            .filter(|e| e.weight().kind == EdgeKind::Intra)
            .count())
    }

    /// Mark an existing node as an inter-node towards `adjacent`, which must
    /// be the layer directly above or below the node's home layer.
    ///
    /// Needed when the other terminal of a boundary is isolated, so no inter
    /// edge reveals it. An adjacent layer that does not exist yet is
    /// registered as a new, empty layer.
    pub fn add_inter_node(&mut self, node: &str, adjacent: LayerId) -> GridResult<()> {
        let idx = self.index_of(node)?;
        if let Some(existing) = self.inter_node(node) {
            return Err(GridError::conflict(format!(
                "inter-node '{}' already exists (layers {} and {})",
                node, existing.home, existing.adjacent
            )));
        }
        let home = self.graph[idx].layer;
        if adjacent == home {
            return Err(GridError::conflict(format!(
                "node '{node}' cannot be an inter-node towards its own layer {home}"
            )));
        }
        if !home.is_adjacent(adjacent) {
            return Err(GridError::conflict(format!(
                "node '{node}' in layer {home} cannot join layer {adjacent}, which is not adjacent"
            )));
        }
        if !self.layers.contains_key(&adjacent) {
            self.layers.insert(adjacent, Layer::new(adjacent));
            info!(layer = %adjacent, node, "new layer registered by inter-node");
        }
        self.push_inter_node(node, home, adjacent);
        debug!(node, home = %home, adjacent = %adjacent, "new inter-node");
        Ok(())
    }
}

fn claim_layer(
    slot: &mut Option<LayerId>,
    name: &str,
    layer: LayerId,
    what: &str,
) -> GridResult<()> {
    match *slot {
        Some(existing) if existing != layer => Err(GridError::conflict(format!(
            "node '{name}' has {what} in layers {existing} and {layer}"
        ))),
        _ => {
            *slot = Some(layer);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_layers() -> Vec<EdgeRecord> {
        vec![
            EdgeRecord::intra("a1", "a2", 0),
            EdgeRecord::intra("a2", "a3", 0),
            EdgeRecord::inter("a2", "b1", 1),
            EdgeRecord::intra("b1", "b2", 1),
        ]
    }

    #[test]
    fn test_layers_are_discovered() {
        let planar = PlanarGraph::from_edgelist(two_layers()).unwrap();
        let ids: Vec<_> = planar.layers().map(|l| l.id.value()).collect();
        assert_eq!(ids, vec![0, 1]);
        assert_eq!(planar.layer(LayerId::new(0)).unwrap().name, "layer0");
        assert_eq!(planar.layer_nodes(LayerId::new(0)).unwrap(), vec!["a1", "a2", "a3"]);
        assert_eq!(planar.layer_nodes(LayerId::new(1)).unwrap(), vec!["b1", "b2"]);
    }

    #[test]
    fn test_inter_nodes_are_classified() {
        let planar = PlanarGraph::from_edgelist(two_layers()).unwrap();
        let inter: Vec<_> = planar.inter_nodes().map(|n| n.name.as_str()).collect();
        assert_eq!(inter, vec!["a2"]);
        assert_eq!(planar.role("a2").unwrap(), NodeRole::Inter);
        assert_eq!(planar.role("b1").unwrap(), NodeRole::Intra);
        assert_eq!(planar.intra_nodes(LayerId::new(0)).unwrap(), vec!["a1", "a3"]);
        assert_eq!(
            planar.find_layers("a2").unwrap(),
            (LayerId::new(0), LayerId::new(1))
        );
        assert_eq!(
            planar.find_layers("a1").unwrap(),
            (LayerId::new(0), LayerId::new(0))
        );
    }

    #[test]
    fn test_layer_edges_match_input_subset() {
        let edges = two_layers();
        let planar = PlanarGraph::from_edgelist(edges.clone()).unwrap();
        for layer in [0, 1] {
            let expected: Vec<_> = edges
                .iter()
                .filter(|e| e.layer.value() == layer)
                .cloned()
                .collect();
            assert_eq!(planar.layer_edges(LayerId::new(layer)).unwrap(), expected);
        }
    }

    #[test]
    fn test_layer_graph_keeps_only_intra_edges() {
        let planar = PlanarGraph::from_edgelist(two_layers()).unwrap();
        let upper = planar.layer_graph(LayerId::new(0)).unwrap();
        assert_eq!(upper.node_count(), 3);
        assert_eq!(upper.edge_count(), 2);

        let lower = planar.layer_graph(LayerId::new(1)).unwrap();
        assert_eq!(lower.node_count(), 2);
        assert_eq!(lower.edge_count(), 1);
    }

    #[test]
    fn test_unknown_layer_and_node_are_lookup_errors() {
        let planar = PlanarGraph::from_edgelist(two_layers()).unwrap();
        assert!(matches!(
            planar.layer_edges(LayerId::new(7)),
            Err(GridError::Lookup(_))
        ));
        assert!(matches!(planar.find_layer("zz"), Err(GridError::Lookup(_))));
    }

    #[test]
    fn test_node_in_two_layers_conflicts() {
        let err = PlanarGraph::from_edgelist(vec![
            EdgeRecord::intra("a", "x", 0),
            EdgeRecord::intra("x", "b", 1),
        ])
        .unwrap_err();
        assert!(matches!(err, GridError::Conflict(_)));
    }

    #[test]
    fn test_duplicate_edge_and_self_loop_conflict() {
        let dup = PlanarGraph::from_edgelist(vec![
            EdgeRecord::intra("a", "b", 0),
            EdgeRecord::intra("a", "b", 0),
        ]);
        assert!(matches!(dup, Err(GridError::Conflict(_))));

        let looped = PlanarGraph::from_edgelist(vec![EdgeRecord::intra("a", "a", 0)]);
        assert!(matches!(looped, Err(GridError::Conflict(_))));
    }

    #[test]
    fn test_unresolvable_layer_is_lookup_error() {
        let err = PlanarGraph::from_edgelist(vec![EdgeRecord::inter("x", "b", 1)]).unwrap_err();
        assert!(matches!(err, GridError::Lookup(_)));
    }

    #[test]
    fn test_inter_edge_within_layer_conflicts() {
        let err = PlanarGraph::from_edgelist(vec![
            EdgeRecord::intra("a", "b", 0),
            EdgeRecord::inter("a", "c", 0),
        ])
        .unwrap_err();
        assert!(matches!(err, GridError::Conflict(_)));
    }

    #[test]
    fn test_add_inter_node() {
        let mut planar = PlanarGraph::from_edgelist(two_layers()).unwrap();
        planar.add_inter_node("b2", LayerId::new(2)).unwrap();

        assert!(planar.is_inter_node("b2"));
        assert_eq!(planar.layers().count(), 3);
        assert!(planar.layer(LayerId::new(2)).unwrap().is_empty());
        assert_eq!(planar.intra_nodes(LayerId::new(1)).unwrap(), vec!["b1"]);

        assert!(matches!(
            planar.add_inter_node("b2", LayerId::new(0)),
            Err(GridError::Conflict(_))
        ));
        assert!(matches!(
            planar.add_inter_node("a1", LayerId::new(0)),
            Err(GridError::Conflict(_))
        ));
        assert!(matches!(
            planar.add_inter_node("missing", LayerId::new(1)),
            Err(GridError::Lookup(_))
        ));
    }

    #[test]
    fn test_inter_node_must_join_adjacent_layers() {
        let err = PlanarGraph::from_edgelist(vec![
            EdgeRecord::intra("a1", "a2", 0),
            EdgeRecord::inter("a2", "c1", 2),
            EdgeRecord::intra("c1", "c2", 2),
        ])
        .unwrap_err();
        assert!(matches!(err, GridError::Conflict(_)));

        let mut planar = PlanarGraph::from_edgelist(two_layers()).unwrap();
        assert!(matches!(
            planar.add_inter_node("a1", LayerId::new(7)),
            Err(GridError::Conflict(_))
        ));
        assert!(!planar.is_inter_node("a1"));
        assert_eq!(planar.layers().count(), 2);
    }

    #[test]
    fn test_intra_degree() {
        let planar = PlanarGraph::from_edgelist(two_layers()).unwrap();
        assert_eq!(planar.intra_degree("a2").unwrap(), 2);
        assert_eq!(planar.intra_degree("b1").unwrap(), 1);
    }
}
