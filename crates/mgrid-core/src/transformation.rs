//! Flattening of planar graphs and grids into supra form.
//!
//! Relabeling is deterministic: layers are visited in ascending order, each
//! layer's intra-nodes get consecutive ids in discovery order starting at a
//! running offset, and the inter-nodes follow after the last layer. Intra
//! edges are copied layer by layer, then inter edges, each group in input
//! order.

use std::collections::BTreeMap;

use petgraph::visit::EdgeRef;
use tracing::debug;

use crate::error::{GridError, GridResult};
use crate::graph::{
    EdgeKind, LayerId, NodeRole, Origin, PlanarGraph, SupraGraph, SupraNodeId,
};
use crate::grid::{PlanarGrid, SupraGrid};

/// Flatten a planar graph into a supra graph.
pub fn flatten_graph(planar: &PlanarGraph) -> SupraGraph {
    let graph = planar.graph();
    let mut supra = SupraGraph::new();
    // planar node index -> supra id; every node is filled by one of the two
    // passes below since a node is either an intra-node of its home layer or
    // an inter-node
    let mut relabel = vec![SupraNodeId::new(0); graph.node_count()];

    for layer in planar.layers() {
        let start = supra.node_count();
        for &idx in &layer.nodes {
            let node = &graph[idx];
            if planar.is_inter_node(&node.name) {
                continue;
            }
            relabel[idx.index()] =
                supra.push_node(&node.name, NodeRole::Intra, Origin::new(layer.id, &node.name));
        }
        supra.push_layer(layer.id, &layer.name, start..supra.node_count());
    }

    for inter in planar.inter_nodes() {
        if let Ok(idx) = planar.index_of(&inter.name) {
            relabel[idx.index()] =
                supra.push_node(&inter.name, NodeRole::Inter, Origin::new(inter.home, &inter.name));
        }
    }

    for layer in planar.layers() {
        for edge in graph.edge_references() {
            let weight = edge.weight();
            if weight.kind == EdgeKind::Intra && weight.layer == layer.id {
                supra.push_edge(
                    relabel[edge.source().index()],
                    relabel[edge.target().index()],
                    EdgeKind::Intra,
                    weight.layer,
                );
            }
        }
    }
    for edge in graph.edge_references() {
        let weight = edge.weight();
        if weight.kind == EdgeKind::Inter {
            supra.push_edge(
                relabel[edge.source().index()],
                relabel[edge.target().index()],
                EdgeKind::Inter,
                weight.layer,
            );
        }
    }

    debug!(
        layers = supra.layers().len(),
        nodes = supra.node_count(),
        intra_edges = supra.intra_edges().count(),
        inter_edges = supra.inter_edges().count(),
        "flattened planar graph"
    );
    supra
}

impl From<&PlanarGraph> for SupraGraph {
    fn from(planar: &PlanarGraph) -> Self {
        flatten_graph(planar)
    }
}

/// Flatten a planar grid, carrying every element over to the supra ids.
///
/// Inter-nodes without a conversion are kept in the topology; the power-flow
/// conversion rejects them later.
pub fn planar2supra(grid: &PlanarGrid) -> GridResult<SupraGrid> {
    let supra = flatten_graph(grid.graph());

    let mut conversions = BTreeMap::new();
    for (node, element) in grid.conversions() {
        conversions.insert(supra.node_id(node)?, element.clone());
    }

    let mut deliveries = BTreeMap::new();
    for ((source, target), element) in grid.deliveries() {
        let edge = supra.find_edge(source, target).ok_or_else(|| {
            GridError::lookup(format!("edge {source} -> {target} was lost while flattening"))
        })?;
        deliveries.insert(edge.id, element.clone());
    }

    let voltages: BTreeMap<LayerId, _> = grid
        .graph()
        .layers()
        .filter_map(|layer| grid.layer_voltage(layer.id).map(|kv| (layer.id, kv)))
        .collect();

    SupraGrid::from_parts(
        supra,
        conversions,
        deliveries,
        voltages,
        grid.std_types().clone(),
        grid.conversions().count(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::EdgeRecord;

    fn planar() -> PlanarGraph {
        PlanarGraph::from_edgelist(vec![
            EdgeRecord::intra("a1", "a2", 0),
            EdgeRecord::intra("a2", "a3", 0),
            EdgeRecord::inter("a2", "b1", 1),
            EdgeRecord::intra("b1", "b2", 1),
            EdgeRecord::intra("b2", "b3", 1),
        ])
        .unwrap()
    }

    #[test]
    fn test_relabeling_is_layer_by_layer() {
        let supra = flatten_graph(&planar());
        let names: Vec<_> = supra.nodelist().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["a1", "a3", "b1", "b2", "b3", "a2"]);
        assert_eq!(supra.layer_range(LayerId::new(0)).unwrap(), 0..2);
        assert_eq!(supra.layer_range(LayerId::new(1)).unwrap(), 2..5);
    }

    #[test]
    fn test_inter_node_appears_once_with_home_origin() {
        let supra = flatten_graph(&planar());
        let inter: Vec<_> = supra.inter_nodes().collect();
        assert_eq!(inter.len(), 1);
        assert_eq!(inter[0].id, SupraNodeId::new(5));
        assert_eq!(inter[0].origin, Origin::new(LayerId::new(0), "a2"));
    }

    #[test]
    fn test_edges_keep_kind_and_origins() {
        let supra = flatten_graph(&planar());
        assert_eq!(supra.intra_edges().count(), 4);
        assert_eq!(supra.inter_edges().count(), 1);

        let inter = supra.inter_edges().next().unwrap();
        assert_eq!(inter.source, SupraNodeId::new(5));
        assert_eq!(inter.target, SupraNodeId::new(2));
        assert_eq!(inter.layer, LayerId::new(1));
        assert_eq!(inter.source_origin.layer, LayerId::new(0));
        assert_eq!(inter.target_origin, Origin::new(LayerId::new(1), "b1"));

        // a1 -> a2 keeps its direction through the relabel
        let first = supra.find_edge("a1", "a2").unwrap();
        assert_eq!(first.kind, EdgeKind::Intra);
        assert_eq!((first.source, first.target), (SupraNodeId::new(0), SupraNodeId::new(5)));
    }

    #[test]
    fn test_from_impl_matches_flatten() {
        let planar = planar();
        let a = SupraGraph::from(&planar);
        let b = flatten_graph(&planar);
        assert!(a.nodelist().eq(b.nodelist()));
        assert!(a.edges().eq(b.edges()));
    }

    #[test]
    fn test_empty_layer_gets_empty_range() {
        let mut planar = planar();
        planar.add_inter_node("b3", LayerId::new(2)).unwrap();
        let supra = flatten_graph(&planar);
        assert!(supra.layer_range(LayerId::new(2)).unwrap().is_empty());
        assert_eq!(supra.inter_nodes().count(), 2);
        assert_eq!(supra.node_count(), planar.node_count());
    }
}
