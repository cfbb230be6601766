use std::collections::{BTreeMap, BTreeSet};

use petgraph::unionfind::UnionFind;
use serde::Serialize;

use crate::graph::{LayerId, SupraGraph, SupraNodeId};

/// Size of one layer of a supra graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayerStats {
    pub layer: LayerId,
    pub name: String,
    pub intra_nodes: usize,
    pub intra_edges: usize,
}

/// Summary of a supra graph, layer by layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphStats {
    pub node_count: usize,
    pub edge_count: usize,
    pub inter_node_count: usize,
    pub inter_edge_count: usize,
    pub layers: Vec<LayerStats>,
    pub islands: usize,
    /// Undirected degree of the best-connected node
    pub max_degree: usize,
}

/// One connected component of the undirected view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IslandSummary {
    pub island_id: usize,
    pub node_count: usize,
    /// Layers the island's nodes originate from
    pub layers: BTreeSet<LayerId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IslandAnalysis {
    pub islands: Vec<IslandSummary>,
    /// Island id per supra node id
    membership: Vec<usize>,
}

impl IslandAnalysis {
    pub fn island_of(&self, node: SupraNodeId) -> Option<usize> {
        self.membership.get(node.value()).copied()
    }

    /// Supra ids of the nodes in `island`, ascending.
    pub fn members(&self, island: usize) -> impl Iterator<Item = SupraNodeId> + '_ {
        self.membership
            .iter()
            .enumerate()
            .filter(move |(_, &id)| id == island)
            .map(|(node, _)| SupraNodeId::new(node))
    }
}

pub fn graph_stats(supra: &SupraGraph) -> GraphStats {
    let mut intra_edges: BTreeMap<LayerId, usize> = BTreeMap::new();
    for edge in supra.intra_edges() {
        *intra_edges.entry(edge.layer).or_default() += 1;
    }
    let layers = supra
        .layers()
        .iter()
        .map(|layer| LayerStats {
            layer: layer.id,
            name: layer.name.clone(),
            intra_nodes: layer.range.len(),
            intra_edges: intra_edges.get(&layer.id).copied().unwrap_or(0),
        })
        .collect();

    GraphStats {
        node_count: supra.node_count(),
        edge_count: supra.edge_count(),
        inter_node_count: supra.inter_nodes().count(),
        inter_edge_count: supra.inter_edges().count(),
        layers,
        islands: find_islands(supra).islands.len(),
        max_degree: supra
            .nodelist()
            .map(|n| supra.neighbors(n.id).count())
            .max()
            .unwrap_or(0),
    }
}

/// Connected components of the supra graph, ignoring edge direction.
///
/// Islands are numbered in order of their smallest node id, so island 0
/// always holds supra node 0.
pub fn find_islands(supra: &SupraGraph) -> IslandAnalysis {
    let mut sets = UnionFind::<usize>::new(supra.node_count());
    for edge in supra.edges() {
        sets.union(edge.source.value(), edge.target.value());
    }

    let mut island_by_root = BTreeMap::new();
    let mut islands: Vec<IslandSummary> = Vec::new();
    let mut membership = Vec::with_capacity(supra.node_count());
    for node in supra.nodelist() {
        let root = sets.find_mut(node.id.value());
        let island_id = *island_by_root.entry(root).or_insert_with(|| {
            islands.push(IslandSummary {
                island_id: islands.len(),
                node_count: 0,
                layers: BTreeSet::new(),
            });
            islands.len() - 1
        });
        let island = &mut islands[island_id];
        island.node_count += 1;
        island.layers.insert(node.origin.layer);
        membership.push(island_id);
    }

    IslandAnalysis {
        islands,
        membership,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{EdgeRecord, PlanarGraph};

    /// a-b joined through a2, plus a detached c pair in layer 1.
    fn supra() -> SupraGraph {
        let planar = PlanarGraph::from_edgelist(vec![
            EdgeRecord::intra("a1", "a2", 0),
            EdgeRecord::inter("a2", "b1", 1),
            EdgeRecord::intra("b1", "b2", 1),
            EdgeRecord::intra("c1", "c2", 1),
        ])
        .unwrap();
        SupraGraph::from(&planar)
    }

    #[test]
    fn test_graph_stats() {
        let stats = graph_stats(&supra());
        assert_eq!(stats.node_count, 6);
        assert_eq!(stats.edge_count, 4);
        assert_eq!(stats.inter_node_count, 1);
        assert_eq!(stats.inter_edge_count, 1);
        assert_eq!(stats.islands, 2);
        assert_eq!(stats.max_degree, 2);

        let per_layer: Vec<_> = stats
            .layers
            .iter()
            .map(|l| (l.layer.value(), l.intra_nodes, l.intra_edges))
            .collect();
        assert_eq!(per_layer, vec![(0, 1, 1), (1, 4, 2)]);
    }

    #[test]
    fn test_find_islands() {
        let supra = supra();
        let analysis = find_islands(&supra);
        assert_eq!(analysis.islands.len(), 2);

        let a1 = supra.node_id("a1").unwrap();
        let c2 = supra.node_id("c2").unwrap();
        assert_eq!(analysis.island_of(a1), Some(0));
        assert_eq!(analysis.island_of(c2), Some(1));
        assert_eq!(analysis.island_of(SupraNodeId::new(99)), None);

        let main = &analysis.islands[0];
        assert_eq!(main.node_count, 4);
        assert_eq!(
            main.layers.iter().map(|l| l.value()).collect::<Vec<_>>(),
            vec![0, 1]
        );
        let detached: Vec<_> = analysis.members(1).collect();
        assert_eq!(detached, vec![supra.node_id("c1").unwrap(), c2]);
    }

    #[test]
    fn test_empty_graph_has_no_islands() {
        let planar = PlanarGraph::from_edgelist(Vec::new()).unwrap();
        let supra = SupraGraph::from(&planar);
        assert!(find_islands(&supra).islands.is_empty());
        assert_eq!(graph_stats(&supra).max_degree, 0);
    }
}
