//! Supra graph with electrical elements re-keyed to supra ids.

use std::collections::BTreeMap;

use tracing::debug;

use crate::element::{Conversion, Delivery, StdTypes};
use crate::error::{GridError, GridResult};
use crate::graph::{LayerId, NodeRole, SupraEdgeId, SupraGraph, SupraNodeId};
use crate::units::Kilovolts;

/// Flattened grid, ready for power-flow conversion.
///
/// Built by [`planar2supra`](crate::transformation::planar2supra); read-only.
#[derive(Debug, Clone)]
pub struct SupraGrid {
    graph: SupraGraph,
    conversions: BTreeMap<SupraNodeId, Conversion>,
    deliveries: BTreeMap<SupraEdgeId, Delivery>,
    voltages: BTreeMap<LayerId, Kilovolts>,
    std_types: StdTypes,
}

impl SupraGrid {
    /// Assemble a supra grid, checking that all `expected_conversions`
    /// survived the re-keying and still sit on inter-nodes.
    pub(crate) fn from_parts(
        graph: SupraGraph,
        conversions: BTreeMap<SupraNodeId, Conversion>,
        deliveries: BTreeMap<SupraEdgeId, Delivery>,
        voltages: BTreeMap<LayerId, Kilovolts>,
        std_types: StdTypes,
        expected_conversions: usize,
    ) -> GridResult<Self> {
        if conversions.len() != expected_conversions {
            return Err(GridError::conflict(format!(
                "{} of {} conversion elements were retained while flattening",
                conversions.len(),
                expected_conversions
            )));
        }
        for (&id, element) in &conversions {
            let node = graph.node(id)?;
            if node.role != NodeRole::Inter {
                return Err(GridError::conflict(format!(
                    "conversion '{}' ended up on intra-node '{}'",
                    element.name(),
                    node.name
                )));
            }
        }
        for &id in deliveries.keys() {
            graph.edge(id)?;
        }

        debug!(
            conversions = conversions.len(),
            deliveries = deliveries.len(),
            "assembled supra grid"
        );
        Ok(Self {
            graph,
            conversions,
            deliveries,
            voltages,
            std_types,
        })
    }

    pub fn graph(&self) -> &SupraGraph {
        &self.graph
    }

    pub fn conversion(&self, node: SupraNodeId) -> Option<&Conversion> {
        self.conversions.get(&node)
    }

    /// Conversion elements in supra-id order.
    pub fn conversions(&self) -> impl Iterator<Item = (SupraNodeId, &Conversion)> {
        self.conversions.iter().map(|(&id, c)| (id, c))
    }

    pub fn delivery(&self, edge: SupraEdgeId) -> Option<&Delivery> {
        self.deliveries.get(&edge)
    }

    /// Delivery elements in supra-id order.
    pub fn deliveries(&self) -> impl Iterator<Item = (SupraEdgeId, &Delivery)> {
        self.deliveries.iter().map(|(&id, d)| (id, d))
    }

    pub fn layer_voltage(&self, layer: LayerId) -> Option<Kilovolts> {
        self.voltages.get(&layer).copied()
    }

    /// Nominal voltage of a bus, inherited from the layer it originates in.
    pub fn bus_voltage(&self, node: SupraNodeId) -> GridResult<Kilovolts> {
        let node = self.graph.node(node)?;
        self.layer_voltage(node.origin.layer).ok_or_else(|| {
            GridError::configuration(format!(
                "no nominal voltage set for layer {} (needed by bus '{}')",
                node.origin.layer, node.name
            ))
        })
    }

    pub fn std_types(&self) -> &StdTypes {
        &self.std_types
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::SupraGrid;
    use crate::element::{Conversion, Delivery, ExternalGrid, LineType, StdTypes};
    use crate::graph::{EdgeRecord, LayerId, SupraGraph};
    use crate::grid::PlanarGrid;
    use crate::transformation::planar2supra;
    use crate::GridError;

    fn planar_grid() -> PlanarGrid {
        let mut grid = PlanarGrid::from_edgelist(vec![
            EdgeRecord::intra("a1", "a2", 0),
            EdgeRecord::inter("a2", "b1", 1),
            EdgeRecord::intra("b1", "b2", 1),
        ])
        .unwrap();
        grid.add_conversion("a2", ExternalGrid::new("slack", 1.0))
            .unwrap();
        grid.add_delivery(
            "b1",
            "b2",
            Delivery::cable(
                "c1",
                0.3,
                1,
                LineType {
                    r_ohm_per_km: 0.2,
                    x_ohm_per_km: 0.08,
                    c_nf_per_km: 210.0,
                    max_i_ka: 0.3,
                },
            ),
        )
        .unwrap();
        grid.set_layer_voltage(LayerId::new(0), 10.0).unwrap();
        grid
    }

    #[test]
    fn test_elements_are_rekeyed() {
        let supra = planar2supra(&planar_grid()).unwrap();
        let graph = supra.graph();

        let a2 = graph.node_id("a2").unwrap();
        assert_eq!(supra.conversion(a2).unwrap().name(), "slack");
        assert_eq!(supra.conversions().count(), 1);

        let edge = graph.find_edge("b1", "b2").unwrap();
        assert_eq!(supra.delivery(edge.id).unwrap().name(), "c1");
        assert_eq!(supra.deliveries().count(), 1);
    }

    #[test]
    fn test_bus_voltage_comes_from_origin_layer() {
        let supra = planar2supra(&planar_grid()).unwrap();
        let graph = supra.graph();

        let a2 = graph.node_id("a2").unwrap();
        assert_eq!(supra.bus_voltage(a2).unwrap().value(), 10.0);

        let b1 = graph.node_id("b1").unwrap();
        assert!(matches!(
            supra.bus_voltage(b1),
            Err(GridError::Configuration(_))
        ));
    }

    #[test]
    fn test_lost_conversion_conflicts() {
        let planar = planar_grid();
        let graph = SupraGraph::from(planar.graph());
        let a2 = graph.node_id("a2").unwrap();
        let conversions: BTreeMap<_, Conversion> =
            BTreeMap::from([(a2, ExternalGrid::new("slack", 1.0).into())]);

        let err = SupraGrid::from_parts(
            graph,
            conversions,
            BTreeMap::new(),
            BTreeMap::new(),
            StdTypes::new(),
            2,
        )
        .unwrap_err();
        assert!(matches!(err, GridError::Conflict(_)));
    }

    #[test]
    fn test_conversion_on_intra_node_conflicts() {
        let graph = SupraGraph::from(planar_grid().graph());
        let a1 = graph.node_id("a1").unwrap();
        let conversions: BTreeMap<_, Conversion> =
            BTreeMap::from([(a1, ExternalGrid::new("slack", 1.0).into())]);

        let err = SupraGrid::from_parts(
            graph,
            conversions,
            BTreeMap::new(),
            BTreeMap::new(),
            StdTypes::new(),
            1,
        )
        .unwrap_err();
        assert!(matches!(err, GridError::Conflict(_)));
    }
}
