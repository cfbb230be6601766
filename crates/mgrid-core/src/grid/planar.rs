//! Planar graph with electrical elements attached.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, warn};

use crate::diagnostics::Diagnostics;
use crate::element::{
    Conversion, Delivery, LineType, StdTypes, TransformerType, DEFAULT_Q_TOLERANCE_MVAR,
};
use crate::error::{GridError, GridResult};
use crate::graph::{EdgeRecord, LayerId, PlanarGraph};
use crate::units::Kilovolts;

/// Multilayer grid in planar form.
///
/// Conversions are keyed by inter-node name, deliveries by
/// `(source, target)`. Each inter-node carries at most one conversion and
/// each edge at most one delivery.
#[derive(Debug, Clone, Default)]
pub struct PlanarGrid {
    graph: PlanarGraph,
    conversions: BTreeMap<String, Conversion>,
    deliveries: BTreeMap<(String, String), Delivery>,
    voltages: BTreeMap<LayerId, Kilovolts>,
    std_types: StdTypes,
}

/// Per-grid element counts, for logging and reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GridSummary {
    pub layers: usize,
    pub nodes: usize,
    pub edges: usize,
    pub inter_nodes: usize,
    pub conversions: usize,
    pub deliveries: usize,
}

impl PlanarGrid {
    pub fn new(graph: PlanarGraph) -> Self {
        Self {
            graph,
            ..Self::default()
        }
    }

    pub fn from_edgelist<I>(records: I) -> GridResult<Self>
    where
        I: IntoIterator<Item = EdgeRecord>,
    {
        Ok(Self::new(PlanarGraph::from_edgelist(records)?))
    }

    pub fn graph(&self) -> &PlanarGraph {
        &self.graph
    }

    /// Attach a conversion element to an inter-node.
    pub fn add_conversion(&mut self, node: &str, element: impl Into<Conversion>) -> GridResult<()> {
        if !self.graph.contains_node(node) {
            return Err(GridError::lookup(format!("node '{node}' does not exist")));
        }
        if !self.graph.is_inter_node(node) {
            return Err(GridError::conflict(format!(
                "node '{node}' is not an inter-node and cannot carry a conversion"
            )));
        }
        if let Some(existing) = self.conversions.get(node) {
            return Err(GridError::conflict(format!(
                "inter-node '{node}' already carries conversion '{}'",
                existing.name()
            )));
        }
        let element = element.into();
        debug!(node, kind = element.kind(), name = element.name(), "conversion added");
        self.conversions.insert(node.to_string(), element);
        Ok(())
    }

    /// Reclassify an existing node as an inter-node towards `adjacent`.
    ///
    /// Intra edges already on the node stay attached to it; after flattening
    /// they end on the single supra node of the boundary. Returns how many
    /// intra edges were migrated this way.
    pub fn add_inter_node(&mut self, node: &str, adjacent: LayerId) -> GridResult<usize> {
        let degree = self.graph.intra_degree(node)?;
        self.graph.add_inter_node(node, adjacent)?;
        if degree > 0 {
            warn!(
                node,
                intra_edges = degree,
                adjacent = %adjacent,
                "intra-node reclassified as inter-node; its intra edges now end on the boundary"
            );
        }
        Ok(degree)
    }

    /// Attach a delivery element to the edge `source -> target`.
    pub fn add_delivery(&mut self, source: &str, target: &str, element: Delivery) -> GridResult<()> {
        if self.graph.edge(source, target).is_none() {
            return Err(GridError::lookup(format!(
                "edge {source} -> {target} does not exist"
            )));
        }
        let key = (source.to_string(), target.to_string());
        if let Some(existing) = self.deliveries.get(&key) {
            return Err(GridError::conflict(format!(
                "edge {source} -> {target} already carries {} '{}'",
                existing.kind(),
                existing.name()
            )));
        }
        debug!(source, target, kind = element.kind(), name = element.name(), "delivery added");
        self.deliveries.insert(key, element);
        Ok(())
    }

    /// Set the nominal voltage shared by every bus of `layer`.
    pub fn set_layer_voltage(&mut self, layer: LayerId, kv: f64) -> GridResult<()> {
        self.graph.layer(layer)?;
        if !(kv > 0.0 && kv.is_finite()) {
            return Err(GridError::validation(format!(
                "layer {layer} voltage must be positive, got {kv} kV"
            )));
        }
        self.voltages.insert(layer, Kilovolts(kv));
        Ok(())
    }

    pub fn add_line_type(&mut self, name: impl Into<String>, line: LineType) {
        self.std_types.add_line_type(name, line);
    }

    pub fn add_transformer_type(&mut self, name: impl Into<String>, trafo: TransformerType) {
        self.std_types.add_transformer_type(name, trafo);
    }

    /// Replace the whole standard-type catalogue.
    pub fn set_std_types(&mut self, std_types: StdTypes) {
        self.std_types = std_types;
    }

    pub fn std_types(&self) -> &StdTypes {
        &self.std_types
    }

    pub fn conversion(&self, node: &str) -> Option<&Conversion> {
        self.conversions.get(node)
    }

    pub fn conversions(&self) -> impl Iterator<Item = (&str, &Conversion)> {
        self.conversions.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn delivery(&self, source: &str, target: &str) -> Option<&Delivery> {
        self.deliveries
            .get(&(source.to_string(), target.to_string()))
    }

    pub fn deliveries(&self) -> impl Iterator<Item = ((&str, &str), &Delivery)> {
        self.deliveries
            .iter()
            .map(|((s, t), d)| ((s.as_str(), t.as_str()), d))
    }

    pub fn layer_voltage(&self, layer: LayerId) -> Option<Kilovolts> {
        self.voltages.get(&layer).copied()
    }

    pub fn summary(&self) -> GridSummary {
        GridSummary {
            layers: self.graph.layers().count(),
            nodes: self.graph.node_count(),
            edges: self.graph.edge_count(),
            inter_nodes: self.graph.inter_nodes().count(),
            conversions: self.conversions.len(),
            deliveries: self.deliveries.len(),
        }
    }

    /// Report everything that would stop or degrade a power-flow conversion.
    ///
    /// Errors: inter-nodes without a conversion, populated layers without a
    /// voltage, unresolvable or inconsistent elements. Warnings: edges without
    /// a delivery element and empty layers without a voltage.
    pub fn validate_into(&self, diag: &mut Diagnostics) {
        for inter in self.graph.inter_nodes() {
            match self.conversions.get(&inter.name) {
                None => diag.add_error_with_entity(
                    "conversion",
                    "inter-node has no conversion element",
                    &inter.name,
                ),
                Some(Conversion::Ejection(load)) => {
                    if let Err(e) = load.reactive_power(DEFAULT_Q_TOLERANCE_MVAR) {
                        diag.add_error_with_entity("conversion", &e.to_string(), &inter.name);
                    }
                }
                Some(Conversion::ExternalGrid(_)) => {}
            }
        }

        for layer in self.graph.layers() {
            if self.voltages.contains_key(&layer.id) {
                continue;
            }
            let msg = format!("layer {} has no nominal voltage", layer.id);
            if layer.is_empty() {
                diag.add_warning_with_entity("voltage", &msg, &layer.name);
            } else {
                diag.add_error_with_entity("voltage", &msg, &layer.name);
            }
        }

        for rec in self.graph.edges() {
            let entity = format!("{}->{}", rec.source, rec.target);
            match self.delivery(&rec.source, &rec.target) {
                None => diag.add_warning_with_entity(
                    "delivery",
                    "edge has no delivery element and will be skipped",
                    &entity,
                ),
                Some(delivery) => {
                    if let Err(e) = delivery.resolve(&self.std_types) {
                        let category = match e {
                            GridError::Configuration(_) => "std_type",
                            _ => "delivery",
                        };
                        diag.add_error_with_entity(category, &e.to_string(), &entity);
                    }
                }
            }
        }
    }
}
