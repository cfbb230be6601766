//! # mgrid-core: Multilayer Power Grid Modelling
//!
//! Data structures for power grids spread over several voltage layers
//! (transmission, medium voltage, low voltage, ...).
//!
//! ## Design
//!
//! A grid is first described in **planar** form: each layer is a directed
//! graph of its own, and inter-nodes (substations, connection points) join a
//! layer to one adjacent layer. The planar form is then flattened into a
//! **supra** graph, one integer namespace where every node and edge remembers
//! its planar origin. Power-flow back ends consume the supra form.
//!
//! Electrical elements ride on top of the topology:
//! - [`Conversion`] elements on inter-nodes ([`ExternalGrid`], [`Ejection`])
//! - [`Delivery`] elements on edges (cables, transformers), given explicitly
//!   or by name from a [`StdTypes`] catalogue
//!
//! ## Quick Start
//!
//! ```rust
//! use mgrid_core::*;
//!
//! let mut grid = PlanarGrid::from_edgelist(vec![
//!     EdgeRecord::intra("a1", "a2", 0),
//!     EdgeRecord::inter("a2", "b1", 1),
//!     EdgeRecord::intra("b1", "b2", 1),
//! ])?;
//!
//! grid.add_conversion("a2", ExternalGrid::new("upstream", 1.0))?;
//! grid.set_layer_voltage(LayerId::new(0), 20.0)?;
//! grid.set_layer_voltage(LayerId::new(1), 0.4)?;
//!
//! let supra = planar2supra(&grid)?;
//! assert_eq!(supra.graph().node_count(), 4);
//! # Ok::<(), GridError>(())
//! ```
//!
//! ## Modules
//!
//! - [`graph`] - planar and supra topologies
//! - [`grid`] - topologies with elements attached
//! - [`element`] - conversion and delivery elements, standard types
//! - [`transformation`] - planar to supra flattening
//! - [`graph_utils`] - statistics and island detection
//! - [`diagnostics`] - pre-flight issue collection
//! - [`units`] - unit newtypes

pub mod diagnostics;
pub mod element;
pub mod error;
pub mod graph;
pub mod graph_utils;
pub mod grid;
pub mod transformation;
pub mod units;

pub use diagnostics::{DiagnosticIssue, Diagnostics, Severity};
pub use element::{
    CableEssential, Conversion, Delivery, Ejection, ExternalGrid, LineType, Parameters,
    ResolvedDelivery, StdTypes, TransformerEssential, TransformerType,
};
pub use error::{GridError, GridResult};
pub use graph::{
    EdgeKind, EdgeRecord, InterNode, LayerId, NodeRole, Origin, PlanarGraph, SupraEdge,
    SupraEdgeId, SupraGraph, SupraNode, SupraNodeId,
};
pub use graph_utils::*;
pub use grid::{PlanarGrid, SupraGrid};
pub use transformation::{flatten_graph, planar2supra};
pub use units::{Degrees, Kilovolts, Megavars, MegavoltAmperes, Megawatts, PerUnit};
