//! Electrical elements carried by a grid.
//!
//! Conversions sit on inter-nodes, deliveries on edges. Both are tagged
//! variants matched once when a grid is converted for power flow.

pub mod conversion;
pub mod delivery;
pub mod types;

pub use conversion::{Conversion, Ejection, ExternalGrid, DEFAULT_Q_TOLERANCE_MVAR};
pub use delivery::{CableEssential, Delivery, Parameters, ResolvedDelivery, TransformerEssential};
pub use types::{LineType, StdTypes, TransformerType};
