//! Graphs with electrical elements attached.
//!
//! A [`PlanarGrid`] is edited in place; [`planar2supra`](crate::planar2supra)
//! turns it into a read-only [`SupraGrid`].

pub mod planar;
pub mod supra;

pub use planar::{GridSummary, PlanarGrid};
pub use supra::SupraGrid;
