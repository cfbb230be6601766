//! # mgrid-io: input and hand-off for multilayer grids
//!
//! - [`read_edgelist`] reads [`EdgeRecord`](mgrid_core::EdgeRecord)s from CSV
//! - [`supra2pandapower`] converts a [`SupraGrid`](mgrid_core::SupraGrid) into
//!   pandapower tables, serialized with [`PandapowerNet::to_json`]
//! - [`ConversionConfig`] holds the conversion settings (TOML)
//!
//! Domain failures surface as [`GridError`](mgrid_core::GridError); file and
//! parsing helpers return `anyhow::Result` with context.

pub mod config;
pub mod edgelist;
pub mod pandapower;

pub use config::ConversionConfig;
pub use edgelist::{read_edgelist, read_edgelist_path};
pub use pandapower::{supra2pandapower, supra2pandapower_with, PandapowerNet};
