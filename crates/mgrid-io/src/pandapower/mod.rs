//! pandapower hand-off: conversion of supra grids into pandapower tables and
//! the pandapower JSON format.
//!
//! Reference: <https://pandapower.readthedocs.io/en/latest/file_io.html>

mod convert;
mod json;
mod net;

pub use convert::{supra2pandapower, supra2pandapower_with};
pub use json::PANDAPOWER_FORMAT_VERSION;
pub use net::{BusRow, ExtGridRow, LineRow, LoadRow, PandapowerNet, TrafoRow};
