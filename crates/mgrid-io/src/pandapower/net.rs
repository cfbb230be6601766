//! Tabular pandapower network, one row struct per element table.
//!
//! Column names follow pandapower's own tables so that the JSON hand-off can
//! be read with `pandapower.from_json_string` without renaming.

use mgrid_core::StdTypes;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BusRow {
    pub index: usize,
    pub name: String,
    pub vn_kv: f64,
    /// Always `"b"` (busbar)
    #[serde(rename = "type")]
    pub bus_type: String,
    /// Name of the layer the bus originates in
    pub zone: String,
    pub in_service: bool,
}

/// A cable, converted to a pandapower line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineRow {
    pub index: usize,
    pub name: String,
    pub std_type: Option<String>,
    pub from_bus: usize,
    pub to_bus: usize,
    pub length_km: f64,
    pub r_ohm_per_km: f64,
    pub x_ohm_per_km: f64,
    pub c_nf_per_km: f64,
    pub g_us_per_km: f64,
    pub max_i_ka: f64,
    /// Derating factor
    pub df: f64,
    pub parallel: u32,
    /// Always `"cs"` (cable system)
    #[serde(rename = "type")]
    pub line_type: String,
    pub in_service: bool,
}

impl LineRow {
    /// Series resistance of all parallel systems together, in ohm.
    pub fn total_r_ohm(&self) -> f64 {
        self.r_ohm_per_km * self.length_km / f64::from(self.parallel)
    }

    /// Series reactance of all parallel systems together, in ohm.
    pub fn total_x_ohm(&self) -> f64 {
        self.x_ohm_per_km * self.length_km / f64::from(self.parallel)
    }

    /// Thermal limit of all parallel systems together, in kA.
    pub fn total_max_i_ka(&self) -> f64 {
        self.max_i_ka * self.df * f64::from(self.parallel)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrafoRow {
    pub index: usize,
    pub name: String,
    pub std_type: Option<String>,
    pub hv_bus: usize,
    pub lv_bus: usize,
    pub sn_mva: f64,
    pub vn_hv_kv: f64,
    pub vn_lv_kv: f64,
    pub vk_percent: f64,
    pub vkr_percent: f64,
    pub pfe_kw: f64,
    pub i0_percent: f64,
    pub shift_degree: f64,
    pub parallel: u32,
    pub df: f64,
    pub in_service: bool,
}

impl TrafoRow {
    /// Short-circuit impedance magnitude of all parallel units, referred to
    /// the low-voltage side, in ohm.
    pub fn total_z_lv_ohm(&self) -> f64 {
        self.vk_percent / 100.0 * self.vn_lv_kv.powi(2) / self.sn_mva / f64::from(self.parallel)
    }

    /// Short-circuit resistance of all parallel units, referred to the
    /// low-voltage side, in ohm.
    pub fn total_r_lv_ohm(&self) -> f64 {
        self.vkr_percent / 100.0 * self.vn_lv_kv.powi(2) / self.sn_mva / f64::from(self.parallel)
    }

    pub fn total_sn_mva(&self) -> f64 {
        self.sn_mva * f64::from(self.parallel)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtGridRow {
    pub index: usize,
    pub name: String,
    pub bus: usize,
    pub vm_pu: f64,
    pub va_degree: f64,
    pub in_service: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadRow {
    pub index: usize,
    pub name: String,
    pub bus: usize,
    pub p_mw: f64,
    pub q_mvar: f64,
    pub scaling: f64,
    pub in_service: bool,
}

/// A pandapower network ready for hand-off.
///
/// Bus indices equal supra node ids; every other table is indexed from zero
/// in supra order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PandapowerNet {
    pub name: String,
    pub f_hz: f64,
    pub sn_mva: f64,
    pub bus: Vec<BusRow>,
    pub line: Vec<LineRow>,
    pub trafo: Vec<TrafoRow>,
    pub ext_grid: Vec<ExtGridRow>,
    pub load: Vec<LoadRow>,
    pub std_types: StdTypes,
}

impl PandapowerNet {
    pub fn bus_by_name(&self, name: &str) -> Option<&BusRow> {
        self.bus.iter().find(|b| b.name == name)
    }

    /// Total active power drawn by all loads, in MW.
    pub fn total_load_mw(&self) -> f64 {
        self.load.iter().map(|l| l.p_mw * l.scaling).sum()
    }

    /// Total reactive power drawn by all loads, in Mvar.
    pub fn total_load_mvar(&self) -> f64 {
        self.load.iter().map(|l| l.q_mvar * l.scaling).sum()
    }
}
