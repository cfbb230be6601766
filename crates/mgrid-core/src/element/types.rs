//! Standard-type catalogue records.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{GridError, GridResult};

/// Per-kilometre constants of a cable or overhead line type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineType {
    /// Resistance in ohm per kilometre
    pub r_ohm_per_km: f64,
    /// Reactance in ohm per kilometre
    pub x_ohm_per_km: f64,
    /// Capacitance in nanofarad per kilometre
    pub c_nf_per_km: f64,
    /// Maximum thermal current in kiloampere
    pub max_i_ka: f64,
}

/// Rated constants of a two-winding transformer (one-phase equivalent).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformerType {
    /// Rated apparent power in MVA
    pub sn_mva: f64,
    /// Nominal high-side voltage in kV
    pub vn_hv_kv: f64,
    /// Nominal low-side voltage in kV
    pub vn_lv_kv: f64,
    /// Relative short-circuit voltage in percent
    pub vk_percent: f64,
    /// Real part of the relative short-circuit voltage in percent
    pub vkr_percent: f64,
    /// Iron losses in kW
    pub pfe_kw: f64,
    /// No-load current in percent
    pub i0_percent: f64,
    #[serde(default)]
    pub shift_degree: f64,
}

impl TransformerType {
    pub(crate) fn check(&self, name: &str) -> GridResult<()> {
        if self.sn_mva <= 0.0 {
            return Err(GridError::validation(format!(
                "transformer '{name}' has non-positive rated power {} MVA",
                self.sn_mva
            )));
        }
        if self.vkr_percent > self.vk_percent {
            return Err(GridError::validation(format!(
                "transformer '{name}' has vkr_percent {} above vk_percent {}",
                self.vkr_percent, self.vk_percent
            )));
        }
        Ok(())
    }
}

/// Catalogue of named standard types.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StdTypes {
    #[serde(default)]
    pub line: BTreeMap<String, LineType>,
    #[serde(default)]
    pub trafo: BTreeMap<String, TransformerType>,
}

impl StdTypes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a line type, returning the entry it replaced.
    pub fn add_line_type(&mut self, name: impl Into<String>, line: LineType) -> Option<LineType> {
        self.line.insert(name.into(), line)
    }

    /// Register a transformer type, returning the entry it replaced.
    pub fn add_transformer_type(
        &mut self,
        name: impl Into<String>,
        trafo: TransformerType,
    ) -> Option<TransformerType> {
        self.trafo.insert(name.into(), trafo)
    }

    pub fn line_type(&self, name: &str) -> GridResult<&LineType> {
        self.line.get(name).ok_or_else(|| {
            GridError::configuration(format!("unknown standard line type '{name}'"))
        })
    }

    pub fn transformer_type(&self, name: &str) -> GridResult<&TransformerType> {
        self.trafo.get(name).ok_or_else(|| {
            GridError::configuration(format!("unknown standard transformer type '{name}'"))
        })
    }

    pub fn is_empty(&self) -> bool {
        self.line.is_empty() && self.trafo.is_empty()
    }
}
