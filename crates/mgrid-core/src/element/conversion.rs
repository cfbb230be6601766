//! Conversion elements: what sits on an inter-node.

use serde::{Deserialize, Serialize};

use crate::error::{GridError, GridResult};
use crate::units::{Degrees, Megavars, Megawatts, PerUnit};

/// Largest tolerated gap between an explicit `q_mvar` and the one implied by
/// the power factor, unless the caller picks another.
pub const DEFAULT_Q_TOLERANCE_MVAR: f64 = 1e-6;

/// Slack connection to an external (upstream) grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalGrid {
    pub name: String,
    /// Voltage setpoint
    pub vm_pu: PerUnit,
    #[serde(default)]
    pub va_degree: Degrees,
}

impl ExternalGrid {
    pub fn new(name: impl Into<String>, vm_pu: f64) -> Self {
        Self {
            name: name.into(),
            vm_pu: PerUnit(vm_pu),
            va_degree: Degrees::ZERO,
        }
    }

    pub fn with_angle(mut self, va_degree: f64) -> Self {
        self.va_degree = Degrees(va_degree);
        self
    }
}

/// Power drawn out of the network at a boundary, seen as a load.
///
/// Reactive power may be given directly, through a power factor, or both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ejection {
    pub name: String,
    pub p_mw: Megawatts,
    #[serde(default)]
    pub q_mvar: Option<Megavars>,
    #[serde(default)]
    pub power_factor: Option<f64>,
}

impl Ejection {
    pub fn with_power_factor(name: impl Into<String>, p_mw: f64, power_factor: f64) -> Self {
        Self {
            name: name.into(),
            p_mw: Megawatts(p_mw),
            q_mvar: None,
            power_factor: Some(power_factor),
        }
    }

    pub fn with_reactive_power(name: impl Into<String>, p_mw: f64, q_mvar: f64) -> Self {
        Self {
            name: name.into(),
            p_mw: Megawatts(p_mw),
            q_mvar: Some(Megavars(q_mvar)),
            power_factor: None,
        }
    }

    /// Reactive power of the load.
    ///
    /// An explicit `q_mvar` wins. With only a power factor, `q` is derived as
    /// `p · tan(acos(pf))`. When both are given they must agree within
    /// `tolerance` Mvar. Non-finite powers are rejected.
    pub fn reactive_power(&self, tolerance: f64) -> GridResult<Megavars> {
        if !self.p_mw.is_finite() {
            return Err(GridError::validation(format!(
                "ejection '{}' has non-finite p_mw {}",
                self.name, self.p_mw
            )));
        }
        if let Some(q) = self.q_mvar.filter(|q| !q.is_finite()) {
            return Err(GridError::validation(format!(
                "ejection '{}' has non-finite q_mvar {}",
                self.name, q
            )));
        }
        let derived = match self.power_factor {
            Some(pf) if !(pf > 0.0 && pf <= 1.0) => {
                return Err(GridError::validation(format!(
                    "ejection '{}' has power factor {pf} outside (0, 1]",
                    self.name
                )));
            }
            Some(pf) => Some(self.p_mw.reactive_power_at(pf)),
            None => None,
        };

        match (self.q_mvar, derived) {
            (Some(q), Some(d)) if (q - d).abs().value() > tolerance => {
                Err(GridError::validation(format!(
                    "ejection '{}': q_mvar {} disagrees with {} derived from power factor",
                    self.name, q, d
                )))
            }
            (Some(q), _) => Ok(q),
            (None, Some(d)) => Ok(d),
            (None, None) => Err(GridError::configuration(format!(
                "ejection '{}' has neither q_mvar nor power_factor",
                self.name
            ))),
        }
    }
}

/// Element attached to an inter-node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Conversion {
    ExternalGrid(ExternalGrid),
    Ejection(Ejection),
}

impl Conversion {
    pub fn name(&self) -> &str {
        match self {
            Conversion::ExternalGrid(ext) => &ext.name,
            Conversion::Ejection(load) => &load.name,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Conversion::ExternalGrid(_) => "external_grid",
            Conversion::Ejection(_) => "ejection",
        }
    }
}

impl From<ExternalGrid> for Conversion {
    fn from(ext: ExternalGrid) -> Self {
        Conversion::ExternalGrid(ext)
    }
}

impl From<Ejection> for Conversion {
    fn from(load: Ejection) -> Self {
        Conversion::Ejection(load)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_q_derived_from_power_factor() {
        let load = Ejection::with_power_factor("l1", 1.5, 0.9);
        let q = load.reactive_power(1e-6).unwrap();
        let expected = 1.5 * 0.9_f64.acos().tan();
        assert!((q.value() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_explicit_q_wins() {
        let load = Ejection::with_reactive_power("l1", 2.0, 0.4);
        assert_eq!(load.reactive_power(1e-6).unwrap(), Megavars(0.4));
    }

    #[test]
    fn test_consistent_q_and_power_factor() {
        let mut load = Ejection::with_power_factor("l1", 1.5, 0.9);
        let q = Megawatts(1.5).reactive_power_at(0.9);
        load.q_mvar = Some(q);
        assert_eq!(load.reactive_power(1e-6).unwrap(), q);
    }

    #[test]
    fn test_contradicting_q_is_validation_error() {
        let mut load = Ejection::with_power_factor("l1", 1.5, 0.9);
        load.q_mvar = Some(Megavars(2.0));
        assert!(matches!(
            load.reactive_power(1e-6),
            Err(GridError::Validation(_))
        ));
    }

    #[test]
    fn test_non_finite_power_is_validation_error() {
        let mut load = Ejection::with_power_factor("l1", 1.5, 0.9);
        load.q_mvar = Some(Megavars(f64::NAN));
        assert!(matches!(
            load.reactive_power(1e-6),
            Err(GridError::Validation(_))
        ));

        for p in [f64::NAN, f64::INFINITY] {
            let load = Ejection::with_reactive_power("l1", p, 0.1);
            assert!(matches!(
                load.reactive_power(1e-6),
                Err(GridError::Validation(_))
            ));
        }
    }

    #[test]
    fn test_power_factor_out_of_range() {
        for pf in [0.0, -0.5, 1.2, f64::NAN] {
            let load = Ejection::with_power_factor("l1", 1.0, pf);
            assert!(matches!(
                load.reactive_power(1e-6),
                Err(GridError::Validation(_))
            ));
        }
    }

    #[test]
    fn test_missing_reactive_power_is_configuration_error() {
        let load = Ejection {
            name: "l1".into(),
            p_mw: Megawatts(1.0),
            q_mvar: None,
            power_factor: None,
        };
        assert!(matches!(
            load.reactive_power(1e-6),
            Err(GridError::Configuration(_))
        ));
    }

    #[test]
    fn test_conversion_serde_tag() {
        let conv: Conversion = ExternalGrid::new("grid", 1.02).into();
        let json = serde_json::to_value(&conv).unwrap();
        assert_eq!(json["type"], "external_grid");
        assert_eq!(json["vm_pu"], 1.02);
        assert_eq!(json["va_degree"], 0.0);

        let back: Conversion = serde_json::from_value(json).unwrap();
        assert_eq!(back, conv);
    }
}
