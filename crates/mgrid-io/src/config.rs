//! Settings for the pandapower conversion.

use std::path::Path;

use anyhow::{Context, Result};
use mgrid_core::element::DEFAULT_Q_TOLERANCE_MVAR;
use serde::{Deserialize, Serialize};

/// Conversion settings, read from a flat TOML table.
///
/// ```
/// use mgrid_io::ConversionConfig;
///
/// let config = ConversionConfig::from_toml_str("f_hz = 60.0").unwrap();
/// assert_eq!(config.f_hz, 60.0);
/// assert_eq!(config.sn_mva, 1.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionConfig {
    /// Name given to the produced net
    #[serde(default = "default_name")]
    pub name: String,
    /// System frequency in Hz
    #[serde(default = "default_f_hz")]
    pub f_hz: f64,
    /// Reference apparent power in MVA
    #[serde(default = "default_sn_mva")]
    pub sn_mva: f64,
    /// Allowed gap between an explicit `q_mvar` and the power-factor value
    #[serde(default = "default_q_tolerance_mvar")]
    pub q_tolerance_mvar: f64,
    /// Reject edges without a delivery element instead of skipping them
    #[serde(default)]
    pub require_delivery: bool,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            f_hz: default_f_hz(),
            sn_mva: default_sn_mva(),
            q_tolerance_mvar: default_q_tolerance_mvar(),
            require_delivery: false,
        }
    }
}

fn default_name() -> String {
    "mgrid".to_string()
}

fn default_f_hz() -> f64 {
    50.0
}

fn default_sn_mva() -> f64 {
    1.0
}

fn default_q_tolerance_mvar() -> f64 {
    DEFAULT_Q_TOLERANCE_MVAR
}

impl ConversionConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: ConversionConfig =
            toml::from_str(contents).context("parsing conversion config")?;
        config.check()?;
        Ok(config)
    }

    /// Load from a TOML file; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading conversion config {}", path.display()))?;
        Self::from_toml_str(&contents)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    fn check(&self) -> Result<()> {
        anyhow::ensure!(self.f_hz > 0.0, "f_hz must be positive, got {}", self.f_hz);
        anyhow::ensure!(self.sn_mva > 0.0, "sn_mva must be positive, got {}", self.sn_mva);
        anyhow::ensure!(
            self.q_tolerance_mvar >= 0.0,
            "q_tolerance_mvar must not be negative, got {}",
            self.q_tolerance_mvar
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_toml() {
        let config = ConversionConfig::from_toml_str("").unwrap();
        assert_eq!(config, ConversionConfig::default());
        assert_eq!(config.f_hz, 50.0);
        assert_eq!(config.q_tolerance_mvar, 1e-6);
        assert!(!config.require_delivery);
    }

    #[test]
    fn test_overrides() {
        let config = ConversionConfig::from_toml_str(
            r#"
name = "district 7"
f_hz = 60.0
require_delivery = true
"#,
        )
        .unwrap();
        assert_eq!(config.name, "district 7");
        assert_eq!(config.f_hz, 60.0);
        assert_eq!(config.sn_mva, 1.0);
        assert!(config.require_delivery);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(ConversionConfig::from_toml_str("f_hz = 0.0").is_err());
        assert!(ConversionConfig::from_toml_str("q_tolerance_mvar = -1.0").is_err());
        assert!(ConversionConfig::from_toml_str("f_hz = \"fifty\"").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("conversion.toml");
        assert_eq!(
            ConversionConfig::load(&path).unwrap(),
            ConversionConfig::default()
        );

        let config = ConversionConfig {
            sn_mva: 10.0,
            ..ConversionConfig::default()
        };
        std::fs::write(&path, config.to_toml_string().unwrap()).unwrap();
        assert_eq!(ConversionConfig::load(&path).unwrap(), config);
    }
}
