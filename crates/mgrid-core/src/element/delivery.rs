//! Delivery elements: cables and transformers attached to edges.
//!
//! A delivery element is either fully parameterised or refers to a named
//! standard type. Both shapes share the same "essential" record (name,
//! parallel count, and for cables the length), so the element is a tagged
//! variant rather than a type hierarchy. The standard type is looked up once,
//! in [`Delivery::resolve`], when the grid is converted.

use serde::{Deserialize, Serialize};

use super::types::{LineType, StdTypes, TransformerType};
use crate::error::{GridError, GridResult};

/// Physical constants given inline or by standard-type name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Parameters<T> {
    Explicit(T),
    Std { std_type: String },
}

impl<T> Parameters<T> {
    pub fn std_type(&self) -> Option<&str> {
        match self {
            Parameters::Explicit(_) => None,
            Parameters::Std { std_type } => Some(std_type),
        }
    }
}

/// Fields every cable carries, whatever its parameter source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CableEssential {
    pub name: String,
    pub length_km: f64,
    /// Number of identical cables in parallel
    pub parallel: u32,
}

/// Fields every transformer carries, whatever its parameter source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformerEssential {
    pub name: String,
    /// Number of identical transformers in parallel
    pub parallel: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Delivery {
    Cable {
        essential: CableEssential,
        params: Parameters<LineType>,
    },
    Transformer {
        essential: TransformerEssential,
        params: Parameters<TransformerType>,
    },
}

/// A delivery element with its standard type looked up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResolvedDelivery<'a> {
    Cable {
        essential: &'a CableEssential,
        line: &'a LineType,
        std_type: Option<&'a str>,
    },
    Transformer {
        essential: &'a TransformerEssential,
        trafo: &'a TransformerType,
        std_type: Option<&'a str>,
    },
}

impl Delivery {
    /// Cable given by its per-kilometre constants.
    pub fn cable(name: impl Into<String>, length_km: f64, parallel: u32, line: LineType) -> Self {
        Delivery::Cable {
            essential: CableEssential {
                name: name.into(),
                length_km,
                parallel,
            },
            params: Parameters::Explicit(line),
        }
    }

    /// Cable given by standard type.
    pub fn cable_std(
        name: impl Into<String>,
        length_km: f64,
        parallel: u32,
        std_type: impl Into<String>,
    ) -> Self {
        Delivery::Cable {
            essential: CableEssential {
                name: name.into(),
                length_km,
                parallel,
            },
            params: Parameters::Std {
                std_type: std_type.into(),
            },
        }
    }

    /// Transformer given by its rated constants.
    pub fn transformer(name: impl Into<String>, parallel: u32, trafo: TransformerType) -> Self {
        Delivery::Transformer {
            essential: TransformerEssential {
                name: name.into(),
                parallel,
            },
            params: Parameters::Explicit(trafo),
        }
    }

    /// Transformer given by standard type.
    pub fn transformer_std(
        name: impl Into<String>,
        parallel: u32,
        std_type: impl Into<String>,
    ) -> Self {
        Delivery::Transformer {
            essential: TransformerEssential {
                name: name.into(),
                parallel,
            },
            params: Parameters::Std {
                std_type: std_type.into(),
            },
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Delivery::Cable { essential, .. } => &essential.name,
            Delivery::Transformer { essential, .. } => &essential.name,
        }
    }

    /// Element kind label, as used in logs and diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Delivery::Cable { .. } => "cable",
            Delivery::Transformer { .. } => "transformer",
        }
    }

    pub fn std_type(&self) -> Option<&str> {
        match self {
            Delivery::Cable { params, .. } => params.std_type(),
            Delivery::Transformer { params, .. } => params.std_type(),
        }
    }

    /// Look up the standard type (if any) and check the essential fields.
    ///
    /// An unknown standard type is a [`GridError::Configuration`]; a zero
    /// parallel count, a non-positive cable length or inconsistent
    /// transformer constants are a [`GridError::Validation`].
    pub fn resolve<'a>(&'a self, catalog: &'a StdTypes) -> GridResult<ResolvedDelivery<'a>> {
        match self {
            Delivery::Cable { essential, params } => {
                check_parallel(&essential.name, essential.parallel)?;
                if essential.length_km <= 0.0 || !essential.length_km.is_finite() {
                    return Err(GridError::validation(format!(
                        "cable '{}' has invalid length {} km",
                        essential.name, essential.length_km
                    )));
                }
                let line = match params {
                    Parameters::Explicit(line) => line,
                    Parameters::Std { std_type } => catalog.line_type(std_type)?,
                };
                Ok(ResolvedDelivery::Cable {
                    essential,
                    line,
                    std_type: params.std_type(),
                })
            }
            Delivery::Transformer { essential, params } => {
                check_parallel(&essential.name, essential.parallel)?;
                let trafo = match params {
                    Parameters::Explicit(trafo) => trafo,
                    Parameters::Std { std_type } => catalog.transformer_type(std_type)?,
                };
                trafo.check(&essential.name)?;
                Ok(ResolvedDelivery::Transformer {
                    essential,
                    trafo,
                    std_type: params.std_type(),
                })
            }
        }
    }
}

fn check_parallel(name: &str, parallel: u32) -> GridResult<()> {
    if parallel == 0 {
        return Err(GridError::validation(format!(
            "element '{name}' must have at least one parallel unit"
        )));
    }
    Ok(())
}
