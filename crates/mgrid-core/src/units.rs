//! Unit newtypes for the electrical quantities carried by grid elements.
//!
//! Element records mix active power, reactive power, voltage levels and
//! setpoints. Wrapping them keeps `p_mw` from being passed where `q_mvar` is
//! expected. All types are `#[repr(transparent)]` over `f64` and serialize
//! as plain numbers.
//!
//! ```
//! use mgrid_core::units::{Megawatts, Megavars};
//!
//! let p = Megawatts(1.5);
//! let q = p.reactive_power_at(0.9);
//! assert!(q > Megavars(0.0));
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Neg, Sub};

macro_rules! impl_unit_ops {
    ($type:ty, $unit_name:literal) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Neg for $type {
            type Output = Self;
            fn neg(self) -> Self::Output {
                Self(-self.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl std::fmt::Display for $type {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{:.4} {}", self.0, $unit_name)
            }
        }

        impl $type {
            #[inline]
            pub const fn new(value: f64) -> Self {
                Self(value)
            }

            /// Get the raw numeric value
            #[inline]
            pub const fn value(self) -> f64 {
                self.0
            }

            #[inline]
            pub fn abs(self) -> Self {
                Self(self.0.abs())
            }

            #[inline]
            pub fn is_finite(self) -> bool {
                self.0.is_finite()
            }
        }
    };
}

/// Active power in megawatts (MW)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Megawatts(pub f64);

impl_unit_ops!(Megawatts, "MW");

/// Reactive power in megavolt-amperes reactive (Mvar)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Megavars(pub f64);

impl_unit_ops!(Megavars, "Mvar");

/// Apparent power in megavolt-amperes (MVA)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct MegavoltAmperes(pub f64);

impl_unit_ops!(MegavoltAmperes, "MVA");

impl Megawatts {
    /// Reactive power drawn alongside this active power at a given power
    /// factor: `Q = P · tan(acos(pf))`.
    ///
    /// The caller is responsible for `pf` lying in `(0, 1]`.
    #[inline]
    pub fn reactive_power_at(self, power_factor: f64) -> Megavars {
        Megavars(self.0 * power_factor.acos().tan())
    }

    /// Compute apparent power given reactive power: S = √(P² + Q²)
    #[inline]
    pub fn apparent_power(self, q: Megavars) -> MegavoltAmperes {
        MegavoltAmperes((self.0.powi(2) + q.0.powi(2)).sqrt())
    }
}

/// Voltage magnitude in per-unit (pu)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct PerUnit(pub f64);

impl_unit_ops!(PerUnit, "pu");

impl PerUnit {
    /// One per-unit (nominal voltage)
    pub const ONE: Self = Self(1.0);
}

/// Voltage in kilovolts (kV)
///
/// Layers carry their nominal voltage in kV; every bus of a layer inherits it.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Kilovolts(pub f64);

impl_unit_ops!(Kilovolts, "kV");

/// Angle in degrees
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Degrees(pub f64);

impl_unit_ops!(Degrees, "°");

impl Degrees {
    pub const ZERO: Self = Self(0.0);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reactive_power_at_power_factor() {
        let q = Megawatts(1.5).reactive_power_at(0.9);
        let expected = ((1.5_f64 / 0.9).powi(2) - 1.5_f64.powi(2)).sqrt();
        assert!((q.value() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_unity_power_factor_has_no_reactive_power() {
        assert!(Megawatts(3.0).reactive_power_at(1.0).value().abs() < 1e-12);
    }

    #[test]
    fn test_apparent_power() {
        let s = Megawatts(30.0).apparent_power(Megavars(40.0));
        assert!((s.value() - 50.0).abs() < 1e-10);
    }

    #[test]
    fn test_serde_transparent() {
        let json = serde_json::to_string(&Kilovolts(10.0)).unwrap();
        assert_eq!(json, "10.0");
        let back: PerUnit = serde_json::from_str("1.02").unwrap();
        assert_eq!(back, PerUnit(1.02));
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Megawatts(100.0)), "100.0000 MW");
        assert_eq!(format!("{}", PerUnit(1.0)), "1.0000 pu");
    }
}
