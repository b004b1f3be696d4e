//! Body composition formulas.
//!
//! All functions are pure. Inputs are not validated: NaN and other
//! non-physical values propagate through standard floating point rules.

use serde::Serialize;

use crate::units::{Distance, Mass, POUNDS_PER_KILOGRAM};

/// Rounded pounds-per-kilogram used by the FFMI formula.
const FFMI_POUNDS_PER_KILOGRAM: f64 = 2.2;

/// Height, in meters, that normalized FFMI is adjusted towards.
const FFMI_REFERENCE_HEIGHT_M: f64 = 1.8;

/// FFMI points per meter of height difference from the reference.
const FFMI_HEIGHT_SLOPE: f64 = 6.1;

/// Fat-free mass, in kilograms.
pub fn lean_mass(weight: Mass, bf_percent: f64) -> Mass {
    Mass::kg(weight.to_kg().value() * (1.0 - bf_percent / 100.0))
}

/// Fat mass, in kilograms.
pub fn fat_mass(weight: Mass, bf_percent: f64) -> Mass {
    Mass::kg(weight.to_kg().value() * bf_percent / 100.0)
}

/// Body mass index: kg / m².
pub fn bmi(weight: Mass, height: Distance) -> f64 {
    let h = height.to_m().value();
    weight.to_kg().value() / (h * h)
}

/// Fat-free mass index.
///
/// Lean mass goes through a 2.2 / 2.20462 pound round-trip before dividing by
/// height squared, so the result is scaled by roughly 1.0021 relative to a
/// plain kg / m² figure.
pub fn ffmi(weight: Mass, height: Distance, bf_percent: f64) -> f64 {
    let h = height.to_m().value();
    let lean_kg = lean_mass(weight, bf_percent).value();
    (lean_kg / FFMI_POUNDS_PER_KILOGRAM) * POUNDS_PER_KILOGRAM / (h * h)
}

/// FFMI adjusted to a 1.8 m reference height.
pub fn ffmi_normalized(weight: Mass, height: Distance, bf_percent: f64) -> f64 {
    let h = height.to_m().value();
    ffmi(weight, height, bf_percent) + FFMI_HEIGHT_SLOPE * (FFMI_REFERENCE_HEIGHT_M - h)
}

/// Every derived figure for one weight / height / body fat reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BodyComposition {
    pub lean_mass: Mass,
    pub fat_mass: Mass,
    pub bmi: f64,
    pub ffmi: f64,
    pub ffmi_normalized: f64,
}

impl BodyComposition {
    pub fn compute(weight: Mass, height: Distance, bf_percent: f64) -> Self {
        Self {
            lean_mass: lean_mass(weight, bf_percent),
            fat_mass: fat_mass(weight, bf_percent),
            bmi: bmi(weight, height),
            ffmi: ffmi(weight, height, bf_percent),
            ffmi_normalized: ffmi_normalized(weight, height, bf_percent),
        }
    }
}
