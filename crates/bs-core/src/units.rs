//! Measurement units and dimension-tagged values.
//!
//! Every [`Unit`] belongs to exactly one [`Dimension`] and carries a factor to
//! that dimension's base unit (kilograms for mass, centimeters for distance).
//!
//! [`UnitValue`] is parametrized by a dimension marker, so a [`Mass`] can never
//! be combined with a [`Distance`] at compile time. Units that arrive untyped
//! (parsed symbols, persisted documents) are checked against the marker at
//! runtime and rejected with [`UnitError::DimensionMismatch`].

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::ops::{Add, Div, Mul, Sub};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Pounds in one kilogram.
pub const POUNDS_PER_KILOGRAM: f64 = 2.20462;

/// Absolute tolerance, in base units, for [`UnitValue`] equality.
pub const EQ_TOLERANCE: f64 = 1e-9;

/// Errors from unit parsing and conversion.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UnitError {
    /// A unit was used where another dimension is required.
    #[error("{unit} is a {found} unit, expected a {expected} unit")]
    DimensionMismatch {
        unit: &'static str,
        expected: Dimension,
        found: Dimension,
    },

    /// The symbol or name does not match any known unit.
    #[error("unknown unit: {0}")]
    UnknownUnit(String),
}

/// A physical dimension that units measure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Mass,
    Distance,
}

impl Dimension {
    /// String representation for display and storage.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Mass => "mass",
            Self::Distance => "distance",
        }
    }

    /// The unit whose factor is 1 in this dimension.
    #[must_use]
    pub const fn base_unit(&self) -> Unit {
        match self {
            Self::Mass => Unit::KILOGRAMS,
            Self::Distance => Unit::CENTIMETERS,
        }
    }

    /// All predefined units of this dimension.
    pub fn units(self) -> impl Iterator<Item = Unit> {
        Unit::ALL.into_iter().filter(move |unit| unit.dimension == self)
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A predefined measurement unit.
///
/// Units are identified by their symbol; the predefined constants are the only
/// instances.
#[derive(Debug, Clone, Copy)]
pub struct Unit {
    full_name: &'static str,
    symbol: &'static str,
    factor: f64,
    dimension: Dimension,
}

impl Unit {
    pub const KILOGRAMS: Self = Self {
        full_name: "kilograms",
        symbol: "kg",
        factor: 1.0,
        dimension: Dimension::Mass,
    };

    pub const POUNDS: Self = Self {
        full_name: "pounds",
        symbol: "lbs",
        factor: 1.0 / POUNDS_PER_KILOGRAM,
        dimension: Dimension::Mass,
    };

    pub const CENTIMETERS: Self = Self {
        full_name: "centimeters",
        symbol: "cm",
        factor: 1.0,
        dimension: Dimension::Distance,
    };

    pub const METERS: Self = Self {
        full_name: "meters",
        symbol: "m",
        factor: 100.0,
        dimension: Dimension::Distance,
    };

    pub const INCHES: Self = Self {
        full_name: "inches",
        symbol: "in",
        factor: 2.54,
        dimension: Dimension::Distance,
    };

    pub const FEET: Self = Self {
        full_name: "feet",
        symbol: "ft",
        factor: 30.48,
        dimension: Dimension::Distance,
    };

    /// Every predefined unit.
    pub const ALL: [Self; 6] = [
        Self::KILOGRAMS,
        Self::POUNDS,
        Self::CENTIMETERS,
        Self::METERS,
        Self::INCHES,
        Self::FEET,
    ];

    #[must_use]
    pub const fn full_name(&self) -> &'static str {
        self.full_name
    }

    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        self.symbol
    }

    /// Multiplicative factor to the dimension's base unit.
    #[must_use]
    pub const fn factor(&self) -> f64 {
        self.factor
    }

    #[must_use]
    pub const fn dimension(&self) -> Dimension {
        self.dimension
    }

    /// Looks up a unit by symbol or full name, ignoring ASCII case.
    pub fn from_symbol(s: &str) -> Result<Self, UnitError> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|unit| {
                unit.symbol.eq_ignore_ascii_case(needle)
                    || unit.full_name.eq_ignore_ascii_case(needle)
            })
            .ok_or_else(|| UnitError::UnknownUnit(needle.to_string()))
    }

    /// Looks up a unit and checks that it measures `D`.
    pub fn parse_for<D: Measure>(s: &str) -> Result<Self, UnitError> {
        Self::from_symbol(s)?.check::<D>()
    }

    /// Returns the unit if it measures `D`.
    pub fn check<D: Measure>(self) -> Result<Self, UnitError> {
        if self.dimension == D::DIMENSION {
            Ok(self)
        } else {
            Err(UnitError::DimensionMismatch {
                unit: self.symbol,
                expected: D::DIMENSION,
                found: self.dimension,
            })
        }
    }
}

impl PartialEq for Unit {
    fn eq(&self, other: &Self) -> bool {
        self.symbol == other.symbol
    }
}

impl Eq for Unit {}

impl Hash for Unit {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.symbol.hash(state);
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol)
    }
}

impl FromStr for Unit {
    type Err = UnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_symbol(s)
    }
}

/// Type-level dimension marker for [`UnitValue`].
pub trait Measure: Copy + Default + fmt::Debug + 'static {
    /// The dimension values of this kind are measured in.
    const DIMENSION: Dimension;
}

/// Marker for mass values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct MassDimension;

impl Measure for MassDimension {
    const DIMENSION: Dimension = Dimension::Mass;
}

/// Marker for distance values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DistanceDimension;

impl Measure for DistanceDimension {
    const DIMENSION: Dimension = Dimension::Distance;
}

/// A magnitude tagged with a unit of dimension `D`.
///
/// Binary operators (`+`, `-`, `*`, `/` between two values) first convert the
/// right-hand side into the left-hand side's unit, combine the magnitudes, and
/// keep the left-hand unit.
#[derive(Clone, Copy)]
pub struct UnitValue<D: Measure> {
    value: f64,
    unit: Unit,
    _dimension: PhantomData<D>,
}

/// A mass value (kilograms, pounds).
pub type Mass = UnitValue<MassDimension>;

/// A distance value (centimeters, meters, inches, feet).
pub type Distance = UnitValue<DistanceDimension>;

impl<D: Measure> UnitValue<D> {
    /// Creates a value, rejecting units of another dimension.
    pub fn new(value: f64, unit: Unit) -> Result<Self, UnitError> {
        Ok(Self::from_parts(value, unit.check::<D>()?))
    }

    const fn from_parts(value: f64, unit: Unit) -> Self {
        Self {
            value,
            unit,
            _dimension: PhantomData,
        }
    }

    /// The raw magnitude in [`Self::unit`].
    #[must_use]
    pub const fn value(&self) -> f64 {
        self.value
    }

    #[must_use]
    pub const fn unit(&self) -> Unit {
        self.unit
    }

    #[must_use]
    pub const fn dimension() -> Dimension {
        D::DIMENSION
    }

    /// Converts to `target`, which must measure the same dimension.
    pub fn to(&self, target: Unit) -> Result<Self, UnitError> {
        Ok(self.convert(target.check::<D>()?))
    }

    /// Magnitude expressed in the dimension's base unit.
    #[must_use]
    pub fn base_value(&self) -> f64 {
        self.value * self.unit.factor
    }

    /// Compares magnitudes after normalizing both to the base unit.
    #[must_use]
    pub fn approx_eq(&self, other: &Self) -> bool {
        (self.base_value() - other.base_value()).abs() <= EQ_TOLERANCE
    }

    // Callers guarantee `target` measures `D`.
    fn convert(self, target: Unit) -> Self {
        Self::from_parts(self.value * self.unit.factor / target.factor, target)
    }

    fn rhs_value(self, rhs: Self) -> f64 {
        rhs.convert(self.unit).value
    }
}

impl UnitValue<MassDimension> {
    #[must_use]
    pub const fn kg(value: f64) -> Self {
        Self::from_parts(value, Unit::KILOGRAMS)
    }

    #[must_use]
    pub const fn lbs(value: f64) -> Self {
        Self::from_parts(value, Unit::POUNDS)
    }

    #[must_use]
    pub fn to_kg(self) -> Self {
        self.convert(Unit::KILOGRAMS)
    }

    #[must_use]
    pub fn to_lbs(self) -> Self {
        self.convert(Unit::POUNDS)
    }
}

impl UnitValue<DistanceDimension> {
    #[must_use]
    pub const fn cm(value: f64) -> Self {
        Self::from_parts(value, Unit::CENTIMETERS)
    }

    #[must_use]
    pub const fn m(value: f64) -> Self {
        Self::from_parts(value, Unit::METERS)
    }

    #[must_use]
    pub const fn inches(value: f64) -> Self {
        Self::from_parts(value, Unit::INCHES)
    }

    #[must_use]
    pub const fn feet(value: f64) -> Self {
        Self::from_parts(value, Unit::FEET)
    }

    #[must_use]
    pub fn to_cm(self) -> Self {
        self.convert(Unit::CENTIMETERS)
    }

    #[must_use]
    pub fn to_m(self) -> Self {
        self.convert(Unit::METERS)
    }
}

impl<D: Measure> Add for UnitValue<D> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::from_parts(self.value + self.rhs_value(rhs), self.unit)
    }
}

impl<D: Measure> Sub for UnitValue<D> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::from_parts(self.value - self.rhs_value(rhs), self.unit)
    }
}

impl<D: Measure> Mul for UnitValue<D> {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Self::from_parts(self.value * self.rhs_value(rhs), self.unit)
    }
}

impl<D: Measure> Div for UnitValue<D> {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        Self::from_parts(self.value / self.rhs_value(rhs), self.unit)
    }
}

impl<D: Measure> Mul<f64> for UnitValue<D> {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self::Output {
        Self::from_parts(self.value * rhs, self.unit)
    }
}

impl<D: Measure> Div<f64> for UnitValue<D> {
    type Output = Self;

    fn div(self, rhs: f64) -> Self::Output {
        Self::from_parts(self.value / rhs, self.unit)
    }
}

impl<D: Measure> PartialEq for UnitValue<D> {
    fn eq(&self, other: &Self) -> bool {
        self.approx_eq(other)
    }
}

impl<D: Measure> PartialOrd for UnitValue<D> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.approx_eq(other) {
            return Some(Ordering::Equal);
        }
        self.base_value().partial_cmp(&other.base_value())
    }
}

impl<D: Measure> fmt::Display for UnitValue<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} {}", self.value, self.unit.symbol)
    }
}

impl<D: Measure> fmt::Debug for UnitValue<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnitValue")
            .field("value", &self.value)
            .field("unit", &self.unit.symbol)
            .field("dimension", &D::DIMENSION)
            .finish()
    }
}

#[derive(Serialize)]
struct UnitValueRef {
    unit: &'static str,
    value: f64,
}

/// Stored unit shape: a symbol, or the older object form that embedded the
/// whole unit record.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredUnit {
    Symbol(String),
    Record {
        #[serde(rename = "shortName")]
        short_name: String,
    },
}

#[derive(Deserialize)]
struct StoredUnitValue {
    unit: StoredUnit,
    value: f64,
}

impl<D: Measure> TryFrom<StoredUnitValue> for UnitValue<D> {
    type Error = UnitError;

    fn try_from(stored: StoredUnitValue) -> Result<Self, Self::Error> {
        let symbol = match &stored.unit {
            StoredUnit::Symbol(symbol) => symbol,
            StoredUnit::Record { short_name } => short_name,
        };
        Self::new(stored.value, Unit::parse_for::<D>(symbol)?)
    }
}

impl<D: Measure> Serialize for UnitValue<D> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        UnitValueRef {
            unit: self.unit.symbol,
            value: self.value,
        }
        .serialize(serializer)
    }
}

impl<'de, D: Measure> Deserialize<'de> for UnitValue<D> {
    fn deserialize<De>(deserializer: De) -> Result<Self, De::Error>
    where
        De: serde::Deserializer<'de>,
    {
        let stored = StoredUnitValue::deserialize(deserializer)?;
        Self::try_from(stored).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn round_trip_conversion_is_identity() {
        for dimension in [Dimension::Mass, Dimension::Distance] {
            for from in dimension.units() {
                for to in dimension.units() {
                    for x in [0.0, 1.0, 72.5, 180.0, 1234.567] {
                        let back = match dimension {
                            Dimension::Mass => {
                                let v = Mass::new(x, from).unwrap();
                                v.to(to).unwrap().to(from).unwrap().value()
                            }
                            Dimension::Distance => {
                                let v = Distance::new(x, from).unwrap();
                                v.to(to).unwrap().to(from).unwrap().value()
                            }
                        };
                        assert_close(back, x);
                    }
                }
            }
        }
    }

    #[test]
    fn meters_to_centimeters() {
        let cm = Distance::m(1.0).to(Unit::CENTIMETERS).unwrap();
        assert_eq!(cm.to_string(), "100.00 cm");
    }

    #[test]
    fn pounds_to_kilograms() {
        let kg = Mass::lbs(2.20462).to(Unit::KILOGRAMS).unwrap();
        assert_eq!(kg.to_string(), "1.00 kg");
        assert_close(kg.value(), 1.0);
    }

    #[test]
    fn feet_and_inches_to_centimeters() {
        assert_close(Distance::feet(6.0).to_cm().value(), 182.88);
        assert_close(Distance::inches(12.0).to_cm().value(), 30.48);
    }

    #[test]
    fn display_uses_two_decimals_and_symbol() {
        assert_eq!(Mass::kg(72.5).to_string(), "72.50 kg");
        assert_eq!(Distance::feet(5.9).to_string(), "5.90 ft");
    }

    #[test]
    fn new_rejects_other_dimension() {
        let err = Mass::new(80.0, Unit::CENTIMETERS).unwrap_err();
        assert_eq!(
            err,
            UnitError::DimensionMismatch {
                unit: "cm",
                expected: Dimension::Mass,
                found: Dimension::Distance,
            }
        );
        assert_eq!(err.to_string(), "cm is a distance unit, expected a mass unit");
    }

    #[test]
    fn to_rejects_other_dimension() {
        assert!(Distance::cm(180.0).to(Unit::POUNDS).is_err());
        assert!(Mass::kg(80.0).to(Unit::FEET).is_err());
    }

    #[test]
    fn arithmetic_normalizes_rhs_to_lhs_unit() {
        let sum = Mass::kg(1.0) + Mass::lbs(2.20462);
        assert_eq!(sum.unit(), Unit::KILOGRAMS);
        assert_close(sum.value(), 2.0);

        let diff = Distance::m(2.0) - Distance::cm(50.0);
        assert_eq!(diff.unit(), Unit::METERS);
        assert_close(diff.value(), 1.5);

        let product = Distance::m(2.0) * Distance::cm(300.0);
        assert_eq!(product.unit(), Unit::METERS);
        assert_close(product.value(), 6.0);
    }

    #[test]
    fn division_divides() {
        let quotient = Distance::m(3.0) / Distance::cm(150.0);
        assert_eq!(quotient.unit(), Unit::METERS);
        assert_close(quotient.value(), 2.0);
    }

    #[test]
    fn scalar_operators_scale_magnitude() {
        assert_close((Mass::kg(40.0) * 2.0).value(), 80.0);
        assert_close((Mass::kg(40.0) / 4.0).value(), 10.0);
    }

    #[test]
    fn equality_normalizes_units() {
        assert_eq!(Distance::m(1.8), Distance::cm(180.0));
        assert_eq!(Mass::lbs(2.20462), Mass::kg(1.0));
        assert_ne!(Mass::kg(1.0), Mass::kg(1.001));
        assert!(Mass::kg(2.0) > Mass::lbs(2.0));
    }

    #[test]
    fn from_symbol_accepts_symbols_and_names() {
        assert_eq!(Unit::from_symbol("KG").unwrap(), Unit::KILOGRAMS);
        assert_eq!(Unit::from_symbol("pounds").unwrap(), Unit::POUNDS);
        assert_eq!("ft".parse::<Unit>().unwrap(), Unit::FEET);
        assert_eq!(
            Unit::from_symbol("stone"),
            Err(UnitError::UnknownUnit("stone".to_string()))
        );
    }

    #[test]
    fn parse_for_checks_dimension() {
        assert_eq!(
            Unit::parse_for::<DistanceDimension>("in").unwrap(),
            Unit::INCHES
        );
        assert!(Unit::parse_for::<MassDimension>("in").is_err());
    }

    #[test]
    fn dimension_units_partition_all_units() {
        let mass: Vec<_> = Dimension::Mass.units().map(|u| u.symbol()).collect();
        let distance: Vec<_> = Dimension::Distance.units().map(|u| u.symbol()).collect();
        assert_eq!(mass, vec!["kg", "lbs"]);
        assert_eq!(distance, vec!["cm", "m", "in", "ft"]);
        assert!(Unit::ALL.iter().all(|unit| unit.factor() > 0.0));
    }

    #[test]
    fn serializes_unit_as_symbol() {
        let json = serde_json::to_value(Mass::kg(80.0)).unwrap();
        assert_eq!(json, serde_json::json!({"unit": "kg", "value": 80.0}));
    }

    #[test]
    fn deserializes_symbol_and_unit_record_shapes() {
        let from_symbol: Mass = serde_json::from_str(r#"{"unit":"lbs","value":176}"#).unwrap();
        assert_eq!(from_symbol.unit(), Unit::POUNDS);

        let from_record: Distance = serde_json::from_str(
            r#"{"unit":{"fullName":"meters","shortName":"m","convert":100},"value":1.8}"#,
        )
        .unwrap();
        assert_eq!(from_record.unit(), Unit::METERS);
        assert_eq!(from_record, Distance::cm(180.0));
    }

    #[test]
    fn deserialize_rejects_cross_dimension_unit() {
        let result: Result<Mass, _> = serde_json::from_str(r#"{"unit":"cm","value":180}"#);
        let err = result.unwrap_err();
        assert!(err.to_string().contains("expected a mass unit"));
    }
}
