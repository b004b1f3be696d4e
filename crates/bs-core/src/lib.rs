//! Core domain logic for body stats tracking.
//!
//! This crate contains the fundamental types and logic for:
//! - Units: mass and distance values with checked conversions
//! - Timeline: chronologically ordered, de-duplicated measurement series
//! - Fitness: BMI, FFMI and body composition formulas
//! - Body stats: the per-user aggregate that gets persisted

pub mod body_stats;
pub mod fitness;
pub mod timeline;
pub mod types;
pub mod units;

pub use body_stats::BodyStats;
pub use fitness::BodyComposition;
pub use timeline::{DEFAULT_GRANULARITY, Granularity, TimedEntry, Timeline};
pub use types::{UserId, ValidationError};
pub use units::{
    Dimension, Distance, DistanceDimension, Mass, MassDimension, Measure, Unit, UnitError,
    UnitValue,
};
