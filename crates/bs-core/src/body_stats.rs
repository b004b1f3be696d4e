//! Per-user aggregate of body measurements.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::fitness::BodyComposition;
use crate::timeline::{Granularity, TimedEntry, Timeline};
use crate::units::{Distance, Mass};

/// Everything recorded for one user.
///
/// Stored as a single document and always saved whole. Documents are read
/// back through [`BodyStats::from_document`] only.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyStats {
    /// Birth date as epoch milliseconds.
    birth_date: Option<i64>,
    bf_percent: Timeline<f64>,
    bodyweight: Timeline<Mass>,
    height: Timeline<Distance>,
}

impl BodyStats {
    /// Builds an aggregate from a stored document without ever failing.
    ///
    /// Missing fields take their defaults. Fields that are present but do not
    /// parse are logged and replaced with their defaults too.
    pub fn from_document(document: &Value) -> Self {
        let Some(fields) = document.as_object() else {
            tracing::warn!("body stats document is not an object, starting empty");
            return Self::default();
        };

        Self {
            birth_date: birth_date_field(fields),
            bf_percent: lenient_field(fields, "bfPercent"),
            bodyweight: lenient_field(fields, "bodyweight"),
            height: lenient_field(fields, "height"),
        }
    }

    /// The whole aggregate as a document.
    pub fn to_document(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    pub const fn birth_date(&self) -> Option<i64> {
        self.birth_date
    }

    pub const fn set_birth_date(&mut self, epoch_millis: Option<i64>) {
        self.birth_date = epoch_millis;
    }

    pub fn birth_date_utc(&self) -> Option<DateTime<Utc>> {
        self.birth_date.and_then(DateTime::from_timestamp_millis)
    }

    /// Age in whole years at `now`, if a birth date is set and not in the future.
    pub fn age_at(&self, now: DateTime<Utc>) -> Option<u32> {
        let born = self.birth_date_utc()?;
        now.date_naive().years_since(born.date_naive())
    }

    pub const fn bf_percent(&self) -> &Timeline<f64> {
        &self.bf_percent
    }

    pub const fn bodyweight(&self) -> &Timeline<Mass> {
        &self.bodyweight
    }

    pub const fn height(&self) -> &Timeline<Distance> {
        &self.height
    }

    /// Returns `false` if an entry already exists at that moment.
    pub fn record_bf_percent(&mut self, entry: TimedEntry<f64>) -> bool {
        self.bf_percent.add(entry)
    }

    /// Returns `false` if an entry already exists at that moment.
    pub fn record_bodyweight(&mut self, entry: TimedEntry<Mass>) -> bool {
        self.bodyweight.add(entry)
    }

    /// Returns `false` if an entry already exists at that moment.
    pub fn record_height(&mut self, entry: TimedEntry<Distance>) -> bool {
        self.height.add(entry)
    }

    /// Sets how new entries are de-duplicated. Stored entries are untouched.
    pub const fn set_granularity(&mut self, granularity: Granularity) {
        self.bf_percent.set_granularity(granularity);
        self.bodyweight.set_granularity(granularity);
        self.height.set_granularity(granularity);
    }

    /// Derived figures from the latest weight, height and body fat readings.
    pub fn composition(&self) -> Option<BodyComposition> {
        let weight = self.bodyweight.latest()?.value();
        let height = self.height.latest()?.value();
        let bf_percent = self.bf_percent.latest()?.value();
        Some(BodyComposition::compute(*weight, *height, *bf_percent))
    }
}

fn lenient_field<T: DeserializeOwned + Default>(fields: &Map<String, Value>, name: &str) -> T {
    match fields.get(name) {
        None | Some(Value::Null) => T::default(),
        Some(value) => T::deserialize(value).unwrap_or_else(|err| {
            tracing::warn!(field = name, error = %err, "malformed body stats field, using default");
            T::default()
        }),
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "fractional epoch milliseconds are dropped on purpose"
)]
fn birth_date_field(fields: &Map<String, Value>) -> Option<i64> {
    match fields.get("birthDate") {
        None | Some(Value::Null) => None,
        Some(value) => value
            .as_i64()
            .or_else(|| value.as_f64().filter(|f| f.is_finite()).map(|f| f as i64))
            .or_else(|| {
                tracing::warn!(value = %value, "malformed birth date, ignoring");
                None
            }),
    }
}
