//! Chronologically ordered series of timestamped measurements.
//!
//! A [`Timeline`] keeps its entries sorted by moment. Adding an entry whose
//! moment collides with an existing one under the timeline's [`Granularity`]
//! is a silent no-op: the stored entry wins. Entries are never removed, so
//! the granularity only decides which new entries are accepted.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Resolution at which two moments are considered the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Seconds,
    Minutes,
}

/// Granularity used by new and deserialized timelines.
pub const DEFAULT_GRANULARITY: Granularity = Granularity::Seconds;

impl Granularity {
    /// Orders `a` relative to `b`, with their difference truncated toward zero
    /// at this granularity.
    #[must_use]
    pub fn compare(self, a: DateTime<Utc>, b: DateTime<Utc>) -> Ordering {
        let delta = a - b;
        let units = match self {
            Self::Seconds => delta.num_seconds(),
            Self::Minutes => delta.num_minutes(),
        };
        units.cmp(&0)
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Seconds => "seconds",
            Self::Minutes => "minutes",
        }
    }
}

impl Default for Granularity {
    fn default() -> Self {
        DEFAULT_GRANULARITY
    }
}

/// A value recorded at a moment in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedEntry<V> {
    moment: DateTime<Utc>,
    value: V,
}

impl<V> TimedEntry<V> {
    pub const fn new(moment: DateTime<Utc>, value: V) -> Self {
        Self { moment, value }
    }

    /// Creates an entry stamped with the current time.
    pub fn now(value: V) -> Self {
        Self::new(Utc::now(), value)
    }

    pub const fn moment(&self) -> DateTime<Utc> {
        self.moment
    }

    pub const fn value(&self) -> &V {
        &self.value
    }

    pub fn into_value(self) -> V {
        self.value
    }
}

/// Ascending, de-duplicated series of [`TimedEntry`] values.
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline<V> {
    values: Vec<TimedEntry<V>>,
    granularity: Granularity,
}

impl<V> Default for Timeline<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Timeline<V> {
    /// Creates an empty timeline with [`DEFAULT_GRANULARITY`].
    pub const fn new() -> Self {
        Self::with_granularity(DEFAULT_GRANULARITY)
    }

    pub const fn with_granularity(granularity: Granularity) -> Self {
        Self {
            values: Vec::new(),
            granularity,
        }
    }

    /// Builds a timeline by adding each entry in turn.
    ///
    /// Unordered input is sorted; colliding moments keep the first occurrence.
    pub fn from_entries(entries: impl IntoIterator<Item = TimedEntry<V>>) -> Self {
        entries.into_iter().collect()
    }

    pub const fn granularity(&self) -> Granularity {
        self.granularity
    }

    /// Switches the resolution used to de-duplicate future adds.
    ///
    /// Stored entries are kept even if they collide at the new resolution.
    pub const fn set_granularity(&mut self, granularity: Granularity) {
        self.granularity = granularity;
    }

    /// Rebuilds a timeline from persisted entries, sorting but never dropping.
    fn restore(mut values: Vec<TimedEntry<V>>) -> Self {
        values.sort_by_key(|entry| entry.moment);
        Self {
            values,
            granularity: DEFAULT_GRANULARITY,
        }
    }

    /// Binary search for `moment`.
    ///
    /// Returns `Ok(index)` of an entry at the same moment (under the
    /// granularity), or `Err(index)` where an entry at `moment` would be
    /// inserted.
    pub fn search(&self, moment: DateTime<Utc>) -> Result<usize, usize> {
        let granularity = self.granularity;
        self.values
            .binary_search_by(|probe| granularity.compare(probe.moment, moment))
    }

    /// Inserts `entry` in order. Returns `false`, leaving the timeline
    /// untouched, if an entry already exists at that moment.
    pub fn add(&mut self, entry: TimedEntry<V>) -> bool {
        match self.search(entry.moment) {
            Ok(_) => false,
            Err(index) => {
                self.values.insert(index, entry);
                true
            }
        }
    }

    /// The most recent entry.
    pub fn latest(&self) -> Option<&TimedEntry<V>> {
        self.values.last()
    }

    /// The most recent `count` entries, oldest first.
    pub fn entries(&self, count: usize) -> &[TimedEntry<V>] {
        let start = self.values.len().saturating_sub(count);
        &self.values[start..]
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TimedEntry<V>> {
        self.values.iter()
    }
}

impl<V> Extend<TimedEntry<V>> for Timeline<V> {
    fn extend<I: IntoIterator<Item = TimedEntry<V>>>(&mut self, iter: I) {
        for entry in iter {
            self.add(entry);
        }
    }
}

impl<V> FromIterator<TimedEntry<V>> for Timeline<V> {
    fn from_iter<I: IntoIterator<Item = TimedEntry<V>>>(iter: I) -> Self {
        let mut timeline = Self::new();
        timeline.extend(iter);
        timeline
    }
}

impl<'a, V> IntoIterator for &'a Timeline<V> {
    type Item = &'a TimedEntry<V>;
    type IntoIter = std::slice::Iter<'a, TimedEntry<V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<V: Serialize> Serialize for Timeline<V> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.values.serialize(serializer)
    }
}

/// Stored timeline shapes: a bare array, or an object wrapping `values`
/// (which may be missing entirely).
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredTimeline<V> {
    Entries(Vec<TimedEntry<V>>),
    Wrapped {
        #[serde(default = "Vec::new")]
        values: Vec<TimedEntry<V>>,
    },
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for Timeline<V> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let entries = match StoredTimeline::deserialize(deserializer)? {
            StoredTimeline::Entries(values) | StoredTimeline::Wrapped { values } => values,
        };
        Ok(Self::restore(entries))
    }
}
