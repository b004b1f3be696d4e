//! History command for listing recent measurements of one kind.
//!
//! Human-readable output lists one entry per line, oldest first. With
//! `--json` each entry is written as a JSON object on its own line.

use std::fmt;
use std::io::Write;

use anyhow::{Result, bail};
use bs_core::{
    BodyStats, DistanceDimension, MassDimension, Measure, TimedEntry, Unit, UnitError, UnitValue,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::util::MOMENT_FORMAT;
use crate::{Config, Metric};

/// One listed measurement.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryRow {
    pub moment: DateTime<Utc>,
    pub value: f64,
    /// Unit symbol; absent for percentages.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<&'static str>,
}

impl fmt::Display for HistoryRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let moment = self.moment.format(MOMENT_FORMAT);
        match self.unit {
            Some(unit) => write!(f, "{moment}  {:.2} {unit}", self.value),
            None => write!(f, "{moment}  {:.2}%", self.value),
        }
    }
}

/// Options for the history command.
#[derive(Debug, Clone)]
pub struct HistoryOptions<'a> {
    pub metric: Metric,
    pub count: usize,
    pub unit: Option<&'a str>,
    pub json: bool,
}

pub fn run<W: Write>(
    writer: &mut W,
    stats: &BodyStats,
    options: &HistoryOptions<'_>,
    config: &Config,
) -> Result<()> {
    let rows = history_rows(stats, options.metric, options.count, options.unit, config)?;

    if options.json {
        for row in &rows {
            writeln!(writer, "{}", serde_json::to_string(row)?)?;
        }
        return Ok(());
    }

    if rows.is_empty() {
        writeln!(writer, "No {} entries.", options.metric)?;
        return Ok(());
    }
    for row in &rows {
        writeln!(writer, "{row}")?;
    }
    Ok(())
}

/// The most recent `count` entries of `metric`, converted for display.
pub fn history_rows(
    stats: &BodyStats,
    metric: Metric,
    count: usize,
    unit: Option<&str>,
    config: &Config,
) -> Result<Vec<HistoryRow>> {
    let rows = match metric {
        Metric::Weight => {
            let unit = resolve_unit::<MassDimension>(unit, config.mass_unit())?;
            unit_rows(stats.bodyweight().entries(count), unit)?
        }
        Metric::Height => {
            let unit = resolve_unit::<DistanceDimension>(unit, config.distance_unit())?;
            unit_rows(stats.height().entries(count), unit)?
        }
        Metric::BodyFat => {
            if unit.is_some() {
                bail!("body fat is a percentage and takes no unit");
            }
            stats
                .bf_percent()
                .entries(count)
                .iter()
                .map(|entry| HistoryRow {
                    moment: entry.moment(),
                    value: *entry.value(),
                    unit: None,
                })
                .collect()
        }
    };
    Ok(rows)
}

fn resolve_unit<D: Measure>(
    requested: Option<&str>,
    configured: Result<Unit, UnitError>,
) -> Result<Unit, UnitError> {
    requested.map_or(configured, Unit::parse_for::<D>)
}

fn unit_rows<D: Measure>(
    entries: &[TimedEntry<UnitValue<D>>],
    unit: Unit,
) -> Result<Vec<HistoryRow>, UnitError> {
    entries
        .iter()
        .map(|entry| {
            let value = entry.value().to(unit)?;
            Ok(HistoryRow {
                moment: entry.moment(),
                value: value.value(),
                unit: Some(unit.symbol()),
            })
        })
        .collect()
}
