//! Export command: the stored body stats document as pretty JSON.

use std::io::Write;

use anyhow::{Context, Result};
use bs_core::BodyStats;

pub fn run<W: Write>(writer: &mut W, stats: &BodyStats) -> Result<()> {
    let document = stats
        .to_document()
        .context("failed to serialize body stats")?;
    serde_json::to_writer_pretty(&mut *writer, &document)
        .context("failed to write body stats")?;
    writeln!(writer)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use bs_core::{Mass, TimedEntry};
    use chrono::{TimeZone, Utc};
    use serde_json::Value;

    #[test]
    fn export_round_trips_through_document() {
        let moment = Utc.with_ymd_and_hms(2025, 1, 1, 8, 0, 0).unwrap();
        let mut stats = BodyStats::default();
        stats.record_bodyweight(TimedEntry::new(moment, Mass::lbs(176.0)));
        stats.record_bf_percent(TimedEntry::new(moment, 15.0));

        let mut output = Vec::new();
        run(&mut output, &stats).unwrap();

        let document: Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(document["birthDate"], Value::Null);
        assert_eq!(document["bodyweight"][0]["value"]["unit"], "lbs");
        assert_eq!(BodyStats::from_document(&document), stats);
    }

    #[test]
    fn export_empty_stats() {
        let mut output = Vec::new();
        run(&mut output, &BodyStats::default()).unwrap();

        let document: Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(document["height"], Value::Array(Vec::new()));
    }
}
