//! Record command for appending measurements.
//!
//! Raw text is validated here before any value is constructed. Entries whose
//! moment collides with an existing one are dropped and nothing is saved.

use std::io::Write;

use anyhow::{Context, Result};
use bs_core::types::{parse_bf_percent, parse_positive};
use bs_core::{Distance, DistanceDimension, Mass, MassDimension, TimedEntry, Unit};
use chrono::{DateTime, Utc};

use super::util::{MOMENT_FORMAT, parse_date, parse_datetime};
use crate::{Config, RecordAction, Session};

pub fn run<W: Write>(
    writer: &mut W,
    mut session: Session<'_>,
    action: &RecordAction,
    config: &Config,
    now: DateTime<Utc>,
) -> Result<()> {
    let (added, description, moment) = match action {
        RecordAction::Weight { value, unit, at } => {
            let unit = match unit {
                Some(unit) => Unit::parse_for::<MassDimension>(unit)?,
                None => config.mass_unit()?,
            };
            let weight = Mass::new(parse_positive("bodyweight", value)?, unit)?;
            let moment = measured_at(at.as_deref(), now)?;
            let added = session
                .stats_mut()
                .record_bodyweight(TimedEntry::new(moment, weight));
            (added, format!("bodyweight {weight}"), moment)
        }
        RecordAction::Height { value, unit, at } => {
            let unit = match unit {
                Some(unit) => Unit::parse_for::<DistanceDimension>(unit)?,
                None => config.distance_unit()?,
            };
            let height = Distance::new(parse_positive("height", value)?, unit)?;
            let moment = measured_at(at.as_deref(), now)?;
            let added = session
                .stats_mut()
                .record_height(TimedEntry::new(moment, height));
            (added, format!("height {height}"), moment)
        }
        RecordAction::BodyFat { value, at } => {
            let percent = parse_bf_percent(value)?;
            let moment = measured_at(at.as_deref(), now)?;
            let added = session
                .stats_mut()
                .record_bf_percent(TimedEntry::new(moment, percent));
            (added, format!("body fat {percent:.2}%"), moment)
        }
        RecordAction::BirthDate { date } => {
            let born = parse_date(date)?;
            session
                .stats_mut()
                .set_birth_date(Some(born.timestamp_millis()));
            session.save()?;
            writeln!(writer, "Birth date set to {}", born.format("%Y-%m-%d"))?;
            return Ok(());
        }
    };

    let moment = moment.format(MOMENT_FORMAT);
    if !added {
        writeln!(
            writer,
            "An entry already exists at {moment}; {description} not recorded."
        )?;
        return Ok(());
    }

    session.save()?;
    writeln!(writer, "Recorded {description} at {moment}")?;
    Ok(())
}

fn measured_at(at: Option<&str>, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
    at.map_or(Ok(now), |at| {
        parse_datetime(at, now).context("invalid --at value")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use bs_core::{BodyStats, Granularity, UserId};
    use bs_db::Database;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn alice() -> UserId {
        UserId::new("alice").unwrap()
    }

    fn record(db: &Database, action: &RecordAction, config: &Config) -> Result<String> {
        let session = Session::sign_in(db, alice(), config.granularity)?;
        let mut output = Vec::new();
        run(&mut output, session, action, config, now())?;
        Ok(String::from_utf8(output)?)
    }

    fn stored(db: &Database) -> BodyStats {
        db.fetch_body_stats(&alice()).unwrap().unwrap()
    }

    #[test]
    fn records_weight_in_default_unit() {
        let db = Database::open_in_memory().unwrap();
        let action = RecordAction::Weight {
            value: "80.5".to_string(),
            unit: None,
            at: None,
        };

        let output = record(&db, &action, &Config::default()).unwrap();
        assert_eq!(
            output,
            "Recorded bodyweight 80.50 kg at 2025-06-01 12:00:00 UTC\n"
        );

        let stats = stored(&db);
        let latest = stats.bodyweight().latest().unwrap();
        assert_eq!(latest.moment(), now());
        assert_eq!(*latest.value(), Mass::kg(80.5));
    }

    #[test]
    fn records_height_with_explicit_unit_and_time() {
        let db = Database::open_in_memory().unwrap();
        let action = RecordAction::Height {
            value: "6".to_string(),
            unit: Some("ft".to_string()),
            at: Some("2 days ago".to_string()),
        };

        let output = record(&db, &action, &Config::default()).unwrap();
        assert_eq!(
            output,
            "Recorded height 6.00 ft at 2025-05-30 12:00:00 UTC\n"
        );

        let stats = stored(&db);
        let latest = stats.height().latest().unwrap();
        assert_eq!(latest.value().unit(), Unit::FEET);
        assert_eq!(*latest.value(), Distance::cm(182.88));
    }

    #[test]
    fn duplicate_moment_is_not_recorded() {
        let db = Database::open_in_memory().unwrap();
        let first = RecordAction::BodyFat {
            value: "15".to_string(),
            at: Some("2025-01-01T08:00:00Z".to_string()),
        };
        let second = RecordAction::BodyFat {
            value: "22".to_string(),
            at: Some("2025-01-01T08:00:00.400Z".to_string()),
        };

        record(&db, &first, &Config::default()).unwrap();
        let output = record(&db, &second, &Config::default()).unwrap();
        assert_eq!(
            output,
            "An entry already exists at 2025-01-01 08:00:00 UTC; body fat 22.00% not recorded.\n"
        );

        let stats = stored(&db);
        assert_eq!(stats.bf_percent().len(), 1);
        assert_eq!(stats.bf_percent().latest().map(|e| *e.value()), Some(15.0));
    }

    #[test]
    fn minute_granularity_from_config_collapses_entries() {
        let db = Database::open_in_memory().unwrap();
        let config = Config {
            granularity: Granularity::Minutes,
            ..Config::default()
        };
        for at in ["2025-01-01T08:00:00Z", "2025-01-01T08:00:40Z"] {
            let action = RecordAction::Weight {
                value: "80".to_string(),
                unit: None,
                at: Some(at.to_string()),
            };
            record(&db, &action, &config).unwrap();
        }

        assert_eq!(stored(&db).bodyweight().len(), 1);
    }

    #[test]
    fn rejects_invalid_values() {
        let db = Database::open_in_memory().unwrap();

        let not_a_number = RecordAction::Weight {
            value: "heavy".to_string(),
            unit: None,
            at: None,
        };
        let err = record(&db, &not_a_number, &Config::default()).unwrap_err();
        assert_eq!(err.to_string(), "bodyweight must be a number, got \"heavy\"");

        let negative = RecordAction::Height {
            value: "-180".to_string(),
            unit: None,
            at: None,
        };
        assert!(record(&db, &negative, &Config::default()).is_err());

        let too_much_fat = RecordAction::BodyFat {
            value: "120".to_string(),
            at: None,
        };
        assert!(record(&db, &too_much_fat, &Config::default()).is_err());

        assert_eq!(stored(&db), BodyStats::default());
    }

    #[test]
    fn rejects_unit_of_other_dimension() {
        let db = Database::open_in_memory().unwrap();
        let action = RecordAction::Weight {
            value: "80".to_string(),
            unit: Some("cm".to_string()),
            at: None,
        };

        let err = record(&db, &action, &Config::default()).unwrap_err();
        assert_eq!(err.to_string(), "cm is a distance unit, expected a mass unit");
    }

    #[test]
    fn sets_birth_date() {
        let db = Database::open_in_memory().unwrap();
        let action = RecordAction::BirthDate {
            date: "1990-03-02".to_string(),
        };

        let output = record(&db, &action, &Config::default()).unwrap();
        assert_eq!(output, "Birth date set to 1990-03-02\n");
        assert_eq!(stored(&db).age_at(now()), Some(35));
    }
}
