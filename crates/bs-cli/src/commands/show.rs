//! Show command: latest measurements and derived figures.

use std::fmt::Display;
use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, Utc};

use super::util::MOMENT_FORMAT;
use crate::{Config, Session};

/// Width of the label column.
const LABEL_WIDTH: usize = 12;

pub fn run<W: Write>(
    writer: &mut W,
    session: &Session<'_>,
    config: &Config,
    now: DateTime<Utc>,
) -> Result<()> {
    let stats = session.stats();
    let mass_unit = config.mass_unit()?;
    let distance_unit = config.distance_unit()?;

    writeln!(writer, "Body statistics for {}", session.user())?;

    match stats.bodyweight().latest() {
        Some(entry) => {
            let weight = entry.value().to(mass_unit)?;
            let moment = entry.moment().format(MOMENT_FORMAT);
            line(writer, "Bodyweight:", format_args!("{weight} ({moment})"))?;
        }
        None => writeln!(writer, "No bodyweight set.")?,
    }

    match stats.height().latest() {
        Some(entry) => {
            let height = entry.value().to(distance_unit)?;
            let moment = entry.moment().format(MOMENT_FORMAT);
            line(writer, "Height:", format_args!("{height} ({moment})"))?;
        }
        None => writeln!(writer, "No height set.")?,
    }

    match stats.bf_percent().latest() {
        Some(entry) => {
            let moment = entry.moment().format(MOMENT_FORMAT);
            line(
                writer,
                "Body fat:",
                format_args!("{:.2}% ({moment})", entry.value()),
            )?;
        }
        None => writeln!(writer, "No body fat percentage set.")?,
    }

    if let Some(age) = stats.age_at(now) {
        line(writer, "Age:", age)?;
    }

    if let Some(composition) = stats.composition() {
        line(writer, "Lean mass:", composition.lean_mass.to(mass_unit)?)?;
        line(writer, "Fat mass:", composition.fat_mass.to(mass_unit)?)?;
        line(writer, "BMI:", format_args!("{:.2}", composition.bmi))?;
        line(writer, "FFMI:", format_args!("{:.2}", composition.ffmi))?;
        line(
            writer,
            "FFMI (adj):",
            format_args!("{:.2}", composition.ffmi_normalized),
        )?;
    }

    Ok(())
}

fn line<W: Write>(writer: &mut W, label: &str, value: impl Display) -> std::io::Result<()> {
    writeln!(writer, "{label:<LABEL_WIDTH$}{value}")
}
