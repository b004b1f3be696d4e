//! Command-line argument definitions.

use std::fmt;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Body stats tracker.
///
/// Records bodyweight, height and body fat percentage over time and derives
/// BMI and FFMI from the latest readings.
#[derive(Debug, Parser)]
#[command(name = "bs", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show the latest measurements and derived figures.
    Show,

    /// Record a new measurement.
    #[command(subcommand)]
    Record(RecordAction),

    /// List recent measurements of one kind.
    History {
        /// Which measurement to list.
        metric: Metric,

        /// How many of the most recent entries to show.
        #[arg(short = 'n', long, default_value_t = 10)]
        count: usize,

        /// Unit to display values in (mass or distance metrics only).
        #[arg(short, long)]
        unit: Option<String>,

        /// Output as JSON lines.
        #[arg(long)]
        json: bool,
    },

    /// Print the stored body stats document as JSON.
    Export,

    /// Show database location and stored users.
    Status,
}

/// Measurements that can be recorded.
#[derive(Debug, Subcommand)]
pub enum RecordAction {
    /// Record bodyweight.
    Weight {
        /// The weight, e.g. 80.5.
        #[arg(allow_hyphen_values = true)]
        value: String,

        /// Unit of the value (kg, lbs). Defaults to the configured mass unit.
        #[arg(short, long)]
        unit: Option<String>,

        /// When the measurement was taken (ISO 8601 or e.g. "2 hours ago").
        #[arg(long)]
        at: Option<String>,
    },

    /// Record height.
    Height {
        /// The height, e.g. 180.
        #[arg(allow_hyphen_values = true)]
        value: String,

        /// Unit of the value (cm, m, in, ft). Defaults to the configured distance unit.
        #[arg(short, long)]
        unit: Option<String>,

        /// When the measurement was taken (ISO 8601 or e.g. "2 hours ago").
        #[arg(long)]
        at: Option<String>,
    },

    /// Record body fat percentage.
    BodyFat {
        /// The percentage, e.g. 15.
        #[arg(allow_hyphen_values = true)]
        value: String,

        /// When the measurement was taken (ISO 8601 or e.g. "2 hours ago").
        #[arg(long)]
        at: Option<String>,
    },

    /// Set the birth date (YYYY-MM-DD).
    BirthDate {
        /// The birth date, e.g. 1990-03-02.
        date: String,
    },
}

/// Measurement series that can be listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Metric {
    Weight,
    Height,
    BodyFat,
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Weight => "bodyweight",
            Self::Height => "height",
            Self::BodyFat => "body fat",
        };
        write!(f, "{s}")
    }
}
