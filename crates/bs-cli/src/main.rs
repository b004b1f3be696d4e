use std::io::stdout;
use std::path::Path;

use anyhow::{Context, Result};
use bs_db::Database;
use chrono::Utc;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use bs_cli::commands::{export, history, record, show, status};
use bs_cli::{Cli, Commands, Config, Session};

/// Load config and open database, ensuring the parent directory exists.
fn open_database(config_path: Option<&Path>) -> Result<(Database, Config)> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent).context("failed to create database directory")?;
    }

    let db = Database::open(&config.database_path).context("failed to open database")?;
    Ok((db, config))
}

/// Sign in as the configured user.
fn sign_in<'db>(db: &'db Database, config: &Config) -> Result<Session<'db>> {
    let user = config.user().context("invalid user_id in configuration")?;
    Ok(Session::sign_in(db, user, config.granularity)?)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Logs go to stderr so that command output stays machine-readable
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let now = Utc::now();
    let mut out = stdout().lock();

    match &cli.command {
        Some(Commands::Show) => {
            let (db, config) = open_database(cli.config.as_deref())?;
            let session = sign_in(&db, &config)?;
            show::run(&mut out, &session, &config, now)?;
            session.sign_out();
        }
        Some(Commands::Record(action)) => {
            let (db, config) = open_database(cli.config.as_deref())?;
            let session = sign_in(&db, &config)?;
            record::run(&mut out, session, action, &config, now)?;
        }
        Some(Commands::History {
            metric,
            count,
            unit,
            json,
        }) => {
            let (db, config) = open_database(cli.config.as_deref())?;
            let session = sign_in(&db, &config)?;
            let options = history::HistoryOptions {
                metric: *metric,
                count: *count,
                unit: unit.as_deref(),
                json: *json,
            };
            history::run(&mut out, session.stats(), &options, &config)?;
            session.sign_out();
        }
        Some(Commands::Export) => {
            let (db, config) = open_database(cli.config.as_deref())?;
            let session = sign_in(&db, &config)?;
            export::run(&mut out, session.stats())?;
            session.sign_out();
        }
        Some(Commands::Status) => {
            let (db, config) = open_database(cli.config.as_deref())?;
            status::run(&mut out, &db, &config)?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
