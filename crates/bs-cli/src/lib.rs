//! Body stats tracker CLI library.
//!
//! This crate provides the CLI interface for the body stats tracker.

mod cli;
pub mod commands;
mod config;
pub mod session;

pub use cli::{Cli, Commands, Metric, RecordAction};
pub use config::Config;
pub use session::{Session, SessionError};
