//! CLI subcommand implementations.

pub mod export;
pub mod history;
pub mod record;
pub mod show;
pub mod status;
mod util;
