//! Status command for showing where body stats live and who has some.

use std::io::Write;

use anyhow::Result;
use bs_db::Database;

use crate::Config;

pub fn run<W: Write>(writer: &mut W, db: &Database, config: &Config) -> Result<()> {
    let users = db.list_users()?;

    writeln!(writer, "Body stats status")?;
    writeln!(writer, "Database: {}", config.database_path.display())?;

    if users.is_empty() {
        writeln!(writer, "No body stats recorded.")?;
        return Ok(());
    }

    writeln!(writer, "Users:")?;
    for user in users {
        let current = if user.user_id == config.user_id {
            " (current)"
        } else {
            ""
        };
        writeln!(
            writer,
            "- {}{current}: last saved {}",
            user.user_id,
            user.updated_at.format("%Y-%m-%d %H:%M:%S UTC")
        )?;
    }

    Ok(())
}
