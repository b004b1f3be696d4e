//! Signed-in session over one user's body stats.
//!
//! Any storage failure while loading or saving ends the session: the error is
//! logged, the session is consumed, and the caller gets
//! [`SessionError::SignedOut`]. There are no retries.

use bs_core::{BodyStats, Granularity, UserId};
use bs_db::{Database, DbError};
use thiserror::Error;

/// Session errors.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Storage failed and the session was signed out.
    #[error("signed out of {user} after a storage failure")]
    SignedOut {
        user: UserId,
        #[source]
        source: DbError,
    },
}

/// The signed-in user and their loaded body stats.
pub struct Session<'db> {
    db: &'db Database,
    user: UserId,
    stats: BodyStats,
}

impl<'db> Session<'db> {
    /// Loads (or creates) the user's body stats.
    pub fn sign_in(
        db: &'db Database,
        user: UserId,
        granularity: Granularity,
    ) -> Result<Self, SessionError> {
        match db.fetch_or_create_body_stats(&user) {
            Ok(mut stats) => {
                stats.set_granularity(granularity);
                tracing::debug!(user = %user, "signed in");
                Ok(Self { db, user, stats })
            }
            Err(source) => Err(sign_out_after(user, source)),
        }
    }

    pub const fn user(&self) -> &UserId {
        &self.user
    }

    pub const fn stats(&self) -> &BodyStats {
        &self.stats
    }

    pub const fn stats_mut(&mut self) -> &mut BodyStats {
        &mut self.stats
    }

    /// Writes the whole aggregate back to storage.
    pub fn save(self) -> Result<Self, SessionError> {
        match self.db.save_body_stats(&self.user, &self.stats) {
            Ok(()) => Ok(self),
            Err(source) => Err(sign_out_after(self.user, source)),
        }
    }

    /// Ends the session, returning who was signed in.
    pub fn sign_out(self) -> UserId {
        tracing::debug!(user = %self.user, "signed out");
        self.user
    }
}

fn sign_out_after(user: UserId, source: DbError) -> SessionError {
    tracing::error!(user = %user, error = %source, "storage failure, signing out");
    SessionError::SignedOut { user, source }
}
