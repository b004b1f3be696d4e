//! Configuration loading and management.

use std::path::{Path, PathBuf};

use bs_core::{
    DEFAULT_GRANULARITY, DistanceDimension, Granularity, MassDimension, Unit, UnitError, UserId,
    ValidationError,
};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// User id used when none is configured.
pub const DEFAULT_USER_ID: &str = "local";

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the database file.
    pub database_path: PathBuf,
    /// Whose body stats to read and write.
    pub user_id: String,
    /// Unit used to display and record bodyweight when none is given.
    pub mass_unit: String,
    /// Unit used to display and record height when none is given.
    pub distance_unit: String,
    /// Resolution at which two measurements count as the same moment.
    pub granularity: Granularity,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs_data_path().unwrap_or_else(|| PathBuf::from("."));
        Self {
            database_path: data_dir.join("bs.db"),
            user_id: DEFAULT_USER_ID.to_string(),
            mass_unit: Unit::KILOGRAMS.symbol().to_string(),
            distance_unit: Unit::CENTIMETERS.symbol().to_string(),
            granularity: DEFAULT_GRANULARITY,
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (BS_*)
        figment = figment.merge(Env::prefixed("BS_"));

        figment.extract()
    }

    pub fn user(&self) -> Result<UserId, ValidationError> {
        UserId::new(self.user_id.as_str())
    }

    pub fn mass_unit(&self) -> Result<Unit, UnitError> {
        Unit::parse_for::<MassDimension>(&self.mass_unit)
    }

    pub fn distance_unit(&self) -> Result<Unit, UnitError> {
        Unit::parse_for::<DistanceDimension>(&self.distance_unit)
    }
}

/// Returns the platform-specific config directory for bs.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("bs"))
}

/// Returns the platform-specific data directory for bs.
///
/// On Linux: `~/.local/share/bs`
pub fn dirs_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("bs"))
}
