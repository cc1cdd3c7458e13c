//! Typed settings groups derived from a validated configuration.

mod cache;
mod database;
mod general;

use serde::Serialize;

use crate::config::{ConfigError, RuntimeEnv, ValidatedConfig};

pub use cache::{
    resolve_cache_location, CacheBackend, CacheLocation, CacheSettings, DEFAULT_CACHE_DIR,
};
pub use database::{resolve_database_name, DatabaseEngine, DatabaseName, DatabaseSettings};
pub use general::{zip_admins, Admin, GeneralSettings, SecuritySettings};

/// Everything the hosting application needs, built once at startup.
///
/// `Debug` and `Serialize` leave out the secret key and database password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settings {
    pub general: GeneralSettings,
    pub security: SecuritySettings,
    pub database: DatabaseSettings,
    pub cache: CacheSettings,
}

impl Settings {
    /// Derives every settings group from `config`.
    ///
    /// Relative paths resolve against `env.install_root`; `env.testing`
    /// relaxes the secret key requirement.
    pub fn materialize(config: &ValidatedConfig, env: &RuntimeEnv) -> Result<Self, ConfigError> {
        let root = env.install_root.as_path();
        Ok(Self {
            general: GeneralSettings::from_config(config, root)?,
            security: SecuritySettings::from_config(config, env.testing)?,
            database: DatabaseSettings::from_config(config, root)?,
            cache: CacheSettings::from_config(config, root)?,
        })
    }
}
