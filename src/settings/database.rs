use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Serialize;

use crate::config::schema::DATABASE;
use crate::config::{ConfigError, ValidatedConfig};

/// Supported database engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseEngine {
    Postgresql,
    Mysql,
    Oracle,
    Sqlite,
}

impl DatabaseEngine {
    /// Fully qualified backend the hosting framework loads for this engine.
    pub fn backend_name(self) -> &'static str {
        match self {
            DatabaseEngine::Postgresql => "django.db.backends.postgresql_psycopg2",
            DatabaseEngine::Mysql => "django.db.backends.mysql",
            DatabaseEngine::Oracle => "django.db.backends.oracle",
            DatabaseEngine::Sqlite => "django.db.backends.sqlite3",
        }
    }

    /// Engines that store data in a local file.
    pub fn is_file_based(self) -> bool {
        matches!(self, DatabaseEngine::Sqlite)
    }
}

impl FromStr for DatabaseEngine {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "postgresql" => Ok(DatabaseEngine::Postgresql),
            "mysql" => Ok(DatabaseEngine::Mysql),
            "oracle" => Ok(DatabaseEngine::Oracle),
            "sqlite" => Ok(DatabaseEngine::Sqlite),
            other => Err(ConfigError::UnknownEngine(other.to_string())),
        }
    }
}

/// The database `name` setting after engine-dependent interpretation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DatabaseName {
    Path(PathBuf),
    Named(String),
}

impl fmt::Display for DatabaseName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatabaseName::Path(path) => write!(f, "{}", path.display()),
            DatabaseName::Named(name) => f.write_str(name),
        }
    }
}

/// File-based engines get a path under the install root; the rest keep the name as given.
pub fn resolve_database_name(
    engine: DatabaseEngine,
    name: &str,
    install_root: &Path,
) -> DatabaseName {
    if engine.is_file_based() {
        DatabaseName::Path(install_root.join(name))
    } else {
        DatabaseName::Named(name.to_string())
    }
}

#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct DatabaseSettings {
    pub engine: DatabaseEngine,
    pub user: String,
    #[serde(skip)]
    pub password: String,
    pub host: String,
    pub port: String,
    pub name: DatabaseName,
}

impl DatabaseSettings {
    pub fn from_config(config: &ValidatedConfig, install_root: &Path) -> Result<Self, ConfigError> {
        let engine: DatabaseEngine = config.str(DATABASE, "engine")?.parse()?;
        let name = resolve_database_name(engine, config.str(DATABASE, "name")?, install_root);

        Ok(Self {
            engine,
            user: config.str(DATABASE, "user")?.to_string(),
            password: config.str(DATABASE, "password")?.to_string(),
            host: config.str(DATABASE, "host")?.to_string(),
            port: config.str(DATABASE, "port")?.to_string(),
            name,
        })
    }
}

impl fmt::Debug for DatabaseSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseSettings")
            .field("engine", &self.engine)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("name", &self.name)
            .finish()
    }
}
