//! Reading the selected settings file.
//!
//! The file is TOML. An older `settings.ini` carries over by renaming it to
//! `settings.toml` and quoting its string values; bare INI values fail to parse.

use std::path::Path;

use super::ConfigError;

/// Loads and parses a TOML settings file.
pub fn load_table(path: &Path) -> Result<toml::Table, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })
}
