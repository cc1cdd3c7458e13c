//! Process environment inputs to configuration resolution.

use std::path::{Path, PathBuf};

use super::ConfigError;

/// Names an explicit settings file.
pub const ENV_CONFIG_PATH: &str = "SIVART_CONFIG";
/// Integer flag; non-zero relaxes the missing-source and missing-secret checks.
pub const ENV_TESTING: &str = "SIVART_TESTING";
/// Installation root used for relative paths.
pub const ENV_BASE_DIR: &str = "SIVART_BASE_DIR";
/// Explicit build identifier, checked before asking git.
pub const ENV_COMMIT_ID: &str = "SIVART_COMMIT_ID";

/// File name looked up in the user and installation locations.
pub const CONFIG_FILENAME: &str = "settings.toml";

const APP_NAME: &str = "sivart";

/// Everything resolution needs to know about the process it runs in.
///
/// Only [`RuntimeEnv::from_process`] touches the real environment; tests build
/// the struct directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeEnv {
    pub config_override: Option<PathBuf>,
    pub home_dir: Option<PathBuf>,
    pub install_root: PathBuf,
    pub testing: bool,
    pub commit_id: Option<String>,
}

impl RuntimeEnv {
    /// Creates an environment with no override, no home directory and testing off.
    pub fn new(install_root: impl AsRef<Path>) -> Self {
        Self {
            config_override: None,
            home_dir: None,
            install_root: install_root.as_ref().to_path_buf(),
            testing: false,
            commit_id: None,
        }
    }

    pub fn with_override(mut self, path: impl AsRef<Path>) -> Self {
        self.config_override = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn with_home(mut self, home: impl AsRef<Path>) -> Self {
        self.home_dir = Some(home.as_ref().to_path_buf());
        self
    }

    pub fn testing(mut self, testing: bool) -> Self {
        self.testing = testing;
        self
    }

    pub fn with_commit_id(mut self, commit_id: impl Into<String>) -> Self {
        self.commit_id = Some(commit_id.into());
        self
    }

    /// Reads `SIVART_CONFIG`, `SIVART_TESTING`, `SIVART_BASE_DIR`, `SIVART_COMMIT_ID`
    /// and the user's home directory.
    pub fn from_process() -> Result<Self, ConfigError> {
        let config_override = std::env::var_os(ENV_CONFIG_PATH)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        let testing = match std::env::var(ENV_TESTING) {
            Ok(raw) => parse_testing_flag(&raw)?,
            Err(_) => false,
        };

        let install_root = match std::env::var_os(ENV_BASE_DIR).filter(|v| !v.is_empty()) {
            Some(dir) => PathBuf::from(dir),
            None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        };

        Ok(Self {
            config_override,
            home_dir: dirs::home_dir(),
            install_root,
            testing,
            commit_id: std::env::var(ENV_COMMIT_ID).ok(),
        })
    }

    /// `<home>/.config/sivart/settings.toml`, when a home directory is known.
    pub fn user_config_path(&self) -> Option<PathBuf> {
        self.home_dir
            .as_ref()
            .map(|home| home.join(".config").join(APP_NAME).join(CONFIG_FILENAME))
    }

    /// `<install_root>/settings.toml`.
    pub fn install_config_path(&self) -> PathBuf {
        self.install_root.join(CONFIG_FILENAME)
    }
}

/// Parses the testing flag as an integer, where any non-zero value enables it.
pub fn parse_testing_flag(raw: &str) -> Result<bool, ConfigError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(false);
    }
    trimmed
        .parse::<i64>()
        .map(|v| v != 0)
        .map_err(|_| ConfigError::InvalidTestingFlag(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_testing_flag_parsing() {
        assert!(!parse_testing_flag("0").unwrap());
        assert!(parse_testing_flag("1").unwrap());
        assert!(parse_testing_flag(" 2 ").unwrap());
        assert!(!parse_testing_flag("").unwrap());
        assert!(matches!(
            parse_testing_flag("yes"),
            Err(ConfigError::InvalidTestingFlag(_))
        ));
    }

    #[test]
    fn test_candidate_paths() {
        let env = RuntimeEnv::new("/opt/sivart").with_home("/home/me");
        assert_eq!(
            env.user_config_path().unwrap(),
            PathBuf::from("/home/me/.config/sivart/settings.toml")
        );
        assert_eq!(
            env.install_config_path(),
            PathBuf::from("/opt/sivart/settings.toml")
        );
    }

    #[test]
    fn test_no_home_means_no_user_path() {
        let env = RuntimeEnv::new("/opt/sivart");
        assert!(env.user_config_path().is_none());
    }
}
