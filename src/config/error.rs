use std::path::PathBuf;
use thiserror::Error;

/// Fatal configuration failures. Any of these prevents startup.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("no configuration source found (tried: {})", display_paths(.tried))]
    NoSource { tried: Vec<PathBuf> },

    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(
        "failed to parse config file '{path}' as TOML \
         (settings.ini files need string values quoted): {source}"
    )]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("missing required setting '{section}.{key}'")]
    MissingKey {
        section: &'static str,
        key: &'static str,
    },

    #[error("setting '{section}.{key}' must be {expected}, got {found}")]
    TypeMismatch {
        section: &'static str,
        key: &'static str,
        expected: &'static str,
        found: String,
    },

    #[error("you must set 'general.secret_key' in your settings file")]
    MissingSecretKey,

    #[error("admin_names has {names} entries but admin_emails has {emails}")]
    AdminCountMismatch { names: usize, emails: usize },

    #[error("unknown database engine: {0}")]
    UnknownEngine(String),

    #[error("unknown cache backend: {0}")]
    UnknownBackend(String),

    #[error("SIVART_TESTING must be an integer, got '{0}'")]
    InvalidTestingFlag(String),
}

fn display_paths(paths: &[PathBuf]) -> String {
    if paths.is_empty() {
        return "nothing".to_string();
    }
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
