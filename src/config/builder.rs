use std::path::{Path, PathBuf};

use super::discover::{self, ConfigOrigin, ConfigWarning};
use super::file::load_table;
use super::runtime::RuntimeEnv;
use super::schema;
use super::value::ValidatedConfig;
use super::ConfigError;

/// Selects one settings file and validates it.
///
/// Candidates are tried in priority order and the first existing file wins.
/// Files are never merged. Before parsing, the chosen file's permission bits
/// are inspected. Access by other users is reported as a [`ConfigWarning`] and
/// does not stop resolution.
///
/// ## Example
///
/// ```no_run
/// use sivart::config::ConfigResolver;
///
/// let resolution = ConfigResolver::from_env()?.resolve()?;
/// println!("loaded from {}", resolution.origin);
/// # Ok::<(), sivart::ConfigError>(())
/// ```
#[derive(Debug, Clone)]
#[must_use = "resolvers do nothing until .resolve() is called"]
pub struct ConfigResolver {
    env: RuntimeEnv,
}

/// The outcome of a successful resolution.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub config: ValidatedConfig,
    pub origin: ConfigOrigin,
    pub warnings: Vec<ConfigWarning>,
}

impl ConfigResolver {
    pub fn new(env: RuntimeEnv) -> Self {
        Self { env }
    }

    /// Builds a resolver from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self::new(RuntimeEnv::from_process()?))
    }

    /// Picks the highest-priority existing file and validates it.
    ///
    /// With no file and testing off this fails with [`ConfigError::NoSource`].
    /// With testing on it yields a snapshot of schema defaults.
    pub fn resolve(&self) -> Result<Resolution, ConfigError> {
        let Some(candidate) = discover::select(&self.env) else {
            if !self.env.testing {
                return Err(ConfigError::NoSource {
                    tried: discover::candidates(&self.env)
                        .into_iter()
                        .map(|c| c.path)
                        .collect(),
                });
            }
            let warning = ConfigWarning::NoSource;
            tracing::warn!(%warning, "testing mode without a settings file");
            let config = schema::validate(&toml::Table::new(), None)?;
            return Ok(Resolution {
                config,
                origin: ConfigOrigin::Defaults,
                warnings: vec![warning],
            });
        };

        tracing::debug!(
            path = %candidate.path.display(),
            origin = %candidate.origin,
            "selected settings file"
        );

        let (config, warnings) = validate_file(&candidate.path)?;
        Ok(Resolution {
            config,
            origin: candidate.origin,
            warnings,
        })
    }

    /// Validates one explicit file, bypassing discovery.
    pub fn resolve_path(path: impl AsRef<Path>) -> Result<Resolution, ConfigError> {
        let (config, warnings) = validate_file(path.as_ref())?;
        Ok(Resolution {
            config,
            origin: ConfigOrigin::Override,
            warnings,
        })
    }
}

fn validate_file(path: &Path) -> Result<(ValidatedConfig, Vec<ConfigWarning>), ConfigError> {
    let mut warnings = Vec::new();
    if let Some(warning) = discover::check_permissions(path) {
        tracing::warn!(path = %path.display(), %warning, "insecure settings file");
        warnings.push(warning);
    }

    let table = load_table(path)?;
    let config = schema::validate(&table, Some(PathBuf::from(path)))?;
    Ok((config, warnings))
}
