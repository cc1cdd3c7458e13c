use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Serialize;

use crate::config::schema::CACHE;
use crate::config::{ConfigError, ValidatedConfig};

/// Directory under the install root used by the file cache when no location is set.
pub const DEFAULT_CACHE_DIR: &str = "sivart_cache";

/// Supported cache backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    Database,
    Dummy,
    File,
    Localmem,
    Memcached,
}

impl CacheBackend {
    pub fn backend_name(self) -> &'static str {
        match self {
            CacheBackend::Database => "django.core.cache.backends.db.DatabaseCache",
            CacheBackend::Dummy => "django.core.cache.backends.dummy.DummyCache",
            CacheBackend::File => "django.core.cache.backends.filebased.FileBasedCache",
            CacheBackend::Localmem => "django.core.cache.backends.locmem.LocMemCache",
            CacheBackend::Memcached => "django.core.cache.backends.memcached.PyLibMCCache",
        }
    }

    pub fn is_file_based(self) -> bool {
        matches!(self, CacheBackend::File)
    }
}

impl FromStr for CacheBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "database" => Ok(CacheBackend::Database),
            "dummy" => Ok(CacheBackend::Dummy),
            "file" => Ok(CacheBackend::File),
            "localmem" => Ok(CacheBackend::Localmem),
            "memcached" => Ok(CacheBackend::Memcached),
            other => Err(ConfigError::UnknownBackend(other.to_string())),
        }
    }
}

/// Cache location after backend-dependent interpretation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CacheLocation {
    Path(PathBuf),
    /// Passed to the backend untouched; may be empty.
    Opaque(String),
}

impl fmt::Display for CacheLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheLocation::Path(path) => write!(f, "{}", path.display()),
            CacheLocation::Opaque(location) => f.write_str(location),
        }
    }
}

/// File caches live under the install root, defaulting to [`DEFAULT_CACHE_DIR`].
pub fn resolve_cache_location(
    backend: CacheBackend,
    location: &str,
    install_root: &Path,
) -> CacheLocation {
    if !backend.is_file_based() {
        return CacheLocation::Opaque(location.to_string());
    }
    if location.is_empty() {
        CacheLocation::Path(install_root.join(DEFAULT_CACHE_DIR))
    } else {
        CacheLocation::Path(install_root.join(location))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheSettings {
    pub backend: CacheBackend,
    pub timeout: i64,
    pub location: CacheLocation,
}

impl CacheSettings {
    pub fn from_config(config: &ValidatedConfig, install_root: &Path) -> Result<Self, ConfigError> {
        let backend: CacheBackend = config.str(CACHE, "backend")?.parse()?;
        Ok(Self {
            backend,
            timeout: config.int(CACHE, "timeout")?,
            location: resolve_cache_location(backend, config.str(CACHE, "location")?, install_root),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROOT: &str = "/srv/sivart";

    #[test]
    fn test_backend_lookup() {
        assert_eq!("localmem".parse::<CacheBackend>().unwrap(), CacheBackend::Localmem);
        assert_eq!(
            CacheBackend::File.backend_name(),
            "django.core.cache.backends.filebased.FileBasedCache"
        );
        assert!(matches!(
            "redis".parse::<CacheBackend>(),
            Err(ConfigError::UnknownBackend(_))
        ));
    }

    #[test]
    fn test_file_backend_defaults_location() {
        let location = resolve_cache_location(CacheBackend::File, "", Path::new(ROOT));
        assert_eq!(location, CacheLocation::Path(PathBuf::from("/srv/sivart/sivart_cache")));
    }

    #[test]
    fn test_file_backend_custom_location_is_install_relative() {
        let location = resolve_cache_location(CacheBackend::File, "custom", Path::new(ROOT));
        assert_eq!(location, CacheLocation::Path(PathBuf::from("/srv/sivart/custom")));
    }

    #[test]
    fn test_other_backends_pass_location_through() {
        let location = resolve_cache_location(CacheBackend::Localmem, "", Path::new(ROOT));
        assert_eq!(location, CacheLocation::Opaque(String::new()));

        let location =
            resolve_cache_location(CacheBackend::Memcached, "127.0.0.1:11211", Path::new(ROOT));
        assert_eq!(location.to_string(), "127.0.0.1:11211");
    }
}
