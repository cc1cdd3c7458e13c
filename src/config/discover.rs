//! Settings file discovery and permission diagnostics.
//!
//! Search order: `SIVART_CONFIG` → `~/.config/sivart/settings.toml` →
//! `<install root>/settings.toml`. The first existing file wins.

use std::fmt;
use std::path::{Path, PathBuf};

use super::runtime::RuntimeEnv;

/// Where the selected settings came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigOrigin {
    /// Path named by the override environment variable.
    Override,
    /// The user's config directory.
    User,
    /// Next to the installation.
    Install,
    /// No file; testing mode with schema defaults only.
    Defaults,
}

impl fmt::Display for ConfigOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigOrigin::Override => write!(f, "environment override"),
            ConfigOrigin::User => write!(f, "user config"),
            ConfigOrigin::Install => write!(f, "install config"),
            ConfigOrigin::Defaults => write!(f, "builtin defaults"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub origin: ConfigOrigin,
    pub path: PathBuf,
}

/// Non-fatal findings reported alongside a successful resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    /// Other users have some access to the settings file.
    InsecurePermissions { path: PathBuf, mode: u32 },
    /// The file's metadata could not be read.
    Unreadable { path: PathBuf, reason: String },
    /// Testing mode is on and no file was found.
    NoSource,
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigWarning::InsecurePermissions { path, mode } => write!(
                f,
                "other users could be able to interact with your settings file ({:o}), \
                 please check file permissions on {}",
                mode,
                path.display()
            ),
            ConfigWarning::Unreadable { path, reason } => {
                write!(f, "couldn't inspect {}: {}", path.display(), reason)
            }
            ConfigWarning::NoSource => write!(f, "no settings file found, using defaults"),
        }
    }
}

/// All candidate locations in priority order, whether or not they exist.
pub fn candidates(env: &RuntimeEnv) -> Vec<Candidate> {
    let mut out = Vec::with_capacity(3);

    if let Some(path) = &env.config_override {
        out.push(Candidate {
            origin: ConfigOrigin::Override,
            path: path.clone(),
        });
    }
    if let Some(path) = env.user_config_path() {
        out.push(Candidate {
            origin: ConfigOrigin::User,
            path,
        });
    }
    out.push(Candidate {
        origin: ConfigOrigin::Install,
        path: env.install_config_path(),
    });

    out
}

/// The first candidate that exists on disk.
pub fn select(env: &RuntimeEnv) -> Option<Candidate> {
    candidates(env).into_iter().find(|c| c.path.exists())
}

/// Reports a warning if the file is accessible to users outside its owner and group.
#[cfg(unix)]
pub fn check_permissions(path: &Path) -> Option<ConfigWarning> {
    use std::os::unix::fs::PermissionsExt;

    match std::fs::metadata(path) {
        Ok(metadata) => {
            let mode = metadata.permissions().mode() & 0o777;
            (mode & 0o007 != 0).then(|| ConfigWarning::InsecurePermissions {
                path: path.to_path_buf(),
                mode,
            })
        }
        Err(e) => Some(ConfigWarning::Unreadable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        }),
    }
}

#[cfg(not(unix))]
pub fn check_permissions(_path: &Path) -> Option<ConfigWarning> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    #[test]
    fn test_origin_display() {
        assert_eq!(ConfigOrigin::Override.to_string(), "environment override");
        assert_eq!(ConfigOrigin::Defaults.to_string(), "builtin defaults");
    }

    #[test]
    fn test_candidate_order() {
        let env = RuntimeEnv::new("/opt/sivart")
            .with_home("/home/me")
            .with_override("/etc/sivart.toml");
        let origins: Vec<_> = candidates(&env).into_iter().map(|c| c.origin).collect();
        assert_eq!(
            origins,
            [ConfigOrigin::Override, ConfigOrigin::User, ConfigOrigin::Install]
        );
    }

    #[test]
    fn test_missing_override_falls_through() {
        let dir = TempDir::new().unwrap();
        let install = dir.path().join("install");
        touch(&install.join("settings.toml"));

        let env = RuntimeEnv::new(&install).with_override(dir.path().join("nope.toml"));
        let selected = select(&env).unwrap();
        assert_eq!(selected.origin, ConfigOrigin::Install);
    }

    #[test]
    fn test_nothing_selected_when_nothing_exists() {
        let dir = TempDir::new().unwrap();
        let env = RuntimeEnv::new(dir.path()).with_home(dir.path().join("home"));
        assert!(select(&env).is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_permission_warning() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.toml");
        touch(&path);

        fs::set_permissions(&path, fs::Permissions::from_mode(0o600)).unwrap();
        assert_eq!(check_permissions(&path), None);

        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();
        assert_eq!(
            check_permissions(&path),
            Some(ConfigWarning::InsecurePermissions {
                path: path.clone(),
                mode: 0o644
            })
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_metadata_warns() {
        let warning = check_permissions(Path::new("/nonexistent/settings.toml"));
        assert!(matches!(warning, Some(ConfigWarning::Unreadable { .. })));
    }
}
