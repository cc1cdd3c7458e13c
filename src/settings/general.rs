use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::schema::GENERAL;
use crate::config::{ConfigError, ValidatedConfig};

/// A site administrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Admin {
    pub name: String,
    pub email: String,
}

/// Pairs names with emails by position. Lists of different lengths are rejected.
pub fn zip_admins(names: &[String], emails: &[String]) -> Result<Vec<Admin>, ConfigError> {
    if names.len() != emails.len() {
        return Err(ConfigError::AdminCountMismatch {
            names: names.len(),
            emails: emails.len(),
        });
    }

    Ok(names
        .iter()
        .zip(emails)
        .map(|(name, email)| Admin {
            name: name.clone(),
            email: email.clone(),
        })
        .collect())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneralSettings {
    pub admins: Vec<Admin>,
    pub allowed_hosts: Vec<String>,
    /// Never enable in production.
    pub debug: bool,
    pub static_root: PathBuf,
    pub server_email: String,
    pub site_name: String,
    pub source_link: String,
    pub language_code: String,
    pub time_zone: String,
}

impl GeneralSettings {
    pub fn from_config(config: &ValidatedConfig, install_root: &Path) -> Result<Self, ConfigError> {
        let admins = zip_admins(
            config.list(GENERAL, "admin_names")?,
            config.list(GENERAL, "admin_emails")?,
        )?;

        Ok(Self {
            admins,
            allowed_hosts: config.list(GENERAL, "allowed_hosts")?.to_vec(),
            debug: config.bool(GENERAL, "debug")?,
            static_root: install_root.join(config.str(GENERAL, "static_root")?),
            server_email: config.str(GENERAL, "server_email")?.to_string(),
            site_name: config.str(GENERAL, "site_name")?.to_string(),
            source_link: config.str(GENERAL, "source_link")?.to_string(),
            language_code: config.str(GENERAL, "language_code")?.to_string(),
            time_zone: config.str(GENERAL, "time_zone")?.to_string(),
        })
    }
}

/// Secrets and cookie hardening.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct SecuritySettings {
    #[serde(skip)]
    pub secret_key: Option<String>,
    pub csrf_cookie_secure: bool,
    pub session_cookie_secure: bool,
}

impl SecuritySettings {
    /// Reads the secret key and derives the cookie flags from `debug`.
    ///
    /// A missing secret key is fatal unless `testing` is set, in which case it
    /// only logs a warning.
    pub fn from_config(config: &ValidatedConfig, testing: bool) -> Result<Self, ConfigError> {
        let secret_key = match config.opt_str(GENERAL, "secret_key")? {
            Some(key) => Some(key.to_string()),
            None if testing => {
                tracing::warn!("you haven't set 'general.secret_key' in your settings file");
                None
            }
            None => return Err(ConfigError::MissingSecretKey),
        };

        // secure cookies get in the way while debugging
        let secure = !config.bool(GENERAL, "debug")?;

        Ok(Self {
            secret_key,
            csrf_cookie_secure: secure,
            session_cookie_secure: secure,
        })
    }
}

impl fmt::Debug for SecuritySettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecuritySettings")
            .field("secret_key", &self.secret_key.as_ref().map(|_| "<redacted>"))
            .field("csrf_cookie_secure", &self.csrf_cookie_secure)
            .field("session_cookie_secure", &self.session_cookie_secure)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigValue;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_admins_zip_positionally() {
        let admins = zip_admins(&strings(&["A", "B"]), &strings(&["a@x", "b@x"])).unwrap();
        assert_eq!(
            admins,
            [
                Admin {
                    name: "A".into(),
                    email: "a@x".into()
                },
                Admin {
                    name: "B".into(),
                    email: "b@x".into()
                },
            ]
        );
    }

    #[test]
    fn test_admin_length_mismatch_is_error() {
        let result = zip_admins(&strings(&["A"]), &strings(&["a@x", "b@x"]));
        assert!(matches!(
            result,
            Err(ConfigError::AdminCountMismatch { names: 1, emails: 2 })
        ));
    }

    #[test]
    fn test_trailing_comma_gives_single_admin() {
        let table: toml::Table =
            toml::from_str("[general]\nadmin_names = \"Matt,\"\nadmin_emails = \"m@x,\"").unwrap();
        let config = crate::config::schema::validate(&table, None).unwrap();

        let general = GeneralSettings::from_config(&config, Path::new("/srv/sivart")).unwrap();
        assert_eq!(
            general.admins,
            [Admin {
                name: "Matt".into(),
                email: "m@x".into()
            }]
        );
    }

    #[test]
    fn test_secret_key_required_outside_testing() {
        let config =
            ValidatedConfig::from_pairs(vec![((GENERAL, "debug"), ConfigValue::Boolean(false))]);
        assert!(matches!(
            SecuritySettings::from_config(&config, false),
            Err(ConfigError::MissingSecretKey)
        ));

        let security = SecuritySettings::from_config(&config, true).unwrap();
        assert_eq!(security.secret_key, None);
    }

    #[test]
    fn test_cookie_flags_follow_debug() {
        let config = ValidatedConfig::from_pairs(vec![
            ((GENERAL, "secret_key"), ConfigValue::String("s3cret".into())),
            ((GENERAL, "debug"), ConfigValue::Boolean(true)),
        ]);
        let security = SecuritySettings::from_config(&config, false).unwrap();
        assert!(!security.csrf_cookie_secure);
        assert!(!security.session_cookie_secure);
        assert!(!format!("{security:?}").contains("s3cret"));
    }
}
