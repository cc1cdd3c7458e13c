//! The validated, typed configuration snapshot.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::ConfigError;

/// A schema-typed configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValue {
    String(String),
    Boolean(bool),
    Integer(i64),
    StringList(Vec<String>),
}

impl ConfigValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            ConfigValue::String(_) => "a string",
            ConfigValue::Boolean(_) => "a boolean",
            ConfigValue::Integer(_) => "an integer",
            ConfigValue::StringList(_) => "a list of strings",
        }
    }
}

/// Immutable mapping from `(section, key)` to a typed value.
///
/// Produced once by validation. Accessors hand out borrows, so there is no way
/// to change a value after the snapshot exists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidatedConfig {
    values: BTreeMap<(&'static str, &'static str), ConfigValue>,
    source: Option<PathBuf>,
}

impl ValidatedConfig {
    pub(crate) fn new(
        values: BTreeMap<(&'static str, &'static str), ConfigValue>,
        source: Option<PathBuf>,
    ) -> Self {
        Self { values, source }
    }

    /// The file this snapshot was read from, `None` for a defaults-only snapshot.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn get(&self, section: &'static str, key: &'static str) -> Option<&ConfigValue> {
        self.values.get(&(section, key))
    }

    pub fn contains(&self, section: &'static str, key: &'static str) -> bool {
        self.values.contains_key(&(section, key))
    }

    pub fn str(&self, section: &'static str, key: &'static str) -> Result<&str, ConfigError> {
        match self.require(section, key)? {
            ConfigValue::String(s) => Ok(s),
            other => Err(mismatch(section, key, "a string", other)),
        }
    }

    /// Like [`str`](Self::str) but treats an absent key as `None`.
    pub fn opt_str(
        &self,
        section: &'static str,
        key: &'static str,
    ) -> Result<Option<&str>, ConfigError> {
        if !self.contains(section, key) {
            return Ok(None);
        }
        self.str(section, key).map(Some)
    }

    pub fn bool(&self, section: &'static str, key: &'static str) -> Result<bool, ConfigError> {
        match self.require(section, key)? {
            ConfigValue::Boolean(b) => Ok(*b),
            other => Err(mismatch(section, key, "a boolean", other)),
        }
    }

    pub fn int(&self, section: &'static str, key: &'static str) -> Result<i64, ConfigError> {
        match self.require(section, key)? {
            ConfigValue::Integer(i) => Ok(*i),
            other => Err(mismatch(section, key, "an integer", other)),
        }
    }

    pub fn list(&self, section: &'static str, key: &'static str) -> Result<&[String], ConfigError> {
        match self.require(section, key)? {
            ConfigValue::StringList(items) => Ok(items),
            other => Err(mismatch(section, key, "a list of strings", other)),
        }
    }

    fn require(
        &self,
        section: &'static str,
        key: &'static str,
    ) -> Result<&ConfigValue, ConfigError> {
        self.values
            .get(&(section, key))
            .ok_or(ConfigError::MissingKey { section, key })
    }

    #[cfg(test)]
    pub(crate) fn from_pairs(pairs: Vec<((&'static str, &'static str), ConfigValue)>) -> Self {
        Self::new(pairs.into_iter().collect(), None)
    }
}

fn mismatch(
    section: &'static str,
    key: &'static str,
    expected: &'static str,
    found: &ConfigValue,
) -> ConfigError {
    ConfigError::TypeMismatch {
        section,
        key,
        expected,
        found: found.type_name().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_accessors() {
        let config = ValidatedConfig::from_pairs(vec![
            (("general", "site_name"), ConfigValue::String("Sivart".into())),
            (("general", "debug"), ConfigValue::Boolean(true)),
            (("cache", "timeout"), ConfigValue::Integer(60)),
            (
                ("general", "allowed_hosts"),
                ConfigValue::StringList(vec!["example.com".into()]),
            ),
        ]);

        assert_eq!(config.str("general", "site_name").unwrap(), "Sivart");
        assert!(config.bool("general", "debug").unwrap());
        assert_eq!(config.int("cache", "timeout").unwrap(), 60);
        assert_eq!(config.list("general", "allowed_hosts").unwrap(), ["example.com"]);
    }

    #[test]
    fn test_missing_key_is_named() {
        let config = ValidatedConfig::default();
        let err = config.str("database", "name").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingKey {
                section: "database",
                key: "name"
            }
        ));
        assert_eq!(config.opt_str("general", "secret_key").unwrap(), None);
    }

    #[test]
    fn test_wrong_accessor_is_type_mismatch() {
        let config =
            ValidatedConfig::from_pairs(vec![(("general", "debug"), ConfigValue::Boolean(false))]);
        assert!(matches!(
            config.str("general", "debug"),
            Err(ConfigError::TypeMismatch { key: "debug", .. })
        ));
    }
}
