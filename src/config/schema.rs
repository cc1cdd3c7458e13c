//! The fixed settings schema and validation of raw TOML against it.

use std::collections::BTreeMap;
use std::path::PathBuf;

use toml::{Table, Value};

use super::value::{ConfigValue, ValidatedConfig};
use super::ConfigError;

pub const GENERAL: &str = "general";
pub const DATABASE: &str = "database";
pub const CACHE: &str = "cache";

/// Primitive type a setting is coerced to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Boolean,
    Integer,
    StringList,
}

impl FieldKind {
    fn expected(self) -> &'static str {
        match self {
            FieldKind::String => "a string",
            FieldKind::Boolean => "a boolean",
            FieldKind::Integer => "an integer",
            FieldKind::StringList => "a list of strings",
        }
    }
}

/// Default for a setting absent from the file.
#[derive(Debug, Clone, Copy)]
pub enum FieldDefault {
    /// No default; absence is a validation failure.
    Required,
    /// No default, but absence is tolerated and the key is left out of the snapshot.
    Optional,
    String(&'static str),
    Boolean(bool),
    Integer(i64),
    EmptyList,
}

impl FieldDefault {
    fn value(self) -> Option<ConfigValue> {
        match self {
            FieldDefault::Required | FieldDefault::Optional => None,
            FieldDefault::String(s) => Some(ConfigValue::String(s.to_string())),
            FieldDefault::Boolean(b) => Some(ConfigValue::Boolean(b)),
            FieldDefault::Integer(i) => Some(ConfigValue::Integer(i)),
            FieldDefault::EmptyList => Some(ConfigValue::StringList(Vec::new())),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub section: &'static str,
    pub key: &'static str,
    pub kind: FieldKind,
    pub default: FieldDefault,
}

const fn field(
    section: &'static str,
    key: &'static str,
    kind: FieldKind,
    default: FieldDefault,
) -> FieldSpec {
    FieldSpec {
        section,
        key,
        kind,
        default,
    }
}

/// Every setting the materializer consumes.
///
/// `secret_key` is optional here: whether its absence is fatal depends on
/// testing mode, which is decided during materialization.
pub static SCHEMA: &[FieldSpec] = &[
    field(GENERAL, "secret_key", FieldKind::String, FieldDefault::Optional),
    field(GENERAL, "admin_names", FieldKind::StringList, FieldDefault::EmptyList),
    field(GENERAL, "admin_emails", FieldKind::StringList, FieldDefault::EmptyList),
    field(GENERAL, "allowed_hosts", FieldKind::StringList, FieldDefault::EmptyList),
    field(GENERAL, "debug", FieldKind::Boolean, FieldDefault::Boolean(false)),
    field(GENERAL, "static_root", FieldKind::String, FieldDefault::String("static")),
    field(GENERAL, "server_email", FieldKind::String, FieldDefault::String("root@localhost")),
    field(GENERAL, "site_name", FieldKind::String, FieldDefault::String("Sivart")),
    field(
        GENERAL,
        "source_link",
        FieldKind::String,
        FieldDefault::String("https://github.com/moggers87/sivart"),
    ),
    field(GENERAL, "language_code", FieldKind::String, FieldDefault::String("en-gb")),
    field(GENERAL, "time_zone", FieldKind::String, FieldDefault::String("UTC")),
    field(DATABASE, "engine", FieldKind::String, FieldDefault::String("sqlite")),
    field(DATABASE, "user", FieldKind::String, FieldDefault::String("")),
    field(DATABASE, "password", FieldKind::String, FieldDefault::String("")),
    field(DATABASE, "host", FieldKind::String, FieldDefault::String("")),
    field(DATABASE, "port", FieldKind::String, FieldDefault::String("")),
    field(DATABASE, "name", FieldKind::String, FieldDefault::String("db.sqlite3")),
    field(CACHE, "backend", FieldKind::String, FieldDefault::String("file")),
    field(CACHE, "timeout", FieldKind::Integer, FieldDefault::Integer(300)),
    field(CACHE, "location", FieldKind::String, FieldDefault::String("")),
];

/// Applies [`SCHEMA`] to a parsed file. Unknown sections and keys are ignored.
pub fn validate(table: &Table, source: Option<PathBuf>) -> Result<ValidatedConfig, ConfigError> {
    validate_with(SCHEMA, table, source)
}

pub(crate) fn validate_with(
    schema: &[FieldSpec],
    table: &Table,
    source: Option<PathBuf>,
) -> Result<ValidatedConfig, ConfigError> {
    let mut values = BTreeMap::new();

    for spec in schema {
        let raw = table
            .get(spec.section)
            .and_then(Value::as_table)
            .and_then(|section| section.get(spec.key));

        let value = match raw {
            Some(raw) => coerce(spec, raw)?,
            None => match spec.default {
                FieldDefault::Required => {
                    return Err(ConfigError::MissingKey {
                        section: spec.section,
                        key: spec.key,
                    })
                }
                default => match default.value() {
                    Some(value) => value,
                    None => continue,
                },
            },
        };

        values.insert((spec.section, spec.key), value);
    }

    Ok(ValidatedConfig::new(values, source))
}

fn coerce(spec: &FieldSpec, raw: &Value) -> Result<ConfigValue, ConfigError> {
    let coerced = match spec.kind {
        FieldKind::String => scalar_to_string(raw).map(ConfigValue::String),
        FieldKind::Boolean => coerce_bool(raw).map(ConfigValue::Boolean),
        FieldKind::Integer => coerce_int(raw).map(ConfigValue::Integer),
        FieldKind::StringList => coerce_list(raw).map(ConfigValue::StringList),
    };

    coerced.ok_or_else(|| ConfigError::TypeMismatch {
        section: spec.section,
        key: spec.key,
        expected: spec.kind.expected(),
        found: describe(raw),
    })
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Integer(i) => Some(i.to_string()),
        Value::Float(f) => Some(f.to_string()),
        Value::Boolean(b) => Some(b.to_string()),
        Value::Datetime(_) | Value::Array(_) | Value::Table(_) => None,
    }
}

fn coerce_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Boolean(b) => Some(*b),
        Value::Integer(0) => Some(false),
        Value::Integer(1) => Some(true),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Some(true),
            "false" | "no" | "off" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn coerce_int(value: &Value) -> Option<i64> {
    match value {
        Value::Integer(i) => Some(*i),
        Value::String(s) if looks_like_integer(s.trim()) => s.trim().parse().ok(),
        _ => None,
    }
}

fn coerce_list(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::Array(items) => items.iter().map(scalar_to_string).collect(),
        // a trailing comma marks a one-item list, so blank items are dropped
        Value::String(s) => Some(
            s.split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(str::to_string)
                .collect(),
        ),
        _ => None,
    }
}

fn looks_like_integer(s: &str) -> bool {
    let s = s.strip_prefix('-').unwrap_or(s);
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

fn describe(value: &Value) -> String {
    match value {
        Value::String(s) => format!("\"{s}\""),
        Value::Array(_) => "an array".to_string(),
        Value::Table(_) => "a table".to_string(),
        other => other.to_string(),
    }
}
