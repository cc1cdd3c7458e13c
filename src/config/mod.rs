//! Settings discovery, loading and validation.

mod builder;
mod discover;
mod error;
mod file;
mod runtime;
pub mod schema;
mod value;

pub use builder::{ConfigResolver, Resolution};
pub use discover::{ConfigOrigin, ConfigWarning};
pub use error::ConfigError;
pub use runtime::{
    RuntimeEnv, CONFIG_FILENAME, ENV_BASE_DIR, ENV_COMMIT_ID, ENV_CONFIG_PATH, ENV_TESTING,
};
pub use value::{ConfigValue, ValidatedConfig};
