pub mod build_id;
pub mod config;
pub mod context;
mod error;
pub mod settings;
pub mod telemetry;
pub mod travis;
pub mod views;

pub use config::{ConfigError, ConfigResolver};
pub use context::AppContext;
pub use error::Error;
pub use settings::Settings;
