//! Application context holding the process-wide, read-only state.

use serde::Serialize;

use crate::config::{ConfigResolver, RuntimeEnv};
use crate::settings::{GeneralSettings, Settings};
use crate::{build_id, Error};

/// Settings and build identifier shared by every request.
///
/// Built once at startup and never mutated, so it can be shared across threads
/// by reference or behind an `Arc`.
///
/// ## Example
///
/// ```no_run
/// use sivart::AppContext;
///
/// let ctx = AppContext::from_env()?;
/// println!("{}", ctx.reduced_settings().site_name);
/// # Ok::<(), sivart::Error>(())
/// ```
#[derive(Debug)]
pub struct AppContext {
    settings: Settings,
    build_id: String,
}

impl AppContext {
    /// Creates a new builder for constructing an `AppContext`.
    pub fn builder() -> AppContextBuilder {
        AppContextBuilder::default()
    }

    /// Resolves, validates and materializes settings from the process environment.
    pub fn from_env() -> Result<Self, Error> {
        let env = RuntimeEnv::from_process()?;
        let resolution = ConfigResolver::new(env.clone()).resolve()?;
        tracing::info!(
            origin = %resolution.origin,
            warnings = resolution.warnings.len(),
            "settings resolved"
        );

        let settings = Settings::materialize(&resolution.config, &env)?;
        Self::builder()
            .with_settings(settings)
            .with_build_id(build_id::detect(env.commit_id.as_deref(), &env.install_root))
            .build()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn build_id(&self) -> &str {
        &self.build_id
    }

    /// The template-safe view of the settings.
    pub fn reduced_settings(&self) -> ReducedSettings {
        ReducedSettings::new(&self.settings.general, &self.build_id)
    }
}

/// Builder for constructing an [`AppContext`].
#[derive(Debug, Default)]
#[must_use = "builders do nothing until .build() is called"]
pub struct AppContextBuilder {
    settings: Option<Settings>,
    build_id: Option<String>,
}

impl AppContextBuilder {
    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = Some(settings);
        self
    }

    pub fn with_build_id(mut self, build_id: impl Into<String>) -> Self {
        self.build_id = Some(build_id.into());
        self
    }

    /// Builds the `AppContext`.
    ///
    /// Returns an error if no settings were provided. A missing build id
    /// becomes [`build_id::UNKNOWN`].
    pub fn build(self) -> Result<AppContext, Error> {
        Ok(AppContext {
            settings: self.settings.ok_or(Error::MissingSettings)?,
            build_id: self
                .build_id
                .unwrap_or_else(|| build_id::UNKNOWN.to_string()),
        })
    }
}

/// The only settings templates ever see.
///
/// This is an allowlist: fields added to [`GeneralSettings`] do not show up
/// here unless they are added explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReducedSettings {
    #[serde(rename = "SITE_NAME")]
    pub site_name: String,
    #[serde(rename = "SIVART_COMMIT_ID")]
    pub build_id: String,
    #[serde(rename = "SOURCE_LINK")]
    pub source_link: String,
}

impl ReducedSettings {
    pub fn new(general: &GeneralSettings, build_id: &str) -> Self {
        Self {
            site_name: general.site_name.clone(),
            build_id: build_id.to_string(),
            source_link: general.source_link.clone(),
        }
    }
}
