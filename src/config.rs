//! Settings for the `parcelctl` binary.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use crate::api::{ClientConfig, DEFAULT_TIMEOUT, SANDBOX_BASE_URL};
use crate::oauth::ClientCredentials;

/// Where the settings file is looked for unless `PARCEL_CONFIG` says otherwise.
pub const DEFAULT_CONFIG_PATH: &str = "config/parcelctl.toml";

/// Top-level settings.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub api: ApiSettings,
    pub credentials: CredentialSettings,
    pub label: LabelSettings,
}

/// How to reach the shipping API.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiSettings {
    pub base_url: Url,
    pub timeout_secs: u64,
    pub user_agent: String,
}

#[derive(Clone, Deserialize)]
pub struct CredentialSettings {
    pub client_id: String,
    pub client_secret: String,
}

/// Where the downloaded label ends up.
#[derive(Debug, Clone, Deserialize)]
pub struct LabelSettings {
    pub path: PathBuf,
}

impl Settings {
    /// Loads settings from defaults, an optional file and the environment.
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (`PARCEL_API__BASE_URL`, `PARCEL_CREDENTIALS__CLIENT_ID`, etc.)
    /// 2. The TOML file at `$PARCEL_CONFIG`, or `config/parcelctl.toml`
    /// 3. Built-in defaults
    ///
    /// Environment values are kept as strings, so credentials like `007` arrive untouched.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("PARCEL_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));

        Self::builder()?
            .add_source(File::from(path).required(false))
            .add_source(
                Environment::with_prefix("PARCEL")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
    }

    /// Loads settings from a TOML string on top of the defaults.
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Self::builder()?
            .add_source(File::from_str(contents, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            .set_default("api.base_url", SANDBOX_BASE_URL)?
            .set_default("api.timeout_secs", DEFAULT_TIMEOUT.as_secs())?
            .set_default("api.user_agent", ClientConfig::default().user_agent)?
            .set_default("credentials.client_id", "")?
            .set_default("credentials.client_secret", "")?
            .set_default("label.path", "label.pdf")
    }
}

impl ApiSettings {
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(self.base_url.clone())
            .with_timeout(Duration::from_secs(self.timeout_secs))
            .with_user_agent(self.user_agent.clone())
    }
}

impl CredentialSettings {
    pub fn client_credentials(&self) -> ClientCredentials {
        ClientCredentials::new(self.client_id.clone(), self.client_secret.clone())
    }
}

// Same as `ClientCredentials`: never print the secret.
impl std::fmt::Debug for CredentialSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialSettings")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}
