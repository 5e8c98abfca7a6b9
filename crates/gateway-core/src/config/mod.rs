//! Configuration for gateway-core
//!
//! Values come from built-in defaults, an optional config file and the
//! process environment (after `.env` is loaded), later sources winning.
//! Nothing here is validated at load time: a missing secret only fails the
//! request that needs it.

use std::path::Path;

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::types::{SubChannel, DEFAULT_IDENTITY};
use crate::{Error, Result};

/// Longest credential lifetime the telephony platform accepts
pub const MAX_TOKEN_TTL_SECONDS: u64 = 24 * 60 * 60;

const PRODUCTION_PUSH_KEY: &str = "PUSH_CREDENTIAL_SID_PRODUCTION";
// Misspelled production key still found in older deployments
const LEGACY_PRODUCTION_PUSH_KEY: &str = "PUSH_CREDENTIAL_SID_PRODCUT";

/// Environment variables read by [`GatewayConfig::load`]
pub const ENV_KEYS: &[&str] = &[
    "ACCOUNT_SID",
    "API_KEY",
    "API_KEY_SECRET",
    "APP_SID",
    "PUSH_CREDENTIAL_SID_ANDROID",
    "PUSH_CREDENTIAL_SID_SANDBOX",
    "PUSH_CREDENTIAL_SID_PRODUCTION",
    "PUSH_CREDENTIAL_SID_PRODCUT",
    "CALLER_NUMBER",
    "RECORDING_STATUS_CALLBACK",
    "DEFAULT_IDENTITY",
    "TOKEN_TTL_SECONDS",
    "BIND_ADDRESS",
];

/// Main configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub account_sid: Option<String>,
    pub api_key: Option<String>,
    pub api_key_secret: Option<String>,
    /// Outgoing application placed in voice grants
    pub app_sid: Option<String>,
    pub push_credential_sid_android: Option<String>,
    pub push_credential_sid_sandbox: Option<String>,
    pub push_credential_sid_production: Option<String>,
    /// Caller id presented when dialing a phone number
    pub caller_number: Option<String>,
    pub recording_status_callback: Option<String>,
    pub default_identity: String,
    pub token_ttl_seconds: u64,
    pub bind_address: String,
}

/// Account credentials handed to a [`crate::Signer`]
#[derive(Debug, Clone, Copy)]
pub struct SigningAccount<'a> {
    pub account_sid: &'a str,
    pub api_key: &'a str,
    pub api_key_secret: &'a str,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            account_sid: None,
            api_key: None,
            api_key_secret: None,
            app_sid: None,
            push_credential_sid_android: None,
            push_credential_sid_sandbox: None,
            push_credential_sid_production: None,
            caller_number: None,
            recording_status_callback: None,
            default_identity: DEFAULT_IDENTITY.to_string(),
            token_ttl_seconds: 3600,
            bind_address: "0.0.0.0:3000".to_string(),
        }
    }
}

impl GatewayConfig {
    /// Load configuration from `.env` and the process environment
    pub fn from_env() -> Result<Self> {
        Self::load(None)
    }

    /// Load configuration from an optional file, `.env` and the process environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        load_dotenv();
        Self::load_from(path, std::env::vars())
    }

    /// Load configuration from an optional file and an explicit set of variables
    pub fn load_from<I>(path: Option<&Path>, vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut vars: config::Map<String, String> = vars
            .into_iter()
            .filter(|(key, _)| ENV_KEYS.contains(&key.as_str()))
            .collect();
        // Within one source the correct spelling wins over the legacy one.
        if let Some(legacy) = vars.remove(LEGACY_PRODUCTION_PUSH_KEY) {
            vars.entry(PRODUCTION_PUSH_KEY.to_string()).or_insert(legacy);
        }

        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }
        let config = builder
            .add_source(Environment::default().source(Some(vars)))
            .build()?;

        let legacy_production = config
            .get_string(&LEGACY_PRODUCTION_PUSH_KEY.to_lowercase())
            .ok();
        let mut config: Self = config.try_deserialize()?;
        if config.push_credential_sid_production.is_none() {
            config.push_credential_sid_production = legacy_production;
        }

        if config.token_ttl_seconds == 0 || config.token_ttl_seconds > MAX_TOKEN_TTL_SECONDS {
            return Err(Error::Config(format!(
                "token_ttl_seconds must be between 1 and {}, got {}",
                MAX_TOKEN_TTL_SECONDS, config.token_ttl_seconds
            )));
        }
        Ok(config)
    }

    pub fn signing_account(&self) -> Result<SigningAccount<'_>> {
        Ok(SigningAccount {
            account_sid: require(&self.account_sid, "ACCOUNT_SID")?,
            api_key: require(&self.api_key, "API_KEY")?,
            api_key_secret: require(&self.api_key_secret, "API_KEY_SECRET")?,
        })
    }

    pub fn push_credential_sid(&self, sub_channel: SubChannel) -> Option<&str> {
        let sid = match sub_channel {
            SubChannel::Android => &self.push_credential_sid_android,
            SubChannel::Sandbox => &self.push_credential_sid_sandbox,
            SubChannel::Production => &self.push_credential_sid_production,
        };
        present(sid)
    }

    pub fn app_sid(&self) -> Option<&str> {
        present(&self.app_sid)
    }

    pub fn caller_number(&self) -> Result<&str> {
        require(&self.caller_number, "CALLER_NUMBER")
    }

    pub fn recording_status_callback(&self) -> Result<&str> {
        require(&self.recording_status_callback, "RECORDING_STATUS_CALLBACK")
    }
}

/// Load `.env` into the process environment
///
/// Variables already set are left alone. A missing file is not an error.
pub fn load_dotenv() {
    report_dotenv(dotenvy::dotenv().map(|_| ()));
}

/// Load a specific env file into the process environment
pub fn load_dotenv_from(path: &Path) {
    report_dotenv(dotenvy::from_path(path));
}

fn report_dotenv(result: std::result::Result<(), dotenvy::Error>) {
    if let Err(e) = result {
        if !e.not_found() {
            tracing::warn!("Ignoring unreadable .env file: {}", e);
        }
    }
}

// Empty values count as unset.
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn require<'a>(value: &'a Option<String>, key: &'static str) -> Result<&'a str> {
    present(value).ok_or(Error::ConfigurationMissing(key))
}
