//! Configuration for the cvcue inventory tool.
//!
//! Layered TOML + `CVCUE_*` environment loading, key-secret resolution
//! (env var, plaintext, keyring), and translation to
//! `cvcue_api::ClientConfig`. The binary adds its flag overrides on top
//! through [`Overrides`].

use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use cvcue_api::{ApiKeyCredentials, ClientConfig, TlsMode, TransportConfig};

/// Keyring service name for stored key secrets.
const KEYRING_SERVICE: &str = "cvcue";

/// Prefix shared by every environment setting.
const ENV_PREFIX: &str = "CVCUE_";

/// Read verbatim during credential resolution; figment would parse an
/// all-digit secret into a number.
const KEY_VALUE_ENV: &str = "CVCUE_KEY_VALUE";

/// String-typed settings kept out of figment's `Env` provider, which would
/// turn `CVCUE_KEY_ID=123456` into an integer. See [`VerbatimEnv`].
const VERBATIM_ENV_KEYS: [&str; 5] = [
    "api_url",
    "key_id",
    "key_value_env",
    "client_identifier",
    "ca_cert",
];

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("missing required setting '{field}'")]
    Missing { field: &'static str },

    #[error("no key secret configured for key '{key_id}'")]
    NoCredentials { key_id: String },

    #[error("config file not found: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config struct ──────────────────────────────────────────────

/// Settings as read from `config.toml` and the environment.
///
/// ```toml
/// api_url = "https://awm13004-c4.srv.wifi.arista.com/wifi/api/"
/// key_id = "KEY-ATN123456-1234"
/// key_value_env = "CUE_KEY"
/// page_size = 100
/// ```
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// API base URL (CV-CUE > SYSTEM > Advanced Settings > Base URLs for APIs).
    pub api_url: Option<String>,

    /// API key identifier from the LaunchPad admin settings.
    pub key_id: Option<String>,

    /// Key secret (plaintext -- prefer `key_value_env` or the keyring).
    pub key_value: Option<String>,

    /// Name of an environment variable holding the key secret.
    pub key_value_env: Option<String>,

    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Server-side session lifetime, seconds.
    #[serde(default = "default_session_timeout")]
    pub session_timeout: u32,

    /// Per-request HTTP timeout, seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,

    #[serde(default = "default_client_identifier")]
    pub client_identifier: String,

    /// Accept self-signed certificates.
    #[serde(default)]
    pub insecure: bool,

    /// Path to an extra CA certificate (PEM).
    pub ca_cert: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: None,
            key_id: None,
            key_value: None,
            key_value_env: None,
            page_size: default_page_size(),
            session_timeout: default_session_timeout(),
            request_timeout: default_request_timeout(),
            client_identifier: default_client_identifier(),
            insecure: false,
            ca_cert: None,
        }
    }
}

fn default_page_size() -> u32 {
    cvcue_api::DEFAULT_PAGE_SIZE.get()
}
fn default_session_timeout() -> u32 {
    cvcue_api::DEFAULT_SESSION_TIMEOUT
}
fn default_request_timeout() -> u64 {
    30
}
fn default_client_identifier() -> String {
    cvcue_api::DEFAULT_CLIENT_IDENTIFIER.into()
}

/// Highest-precedence layer, typically filled from command-line flags.
/// `None` leaves the lower layers untouched.
#[derive(Debug, Default, Serialize)]
pub struct Overrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insecure: Option<bool>,
}

/// String settings read from `CVCUE_*` exactly as written.
#[derive(Debug, Default, Serialize)]
struct VerbatimEnv {
    #[serde(skip_serializing_if = "Option::is_none")]
    api_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    key_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    key_value_env: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    client_identifier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ca_cert: Option<PathBuf>,
}

impl VerbatimEnv {
    fn from_env() -> Self {
        let var = |key: &str| {
            std::env::var(format!("{ENV_PREFIX}{}", key.to_ascii_uppercase())).ok()
        };
        Self {
            api_url: var("api_url"),
            key_id: var("key_id"),
            key_value_env: var("key_value_env"),
            client_identifier: var("client_identifier"),
            ca_cert: var("ca_cert").map(PathBuf::from),
        }
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "cvcue", "cvcue").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("cvcue");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the layered config: defaults < TOML file < `CVCUE_*` env < overrides.
///
/// With `path == None` the platform config file is used if it exists.
/// An explicit path that does not exist is an error.
pub fn load_config(path: Option<&Path>, overrides: &Overrides) -> Result<Config, ConfigError> {
    let file = match path {
        Some(p) if !p.exists() => {
            return Err(ConfigError::NotFound {
                path: p.to_path_buf(),
            });
        }
        Some(p) => p.to_path_buf(),
        None => config_path(),
    };

    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(&file))
        .merge(
            Env::prefixed(ENV_PREFIX)
                .ignore(&["key_value"])
                .ignore(&VERBATIM_ENV_KEYS),
        )
        .merge(Serialized::defaults(VerbatimEnv::from_env()))
        .merge(Serialized::defaults(overrides));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Credential resolution ───────────────────────────────────────────

/// Resolve the key secret.
///
/// Order: the variable named by `key_value_env`, then `CVCUE_KEY_VALUE`,
/// then plaintext `key_value`, then the system keyring entry
/// `cvcue / {key_id}/key-value`.
pub fn resolve_key_value(config: &Config, key_id: &str) -> Result<SecretString, ConfigError> {
    // 1. Named env var, then the default one
    let env_names = config.key_value_env.as_deref().into_iter().chain([KEY_VALUE_ENV]);
    for env_name in env_names {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    // 2. Plaintext in config
    if let Some(ref key) = config.key_value {
        return Ok(SecretString::from(key.clone()));
    }

    // 3. System keyring
    if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, &format!("{key_id}/key-value")) {
        if let Ok(secret) = entry.get_password() {
            return Ok(SecretString::from(secret));
        }
    }

    Err(ConfigError::NoCredentials {
        key_id: key_id.into(),
    })
}

// ── Translation ─────────────────────────────────────────────────────

/// Validate a loaded [`Config`] and build the api crate's `ClientConfig`.
pub fn to_client_config(config: &Config) -> Result<ClientConfig, ConfigError> {
    let raw_url = config
        .api_url
        .as_deref()
        .ok_or(ConfigError::Missing { field: "api_url" })?;
    let base_url: url::Url = raw_url.parse().map_err(|e| ConfigError::Validation {
        field: "api_url".into(),
        reason: format!("invalid URL '{raw_url}': {e}"),
    })?;

    let page_size = NonZeroU32::new(config.page_size).ok_or_else(|| ConfigError::Validation {
        field: "page_size".into(),
        reason: "must be greater than zero".into(),
    })?;

    let key_id = config
        .key_id
        .as_deref()
        .filter(|id| !id.is_empty())
        .ok_or(ConfigError::Missing { field: "key_id" })?;
    let key_value = resolve_key_value(config, key_id)?;

    let mut credentials = ApiKeyCredentials::new(key_id, key_value);
    credentials.timeout = config.session_timeout;
    credentials.client_identifier.clone_from(&config.client_identifier);

    let tls = if config.insecure {
        TlsMode::DangerAcceptInvalid
    } else if let Some(ref ca_path) = config.ca_cert {
        TlsMode::CustomCa(ca_path.clone())
    } else {
        TlsMode::System
    };

    Ok(ClientConfig {
        base_url,
        credentials,
        transport: TransportConfig {
            tls,
            timeout: Duration::from_secs(config.request_timeout),
        },
        page_size,
    })
}
