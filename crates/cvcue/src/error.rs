//! CLI error types with miette diagnostics.
//!
//! Maps api and config errors into user-facing reports with help text
//! and process exit codes.

use std::path::Path;

use miette::Diagnostic;
use thiserror::Error;

use cvcue_config::ConfigError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const RETRIEVAL: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Session ──────────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(
        code(cvcue::auth_failed),
        help(
            "Verify key_id and the key secret.\n\
             Keys are managed in LaunchPad admin settings; the Viewer role\n\
             for the wireless manager is sufficient."
        )
    )]
    Authentication(cvcue_api::Error),

    // ── Inventory ────────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(
        code(cvcue::retrieval_failed),
        help("Lines printed before this error are valid, but the listing is incomplete.")
    )]
    Retrieval(cvcue_api::Error),

    #[error(transparent)]
    #[diagnostic(code(cvcue::api))]
    Api(cvcue_api::Error),

    // ── Configuration ────────────────────────────────────────────────
    #[error("{reason}")]
    #[diagnostic(
        code(cvcue::config),
        help(
            "Set api_url, key_id and a key secret in {path},\n\
             or export CVCUE_API_URL, CVCUE_KEY_ID and CVCUE_KEY_VALUE."
        )
    )]
    Config { reason: ConfigError, path: String },

    // ── Output ───────────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to encode record: {0}")]
    #[diagnostic(code(cvcue::json))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Authentication(e) | Self::Retrieval(e) | Self::Api(e) if e.is_timeout() => {
                exit_code::TIMEOUT
            }
            Self::Authentication(e) | Self::Retrieval(e) | Self::Api(e) if e.is_transport() => {
                exit_code::CONNECTION
            }
            Self::Authentication(_) => exit_code::AUTH,
            Self::Retrieval(_) => exit_code::RETRIEVAL,
            Self::Config { .. } => exit_code::USAGE,
            Self::Api(_) | Self::Io(_) | Self::Json(_) => exit_code::GENERAL,
        }
    }

    /// Returns `true` if stdout was closed by the reader (e.g. `| head`).
    pub fn is_broken_pipe(&self) -> bool {
        matches!(self, Self::Io(e) if e.kind() == std::io::ErrorKind::BrokenPipe)
    }
}

// ── cvcue_api::Error → CliError mapping ──────────────────────────────

impl From<cvcue_api::Error> for CliError {
    fn from(err: cvcue_api::Error) -> Self {
        use cvcue_api::Error as ApiError;

        match err {
            ApiError::Authentication { .. } => Self::Authentication(err),
            ApiError::Retrieval { .. } | ApiError::Decode { .. } => Self::Retrieval(err),
            ApiError::Logout { .. } | ApiError::InvalidUrl(_) | ApiError::Tls(_) => Self::Api(err),
        }
    }
}

impl CliError {
    /// A configuration failure, naming the config file that was consulted.
    pub fn config(reason: ConfigError, path: &Path) -> Self {
        Self::Config {
            reason,
            path: path.display().to_string(),
        }
    }
}
