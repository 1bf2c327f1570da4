use reqwest::StatusCode;
use thiserror::Error;
use url::Url;

/// What went wrong with a single HTTP exchange.
///
/// Transport failures (DNS, TLS, connection refused, timeouts) never
/// produce a status code, so they carry the underlying `reqwest` error
/// instead. Both shapes are classified under the same [`Error`] kind.
#[derive(Debug, Error)]
pub enum HttpFailure {
    #[error("status code: {}", .0.as_u16())]
    Status(StatusCode),

    #[error("transport error: {0}")]
    Transport(reqwest::Error),
}

impl HttpFailure {
    /// The HTTP status, if the server answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status(status) => Some(*status),
            Self::Transport(e) => e.status(),
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_timeout())
    }
}

/// Top-level error type for the `cvcue-api` crate.
///
/// Every variant tied to a request carries the URL that was attempted.
/// None of them are retried by this crate.
#[derive(Debug, Error)]
pub enum Error {
    // ── Session ─────────────────────────────────────────────────────
    /// Session creation failed.
    #[error("Login failed on {url} with {failure}")]
    Authentication { url: Url, failure: HttpFailure },

    /// Session teardown failed. Callers usually log this and move on.
    #[error("Logout failed on {url} with {failure}")]
    Logout { url: Url, failure: HttpFailure },

    // ── Inventory ───────────────────────────────────────────────────
    /// A page of managed devices could not be fetched.
    #[error("Request GET {url} failed with {failure}")]
    Retrieval { url: Url, failure: HttpFailure },

    /// The server answered with a success status but an unreadable body.
    #[error("Failed to decode response from {url}: {message}")]
    Decode {
        url: Url,
        message: String,
        body: String,
    },

    // ── Setup ───────────────────────────────────────────────────────
    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or HTTP client construction failed.
    #[error("TLS error: {0}")]
    Tls(String),
}

impl Error {
    /// The URL of the failed request, when one was attempted.
    pub fn url(&self) -> Option<&Url> {
        match self {
            Self::Authentication { url, .. }
            | Self::Logout { url, .. }
            | Self::Retrieval { url, .. }
            | Self::Decode { url, .. } => Some(url),
            Self::InvalidUrl(_) | Self::Tls(_) => None,
        }
    }

    /// The HTTP status of the failed request, if the server answered.
    pub fn status(&self) -> Option<StatusCode> {
        self.failure().and_then(HttpFailure::status)
    }

    /// Returns `true` if the request never got an HTTP answer.
    pub fn is_transport(&self) -> bool {
        matches!(self.failure(), Some(HttpFailure::Transport(_)))
    }

    pub fn is_timeout(&self) -> bool {
        self.failure().is_some_and(HttpFailure::is_timeout)
    }

    fn failure(&self) -> Option<&HttpFailure> {
        match self {
            Self::Authentication { failure, .. }
            | Self::Logout { failure, .. }
            | Self::Retrieval { failure, .. } => Some(failure),
            Self::Decode { .. } | Self::InvalidUrl(_) | Self::Tls(_) => None,
        }
    }
}
