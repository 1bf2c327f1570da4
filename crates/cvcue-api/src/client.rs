// CV-CUE wireless manager HTTP client
//
// Wraps `reqwest::Client` with base-URL handling. The endpoint groups
// (session lifecycle, managed-device pagination) are inherent methods
// implemented in their own modules.

use std::num::NonZeroU32;

use reqwest::header::COOKIE;
use url::Url;

use crate::config::ClientConfig;
use crate::error::Error;
use crate::session::Session;
use crate::transport::TransportConfig;

/// Raw HTTP client for the CV-CUE REST API.
///
/// Holds no session state of its own: the session cookie lives in a
/// [`Session`] value that every authenticated call borrows.
pub struct CueClient {
    http: reqwest::Client,
    base_url: Url,
}

impl CueClient {
    /// Create a client for the API rooted at `base_url`.
    ///
    /// The base URL is the one shown under SYSTEM > Advanced Settings >
    /// Base URLs for APIs, e.g. `https://host.srv.wifi.arista.com/wifi/api/`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url))
    }

    /// Create a client from a fully resolved [`ClientConfig`].
    pub fn from_config(config: &ClientConfig) -> Result<Self, Error> {
        Self::new(config.base_url.clone(), &config.transport)
    }

    /// Create a client around a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url: normalize_base_url(base_url),
        }
    }

    /// The API base URL (always ends with `/`).
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Join a relative endpoint path (e.g. `"session"`) onto the base URL.
    pub(crate) fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    /// `manageddevices/aps?pagesize={size}&startindex={start}`
    pub(crate) fn access_points_url(
        &self,
        page_size: NonZeroU32,
        start_index: u64,
    ) -> Result<Url, Error> {
        let mut url = self.url("manageddevices/aps")?;
        url.query_pairs_mut()
            .append_pair("pagesize", &page_size.to_string())
            .append_pair("startindex", &start_index.to_string());
        Ok(url)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Attach the session cookie to a request.
    pub(crate) fn authenticated(
        builder: reqwest::RequestBuilder,
        session: &Session,
    ) -> reqwest::RequestBuilder {
        match session.cookie_header() {
            Some(cookie) => builder.header(COOKIE, cookie),
            None => builder,
        }
    }
}

/// Treat the base URL as a directory so relative joins land beneath it.
fn normalize_base_url(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(raw: &str) -> CueClient {
        CueClient::with_client(
            reqwest::Client::new(),
            Url::parse(raw).expect("valid test URL"),
        )
    }

    #[test]
    fn base_url_gains_trailing_slash() {
        let client = client("https://cue.example.com/wifi/api");
        assert_eq!(client.base_url().as_str(), "https://cue.example.com/wifi/api/");
    }

    #[test]
    fn session_url_joins_under_base() {
        let client = client("https://cue.example.com/wifi/api/");
        let url = client.url("session").expect("joinable");
        assert_eq!(url.as_str(), "https://cue.example.com/wifi/api/session");
    }

    #[test]
    fn access_points_url_carries_pagination() {
        let client = client("https://cue.example.com/wifi/api");
        let page_size = NonZeroU32::new(100).expect("non-zero");
        let url = client
            .access_points_url(page_size, 200)
            .expect("joinable");
        assert_eq!(
            url.as_str(),
            "https://cue.example.com/wifi/api/manageddevices/aps?pagesize=100&startindex=200"
        );
    }
}
