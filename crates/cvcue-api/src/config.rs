// ── Runtime client configuration ──
//
// Describes *where* and *as whom* to connect. Carries credential data and
// transport tuning, never touches disk. The binary builds a `ClientConfig`
// (usually through `cvcue-config`) and hands it in.

use std::num::NonZeroU32;

use url::Url;

use crate::auth::ApiKeyCredentials;
use crate::transport::TransportConfig;

/// Everything needed to walk the managed access point inventory once.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base URL, e.g. `https://host.srv.wifi.arista.com/wifi/api/`.
    pub base_url: Url,
    pub credentials: ApiKeyCredentials,
    pub transport: TransportConfig,
    /// Records requested per page.
    pub page_size: NonZeroU32,
}
