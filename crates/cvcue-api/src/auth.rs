use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

/// Server-side session lifetime requested at login, in seconds.
pub const DEFAULT_SESSION_TIMEOUT: u32 = 360;

/// Name reported to the server when the caller does not pick one.
pub const DEFAULT_CLIENT_IDENTIFIER: &str = "cvcue";

/// API-key credentials for opening a session.
///
/// Keys are created in the LaunchPad admin settings; the "Viewer" role
/// for the wireless manager is enough to list access points.
#[derive(Debug, Clone)]
pub struct ApiKeyCredentials {
    pub key_id: String,
    pub key_value: SecretString,
    /// Session lifetime in seconds, enforced by the server.
    pub timeout: u32,
    /// Free-form name the server records for this client.
    pub client_identifier: String,
}

impl ApiKeyCredentials {
    pub fn new(key_id: impl Into<String>, key_value: SecretString) -> Self {
        Self {
            key_id: key_id.into(),
            key_value,
            timeout: DEFAULT_SESSION_TIMEOUT,
            client_identifier: DEFAULT_CLIENT_IDENTIFIER.into(),
        }
    }

    /// The JSON body for `POST session`. Exposes the secret, so it must
    /// only ever be handed to the request serializer.
    pub(crate) fn login_body(&self) -> LoginBody<'_> {
        LoginBody {
            kind: "apikeycredentials",
            key_id: &self.key_id,
            key_value: self.key_value.expose_secret(),
            timeout: self.timeout,
            client_identifier: &self.client_identifier,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LoginBody<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    key_id: &'a str,
    key_value: &'a str,
    timeout: u32,
    client_identifier: &'a str,
}
