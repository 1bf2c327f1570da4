// Session lifecycle
//
// `POST session` exchanges API-key credentials for a session cookie,
// `DELETE session` invalidates it. `with_session` ties the two together
// so teardown is attempted on every exit path of the caller's work.

use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info, warn};

use crate::auth::ApiKeyCredentials;
use crate::client::CueClient;
use crate::error::{Error, HttpFailure};

/// An open API session.
///
/// Wraps the opaque cookie returned at login. Consumed by
/// [`CueClient::close_session`], so it cannot be used after teardown.
#[derive(Debug)]
pub struct Session {
    cookie: Option<SecretString>,
}

impl Session {
    /// Build a session from the `Set-Cookie` headers of a login response.
    fn from_response(resp: &reqwest::Response) -> Self {
        let pairs: Vec<String> = resp
            .cookies()
            .map(|c| format!("{}={}", c.name(), c.value()))
            .collect();

        if pairs.is_empty() {
            Self { cookie: None }
        } else {
            Self {
                cookie: Some(SecretString::from(pairs.join("; "))),
            }
        }
    }

    /// Value for the `Cookie` request header, if the server set any cookie.
    pub(crate) fn cookie_header(&self) -> Option<&str> {
        self.cookie.as_ref().map(ExposeSecret::expose_secret)
    }

    /// Returns `true` if the login response carried no cookie at all.
    pub fn is_anonymous(&self) -> bool {
        self.cookie.is_none()
    }
}

impl CueClient {
    /// Open a session with API-key credentials.
    ///
    /// Any non-success status, or a failure to reach the server, is an
    /// [`Error::Authentication`] naming the session URL.
    pub async fn open_session(&self, credentials: &ApiKeyCredentials) -> Result<Session, Error> {
        let url = self.url("session")?;
        debug!("POST {url}");

        let resp = self
            .http()
            .post(url.clone())
            .json(&credentials.login_body())
            .send()
            .await
            .map_err(|e| Error::Authentication {
                url: url.clone(),
                failure: HttpFailure::Transport(e),
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Authentication {
                url,
                failure: HttpFailure::Status(status),
            });
        }

        let session = Session::from_response(&resp);
        if session.is_anonymous() {
            warn!("login succeeded but no session cookie was set");
        }
        info!(key_id = %credentials.key_id, "session opened");
        Ok(session)
    }

    /// Invalidate a session.
    ///
    /// Best effort: the caller decides what a failure means. The session
    /// is consumed either way.
    pub async fn close_session(&self, session: Session) -> Result<(), Error> {
        let url = self.url("session")?;
        debug!("DELETE {url}");

        let resp = Self::authenticated(self.http().delete(url.clone()), &session)
            .send()
            .await
            .map_err(|e| Error::Logout {
                url: url.clone(),
                failure: HttpFailure::Transport(e),
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Logout {
                url,
                failure: HttpFailure::Status(status),
            });
        }

        info!("session closed");
        Ok(())
    }

    /// Run `body` inside a session.
    ///
    /// Opens a session, hands it to `body`, then always attempts to close
    /// it, whether `body` succeeded or not. A failed logout is logged and
    /// never replaces the result of `body`.
    pub async fn with_session<T, E, F>(
        &self,
        credentials: &ApiKeyCredentials,
        body: F,
    ) -> Result<T, E>
    where
        F: AsyncFnOnce(&Session) -> Result<T, E>,
        E: From<Error>,
    {
        let session = self.open_session(credentials).await?;
        let outcome = body(&session).await;

        if let Err(err) = self.close_session(session).await {
            warn!(error = %err, "session teardown failed");
        }

        outcome
    }
}
