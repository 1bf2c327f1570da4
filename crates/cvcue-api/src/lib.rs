// cvcue-api: Async Rust client for the CV-CUE wireless manager API

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod paginate;
pub mod session;
pub mod transport;

pub use reqwest::StatusCode;

pub use auth::{ApiKeyCredentials, DEFAULT_CLIENT_IDENTIFIER, DEFAULT_SESSION_TIMEOUT};
pub use client::CueClient;
pub use config::ClientConfig;
pub use error::{Error, HttpFailure};
pub use models::{AccessPoint, ManagedDevicesPage};
pub use paginate::{DEFAULT_PAGE_SIZE, PageCursor};
pub use session::Session;
pub use transport::{TlsMode, TransportConfig};
