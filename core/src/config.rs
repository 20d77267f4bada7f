//! Client configuration.
//!
//! Set once when the client is built and never re-read. Derives
//! `Deserialize` so host applications can embed it in their own config
//! files; every field except `api_key` has a default.

use std::fmt;
use std::time::Duration;

use serde::Deserialize;

/// Host of the hosted shuffler service.
pub const DEFAULT_HOST: &str = "api.apiverve.com";

/// Path of the shuffle endpoint on that host.
pub const DEFAULT_PATH: &str = "/v1/carddeckshuffler";

#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct ClientConfig {
    /// Sent as the `x-api-key` header on every request.
    pub api_key: String,
    /// `https` when true, `http` otherwise.
    #[serde(default = "default_secure")]
    pub secure: bool,
    /// Host, optionally with a port (`127.0.0.1:3000`).
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_path")]
    pub path: String,
    /// Whole-request timeout. `None` waits indefinitely.
    #[serde(default)]
    pub timeout: Option<Duration>,
}

fn default_secure() -> bool {
    true
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_path() -> String {
    DEFAULT_PATH.to_string()
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            secure: default_secure(),
            host: default_host(),
            path: default_path(),
            timeout: None,
        }
    }

    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn scheme(&self) -> &'static str {
        if self.secure {
            "https"
        } else {
            "http"
        }
    }
}

// Keeps the key out of logs and panic messages.
impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("secure", &self.secure)
            .field("host", &self.host)
            .field("path", &self.path)
            .field("timeout", &self.timeout)
            .finish()
    }
}
