//! Server session context.

use serde::{Deserialize, Serialize};

/// Connection context for one VMS server.
///
/// Owned by the caller and immutable for the duration of one export; the
/// API client only reads from it. Credentials are sent as HTTP Basic auth.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Server host name or IP address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Basic-auth user name.
    pub username: String,
    /// Basic-auth password.
    pub password: String,
    /// Use HTTPS instead of HTTP.
    #[serde(default)]
    pub use_https: bool,
}

impl Session {
    /// Create a plain-HTTP session.
    pub fn new(
        host: impl Into<String>,
        port: u16,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            username: username.into(),
            password: password.into(),
            use_https: false,
        }
    }

    /// Base URL for all API calls, without a trailing slash.
    pub fn base_url(&self) -> String {
        let scheme = if self.use_https { "https" } else { "http" };
        format!("{}://{}:{}", scheme, self.host, self.port)
    }
}
