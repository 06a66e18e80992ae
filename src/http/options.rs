use std::time::Duration;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Request wrapper configuration.
///
/// Fixed at construction time; [`crate::http::HttpRequest`] never mutates
/// it afterwards. Every recognized option is an explicit field with its
/// default spelled out here.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    /// Credential realm for `api_user` and `proxy_user` lookups.
    pub realm: Option<String>,
    /// User for HTTP authentication; its password must already be stored.
    pub api_user: Option<String>,
    /// Proxy server host or ip.
    pub proxy_server: Option<String>,
    /// Proxy server port.
    pub proxy_port: Option<u16>,
    /// User for proxy authentication; its password must already be stored.
    pub proxy_user: Option<String>,
    /// Per-call timeout.
    pub timeout: Duration,
    /// Verify TLS certificates. Off by default: splunkd and most internal
    /// endpoints this wrapper talks to present self-signed certificates.
    pub verify_tls: bool,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            realm: None,
            api_user: None,
            proxy_server: None,
            proxy_port: None,
            proxy_user: None,
            timeout: DEFAULT_TIMEOUT,
            verify_tls: false,
        }
    }
}
