//! Configuration for the Konyx client

use http::HeaderMap;
use std::time::Duration;

use crate::DEFAULT_BASE_URL;

/// Environment variable holding the API base URL.
pub const BASE_URL_ENV: &str = "KONYX_API_BASE_URL";
/// Environment variable holding the whole-request timeout, in seconds.
pub const TIMEOUT_ENV: &str = "KONYX_TIMEOUT";
/// Environment variable holding the connect timeout, in seconds.
pub const CONNECT_TIMEOUT_ENV: &str = "KONYX_CONNECT_TIMEOUT";

/// Configuration for the Konyx client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL every request path is appended to
    pub base_url: String,

    /// Whole-request timeout; `None` leaves requests unbounded
    pub timeout: Option<Duration>,

    /// Connection timeout
    pub connect_timeout: Duration,

    /// Maximum idle connections per host
    pub pool_max_idle_per_host: usize,

    /// Headers sent with every request unless the call overrides them
    pub default_headers: HeaderMap,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
            connect_timeout: Duration::from_secs(30),
            pool_max_idle_per_host: 10,
            default_headers: HeaderMap::new(),
        }
    }
}

impl ClientConfig {
    /// Start building a configuration from the defaults.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    /// Create a configuration for the given base URL.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is loaded first if present.
    /// This will look for:
    /// - `KONYX_API_BASE_URL` for the API base URL (default `http://localhost:8080`)
    /// - `KONYX_TIMEOUT` for the request timeout (in seconds)
    /// - `KONYX_CONNECT_TIMEOUT` for the connect timeout (in seconds)
    ///
    /// Unparseable numbers are ignored and the default is kept.
    #[cfg(feature = "env")]
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(base_url) = var(BASE_URL_ENV).filter(|v| !v.trim().is_empty()) {
            config.base_url = base_url;
        }

        if let Some(secs) = var(TIMEOUT_ENV).and_then(|v| v.trim().parse::<u64>().ok()) {
            config.timeout = Some(Duration::from_secs(secs));
        }

        if let Some(secs) = var(CONNECT_TIMEOUT_ENV).and_then(|v| v.trim().parse::<u64>().ok()) {
            config.connect_timeout = Duration::from_secs(secs);
        }

        config
    }

    /// The transport settings this configuration implies.
    pub fn transport_config(&self) -> konyx_transport::HttpTransportConfig {
        konyx_transport::HttpTransportConfig {
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            pool_max_idle_per_host: self.pool_max_idle_per_host,
            cookie_store: true,
        }
    }
}

/// Builder for creating ClientConfig with a fluent API.
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = base_url.into();
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    /// Set the connect timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    /// Set the idle pool size per host.
    pub fn pool_max_idle_per_host(mut self, size: usize) -> Self {
        self.config.pool_max_idle_per_host = size;
        self
    }

    /// Add a default header.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid according to HTTP specifications.
    pub fn default_header(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> crate::Result<Self> {
        let key_str = key.into();
        let value_str = value.into();

        let key: http::HeaderName = key_str
            .parse()
            .map_err(|_| crate::Error::InvalidHeaderName(key_str.clone()))?;
        let value: http::HeaderValue = value_str
            .parse()
            .map_err(|_| crate::Error::InvalidHeaderValue(key_str.clone()))?;

        self.config.default_headers.insert(key, value);
        Ok(self)
    }

    /// Build the configuration.
    pub fn build(self) -> ClientConfig {
        self.config
    }
}
