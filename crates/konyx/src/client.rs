//! API client: one-shot requests and authorized requests with token refresh

use std::sync::Arc;

use http::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use konyx_transport::{HttpRequest, HttpTransport, Transport};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::{
    config::ClientConfig,
    error::{ApiError, Error, Result},
    hooks::{AuthHooks, Authorized},
    http::{RequestOptions, extract_message},
    observability::{RequestMetadata, RequestTimer, ResponseMetadata},
};

/// Client for the fleet operations API.
///
/// Cheap to clone; clones share the transport and therefore its cookie store.
/// The client keeps no per-request state: tokens and auth hooks are passed to
/// each call.
///
/// # Example
///
/// ```rust,no_run
/// use konyx::{ApiClient, RequestOptions};
///
/// # async fn example() -> konyx::Result<()> {
/// let client = ApiClient::new("http://localhost:8080")?;
/// let health: serde_json::Value = client.send("/health", &RequestOptions::get()).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    transport: Arc<dyn Transport>,
    base_url: String,
    default_headers: HeaderMap,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a client for `base_url` with the default HTTP transport.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::from_config(ClientConfig::with_base_url(base_url))
    }

    /// Create a client configured from the environment (see [`ClientConfig::from_env`]).
    #[cfg(feature = "env")]
    pub fn from_env() -> Result<Self> {
        Self::from_config(ClientConfig::from_env())
    }

    /// Create a client from a configuration object.
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        let transport = HttpTransport::with_config(config.transport_config())?;
        Self::build(config.base_url, Arc::new(transport), config.default_headers)
    }

    /// Create a client over a custom transport.
    pub fn with_transport(base_url: impl Into<String>, transport: Arc<dyn Transport>) -> Result<Self> {
        Self::build(base_url.into(), transport, HeaderMap::new())
    }

    fn build(base_url: String, transport: Arc<dyn Transport>, default_headers: HeaderMap) -> Result<Self> {
        Ok(Self {
            inner: Arc::new(ClientInner {
                transport,
                base_url: normalize_base_url(base_url)?,
                default_headers,
            }),
        })
    }

    /// The base URL, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Absolute URL for a request path; the path is appended verbatim.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.inner.base_url, path)
    }

    /// Perform one request and decode the JSON response.
    ///
    /// - 2xx: the body is decoded as `T`; a 204 yields `{}` if `T` accepts
    ///   it, else `null` (for `()`), whatever the body says.
    /// - non-2xx: [`Error::Api`] with the status and the best message the
    ///   body offers.
    /// - no response: [`Error::Transport`], unchanged.
    ///
    /// # Errors
    ///
    /// See above; additionally [`Error::Decode`] when a 2xx body is not valid JSON for `T`.
    pub async fn send<T: DeserializeOwned>(&self, path: &str, options: &RequestOptions) -> Result<T> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        merge_headers(&mut headers, &self.inner.default_headers);
        merge_headers(&mut headers, options.headers());

        let mut request = HttpRequest::new(options.method().clone(), self.url_for(path)).with_headers(headers);
        let mut metadata = RequestMetadata::new(options.method().as_str(), path)
            .with_authorization(request.headers.contains_key(AUTHORIZATION));
        if let Some(body) = options.body_str() {
            metadata = metadata.with_body_size(body.len());
            request = request.with_body(body.as_bytes().to_vec());
        }

        metadata.log_request();
        let timer = RequestTimer::start();

        let response = match self.inner.transport.send_http(request).await {
            Ok(response) => response,
            Err(err) => {
                metadata.log_transport_failure(timer.elapsed(), &err.to_string());
                return Err(err.into());
            }
        };

        let outcome =
            ResponseMetadata::new(response.status, timer.elapsed()).with_body_size(response.body.len());

        if !response.is_success() {
            let error = ApiError::new(response.status, extract_message(&response));
            outcome.log_error(&metadata, &error.message);
            return Err(error.into());
        }
        outcome.log_success(&metadata);

        if response.status == 204 {
            return empty_value();
        }

        serde_json::from_slice(&response.body).map_err(Error::Decode)
    }

    /// Perform a request with `Authorization: Bearer <token>`, refreshing once on 401.
    ///
    /// 1. Send with `token`. Success returns the data and `token` unchanged.
    /// 2. On an API 401 with a refresh hook, run the refresh once.
    ///    - Refresh fails: run `on_unauthorized` (if any) and return the
    ///      refresh error, not the 401.
    ///    - Refresh succeeds: send again with the new token and return that
    ///      outcome as-is. `on_unauthorized` is not run if this retry fails.
    /// 3. Any other failure, or a 401 without a refresh hook, is returned
    ///    unchanged.
    ///
    /// At most one refresh and two transport calls happen per invocation.
    /// Concurrent calls holding the same stale token each refresh
    /// independently; [`Session`](crate::Session) hooks coalesce them.
    pub async fn send_authorized<T: DeserializeOwned>(
        &self,
        path: &str,
        token: &str,
        options: &RequestOptions,
        hooks: AuthHooks<'_>,
    ) -> Result<Authorized<T>> {
        let first = self.send(path, &options.with_bearer(token)?).await;

        let err = match first {
            Ok(data) => {
                return Ok(Authorized {
                    data,
                    token: token.to_string(),
                });
            }
            Err(err) => err,
        };

        let refresh = match hooks.refresh {
            Some(refresh) if err.is_unauthorized() => refresh,
            _ => return Err(err),
        };

        debug!(path = %path, "Access token rejected, refreshing");
        let new_token = match refresh().await {
            Ok(new_token) => new_token,
            Err(refresh_err) => {
                warn!(path = %path, error = %refresh_err, "Token refresh failed, session lost");
                if let Some(on_unauthorized) = hooks.on_unauthorized {
                    on_unauthorized().await;
                }
                return Err(refresh_err);
            }
        };

        debug!(path = %path, "Retrying with refreshed token");
        let data = self.send(path, &options.with_bearer(&new_token)?).await?;
        Ok(Authorized {
            data,
            token: new_token,
        })
    }
}

fn normalize_base_url(base_url: String) -> Result<String> {
    url::Url::parse(&base_url).map_err(|e| Error::InvalidUrl(format!("{base_url}: {e}")))?;
    Ok(base_url.trim_end_matches('/').to_string())
}

/// Replace every header named in `overrides`, keeping the rest of `target`.
fn merge_headers(target: &mut HeaderMap, overrides: &HeaderMap) {
    for name in overrides.keys() {
        target.remove(name);
        for value in overrides.get_all(name) {
            target.append(name.clone(), value.clone());
        }
    }
}

fn empty_value<T: DeserializeOwned>() -> Result<T> {
    serde_json::from_value(serde_json::Value::Object(serde_json::Map::new()))
        .or_else(|_| serde_json::from_value(serde_json::Value::Null))
        .map_err(Error::Decode)
}
