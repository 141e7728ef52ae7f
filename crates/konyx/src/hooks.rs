//! Per-call authentication hooks for [`ApiClient::send_authorized`](crate::ApiClient::send_authorized)

use std::future::Future;

use futures::future::BoxFuture;

use crate::error::Result;

type RefreshFn<'a> = Box<dyn FnOnce() -> BoxFuture<'a, Result<String>> + Send + 'a>;
type UnauthorizedFn<'a> = Box<dyn FnOnce() -> BoxFuture<'a, ()> + Send + 'a>;

/// Capabilities the caller lends to a single authorized request.
///
/// Both hooks are `FnOnce`: a request refreshes at most once and reports a
/// lost session at most once. Nothing is retained after the call returns.
///
/// ```rust,no_run
/// # use konyx::{ApiClient, AuthHooks, RequestOptions};
/// # async fn example(client: ApiClient) -> konyx::Result<()> {
/// let hooks = AuthHooks::new()
///     .with_refresh(|| async { Ok::<_, konyx::Error>("fresh-token".to_string()) })
///     .with_on_unauthorized(|| async { tracing::warn!("signed out") });
///
/// let result = client
///     .send_authorized::<serde_json::Value>("/api/v1/auth/me", "stale-token", &RequestOptions::get(), hooks)
///     .await?;
/// assert_eq!(result.token, "fresh-token");
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct AuthHooks<'a> {
    pub(crate) refresh: Option<RefreshFn<'a>>,
    pub(crate) on_unauthorized: Option<UnauthorizedFn<'a>>,
}

impl<'a> AuthHooks<'a> {
    /// No refresh and no unauthorized callback: a 401 is returned as-is.
    pub fn new() -> Self {
        Self::default()
    }

    /// Procedure that produces a new access token after a 401.
    pub fn with_refresh<F, Fut>(mut self, refresh: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'a,
        Fut: Future<Output = Result<String>> + Send + 'a,
    {
        self.refresh = Some(Box::new(move || Box::pin(refresh())));
        self
    }

    /// Callback run when the refresh procedure fails.
    pub fn with_on_unauthorized<F, Fut>(mut self, on_unauthorized: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'a,
        Fut: Future<Output = ()> + Send + 'a,
    {
        self.on_unauthorized = Some(Box::new(move || Box::pin(on_unauthorized())));
        self
    }

    /// Whether a refresh procedure was supplied.
    pub fn can_refresh(&self) -> bool {
        self.refresh.is_some()
    }
}

impl std::fmt::Debug for AuthHooks<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthHooks")
            .field("refresh", &self.refresh.is_some())
            .field("on_unauthorized", &self.on_unauthorized.is_some())
            .finish()
    }
}

/// Result of an authorized request together with the token that succeeded.
///
/// `token` equals the caller's token unless a refresh happened.
#[derive(Debug, Clone, PartialEq)]
pub struct Authorized<T> {
    /// Decoded response body
    pub data: T,
    /// Access token to use for the next request
    pub token: String,
}

impl<T> Authorized<T> {
    /// Transform the payload, keeping the token.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Authorized<U> {
        Authorized {
            data: f(self.data),
            token: self.token,
        }
    }
}
