//! Authentication session
//!
//! A [`Session`] owns the access token and the signed-in user and lends the
//! client a refresh procedure and an expiry callback for every authorized
//! request. It is created once by the application and cloned wherever it is
//! needed; clones share state.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::{
    client::ApiClient,
    error::{Error, Result},
    hooks::AuthHooks,
    http::RequestOptions,
    resources::{Auth, Commands, Devices, Telemetry},
    types::{AuthResponse, AuthUser},
};

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Nothing attempted yet
    #[default]
    Idle,
    /// A sign-in or restore is in flight
    Loading,
    /// An access token is held
    Authenticated,
    /// Signed out, expired, or sign-in failed
    Unauthenticated,
}

#[derive(Default)]
struct SessionData {
    state: SessionState,
    user: Option<AuthUser>,
    token: Option<SecretString>,
}

struct SessionInner {
    client: ApiClient,
    data: RwLock<SessionData>,
    // Held for the duration of a network refresh.
    refresh_gate: Mutex<()>,
}

/// Shared authentication state for one signed-in user.
///
/// # Example
///
/// ```rust,no_run
/// use konyx::{ApiClient, Session};
///
/// # async fn example() -> konyx::Result<()> {
/// let session = Session::new(ApiClient::new("http://localhost:8080")?);
/// session.login("ops@konyx.io", "correct horse").await?;
///
/// for device in session.devices().list().await? {
///     println!("{} {:?}", device.device_id, device.status);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("client", &self.inner.client)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// A new, idle session over `client`.
    pub fn new(client: ApiClient) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                client,
                data: RwLock::new(SessionData::default()),
                refresh_gate: Mutex::new(()),
            }),
        }
    }

    /// The underlying client.
    pub fn client(&self) -> &ApiClient {
        &self.inner.client
    }

    /// Account endpoints.
    pub fn auth(&self) -> Auth {
        Auth::new(self.inner.client.clone())
    }

    /// Device registry endpoints.
    pub fn devices(&self) -> Devices {
        Devices::new(self.clone())
    }

    /// Telemetry endpoints.
    pub fn telemetry(&self) -> Telemetry {
        Telemetry::new(self.clone())
    }

    /// Command dispatch endpoints.
    pub fn commands(&self) -> Commands {
        Commands::new(self.clone())
    }

    /// Current lifecycle state.
    pub async fn state(&self) -> SessionState {
        self.inner.data.read().await.state
    }

    /// The signed-in user, if known.
    pub async fn user(&self) -> Option<AuthUser> {
        self.inner.data.read().await.user.clone()
    }

    /// Whether an access token is held.
    pub async fn is_authenticated(&self) -> bool {
        self.state().await == SessionState::Authenticated
    }

    /// The current access token.
    pub async fn access_token(&self) -> Option<SecretString> {
        self.current_token().await.map(SecretString::from)
    }

    async fn current_token(&self) -> Option<String> {
        self.inner
            .data
            .read()
            .await
            .token
            .as_ref()
            .map(|token| token.expose_secret().to_string())
    }

    /// Create an account and sign in.
    ///
    /// On failure the session becomes [`SessionState::Unauthenticated`] and
    /// the error is returned.
    pub async fn register(&self, email: &str, password: &str) -> Result<AuthUser> {
        self.set_state(SessionState::Loading).await;
        let result = self.auth().register(email, password).await;
        self.sign_in(result).await
    }

    /// Sign in with email and password.
    ///
    /// On failure the session becomes [`SessionState::Unauthenticated`] and
    /// the error is returned.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthUser> {
        self.set_state(SessionState::Loading).await;
        let result = self.auth().login(email, password).await;
        self.sign_in(result).await
    }

    async fn sign_in(&self, result: Result<AuthResponse>) -> Result<AuthUser> {
        match result {
            Ok(response) => {
                info!(user = %response.user.id, "Signed in");
                let mut data = self.inner.data.write().await;
                data.state = SessionState::Authenticated;
                data.user = Some(response.user.clone());
                data.token = Some(SecretString::from(response.access_token));
                Ok(response.user)
            }
            Err(err) => {
                warn!(error = %err, "Sign-in failed");
                self.clear().await;
                Err(err)
            }
        }
    }

    /// Resume a previous session from the refresh cookie.
    ///
    /// Returns `Ok(None)` when the server has no session for this client
    /// (the refresh is answered with 401). Either way the session ends up
    /// `Authenticated` or `Unauthenticated`.
    pub async fn restore(&self) -> Result<Option<AuthUser>> {
        self.set_state(SessionState::Loading).await;

        let token = match self.refresh_from(None).await {
            Ok(token) => token,
            Err(err) => {
                self.clear().await;
                return if err.is_unauthorized() {
                    debug!("No session to restore");
                    Ok(None)
                } else {
                    Err(err)
                };
            }
        };

        match self.auth().me(&token, AuthHooks::new()).await {
            Ok(me) => {
                let mut data = self.inner.data.write().await;
                data.state = SessionState::Authenticated;
                data.user = Some(me.data.clone());
                info!(user = %me.data.id, "Session restored");
                Ok(Some(me.data))
            }
            Err(err) => {
                self.clear().await;
                Err(err)
            }
        }
    }

    /// Obtain a new access token from the refresh cookie.
    ///
    /// Concurrent calls share one network refresh. On failure the session
    /// expires.
    pub async fn refresh(&self) -> Result<SecretString> {
        let stale = self.current_token().await;
        match self.refresh_from(stale.as_deref()).await {
            Ok(token) => Ok(SecretString::from(token)),
            Err(err) => {
                self.expire_token(stale.as_deref()).await;
                Err(err)
            }
        }
    }

    /// Refresh unless the token was already rotated away from `stale`.
    ///
    /// With `stale` set, a caller that queued behind another refresh gets
    /// the token that refresh produced without a request of its own. A
    /// session that expired meanwhile yields [`Error::NotAuthenticated`].
    async fn refresh_from(&self, stale: Option<&str>) -> Result<String> {
        let _gate = self.inner.refresh_gate.lock().await;

        if let Some(stale) = stale {
            match self.current_token().await {
                Some(current) if current != stale => {
                    debug!("Token already rotated, reusing it");
                    return Ok(current);
                }
                Some(_) => {}
                None => return Err(Error::NotAuthenticated),
            }
        }

        let token = self.auth().refresh().await?.access_token;

        let mut data = self.inner.data.write().await;
        data.token = Some(SecretString::from(token.clone()));
        data.state = SessionState::Authenticated;
        debug!("Access token refreshed");
        Ok(token)
    }

    /// Sign out.
    ///
    /// Local state is cleared before the server is told, so the session is
    /// `Unauthenticated` even if the logout request fails.
    pub async fn logout(&self) -> Result<()> {
        self.clear().await;
        info!("Signed out");
        self.auth().logout().await
    }

    /// Drop the token and user after the server stopped accepting them.
    pub async fn expire(&self) {
        let was_authenticated = self.is_authenticated().await;
        self.clear().await;
        if was_authenticated {
            warn!("Session expired");
        }
    }

    /// Expire only if `failed` is still the held token.
    ///
    /// A sign-in that completed after the failed request went out installs a
    /// different token, which is kept.
    async fn expire_token(&self, failed: Option<&str>) {
        let mut data = self.inner.data.write().await;
        let held = data.token.as_ref().map(|token| token.expose_secret());
        if held.is_some() && held != failed {
            debug!("Token replaced meanwhile, keeping the session");
            return;
        }

        let was_authenticated = data.state == SessionState::Authenticated;
        data.state = SessionState::Unauthenticated;
        data.user = None;
        data.token = None;
        if was_authenticated {
            warn!("Session expired");
        }
    }

    /// Perform an authorized request with the current token.
    ///
    /// A 401 triggers one shared refresh and one retry; if the refresh fails
    /// the session expires and the refresh error is returned.
    ///
    /// # Errors
    ///
    /// [`Error::NotAuthenticated`] without a token; otherwise whatever
    /// [`ApiClient::send_authorized`] returns.
    pub async fn authorized<T: DeserializeOwned>(
        &self,
        path: &str,
        options: &RequestOptions,
    ) -> Result<T> {
        let token = self.current_token().await.ok_or(Error::NotAuthenticated)?;
        let response = self
            .inner
            .client
            .send_authorized(path, &token, options, self.hooks(&token))
            .await?;
        Ok(response.data)
    }

    /// Refresh and expiry hooks bound to this session, for a request sent
    /// with `token`.
    pub fn hooks<'a>(&'a self, token: &'a str) -> AuthHooks<'a> {
        AuthHooks::new()
            .with_refresh(move || self.refresh_from(Some(token)))
            .with_on_unauthorized(move || self.expire_token(Some(token)))
    }

    async fn set_state(&self, state: SessionState) {
        self.inner.data.write().await.state = state;
    }

    async fn clear(&self) {
        let mut data = self.inner.data.write().await;
        data.state = SessionState::Unauthenticated;
        data.user = None;
        data.token = None;
    }
}
