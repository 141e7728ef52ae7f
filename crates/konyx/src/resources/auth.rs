//! Account endpoints under `/api/v1/auth`
//!
//! The refresh token lives in an HTTP-only cookie set by `register`/`login`;
//! the transport's cookie store replays it to `refresh` and `logout`.

use super::Resource;
use crate::{
    client::ApiClient,
    error::Result,
    hooks::{AuthHooks, Authorized},
    http::RequestOptions,
    types::{AuthResponse, AuthUser, Credentials, MeResponse, RefreshResponse},
};

/// Account API resource.
#[derive(Debug, Clone)]
pub struct Auth {
    client: ApiClient,
}

impl Auth {
    /// Create a new Auth resource.
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Create an account and sign in.
    pub async fn register(&self, email: &str, password: &str) -> Result<AuthResponse> {
        let options = RequestOptions::post().json(&Credentials { email, password })?;
        self.client.send("/api/v1/auth/register", &options).await
    }

    /// Sign in with email and password.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse> {
        let options = RequestOptions::post().json(&Credentials { email, password })?;
        self.client.send("/api/v1/auth/login", &options).await
    }

    /// Exchange the refresh cookie for a new access token.
    pub async fn refresh(&self) -> Result<RefreshResponse> {
        self.client
            .send("/api/v1/auth/refresh", &RequestOptions::post())
            .await
    }

    /// Revoke the refresh cookie. The server answers 204.
    pub async fn logout(&self) -> Result<()> {
        self.client
            .send("/api/v1/auth/logout", &RequestOptions::post())
            .await
    }

    /// The account owning `token`.
    pub async fn me(&self, token: &str, hooks: AuthHooks<'_>) -> Result<Authorized<AuthUser>> {
        let response: Authorized<MeResponse> = self
            .client
            .send_authorized("/api/v1/auth/me", token, &RequestOptions::get(), hooks)
            .await?;
        Ok(response.map(|me| me.user))
    }
}

impl Resource for Auth {
    fn client(&self) -> &ApiClient {
        &self.client
    }
}
