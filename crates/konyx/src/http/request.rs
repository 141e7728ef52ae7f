//! Request descriptor

use crate::error::{Error, Result};
use http::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use http::Method;
use serde::Serialize;

/// Method, header overrides and body for one API call.
///
/// The path is passed separately to [`ApiClient::send`](crate::ApiClient::send).
/// Builder methods consume `self`, so a finished value is never mutated; the
/// authorized send clones it once per attempt.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    method: Method,
    headers: HeaderMap,
    body: Option<String>,
}

impl RequestOptions {
    /// Create options for the given method.
    pub fn new(method: Method) -> Self {
        Self {
            method,
            ..Default::default()
        }
    }

    /// `GET` with no body.
    pub fn get() -> Self {
        Self::new(Method::GET)
    }

    /// `POST` with no body.
    pub fn post() -> Self {
        Self::new(Method::POST)
    }

    /// `PUT` with no body.
    pub fn put() -> Self {
        Self::new(Method::PUT)
    }

    /// `DELETE` with no body.
    pub fn delete() -> Self {
        Self::new(Method::DELETE)
    }

    /// Set a header override from strings.
    ///
    /// # Errors
    /// Returns an error if the header name or value contains invalid characters.
    pub fn header(self, key: impl AsRef<str>, value: impl AsRef<str>) -> Result<Self> {
        let key = key.as_ref();
        let name = key
            .parse::<HeaderName>()
            .map_err(|_| Error::InvalidHeaderName(key.to_string()))?;
        let value = HeaderValue::from_str(value.as_ref())
            .map_err(|_| Error::InvalidHeaderValue(key.to_string()))?;
        Ok(self.with_header(name, value))
    }

    /// Set an already-validated header override.
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Set a pre-serialized body.
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Serialize `value` as the JSON body.
    pub fn json<T: Serialize + ?Sized>(self, value: &T) -> Result<Self> {
        let body = serde_json::to_string(value).map_err(Error::Serialization)?;
        Ok(self.body(body))
    }

    /// The HTTP method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Caller-supplied header overrides.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// The pre-serialized body, if any.
    pub fn body_str(&self) -> Option<&str> {
        self.body.as_deref()
    }

    /// A copy with `Authorization: Bearer <token>` set after the caller's
    /// headers, so an override of `Authorization` never survives.
    pub(crate) fn with_bearer(&self, token: &str) -> Result<Self> {
        let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|_| Error::InvalidHeaderValue(AUTHORIZATION.to_string()))?;
        value.set_sensitive(true);
        Ok(self.clone().with_header(AUTHORIZATION, value))
    }
}
