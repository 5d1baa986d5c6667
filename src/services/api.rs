// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared HTTP client for the marketplace API.
//!
//! Handles:
//! - Base URL joining and standard headers
//! - Bearer token attachment from the session
//! - Response normalization into `ApiError`
//! - Session invalidation when the server rejects the token (401)

use crate::config::Config;
use crate::error::{ApiError, Result};
use crate::session::SessionStore;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

/// Low-level API client shared by every gateway.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: SessionStore,
}

impl ApiClient {
    /// Create a client from loaded configuration.
    pub fn new(config: &Config, session: SessionStore) -> Result<Self> {
        Self::with_base_url(&config.api_base_url, config.request_timeout, session)
    }

    /// Create a client against an explicit base URL.
    pub fn with_base_url(base_url: &str, timeout: Duration, session: SessionStore) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(concat!("getsetride/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Start a request, attaching the session token when one is present.
    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, self.url(path));
        match self.session.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Start a request that never carries a token (login, signup).
    pub(crate) fn anonymous(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, self.url(path))
    }

    /// Refuse locally when an action needs a session and none is present.
    pub(crate) fn require_session(&self) -> Result<()> {
        if self.session.check_auth() {
            Ok(())
        } else {
            Err(ApiError::login_required())
        }
    }

    /// Send a request and return the JSON body of a successful response.
    ///
    /// Non-2xx statuses and `{"success": false}` payloads become errors. A
    /// 401 on a request that carried the current token clears the session.
    pub(crate) async fn send(&self, builder: RequestBuilder) -> Result<Value> {
        let request = builder.build().map_err(ApiError::from_transport)?;
        let carried_token = bearer_token(&request);
        let method = request.method().clone();
        let path = request.url().path().to_string();

        tracing::debug!(%method, path = %path, authenticated = carried_token.is_some(), "API request");

        let response = self.http.execute(request).await.map_err(|e| {
            tracing::warn!(%method, path = %path, error = %e, "API request failed");
            ApiError::from_transport(e)
        })?;

        let status = response.status();
        let body = response.text().await.map_err(ApiError::from_transport)?;
        let payload = parse_body(&body);

        if !status.is_success() {
            let message = error_message(&payload);
            tracing::warn!(%method, path = %path, status = status.as_u16(), "API error response");

            if status == StatusCode::UNAUTHORIZED {
                if let Some(token) = carried_token.as_deref() {
                    self.session
                        .invalidate_token(token, message.as_deref().unwrap_or("token rejected"));
                }
            }
            return Err(ApiError::from_status(status, message));
        }

        if payload.get("success").and_then(Value::as_bool) == Some(false) {
            let message = error_message(&payload).unwrap_or_default();
            tracing::warn!(%method, path = %path, "API reported failure");
            return Err(ApiError::Server(message));
        }

        Ok(payload)
    }

    /// Send a request and decode the successful body into `T`.
    pub(crate) async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let payload = self.send(builder).await?;
        decode(payload)
    }
}

/// Decode a response payload, treating shape mismatches as server errors.
pub(crate) fn decode<T: DeserializeOwned>(payload: Value) -> Result<T> {
    serde_json::from_value(payload)
        .map_err(|e| ApiError::Server(format!("Unexpected response from server: {}", e)))
}

/// Turn `validator` failures into a single user-facing message.
pub(crate) fn validation_error(errors: validator::ValidationErrors) -> ApiError {
    let message = errors
        .field_errors()
        .values()
        .flat_map(|errs| errs.iter())
        .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| errors.to_string());
    ApiError::Validation(message)
}

/// The bearer token a built request carries, if any.
fn bearer_token(request: &reqwest::Request) -> Option<String> {
    request
        .headers()
        .get(reqwest::header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::to_string)
}

fn parse_body(body: &str) -> Value {
    if body.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string()))
}

fn error_message(payload: &Value) -> Option<String> {
    let message = match payload {
        Value::Object(map) => map
            .get("message")
            .or_else(|| map.get("error"))
            .and_then(Value::as_str),
        Value::String(text) => Some(text.as_str()),
        _ => None,
    };
    message
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}
