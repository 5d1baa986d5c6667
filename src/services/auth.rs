// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Authentication gateway and session lifecycle.
//!
//! Login and signup are the only writers of a new session; logout and
//! server-side token rejection are the only ways a session ends.

use super::api::{validation_error, ApiClient};
use crate::error::Result;
use crate::models::{LoginRequest, ProfileUpdate, SignupProfile, User};
use crate::session::Session;
use reqwest::Method;
use serde::Deserialize;
use validator::Validate;

/// Successful login/signup payload.
#[derive(Debug, Deserialize)]
struct AuthResponse {
    token: String,
    user: User,
}

#[derive(Debug, Deserialize)]
struct UserResponse {
    user: User,
}

#[derive(Debug, Default, Deserialize)]
struct MessageResponse {
    #[serde(default)]
    message: Option<String>,
}

/// Authentication and profile operations for the current user.
#[derive(Clone)]
pub struct AuthService {
    client: ApiClient,
}

impl AuthService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Log in and persist the resulting session.
    ///
    /// On failure any existing session is left untouched.
    pub async fn login(&self, email: &str, password: &str, remember_me: bool) -> Result<User> {
        let body = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
            remember_me,
        };
        body.validate().map_err(validation_error)?;

        let response: AuthResponse = self
            .client
            .send_json(self.client.anonymous(Method::POST, "/auth/login").json(&body))
            .await?;

        Ok(self.install(response))
    }

    /// Register a new account and persist the resulting session.
    pub async fn signup(&self, profile: &SignupProfile) -> Result<User> {
        profile.validate().map_err(validation_error)?;

        let response: AuthResponse = self
            .client
            .send_json(self.client.anonymous(Method::POST, "/auth/register").json(profile))
            .await?;

        Ok(self.install(response))
    }

    /// End the session locally. Never fails.
    pub fn logout(&self) {
        self.client.session().logout();
    }

    /// Whether a token is currently held.
    pub fn check_auth(&self) -> bool {
        self.client.session().check_auth()
    }

    pub fn current_user(&self) -> Option<User> {
        self.client.session().current_user()
    }

    /// Fetch the authenticated profile and refresh the cached copy.
    pub async fn me(&self) -> Result<User> {
        self.client.require_session()?;

        let response: UserResponse = self
            .client
            .send_json(self.client.request(Method::GET, "/auth/me"))
            .await?;

        if let Err(e) = self.client.session().replace_user(response.user.clone()) {
            tracing::warn!(error = %e, "Failed to persist refreshed profile, continuing anyway");
        }
        Ok(response.user)
    }

    /// Update name/phone on the server and in the cached profile.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User> {
        self.client.require_session()?;
        update.validate().map_err(validation_error)?;

        let response: UserResponse = self
            .client
            .send_json(self.client.request(Method::PUT, "/users/profile").json(update))
            .await?;

        if let Err(e) = self.client.session().update_user(&update.as_patch()) {
            tracing::warn!(error = %e, "Failed to persist profile update, continuing anyway");
        }
        Ok(response.user)
    }

    /// Ask the server to email a password reset link.
    pub async fn request_password_reset(&self, email: &str) -> Result<String> {
        let response: MessageResponse = self
            .client
            .send_json(
                self.client
                    .anonymous(Method::POST, "/auth/forgot-password")
                    .json(&serde_json::json!({ "email": email.trim() })),
            )
            .await?;

        Ok(response
            .message
            .unwrap_or_else(|| "Password reset email sent".to_string()))
    }

    fn install(&self, response: AuthResponse) -> User {
        let user = response.user.clone();
        let session = Session {
            token: response.token,
            user: response.user,
        };
        if let Err(e) = self.client.session().establish(session) {
            tracing::warn!(error = %e, "Failed to persist session, continuing anyway");
        }
        user
    }
}
