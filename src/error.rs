// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Gateway error taxonomy shared by every API call.

use reqwest::StatusCode;

/// Coarse classification of an [`ApiError`], for callers that only branch on kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    Validation,
    Auth,
    Server,
}

/// Error returned by every resource gateway.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The request could not complete (offline, timeout, DNS).
    #[error("Network error: {0}")]
    Network(String),

    /// The request was rejected as invalid, locally or by the server.
    #[error("Validation error: {0}")]
    Validation(String),

    /// No session was present, or the server rejected the bearer token.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// The server was reachable but reported a failure.
    #[error("Server error: {0}")]
    Server(String),
}

impl ApiError {
    /// Message shown when a gateway failure carries no usable text.
    pub const GENERIC_FAILURE: &'static str = "Something went wrong. Please try again.";

    /// Message for actions that need a logged-in user.
    pub const LOGIN_REQUIRED: &'static str = "Please log in to continue";

    /// Message for requests that exceeded the configured timeout.
    pub const REQUEST_TIMED_OUT: &'static str = "The request timed out. Please try again.";

    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Network(_) => ErrorKind::Network,
            ApiError::Validation(_) => ErrorKind::Validation,
            ApiError::Auth(_) => ErrorKind::Auth,
            ApiError::Server(_) => ErrorKind::Server,
        }
    }

    /// Raw message carried by the error.
    pub fn message(&self) -> &str {
        match self {
            ApiError::Network(msg)
            | ApiError::Validation(msg)
            | ApiError::Auth(msg)
            | ApiError::Server(msg) => msg,
        }
    }

    /// Text suitable for display: the gateway's own message when present,
    /// otherwise a generic retry hint.
    pub fn user_message(&self) -> &str {
        let msg = self.message().trim();
        if msg.is_empty() {
            Self::GENERIC_FAILURE
        } else {
            msg
        }
    }

    pub fn is_auth_error(&self) -> bool {
        matches!(self, ApiError::Auth(_))
    }

    /// Local refusal for an action attempted without a session.
    pub fn login_required() -> Self {
        ApiError::Auth(Self::LOGIN_REQUIRED.to_string())
    }

    /// Map a non-success HTTP status and the server's message to an error.
    pub fn from_status(status: StatusCode, message: Option<String>) -> Self {
        let msg = message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| format!("HTTP error! status: {}", status.as_u16()));

        match status.as_u16() {
            401 | 403 => ApiError::Auth(msg),
            400 | 404 | 409 | 422 => ApiError::Validation(msg),
            408 => ApiError::Network(msg),
            _ => ApiError::Server(msg),
        }
    }

    /// Map a transport failure from `reqwest`.
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Network(Self::REQUEST_TIMED_OUT.to_string())
        } else if err.is_decode() {
            ApiError::Server(format!("Invalid response from server: {}", err))
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

/// Result type alias for gateway calls
pub type Result<T> = std::result::Result<T, ApiError>;
