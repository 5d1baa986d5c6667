// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client session: the bearer token and the cached user profile.
//!
//! The token and the user are a single value (`Option<Session>`), so one can
//! never be present without the other. `SessionStore` is cheap to clone and
//! shared between the gateways (readers) and the auth flow (the only writer).

pub mod storage;

pub use storage::{FileStorage, MemoryStorage, SessionStorage, StorageError};

use crate::models::{User, UserPatch};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, PoisonError, RwLock};

/// An authenticated identity, persisted as `{"authToken": ..., "user": {...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(rename = "authToken")]
    pub token: String,
    pub user: User,
}

/// Shared, injectable session state backed by durable storage.
#[derive(Clone)]
pub struct SessionStore {
    current: Arc<RwLock<Option<Session>>>,
    storage: Arc<dyn SessionStorage>,
}

impl SessionStore {
    /// Create an empty (logged out) store over the given storage.
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        Self {
            current: Arc::new(RwLock::new(None)),
            storage,
        }
    }

    /// Create a store restoring whatever session a previous run persisted.
    ///
    /// An unreadable or corrupt record is discarded and the store starts
    /// logged out.
    pub fn restore(storage: Arc<dyn SessionStorage>) -> Self {
        let restored = match storage.load() {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(error = %e, "Discarding unreadable persisted session");
                if let Err(e) = storage.clear() {
                    tracing::warn!(error = %e, "Failed to clear persisted session");
                }
                None
            }
        };

        if let Some(session) = &restored {
            tracing::debug!(user_id = %session.user.id, "Restored persisted session");
        }

        Self {
            current: Arc::new(RwLock::new(restored)),
            storage,
        }
    }

    /// A logged-out store with process-local storage.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    /// Whether a token is present. Says nothing about server-side validity.
    pub fn check_auth(&self) -> bool {
        self.read().is_some()
    }

    pub fn token(&self) -> Option<String> {
        self.read().as_ref().map(|s| s.token.clone())
    }

    pub fn current_user(&self) -> Option<User> {
        self.read().as_ref().map(|s| s.user.clone())
    }

    pub fn snapshot(&self) -> Option<Session> {
        self.read().clone()
    }

    /// Install a new session after a successful login or signup.
    ///
    /// The in-memory session is replaced even when persisting fails; the
    /// error is returned so the caller can decide whether to warn.
    pub fn establish(&self, session: Session) -> Result<(), StorageError> {
        let persisted = self.storage.save(&session);
        tracing::info!(user_id = %session.user.id, "Session established");
        *self.write() = Some(session);
        persisted
    }

    /// Merge profile changes into the cached user, keeping the token.
    pub fn update_user(&self, patch: &UserPatch) -> Result<(), StorageError> {
        let mut current = self.write();
        match current.as_mut() {
            Some(session) => {
                session.user.apply(patch);
                self.storage.save(session)
            }
            None => Ok(()),
        }
    }

    /// Replace the cached user with a fresh copy from the server.
    pub fn replace_user(&self, user: User) -> Result<(), StorageError> {
        let mut current = self.write();
        match current.as_mut() {
            Some(session) => {
                session.user = user;
                self.storage.save(session)
            }
            None => Ok(()),
        }
    }

    /// Clear the session. Never fails; storage errors are logged.
    pub fn logout(&self) {
        *self.write() = None;
        if let Err(e) = self.storage.clear() {
            tracing::warn!(error = %e, "Failed to clear persisted session");
        }
        tracing::info!("Session cleared");
    }

    /// Clear the session because the server rejected the token.
    pub fn invalidate(&self, reason: &str) {
        tracing::warn!(reason, "Session invalidated by server");
        self.logout();
    }

    /// Clear the session only if `token` is still the current one.
    ///
    /// Returns whether the session was cleared. A rejection of a token that
    /// has since been replaced by a new login leaves the new session alone.
    pub fn invalidate_token(&self, token: &str, reason: &str) -> bool {
        let mut current = self.write();
        if current.as_ref().map(|s| s.token.as_str()) != Some(token) {
            tracing::debug!(reason, "Ignoring rejection of a replaced token");
            return false;
        }

        tracing::warn!(reason, "Session invalidated by server");
        *current = None;
        if let Err(e) = self.storage.clear() {
            tracing::warn!(error = %e, "Failed to clear persisted session");
        }
        true
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Option<Session>> {
        self.current.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Option<Session>> {
        self.current.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("authenticated", &self.check_auth())
            .finish()
    }
}
