// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Durable session storage backends.
//!
//! Provides:
//! - `FileStorage` (single JSON document, replaced atomically)
//! - `MemoryStorage` (process-local, for tests and ephemeral sessions)

use super::Session;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// File contents meaning "no session".
const LOGGED_OUT_RECORD: &[u8] = b"null";

/// Errors from reading or writing persisted sessions.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Session storage I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Corrupt session record: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Durable home of the token/user pair.
///
/// Implementations must write and clear both halves together: a reader never
/// observes a token without its user or the reverse.
pub trait SessionStorage: Send + Sync {
    fn load(&self) -> Result<Option<Session>, StorageError>;
    fn save(&self, session: &Session) -> Result<(), StorageError>;
    fn clear(&self) -> Result<(), StorageError>;
}

/// Session persisted as one JSON file.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "session".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl SessionStorage for FileStorage {
    fn load(&self) -> Result<Option<Session>, StorageError> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        // `null` is the logged-out record left when the file could not be removed.
        Ok(serde_json::from_str(&data)?)
    }

    fn save(&self, session: &Session) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        // Rename is atomic within a directory, so readers see the old pair or the new one.
        let tmp = self.temp_path();
        fs::write(&tmp, serde_json::to_vec_pretty(session)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        let err = match fs::remove_file(&self.path) {
            Ok(()) => return Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(e) => e,
        };

        // Could not unlink (e.g. read-only directory): blank the record instead
        // so the old pair is never restored.
        tracing::warn!(path = %self.path.display(), error = %err, "Failed to remove session file, overwriting it");
        fs::write(&self.path, LOGGED_OUT_RECORD)?;
        Ok(())
    }
}

/// In-process storage; nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slot: Mutex<Option<Session>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-seeded with a session, as if left by a previous run.
    pub fn with_session(session: Session) -> Self {
        Self {
            slot: Mutex::new(Some(session)),
        }
    }
}

impl SessionStorage for MemoryStorage {
    fn load(&self) -> Result<Option<Session>, StorageError> {
        Ok(self
            .slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn save(&self, session: &Session) -> Result<(), StorageError> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}
