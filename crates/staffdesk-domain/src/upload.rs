//! Single-owner handoff of the currently uploaded file.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Proof of ownership of one uploaded file.
///
/// A token is produced by [`UploadSlot::take`] and is deliberately not
/// `Clone`: whoever holds it is the sole consumer of that upload. Dropping
/// the token consumes the upload; [`UploadSlot::restore`] hands it back when
/// a handler fails before the file was actually used.
#[derive(Debug)]
pub struct UploadToken {
    path: PathBuf,
}

impl UploadToken {
    /// The stored path of the uploaded file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Consume the token, yielding the path.
    pub fn into_path(self) -> PathBuf {
        self.path
    }
}

/// Holds at most one "uploaded, not yet consumed" file path.
///
/// This is not a queue: depositing while a path is already held silently
/// replaces it. Handlers that consume the upload call [`take`](Self::take)
/// and hold the resulting token; handlers that only need to look at the
/// path (batch, table analysis) call [`current`](Self::current) and leave
/// the slot untouched.
#[derive(Debug, Default)]
pub struct UploadSlot {
    inner: Mutex<Option<PathBuf>>,
}

impl UploadSlot {
    /// Create an empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a path, replacing any previously deposited one.
    pub fn deposit(&self, path: impl Into<PathBuf>) {
        *self.lock() = Some(path.into());
    }

    /// Peek at the held path without consuming it.
    pub fn current(&self) -> Option<PathBuf> {
        self.lock().clone()
    }

    /// True when no upload is pending.
    pub fn is_empty(&self) -> bool {
        self.lock().is_none()
    }

    /// Move the held path out as a single-owner token.
    pub fn take(&self) -> Option<UploadToken> {
        self.lock().take().map(|path| UploadToken { path })
    }

    /// Return a previously taken token to the slot.
    ///
    /// If a new upload arrived in the meantime it wins; the stale token is
    /// discarded.
    pub fn restore(&self, token: UploadToken) {
        let mut guard = self.lock();
        if guard.is_none() {
            *guard = Some(token.path);
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<PathBuf>> {
        // The Option stays coherent even after a poisoning panic.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}
