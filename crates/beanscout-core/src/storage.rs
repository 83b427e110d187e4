//! Durable key-value storage for the wishlist.
//!
//! The wishlist is one JSON-encoded array of ids, overwritten on every change.
//! Restoration never fails: absent or malformed content restores to an empty set.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use thiserror::Error;

use crate::selection::{decode_wishlist, encode_wishlist};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode wishlist: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Backend holding the raw encoded wishlist.
pub trait WishlistStorage {
    /// Returns the stored blob, or `None` if nothing has been written yet.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the backend cannot be read.
    fn load(&self) -> Result<Option<String>, StorageError>;

    /// Replaces the stored blob.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the backend cannot be written.
    fn save(&self, encoded: &str) -> Result<(), StorageError>;
}

/// Single JSON file on disk.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}

impl WishlistStorage for FileStorage {
    fn load(&self) -> Result<Option<String>, StorageError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.io_error(e)),
        }
    }

    fn save(&self, encoded: &str) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        // Write then rename so a crash never leaves a half-written file behind.
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, encoded).map_err(|e| self.io_error(e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| self.io_error(e))
    }
}

/// In-process storage for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    value: Mutex<Option<String>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn with_content(content: &str) -> Self {
        Self {
            value: Mutex::new(Some(content.to_string())),
        }
    }
}

impl WishlistStorage for MemoryStorage {
    fn load(&self) -> Result<Option<String>, StorageError> {
        Ok(self
            .value
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone())
    }

    fn save(&self, encoded: &str) -> Result<(), StorageError> {
        *self
            .value
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(encoded.to_string());
        Ok(())
    }
}

impl<S: WishlistStorage + ?Sized> WishlistStorage for &S {
    fn load(&self) -> Result<Option<String>, StorageError> {
        (**self).load()
    }

    fn save(&self, encoded: &str) -> Result<(), StorageError> {
        (**self).save(encoded)
    }
}

/// Reads the persisted wishlist; unreadable or malformed content yields an empty set.
pub fn restore_wishlist<S: WishlistStorage>(storage: &S) -> BTreeSet<String> {
    let raw = match storage.load() {
        Ok(Some(raw)) => raw,
        Ok(None) => return BTreeSet::new(),
        Err(e) => {
            tracing::warn!(error = %e, "wishlist storage unreadable; starting with an empty wishlist");
            return BTreeSet::new();
        }
    };

    decode_wishlist(&raw).unwrap_or_else(|| {
        tracing::warn!("stored wishlist is malformed; starting with an empty wishlist");
        BTreeSet::new()
    })
}

/// Overwrites the persisted wishlist with `wishlist`.
///
/// # Errors
///
/// Returns [`StorageError`] if encoding or the backend write fails.
pub fn persist_wishlist<S: WishlistStorage>(
    storage: &S,
    wishlist: &BTreeSet<String>,
) -> Result<(), StorageError> {
    let encoded = encode_wishlist(wishlist)?;
    storage.save(&encoded)
}
