#![forbid(unsafe_code)]

//! Key-value storage backends for the persisted appearance type.
//!
//! The store only ever touches one key, but backends are plain byte maps so
//! an application can point several registries at the same backend.
//!
//! # Backends
//!
//! - [`MemoryStorage`]: in-process map. Clones share the same map, which is
//!   how tests model "restart the app over the same storage".
//! - `FileStorage` (feature `state-persistence`): a single JSON document on
//!   disk mapping keys to base64 values.
//!
//! # File Format
//!
//! ```json
//! {
//!   "version": 1,
//!   "entries": {
//!     "designable.appearance": "ImRhcmsi"
//!   }
//! }
//! ```
//!
//! Writes use a temp-file-then-rename pattern so a crash never leaves a
//! half-written document behind.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::StorageResult;

/// Byte storage keyed by string.
///
/// All methods take `&self`; backends use interior mutability where they
/// need it, matching the single-threaded model of the registry.
pub trait StorageBackend {
    /// Short backend name used in log fields.
    fn name(&self) -> &str;

    /// Bytes stored under `key`, or `None` if the key is absent.
    fn get(&self, key: &str) -> StorageResult<Option<Vec<u8>>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &[u8]) -> StorageResult<()>;

    /// Remove `key`. Removing an absent key is not an error.
    fn delete(&self, key: &str) -> StorageResult<()>;
}

impl<S: StorageBackend + ?Sized> StorageBackend for Rc<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn get(&self, key: &str) -> StorageResult<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &[u8]) -> StorageResult<()> {
        (**self).set(key, value)
    }

    fn delete(&self, key: &str) -> StorageResult<()> {
        (**self).delete(key)
    }
}

impl<S: StorageBackend + ?Sized> StorageBackend for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn get(&self, key: &str) -> StorageResult<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &[u8]) -> StorageResult<()> {
        (**self).set(key, value)
    }

    fn delete(&self, key: &str) -> StorageResult<()> {
        (**self).delete(key)
    }
}

// ---------------------------------------------------------------------------
// MemoryStorage
// ---------------------------------------------------------------------------

/// In-memory storage. Cloning yields another handle to the same map.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    entries: Rc<RefCell<HashMap<String, Vec<u8>>>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Direct read without going through the `StorageResult` surface.
    #[must_use]
    pub fn raw(&self, key: &str) -> Option<Vec<u8>> {
        self.entries.borrow().get(key).cloned()
    }
}

impl std::fmt::Debug for MemoryStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStorage")
            .field("keys", &self.len())
            .finish()
    }
}

impl StorageBackend for MemoryStorage {
    fn name(&self) -> &str {
        "memory"
    }

    fn get(&self, key: &str) -> StorageResult<Option<Vec<u8>>> {
        Ok(self.raw(key))
    }

    fn set(&self, key: &str, value: &[u8]) -> StorageResult<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn delete(&self, key: &str) -> StorageResult<()> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// FileStorage
// ---------------------------------------------------------------------------

#[cfg(feature = "state-persistence")]
pub use file::FileStorage;

#[cfg(feature = "state-persistence")]
mod file {
    use std::collections::BTreeMap;
    use std::path::{Path, PathBuf};

    use base64::Engine as _;
    use base64::engine::general_purpose::STANDARD;
    use serde::{Deserialize, Serialize};
    use tracing::{debug, warn};

    use super::StorageBackend;
    use crate::error::{StorageError, StorageResult};

    /// Current document format version.
    const FORMAT_VERSION: u64 = 1;

    #[derive(Debug, Default, Serialize, Deserialize)]
    struct StorageDocument {
        version: u64,
        entries: BTreeMap<String, String>,
    }

    /// JSON-file storage.
    ///
    /// - **Missing file** reads as empty.
    /// - **Corrupted file** (not JSON, not UTF-8) makes `get` return
    ///   [`StorageError::Corrupted`]; the next `set` replaces the document.
    /// - **Other format version** fails every call with
    ///   [`StorageError::UnsupportedVersion`] and is left untouched.
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

        fn read_document(&self) -> StorageResult<StorageDocument> {
            if !self.path.exists() {
                return Ok(StorageDocument {
                    version: FORMAT_VERSION,
                    entries: BTreeMap::new(),
                });
            }
            let bytes = std::fs::read(&self.path)?;
            let document: StorageDocument = serde_json::from_slice(&bytes).map_err(|e| {
                StorageError::corrupted(format!("{}: {e}", self.path.display()))
            })?;
            if document.version != FORMAT_VERSION {
                return Err(StorageError::UnsupportedVersion {
                    found: document.version,
                    expected: FORMAT_VERSION,
                });
            }
            Ok(document)
        }

        /// Read the document for modification, starting over if it does not
        /// parse. A document from another format version is never replaced.
        fn read_document_for_update(&self) -> StorageResult<StorageDocument> {
            match self.read_document() {
                Ok(document) => Ok(document),
                Err(StorageError::Corrupted { message }) => {
                    warn!(path = %self.path.display(), %message, "replacing corrupted storage document");
                    Ok(StorageDocument {
                        version: FORMAT_VERSION,
                        entries: BTreeMap::new(),
                    })
                }
                Err(other) => Err(other),
            }
        }

        fn write_document(&self, document: &StorageDocument) -> StorageResult<()> {
            match self.path.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => {
                    std::fs::create_dir_all(parent)?;
                }
                _ => {}
            }
            let json = serde_json::to_string_pretty(document)?;
            let temp = self.path.with_extension("json.tmp");
            std::fs::write(&temp, json)?;
            std::fs::rename(&temp, &self.path)?;
            debug!(path = %self.path.display(), keys = document.entries.len(), "storage document written");
            Ok(())
        }
    }

    impl StorageBackend for FileStorage {
        fn name(&self) -> &str {
            "file"
        }

        fn get(&self, key: &str) -> StorageResult<Option<Vec<u8>>> {
            let document = self.read_document()?;
            document
                .entries
                .get(key)
                .map(|encoded| {
                    STANDARD.decode(encoded).map_err(|e| {
                        StorageError::corrupted(format!("value for `{key}` is not base64: {e}"))
                    })
                })
                .transpose()
        }

        fn set(&self, key: &str, value: &[u8]) -> StorageResult<()> {
            let mut document = self.read_document_for_update()?;
            document
                .entries
                .insert(key.to_string(), STANDARD.encode(value));
            self.write_document(&document)
        }

        fn delete(&self, key: &str) -> StorageResult<()> {
            let mut document = self.read_document_for_update()?;
            if document.entries.remove(key).is_some() {
                self.write_document(&document)?;
            }
            Ok(())
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_storage_clones_share_entries() {
        let storage = MemoryStorage::new();
        let other = storage.clone();
        storage.set("k", b"v").unwrap();
        assert_eq!(other.get("k").unwrap(), Some(b"v".to_vec()));

        other.delete("k").unwrap();
        assert!(storage.is_empty());
    }

    #[test]
    fn delete_of_absent_key_is_ok() {
        let storage = MemoryStorage::new();
        assert!(storage.delete("missing").is_ok());
    }

    #[test]
    fn rc_and_box_forward_to_the_backend() {
        let storage = MemoryStorage::new();
        let shared: Rc<dyn StorageBackend> = Rc::new(storage.clone());
        shared.set("k", b"rc").unwrap();
        assert_eq!(shared.name(), "memory");

        let boxed: Box<dyn StorageBackend> = Box::new(storage.clone());
        assert_eq!(boxed.get("k").unwrap(), Some(b"rc".to_vec()));
        boxed.delete("k").unwrap();
        assert_eq!(storage.raw("k"), None);
    }
}
