#![forbid(unsafe_code)]

//! Current appearance state and its persistence.
//!
//! # Design
//!
//! [`AppearanceStore<T, A>`] owns the active appearance type `T` and the
//! full appearance `A` derived from it by the provider. The pair is
//! resolved lazily: construction never touches storage, the first read
//! loads and decodes the persisted type, falls back to the default type on
//! anything unusable, and calls the provider once. After that, reads return
//! the cached `Rc<A>` and never recompute.
//!
//! # Invariants
//!
//! 1. A current appearance always exists; reads never fail.
//! 2. A persisted, decodable type wins over the default on first read.
//! 3. The provider runs once per resolution and once per `set_appearance`.
//! 4. `set_appearance` updates the cache before persisting, and persists by
//!    deleting the key and then writing it. A crash in between leaves the
//!    key absent, which reads back as the default.
//!
//! # Failure Modes
//!
//! - **Absent, malformed or unreadable persisted data**: silently replaced
//!   by the default type (`debug`/`warn` events, no error).
//! - **Encode failure** in `set_appearance`: returned before any state
//!   changes.
//! - **Storage failure** in `set_appearance`: returned after the cache was
//!   replaced; the in-memory state reflects the new type.
//! - **Re-entrant read from the provider**: panics (`RefCell` borrow). A
//!   provider is a pure function of the appearance type.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use tracing::{debug, warn};

use crate::appearance::AppearanceType;
use crate::codec::AppearanceCodec;
use crate::error::{DesignError, StorageResult};
use crate::storage::StorageBackend;

/// Maps an appearance type to the full appearance object.
pub type AppearanceProvider<T, A> = Box<dyn Fn(&T) -> A>;

struct Resolved<T, A> {
    kind: T,
    appearance: Rc<A>,
}

/// Holder of the current appearance type and derived appearance.
pub struct AppearanceStore<T, A> {
    provider: AppearanceProvider<T, A>,
    default_type: T,
    storage: Box<dyn StorageBackend>,
    codec: Box<dyn AppearanceCodec<T>>,
    key: String,
    current: RefCell<Option<Resolved<T, A>>>,
}

impl<T: fmt::Debug, A> fmt::Debug for AppearanceStore<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let current = self.current.borrow();
        f.debug_struct("AppearanceStore")
            .field("key", &self.key)
            .field("backend", &self.storage.name())
            .field("default_type", &self.default_type)
            .field("current_type", &current.as_ref().map(|r| &r.kind))
            .finish_non_exhaustive()
    }
}

impl<T: AppearanceType, A: 'static> AppearanceStore<T, A> {
    /// Create a store. Storage is not read until the first access.
    pub fn new(
        provider: impl Fn(&T) -> A + 'static,
        default_type: T,
        storage: impl StorageBackend + 'static,
        codec: impl AppearanceCodec<T> + 'static,
        key: impl Into<String>,
    ) -> Self {
        Self::from_parts(
            Box::new(provider),
            default_type,
            Box::new(storage),
            Box::new(codec),
            key.into(),
        )
    }

    pub(crate) fn from_parts(
        provider: AppearanceProvider<T, A>,
        default_type: T,
        storage: Box<dyn StorageBackend>,
        codec: Box<dyn AppearanceCodec<T>>,
        key: String,
    ) -> Self {
        Self {
            provider,
            default_type,
            storage,
            codec,
            key,
            current: RefCell::new(None),
        }
    }

    /// The current full appearance.
    pub fn appearance(&self) -> Rc<A> {
        self.with_current(|resolved| Rc::clone(&resolved.appearance))
    }

    /// The appearance type the current appearance was derived from.
    pub fn appearance_type(&self) -> T {
        self.with_current(|resolved| resolved.kind.clone())
    }

    /// Whether the lazy first resolution has happened.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.current.borrow().is_some()
    }

    #[must_use]
    pub fn default_type(&self) -> &T {
        &self.default_type
    }

    /// Storage key the appearance type is persisted under.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Switch to `kind`: derive the new appearance, cache it and persist
    /// the type.
    pub fn set_appearance(&self, kind: T) -> Result<Rc<A>, DesignError> {
        let appearance = Rc::new((self.provider)(&kind));
        let bytes = self.codec.encode(&kind)?;

        self.current.replace(Some(Resolved {
            kind: kind.clone(),
            appearance: Rc::clone(&appearance),
        }));

        self.persist(&bytes).map_err(|source| DesignError::Storage {
            key: self.key.clone(),
            source,
        })?;
        debug!(
            key = %self.key,
            backend = self.storage.name(),
            kind = ?kind,
            bytes = bytes.len(),
            "appearance type persisted"
        );
        Ok(appearance)
    }

    fn persist(&self, bytes: &[u8]) -> StorageResult<()> {
        self.storage.delete(&self.key)?;
        self.storage.set(&self.key, bytes)
    }

    fn with_current<R>(&self, f: impl FnOnce(&Resolved<T, A>) -> R) -> R {
        let mut current = self.current.borrow_mut();
        let resolved = current.get_or_insert_with(|| self.resolve());
        f(resolved)
    }

    fn resolve(&self) -> Resolved<T, A> {
        let kind = self
            .load_persisted_type()
            .unwrap_or_else(|| self.default_type.clone());
        let appearance = Rc::new((self.provider)(&kind));
        Resolved { kind, appearance }
    }

    fn load_persisted_type(&self) -> Option<T> {
        let bytes = match self.storage.get(&self.key) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                debug!(key = %self.key, default = ?self.default_type, "no persisted appearance type");
                return None;
            }
            Err(error) => {
                warn!(
                    key = %self.key,
                    backend = self.storage.name(),
                    %error,
                    "failed to read persisted appearance type, using default"
                );
                return None;
            }
        };
        match self.codec.decode(&bytes) {
            Some(kind) => {
                debug!(key = %self.key, kind = ?kind, "restored persisted appearance type");
                Some(kind)
            }
            None => {
                warn!(
                    key = %self.key,
                    bytes = bytes.len(),
                    "persisted appearance type is malformed, using default"
                );
                None
            }
        }
    }
}
