#![forbid(unsafe_code)]

//! Designable
//!
//! This crate provides an appearance registry for UI layers: objects
//! register for the piece of the current appearance they care about, and
//! every change of appearance type is persisted and broadcast to them.
//!
//! # Key Components
//!
//! - [`Designer`] - Shared registry: current appearance, subscribers, broadcast
//! - [`DesignManipulator`] - Registrar contract implemented by `Designer`
//! - [`Designable`] - Trait for objects styled with a sub-appearance
//! - [`AppearanceType`] - Trait for the discriminant selecting an appearance
//! - [`AppearanceStore`] - Lazily resolved, persisted current appearance
//! - [`StorageBackend`] - Byte storage for the persisted appearance type
//! - [`Transition`] - Presentation hook wrapped around animated broadcasts
//!
//! # How it fits in an application
//! The application defines an appearance-type enum, a full appearance
//! struct and a provider function mapping one to the other. Views hold a
//! clone of the `Designer`, register themselves with a projector on first
//! appearance and receive their sub-appearance whenever `set` is called.
//! The registry holds views weakly; dropping a view unregisters it.

pub mod appearance;
pub mod codec;
pub mod config;
pub mod designable;
pub mod designer;
pub mod error;
pub mod observer_list;
pub mod storage;
pub mod store;
pub mod transition;

pub use appearance::{AppearanceType, ImageRef};
pub use codec::{AppearanceCodec, JsonCodec};
pub use config::{AnimationConfig, DEFAULT_STORAGE_KEY, DesignerConfig, MAX_ANIMATION_MS};
pub use designable::{Designable, DesignableProtocol};
pub use designer::{DesignManipulator, Designer, DesignerBuilder};
pub use error::{CodecError, ConfigError, DesignError, StorageError, StorageResult};
pub use observer_list::ObserverList;
#[cfg(feature = "state-persistence")]
pub use storage::FileStorage;
pub use storage::{MemoryStorage, StorageBackend};
pub use store::{AppearanceProvider, AppearanceStore};
pub use transition::{Animation, DEFAULT_ANIMATION_DURATION, NoTransition, Transition};
