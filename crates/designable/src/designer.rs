#![forbid(unsafe_code)]

//! Appearance registrar: subscription and broadcast API for UI elements.
//!
//! # Design
//!
//! A [`Designer<T, A>`] composes an [`AppearanceStore`] (current appearance
//! plus persistence) with an [`ObserverList`] of weakly held consumers.
//! Each consumer is registered together with a *design block*: a closure
//! capturing the consumer's projector, which picks the consumer's
//! sub-appearance out of the full appearance `A` and delivers it through
//! [`DesignableProtocol::design_any`].
//!
//! Cloning a `Designer` creates a new handle to the **same** registry. An
//! application builds one designer and passes clones to the views that
//! need it.
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use designable::{AppearanceType, DesignManipulator, Designable, Designer, MemoryStorage};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
//! enum Theme { Light, Dark }
//! impl AppearanceType for Theme {}
//!
//! struct Palette { background: u32 }
//!
//! #[derive(Default)]
//! struct Screen { background: Cell<u32> }
//!
//! impl Designable for Screen {
//!     type Appearance = u32;
//!     fn design(&self, background: &u32) {
//!         self.background.set(*background);
//!     }
//! }
//!
//! let designer = Designer::new(
//!     |theme: &Theme| match theme {
//!         Theme::Light => Palette { background: 0xF8F5F1 },
//!         Theme::Dark => Palette { background: 0x252525 },
//!     },
//!     Theme::Light,
//!     MemoryStorage::new(),
//! );
//!
//! let screen = Rc::new(Screen::default());
//! designer.add(&screen, |palette: &Palette| palette.background);
//! assert_eq!(screen.background.get(), 0xF8F5F1);
//!
//! designer.set(Theme::Dark);
//! assert_eq!(screen.background.get(), 0x252525);
//! ```
//!
//! # Invariants
//!
//! 1. At most one live registration per consumer object; re-adding is a
//!    no-op for storage, but `immediate_call` still delivers using the
//!    projector of that call.
//! 2. Every `set_with` delivers to every live consumer exactly once.
//! 3. Dropped consumers are never delivered to and are pruned lazily.
//! 4. The store (cache and persistence) is updated before the transition
//!    runs the broadcast.
//!
//! # Failure Modes
//!
//! - **Encode or persist failure** in `set_with`: fatal. The error is
//!   logged and the call panics. Appearance types must always be encodable
//!   and the storage writable; there is no meaningful recovery for a UI.
//! - **Re-entrancy**: consumers may read [`Designer::appearance`], call
//!   `add`, or even `set` from inside `design`. The broadcast iterates a
//!   snapshot of live consumers taken before the transition starts, so
//!   consumers added during a broadcast are first reached by the next one.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, error, info, info_span};
use web_time::Instant;

use crate::appearance::AppearanceType;
use crate::codec::{AppearanceCodec, JsonCodec};
use crate::config::DesignerConfig;
use crate::designable::{Designable, DesignableProtocol};
use crate::observer_list::ObserverList;
use crate::storage::{MemoryStorage, StorageBackend};
use crate::store::{AppearanceProvider, AppearanceStore};
use crate::transition::{Animation, NoTransition, Transition};

/// Projects the full appearance for one consumer and delivers it.
type DesignBlock<A> = Rc<dyn Fn(&dyn DesignableProtocol, &A)>;

/// Registrar contract: observe appearance changes and push them to views.
pub trait DesignManipulator {
    /// Discriminant selecting the active appearance.
    type AppearanceType: AppearanceType;

    /// Full appearance object derived from the discriminant.
    type Appearance;

    /// Currently active appearance.
    fn appearance(&self) -> Rc<Self::Appearance>;

    /// Whether the application follows the platform light/dark setting.
    /// Default is `true`.
    fn is_system_appearance_enabled(&self) -> bool {
        true
    }

    /// Presentation used by [`set`](Self::set). Default animates over
    /// 250 ms.
    fn default_animation(&self) -> Animation {
        Animation::default()
    }

    /// Register `designable` for the sub-appearance selected by
    /// `projector`.
    ///
    /// Registration is add-if-absent. When `immediate_call` is true, the
    /// current appearance is delivered right away through this call's
    /// projector, whether or not the consumer was already registered.
    fn add_with<D, F>(&self, designable: &Rc<D>, projector: F, immediate_call: bool)
    where
        D: Designable,
        F: Fn(&Self::Appearance) -> D::Appearance + 'static;

    /// Switch to `kind`, persist it, and broadcast to every live consumer.
    fn set_with(&self, kind: Self::AppearanceType, animation: Animation);

    /// [`add_with`](Self::add_with) with an immediate call.
    fn add<D, F>(&self, designable: &Rc<D>, projector: F)
    where
        D: Designable,
        F: Fn(&Self::Appearance) -> D::Appearance + 'static,
    {
        self.add_with(designable, projector, true);
    }

    /// [`set_with`](Self::set_with) using the default animation.
    fn set(&self, kind: Self::AppearanceType) {
        self.set_with(kind, self.default_animation());
    }
}

struct DesignerInner<T, A> {
    store: AppearanceStore<T, A>,
    observers: RefCell<ObserverList<dyn DesignableProtocol, DesignBlock<A>>>,
    transition: Box<dyn Transition>,
    config: DesignerConfig,
}

/// Shared appearance registry. See the [module docs](self).
pub struct Designer<T, A> {
    inner: Rc<DesignerInner<T, A>>,
}

// Manual Clone: shares the same Rc.
impl<T, A> Clone for Designer<T, A> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug, A> fmt::Debug for Designer<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Designer")
            .field("store", &self.inner.store)
            .field("observers", &*self.inner.observers.borrow())
            .field("config", &self.inner.config)
            .finish()
    }
}

impl<T, A> Designer<T, A>
where
    T: AppearanceType + Serialize + DeserializeOwned,
    A: 'static,
{
    /// Designer persisting to `storage` with the JSON codec, no transition
    /// and the default config.
    pub fn new(
        provider: impl Fn(&T) -> A + 'static,
        default_type: T,
        storage: impl StorageBackend + 'static,
    ) -> Self {
        Self::builder(provider, default_type)
            .storage(storage)
            .build()
    }

    /// Start building a designer that encodes appearance types as JSON.
    pub fn builder(
        provider: impl Fn(&T) -> A + 'static,
        default_type: T,
    ) -> DesignerBuilder<T, A> {
        DesignerBuilder::with_codec(provider, default_type, JsonCodec::<T>::new())
    }
}

impl<T: AppearanceType, A: 'static> Designer<T, A> {
    /// Appearance type behind the current appearance.
    pub fn appearance_type(&self) -> T {
        self.inner.store.appearance_type()
    }

    #[must_use]
    pub fn config(&self) -> &DesignerConfig {
        &self.inner.config
    }

    /// Stored registrations, including dropped consumers not yet pruned.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.inner.observers.borrow().len()
    }

    /// Registrations whose consumer is still alive.
    #[must_use]
    pub fn live_observer_count(&self) -> usize {
        self.inner.observers.borrow().live_len()
    }

    /// Whether `designable` currently has a live registration.
    pub fn is_registered<D: Designable>(&self, designable: &Rc<D>) -> bool {
        let observer: Rc<dyn DesignableProtocol> = designable.clone();
        self.inner.observers.borrow().contains(&observer)
    }

    fn broadcast(&self, animation: Animation) {
        let targets = self.inner.observers.borrow_mut().live_snapshot();
        let observers = targets.len() as u64;

        let mut deliver = || {
            for (observer, block) in &targets {
                let appearance = self.inner.store.appearance();
                block(&**observer, &*appearance);
            }
        };

        let propagation_start = Instant::now();
        let span = info_span!(
            "designable.broadcast",
            observers,
            animated = animation.is_animated(),
            duration_us = tracing::field::Empty
        )
        .entered();

        match animation {
            Animation::Animated(duration) => self.inner.transition.animate(duration, &mut deliver),
            Animation::Immediate => self.inner.transition.immediate(&mut deliver),
        }

        let duration_us = propagation_start.elapsed().as_micros() as u64;
        span.record("duration_us", duration_us);
        info!(
            designable_broadcast_duration_us = duration_us,
            observers,
            "appearance broadcast complete"
        );
    }
}

impl<T: AppearanceType, A: 'static> DesignManipulator for Designer<T, A> {
    type AppearanceType = T;
    type Appearance = A;

    fn appearance(&self) -> Rc<A> {
        self.inner.store.appearance()
    }

    fn is_system_appearance_enabled(&self) -> bool {
        self.inner.config.system_appearance_enabled
    }

    fn default_animation(&self) -> Animation {
        self.inner.config.animation.to_animation()
    }

    fn add_with<D, F>(&self, designable: &Rc<D>, projector: F, immediate_call: bool)
    where
        D: Designable,
        F: Fn(&Self::Appearance) -> D::Appearance + 'static,
    {
        let block: DesignBlock<A> =
            Rc::new(move |target: &dyn DesignableProtocol, appearance: &A| {
                let projected = projector(appearance);
                target.design_any(&projected);
            });
        let observer: Rc<dyn DesignableProtocol> = designable.clone();

        let inserted = self
            .inner
            .observers
            .borrow_mut()
            .add_if_absent(&observer, Rc::clone(&block));
        debug!(
            inserted,
            observers = self.observer_count(),
            consumer = std::any::type_name::<D>(),
            "designable registered"
        );

        if immediate_call {
            let appearance = self.appearance();
            block(&*observer, &*appearance);
        }
    }

    fn set_with(&self, kind: T, animation: Animation) {
        if let Err(err) = self.inner.store.set_appearance(kind.clone()) {
            error!(kind = ?kind, error = %err, "failed to apply appearance");
            panic!("designable: cannot apply appearance {kind:?}: {err}");
        }
        debug!(kind = ?kind, ?animation, "appearance changed");
        self.broadcast(animation);
    }
}

/// Builder for [`Designer`].
pub struct DesignerBuilder<T, A> {
    provider: AppearanceProvider<T, A>,
    default_type: T,
    codec: Box<dyn AppearanceCodec<T>>,
    storage: Option<Box<dyn StorageBackend>>,
    transition: Box<dyn Transition>,
    config: DesignerConfig,
}

impl<T: AppearanceType, A: 'static> DesignerBuilder<T, A> {
    /// Start building a designer with an explicit codec.
    pub fn with_codec(
        provider: impl Fn(&T) -> A + 'static,
        default_type: T,
        codec: impl AppearanceCodec<T> + 'static,
    ) -> Self {
        Self {
            provider: Box::new(provider),
            default_type,
            codec: Box::new(codec),
            storage: None,
            transition: Box::new(NoTransition),
            config: DesignerConfig::default(),
        }
    }

    /// Persist the appearance type in `storage`. Without it the designer
    /// keeps its state in memory only.
    #[must_use]
    pub fn storage(mut self, storage: impl StorageBackend + 'static) -> Self {
        self.storage = Some(Box::new(storage));
        self
    }

    #[must_use]
    pub fn codec(mut self, codec: impl AppearanceCodec<T> + 'static) -> Self {
        self.codec = Box::new(codec);
        self
    }

    /// Presentation hook for animated broadcasts.
    #[must_use]
    pub fn transition(mut self, transition: impl Transition + 'static) -> Self {
        self.transition = Box::new(transition);
        self
    }

    #[must_use]
    pub fn config(mut self, config: DesignerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Designer<T, A> {
        let storage = self.storage.unwrap_or_else(|| {
            debug!("no storage configured, appearance type will not persist");
            Box::new(MemoryStorage::new())
        });
        let store = AppearanceStore::from_parts(
            self.provider,
            self.default_type,
            storage,
            self.codec,
            self.config.storage_key.clone(),
        );
        Designer {
            inner: Rc::new(DesignerInner {
                store,
                observers: RefCell::new(ObserverList::new()),
                transition: self.transition,
                config: self.config,
            }),
        }
    }
}
