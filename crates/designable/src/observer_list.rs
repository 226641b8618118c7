#![forbid(unsafe_code)]

//! Non-owning observer registry keyed by object identity.
//!
//! # Design
//!
//! [`ObserverList<P, C>`] pairs a [`Weak<P>`] handle with a callback `C`.
//! The list never keeps an observer alive: once the last strong `Rc<P>`
//! elsewhere is dropped, the entry is dead and is skipped by every
//! traversal. Dead entries are pruned lazily on [`add_if_absent`],
//! [`prune`] and [`live_snapshot`].
//!
//! Identity is the allocation address of the observer, compared with
//! [`std::ptr::addr_eq`] so that `Rc<Concrete>` and `Rc<dyn Trait>` handles
//! to the same object compare equal.
//!
//! # Invariants
//!
//! 1. At most one **live** entry per observer identity.
//! 2. Only live entries are ever compared for identity. A dead entry's
//!    address may be reused by a new allocation and must not block it.
//! 3. Traversal order is insertion order.
//!
//! # Failure Modes
//!
//! None observable. The list performs no locking; callers own the
//! concurrency discipline (single-threaded in this crate).
//!
//! [`add_if_absent`]: ObserverList::add_if_absent
//! [`prune`]: ObserverList::prune
//! [`live_snapshot`]: ObserverList::live_snapshot

use std::fmt;
use std::rc::{Rc, Weak};

use tracing::trace;

struct ObserverEntry<P: ?Sized, C> {
    observer: Weak<P>,
    callback: C,
}

impl<P: ?Sized, C> ObserverEntry<P, C> {
    fn is_alive(&self) -> bool {
        self.observer.strong_count() > 0
    }

    fn is_same_live_object(&self, observer: &Rc<P>) -> bool {
        self.is_alive() && std::ptr::addr_eq(self.observer.as_ptr(), Rc::as_ptr(observer))
    }
}

/// Registry of weakly held observers, each with an associated callback.
pub struct ObserverList<P: ?Sized, C> {
    entries: Vec<ObserverEntry<P, C>>,
}

impl<P: ?Sized, C> Default for ObserverList<P, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: ?Sized, C> fmt::Debug for ObserverList<P, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverList")
            .field("entries", &self.len())
            .field("live", &self.live_len())
            .finish()
    }
}

impl<P: ?Sized, C> ObserverList<P, C> {
    /// Create an empty list.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Register `observer` with `callback` unless a live entry for the same
    /// object already exists.
    ///
    /// Returns `true` if the entry was inserted, `false` if the observer was
    /// already registered (in which case `callback` is dropped and the
    /// original callback is kept).
    pub fn add_if_absent(&mut self, observer: &Rc<P>, callback: C) -> bool {
        self.prune();
        if self.contains(observer) {
            return false;
        }
        self.entries.push(ObserverEntry {
            observer: Rc::downgrade(observer),
            callback,
        });
        true
    }

    /// Whether a live entry exists for `observer`.
    #[must_use]
    pub fn contains(&self, observer: &Rc<P>) -> bool {
        self.entries
            .iter()
            .any(|entry| entry.is_same_live_object(observer))
    }

    /// Invoke `action` for every entry whose observer is still alive.
    ///
    /// Each observer is upgraded for the duration of its own call only.
    pub fn for_each_live(&self, mut action: impl FnMut(&Rc<P>, &C)) {
        for entry in &self.entries {
            if let Some(observer) = entry.observer.upgrade() {
                action(&observer, &entry.callback);
            }
        }
    }

    /// Drop every entry whose observer has been deallocated.
    ///
    /// Returns the number of entries removed.
    pub fn prune(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(ObserverEntry::is_alive);
        let removed = before - self.entries.len();
        if removed > 0 {
            trace!(removed, remaining = self.entries.len(), "pruned dead observers");
        }
        removed
    }

    /// Number of stored entries, including dead ones not yet pruned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Number of entries whose observer is still alive.
    #[must_use]
    pub fn live_len(&self) -> usize {
        self.entries.iter().filter(|entry| entry.is_alive()).count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<P: ?Sized, C: Clone> ObserverList<P, C> {
    /// Prune dead entries and return strong handles to the live ones.
    ///
    /// Dispatching from the snapshot instead of from [`for_each_live`]
    /// lets callbacks re-enter the owner of the list (for example to
    /// register another observer) without a `RefCell` double borrow.
    ///
    /// [`for_each_live`]: ObserverList::for_each_live
    pub fn live_snapshot(&mut self) -> Vec<(Rc<P>, C)> {
        self.prune();
        self.entries
            .iter()
            .filter_map(|entry| {
                entry
                    .observer
                    .upgrade()
                    .map(|observer| (observer, entry.callback.clone()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    trait Named {
        fn name(&self) -> &str;
    }

    struct Label(&'static str);

    impl Named for Label {
        fn name(&self) -> &str {
            self.0
        }
    }

    fn collect_names(list: &ObserverList<dyn Named, u32>) -> Vec<(String, u32)> {
        let mut seen = Vec::new();
        list.for_each_live(|observer, tag| seen.push((observer.name().to_string(), *tag)));
        seen
    }

    #[test]
    fn add_if_absent_inserts_once_per_identity() {
        let mut list: ObserverList<dyn Named, u32> = ObserverList::new();
        let label: Rc<dyn Named> = Rc::new(Label("title"));

        assert!(list.add_if_absent(&label, 1));
        assert!(!list.add_if_absent(&label, 2));
        assert_eq!(list.len(), 1);
        assert_eq!(collect_names(&list), vec![("title".to_string(), 1)]);
    }

    #[test]
    fn equal_values_with_distinct_identity_are_distinct_entries() {
        let mut list: ObserverList<dyn Named, u32> = ObserverList::new();
        let a: Rc<dyn Named> = Rc::new(Label("same"));
        let b: Rc<dyn Named> = Rc::new(Label("same"));

        assert!(list.add_if_absent(&a, 1));
        assert!(list.add_if_absent(&b, 2));
        assert_eq!(list.live_len(), 2);
    }

    #[test]
    fn concrete_and_erased_handles_share_identity() {
        let mut list: ObserverList<dyn Named, u32> = ObserverList::new();
        let concrete = Rc::new(Label("header"));
        let erased: Rc<dyn Named> = concrete.clone();

        assert!(list.add_if_absent(&erased, 1));
        let erased_again: Rc<dyn Named> = concrete;
        assert!(list.contains(&erased_again));
        assert!(!list.add_if_absent(&erased_again, 2));
    }

    #[test]
    fn list_does_not_keep_observers_alive() {
        let mut list: ObserverList<dyn Named, u32> = ObserverList::new();
        let label: Rc<dyn Named> = Rc::new(Label("footer"));
        list.add_if_absent(&label, 7);
        assert_eq!(Rc::strong_count(&label), 1);

        drop(label);
        assert_eq!(list.len(), 1, "dead entry stays until pruned");
        assert_eq!(list.live_len(), 0);
        assert!(collect_names(&list).is_empty());

        assert_eq!(list.prune(), 1);
        assert!(list.is_empty());
    }

    #[test]
    fn dead_entry_does_not_block_reregistration() {
        let mut list: ObserverList<dyn Named, u32> = ObserverList::new();
        let first: Rc<dyn Named> = Rc::new(Label("first"));
        list.add_if_absent(&first, 1);
        drop(first);

        let second: Rc<dyn Named> = Rc::new(Label("second"));
        assert!(list.add_if_absent(&second, 2));
        assert_eq!(collect_names(&list), vec![("second".to_string(), 2)]);
        assert_eq!(list.len(), 1, "add prunes the dead entry first");
    }

    #[test]
    fn traversal_follows_insertion_order() {
        let mut list: ObserverList<dyn Named, u32> = ObserverList::new();
        let labels: Vec<Rc<dyn Named>> = ["a", "b", "c"]
            .into_iter()
            .map(|name| Rc::new(Label(name)) as Rc<dyn Named>)
            .collect();
        for (tag, label) in labels.iter().enumerate() {
            list.add_if_absent(label, tag as u32);
        }

        let names: Vec<String> = collect_names(&list).into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn live_snapshot_prunes_and_releases_the_list() {
        let list = RefCell::new(ObserverList::<dyn Named, u32>::new());
        let keep: Rc<dyn Named> = Rc::new(Label("keep"));
        let gone: Rc<dyn Named> = Rc::new(Label("gone"));
        list.borrow_mut().add_if_absent(&keep, 1);
        list.borrow_mut().add_if_absent(&gone, 2);
        drop(gone);

        let snapshot = list.borrow_mut().live_snapshot();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(list.borrow().len(), 1);

        // The snapshot holds no borrow: callbacks may mutate the list.
        for (observer, tag) in snapshot {
            let late: Rc<dyn Named> = Rc::new(Label("late"));
            assert!(list.borrow_mut().add_if_absent(&late, tag + 10));
            assert_eq!(observer.name(), "keep");
        }
    }

    #[test]
    fn debug_reports_entry_counts() {
        let mut list: ObserverList<dyn Named, u32> = ObserverList::new();
        let label: Rc<dyn Named> = Rc::new(Label("x"));
        list.add_if_absent(&label, 0);
        let dbg = format!("{list:?}");
        assert!(dbg.contains("ObserverList"));
        assert!(dbg.contains("live: 1"));
    }
}
