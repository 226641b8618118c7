//! End-to-end lifecycle of a designer over shared storage.
//!
//! Covers the first-run path (nothing persisted), registration with an
//! immediate delivery, a change of appearance type, and a restart of the
//! application over the same storage.

use std::cell::RefCell;
use std::rc::Rc;

use designable::{
    AppearanceCodec, AppearanceType, DEFAULT_STORAGE_KEY, DesignManipulator, Designable, Designer,
    JsonCodec, MemoryStorage, StorageBackend,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Kind {
    Light,
    Dark,
    Graphite,
}

impl AppearanceType for Kind {
    fn name(&self) -> Option<&str> {
        Some(match self {
            Self::Light => "Light",
            Self::Dark => "Dark",
            Self::Graphite => "Graphite",
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Appearance {
    bg: &'static str,
}

fn provider(kind: &Kind) -> Appearance {
    match kind {
        Kind::Light => Appearance { bg: "#F8F5F1" },
        Kind::Dark => Appearance { bg: "#252525" },
        Kind::Graphite => Appearance { bg: "#393E46" },
    }
}

#[derive(Default)]
struct Background {
    received: RefCell<Vec<String>>,
}

impl Designable for Background {
    type Appearance = String;

    fn design(&self, bg: &String) {
        self.received.borrow_mut().push(bg.clone());
    }
}

fn bg(appearance: &Appearance) -> String {
    appearance.bg.to_string()
}

#[test]
fn light_dark_restart_scenario() {
    let storage = MemoryStorage::new();

    // (1) fresh install
    let designer = Designer::new(provider, Kind::Light, storage.clone());
    assert_eq!(designer.appearance().bg, "#F8F5F1");
    assert_eq!(designer.appearance_type(), Kind::Light);
    assert!(storage.is_empty(), "reads never write");

    // (2) register with immediate delivery
    let consumer = Rc::new(Background::default());
    designer.add(&consumer, bg);
    assert_eq!(*consumer.received.borrow(), vec!["#F8F5F1"]);

    // (3) switch to dark
    designer.set(Kind::Dark);
    assert_eq!(
        storage.raw(DEFAULT_STORAGE_KEY),
        Some(b"\"dark\"".to_vec()),
        "persisted as the JSON encoding of the type"
    );
    assert_eq!(*consumer.received.borrow(), vec!["#F8F5F1", "#252525"]);

    // (4) restart over the same storage
    drop(designer);
    let restarted = Designer::new(provider, Kind::Light, storage.clone());
    assert_eq!(restarted.appearance().bg, "#252525");
    assert_eq!(restarted.appearance_type(), Kind::Dark);
}

#[test]
fn idempotent_registration_keeps_first_projector() {
    let designer = Designer::new(provider, Kind::Light, MemoryStorage::new());
    let consumer = Rc::new(Background::default());

    designer.add(&consumer, bg);
    designer.add(&consumer, |a: &Appearance| format!("second:{}", a.bg));
    assert_eq!(designer.observer_count(), 1);
    assert_eq!(
        *consumer.received.borrow(),
        vec!["#F8F5F1", "second:#F8F5F1"]
    );

    designer.set(Kind::Graphite);
    assert_eq!(consumer.received.borrow().last().map(String::as_str), Some("#393E46"));
}

#[test]
fn fallback_covers_absent_malformed_and_valid_data() {
    let absent = MemoryStorage::new();
    let designer = Designer::new(provider, Kind::Light, absent);
    assert_eq!(*designer.appearance(), provider(&Kind::Light));

    let malformed = MemoryStorage::new();
    malformed
        .set(DEFAULT_STORAGE_KEY, b"\"sepia\"")
        .expect("memory set");
    let designer = Designer::new(provider, Kind::Light, malformed);
    assert_eq!(*designer.appearance(), provider(&Kind::Light));

    let garbage = MemoryStorage::new();
    garbage
        .set(DEFAULT_STORAGE_KEY, &[0xff, 0x00, 0x13])
        .expect("memory set");
    let designer = Designer::new(provider, Kind::Dark, garbage);
    assert_eq!(*designer.appearance(), provider(&Kind::Dark));

    let valid = MemoryStorage::new();
    valid
        .set(DEFAULT_STORAGE_KEY, b"\"graphite\"")
        .expect("memory set");
    let designer = Designer::new(provider, Kind::Light, valid);
    assert_eq!(*designer.appearance(), provider(&Kind::Graphite));
}

#[test]
fn broadcast_skips_dropped_consumers() {
    let designer = Designer::new(provider, Kind::Light, MemoryStorage::new());
    let survivors: Vec<Rc<Background>> = (0..3).map(|_| Rc::new(Background::default())).collect();
    for consumer in &survivors {
        designer.add_with(consumer, bg, false);
    }
    {
        let short_lived = Rc::new(Background::default());
        designer.add_with(&short_lived, bg, false);
        assert_eq!(designer.live_observer_count(), 4);
    }
    assert_eq!(designer.live_observer_count(), 3);

    designer.set(Kind::Dark);
    for consumer in &survivors {
        assert_eq!(*consumer.received.borrow(), vec!["#252525"]);
    }
    assert_eq!(designer.observer_count(), 3);
}

#[test]
fn every_kind_round_trips_through_codec_and_storage() {
    let codec = JsonCodec::<Kind>::new();
    for kind in [Kind::Light, Kind::Dark, Kind::Graphite] {
        let bytes = codec.encode(&kind).expect("encode");
        assert_eq!(codec.decode(&bytes), Some(kind));

        let storage = MemoryStorage::new();
        Designer::new(provider, Kind::Light, storage.clone()).set(kind);
        let fresh = Designer::new(provider, Kind::Light, storage);
        assert_eq!(*fresh.appearance(), provider(&kind));
        assert_eq!(fresh.appearance_type().name(), kind.name());
    }
}
