//! Per-player mastery counters, persisted as one JSON object under a fixed key.
//!
//! The in-memory map is authoritative for the session. Storage failures are
//! logged and remembered in [`ProgressStore::last_error`], never propagated.
//!
//! A failed read does not mean the stored blob is bad, so nothing is written
//! until a later read succeeds and its entries are merged underneath the
//! session's own changes.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::quiz_engine::{
    error::StoreError,
    models::Mastery,
    storage::KeyValueStore,
};

pub struct ProgressStore<S: KeyValueStore> {
    store: S,
    key: String,
    counters: BTreeMap<String, Mastery>,
    last_error: Option<StoreError>,
    /// Storage could not be read; writes are held back until it can.
    unread: bool,
}

impl<S: KeyValueStore> ProgressStore<S> {
    /// Read the persisted map; a missing key or unreadable blob starts empty.
    pub fn load(store: S, key: impl Into<String>) -> Self {
        let mut progress = ProgressStore {
            store,
            key: key.into(),
            counters: BTreeMap::new(),
            last_error: None,
            unread: false,
        };
        progress.reload();
        progress
    }

    /// Replace the in-memory map with what storage currently holds.
    pub fn reload(&mut self) {
        self.unread = false;
        self.counters = match self.store.get(&self.key) {
            Ok(Some(text)) => match decode(&text) {
                Ok(map) => map,
                Err(e) => {
                    log::warn!("Discarding unreadable progress under {}: {}", self.key, e);
                    self.last_error = Some(e.into());
                    BTreeMap::new()
                }
            },
            Ok(None) => BTreeMap::new(),
            Err(e) => {
                log::warn!("Progress storage unavailable, starting empty: {}", e);
                self.last_error = Some(e);
                self.unread = true;
                BTreeMap::new()
            }
        };
        log::info!("Progress loaded: {} players tracked", self.counters.len());
    }

    /// Mastery of `id`; unknown ids are new.
    pub fn get(&self, id: &str) -> Mastery {
        self.counters.get(id).copied().unwrap_or(Mastery::NEW)
    }

    /// Count one correct answer (saturating) and persist.
    pub fn increment(&mut self, id: &str) -> Mastery {
        let next = self.get(id).bumped();
        self.counters.insert(id.to_string(), next);
        self.persist();
        next
    }

    /// Set each listed id back to 0 and persist. Other ids are untouched.
    pub fn reset_for<I, T>(&mut self, ids: I)
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        for id in ids {
            self.counters.insert(id.as_ref().to_string(), Mastery::NEW);
        }
        self.persist();
    }

    /// How many of `ids` are learned.
    pub fn learned_count<I, T>(&self, ids: I) -> usize
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        ids.into_iter().filter(|id| self.get(id.as_ref()).is_learned()).count()
    }

    /// Most recent persistence failure, if any.
    pub fn last_error(&self) -> Option<&StoreError> {
        self.last_error.as_ref()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// True while the stored blob has not been read yet this session.
    pub fn is_holding_writes(&self) -> bool {
        self.unread
    }

    /// Retry a failed read and merge the stored entries under ours.
    fn catch_up(&mut self) -> bool {
        match self.store.get(&self.key) {
            Ok(Some(text)) => match decode(&text) {
                Ok(stored) => {
                    for (id, mastery) in stored {
                        self.counters.entry(id).or_insert(mastery);
                    }
                }
                Err(e) => log::warn!("Overwriting unreadable progress under {}: {}", self.key, e),
            },
            Ok(None) => {}
            Err(e) => {
                log::warn!("Progress storage still unreadable, not saving: {}", e);
                self.last_error = Some(e);
                return false;
            }
        }
        self.unread = false;
        true
    }

    fn persist(&mut self) {
        if self.unread && !self.catch_up() {
            return;
        }
        let blob = match serde_json::to_string(&self.counters) {
            Ok(blob) => blob,
            Err(e) => {
                log::error!("Could not encode progress: {}", e);
                self.last_error = Some(e.into());
                return;
            }
        };
        let result = match self.store.set(&self.key, &blob) {
            Err(e) if e.is_recoverable() => {
                log::debug!("Retrying progress write after: {}", e);
                self.store.set(&self.key, &blob)
            }
            other => other,
        };
        match result {
            Ok(()) => self.last_error = None,
            Err(e) => {
                log::warn!("Could not persist progress under {}: {}", self.key, e);
                self.last_error = Some(e);
            }
        }
    }
}

/// Decode the stored blob, clamping counters into range.
fn decode(text: &str) -> Result<BTreeMap<String, Mastery>, serde_json::Error> {
    let raw: BTreeMap<String, Value> = serde_json::from_str(text)?;
    let mut out = BTreeMap::new();
    for (id, value) in raw {
        match value.as_f64().filter(|v| v.is_finite()) {
            Some(v) => {
                out.insert(id, Mastery::new(v.clamp(0.0, 2.0) as u8));
            }
            None => log::warn!("Dropping non-numeric progress entry for {}", id),
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz_engine::storage::MemoryStore;

    /// Store whose writes always fail.
    #[derive(Default)]
    struct BrokenStore {
        seed: Option<String>,
    }

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Ok(self.seed.clone())
        }
        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Unavailable { reason: "quota exceeded".into() })
        }
    }

    /// Backing map whose reads fail while `reads_fail` is set.
    #[derive(Default)]
    struct FlakyStore {
        inner: MemoryStore,
        reads_fail: bool,
        write_failures_left: u32,
    }

    impl KeyValueStore for FlakyStore {
        fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            if self.reads_fail {
                return Err(StoreError::Unavailable { reason: "locked".into() });
            }
            self.inner.get(key)
        }
        fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
            if self.write_failures_left > 0 {
                self.write_failures_left -= 1;
                return Err(StoreError::Io(std::io::Error::new(std::io::ErrorKind::Interrupted, "busy")));
            }
            self.inner.set(key, value)
        }
    }

    fn flaky(blob: &str) -> FlakyStore {
        FlakyStore { inner: seeded(blob), reads_fail: true, write_failures_left: 0 }
    }

    fn seeded(blob: &str) -> MemoryStore {
        let mut store = MemoryStore::new();
        store.set("blsl_quiz", blob).unwrap();
        store
    }

    #[test]
    fn missing_key_starts_empty() {
        let p = ProgressStore::load(MemoryStore::new(), "blsl_quiz");
        assert_eq!(p.get("A::P1"), Mastery::NEW);
        assert!(p.last_error().is_none());
    }

    #[test]
    fn increment_saturates_and_persists() {
        let mut p = ProgressStore::load(MemoryStore::new(), "blsl_quiz");
        assert_eq!(p.increment("A::P1").value(), 1);
        assert_eq!(p.increment("A::P1").value(), 2);
        assert_eq!(p.increment("A::P1").value(), 2);

        let blob = p.store().get("blsl_quiz").unwrap().unwrap();
        assert_eq!(blob, r#"{"A::P1":2}"#);
    }

    #[test]
    fn reset_for_only_touches_listed_ids() {
        let mut p = ProgressStore::load(seeded(r#"{"A::P1":2,"A::P2":1,"B::Q1":2}"#), "blsl_quiz");
        p.reset_for(["A::P1", "A::P2"]);
        assert_eq!(p.get("A::P1"), Mastery::NEW);
        assert_eq!(p.get("A::P2"), Mastery::NEW);
        assert_eq!(p.get("B::Q1"), Mastery::LEARNED);
    }

    #[test]
    fn round_trips_through_storage() {
        let mut p = ProgressStore::load(MemoryStore::new(), "blsl_quiz");
        p.increment("A::P1");
        p.increment("B::Q1");
        p.increment("B::Q1");

        let reloaded = ProgressStore::load(p.store().clone(), "blsl_quiz");
        assert_eq!(reloaded.get("A::P1").value(), 1);
        assert_eq!(reloaded.get("B::Q1"), Mastery::LEARNED);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let p = ProgressStore::load(seeded(r#"{"a":7,"b":-3,"c":1.0,"d":"x"}"#), "blsl_quiz");
        assert_eq!(p.get("a"), Mastery::LEARNED);
        assert_eq!(p.get("b"), Mastery::NEW);
        assert_eq!(p.get("c").value(), 1);
        assert_eq!(p.get("d"), Mastery::NEW);
    }

    #[test]
    fn corrupt_blob_starts_empty_with_warning() {
        let p = ProgressStore::load(seeded("not json"), "blsl_quiz");
        assert_eq!(p.get("a"), Mastery::NEW);
        assert!(matches!(p.last_error(), Some(StoreError::Serialization(_))));
    }

    #[test]
    fn write_failure_keeps_memory_authoritative() {
        let mut p = ProgressStore::load(BrokenStore::default(), "blsl_quiz");
        assert_eq!(p.increment("A::P1").value(), 1);
        assert_eq!(p.get("A::P1").value(), 1);
        assert!(matches!(p.last_error(), Some(StoreError::Unavailable { .. })));
    }

    #[test]
    fn learned_count_over_subset() {
        let p = ProgressStore::load(seeded(r#"{"a":2,"b":1,"c":2}"#), "blsl_quiz");
        assert_eq!(p.learned_count(["a", "b"]), 1);
        assert_eq!(p.learned_count(["a", "b", "c", "zzz"]), 2);
    }

    #[test]
    fn failed_read_never_overwrites_stored_progress() {
        let stored = r#"{"A::P1":2,"A::P2":2,"B::Q1":2}"#;
        let mut p = ProgressStore::load(flaky(stored), "blsl_quiz");
        assert!(p.is_holding_writes());
        assert!(matches!(p.last_error(), Some(StoreError::Unavailable { .. })));

        assert_eq!(p.increment("C::Solo").value(), 1);
        assert_eq!(p.store().inner.get("blsl_quiz").unwrap().as_deref(), Some(stored));
        assert_eq!(p.get("C::Solo").value(), 1);
    }

    #[test]
    fn recovered_read_merges_before_writing() {
        let mut p = ProgressStore::load(flaky(r#"{"A::P1":2,"C::Solo":2}"#), "blsl_quiz");
        p.increment("C::Solo");

        p.store.reads_fail = false;
        p.increment("B::Q1");
        assert!(!p.is_holding_writes());
        assert_eq!(p.get("A::P1"), Mastery::LEARNED);
        // This session's own count wins over the stored one.
        assert_eq!(p.get("C::Solo").value(), 1);

        let blob = p.store().inner.get("blsl_quiz").unwrap().unwrap();
        assert_eq!(blob, r#"{"A::P1":2,"B::Q1":1,"C::Solo":1}"#);
    }

    #[test]
    fn recoverable_write_failure_is_retried_once() {
        let mut store = flaky("{}");
        store.reads_fail = false;
        store.write_failures_left = 1;
        let mut p = ProgressStore::load(store, "blsl_quiz");
        p.increment("A::P1");
        assert!(p.last_error().is_none());
        assert_eq!(p.store().inner.get("blsl_quiz").unwrap().as_deref(), Some(r#"{"A::P1":1}"#));

        p.store.write_failures_left = 2;
        p.increment("A::P1");
        assert!(matches!(p.last_error(), Some(StoreError::Io(_))));
        assert_eq!(p.get("A::P1"), Mastery::LEARNED);
    }
}
