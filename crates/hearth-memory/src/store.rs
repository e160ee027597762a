//! Memory Event Store.
//!
//! The authoritative collection of [`MemoryEvent`]s.  Every mutation goes
//! through [`MemoryEventStore`], which re-encodes the whole collection and
//! writes it to a single durable slot afterwards.
//!
//! # Load protocol
//!
//! [`MemoryEventStore::load`] reads the slot once:
//!
//! 1. slot absent → seed the sample events and persist them immediately;
//! 2. slot present and decodable → adopt the decoded list;
//! 3. slot present but undecodable → log, seed and persist (the bad blob is
//!    overwritten);
//! 4. slot unreadable → log and seed in memory only, leaving the slot as is.
//!
//! After case 4 the slot contents are unknown.  The first write re-reads
//! the slot: a decodable blob found there is kept, the seeded samples are
//! dropped, and events added since load are appended to it.  If the slot
//! still cannot be read the write is refused and the error returned.
//!
//! # Failure policy
//!
//! Mutations always apply in memory.  If persisting afterwards fails, the
//! error is logged and returned, but the in-memory change is not rolled
//! back, so memory and disk may differ until the next successful write.
//!
//! # Ordering
//!
//! Queries return events by represented date, newest first.  Events sharing
//! a date are ordered by creation time (newest first) and then by
//! identifier, so the order is total.
//!
//! # Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use hearth_memory::{MemoryEventStore, SeedReason, StoreOrigin, slot::SqliteSlotStore};
//! use hearth_types::MemoryEvent;
//!
//! let slots = SqliteSlotStore::open_in_memory().unwrap();
//! let mut store = MemoryEventStore::load(slots);
//! assert_eq!(store.origin(), StoreOrigin::Seeded(SeedReason::SlotAbsent));
//! assert_eq!(store.len(), 5);
//!
//! let event = MemoryEvent::new(
//!     "妈妈",
//!     NaiveDate::from_ymd_opt(2024, 2, 10).unwrap(),
//!     "除夕",
//!     "一起看春晚。",
//! );
//! store.add_event(event.clone()).unwrap();
//! assert_eq!(store.events_for("妈妈")[0], &event);
//!
//! // Simulate a restart from the same slot.
//! let store = MemoryEventStore::load(store.into_slot());
//! assert_eq!(store.origin(), StoreOrigin::Restored);
//! assert_eq!(store.get(event.id()), Some(&event));
//! ```

use std::cmp::Ordering;

use hearth_types::{EventId, MemoryEvent};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::codec::{self, CodecError};
use crate::samples::sample_events;
use crate::slot::{SlotError, SlotStore, SqliteSlotStore};

/// Slot key used by [`MemoryEventStore::load`].
pub const DEFAULT_SLOT_KEY: &str = "memory_events";

// ─────────────────────────────────────────────────────────────────────────────
// Error type
// ─────────────────────────────────────────────────────────────────────────────

/// A failure to persist the collection.  The in-memory state has already
/// been updated when this is returned.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Slot error: {0}")]
    Slot(#[from] SlotError),
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),
}

// ─────────────────────────────────────────────────────────────────────────────
// Load outcome
// ─────────────────────────────────────────────────────────────────────────────

/// Why the store fell back to the sample dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedReason {
    /// Nothing had been persisted under the slot key.
    SlotAbsent,
    /// The persisted blob could not be decoded.
    Corrupt,
    /// The slot backend failed to read.
    ReadFailed,
}

/// How the in-memory collection was populated at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOrigin {
    Restored,
    Seeded(SeedReason),
}

// ─────────────────────────────────────────────────────────────────────────────
// MemoryEventStore
// ─────────────────────────────────────────────────────────────────────────────

/// Persisted, single-writer collection of memory events.
///
/// One instance owns the slot for its whole lifetime; hand it to whatever
/// needs it by reference.  Mutating methods take `&mut self`, so concurrent
/// writers must share it behind a lock.
pub struct MemoryEventStore<S: SlotStore = SqliteSlotStore> {
    slot: S,
    key: String,
    events: Vec<MemoryEvent>,
    origin: StoreOrigin,
    /// Identifiers of samples seeded over a slot that could not be read.
    unverified_seed: Option<Vec<EventId>>,
}

impl<S: SlotStore> MemoryEventStore<S> {
    /// Load the collection stored under [`DEFAULT_SLOT_KEY`].
    pub fn load(slot: S) -> Self {
        Self::load_with_key(slot, DEFAULT_SLOT_KEY)
    }

    /// Load the collection stored under `key`, seeding sample data when the
    /// slot is absent or unusable.
    pub fn load_with_key(slot: S, key: impl Into<String>) -> Self {
        let mut store = Self {
            slot,
            key: key.into(),
            events: Vec::new(),
            origin: StoreOrigin::Restored,
            unverified_seed: None,
        };

        match store.slot.read(&store.key) {
            Ok(Some(blob)) => match codec::decode(&blob) {
                Ok(events) => {
                    info!(key = %store.key, events = events.len(), "restored memory events");
                    store.events = events;
                }
                Err(e) => {
                    warn!(key = %store.key, error = %e, "persisted memory events are unreadable; reseeding");
                    store.seed(SeedReason::Corrupt);
                }
            },
            Ok(None) => store.seed(SeedReason::SlotAbsent),
            Err(e) => {
                warn!(key = %store.key, error = %e, "failed to read memory event slot; using sample data");
                store.seed(SeedReason::ReadFailed);
            }
        }
        store
    }

    fn seed(&mut self, reason: SeedReason) {
        self.events = sample_events();
        self.origin = StoreOrigin::Seeded(reason);
        info!(key = %self.key, ?reason, events = self.events.len(), "seeded sample memory events");

        // An unreadable slot may still hold good data; leave it alone.
        if reason == SeedReason::ReadFailed {
            self.unverified_seed = Some(self.events.iter().map(MemoryEvent::id).collect());
            return;
        }
        // Already logged; the seeded samples stay in memory either way.
        self.persist_reported("seed").ok();
    }

    /// Reconcile with a slot that could not be read at load time.  Must run
    /// before the first write.
    fn reconcile_unverified(&mut self) -> Result<(), StoreError> {
        let Some(seeded) = self.unverified_seed.as_ref() else {
            return Ok(());
        };
        if let Some(blob) = self.slot.read(&self.key)? {
            match codec::decode(&blob) {
                Ok(mut stored) => {
                    let recovered = stored.len();
                    let added: Vec<MemoryEvent> = self
                        .events
                        .drain(..)
                        .filter(|e| !seeded.contains(&e.id()))
                        .filter(|e| !stored.iter().any(|s| s.id() == e.id()))
                        .collect();
                    info!(key = %self.key, recovered, added = added.len(), "recovered persisted memory events; dropping samples");
                    stored.extend(added);
                    self.events = stored;
                }
                Err(e) => {
                    warn!(key = %self.key, error = %e, "persisted memory events are unreadable; overwriting");
                }
            }
        }
        self.unverified_seed = None;
        Ok(())
    }

    fn persist(&mut self) -> Result<(), StoreError> {
        self.reconcile_unverified()?;
        let blob = codec::encode(&self.events)?;
        self.slot.write(&self.key, &blob)?;
        debug!(key = %self.key, events = self.events.len(), "persisted memory events");
        Ok(())
    }

    fn persist_reported(&mut self, op: &'static str) -> Result<(), StoreError> {
        self.persist().inspect_err(|e| {
            warn!(op, key = %self.key, error = %e, "failed to persist memory events; in-memory state kept");
        })
    }

    // ── Mutations ───────────────────────────────────────────────────────────

    /// Append `event` and persist the collection.
    pub fn add_event(&mut self, event: MemoryEvent) -> Result<(), StoreError> {
        debug!(id = %event.id(), subject = %event.subject, "adding memory event");
        self.events.push(event);
        self.persist_reported("add")
    }

    /// Replace the stored event whose identifier matches `event`, keeping its
    /// position, and persist.
    ///
    /// Returns `Ok(false)` without touching the collection or the slot when
    /// no stored event matches.
    pub fn update_event(&mut self, event: MemoryEvent) -> Result<bool, StoreError> {
        let Some(entry) = self.events.iter_mut().find(|e| e.id() == event.id()) else {
            debug!(id = %event.id(), "update ignored; event not found");
            return Ok(false);
        };
        *entry = event;
        self.persist_reported("update")?;
        Ok(true)
    }

    /// Remove the event with identifier `id` and persist.
    ///
    /// Removing an unknown identifier is not an error; the collection is
    /// still re-persisted.  Returns whether an event was removed.
    pub fn delete_event(&mut self, id: EventId) -> Result<bool, StoreError> {
        let before = self.events.len();
        self.events.retain(|e| e.id() != id);
        let removed = self.events.len() != before;
        debug!(%id, removed, "deleting memory event");
        self.persist_reported("delete")?;
        Ok(removed)
    }

    /// Empty the collection and erase the slot itself, so the next load
    /// seeds sample data again.
    pub fn clear_all(&mut self) -> Result<(), StoreError> {
        self.events.clear();
        self.unverified_seed = None;
        self.slot.erase(&self.key).map_err(|e| {
            warn!(key = %self.key, error = %e, "failed to erase memory event slot");
            StoreError::from(e)
        })?;
        info!(key = %self.key, "cleared all memory events");
        Ok(())
    }

    // ── Queries ─────────────────────────────────────────────────────────────

    /// Events whose subject equals `subject` exactly, newest date first.
    pub fn events_for(&self, subject: &str) -> Vec<&MemoryEvent> {
        let mut events: Vec<&MemoryEvent> =
            self.events.iter().filter(|e| e.subject == subject).collect();
        events.sort_by(|a, b| recency_order(a, b));
        events
    }

    /// Every event, newest date first.
    pub fn all_events(&self) -> Vec<&MemoryEvent> {
        let mut events: Vec<&MemoryEvent> = self.events.iter().collect();
        events.sort_by(|a, b| recency_order(a, b));
        events
    }

    pub fn get(&self, id: EventId) -> Option<&MemoryEvent> {
        self.events.iter().find(|e| e.id() == id)
    }

    /// Number of events recorded for `subject`.
    pub fn count_for(&self, subject: &str) -> usize {
        self.events.iter().filter(|e| e.subject == subject).count()
    }

    /// Distinct subject names in the order they first appear in the
    /// collection.
    pub fn subjects(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for e in &self.events {
            if !seen.contains(&e.subject.as_str()) {
                seen.push(e.subject.as_str());
            }
        }
        seen
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn origin(&self) -> StoreOrigin {
        self.origin
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Release the underlying slot store.
    pub fn into_slot(self) -> S {
        self.slot
    }
}

/// Newest represented date first, then newest creation time, then highest
/// identifier.
fn recency_order(a: &MemoryEvent, b: &MemoryEvent) -> Ordering {
    b.date
        .cmp(&a.date)
        .then_with(|| b.created_at().cmp(&a.created_at()))
        .then_with(|| b.id().cmp(&a.id()))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::samples::SAMPLE_EVENTS;
    use chrono::{Duration, NaiveDate, TimeZone, Utc};
    use std::collections::HashMap;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn make_event(subject: &str, d: NaiveDate, title: &str) -> MemoryEvent {
        MemoryEvent::new(subject, d, title, format!("{title} 的内容"))
    }

    fn fresh_store() -> MemoryEventStore {
        MemoryEventStore::load(SqliteSlotStore::open_in_memory().unwrap())
    }

    fn empty_store() -> MemoryEventStore {
        let mut store = fresh_store();
        store.clear_all().unwrap();
        store
    }

    /// In-memory slot backend whose reads and writes can be made to fail.
    #[derive(Default)]
    struct FlakySlot {
        values: HashMap<String, Vec<u8>>,
        fail_reads: bool,
        fail_writes: bool,
        writes: usize,
    }

    impl SlotStore for FlakySlot {
        fn read(&self, key: &str) -> Result<Option<Vec<u8>>, SlotError> {
            if self.fail_reads {
                return Err(SlotError::Unavailable("read refused".into()));
            }
            Ok(self.values.get(key).cloned())
        }

        fn write(&mut self, key: &str, value: &[u8]) -> Result<(), SlotError> {
            if self.fail_writes {
                return Err(SlotError::Unavailable("write refused".into()));
            }
            self.writes += 1;
            self.values.insert(key.to_string(), value.to_vec());
            Ok(())
        }

        fn erase(&mut self, key: &str) -> Result<(), SlotError> {
            if self.fail_writes {
                return Err(SlotError::Unavailable("erase refused".into()));
            }
            self.values.remove(key);
            Ok(())
        }
    }

    // ── load protocol ───────────────────────────────────────────────────────

    #[test]
    fn first_load_seeds_exactly_the_sample_events() {
        let store = fresh_store();
        assert_eq!(store.origin(), StoreOrigin::Seeded(SeedReason::SlotAbsent));

        let all = store.all_events();
        assert_eq!(all.len(), SAMPLE_EVENTS.len());
        for &(subject, (y, m, d), title, content) in &SAMPLE_EVENTS {
            assert!(
                all.iter().any(|e| e.subject == subject
                    && e.date == date(y, m, d)
                    && e.title == title
                    && e.content == content),
                "missing sample event {title}"
            );
        }
    }

    #[test]
    fn seeding_persists_so_slot_is_no_longer_absent() {
        let store = fresh_store();
        let seeded: Vec<MemoryEvent> = store.all_events().into_iter().cloned().collect();
        let slot = store.into_slot();
        assert!(slot.read(DEFAULT_SLOT_KEY).unwrap().is_some());

        let reloaded = MemoryEventStore::load(slot);
        assert_eq!(reloaded.origin(), StoreOrigin::Restored);
        let restored: Vec<MemoryEvent> = reloaded.all_events().into_iter().cloned().collect();
        assert_eq!(restored, seeded);
    }

    #[test]
    fn corrupt_blob_falls_back_to_seeding_and_is_overwritten() {
        let mut slot = SqliteSlotStore::open_in_memory().unwrap();
        slot.write(DEFAULT_SLOT_KEY, b"{not json").unwrap();

        let store = MemoryEventStore::load(slot);
        assert_eq!(store.origin(), StoreOrigin::Seeded(SeedReason::Corrupt));
        assert_eq!(store.len(), 5);

        let slot = store.into_slot();
        let blob = slot.read(DEFAULT_SLOT_KEY).unwrap().unwrap();
        assert_eq!(codec::decode(&blob).unwrap().len(), 5);
    }

    #[test]
    fn future_format_version_is_treated_as_corrupt() {
        let mut slot = SqliteSlotStore::open_in_memory().unwrap();
        slot.write(DEFAULT_SLOT_KEY, br#"{"version": 99, "events": []}"#).unwrap();
        let store = MemoryEventStore::load(slot);
        assert_eq!(store.origin(), StoreOrigin::Seeded(SeedReason::Corrupt));
    }

    #[test]
    fn unreadable_slot_seeds_without_overwriting() {
        let slot = FlakySlot {
            fail_reads: true,
            ..Default::default()
        };
        let store = MemoryEventStore::load(slot);
        assert_eq!(store.origin(), StoreOrigin::Seeded(SeedReason::ReadFailed));
        assert_eq!(store.len(), 5);
        assert_eq!(store.into_slot().writes, 0);
    }

    fn unreadable_slot_holding(events: &[MemoryEvent]) -> FlakySlot {
        let mut slot = FlakySlot::default();
        slot.write(DEFAULT_SLOT_KEY, &codec::encode(events).unwrap()).unwrap();
        slot.writes = 0;
        slot.fail_reads = true;
        slot
    }

    #[test]
    fn add_after_unreadable_load_keeps_persisted_events() {
        let kept = make_event("奶奶", date(2015, 2, 19), "老照片");
        let mut store = MemoryEventStore::load(unreadable_slot_holding(std::slice::from_ref(&kept)));
        assert_eq!(store.origin(), StoreOrigin::Seeded(SeedReason::ReadFailed));

        store.slot.fail_reads = false;
        let added = make_event("妈妈", date(2024, 5, 12), "母亲节");
        store.add_event(added.clone()).unwrap();

        // The samples are replaced by what the slot actually held.
        assert_eq!(store.len(), 2);
        let reloaded = MemoryEventStore::load(store.into_slot());
        assert_eq!(reloaded.origin(), StoreOrigin::Restored);
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded.get(kept.id()), Some(&kept));
        assert_eq!(reloaded.get(added.id()), Some(&added));
    }

    #[test]
    fn write_is_refused_while_slot_stays_unreadable() {
        let kept = make_event("爸爸", date(2016, 8, 1), "第一次露营");
        let mut store = MemoryEventStore::load(unreadable_slot_holding(std::slice::from_ref(&kept)));

        let err = store
            .add_event(make_event("妈妈", date(2024, 5, 12), "母亲节"))
            .unwrap_err();
        assert!(matches!(err, StoreError::Slot(SlotError::Unavailable(_))));
        assert_eq!(store.len(), 6);

        let mut slot = store.into_slot();
        assert_eq!(slot.writes, 0);
        slot.fail_reads = false;
        let reloaded = MemoryEventStore::load(slot);
        assert_eq!(reloaded.origin(), StoreOrigin::Restored);
        assert_eq!(reloaded.get(kept.id()), Some(&kept));
    }

    #[test]
    fn unreadable_then_absent_slot_persists_samples_and_additions() {
        let mut store = MemoryEventStore::load(FlakySlot {
            fail_reads: true,
            ..Default::default()
        });
        store.slot.fail_reads = false;
        store
            .add_event(make_event("妹妹", date(2024, 6, 1), "儿童节"))
            .unwrap();

        let reloaded = MemoryEventStore::load(store.into_slot());
        assert_eq!(reloaded.origin(), StoreOrigin::Restored);
        assert_eq!(reloaded.len(), 6);
    }

    #[test]
    fn persisted_empty_collection_is_restored_not_reseeded() {
        let mut slot = SqliteSlotStore::open_in_memory().unwrap();
        slot.write(DEFAULT_SLOT_KEY, &codec::encode(&[]).unwrap()).unwrap();
        let store = MemoryEventStore::load(slot);
        assert_eq!(store.origin(), StoreOrigin::Restored);
        assert!(store.is_empty());
    }

    #[test]
    fn custom_key_is_isolated_from_default_key() {
        let store = MemoryEventStore::load_with_key(SqliteSlotStore::open_in_memory().unwrap(), "other");
        assert_eq!(store.key(), "other");
        let slot = store.into_slot();
        assert!(slot.read("other").unwrap().is_some());
        assert!(slot.read(DEFAULT_SLOT_KEY).unwrap().is_none());
    }

    // ── add / persistence round-trip ────────────────────────────────────────

    #[test]
    fn added_event_survives_restart_with_all_fields() {
        let mut store = fresh_store();
        let event = make_event("妈妈", date(2023, 3, 8), "妇女节");
        store.add_event(event.clone()).unwrap();
        assert_eq!(store.len(), 6);

        let reloaded = MemoryEventStore::load(store.into_slot());
        let restored = reloaded.get(event.id()).unwrap();
        assert_eq!(restored, &event);
        assert_eq!(restored.created_at(), event.created_at());
    }

    #[test]
    fn file_backed_store_survives_reopen() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = dir.path().join("hearth.db");
        let path = path.to_string_lossy();

        let event = make_event("爸爸", date(2024, 6, 16), "父亲节");
        {
            let mut store = MemoryEventStore::load(SqliteSlotStore::open(&path).unwrap());
            store.add_event(event.clone()).unwrap();
        }
        let store = MemoryEventStore::load(SqliteSlotStore::open(&path).unwrap());
        assert_eq!(store.origin(), StoreOrigin::Restored);
        assert_eq!(store.len(), 6);
        assert_eq!(store.get(event.id()), Some(&event));
    }

    #[test]
    fn failed_persist_keeps_in_memory_append() {
        let store = MemoryEventStore::load(FlakySlot::default());
        let mut slot = store.into_slot();
        slot.fail_writes = true;
        let mut store = MemoryEventStore::load(slot);

        let event = make_event("奶奶", date(2023, 10, 23), "重阳节");
        let err = store.add_event(event.clone()).unwrap_err();
        assert!(matches!(err, StoreError::Slot(SlotError::Unavailable(_))));
        assert_eq!(store.get(event.id()), Some(&event));
        assert_eq!(store.len(), 6);

        // Disk still holds the five seeded events.
        let mut slot = store.into_slot();
        slot.fail_writes = false;
        assert_eq!(MemoryEventStore::load(slot).len(), 5);
    }

    // ── ordering / filtering ────────────────────────────────────────────────

    #[test]
    fn all_events_sorted_by_date_descending() {
        let mut store = empty_store();
        for (d, t) in [(date(2015, 1, 1), "a"), (date(2023, 1, 1), "b"), (date(2019, 1, 1), "c")] {
            store.add_event(make_event("妈妈", d, t)).unwrap();
        }
        store.add_event(make_event("爸爸", date(2021, 1, 1), "d")).unwrap();

        let titles: Vec<&str> = store.all_events().iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["b", "d", "c", "a"]);
    }

    #[test]
    fn sample_events_come_back_strictly_descending() {
        let store = fresh_store();
        let all = store.all_events();
        assert!(all.windows(2).all(|w| w[0].date > w[1].date));
    }

    #[test]
    fn events_for_matches_subject_exactly() {
        let mut store = empty_store();
        store.add_event(make_event("妈妈", date(2020, 1, 1), "mine")).unwrap();
        store.add_event(make_event("妈妈的妈妈", date(2021, 1, 1), "longer")).unwrap();
        store.add_event(make_event("妈", date(2022, 1, 1), "shorter")).unwrap();

        let hits = store.events_for("妈妈");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "mine");
    }

    #[test]
    fn events_for_is_case_sensitive() {
        let mut store = empty_store();
        store.add_event(make_event("Mom", date(2020, 1, 1), "x")).unwrap();
        assert!(store.events_for("mom").is_empty());
        assert_eq!(store.events_for("Mom").len(), 1);
    }

    #[test]
    fn events_for_sample_subject_is_newest_first() {
        let store = fresh_store();
        let titles: Vec<&str> = store.events_for("妈妈").iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["教师节", "母亲节的花"]);
    }

    #[test]
    fn same_date_ties_break_on_newest_creation() {
        let mut store = empty_store();
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let d = date(2020, 8, 8);
        let older = MemoryEvent::stamped_at("爸爸", d, "older", "", t0);
        let newer = MemoryEvent::stamped_at("爸爸", d, "newer", "", t0 + Duration::seconds(5));
        store.add_event(older).unwrap();
        store.add_event(newer).unwrap();

        let titles: Vec<&str> = store.events_for("爸爸").iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["newer", "older"]);
    }

    #[test]
    fn full_ties_are_deterministic() {
        let mut store = empty_store();
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let d = date(2020, 8, 8);
        for title in ["x", "y", "z"] {
            store.add_event(MemoryEvent::stamped_at("爸爸", d, title, "", t0)).unwrap();
        }
        let first: Vec<EventId> = store.all_events().iter().map(|e| e.id()).collect();
        let mut expected = first.clone();
        expected.sort_by(|a, b| b.cmp(a));
        assert_eq!(first, expected);
    }

    // ── update ──────────────────────────────────────────────────────────────

    #[test]
    fn update_replaces_in_place() {
        let mut store = fresh_store();
        let mut edited = store.events_for("奶奶")[0].clone();
        let created = edited.created_at();
        edited.title = "元宵节".to_string();
        edited.date = date(2020, 2, 8);

        assert!(store.update_event(edited.clone()).unwrap());
        assert_eq!(store.len(), 5);
        let stored = store.get(edited.id()).unwrap();
        assert_eq!(stored.title, "元宵节");
        assert_eq!(stored.created_at(), created);

        let reloaded = MemoryEventStore::load(store.into_slot());
        assert_eq!(reloaded.get(edited.id()).unwrap().title, "元宵节");
    }

    #[test]
    fn update_keeps_storage_position() {
        let mut store = empty_store();
        let a = make_event("妈妈", date(2020, 1, 1), "a");
        let b = make_event("妈妈", date(2021, 1, 1), "b");
        store.add_event(a.clone()).unwrap();
        store.add_event(b.clone()).unwrap();

        let mut edited = a.clone();
        edited.subject = "爸爸".to_string();
        store.update_event(edited).unwrap();
        assert_eq!(store.subjects(), vec!["爸爸", "妈妈"]);
    }

    #[test]
    fn update_unknown_id_is_ignored() {
        let mut store = fresh_store();
        let before: Vec<MemoryEvent> = store.all_events().into_iter().cloned().collect();
        let stranger = make_event("妈妈", date(2000, 1, 1), "never stored");

        assert!(!store.update_event(stranger.clone()).unwrap());
        assert_eq!(store.len(), 5);
        assert!(store.get(stranger.id()).is_none());
        let after: Vec<MemoryEvent> = store.all_events().into_iter().cloned().collect();
        assert_eq!(before, after);
    }

    // ── delete ──────────────────────────────────────────────────────────────

    #[test]
    fn delete_removes_and_persists() {
        let mut store = fresh_store();
        let victim = store.events_for("爸爸")[0].id();
        assert!(store.delete_event(victim).unwrap());
        assert_eq!(store.len(), 4);

        let reloaded = MemoryEventStore::load(store.into_slot());
        assert_eq!(reloaded.len(), 4);
        assert!(reloaded.get(victim).is_none());
    }

    #[test]
    fn delete_unknown_id_is_noop() {
        let mut store = fresh_store();
        assert!(!store.delete_event(EventId::new()).unwrap());
        assert_eq!(store.len(), 5);
    }

    // ── clear ───────────────────────────────────────────────────────────────

    #[test]
    fn clear_all_erases_slot_and_next_load_reseeds() {
        let mut store = fresh_store();
        store.add_event(make_event("妈妈", date(2024, 5, 12), "extra")).unwrap();
        store.clear_all().unwrap();
        assert!(store.all_events().is_empty());

        let slot = store.into_slot();
        assert!(slot.read(DEFAULT_SLOT_KEY).unwrap().is_none());

        let reloaded = MemoryEventStore::load(slot);
        assert_eq!(reloaded.origin(), StoreOrigin::Seeded(SeedReason::SlotAbsent));
        assert_eq!(reloaded.len(), 5);
    }

    #[test]
    fn clear_all_failure_still_empties_memory() {
        let mut store = MemoryEventStore::load(FlakySlot::default());
        let mut slot = store.into_slot();
        slot.fail_writes = true;
        store = MemoryEventStore::load(slot);

        assert!(store.clear_all().is_err());
        assert!(store.is_empty());
    }

    // ── misc queries ────────────────────────────────────────────────────────

    #[test]
    fn counts_and_subjects_follow_sample_data() {
        let store = fresh_store();
        assert_eq!(store.count_for("妈妈"), 2);
        assert_eq!(store.count_for("爸爸"), 2);
        assert_eq!(store.count_for("奶奶"), 1);
        assert_eq!(store.count_for("外公"), 0);
        assert_eq!(store.subjects(), vec!["妈妈", "爸爸", "奶奶"]);
    }
}
