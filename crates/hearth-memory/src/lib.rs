//! `hearth-memory` – The Memory Log.
//!
//! Owns the household's chronological log of personal memories and keeps
//! it durable across restarts in a local SQLite key-value slot.
//!
//! # Modules
//!
//! - [`store`] – [`MemoryEventStore`][store::MemoryEventStore]: the single
//!   point of mutation for memory events, with subject filtering,
//!   recency-first ordering and load-or-seed startup.
//! - [`slot`] – [`SlotStore`][slot::SlotStore] and its SQLite
//!   implementation [`SqliteSlotStore`][slot::SqliteSlotStore].
//! - [`codec`] – the versioned JSON envelope the collection is stored in.
//! - [`samples`] – the five sample events seeded on first run.

pub mod codec;
pub mod samples;
pub mod slot;
pub mod store;

pub use slot::{SlotError, SlotStore, SqliteSlotStore};
pub use store::{DEFAULT_SLOT_KEY, MemoryEventStore, SeedReason, StoreError, StoreOrigin};
