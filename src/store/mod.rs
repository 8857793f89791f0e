//! Record store
//!
//! Owner-scoped persistence for Clario's records. All reads and writes on
//! tasks, events, and mood entries are filtered to the owning user; derived
//! statistics are never stored here, they are recomputed per request by
//! [`crate::stats`].

pub mod error;
pub mod record_store;
pub mod types;

pub use error::{StoreError, StoreResult};
pub use record_store::RecordStore;
pub use types::{
    DateRange, Event, EventFilter, Mood, MoodFilter, MoodSymbol, Priority, RecordId, Role, Task,
    TaskFilter, User, UserId,
};
