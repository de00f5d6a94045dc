//! Content store: the single owner of content state.
//!
//! # Responsibility
//! - Own the ordered content collection and the selection reference.
//! - Stage, write through, then commit every mutation.
//! - Notify subscribers after each committed change.
//!
//! # Invariants
//! - Ids are unique for the lifetime of the store.
//! - `created_at <= updated_at`; updates strictly advance `updated_at`.
//! - Selection, when set, always resolves to a live item.
//! - A failed operation leaves collection and selection untouched.

pub mod clock;
pub mod content_store;

pub use clock::{Clock, SystemClock};
pub use content_store::{ContentStore, StoreError, StoreEvent, StoreResult};
