//! Domain model for the content store.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep creation/update inputs separate from the stored record.
//!
//! # Invariants
//! - Every content item is identified by a stable `ContentId`.
//! - Deletion is a hard removal; there is no tombstone state.

pub mod content;
