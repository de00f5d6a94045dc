//! Repository layer: write-through backends for the content store.
//!
//! # Responsibility
//! - Define the persistence contract the store writes through.
//! - Isolate SQLite query details from store/business orchestration.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.
//! - A repository never mutates ids or timestamps it is handed.

pub mod content_repo;
