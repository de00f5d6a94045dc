//! Derived read-only views over the content collection.
//!
//! # Responsibility
//! - Publication partition, text search, tag filter and counts.
//! - Card projections for dashboard and public viewer lists.
//!
//! # Invariants
//! - Nothing here is cached; every call recomputes from the slice it is
//!   given, so a store mutation is visible on the next call.
//! - Input order is preserved in every output.

pub mod card;
pub mod filter;

pub use card::{public_cards, ContentCard};
pub use filter::{
    all_tags, count_by_publication, drafts_only, empty_state_message, filter_by_tag, partition,
    public_listing, published_only, search, ContentCounts, PublicationFilter,
};
