//! Core domain logic for Folio.
//! This crate is the single source of truth for content invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod markdown;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;
pub mod view;

pub use config::{ConfigOverrides, CoreConfig};
pub use logging::{default_log_level, init_logging, logging_status};
pub use markdown::{
    derive_preview_text, embed_featured_image, extract_image_url, split_featured_image,
};
pub use model::content::{
    normalize_tag, normalize_tags, ContentId, ContentItem, ContentPatch, ContentValidationError,
    NewContent,
};
pub use repo::content_repo::{
    ContentRepository, EphemeralRepository, RepoError, RepoResult, SqliteContentRepository,
};
pub use service::editor::{EditorDraft, SubmitOutcome};
pub use store::{Clock, ContentStore, StoreError, StoreEvent, StoreResult, SystemClock};
pub use view::{
    all_tags, count_by_publication, drafts_only, empty_state_message, filter_by_tag, partition,
    public_cards, public_listing, published_only, search, ContentCard, ContentCounts,
    PublicationFilter,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
