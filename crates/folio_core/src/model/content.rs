//! Content item domain model.
//!
//! # Responsibility
//! - Define the canonical article record owned by the content store.
//! - Define creation and partial-update inputs used by consumers.
//!
//! # Invariants
//! - `id` is stable, never nil, and never reused for another item.
//! - `created_at <= updated_at` for every valid record.
//! - `tags` are normalized: trimmed, lowercase, deduplicated, sorted.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for one content item.
pub type ContentId = Uuid;

/// Validation failures for structural content invariants.
///
/// Titles and bodies are never validated here; required-field rules belong
/// to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentValidationError {
    /// `id` must not be the nil UUID.
    NilId,
    /// `updated_at` is earlier than `created_at`.
    TimestampOrder { created_at: i64, updated_at: i64 },
}

impl Display for ContentValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "content id must not be nil"),
            Self::TimestampOrder {
                created_at,
                updated_at,
            } => write!(
                f,
                "updatedAt ({updated_at}) must be >= createdAt ({created_at})"
            ),
        }
    }
}

impl Error for ContentValidationError {}

/// Canonical content record (article, post or draft).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "ContentItemWire")]
pub struct ContentItem {
    /// Assigned by the store at creation.
    pub id: ContentId,
    /// Display title. May be empty at this layer.
    pub title: String,
    /// Markdown body, optionally carrying one embedded image reference.
    pub content: String,
    /// Short summary shown on cards; independent of `content`.
    pub excerpt: String,
    /// Controls visibility in the public viewer.
    pub published: bool,
    /// Unix epoch milliseconds. Set once.
    pub created_at: i64,
    /// Unix epoch milliseconds. Refreshed on every update.
    pub updated_at: i64,
    /// Normalized tag names.
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContentItemWire {
    id: ContentId,
    title: String,
    content: String,
    excerpt: String,
    published: bool,
    created_at: i64,
    updated_at: i64,
    #[serde(default)]
    tags: Vec<String>,
}

impl TryFrom<ContentItemWire> for ContentItem {
    type Error = ContentValidationError;

    fn try_from(wire: ContentItemWire) -> Result<Self, Self::Error> {
        let item = Self {
            id: wire.id,
            title: wire.title,
            content: wire.content,
            excerpt: wire.excerpt,
            published: wire.published,
            created_at: wire.created_at,
            updated_at: wire.updated_at,
            tags: normalize_tags(&wire.tags),
        };
        item.validate()?;
        Ok(item)
    }
}

impl ContentItem {
    /// Builds a new item from creation input with both timestamps set to `now_ms`.
    pub(crate) fn from_new(id: ContentId, input: NewContent, now_ms: i64) -> Self {
        Self {
            id,
            title: input.title,
            content: input.content,
            excerpt: input.excerpt,
            published: input.published,
            created_at: now_ms,
            updated_at: now_ms,
            tags: normalize_tags(&input.tags),
        }
    }

    /// Checks structural invariants.
    ///
    /// # Errors
    /// - `NilId` when `id` is the nil UUID.
    /// - `TimestampOrder` when `updated_at < created_at`.
    pub fn validate(&self) -> Result<(), ContentValidationError> {
        if self.id.is_nil() {
            return Err(ContentValidationError::NilId);
        }
        if self.updated_at < self.created_at {
            return Err(ContentValidationError::TimestampOrder {
                created_at: self.created_at,
                updated_at: self.updated_at,
            });
        }
        Ok(())
    }

    /// Returns whether this item is a draft (`published == false`).
    pub fn is_draft(&self) -> bool {
        !self.published
    }

    /// Returns a copy with `patch` merged in and `updated_at` replaced.
    ///
    /// `id` and `created_at` are carried over unchanged.
    pub(crate) fn merged(&self, patch: &ContentPatch, updated_at: i64) -> Self {
        let mut next = self.clone();
        if let Some(title) = patch.title.as_ref() {
            next.title = title.clone();
        }
        if let Some(content) = patch.content.as_ref() {
            next.content = content.clone();
        }
        if let Some(excerpt) = patch.excerpt.as_ref() {
            next.excerpt = excerpt.clone();
        }
        if let Some(published) = patch.published {
            next.published = published;
        }
        if let Some(tags) = patch.tags.as_ref() {
            next.tags = normalize_tags(tags);
        }
        next.updated_at = updated_at;
        next
    }
}

/// Creation input: every item field except identity and timestamps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewContent {
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub published: bool,
    pub tags: Vec<String>,
}

impl NewContent {
    /// Creates an unpublished input with no tags.
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        excerpt: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            excerpt: excerpt.into(),
            published: false,
            tags: Vec::new(),
        }
    }
}

/// Partial update input. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub published: Option<bool>,
    /// Replaces the full tag set when present.
    pub tags: Option<Vec<String>>,
}

impl ContentPatch {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn excerpt(mut self, excerpt: impl Into<String>) -> Self {
        self.excerpt = Some(excerpt.into());
        self
    }

    pub fn published(mut self, published: bool) -> Self {
        self.published = Some(published);
        self
    }

    pub fn tags(mut self, tags: Vec<String>) -> Self {
        self.tags = Some(tags);
        self
    }

    /// Returns whether the patch carries no field at all.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_none()
            && self.excerpt.is_none()
            && self.published.is_none()
            && self.tags.is_none()
    }
}

/// Normalizes one tag value. Blank input yields `None`.
pub fn normalize_tag(tag: &str) -> Option<String> {
    let trimmed = tag.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Normalizes, deduplicates and sorts tag values.
pub fn normalize_tags(tags: &[String]) -> Vec<String> {
    let mut unique = BTreeSet::new();
    for tag in tags {
        if let Some(value) = normalize_tag(tag) {
            unique.insert(value);
        }
    }
    unique.into_iter().collect()
}
