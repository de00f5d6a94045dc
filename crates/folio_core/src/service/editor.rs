//! Editor use-case: transient form state and submit/cancel flows.
//!
//! # Responsibility
//! - Pre-fill a draft from the store selection.
//! - Keep tag and featured-image edits local until submit.
//! - Turn a draft into exactly one `add_content` or `update_content` call.
//!
//! # Invariants
//! - The draft never touches the store before `submit` or `cancel`.
//! - A loaded featured image is split off the body, so re-submitting does
//!   not append it twice.
//! - Image strings arrive already embeddable (URL or data payload); reading
//!   local files is the caller's job.

use crate::markdown::{embed_featured_image, extract_image_url, split_featured_image};
use crate::model::content::{normalize_tag, ContentId, ContentPatch, NewContent};
use crate::repo::content_repo::ContentRepository;
use crate::store::content_store::{ContentStore, StoreResult};
use log::debug;

/// Result of a successful submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A new item was added and the selection cleared.
    Created(ContentId),
    /// The item being edited was updated; it stays selected.
    Updated(ContentId),
}

impl SubmitOutcome {
    pub fn id(self) -> ContentId {
        match self {
            Self::Created(id) | Self::Updated(id) => id,
        }
    }
}

/// Editor form state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditorDraft {
    pub title: String,
    /// Markdown body without the featured-image block.
    pub body: String,
    pub excerpt: String,
    pub published: bool,
    image: Option<String>,
    tags: Vec<String>,
    editing: Option<ContentId>,
}

impl EditorDraft {
    /// Empty draft for new content.
    pub fn blank() -> Self {
        Self::default()
    }

    /// Pre-fills from the selected item, or returns a blank draft.
    pub fn load<R: ContentRepository>(store: &ContentStore<R>) -> Self {
        let Some(item) = store.selected_content() else {
            return Self::blank();
        };

        let (body, image) = split_featured_image(&item.content);
        debug!(
            "event=editor_load module=editor status=ok id={} has_image={}",
            item.id,
            image.is_some()
        );
        Self {
            title: item.title.clone(),
            body: body.to_string(),
            excerpt: item.excerpt.clone(),
            published: item.published,
            image: image.map(str::to_string),
            tags: item.tags.clone(),
            editing: Some(item.id),
        }
    }

    /// Id of the item being edited; `None` for new content.
    pub fn editing_id(&self) -> Option<ContentId> {
        self.editing
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    /// Featured image that will be appended on submit.
    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    /// Image to show in the live preview: the featured image, else the
    /// first image already inside the body.
    pub fn preview_image(&self) -> Option<&str> {
        self.image
            .as_deref()
            .or_else(|| extract_image_url(&self.body))
    }

    /// Sets the featured image. A blank value removes it.
    pub fn set_image(&mut self, embeddable: impl Into<String>) {
        let embeddable = embeddable.into();
        self.image = if embeddable.trim().is_empty() {
            None
        } else {
            Some(embeddable.trim().to_string())
        };
    }

    pub fn remove_image(&mut self) {
        self.image = None;
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Adds one tag. Returns `false` for blank or duplicate input.
    pub fn add_tag(&mut self, raw: &str) -> bool {
        match normalize_tag(raw) {
            Some(tag) if !self.tags.contains(&tag) => {
                self.tags.push(tag);
                true
            }
            _ => false,
        }
    }

    /// Removes one tag. Returns `false` when it was not present.
    pub fn remove_tag(&mut self, raw: &str) -> bool {
        let Some(tag) = normalize_tag(raw) else {
            return false;
        };
        let before = self.tags.len();
        self.tags.retain(|candidate| *candidate != tag);
        self.tags.len() != before
    }

    /// Body with the featured-image block appended when an image is set.
    pub fn compose_content(&self) -> String {
        match self.image.as_deref() {
            Some(url) => embed_featured_image(&self.body, url),
            None => self.body.clone(),
        }
    }

    /// Writes the draft to the store.
    ///
    /// Editing drafts update their item; new drafts add one and clear the
    /// selection.
    ///
    /// # Errors
    /// - `NotFound` when the edited item was deleted meanwhile.
    /// - `Persistence` when the backend write fails.
    pub fn submit<R: ContentRepository>(
        &self,
        store: &mut ContentStore<R>,
    ) -> StoreResult<SubmitOutcome> {
        let content = self.compose_content();
        match self.editing {
            Some(id) => {
                let patch = ContentPatch {
                    title: Some(self.title.clone()),
                    content: Some(content),
                    excerpt: Some(self.excerpt.clone()),
                    published: Some(self.published),
                    tags: Some(self.tags.clone()),
                };
                store.update_content(id, patch)?;
                Ok(SubmitOutcome::Updated(id))
            }
            None => {
                let created = store.add_content(NewContent {
                    title: self.title.clone(),
                    content,
                    excerpt: self.excerpt.clone(),
                    published: self.published,
                    tags: self.tags.clone(),
                })?;
                store.clear_selected_content();
                Ok(SubmitOutcome::Created(created.id))
            }
        }
    }

    /// Abandons the draft and clears the selection.
    pub fn cancel<R: ContentRepository>(self, store: &mut ContentStore<R>) {
        store.clear_selected_content();
    }
}
