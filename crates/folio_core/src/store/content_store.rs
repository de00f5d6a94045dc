//! Content store implementation.
//!
//! # Responsibility
//! - Provide create/update/delete/select/clear over the content collection.
//! - Assign ids and timestamps; consumers never set them.
//! - Write every mutation through to the configured repository.
//!
//! # Invariants
//! - Mutations are staged, persisted, then committed. Errors at any step
//!   leave in-memory state exactly as it was.
//! - Collection order is insertion order. Nothing reorders it.
//! - Log lines carry ids and flags only, never titles or bodies.

use crate::model::content::{ContentId, ContentItem, ContentPatch, NewContent};
use crate::repo::content_repo::{ContentRepository, EphemeralRepository, RepoError};
use crate::store::clock::{Clock, SystemClock};
use log::{debug, error, info};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::mpsc::{channel, Receiver, Sender};
use uuid::Uuid;

pub type StoreResult<T> = Result<T, StoreError>;

/// Store-level error surfaced to consumers.
#[derive(Debug)]
pub enum StoreError {
    /// No live item carries this id.
    NotFound(ContentId),
    /// Backing repository rejected the write; memory was not changed.
    Persistence(RepoError),
    /// `updated_at` is already at `i64::MAX` and cannot advance.
    TimestampExhausted(ContentId),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "content not found: {id}"),
            Self::Persistence(err) => write!(f, "content persistence failed: {err}"),
            Self::TimestampExhausted(id) => {
                write!(f, "updatedAt of content {id} cannot advance past i64::MAX")
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NotFound(_) | Self::TimestampExhausted(_) => None,
            Self::Persistence(err) => Some(err),
        }
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        Self::Persistence(value)
    }
}

/// Change notification delivered to subscribers after a committed mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEvent {
    Added(ContentId),
    Updated(ContentId),
    Deleted(ContentId),
    /// Selection moved to the given id, or was cleared.
    SelectionChanged(Option<ContentId>),
}

/// Owner of the content collection and the editor selection.
///
/// The store is an explicitly constructed value; consumers receive it by
/// reference and re-read `contents()` / `selected_content()` after mutating
/// or listen on `subscribe()`.
pub struct ContentStore<R: ContentRepository = EphemeralRepository> {
    items: Vec<ContentItem>,
    selected: Option<ContentId>,
    repo: R,
    clock: Box<dyn Clock>,
    subscribers: Vec<Sender<StoreEvent>>,
}

impl ContentStore<EphemeralRepository> {
    /// Creates an empty store with no persistent backing.
    pub fn in_memory() -> Self {
        Self::from_parts(Vec::new(), EphemeralRepository)
    }
}

impl Default for ContentStore<EphemeralRepository> {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl<R: ContentRepository> ContentStore<R> {
    /// Opens a store over `repo`, loading persisted items in insertion order.
    ///
    /// # Errors
    /// - `Persistence` when loading fails or persisted ids are not unique.
    pub fn open(repo: R) -> StoreResult<Self> {
        let items = repo.load_all().map_err(|err| {
            error!("event=store_open module=store status=error error={err}");
            StoreError::Persistence(err)
        })?;

        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            if !seen.insert(item.id) {
                return Err(StoreError::Persistence(RepoError::InvalidData(format!(
                    "duplicate content id `{}`",
                    item.id
                ))));
            }
        }

        info!(
            "event=store_open module=store status=ok item_count={}",
            items.len()
        );
        Ok(Self::from_parts(items, repo))
    }

    fn from_parts(items: Vec<ContentItem>, repo: R) -> Self {
        Self {
            items,
            selected: None,
            repo,
            clock: Box::new(SystemClock),
            subscribers: Vec::new(),
        }
    }

    /// Replaces the time source used for new timestamps.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Tears the store down and hands back its repository.
    pub fn into_repository(self) -> R {
        self.repo
    }

    /// Full collection in insertion order.
    pub fn contents(&self) -> &[ContentItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Resolves one item by id.
    pub fn get_content(&self, id: ContentId) -> Option<&ContentItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Currently selected item, if any.
    pub fn selected_content(&self) -> Option<&ContentItem> {
        self.selected.and_then(|id| self.get_content(id))
    }

    pub fn selected_id(&self) -> Option<ContentId> {
        self.selected
    }

    /// Creates a new item at the end of the collection.
    ///
    /// No field is validated here; empty titles are accepted.
    ///
    /// # Errors
    /// - `Persistence` when the backend write fails. Nothing is appended.
    pub fn add_content(&mut self, input: NewContent) -> StoreResult<ContentItem> {
        let id = self.fresh_id();
        let item = ContentItem::from_new(id, input, self.clock.now_ms());

        if let Err(err) = self.repo.insert(&item) {
            error!("event=content_add module=store status=error id={id} error={err}");
            return Err(err.into());
        }

        self.items.push(item.clone());
        info!(
            "event=content_add module=store status=ok id={id} published={} item_count={}",
            item.published,
            self.items.len()
        );
        self.notify(StoreEvent::Added(id));
        Ok(item)
    }

    /// Merges `patch` into an existing item and refreshes `updated_at`.
    ///
    /// The new `updated_at` is strictly greater than the previous one even
    /// when the clock has not advanced.
    ///
    /// # Errors
    /// - `NotFound` for an unknown id. No item is created.
    /// - `TimestampExhausted` when `updated_at` is already `i64::MAX`.
    /// - `Persistence` when the backend write fails.
    pub fn update_content(
        &mut self,
        id: ContentId,
        patch: ContentPatch,
    ) -> StoreResult<ContentItem> {
        let Some(index) = self.position(id) else {
            debug!("event=content_update module=store status=not_found id={id}");
            return Err(StoreError::NotFound(id));
        };

        let current = &self.items[index];
        let Some(floor) = current.updated_at.checked_add(1) else {
            error!(
                "event=content_update module=store status=error id={id} error=timestamp_exhausted"
            );
            return Err(StoreError::TimestampExhausted(id));
        };
        let updated_at = self.clock.now_ms().max(floor);
        let next = current.merged(&patch, updated_at);

        if let Err(err) = self.repo.update(&next) {
            error!("event=content_update module=store status=error id={id} error={err}");
            return Err(err.into());
        }

        self.items[index] = next.clone();
        info!(
            "event=content_update module=store status=ok id={id} published={}",
            next.published
        );
        self.notify(StoreEvent::Updated(id));
        Ok(next)
    }

    /// Removes exactly one item, clearing the selection if it pointed there.
    ///
    /// # Errors
    /// - `NotFound` for an unknown id.
    /// - `Persistence` when the backend delete fails.
    pub fn delete_content(&mut self, id: ContentId) -> StoreResult<ContentItem> {
        let Some(index) = self.position(id) else {
            debug!("event=content_delete module=store status=not_found id={id}");
            return Err(StoreError::NotFound(id));
        };

        if let Err(err) = self.repo.delete(id) {
            error!("event=content_delete module=store status=error id={id} error={err}");
            return Err(err.into());
        }

        let removed = self.items.remove(index);
        info!(
            "event=content_delete module=store status=ok id={id} item_count={}",
            self.items.len()
        );
        self.notify(StoreEvent::Deleted(id));
        if self.selected == Some(id) {
            self.set_selection(None);
        }
        Ok(removed)
    }

    /// Selects an item for editing.
    ///
    /// An unknown id clears the selection instead of failing.
    pub fn select_content(&mut self, id: ContentId) -> Option<&ContentItem> {
        let next = self.position(id).map(|_| id);
        if next.is_none() {
            debug!("event=content_select module=store status=miss id={id}");
        }
        self.set_selection(next);
        self.selected_content()
    }

    pub fn clear_selected_content(&mut self) {
        self.set_selection(None);
    }

    /// Registers a change listener. Dropping the receiver unsubscribes.
    pub fn subscribe(&mut self) -> Receiver<StoreEvent> {
        let (tx, rx) = channel();
        self.subscribers.push(tx);
        rx
    }

    fn set_selection(&mut self, next: Option<ContentId>) {
        if self.selected != next {
            self.selected = next;
            self.notify(StoreEvent::SelectionChanged(next));
        }
    }

    fn position(&self, id: ContentId) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    fn fresh_id(&self) -> ContentId {
        loop {
            let candidate = Uuid::new_v4();
            if self.position(candidate).is_none() {
                return candidate;
            }
        }
    }

    fn notify(&mut self, event: StoreEvent) {
        self.subscribers.retain(|tx| tx.send(event).is_ok());
    }
}

#[cfg(test)]
mod tests {
    use super::{ContentStore, StoreError, StoreEvent};
    use crate::model::content::{ContentId, ContentItem, ContentPatch, NewContent};
    use crate::repo::content_repo::{ContentRepository, RepoError, RepoResult};
    use std::cell::Cell;
    use std::rc::Rc;

    /// Accepts writes until `failing` is switched on.
    struct FlakyRepository {
        failing: Rc<Cell<bool>>,
    }

    impl FlakyRepository {
        fn check(&self) -> RepoResult<()> {
            if self.failing.get() {
                Err(RepoError::InvalidData("disk full".to_string()))
            } else {
                Ok(())
            }
        }
    }

    impl ContentRepository for FlakyRepository {
        fn load_all(&self) -> RepoResult<Vec<ContentItem>> {
            Ok(Vec::new())
        }

        fn insert(&mut self, _item: &ContentItem) -> RepoResult<()> {
            self.check()
        }

        fn update(&mut self, _item: &ContentItem) -> RepoResult<()> {
            self.check()
        }

        fn delete(&mut self, _id: ContentId) -> RepoResult<()> {
            self.check()
        }
    }

    fn flaky_store() -> (ContentStore<FlakyRepository>, Rc<Cell<bool>>) {
        let failing = Rc::new(Cell::new(false));
        let repo = FlakyRepository {
            failing: Rc::clone(&failing),
        };
        (ContentStore::open(repo).unwrap(), failing)
    }

    #[test]
    fn update_advances_timestamp_even_with_frozen_clock() {
        let mut store = ContentStore::in_memory().with_clock(|| 1_000_i64);
        let created = store.add_content(NewContent::new("a", "b", "c")).unwrap();
        assert_eq!(created.created_at, 1_000);
        assert_eq!(created.updated_at, 1_000);

        let first = store
            .update_content(created.id, ContentPatch::default().title("x"))
            .unwrap();
        let second = store
            .update_content(created.id, ContentPatch::default().title("y"))
            .unwrap();
        assert_eq!(first.updated_at, 1_001);
        assert_eq!(second.updated_at, 1_002);
        assert_eq!(second.created_at, 1_000);
    }

    #[test]
    fn update_uses_clock_when_it_moves_forward() {
        let now = Rc::new(Cell::new(5_000_i64));
        let clock_now = Rc::clone(&now);
        let mut store = ContentStore::in_memory().with_clock(move || clock_now.get());
        let created = store.add_content(NewContent::new("a", "b", "c")).unwrap();

        now.set(9_000);
        let updated = store
            .update_content(created.id, ContentPatch::default().published(true))
            .unwrap();
        assert_eq!(updated.updated_at, 9_000);
    }

    #[test]
    fn failed_add_appends_nothing() {
        let (mut store, failing) = flaky_store();
        failing.set(true);
        let events = store.subscribe();

        let err = store
            .add_content(NewContent::new("a", "b", "c"))
            .unwrap_err();
        assert!(matches!(err, StoreError::Persistence(_)));
        assert!(store.is_empty());
        assert_eq!(events.try_iter().count(), 0);
    }

    #[test]
    fn failed_update_and_delete_keep_contents_and_selection() {
        let (mut store, failing) = flaky_store();
        let first = store.add_content(NewContent::new("a", "b", "c")).unwrap();
        store.add_content(NewContent::new("d", "e", "f")).unwrap();
        store.select_content(first.id);
        let snapshot = store.contents().to_vec();

        failing.set(true);
        let events = store.subscribe();

        let err = store
            .update_content(first.id, ContentPatch::default().title("changed"))
            .unwrap_err();
        assert!(matches!(err, StoreError::Persistence(_)));

        let err = store.delete_content(first.id).unwrap_err();
        assert!(matches!(err, StoreError::Persistence(_)));

        assert_eq!(store.contents(), snapshot.as_slice());
        assert_eq!(store.selected_id(), Some(first.id));
        assert_eq!(events.try_iter().count(), 0);
    }

    #[test]
    fn update_at_timestamp_ceiling_is_rejected_without_changes() {
        let mut store = ContentStore::in_memory().with_clock(|| i64::MAX);
        let created = store.add_content(NewContent::new("a", "b", "c")).unwrap();
        assert_eq!(created.updated_at, i64::MAX);
        let events = store.subscribe();

        let err = store
            .update_content(created.id, ContentPatch::default().title("x"))
            .unwrap_err();
        assert!(matches!(err, StoreError::TimestampExhausted(id) if id == created.id));
        assert_eq!(store.contents(), std::slice::from_ref(&created));
        assert_eq!(events.try_iter().count(), 0);
    }

    #[test]
    fn subscribers_receive_events_in_order() {
        let mut store = ContentStore::in_memory();
        let events = store.subscribe();

        let item = store.add_content(NewContent::new("a", "b", "c")).unwrap();
        store.select_content(item.id);
        store.delete_content(item.id).unwrap();

        let received: Vec<_> = events.try_iter().collect();
        assert_eq!(
            received,
            vec![
                StoreEvent::Added(item.id),
                StoreEvent::SelectionChanged(Some(item.id)),
                StoreEvent::Deleted(item.id),
                StoreEvent::SelectionChanged(None),
            ]
        );
    }

    #[test]
    fn dropped_subscribers_are_pruned() {
        let mut store = ContentStore::in_memory();
        drop(store.subscribe());
        store.add_content(NewContent::new("a", "b", "c")).unwrap();
        assert!(store.subscribers.is_empty());
    }
}
