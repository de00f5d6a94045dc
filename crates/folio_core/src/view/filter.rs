//! Publication, search and tag filters.

use crate::model::content::{normalize_tag, ContentItem};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Dashboard list filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PublicationFilter {
    #[default]
    All,
    Published,
    Drafts,
}

impl PublicationFilter {
    /// Returns whether `item` passes this filter.
    pub fn matches(self, item: &ContentItem) -> bool {
        match self {
            Self::All => true,
            Self::Published => item.published,
            Self::Drafts => !item.published,
        }
    }

    /// Applies this filter, keeping input order.
    pub fn apply<'a>(
        self,
        items: impl IntoIterator<Item = &'a ContentItem>,
    ) -> Vec<&'a ContentItem> {
        items.into_iter().filter(|item| self.matches(item)).collect()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Published => "published",
            Self::Drafts => "drafts",
        }
    }
}

impl Display for PublicationFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PublicationFilter {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "published" => Ok(Self::Published),
            "drafts" | "draft" => Ok(Self::Drafts),
            other => Err(format!(
                "unsupported filter `{other}`; expected all|published|drafts"
            )),
        }
    }
}

/// Per-partition item counts shown on the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentCounts {
    pub all: usize,
    pub published: usize,
    pub drafts: usize,
}

impl ContentCounts {
    pub fn get(&self, filter: PublicationFilter) -> usize {
        match filter {
            PublicationFilter::All => self.all,
            PublicationFilter::Published => self.published,
            PublicationFilter::Drafts => self.drafts,
        }
    }
}

pub fn published_only<'a>(
    items: impl IntoIterator<Item = &'a ContentItem>,
) -> Vec<&'a ContentItem> {
    PublicationFilter::Published.apply(items)
}

pub fn drafts_only<'a>(
    items: impl IntoIterator<Item = &'a ContentItem>,
) -> Vec<&'a ContentItem> {
    PublicationFilter::Drafts.apply(items)
}

/// Splits items into `(published, drafts)`.
pub fn partition<'a>(
    items: impl IntoIterator<Item = &'a ContentItem>,
) -> (Vec<&'a ContentItem>, Vec<&'a ContentItem>) {
    items.into_iter().partition(|item| item.published)
}

pub fn count_by_publication<'a>(
    items: impl IntoIterator<Item = &'a ContentItem>,
) -> ContentCounts {
    items
        .into_iter()
        .fold(ContentCounts::default(), |mut counts, item| {
            counts.all += 1;
            if item.published {
                counts.published += 1;
            } else {
                counts.drafts += 1;
            }
            counts
        })
}

/// Case-insensitive substring match over `title` or `excerpt`.
///
/// A blank query matches every item.
pub fn search<'a>(
    items: impl IntoIterator<Item = &'a ContentItem>,
    query: &str,
) -> Vec<&'a ContentItem> {
    let needle = query.trim().to_lowercase();
    items
        .into_iter()
        .filter(|item| {
            needle.is_empty()
                || item.title.to_lowercase().contains(&needle)
                || item.excerpt.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Public viewer listing: published items matching `query`.
pub fn public_listing<'a>(
    items: impl IntoIterator<Item = &'a ContentItem>,
    query: &str,
) -> Vec<&'a ContentItem> {
    search(published_only(items), query)
}

/// Items carrying `tag` (normalized). A blank tag applies no filter.
pub fn filter_by_tag<'a>(
    items: impl IntoIterator<Item = &'a ContentItem>,
    tag: &str,
) -> Vec<&'a ContentItem> {
    match normalize_tag(tag) {
        Some(tag) => items
            .into_iter()
            .filter(|item| item.tags.iter().any(|candidate| *candidate == tag))
            .collect(),
        None => items.into_iter().collect(),
    }
}

/// Every distinct tag in use, sorted.
pub fn all_tags<'a>(items: impl IntoIterator<Item = &'a ContentItem>) -> Vec<String> {
    items
        .into_iter()
        .flat_map(|item| item.tags.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Message shown when a dashboard filter yields nothing.
pub fn empty_state_message(filter: PublicationFilter) -> &'static str {
    match filter {
        PublicationFilter::All => "Get started by creating your first piece of content.",
        PublicationFilter::Published => {
            "No published content yet. Publish your drafts to see them here."
        }
        PublicationFilter::Drafts => "No drafts found. All your content is published.",
    }
}

#[cfg(test)]
mod tests {
    use super::{filter_by_tag, search, PublicationFilter};
    use crate::model::content::ContentItem;
    use uuid::Uuid;

    fn item(title: &str, excerpt: &str, published: bool, tags: &[&str]) -> ContentItem {
        ContentItem {
            id: Uuid::new_v4(),
            title: title.to_string(),
            content: String::new(),
            excerpt: excerpt.to_string(),
            published,
            created_at: 1,
            updated_at: 1,
            tags: tags.iter().map(|tag| tag.to_string()).collect(),
        }
    }

    #[test]
    fn search_is_case_insensitive_over_title_and_excerpt() {
        let items = vec![
            item("Rust Tips", "", true, &[]),
            item("Other", "about RUST", true, &[]),
            item("Cooking", "pasta", true, &[]),
        ];
        let hits = search(&items, "rust");
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].title, "Rust Tips");
        assert_eq!(hits[1].title, "Other");
    }

    #[test]
    fn search_does_not_look_at_body() {
        let mut only_body = item("t", "e", true, &[]);
        only_body.content = "needle".to_string();
        assert!(search([&only_body], "needle").is_empty());
    }

    #[test]
    fn blank_search_matches_everything() {
        let items = vec![item("a", "", false, &[]), item("b", "", true, &[])];
        assert_eq!(search(&items, "   ").len(), 2);
    }

    #[test]
    fn tag_filter_normalizes_query() {
        let items = vec![item("a", "", true, &["rust"]), item("b", "", true, &["go"])];
        let hits = filter_by_tag(&items, " RUST ");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "a");
    }

    #[test]
    fn filter_parses_from_cli_strings() {
        assert_eq!("Drafts".parse(), Ok(PublicationFilter::Drafts));
        assert_eq!("published".parse(), Ok(PublicationFilter::Published));
        assert!("archived".parse::<PublicationFilter>().is_err());
    }
}
