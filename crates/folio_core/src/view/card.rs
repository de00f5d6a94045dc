//! List-card projections for dashboard and public viewer.

use crate::markdown::{derive_preview_text, extract_image_url};
use crate::model::content::{ContentId, ContentItem};
use crate::view::filter::public_listing;
use serde::Serialize;

/// Display-ready summary of one content item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentCard {
    pub id: ContentId,
    pub title: String,
    /// Item excerpt, or a body-derived snippet when the excerpt is blank.
    pub summary: String,
    /// First embedded image URL, used as thumbnail.
    pub thumbnail: Option<String>,
    pub published: bool,
    pub updated_at: i64,
    pub tags: Vec<String>,
}

impl ContentCard {
    pub fn from_item(item: &ContentItem) -> Self {
        let summary = if item.excerpt.trim().is_empty() {
            derive_preview_text(&item.content).unwrap_or_default()
        } else {
            item.excerpt.clone()
        };
        Self {
            id: item.id,
            title: item.title.clone(),
            summary,
            thumbnail: extract_image_url(&item.content).map(str::to_string),
            published: item.published,
            updated_at: item.updated_at,
            tags: item.tags.clone(),
        }
    }
}

/// Cards for the public viewer: published items matching `query`.
pub fn public_cards<'a>(
    items: impl IntoIterator<Item = &'a ContentItem>,
    query: &str,
) -> Vec<ContentCard> {
    public_listing(items, query)
        .into_iter()
        .map(ContentCard::from_item)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::ContentCard;
    use crate::model::content::ContentItem;
    use uuid::Uuid;

    #[test]
    fn card_falls_back_to_body_snippet_and_extracts_thumbnail() {
        let item = ContentItem {
            id: Uuid::new_v4(),
            title: "Hello".to_string(),
            content: "**Body** text\n\n![Featured Image](https://cdn/x.png)".to_string(),
            excerpt: "  ".to_string(),
            published: true,
            created_at: 1,
            updated_at: 2,
            tags: vec!["intro".to_string()],
        };

        let card = ContentCard::from_item(&item);
        assert_eq!(card.summary, "Body text");
        assert_eq!(card.thumbnail.as_deref(), Some("https://cdn/x.png"));
        assert_eq!(card.updated_at, 2);
    }
}
