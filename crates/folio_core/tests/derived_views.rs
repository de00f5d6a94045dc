use folio_core::{
    all_tags, drafts_only, empty_state_message, extract_image_url, filter_by_tag, partition,
    public_cards, published_only, search, ContentStore, NewContent, PublicationFilter,
};
use std::collections::HashSet;

fn seeded_store() -> ContentStore {
    let mut store = ContentStore::in_memory();
    let rows = [
        ("Rust ownership", "borrowing explained", true, "![c](https://img/own.png)"),
        ("Draft about rust", "not yet", false, "body"),
        ("Cooking", "Pasta with RUST-colored sauce", true, "no image"),
        ("Travel", "notes", false, "![](  )"),
        ("Gardening", "spring", true, "text ![first](a.png) ![second](b.png)"),
    ];
    for (title, excerpt, published, content) in rows {
        store
            .add_content(NewContent {
                title: title.to_string(),
                content: content.to_string(),
                excerpt: excerpt.to_string(),
                published,
                tags: vec![if published { "live" } else { "wip" }.to_string()],
            })
            .unwrap();
    }
    store
}

#[test]
fn publication_filter_is_a_partition() {
    let store = seeded_store();
    let items = store.contents();

    let (published, drafts) = partition(items);
    let published_ids: HashSet<_> = published.iter().map(|item| item.id).collect();
    let draft_ids: HashSet<_> = drafts.iter().map(|item| item.id).collect();
    let all_ids: HashSet<_> = items.iter().map(|item| item.id).collect();

    assert!(published_ids.is_disjoint(&draft_ids));
    assert_eq!(
        published_ids.union(&draft_ids).copied().collect::<HashSet<_>>(),
        all_ids
    );
    assert_eq!(published, published_only(items));
    assert_eq!(drafts, drafts_only(items));
    assert_eq!(PublicationFilter::All.apply(items).len(), items.len());
}

#[test]
fn search_commutes_with_publication_filter() {
    let store = seeded_store();
    let items = store.contents();

    for query in ["rust", "RUST", "", "pasta", "nothing-matches", "o"] {
        let search_then_filter = published_only(search(items, query));
        let filter_then_search = search(published_only(items), query);
        assert_eq!(filter_then_search, search_then_filter, "query `{query}`");
        assert!(filter_then_search.iter().all(|item| item.published));

        let twice = search(search(items, query), query);
        assert_eq!(twice, search(items, query), "search must be idempotent");
    }
}

#[test]
fn filters_reflect_mutations_immediately() {
    let mut store = seeded_store();
    let before = search(store.contents(), "gardening").len();
    assert_eq!(before, 1);

    let id = store.contents()[4].id;
    store.delete_content(id).unwrap();
    assert!(search(store.contents(), "gardening").is_empty());
}

#[test]
fn image_extraction_is_deterministic() {
    let content = "![alt](http://x/y.png) body";
    assert_eq!(extract_image_url(content), Some("http://x/y.png"));
    assert_eq!(extract_image_url(content), extract_image_url(content));
    assert_eq!(extract_image_url("no images here"), None);
}

#[test]
fn public_cards_carry_thumbnails_for_published_items_only() {
    let store = seeded_store();
    let cards = public_cards(store.contents(), "");

    let titles: Vec<_> = cards.iter().map(|card| card.title.as_str()).collect();
    assert_eq!(titles, vec!["Rust ownership", "Cooking", "Gardening"]);
    assert_eq!(cards[0].thumbnail.as_deref(), Some("https://img/own.png"));
    assert_eq!(cards[1].thumbnail, None);
    assert_eq!(cards[2].thumbnail.as_deref(), Some("a.png"));
}

#[test]
fn tag_views_use_normalized_names() {
    let store = seeded_store();
    assert_eq!(all_tags(store.contents()), vec!["live".to_string(), "wip".to_string()]);
    assert_eq!(filter_by_tag(store.contents(), "WIP").len(), 2);
    assert_eq!(filter_by_tag(store.contents(), "").len(), store.len());
}

#[test]
fn empty_state_messages_differ_per_filter() {
    let messages: HashSet<_> = [
        PublicationFilter::All,
        PublicationFilter::Published,
        PublicationFilter::Drafts,
    ]
    .into_iter()
    .map(empty_state_message)
    .collect();
    assert_eq!(messages.len(), 3);
}
