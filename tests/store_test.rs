use std::collections::BTreeMap;
use std::fs;

use chrono::{DateTime, NaiveDate};
use rss_reader::query::{apply_limit, sort_items_desc};
use rss_reader::store::Store;
use rss_reader::types::{Feed, FeedItem, ReaderError};
use tempfile::TempDir;

fn item(guid: &str, date: &str) -> FeedItem {
    FeedItem {
        title: format!("Item {guid}"),
        link: format!("https://example.com/news/{guid}"),
        pub_date: DateTime::parse_from_rfc2822(date).unwrap(),
        guid: guid.to_string(),
        body: format!("Body of {guid}"),
        extra: BTreeMap::new(),
    }
}

fn feed(source: &str, items: Vec<FeedItem>) -> Feed {
    Feed {
        title: format!("Feed at {source}"),
        source: source.to_string(),
        items,
    }
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn load_from_missing_file_is_distinct_from_corrupt() {
    let dir = TempDir::new().unwrap();
    let store = Store::new(dir.path().join("storage.json"));
    let err = store.load().unwrap_err();
    assert!(matches!(err, ReaderError::MissingStore { .. }), "got {err:?}");

    fs::write(dir.path().join("storage.json"), "{not json at all").unwrap();
    let err = store.load().unwrap_err();
    assert!(matches!(err, ReaderError::CorruptStore { .. }), "got {err:?}");
}

#[test]
fn merge_creates_store_and_round_trips() {
    let dir = TempDir::new().unwrap();
    let store = Store::new(dir.path().join("storage.json"));

    let fetched = feed(
        "https://example.com/feed",
        vec![
            item("g1", "Tue, 26 Oct 2021 10:00:00 +0300"),
            item("g2", "Tue, 26 Oct 2021 11:00:00 +0300"),
        ],
    );
    let added = store.merge(&fetched).unwrap();
    assert_eq!(added, 2);

    let loaded = store.load().unwrap();
    assert_eq!(loaded, vec![fetched]);
}

#[test]
fn merge_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let store = Store::new(dir.path().join("storage.json"));

    let fetched = feed(
        "https://example.com/feed",
        vec![
            item("g1", "Tue, 26 Oct 2021 10:00:00 +0300"),
            item("g2", "Tue, 26 Oct 2021 11:00:00 +0300"),
        ],
    );
    store.merge(&fetched).unwrap();
    let added = store.merge(&fetched).unwrap();
    assert_eq!(added, 0);
    assert_eq!(store.load().unwrap(), vec![fetched]);
}

#[test]
fn merge_appends_only_new_guids() {
    let dir = TempDir::new().unwrap();
    let store = Store::new(dir.path().join("storage.json"));

    let five: Vec<FeedItem> = (1..=5)
        .map(|n| item(&format!("g{n}"), "Tue, 26 Oct 2021 10:00:00 +0300"))
        .collect();
    let added = store
        .merge(&feed("https://example.com/feed", five.clone()))
        .unwrap();
    assert_eq!(added, 5);

    // The server now returns g1..g7.
    let seven: Vec<FeedItem> = (1..=7)
        .map(|n| item(&format!("g{n}"), "Tue, 26 Oct 2021 10:00:00 +0300"))
        .collect();
    let added = store
        .merge(&feed("https://example.com/feed", seven.clone()))
        .unwrap();
    assert_eq!(added, 2);

    let loaded = store.load().unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].items.len(), 7);
    // g1..g5 stored first and unchanged, g6/g7 appended after them.
    assert_eq!(&loaded[0].items[..5], &five[..]);
    assert_eq!(loaded[0].items[5].guid, "g6");
    assert_eq!(loaded[0].items[6].guid, "g7");
}

#[test]
fn merge_never_updates_an_existing_guid() {
    let dir = TempDir::new().unwrap();
    let store = Store::new(dir.path().join("storage.json"));

    let original = item("g1", "Tue, 26 Oct 2021 10:00:00 +0300");
    store
        .merge(&feed("https://example.com/feed", vec![original.clone()]))
        .unwrap();

    let mut changed = item("g1", "Wed, 27 Oct 2021 12:00:00 +0300");
    changed.title = "Completely different".to_string();
    let added = store
        .merge(&feed("https://example.com/feed", vec![changed]))
        .unwrap();

    // First write wins.
    assert_eq!(added, 0);
    assert_eq!(store.load().unwrap()[0].items, vec![original]);
}

#[test]
fn merge_keeps_sources_separate() {
    let dir = TempDir::new().unwrap();
    let store = Store::new(dir.path().join("storage.json"));

    store
        .merge(&feed(
            "https://example.com/feed",
            vec![item("g1", "Tue, 26 Oct 2021 10:00:00 +0300")],
        ))
        .unwrap();
    store
        .merge(&feed(
            "https://other.example.com/rss",
            vec![item("g1", "Tue, 26 Oct 2021 10:00:00 +0300")],
        ))
        .unwrap();

    let loaded = store.load().unwrap();
    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded[0].source, "https://example.com/feed");
    assert_eq!(loaded[1].source, "https://other.example.com/rss");
}

#[test]
fn query_filters_by_calendar_date() {
    let dir = TempDir::new().unwrap();
    let store = Store::new(dir.path().join("storage.json"));
    store
        .merge(&feed(
            "https://example.com/feed",
            vec![
                item("g1", "Tue, 26 Oct 2021 10:00:00 +0300"),
                item("g2", "Wed, 27 Oct 2021 09:00:00 +0300"),
                item("g3", "Tue, 26 Oct 2021 23:30:00 +0300"),
            ],
        ))
        .unwrap();

    let feeds = store.query(day(2021, 10, 26), None).unwrap();
    assert_eq!(feeds.len(), 1);
    let guids: Vec<&str> = feeds[0].items.iter().map(|i| i.guid.as_str()).collect();
    assert_eq!(guids, vec!["g3", "g1"]);
}

#[test]
fn query_judges_the_date_in_the_items_own_timezone() {
    let dir = TempDir::new().unwrap();
    let store = Store::new(dir.path().join("storage.json"));
    // 01:00 +0300 on the 27th is still the 26th in UTC; the item's own
    // offset decides.
    store
        .merge(&feed(
            "https://example.com/feed",
            vec![item("g1", "Wed, 27 Oct 2021 01:00:00 +0300")],
        ))
        .unwrap();

    assert!(store.query(day(2021, 10, 27), None).is_ok());
    let err = store.query(day(2021, 10, 26), None).unwrap_err();
    assert!(matches!(err, ReaderError::NoMatch { .. }), "got {err:?}");
}

#[test]
fn query_scoped_to_a_source() {
    let dir = TempDir::new().unwrap();
    let store = Store::new(dir.path().join("storage.json"));
    store
        .merge(&feed(
            "https://example.com/feed",
            vec![item("g1", "Tue, 26 Oct 2021 10:00:00 +0300")],
        ))
        .unwrap();
    store
        .merge(&feed(
            "https://other.example.com/rss",
            vec![item("h1", "Tue, 26 Oct 2021 11:00:00 +0300")],
        ))
        .unwrap();

    let feeds = store
        .query(day(2021, 10, 26), Some("https://example.com/feed"))
        .unwrap();
    assert_eq!(feeds.len(), 1);
    assert_eq!(feeds[0].items[0].guid, "g1");

    let err = store
        .query(day(2021, 11, 1), Some("https://example.com/feed"))
        .unwrap_err();
    match err {
        ReaderError::NoMatch { feed_source, .. } => {
            assert_eq!(feed_source.as_deref(), Some("https://example.com/feed"));
        }
        other => panic!("expected NoMatch, got {other:?}"),
    }
}

#[test]
fn query_drops_feeds_with_no_matching_items() {
    let dir = TempDir::new().unwrap();
    let store = Store::new(dir.path().join("storage.json"));
    store
        .merge(&feed(
            "https://example.com/feed",
            vec![item("g1", "Tue, 26 Oct 2021 10:00:00 +0300")],
        ))
        .unwrap();
    store
        .merge(&feed(
            "https://other.example.com/rss",
            vec![item("h1", "Mon, 25 Oct 2021 10:00:00 +0300")],
        ))
        .unwrap();

    let feeds = store.query(day(2021, 10, 26), None).unwrap();
    assert_eq!(feeds.len(), 1);
    assert_eq!(feeds[0].source, "https://example.com/feed");
}

#[test]
fn sort_is_descending_and_stable() {
    let mut items = vec![
        item("old", "Mon, 25 Oct 2021 10:00:00 +0300"),
        item("tie-a", "Tue, 26 Oct 2021 10:00:00 +0300"),
        item("new", "Wed, 27 Oct 2021 10:00:00 +0300"),
        item("tie-b", "Tue, 26 Oct 2021 10:00:00 +0300"),
    ];
    sort_items_desc(&mut items);
    let guids: Vec<&str> = items.iter().map(|i| i.guid.as_str()).collect();
    assert_eq!(guids, vec!["new", "tie-a", "tie-b", "old"]);
}

#[test]
fn limit_truncates_per_feed_and_non_positive_means_unlimited() {
    let items = vec![
        item("g1", "Wed, 27 Oct 2021 10:00:00 +0300"),
        item("g2", "Tue, 26 Oct 2021 10:00:00 +0300"),
        item("g3", "Mon, 25 Oct 2021 10:00:00 +0300"),
    ];
    let mut feeds = vec![feed("https://example.com/feed", items.clone())];
    apply_limit(&mut feeds, 2);
    assert_eq!(feeds[0].items.len(), 2);
    assert_eq!(feeds[0].items[1].guid, "g2");

    let mut feeds = vec![feed("https://example.com/feed", items.clone())];
    apply_limit(&mut feeds, 0);
    assert_eq!(feeds[0].items.len(), 3);

    let mut feeds = vec![feed("https://example.com/feed", items)];
    apply_limit(&mut feeds, -1);
    assert_eq!(feeds[0].items.len(), 3);
}
