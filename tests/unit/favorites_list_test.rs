//! Unit tests for the FavoritesList view model.

use splitscreen::managers::favorites_list::{FavoritesList, Segment};
use splitscreen::managers::page_store::{PageStore, ViewUpdate};
use splitscreen::types::page::PageChange;

fn setup() -> (FavoritesList, PageStore) {
    let store = PageStore::open_in_memory().expect("Failed to open in-memory page store");
    let list = FavoritesList::new(store.clone()).expect("Failed to open favorites list");
    (list, store)
}

#[test]
fn test_segment_from_index() {
    assert_eq!(Segment::from_index(0), Some(Segment::Favorites));
    assert_eq!(Segment::from_index(1), Some(Segment::Recent));
    assert_eq!(Segment::from_index(2), None);
}

#[test]
fn test_starts_on_favorites_segment() {
    let (list, _store) = setup();
    assert_eq!(list.segment(), Segment::Favorites);
    assert!(list.items().is_empty());
}

#[test]
fn test_refresh_applies_committed_changes() {
    let (mut list, store) = setup();
    store.add_favorite("https://a.com", "A", Vec::new()).wait().unwrap();
    store.record_visit("https://v.com", "V", Vec::new()).wait().unwrap();
    store.add_favorite("https://b.com", "B", Vec::new()).wait().unwrap();

    // Only the two favorite inserts touch this segment.
    assert_eq!(list.refresh(), 2);
    let titles: Vec<&str> = list.items().iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["B", "A"]);
    assert_eq!(list.refresh(), 0);
}

#[test]
fn test_switching_segment_reloads_view() {
    let (mut list, store) = setup();
    store.record_visit("https://v.com", "V", Vec::new()).wait().unwrap();
    store.add_favorite("https://a.com", "A", Vec::new()).wait().unwrap();

    assert_eq!(list.set_segment(1).unwrap(), true);
    assert_eq!(list.segment(), Segment::Recent);
    assert_eq!(list.items().len(), 2);

    // Same segment or unknown index leaves things alone.
    assert_eq!(list.set_segment(1).unwrap(), false);
    assert_eq!(list.set_segment(7).unwrap(), false);
    assert_eq!(list.segment(), Segment::Recent);

    assert_eq!(list.set_segment(0).unwrap(), true);
    assert_eq!(list.items().len(), 1);
}

#[test]
fn test_delete_by_index() {
    let (mut list, store) = setup();
    store.add_favorite("https://a.com", "A", Vec::new()).wait().unwrap();
    store.add_favorite("https://b.com", "B", Vec::new()).wait().unwrap();
    list.refresh();

    let pending = list.delete(0).expect("index 0 exists");
    assert_eq!(pending.wait(), Some(true));
    list.refresh();

    assert_eq!(list.items().len(), 1);
    assert_eq!(list.items()[0].url, "https://a.com");
    assert!(list.delete(5).is_none());
}

#[test]
fn test_share_url_by_index() {
    let (mut list, store) = setup();
    store.add_favorite("https://a.com/x", "A", Vec::new()).wait().unwrap();
    list.refresh();

    assert_eq!(list.share_url(0).as_deref(), Some("https://a.com/x"));
    assert_eq!(list.share_url(1), None);
}

#[tokio::test]
async fn test_changed_waits_for_next_update() {
    let (mut list, store) = setup();
    store.add_favorite("https://a.com", "A", Vec::new()).await.unwrap();

    let update = list.changed().await.expect("store is open");
    assert!(matches!(update, ViewUpdate::Changed(PageChange::Inserted(_))));
    assert_eq!(list.items().len(), 1);
}
