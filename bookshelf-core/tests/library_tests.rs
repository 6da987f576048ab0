//! Library tests for bookshelf-core
//!
//! These exercise the store, edit sessions and relationships together,
//! through the public API and a real file backend.

use bookshelf_core::clock::ManualClock;
use bookshelf_core::store::{FileBackend, MemoryBackend};
use bookshelf_core::types::{is_set, sample_books, sample_genres};
use bookshelf_core::{
    not_set, Book, BookQuery, CoverPicker, EditSession, Entity, EntityKey, Genre, ShelfError, SortOrder,
    Status, Store, StoreConfig, StoreError, ValidationError,
};
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::sync::Arc;

// =============================================================================
// Helpers
// =============================================================================

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2020, 12, 25, 0, 0, 0).unwrap()
}

fn seeded_store(clock: &ManualClock) -> Store {
    let mut store = Store::in_memory().with_clock(Arc::new(clock.clone()));
    for book in sample_books() {
        store.insert(Entity::Book(book)).unwrap();
    }
    for genre in sample_genres() {
        store.insert(Entity::Genre(genre)).unwrap();
    }
    store
}

fn find<'a>(store: &'a Store, title: &str) -> &'a Book {
    store
        .query(&BookQuery::new(SortOrder::Title).with_filter(title))
        .into_iter()
        .next()
        .unwrap()
}

// =============================================================================
// Status transitions through a session
// =============================================================================

#[tokio::test]
async fn test_complete_then_shelve_scenario() {
    let clock = ManualClock::new(t0() + Duration::days(40));
    let mut store = Store::in_memory().with_clock(Arc::new(clock.clone()));
    let book = Book::new("1984", "George Orwell", t0()).unwrap();
    let id = book.id;
    store.insert(Entity::Book(book)).unwrap();

    let mut session = EditSession::open(&store, id).unwrap();
    session.set_status(Status::Completed);
    session.commit(&mut store).await.unwrap();

    let book = store.book(id).unwrap();
    assert_eq!(book.status, Status::Completed);
    assert_eq!(book.date_started, t0());
    assert_eq!(book.date_completed, t0() + Duration::days(40));

    session.set_status(Status::OnShelf);
    session.commit(&mut store).await.unwrap();
    let book = store.book(id).unwrap();
    assert_eq!(book.date_started, not_set());
    assert_eq!(book.date_completed, not_set());
}

#[tokio::test]
async fn test_every_transition_to_shelf_clears_dates() {
    let clock = ManualClock::new(t0() + Duration::days(400));
    let store = seeded_store(&clock);

    for book in store.query(&BookQuery::default()) {
        let mut session = EditSession::open(&store, book.id).unwrap();
        session.set_status(Status::OnShelf);
        assert!(!is_set(&session.dates().started), "{}", book.title);
        assert!(!is_set(&session.dates().completed), "{}", book.title);
    }
}

// =============================================================================
// Relationships
// =============================================================================

#[tokio::test]
async fn test_genre_delete_keeps_books() {
    let clock = ManualClock::new(t0());
    let mut store = seeded_store(&clock);
    let poetry = store.genres().iter().find(|g| g.name == "Poetry").unwrap().id;

    let ids: Vec<_> = store.query(&BookQuery::default()).iter().map(|b| b.id).collect();
    for id in &ids {
        let mut session = EditSession::open(&store, *id).unwrap();
        session.toggle_genre(poetry);
        session.commit(&mut store).await.unwrap();
    }
    assert!(ids.iter().all(|id| store.book(*id).unwrap().has_genre(poetry)));

    store.delete(EntityKey::Genre(poetry)).unwrap();
    assert_eq!(store.book_count(), ids.len());
    assert!(ids.iter().all(|id| !store.book(*id).unwrap().has_genre(poetry)));
}

#[tokio::test]
async fn test_book_delete_removes_quotes() {
    let clock = ManualClock::new(t0());
    let mut store = seeded_store(&clock);
    let id = find(&store, "Sapiens").id;

    let mut session = EditSession::open(&store, id).unwrap();
    let quote = session
        .add_quote(&mut store, "Biology enables, culture forbids.", None)
        .await
        .unwrap();
    assert_eq!(store.quotes_for(id).len(), 1);

    store.delete(EntityKey::Book(id)).unwrap();
    assert!(store.quote(quote).is_none());
    assert!(store.document().quotes.is_empty());

    session.set_synopsis("changed");
    assert!(matches!(
        session.commit(&mut store).await,
        Err(StoreError::StaleReference { .. })
    ));
}

#[tokio::test]
async fn test_rejected_quote_leaves_session_alone() {
    let clock = ManualClock::new(t0());
    let mut store = seeded_store(&clock);
    let id = find(&store, "1984").id;
    let mut session = EditSession::open(&store, id).unwrap();

    let err = session
        .add_quote(&mut store, "", Some("12".to_string()))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ShelfError::Validation(ValidationError::EmptyField("text"))
    ));
    assert!(session.quotes().is_empty());
    assert!(store.quotes_for(id).is_empty());
}

#[tokio::test]
async fn test_quotes_listed_oldest_first() {
    let clock = ManualClock::new(t0());
    let mut store = seeded_store(&clock);
    let id = find(&store, "Gatsby").id;
    let mut session = EditSession::open(&store, id).unwrap();

    for text in ["So we beat on", "boats against the current", "borne back ceaselessly"] {
        session.add_quote(&mut store, text, None).await.unwrap();
        clock.advance(Duration::minutes(1));
    }

    let texts: Vec<_> = store.quotes_for(id).iter().map(|q| q.text.clone()).collect();
    assert_eq!(
        texts,
        ["So we beat on", "boats against the current", "borne back ceaselessly"]
    );
}

// =============================================================================
// Persistence
// =============================================================================

#[tokio::test]
async fn test_file_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let config = StoreConfig::new(dir.path());

    let mut store = config.open_store().await.unwrap();
    let mut book = Book::new("Dune", "Frank Herbert", t0()).unwrap();
    book.cover_image = Some(vec![1, 2, 3, 4]);
    let id = book.id;
    store.insert(Entity::Book(book)).unwrap();
    let genre = Genre::new("Science Fiction", "#00CED1");
    let genre_id = genre.id;
    store.insert(Entity::Genre(genre)).unwrap();

    let mut session = EditSession::open(&store, id).unwrap();
    session.toggle_genre(genre_id);
    session.set_status(Status::InProgress);
    session
        .add_quote(&mut store, "Fear is the mind-killer.", Some("8".to_string()))
        .await
        .unwrap();

    let reopened = config.open_store().await.unwrap();
    let book = reopened.book(id).unwrap();
    assert_eq!(book.status, Status::InProgress);
    assert_eq!(book.genres, vec![genre_id]);
    assert_eq!(book.cover_image.as_deref(), Some(&[1u8, 2, 3, 4][..]));
    assert_eq!(reopened.quotes_for(id)[0].text, "Fear is the mind-killer.");
}

#[tokio::test]
async fn test_quote_alone_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let config = StoreConfig::new(dir.path());

    let mut store = config.open_store().await.unwrap();
    let book = Book::new("Dune", "Frank Herbert", t0()).unwrap();
    let id = book.id;
    store.insert(Entity::Book(book)).unwrap();
    store.save().await.unwrap();

    // nothing else staged in the session
    let mut session = EditSession::open(&store, id).unwrap();
    let quote = session
        .add_quote(&mut store, "The spice must flow.", None)
        .await
        .unwrap();

    let reopened = config.open_store().await.unwrap();
    assert_eq!(reopened.book(id).unwrap().quotes, vec![quote]);
    assert_eq!(reopened.quote(quote).unwrap().text, "The spice must flow.");
}

#[tokio::test]
async fn test_bad_cover_pick_leaves_saved_cover() {
    let clock = ManualClock::new(t0());
    let mut store = seeded_store(&clock);
    let id = find(&store, "Sapiens").id;

    let mut session = EditSession::open(&store, id).unwrap();
    session.set_cover(Some(vec![9, 9, 9]));
    session.commit(&mut store).await.unwrap();

    let picker = CoverPicker::new();
    let token = picker.select();
    let load = picker
        .load(token, async { Err::<Vec<u8>, _>("file vanished") })
        .await;
    session.apply_cover(load);
    session.commit(&mut store).await.unwrap();

    assert_eq!(store.book(id).unwrap().cover_image, Some(vec![9, 9, 9]));
}

#[tokio::test]
async fn test_legacy_summary_field_is_migrated() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("library.json");
    let legacy = r#"{
        "books": [{
            "id": "0b2c3a4e-5f60-4718-8a9b-0c1d2e3f4a5b",
            "title": "Emma",
            "author": "Jane Austen",
            "date_added": "2021-04-01T00:00:00Z",
            "date_started": "0001-01-01T00:00:00Z",
            "date_completed": "0001-01-01T00:00:00Z",
            "summary": "Matchmaking in Highbury.",
            "rating": 4,
            "status": 0
        }]
    }"#;
    std::fs::write(&path, legacy).unwrap();

    let mut store = Store::open(FileBackend::new(&path)).await.unwrap();
    let book = find(&store, "Emma");
    assert_eq!(book.synopsis, "Matchmaking in Highbury.");
    assert_eq!(book.rating, Some(4));

    store.save().await.unwrap();
    let rewritten = std::fs::read_to_string(&path).unwrap();
    assert!(rewritten.contains("\"synopsis\": \"Matchmaking in Highbury.\""));
    assert!(!rewritten.contains("summary"));
}

#[tokio::test]
async fn test_unreadable_store_is_fatal() {
    let backend = MemoryBackend::with_json("this is not a library");
    assert!(matches!(
        Store::open(backend).await,
        Err(StoreError::Unavailable(_))
    ));
}
