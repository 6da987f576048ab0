//! The record store: books, genres and quotes keyed by id
//!
//! All relationship traversal goes through id lookups here. The store keeps
//! the whole library in memory and flushes it to a [`Backend`] on `save`.

mod backend;
mod document;

pub use backend::{Backend, BackendResult, FileBackend, MemoryBackend};
pub use document::{migrate, LibraryDocument, CURRENT_VERSION};

use crate::clock::{SharedClock, SystemClock};
use crate::error::StoreError;
use crate::query::BookQuery;
use crate::types::{Book, BookId, Genre, GenreId, Quote, QuoteId};
use std::collections::HashMap;
use std::sync::Arc;

/// Result type for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// A record to insert
#[derive(Debug, Clone)]
pub enum Entity {
    Book(Book),
    Genre(Genre),
    Quote(Quote),
}

/// A record to delete
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKey {
    Book(BookId),
    Genre(GenreId),
    Quote(QuoteId),
}

/// In-memory library backed by a persistence [`Backend`]
pub struct Store {
    books: HashMap<BookId, Book>,
    genres: HashMap<GenreId, Genre>,
    quotes: HashMap<QuoteId, Quote>,
    backend: Box<dyn Backend>,
    clock: SharedClock,
}

impl Store {
    /// An empty store that has not been loaded from anywhere
    pub fn new(backend: impl Backend + 'static) -> Self {
        Self {
            books: HashMap::new(),
            genres: HashMap::new(),
            quotes: HashMap::new(),
            backend: Box::new(backend),
            clock: Arc::new(SystemClock),
        }
    }

    /// An empty store on a fresh [`MemoryBackend`]
    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::new())
    }

    /// Load the library from `backend`.
    ///
    /// Any failure to read the document is reported as
    /// [`StoreError::Unavailable`]; callers should not continue without a store.
    pub async fn open(backend: impl Backend + 'static) -> StoreResult<Self> {
        let mut store = Self::new(backend);
        let loaded = store.backend.load().await.map_err(|e| match e {
            StoreError::UnsupportedVersion { .. } => e,
            other => StoreError::Unavailable(format!("{}: {}", store.backend.describe(), other)),
        })?;

        if let Some(document) = loaded {
            store.books = document.books.into_iter().map(|b| (b.id, b)).collect();
            store.genres = document.genres.into_iter().map(|g| (g.id, g)).collect();
            store.quotes = document.quotes.into_iter().map(|q| (q.id, q)).collect();
        }

        tracing::info!(
            "Opened library at {} ({} books, {} genres, {} quotes)",
            store.backend.describe(),
            store.books.len(),
            store.genres.len(),
            store.quotes.len()
        );
        Ok(store)
    }

    /// Use a different clock for "now" timestamps
    pub fn with_clock(mut self, clock: SharedClock) -> Self {
        self.clock = clock;
        self
    }

    pub fn clock(&self) -> SharedClock {
        Arc::clone(&self.clock)
    }

    /// Insert or replace a record.
    ///
    /// A quote is attached to its owning book, which must exist.
    pub fn insert(&mut self, entity: Entity) -> StoreResult<()> {
        match entity {
            Entity::Book(book) => {
                tracing::debug!("Insert book {} ({})", book.id, book.title);
                self.books.insert(book.id, book);
            }
            Entity::Genre(genre) => {
                tracing::debug!("Insert genre {} ({})", genre.id, genre.name);
                self.genres.insert(genre.id, genre);
            }
            Entity::Quote(quote) => {
                let owner = self
                    .books
                    .get_mut(&quote.book_id)
                    .ok_or_else(|| StoreError::stale("book", quote.book_id))?;
                if !owner.quotes.contains(&quote.id) {
                    owner.quotes.push(quote.id);
                }
                tracing::debug!("Insert quote {} on book {}", quote.id, quote.book_id);
                self.quotes.insert(quote.id, quote);
            }
        }
        Ok(())
    }

    /// Delete a record.
    ///
    /// Deleting a book deletes its quotes. Deleting a genre detaches it from
    /// every book. Deleting a quote removes it from its book.
    pub fn delete(&mut self, key: EntityKey) -> StoreResult<()> {
        match key {
            EntityKey::Book(id) => {
                let book = self.books.remove(&id).ok_or_else(|| StoreError::stale("book", id))?;
                self.quotes.retain(|_, q| q.book_id != id);
                tracing::debug!(
                    "Deleted book {} with {} quotes",
                    id,
                    book.quotes.len()
                );
            }
            EntityKey::Genre(id) => {
                self.genres.remove(&id).ok_or_else(|| StoreError::stale("genre", id))?;
                let mut detached = 0;
                for book in self.books.values_mut() {
                    let before = book.genres.len();
                    book.genres.retain(|g| *g != id);
                    detached += before - book.genres.len();
                }
                tracing::debug!("Deleted genre {}, detached from {} books", id, detached);
            }
            EntityKey::Quote(id) => {
                let quote = self.quotes.remove(&id).ok_or_else(|| StoreError::stale("quote", id))?;
                if let Some(owner) = self.books.get_mut(&quote.book_id) {
                    owner.quotes.retain(|q| *q != id);
                }
                tracing::debug!("Deleted quote {}", id);
            }
        }
        Ok(())
    }

    pub fn book(&self, id: BookId) -> Option<&Book> {
        self.books.get(&id)
    }

    pub fn genre(&self, id: GenreId) -> Option<&Genre> {
        self.genres.get(&id)
    }

    pub fn quote(&self, id: QuoteId) -> Option<&Quote> {
        self.quotes.get(&id)
    }

    pub(crate) fn book_mut(&mut self, id: BookId) -> StoreResult<&mut Book> {
        self.books.get_mut(&id).ok_or_else(|| StoreError::stale("book", id))
    }

    pub(crate) fn quote_mut(&mut self, id: QuoteId) -> StoreResult<&mut Quote> {
        self.quotes.get_mut(&id).ok_or_else(|| StoreError::stale("quote", id))
    }

    /// Books matching `query`, in its sort order
    pub fn query(&self, query: &BookQuery) -> Vec<&Book> {
        query.apply(self.books.values())
    }

    /// All genres, sorted by name
    pub fn genres(&self) -> Vec<&Genre> {
        let mut genres: Vec<&Genre> = self.genres.values().collect();
        genres.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        genres
    }

    /// Resolve genre ids, sorted by name. Unknown ids are skipped.
    pub fn resolve_genres(&self, ids: &[GenreId]) -> Vec<&Genre> {
        let mut genres: Vec<&Genre> = ids.iter().filter_map(|id| self.genres.get(id)).collect();
        genres.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        genres
    }

    /// Resolve quote ids, oldest first. Unknown ids are skipped.
    pub fn resolve_quotes(&self, ids: &[QuoteId]) -> Vec<&Quote> {
        let mut quotes: Vec<&Quote> = ids.iter().filter_map(|id| self.quotes.get(id)).collect();
        quotes.sort_by(|a, b| a.creation_date.cmp(&b.creation_date));
        quotes
    }

    /// A book's quotes, oldest first
    pub fn quotes_for(&self, book: BookId) -> Vec<&Quote> {
        match self.books.get(&book) {
            Some(book) => self.resolve_quotes(&book.quotes),
            None => Vec::new(),
        }
    }

    pub fn book_count(&self) -> usize {
        self.books.len()
    }

    /// Snapshot of the whole library in a stable order
    pub fn document(&self) -> LibraryDocument {
        let mut books: Vec<Book> = self.books.values().cloned().collect();
        books.sort_by(|a, b| a.date_added.cmp(&b.date_added).then_with(|| a.id.cmp(&b.id)));
        let genres = self.genres().into_iter().cloned().collect();
        let mut quotes: Vec<Quote> = self.quotes.values().cloned().collect();
        quotes.sort_by(|a, b| a.creation_date.cmp(&b.creation_date).then_with(|| a.id.cmp(&b.id)));

        LibraryDocument {
            version: CURRENT_VERSION,
            books,
            genres,
            quotes,
        }
    }

    /// Flush the library to the backend
    pub async fn save(&mut self) -> StoreResult<()> {
        let document = self.document();
        self.backend.save(&document).await?;
        tracing::debug!("Saved library to {}", self.backend.describe());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::SortOrder;
    use crate::types::sample_books;
    use async_trait::async_trait;
    use chrono::Utc;

    fn book(title: &str) -> Book {
        Book::new(title, "Author", Utc::now()).unwrap()
    }

    struct BrokenBackend;

    #[async_trait]
    impl Backend for BrokenBackend {
        async fn load(&self) -> BackendResult<Option<LibraryDocument>> {
            Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "locked").into())
        }

        async fn save(&self, _document: &LibraryDocument) -> BackendResult<()> {
            Ok(())
        }

        fn describe(&self) -> String {
            "broken".to_string()
        }
    }

    #[tokio::test]
    async fn test_open_failure_is_unavailable() {
        let result = Store::open(BrokenBackend).await;
        assert!(matches!(result, Err(StoreError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_save_and_reopen() {
        let backend = MemoryBackend::new();
        let mut store = Store::new(backend.clone());
        for b in sample_books() {
            store.insert(Entity::Book(b)).unwrap();
        }
        store.save().await.unwrap();
        assert_eq!(backend.saves(), 1);

        let reopened = Store::open(backend).await.unwrap();
        assert_eq!(reopened.book_count(), 5);
        assert_eq!(reopened.document(), store.document());
    }

    #[test]
    fn test_quote_needs_owner() {
        let mut store = Store::in_memory();
        let orphan = Quote::new(BookId::new(), "Lost", None, Utc::now()).unwrap();
        let err = store.insert(Entity::Quote(orphan)).unwrap_err();
        assert!(matches!(err, StoreError::StaleReference { kind: "book", .. }));
    }

    #[test]
    fn test_delete_book_cascades_quotes() {
        let mut store = Store::in_memory();
        let keep = book("Keep");
        let doomed = book("Doomed");
        let (keep_id, doomed_id) = (keep.id, doomed.id);
        store.insert(Entity::Book(keep)).unwrap();
        store.insert(Entity::Book(doomed)).unwrap();

        let kept_quote = Quote::new(keep_id, "stay", None, Utc::now()).unwrap();
        let kept_quote_id = kept_quote.id;
        store.insert(Entity::Quote(kept_quote)).unwrap();
        for text in ["one", "two"] {
            let q = Quote::new(doomed_id, text, None, Utc::now()).unwrap();
            store.insert(Entity::Quote(q)).unwrap();
        }
        assert_eq!(store.quotes_for(doomed_id).len(), 2);

        store.delete(EntityKey::Book(doomed_id)).unwrap();
        assert!(store.book(doomed_id).is_none());
        assert_eq!(store.document().quotes.len(), 1);
        assert!(store.quote(kept_quote_id).is_some());
    }

    #[test]
    fn test_delete_genre_detaches_from_books() {
        let mut store = Store::in_memory();
        let fantasy = Genre::new("Fantasy", "#6A5ACD");
        let poetry = Genre::new("Poetry", "#FF6347");
        let (fantasy_id, poetry_id) = (fantasy.id, poetry.id);
        store.insert(Entity::Genre(fantasy)).unwrap();
        store.insert(Entity::Genre(poetry)).unwrap();

        let mut a = book("A");
        a.genres = vec![fantasy_id, poetry_id];
        let mut b = book("B");
        b.genres = vec![fantasy_id];
        let (a_id, b_id) = (a.id, b.id);
        store.insert(Entity::Book(a)).unwrap();
        store.insert(Entity::Book(b)).unwrap();

        store.delete(EntityKey::Genre(fantasy_id)).unwrap();
        assert_eq!(store.book_count(), 2);
        assert_eq!(store.book(a_id).unwrap().genres, vec![poetry_id]);
        assert!(store.book(b_id).unwrap().genres.is_empty());
        assert_eq!(store.genres().len(), 1);
    }

    #[test]
    fn test_delete_missing_is_stale() {
        let mut store = Store::in_memory();
        let err = store.delete(EntityKey::Book(BookId::new())).unwrap_err();
        assert!(matches!(err, StoreError::StaleReference { kind: "book", .. }));
    }

    #[test]
    fn test_delete_quote_detaches_from_book() {
        let mut store = Store::in_memory();
        let b = book("Quoted");
        let id = b.id;
        store.insert(Entity::Book(b)).unwrap();
        let q = Quote::new(id, "line", Some("3".to_string()), Utc::now()).unwrap();
        let qid = q.id;
        store.insert(Entity::Quote(q)).unwrap();
        assert_eq!(store.book(id).unwrap().quotes, vec![qid]);

        store.delete(EntityKey::Quote(qid)).unwrap();
        assert!(store.book(id).unwrap().quotes.is_empty());
        assert!(store.quote(qid).is_none());
    }

    #[test]
    fn test_query_and_genre_listing() {
        let mut store = Store::in_memory();
        for b in sample_books() {
            store.insert(Entity::Book(b)).unwrap();
        }
        for g in crate::types::sample_genres() {
            store.insert(Entity::Genre(g)).unwrap();
        }

        let listed = store.query(&BookQuery::new(SortOrder::Title).with_filter("pride"));
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].title, "Pride and Prejudice");

        let names: Vec<_> = store.genres().iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names.first(), Some(&"Biography"));
        assert_eq!(names.last(), Some(&"Thriller"));
    }
}
