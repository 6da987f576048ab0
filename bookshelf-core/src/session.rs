//! Edit sessions: staged, uncommitted changes to one book
//!
//! An [`EditSession`] copies every mutable field of a book when opened. Edits
//! only touch that copy until [`EditSession::commit`] writes all of it back in
//! one step and flushes the store once.
//!
//! Quotes are the exception: they are records of their own, so adding one
//! inserts it and commits the session straight away. Genre toggles stay staged
//! until the next commit.

use crate::clock::SharedClock;
use crate::cover::CoverLoad;
use crate::error::{Result, StoreError, ValidationError};
use crate::relations::{same_members, toggle_genre};
use crate::store::{Entity, EntityKey, Store, StoreResult};
use crate::transition::apply_status_change;
use crate::types::{
    validate_rating, Book, BookId, Genre, GenreId, Quote, QuoteId, ReadingDates, Status,
};
use chrono::{DateTime, Utc};

/// The staged copy of a book's mutable fields
///
/// `quotes` is compared but never written back: quote ids reach the
/// committed book only through [`Store::insert`] and [`Store::delete`].
/// A commit re-snapshots them instead.
#[derive(Debug, Clone, PartialEq)]
struct Draft {
    title: String,
    author: String,
    dates: ReadingDates,
    synopsis: String,
    rating: Option<u8>,
    status: Status,
    recommended_by: String,
    genres: Vec<GenreId>,
    quotes: Vec<QuoteId>,
    cover_image: Option<Vec<u8>>,
}

impl Draft {
    fn snapshot(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            author: book.author.clone(),
            dates: book.dates(),
            synopsis: book.synopsis.clone(),
            rating: book.rating,
            status: book.status,
            recommended_by: book.recommended_by.clone(),
            genres: book.genres.clone(),
            quotes: book.quotes.clone(),
            cover_image: book.cover_image.clone(),
        }
    }

    /// Names of the fields that differ from `book`
    fn changes(&self, book: &Book) -> Vec<&'static str> {
        let checks = [
            ("title", self.title != book.title),
            ("author", self.author != book.author),
            ("date_added", self.dates.added != book.date_added),
            ("date_started", self.dates.started != book.date_started),
            ("date_completed", self.dates.completed != book.date_completed),
            ("synopsis", self.synopsis != book.synopsis),
            ("rating", self.rating != book.rating),
            ("status", self.status != book.status),
            ("recommended_by", self.recommended_by != book.recommended_by),
            ("genres", !same_members(&self.genres, &book.genres)),
            ("quotes", !same_members(&self.quotes, &book.quotes)),
            ("cover_image", self.cover_image != book.cover_image),
        ];
        checks
            .into_iter()
            .filter_map(|(name, changed)| changed.then_some(name))
            .collect()
    }

    /// Write every field but `quotes` to `book` in one go
    fn apply_to(&self, book: &mut Book) {
        let Draft {
            title,
            author,
            dates,
            synopsis,
            rating,
            status,
            recommended_by,
            genres,
            cover_image,
            ..
        } = self.clone();

        book.title = title;
        book.author = author;
        book.date_added = dates.added;
        book.date_started = dates.started;
        book.date_completed = dates.completed;
        book.synopsis = synopsis;
        book.rating = rating;
        book.status = status;
        book.recommended_by = recommended_by;
        book.genres = genres;
        book.cover_image = cover_image;
    }
}

/// Staged edits to a single book
pub struct EditSession {
    book_id: BookId,
    draft: Draft,
    clock: SharedClock,
}

impl EditSession {
    /// Start editing `book_id`
    pub fn open(store: &Store, book_id: BookId) -> StoreResult<Self> {
        let book = store
            .book(book_id)
            .ok_or_else(|| StoreError::stale("book", book_id))?;
        tracing::debug!("Opened edit session for {} ({})", book.id, book.title);
        Ok(Self {
            book_id,
            draft: Draft::snapshot(book),
            clock: store.clock(),
        })
    }

    pub fn book_id(&self) -> BookId {
        self.book_id
    }

    pub fn title(&self) -> &str {
        &self.draft.title
    }

    pub fn author(&self) -> &str {
        &self.draft.author
    }

    pub fn dates(&self) -> ReadingDates {
        self.draft.dates
    }

    pub fn synopsis(&self) -> &str {
        &self.draft.synopsis
    }

    pub fn rating(&self) -> Option<u8> {
        self.draft.rating
    }

    pub fn status(&self) -> Status {
        self.draft.status
    }

    pub fn recommended_by(&self) -> &str {
        &self.draft.recommended_by
    }

    pub fn genres(&self) -> &[GenreId] {
        &self.draft.genres
    }

    pub fn quotes(&self) -> &[QuoteId] {
        &self.draft.quotes
    }

    pub fn cover_image(&self) -> Option<&[u8]> {
        self.draft.cover_image.as_deref()
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.draft.title = title.into();
    }

    pub fn set_author(&mut self, author: impl Into<String>) {
        self.draft.author = author.into();
    }

    pub fn set_synopsis(&mut self, synopsis: impl Into<String>) {
        self.draft.synopsis = synopsis.into();
    }

    pub fn set_recommended_by(&mut self, name: impl Into<String>) {
        self.draft.recommended_by = name.into();
    }

    /// Set or clear the rating; must be 1 to 5
    pub fn set_rating(&mut self, rating: Option<u8>) -> std::result::Result<(), ValidationError> {
        self.draft.rating = validate_rating(rating)?;
        Ok(())
    }

    pub fn set_date_added(&mut self, date: DateTime<Utc>) {
        self.draft.dates.added = date;
    }

    pub fn set_date_started(&mut self, date: DateTime<Utc>) {
        self.draft.dates.started = date;
    }

    pub fn set_date_completed(&mut self, date: DateTime<Utc>) {
        self.draft.dates.completed = date;
    }

    pub fn set_cover(&mut self, cover: Option<Vec<u8>>) {
        self.draft.cover_image = cover;
    }

    /// Stage the result of a cover load. Returns false if nothing changed:
    /// a failed or stale load keeps whatever cover was staged before.
    pub fn apply_cover(&mut self, load: CoverLoad) -> bool {
        match load {
            CoverLoad::Loaded(bytes) => {
                self.draft.cover_image = Some(bytes);
                true
            }
            CoverLoad::Failed | CoverLoad::Stale => false,
        }
    }

    /// Change the reading status, updating the staged dates to match
    pub fn set_status(&mut self, status: Status) {
        let old = self.draft.status;
        if old == status {
            return;
        }
        self.draft.dates = apply_status_change(old, status, self.draft.dates, self.clock.now());
        self.draft.status = status;
        tracing::debug!("Book {} status {} -> {}", self.book_id, old, status);
    }

    /// Tag or untag the book with `genre` (staged)
    pub fn toggle_genre(&mut self, genre: GenreId) {
        toggle_genre(&mut self.draft.genres, genre);
    }

    /// Staged genres resolved through the store, sorted by name
    pub fn genres_sorted<'a>(&self, store: &'a Store) -> Vec<&'a Genre> {
        store.resolve_genres(&self.draft.genres)
    }

    /// Staged quotes resolved through the store, oldest first
    pub fn quotes_sorted<'a>(&self, store: &'a Store) -> Vec<&'a Quote> {
        store.resolve_quotes(&self.draft.quotes)
    }

    /// Fields whose staged value differs from the stored book
    pub fn changed_fields(&self, store: &Store) -> StoreResult<Vec<&'static str>> {
        let book = store
            .book(self.book_id)
            .ok_or_else(|| StoreError::stale("book", self.book_id))?;
        Ok(self.draft.changes(book))
    }

    /// Whether there are unsaved changes. Checked against the store every time.
    pub fn is_dirty(&self, store: &Store) -> StoreResult<bool> {
        Ok(!self.changed_fields(store)?.is_empty())
    }

    /// Soft checks on the staged values. These never block a commit.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut problems = Vec::new();
        if self.draft.title.is_empty() {
            problems.push(ValidationError::EmptyField("title"));
        }
        if self.draft.author.is_empty() {
            problems.push(ValidationError::EmptyField("author"));
        }
        for (earlier, later) in self.draft.dates.ordering_violations() {
            problems.push(ValidationError::DateOrder { earlier, later });
        }
        problems
    }

    /// Write all staged fields to the book and flush the store.
    ///
    /// Fails with [`StoreError::StaleReference`] if the book has been deleted;
    /// the session should then be abandoned or reopened.
    pub async fn commit(&mut self, store: &mut Store) -> StoreResult<()> {
        if self.write_back(store)? {
            store.save().await?;
        }
        Ok(())
    }

    /// Apply staged fields to the stored book without flushing.
    /// Returns whether anything changed.
    fn write_back(&mut self, store: &mut Store) -> StoreResult<bool> {
        let changed = self.changed_fields(store)?;
        if changed.is_empty() {
            return Ok(false);
        }
        for problem in self.validate() {
            tracing::warn!("Committing book {} with {}", self.book_id, problem);
        }

        let book = store.book_mut(self.book_id)?;
        self.draft.apply_to(book);
        self.draft = Draft::snapshot(book);
        tracing::debug!("Committed book {}: {}", self.book_id, changed.join(", "));
        Ok(true)
    }

    /// Create a quote on this book, commit the session and flush the store.
    ///
    /// The store is always flushed, even when nothing else was staged.
    /// Empty text is rejected and nothing is created.
    pub async fn add_quote(
        &mut self,
        store: &mut Store,
        text: impl Into<String>,
        page: Option<String>,
    ) -> Result<QuoteId> {
        let quote = Quote::new(self.book_id, text, page, self.clock.now())?;
        let id = quote.id;
        store.insert(Entity::Quote(quote))?;
        self.write_back(store)?;
        store.save().await?;
        Ok(id)
    }

    /// Change a quote's text and page. Its creation date is kept.
    pub async fn update_quote(
        &mut self,
        store: &mut Store,
        quote_id: QuoteId,
        text: impl Into<String>,
        page: Option<String>,
    ) -> Result<()> {
        let quote = store.quote_mut(quote_id)?;
        if quote.book_id != self.book_id {
            return Err(StoreError::stale("quote", quote_id).into());
        }
        quote.edit(text, page)?;
        store.save().await?;
        Ok(())
    }

    /// Remove a quote from the book and delete it
    pub async fn delete_quote(&mut self, store: &mut Store, quote_id: QuoteId) -> Result<()> {
        match store.quote(quote_id) {
            Some(quote) if quote.book_id == self.book_id => {}
            _ => return Err(StoreError::stale("quote", quote_id).into()),
        }
        store.delete(EntityKey::Quote(quote_id))?;
        self.draft.quotes.retain(|q| *q != quote_id);
        store.save().await?;
        Ok(())
    }
}
