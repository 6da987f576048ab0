//! Bookshelf Core Library
//!
//! This crate provides the data model and editing logic for the Bookshelf
//! reading tracker. Books, genres and quotes are plain records held by a
//! [`Store`]; changes to a book are staged in an [`EditSession`] and written
//! back with a single commit.

pub mod clock;
pub mod config;
pub mod cover;
pub mod error;
pub mod query;
pub mod relations;
pub mod session;
pub mod store;
pub mod transition;
pub mod types;

pub use config::StoreConfig;
pub use cover::{CoverLoad, CoverPicker, PickerToken};
pub use error::{Result, ShelfError, StoreError, ValidationError};
pub use query::{BookQuery, SortOrder};
pub use relations::toggle_genre;
pub use session::EditSession;
pub use store::{Entity, EntityKey, Store};
pub use transition::apply_status_change;
pub use types::{
    genre_color, not_set, status_icon, Book, BookId, Color, Genre, GenreId, Quote, QuoteId,
    ReadingDates, Status,
};

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_book_creation() {
        let book = Book::new("Test Book", "Test Author", Utc::now()).unwrap();
        assert_eq!(book.title, "Test Book");
        assert_eq!(book.status, Status::OnShelf);
    }
}
