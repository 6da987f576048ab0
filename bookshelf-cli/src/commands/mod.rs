//! CLI command implementations

mod books;
mod edit;
mod genre;
mod quote;

pub use books::{add, delete, list, seed, show};
pub use edit::{edit, EditArgs};
pub use genre::{genre_add, genre_delete, genre_list, genre_toggle};
pub use quote::{quote_add, quote_delete, quote_list, quote_update};

use anyhow::{bail, Result};
use bookshelf_core::types::is_set;
use bookshelf_core::{BookId, BookQuery, GenreId, QuoteId, Store};
use chrono::{DateTime, Utc};
use std::fmt::Display;

/// Find the single id starting with `input`
fn resolve<T: Copy + Display>(kind: &str, input: &str, ids: impl IntoIterator<Item = T>) -> Result<T> {
    let needle = input.trim().to_lowercase();
    if needle.is_empty() {
        bail!("Empty {} id", kind);
    }

    let matches: Vec<T> = ids
        .into_iter()
        .filter(|id| id.to_string().starts_with(&needle))
        .collect();

    match matches.as_slice() {
        [one] => Ok(*one),
        [] => bail!("No {} matches '{}'", kind, input),
        _ => bail!(
            "'{}' matches {} {}s, use a longer prefix",
            input,
            matches.len(),
            kind
        ),
    }
}

pub(crate) fn resolve_book(store: &Store, input: &str) -> Result<BookId> {
    let ids: Vec<BookId> = store.query(&BookQuery::default()).iter().map(|b| b.id).collect();
    resolve("book", input, ids)
}

pub(crate) fn resolve_genre(store: &Store, input: &str) -> Result<GenreId> {
    let ids: Vec<GenreId> = store.genres().iter().map(|g| g.id).collect();
    resolve("genre", input, ids)
}

/// Quotes are looked up among the given book's quotes only
pub(crate) fn resolve_quote(store: &Store, book: BookId, input: &str) -> Result<QuoteId> {
    let ids: Vec<QuoteId> = store.quotes_for(book).iter().map(|q| q.id).collect();
    resolve("quote", input, ids)
}

/// First eight characters of an id
pub(crate) fn short_id(id: impl Display) -> String {
    id.to_string().chars().take(8).collect()
}

pub(crate) fn format_date(date: &DateTime<Utc>) -> String {
    if is_set(date) {
        date.format("%Y-%m-%d").to_string()
    } else {
        "-".to_string()
    }
}

/// A date for JSON output, `None` when not set
pub(crate) fn json_date(date: &DateTime<Utc>) -> Option<String> {
    is_set(date).then(|| date.to_rfc3339())
}

pub(crate) fn stars(rating: Option<u8>) -> String {
    rating.map(|r| "*".repeat(usize::from(r))).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookshelf_core::not_set;

    #[test]
    fn test_resolve_prefix() {
        let a = BookId::new();
        let b = BookId::new();
        let full = a.to_string();
        assert_eq!(resolve("book", &full, [a, b]).unwrap(), a);
        assert_eq!(resolve("book", &full.to_uppercase(), [a, b]).unwrap(), a);
        assert!(resolve("book", "", [a, b]).is_err());
        assert!(resolve("book", "zzzz", [a, b]).is_err());
    }

    #[test]
    fn test_resolve_ambiguous() {
        let a: BookId = "11111111-1111-4111-8111-000000000001".parse().unwrap();
        let b: BookId = "11111111-1111-4111-8111-000000000002".parse().unwrap();
        let err = resolve("book", "1111", [a, b]).unwrap_err();
        assert!(err.to_string().contains("matches 2 books"));
        assert_eq!(resolve("book", "11111111-1111-4111-8111-000000000002", [a, b]).unwrap(), b);
    }

    #[test]
    fn test_formatting() {
        assert_eq!(format_date(&not_set()), "-");
        assert_eq!(json_date(&not_set()), None);
        assert_eq!(stars(Some(3)), "***");
        assert_eq!(stars(None), "");
        assert_eq!(short_id(BookId::new()).len(), 8);
    }
}
