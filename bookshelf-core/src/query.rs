//! Sorting and filtering of the book list

use crate::types::Book;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

/// List order for books
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// By status, then title
    #[default]
    Status,
    Title,
    Author,
}

impl SortOrder {
    pub fn compare(self, a: &Book, b: &Book) -> Ordering {
        let primary = match self {
            SortOrder::Status => a.status.cmp(&b.status).then_with(|| a.title.cmp(&b.title)),
            SortOrder::Title => a.title.cmp(&b.title),
            SortOrder::Author => a.author.cmp(&b.author),
        };
        // titles are not unique, so fall back to id for a stable listing
        primary.then_with(|| a.id.cmp(&b.id))
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "status" => Ok(SortOrder::Status),
            "title" => Ok(SortOrder::Title),
            "author" => Ok(SortOrder::Author),
            _ => Err(format!("unknown sort order '{}'", s)),
        }
    }
}

/// What the book list should show
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookQuery {
    pub sort: SortOrder,

    /// Case-insensitive substring of title or author; empty matches all
    pub filter: String,
}

impl BookQuery {
    pub fn new(sort: SortOrder) -> Self {
        Self {
            sort,
            filter: String::new(),
        }
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }

    pub fn matches(&self, book: &Book) -> bool {
        if self.filter.is_empty() {
            return true;
        }
        let needle = self.filter.to_lowercase();
        book.title.to_lowercase().contains(&needle) || book.author.to_lowercase().contains(&needle)
    }

    /// Filter and sort a set of books
    pub fn apply<'a>(&self, books: impl IntoIterator<Item = &'a Book>) -> Vec<&'a Book> {
        let mut matched: Vec<&Book> = books.into_iter().filter(|b| self.matches(b)).collect();
        matched.sort_by(|a, b| self.sort.compare(a, b));
        matched
    }
}
