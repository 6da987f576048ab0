//! Quotes captured from a book

use super::{BookId, QuoteId};
use crate::error::ValidationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A passage saved from a book. Always owned by exactly one book.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Quote {
    pub id: QuoteId,

    /// Owning book
    pub book_id: BookId,

    pub text: String,

    /// Free-form page reference ("12", "12-15", "xiv")
    pub page: Option<String>,

    /// Set once at creation; display sort key
    pub creation_date: DateTime<Utc>,
}

impl Quote {
    /// Create a quote, rejecting empty text
    pub fn new(
        book_id: BookId,
        text: impl Into<String>,
        page: Option<String>,
        creation_date: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let text = text.into();
        if text.is_empty() {
            return Err(ValidationError::EmptyField("text"));
        }
        Ok(Self {
            id: QuoteId::new(),
            book_id,
            text,
            page: normalize_page(page),
            creation_date,
        })
    }

    /// Replace text and page, leaving the creation date alone
    pub fn edit(
        &mut self,
        text: impl Into<String>,
        page: Option<String>,
    ) -> Result<(), ValidationError> {
        let text = text.into();
        if text.is_empty() {
            return Err(ValidationError::EmptyField("text"));
        }
        self.text = text;
        self.page = normalize_page(page);
        Ok(())
    }
}

/// An empty page reference means no page
fn normalize_page(page: Option<String>) -> Option<String> {
    page.filter(|p| !p.is_empty())
}

/// Sort quotes for display, oldest first
pub fn sort_for_display(quotes: &mut [Quote]) {
    quotes.sort_by(|a, b| a.creation_date.cmp(&b.creation_date));
}
