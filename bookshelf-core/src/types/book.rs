//! The main Book type - the central record of the library

use super::{not_set, BookId, GenreId, QuoteId, ReadingDates, Status};
use crate::error::ValidationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A book on the shelf
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Book {
    /// Unique identifier for this book (titles are not unique)
    pub id: BookId,

    pub title: String,

    pub author: String,

    pub date_added: DateTime<Utc>,

    /// [`not_set()`] until reading starts
    pub date_started: DateTime<Utc>,

    /// [`not_set()`] until reading finishes
    pub date_completed: DateTime<Utc>,

    /// Stored as `summary` before library version 2
    pub synopsis: String,

    /// 1 to 5 stars, `None` when unrated
    pub rating: Option<u8>,

    pub status: Status,

    #[serde(default)]
    pub recommended_by: String,

    /// Raw cover image bytes
    #[serde(default, with = "base64_opt")]
    pub cover_image: Option<Vec<u8>>,

    /// Genre tags (many-to-many, by identity)
    #[serde(default)]
    pub genres: Vec<GenreId>,

    /// Owned quotes
    #[serde(default)]
    pub quotes: Vec<QuoteId>,
}

impl Book {
    /// Create a new book on the shelf. Title and author must be non-empty.
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        date_added: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let title = title.into();
        let author = author.into();
        if title.is_empty() {
            return Err(ValidationError::EmptyField("title"));
        }
        if author.is_empty() {
            return Err(ValidationError::EmptyField("author"));
        }
        Ok(Self {
            id: BookId::new(),
            title,
            author,
            date_added,
            date_started: not_set(),
            date_completed: not_set(),
            synopsis: String::new(),
            rating: None,
            status: Status::OnShelf,
            recommended_by: String::new(),
            cover_image: None,
            genres: Vec::new(),
            quotes: Vec::new(),
        })
    }

    /// Set synopsis
    pub fn with_synopsis(mut self, synopsis: impl Into<String>) -> Self {
        self.synopsis = synopsis.into();
        self
    }

    /// Set status together with the dates that go with it
    pub fn with_progress(mut self, status: Status, started: DateTime<Utc>, completed: DateTime<Utc>) -> Self {
        self.status = status;
        self.date_started = started;
        self.date_completed = completed;
        self
    }

    /// Set rating
    pub fn with_rating(mut self, rating: u8) -> Self {
        self.rating = Some(rating);
        self
    }

    /// Set who recommended the book
    pub fn with_recommended_by(mut self, name: impl Into<String>) -> Self {
        self.recommended_by = name.into();
        self
    }

    pub fn dates(&self) -> ReadingDates {
        ReadingDates {
            added: self.date_added,
            started: self.date_started,
            completed: self.date_completed,
        }
    }

    pub fn icon(&self) -> &'static str {
        self.status.icon()
    }

    pub fn has_genre(&self, genre: GenreId) -> bool {
        self.genres.contains(&genre)
    }
}

/// Check a rating is within 1..=5
pub fn validate_rating(rating: Option<u8>) -> Result<Option<u8>, ValidationError> {
    match rating {
        Some(r) if !(1..=5).contains(&r) => Err(ValidationError::RatingOutOfRange(r)),
        other => Ok(other),
    }
}

/// Base64 serialization for optional binary data
mod base64_opt {
    use base64::{engine::general_purpose::STANDARD, Engine};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(data: &Option<Vec<u8>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match data {
            Some(bytes) => serializer.serialize_some(&STANDARD.encode(bytes)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Vec<u8>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s: Option<String> = Option::deserialize(deserializer)?;
        s.map(|s| STANDARD.decode(&s).map_err(serde::de::Error::custom))
            .transpose()
    }
}
