//! Sample library content for seeding and demos

use super::{not_set, Book, Genre, Status};
use chrono::{DateTime, Utc};

fn at(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap_or_default()
}

/// A handful of books in every reading state
pub fn sample_books() -> Vec<Book> {
    let rows = [
        (
            "1984",
            "George Orwell",
            at(1_609_459_200),
            Status::Completed,
            at(1_610_064_000),
            at(1_612_841_600),
            "A dystopian novel about totalitarianism and surveillance.",
            Some(5),
            "Friend",
        ),
        (
            "To Kill a Mockingbird",
            "Harper Lee",
            at(1_612_150_400),
            Status::InProgress,
            at(1_614_928_000),
            not_set(),
            "A story about racial injustice and moral growth.",
            None,
            "",
        ),
        (
            "Pride and Prejudice",
            "Jane Austen",
            at(1_617_612_800),
            Status::OnShelf,
            not_set(),
            not_set(),
            "A classic romance novel exploring social status and marriage.",
            None,
            "Friend 2",
        ),
        (
            "The Great Gatsby",
            "F. Scott Fitzgerald",
            at(1_619_859_200),
            Status::Completed,
            at(1_620_032_000),
            at(1_620_377_600),
            "Set in the Jazz Age, it explores themes of decadence and excess.",
            Some(4),
            "",
        ),
        (
            "Sapiens",
            "Yuval Noah Harari",
            at(1_625_097_600),
            Status::InProgress,
            at(1_625_356_800),
            not_set(),
            "A history of human evolution and cultural development.",
            None,
            "Friend 3",
        ),
    ];

    rows.into_iter()
        .filter_map(
            |(title, author, added, status, started, completed, synopsis, rating, recommended)| {
                let mut book = Book::new(title, author, added)
                    .ok()?
                    .with_progress(status, started, completed)
                    .with_synopsis(synopsis)
                    .with_recommended_by(recommended);
                book.rating = rating;
                Some(book)
            },
        )
        .collect()
}

/// Default genre palette
pub fn sample_genres() -> Vec<Genre> {
    [
        ("Fantasy", "#6A5ACD"),
        ("Science Fiction", "#00CED1"),
        ("Mystery", "#8B008B"),
        ("Romance", "#FF69B4"),
        ("Horror", "#8B0000"),
        ("Thriller", "#FF4500"),
        ("Historical Fiction", "#DAA520"),
        ("Biography", "#228B22"),
        ("Self-Help", "#4682B4"),
        ("Poetry", "#FF6347"),
    ]
    .into_iter()
    .map(|(name, color)| Genre::new(name, color))
    .collect()
}
