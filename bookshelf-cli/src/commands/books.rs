//! Book commands: seed, add, list, show, delete

use super::{format_date, json_date, resolve_book, short_id, stars};
use anyhow::{bail, Context, Result};
use bookshelf_core::clock::Clock;
use bookshelf_core::types::{sample_books, sample_genres};
use bookshelf_core::{Book, BookQuery, Entity, EntityKey, SortOrder, Store};
use serde::Serialize;

#[derive(Serialize)]
struct BookSummary {
    id: String,
    title: String,
    author: String,
    status: String,
    icon: &'static str,
    rating: Option<u8>,
}

impl From<&Book> for BookSummary {
    fn from(book: &Book) -> Self {
        Self {
            id: book.id.to_string(),
            title: book.title.clone(),
            author: book.author.clone(),
            status: book.status.to_string(),
            icon: book.icon(),
            rating: book.rating,
        }
    }
}

#[derive(Serialize)]
struct GenreTag {
    id: String,
    name: String,
    color: String,
}

#[derive(Serialize)]
struct QuoteLine {
    id: String,
    text: String,
    page: Option<String>,
    creation_date: String,
}

#[derive(Serialize)]
struct BookDetails {
    id: String,
    title: String,
    author: String,
    status: String,
    icon: &'static str,
    date_added: String,
    date_started: Option<String>,
    date_completed: Option<String>,
    synopsis: String,
    rating: Option<u8>,
    recommended_by: String,
    cover_bytes: Option<usize>,
    genres: Vec<GenreTag>,
    quotes: Vec<QuoteLine>,
}

/// Fill an empty library with the sample books and genres
pub async fn seed(store: &mut Store) -> Result<()> {
    if store.book_count() > 0 {
        bail!(
            "Library already has {} books, seeding only works on an empty library",
            store.book_count()
        );
    }

    let books = sample_books();
    let genres = sample_genres();
    let (book_count, genre_count) = (books.len(), genres.len());

    for book in books {
        store.insert(Entity::Book(book))?;
    }
    for genre in genres {
        store.insert(Entity::Genre(genre))?;
    }
    store.save().await.context("Failed to save seeded library")?;

    println!("Seeded {} books and {} genres", book_count, genre_count);
    Ok(())
}

/// Put a new book on the shelf
pub async fn add(store: &mut Store, title: &str, author: &str) -> Result<()> {
    let book = Book::new(title, author, store.clock().now())?;
    let id = book.id;
    store.insert(Entity::Book(book))?;
    store.save().await?;

    tracing::debug!("Added book {}", id);
    println!("Added '{}' as {}", title, id);
    Ok(())
}

pub fn list(store: &Store, sort: SortOrder, filter: &str, json: bool) -> Result<()> {
    let query = BookQuery::new(sort).with_filter(filter);
    let books = store.query(&query);

    if json {
        let rows: Vec<BookSummary> = books.into_iter().map(BookSummary::from).collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if books.is_empty() {
        println!("No books found");
        return Ok(());
    }

    for book in books {
        println!(
            "{}  {:<12} {} by {} {}",
            short_id(book.id),
            book.icon(),
            book.title,
            book.author,
            stars(book.rating)
        );
    }
    Ok(())
}

pub fn show(store: &Store, book: &str, json: bool) -> Result<()> {
    let id = resolve_book(store, book)?;
    let Some(book) = store.book(id) else {
        bail!("Book {} not found", id);
    };
    let genres = store.resolve_genres(&book.genres);
    let quotes = store.resolve_quotes(&book.quotes);

    if json {
        let details = BookDetails {
            id: book.id.to_string(),
            title: book.title.clone(),
            author: book.author.clone(),
            status: book.status.to_string(),
            icon: book.icon(),
            date_added: book.date_added.to_rfc3339(),
            date_started: json_date(&book.date_started),
            date_completed: json_date(&book.date_completed),
            synopsis: book.synopsis.clone(),
            rating: book.rating,
            recommended_by: book.recommended_by.clone(),
            cover_bytes: book.cover_image.as_ref().map(Vec::len),
            genres: genres
                .iter()
                .map(|g| GenreTag {
                    id: g.id.to_string(),
                    name: g.name.clone(),
                    color: g.color().to_hex(),
                })
                .collect(),
            quotes: quotes
                .iter()
                .map(|q| QuoteLine {
                    id: q.id.to_string(),
                    text: q.text.clone(),
                    page: q.page.clone(),
                    creation_date: q.creation_date.to_rfc3339(),
                })
                .collect(),
        };
        println!("{}", serde_json::to_string_pretty(&details)?);
        return Ok(());
    }

    println!("{}", book.title);
    println!("  Author:     {}", book.author);
    println!("  Status:     {} [{}]", book.status, book.icon());
    println!("  Added:      {}", format_date(&book.date_added));
    println!("  Started:    {}", format_date(&book.date_started));
    println!("  Completed:  {}", format_date(&book.date_completed));
    if let Some(rating) = book.rating {
        println!("  Rating:     {} ({}/5)", stars(Some(rating)), rating);
    }
    if !book.recommended_by.is_empty() {
        println!("  From:       {}", book.recommended_by);
    }
    if let Some(cover) = &book.cover_image {
        println!("  Cover:      {} bytes", cover.len());
    }
    if !genres.is_empty() {
        let names: Vec<&str> = genres.iter().map(|g| g.name.as_str()).collect();
        println!("  Genres:     {}", names.join(", "));
    }
    if !book.synopsis.is_empty() {
        println!();
        println!("{}", book.synopsis);
    }
    if !quotes.is_empty() {
        println!();
        println!("Quotes:");
        for quote in quotes {
            match &quote.page {
                Some(page) => println!("  [{}] \"{}\" (p. {})", short_id(quote.id), quote.text, page),
                None => println!("  [{}] \"{}\"", short_id(quote.id), quote.text),
            }
        }
    }
    Ok(())
}

/// Remove a book along with its quotes
pub async fn delete(store: &mut Store, book: &str) -> Result<()> {
    let id = resolve_book(store, book)?;
    let title = store.book(id).map(|b| b.title.clone()).unwrap_or_default();

    store.delete(EntityKey::Book(id))?;
    store.save().await?;

    println!("Deleted '{}'", title);
    Ok(())
}
