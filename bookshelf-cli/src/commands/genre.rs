//! Genre commands

use super::{resolve_book, resolve_genre, short_id};
use anyhow::Result;
use bookshelf_core::{genre_color, EditSession, Entity, EntityKey, Genre, Store};
use serde::Serialize;

#[derive(Serialize)]
struct GenreRow {
    id: String,
    name: String,
    color: String,
    books: usize,
}

pub async fn genre_add(store: &mut Store, name: &str, color: &str) -> Result<()> {
    // Stored as given; unparseable colours fall back to red when displayed
    let display = genre_color(color);
    let genre = Genre::new(name, color);
    let id = genre.id;
    store.insert(Entity::Genre(genre))?;
    store.save().await?;

    println!("Added genre '{}' ({}) as {}", name, display, id);
    Ok(())
}

pub fn genre_list(store: &Store, json: bool) -> Result<()> {
    let books = store.query(&Default::default());
    let rows: Vec<GenreRow> = store
        .genres()
        .into_iter()
        .map(|g| GenreRow {
            id: g.id.to_string(),
            name: g.name.clone(),
            color: g.color().to_hex(),
            books: books.iter().filter(|b| b.has_genre(g.id)).count(),
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if rows.is_empty() {
        println!("No genres");
        return Ok(());
    }

    for row in rows {
        println!(
            "{}  {}  {} ({} books)",
            short_id(&row.id),
            row.color,
            row.name,
            row.books
        );
    }
    Ok(())
}

/// Delete a genre; books tagged with it lose the tag
pub async fn genre_delete(store: &mut Store, genre: &str) -> Result<()> {
    let id = resolve_genre(store, genre)?;
    let name = store.genre(id).map(|g| g.name.clone()).unwrap_or_default();

    store.delete(EntityKey::Genre(id))?;
    store.save().await?;

    println!("Deleted genre '{}'", name);
    Ok(())
}

pub async fn genre_toggle(store: &mut Store, book: &str, genre: &str) -> Result<()> {
    let book_id = resolve_book(store, book)?;
    let genre_id = resolve_genre(store, genre)?;
    let name = store.genre(genre_id).map(|g| g.name.clone()).unwrap_or_default();

    let mut session = EditSession::open(store, book_id)?;
    session.toggle_genre(genre_id);
    session.commit(store).await?;

    if session.genres().contains(&genre_id) {
        println!("Tagged '{}' with {}", session.title(), name);
    } else {
        println!("Removed {} from '{}'", name, session.title());
    }
    Ok(())
}
