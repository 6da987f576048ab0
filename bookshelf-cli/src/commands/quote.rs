//! Quote commands. Quote changes are saved immediately.

use super::{resolve_book, resolve_quote, short_id};
use anyhow::Result;
use bookshelf_core::{EditSession, Store};
use serde::Serialize;

#[derive(Serialize)]
struct QuoteRow {
    id: String,
    text: String,
    page: Option<String>,
    creation_date: String,
}

pub async fn quote_add(store: &mut Store, book: &str, text: &str, page: Option<String>) -> Result<()> {
    let book_id = resolve_book(store, book)?;
    let mut session = EditSession::open(store, book_id)?;
    let id = session.add_quote(store, text, page).await?;

    println!("Added quote {} to '{}'", id, session.title());
    Ok(())
}

pub async fn quote_update(
    store: &mut Store,
    book: &str,
    quote: &str,
    text: &str,
    page: Option<String>,
) -> Result<()> {
    let book_id = resolve_book(store, book)?;
    let quote_id = resolve_quote(store, book_id, quote)?;
    let mut session = EditSession::open(store, book_id)?;
    session.update_quote(store, quote_id, text, page).await?;

    println!("Updated quote {}", short_id(quote_id));
    Ok(())
}

pub async fn quote_delete(store: &mut Store, book: &str, quote: &str) -> Result<()> {
    let book_id = resolve_book(store, book)?;
    let quote_id = resolve_quote(store, book_id, quote)?;
    let mut session = EditSession::open(store, book_id)?;
    session.delete_quote(store, quote_id).await?;

    println!("Deleted quote {}", short_id(quote_id));
    Ok(())
}

pub fn quote_list(store: &Store, book: &str, json: bool) -> Result<()> {
    let book_id = resolve_book(store, book)?;
    let quotes = store.quotes_for(book_id);

    if json {
        let rows: Vec<QuoteRow> = quotes
            .iter()
            .map(|q| QuoteRow {
                id: q.id.to_string(),
                text: q.text.clone(),
                page: q.page.clone(),
                creation_date: q.creation_date.to_rfc3339(),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if quotes.is_empty() {
        println!("No quotes");
        return Ok(());
    }

    for quote in quotes {
        let page = quote
            .page
            .as_deref()
            .map(|p| format!(" (p. {})", p))
            .unwrap_or_default();
        println!("{}  \"{}\"{}", short_id(quote.id), quote.text, page);
    }
    Ok(())
}
