//! Edit command: stage changes to a book and commit them together

use super::{resolve_book, resolve_genre};
use anyhow::Result;
use bookshelf_core::{CoverLoad, CoverPicker, EditSession, Status, Store};
use chrono::{DateTime, NaiveDate, Utc};
use clap::Args;
use std::path::PathBuf;

#[derive(Args)]
pub struct EditArgs {
    /// Book id (or unique prefix)
    pub book: String,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub author: Option<String>,

    #[arg(long)]
    pub synopsis: Option<String>,

    /// Star rating, 1 to 5
    #[arg(long, value_parser = parse_rating, conflicts_with = "clear_rating")]
    pub rating: Option<u8>,

    /// Remove the rating
    #[arg(long)]
    pub clear_rating: bool,

    /// Reading status (on-shelf, in-progress, completed)
    #[arg(long)]
    pub status: Option<Status>,

    /// Who recommended the book
    #[arg(long)]
    pub recommended_by: Option<String>,

    /// Date added (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub added: Option<DateTime<Utc>>,

    /// Date started (YYYY-MM-DD), applied after --status
    #[arg(long, value_parser = parse_date)]
    pub started: Option<DateTime<Utc>>,

    /// Date completed (YYYY-MM-DD), applied after --status
    #[arg(long, value_parser = parse_date)]
    pub completed: Option<DateTime<Utc>>,

    /// Cover image file
    #[arg(long, conflicts_with = "clear_cover")]
    pub cover: Option<PathBuf>,

    /// Remove the cover image
    #[arg(long)]
    pub clear_cover: bool,

    /// Tag or untag a genre (id or unique prefix), may be repeated
    #[arg(long = "genre")]
    pub genres: Vec<String>,
}

fn parse_rating(s: &str) -> Result<u8, String> {
    let rating: u8 = s
        .parse()
        .map_err(|_| format!("'{}' is not a number", s))?;
    if (1..=5).contains(&rating) {
        Ok(rating)
    } else {
        Err(format!("rating must be between 1 and 5, got {}", rating))
    }
}

fn parse_date(s: &str) -> Result<DateTime<Utc>, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map(|d| d.and_time(chrono::NaiveTime::MIN).and_utc())
        .map_err(|e| format!("'{}' is not a YYYY-MM-DD date: {}", s, e))
}

pub async fn edit(store: &mut Store, args: EditArgs) -> Result<()> {
    let id = resolve_book(store, &args.book)?;
    let mut session = EditSession::open(store, id)?;

    if let Some(title) = args.title {
        session.set_title(title);
    }
    if let Some(author) = args.author {
        session.set_author(author);
    }
    if let Some(synopsis) = args.synopsis {
        session.set_synopsis(synopsis);
    }
    if let Some(name) = args.recommended_by {
        session.set_recommended_by(name);
    }
    if args.clear_rating {
        session.set_rating(None)?;
    } else if let Some(rating) = args.rating {
        session.set_rating(Some(rating))?;
    }

    // Status first so explicit dates win over the transition's
    if let Some(status) = args.status {
        session.set_status(status);
    }
    if let Some(date) = args.added {
        session.set_date_added(date);
    }
    if let Some(date) = args.started {
        session.set_date_started(date);
    }
    if let Some(date) = args.completed {
        session.set_date_completed(date);
    }

    for genre in &args.genres {
        let genre = resolve_genre(store, genre)?;
        session.toggle_genre(genre);
    }

    if args.clear_cover {
        session.set_cover(None);
    } else if let Some(path) = args.cover {
        let picker = CoverPicker::new();
        let token = picker.select();
        let load = picker.load(token, tokio::fs::read(&path)).await;
        if load == CoverLoad::Failed {
            tracing::warn!("{} is not a readable image, cover left unchanged", path.display());
        }
        session.apply_cover(load);
    }

    for problem in session.validate() {
        tracing::warn!("{}", problem);
    }

    let changed = session.changed_fields(store)?;
    if changed.is_empty() {
        println!("No changes");
        return Ok(());
    }

    session.commit(store).await?;
    println!("Updated '{}': {}", session.title(), changed.join(", "));
    Ok(())
}
