//! Bookshelf CLI - Command-line interface for tracking a personal library

mod commands;

use anyhow::{Context, Result};
use bookshelf_core::{SortOrder, StoreConfig};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "bookshelf")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Directory holding library.json
    #[arg(long, global = true, env = "BOOKSHELF_DATA_DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fill an empty library with sample books and genres
    Seed,

    /// Add a book to the shelf
    Add {
        /// Book title
        title: String,

        /// Book author
        author: String,
    },

    /// List books
    List {
        /// Sort order (status, title, author)
        #[arg(short, long, default_value = "status")]
        sort: SortOrder,

        /// Only books whose title or author contains this text
        #[arg(short, long, default_value = "")]
        filter: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Display a book with its genres and quotes
    Show {
        /// Book id (or unique prefix)
        book: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Edit a book's fields and save them together
    Edit(commands::EditArgs),

    /// Delete a book and its quotes
    Delete {
        /// Book id (or unique prefix)
        book: String,
    },

    /// Manage genres
    #[command(subcommand)]
    Genre(GenreCommands),

    /// Manage a book's quotes
    #[command(subcommand)]
    Quote(QuoteCommands),
}

#[derive(Subcommand)]
enum GenreCommands {
    /// Create a genre
    Add {
        name: String,

        /// Display colour as hex
        #[arg(short, long, default_value = "#FF0000")]
        color: String,
    },

    /// List genres
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete a genre and untag every book
    Delete {
        /// Genre id (or unique prefix)
        genre: String,
    },

    /// Tag or untag a book
    Toggle {
        /// Book id (or unique prefix)
        book: String,

        /// Genre id (or unique prefix)
        genre: String,
    },
}

#[derive(Subcommand)]
enum QuoteCommands {
    /// Save a quote from a book
    Add {
        /// Book id (or unique prefix)
        book: String,

        text: String,

        /// Page reference
        #[arg(short, long)]
        page: Option<String>,
    },

    /// Change a quote's text and page
    Update {
        /// Book id (or unique prefix)
        book: String,

        /// Quote id (or unique prefix)
        quote: String,

        text: String,

        /// Page reference
        #[arg(short, long)]
        page: Option<String>,
    },

    /// Delete a quote
    Delete {
        /// Book id (or unique prefix)
        book: String,

        /// Quote id (or unique prefix)
        quote: String,
    },

    /// List a book's quotes, oldest first
    List {
        /// Book id (or unique prefix)
        book: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        "bookshelf_cli=debug,bookshelf_core=debug"
    } else {
        "bookshelf_cli=info,bookshelf_core=warn"
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = match cli.data_dir {
        Some(dir) => StoreConfig::new(dir),
        None => StoreConfig::from_env(),
    };

    // Nothing works without a store
    let mut store = config
        .open_store()
        .await
        .with_context(|| format!("Failed to open library in {}", config.data_dir().display()))?;

    match cli.command {
        Commands::Seed => commands::seed(&mut store).await,

        Commands::Add { title, author } => commands::add(&mut store, &title, &author).await,

        Commands::List { sort, filter, json } => commands::list(&store, sort, &filter, json),

        Commands::Show { book, json } => commands::show(&store, &book, json),

        Commands::Edit(args) => commands::edit(&mut store, args).await,

        Commands::Delete { book } => commands::delete(&mut store, &book).await,

        Commands::Genre(cmd) => match cmd {
            GenreCommands::Add { name, color } => {
                commands::genre_add(&mut store, &name, &color).await
            }
            GenreCommands::List { json } => commands::genre_list(&store, json),
            GenreCommands::Delete { genre } => commands::genre_delete(&mut store, &genre).await,
            GenreCommands::Toggle { book, genre } => {
                commands::genre_toggle(&mut store, &book, &genre).await
            }
        },

        Commands::Quote(cmd) => match cmd {
            QuoteCommands::Add { book, text, page } => {
                commands::quote_add(&mut store, &book, &text, page).await
            }
            QuoteCommands::Update {
                book,
                quote,
                text,
                page,
            } => commands::quote_update(&mut store, &book, &quote, &text, page).await,
            QuoteCommands::Delete { book, quote } => {
                commands::quote_delete(&mut store, &book, &quote).await
            }
            QuoteCommands::List { book, json } => commands::quote_list(&store, &book, json),
        },
    }
}

