// Shelf - Personal Library Manager
// Copyright (C) 2025 Henning Berge
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.


use std::path::PathBuf;

use anyhow::{anyhow, bail};
use clap::{Parser, Subcommand};
use shelf_core::storage::KNOWN_GENRES;
use shelf_core::{Book, LibraryConfig, LibraryError, LibraryStats, LibraryStore, NewBook, SearchField};
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "shelf-cli")]
#[command(about = "Shelf CLI - Personal library manager", long_about = None)]
struct Cli {
    /// Library file (defaults to $SHELF_LIBRARY, then ./library.json)
    #[arg(short, long, global = true)]
    library: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show every book with its position
    List,
    /// Add a book
    Add {
        /// Book title
        #[arg(short, long)]
        title: String,
        /// Book author
        #[arg(short, long)]
        author: String,
        /// Publication year
        #[arg(short, long)]
        year: i32,
        /// Genre (Fiction, Non-Fiction, Science, Technology)
        #[arg(short, long, default_value = "Fiction")]
        genre: String,
        /// Mark the book as already read
        #[arg(short, long)]
        read: bool,
    },
    /// Remove the book at a position shown by `list`
    Remove {
        index: usize,
    },
    /// Flip read/unread for the book at a position shown by `list`
    Toggle {
        index: usize,
    },
    /// Search one field, case-insensitively
    Search {
        term: String,
        /// Field to search: title, author or genre
        #[arg(short, long, default_value = "title")]
        by: SearchField,
    },
    /// Show totals and breakdowns by genre, author and decade
    Stats {
        /// Print machine-readable JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shelf_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn describe(index: usize, book: &Book) -> String {
    format!(
        "{:>3}. {} by {} ({})\n     Genre: {}, Status: {}",
        index,
        book.title,
        book.author,
        book.publication_year,
        book.genre,
        book.status_label()
    )
}

fn print_table<K: std::fmt::Display>(heading: &str, rows: &[(K, usize)], suffix: &str) {
    if rows.is_empty() {
        return;
    }
    println!("\n{}", heading);
    for (key, count) in rows {
        let label = format!("{}{}", key, suffix);
        println!("  {:<24} {}", label, count);
    }
}

fn print_stats(stats: &LibraryStats) {
    println!("Total Books: {}", stats.total_books);
    println!("Read Books:  {}", stats.read_books);
    println!("% Read:      {:.1}%", stats.percent_read);

    print_table("Top Genres", &stats.genres, "");
    print_table("Top Authors", &stats.authors, "");
    print_table("Books by Publication Decade", &stats.decades, "s");
}

/// Turn a store error into a CLI failure with the user-facing message
fn fail(e: LibraryError) -> anyhow::Error {
    anyhow!(e.user_message())
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = match cli.library {
        Some(path) => LibraryConfig::new(path),
        None => LibraryConfig::from_env(),
    };
    let mut store = LibraryStore::from_config(&config);

    // An unreadable library is reported, not fatal
    let load_failed = match store.load() {
        Ok(_) => false,
        Err(e) => {
            eprintln!("{}", e.user_message());
            true
        }
    };
    let ensure_writable = || -> anyhow::Result<()> {
        if load_failed {
            bail!(
                "Refusing to modify {}: it could not be read and saving would overwrite it",
                config.library_path.display()
            );
        }
        Ok(())
    };

    match cli.command {
        Commands::List => {
            if store.is_empty() {
                println!("Your library is empty!");
            }
            for (index, entry) in store.books().iter().enumerate() {
                println!("{}", describe(index, &entry.book));
            }
        }
        Commands::Add { title, author, year, genre, read } => {
            ensure_writable()?;
            if !KNOWN_GENRES.iter().any(|known| known.eq_ignore_ascii_case(&genre)) {
                warn!(%genre, "genre is not one of {:?}", KNOWN_GENRES);
            }
            let id = store
                .add_book(NewBook::new(title, author, year, genre, read))
                .map_err(fail)?;
            let position = store.position_of(id).unwrap_or_default();
            println!("Book added successfully!");
            if let Some(entry) = store.get(id) {
                println!("{}", describe(position, &entry.book));
            }
        }
        Commands::Remove { index } => {
            ensure_writable()?;
            let title = store.books().get(index).map(|entry| entry.book.title.clone());
            if !store.remove_at(index).map_err(fail)? {
                bail!("No book at position {} (library has {} books)", index, store.len());
            }
            println!("Removed '{}'", title.unwrap_or_default());
        }
        Commands::Toggle { index } => {
            ensure_writable()?;
            match store.toggle_read_at(index).map_err(fail)? {
                Some(read) => {
                    let title = &store.books()[index].book.title;
                    println!("Marked '{}' as {}", title, if read { "Read" } else { "Unread" });
                }
                None => bail!("No book at position {} (library has {} books)", index, store.len()),
            }
        }
        Commands::Search { term, by } => {
            if term.is_empty() {
                bail!("Enter a search term");
            }
            let results = store.search(&term, by);
            if results.is_empty() {
                println!("No results found.");
            } else {
                println!("Found {} result(s):", results.len());
                for entry in results {
                    let index = store.position_of(entry.id).unwrap_or_default();
                    println!("{}", describe(index, &entry.book));
                }
            }
        }
        Commands::Stats { json } => {
            let stats = store.stats();
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else if stats.is_empty() {
                println!("No books in library. Add some to see statistics.");
            } else {
                print_stats(&stats);
            }
        }
    }

    Ok(())
}
