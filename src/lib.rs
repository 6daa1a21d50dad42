//! Shelf: a personal library manager
//!
//! Records books (title, author, year, genre, read status) in a flat JSON
//! file, searches them and computes simple statistics. The [`LibraryStore`]
//! is the only stateful piece; front ends own one and call into it.
//!
//! ```no_run
//! use shelf_core::{LibraryConfig, LibraryStore, NewBook, SearchField};
//!
//! # fn example() -> shelf_core::Result<()> {
//! let mut store = LibraryStore::from_config(&LibraryConfig::from_env());
//! store.load()?;
//!
//! let id = store.add_book(NewBook::new("Dune", "Frank Herbert", 1965, "Fiction", false))?;
//! store.toggle_read(id)?;
//!
//! for entry in store.search("herbert", SearchField::Author) {
//!     println!("{} ({})", entry.book.title, entry.book.publication_year);
//! }
//! println!("{:.1}% read", store.stats().percent_read);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod file;
pub mod storage;

pub use config::LibraryConfig;
pub use error::{LibraryError, Result};
pub use storage::{Book, BookId, LibraryBook, LibraryStats, LibraryStore, NewBook, SearchField};
