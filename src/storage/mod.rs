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


//! Library storage, models and statistics
//!
//! # Layout
//! - `models` - Book record, validated input, identifiers, search fields
//! - `store` - In-memory collection with write-through persistence
//! - `stats` - Totals and frequency tables
//!
//! # Usage Example
//! ```no_run
//! use shelf_core::storage::{LibraryStore, NewBook};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut store = LibraryStore::new("./library.json");
//! store.load()?;
//!
//! let new_book = NewBook::new("The Hobbit", "J. R. R. Tolkien", 1937, "Fiction", true);
//! let book_id = store.add_book(new_book)?;
//!
//! assert!(store.get(book_id).is_some());
//! # Ok(())
//! # }
//! ```

pub mod models;
pub mod stats;
pub mod store;

// Re-export commonly used types
pub use models::{Book, BookId, LibraryBook, NewBook, SearchField, KNOWN_GENRES};
pub use stats::LibraryStats;
pub use store::LibraryStore;
