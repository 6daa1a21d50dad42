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


//! Library store
//!
//! Owns the in-memory collection and keeps the library file in step with it.
//! Every mutation is written through to disk immediately.
//!
//! # Identity
//! Books are addressed by [`BookId`], handed out when a book enters the store.
//! Positional helpers (`remove_at`, `toggle_read_at`) exist for front ends that
//! list books by index; they resolve the position to an id first.
//!
//! # Failure Semantics
//! - `load()` on a missing file leaves the library empty and returns `Ok(false)`
//! - `load()` on an unreadable file returns `StorageRead` and keeps the books
//!   already in memory
//! - when a write fails after a mutation, the mutation stays in memory and
//!   `StorageWrite` is returned; calling `save()` again retries the write

use std::path::Path;

use chrono::Local;
use tracing::{debug, info, warn};

use crate::config::LibraryConfig;
use crate::error::Result;
use crate::file::LibraryFile;
use crate::storage::models::{BookId, LibraryBook, NewBook, SearchField};
use crate::storage::stats::LibraryStats;

/// In-memory library backed by a JSON file
#[derive(Debug)]
pub struct LibraryStore {
    file: LibraryFile,
    books: Vec<LibraryBook>,
}

impl LibraryStore {
    /// Create an empty store for the given file; nothing is read yet
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            file: LibraryFile::new(path.as_ref()),
            books: Vec::new(),
        }
    }

    pub fn from_config(config: &LibraryConfig) -> Self {
        Self::new(&config.library_path)
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Load books from disk, replacing the in-memory collection
    ///
    /// Returns `Ok(true)` if the file was read, `Ok(false)` if it does not exist.
    pub fn load(&mut self) -> Result<bool> {
        match self.file.read_books() {
            Ok(Some(books)) => {
                self.books = books.into_iter().map(LibraryBook::new).collect();
                info!(path = %self.path().display(), count = self.books.len(), "loaded library");
                Ok(true)
            }
            Ok(None) => {
                debug!(path = %self.path().display(), "no library file yet");
                self.books.clear();
                Ok(false)
            }
            Err(e) => {
                warn!(error = %e, "failed to load library, keeping current books");
                Err(e)
            }
        }
    }

    /// Write the whole collection to disk
    pub fn save(&self) -> Result<()> {
        self.file
            .write_books(self.books.iter().map(|entry| &entry.book))
            .map_err(|e| {
                warn!(error = %e, "failed to save library");
                e
            })?;
        info!(path = %self.path().display(), count = self.books.len(), "saved library");
        Ok(())
    }

    /// Validate, stamp with the current local time, append and persist
    pub fn add_book(&mut self, new_book: NewBook) -> Result<BookId> {
        if let Err(e) = new_book.validate() {
            warn!(error = %e, "rejected new book");
            return Err(e);
        }

        let entry = LibraryBook::new(new_book.into_book(Local::now().naive_local()));
        let id = entry.id;
        debug!(%id, title = %entry.book.title, "adding book");
        self.books.push(entry);

        self.save()?;
        Ok(id)
    }

    /// Remove a book by id
    ///
    /// Returns `Ok(false)` without touching the file if the id is unknown.
    pub fn remove(&mut self, id: BookId) -> Result<bool> {
        match self.position_of(id) {
            Some(index) => self.remove_index(index),
            None => Ok(false),
        }
    }

    /// Remove the book at a zero-based position
    ///
    /// Returns `Ok(false)` without touching the file if `index` is out of bounds.
    pub fn remove_at(&mut self, index: usize) -> Result<bool> {
        if index < self.books.len() {
            self.remove_index(index)
        } else {
            debug!(index, len = self.books.len(), "remove index out of bounds");
            Ok(false)
        }
    }

    fn remove_index(&mut self, index: usize) -> Result<bool> {
        let removed = self.books.remove(index);
        debug!(id = %removed.id, title = %removed.book.title, "removed book");
        self.save()?;
        Ok(true)
    }

    /// Flip the read status of a book by id and persist
    ///
    /// Returns the new status, or `None` if the id is unknown.
    pub fn toggle_read(&mut self, id: BookId) -> Result<Option<bool>> {
        match self.position_of(id) {
            Some(index) => self.toggle_index(index).map(Some),
            None => Ok(None),
        }
    }

    /// Flip the read status of the book at a zero-based position and persist
    pub fn toggle_read_at(&mut self, index: usize) -> Result<Option<bool>> {
        if index < self.books.len() {
            self.toggle_index(index).map(Some)
        } else {
            Ok(None)
        }
    }

    fn toggle_index(&mut self, index: usize) -> Result<bool> {
        let entry = &mut self.books[index];
        entry.book.read_status = !entry.book.read_status;
        let status = entry.book.read_status;
        debug!(id = %entry.id, read = status, "toggled read status");

        self.save()?;
        Ok(status)
    }

    /// Case-insensitive substring search on one field
    ///
    /// An empty term matches nothing.
    pub fn search(&self, term: &str, field: SearchField) -> Vec<&LibraryBook> {
        if term.is_empty() {
            return Vec::new();
        }

        let needle = term.to_lowercase();
        let results: Vec<&LibraryBook> = self
            .books
            .iter()
            .filter(|entry| entry.book.field(field).to_lowercase().contains(&needle))
            .collect();

        debug!(term, %field, matches = results.len(), "searched library");
        results
    }

    pub fn stats(&self) -> LibraryStats {
        LibraryStats::compute(self.books.iter().map(|entry| &entry.book))
    }

    /// All books in insertion order
    pub fn books(&self) -> &[LibraryBook] {
        &self.books
    }

    pub fn get(&self, id: BookId) -> Option<&LibraryBook> {
        self.books.iter().find(|entry| entry.id == id)
    }

    pub fn position_of(&self, id: BookId) -> Option<usize> {
        self.books.iter().position(|entry| entry.id == id)
    }

    pub fn id_at(&self, index: usize) -> Option<BookId> {
        self.books.get(index).map(|entry| entry.id)
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}
