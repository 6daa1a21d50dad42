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


//! Library file reading and writing
//!
//! # Key Operations
//! - Read the JSON array of books (missing file is not an error)
//! - Write the whole collection atomically (temp file, fsync, rename)
//! - Parent directory creation on first save
//!
//! # File Layout
//! A JSON array with one object per book. Separators are `", "` between
//! items and `": "` between keys and values, on a single line, which is the
//! layout existing library files were written with. Strings are pure ASCII:
//! anything outside printable ASCII is written as a lowercase `\uXXXX` escape,
//! characters above U+FFFF as a UTF-16 surrogate pair.

use crate::error::{LibraryError, Result};
use crate::storage::models::Book;
use serde::Serializer as _;
use std::fs;
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// JSON formatter writing `", "` and `": "` separators on one line, ASCII only
#[derive(Debug, Clone, Copy, Default)]
pub struct SpacedFormatter;

impl serde_json::ser::Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        writer.write_all(b": ")
    }

    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        let mut start = 0;
        for (idx, ch) in fragment.char_indices() {
            // DEL is printable to serde_json but escaped in existing files
            if ch.is_ascii() && ch != '\x7f' {
                continue;
            }
            writer.write_all(&fragment.as_bytes()[start..idx])?;
            let mut units = [0u16; 2];
            for unit in ch.encode_utf16(&mut units) {
                write!(writer, "\\u{:04x}", unit)?;
            }
            start = idx + ch.len_utf8();
        }
        writer.write_all(&fragment.as_bytes()[start..])
    }
}

/// Serialize books to the on-disk JSON layout
pub fn encode_books<'a, I>(books: I) -> Result<Vec<u8>>
where
    I: IntoIterator<Item = &'a Book>,
{
    let mut buf = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, SpacedFormatter);
    (&mut serializer).collect_seq(books)?;
    Ok(buf)
}

/// Handle to the JSON file a library is persisted in
#[derive(Debug, Clone)]
pub struct LibraryFile {
    path: PathBuf,
}

impl LibraryFile {
    /// Create a handle; nothing is touched on disk until read or write
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Get the file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read all books
    ///
    /// Returns `Ok(None)` when the file does not exist. Any other I/O failure
    /// or malformed content is a `StorageRead` error.
    pub fn read_books(&self) -> Result<Option<Vec<Book>>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(LibraryError::read_failed(&self.path, e.to_string())),
        };

        let books: Vec<Book> = serde_json::from_str(&contents)
            .map_err(|e| LibraryError::read_failed(&self.path, e.to_string()))?;

        debug!(path = %self.path.display(), count = books.len(), "read library file");
        Ok(Some(books))
    }

    /// Overwrite the file with the given books
    pub fn write_books<'a, I>(&self, books: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a Book>,
    {
        let contents = encode_books(books)
            .map_err(|e| LibraryError::write_failed(&self.path, e.to_string()))?;

        self.ensure_parent_exists()?;
        self.atomic_write(&contents)?;

        debug!(path = %self.path.display(), bytes = contents.len(), "wrote library file");
        Ok(())
    }

    /// Create the parent directory if it is missing
    fn ensure_parent_exists(&self) -> Result<()> {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() && !parent.exists() => {
                fs::create_dir_all(parent).map_err(|e| {
                    LibraryError::write_failed(
                        &self.path,
                        format!("Failed to create directory {}: {}", parent.display(), e),
                    )
                })
            }
            _ => Ok(()),
        }
    }

    /// Temp file next to the target, so the final rename stays on one filesystem
    fn temp_path(&self) -> PathBuf {
        let name = format!(
            ".{}.tmp",
            self.path
                .file_name()
                .and_then(|s| s.to_str())
                .unwrap_or("library")
        );
        match self.path.parent() {
            Some(parent) => parent.join(name),
            None => PathBuf::from(name),
        }
    }

    /// Atomic write: write to temp file, sync, then rename over the target
    fn atomic_write(&self, contents: &[u8]) -> Result<()> {
        let temp_path = self.temp_path();

        let result = Self::write_synced(&temp_path, contents).and_then(|()| {
            fs::rename(&temp_path, &self.path).map_err(|e| {
                LibraryError::write_failed(
                    &self.path,
                    format!("Failed to rename temp file {}: {}", temp_path.display(), e),
                )
            })
        });

        if result.is_err() {
            // Leftover temp file is harmless but untidy
            let _ = fs::remove_file(&temp_path);
        }
        result
    }

    fn write_synced(temp_path: &Path, contents: &[u8]) -> Result<()> {
        let write = || -> io::Result<()> {
            let mut file = fs::File::create(temp_path)?;
            file.write_all(contents)?;
            file.sync_all()
        };

        write().map_err(|e| {
            LibraryError::write_failed(
                temp_path,
                format!("Failed to write temp file: {}", e),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn book(title: &str, year: i32) -> Book {
        Book {
            title: title.to_string(),
            author: "Octavia E. Butler".to_string(),
            publication_year: year,
            genre: "Fiction".to_string(),
            read_status: false,
            added_date: "2025-02-01 09:15:00".to_string(),
        }
    }

    #[test]
    fn test_encode_uses_spaced_separators() {
        let books = vec![book("Kindred", 1979)];
        let encoded = String::from_utf8(encode_books(&books).unwrap()).unwrap();

        assert_eq!(
            encoded,
            r#"[{"title": "Kindred", "author": "Octavia E. Butler", "publication_year": 1979, "genre": "Fiction", "read_status": false, "added_date": "2025-02-01 09:15:00"}]"#
        );
    }

    #[test]
    fn test_encode_escapes_non_ascii() {
        let mut books = vec![book("Caf\u{e9} \"Noir\"\\\n\u{7f}", 1979)];
        books[0].author = "G\u{f6}del \u{1F4DA}".to_string();
        let encoded = String::from_utf8(encode_books(&books).unwrap()).unwrap();

        assert!(encoded.is_ascii());
        assert!(encoded.contains(r#""title": "Caf\u00e9 \"Noir\"\\\n\u007f""#));
        assert!(encoded.contains(r#""author": "G\u00f6del \ud83d\udcda""#));
    }

    #[test]
    fn test_escaped_file_rewrite_is_byte_identical() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("library.json");
        let original = r#"[{"title": "Caf\u00e9 \u00e0 la carte", "author": "G\u00f6del \ud83d\udcda", "publication_year": 1931, "genre": "Science", "read_status": false, "added_date": "2025-01-02 03:04:05"}]"#;
        fs::write(&path, original).unwrap();

        let file = LibraryFile::new(&path);
        let books = file.read_books().unwrap().unwrap();
        assert_eq!(books[0].title, "Caf\u{e9} \u{e0} la carte");
        assert_eq!(books[0].author, "G\u{f6}del \u{1F4DA}");

        file.write_books(&books).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), original);
    }

    #[test]
    fn test_encode_empty_library() {
        let encoded = encode_books(&Vec::<Book>::new()).unwrap();
        assert_eq!(encoded, b"[]");
    }

    #[test]
    fn test_missing_file_reads_as_none() {
        let temp_dir = TempDir::new().unwrap();
        let file = LibraryFile::new(temp_dir.path().join("library.json"));

        assert!(!file.path().exists());
        assert!(file.read_books().unwrap().is_none());
    }

    #[test]
    fn test_write_then_read() {
        let temp_dir = TempDir::new().unwrap();
        let file = LibraryFile::new(temp_dir.path().join("nested").join("library.json"));
        let books = vec![book("Kindred", 1979), book("Parable of the Sower", 1993)];

        file.write_books(&books).unwrap();

        assert!(file.path().is_file());
        assert_eq!(file.read_books().unwrap(), Some(books));
        assert!(!temp_dir.path().join("nested").join(".library.json.tmp").exists());
    }

    #[test]
    fn test_rewrite_is_byte_identical() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("library.json");
        let original = r#"[{"title": "Kindred", "author": "Octavia E. Butler", "publication_year": 1979, "genre": "Fiction", "read_status": true, "added_date": "2024-12-24 18:00:00"}]"#;
        fs::write(&path, original).unwrap();

        let file = LibraryFile::new(&path);
        let books = file.read_books().unwrap().unwrap();
        file.write_books(&books).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), original);
    }

    #[test]
    fn test_corrupt_file_is_read_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("library.json");
        fs::write(&path, "[{\"title\": ").unwrap();

        let err = LibraryFile::new(&path).read_books().unwrap_err();
        assert!(matches!(err, LibraryError::StorageRead { .. }));
    }

    #[test]
    fn test_wrong_shape_is_read_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("library.json");
        fs::write(&path, r#"{"title": "not an array"}"#).unwrap();

        let err = LibraryFile::new(&path).read_books().unwrap_err();
        assert!(matches!(err, LibraryError::StorageRead { .. }));
    }

    #[test]
    fn test_write_into_directory_path_fails() {
        let temp_dir = TempDir::new().unwrap();
        // The target is an existing directory, so the rename cannot replace it
        let file = LibraryFile::new(temp_dir.path());

        let err = file.write_books(&[book("Kindred", 1979)]).unwrap_err();
        assert!(matches!(err, LibraryError::StorageWrite { .. }));
    }
}
