//! Library models for Shelf
//!
//! # Persisted Layout
//! - One JSON object per book, fields in declaration order of [`Book`]
//! - `publication_year` is an integer, `read_status` a boolean
//! - `added_date` is local time text in `YYYY-MM-DD HH:MM:SS`
//!
//! Identifiers ([`BookId`]) live only in memory. They are handed out when a
//! record enters a store and are never written to disk, so files produced by
//! older versions of the tool load and save unchanged.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{LibraryError, Result};

/// strftime layout of `added_date`
pub const ADDED_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Earliest publication year accepted for new books
pub const MIN_PUBLICATION_YEAR: i32 = 1000;

/// Genres offered when adding a book
pub const KNOWN_GENRES: [&str; 4] = ["Fiction", "Non-Fiction", "Science", "Technology"];

// ============================================================================
// IDENTIFIERS
// ============================================================================

/// Stable in-memory identifier of a book held by a store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BookId(Uuid);

impl BookId {
    pub fn new() -> Self {
        BookId(Uuid::new_v4())
    }
}

impl Default for BookId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// ENUMS
// ============================================================================

/// Field a search term is matched against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    Title,
    Author,
    Genre,
}

impl SearchField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchField::Title => "Title",
            SearchField::Author => "Author",
            SearchField::Genre => "Genre",
        }
    }
}

impl FromStr for SearchField {
    type Err = LibraryError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "title" => Ok(SearchField::Title),
            "author" => Ok(SearchField::Author),
            "genre" => Ok(SearchField::Genre),
            _ => Err(LibraryError::invalid_input(format!(
                "Invalid search field: {} (expected title, author or genre)",
                s
            ))),
        }
    }
}

impl fmt::Display for SearchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// RECORDS
// ============================================================================

/// One cataloged book, exactly as persisted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub title: String,
    pub author: String,
    pub publication_year: i32,
    pub genre: String,
    pub read_status: bool,
    pub added_date: String,
}

impl Book {
    /// Value of the field a search runs against
    pub fn field(&self, field: SearchField) -> &str {
        match field {
            SearchField::Title => &self.title,
            SearchField::Author => &self.author,
            SearchField::Genre => &self.genre,
        }
    }

    /// Decade bucket: `floor(publication_year / 10) * 10`
    pub fn decade(&self) -> i32 {
        self.publication_year.div_euclid(10) * 10
    }

    /// Parse `added_date`, `None` if the stored text is not in the expected layout
    pub fn added_at(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.added_date, ADDED_DATE_FORMAT).ok()
    }

    pub fn status_label(&self) -> &'static str {
        if self.read_status {
            "Read"
        } else {
            "Unread"
        }
    }
}

/// A book together with the identifier the store assigned to it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryBook {
    pub id: BookId,
    pub book: Book,
}

impl LibraryBook {
    pub fn new(book: Book) -> Self {
        Self {
            id: BookId::new(),
            book,
        }
    }
}

/// Fields supplied by the presentation layer when adding a book
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub publication_year: i32,
    pub genre: String,
    pub read_status: bool,
}

impl NewBook {
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        publication_year: i32,
        genre: impl Into<String>,
        read_status: bool,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            publication_year,
            genre: genre.into(),
            read_status,
        }
    }

    /// Validate against the current local year
    pub fn validate(&self) -> Result<()> {
        self.validate_for_year(Local::now().year())
    }

    /// Validate with an explicit upper bound for the publication year
    pub fn validate_for_year(&self, current_year: i32) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(LibraryError::invalid_input("title must not be empty"));
        }
        if self.author.trim().is_empty() {
            return Err(LibraryError::invalid_input("author must not be empty"));
        }
        if !(MIN_PUBLICATION_YEAR..=current_year).contains(&self.publication_year) {
            return Err(LibraryError::invalid_input(format!(
                "publication year {} is outside {}..={}",
                self.publication_year, MIN_PUBLICATION_YEAR, current_year
            )));
        }
        Ok(())
    }

    /// Build the persisted record, stamping `added_date` with `added_at`
    pub fn into_book(self, added_at: NaiveDateTime) -> Book {
        Book {
            title: self.title,
            author: self.author,
            publication_year: self.publication_year,
            genre: self.genre,
            read_status: self.read_status,
            added_date: added_at.format(ADDED_DATE_FORMAT).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn noon(year: i32, month: u32, day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|d| d.and_hms_opt(12, 30, 5))
            .unwrap()
    }

    #[test]
    fn test_search_field_parsing() {
        assert_eq!("title".parse::<SearchField>().unwrap(), SearchField::Title);
        assert_eq!("Author".parse::<SearchField>().unwrap(), SearchField::Author);
        assert_eq!("GENRE".parse::<SearchField>().unwrap(), SearchField::Genre);
        assert!("isbn".parse::<SearchField>().unwrap_err().is_validation_error());
    }

    #[test]
    fn test_validation_rejects_blank_fields() {
        let book = NewBook::new("  ", "Ursula K. Le Guin", 1969, "Fiction", false);
        assert!(book.validate_for_year(2025).is_err());

        let book = NewBook::new("The Left Hand of Darkness", "", 1969, "Fiction", false);
        assert!(book.validate_for_year(2025).is_err());
    }

    #[test]
    fn test_validation_year_bounds() {
        let at = |year| NewBook::new("Title", "Author", year, "Science", true);

        assert!(at(999).validate_for_year(2025).is_err());
        assert!(at(1000).validate_for_year(2025).is_ok());
        assert!(at(2025).validate_for_year(2025).is_ok());
        assert!(at(2026).validate_for_year(2025).is_err());
    }

    #[test]
    fn test_into_book_formats_added_date() {
        let book = NewBook::new("Dune", "Frank Herbert", 1965, "Fiction", true)
            .into_book(noon(2025, 3, 7));

        assert_eq!(book.added_date, "2025-03-07 12:30:05");
        assert_eq!(book.added_at(), Some(noon(2025, 3, 7)));
        assert_eq!(book.status_label(), "Read");
    }

    #[test]
    fn test_decade_bucket() {
        let mut book = NewBook::new("A", "B", 1995, "Fiction", false).into_book(noon(2025, 1, 1));
        assert_eq!(book.decade(), 1990);
        book.publication_year = 2000;
        assert_eq!(book.decade(), 2000);
        book.publication_year = 2009;
        assert_eq!(book.decade(), 2000);
    }

    #[test]
    fn test_book_json_field_order() {
        let book = NewBook::new("Dune", "Frank Herbert", 1965, "Fiction", true)
            .into_book(noon(2025, 3, 7));
        let json = serde_json::to_string(&book).unwrap();

        assert_eq!(
            json,
            r#"{"title":"Dune","author":"Frank Herbert","publication_year":1965,"genre":"Fiction","read_status":true,"added_date":"2025-03-07 12:30:05"}"#
        );
    }
}
