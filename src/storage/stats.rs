//! Aggregate statistics over a library
//!
//! Frequency tables are ordered by count, highest first. Keys with equal
//! counts keep the order in which they were first seen in the library.

use std::collections::HashMap;
use std::hash::Hash;

use serde::Serialize;

use crate::storage::models::Book;

/// Summary of a library
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LibraryStats {
    /// Number of books in the library
    pub total_books: usize,
    /// Number of books marked as read
    pub read_books: usize,
    /// `read_books / total_books * 100`, 0 for an empty library
    pub percent_read: f64,
    /// Books per genre
    pub genres: Vec<(String, usize)>,
    /// Books per author
    pub authors: Vec<(String, usize)>,
    /// Books per publication decade (1990, 2000, ...)
    pub decades: Vec<(i32, usize)>,
}

impl LibraryStats {
    /// Compute statistics for the given books
    pub fn compute<'a, I>(books: I) -> Self
    where
        I: IntoIterator<Item = &'a Book>,
        I::IntoIter: Clone,
    {
        let books = books.into_iter();

        let total_books = books.clone().count();
        let read_books = books.clone().filter(|b| b.read_status).count();
        let percent_read = if total_books > 0 {
            (read_books as f64 / total_books as f64) * 100.0
        } else {
            0.0
        };

        Self {
            total_books,
            read_books,
            percent_read,
            genres: frequency_table(books.clone().map(|b| b.genre.clone())),
            authors: frequency_table(books.clone().map(|b| b.author.clone())),
            decades: frequency_table(books.map(Book::decade)),
        }
    }

    pub fn unread_books(&self) -> usize {
        self.total_books - self.read_books
    }

    pub fn is_empty(&self) -> bool {
        self.total_books == 0
    }

    /// Most common genre, first seen wins on ties
    pub fn top_genre(&self) -> Option<&str> {
        self.genres.first().map(|(genre, _)| genre.as_str())
    }
}

/// Count occurrences, then sort by count descending
///
/// `sort_by` is stable, so ties stay in encounter order.
pub fn frequency_table<K, I>(keys: I) -> Vec<(K, usize)>
where
    K: Eq + Hash + Clone,
    I: IntoIterator<Item = K>,
{
    let mut positions: HashMap<K, usize> = HashMap::new();
    let mut table: Vec<(K, usize)> = Vec::new();

    for key in keys {
        match positions.get(&key) {
            Some(&idx) => table[idx].1 += 1,
            None => {
                positions.insert(key.clone(), table.len());
                table.push((key, 1));
            }
        }
    }

    table.sort_by(|a, b| b.1.cmp(&a.1));
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(author: &str, year: i32, genre: &str, read: bool) -> Book {
        Book {
            title: format!("{} ({})", author, year),
            author: author.to_string(),
            publication_year: year,
            genre: genre.to_string(),
            read_status: read,
            added_date: "2025-01-01 00:00:00".to_string(),
        }
    }

    #[test]
    fn test_empty_library() {
        let stats = LibraryStats::compute(&Vec::<Book>::new());

        assert_eq!(stats.total_books, 0);
        assert_eq!(stats.read_books, 0);
        assert_eq!(stats.percent_read, 0.0);
        assert!(stats.genres.is_empty());
        assert!(stats.authors.is_empty());
        assert!(stats.decades.is_empty());
        assert!(stats.is_empty());
        assert_eq!(stats.top_genre(), None);
    }

    #[test]
    fn test_decade_buckets_sorted_by_count() {
        let books = vec![
            book("A", 1995, "Fiction", false),
            book("B", 2001, "Fiction", false),
            book("C", 2007, "Fiction", false),
        ];
        let stats = LibraryStats::compute(&books);

        assert_eq!(stats.decades, vec![(2000, 2), (1990, 1)]);
    }

    #[test]
    fn test_percent_read() {
        let books = vec![
            book("A", 1995, "Fiction", true),
            book("B", 2001, "Science", false),
            book("C", 2007, "Fiction", false),
            book("D", 2010, "Technology", true),
        ];
        let stats = LibraryStats::compute(&books);

        assert_eq!(stats.total_books, 4);
        assert_eq!(stats.read_books, 2);
        assert_eq!(stats.unread_books(), 2);
        assert!((stats.percent_read - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_ties_keep_encounter_order() {
        let books = vec![
            book("Le Guin", 1969, "Science", false),
            book("Herbert", 1965, "Fiction", false),
            book("Le Guin", 1974, "Fiction", false),
            book("Banks", 1987, "Technology", false),
        ];
        let stats = LibraryStats::compute(&books);

        assert_eq!(
            stats.genres,
            vec![
                ("Fiction".to_string(), 2),
                ("Science".to_string(), 1),
                ("Technology".to_string(), 1),
            ]
        );
        assert_eq!(
            stats.authors,
            vec![
                ("Le Guin".to_string(), 2),
                ("Herbert".to_string(), 1),
                ("Banks".to_string(), 1),
            ]
        );
        assert_eq!(stats.decades, vec![(1960, 2), (1970, 1), (1980, 1)]);
        assert_eq!(stats.top_genre(), Some("Fiction"));
    }

    #[test]
    fn test_frequency_table_is_case_sensitive() {
        let table = frequency_table(vec!["fiction", "Fiction", "fiction"]);
        assert_eq!(table, vec![("fiction", 2), ("Fiction", 1)]);
    }
}
