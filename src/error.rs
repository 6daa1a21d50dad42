//! Error types for Shelf
//!
//! This module defines error types using thiserror for ergonomic error handling.
//! Every failure the library store can hit is recoverable: storage errors are
//! surfaced to the caller with a message, validation errors reject input before
//! any mutation happens. Nothing in the crate panics or exits the process.
//!
//! ## Error Kinds
//!
//! - `StorageRead` - library file exists but could not be read or parsed.
//!   Loading leaves the in-memory collection untouched.
//! - `StorageWrite` - library file could not be written. The in-memory
//!   collection is still valid and the caller may retry `save()`.
//! - `Validation` - caller-supplied fields were rejected (empty title or
//!   author, publication year out of range, unknown search field).

use std::path::Path;
use thiserror::Error;

/// Result type alias using our LibraryError type
pub type Result<T> = std::result::Result<T, LibraryError>;

/// Main error type for Shelf
#[derive(Error, Debug)]
pub enum LibraryError {
    // ===== Storage Errors =====

    /// Library file is unreadable or corrupt
    #[error("Error loading library from {path}: {message}")]
    StorageRead {
        path: String,
        message: String,
    },

    /// Library file could not be written
    #[error("Error saving library to {path}: {message}")]
    StorageWrite {
        path: String,
        message: String,
    },

    // ===== Validation Errors =====

    /// Caller-supplied book fields were rejected
    #[error("Invalid input: {0}")]
    Validation(String),

    // ===== External Library Errors =====

    /// JSON serialization/deserialization error
    #[error("JSON serialization error: {0}")]
    SerdeJsonError(#[from] serde_json::Error),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl LibraryError {
    /// Create a StorageRead error for a path
    pub fn read_failed<S: Into<String>>(path: &Path, message: S) -> Self {
        LibraryError::StorageRead {
            path: path.display().to_string(),
            message: message.into(),
        }
    }

    /// Create a StorageWrite error for a path
    pub fn write_failed<S: Into<String>>(path: &Path, message: S) -> Self {
        LibraryError::StorageWrite {
            path: path.display().to_string(),
            message: message.into(),
        }
    }

    /// Create a Validation error with a message
    pub fn invalid_input<S: Into<String>>(message: S) -> Self {
        LibraryError::Validation(message.into())
    }

    /// Check if error came from reading or writing the library file
    pub fn is_storage_error(&self) -> bool {
        matches!(
            self,
            LibraryError::StorageRead { .. }
                | LibraryError::StorageWrite { .. }
                | LibraryError::IoError(_)
                | LibraryError::SerdeJsonError(_)
        )
    }

    /// Check if error is a rejected input
    pub fn is_validation_error(&self) -> bool {
        matches!(self, LibraryError::Validation(_))
    }

    /// Get user-friendly error message suitable for display
    ///
    /// Storage failures get a hint about what state the library is left in.
    pub fn user_message(&self) -> String {
        match self {
            LibraryError::StorageRead { path, message } => {
                format!(
                    "Could not load the library from '{}': {}. Starting with the books already in memory.",
                    path, message
                )
            }
            LibraryError::StorageWrite { path, message } => {
                format!(
                    "Could not save the library to '{}': {}. Your changes are kept for this session only.",
                    path, message
                )
            }
            LibraryError::Validation(message) => {
                format!("Please check the book details: {}", message)
            }
            _ => self.to_string(),
        }
    }
}
