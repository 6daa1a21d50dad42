//! Library configuration
//!
//! Resolves where the library file lives:
//! 1. an explicit path (e.g. the CLI `--library` flag)
//! 2. the `SHELF_LIBRARY` environment variable
//! 3. `library.json` in the working directory

use std::path::PathBuf;

/// Environment variable overriding the library file location
pub const LIBRARY_PATH_ENV: &str = "SHELF_LIBRARY";

/// File name used when no location is configured
pub const DEFAULT_LIBRARY_FILE: &str = "library.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryConfig {
    /// JSON file the library is loaded from and saved to
    pub library_path: PathBuf,
}

impl LibraryConfig {
    pub fn new(library_path: impl Into<PathBuf>) -> Self {
        Self {
            library_path: library_path.into(),
        }
    }

    /// Read `SHELF_LIBRARY`, falling back to the default location
    pub fn from_env() -> Self {
        Self::from_env_value(std::env::var_os(LIBRARY_PATH_ENV).map(PathBuf::from))
    }

    fn from_env_value(value: Option<PathBuf>) -> Self {
        match value {
            Some(path) if !path.as_os_str().is_empty() => Self::new(path),
            _ => Self::default(),
        }
    }
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self::new(DEFAULT_LIBRARY_FILE)
    }
}
