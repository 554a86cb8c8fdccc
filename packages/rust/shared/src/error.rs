//! Error types for Bookforge.
//!
//! Library crates use [`BookforgeError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all Bookforge operations.
#[derive(Debug, thiserror::Error)]
pub enum BookforgeError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// The input directory could not be listed. Fatal for a batch.
    #[error("cannot enumerate {path:?}: {source}")]
    Enumerate {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A source file is missing or unreadable.
    #[error("read failed for {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A source file was read but its content is malformed.
    #[error("parse failed for {path:?}: {message}")]
    Parse { path: PathBuf, message: String },

    /// A valid read that yielded no usable text.
    #[error("no usable text in {path:?}")]
    EmptyContent { path: PathBuf },

    /// A destination could not be created or written.
    #[error("write failed for {path:?}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A filesystem rename was rejected (permissions, collision).
    #[error("rename {from:?} -> {to:?} failed: {source}")]
    Rename {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },

    /// The master document could not be read or rewritten after renames.
    #[error("reference update failed for {path:?}: {source}")]
    ReferenceUpdate {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, BookforgeError>;

impl BookforgeError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a parse error for `path`.
    pub fn parse(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: msg.into(),
        }
    }

    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }

    pub fn enumerate(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Enumerate {
            path: path.into(),
            source,
        }
    }

    pub fn rename(from: impl Into<PathBuf>, to: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Rename {
            from: from.into(),
            to: to.into(),
            source,
        }
    }

    pub fn reference_update(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReferenceUpdate {
            path: path.into(),
            source,
        }
    }

    /// Whether this error should abort the whole batch rather than one item.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Config { .. } | Self::Enumerate { .. })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = BookforgeError::config("extension must not be empty");
        assert_eq!(err.to_string(), "config error: extension must not be empty");

        let err = BookforgeError::parse("book/ch1.docx", "invalid zip header");
        assert!(err.to_string().contains("ch1.docx"));
        assert!(err.to_string().contains("invalid zip header"));
    }

    #[test]
    fn rename_error_names_both_paths() {
        let err = BookforgeError::rename(
            "chapters/02-a.tex",
            "chapters/02.tex",
            std::io::Error::new(std::io::ErrorKind::AlreadyExists, "destination exists"),
        );
        let msg = err.to_string();
        assert!(msg.contains("02-a.tex"));
        assert!(msg.contains("02.tex"));
        assert!(msg.contains("destination exists"));
    }

    #[test]
    fn only_config_and_enumerate_are_fatal() {
        let io = || std::io::Error::other("boom");
        assert!(BookforgeError::config("x").is_fatal());
        assert!(BookforgeError::enumerate("dir", io()).is_fatal());
        assert!(!BookforgeError::read("a.txt", io()).is_fatal());
        assert!(!BookforgeError::write("a.txt", io()).is_fatal());
        assert!(!BookforgeError::EmptyContent { path: "a.docx".into() }.is_fatal());
    }
}
