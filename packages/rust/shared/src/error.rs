//! Error types for docsite.
//!
//! Library crates use [`DocsiteError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

use crate::validate::FieldKind;

/// Top-level error type for all docsite operations.
#[derive(Debug, thiserror::Error)]
pub enum DocsiteError {
    /// `metadata.json` does not exist in the site directory.
    #[error("No metadata.json file present in the current directory")]
    ConfigNotFound {
        path: PathBuf,
        source: std::io::Error,
    },

    /// `metadata.json` exists but is not parseable JSON.
    #[error("Not a valid json file. Parsing metadata.json failed")]
    InvalidJson {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// The loaded value (or a typed field inside it) has the wrong shape.
    #[error("invalid config shape: {message}")]
    InvalidConfigShape { message: String },

    /// A schema field holds a value of the wrong JSON kind.
    #[error("{field} has to be of type {expected}, found {actual}")]
    TypeMismatch {
        field: String,
        expected: FieldKind,
        actual: &'static str,
    },

    /// A raw category record could not be normalized.
    #[error("invalid category: {message}")]
    InvalidCategory { message: String },

    /// A raw element record could not be extracted.
    #[error("invalid element: {message}")]
    InvalidElement { message: String },

    /// Two records share a key that has to be unique.
    #[error("{label} have to be unique. duplicate: {value}")]
    DuplicateKey { label: String, value: String },

    /// An element names a category that is not declared.
    #[error("no category {category} found for element {element}")]
    UnknownCategory { element: String, category: String },

    /// Catch-all for unclassified failures surfacing from assembly.
    #[error("Not a valid metadata.json file")]
    InvalidMetadataFile {
        #[source]
        source: Box<DocsiteError>,
    },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Element extractor failure that is not a shape problem.
    #[error("extraction error: {0}")]
    Extraction(String),

    /// Rendering-context provider failure.
    #[error("enrichment error: {0}")]
    Enrichment(String),

    /// JSON serialization failure.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, DocsiteError>;

impl DocsiteError {
    /// Create a shape error from any displayable message.
    pub fn shape(msg: impl Into<String>) -> Self {
        Self::InvalidConfigShape {
            message: msg.into(),
        }
    }

    /// Create a category normalization error.
    pub fn category(msg: impl Into<String>) -> Self {
        Self::InvalidCategory {
            message: msg.into(),
        }
    }

    /// Create an element extraction error.
    pub fn element(msg: impl Into<String>) -> Self {
        Self::InvalidElement {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error is an assertion or an already-classified
    /// validation error, i.e. it propagates through assembly unchanged.
    pub fn is_classified(&self) -> bool {
        matches!(
            self,
            Self::ConfigNotFound { .. }
                | Self::InvalidJson { .. }
                | Self::InvalidConfigShape { .. }
                | Self::TypeMismatch { .. }
                | Self::InvalidCategory { .. }
                | Self::InvalidElement { .. }
                | Self::DuplicateKey { .. }
                | Self::UnknownCategory { .. }
                | Self::InvalidMetadataFile { .. }
        )
    }

    /// Wrap an unclassified error into [`DocsiteError::InvalidMetadataFile`].
    /// Classified errors are returned as-is, so nothing is wrapped twice.
    pub fn wrap_metadata(self) -> Self {
        if self.is_classified() {
            self
        } else {
            Self::InvalidMetadataFile {
                source: Box::new(self),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = DocsiteError::DuplicateKey {
            label: "element names".into(),
            value: "button".into(),
        };
        assert_eq!(
            err.to_string(),
            "element names have to be unique. duplicate: button"
        );

        let err = DocsiteError::UnknownCategory {
            element: "button".into(),
            category: "forms".into(),
        };
        assert_eq!(err.to_string(), "no category forms found for element button");

        let err = DocsiteError::TypeMismatch {
            field: "baseurl".into(),
            expected: FieldKind::String,
            actual: "number",
        };
        assert!(err.to_string().contains("baseurl has to be of type string"));
    }

    #[test]
    fn unclassified_errors_are_wrapped_once() {
        let io = DocsiteError::io(
            "metadata.json",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let wrapped = io.wrap_metadata();
        assert_eq!(wrapped.to_string(), "Not a valid metadata.json file");
        let cause = wrapped.source().expect("cause preserved");
        assert!(cause.to_string().contains("denied"));

        let rewrapped = wrapped.wrap_metadata();
        assert!(matches!(
            rewrapped,
            DocsiteError::InvalidMetadataFile { ref source } if matches!(**source, DocsiteError::Io { .. })
        ));
    }

    #[test]
    fn classified_errors_pass_through() {
        let err = DocsiteError::shape("config has to be an object").wrap_metadata();
        assert!(matches!(err, DocsiteError::InvalidConfigShape { .. }));

        let err = DocsiteError::Extraction("boom".into()).wrap_metadata();
        assert!(matches!(err, DocsiteError::InvalidMetadataFile { .. }));
    }
}
