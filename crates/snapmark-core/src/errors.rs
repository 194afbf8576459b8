use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::model::SourceLocation;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// This taxonomy provides a stable, structured classification of all errors
/// raised by snapmark. Each kind maps to a stable error code that hosts can
/// match on and that tests assert against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Structural/Validation
    InvalidSnapshotPath,
    /// A level-3 heading was not immediately followed by a code block
    ExpectedCodeBlockAfterHeading,
    NotFound,

    // Integration/IO
    Io,
    Serialization,
    Concurrency,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidSnapshotPath => "ERR_INVALID_SNAPSHOT_PATH",
            ExErrorKind::ExpectedCodeBlockAfterHeading => {
                "ERR_EXPECTED_CODE_BLOCK_AFTER_HEADING"
            }
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Concurrency => "ERR_CONCURRENCY",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification for programmatic handling plus the snapshot file
/// and source location the failure points at, when known.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    path: Option<PathBuf>,
    location: Option<SourceLocation>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            path: None,
            location: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add the snapshot file the error relates to
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Add a source location inside the snapshot file
    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the snapshot file path, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Get the source location, if any
    pub fn location(&self) -> Option<SourceLocation> {
        self.location
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        match (&self.path, self.location) {
            (Some(path), Some(loc)) => write!(f, " ({}:{})", path.display(), loc)?,
            (Some(path), None) => write!(f, " ({})", path.display())?,
            (None, Some(loc)) => write!(f, " (at {})", loc)?,
            (None, None) => {}
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Domain failures raised while reading or reconciling snapshot documents
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SnapshotError {
    /// A level-3 entry heading was followed by something other than a code block
    #[error("Expected a code block after heading '{heading}' at {location}")]
    ExpectedCodeBlockAfterHeading {
        path: PathBuf,
        heading: String,
        location: SourceLocation,
    },

    /// A test source path has no file name to derive a snapshot name from
    #[error("Cannot derive a snapshot file name from '{}'", path.display())]
    MissingFileStem { path: PathBuf },

    /// A requested snapshot file name is empty
    #[error("Invalid snapshot file name: {name}")]
    InvalidSnapshotName { name: String },

    /// A shared cache lock was poisoned by a panicking holder
    #[error("Snapshot cache lock poisoned: {what}")]
    Poisoned { what: &'static str },
}

impl From<SnapshotError> for ExError {
    fn from(err: SnapshotError) -> Self {
        match err {
            SnapshotError::ExpectedCodeBlockAfterHeading {
                path,
                heading,
                location,
            } => ExError::new(ExErrorKind::ExpectedCodeBlockAfterHeading)
                .with_op("reduce_entries")
                .with_path(path)
                .with_location(location)
                .with_message(format!("Expected code block after heading '{}'", heading)),

            SnapshotError::MissingFileStem { path } => {
                ExError::new(ExErrorKind::InvalidSnapshotPath)
                    .with_op("resolve_snapshot_path")
                    .with_path(path)
                    .with_message("Test source path has no file stem")
            }

            SnapshotError::InvalidSnapshotName { name } => {
                ExError::new(ExErrorKind::InvalidSnapshotPath)
                    .with_op("resolve_snapshot_path")
                    .with_message(format!("Invalid snapshot file name '{}'", name))
            }

            SnapshotError::Poisoned { what } => ExError::new(ExErrorKind::Concurrency)
                .with_message(format!("Lock poisoned: {}", what)),
        }
    }
}

impl From<serde_json::Error> for ExError {
    fn from(err: serde_json::Error) -> Self {
        ExError::new(ExErrorKind::Serialization).with_message(err.to_string())
    }
}
