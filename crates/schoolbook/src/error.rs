//! Error types for schoolbook.
//!
//! This module defines the crate-wide error type. Field-level validation
//! failures are not represented here; they live in
//! [`crate::validation::FieldErrors`] so they can be rendered inline next to
//! each form field.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for schoolbook operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// Failed to open or create the key/value area.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    /// Writing the record list failed.
    #[error("failed to persist records under key '{key}': {message}")]
    Persistence {
        /// Key the records were being written to.
        key: String,
        /// Description of what went wrong.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Image Errors ===
    /// Reading the selected image failed.
    #[error("failed to read image {path}: {message}")]
    ImageRead {
        /// Path of the selected file.
        path: PathBuf,
        /// Description of what went wrong.
        message: String,
    },

    /// The selected file is not a recognised image type.
    #[error("unsupported image type: {path}")]
    UnsupportedImage {
        /// Path of the selected file.
        path: PathBuf,
    },

    /// The selected image exceeds the configured size limit.
    #[error("image {path} is {size} bytes, limit is {limit}")]
    ImageTooLarge {
        /// Path of the selected file.
        path: PathBuf,
        /// Actual file size in bytes.
        size: u64,
        /// Configured maximum in bytes.
        limit: u64,
    },

    // === I/O Errors ===
    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for schoolbook operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a persistence error for the given key.
    #[must_use]
    pub fn persistence(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Persistence {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Create an image read error.
    #[must_use]
    pub fn image_read(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ImageRead {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Check if this error came from the persistence layer.
    #[must_use]
    pub fn is_persistence_error(&self) -> bool {
        matches!(
            self,
            Self::Persistence { .. }
                | Self::DatabaseOpen { .. }
                | Self::DatabaseQuery(_)
                | Self::DatabaseMigration { .. }
        )
    }

    /// Check if this error came from reading an image.
    #[must_use]
    pub fn is_image_error(&self) -> bool {
        matches!(
            self,
            Self::ImageRead { .. } | Self::UnsupportedImage { .. } | Self::ImageTooLarge { .. }
        )
    }
}
