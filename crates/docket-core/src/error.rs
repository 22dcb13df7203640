//! Error types for the docket library.

use std::path::PathBuf;

use thiserror::Error;

/// Comprehensive error type for all docket operations.
#[derive(Error, Debug)]
pub enum DocketError {
    /// Local store connection or query errors
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: rusqlite::Error,
    },
    /// Transport-level failure talking to the backend
    #[error("Connection error: {message}")]
    Http {
        message: String,
        #[source]
        source: reqwest::Error,
    },
    /// The backend rejected the bearer token (HTTP 401)
    #[error("Session expired or invalid, please log in again")]
    Unauthorized,
    /// The backend is throttling requests (HTTP 429)
    #[error("Server is busy (rate limit). Please wait 5 seconds and try again.")]
    RateLimited,
    /// The backend rejected the request body (HTTP 422)
    #[error("Request validation failed: {detail}")]
    Validation { detail: String },
    /// Any other non-success response from the backend
    #[error("Backend returned {status}: {message}")]
    Api { status: u16, message: String },
    /// No user session is stored locally
    #[error("Not logged in. Run `docket auth login` first")]
    NotLoggedIn,
    /// Case not found in the user's case list
    #[error("Case '{id}' not found")]
    CaseNotFound { id: String },
    /// Step index outside the workspace roadmap
    #[error("Step {index} not found (roadmap has {len} steps)")]
    StepNotFound { index: usize, len: usize },
    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// XDG directory specification errors
    #[error("XDG directory error: {0}")]
    XdgDirectory(String),
    /// Invalid input validation errors
    #[error("Invalid input for field '{field}': {reason}")]
    InvalidInput { field: String, reason: String },
    /// Serialization/deserialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// Builder for creating database errors with optional context.
pub struct DatabaseErrorBuilder {
    message: String,
}

impl DatabaseErrorBuilder {
    /// Create a new database error builder with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Build the error with the given source.
    pub fn with_source(self, source: rusqlite::Error) -> DocketError {
        DocketError::Database {
            message: self.message,
            source,
        }
    }
}

/// Builder for creating input validation errors.
pub struct InvalidInputBuilder {
    field: String,
}

impl InvalidInputBuilder {
    /// Create a new invalid input error builder for a field.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// Build the error with the given reason.
    pub fn with_reason(self, reason: impl Into<String>) -> DocketError {
        DocketError::InvalidInput {
            field: self.field,
            reason: reason.into(),
        }
    }
}

impl DocketError {
    /// Creates a builder for database errors.
    pub fn database(message: impl Into<String>) -> DatabaseErrorBuilder {
        DatabaseErrorBuilder::new(message)
    }

    /// Creates a builder for input validation errors.
    pub fn invalid_input(field: impl Into<String>) -> InvalidInputBuilder {
        InvalidInputBuilder::new(field)
    }

    /// Wraps a transport error from the HTTP client.
    pub fn http(message: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Http {
            message: message.into(),
            source,
        }
    }

    /// Whether the failure ends the stored session.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    /// Whether the failure came from the network or backend rather than
    /// from local state.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Self::Http { .. }
                | Self::Unauthorized
                | Self::RateLimited
                | Self::Validation { .. }
                | Self::Api { .. }
        )
    }
}

/// Specialized extension trait for database-related Results.
pub trait DatabaseResultExt<T> {
    /// Map database errors with a message.
    fn db_context(self, message: &str) -> Result<T>;
}

impl<T> DatabaseResultExt<T> for std::result::Result<T, rusqlite::Error> {
    fn db_context(self, message: &str) -> Result<T> {
        self.map_err(|e| DocketError::database(message).with_source(e))
    }
}

/// Result type alias for docket operations
pub type Result<T> = std::result::Result<T, DocketError>;
