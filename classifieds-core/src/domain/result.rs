//! Result and error types for the core library

use thiserror::Error;

/// Core library error type
#[derive(Error, Debug)]
pub enum Error {
    /// A field value failed its validation rule
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// A required argument was missing or blank
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Structural violation on the board (duplicate id, empty search)
    #[error("Board error: {0}")]
    Board(String),

    /// Controller-level violation (unknown id, unreadable file layout)
    #[error("Manager error: {0}")]
    Manager(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate user: {0}")]
    DuplicateUser(String),

    #[error("IO error ({context}): {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl Error {
    /// Create an invalid data error
    pub fn invalid_data(msg: impl Into<String>) -> Self {
        Self::InvalidData(msg.into())
    }

    /// Create an invalid argument error
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create a board error
    pub fn board(msg: impl Into<String>) -> Self {
        Self::Board(msg.into())
    }

    /// Create a manager error
    pub fn manager(msg: impl Into<String>) -> Self {
        Self::Manager(msg.into())
    }

    /// Create an unauthorized error
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    /// Create a not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Wrap an I/O error with the operation or path it happened on
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// True for failures that a file import recovers from by skipping the row
    pub fn is_row_recoverable(&self) -> bool {
        matches!(
            self,
            Self::InvalidData(_) | Self::Board(_) | Self::DuplicateUser(_)
        )
    }
}

/// Core library result type
pub type Result<T> = std::result::Result<T, Error>;
