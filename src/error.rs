//! Error types for doc2md operations.

use thiserror::Error;

/// Errors that can occur while cleaning or converting a document.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("redirect link has no q parameter: {0}")]
    MalformedRedirect(String),

    #[error("converter failed: {0}")]
    Converter(String),
}

pub type Result<T> = std::result::Result<T, Error>;
