// SPDX-License-Identifier: MIT
//
// Unified error types for Foliant.

use thiserror::Error;

/// Top-level error type for all Foliant operations.
#[derive(Debug, Error)]
pub enum FoliantError {
    // -- Input validation --
    #[error("file not found: {0}")]
    NotFound(String),

    #[error("expected a {expected} file: {path}")]
    WrongType {
        expected: &'static str,
        path: String,
    },

    #[error("no {0} provided")]
    EmptyInput(&'static str),

    #[error("rotation angle must be 90, 180, or 270 degrees, got {0}")]
    InvalidAngle(i64),

    #[error("invalid page number {page}: document has {total} pages")]
    InvalidPage { page: u32, total: u32 },

    // -- Password protection --
    #[error("PDF is not encrypted: {0}")]
    NotEncrypted(String),

    #[error("incorrect password: {0}")]
    WrongPassword(String),

    // -- Document errors --
    #[error("PDF operation failed: {0}")]
    PdfError(String),

    #[error("image processing failed: {0}")]
    ImageError(String),

    #[error("conversion failed: {0}")]
    Conversion(String),

    // -- I/O and catch-all --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unexpected error: {0}")]
    Unexpected(String),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, FoliantError>;
