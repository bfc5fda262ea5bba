//! Error types for the docglean-core library.

use thiserror::Error;

use crate::models::record::DocumentFailure;

/// Main error type for the docglean library.
#[derive(Error, Debug)]
pub enum DocgleanError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// Field registry error.
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Batch aggregation error.
    #[error("batch error: {0}")]
    Batch(#[from] BatchError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to PDF processing.
///
/// All variants mean the document is unreadable as far as extraction is
/// concerned; the batch layer recovers from them per document.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// Invalid page number requested.
    #[error("invalid page number: {0}")]
    InvalidPage(u32),
}

/// Errors related to the field rule registry.
///
/// These are fatal to a whole batch: no field is well-defined without a
/// valid registry.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// A field rule carries a regex that does not compile.
    #[error("invalid pattern for field '{field}': {source}")]
    InvalidPattern {
        field: String,
        source: regex::Error,
    },

    /// Two field rules share the same name.
    #[error("duplicate field name: {0}")]
    DuplicateField(String),

    /// The registry would contain no field rules at all.
    #[error("registry has no field rules")]
    Empty,
}

/// Errors surfaced by the batch aggregator.
#[derive(Error, Debug)]
pub enum BatchError {
    /// No documents could be processed (none supplied, or all failed).
    /// Carries the per-document failures so callers can still report them.
    #[error("no documents could be processed ({} failed)", .0.len())]
    Empty(Vec<DocumentFailure>),
}

/// Result type for the docglean library.
pub type Result<T> = std::result::Result<T, DocgleanError>;
