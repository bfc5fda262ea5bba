//! Data models for extraction output and configuration.

pub mod config;
pub mod record;

pub use config::{DocgleanConfig, ExtractionConfig, PdfConfig};
pub use record::{DocumentFailure, DocumentRecord, ExtractedField, ResultTable};
