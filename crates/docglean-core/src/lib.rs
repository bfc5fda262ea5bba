//! Core library for rule-driven PDF field extraction.
//!
//! This crate provides:
//! - PDF text acquisition (lopdf + pdf-extract)
//! - A registry of field rules (label synonyms + resolution patterns)
//! - Label-guided field resolution with a whole-document fallback pass
//! - Type-aware value normalization
//! - Batch aggregation of per-document records into a result table

pub mod batch;
pub mod error;
pub mod fields;
pub mod models;
pub mod pdf;

pub use batch::{BatchAggregator, BatchReport, DocumentOutcome};
pub use error::{BatchError, DocgleanError, PdfError, RegistryError, Result};
pub use fields::{
    normalize, FieldDefinition, FieldRegistry, FieldResolver, FieldRule, LabelResolver, ValueType,
};
pub use models::config::DocgleanConfig;
pub use models::record::{DocumentFailure, DocumentRecord, ExtractedField, ResultTable};
pub use pdf::{DocumentText, PdfExtractor, PdfSource};
