//! Batch aggregation: many documents, one result table.
//!
//! A single document's failure never aborts the batch; it is captured as a
//! [`DocumentFailure`] and reported alongside the successful records. Only a
//! batch with zero successes is surfaced as an error.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::BatchError;
use crate::fields::{FieldRegistry, LabelResolver};
use crate::models::record::{DocumentFailure, DocumentRecord, ResultTable};
use crate::pdf::{PdfExtractor, PdfSource};

/// Outcome of processing one document within a batch.
pub type DocumentOutcome = std::result::Result<DocumentRecord, DocumentFailure>;

/// A completed batch: the result table plus any per-document failures.
#[derive(Debug, Clone)]
pub struct BatchReport {
    /// One row per successfully processed document.
    pub table: ResultTable,

    /// Documents that could not be processed.
    pub failures: Vec<DocumentFailure>,
}

/// Runs the resolver across all registered fields for each document and
/// merges the records into a [`ResultTable`].
///
/// The registry is shared read-only; each document's extraction is
/// independent, so callers may process documents on parallel workers and
/// feed the outcomes into [`BatchAggregator::aggregate`].
pub struct BatchAggregator<'a> {
    registry: &'a FieldRegistry,
    resolver: LabelResolver,
    max_pages: usize,
}

impl<'a> BatchAggregator<'a> {
    /// Create an aggregator over the given registry with a default resolver.
    pub fn new(registry: &'a FieldRegistry) -> Self {
        Self {
            registry,
            resolver: LabelResolver::new(),
            max_pages: 0,
        }
    }

    /// Use a custom-configured resolver.
    pub fn with_resolver(mut self, resolver: LabelResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Cap how many pages of each document feed into matching (0 = unlimited).
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Resolve every registered field against already-acquired text.
    /// Never fails; unmatched fields are simply absent.
    pub fn process_text(&self, source_file: &str, text: &str) -> DocumentRecord {
        self.resolver.resolve_record(self.registry, source_file, text)
    }

    /// Acquire text from PDF bytes and resolve all fields. Unreadable PDFs
    /// become a [`DocumentFailure`] rather than an error.
    pub fn process_bytes(&self, source_file: &str, data: &[u8]) -> DocumentOutcome {
        let extractor = PdfExtractor::from_bytes(data)
            .map_err(|e| DocumentFailure::new(source_file, e.to_string()))?;

        let mut document = extractor
            .extract_document()
            .map_err(|e| DocumentFailure::new(source_file, e.to_string()))?;
        document.limit_pages(self.max_pages);

        if document.is_blank() {
            // No embedded text layer (e.g. scan-only PDF): a near-empty
            // record, not a failure.
            debug!("document '{}' has no extractable text", source_file);
        }

        Ok(self.process_text(source_file, &document.text))
    }

    /// Read a PDF from disk and resolve all fields.
    pub fn process_path(&self, path: &Path) -> DocumentOutcome {
        let source_file = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let data = std::fs::read(path)
            .map_err(|e| DocumentFailure::new(&source_file, format!("I/O error: {}", e)))?;

        self.process_bytes(&source_file, &data)
    }

    /// Partition per-document outcomes into a table and a failure report.
    ///
    /// Returns [`BatchError::Empty`] when no document succeeded (none
    /// supplied, or all failed), carrying the failures for display.
    pub fn aggregate(
        &self,
        outcomes: impl IntoIterator<Item = DocumentOutcome>,
    ) -> std::result::Result<BatchReport, BatchError> {
        let mut records = Vec::new();
        let mut failures = Vec::new();

        for outcome in outcomes {
            match outcome {
                Ok(record) => records.push(record),
                Err(failure) => {
                    warn!("skipping '{}': {}", failure.source_file, failure.reason);
                    failures.push(failure);
                }
            }
        }

        if records.is_empty() {
            return Err(BatchError::Empty(failures));
        }

        debug!(
            "aggregated {} records ({} failures)",
            records.len(),
            failures.len()
        );

        Ok(BatchReport {
            table: ResultTable::from_records(records),
            failures,
        })
    }

    /// Aggregate documents whose text is already acquired.
    pub fn aggregate_texts<I, S, T>(
        &self,
        documents: I,
    ) -> std::result::Result<BatchReport, BatchError>
    where
        I: IntoIterator<Item = (S, T)>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        self.aggregate(
            documents
                .into_iter()
                .map(|(source, text)| Ok(self.process_text(source.as_ref(), text.as_ref()))),
        )
    }

    /// Aggregate PDF files from disk.
    pub fn aggregate_paths(
        &self,
        paths: &[PathBuf],
    ) -> std::result::Result<BatchReport, BatchError> {
        self.aggregate(paths.iter().map(|p| self.process_path(p)))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::fields::FieldRegistry;

    const INVOICE_A: &str = "Acme Widgets Ltd\nInvoice No: 10002345\nYour Reference: PO-777\nTotal Net 100.00\nVAT 20.00\nTotal Due: £120.00\n";
    const INVOICE_B: &str = "Vendor: Globex Corp\nOrder No: 20006789\nTotal Due: 55.50\n";

    #[test]
    fn test_batch_isolates_single_failure() {
        let registry = FieldRegistry::invoice_fields();
        let aggregator = BatchAggregator::new(&registry);

        let outcomes = vec![
            Ok(aggregator.process_text("a.pdf", INVOICE_A)),
            aggregator.process_bytes("corrupt.pdf", b"not a pdf"),
            Ok(aggregator.process_text("b.pdf", INVOICE_B)),
        ];

        let report = aggregator.aggregate(outcomes).unwrap();

        assert_eq!(report.table.len(), 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].source_file, "corrupt.pdf");
    }

    #[test]
    fn test_empty_batch_is_distinguishable() {
        let registry = FieldRegistry::invoice_fields();
        let aggregator = BatchAggregator::new(&registry);

        let all_failed = aggregator.aggregate(vec![
            aggregator.process_bytes("x.pdf", b"junk"),
            aggregator.process_bytes("y.pdf", b"junk"),
        ]);
        let none_supplied = aggregator.aggregate(Vec::new());

        assert!(matches!(all_failed, Err(BatchError::Empty(failures)) if failures.len() == 2));
        assert!(matches!(none_supplied, Err(BatchError::Empty(failures)) if failures.is_empty()));
    }

    #[test]
    fn test_columns_are_uniform_across_records() {
        let registry = FieldRegistry::invoice_fields();
        let aggregator = BatchAggregator::new(&registry);

        let report = aggregator
            .aggregate_texts(vec![("a.pdf", INVOICE_A), ("b.pdf", INVOICE_B)])
            .unwrap();

        let mut expected = vec!["source_file".to_string()];
        expected.extend(registry.field_names().map(String::from));
        assert_eq!(report.table.columns(), expected.as_slice());

        // Every row has a cell for every column, empty when unmatched.
        for row in report.table.rows() {
            assert_eq!(row.len(), expected.len());
        }
    }

    #[test]
    fn test_labeled_values_resolve_in_batch() {
        let registry = FieldRegistry::invoice_fields();
        let aggregator = BatchAggregator::new(&registry);

        let record = aggregator.process_text("a.pdf", INVOICE_A);

        assert_eq!(record.value("document_number"), Some("10002345"));
        assert_eq!(record.value("total_due"), Some("120.00"));
        assert_eq!(record.value("vat"), Some("20.00"));
        assert_eq!(record.value("reference"), Some("PO-777"));
    }

    #[test]
    fn test_empty_text_yields_empty_record_not_failure() {
        let registry = FieldRegistry::invoice_fields();
        let aggregator = BatchAggregator::new(&registry);

        let report = aggregator.aggregate_texts(vec![("scan.pdf", "")]).unwrap();

        assert_eq!(report.table.len(), 1);
        assert!(report.table.records()[0].is_empty());
    }

    #[test]
    fn test_pii_registry_in_batch() {
        let registry = FieldRegistry::pii_patterns();
        let aggregator = BatchAggregator::new(&registry);

        let record = aggregator.process_text(
            "notes.pdf",
            "Reach me at jane.doe@example.com or 555-123-4567, paid $42.00 on 01/02/2024",
        );

        assert_eq!(record.value("emails"), Some("jane.doe@example.com"));
        assert_eq!(record.value("phone_numbers"), Some("555-123-4567"));
        assert_eq!(record.value("dollar_amounts"), Some("42.00"));
        assert_eq!(record.value("dates"), Some("01/02/2024"));
        assert_eq!(record.value("ssn"), None);
    }
}
