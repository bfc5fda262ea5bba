//! Extraction output models: per-field, per-document, per-batch.

use serde::{Deserialize, Serialize};

/// Name of the column holding the originating file, always first in a table.
pub const SOURCE_FILE_COLUMN: &str = "source_file";

/// A single resolved field for one document.
///
/// `raw_match` is the substring the resolution pattern matched;
/// `cleaned_value` is its normalized form. Both are `None` when the field
/// did not resolve, which is a normal outcome for most documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedField {
    /// Name of the field definition this value belongs to.
    pub field_name: String,

    /// Raw matched substring, before normalization.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_match: Option<String>,

    /// Canonical value after type-aware cleanup.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cleaned_value: Option<String>,
}

/// All resolved fields for one document, in registry order.
///
/// Every field definition that was evaluated appears here, matched or not,
/// so records from the same registry always share the same column set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Identifier of the source document (usually the file name).
    pub source_file: String,

    fields: Vec<ExtractedField>,
}

impl DocumentRecord {
    /// Create an empty record for a document.
    pub fn new(source_file: impl Into<String>) -> Self {
        Self {
            source_file: source_file.into(),
            fields: Vec::new(),
        }
    }

    /// Append a resolved field. Evaluation order is preserved.
    pub fn push(&mut self, field: ExtractedField) {
        self.fields.push(field);
    }

    /// All fields in evaluation order.
    pub fn fields(&self) -> &[ExtractedField] {
        &self.fields
    }

    /// Field names in evaluation order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.field_name.as_str())
    }

    /// Look up a field by name.
    pub fn get(&self, name: &str) -> Option<&ExtractedField> {
        self.fields.iter().find(|f| f.field_name == name)
    }

    /// Cleaned value for a field, if it resolved.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(|f| f.cleaned_value.as_deref())
    }

    /// True when no field resolved to a value (e.g. empty text layer).
    pub fn is_empty(&self) -> bool {
        self.fields.iter().all(|f| f.cleaned_value.is_none())
    }
}

/// A document that could not be processed, with a human-readable reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentFailure {
    /// Identifier of the source document.
    pub source_file: String,

    /// Why processing failed.
    pub reason: String,
}

impl DocumentFailure {
    pub fn new(source_file: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            source_file: source_file.into(),
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for DocumentFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.source_file, self.reason)
    }
}

/// Ordered set of document records with a uniform column list.
///
/// The column set is the union of field names across all records, with
/// [`SOURCE_FILE_COLUMN`] forced first. Missing values serialize as empty
/// cells rather than dropping rows or columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultTable {
    columns: Vec<String>,
    records: Vec<DocumentRecord>,
}

impl ResultTable {
    /// Build a table from document records, computing the column union.
    ///
    /// Columns appear in first-seen order across records, which for records
    /// produced from a single registry is the registry's insertion order.
    pub fn from_records(records: Vec<DocumentRecord>) -> Self {
        let mut columns = vec![SOURCE_FILE_COLUMN.to_string()];
        for record in &records {
            for name in record.field_names() {
                if !columns.iter().any(|c| c == name) {
                    columns.push(name.to_string());
                }
            }
        }
        Self { columns, records }
    }

    /// Column names, source file first.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// The underlying records.
    pub fn records(&self) -> &[DocumentRecord] {
        &self.records
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// One row of cell values per record, aligned with [`Self::columns`].
    /// Missing fields yield empty strings.
    pub fn rows(&self) -> impl Iterator<Item = Vec<String>> + '_ {
        self.records.iter().map(move |record| {
            self.columns
                .iter()
                .map(|col| {
                    if col == SOURCE_FILE_COLUMN {
                        record.source_file.clone()
                    } else {
                        record.value(col).unwrap_or_default().to_string()
                    }
                })
                .collect()
        })
    }
}
