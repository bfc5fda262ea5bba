//! Label-guided field resolution.
//!
//! Resolution runs in two passes. The label pass looks for a known label
//! followed by optional separators and searches only the remainder of that
//! logical line (the candidate window), which keeps unrelated matches from
//! being picked up. The fallback pass searches the whole document and trades
//! that precision for recall on documents with nonstandard phrasing. Both
//! passes are deliberate; disabling either changes what gets extracted.

use tracing::trace;

use super::normalize::normalize;
use super::registry::{FieldDefinition, FieldRegistry};
use crate::models::record::{DocumentRecord, ExtractedField};

/// Trait for resolving a single field against document text.
pub trait FieldResolver {
    /// Resolve one field. An unmatched field is a normal outcome and yields
    /// an [`ExtractedField`] with no value, never an error.
    fn resolve(&self, field: &FieldDefinition, text: &str) -> ExtractedField;
}

/// Two-pass resolver: label proximity first, whole-document fallback second.
#[derive(Debug, Clone)]
pub struct LabelResolver {
    label_pass: bool,
    fallback_pass: bool,
}

impl LabelResolver {
    /// Create a resolver with both passes enabled.
    pub fn new() -> Self {
        Self {
            label_pass: true,
            fallback_pass: true,
        }
    }

    /// Enable or disable the label-proximity pass.
    pub fn with_label_pass(mut self, enabled: bool) -> Self {
        self.label_pass = enabled;
        self
    }

    /// Enable or disable the whole-document fallback pass.
    pub fn with_fallback_pass(mut self, enabled: bool) -> Self {
        self.fallback_pass = enabled;
        self
    }

    /// Resolve every field in the registry against one document's text,
    /// in registry order. Every field appears in the record, matched or not.
    pub fn resolve_record(
        &self,
        registry: &FieldRegistry,
        source_file: &str,
        text: &str,
    ) -> DocumentRecord {
        let mut record = DocumentRecord::new(source_file);
        for field in registry.fields() {
            record.push(self.resolve(field, text));
        }
        record
    }

    /// First pattern match in a haystack, honoring the group-1 convention.
    fn first_match(&self, field: &FieldDefinition, haystack: &str) -> Option<String> {
        let caps = field.pattern().captures(haystack)?;
        let matched = if field.captures_value() {
            caps.get(1).or_else(|| caps.get(0))
        } else {
            caps.get(0)
        }?;
        Some(matched.as_str().to_string())
    }

    /// Label pass: labels in registry order, occurrences in document order,
    /// first regex success wins.
    fn resolve_labeled(&self, field: &FieldDefinition, text: &str) -> Option<String> {
        for (label, window_re) in field.labels().iter().zip(field.label_windows()) {
            for caps in window_re.captures_iter(text) {
                let window = caps.get(1).map(|m| m.as_str().trim()).unwrap_or("");
                if let Some(raw) = self.first_match(field, window) {
                    trace!("field '{}' matched via label '{}'", field.name(), label);
                    return Some(raw);
                }
            }
        }
        None
    }
}

impl Default for LabelResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldResolver for LabelResolver {
    fn resolve(&self, field: &FieldDefinition, text: &str) -> ExtractedField {
        let labeled = if self.label_pass {
            self.resolve_labeled(field, text)
        } else {
            None
        };

        let raw = labeled.or_else(|| {
            if self.fallback_pass {
                let raw = self.first_match(field, text);
                if raw.is_some() {
                    trace!("field '{}' matched via fallback pass", field.name());
                }
                raw
            } else {
                None
            }
        });

        let cleaned = raw
            .as_deref()
            .and_then(|r| normalize(r, field.value_type()));

        ExtractedField {
            field_name: field.name().to_string(),
            raw_match: raw,
            cleaned_value: cleaned,
        }
    }
}
