//! Field rule registry: named rules with label synonyms and resolution patterns.

use lazy_static::lazy_static;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::Result;
use crate::error::RegistryError;

/// How an extracted value should be cleaned up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    /// Free text; internal whitespace runs collapse to single spaces.
    Text,
    /// Numeric identifier; every non-digit character is stripped.
    Number,
    /// Monetary amount; currency symbols removed, decimal separator
    /// inferred from punctuation shape.
    Amount,
}

impl Default for ValueType {
    fn default() -> Self {
        Self::Text
    }
}

/// Serializable form of a field rule, as it appears in configuration files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRule {
    /// Unique field name, used as the output column name.
    pub name: String,

    /// Label synonyms tried in order; empty means fallback-only resolution.
    #[serde(default)]
    pub labels: Vec<String>,

    /// Resolution regex (applied case-insensitively). When the pattern
    /// defines capture groups, group 1 is the extracted value; otherwise
    /// the whole match is.
    pub pattern: String,

    /// Value type driving normalization.
    #[serde(default)]
    pub value_type: ValueType,
}

impl FieldRule {
    pub fn new(
        name: impl Into<String>,
        labels: &[&str],
        pattern: impl Into<String>,
        value_type: ValueType,
    ) -> Self {
        Self {
            name: name.into(),
            labels: labels.iter().map(|l| l.to_string()).collect(),
            pattern: pattern.into(),
            value_type,
        }
    }
}

/// A compiled field rule. Immutable once built.
#[derive(Debug, Clone)]
pub struct FieldDefinition {
    rule: FieldRule,
    pattern: Regex,
    /// One window regex per label: the literal label, optional separators,
    /// and the rest of the logical line as capture group 1.
    label_windows: Vec<Regex>,
}

impl FieldDefinition {
    /// Compile a rule into a ready-to-use definition.
    pub fn compile(rule: FieldRule) -> Result<Self> {
        let pattern = RegexBuilder::new(&rule.pattern)
            .case_insensitive(true)
            .build()
            .map_err(|source| RegistryError::InvalidPattern {
                field: rule.name.clone(),
                source,
            })?;

        let label_windows = rule
            .labels
            .iter()
            .map(|label| {
                let window = format!(r"{}[:\s]*(.*?)(?:\n|$)", regex::escape(label));
                RegexBuilder::new(&window)
                    .case_insensitive(true)
                    .build()
                    .map_err(|source| RegistryError::InvalidPattern {
                        field: rule.name.clone(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            rule,
            pattern,
            label_windows,
        })
    }

    /// Unique field name.
    pub fn name(&self) -> &str {
        &self.rule.name
    }

    /// Label synonyms in declaration order.
    pub fn labels(&self) -> &[String] {
        &self.rule.labels
    }

    /// Compiled resolution pattern.
    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    /// Whether the pattern declares a capture group for the value.
    pub fn captures_value(&self) -> bool {
        self.pattern.captures_len() > 1
    }

    /// Compiled candidate-window regexes, one per label.
    pub fn label_windows(&self) -> &[Regex] {
        &self.label_windows
    }

    /// Value type driving normalization.
    pub fn value_type(&self) -> ValueType {
        self.rule.value_type
    }

    /// The serializable rule this definition was compiled from.
    pub fn rule(&self) -> &FieldRule {
        &self.rule
    }
}

/// Insertion-ordered, read-only set of field definitions.
///
/// Enumeration order is stable across runs so downstream column order stays
/// deterministic. The registry is never mutated after construction and can
/// be shared across worker threads without locking.
#[derive(Debug, Clone)]
pub struct FieldRegistry {
    fields: Vec<FieldDefinition>,
}

impl FieldRegistry {
    /// Compile a registry from rules, preserving their order.
    ///
    /// Fails on an empty rule set, duplicate names, or a pattern that does
    /// not compile; registry failures are fatal to a whole batch.
    pub fn from_rules(rules: Vec<FieldRule>) -> Result<Self> {
        if rules.is_empty() {
            return Err(RegistryError::Empty);
        }

        let mut fields: Vec<FieldDefinition> = Vec::with_capacity(rules.len());
        for rule in rules {
            if fields.iter().any(|f| f.name() == rule.name) {
                return Err(RegistryError::DuplicateField(rule.name));
            }
            fields.push(FieldDefinition::compile(rule)?);
        }

        debug!("Compiled field registry with {} rules", fields.len());
        Ok(Self { fields })
    }

    /// The built-in invoice-style field set.
    pub fn invoice_fields() -> Self {
        INVOICE_FIELDS.clone()
    }

    /// The built-in generic PII pattern set (fallback-only rules).
    pub fn pii_patterns() -> Self {
        PII_PATTERNS.clone()
    }

    /// All definitions in insertion order.
    pub fn fields(&self) -> &[FieldDefinition] {
        &self.fields
    }

    /// Field names in insertion order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name())
    }

    /// Look up a definition by name.
    pub fn get(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.name() == name)
    }

    /// Number of registered fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The serializable rules backing this registry.
    pub fn rules(&self) -> Vec<FieldRule> {
        self.fields.iter().map(|f| f.rule().clone()).collect()
    }
}

/// Default rules for invoice-style documents.
///
/// The three amount fields deliberately share one resolution pattern and are
/// told apart only by their labels; when the fallback pass engages for more
/// than one of them, they can resolve to the same value. That duplication is
/// intended behavior, not something the resolver disambiguates.
pub fn invoice_rules() -> Vec<FieldRule> {
    const AMOUNT: &str = r"(?:£|EUR|USD)?\s*(\d{1,3}(?:,\d{3})*(?:\.\d{2})?)";

    vec![
        FieldRule::new(
            "company_name",
            &["company name", "business name", "supplier", "vendor"],
            r"([A-Z][A-Za-z0-9\s\.,&]+(?:Ltd|Limited|Inc|LLC|LLP|Corporation|Corp|Company|Co)\b)",
            ValueType::Text,
        ),
        FieldRule::new(
            "document_number",
            &["document no", "invoice no", "reference no", "order no"],
            r"\b\d{6,12}\b",
            ValueType::Number,
        ),
        FieldRule::new(
            "sold_to_party",
            &["sold to party", "customer", "bill to", "sold to"],
            r"(?:sold to party|customer|bill to|sold to)[:.]?\s*(\d+|\w+)",
            ValueType::Text,
        ),
        FieldRule::new(
            "reference",
            &["your reference", "customer reference", "ref"],
            r"(?:your reference|ref)[:.]?\s*([A-Za-z0-9-_/]+)",
            ValueType::Text,
        ),
        FieldRule::new(
            "total_net",
            &["total net", "net amount", "subtotal", "net value"],
            AMOUNT,
            ValueType::Amount,
        ),
        FieldRule::new(
            "vat",
            &["vat", "tax", "gst", "sales tax"],
            AMOUNT,
            ValueType::Amount,
        ),
        FieldRule::new(
            "total_due",
            &[
                "total due",
                "total amount",
                "total payable",
                "total inc vat",
                "total including vat",
            ],
            AMOUNT,
            ValueType::Amount,
        ),
    ]
}

/// Default label-less rules for generic PII-style extraction. These resolve
/// through the fallback pass only.
pub fn pii_rules() -> Vec<FieldRule> {
    vec![
        FieldRule::new(
            "emails",
            &[],
            r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}",
            ValueType::Text,
        ),
        FieldRule::new(
            "phone_numbers",
            &[],
            r"\b\d{3}[-.]?\d{3}[-.]?\d{4}\b",
            ValueType::Text,
        ),
        FieldRule::new("dates", &[], r"\b\d{2}[-/]\d{2}[-/]\d{4}\b", ValueType::Text),
        FieldRule::new(
            "dollar_amounts",
            &[],
            r"\$\s*\d+(?:,\d{3})*(?:\.\d{2})?",
            ValueType::Amount,
        ),
        FieldRule::new("ssn", &[], r"\b\d{3}-\d{2}-\d{4}\b", ValueType::Text),
    ]
}

lazy_static! {
    static ref INVOICE_FIELDS: FieldRegistry =
        FieldRegistry::from_rules(invoice_rules()).expect("built-in invoice rules compile");
    static ref PII_PATTERNS: FieldRegistry =
        FieldRegistry::from_rules(pii_rules()).expect("built-in PII rules compile");
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_invoice_fields_order_is_stable() {
        let registry = FieldRegistry::invoice_fields();

        let names: Vec<&str> = registry.field_names().collect();
        assert_eq!(
            names,
            vec![
                "company_name",
                "document_number",
                "sold_to_party",
                "reference",
                "total_net",
                "vat",
                "total_due",
            ]
        );
    }

    #[test]
    fn test_pii_patterns_have_no_labels() {
        let registry = FieldRegistry::pii_patterns();

        assert_eq!(registry.len(), 5);
        for field in registry.fields() {
            assert!(field.labels().is_empty());
            assert!(field.label_windows().is_empty());
        }
    }

    #[test]
    fn test_duplicate_field_name_rejected() {
        let rules = vec![
            FieldRule::new("vat", &["vat"], r"\d+", ValueType::Amount),
            FieldRule::new("vat", &["tax"], r"\d+", ValueType::Amount),
        ];

        assert!(matches!(
            FieldRegistry::from_rules(rules),
            Err(RegistryError::DuplicateField(name)) if name == "vat"
        ));
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let rules = vec![FieldRule::new("broken", &[], r"(\d+", ValueType::Number)];

        assert!(matches!(
            FieldRegistry::from_rules(rules),
            Err(RegistryError::InvalidPattern { field, .. }) if field == "broken"
        ));
    }

    #[test]
    fn test_empty_rule_set_rejected() {
        assert!(matches!(
            FieldRegistry::from_rules(Vec::new()),
            Err(RegistryError::Empty)
        ));
    }

    #[test]
    fn test_capture_group_detection() {
        let whole = FieldDefinition::compile(FieldRule::new(
            "document_number",
            &[],
            r"\b\d{6,12}\b",
            ValueType::Number,
        ))
        .unwrap();
        let grouped = FieldDefinition::compile(FieldRule::new(
            "reference",
            &[],
            r"ref[:.]?\s*([A-Za-z0-9-]+)",
            ValueType::Text,
        ))
        .unwrap();

        assert!(!whole.captures_value());
        assert!(grouped.captures_value());
    }

    #[test]
    fn test_rule_serde_round_trip() {
        let rules = invoice_rules();
        let json = serde_json::to_string(&rules).unwrap();
        let parsed: Vec<FieldRule> = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, rules);
        assert!(FieldRegistry::from_rules(parsed).is_ok());
    }
}
