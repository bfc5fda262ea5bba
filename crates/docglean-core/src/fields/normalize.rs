//! Type-aware cleanup of raw matched values.

use super::registry::ValueType;

/// Normalize a raw matched substring into its canonical form.
///
/// Returns `None` for empty input, or when cleanup strips every character
/// (e.g. a `Number` value with no digits).
///
/// `Amount` handling infers the decimal convention from punctuation shape:
/// a comma with no period is treated as a European decimal separator, while
/// comma plus period treats the rightmost of the two as the decimal
/// separator and strips the other. No currency
/// detection is performed, so an amount like `1,234` is read as `1.234` —
/// a known limitation of shape-based inference.
pub fn normalize(raw: &str, value_type: ValueType) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let cleaned = match value_type {
        ValueType::Text => trimmed.split_whitespace().collect::<Vec<_>>().join(" "),
        ValueType::Number => trimmed.chars().filter(|c| c.is_ascii_digit()).collect(),
        ValueType::Amount => normalize_amount(trimmed),
    };

    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

fn normalize_amount(raw: &str) -> String {
    let stripped: String = raw
        .chars()
        .filter(|c| !matches!(c, '£' | '$' | '€') && !c.is_whitespace())
        .collect();

    if stripped.contains(',') && !stripped.contains('.') {
        // European convention: comma is the decimal separator.
        stripped.replace(',', ".")
    } else if stripped.contains(',') {
        // Both separators present: the rightmost one is the decimal
        // separator, the other marks thousands.
        match (stripped.rfind(','), stripped.rfind('.')) {
            (Some(comma), Some(dot)) if comma > dot => {
                stripped.replace('.', "").replace(',', ".")
            }
            _ => stripped.replace(',', ""),
        }
    } else {
        stripped
    }
}
