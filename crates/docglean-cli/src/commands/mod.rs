//! CLI subcommands.

pub mod batch;
pub mod extract;
pub mod rules;

use std::path::Path;

use docglean_core::{DocgleanConfig, FieldRegistry, LabelResolver};

/// Load configuration from the given path, or defaults when absent.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<DocgleanConfig> {
    match config_path {
        Some(path) => Ok(DocgleanConfig::from_file(Path::new(path))?),
        None => Ok(DocgleanConfig::default()),
    }
}

/// Build the active field registry from configuration.
///
/// Order of precedence: `--pii` flag, then a `--rules` file, then a `fields`
/// override from the config file, then the built-in invoice set. A malformed
/// rule set is fatal: no field is well-defined without the registry.
pub fn build_registry(
    config: &DocgleanConfig,
    rules_path: Option<&Path>,
    pii: bool,
) -> anyhow::Result<FieldRegistry> {
    if pii {
        return Ok(FieldRegistry::pii_patterns());
    }
    if let Some(path) = rules_path {
        let rules = DocgleanConfig::from_file(path)?
            .fields
            .ok_or_else(|| anyhow::anyhow!("no field rules defined in {}", path.display()))?;
        return Ok(FieldRegistry::from_rules(rules)?);
    }
    match &config.fields {
        Some(rules) => Ok(FieldRegistry::from_rules(rules.clone())?),
        None => Ok(FieldRegistry::invoice_fields()),
    }
}

/// Build a resolver honoring the configured pass toggles.
pub fn build_resolver(config: &DocgleanConfig) -> LabelResolver {
    LabelResolver::new()
        .with_label_pass(config.extraction.label_pass)
        .with_fallback_pass(config.extraction.fallback_pass)
}

#[cfg(test)]
mod tests {
    use docglean_core::{FieldRule, ValueType};
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use super::*;

    fn rules_file(dir: &Path, fields: Option<Vec<FieldRule>>) -> std::path::PathBuf {
        let path = dir.join("rules.json");
        let config = DocgleanConfig {
            fields,
            ..DocgleanConfig::default()
        };
        config.save(&path).unwrap();
        path
    }

    #[test]
    fn test_rules_file_overrides_builtin_fields() {
        let dir = tempdir().unwrap();
        let path = rules_file(
            dir.path(),
            Some(vec![FieldRule::new(
                "po_number",
                &["PO Number"],
                r"PO-\d+",
                ValueType::Text,
            )]),
        );

        let registry =
            build_registry(&DocgleanConfig::default(), Some(&path), false).unwrap();

        assert_eq!(registry.field_names().collect::<Vec<_>>(), vec!["po_number"]);
    }

    #[test]
    fn test_pii_flag_wins_over_rules_file() {
        let dir = tempdir().unwrap();
        let path = rules_file(
            dir.path(),
            Some(vec![FieldRule::new("x", &[], r"\d+", ValueType::Text)]),
        );

        let registry = build_registry(&DocgleanConfig::default(), Some(&path), true).unwrap();

        assert!(registry.field_names().any(|n| n == "emails"));
    }

    #[test]
    fn test_rules_file_without_fields_is_rejected() {
        let dir = tempdir().unwrap();
        let path = rules_file(dir.path(), None);

        let result = build_registry(&DocgleanConfig::default(), Some(&path), false);

        assert!(result.unwrap_err().to_string().contains("no field rules"));
    }
}
