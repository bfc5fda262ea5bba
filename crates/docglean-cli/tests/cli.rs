//! End-to-end tests for the docglean binary.

use assert_cmd::Command;
use predicates::prelude::*;

fn docglean() -> Command {
    Command::cargo_bin("docglean").unwrap()
}

#[test]
fn rules_lists_default_invoice_fields() {
    docglean()
        .arg("rules")
        .assert()
        .success()
        .stdout(predicate::str::contains("company_name"))
        .stdout(predicate::str::contains("total_due"))
        .stdout(predicate::str::contains("document_number"));
}

#[test]
fn rules_show_pii_lists_generic_patterns() {
    docglean()
        .args(["rules", "show", "--pii"])
        .assert()
        .success()
        .stdout(predicate::str::contains("emails"))
        .stdout(predicate::str::contains("ssn"));
}

#[test]
fn rules_init_writes_config_and_respects_existing() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("docglean.json");

    docglean()
        .args(["rules", "init", "--output"])
        .arg(&config_path)
        .assert()
        .success();

    let content = std::fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("company_name"));

    docglean()
        .args(["rules", "init", "--output"])
        .arg(&config_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn extract_fails_on_missing_input() {
    docglean()
        .args(["extract", "does-not-exist.pdf"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn extract_fails_cleanly_on_non_pdf_input() {
    let dir = tempfile::tempdir().unwrap();
    let bogus = dir.path().join("bogus.pdf");
    std::fs::write(&bogus, b"plain text, not a pdf").unwrap();

    docglean()
        .arg("extract")
        .arg(&bogus)
        .assert()
        .failure()
        .stderr(predicate::str::contains("parse"));
}

#[test]
fn batch_rejects_rules_file_with_invalid_pattern() {
    let dir = tempfile::tempdir().unwrap();
    let rules = dir.path().join("rules.json");
    std::fs::write(
        &rules,
        r#"{"fields": [{"name": "broken", "pattern": "(\\d+"}]}"#,
    )
    .unwrap();

    docglean()
        .args(["batch", "*.pdf", "--rules"])
        .arg(&rules)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid pattern"));
}

#[test]
fn batch_fails_when_no_files_match() {
    docglean()
        .args(["batch", "no/such/dir/*.pdf"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No matching PDF files"));
}
