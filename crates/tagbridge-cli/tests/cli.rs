//! CLI integration tests for the `tagbridge` binary.
//!
//! Each test writes its templates and mapping files into a temporary
//! directory and checks exit codes, stdout and stderr.

use std::fs::{read_to_string, write};
use std::path::PathBuf;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

const TEMPLATE: &str =
    "Dear {{Name}},\n{{TableStart:LineItems}}{{ProductName}}\n{{TableEnd:LineItems}}{{Legacy}}\n";

const MAPPING: &str = r#"{
    "direct_mappings": { "{{Name}}": "contact.name" },
    "nested_paths": {
        "opportunity.line_items": {
            "source_path": "TableStart:LineItems",
            "fields": { "{{ProductName}}": "name" }
        }
    }
}"#;

/// Helper: create a Command for the `tagbridge` binary with a clean environment.
fn tagbridge() -> Command {
    let mut cmd = cargo_bin_cmd!("tagbridge");
    cmd.env_remove("TAGBRIDGE_MAPPING")
        .env_remove("TAGBRIDGE_CONTEXT")
        .env_remove("TAGBRIDGE_QUERY")
        .env_remove("RUST_LOG")
        .arg("--color")
        .arg("never");
    cmd
}

fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    write(&path, content).unwrap();
    path
}

// ──────────────────────────────────────────────
// convert
// ──────────────────────────────────────────────

#[test]
fn convert_prints_document_and_summary() {
    let dir = TempDir::new().unwrap();
    let template = write_file(&dir, "letter.txt", TEMPLATE);
    let mapping = write_file(&dir, "mapping.json", MAPPING);

    tagbridge()
        .arg("convert")
        .arg(&template)
        .arg("--mapping")
        .arg(&mapping)
        .assert()
        .success()
        .stdout(predicate::eq(
            "Dear {{contact.name}},\n{{#opportunity.line_items}}{{name}}\n{{/opportunity.line_items}}{{Legacy}}\n",
        ))
        .stderr(
            predicate::str::contains("section-mapping")
                .and(predicate::str::contains("unmapped-field"))
                .and(predicate::str::contains("0 errors, 1 warnings")),
        );
}

#[test]
fn convert_writes_output_report_and_schema_files() {
    let dir = TempDir::new().unwrap();
    let template = write_file(&dir, "letter.txt", TEMPLATE);
    let mapping = write_file(&dir, "mapping.json", MAPPING);
    let output = dir.path().join("out.txt");
    let report = dir.path().join("report.json");
    let schema = dir.path().join("schema.json");

    tagbridge()
        .arg("convert")
        .arg(&template)
        .arg("--mapping")
        .arg(&mapping)
        .arg("--output")
        .arg(&output)
        .arg("--report")
        .arg(&report)
        .arg("--schema")
        .arg(&schema)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let converted = read_to_string(&output).unwrap();
    assert!(converted.starts_with("Dear {{contact.name}},"));

    let report: Value = serde_json::from_str(&read_to_string(&report).unwrap()).unwrap();
    assert_eq!(report["converted"], Value::String(converted));
    assert_eq!(report["report"].as_array().unwrap().len(), 5);
    assert_eq!(report["errors"][0]["kind"], "unmapped-field");

    let schema: Value = serde_json::from_str(&read_to_string(&schema).unwrap()).unwrap();
    assert_eq!(schema["schema_version"], "v1");
    assert_eq!(schema["fields"][0]["name"], "contact.name");
    assert_eq!(schema["fields"][1]["name"], "name");
}

#[test]
fn convert_json_prints_conversion_result() {
    let dir = TempDir::new().unwrap();
    let template = write_file(&dir, "letter.txt", "{{IF:Vip}}Hi{{ENDIF}}");

    let assert = tagbridge()
        .arg("convert")
        .arg(&template)
        .arg("--json")
        .assert()
        .success();

    let result: Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    assert_eq!(result["converted"], "{{#Vip}}Hi{{/Vip}}");
    assert_eq!(result["metrics"]["control_tag_count"], 2);
    assert_eq!(result["errors"].as_array().unwrap().len(), 0);
}

#[test]
fn convert_reads_sources_from_environment() {
    let dir = TempDir::new().unwrap();
    let template = write_file(&dir, "letter.txt", "{{Name}} {{Email}}");
    let mapping = write_file(&dir, "mapping.json", MAPPING);
    let context = write_file(
        &dir,
        "context.csv",
        "CongaField,RelatedBoxField,DataType\n{{Email}},contact.email,string\n",
    );

    tagbridge()
        .env("TAGBRIDGE_MAPPING", &mapping)
        .env("TAGBRIDGE_CONTEXT", &context)
        .arg("convert")
        .arg(&template)
        .assert()
        .success()
        .stdout(predicate::eq("{{contact.name}} {{contact.email}}"))
        .stderr(predicate::str::contains("context-lookup"));
}

#[test]
fn convert_notes_query_fields() {
    let dir = TempDir::new().unwrap();
    let template = write_file(&dir, "letter.txt", "{{AccountName}}");
    let query = write_file(
        &dir,
        "query.sql",
        "SELECT Account.Name AS AccountName FROM Opportunity",
    );

    tagbridge()
        .arg("convert")
        .arg(&template)
        .arg("--query")
        .arg(&query)
        .assert()
        .success()
        .stderr(predicate::str::contains("query context"));
}

#[test]
fn strict_convert_fails_on_unclosed_block() {
    let dir = TempDir::new().unwrap();
    let template = write_file(&dir, "letter.txt", "{{TableStart:Rows}}{{Name}}");

    tagbridge()
        .arg("convert")
        .arg(&template)
        .assert()
        .success();

    tagbridge()
        .arg("convert")
        .arg(&template)
        .arg("--strict")
        .assert()
        .code(exitcode::DATAERR)
        .stderr(predicate::str::contains("unclosed-block"));
}

#[test]
fn missing_template_is_a_fatal_error() {
    let dir = TempDir::new().unwrap();

    tagbridge()
        .arg("convert")
        .arg(dir.path().join("absent.txt"))
        .assert()
        .code(exitcode::SOFTWARE)
        .stderr(predicate::str::contains("failed to read template"));
}

#[test]
fn invalid_mapping_file_is_a_fatal_error() {
    let dir = TempDir::new().unwrap();
    let template = write_file(&dir, "letter.txt", "{{Name}}");
    let mapping = write_file(&dir, "mapping.json", "{ not json");

    tagbridge()
        .arg("convert")
        .arg(&template)
        .arg("--mapping")
        .arg(&mapping)
        .assert()
        .code(exitcode::SOFTWARE)
        .stderr(predicate::str::contains("failed to load mapping file"));
}

// ──────────────────────────────────────────────
// scan
// ──────────────────────────────────────────────

#[test]
fn scan_lists_elements() {
    let dir = TempDir::new().unwrap();
    let template = write_file(&dir, "letter.txt", "{{TableStart:Rows}} {{Name}}");

    tagbridge()
        .arg("scan")
        .arg(&template)
        .assert()
        .success()
        .stdout(
            predicate::str::contains("control-tag")
                .and(predicate::str::contains("Rows"))
                .and(predicate::str::contains("merge-field"))
                .and(predicate::str::contains("text").not()),
        );
}

#[test]
fn scan_json_hides_blank_text_unless_all() {
    let dir = TempDir::new().unwrap();
    let template = write_file(&dir, "letter.txt", "{{A}} {{B}}");

    let assert = tagbridge()
        .arg("scan")
        .arg(&template)
        .arg("--json")
        .assert()
        .success();
    let elements: Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    assert_eq!(elements.as_array().unwrap().len(), 2);

    let assert = tagbridge()
        .arg("scan")
        .arg(&template)
        .arg("--json")
        .arg("--all")
        .assert()
        .success();
    let elements: Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    assert_eq!(elements.as_array().unwrap().len(), 3);
    assert_eq!(elements[1]["kind"], "text");
}

// ──────────────────────────────────────────────
// check
// ──────────────────────────────────────────────

#[test]
fn check_passes_balanced_template() {
    let dir = TempDir::new().unwrap();
    let template = write_file(&dir, "ok.txt", "{{IF:A}}{{Unmapped}}{{ENDIF}}");

    tagbridge()
        .arg("check")
        .arg(&template)
        .assert()
        .success()
        .stdout(predicate::str::contains("ok"));
}

#[test]
fn check_reports_structural_errors() {
    let dir = TempDir::new().unwrap();
    let good = write_file(&dir, "good.txt", "{{Name}}");
    let bad = write_file(&dir, "bad.txt", "{{TableStart:Rows}}{{Name}}");

    tagbridge()
        .arg("check")
        .arg(&good)
        .arg(&bad)
        .assert()
        .code(exitcode::DATAERR)
        .stderr(
            predicate::str::contains("unclosed-block")
                .and(predicate::str::contains("is never closed")),
        );
}

#[test]
fn check_warnings_do_not_fail() {
    let dir = TempDir::new().unwrap();
    let template = write_file(&dir, "warn.txt", "{{IMAGE:Logo}}");

    tagbridge()
        .arg("check")
        .arg(&template)
        .assert()
        .success()
        .stderr(predicate::str::contains("unhandled-control-tag"));
}

#[test]
fn check_json_lists_issues_per_file() {
    let dir = TempDir::new().unwrap();
    let template = write_file(&dir, "bad.txt", "{{ENDIF}}");

    let assert = tagbridge()
        .arg("check")
        .arg(&template)
        .arg("--json")
        .assert()
        .code(exitcode::DATAERR);

    let files: Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    assert_eq!(files[0]["issues"][0]["kind"], "unexpected-block-end");
    assert_eq!(files[0]["issues"][0]["element_index"], 0);
}

#[test]
fn check_requires_a_file() {
    tagbridge().arg("check").assert().failure();
}
