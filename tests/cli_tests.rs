//! Integration tests for the binomen CLI
//!
//! Runs the binary against temporary datasets and configuration files.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn binomen_cmd() -> Command {
    Command::cargo_bin("binomen").unwrap()
}

const LION: &str = r#"{"description": "a majestic lion with a flowing mane", "family": "Felidae", "generated_name": "*Panthera crinita*"}"#;
const MOUSE: &str = r#"{"description": "a tiny gray mouse living in a barn", "family": "Muridae", "generated_name": "Pseudomys inni"}"#;
const UNKNOWN: &str = r#"{"description": "a quiet creature", "family": "Nonexistentidae", "generated_name": "Felis leo"}"#;

fn write_dataset(dir: &Path, lines: &[&str]) -> PathBuf {
    let path = dir.join("cases.jsonl");
    fs::write(&path, lines.join("\n")).unwrap();
    path
}

#[test]
fn test_help_lists_commands() {
    binomen_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("evaluate"))
        .stdout(predicate::str::contains("list-families"));
}

#[test]
fn test_print_default_config() {
    binomen_cmd()
        .arg("print-default-config")
        .assert()
        .success()
        .stdout(predicate::str::contains("profile: permissive"))
        .stdout(predicate::str::contains("family_policy: count_as_failure"));
}

#[test]
fn test_init_config_respects_force() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("binomen.yml");

    binomen_cmd()
        .args(["init-config", "--output"])
        .arg(&path)
        .assert()
        .success();
    assert!(path.exists());

    binomen_cmd()
        .args(["init-config", "--output"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    binomen_cmd()
        .args(["init-config", "--force", "--output"])
        .arg(&path)
        .assert()
        .success();
}

#[test]
fn test_validate_config() {
    let dir = tempdir().unwrap();
    let valid = dir.path().join("valid.yml");
    fs::write(&valid, "grammar:\n  profile: strict\nevaluation:\n  parallel: false\n").unwrap();

    binomen_cmd()
        .arg("validate-config")
        .arg(&valid)
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration file is valid"))
        .stdout(predicate::str::contains("Strict"));

    let invalid = dir.path().join("invalid.yml");
    fs::write(&invalid, "constraint:\n  delimiter: ''\n").unwrap();

    binomen_cmd()
        .arg("validate-config")
        .arg(&invalid)
        .assert()
        .failure()
        .stderr(predicate::str::contains("delimiter"));
}

#[test]
fn test_evaluate_table_output() {
    let dir = tempdir().unwrap();
    let dataset = write_dataset(dir.path(), &[LION, MOUSE]);

    binomen_cmd()
        .arg("evaluate")
        .arg(&dataset)
        .assert()
        .success()
        .stdout(predicate::str::contains("*Panthera crinita*"))
        .stdout(predicate::str::contains("Latin format"))
        .stdout(predicate::str::contains("100.00%"));
}

#[test]
fn test_evaluate_json_output() {
    let dir = tempdir().unwrap();
    let dataset = write_dataset(dir.path(), &[LION, MOUSE, UNKNOWN]);

    let output = binomen_cmd()
        .arg("evaluate")
        .arg(&dataset)
        .args(["--format", "json", "--family-policy", "exclude-unknown", "--sequential"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["metrics"]["total"], 3);
    assert_eq!(report["metrics"]["family_unknown"], 1);
    assert_eq!(report["metrics"]["family_judged"], 2);
    assert_eq!(report["metrics"]["family_policy"], "exclude_unknown");
    assert_eq!(report["records"][2]["family_check"]["verdict"]["status"], "unknown_family");
}

#[test]
fn test_evaluate_writes_markdown_report() {
    let dir = tempdir().unwrap();
    let dataset = write_dataset(dir.path(), &[LION, MOUSE]);
    let out = dir.path().join("reports");

    binomen_cmd()
        .arg("evaluate")
        .arg(&dataset)
        .args(["--format", "markdown", "--out"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("binomen-report.md"));

    let report = fs::read_to_string(out.join("binomen-report.md")).unwrap();
    assert!(report.contains("| Latin format | 100.00% | 2/2 |"));
    assert!(report.contains("### Case 2: `Pseudomys inni`"));
}

#[test]
fn test_evaluate_strict_profile_from_flag() {
    let dir = tempdir().unwrap();
    let dataset = write_dataset(dir.path(), &[UNKNOWN]);

    let output = binomen_cmd()
        .arg("evaluate")
        .arg(&dataset)
        .args(["--format", "json", "--profile", "strict"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["records"][0]["format"]["is_valid"], false);
    assert_eq!(report["records"][0]["format"]["violation"]["kind"], "epithet_suffix");
}

#[test]
fn test_evaluate_records_single_word_name() {
    let dir = tempdir().unwrap();
    let single = r#"{"description": "a fluffy cat", "family": "Felidae", "generated_name": "Felis"}"#;
    let dataset = write_dataset(dir.path(), &[LION, single]);

    let output = binomen_cmd()
        .arg("evaluate")
        .arg(&dataset)
        .args(["--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["metrics"]["total"], 2);
    assert_eq!(report["metrics"]["semantic_unscored"], 1);
    assert_eq!(report["records"][1]["format"]["violation"]["kind"], "word_count");
    assert_eq!(report["records"][1]["family_check"]["verdict"]["status"], "valid");
    assert_eq!(report["records"][1]["semantic"]["outcome"], "malformed");
    assert!(report["records"][1]["semantic"]["reason"]
        .as_str()
        .unwrap()
        .contains("Malformed name 'Felis'"));

    binomen_cmd()
        .arg("evaluate")
        .arg(&dataset)
        .assert()
        .success()
        .stdout(predicate::str::contains("unscored"));
}

#[test]
fn test_evaluate_missing_field_reports_line() {
    let dir = tempdir().unwrap();
    let dataset = write_dataset(dir.path(), &[LION, r#"{"description": "x", "family": "Felidae"}"#]);

    binomen_cmd()
        .arg("evaluate")
        .arg(&dataset)
        .assert()
        .failure()
        .stderr(predicate::str::contains("generated_name"));
}

#[test]
fn test_check_command() {
    binomen_cmd()
        .args(["check", "Panthera crinita", "--family", "Felidae"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Valid Latin binomial"))
        .stdout(predicate::str::contains("correctly belongs to Felidae"));

    binomen_cmd()
        .args(["check", "panthera crinita"])
        .assert()
        .success()
        .stdout(predicate::str::contains("should start with capital letter"));
}

#[test]
fn test_score_command() {
    binomen_cmd()
        .args([
            "score",
            "Panthera crinita",
            "--description",
            "a majestic lion with a flowing mane",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("'crinita' → 'mane'"))
        .stdout(predicate::str::contains("majestic"));
}

#[test]
fn test_prompt_command() {
    binomen_cmd()
        .args(["prompt", "--description", " a lion ", "--family", "Felidae"])
        .assert()
        .success()
        .stdout("Description: a lion\nFamily: Felidae\nName:\n");

    binomen_cmd()
        .args([
            "prompt",
            "--description",
            "a lion",
            "--family",
            "Felidae",
            "--name",
            "Panthera leo",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Name: Panthera leo"));
}

#[test]
fn test_list_families_with_override() {
    binomen_cmd()
        .arg("list-families")
        .assert()
        .success()
        .stdout(predicate::str::contains("Felidae"))
        .stdout(predicate::str::contains("27 families"));

    let dir = tempdir().unwrap();
    let taxonomy = dir.path().join("taxonomy.yml");
    fs::write(&taxonomy, "Muridae: [Mus, Rattus]\n").unwrap();
    let config = dir.path().join("binomen.yml");
    fs::write(
        &config,
        format!("reference:\n  taxonomy_path: {}\n", taxonomy.display()),
    )
    .unwrap();

    binomen_cmd()
        .arg("list-families")
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Rattus"))
        .stdout(predicate::str::contains("1 families"));
}
