// tests/cli_tests.rs
use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

fn pipeline_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", content).unwrap();
    file
}

#[test]
fn test_translates_to_stdout() {
    let input = pipeline_file("processors:\n  - set: {field: a, value: \"1\"}\n");

    Command::cargo_bin("ingest-decoder")
        .unwrap()
        .arg(input.path())
        .assert()
        .success()
        .stdout(predicate::str::starts_with("normalize:"))
        .stdout(predicate::str::contains("a: '1'"));
}

#[test]
fn test_json_output() {
    let input = pipeline_file("processors:\n  - convert: {field: n, type: integer}\n");

    let output = Command::cargo_bin("ingest-decoder")
        .unwrap()
        .arg(input.path())
        .arg("--format")
        .arg("json")
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        value,
        serde_json::json!({"normalize": [{"map": [{"n": "parse_integer($n)"}]}]})
    );
}

#[test]
fn test_unknown_operation_exits_nonzero_without_output() {
    let input = pipeline_file(
        "processors:\n  - lowercase: {field: a}\n  - unknown_op: {field: b}\n",
    );

    Command::cargo_bin("ingest-decoder")
        .unwrap()
        .arg(input.path())
        .assert()
        .code(1)
        .stdout("")
        .stderr(predicate::str::contains("Unknown processor type: unknown_op"))
        .stderr(predicate::str::contains(
            "Exception processing operation: unknown_op",
        ))
        .stderr(predicate::str::contains("\"field\": \"b\""));
}

#[test]
fn test_missing_option_reports_processor() {
    let input = pipeline_file("processors:\n  - rename: {field: x}\n");

    Command::cargo_bin("ingest-decoder")
        .unwrap()
        .arg(input.path())
        .assert()
        .code(1)
        .stdout("")
        .stderr(predicate::str::contains("missing required option 'target_field'"))
        .stderr(predicate::str::contains("Exception processing operation: rename"));
}

#[test]
fn test_missing_file() {
    Command::cargo_bin("ingest-decoder")
        .unwrap()
        .arg("/no/such/pipeline.yml")
        .assert()
        .code(1)
        .stdout("")
        .stderr(predicate::str::contains(
            "Error: File '/no/such/pipeline.yml' not found",
        ));
}

#[test]
fn test_malformed_yaml() {
    let input = pipeline_file("processors: [unclosed\n");

    Command::cargo_bin("ingest-decoder")
        .unwrap()
        .arg(input.path())
        .assert()
        .code(1)
        .stdout("")
        .stderr(predicate::str::contains("Error parsing YAML"));
}

#[test]
fn test_output_file_and_config() {
    let input = pipeline_file(
        "processors:\n  - dissect: {field: message, pattern: '%{a} %{b}'}\n",
    );
    let config = pipeline_file("parse_style: piped\n");
    let output = NamedTempFile::new().unwrap();

    Command::cargo_bin("ingest-decoder")
        .unwrap()
        .arg(input.path())
        .arg("--config")
        .arg(config.path())
        .arg("-o")
        .arg(output.path())
        .assert()
        .success()
        .stdout("");

    let written = std::fs::read_to_string(output.path()).unwrap();
    assert!(written.contains("check: exists($message)"));
    assert!(written.contains("parse|message:"));
    assert!(written.contains("<a> <b>"));
}

#[test]
fn test_invalid_config() {
    let input = pipeline_file("processors: []\n");
    let config = pipeline_file("no_such_setting: true\n");

    Command::cargo_bin("ingest-decoder")
        .unwrap()
        .arg(input.path())
        .arg("--config")
        .arg(config.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid configuration"));
}

#[test]
fn test_debug_logs_to_stderr() {
    let input = pipeline_file("processors:\n  - lowercase: {field: a}\n");

    Command::cargo_bin("ingest-decoder")
        .unwrap()
        .arg("--debug")
        .arg(input.path())
        .env_remove("RUST_LOG")
        .assert()
        .success()
        .stdout(predicate::str::contains("downcase($a)"))
        .stderr(predicate::str::contains("translating processor"));
}
