use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn get_binary() -> String {
    env!("CARGO_BIN_EXE_trx-reporter").to_string()
}

const TWO_TESTS: &str = r#"{"event":"run_start"}
{"event":"suite","id":"s","title":"math"}
{"event":"test","id":"a","suite":"s","title":"A"}
{"event":"test","id":"b","suite":"s","title":"B"}
{"event":"test_start","id":"a"}
{"event":"test_end","id":"a","state":"passed"}
{"event":"test_start","id":"b"}
{"event":"fail","test":"b","error":{"message":"boom"}}
{"event":"test_end","id":"b","state":"failed","error":{"message":"boom"}}
{"event":"suite_end","id":"s"}
{"event":"run_end"}
"#;

fn run_in(dir: &Path, args: &[&str]) -> Output {
    Command::new(get_binary())
        .args(args)
        .current_dir(dir)
        .env("HOME", dir)
        .env_remove("TRX_REPORTER_FILE")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute trx-reporter")
}

#[test]
fn test_report_printed_to_stdout_without_output() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let events = temp_dir.path().join("events.ndjson");
    fs::write(&events, TWO_TESTS).unwrap();

    let output = run_in(temp_dir.path(), &["events.ndjson"]);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    assert_eq!(stdout.matches("<UnitTestResult ").count(), 2);
    assert!(stdout.contains("<Message>boom</Message>"));

    let files: Vec<_> = fs::read_dir(temp_dir.path()).unwrap().flatten().collect();
    assert_eq!(files.len(), 1, "only the event stream should exist");
}

#[test]
fn test_report_written_to_output_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    fs::write(temp_dir.path().join("events.ndjson"), TWO_TESTS).unwrap();

    let output = run_in(
        temp_dir.path(),
        &["events.ndjson", "--output", "results/out.trx"],
    );

    assert!(output.status.success());
    assert!(!String::from_utf8_lossy(&output.stdout).contains("<TestRun"));
    let report = fs::read_to_string(temp_dir.path().join("results/out.trx")).unwrap();
    assert!(report.contains("<ResultSummary outcome=\"Failed\">"));
}

#[test]
fn test_reporter_options_string() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    fs::write(temp_dir.path().join("events.ndjson"), TWO_TESTS).unwrap();

    let output = run_in(
        temp_dir.path(),
        &["events.ndjson", "--reporter-options", "output=opt.trx"],
    );

    assert!(output.status.success());
    assert!(temp_dir.path().join("opt.trx").exists());
}

#[test]
fn test_invalid_stream_fails() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    fs::write(
        temp_dir.path().join("events.ndjson"),
        "{\"event\":\"test_end\",\"id\":\"missing\",\"state\":\"passed\"}\n",
    )
    .unwrap();

    let output = run_in(temp_dir.path(), &["events.ndjson"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown test `missing`"));
}

#[test]
fn test_unknown_reporter_option_fails() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    fs::write(temp_dir.path().join("events.ndjson"), TWO_TESTS).unwrap();

    let output = run_in(
        temp_dir.path(),
        &["events.ndjson", "--reporter-options", "colour=true"],
    );

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown reporter option"));
}

#[test]
fn test_init_config_writes_toml() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    let output = run_in(temp_dir.path(), &["--init-config", ".trxreporterrc.toml"]);

    assert!(output.status.success());
    let content = fs::read_to_string(temp_dir.path().join(".trxreporterrc.toml")).unwrap();
    assert!(content.contains("[reporter]"));
    assert!(content.contains("exclude_pending = false"));
}

#[test]
fn test_environment_output_fallback() {
    // Arrange
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    fs::write(temp_dir.path().join("events.ndjson"), TWO_TESTS).unwrap();
    let template = temp_dir.path().join("reports/env-[hash].trx");

    // Act
    let output = Command::new(get_binary())
        .arg("events.ndjson")
        .current_dir(temp_dir.path())
        .env("HOME", temp_dir.path())
        .env("TRX_REPORTER_FILE", &template)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute trx-reporter");

    // Assert
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(!String::from_utf8_lossy(&output.stdout).contains("<TestRun"));

    let written: Vec<String> = fs::read_dir(temp_dir.path().join("reports"))
        .unwrap()
        .flatten()
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(written.len(), 1);
    let hash = written[0]
        .strip_prefix("env-")
        .and_then(|name| name.strip_suffix(".trx"))
        .expect("report named after the template");
    assert_eq!(hash.len(), 32);
    assert!(hash.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')));

    let report = fs::read_to_string(temp_dir.path().join("reports").join(&written[0])).unwrap();
    assert_eq!(report.matches("<UnitTestResult ").count(), 2);
}
