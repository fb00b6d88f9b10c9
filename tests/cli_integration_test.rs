//! Runs the `callmatch` binary against a temporary working directory.

use assert_cmd::Command;
use indoc::indoc;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const BATCH: &str = indoc! {r#"
    {"data": [
        {"type": "operator", "id": "o1", "attributes": {"prefix": "0", "operator": "OperCo"}},
        {"type": "call", "id": "c1", "attributes": {
            "date": "2024-01-05T10:00:00", "number": "44201234567",
            "riskScore": 0.37, "greenList": false, "redList": false}}
    ]}
"#};

fn callmatch(dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_callmatch"));
    cmd.current_dir(dir)
        .env_remove("CALLMATCH_CONFIG")
        .env_remove("RUST_LOG")
        .env("CALLMATCH_DATA_DIR", dir.join("data"));
    cmd
}

fn workspace() -> TempDir {
    let dir = TempDir::new().unwrap();
    callmatch(dir.path()).arg("init").assert().success();
    dir
}

fn stdout_of(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_init_refuses_to_overwrite() {
    let dir = workspace();
    assert!(dir.path().join(".callmatch.toml").is_file());

    callmatch(dir.path()).arg("init").assert().failure();
    callmatch(dir.path()).args(["init", "--force"]).assert().success();
}

#[test]
fn test_ingest_then_trigger_publishes_report() {
    let dir = workspace();
    let batch = dir.path().join("batch.json");
    fs::write(&batch, BATCH).unwrap();

    let output = callmatch(dir.path())
        .arg("ingest")
        .arg(&batch)
        .assert()
        .success()
        .get_output()
        .clone();
    assert!(stdout_of(&output).contains("\"c1\""));

    let output = callmatch(dir.path())
        .args(["trigger", "--print"])
        .assert()
        .success()
        .get_output()
        .clone();
    let stdout = stdout_of(&output);
    assert!(stdout.contains("reports/"), "{stdout}");
    assert!(stdout.contains("OperCo"), "{stdout}");
    assert!(stdout.contains("0.4"), "{stdout}");

    let reports = dir.path().join("data/infra-smartnumbers-output-bucket/reports");
    let files: Vec<_> = fs::read_dir(&reports).unwrap().collect();
    assert_eq!(files.len(), 1);
    let path = files[0].as_ref().unwrap().path();
    assert_eq!(
        fs::read_to_string(path).unwrap(),
        "c1,2024-01-05,44201234567,OperCo,0.4\r\n"
    );
}

#[test]
fn test_ingest_reads_stdin() {
    let dir = workspace();
    callmatch(dir.path())
        .args(["ingest", "-"])
        .write_stdin(BATCH)
        .assert()
        .success();
    assert!(dir
        .path()
        .join("data/tables/infra-smartnumbers-calls.json")
        .is_file());
}

#[test]
fn test_rejected_batch_exits_nonzero_and_writes_nothing() {
    let dir = workspace();
    let batch = dir.path().join("batch.json");
    fs::write(
        &batch,
        r#"{"data": [{"type": "call", "id": "c1", "attributes": {"date": "2024-01-05", "riskScore": 0.1, "greenList": false, "redList": false}}, {"type": "fax", "id": "f1"}]}"#,
    )
    .unwrap();

    let output = callmatch(dir.path())
        .arg("ingest")
        .arg(&batch)
        .assert()
        .failure()
        .get_output()
        .clone();

    assert!(stdout_of(&output).contains("UnsupportedTypeError"));
    assert!(!dir.path().join("data/tables").exists());
}

#[test]
fn test_invoke_rejects_non_post_methods() {
    let dir = workspace();
    let output = callmatch(dir.path())
        .args(["invoke", "--route", "trigger", "-"])
        .write_stdin(r#"{"httpMethod": "GET", "body": null}"#)
        .assert()
        .failure()
        .get_output()
        .clone();

    let stdout = stdout_of(&output);
    assert!(stdout.contains("\"statusCode\": 400"), "{stdout}");
    assert!(stdout.contains("Unsupported method"), "{stdout}");
}

#[test]
fn test_trigger_with_other_event_is_rejected() {
    let dir = workspace();
    callmatch(dir.path())
        .args(["trigger", "--event", "Old trigger"])
        .assert()
        .failure();
}
