use assert_cmd::Command;
use predicates::str::contains;
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

fn cmd() -> Command {
    let mut cmd = Command::cargo_bin("license-report-mcp").unwrap();
    cmd.env_remove("LICENSE_REPORT_PATH").env_remove("LICENSE_REPORT_BASE");
    cmd
}

const SCANCODE: &str = r#"{
  "files": [
    {
      "path": "src/vendored/readline.c",
      "license_detections": [
        {"license_expression": "gpl-3.0", "matches": [{"score": 95.0}]}
      ]
    },
    {
      "path": "lib/blob.js",
      "scan_errors": ["timeout"],
      "licenses": [{"key": "unknown", "name": "Unknown", "score": 40.0}]
    }
  ]
}"#;

#[test]
fn serve_answers_handshake_and_knowledge_tools() {
    let input = concat!(
        r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#,
        "\n",
        r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
        "\n",
        r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#,
        "\n",
        r#"{"jsonrpc":"2.0","id":3,"method":"tools/call","params":{"name":"compare_license_compatibility","arguments":{"licenseA":"GPL-3.0","licenseB":"Apache-2.0"}}}"#,
        "\n",
        r#"{"jsonrpc":"2.0","id":4,"method":"tools/call","params":{"name":"get_license_clause_summary","arguments":{"licenseName":"LGPL-2.1"}}}"#,
        "\n",
    );

    cmd()
        .args(["--report", "/nonexistent/report.json", "serve"])
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("license-report-mcp"))
        .stdout(contains("generate_file_report"))
        .stdout(contains("Conditionally compatible"))
        .stdout(contains("GNU Lesser General Public License"));
}

#[test]
fn serve_is_default_command() {
    cmd()
        .args(["--report", "/nonexistent/report.json"])
        .write_stdin("{\"jsonrpc\":\"2.0\",\"id\":7,\"method\":\"ping\"}\n")
        .assert()
        .success()
        .stdout(contains(r#""id":7"#));
}

#[test]
fn serve_rejects_unknown_tool() {
    cmd()
        .args(["--report", "/nonexistent/report.json"])
        .write_stdin(
            "{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"tools/call\",\"params\":{\"name\":\"nope\"}}\n",
        )
        .assert()
        .success()
        .stdout(contains("-32601"));
}

#[test]
fn build_writes_report() {
    let mut input = NamedTempFile::new().unwrap();
    input.write_all(SCANCODE.as_bytes()).unwrap();
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("report.json");

    cmd()
        .arg("build")
        .arg(input.path())
        .arg("-o")
        .arg(&output)
        .arg("--quiet")
        .assert()
        .success()
        .stdout(contains("Files: 2"));

    let written = std::fs::read_to_string(&output).unwrap();
    let report: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert_eq!(report["metadata"]["total_files"], 2);
    assert_eq!(report["problematic_licenses"]["gpl"][0]["file"], "src/vendored/readline.c");
    assert_eq!(report["problematic_licenses"]["low_confidence"][0]["name"], "unknown");
    assert_eq!(report["scan_issues"].as_array().unwrap().len(), 2);
}

#[test]
fn build_missing_input_fails() {
    let dir = TempDir::new().unwrap();
    cmd()
        .arg("build")
        .arg(dir.path().join("missing.json"))
        .arg("-o")
        .arg(dir.path().join("out.json"))
        .assert()
        .failure()
        .stderr(contains("missing.json"));
}
