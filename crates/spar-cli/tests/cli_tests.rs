//! CLI integration tests for spar
//!
//! Tests command parsing, analysis over a directory of ledger files,
//! output formatting, and config handling.

use serde_json::{json, Value};
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

/// Helper to run the CLI with an isolated config file
fn run_spar(config_dir: &Path, args: &[&str]) -> std::process::Output {
    let config = config_dir.join("config.toml");
    Command::new(env!("CARGO_BIN_EXE_spar"))
        .arg("--config")
        .arg(&config)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute command")
}

fn hex_account(id: u8) -> String {
    format!("{:02x}", id).repeat(32)
}

fn payment(to: u8) -> Value {
    json!({
        "body": {
            "type": "payment",
            "destination": { "ed25519": hex_account(to) },
            "asset": { "type": "native" }
        }
    })
}

fn manage_data(name: &str) -> Value {
    json!({ "body": { "type": "manage_data", "name": name } })
}

fn record(source: u8, operations: Vec<Value>) -> Value {
    json!({
        "source_account": hex_account(source),
        "fee_account": hex_account(source),
        "envelope": { "type": "tx", "operations": operations }
    })
}

/// Ledger 1: two payments into one account; ledger 2: one data write
fn ledger_dir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let ledgers = [
        json!({
            "sequence": 1,
            "transactions": [record(1, vec![payment(9)]), record(2, vec![payment(9)])]
        }),
        json!({
            "sequence": 2,
            "transactions": [record(3, vec![manage_data("K")])]
        }),
    ];
    for ledger in &ledgers {
        let seq = ledger["sequence"].as_u64().unwrap();
        std::fs::write(dir.path().join(format!("{}.json", seq)), ledger.to_string()).unwrap();
    }
    dir
}

fn stdout_json(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

// ==================== Help & Version Tests ====================

#[test]
fn test_cli_help() {
    let home = tempfile::tempdir().unwrap();
    let output = run_spar(home.path(), &["--help"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("spar"));
    assert!(stdout.contains("analyze"));
    assert!(stdout.contains("ledger"));
    assert!(stdout.contains("config"));
}

#[test]
fn test_cli_version() {
    let home = tempfile::tempdir().unwrap();
    let output = run_spar(home.path(), &["--version"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("spar"));
}

#[test]
fn test_cli_analyze_help() {
    let home = tempfile::tempdir().unwrap();
    let output = run_spar(home.path(), &["analyze", "--help"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--from"));
    assert!(stdout.contains("--to"));
    assert!(stdout.contains("--jobs"));
}

// ==================== Analyze Command Tests ====================

#[test]
fn test_analyze_json() {
    let home = tempfile::tempdir().unwrap();
    let data = ledger_dir();
    let data_dir = data.path().to_str().unwrap();

    let output = run_spar(
        home.path(),
        &["--json", "analyze", "--from", "1", "--to", "3", "--data-dir", data_dir, "--jobs", "2"],
    );
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let json = stdout_json(&output);
    let ledgers = json["ledgers"].as_array().unwrap();
    assert_eq!(ledgers.len(), 2);
    assert_eq!(ledgers[0]["sequence"], 1);
    assert_eq!(ledgers[0]["free"], 1);
    assert_eq!(ledgers[0]["conflicted"], 1);
    assert_eq!(ledgers[1]["sequence"], 2);
    assert_eq!(ledgers[1]["free_fraction"], 1.0);

    assert_eq!(json["total"]["free"], 2);
    assert_eq!(json["total"]["conflicted"], 1);
    assert_eq!(json["total"]["stats"]["conflicts"]["PAYMENT"], 1);
    assert_eq!(json["total"]["stats"]["reasons"]["ACCOUNT_BALANCE"], 1);

    assert_eq!(json["metrics"]["counters"]["ledgers_analyzed"], 2);
    assert_eq!(json["metrics"]["histograms"]["free_fraction"]["count"], 2);
}

#[test]
fn test_analyze_text() {
    let home = tempfile::tempdir().unwrap();
    let data = ledger_dir();
    let data_dir = data.path().to_str().unwrap();

    let output = run_spar(
        home.path(),
        &["analyze", "--from", "1", "--to", "3", "--data-dir", data_dir],
    );
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("conflicts by operation"));
    assert!(stdout.contains("PAYMENT"));
    assert!(stdout.contains("ACCOUNT_BALANCE"));
    assert!(stdout.contains("free fraction per ledger"));
    assert!(stdout.contains('#'));
}

#[test]
fn test_analyze_range_is_half_open() {
    let home = tempfile::tempdir().unwrap();
    let data = ledger_dir();
    let data_dir = data.path().to_str().unwrap();

    let output = run_spar(
        home.path(),
        &["--json", "analyze", "--from", "1", "--to", "2", "--data-dir", data_dir],
    );
    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["ledgers"].as_array().unwrap().len(), 1);
    assert_eq!(json["total"]["free"], 1);
}

#[test]
fn test_analyze_missing_ledger_fails() {
    let home = tempfile::tempdir().unwrap();
    let data = ledger_dir();
    let data_dir = data.path().to_str().unwrap();

    let output = run_spar(
        home.path(),
        &["--json", "analyze", "--from", "1", "--to", "5", "--data-dir", data_dir],
    );
    assert!(!output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["success"], false);
    assert!(json["error"].as_str().unwrap().contains("not found"));
}

#[test]
fn test_analyze_invalid_range() {
    let home = tempfile::tempdir().unwrap();
    let data = ledger_dir();
    let data_dir = data.path().to_str().unwrap();

    let output = run_spar(
        home.path(),
        &["analyze", "--from", "3", "--to", "3", "--data-dir", data_dir],
    );
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid range"));
}

#[test]
fn test_analyze_without_data_dir_fails() {
    let home = tempfile::tempdir().unwrap();
    let output = run_spar(home.path(), &["analyze", "--from", "1", "--to", "2"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("data directory"));
}

#[test]
fn test_analyze_muxed_source_fails() {
    let home = tempfile::tempdir().unwrap();
    let data = tempfile::tempdir().unwrap();
    let ledger = json!({
        "sequence": 7,
        "transactions": [{
            "source_account": hex_account(1),
            "fee_account": hex_account(1),
            "envelope": {
                "type": "tx",
                "operations": [{
                    "source_account": { "muxed_ed25519": { "id": 3, "ed25519": hex_account(2) } },
                    "body": { "type": "manage_data", "name": "K" }
                }]
            }
        }]
    });
    std::fs::write(data.path().join("7.json"), ledger.to_string()).unwrap();

    let output = run_spar(
        home.path(),
        &["analyze", "--from", "7", "--to", "8", "--data-dir", data.path().to_str().unwrap()],
    );
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Ledger 7"));
}

#[test]
fn test_analyze_strkey_accounts() {
    let home = tempfile::tempdir().unwrap();
    let data = tempfile::tempdir().unwrap();
    // the same payer written as a strkey and as hex
    let strkey = "GA7QYNF7SOWQ3GLR2BGMZEHXAVIRZA4KVWLTJJFC7MGXUA74P7UJVSGZ";
    let hex = "3f0c34bf93ad0d9971d04ccc90f705511c838aad9734a4a2fb0d7a03fc7fe89a";
    let ledger = json!({
        "sequence": 11,
        "transactions": [
            {
                "source_account": strkey,
                "fee_account": strkey,
                "envelope": { "type": "tx", "operations": [manage_data("A")] }
            },
            {
                "source_account": hex,
                "fee_account": hex,
                "envelope": { "type": "tx", "operations": [manage_data("B")] }
            }
        ]
    });
    std::fs::write(data.path().join("11.json"), ledger.to_string()).unwrap();

    let output = run_spar(
        home.path(),
        &["--json", "analyze", "--from", "11", "--to", "12", "--data-dir", data.path().to_str().unwrap()],
    );
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let json = stdout_json(&output);
    assert_eq!(json["total"]["free"], 1);
    assert_eq!(json["total"]["stats"]["conflicts"]["TRANSACTION"], 1);
}

// ==================== Ledger Command Tests ====================

#[test]
fn test_ledger_json() {
    let home = tempfile::tempdir().unwrap();
    let data = ledger_dir();
    let data_dir = data.path().to_str().unwrap();

    let output = run_spar(home.path(), &["--json", "ledger", "1", "--data-dir", data_dir]);
    assert!(output.status.success());

    let json = stdout_json(&output);
    assert_eq!(json["sequence"], 1);
    let txs = json["transactions"].as_array().unwrap();
    assert_eq!(txs.len(), 2);
    assert_eq!(txs[0]["conflicted"], false);
    assert_eq!(txs[1]["conflicted"], true);
    assert_eq!(txs[1]["key"], "PAYMENT");
    assert_eq!(txs[1]["reason"], "ACCOUNT_BALANCE");
}

#[test]
fn test_ledger_text() {
    let home = tempfile::tempdir().unwrap();
    let data = ledger_dir();
    let data_dir = data.path().to_str().unwrap();

    let output = run_spar(home.path(), &["ledger", "1", "--data-dir", data_dir]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("ledger 1"));
    assert!(stdout.contains("PAYMENT ACCOUNT_BALANCE"));
    assert!(stdout.contains("1 free, 1 conflicted"));
}

// ==================== Config Command Tests ====================

#[test]
fn test_config_show_defaults() {
    let home = tempfile::tempdir().unwrap();
    let output = run_spar(home.path(), &["--json", "config", "--show"]);
    assert!(output.status.success());

    let json = stdout_json(&output);
    assert!(json["data_dir"].is_null());
    assert!(json["jobs"].as_u64().unwrap() >= 1);
    assert_eq!(json["histogram_buckets"].as_array().unwrap().len(), 10);
}

#[test]
fn test_config_set_then_analyze() {
    let home = tempfile::tempdir().unwrap();
    let data = ledger_dir();
    let data_dir = data.path().to_str().unwrap();

    let output = run_spar(
        home.path(),
        &["--json", "config", "--set-data-dir", data_dir, "--set-jobs", "3"],
    );
    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["status"], "saved");
    assert!(home.path().join("config.toml").exists());

    let output = run_spar(home.path(), &["--json", "config", "--show"]);
    let json = stdout_json(&output);
    assert_eq!(json["data_dir"], data_dir);
    assert_eq!(json["jobs"], 3);

    // the saved data directory is picked up without --data-dir
    let output = run_spar(home.path(), &["--json", "analyze", "--from", "2", "--to", "3"]);
    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["total"]["free"], 1);
}

#[test]
fn test_config_rejects_zero_jobs() {
    let home = tempfile::tempdir().unwrap();
    let output = run_spar(home.path(), &["config", "--set-jobs", "0"]);
    assert!(!output.status.success());
    assert!(!home.path().join("config.toml").exists());
}
